//! Cache key derivation

/// `"<agent>:<prompt>"` with the prompt lowercased, trimmed and capped at
/// `max_chars` characters.
///
/// Prompts differing only in case, surrounding whitespace, or text past the
/// cap share a key and therefore a cache entry.
pub fn cache_key(agent: &str, prompt: &str, max_chars: usize) -> String {
    let normalized = prompt.to_lowercase();
    let capped: String = normalized.trim().chars().take(max_chars).collect();
    format!("{agent}:{capped}")
}
