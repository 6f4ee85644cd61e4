//! Cache data model and routing vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A memoized response in the TTL store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheValue {
    pub response: String,
    pub tokens: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp_created: i64,
    pub hit_count: u64,
}

/// A permanent response seeded at startup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrewarmEntry {
    pub response: String,
    pub agent: String,
    pub prompt: String,
}

/// Aggregate counters over the TTL store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries currently stored, including expired ones not yet evicted
    pub size: usize,
    pub total_hits: u64,
    /// Sum of `tokens * hits` over stored entries
    pub total_tokens_saved: u64,
    pub prewarm_count: usize,
}

/// Where a response came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Prewarm,
    Cache,
    Generator,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseSource::Prewarm => "prewarm",
            ResponseSource::Cache => "cache",
            ResponseSource::Generator => "generator",
        };
        f.write_str(name)
    }
}

/// Result of `CacheEngine::lookup`
#[derive(Clone, Debug, PartialEq)]
pub struct CacheLookup {
    pub response: String,
    pub source: ResponseSource,
    /// Known for TTL entries only
    pub tokens: Option<u64>,
}

/// Kind of work a request asks for; drives model filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    General,
    Code,
    Reasoning,
    Creative,
    Python,
    Rust,
    Solidity,
    React,
    Javascript,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::General => "general",
            TaskType::Code => "code",
            TaskType::Reasoning => "reasoning",
            TaskType::Creative => "creative",
            TaskType::Python => "python",
            TaskType::Rust => "rust",
            TaskType::Solidity => "solidity",
            TaskType::React => "react",
            TaskType::Javascript => "javascript",
        }
    }

    /// Tasks that only code-capable models should handle
    pub fn is_code(&self) -> bool {
        matches!(
            self,
            TaskType::Code
                | TaskType::Python
                | TaskType::Rust
                | TaskType::Solidity
                | TaskType::React
                | TaskType::Javascript
        )
    }

    /// Guess the task from an agent name such as `solidity-auditor`
    pub fn infer_from_agent(agent: &str) -> Self {
        let agent = agent.to_lowercase();
        if agent.contains("solidity") {
            TaskType::Solidity
        } else if agent.contains("rust") {
            TaskType::Rust
        } else if agent.contains("python") {
            TaskType::Python
        } else if agent.contains("react") {
            TaskType::React
        } else {
            TaskType::Javascript
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What model selection optimizes for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Cost,
    Speed,
    Quality,
    #[default]
    Medium,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cost" => Ok(Priority::Cost),
            "speed" => Ok(Priority::Speed),
            "quality" => Ok(Priority::Quality),
            "medium" => Ok(Priority::Medium),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// One routable model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProfile {
    pub name: String,
    pub provider: String,
    pub cost_per_1k_tokens: f64,
    /// 1-10
    pub speed_rating: u8,
    /// 1-10
    pub quality_rating: u8,
    pub specialties: Vec<String>,
}

impl ModelProfile {
    pub fn new(
        name: &str,
        provider: &str,
        cost_per_1k_tokens: f64,
        speed_rating: u8,
        quality_rating: u8,
        specialties: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.to_string(),
            cost_per_1k_tokens,
            speed_rating,
            quality_rating,
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialties.iter().any(|s| s == specialty)
    }
}

/// Input to a `Generator`
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub agent: String,
    pub prompt: String,
    /// Set when the request was routed to a specific model
    pub model: Option<String>,
}

/// Output of a `Generator`
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub response: String,
    pub tokens: u64,
}

/// What the response service hands back to request handlers
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseOutcome {
    pub response: String,
    pub cached: bool,
    pub source: ResponseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ResponseOutcome {
    pub fn from_lookup(lookup: CacheLookup) -> Self {
        Self {
            response: lookup.response,
            cached: true,
            source: lookup.source,
            tokens: lookup.tokens,
            model: None,
            provider: None,
        }
    }
}
