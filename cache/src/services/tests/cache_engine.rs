//! Tests for CacheEngine

use shared::CacheConfig;
use std::sync::Arc;

use super::common::*;
use crate::core::{CacheEngine, DEFAULT_PREWARM, seed_default_prewarm};
use crate::traits::MockClock;
use crate::types::{CacheStats, ResponseSource};

#[test]
fn test_normalized_prompt_hits_same_entry() {
    let (engine, _clock) = manual_engine();

    engine.set("agentA", "promptX", "R", 100);

    assert_eq!(engine.get("agentA", "PROMPTX  "), Some("R".to_string()));
    assert_eq!(engine.stats().total_hits, 1);
}

#[test]
fn test_agents_do_not_share_entries() {
    let (engine, _clock) = manual_engine();

    engine.set("agentA", "p", "R", 10);

    assert_eq!(engine.get("agentB", "p"), None);
}

#[test]
fn test_stats_accumulate_hits_and_savings() {
    let (engine, _clock) = manual_engine();
    engine.prewarm("seed", "p", "S");
    engine.set("a", "one", "R1", 100);
    engine.set("a", "two", "R2", 40);

    engine.get("a", "one");
    engine.get("a", "one");
    engine.get("a", "two");

    assert_eq!(
        engine.stats(),
        CacheStats {
            size: 2,
            total_hits: 3,
            total_tokens_saved: 240,
            prewarm_count: 1,
        }
    );
}

#[test]
fn test_inserting_past_capacity_evicts_oldest() {
    let (engine, clock) = manual_engine();

    for i in 0..1000 {
        engine.set("agent", &format!("prompt {i}"), "R", 1);
        clock.advance(1);
    }
    assert_eq!(engine.len(), 1000);

    engine.set("agent", "prompt 1000", "R", 1);

    assert_eq!(engine.len(), 1000);
    assert_eq!(engine.get("agent", "prompt 0"), None);
    assert!(engine.get("agent", "prompt 1").is_some());
    assert!(engine.get("agent", "prompt 1000").is_some());
}

#[test]
fn test_eviction_ignores_hit_counts() {
    let (engine, clock) = manual_engine_with(CacheConfig {
        max_entries: 2,
        ..CacheConfig::default()
    });

    engine.set("a", "old", "R", 1);
    clock.advance(10);
    engine.set("a", "newer", "R", 1);
    for _ in 0..5 {
        engine.get("a", "old");
    }

    engine.set("a", "newest", "R", 1);

    assert_eq!(engine.get("a", "old"), None);
    assert!(engine.get("a", "newer").is_some());
}

#[test]
fn test_same_timestamp_evicts_first_inserted() {
    let (engine, _clock) = manual_engine_with(CacheConfig {
        max_entries: 3,
        ..CacheConfig::default()
    });

    engine.set("a", "first", "R", 1);
    engine.set("a", "second", "R", 1);
    engine.set("a", "third", "R", 1);
    engine.set("a", "fourth", "R", 1);

    assert_eq!(engine.get("a", "first"), None);
    assert_eq!(engine.len(), 3);
}

#[test]
fn test_overwriting_at_capacity_does_not_evict() {
    let (engine, _clock) = manual_engine_with(CacheConfig {
        max_entries: 2,
        ..CacheConfig::default()
    });

    engine.set("a", "x", "R1", 1);
    engine.set("a", "y", "R", 1);
    engine.get("a", "x");
    engine.set("a", "x", "R2", 5);

    assert_eq!(engine.len(), 2);
    assert!(engine.get("a", "y").is_some());
    assert_eq!(engine.get("a", "x"), Some("R2".to_string()));
    // Overwrite starts a fresh hit count
    assert_eq!(engine.stats().total_tokens_saved, 5 + 1);
}

#[test]
fn test_expired_entry_is_evicted_on_get() {
    let (engine, clock) = manual_engine();
    engine.set("a", "stale", "R", 10);
    engine.set("a", "other", "R", 10);
    assert_eq!(engine.stats().size, 2);

    clock.advance(3_600_001);

    assert_eq!(engine.get("a", "stale"), None);
    assert_eq!(engine.stats().size, 1);
}

#[test]
fn test_entry_at_exact_ttl_is_still_live() {
    let (engine, clock) = manual_engine();
    engine.set("a", "p", "R", 10);

    clock.advance(3_600_000);
    assert_eq!(engine.get("a", "p"), Some("R".to_string()));

    clock.advance(1);
    assert_eq!(engine.get("a", "p"), None);
}

#[test]
fn test_prewarm_wins_and_never_expires() {
    let (engine, clock) = manual_engine();
    engine.prewarm("a", "p", "R0");

    assert_eq!(engine.get_for_agent("a", "p"), Some("R0".to_string()));

    engine.set("a", "p", "R1", 10);
    clock.advance(10 * 3_600_000);

    assert_eq!(engine.get_for_agent("a", "p"), Some("R0".to_string()));
    assert_eq!(engine.get_prewarmed("A", "p"), None);
    assert_eq!(engine.get_prewarmed("a", "  P "), Some("R0".to_string()));
}

#[test]
fn test_prewarm_is_not_visible_through_get() {
    let (engine, _clock) = manual_engine();
    engine.prewarm("a", "p", "R0");

    assert_eq!(engine.get("a", "p"), None);
}

#[test]
fn test_lookup_reports_source() {
    let (engine, _clock) = manual_engine();
    engine.prewarm("a", "seeded", "S");
    engine.set("a", "cached", "C", 42);

    let prewarm = engine.lookup("a", "seeded").unwrap();
    assert_eq!(prewarm.source, ResponseSource::Prewarm);
    assert_eq!(prewarm.tokens, None);

    let cached = engine.lookup("a", "cached").unwrap();
    assert_eq!(cached.source, ResponseSource::Cache);
    assert_eq!(cached.tokens, Some(42));

    assert!(engine.lookup("a", "missing").is_none());
}

#[test]
fn test_clear_keeps_prewarm() {
    let (engine, _clock) = manual_engine();
    engine.prewarm("a", "p", "S");
    engine.set("a", "q", "R", 1);

    engine.clear();

    assert!(engine.is_empty());
    assert_eq!(engine.stats().prewarm_count, 1);
    assert_eq!(engine.get_for_agent("a", "p"), Some("S".to_string()));
}

#[test]
fn test_stats_saturate_on_huge_token_counts() {
    let (engine, _clock) = manual_engine();

    engine.set("a", "p", "R", u64::MAX / 2 + 1);
    engine.set("b", "p", "R", u64::MAX);
    engine.get("a", "p");
    engine.get("a", "p");
    engine.get("b", "p");

    let stats = engine.stats();
    assert_eq!(stats.total_hits, 3);
    assert_eq!(stats.total_tokens_saved, u64::MAX);
}

#[test]
fn test_set_agent_response_uses_approximate_tokens() {
    let (engine, _clock) = manual_engine();
    engine.set_agent_response("a", "p", "R");
    engine.get("a", "p");

    assert_eq!(engine.stats().total_tokens_saved, 150);
}

#[test]
fn test_default_seeds() {
    let (engine, _clock) = manual_engine();

    assert_eq!(seed_default_prewarm(&engine), 3);
    assert_eq!(engine.stats().prewarm_count, 3);

    let component = engine.get_for_agent("js-master", "Create React Component").unwrap();
    assert!(component.contains("useState"));
    for (agent, prompt, response) in DEFAULT_PREWARM {
        assert_eq!(engine.get_prewarmed(agent, prompt).as_deref(), Some(response));
    }
}

#[test]
fn test_engine_reads_injected_clock() {
    let mut clock = MockClock::new();
    clock.expect_now_ms().times(2).returning(|| START_MS);
    let engine = CacheEngine::with_clock(CacheConfig::default(), Arc::new(clock));

    engine.set("a", "p", "R", 1);
    assert_eq!(engine.get("a", "p"), Some("R".to_string()));
}
