//! Pure cache and routing logic

pub mod defaults;
pub mod engine;
pub mod key;
pub mod router;

pub use defaults::{DEFAULT_PREWARM, default_models, seed_default_prewarm};
pub use engine::{APPROXIMATE_RESPONSE_TOKENS, CacheEngine};
pub use key::cache_key;
pub use router::ModelRouter;
