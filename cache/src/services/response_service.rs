//! Get-or-generate request path over the cache

use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{CacheEngine, ModelRouter};
use crate::error::{CacheError, CacheResult};
use crate::traits::Generator;
use crate::types::{GenerationRequest, Priority, ResponseOutcome, ResponseSource, TaskType};

/// Answers agent prompts from the cache, generating and storing on a miss
#[derive(Clone)]
pub struct ResponseService {
    engine: Arc<CacheEngine>,
    router: Arc<ModelRouter>,
    generator: Arc<dyn Generator>,
}

impl ResponseService {
    pub fn new(engine: Arc<CacheEngine>, router: Arc<ModelRouter>, generator: Arc<dyn Generator>) -> Self {
        Self {
            engine,
            router,
            generator,
        }
    }

    pub fn engine(&self) -> &Arc<CacheEngine> {
        &self.engine
    }

    pub fn router(&self) -> &Arc<ModelRouter> {
        &self.router
    }

    /// Serve from prewarm or cache, else generate with the agent's default model
    pub async fn respond(&self, agent: &str, prompt: &str) -> CacheResult<ResponseOutcome> {
        validate(agent, prompt)?;

        if let Some(hit) = self.engine.lookup(agent, prompt) {
            debug!(agent, source = %hit.source, "Serving cached response");
            return Ok(ResponseOutcome::from_lookup(hit));
        }

        let generation = self
            .generator
            .generate(GenerationRequest {
                agent: agent.to_string(),
                prompt: prompt.to_string(),
                model: None,
            })
            .await?;
        self.engine.set(agent, prompt, &generation.response, generation.tokens);
        info!(agent, tokens = generation.tokens, "Generated and cached response");

        Ok(ResponseOutcome {
            response: generation.response,
            cached: false,
            source: ResponseSource::Generator,
            tokens: Some(generation.tokens),
            model: None,
            provider: None,
        })
    }

    /// Like `respond`, routing a miss to the best model for the agent's task
    pub async fn respond_routed(&self, agent: &str, prompt: &str, priority: Priority) -> CacheResult<ResponseOutcome> {
        validate(agent, prompt)?;

        if let Some(hit) = self.engine.lookup(agent, prompt) {
            debug!(agent, source = %hit.source, "Serving cached response");
            return Ok(ResponseOutcome::from_lookup(hit));
        }

        let task = TaskType::infer_from_agent(agent);
        let model = self
            .router
            .select_best(task, priority)
            .ok_or(CacheError::NoModelAvailable { task })?;
        info!(agent, task = %task, model = %model.name, ?priority, "Routed request");

        let generation = self
            .generator
            .generate(GenerationRequest {
                agent: agent.to_string(),
                prompt: prompt.to_string(),
                model: Some(model.name.clone()),
            })
            .await?;
        self.engine.set(agent, prompt, &generation.response, generation.tokens);

        Ok(ResponseOutcome {
            response: generation.response,
            cached: false,
            source: ResponseSource::Generator,
            tokens: Some(generation.tokens),
            model: Some(model.name.clone()),
            provider: Some(model.provider.clone()),
        })
    }
}

fn validate(agent: &str, prompt: &str) -> CacheResult<()> {
    if agent.trim().is_empty() || prompt.trim().is_empty() {
        return Err(CacheError::invalid_request("Agent and prompt are required"));
    }
    Ok(())
}
