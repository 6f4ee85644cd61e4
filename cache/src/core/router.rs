//! Priority-scored model selection

use crate::core::defaults::default_models;
use crate::types::{ModelProfile, Priority, TaskType};

/// Explicitly constructed model catalog
#[derive(Clone, Debug)]
pub struct ModelRouter {
    models: Vec<ModelProfile>,
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new(default_models())
    }
}

impl ModelRouter {
    pub fn new(models: Vec<ModelProfile>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &[ModelProfile] {
        &self.models
    }

    pub fn find(&self, name: &str) -> Option<&ModelProfile> {
        self.models.iter().find(|model| model.name == name)
    }

    /// Highest-scoring candidate for `task`; the earliest model wins ties
    pub fn select_best(&self, task: TaskType, priority: Priority) -> Option<&ModelProfile> {
        let mut best: Option<(&ModelProfile, f64)> = None;

        for model in self.models.iter().filter(|model| Self::is_candidate(model, task)) {
            let score = Self::score(model, priority);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((model, score));
            }
        }

        best.map(|(model, _)| model)
    }

    /// Dollar cost of `tokens` on `model_name`; zero for unknown models
    pub fn estimate_cost(&self, tokens: u64, model_name: &str) -> f64 {
        self.find(model_name)
            .map_or(0.0, |model| tokens as f64 / 1000.0 * model.cost_per_1k_tokens)
    }

    fn is_candidate(model: &ModelProfile, task: TaskType) -> bool {
        !task.is_code() || model.has_specialty("code") || model.has_specialty(task.as_str())
    }

    fn score(model: &ModelProfile, priority: Priority) -> f64 {
        let speed = f64::from(model.speed_rating);
        let quality = f64::from(model.quality_rating);
        let cost = model.cost_per_1k_tokens;

        match priority {
            Priority::Cost => 100.0 / cost,
            Priority::Speed => speed * 10.0,
            Priority::Quality => quality * 10.0,
            Priority::Medium => speed * 4.0 + quality * 3.0 + 50.0 / cost,
        }
    }
}
