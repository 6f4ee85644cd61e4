//! Hub state shared by every handler

use cache::ResponseService;
use std::sync::Arc;
use std::time::Instant;

use crate::traits::PeerRegistry;

#[derive(Clone)]
pub struct HubState {
    pub registry: Arc<dyn PeerRegistry>,
    pub responses: ResponseService,
    pub started_at: Instant,
}

impl HubState {
    pub fn new(registry: Arc<dyn PeerRegistry>, responses: ResponseService) -> Self {
        Self {
            registry,
            responses,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
