//! Application state shared across all handlers.

use pc_core::{CompressConfig, Result};
use pc_rewriter::PromptPipeline;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PromptPipeline>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_pipeline(PromptPipeline::new())
    }

    pub fn with_pipeline(pipeline: PromptPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline), start_time: Instant::now() }
    }

    pub fn from_config(config: &CompressConfig) -> Result<Self> {
        Ok(Self::with_pipeline(PromptPipeline::from_config(config)?))
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
