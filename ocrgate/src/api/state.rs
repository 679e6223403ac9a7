use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::ocr::FallbackOrchestrator;
use crate::services::OcrService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, orchestrator: FallbackOrchestrator) -> Self {
        let config = Arc::new(config);
        let ocr = OcrService::new(orchestrator, &config.ocr);

        Self {
            config,
            ocr,
            started_at: Instant::now(),
        }
    }

    pub fn orchestrator(&self) -> &FallbackOrchestrator {
        self.ocr.orchestrator()
    }
}
