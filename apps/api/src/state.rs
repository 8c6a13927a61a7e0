use crate::intel::config::PipelineConfig;
use crate::intel::playbook::PlaybookGenerator;
use crate::intel::signal_scorer::SignalScorer;
use crate::intel::wedge_detector::WedgeDetector;
use crate::store::Stores;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub pipeline: PipelineConfig,
}

impl AppState {
    pub fn new(stores: Stores, pipeline: PipelineConfig) -> Self {
        AppState { stores, pipeline }
    }

    pub fn scorer(&self) -> SignalScorer {
        SignalScorer::new(self.stores.signals.clone(), self.pipeline.clone())
    }

    pub fn detector(&self) -> WedgeDetector {
        WedgeDetector::new(self.stores.clone(), self.pipeline.clone())
    }

    pub fn playbook_generator(&self) -> PlaybookGenerator {
        PlaybookGenerator::new(self.stores.clone(), self.pipeline.clone())
    }
}
