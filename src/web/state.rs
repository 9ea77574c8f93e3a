use crate::domain::model::LabelOptions;
use crate::domain::ports::{ArtworkSource, ReleaseSource};
use std::sync::Arc;

/// Shared, immutable per-process state. Requests share the clients and
/// options but nothing mutable, so they stay independent.
#[derive(Clone)]
pub struct AppState {
    pub releases: Arc<dyn ReleaseSource>,
    pub artwork: Arc<dyn ArtworkSource>,
    pub options: LabelOptions,
}

impl AppState {
    pub fn new(
        releases: Arc<dyn ReleaseSource>,
        artwork: Arc<dyn ArtworkSource>,
        options: LabelOptions,
    ) -> Self {
        Self {
            releases,
            artwork,
            options,
        }
    }
}
