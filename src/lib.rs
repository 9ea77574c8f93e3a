pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

pub use crate::adapters::{DiscogsClient, HttpArtworkSource};
pub use crate::core::LabelComposer;
pub use crate::domain::model::{LabelOptions, Release, Track};
pub use crate::domain::ports::{ArtworkSource, ReleaseSource};
pub use crate::utils::error::{LabelError, Result};
pub use crate::web::{build_router, AppState};
