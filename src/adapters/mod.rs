// Adapters layer: concrete implementations for external systems.

pub mod artwork;
pub mod discogs;

pub use artwork::HttpArtworkSource;
pub use discogs::DiscogsClient;
