use crate::core::layout::compute_layout;
use crate::core::pdf::render_pdf;
use crate::domain::model::{group_into_discs, Artwork, LabelOptions, Release};
use crate::utils::error::Result;

/// Drives release → discs → layout → PDF bytes. Pure apart from tracing;
/// every request gets its own pass over an immutable release.
pub struct LabelComposer {
    options: LabelOptions,
}

impl LabelComposer {
    pub fn new(options: LabelOptions) -> Self {
        Self { options }
    }

    pub fn compose(&self, release: &Release, artwork: Option<&Artwork>) -> Result<Vec<u8>> {
        let discs = group_into_discs(release);
        tracing::debug!(
            "Composing label for '{} - {}': {} disc(s), {} track(s)",
            release.artist,
            release.title,
            discs.len(),
            discs.iter().map(|d| d.tracks.len()).sum::<usize>()
        );

        let art_dimensions = artwork.map(|a| (a.width, a.height));
        let layout = compute_layout(release, &discs, art_dimensions, &self.options);
        tracing::debug!("Layout spans {} page(s)", layout.pages.len());

        let bytes = render_pdf(&layout, artwork)?;
        tracing::debug!("Rendered PDF ({} bytes)", bytes.len());
        Ok(bytes)
    }
}

impl Default for LabelComposer {
    fn default() -> Self {
        Self::new(LabelOptions::default())
    }
}
