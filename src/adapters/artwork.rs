//! Cover-art fetching.
//!
//! Downloads the release's cover image, decodes it, and re-encodes to
//! baseline JPEG for PDF embedding. Artwork is best-effort everywhere:
//! callers log failures and compose the label without an image.

use crate::domain::model::Artwork;
use crate::domain::ports::ArtworkSource;
use crate::utils::error::{LabelError, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use std::time::Duration;

/// Images larger than this edge are downscaled; a 30 mm print region
/// never needs more.
const MAX_EDGE: u32 = 1200;
const JPEG_QUALITY: u8 = 85;
const FETCH_TIMEOUT_SECONDS: u64 = 30;

pub struct HttpArtworkSource {
    http: reqwest::Client,
}

impl HttpArtworkSource {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("caselabel/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ArtworkSource for HttpArtworkSource {
    async fn fetch(&self, url: &str) -> Result<Artwork> {
        tracing::debug!("Fetching cover art from {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LabelError::upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LabelError::upstream(format!(
                "cover art fetch returned status {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        encode_for_pdf(&bytes)
    }
}

/// Decodes any supported image and produces the RGB JPEG the PDF embeds.
pub fn encode_for_pdf(bytes: &[u8]) -> Result<Artwork> {
    let decoded = image::load_from_memory(bytes)?;
    let decoded = if decoded.width().max(decoded.height()) > MAX_EDGE {
        decoded.thumbnail(MAX_EDGE, MAX_EDGE)
    } else {
        decoded
    };

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&rgb)?;

    Ok(Artwork {
        jpeg,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn fetches_and_reencodes_png_as_jpeg() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/front.png");
            then.status(200)
                .header("Content-Type", "image/png")
                .body(png_fixture(8, 4));
        });

        let artwork = HttpArtworkSource::new()
            .unwrap()
            .fetch(&server.url("/front.png"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!((artwork.width, artwork.height), (8, 4));
        // JPEG magic marker
        assert_eq!(&artwork.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn missing_artwork_is_an_error_for_the_caller_to_tolerate() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone.jpg");
            then.status(404);
        });

        let err = HttpArtworkSource::new()
            .unwrap()
            .fetch(&server.url("/gone.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, LabelError::Upstream { .. }));
    }

    #[test]
    fn undecodable_bytes_are_an_image_error() {
        assert!(encode_for_pdf(b"definitely not an image").is_err());
    }
}
