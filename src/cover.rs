//! Cover extraction
//!
//! Renders the first page of a PDF at unit scale and embeds it as a JPEG
//! data URL. Extraction never fails an upload: every error is logged and
//! reported as "no cover".

use axum::body::Bytes;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix};
use thiserror::Error;

/// JPEG quality used for embedded covers
pub const JPEG_QUALITY: u8 = 80;

const PDF_MAGIC: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("MuPDF error: {0}")]
    Mupdf(String),

    #[error("Document has no pages")]
    NoPages,

    #[error("Image error: {0}")]
    Image(String),
}

impl From<mupdf::Error> for CoverError {
    fn from(err: mupdf::Error) -> Self {
        CoverError::Mupdf(err.to_string())
    }
}

/// Render page one of `data` into a data URL, or `None` if it cannot be done.
pub async fn extract_cover(data: Bytes) -> Option<String> {
    let size = data.len();
    match tokio::task::spawn_blocking(move || render_first_page(&data)).await {
        Ok(Ok(jpeg)) => {
            tracing::debug!(pdf_size = size, cover_size = jpeg.len(), "Extracted cover");
            Some(to_data_url(&jpeg))
        }
        Ok(Err(e)) => {
            tracing::warn!("Error extracting cover: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("Cover extraction task failed: {}", e);
            None
        }
    }
}

/// Rasterize the first page at its natural size and encode it as JPEG
pub fn render_first_page(data: &[u8]) -> Result<Vec<u8>, CoverError> {
    let doc = Document::from_bytes(data, PDF_MAGIC)?;
    if doc.page_count()? < 1 {
        return Err(CoverError::NoPages);
    }

    let page = doc.load_page(0)?;
    let matrix = Matrix::new_scale(1.0, 1.0);
    let colorspace = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&matrix, &colorspace, false, false)?;

    encode_jpeg(&pixmap)
}

fn encode_jpeg(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, CoverError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(255);
            let b = samples.get(offset + 2).copied().unwrap_or(255);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    let img = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| CoverError::Image("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY)
        .encode_image(&img)
        .map_err(|e| CoverError::Image(e.to_string()))?;

    Ok(output)
}

fn to_data_url(jpeg: &[u8]) -> String {
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(jpeg)
    )
}
