//! QR codes for file links

use qrcode::render::svg;
use qrcode::QrCode;

/// Inline `<svg>` encoding `data`, or `None` for empty or oversized input
pub fn qr_svg(data: &str, size: u32) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    let code = match QrCode::new(data.as_bytes()) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("Cannot encode QR code for {} bytes: {}", data.len(), e);
            return None;
        }
    };

    let image = code
        .render::<svg::Color>()
        .min_dimensions(size, size)
        .quiet_zone(true)
        .build();

    // Drop the XML declaration so the markup can be inlined
    let start = image.find("<svg").unwrap_or(0);
    Some(image[start..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_svg() {
        let svg = qr_svg("https://files.example.com/book.pdf", 64).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_qr_svg_empty() {
        assert_eq!(qr_svg("", 64), None);
    }

    #[test]
    fn test_qr_svg_too_long() {
        let huge = "x".repeat(8000);
        assert_eq!(qr_svg(&huge, 64), None);
    }
}
