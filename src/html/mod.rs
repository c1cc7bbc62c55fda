//! HTML views
//!
//! Renders the browse grid, the single-book viewer and the two forms.
//! QR codes are inlined as SVG.

mod pages;
mod qr;
mod view;

pub use pages::{browse_page, feed_page, upload_page, FeedForm, UploadForm};
pub use qr::qr_svg;
pub use view::ViewState;
