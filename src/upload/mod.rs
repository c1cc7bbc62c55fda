//! Book upload
//!
//! Takes an uploaded file and the uploader's name, stores the file with the
//! hosted backend and records its metadata. PDFs get a cover rendered from
//! their first page.

pub mod pipeline;
pub mod types;

pub use pipeline::UploadPipeline;
pub use types::*;
