//! Server-rendered pages
//!
//! Three views share one layout: the book grid (or the single-book viewer),
//! the feed import form and the upload form.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::library::{Book, PLACEHOLDER_COVER};

use super::qr::qr_svg;
use super::view::ViewState;

const CARD_QR_SIZE: u32 = 64;
const UPLOAD_QR_SIZE: u32 = 128;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f9fafb; color: #111827; }
nav { background: #2563eb; color: #fff; padding: 1rem; display: flex; justify-content: space-between; }
nav a { color: #fff; margin-left: 1rem; text-decoration: none; }
nav a:hover { text-decoration: underline; }
.hero { background: linear-gradient(135deg, #2563eb, #7e22ce); color: #fff; text-align: center; padding: 4rem 1rem; }
.hero h1 { font-size: 2.5rem; margin: 0 0 1rem; }
main { padding: 1.5rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1.5rem; }
.card { background: #fff; border-radius: .75rem; box-shadow: 0 4px 12px rgba(0,0,0,.1); overflow: hidden; }
.card img { width: 100%; height: 12rem; object-fit: cover; }
.card .body { padding: 1rem; }
.button { display: inline-block; background: #2563eb; color: #fff; padding: .5rem 1rem; border-radius: .5rem; text-decoration: none; border: 0; cursor: pointer; }
.button.close { background: #ef4444; position: absolute; top: 1rem; right: 1rem; }
.viewer { position: relative; }
.viewer iframe { width: 100%; height: 100vh; border: 0; }
.panel { max-width: 28rem; margin: 0 auto; background: #fff; padding: 1.5rem; border-radius: .75rem; box-shadow: 0 4px 12px rgba(0,0,0,.1); }
.panel input { width: 100%; box-sizing: border-box; padding: .5rem 1rem; margin-bottom: 1rem; border: 1px solid #d1d5db; border-radius: .5rem; }
.error { color: #ef4444; font-size: .875rem; margin-bottom: 1rem; }
.notice { color: #15803d; font-size: .875rem; margin-bottom: 1rem; }
.qr { margin-top: 1rem; }
"#;

/// State of the feed import form after a submission
#[derive(Debug, Clone, Default)]
pub struct FeedForm {
    pub url: String,
    pub error: Option<String>,
    pub imported: Option<usize>,
}

/// State of the upload form after a submission
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub name: String,
    pub error: Option<String>,
    /// Public URL of the file just uploaded
    pub file_url: Option<String>,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Digital Library Hub</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
  <strong>Digital Library Hub</strong>
  <div><a href="/">Browse Books</a><a href="/rss">Add RSS Feed</a><a href="/upload">Upload Book</a></div>
</nav>
<section class="hero">
  <h1>Digital Library Hub</h1>
  <p>Your gateway to a world of digital books. Upload, share, and discover new reads with our modern e-book repository.</p>
</section>
<main>
{body}
</main>
</body>
</html>"#,
        title = text(title),
    )
}

/// Only web and inline-image URLs are placed in `src`/`href` attributes
fn safe_url(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:image/")
    {
        url
    } else {
        "about:blank"
    }
}

/// Browse page for the given view state
pub fn browse_page(state: &ViewState, books: &[Book]) -> String {
    match state {
        ViewState::Grid => layout("Browse Books", &grid(books)),
        ViewState::Single { book, .. } => layout(book.display_title(), &viewer(book)),
    }
}

fn grid(books: &[Book]) -> String {
    if books.is_empty() {
        return r#"<p>No books yet. <a href="/upload">Upload one</a> or <a href="/rss">import a feed</a>.</p>"#
            .to_string();
    }

    let mut out = String::from(r#"<div class="grid">"#);
    for (index, book) in books.iter().enumerate() {
        let cover = match safe_url(book.display_cover()) {
            "about:blank" => PLACEHOLDER_COVER,
            url => url,
        };
        let _ = write!(
            out,
            r#"<div class="card"><img src="{cover}" alt="{alt}"><div class="body"><h3>{title}</h3><a class="button" href="/books/{index}">View PDF</a>"#,
            cover = attr(cover),
            alt = attr(book.display_title()),
            title = text(book.display_title()),
        );
        if book.has_file() {
            if let Some(svg) = qr_svg(&book.file_url, CARD_QR_SIZE) {
                let _ = write!(out, r#"<div class="qr">{svg}</div>"#);
            }
        }
        out.push_str("</div></div>");
    }
    out.push_str("</div>");
    out
}

fn viewer(book: &Book) -> String {
    format!(
        r#"<div class="viewer"><a class="button close" href="/">Close</a><iframe src="{src}" title="{title}"></iframe></div>"#,
        src = attr(safe_url(&book.file_url)),
        title = attr(book.display_title()),
    )
}

pub fn feed_page(form: &FeedForm) -> String {
    let mut body = String::from(r#"<div class="panel"><form method="post" action="/rss">"#);
    let _ = write!(
        body,
        r#"<input type="url" name="url" value="{}" placeholder="RSS Feed URL" required>"#,
        attr(&form.url)
    );
    if let Some(error) = &form.error {
        let _ = write!(body, r#"<div class="error">{}</div>"#, text(error));
    }
    if let Some(count) = form.imported {
        let _ = write!(
            body,
            r#"<div class="notice">Added {} book{}. <a href="/">Browse</a></div>"#,
            count,
            if count == 1 { "" } else { "s" }
        );
    }
    body.push_str(r#"<button class="button" type="submit">Add Books</button></form></div>"#);
    layout("Add RSS Feed", &body)
}

pub fn upload_page(form: &UploadForm) -> String {
    let mut body = String::from(
        r#"<div class="panel"><h3>Upload E-Book</h3><form method="post" action="/upload" enctype="multipart/form-data">"#,
    );
    let _ = write!(
        body,
        r#"<input type="text" name="name" value="{}" placeholder="Your Name" required>"#,
        attr(&form.name)
    );
    body.push_str(r#"<input type="file" name="file" accept=".pdf,.epub,.mobi" required>"#);
    if let Some(error) = &form.error {
        let _ = write!(body, r#"<div class="error">{}</div>"#, text(error));
    }
    body.push_str(r#"<button class="button" type="submit">Upload Book</button></form>"#);

    if let Some(svg) = form.file_url.as_deref().and_then(|url| qr_svg(url, UPLOAD_QR_SIZE)) {
        let _ = write!(
            body,
            r#"<div class="qr"><h4>QR Code for your book:</h4>{svg}</div>"#
        );
    }
    body.push_str("</div>");
    layout("Upload Book", &body)
}
