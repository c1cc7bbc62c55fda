//! Library Hub
//!
//! A self-hosted e-book shelf. Files and metadata live with a hosted backend
//! (Supabase storage + table); this crate handles uploads, PDF cover
//! extraction, RSS imports and the browse views.
//!
//! # Modules
//!
//! - `gateway`: hosted backend client (table + object storage)
//! - `upload`: file upload pipeline
//! - `feed`: RSS import pipeline
//! - `cover`: first-page PDF covers via MuPDF
//! - `html`: server-rendered views and QR codes
//! - `routes`: axum routers

pub mod config;
pub mod cover;
pub mod error;
pub mod feed;
pub mod gateway;
pub mod html;
pub mod library;
pub mod routes;
pub mod state;
pub mod upload;
pub mod util;
