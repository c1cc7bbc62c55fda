//! Library module for book records
//!
//! Holds the record model and the session's append-only shelf.

mod book;
mod shelf;

pub use book::*;
pub use shelf::*;
