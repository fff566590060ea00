pub mod api;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod models;
pub mod summarizer;
pub mod transcript;
pub mod ui;

pub use error::{PdfSumError, Result};
pub use summarizer::Summarizer;
