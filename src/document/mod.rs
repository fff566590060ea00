mod extract;
mod reader;
mod source;

pub use extract::extract_text;
pub use reader::{DocumentReader, DEFAULT_DOWNLOAD_DIR};
pub use source::DocumentSource;
