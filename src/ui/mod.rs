pub mod output;

pub use output::{
    display_analyzing, display_document, display_output_path, display_summary, print_usage,
};
