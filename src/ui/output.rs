use colored::*;

const SEPARATOR: &str = "---------------------------------------";

/// Print the horizontal rule used between output sections
pub fn display_separator() {
    println!("\n\n{}\n\n", SEPARATOR.dimmed());
}

/// Print the extracted document text
pub fn display_document(text: &str) {
    println!("{}", text);
    display_separator();
}

pub fn display_analyzing() {
    println!("{}", "Analyzing the document...\n".cyan());
}

/// Print the final summary and where it was written
pub fn display_summary(summary: &str, output_path: &str) {
    display_separator();
    println!("{}", summary);
    display_output_path(output_path);
}

pub fn display_output_path(output_path: &str) {
    display_separator();
    println!("{}", format!("Output: {}", output_path).green());
}

pub fn print_usage() {
    eprintln!("{}", "Please provide the file path as an argument.".red());
    eprintln!(" > pdfsum <local file path>");
    eprintln!(" > pdfsum <PDF URL>");
    eprintln!(" Available extensions are txt, pdf, html, and so on.");
}
