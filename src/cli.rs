use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "pdfsum")]
#[command(about = "Summarize PDF and text documents with a chat-completion model", long_about = None)]
pub struct Args {
    #[arg(
        short = 't',
        long = "thread",
        help = "Thread id; continues and persists the conversation under this id"
    )]
    pub thread_id: Option<String>,

    #[arg(short = 'm', long = "model", help = "Model to use for the summary")]
    pub model: Option<String>,

    #[arg(short = 'o', long = "output", help = "File to write the summary to")]
    pub output: Option<String>,

    #[arg(long = "system-prompt", help = "Override the system prompt")]
    pub system_prompt: Option<String>,

    #[arg(long = "no-stream", help = "Wait for the full reply instead of streaming it")]
    pub no_stream: bool,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostic output")]
    pub verbose: bool,

    #[arg(
        long = "config-init",
        help = "Create .pdfsum.yaml and system_prompt.txt in the current directory"
    )]
    pub config_init: bool,

    #[arg(long = "clear", help = "Delete all stored conversation transcripts")]
    pub clear_history: bool,

    #[arg(help = "Local file path or URL of the document (pdf, txt, html, ...)")]
    pub target: Option<String>,
}
