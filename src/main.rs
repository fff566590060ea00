use clap::Parser;
use colored::*;
use futures::StreamExt;
use std::fs;
use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use pdfsum::api::OpenAiClient;
use pdfsum::cli::Args;
use pdfsum::config::{init_config_files, Config, JsonConfig};
use pdfsum::conversation::ConversationCache;
use pdfsum::document::{DocumentReader, DocumentSource};
use pdfsum::transcript::{FilesystemTranscriptStore, TranscriptStore};
use pdfsum::ui::{
    display_analyzing, display_document, display_output_path, display_summary, print_usage,
};
use pdfsum::Summarizer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.config_init {
        match init_config_files(&std::env::current_dir()?) {
            Ok(created) if created.is_empty() => {
                println!("{}", "Config files already exist; nothing written.".yellow());
            }
            Ok(created) => {
                for path in created {
                    println!("{}", format!("Created {}", path.display()).green());
                }
                println!("Set your API key in .pdfsum.yaml or OPENAI_API_KEY.");
            }
            Err(e) => {
                eprintln!("{}", format!("Error writing config: {:#}", e).red());
                process::exit(1);
            }
        }
        return Ok(());
    }

    if args.clear_history {
        let json_config = match JsonConfig::load() {
            Ok(json_config) => json_config,
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red(), e);
                process::exit(1);
            }
        };
        let store = FilesystemTranscriptStore::new(json_config.conversations_dir());
        match store.clear_all() {
            Ok(count) => {
                println!(
                    "{}",
                    format!("Cleared {} conversation transcript(s).", count).green()
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", format!("Error clearing history: {}", e).red());
                process::exit(1);
            }
        }
    }

    let Some(target) = args.target.clone() else {
        print_usage();
        process::exit(1);
    };

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let store = Arc::new(
        FilesystemTranscriptStore::new(&config.conversations_dir).with_verbose(config.verbose),
    );

    if let Err(e) = run(&args, &config, store, &target).await {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }

    Ok(())
}

async fn run(
    args: &Args,
    config: &Config,
    store: Arc<FilesystemTranscriptStore>,
    target: &str,
) -> pdfsum::Result<()> {
    println!("{}", target);

    let client = OpenAiClient::new(&config.api_key, config.api_endpoint.clone())?
        .with_stream_timeout(config.stream_timeout)
        .with_verbose(config.verbose);
    let cache = ConversationCache::new(store).with_verbose(config.verbose);
    let summarizer = Summarizer::with_cache(Arc::new(client), cache, config.model.clone());

    let thread_id = args.thread_id.as_deref();
    if config.verbose {
        if let Some(thread_id) = thread_id {
            if summarizer.has_conversation(thread_id) {
                eprintln!(
                    "{}",
                    format!("[pdfsum] Continuing conversation {}", thread_id).dimmed()
                );
            }
        }
    }

    let reader = DocumentReader::new(&config.download_dir).with_verbose(config.verbose);
    let text = reader.read_text(&DocumentSource::parse(target)).await?;
    if config.verbose {
        display_document(&text);
    }

    display_analyzing();

    let system_prompt = Some(config.system_prompt.as_str());
    let summary = if config.stream {
        let mut summary = String::new();
        let stream = summarizer.submit_stream(&text, thread_id, system_prompt);
        futures::pin_mut!(stream);
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            print!("{}", fragment);
            io::stdout().flush()?;
            summary.push_str(&fragment);
        }
        println!();
        summary
    } else {
        summarizer
            .submit(&text, thread_id, system_prompt)
            .await?
    };

    let output_path = config.output_path.display().to_string();
    if config.stream {
        display_output_path(&output_path);
    } else {
        display_summary(&summary, &output_path);
    }
    fs::write(&config.output_path, &summary)?;

    Ok(())
}
