//! docqa: ask questions about a PDF.
//!
//! ```bash
//! docqa ask report.pdf "What is the deadline?" "Who signed it?"
//! cat report.pdf | docqa ask - "What is the deadline?" --export history.txt
//! docqa chat report.pdf
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use docqa_cli::chat::{parse_line, ChatInput};
use docqa_cli::{logging, Session, StagedUpload};
use docqa_core::config::{Config, Settings};
use docqa_core::types::ReplyKind;
use docqa_embed::get_default_embedder;
use docqa_generate::get_default_generator;
use docqa_rag::RagEngine;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Question answering over a single PDF")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Chunk width in characters (overrides chunking.width)
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Chunks retrieved per question (overrides retrieval.top_k)
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// -v for info logs, -vv for debug
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a PDF and answer each question in turn
    Ask {
        /// PDF to load, or "-" to read it from stdin
        pdf: String,

        /// Questions to ask
        #[arg(required = true)]
        questions: Vec<String>,

        /// Write the Q/A history to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Interactive questions against a PDF
    Chat {
        /// PDF to load
        pdf: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging::default_level(verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_settings(cli: &Cli) -> Result<(Config, Settings)> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut settings = config.settings()?;
    if let Some(width) = cli.width {
        settings.chunking.width = width;
    }
    if let Some(top_k) = cli.top_k {
        settings.retrieval.top_k = top_k;
    }
    settings.validate()?;
    Ok((config, settings))
}

fn build_session(config: &Config, settings: &Settings) -> Result<Session> {
    let embedder = get_default_embedder(&settings.embedding, config.base_dir())?;
    let generator = get_default_generator(&settings.generation, config.base_dir())?;
    Ok(Session::new(RagEngine::new(embedder, generator, settings)))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load `pdf` into the session, printing document info. Returns false when
/// the load failed (the message has been printed).
fn load_into(session: &mut Session, pdf: &str) -> Result<bool> {
    let pb = spinner("Processing document...");
    let outcome = if pdf == "-" {
        let upload = StagedUpload::from_reader("stdin.pdf", io::stdin().lock())?;
        session.load_upload(upload).map(Clone::clone)
    } else {
        session.load_path(Path::new(pdf)).map(Clone::clone)
    };
    pb.finish_and_clear();

    match outcome {
        Ok(doc) => {
            info!(name = %doc.name, chunks = doc.chunks, "document ready");
            println!("Document processed successfully!\n{doc}\n");
            Ok(true)
        }
        Err(message) => {
            eprintln!("{message}");
            Ok(false)
        }
    }
}

fn print_reply(session: &mut Session, question: &str) {
    let reply = session.ask(question);
    match reply.kind {
        ReplyKind::Answer => println!("Q: {question}\nA: {}\n", reply.text),
        ReplyKind::Info => println!("{}\n", reply.text),
        ReplyKind::Error => eprintln!("{}\n", reply.text),
    }
}

fn export_history(session: &Session, path: &Path) -> Result<()> {
    if session.history().is_empty() {
        println!("No chat history to export.");
        return Ok(());
    }
    session.history().write_to(path)?;
    println!("Exported {} turns to {}", session.history().len(), path.display());
    Ok(())
}

fn run_ask(session: &mut Session, pdf: &str, questions: &[String], export: Option<&Path>) -> Result<()> {
    if !load_into(session, pdf)? {
        bail!("no document loaded");
    }
    for question in questions {
        if question.trim().is_empty() {
            warn!("skipping blank question");
            continue;
        }
        print_reply(session, question);
    }
    if let Some(path) = export {
        export_history(session, path)?;
    }
    Ok(())
}

const CHAT_HELP: &str = "Commands: :load PDF, :export [FILE], :clear (history), :reset (document and history), :quit";

fn run_chat(session: &mut Session, pdf: &Path) -> Result<()> {
    load_into(session, &pdf.to_string_lossy())?;
    println!("{CHAT_HELP}");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse_line(&line) {
            ChatInput::Quit => break,
            ChatInput::Help => println!("{CHAT_HELP}"),
            ChatInput::Reset => {
                session.reset();
                println!("System reset. Load a new document to continue.");
            }
            ChatInput::Clear => {
                session.history_mut().clear();
                println!("Chat history cleared.");
            }
            ChatInput::Export(file) => export_history(session, &file)?,
            ChatInput::Load(None) => eprintln!("Usage: :load PDF"),
            ChatInput::Load(Some(file)) => {
                load_into(session, file)?;
            }
            ChatInput::Blank => eprintln!("Please enter a question."),
            ChatInput::Question(question) => print_reply(session, question),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let (config, settings) = load_settings(&cli)?;
    let mut session = build_session(&config, &settings)?;

    match &cli.command {
        Commands::Ask { pdf, questions, export } => run_ask(&mut session, pdf, questions, export.as_deref()),
        Commands::Chat { pdf } => run_chat(&mut session, pdf),
    }
}
