mod api;
mod cli;
mod config;
mod model;
mod search;
mod store;
mod transcript;
mod validate;

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "roster", about = "A terminal user-directory manager")]
pub struct Args {
    #[arg(short, long, help = "One-shot command mode (e.g. -c \"/search ann\")")]
    pub command: Option<String>,

    #[arg(long, env = "ROSTER_ENDPOINT", help = "User-list endpoint URL")]
    pub endpoint: Option<String>,

    #[arg(long, value_name = "SECS", help = "Request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Skip the startup fetch")]
    pub offline: bool,

    #[arg(long, help = "Session transcripts directory")]
    pub transcripts_dir: Option<PathBuf>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_default()
    };

    // CLI flags override file config
    if let Some(endpoint) = &args.endpoint {
        cfg.endpoint = endpoint.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        cfg.timeout_secs = timeout_secs;
    }

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error {}", error);
        }
        return Err(anyhow::anyhow!("invalid configuration"));
    }

    let transcripts_dir = args
        .transcripts_dir
        .clone()
        .or_else(|| cfg.transcripts_dir.clone())
        .unwrap_or_else(|| PathBuf::from(".roster").join("sessions"));
    std::fs::create_dir_all(&transcripts_dir)?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let transcript_path = transcripts_dir.join(format!("{}.jsonl", session_id));
    let transcript = Rc::new(RefCell::new(transcript::Transcript::new(
        &transcript_path,
        &session_id,
    )?));
    transcript.borrow_mut().session_start(&cfg.endpoint)?;

    let api = api::HttpApi::new(&cfg.endpoint, cfg.timeout());

    let mut store = store::UserStore::new();
    let sink = Rc::clone(&transcript);
    store.subscribe(Box::new(move |event| {
        let mut t = sink.borrow_mut();
        let _ = match event {
            store::StoreEvent::FetchStarted => t.fetch_started(),
            store::StoreEvent::FetchCompleted { count } => t.fetch_completed(*count),
            store::StoreEvent::FetchFailed { error } => t.fetch_failed(error),
            store::StoreEvent::Added { id } => t.user_added(*id),
            store::StoreEvent::Updated { id } => t.user_updated(*id),
            store::StoreEvent::Deleted { id } => t.user_deleted(*id),
        };
    }));

    let ctx = cli::Context {
        args,
        session_id,
        api,
        store: RefCell::new(store),
        query: RefCell::new(String::new()),
        transcript,
    };

    if !ctx.args.offline {
        cli::startup_fetch(&ctx);
    }

    if let Some(command) = ctx.args.command.clone() {
        cli::run_once(&ctx, &command)
    } else {
        cli::run_repl(ctx)
    }
}
