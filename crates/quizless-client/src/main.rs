mod api;
mod app;
mod event;
mod input;
mod storage;
mod ui;
mod util;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::api::ApiClient;
use crate::storage::{FileStore, LocalState};

/// Quizless Client - terminal client for quiz rounds with friends
#[derive(Parser, Debug)]
#[command(name = "quizless-client", version, about)]
struct Args {
    /// Base URL of the quiz API
    #[arg(short = 's', long, default_value = api::DEFAULT_BASE_URL)]
    server: String,

    /// Your name, remembered across runs
    #[arg(short, long)]
    name: Option<String>,

    /// Where to keep the remembered name and round state
    #[arg(long)]
    state_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizless_client=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let store = FileStore::new(
        args.state_file
            .unwrap_or_else(FileStore::default_path),
    );
    let mut local = LocalState::new(store);
    if let Some(name) = args.name {
        local.set_user_name(&name)?;
    }

    let api = ApiClient::new(args.server);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = app::run(&mut terminal, api, local).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}
