//! AITI Chat terminal client.
//!
//! Chat with the AITI personas or a local Ollama model from the terminal.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use aiti_client::ModelRouter;
use aiti_core::{ModelTag, OllamaConfig, SessionConfig};
use aiti_session::{SessionManager, SystemClipboard};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod backend;
mod event;
mod render;
mod state;
mod theme;
mod utils;
mod widgets;

use app::App;
use event::{BackendCommand, UiEvent};

#[derive(Parser)]
#[command(name = "aiti")]
#[command(about = "AITI Chat terminal client")]
#[command(version)]
struct Cli {
    /// Persona to start with (aiti, aiti-pro, ollama)
    #[arg(short, long, default_value = "aiti")]
    model: ModelTag,

    /// Ollama server base URL
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Model name sent to Ollama
    #[arg(long, default_value = "llama3")]
    ollama_model: String,

    /// Number of prior messages kept as context (1-10)
    #[arg(short, long, default_value = "5")]
    chain_length: u8,

    /// Timeout for Ollama requests in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Override the per-persona delay between revealed characters
    #[arg(long)]
    reveal_delay_ms: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/aiti-tui.log")]
    log_file: String,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            selected_model: self.model,
            chain_length: self.chain_length,
            ollama: OllamaConfig {
                base_url: self.ollama_url.clone(),
                model: self.ollama_model.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
            },
            reveal_delay: self.reveal_delay_ms.map(Duration::from_millis),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Write logs to a file to avoid terminal interference
    if let Ok(file) = std::fs::File::create(&cli.log_file) {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "aiti=debug,aiti_session=debug,aiti_client=debug".into()),
            )
            .with_ansi(false)
            .init();
    }

    let session = SessionManager::new(
        cli.session_config(),
        Arc::new(ModelRouter::new()),
        Arc::new(SystemClipboard),
    )?;
    info!(model = %cli.model, ollama_url = %cli.ollama_url, "Starting AITI Chat");

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    // All session mutations run on one cooperative runtime in the background thread
    let backend_session = session.clone();
    let bg_handle = std::thread::spawn(move || -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(backend::run_backend(backend_session, ui_tx, cmd_rx));
        Ok(())
    });

    // Initialize terminal (enters alternate screen, enables raw mode)
    let terminal = ratatui::init();

    let mut app = App::new(session, ui_rx, cmd_tx);
    let result = app.run(terminal);

    // Restore terminal (exits alternate screen, disables raw mode)
    ratatui::restore();

    match bg_handle.join() {
        Ok(Err(e)) => tracing::error!(error = %e, "Backend runtime failed"),
        Err(_) => tracing::error!("Backend thread panicked"),
        Ok(Ok(())) => {}
    }

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}
