//! Background loop that applies UI commands to the session.

use aiti_session::{SendOutcome, SessionEvent, SessionManager};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{BackendCommand, UiEvent};

/// Run the backend loop.
///
/// Runs on a current-thread runtime, so sends, reveals and history commands
/// interleave cooperatively. Session notices are forwarded to the UI. The
/// Ollama server is checked whenever the Ollama persona is picked.
pub async fn run_backend(
    session: SessionManager,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<BackendCommand>,
) {
    let mut events = session.subscribe();

    if session.selected_model().is_remote() {
        spawn_ollama_check(&session);
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(SessionEvent::Notice(notice)) => {
                        let _ = ui_tx.send(UiEvent::Notice(notice)).await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Session events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    info!("UI channel closed, shutting down backend");
                    break;
                };
                match cmd {
                    BackendCommand::Quit => {
                        info!("Received quit command, shutting down backend");
                        break;
                    }
                    BackendCommand::Send(content) => {
                        let session = session.clone();
                        tokio::spawn(async move {
                            match session.send_message(&content).await {
                                SendOutcome::Ignored(reason) => debug!(?reason, "Send ignored"),
                                outcome => debug!(?outcome, "Send finished"),
                            }
                        });
                    }
                    BackendCommand::NewChat => session.clear_chat(),
                    BackendCommand::Select(id) => {
                        if let Err(e) = session.select_conversation(&id) {
                            warn!(error = %e, "Select failed");
                        }
                    }
                    BackendCommand::Delete(id) => {
                        if let Err(e) = session.delete_conversation(&id) {
                            warn!(error = %e, "Delete failed");
                        }
                    }
                    BackendCommand::ClearAll => session.clear_all_history(),
                    BackendCommand::Share(id) => {
                        // Failures are reported through a session notice
                        let _ = session.share_conversation(&id);
                    }
                    BackendCommand::SetModel(model) => {
                        session.set_selected_model(model);
                        if model.is_remote() {
                            spawn_ollama_check(&session);
                        }
                    }
                }
            }
        }
    }

    info!("Backend shutdown complete");
}

/// Check the Ollama server in the background; the result arrives as a notice.
fn spawn_ollama_check(session: &SessionManager) {
    let session = session.clone();
    tokio::spawn(async move {
        let healthy = session.check_ollama().await;
        debug!(healthy, "Ollama check finished");
    });
}
