//! Response sources for AITI Chat.
//!
//! A [`ResponseSource`] turns a persona and a prompt into the full text of an
//! assistant reply. Canned personas answer locally; the Ollama persona issues
//! a single non-streaming HTTP request.

pub mod canned;
pub mod error;
pub mod ollama;
pub mod router;
pub mod source;

pub use canned::CannedSource;
pub use error::GenerateError;
pub use ollama::OllamaClient;
pub use router::ModelRouter;
pub use source::ResponseSource;
