//! Character-by-character reveal of a complete reply.

use std::time::Duration;

use tracing::debug;

/// Target of a reveal.
pub trait RevealSink {
    /// Returns false once the target message no longer exists.
    fn is_live(&self) -> bool;

    /// Receive the next, strictly longer, prefix of the text.
    fn emit(&mut self, partial: &str);
}

/// How a reveal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every prefix was emitted; the last one equals the full text.
    Completed { emitted: usize },
    /// The target disappeared; no further prefixes were emitted.
    Cancelled { emitted: usize },
}

/// Reveals text one character at a time with a fixed pause.
#[derive(Debug, Clone, Copy)]
pub struct StreamingEmitter {
    delay: Duration,
}

impl StreamingEmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Emit every char-boundary prefix of `full_text` into `sink`.
    ///
    /// Pauses for the configured delay between emissions. The sink is checked
    /// for liveness before each emission.
    pub async fn reveal<S>(&self, full_text: &str, sink: &mut S) -> RevealOutcome
    where
        S: RevealSink + ?Sized,
    {
        let mut emitted = 0;

        for (index, ch) in full_text.char_indices() {
            if emitted > 0 {
                self.pause().await;
            }

            if !sink.is_live() {
                debug!(emitted, "Reveal target removed, stopping");
                return RevealOutcome::Cancelled { emitted };
            }

            sink.emit(&full_text[..index + ch.len_utf8()]);
            emitted += 1;
        }

        RevealOutcome::Completed { emitted }
    }

    async fn pause(&self) {
        if self.delay.is_zero() {
            // Still give other tasks a turn between characters
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}
