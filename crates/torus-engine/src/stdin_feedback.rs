//! Reads user feedback lines from stdin.
//!
//! Stdin is read on a dedicated OS thread rather than a tokio task: a
//! blocking read cannot be cancelled, and a detached thread does not hold
//! up runtime shutdown. Each line is forwarded verbatim over an unbounded
//! channel that the tick loop drains through
//! [`ChannelFeedbackSource`](torus_core::feedback::ChannelFeedbackSource).

use std::io::BufRead;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Start the stdin reader thread and return the receiving end.
///
/// If the thread cannot be spawned the sender is dropped, so the returned
/// receiver reports a closed channel on first drain.
pub fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name("feedback-stdin".to_owned())
        .spawn(move || forward_lines(std::io::stdin().lock(), &tx));
    if let Err(e) = spawned {
        warn!(error = %e, "failed to spawn stdin feedback reader, feedback disabled");
    }
    rx
}

/// Forward every line from `reader` to `tx` until EOF, a read error, or the
/// receiver going away. Returns the number of lines forwarded.
fn forward_lines(reader: impl BufRead, tx: &UnboundedSender<String>) -> usize {
    let mut forwarded: usize = 0;
    for line in reader.lines() {
        match line {
            Ok(text) => {
                if tx.send(text).is_err() {
                    debug!("feedback receiver dropped, stopping stdin reader");
                    break;
                }
                forwarded = forwarded.saturating_add(1);
            }
            Err(e) => {
                warn!(error = %e, "failed to read feedback from stdin");
                break;
            }
        }
    }
    debug!(forwarded, "stdin feedback reader finished");
    forwarded
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn forwards_lines_verbatim() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input = Cursor::new("great run\n\n  spaced out  \r\nlast");
        let forwarded = forward_lines(input, &tx);

        assert_eq!(forwarded, 4);
        assert_eq!(rx.try_recv().unwrap(), "great run");
        assert_eq!(rx.try_recv().unwrap(), "");
        assert_eq!(rx.try_recv().unwrap(), "  spaced out  ");
        assert_eq!(rx.try_recv().unwrap(), "last");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let forwarded = forward_lines(Cursor::new("a\nb\nc\n"), &tx);
        assert_eq!(forwarded, 0);
    }
}
