//! State changes read from an async line source, one JSON object per line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use routines_domain::state::StateChange;

/// Forward every well-formed line of `reader` to `changes`.
///
/// Malformed lines are logged and skipped. Returns at end of input or once
/// the receiving side is gone.
pub async fn forward_state_changes<R>(reader: R, changes: mpsc::Sender<StateChange>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::error!(error = %error, "failed to read state change input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StateChange>(&line) {
            Ok(change) => {
                if changes.send(change).await.is_err() {
                    break;
                }
            }
            Err(error) => tracing::warn!(line = %line, error = %error, "skipping malformed state change"),
        }
    }
    tracing::debug!("state change input closed");
}
