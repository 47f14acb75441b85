use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Consecutive read failures tolerated before the input is treated as gone.
const MAX_CONSECUTIVE_READ_ERRORS: usize = 8;

/// Forwards newline-delimited command lines from `reader` as raw bytes.
///
/// Lines are not decoded here, so a line that is not valid UTF-8 still
/// reaches the dispatcher and gets an error reply. Blank lines are skipped and
/// line terminators stripped. Returns at end of input or once the receiver
/// is dropped.
pub async fn forward_command_lines<R>(mut reader: R, lines: mpsc::Sender<Vec<u8>>)
where
    R: AsyncBufRead + Unpin,
{
    let mut failures = 0;
    loop {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                failures = 0;
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                if buf.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                if lines.send(buf).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(error = %e, failures, "failed to read command input");
                if failures >= MAX_CONSECUTIVE_READ_ERRORS {
                    tracing::error!("giving up on command input after repeated read errors");
                    break;
                }
            }
        }
    }
}
