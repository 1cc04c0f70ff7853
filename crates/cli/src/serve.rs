use crate::bridge::Bridge;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

/// Answers newline-delimited JSON requests until the input closes. One
/// response line per request, in request order.
pub async fn serve<R, W>(bridge: &Bridge, input: R, mut output: W) -> Result<usize>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut handled = 0usize;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = bridge.handle_json(&line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
        handled += 1;
    }
    info!(handled, "bridge input closed");
    Ok(handled)
}
