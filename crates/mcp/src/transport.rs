//! Line-oriented message channels: stdio for clients, in-memory pairs for tests.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::error::McpError;

/// One JSON message per line in each direction.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Next non-blank line, or `None` once the peer has gone away.
    async fn receive(&mut self) -> Result<Option<String>, McpError>;

    async fn send(&mut self, message: &str) -> Result<(), McpError>;
}

/// stdin/stdout. Nothing else may print to stdout while this is in use.
pub struct StdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl McpTransport for StdioTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Two connected ends backed by `mpsc` channels.
pub struct ChannelTransport {
    rx: mpsc::Receiver<String>,
    tx: mpsc::Sender<String>,
}

impl ChannelTransport {
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_b) = mpsc::channel(32);
        let (tx_b, rx_a) = mpsc::channel(32);
        (
            Self { rx: rx_a, tx: tx_a },
            Self { rx: rx_b, tx: tx_b },
        )
    }
}

#[async_trait]
impl McpTransport for ChannelTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.rx.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.tx.send(message.to_string()).await.map_err(|e| {
            McpError::Transport(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e))
        })?;
        Ok(())
    }
}
