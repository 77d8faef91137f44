// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transports that carry move requests to the AI service

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::error::BridgeError;
use crate::protocol::{decode_line, encode_line, MoveRequest, MoveResponse};

/// Common interface for AI service transports
#[async_trait]
pub trait AiTransport: Send + Sync {
    /// Human-readable peer description for logs
    fn describe(&self) -> String;

    /// Establish the connection
    async fn connect(&mut self) -> Result<(), BridgeError>;

    /// Send one request and wait for the matching response
    async fn request(&mut self, request: MoveRequest) -> Result<MoveResponse, BridgeError>;

    /// Tear the connection down. Never fails.
    async fn close(&mut self);

    fn is_connected(&self) -> bool;
}

/// Newline-delimited JSON over TCP
pub struct TcpTransport {
    addr: String,
    stream: Option<(BufReader<OwnedReadHalf>, OwnedWriteHalf)>,
    /// Bytes of a line not yet terminated; survives a cancelled request
    pending: Vec<u8>,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            stream: None,
            pending: Vec::new(),
        }
    }
}

#[async_trait]
impl AiTransport for TcpTransport {
    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }

    async fn connect(&mut self) -> Result<(), BridgeError> {
        let stream = TcpStream::connect(&self.addr).await?;
        stream.set_nodelay(true)?;
        let (read, write) = stream.into_split();
        self.stream = Some((BufReader::new(read), write));
        self.pending.clear();
        tracing::info!("Connected to AI service at {}", self.addr);
        Ok(())
    }

    async fn request(&mut self, request: MoveRequest) -> Result<MoveResponse, BridgeError> {
        let Some((reader, writer)) = self.stream.as_mut() else {
            return Err(BridgeError::NotConnected);
        };

        writer.write_all(encode_line(&request)?.as_bytes()).await?;
        writer.flush().await?;

        loop {
            // `read_until` keeps partial input in `pending` if this future is dropped
            if reader.read_until(b'\n', &mut self.pending).await? == 0 {
                tracing::warn!("AI service at {} closed the connection", self.addr);
                self.stream = None;
                self.pending.clear();
                return Err(BridgeError::Closed);
            }
            if self.pending.last() != Some(&b'\n') {
                continue;
            }

            let bytes = std::mem::take(&mut self.pending);
            let line = String::from_utf8(bytes).map_err(|e| BridgeError::Protocol(e.to_string()))?;
            let response: MoveResponse = decode_line(&line)?;
            if response.request_id == request.request_id {
                return Ok(response);
            }
            // Answer to a request we already gave up on
            tracing::debug!("Skipping response to {}", response.request_id);
        }
    }

    async fn close(&mut self) {
        self.pending.clear();
        if let Some((_, mut writer)) = self.stream.take() {
            if let Err(e) = writer.shutdown().await {
                tracing::debug!("Shutdown of {} failed: {}", self.addr, e);
            }
            tracing::info!("Closed connection to {}", self.addr);
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
