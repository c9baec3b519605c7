//! Individual client session handling

use anyhow::Result;
use fleet_shared::{
    codec::{self, FrameDecoder},
    Envelope,
};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tracing::warn;

/// One connected operator client
pub struct ClientSession {
    pub addr: SocketAddr,
    pub client_id: String,
    reader: ReadHalf<TcpStream>,
    writer: WriteHalf<TcpStream>,
    decoder: FrameDecoder,
}

impl ClientSession {
    pub fn new(stream: TcpStream, addr: SocketAddr) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            addr,
            client_id: String::new(), // Set from the first header
            reader,
            writer,
            decoder: FrameDecoder::new(),
        }
    }

    /// Read the next envelope from this session
    /// Returns None once the connection is closed or the stream is corrupt
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            match self.decoder.decode_next() {
                Ok(Some(envelope)) => {
                    if self.client_id.is_empty() {
                        if let Some(ref header) = envelope.header {
                            self.client_id = header.client_id.clone();
                        }
                    }
                    return Some(envelope);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("[SERVER] Decode error from {}: {}", self.addr, e);
                    return None;
                }
            }

            match self.reader.read_buf(self.decoder.buffer_mut()).await {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!("[SERVER] Read error from {}: {}", self.addr, e);
                    return None;
                }
            }
        }
    }

    pub async fn send(&mut self, envelope: &Envelope) -> Result<()> {
        let encoded = codec::encode(envelope)?;
        self.writer.write_all(&encoded).await?;
        Ok(())
    }
}
