//! Framed TCP front end for the dispatch engine
//!
//! Every client gets its own task. Each decoded request envelope is answered
//! with exactly one response envelope on the same connection.

mod connection;
mod handler;

pub use connection::ClientSession;
pub use handler::RequestHandler;

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Accept clients until `shutdown` flips to true
pub async fn serve(
    listener: TcpListener,
    handler: Arc<RequestHandler>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!("[SERVER] Listening on {}", listener.local_addr()?);

    loop {
        tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => {
                info!("[SERVER] Shutdown requested, no longer accepting clients");
                break;
            }
            accepted = listener.accept() => {
                let (stream, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("[SERVER] Accept failed: {}", e);
                        continue;
                    }
                };
                info!("[SERVER] Connection from {}", addr);

                let handler = handler.clone();
                tokio::spawn(async move {
                    let session = ClientSession::new(stream, addr);
                    handle_client(session, handler).await;
                });
            }
        }
    }

    Ok(())
}

async fn handle_client(mut session: ClientSession, handler: Arc<RequestHandler>) {
    while let Some(envelope) = session.recv().await {
        let response = handler.handle(envelope).await;
        if let Err(e) = session.send(&response).await {
            error!("[SERVER] Write to {} failed: {}", session.addr, e);
            break;
        }
    }
    debug!("[SERVER] Client {} ({:?}) disconnected", session.addr, session.client_id);
}
