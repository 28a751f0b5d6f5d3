//! Scripted supplier server on a loopback listener.
//!
//! The server accepts a single connection, reads the client's exchange up to
//! its close request and then behaves according to [`SupplierMode`].

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, TcpListener as StdTcpListener},
};

use bytes::Bytes;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

const CLOSE_REQUEST: &[u8] = b"0199\r\n";

/// Create a TCP listener bound to a free local port.
///
/// # Errors
///
/// Returns any IO error encountered while binding to an ephemeral localhost
/// port.
pub fn unused_listener() -> io::Result<StdTcpListener> {
    StdTcpListener::bind(SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0))
}

/// How the scripted supplier answers.
#[derive(Debug, Clone)]
pub enum SupplierMode {
    /// Write the reply then shut the connection down.
    Reply(Bytes),
    /// Write the reply but keep the connection open until the client leaves.
    ReplyAndLinger(Bytes),
    /// Never answer; hold the connection until the client leaves.
    Silent,
    /// Close without answering.
    Hangup,
}

/// Handle to a running scripted supplier.
#[derive(Debug)]
pub struct MockSupplier {
    addr: SocketAddr,
    handle: JoinHandle<io::Result<Vec<u8>>>,
}

impl MockSupplier {
    /// Address the supplier listens on.
    #[must_use]
    pub fn addr(&self) -> SocketAddr { self.addr }

    /// Port the supplier listens on.
    #[must_use]
    pub fn port(&self) -> u16 { self.addr.port() }

    /// Wait for the supplier to finish and return the bytes it received.
    ///
    /// # Errors
    ///
    /// Returns the supplier's IO error, or an error if its task panicked.
    pub async fn received(self) -> io::Result<Vec<u8>> {
        self.handle.await.map_err(io::Error::other)?
    }
}

/// Spawn a supplier serving one connection according to `mode`.
///
/// # Errors
///
/// Returns any IO error raised while binding the listener.
pub async fn spawn_supplier(mode: SupplierMode) -> io::Result<MockSupplier> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await?;
        serve(stream, mode).await
    });
    Ok(MockSupplier { addr, handle })
}

async fn serve(mut stream: TcpStream, mode: SupplierMode) -> io::Result<Vec<u8>> {
    let mut received = Vec::new();
    let mut buf = [0_u8; 512];
    while !received.ends_with(CLOSE_REQUEST) {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(received);
        }
        received.extend_from_slice(&buf[..n]);
    }
    tracing::debug!(bytes = received.len(), "supplier received exchange");

    match mode {
        SupplierMode::Reply(reply) => {
            stream.write_all(&reply).await?;
            stream.shutdown().await?;
        }
        SupplierMode::ReplyAndLinger(reply) => {
            stream.write_all(&reply).await?;
            drain(&mut stream).await?;
        }
        SupplierMode::Silent => drain(&mut stream).await?,
        SupplierMode::Hangup => stream.shutdown().await?,
    }
    Ok(received)
}

async fn drain(stream: &mut TcpStream) -> io::Result<()> {
    let mut sink = Vec::new();
    match stream.read_to_end(&mut sink).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::ConnectionReset => Ok(()),
        Err(e) => Err(e),
    }
}
