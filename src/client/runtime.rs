//! Fedicom client runtime implementation.

use std::{fmt, future::Future, time::Duration};

use bytes::Bytes;
use futures::StreamExt;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::{TcpSocket, TcpStream, lookup_host},
};
use tokio_util::codec::FramedRead;
use tracing::Instrument;

use super::{PartyProfile, tracing_helpers};
use crate::{
    codec::{CRLF, CodecError, LineCodec, is_terminal_line},
    error::{FedicomError, Result, TransportOp},
    hooks::{SessionObserver, TracingObserver},
    order::OrderRequest,
    reconcile::Reconciliation,
    session::Session,
};

/// Trait alias for stream types that can be used with the client runtime.
pub trait ClientStream: AsyncRead + AsyncWrite + Unpin {}
impl<T> ClientStream for T where T: AsyncRead + AsyncWrite + Unpin {}

async fn within<F, T>(operation: TransportOp, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(FedicomError::connection(operation, e)),
        Err(_) => Err(FedicomError::timed_out(operation, timeout)),
    }
}

/// Client for one supplier connection.
///
/// A connection carries exactly one order: the client writes the whole
/// exchange, reads the supplier's reply and folds it through a fresh
/// [`Session`].
///
/// # Examples
///
/// ```no_run
/// use fedicom::{
///     client::{FedicomClient, PartyProfile},
///     frame::Order,
///     order::OrderRequest,
///     session::Credentials,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("FARMA01", "secret")?;
/// let profile = PartyProfile::new("127.0.0.1", 1001, credentials);
/// let order = OrderRequest::builder("PO-17", Order::new("CUST0001", 1)?)
///     .article("8470001234", 7)?
///     .build()?;
/// let mut client = FedicomClient::connect(&profile).await?;
/// let reconciliation = client.submit(&order).await?;
/// client.close().await?;
/// # let _ = reconciliation;
/// # Ok(())
/// # }
/// ```
pub struct FedicomClient<T = TcpStream>
where
    T: ClientStream,
{
    stream: T,
    profile: PartyProfile,
}

impl<T> fmt::Debug for FedicomClient<T>
where
    T: ClientStream,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FedicomClient")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl FedicomClient<TcpStream> {
    /// Resolve the supplier host and open a TCP connection.
    ///
    /// # Errors
    ///
    /// Returns [`FedicomError::ConnectionFailed`] when resolution, socket
    /// configuration or the connection attempt fails or times out.
    pub async fn connect(profile: &PartyProfile) -> Result<Self> {
        let span = tracing_helpers::connect_span(profile);
        async {
            let timeout = profile.timeout_value();
            let addr = within(
                TransportOp::Resolve,
                timeout,
                lookup_host((profile.host(), profile.port())),
            )
            .await?
            .next()
            .ok_or_else(|| {
                FedicomError::connection(
                    TransportOp::Resolve,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "host has no addresses"),
                )
            })?;
            let socket = if addr.is_ipv4() {
                TcpSocket::new_v4()
            } else {
                TcpSocket::new_v6()
            }
            .map_err(|e| FedicomError::connection(TransportOp::Connect, e))?;
            profile
                .socket_options_value()
                .apply(&socket)
                .map_err(|e| FedicomError::connection(TransportOp::Connect, e))?;
            let stream = within(TransportOp::Connect, timeout, socket.connect(addr)).await?;
            tracing::debug!(peer.addr = %addr, "connected");
            Ok(Self::from_stream(stream, profile.clone()))
        }
        .instrument(span)
        .await
    }
}

impl<T> FedicomClient<T>
where
    T: ClientStream,
{
    /// Wrap an already connected stream.
    #[must_use]
    pub fn from_stream(stream: T, profile: PartyProfile) -> Self { Self { stream, profile } }

    /// Profile the client was created with.
    #[must_use]
    pub fn profile(&self) -> &PartyProfile { &self.profile }

    /// Write `bytes` and flush.
    ///
    /// # Errors
    ///
    /// Returns [`FedicomError::ConnectionFailed`] on I/O failure or timeout.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let timeout = self.profile.timeout_value();
        let stream = &mut self.stream;
        within(TransportOp::Send, timeout, async move {
            stream.write_all(bytes).await?;
            stream.flush().await
        })
        .instrument(tracing_helpers::send_span(bytes.len()))
        .await
    }

    /// Read the supplier's reply as complete lines, terminators removed.
    ///
    /// Reading stops when the peer closes the connection, when a terminating
    /// close or rejection line has arrived, or when the configured maximum
    /// reply length is reached. An unterminated tail left at end of stream is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`FedicomError::ConnectionFailed`] on I/O failure or timeout,
    /// and [`FedicomError::Codec`] when a line exceeds the codec's maximum
    /// length.
    pub async fn receive(&mut self) -> Result<Vec<Bytes>> {
        let timeout = self.profile.timeout_value();
        let max = self.profile.max_reply_length_value();
        let mut framed = FramedRead::new(&mut self.stream, LineCodec::default());
        let span = tracing_helpers::receive_span();
        let read = async {
            let mut lines = Vec::new();
            let mut total = 0_usize;
            while let Some(line) = framed.next().await {
                let line = line?;
                total += line.len() + CRLF.len();
                let terminal = is_terminal_line(&line);
                lines.push(line);
                if terminal {
                    break;
                }
                if total >= max {
                    tracing::warn!(bytes = total, max, "reply reached maximum length");
                    break;
                }
            }
            Ok::<_, CodecError>((lines, total))
        };
        let (lines, total) = match tokio::time::timeout(timeout, read.instrument(span.clone())).await {
            Ok(Ok(read)) => read,
            Ok(Err(CodecError::Io(e))) => {
                return Err(FedicomError::connection(TransportOp::Receive, e));
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(FedicomError::timed_out(TransportOp::Receive, timeout)),
        };
        span.record("frame.bytes", total);
        Ok(lines)
    }

    /// Submit `order` and reconcile it against the supplier's reply.
    ///
    /// Returns `None` when the supplier reported no incidences.
    ///
    /// # Errors
    ///
    /// Returns [`FedicomError`] for transport failures, malformed or
    /// out-of-sequence replies and quantity rejections. No reconciliation is
    /// produced in any of these cases.
    pub async fn submit(&mut self, order: &OrderRequest) -> Result<Option<Reconciliation>> {
        self.submit_observed(order, TracingObserver).await
    }

    /// As [`FedicomClient::submit`], reporting session events to `observer`.
    ///
    /// # Errors
    ///
    /// See [`FedicomClient::submit`].
    pub async fn submit_observed<O: SessionObserver>(
        &mut self,
        order: &OrderRequest,
        observer: O,
    ) -> Result<Option<Reconciliation>> {
        let result = self.exchange(order, observer).await;
        if let Err(e) = &result {
            tracing::warn!(
                reference = order.reference(),
                party = self.profile.party().unwrap_or("-"),
                error = %e,
                error_type = e.error_type(),
                "order submission failed"
            );
        }
        result
    }

    async fn exchange<O: SessionObserver>(
        &mut self,
        order: &OrderRequest,
        observer: O,
    ) -> Result<Option<Reconciliation>> {
        let mut session = Session::with_observer(self.profile.credentials().clone(), observer);
        let outbound = session.encode_order(order, chrono::Local::now().naive_local())?;
        self.send(&outbound).await?;
        let lines = self.receive().await?;
        let report = session.receive_lines(lines)?;
        Ok(report.reconcile(order))
    }

    /// Shut the connection down.
    ///
    /// # Errors
    ///
    /// Returns [`FedicomError::ConnectionFailed`] when shutdown fails or
    /// times out.
    pub async fn close(mut self) -> Result<()> {
        let timeout = self.profile.timeout_value();
        within(TransportOp::Close, timeout, self.stream.shutdown()).await
    }
}

/// Connect to the supplier in `profile`, submit `order` and close.
///
/// A failure to shut the connection down after a completed exchange is
/// logged and does not discard the reconciliation.
///
/// # Errors
///
/// See [`FedicomClient::connect`] and [`FedicomClient::submit`].
pub async fn submit_order(
    profile: &PartyProfile,
    order: &OrderRequest,
) -> Result<Option<Reconciliation>> {
    let mut client = FedicomClient::connect(profile).await?;
    let result = client.submit(order).await;
    if let Err(e) = client.close().await {
        tracing::debug!(error = %e, "closing supplier connection failed");
    }
    result
}
