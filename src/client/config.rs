//! Connection settings for a supplier.

use std::{io, time::Duration};

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpSocket;

use crate::session::Credentials;

/// Timeout applied to connect, send and receive when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest reply buffered before reading stops.
pub const DEFAULT_MAX_REPLY_LENGTH: usize = 1024 * 1024;

/// Socket options applied before connecting.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fedicom::client::SocketOptions;
///
/// let options = SocketOptions::default()
///     .nodelay(true)
///     .keepalive(Some(Duration::from_secs(30)));
/// let expected = SocketOptions::default()
///     .nodelay(true)
///     .keepalive(Some(Duration::from_secs(30)));
/// assert_eq!(options, expected);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SocketOptions {
    nodelay: Option<bool>,
    keepalive: Option<KeepAliveSetting>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeepAliveSetting {
    Disabled,
    Duration(Duration),
}

impl KeepAliveSetting {
    const fn to_option(self) -> Option<Duration> {
        match self {
            Self::Disabled => None,
            Self::Duration(value) => Some(value),
        }
    }
}

impl SocketOptions {
    /// Configure `TCP_NODELAY` behaviour on the socket.
    #[must_use]
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.nodelay = Some(enabled);
        self
    }

    /// Configure `SO_KEEPALIVE` behaviour on the socket. `None` disables
    /// keepalive probes.
    #[must_use]
    pub fn keepalive(mut self, duration: Option<Duration>) -> Self {
        self.keepalive = Some(match duration {
            Some(value) => KeepAliveSetting::Duration(value),
            None => KeepAliveSetting::Disabled,
        });
        self
    }

    pub(crate) fn apply(&self, socket: &TcpSocket) -> io::Result<()> {
        if let Some(enabled) = self.nodelay {
            socket.set_nodelay(enabled)?;
        }
        if let Some(keepalive) = self.keepalive {
            match keepalive.to_option() {
                Some(duration) => {
                    socket.set_keepalive(true)?;
                    let sock_ref = SockRef::from(socket);
                    let config = TcpKeepalive::new().with_time(duration);
                    sock_ref.set_tcp_keepalive(&config)?;
                }
                None => socket.set_keepalive(false)?,
            }
        }
        Ok(())
    }
}

/// Everything needed to reach one supplier.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fedicom::{client::PartyProfile, session::Credentials};
///
/// let credentials = Credentials::new("FARMA01", "secret").expect("valid credentials");
/// let profile = PartyProfile::new("orders.example.com", 1001, credentials)
///     .party_code("SUP-7")
///     .timeout(Duration::from_secs(10));
/// assert_eq!(profile.timeout_value(), Duration::from_secs(10));
/// ```
#[derive(Clone, Debug)]
pub struct PartyProfile {
    host: String,
    port: u16,
    credentials: Credentials,
    party_code: Option<String>,
    timeout: Duration,
    socket_options: SocketOptions,
    max_reply_length: usize,
}

impl PartyProfile {
    /// Create a profile with the default timeout and socket options.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
            party_code: None,
            timeout: DEFAULT_TIMEOUT,
            socket_options: SocketOptions::default(),
            max_reply_length: DEFAULT_MAX_REPLY_LENGTH,
        }
    }

    /// Create a profile only when the party has an endpoint configured.
    ///
    /// Returns `None` for a missing or blank host or a missing or zero port;
    /// such a party has no order-entry server and is skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use fedicom::{client::PartyProfile, session::Credentials};
    ///
    /// let credentials = Credentials::new("FARMA01", "secret").expect("valid credentials");
    /// assert!(PartyProfile::configured(None, Some(1001), credentials).is_none());
    /// ```
    #[must_use]
    pub fn configured(
        host: Option<&str>,
        port: Option<u16>,
        credentials: Credentials,
    ) -> Option<Self> {
        let host = host.map(str::trim).filter(|h| !h.is_empty())?;
        let port = port.filter(|&p| p != 0)?;
        Some(Self::new(host, port, credentials))
    }

    /// Identify the supplier in logs.
    #[must_use]
    pub fn party_code(mut self, code: impl Into<String>) -> Self {
        self.party_code = Some(code.into());
        self
    }

    /// Set the timeout applied to each transport step. Zero selects
    /// [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
        self
    }

    /// Set socket options applied before connecting.
    #[must_use]
    pub fn socket_options(mut self, options: SocketOptions) -> Self {
        self.socket_options = options;
        self
    }

    /// Cap the number of reply bytes buffered.
    #[must_use]
    pub fn max_reply_length(mut self, length: usize) -> Self {
        self.max_reply_length = length;
        self
    }

    /// Supplier host name or address.
    #[must_use]
    pub fn host(&self) -> &str { &self.host }

    /// Supplier port.
    #[must_use]
    pub fn port(&self) -> u16 { self.port }

    /// Protocol credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials { &self.credentials }

    /// Supplier code used in logs, if set.
    #[must_use]
    pub fn party(&self) -> Option<&str> { self.party_code.as_deref() }

    /// Timeout applied to each transport step.
    #[must_use]
    pub fn timeout_value(&self) -> Duration { self.timeout }

    /// Socket options applied before connecting.
    #[must_use]
    pub fn socket_options_value(&self) -> SocketOptions { self.socket_options }

    /// Maximum reply length.
    #[must_use]
    pub fn max_reply_length_value(&self) -> usize { self.max_reply_length }
}
