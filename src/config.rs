//! NNTP session configuration

use std::time::Duration;

/// Default port for plain connections
pub const DEFAULT_PORT: u16 = 119;
/// Default port for implicit TLS connections
pub const DEFAULT_TLS_PORT: u16 = 563;

/// Transport encryption requested at connect time
///
/// A plain session can still be upgraded later with STARTTLS
/// (see `NntpSession::upgrade_to_tls`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Encryption {
    /// Plain TCP
    #[default]
    None,
    /// Implicit TLS (TLS 1.2 or 1.3)
    Tls,
    /// Implicit TLS pinned to TLS 1.2, for servers that cannot negotiate 1.3
    LegacyTls,
}

impl Encryption {
    /// Whether the connection is encrypted from the first byte
    pub fn is_encrypted(self) -> bool {
        !matches!(self, Encryption::None)
    }

    /// Standard port for this mode
    pub fn default_port(self) -> u16 {
        if self.is_encrypted() {
            DEFAULT_TLS_PORT
        } else {
            DEFAULT_PORT
        }
    }
}

/// Tuning for the compressed (XZVER) body reader
///
/// Some servers send a bare deflate stream with no end marker, so the reader
/// polls until the accumulated bytes decompress. These values were tuned
/// empirically against such servers and are not guaranteed to be right for
/// all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressedReadConfig {
    /// How long one poll waits for data before counting as empty
    pub poll_interval: Duration,
    /// Number of empty polls after which decoding is abandoned
    pub max_empty_polls: u32,
    /// Sleep for `backoff` after every this many empty polls
    pub backoff_every: u32,
    /// Pause inserted every `backoff_every` empty polls
    pub backoff: Duration,
    /// Upper bound on accumulated compressed bytes
    pub max_block_size: usize,
}

impl Default for CompressedReadConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            max_empty_polls: 500,
            backoff_every: 50,
            backoff: Duration::from_millis(50),
            max_block_size: 64 * 1024 * 1024,
        }
    }
}

/// NNTP server configuration
///
/// Contains everything needed to open a session. Credentials are not part of
/// the configuration; pass them to `NntpSession::authenticate`.
///
/// # Example
///
/// ```
/// use nntp_engine::{Encryption, ServerConfig};
/// use std::time::Duration;
///
/// let config = ServerConfig::tls("news.example.com")
///     .with_idle_timeout(Duration::from_secs(60));
/// assert_eq!(config.port(), 563);
/// assert_eq!(config.encryption, Encryption::Tls);
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Server hostname (e.g., "news.example.com")
    pub host: String,

    /// Server port; `None` selects the default for `encryption`
    #[cfg_attr(feature = "serde", serde(default))]
    pub port: Option<u16>,

    /// Transport encryption used at connect time
    #[cfg_attr(feature = "serde", serde(default))]
    pub encryption: Encryption,

    /// Allow insecure TLS connections (self-signed or expired certificates)
    ///
    /// **Security Warning:** disables certificate validation for both
    /// implicit TLS and STARTTLS. Only use this for testing or with servers
    /// you trust on a secure network.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_insecure_tls: bool,

    /// Bound on TCP connect plus TLS handshake
    #[cfg_attr(feature = "serde", serde(default = "default_connect_timeout"))]
    pub connect_timeout: Duration,

    /// Bound on every individual read and write once connected
    #[cfg_attr(feature = "serde", serde(default = "default_idle_timeout"))]
    pub idle_timeout: Duration,

    /// Compressed body reader tuning
    #[cfg_attr(feature = "serde", serde(default))]
    pub compressed: CompressedReadConfig,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(240)
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, encryption: Encryption) -> Self {
        Self {
            host: host.into(),
            port: None,
            encryption,
            allow_insecure_tls: false,
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            compressed: CompressedReadConfig::default(),
        }
    }

    /// Plain connection on the standard port (119)
    ///
    /// **Warning:** Plain connections transmit credentials in clear text
    /// unless the session is upgraded with STARTTLS.
    pub fn plain(host: impl Into<String>) -> Self {
        Self::new(host, Encryption::None)
    }

    /// Implicit TLS on the standard secure port (563)
    pub fn tls(host: impl Into<String>) -> Self {
        Self::new(host, Encryption::Tls)
    }

    /// Implicit TLS 1.2 on the standard secure port (563)
    pub fn legacy_tls(host: impl Into<String>) -> Self {
        Self::new(host, Encryption::LegacyTls)
    }

    /// TLS configuration that accepts self-signed certificates
    ///
    /// **Security Warning:** This configuration disables certificate validation,
    /// making your connection vulnerable to man-in-the-middle attacks.
    pub fn tls_insecure(host: impl Into<String>) -> Self {
        let mut config = Self::tls(host);
        config.allow_insecure_tls = true;
        config
    }

    /// Override the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Override the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the idle timeout
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Override the compressed reader tuning
    pub fn with_compressed_reads(mut self, compressed: CompressedReadConfig) -> Self {
        self.compressed = compressed;
        self
    }

    /// Effective port
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.encryption.default_port())
    }
}
