//! Connection management for the NNTP session
//!
//! This module handles TCP/TLS connection establishment, socket tuning,
//! server greeting validation, STARTTLS upgrades and teardown.

use crate::commands::{Command, catalog};
use crate::config::{Encryption, ServerConfig};
use crate::error::{NntpError, Result};
use crate::response::codes;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::{debug, info, warn};

use super::state::SessionState;
use super::{NntpIo, NntpSession};

/// BufReader capacity for article downloads (64KB)
const BUFREADER_CAPACITY: usize = 64 * 1024;

/// Socket receive buffer requested for large overview and article reads
const RECV_BUFFER_SIZE: usize = 1024 * 1024;

/// Dangerous certificate verifier that accepts all certificates
///
/// **Security Warning:** This verifier disables all certificate validation,
/// making connections vulnerable to man-in-the-middle attacks. Only use this
/// for testing or with servers you trust on a secure network.
#[derive(Debug)]
pub(super) struct DangerousAcceptAnyCertificate;

impl ServerCertVerifier for DangerousAcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

/// Build the rustls client configuration for `encryption`
///
/// `Encryption::LegacyTls` pins the protocol to TLS 1.2; every other mode
/// (including STARTTLS on a plain session) negotiates 1.2 or 1.3.
pub(super) fn tls_client_config(encryption: Encryption, allow_insecure: bool) -> ClientConfig {
    use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
    let _ = CryptoProvider::install_default(ring::default_provider());

    let builder = match encryption {
        Encryption::LegacyTls => {
            ClientConfig::builder_with_protocol_versions(&[&tokio_rustls::rustls::version::TLS12])
        }
        Encryption::None | Encryption::Tls => ClientConfig::builder(),
    };

    if allow_insecure {
        warn!("TLS certificate validation disabled - connection vulnerable to MITM attacks");
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousAcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }
}

/// Open a tuned TCP connection within the connect timeout
async fn open_tcp(config: &ServerConfig) -> Result<TcpStream> {
    let addr = format!("{}:{}", config.host, config.port());

    let socket_addr = tokio::net::lookup_host(addr.as_str())
        .await
        .map_err(|e| {
            NntpError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Failed to resolve address: {}", e),
            ))
        })?
        .next()
        .ok_or_else(|| {
            NntpError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "No address resolved",
            ))
        })?;

    use socket2::{Domain, Protocol, Socket, Type};
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(NntpError::Io)?;

    // Request/response protocol: small commands must leave immediately
    socket.set_nodelay(true).map_err(NntpError::Io)?;

    if let Err(e) = socket.set_keepalive(true) {
        warn!("Failed to enable TCP keepalive: {}", e);
    }

    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_SIZE) {
        warn!(
            "Failed to set receive buffer size to {} bytes: {}",
            RECV_BUFFER_SIZE, e
        );
    } else {
        match socket.recv_buffer_size() {
            Ok(actual_size) => debug!(
                "TCP receive buffer: requested {} bytes, actual {} bytes",
                RECV_BUFFER_SIZE, actual_size
            ),
            Err(e) => warn!("Failed to query receive buffer size: {}", e),
        }
    }

    // socket2 connect is blocking; connect before switching to non-blocking
    let tcp_stream = timeout(
        config.connect_timeout,
        tokio::task::spawn_blocking(move || -> std::io::Result<std::net::TcpStream> {
            socket.connect(&socket_addr.into())?;
            socket.set_nonblocking(true)?;
            Ok(socket.into())
        }),
    )
    .await
    .map_err(|_| NntpError::Timeout)?
    .map_err(|e| NntpError::Io(std::io::Error::other(format!("Task join error: {}", e))))?
    .map_err(NntpError::Io)?;

    TcpStream::from_std(tcp_stream).map_err(NntpError::Io)
}

impl NntpSession {
    /// Create a session and connect it
    ///
    /// Returns the connected session; [`posting_allowed`](Self::posting_allowed)
    /// reflects the greeting.
    pub async fn open(config: ServerConfig) -> Result<Self> {
        let mut session = Self::new(config);
        session.connect().await?;
        Ok(session)
    }

    /// Connect to the configured server and read its greeting
    ///
    /// Returns whether posting is allowed (greeting 200 vs 201).
    /// Does not authenticate - call [`authenticate`](Self::authenticate) after connecting.
    ///
    /// # Errors
    ///
    /// - [`NntpError::AlreadyConnected`] - a stream is already open
    /// - [`NntpError::Io`] - TCP connection fails (DNS resolution, network unreachable, etc.)
    /// - [`NntpError::Tls`] - TLS handshake fails (invalid certificate, protocol error)
    /// - [`NntpError::Timeout`] - connect, handshake or greeting times out
    /// - [`NntpError::UnexpectedResponse`] - greeting is neither 200 nor 201
    pub async fn connect(&mut self) -> Result<bool> {
        if self.stream.is_some() {
            return Err(NntpError::AlreadyConnected);
        }
        debug!(
            "Connecting to NNTP server {}:{} ({:?})",
            self.config.host,
            self.config.port(),
            self.config.encryption
        );
        let tcp_stream = open_tcp(&self.config).await?;
        self.connect_stream(tcp_stream).await
    }

    /// Run the session over an already established transport
    ///
    /// The configured encryption is still applied: with `Tls` or `LegacyTls`
    /// the handshake runs over `stream` before the greeting is read.
    pub async fn connect_stream<S: NntpIo + 'static>(&mut self, stream: S) -> Result<bool> {
        if self.stream.is_some() {
            return Err(NntpError::AlreadyConnected);
        }

        let stream: Box<dyn NntpIo> = Box::new(stream);
        let (stream, encrypted) = if self.config.encryption.is_encrypted() {
            (self.tls_handshake(stream, self.config.encryption).await?, true)
        } else {
            (stream, false)
        };

        self.stream = Some(BufReader::with_capacity(BUFREADER_CAPACITY, stream));
        self.encrypted = encrypted;
        self.read_greeting().await
    }

    /// Read and check the server greeting
    async fn read_greeting(&mut self) -> Result<bool> {
        self.state = SessionState::InFlight(catalog::GREETING.name);

        let greeting = match self.read_status().await {
            Ok(status) => status,
            Err(e) => {
                self.teardown();
                return Err(e);
            }
        };
        debug!("Server greeting: {} {}", greeting.code, greeting.message);

        if catalog::GREETING.outcome(greeting.code).is_none() {
            self.teardown();
            return Err(NntpError::UnexpectedResponse {
                command: catalog::GREETING.name,
                code: greeting.code,
                message: greeting.message,
            });
        }

        self.posting_allowed = greeting.code == codes::READY_POSTING_ALLOWED;
        self.state = SessionState::Ready;
        info!(
            "Connected to {} (posting {})",
            self.config.host,
            if self.posting_allowed {
                "allowed"
            } else {
                "not allowed"
            }
        );
        Ok(self.posting_allowed)
    }

    /// Upgrade a plain session to TLS (STARTTLS, RFC 4642)
    ///
    /// On 382 the TLS handshake runs over the existing stream; a handshake
    /// failure closes the session.
    ///
    /// # Errors
    ///
    /// - [`NntpError::InvalidState`] - the session is already encrypted
    /// - [`NntpError::CommandRejected`] - server answered 580 (or a common failure)
    /// - [`NntpError::Tls`] - the handshake failed
    pub async fn upgrade_to_tls(&mut self) -> Result<()> {
        self.execute(&Command::StartTls).await.map(|_| ())
    }

    /// Swap the plain stream for a TLS stream after 382
    pub(super) async fn start_tls(&mut self) -> Result<()> {
        let reader = self.stream.take().ok_or(NntpError::NotConnected)?;
        if !reader.buffer().is_empty() {
            return Err(NntpError::Tls(
                "server sent data before the TLS handshake".to_string(),
            ));
        }

        let tls_stream = self
            .tls_handshake(reader.into_inner(), Encryption::Tls)
            .await?;
        self.stream = Some(BufReader::with_capacity(BUFREADER_CAPACITY, tls_stream));
        self.encrypted = true;
        info!("Connection to {} upgraded to TLS", self.config.host);
        Ok(())
    }

    async fn tls_handshake(
        &self,
        stream: Box<dyn NntpIo>,
        encryption: Encryption,
    ) -> Result<Box<dyn NntpIo>> {
        let tls_config = tls_client_config(encryption, self.config.allow_insecure_tls);
        let connector = TlsConnector::from(Arc::new(tls_config));
        let server_name = ServerName::try_from(self.config.host.as_str())
            .map_err(|e| NntpError::Tls(format!("Invalid domain: {}", e)))?
            .to_owned();

        let tls_stream = timeout(
            self.config.connect_timeout,
            connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| NntpError::Timeout)?
        .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {}", e)))?;

        Ok(Box::new(tls_stream))
    }

    /// Close the session
    ///
    /// Sends QUIT and closes the stream once the server answers 205. A
    /// session whose previous reply was never consumed is closed without
    /// QUIT, since the server may still be sending. Disconnecting a
    /// disconnected session does nothing.
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.stream.is_none() {
            return Ok(());
        }

        if self.state != SessionState::Ready {
            debug!("Closing without QUIT (state {:?})", self.state);
            self.teardown();
            return Ok(());
        }

        match self.execute(&Command::Quit).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_fatal() => {
                debug!("Connection lost during QUIT: {}", e);
                Ok(())
            }
            Err(e) => {
                self.teardown();
                Err(e)
            }
        }
    }

    /// Drop the stream and reset per-connection state
    pub(super) fn teardown(&mut self) {
        if self.stream.take().is_some() {
            info!("Connection to {} closed", self.config.host);
        }
        self.state = SessionState::Disconnected;
        self.encrypted = false;
        self.current_group = None;
    }
}
