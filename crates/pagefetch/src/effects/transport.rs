use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, OnceLock};

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::debug;

use crate::data::{FetchOptions, HttpTarget};
use crate::error::{FetchError, Result};

/// Opens byte streams to HTTP targets.
///
/// The fetch engine calls [`Connector::connect`] once per attempt, including
/// every redirect hop, and drops the stream when the attempt ends.
///
/// # Implementations
///
/// - [`TcpConnector`]: TCP sockets, with rustls for `https`
/// - Scripted in-memory streams for testing
pub trait Connector {
    type Stream: Read + Write;

    /// Open a stream to `target`, completing any TLS handshake first.
    ///
    /// # Errors
    ///
    /// [`FetchError::Connect`] when no resolved address accepts the
    /// connection, [`FetchError::Tls`] when the handshake fails.
    fn connect(&self, target: &HttpTarget, options: &FetchOptions) -> Result<Self::Stream>;
}

/// Production connector over `std::net::TcpStream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

/// A connected socket, plain or wrapped in a TLS session.
pub enum Connection {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

static CLIENT_CONFIG: OnceLock<Arc<ClientConfig>> = OnceLock::new();

/// Client config trusting the Mozilla root store.
fn client_config() -> Arc<ClientConfig> {
    CLIENT_CONFIG
        .get_or_init(|| {
            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            Arc::new(
                ClientConfig::builder()
                    .with_root_certificates(roots)
                    .with_no_client_auth(),
            )
        })
        .clone()
}

impl Connector for TcpConnector {
    type Stream = Connection;

    fn connect(&self, target: &HttpTarget, options: &FetchOptions) -> Result<Connection> {
        let socket = open_socket(target, options)?;
        if !target.secure {
            return Ok(Connection::Plain(socket));
        }
        let tls = handshake(target, socket)?;
        Ok(Connection::Tls(Box::new(tls)))
    }
}

fn open_socket(target: &HttpTarget, options: &FetchOptions) -> Result<TcpStream> {
    let connect_error = |source: io::Error| FetchError::Connect {
        host: target.host.clone(),
        port: target.port,
        source,
    };

    let addrs = (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(connect_error)?;

    let mut last_error = None;
    for addr in addrs {
        debug!(%addr, host = %target.host, "connecting");
        let attempt = match options.timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(socket) => {
                socket.set_read_timeout(options.timeout)?;
                socket.set_write_timeout(options.timeout)?;
                return Ok(socket);
            }
            Err(e) => {
                debug!(%addr, error = %e, "connect attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(connect_error(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

fn handshake(target: &HttpTarget, mut socket: TcpStream) -> Result<StreamOwned<ClientConnection, TcpStream>> {
    let tls_error = |reason: String| FetchError::Tls {
        host: target.host.clone(),
        reason,
    };

    let server_name = ServerName::try_from(target.host.clone())
        .map_err(|e| tls_error(format!("invalid server name: {}", e)))?;
    let mut session = ClientConnection::new(client_config(), server_name)
        .map_err(|e| tls_error(format!("session setup failed: {}", e)))?;

    while session.is_handshaking() {
        session
            .complete_io(&mut socket)
            .map_err(|e| tls_error(format!("handshake failed: {}", e)))?;
    }
    debug!(host = %target.host, "TLS handshake complete");

    Ok(StreamOwned::new(session, socket))
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.read(buf),
            Connection::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.write(buf),
            Connection::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Plain(stream) => stream.flush(),
            Connection::Tls(stream) => stream.flush(),
        }
    }
}
