//! The key-value client collaborator.
//!
//! One `KvClient` is one TCP connection; dropping it closes the socket.
//! The driver only ever issues a single command per connection, so the
//! client stays deliberately small: connect, execute, drop.

use std::io::{self, BufReader, Write};
use std::net::TcpStream;

use tracing::debug;

use crate::proto::resp::{read_reply, RespValue};

/// Opens connections to the target server.
///
/// The worker loop is generic over this seam so tests can inject a
/// dialer that fails or talks to a mock server.
pub trait Dialer: Send + Sync {
    type Conn: KvConnection;

    fn dial(&self) -> io::Result<Self::Conn>;
}

/// One established connection. Closing is `Drop`.
pub trait KvConnection {
    /// Issues one command and reads the reply.
    ///
    /// `Ok(None)` is a null reply, which the caller tolerates.
    fn execute(&mut self, command: &str) -> io::Result<Option<RespValue>>;
}

/// Dials the configured host and port with a fresh TCP connection per
/// cycle. Connections are never reused.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    host: String,
    port: u16,
}

impl TcpDialer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Dialer for TcpDialer {
    type Conn = KvClient;

    fn dial(&self) -> io::Result<KvClient> {
        KvClient::connect(&self.host, self.port)
    }
}

/// A blocking client for one connection to the key-value server.
pub struct KvClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl KvClient {
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        debug!(host, port, "connected");
        Ok(Self { stream, reader })
    }
}

impl KvConnection for KvClient {
    fn execute(&mut self, command: &str) -> io::Result<Option<RespValue>> {
        // Inline command form: the command verbatim, CRLF-terminated.
        self.stream.write_all(command.as_bytes())?;
        self.stream.write_all(b"\r\n")?;
        read_reply(&mut self.reader)
    }
}
