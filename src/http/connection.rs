use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Upper bound on a buffered request; anything larger is rejected.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// One accepted HTTP exchange.
///
/// A context is created by the acceptor, travels through the work queue, and
/// is owned by exactly one worker until the response is written (or the
/// connection is abandoned on error). The response sink is write-once:
/// a second `respond` call is an error. Dropping the context closes the
/// socket, so a handler that chooses to write nothing still terminates the
/// exchange.
pub struct ConnectionContext {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    responded: bool,
}

impl ConnectionContext {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            responded: false,
        }
    }

    /// Address of the connected client.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Whether a response has already been written on this connection.
    pub fn responded(&self) -> bool {
        self.responded
    }

    /// Reads and parses the request on this connection.
    ///
    /// Returns `Ok(None)` when the client closed the connection before
    /// sending anything.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            match parse_request(&self.buffer) {
                Ok(Some((request, consumed))) => {
                    let _ = self.buffer.split_to(consumed);
                    return Ok(Some(request));
                }
                Ok(None) => {
                    // Need more data, fall through to read
                }
                Err(e) => {
                    return Err(anyhow::anyhow!("HTTP parse error: {}", e));
                }
            }

            if self.buffer.len() > MAX_REQUEST_BYTES {
                anyhow::bail!("request exceeds {} bytes", MAX_REQUEST_BYTES);
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                anyhow::bail!("connection closed mid-request");
            }
        }
    }

    /// Writes the response, exactly once.
    ///
    /// Every response carries `Connection: close`; the exchange ends here and
    /// the socket is closed when the context is dropped.
    pub async fn respond(&mut self, mut response: Response) -> anyhow::Result<()> {
        if self.responded {
            anyhow::bail!("response already written to {}", self.peer);
        }
        self.responded = true;

        response
            .headers
            .entry("Connection".to_string())
            .or_insert_with(|| "close".to_string());

        let mut writer = ResponseWriter::new(&response);
        writer.write_to_stream(&mut self.stream).await
    }
}
