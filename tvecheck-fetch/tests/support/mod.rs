//! Throw-away HTTP server for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the server does with each connection.
#[derive(Clone)]
pub enum Reply {
    /// Write the bytes, then close.
    Close(Vec<u8>),
    /// Write the bytes, then keep the connection open without sending more.
    Hold(Vec<u8>),
    /// Read the request and never answer.
    Silent,
}

impl Reply {
    /// A complete response with a fixed-length body.
    pub fn with_body(status: &str, content_type: &str, body: &str) -> Self {
        Self::Close(
            format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .into_bytes(),
        )
    }

    /// Chunked 200 headers with no body yet.
    pub fn headers_only() -> Self {
        Self::Hold(
            b"HTTP/1.1 200 OK\r\nContent-Type: video/mp2t\r\nTransfer-Encoding: chunked\r\n\r\n"
                .to_vec(),
        )
    }
}

/// Starts a server on an ephemeral port answering every connection with `reply`.
pub async fn serve(reply: Reply) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(handle(socket, reply.clone()));
        }
    });

    addr
}

/// Returns an address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn handle(mut socket: TcpStream, reply: Reply) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    match reply {
        Reply::Close(bytes) => {
            let _ = socket.write_all(&bytes).await;
            let _ = socket.shutdown().await;
        }
        Reply::Hold(bytes) => {
            let _ = socket.write_all(&bytes).await;
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Reply::Silent => {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }
}
