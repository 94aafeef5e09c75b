//! In-process stand-in for the upstream provider.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// Accepts one connection, answers it with `status` and `body`, and hands back
/// what the client sent. Returns the endpoint URL to point a client at.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/cartoon", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let captured = CapturedRequest {
            head,
            body: String::new(),
        };
        let content_length = captured
            .header("content-length")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest {
            body: String::from_utf8_lossy(&buf[head_end..]).to_string(),
            ..captured
        }
    });

    (url, handle)
}

/// Accepts one connection and never answers it, holding the socket open for `hold`.
pub async fn serve_silently(hold: Duration) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/cartoon", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(hold).await;
    });

    (url, handle)
}
