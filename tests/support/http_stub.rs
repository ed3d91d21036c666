// ABOUTME: Minimal HTTP/1.1 server answering canned responses, one per connection.
// ABOUTME: Records raw requests so tests can assert on methods, paths, and headers.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct StubServer {
    pub endpoint: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    /// Serve `responses` in order, one connection each.
    pub async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        Self {
            endpoint: format!("http://{}", addr),
            handle,
        }
    }

    /// Wait for every canned response to be served and return the requests.
    pub async fn requests(self) -> Vec<String> {
        self.handle.await.unwrap()
    }
}

/// Build a response with a JSON body and optional ETag.
pub fn response(status: &str, etag: Option<&str>, body: &str) -> String {
    let etag = etag
        .map(|tag| format!("ETag: {}\r\n", tag))
        .unwrap_or_default();
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        etag,
        body.len(),
        body
    )
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let body_len = content_length(&text[..header_end]);
            if buf.len() >= header_end + 4 + body_len {
                return text;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}
