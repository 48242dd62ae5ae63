// Rust guideline compliant 2026-10-12

//! HTTP adapter for the `IncidentTransport` port.

use domain::{IncidentTransport, TransportError};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

/// POSTs encoded incidents to the events ingestion endpoint.
///
/// No request timeout is set; the client's defaults apply.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
}

impl HttpTransport {
    /// Create a transport posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` when the TLS backend cannot be initialised.
    pub fn new(url: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, url })
    }
}

impl IncidentTransport for HttpTransport {
    /// Any HTTP status is returned as-is; only a missing response is an error.
    async fn post(&self, body: Vec<u8>) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Failed { reason: e.to_string() })?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::HttpTransport;
    use domain::{IncidentTransport as _, TransportError};
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    /// Accept one connection, capture the raw request, answer with `status_line`.
    async fn serve_once(listener: TcpListener, status_line: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let length = head
                    .lines()
                    .find_map(|l| {
                        let l = l.to_ascii_lowercase();
                        l.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if body.len() >= length {
                    break;
                }
            }
        }
        let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8(request).unwrap()
    }

    async fn local() -> (TcpListener, reqwest::Url) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v2/enqueue", listener.local_addr().unwrap());
        (listener, url.parse().unwrap())
    }

    #[tokio::test]
    async fn posts_json_and_returns_status() {
        let (listener, url) = local().await;
        let server = serve_once(listener, "202 Accepted");
        let transport = HttpTransport::new(url).unwrap();

        let (request, status) = tokio::join!(server, transport.post(br#"{"a":1}"#.to_vec()));

        assert_eq!(status.unwrap(), 202);
        assert!(request.starts_with("POST /v2/enqueue HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn error_status_is_not_a_transport_error() {
        let (listener, url) = local().await;
        let server = serve_once(listener, "400 Bad Request");
        let transport = HttpTransport::new(url).unwrap();

        let (_, status) = tokio::join!(server, transport.post(b"{}".to_vec()));

        assert_eq!(status.unwrap(), 400);
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let (listener, url) = local().await;
        drop(listener);
        let transport = HttpTransport::new(url).unwrap();

        let result = transport.post(b"{}".to_vec()).await;

        assert!(matches!(result, Err(TransportError::Failed { .. })), "{result:?}");
    }
}
