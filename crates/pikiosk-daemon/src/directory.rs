//! Stream directory client (MediaMTX path listing)

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use pikiosk_core::prelude::*;
use pikiosk_core::{ServerAddress, StreamEntry};

/// Default port of the MediaMTX control API.
pub const DEFAULT_API_PORT: u16 = 9997;

/// Default port of the MediaMTX WebRTC player.
pub const DEFAULT_WEBRTC_PORT: u16 = 8889;

const PATH_LIST_ENDPOINT: &str = "/v3/paths/list";

/// Source of the list of currently available streams.
#[trait_variant::make(StreamDirectory: Send)]
pub trait LocalStreamDirectory {
    /// Fetch the current stream list from `server`.
    async fn list_streams(&self, server: ServerAddress) -> Result<Vec<StreamEntry>>;
}

/// HTTP client for the MediaMTX `paths/list` API.
#[derive(Debug, Clone)]
pub struct HttpStreamDirectory {
    client: reqwest::Client,
    api_port: u16,
}

impl HttpStreamDirectory {
    pub fn new(api_port: u16, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, api_port })
    }

    /// URL of the path listing endpoint on `server`.
    pub fn endpoint(&self, server: ServerAddress) -> Result<Url> {
        let base = format!("http://{}:{}", server, self.api_port);
        Url::parse(&base)
            .and_then(|u| u.join(PATH_LIST_ENDPOINT))
            .map_err(|e| Error::http(format!("invalid directory URL {}: {}", base, e)))
    }
}

impl StreamDirectory for HttpStreamDirectory {
    async fn list_streams(&self, server: ServerAddress) -> Result<Vec<StreamEntry>> {
        let url = self.endpoint(server)?;
        trace!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http(format!("{}: {}", url, e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("{}: {}", url, e)))?;

        parse_path_list(&body)
    }
}

#[derive(Debug, Deserialize)]
struct PathList {
    items: Vec<PathItem>,
}

#[derive(Debug, Deserialize)]
struct PathItem {
    #[serde(default)]
    name: Option<String>,
}

/// Parse a `paths/list` response body.
///
/// Unknown fields are ignored and items without a usable name are skipped.
/// A body without an `items` array is malformed.
pub fn parse_path_list(body: &[u8]) -> Result<Vec<StreamEntry>> {
    let list: PathList =
        serde_json::from_slice(body).map_err(|e| Error::malformed(e.to_string()))?;

    Ok(list
        .items
        .into_iter()
        .filter_map(|item| item.name)
        .filter(|name| !name.trim().is_empty())
        .map(StreamEntry::named)
        .collect())
}

/// Build the WebRTC playback URL for `path` on `server`.
pub fn playback_url(server: ServerAddress, webrtc_port: u16, path: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("http://{}:{}/", server, webrtc_port))
        .map_err(|e| Error::config(format!("invalid playback base URL: {}", e)))?;
    url.set_path(path);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_parse_path_list() {
        let body = br#"{
            "pageCount": 1,
            "itemCount": 2,
            "items": [
                {"name": "cam1", "ready": true, "tracks": ["H264"]},
                {"name": "cam2", "ready": false}
            ]
        }"#;

        let streams = parse_path_list(body).unwrap();

        assert_eq!(
            streams,
            vec![StreamEntry::named("cam1"), StreamEntry::named("cam2")]
        );
    }

    #[test]
    fn test_parse_empty_items() {
        let streams = parse_path_list(br#"{"items": []}"#).unwrap();
        assert!(streams.is_empty());
    }

    #[test]
    fn test_parse_skips_unnamed_items() {
        let streams = parse_path_list(br#"{"items": [{"ready": true}, {"name": ""}, {"name": "cam3"}]}"#)
            .unwrap();
        assert_eq!(streams, vec![StreamEntry::named("cam3")]);
    }

    #[test]
    fn test_parse_missing_items_is_malformed() {
        let err = parse_path_list(br#"{"error": "unauthorized"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = parse_path_list(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_endpoint_uses_trimmed_address() {
        let dir = HttpStreamDirectory::new(DEFAULT_API_PORT, Duration::from_secs(2)).unwrap();

        let url = dir.endpoint(ServerAddress::new(10, 0, 1, 74)).unwrap();

        assert_eq!(url.as_str(), "http://10.0.1.74:9997/v3/paths/list");
    }

    #[test]
    fn test_playback_url() {
        let url = playback_url(ServerAddress::new(10, 0, 0, 74), DEFAULT_WEBRTC_PORT, "cam1").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.74:8889/cam1");
    }

    #[test]
    fn test_playback_url_nested_path() {
        let url = playback_url(ServerAddress::new(192, 168, 1, 2), 8889, "site/door cam").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.2:8889/site/door%20cam");
    }

    /// Serve a single canned HTTP response on a loopback port.
    async fn serve_once(status: &'static str, body: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        port
    }

    #[tokio::test]
    async fn test_list_streams_over_http() {
        let port = serve_once("200 OK", r#"{"items":[{"name":"cam1"},{"name":"cam2"}]}"#).await;
        let dir = HttpStreamDirectory::new(port, Duration::from_secs(2)).unwrap();

        let streams = StreamDirectory::list_streams(&dir, ServerAddress::new(127, 0, 0, 1))
            .await
            .unwrap();

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[1].name, "cam2");
    }

    #[tokio::test]
    async fn test_list_streams_http_error_status() {
        let port = serve_once("500 Internal Server Error", "{}").await;
        let dir = HttpStreamDirectory::new(port, Duration::from_secs(2)).unwrap();

        let err = StreamDirectory::list_streams(&dir, ServerAddress::new(127, 0, 0, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { .. }));
    }

    #[tokio::test]
    async fn test_list_streams_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = HttpStreamDirectory::new(port, Duration::from_millis(500)).unwrap();

        let result = StreamDirectory::list_streams(&dir, ServerAddress::new(127, 0, 0, 1)).await;

        assert!(matches!(result, Err(Error::Http { .. })));
    }
}
