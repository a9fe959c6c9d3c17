//! Evidence providers against a local one-shot HTTP responder.

use paperforge_core::evidence::{EvidenceProvider, SourceKind};
use paperforge_evidence::{GoogleSearchProvider, OpenAlexProvider};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve one GET with `status` and `body`; yields the request head.
async fn serve_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 2048];
        while !String::from_utf8_lossy(&buf).contains("\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
    });

    (format!("http://{addr}"), rx)
}

const WORKS: &str = r#"{"results":[
    {"title":"Grid Storage","doi":"https://doi.org/10.1/grid","publication_year":2019,
     "authorships":[{"author":{"display_name":"Grace Hopper"}}]},
    {"title":"Battery Chemistry","doi":null,"publication_year":null,"authorships":[]}
]}"#;

#[tokio::test]
async fn openalex_search_decodes_works() {
    let (url, captured) = serve_once(200, WORKS).await;
    let provider = OpenAlexProvider::new(Some("me@example.org".into())).with_base_url(url);

    let records = provider.search("energy storage research paper", 5).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, SourceKind::Scholarly);
    assert_eq!(
        records[0].reference().as_str(),
        "Grace Hopper (2019). Grid Storage. https://doi.org/10.1/grid"
    );
    assert_eq!(records[1].reference().as_str(), " (n.d.). Battery Chemistry.");

    let head = captured.await.unwrap();
    assert!(head.starts_with("GET /works?"));
    assert!(head.contains("search=energy+storage+research+paper"));
    assert!(head.contains("per-page=5"));
    assert!(head.contains("mailto=me%40example.org"));
}

#[tokio::test]
async fn openalex_respects_limit() {
    let (url, _captured) = serve_once(200, WORKS).await;
    let provider = OpenAlexProvider::new(None).with_base_url(url);
    assert_eq!(provider.search("q", 1).await.len(), 1);
}

#[tokio::test]
async fn openalex_error_status_yields_nothing() {
    let (url, _captured) = serve_once(503, "{}").await;
    let provider = OpenAlexProvider::new(None).with_base_url(url);
    assert!(provider.search("q", 5).await.is_empty());
}

#[tokio::test]
async fn google_search_decodes_items() {
    let body = r#"{"items":[{"title":"Tidal Power","link":"https://example.org/tidal","snippet":"Moon-driven."}]}"#;
    let (url, captured) = serve_once(200, body).await;
    let provider =
        GoogleSearchProvider::new(Some("g-key".into()), Some("cse-1".into())).with_base_url(url);

    let records = provider.search("tidal research paper academic source", 5).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reference().as_str(), "Tidal Power. https://example.org/tidal");

    let head = captured.await.unwrap();
    assert!(head.contains("key=g-key"));
    assert!(head.contains("cx=cse-1"));
    assert!(head.contains("num=5"));
}
