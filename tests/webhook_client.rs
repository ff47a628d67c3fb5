use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use uuid::Uuid;

use intake_cli::form::LeadRecord;
use intake_cli::webhook::WebhookClient;

fn sample_record() -> LeadRecord {
    LeadRecord {
        store_name: "Corner Books".to_string(),
        contact_name: "Ana Souza".to_string(),
        phone: "11 99999-0000".to_string(),
        email: "ana@cornerbooks.com".to_string(),
        session_id: Uuid::new_v4(),
        submitted_at: Utc::now(),
    }
}

/// Minimal one-shot HTTP stub: accepts a single connection, reads the full
/// request, answers with the given status line, and hands the raw request
/// back for assertions.
async fn spawn_stub(status_line: &'static str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = stream.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

fn request_complete(request: &[u8]) -> bool {
    let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&request[..header_end]);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

fn request_body(request: &[u8]) -> serde_json::Value {
    let header_end = request
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("request has headers");
    serde_json::from_slice(&request[header_end + 4..]).expect("request body is JSON")
}

#[tokio::test]
async fn posts_record_as_json_and_accepts_2xx() {
    let (url, stub) = spawn_stub("HTTP/1.1 200 OK").await;
    let client = WebhookClient::new(url, Duration::from_secs(5)).expect("build client");
    let record = sample_record();

    client.submit(&record).await.expect("2xx should succeed");

    let request = stub.await.expect("stub finished");
    let head = String::from_utf8_lossy(&request);
    assert!(head.starts_with("POST / HTTP/1.1"));
    assert!(head.to_ascii_lowercase().contains("content-type: application/json"));

    let body = request_body(&request);
    assert_eq!(body["storeName"], "Corner Books");
    assert_eq!(body["contactName"], "Ana Souza");
    assert_eq!(body["phone"], "11 99999-0000");
    assert_eq!(body["email"], "ana@cornerbooks.com");
    assert_eq!(body["sessionId"], record.session_id.to_string());
    assert!(body["submittedAt"].is_string());
}

#[tokio::test]
async fn non_2xx_status_is_an_error() {
    let (url, stub) = spawn_stub("HTTP/1.1 500 Internal Server Error").await;
    let client = WebhookClient::new(url, Duration::from_secs(5)).expect("build client");

    let error = client
        .submit(&sample_record())
        .await
        .expect_err("500 should fail");
    assert!(error.to_string().contains("500"));

    stub.await.expect("stub finished");
}

#[tokio::test]
async fn unreachable_endpoint_is_an_error() {
    // Grab a free port, then close the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client =
        WebhookClient::new(format!("http://{}", addr), Duration::from_secs(1)).expect("build");
    let error = client
        .submit(&sample_record())
        .await
        .expect_err("connection refused should fail");
    assert!(error.to_string().contains("webhook endpoint"));
}
