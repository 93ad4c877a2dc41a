// Integration tests for the reqwest transport
//
// These run the real HTTP stack against a local mockito server standing in
// for CharacterWorks.

use characterworks::builders;
use characterworks::client::{parse_response, CharacterWorksClient, ClientError, ReqwestTransport};
use characterworks::protocol::{Channel, DeviceConfig};
use characterworks::Validation;
use mockito::Matcher;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Split mockito's `host:port` into a device target
fn target_for(server: &mockito::ServerGuard) -> DeviceConfig {
    let address = server.host_with_port();
    let (host, port) = address.rsplit_once(':').expect("host:port");
    DeviceConfig::new(host, port.parse().expect("numeric port"))
}

#[tokio::test]
async fn test_posts_json_to_endpoint_root() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Exact(
            r#"{"action":"play_motions","motions":["a","b","c"],"channel":"preview"}"#.to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;

    let client = CharacterWorksClient::new().unwrap();
    let command = builders::play_motions(" a , b , , c ", Channel::Preview, vec![]);
    let response = client
        .send_command(&command, &target_for(&server))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_preconfigured_reqwest_client() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("user-agent", "cwctl-test")
        .with_status(200)
        .with_body(r#"{"grids":["Grid1"]}"#)
        .create_async()
        .await;

    let http = reqwest::Client::builder()
        .user_agent("cwctl-test")
        .build()
        .unwrap();
    let client = CharacterWorksClient::with_transport(ReqwestTransport::with_client(http));
    let grids = client
        .list_grid_names(&target_for(&server), Validation::Schema)
        .await
        .unwrap();

    assert_eq!(grids.grids, vec!["Grid1"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_batch_body_is_json_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::JsonString(
            json!([
                {"action": "list_motions"},
                {"action": "list_grid_names"}
            ])
            .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"motions":["motion1"]},{"grids":["Grid1"]}]"#)
        .create_async()
        .await;

    let client = CharacterWorksClient::new().unwrap();
    let commands = vec![builders::list_motions(), builders::list_grid_names()];
    let results = client
        .send_batch_and_validate(&commands, &target_for(&server))
        .await
        .unwrap();

    assert_eq!(results[1], json!({"grids": ["Grid1"]}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_status_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(404)
        .with_body("Not found")
        .create_async()
        .await;

    let client = CharacterWorksClient::new().unwrap();
    let response = client
        .send_command(&builders::list_motions(), &target_for(&server))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let err = parse_response::<Value>(response).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404 Not Found: Not found");
}

#[tokio::test]
async fn test_layer_tree_round_trip_with_validation() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"action": "list_layers"})))
        .with_status(200)
        .with_body(
            json!({
                "children": [{
                    "name": "Ticker",
                    "path": "Ticker",
                    "id": "10",
                    "type": "motion",
                    "children": [
                        {"name": "Line", "path": "Ticker\\Line", "id": "11", "type": "text"}
                    ]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = CharacterWorksClient::new().unwrap();
    let tree = client
        .list_layers(Default::default(), &target_for(&server), Validation::Schema)
        .await
        .unwrap();

    assert_eq!(tree.find_by_path("Ticker\\Line").unwrap().layer_type, "text");
}

#[tokio::test]
async fn test_invalid_json_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = CharacterWorksClient::new().unwrap();
    let err = client
        .list_grid_names(&target_for(&server), Validation::Trust)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Deserialize(_)));
    assert!(err.to_string().starts_with("Failed to parse JSON response: "));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Reserve a free port, then release it so nothing is listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = CharacterWorksClient::new().unwrap();
    let err = client
        .send_command(&builders::list_motions(), &DeviceConfig::new("127.0.0.1", port))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport { .. }), "got {err:?}");
    assert!(!err.is_timeout());
}

/// Read one request: headers, then `Content-Length` bytes of body
async fn read_request(socket: &mut TcpStream) {
    let mut received = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        received.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&received);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= end + 4 + length {
                return;
            }
        }
    }
}

/// Answer a single request with a hand-written status line
async fn serve_once(status_line: &'static str, body: &'static str) -> DeviceConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        let reply = format!(
            "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    DeviceConfig::new("127.0.0.1", port)
}

#[tokio::test]
async fn test_status_error_keeps_device_reason_phrase() {
    let target = serve_once("HTTP/1.1 404 Motion Missing", "nope").await;

    let client = CharacterWorksClient::new().unwrap();
    let response = client
        .send_command(&builders::list_motions(), &target)
        .await
        .unwrap();
    assert_eq!(response.status_text(), "Motion Missing");
    assert_eq!(response.header("Content-Length"), Some("4"));
    assert!(response
        .headers()
        .iter()
        .any(|(name, value)| name == "connection" && value == "close"));

    let err = parse_response::<Value>(response).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404 Motion Missing: nope");
}

#[tokio::test]
async fn test_status_error_with_nonstandard_code() {
    let target = serve_once("HTTP/1.1 499 Client Closed", "nope").await;

    let client = CharacterWorksClient::new().unwrap();
    let err = client
        .list_motions(&target, Validation::Trust)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(499));
    assert_eq!(err.to_string(), "HTTP 499 Client Closed: nope");
}

#[tokio::test]
async fn test_standard_reason_phrase_still_reported() {
    let target = serve_once("HTTP/1.1 500 Internal Server Error", "boom").await;

    let client = CharacterWorksClient::new().unwrap();
    let err = client
        .list_grid_names(&target, Validation::Schema)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP 500 Internal Server Error: boom");
}
