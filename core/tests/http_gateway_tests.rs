use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use turmaflow_core::api::{Method, CONNECTION_ERROR_MESSAGE};
use turmaflow_core::{ClientConfig, Gateway, HttpGateway, Role, Session};

/// Serve one canned HTTP response and hand back the raw request text.
async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    let reply = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });
    (base, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let l = l.to_ascii_lowercase();
                    l.strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn teacher() -> Session {
    Session {
        user_id: Some("10".to_string()),
        role: Role::Teacher,
        name: Some("Marta".to_string()),
    }
}

#[tokio::test]
async fn test_success_body_passes_through() {
    let (base, server) = serve_once("200 OK", r#"{"success":true,"turma":{"id":5}}"#).await;
    let gateway = HttpGateway::new(&base, teacher(), &ClientConfig::default());

    let response = gateway.call("turmas/5", Method::GET, None).await;

    assert!(response.success);
    assert!(response.has_field("turma"));
    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/turmas/5 HTTP/1.1"), "got: {}", request);
}

#[tokio::test]
async fn test_identity_headers_and_json_body_sent() {
    let (base, server) = serve_once("200 OK", r#"{"success":true}"#).await;
    let gateway = HttpGateway::new(&base, teacher(), &ClientConfig::default());

    gateway
        .call(
            "/turmas/5/adicionar_aluno",
            Method::POST,
            Some(json!({"alunoId": "77"})),
        )
        .await;

    let request = server.await.unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with("POST /api/turmas/5/adicionar_aluno "), "got: {}", request);
    assert!(lower.contains("x-user-id: 10"));
    assert!(lower.contains("x-user-role: teacher"));
    assert!(lower.contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"alunoId":"77"}"#));
}

#[tokio::test]
async fn test_identity_headers_omitted_without_session() {
    let (base, server) = serve_once("200 OK", r#"{"success":true}"#).await;
    let gateway = HttpGateway::new(&base, Session::default(), &ClientConfig::default());

    gateway.call("turmas/5", Method::GET, None).await;

    let lower = server.await.unwrap().to_ascii_lowercase();
    assert!(!lower.contains("x-user-id"));
    assert!(!lower.contains("x-user-role"));
}

#[tokio::test]
async fn test_non_success_status_becomes_http_error() {
    let (base, server) = serve_once(
        "500 Internal Server Error",
        r#"{"success":true,"message":"ignored"}"#,
    )
    .await;
    let gateway = HttpGateway::new(&base, teacher(), &ClientConfig::default());

    let response = gateway.call("turmas/5", Method::GET, None).await;

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Erro HTTP 500"));
    assert!(response.payload.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_unparseable_body_is_empty_response() {
    let (base, server) = serve_once("200 OK", "<html>oops</html>").await;
    let gateway = HttpGateway::new(&base, teacher(), &ClientConfig::default());

    let response = gateway.call("turmas/5", Method::GET, None).await;

    assert!(!response.success);
    assert_eq!(response.message, None);
    assert!(response.payload.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_closed_port_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);
    let gateway = HttpGateway::new(&base, teacher(), &ClientConfig::default());

    let response = gateway.call("turmas/5", Method::GET, None).await;

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
}
