// Stub profile service for integration tests.
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use profile_analyzer::page::{
    MemoryButton, MemoryDocument, MemoryInput, MemoryOutput, Page, RecordingAlert, BUTTON_ID,
    INPUT_ID, OUTPUT_ID,
};
use std::sync::{Arc, Mutex};

/// Every request the stub received: method, path, content type, body length.
#[derive(Clone, Default)]
pub struct Recorded(pub Arc<Mutex<Vec<(String, String, Option<String>, usize)>>>);

impl Recorded {
    pub fn all(&self) -> Vec<(String, String, Option<String>, usize)> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, method: &str, path: String, headers: &HeaderMap, body: &str) {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.0
            .lock()
            .unwrap()
            .push((method.to_string(), path, content_type, body.len()));
    }
}

async fn analyze(
    State(recorded): State<Recorded>,
    Path(vk_id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    recorded.push("POST", format!("/profiles/{}/analyze", vk_id), &headers, &body);

    match vk_id.as_str() {
        "404" => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "not found"})),
        )
            .into_response(),
        "500" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "401" => (StatusCode::UNAUTHORIZED, "").into_response(),
        "garbage" => (StatusCode::OK, "not json at all").into_response(),
        _ => Json(serde_json::json!({
            "vk_id": vk_id,
            "summary": "Активный пользователь",
            "vector": {"posts_per_month": 4.5, "friends_count": 120}
        }))
        .into_response(),
    }
}

async fn show(
    State(recorded): State<Recorded>,
    Path(vk_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    recorded.push("GET", format!("/profiles/{}", vk_id), &headers, "");
    Json(serde_json::json!({"vk_id": vk_id, "summary": "stored"})).into_response()
}

/// Start the stub on an ephemeral port and return its base URL.
pub async fn spawn_service() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/profiles/{vk_id}/analyze", post(analyze))
        .route("/profiles/{vk_id}", get(show))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    (format!("http://{}", addr), recorded)
}

/// Serve one connection that announces `Content-Length: 100` but closes
/// after `partial_body`.
pub async fn truncated_service(status_line: &str, partial_body: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    let reply = format!(
        "{}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{}",
        status_line, partial_body
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept connection");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(reply.as_bytes())
            .await
            .expect("write reply");
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}

/// A base URL nothing listens on.
pub async fn dead_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub struct TestPage {
    pub input: Arc<MemoryInput>,
    pub button: Arc<MemoryButton>,
    pub output: Arc<MemoryOutput>,
    pub alert: Arc<RecordingAlert>,
    pub page: Page,
}

pub fn test_page(value: &str) -> TestPage {
    let input = Arc::new(MemoryInput::new(value));
    let button = Arc::new(MemoryButton::new());
    let output = Arc::new(MemoryOutput::new());
    let alert = Arc::new(RecordingAlert::new());
    let document = MemoryDocument::new()
        .with_input(INPUT_ID, input.clone())
        .with_button(BUTTON_ID, button.clone())
        .with_output(OUTPUT_ID, output.clone());
    let page = Page::bind(&document, alert.clone()).expect("page elements present");

    TestPage {
        input,
        button,
        output,
        alert,
        page,
    }
}
