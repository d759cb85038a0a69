use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Canned Notion query endpoint. Serves one fixed response for
/// `POST /v1/databases/{database_id}/query` and rejects anything that does
/// not look like an authenticated query.
pub struct NotionStub {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl NotionStub {
    pub fn spawn(database_id: &str, status: u16, body: serde_json::Value) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start notion stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");
        let expected_path = format!("/v1/databases/{database_id}/query");

        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_server = Arc::clone(&hits);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let body = body.to_string();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request
                    .url()
                    .split('?')
                    .next()
                    .unwrap_or(request.url())
                    .to_string();
                if request.method() != &tiny_http::Method::Post || path != expected_path {
                    let _ = request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    );
                    continue;
                }

                let has_auth = request.headers().iter().any(|h| {
                    h.field.equiv("Authorization") && h.value.as_str().starts_with("Bearer ")
                });
                let has_version = request
                    .headers()
                    .iter()
                    .any(|h| h.field.equiv("Notion-Version"));
                if !has_auth || !has_version {
                    let _ = request.respond(
                        tiny_http::Response::from_string(
                            r#"{"message":"missing auth headers"}"#,
                        )
                        .with_status_code(400),
                    );
                    continue;
                }

                hits_in_server.fetch_add(1, Ordering::SeqCst);

                let mut response =
                    tiny_http::Response::from_string(body.clone()).with_status_code(status);
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                response = response.with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            hits,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Number of well-formed query requests answered so far.
    #[allow(dead_code)]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for NotionStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One well-formed query result with all seven properties populated.
#[allow(dead_code)]
pub fn solved_record(
    category: &str,
    title: &str,
    level_label: &str,
    accuracy: f64,
    date: &str,
) -> serde_json::Value {
    serde_json::json!({
        "object": "page",
        "properties": {
            "알고리즘": { "select": { "name": category } },
            "제목": { "title": [ { "plain_text": title } ] },
            "난이도": { "select": { "name": level_label } },
            "정답률": { "number": accuracy },
            "Github": { "url": "https://github.com/me/solutions" },
            "문제 URL": { "url": null },
            "생성일": { "date": { "start": date } },
        }
    })
}

#[allow(dead_code)]
pub fn query_response(results: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "object": "list",
        "results": results,
        "has_more": false,
        "next_cursor": null,
    })
}
