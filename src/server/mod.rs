//! HTTP Ingress
//!
//! axum router exposing the refactor endpoints:
//!
//! | Route                                    | Handler                  |
//! |------------------------------------------|--------------------------|
//! | `POST /api/refactor`                     | snippet refactor         |
//! | `POST /api/refactor/upload`              | single-file upload       |
//! | `POST /api/refactor/upload-zip`          | archive extraction       |
//! | `POST /api/refactor/refactor-zip`        | batch → zip download     |
//! | `POST /api/refactor/refactor-zip-animated` | batch → per-file JSON  |
//! | `GET  /api/refactor/stats`               | placeholder stats        |
//! | `GET  /api/health`                       | liveness                 |
//!
//! Middleware, outermost first: request tracing, CORS, rate limiting, body
//! limits (uploads get their own).

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::constants::limits::MULTIPART_OVERHEAD_BYTES;
use crate::types::Result;

/// Build the application router over `state`
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let upload_limit = config.limits.max_file_bytes + MULTIPART_OVERHEAD_BYTES;
    let archive_limit = config.limits.max_archive_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/api/refactor", post(handlers::refactor_code))
        .route(
            "/api/refactor/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/refactor/upload-zip",
            post(handlers::upload_zip).layer(DefaultBodyLimit::max(archive_limit)),
        )
        .route("/api/refactor/refactor-zip", post(handlers::refactor_zip))
        .route(
            "/api/refactor/refactor-zip-animated",
            post(handlers::refactor_zip_animated),
        )
        .route("/api/refactor/stats", get(handlers::stats))
        .route("/api/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_requests,
        ))
        .layer(cors_layer(&config.server))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if server.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Serve until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }

    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Completion;
    use crate::config::Config;
    use crate::refactor::service::tests::ScriptedProvider;
    use crate::types::Result as RefineResult;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::io::{Cursor, Read, Write};
    use std::sync::Arc;
    use tower::ServiceExt;
    use zip::write::SimpleFileOptions;
    use zip::{ZipArchive, ZipWriter};

    const BOUNDARY: &str = "coderefine-test-boundary";

    fn app_with(responses: Vec<RefineResult<Completion>>) -> (Router, Arc<ScriptedProvider>) {
        app_with_config(Config::default(), responses)
    }

    fn app_with_config(
        config: Config,
        responses: Vec<RefineResult<Completion>>,
    ) -> (Router, Arc<ScriptedProvider>) {
        let provider = ScriptedProvider::new(responses);
        let state = AppState::new(config, provider.clone());
        (build_router(state), provider)
    }

    fn json_request(uri: &str, body: Value) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(uri: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, bytes.to_vec())
    }

    async fn send_json(app: Router, request: Request) -> (StatusCode, Value) {
        let (status, _, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn unzip(bytes: Vec<u8>) -> HashMap<String, String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut files = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = String::new();
            file.read_to_string(&mut content).unwrap();
            files.insert(file.name().to_string(), content);
        }
        files
    }

    // -------------------------------------------------------------------------
    // POST /api/refactor
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_refactor_success_envelope() {
        let (app, provider) = app_with(vec![ScriptedProvider::ok(
            "```typescript\nconst total = (a: number, b: number): number => a + b;\n```",
        )]);

        let (status, body) = send_json(
            app,
            json_request(
                "/api/refactor",
                json!({
                    "code": "function total(a, b) {\n  return a + b;\n}",
                    "language": "typescript",
                    "settings": {"addComments": true}
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"]["refactoredCode"],
            "const total = (a: number, b: number): number => a + b;"
        );
        assert_eq!(body["data"]["metrics"]["originalLines"], 3);
        assert_eq!(body["data"]["tokenUsage"]["total_tokens"], 15);
        assert_eq!(body["data"]["language"], "typescript");
        assert!(provider.prompts.lock().unwrap()[0].contains("Add concise comments"));
    }

    #[tokio::test]
    async fn test_refactor_requires_code_and_language() {
        let (app, provider) = app_with(vec![]);

        let (status, body) = send_json(
            app,
            json_request("/api/refactor", json!({"code": "let a = 1;"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Code and language are required");
        assert_eq!(body["error"]["status"], 400);
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refactor_failure_surfaces_details() {
        let (app, _) = app_with(vec![ScriptedProvider::fail(
            "Incorrect API key provided",
            Some(401),
        )]);

        let (status, body) = send_json(
            app,
            json_request("/api/refactor", json!({"code": "x()", "language": "javascript"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to refactor code");
        assert_eq!(body["error"]["details"], "Incorrect API key provided");
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let (app, _) = app_with(vec![]);
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/refactor")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send_json(app, request).await;
        assert!(status.is_client_error());
        assert!(body["error"]["message"].is_string());
    }

    // -------------------------------------------------------------------------
    // POST /api/refactor/upload
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_upload_infers_nodejs_from_api_name() {
        let (app, provider) = app_with(vec![ScriptedProvider::ok("export const handler = async () => {};")]);

        let (status, body) = send_json(
            app,
            multipart_request(
                "/api/refactor/upload",
                "api-handler.js",
                "application/javascript",
                b"exports.handler = function (req, res) { res.end(); };",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["language"], "nodejs");
        assert!(provider.prompts.lock().unwrap()[0].contains("```nodejs\n"));
    }

    #[tokio::test]
    async fn test_upload_rejects_png() {
        let (app, _) = app_with(vec![]);

        let (status, body) = send_json(
            app,
            multipart_request("/api/refactor/upload", "logo.png", "image/png", b"\x89PNG"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Invalid file type")
        );
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let (app, _) = app_with(vec![]);
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{BOUNDARY}--\r\n"
        );
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/refactor/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send_json(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        let mut config = Config::default();
        config.limits.max_file_bytes = 8;
        let (app, _) = app_with_config(config, vec![]);

        let (status, body) = send_json(
            app,
            multipart_request(
                "/api/refactor/upload",
                "big.js",
                "application/javascript",
                b"const tooLong = true;",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .starts_with("File too large")
        );
    }

    // -------------------------------------------------------------------------
    // POST /api/refactor/upload-zip
    // -------------------------------------------------------------------------

    fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in entries {
            writer.start_file(*path, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_upload_zip_lists_source_entries() {
        let (app, provider) = app_with(vec![]);
        let archive = zip_of(&[
            ("proj/src/index.ts", "export {}"),
            ("proj/notes.md", "# notes"),
        ]);

        let (status, body) = send_json(
            app,
            multipart_request("/api/refactor/upload-zip", "proj.zip", "application/zip", &archive),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["files"],
            json!([{"path": "proj/src/index.ts", "name": "index.ts", "content": "export {}"}])
        );
        // Extraction never calls the provider
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_zip_rejects_non_zip() {
        let (app, _) = app_with(vec![]);

        let (status, body) = send_json(
            app,
            multipart_request("/api/refactor/upload-zip", "notes.txt", "text/plain", b"hello"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Invalid file type")
        );
    }

    #[tokio::test]
    async fn test_upload_zip_without_sources() {
        let (app, _) = app_with(vec![]);
        let archive = zip_of(&[("readme.md", "# nothing here")]);

        let (status, _) = send_json(
            app,
            multipart_request("/api/refactor/upload-zip", "docs.zip", "application/zip", &archive),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // -------------------------------------------------------------------------
    // POST /api/refactor/refactor-zip
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_refactor_zip_rejects_empty_batch() {
        let (app, _) = app_with(vec![]);

        let (status, headers, body) = send(
            app,
            json_request("/api/refactor/refactor-zip", json!({"files": []})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_ne!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/zip"
        );
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["message"], "No files provided");
    }

    #[tokio::test]
    async fn test_refactor_zip_returns_archive() {
        let (app, _) = app_with(vec![
            ScriptedProvider::ok("export const greet = (name: string): string => `hi ${name}`;"),
            ScriptedProvider::fail("Rate limit reached", Some(429)),
        ]);

        let (status, headers, body) = send(
            app,
            json_request(
                "/api/refactor/refactor-zip",
                json!({"files": [
                    {"name": "greet.ts", "content": "export function greet(name) { return 'hi ' + name; }"},
                    {"name": "util.js", "content": "var keep = 1;"}
                ]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
        assert!(
            headers[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("attachment; filename=\"refactored-code.zip\"")
        );

        let files = unzip(body);
        assert!(files["src/greet.ts"].starts_with("export const greet"));
        // Failed file silently keeps its content
        assert_eq!(files["src/util.js"], "var keep = 1;");
        assert!(files["README.md"].contains("`src/greet.ts`"));
        assert!(files["README.md"].contains("`src/util.js`"));
    }

    // -------------------------------------------------------------------------
    // POST /api/refactor/refactor-zip-animated
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_animated_partial_failure_succeeds() {
        let (app, _) = app_with(vec![
            ScriptedProvider::fail("Rate limit reached", Some(429)),
            ScriptedProvider::ok("const b = 2;"),
        ]);

        let (status, body) = send_json(
            app,
            json_request(
                "/api/refactor/refactor-zip-animated",
                json!({"files": [
                    {"name": "a.js", "content": "var a = 1"},
                    {"name": "b.js", "content": "var b = 2"}
                ]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let files = body["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files.iter().filter(|f| f["error"].is_null()).count(), 1);
        assert_eq!(files[0]["error"], "Rate limit reached");
        assert_eq!(files[0]["refactoredCode"], "var a = 1");
    }

    #[tokio::test]
    async fn test_animated_total_failure_is_server_error() {
        let (app, _) = app_with(vec![
            ScriptedProvider::fail("Rate limit reached", Some(429)),
            ScriptedProvider::fail("Service unavailable", Some(503)),
        ]);

        let (status, body) = send_json(
            app,
            json_request(
                "/api/refactor/refactor-zip-animated",
                json!({"files": [
                    {"name": "a.js", "content": "a"},
                    {"name": "b.js", "content": "b"}
                ]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let details = body["error"]["details"].as_str().unwrap();
        assert!(details.contains("Rate limit reached"));
        assert!(details.contains("Service unavailable"));
    }

    // -------------------------------------------------------------------------
    // Informational routes and middleware
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_stats_is_placeholder() {
        let (app, _) = app_with(vec![]);
        let request = HttpRequest::builder()
            .uri("/api/refactor/stats")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send_json(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["placeholder"], true);
        assert_eq!(body["data"]["stats"]["totalRefactors"], 0);
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let (app, _) = app_with(vec![]);
        let request = HttpRequest::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send_json(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"]["model"], "mock-model");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_envelope() {
        let (app, _) = app_with(vec![]);
        let request = HttpRequest::builder()
            .uri("/api/nope")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send_json(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": {"message": "Route not found", "status": 404}}));
    }

    #[tokio::test]
    async fn test_rate_limit_returns_429() {
        let mut config = Config::default();
        config.server.rate_limit_per_minute = 2;
        let (app, _) = app_with_config(config, vec![]);

        let health = || {
            HttpRequest::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap()
        };

        assert_eq!(send(app.clone(), health()).await.0, StatusCode::OK);
        assert_eq!(send(app.clone(), health()).await.0, StatusCode::OK);

        let (status, body) = send_json(app, health()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["status"], 429);
    }
}
