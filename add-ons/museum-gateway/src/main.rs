//! Axum static host for the cell museum: serves the site directory and a small JSON API.
//! Config-driven via MuseumConfig.

mod handlers;

use axum::{routing::get, Router};
use handlers::status::{health, status};
use museum_core::{MuseumConfig, MuseumError};
use std::process::ExitCode;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<MuseumConfig>,
}

/// The content root must be a directory holding the index document.
fn check_site(config: &MuseumConfig) -> Result<(), MuseumError> {
    let root = config.content_root_path();
    if !root.is_dir() {
        return Err(MuseumError::ContentRootMissing(root.display().to_string()));
    }
    let index = config.index_path();
    if !index.is_file() {
        return Err(MuseumError::IndexMissing(index.display().to_string()));
    }
    Ok(())
}

/// Pre-flight check: config loads, site is in place, port is free.
fn run_verify() -> Result<(), MuseumError> {
    let config = MuseumConfig::load()?;

    print!("Checking content root {}... ", config.content_root);
    check_site(&config)?;
    println!("OK");

    let addr = config.listen_addr();
    print!("Checking {}... ", addr);
    let listener = std::net::TcpListener::bind(&addr)?;
    drop(listener);
    println!("OK (available)");

    println!("\nSUCCESS: {} is ready to serve.", config.app_name);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[museum-gateway] .env not loaded: {} (using system environment)", e);
    }

    if std::env::args().any(|a| a == "--verify") {
        return match run_verify() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "museum-gateway stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), MuseumError> {
    let config = Arc::new(MuseumConfig::load()?);
    check_site(&config)?;

    let app = build_app(AppState {
        config: Arc::clone(&config),
    });

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        app_name = %config.app_name,
        content_root = %config.content_root,
        "Listening on {} (open http://localhost:{})",
        addr,
        config.port
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    let content_root = state.config.content_root_path();
    let index_file = state.config.index_path();

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/status", get(status))
        // `/` -> index document, everything else -> file under the content root or 404
        .route_service("/", ServeFile::new(index_file))
        .fallback_service(ServeDir::new(content_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::Path;
    use tower::ServiceExt;

    const INDEX: &str = "<!DOCTYPE html><html><body><h1>细胞里的靖边数字博物馆</h1></body></html>";
    const BASIC: &str = "<html><body><h1>细胞知识馆</h1><p>细胞核</p></body></html>";

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html", INDEX);
        write(dir.path(), "css/style.css", "body { margin: 0; }");
        write(dir.path(), "modules/basic-knowledge/index.html", BASIC);
        dir
    }

    fn test_config(root: &Path) -> MuseumConfig {
        MuseumConfig {
            app_name: "Test Museum".to_string(),
            port: 8100,
            bind_address: "127.0.0.1".to_string(),
            content_root: root.display().to_string(),
            index_document: "index.html".to_string(),
        }
    }

    fn app(root: &Path) -> Router {
        build_app(AppState {
            config: Arc::new(test_config(root)),
        })
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn root_serves_index_document() {
        let site = site();
        let (status, body) = get_body(app(site.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, INDEX);
    }

    #[tokio::test]
    async fn module_pages_and_assets_are_served() {
        let site = site();
        let (status, body) = get_body(app(site.path()), "/modules/basic-knowledge/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, BASIC);

        let (status, body) = get_body(app(site.path()), "/css/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("margin"));
    }

    #[tokio::test]
    async fn module_directory_resolves_to_its_index() {
        let site = site();
        let (status, body) = get_body(app(site.path()), "/modules/basic-knowledge/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, BASIC);
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let site = site();
        let (status, _) = get_body(app(site.path()), "/modules/models/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let site = site();
        let (status, body) = get_body(app(site.path()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn status_lists_identity_and_modules() {
        let site = site();
        let (status, body) = get_body(app(site.path()), "/api/v1/status").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["app_name"], "Test Museum");
        assert_eq!(json["port"], 8100);
        let modules = json["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 4);
        assert_eq!(modules[0]["id"], "basic-knowledge");
        assert_eq!(modules[0]["name"], "细胞知识馆");
        assert_eq!(modules[0]["url"], "modules/basic-knowledge/index.html");
        assert_eq!(modules[3]["id"], "models");
    }

    #[test]
    fn check_site_requires_root_and_index() {
        let site = site();
        assert!(check_site(&test_config(site.path())).is_ok());

        let missing = test_config(&site.path().join("nowhere"));
        assert!(matches!(check_site(&missing), Err(MuseumError::ContentRootMissing(_))));

        let empty = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_site(&test_config(empty.path())),
            Err(MuseumError::IndexMissing(_))
        ));
    }
}
