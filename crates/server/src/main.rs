use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Parser;
use rand::RngCore;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use moodcam_core::persistence::domain::persistence_client::{SaveRequest, SaveResponse};
use moodcam_core::shared::constants::{PHOTO_EXTENSION, PHOTO_NAME_HEX_CHARS};

/// File-write endpoint for moodcam snapshots.
///
/// Accepts a data-URI snapshot and writes the decoded image under the
/// public directory with a random hex filename. Failures are reported
/// in-band (`success: false`), matching the client contract.
#[derive(Parser)]
#[command(name = "moodcam-server")]
struct Cli {
    /// Bind address.
    #[arg(long, default_value = "127.0.0.1:3001")]
    addr: SocketAddr,

    /// Directory snapshots are written to.
    #[arg(long, default_value = "public/photos")]
    photos_dir: PathBuf,
}

struct AppState {
    photos_dir: PathBuf,
}

#[derive(Error, Debug)]
enum PhotoError {
    #[error("payload is not a base64 data URI")]
    MissingPrefix,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = std::fs::create_dir_all(&cli.photos_dir) {
        tracing::error!("cannot create {}: {e}", cli.photos_dir.display());
        process::exit(1);
    }

    let app = router(Arc::new(AppState {
        photos_dir: cli.photos_dir,
    }));

    let listener = match tokio::net::TcpListener::bind(cli.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", cli.addr);
            process::exit(1);
        }
    };
    tracing::info!("listening on {}", cli.addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/photos", post(save_photo))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn save_photo(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Json<SaveResponse> {
    match write_photo(&state.photos_dir, &request.image).await {
        Ok(file_name) => {
            tracing::info!("wrote {file_name}");
            Json(SaveResponse::ok(file_name))
        }
        Err(e) => {
            tracing::warn!("snapshot rejected: {e}");
            Json(SaveResponse::rejected(e.to_string()))
        }
    }
}

async fn write_photo(dir: &Path, image: &str) -> Result<String, PhotoError> {
    let payload = strip_data_uri(image).ok_or(PhotoError::MissingPrefix)?;
    let bytes = STANDARD.decode(payload)?;
    let file_name = format!("{}.{}", random_hex(PHOTO_NAME_HEX_CHARS), PHOTO_EXTENSION);
    tokio::fs::write(dir.join(&file_name), bytes).await?;
    Ok(file_name)
}

/// `data:<mime>;base64,<payload>` → `<payload>`.
fn strip_data_uri(image: &str) -> Option<&str> {
    let (header, payload) = image.split_once(',')?;
    (header.starts_with("data:") && header.ends_with(";base64")).then_some(payload)
}

fn random_hex(chars: usize) -> String {
    let mut bytes = vec![0u8; chars.div_ceil(2)];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut out: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    out.truncate(chars);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app(dir: &Path) -> Router {
        router(Arc::new(AppState {
            photos_dir: dir.to_path_buf(),
        }))
    }

    fn post_photo(image: &str) -> Request<Body> {
        let body = serde_json::to_string(&SaveRequest {
            image: image.to_string(),
        })
        .unwrap();
        Request::builder()
            .method("POST")
            .uri("/api/photos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_body(response: axum::response::Response) -> SaveResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_save_photo_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let image = format!("data:image/png;base64,{}", STANDARD.encode(b"png bytes"));

        let response = app(dir.path()).oneshot(post_photo(&image)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let parsed = response_body(response).await;
        assert!(parsed.success);
        let name = parsed.file_name.unwrap();
        assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn test_file_name_is_hex_with_png_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = format!("data:image/png;base64,{}", STANDARD.encode(b"x"));

        let response = app(dir.path()).oneshot(post_photo(&image)).await.unwrap();
        let name = response_body(response).await.file_name.unwrap();

        let stem = name.strip_suffix(".png").expect("png extension");
        assert_eq!(stem.len(), 16);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_missing_prefix_is_rejected_in_band() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(dir.path())
            .oneshot(post_photo("just some text"))
            .await
            .unwrap();
        // In-band failure: HTTP 200, success: false.
        assert_eq!(response.status(), StatusCode::OK);
        let parsed = response_body(response).await;
        assert!(!parsed.success);
        assert!(parsed.error.is_some());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_base64_is_rejected_in_band() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(dir.path())
            .oneshot(post_photo("data:image/png;base64,@@not-base64@@"))
            .await
            .unwrap();
        let parsed = response_body(response).await;
        assert!(!parsed.success);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(
            strip_data_uri("data:image/png;base64,AAAA"),
            Some("AAAA")
        );
        assert_eq!(strip_data_uri("data:image/jpeg;base64,BB"), Some("BB"));
        assert_eq!(strip_data_uri("no comma here"), None);
        assert_eq!(strip_data_uri("data:image/png,AAAA"), None);
        assert_eq!(strip_data_uri("http://x,y"), None);
    }

    #[test]
    fn test_random_hex_length_and_charset() {
        let name = random_hex(16);
        assert_eq!(name.len(), 16);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(random_hex(5).len(), 5);
    }

    #[test]
    fn test_random_hex_names_differ() {
        assert_ne!(random_hex(16), random_hex(16));
    }
}
