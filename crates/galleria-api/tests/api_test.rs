//! HTTP integration tests over a local backend in a temp dir.
//!
//! Run with: `cargo test -p galleria-api --test api_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use galleria_core::{AssetListing, AssetResponse, PipelineConfig};
use helpers::{fixtures, setup_test_app, setup_test_app_with, upload, MAX_FILE_SIZE_BYTES};
use image::GenericImageView;

fn stored_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_upload_list_delete_list() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = upload(client, fixtures::create_test_png(64, 48), "cat.png", "image/png").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let asset: AssetResponse = response.json();
    assert!(asset.id.ends_with(".png"));
    assert_eq!(asset.media_type, "image/png");
    assert_eq!(asset.url, format!("/uploads/{}", asset.id));
    let stem = asset.id.trim_end_matches(".png");
    assert_eq!(
        asset.thumbnail_url,
        format!("/uploads/thumbnails/{}_thumb.png", stem)
    );

    let root = app.storage_root();
    assert_eq!(stored_files(root), vec![asset.id.clone()]);
    assert_eq!(
        stored_files(&root.join("thumbnails")),
        vec![format!("{}_thumb.png", stem)]
    );

    let listing: Vec<AssetListing> = client.get("/api/images").await.json();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].file, asset.id);
    assert_eq!(listing[0].url, asset.url);
    assert_eq!(listing[0].thumbnail_url.as_deref(), Some(asset.thumbnail_url.as_str()));
    assert_eq!(listing[0].size_bytes, asset.size_bytes);

    let served = client.get(&asset.url).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().len() as u64, asset.size_bytes);

    let deleted = client.delete(&format!("/api/images/{}", asset.id)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.json::<serde_json::Value>(), serde_json::json!({ "ok": true }));

    let listing: Vec<AssetListing> = client.get("/api/images").await.json();
    assert!(listing.is_empty());
    assert!(stored_files(root).is_empty());
    assert!(stored_files(&root.join("thumbnails")).is_empty());
}

#[tokio::test]
async fn test_disguised_gif_is_stored_as_gif() {
    let app = setup_test_app().await;

    let response = upload(
        app.client(),
        fixtures::create_test_gif(32, 32),
        "photo.png",
        "image/png",
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let asset: AssetResponse = response.json();
    assert!(asset.id.ends_with(".gif"));
    assert!(asset.thumbnail_url.ends_with("_thumb.gif"));
    assert_eq!(asset.media_type, "image/gif");
}

#[tokio::test]
async fn test_large_image_thumbnail_fits_box() {
    let app = setup_test_app().await;

    let response = upload(
        app.client(),
        fixtures::create_test_jpeg(2048, 1024),
        "wide.jpg",
        "image/jpeg",
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let asset: AssetResponse = response.json();
    assert!(asset.id.ends_with(".jpg"));
    let stem = asset.id.trim_end_matches(".jpg");
    let thumb = std::fs::read(
        app.storage_root()
            .join("thumbnails")
            .join(format!("{}_thumb.jpg", stem)),
    )
    .unwrap();
    assert_eq!(image::load_from_memory(&thumb).unwrap().dimensions(), (1024, 512));
}

#[tokio::test]
async fn test_admin_key_required_for_delete() {
    let app = setup_test_app_with(PipelineConfig::new(MAX_FILE_SIZE_BYTES).with_admin_key("abc"))
        .await;
    let client = app.client();

    let asset: AssetResponse = upload(client, fixtures::create_test_png(8, 8), "a.png", "image/png")
        .await
        .json();
    let path = format!("/api/images/{}", asset.id);

    let response = client.delete(&path).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<serde_json::Value>()["code"], "FORBIDDEN");

    let response = client.delete(&path).add_query_param("key", "abd").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(stored_files(app.storage_root()), vec![asset.id.clone()]);

    let response = client.delete(&path).add_query_param("key", "abc").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(stored_files(app.storage_root()).is_empty());
}

#[tokio::test]
async fn test_executable_rejected_without_side_effects() {
    let app = setup_test_app().await;

    let response = upload(
        app.client(),
        fixtures::create_fake_executable(),
        "totally-an-image.png",
        "image/png",
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(body["recoverable"], false);

    assert!(stored_files(app.storage_root()).is_empty());
    assert!(stored_files(&app.storage_root().join("thumbnails")).is_empty());
}

#[tokio::test]
async fn test_oversize_upload_rejected() {
    let app = setup_test_app_with(PipelineConfig::new(1024)).await;
    let client = app.client();

    // Over the configured maximum but inside the multipart allowance
    let response = upload(client, vec![0u8; 4096], "big.png", "image/png").await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.json::<serde_json::Value>()["code"],
        "PAYLOAD_TOO_LARGE"
    );

    // Over the transport limit
    let response = upload(client, vec![0u8; 256 * 1024], "huge.png", "image/png").await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    assert!(stored_files(app.storage_root()).is_empty());
}

#[tokio::test]
async fn test_upload_accepts_file_field_and_rejects_missing_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let part = Part::bytes(bytes::Bytes::from(fixtures::create_test_png(4, 4)))
        .file_name("x.png")
        .mime_type("image/png");
    let response = client
        .post("/api/upload")
        .multipart(MultipartForm::new().add_part("file", part))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = client
        .post("/api/upload")
        .multipart(MultipartForm::new().add_text("caption", "no file here"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_INPUT");

    let response = client.post("/api/upload").text("not multipart").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_is_idempotent_and_validates_name() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.delete("/api/images/1700000000000-0000000000000000.png").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = client.delete("/api/images/1700000000000-0000000000000000_thumb.png").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_is_most_recent_first() {
    let app = setup_test_app().await;
    let client = app.client();

    let png = fixtures::create_test_png(4, 4);
    let first: AssetResponse = upload(client, png.clone(), "1.png", "image/png").await.json();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let second: AssetResponse = upload(client, png, "2.png", "image/png").await.json();

    let listing: Vec<AssetListing> = client.get("/api/images").await.json();
    let files: Vec<&str> = listing.iter().map(|l| l.file.as_str()).collect();
    assert_eq!(files, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>()["status"], "alive");

    let response = client.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "ready");
    assert_eq!(body["backend"], "local");
}

#[tokio::test]
async fn test_request_id_header_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "req-42")
        .await;
    assert_eq!(response.header("x-request-id"), "req-42");

    let response = app.client().get("/api/images").await;
    assert!(!response.header("x-request-id").is_empty());
}
