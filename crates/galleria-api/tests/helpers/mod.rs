//! Test helpers: build the router over a temp-dir local backend.
//!
//! Run from workspace root: `cargo test -p galleria-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use galleria_api::setup::build_app;
use galleria_core::{BaseConfig, Config, PipelineConfig, StorageBackend, StorageConfig};
use std::path::Path;
use tempfile::TempDir;

pub const PUBLIC_MOUNT: &str = "/uploads";
pub const MAX_FILE_SIZE_BYTES: usize = 2 * 1024 * 1024;

/// Test application: server plus the storage directory it owns.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_root(&self) -> &Path {
        self.temp_dir.path()
    }
}

pub fn test_config(storage_path: &Path, pipeline: PipelineConfig) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            local_storage_path: storage_path.to_string_lossy().to_string(),
            local_storage_base_url: PUBLIC_MOUNT.to_string(),
            s3_bucket: None,
            s3_region: None,
            aws_region: None,
            s3_endpoint: None,
            s3_public_base_url: None,
            s3_public_read: false,
        },
        pipeline,
    }
}

/// Setup test app with an isolated local storage directory.
pub async fn setup_test_app_with(pipeline: PipelineConfig) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(temp_dir.path(), pipeline);

    let (_state, router) = build_app(config).await.expect("Failed to build app");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, temp_dir }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(PipelineConfig::new(MAX_FILE_SIZE_BYTES)).await
}

/// POST `data` to the upload endpoint as field `image`.
pub async fn upload(
    client: &TestServer,
    data: Vec<u8>,
    file_name: &str,
    mime_type: &str,
) -> TestResponse {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    let multipart = MultipartForm::new().add_part("image", part);
    client.post("/api/upload").multipart(multipart).await
}
