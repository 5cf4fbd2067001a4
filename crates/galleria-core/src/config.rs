//! Configuration module
//!
//! Configuration is read once at process start, validated, and then passed
//! around as an immutable value. Nothing below the binary reads the
//! environment on its own.

use std::env;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 4000;
const MAX_FILE_SIZE_MB: usize = 10;
const LOCAL_STORAGE_PATH: &str = "uploads";
const LOCAL_STORAGE_BASE_URL: &str = "/uploads";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Storage backend settings. Only the fields of the selected backend are used.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub aws_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub s3_public_read: bool,
}

/// Settings consumed by the upload/list/delete pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub max_file_size_bytes: usize,
    pub admin_key: Option<String>,
    pub verify_thumbnails_on_list: bool,
}

impl PipelineConfig {
    pub fn new(max_file_size_bytes: usize) -> Self {
        Self {
            max_file_size_bytes,
            admin_key: None,
            verify_thumbnails_on_list: false,
        }
    }

    pub fn with_admin_key(mut self, admin_key: impl Into<String>) -> Self {
        self.admin_key = Some(admin_key.into());
        self
    }

    pub fn with_thumbnail_verification(mut self, enabled: bool) -> Self {
        self.verify_thumbnails_on_list = enabled;
        self
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `MAX_FILE_SIZE_MB` in bytes. Unset means the default; anything that is
/// not a whole number of megabytes fitting in `usize` bytes is rejected.
fn parse_max_file_size(raw: Option<&str>) -> Result<usize, anyhow::Error> {
    let megabytes = match raw {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?,
        None => MAX_FILE_SIZE_MB,
    };

    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match env_opt("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Local,
        };

        let max_file_size_bytes = parse_max_file_size(env_opt("MAX_FILE_SIZE_MB").as_deref())?;

        let config = Config {
            base: BaseConfig {
                server_port,
                cors_origins,
                environment,
            },
            storage: StorageConfig {
                backend,
                local_storage_path: env_opt("LOCAL_STORAGE_PATH")
                    .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
                local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL")
                    .unwrap_or_else(|| LOCAL_STORAGE_BASE_URL.to_string()),
                s3_bucket: env_opt("S3_BUCKET"),
                s3_region: env_opt("S3_REGION"),
                aws_region: env_opt("AWS_REGION"),
                s3_endpoint: env_opt("S3_ENDPOINT"),
                s3_public_base_url: env_opt("S3_PUBLIC_BASE_URL"),
                s3_public_read: env_flag("S3_PUBLIC_READ", true),
            },
            pipeline: PipelineConfig {
                max_file_size_bytes,
                admin_key: env_opt("ADMIN_KEY"),
                verify_thumbnails_on_list: env_flag("VERIFY_THUMBNAILS_ON_LIST", false),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.pipeline.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if !self.storage.local_storage_base_url.starts_with('/')
                    && !self.storage.local_storage_base_url.starts_with("http")
                {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be an absolute path or an http(s) URL"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.storage.s3_bucket.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.storage
            .s3_region
            .as_deref()
            .or(self.storage.aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.storage.s3_endpoint.as_deref()
    }

    pub fn s3_public_base_url(&self) -> Option<&str> {
        self.storage.s3_public_base_url.as_deref()
    }

    pub fn s3_public_read(&self) -> bool {
        self.storage.s3_public_read
    }

    pub fn local_storage_path(&self) -> &str {
        &self.storage.local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.storage.local_storage_base_url
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.pipeline.max_file_size_bytes
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }
}
