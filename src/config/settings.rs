use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use url::Url;

use crate::config::env::{self, EnvKey};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Clone, Debug)]
pub struct S3Settings {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: Option<String>,
    pub storage_backend: StorageBackend,
    /// Root directory for locally stored artifacts, served under `/static`.
    pub storage_root: PathBuf,
    /// Directory for transient decode/encode spool files.
    pub scratch_dir: PathBuf,
    pub public_base_url: Url,
    pub max_upload_bytes: usize,
    pub s3: Option<S3Settings>,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let server_port: u16 = env::get_parsed(EnvKey::ServerPort, 8000);

        let storage_backend = match env::get_or(EnvKey::StorageBackend, "local").as_str() {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => bail!("unknown STORAGE_BACKEND '{other}' (expected 'local' or 's3')"),
        };

        let s3 = match storage_backend {
            StorageBackend::S3 => Some(S3Settings {
                endpoint: env::get(EnvKey::S3Endpoint).context("S3_ENDPOINT is required for s3 storage")?,
                bucket: env::get(EnvKey::S3Bucket).context("S3_BUCKET is required for s3 storage")?,
                access_key: env::get(EnvKey::S3AccessKey).context("AWS_ACCESS_KEY_ID is required for s3 storage")?,
                secret_key: env::get(EnvKey::S3SecretKey).context("AWS_SECRET_ACCESS_KEY is required for s3 storage")?,
            }),
            StorageBackend::Local => None,
        };

        let public_base_url = env::get_or(EnvKey::PublicBaseUrl, &format!("http://localhost:{server_port}"));
        let public_base_url = Url::parse(&public_base_url).context("PUBLIC_BASE_URL is not a valid URL")?;

        Ok(Self {
            server_port,
            database_url: env::get_opt(EnvKey::DatabaseUrl),
            storage_backend,
            storage_root: PathBuf::from(env::get_or(EnvKey::StorageRoot, "static")),
            scratch_dir: env::get_opt(EnvKey::ScratchDir)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            public_base_url,
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
            s3,
        })
    }
}
