use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    StorageBackend,
    StorageRoot,
    ScratchDir,
    PublicBaseUrl,
    MaxUploadBytes,
    S3Endpoint,
    S3Bucket,
    S3AccessKey,
    S3SecretKey,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::StorageBackend => "STORAGE_BACKEND",
            EnvKey::StorageRoot => "STORAGE_ROOT",
            EnvKey::ScratchDir => "SCRATCH_DIR",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Bucket => "S3_BUCKET",
            EnvKey::S3AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::S3SecretKey => "AWS_SECRET_ACCESS_KEY",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok()
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
