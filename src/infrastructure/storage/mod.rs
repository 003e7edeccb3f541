use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

pub mod local;
pub mod s3;

/// Result of persisting a blob: the authoritative storage key plus the
/// derived public URL handed back to clients.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub storage_path: String,
    pub public_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("blob '{0}' not found")]
    NotFound(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persists `bytes` under a collision-resistant key derived from
    /// `suggested_name` (which may carry a directory prefix such as
    /// `uploads/clip.mp4`).
    async fn store(&self, bytes: Bytes, suggested_name: &str) -> Result<StoredBlob, StorageError>;

    /// Reads a blob back by the key `store` returned.
    async fn read(&self, storage_path: &str) -> Result<Bytes, StorageError>;
}

/// Embeds a unique token into the file name so concurrent writers never
/// collide. Keeps the suggested directory prefix intact.
pub(crate) fn unique_key(suggested_name: &str) -> String {
    let (prefix, name) = match suggested_name.rsplit_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, suggested_name),
    };
    let name = sanitize_file_name(name);
    let token = Uuid::new_v4().as_simple().to_string();
    match prefix {
        Some(prefix) => format!("{prefix}/{token}_{name}"),
        None => format!("{token}_{name}"),
    }
}

/// Keeps alphanumerics, dashes, underscores and dots; anything else becomes
/// an underscore. An empty name falls back to `file`.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_hostile_characters() {
        assert_eq!(sanitize_file_name("my video (1).mp4"), "my_video__1_.mp4");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("clip.mp4"), "clip.mp4");
    }

    #[test]
    fn unique_key_keeps_prefix_and_never_collides() {
        let a = unique_key("uploads/clip.mp4");
        let b = unique_key("uploads/clip.mp4");
        assert!(a.starts_with("uploads/"));
        assert!(a.ends_with("_clip.mp4"));
        assert_ne!(a, b);

        let bare = unique_key("clip.mp4");
        assert!(!bare.contains('/'));
    }
}
