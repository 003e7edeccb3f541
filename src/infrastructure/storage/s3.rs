use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::info;

use super::{unique_key, BlobStore, StorageError, StoredBlob};

/// S3/MinIO-backed blob store. Keys are object keys in a single bucket;
/// public URLs are path-style, which MinIO requires.
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3BlobStore {
    pub async fn new(endpoint: &str, bucket: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(config);

        info!("✅ Connected to S3 (MinIO)");

        Self {
            client,
            bucket: bucket.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn store(&self, bytes: Bytes, suggested_name: &str) -> Result<StoredBlob, StorageError> {
        let key = unique_key(suggested_name);
        let content_type = mime_guess::from_path(&key).first_or_octet_stream().to_string();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(aws_sdk_s3::primitives::ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let public_url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        Ok(StoredBlob {
            storage_path: key,
            public_url,
        })
    }

    async fn read(&self, storage_path: &str) -> Result<Bytes, StorageError> {
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_path)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Err(StorageError::NotFound(storage_path.to_string()));
                }
                return Err(StorageError::Backend(service_err.to_string()));
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(data.into_bytes())
    }
}
