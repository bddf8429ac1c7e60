use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("download of '{key}' failed: {message}")]
    Download { key: String, message: String },
}

/// Object store key for a student's resume.
pub fn resume_object_key(student_id: &str) -> String {
    format!("{student_id}.pdf")
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError>;
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;
}

/// S3 / MinIO backed store for a single bucket.
#[derive(Clone)]
pub struct S3DocumentStore {
    client: S3Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        info!("Uploaded {size} bytes to s3://{}/{key}", self.bucket);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service) if service.err().is_no_such_key() => {
                    StorageError::NotFound(key.to_string())
                }
                _ => StorageError::Download {
                    key: key.to_string(),
                    message: e.to_string(),
                },
            })?;

        let body = object
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Download {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(body.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_object_key() {
        assert_eq!(resume_object_key("21CS1042"), "21CS1042.pdf");
    }
}
