use std::future::Future;

use aws_sdk_s3::Client;

use crate::error::StoreError;

/// Existence checks against object storage.
pub trait ObjectStore: Send + Sync {
    /// Succeeds when `bucket/key` exists.
    fn exists(&self, bucket: &str, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3ObjectStore {
    async fn exists(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let not_found = e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false);
                if not_found {
                    Err(StoreError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    })
                } else {
                    Err(StoreError::Other {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        message: format!("{:?}", e),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// In-memory bucket contents, keyed by `bucket/key`.
    #[derive(Default)]
    pub struct MemoryStore {
        objects: HashSet<String>,
        denied: HashSet<String>,
        lookups: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        pub fn with(mut self, bucket: &str, key: &str) -> Self {
            self.objects.insert(format!("{bucket}/{key}"));
            self
        }

        /// Makes lookups of `bucket/key` fail with a non-404 error.
        pub fn deny(mut self, bucket: &str, key: &str) -> Self {
            self.denied.insert(format!("{bucket}/{key}"));
            self
        }

        /// Every `bucket/key` checked so far, in call order.
        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    impl ObjectStore for MemoryStore {
        async fn exists(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
            let path = format!("{bucket}/{key}");
            self.lookups.lock().unwrap().push(path.clone());
            if self.denied.contains(&path) {
                Err(StoreError::Other {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: "AccessDenied".to_string(),
                })
            } else if self.objects.contains(&path) {
                Ok(())
            } else {
                Err(StoreError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
            }
        }
    }
}
