//! S3 object store backed by `aws-sdk-s3`

use crate::{
    ObjectData, ObjectHead, ObjectListing, ObjectStore, ObjectSummary, Result, StoreError,
};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Credentials, Region},
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::{ByteStream as SdkByteStream, DateTime as SdkDateTime},
    Client,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the S3 connection
#[derive(Clone, Debug)]
pub struct S3StoreConfig {
    /// Bucket every key lives in
    pub bucket: String,
    /// AWS region; falls back to the default provider chain when unset
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, RustFS, ...)
    pub endpoint_url: Option<String>,
    /// Static access key; the default credential chain is used when unset
    pub access_key_id: Option<String>,
    /// Static secret key
    pub secret_access_key: Option<String>,
    /// Force path-style addressing
    pub force_path_style: bool,
    /// Deadline for one operation including SDK retries
    pub operation_timeout: Duration,
    /// Maximum attempts per operation (SDK standard retry mode)
    pub max_attempts: u32,
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: None,
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
            operation_timeout: Duration::from_secs(30),
            max_attempts: 3,
        }
    }
}

impl S3StoreConfig {
    /// Create with a bucket name and default settings
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    fn static_credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key), Some(secret_key)) => Some(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "files-api-static",
            )),
            _ => None,
        }
    }
}

/// S3 object store client
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from configuration and verify the bucket is reachable
    pub async fn new(config: S3StoreConfig) -> Result<Self> {
        if config.bucket.is_empty() {
            return Err(StoreError::Configuration("bucket name is required".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config)
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.operation_timeout)
                    .build(),
            );

        if let Some(credentials) = config.static_credentials() {
            builder = builder.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint_url {
            debug!("Using custom S3 endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        // Custom endpoints rarely support virtual-hosted addressing
        if config.force_path_style || config.endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        let store = Self::from_client(Client::from_conf(builder.build()), config.bucket);
        store.verify_connection().await?;

        info!(bucket = %store.bucket, "S3 object store initialized");
        Ok(store)
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Verify the bucket exists and credentials are accepted
    pub async fn verify_connection(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| classify(e, &self.bucket, Target::Bucket))?;
        Ok(())
    }
}

/// What an S3 call was addressing, used to read its error codes
#[derive(Clone, Copy, Debug)]
enum Target<'a> {
    Bucket,
    Key(&'a str),
    Listing { continuation_token: Option<&'a str> },
}

/// Translate an SDK failure into a store error.
///
/// A HEAD on a missing bucket also answers 404 without a body, so it is
/// indistinguishable from a missing key and reported as `NotFound`.
fn classify<E, R>(err: SdkError<E, R>, bucket: &str, target: Target<'_>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::TimeoutError(_) => StoreError::Timeout,
        SdkError::DispatchFailure(_) | SdkError::ConstructionFailure(_) => {
            StoreError::Transport(DisplayErrorContext(&err).to_string())
        }
        SdkError::ServiceError(_) => match (err.code(), target) {
            (Some("NoSuchBucket"), _) => StoreError::BucketNotFound(bucket.to_string()),
            (Some("NoSuchKey") | Some("NotFound"), Target::Key(key)) => {
                StoreError::NotFound(key.to_string())
            }
            (
                Some("InvalidArgument"),
                Target::Listing {
                    continuation_token: Some(token),
                },
            ) => StoreError::InvalidContinuationToken(token.to_string()),
            _ => StoreError::Service(DisplayErrorContext(&err).to_string()),
        },
        _ => StoreError::Service(DisplayErrorContext(&err).to_string()),
    }
}

fn to_chrono(timestamp: Option<&SdkDateTime>) -> DateTime<Utc> {
    timestamp
        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or_default()
}

fn to_length(length: Option<i64>) -> u64 {
    length.and_then(|l| u64::try_from(l).ok()).unwrap_or(0)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(SdkByteStream::from(data))
            .send()
            .await
            .map_err(|e| classify(e, &self.bucket, Target::Key(key)))?;
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn get(&self, key: &str) -> Result<ObjectData> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &self.bucket, Target::Key(key)))?;

        let head = ObjectHead {
            content_type: output.content_type().map(str::to_string),
            content_length: to_length(output.content_length()),
            last_modified: to_chrono(output.last_modified()),
        };

        let body = futures::stream::unfold(output.body, |mut body| async move {
            body.next()
                .await
                .map(|chunk| (chunk.map_err(|e| StoreError::Body(e.to_string())), body))
        })
        .boxed();

        Ok(ObjectData { head, body })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn head(&self, key: &str) -> Result<ObjectHead> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &self.bucket, Target::Key(key)))?;

        Ok(ObjectHead {
            content_type: output.content_type().map(str::to_string),
            content_length: to_length(output.content_length()),
            last_modified: to_chrono(output.last_modified()),
        })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &self.bucket, Target::Bucket))?;
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        max_keys: u32,
    ) -> Result<ObjectListing> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(i32::try_from(max_keys).unwrap_or(i32::MAX))
            .set_continuation_token(continuation_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| classify(e, &self.bucket, Target::Listing { continuation_token }))?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|object| {
                Some(ObjectSummary {
                    key: object.key()?.to_string(),
                    size: to_length(object.size()),
                    last_modified: to_chrono(object.last_modified()),
                })
            })
            .collect();

        // An empty token is treated the same as an absent one
        let next_continuation_token = output
            .next_continuation_token()
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(ObjectListing {
            objects,
            next_continuation_token,
        })
    }
}
