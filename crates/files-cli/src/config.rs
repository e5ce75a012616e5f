//! Gateway configuration

use files_store::S3StoreConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Where objects are kept
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3 or an S3-compatible service
    #[default]
    S3,
    /// Process-local map, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}', expected 's3' or 'memory'")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 => f.write_str("s3"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Bucket every file lives in
    pub bucket: String,
    /// Storage backend
    pub backend: StorageBackend,
    /// AWS region
    pub region: Option<String>,
    /// Custom S3 endpoint (MinIO, LocalStack, ...)
    pub endpoint_url: Option<String>,
    /// Static access key
    pub access_key_id: Option<String>,
    /// Static secret key
    #[serde(skip_serializing)]
    pub secret_access_key: Option<String>,
    /// Force path-style S3 addressing
    pub force_path_style: bool,
    /// Deadline for one store operation (seconds)
    pub store_timeout_secs: u64,
    /// Attempts per store operation, first try included
    pub store_max_attempts: u32,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            bucket: String::new(),
            backend: StorageBackend::S3,
            region: None,
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
            store_timeout_secs: 30,
            store_max_attempts: 3,
            max_body_size: 100 * 1024 * 1024, // 100 MB
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the S3 backend
    pub fn s3_store_config(&self) -> S3StoreConfig {
        S3StoreConfig {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            force_path_style: self.force_path_style,
            operation_timeout: Duration::from_secs(self.store_timeout_secs),
            max_attempts: self.store_max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert!("ipfs".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_s3_store_config() {
        let config = GatewayConfig {
            bucket: "files".to_string(),
            endpoint_url: Some("http://localhost:9000".to_string()),
            store_timeout_secs: 5,
            store_max_attempts: 1,
            ..Default::default()
        };

        let s3 = config.s3_store_config();
        assert_eq!(s3.bucket, "files");
        assert_eq!(s3.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(s3.operation_timeout, Duration::from_secs(5));
        assert_eq!(s3.max_attempts, 1);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_secret_not_serialized() {
        let config = GatewayConfig {
            secret_access_key: Some("hunter2".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
