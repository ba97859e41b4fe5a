use crate::shared::error::AppError;
use async_trait::async_trait;
use bytes::Bytes;

/// Request as seen by the offline shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    /// Path plus query, e.g. `/js/app.js?v=6`.
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl AssetRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.to_string(),
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl AssetResponse {
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Named cache generations of request key → stored response.
#[async_trait]
pub trait AssetCacheStore: Send + Sync {
    async fn lookup(&self, generation: &str, key: &str) -> Result<Option<AssetResponse>, AppError>;
    async fn put(
        &self,
        generation: &str,
        key: &str,
        response: &AssetResponse,
    ) -> Result<(), AppError>;
    /// Stores every entry in one transaction.
    async fn put_all(
        &self,
        generation: &str,
        entries: &[(String, AssetResponse)],
    ) -> Result<(), AppError>;
    async fn generations(&self) -> Result<Vec<String>, AppError>;
    async fn delete_generation(&self, generation: &str) -> Result<u64, AppError>;
}

/// Network side of the shell. An `Err` means the network was unreachable; any HTTP
/// response, whatever its status, is `Ok`.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, AppError>;
}
