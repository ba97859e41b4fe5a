use crate::application::ports::{AssetFetcher, AssetRequest, AssetResponse};
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

/// Fetches shell assets from the origin the app is published on.
pub struct HttpAssetFetcher {
    client: reqwest::Client,
    origin: String,
}

impl HttpAssetFetcher {
    pub fn new(client: reqwest::Client, origin: &str) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, AppError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|err| AppError::InvalidInput(err.to_string()))?;
        let mut builder = self
            .client
            .request(method, self.url_for(&request.path))
            .body(request.body.clone());
        if let Some(content_type) = &request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(AssetResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_origin_and_path() {
        let fetcher = HttpAssetFetcher::new(reqwest::Client::new(), "https://lav.example/app/");
        assert_eq!(fetcher.url_for("/index.html"), "https://lav.example/app/index.html");
        assert_eq!(fetcher.url_for("js/db.js"), "https://lav.example/app/js/db.js");
        assert_eq!(fetcher.url_for("/"), "https://lav.example/app/");
    }
}
