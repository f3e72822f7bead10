use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::models::{ApiConfig, AttributeSchema, UserContext, UserUuidResponse};

pub const USER_UUID_PATH: &str = "/groundwater/user/uuid/";
pub const DOWNLOAD_REQUEST_PATH: &str = "/groundwater/record/download-request";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// `scheme://host[:port]` of the backend, as shown in absolute links
    pub fn origin(&self) -> String {
        self.config.base_url.origin().ascii_serialization()
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.config.base_url.join(path)?)
    }

    pub fn download_request_url(&self) -> Result<Url> {
        self.endpoint(DOWNLOAD_REQUEST_PATH)
    }

    pub fn layer_attributes_url(&self, layer_name: &str) -> Result<Url> {
        self.endpoint(&format!("/api/layer/{}/attributes", layer_name))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("{} request failed: {}", what, e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Fetch the current user's identifier and optional extent
    pub async fn get_user_context(&self) -> Result<UserContext> {
        let raw: UserUuidResponse = self
            .get_json(self.endpoint(USER_UUID_PATH)?, "User uuid")
            .await?;
        UserContext::try_from(raw).map_err(ApiError::InvalidResponse)
    }

    /// Fetch the attribute schema of `layer_name`
    pub async fn get_layer_attributes(&self, layer_name: &str) -> Result<AttributeSchema> {
        self.get_json(self.layer_attributes_url(layer_name)?, "Layer attributes")
            .await
    }

    /// Hit `target` and drop the body. The server starts its own work from there.
    pub async fn open(&self, target: Url) -> Result<()> {
        self.http
            .get(target)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Navigation failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: Url::parse(&server.url()).unwrap(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoints() {
        let client = ApiClient::new(ApiConfig {
            base_url: Url::parse("https://example.org/geonode/").unwrap(),
            ..ApiConfig::default()
        })
        .unwrap();
        assert_eq!(client.origin(), "https://example.org");
        assert_eq!(
            client.download_request_url().unwrap().as_str(),
            "https://example.org/groundwater/record/download-request"
        );
        assert_eq!(
            client
                .layer_attributes_url("groundwater:Groundwater_Well")
                .unwrap()
                .as_str(),
            "https://example.org/api/layer/groundwater:Groundwater_Well/attributes"
        );
    }

    #[tokio::test]
    async fn test_get_user_context() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", USER_UUID_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"uuid": "u-1", "extent": [1.5, 2, 3, 4]}"#)
            .create_async()
            .await;

        let ctx = client_for(&server).get_user_context().await.unwrap();
        assert_eq!(ctx.uuid, "u-1");
        assert_eq!(ctx.extent.map(|e| e.minx), Some(1.5));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_context_rejects_invalid_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", USER_UUID_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"uuid": "", "extent": [1, 2, 3, 4]}"#)
            .create_async()
            .await;

        let err = client_for(&server).get_user_context().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_user_context_drops_short_extent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", USER_UUID_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"uuid": "u-1", "extent": [1, 2]}"#)
            .create_async()
            .await;

        let ctx = client_for(&server).get_user_context().await.unwrap();
        assert_eq!(ctx.uuid, "u-1");
        assert_eq!(ctx.extent, None);
    }

    #[tokio::test]
    async fn test_user_context_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", USER_UUID_PATH)
            .with_status(403)
            .create_async()
            .await;

        let err = client_for(&server).get_user_context().await.unwrap_err();
        assert!(matches!(err, ApiError::ApiError(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_get_layer_attributes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/layer/groundwater:Groundwater_Well/attributes")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"attributes": [{"attribute": "depth"}]}"#)
            .create_async()
            .await;

        let schema = client_for(&server)
            .get_layer_attributes("groundwater:Groundwater_Well")
            .await
            .unwrap();
        assert_eq!(schema, json!({"attributes": [{"attribute": "depth"}]}));
    }

    #[tokio::test]
    async fn test_open_discards_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", DOWNLOAD_REQUEST_PATH)
            .with_status(200)
            .with_body("<html>redirecting</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        client
            .open(client.download_request_url().unwrap())
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
