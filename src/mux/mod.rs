pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use uuid::Uuid;

use crate::error::AppError;
use self::dto::{Asset, CreateAssetRequest, CreateAssetResponse};

const MUX_API_BASE: &str = "https://api.mux.com";

#[derive(Clone, Debug)]
pub struct MuxConfig {
    pub token_id: String,
    pub token_secret: String,
}

impl MuxConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let token_id = env::var("MUX_TOKEN_ID")
            .map_err(|_| AppError::Config("MUX_TOKEN_ID is not set".to_string()))?;
        let token_secret = env::var("MUX_TOKEN_SECRET")
            .map_err(|_| AppError::Config("MUX_TOKEN_SECRET is not set".to_string()))?;

        Ok(Self {
            token_id,
            token_secret,
        })
    }
}

#[async_trait]
pub trait VideoClient: Send + Sync {
    async fn create_asset(&self, input_url: &str) -> Result<Asset, AppError>;
    async fn delete_asset(&self, asset_id: &str) -> Result<(), AppError>;
}

pub struct MuxHttpClient {
    client: Client,
    config: MuxConfig,
}

impl MuxHttpClient {
    pub fn new(config: MuxConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl VideoClient for MuxHttpClient {
    async fn create_asset(&self, input_url: &str) -> Result<Asset, AppError> {
        let url = format!("{}/video/v1/assets", MUX_API_BASE);

        let request_body = CreateAssetRequest {
            input: input_url.to_string(),
            playback_policy: vec!["public".to_string()],
            test: false,
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.token_id, Some(&self.config.token_secret))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::VideoProvider(format!("create asset request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::VideoProvider(format!(
                "create asset failed {}: {}",
                status, body
            )));
        }

        let parsed: CreateAssetResponse = response
            .json()
            .await
            .map_err(|e| AppError::VideoProvider(format!("failed to parse asset response: {}", e)))?;

        Ok(parsed.data)
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), AppError> {
        let url = format!("{}/video/v1/assets/{}", MUX_API_BASE, asset_id);

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.token_id, Some(&self.config.token_secret))
            .send()
            .await
            .map_err(|e| AppError::VideoProvider(format!("delete asset request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::VideoProvider(format!(
                "delete asset {} failed {}: {}",
                asset_id, status, body
            )));
        }

        Ok(())
    }
}

/// Inert client used when provider credentials are absent. Created assets
/// get a synthetic id and no playback ids.
pub struct NoopVideoClient;

#[async_trait]
impl VideoClient for NoopVideoClient {
    async fn create_asset(&self, _input_url: &str) -> Result<Asset, AppError> {
        Ok(Asset {
            id: Uuid::new_v4().to_string(),
            playback_ids: Vec::new(),
            status: None,
        })
    }

    async fn delete_asset(&self, _asset_id: &str) -> Result<(), AppError> {
        Ok(())
    }
}
