use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateAssetRequest {
    pub input: String,
    pub playback_policy: Vec<String>,
    pub test: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssetResponse {
    pub data: Asset,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub playback_ids: Vec<PlaybackId>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackId {
    pub id: String,
    #[serde(default)]
    pub policy: Option<String>,
}
