use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Local record linking a chapter to its provider-hosted video asset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoAsset {
    pub id: String,
    pub chapter_id: String,
    pub asset_id: String,
    pub playback_id: Option<String>,
    pub created_at: String,
}
