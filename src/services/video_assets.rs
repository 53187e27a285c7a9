use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{error, info};

use crate::db::repository;
use crate::error::AppError;
use crate::models::VideoAsset;
use crate::mux::VideoClient;

/// Replace-on-update of a chapter's provider-hosted video asset.
///
/// No transaction spans the local writes and the provider calls. A
/// failure after the remote asset is created but before the local record
/// is written leaves an orphaned remote asset; the asset id is logged so
/// it can be reconciled.
pub struct VideoAssetService {
    db: SqlitePool,
    video: Arc<dyn VideoClient>,
}

impl VideoAssetService {
    pub fn new(db: SqlitePool, video: Arc<dyn VideoClient>) -> Self {
        Self { db, video }
    }

    pub async fn replace_chapter_asset(
        &self,
        chapter_id: &str,
        input_url: &str,
    ) -> Result<VideoAsset, AppError> {
        if let Some(existing) = repository::find_video_asset_by_chapter(&self.db, chapter_id).await?
        {
            info!(
                "replacing video asset {} for chapter {}",
                existing.asset_id, chapter_id
            );
            self.video.delete_asset(&existing.asset_id).await?;
            repository::delete_video_asset(&self.db, &existing.id).await?;
        }

        let asset = self.video.create_asset(input_url).await?;
        let playback_id = asset.playback_ids.first().map(|p| p.id.as_str());

        let record = repository::insert_video_asset(&self.db, chapter_id, &asset.id, playback_id)
            .await
            .map_err(|e| {
                error!(
                    "asset {} created remotely but local record write failed: {}",
                    asset.id, e
                );
                AppError::Database(e)
            })?;

        Ok(record)
    }
}
