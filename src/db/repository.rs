use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    Chapter, Course, NewChapterRequest, NewCourseRequest, UpdateChapterRequest,
    UpdateCourseRequest, VideoAsset,
};

const COURSE_COLUMNS: &str =
    "id, user_id, title, description, image_url, is_published, created_at, updated_at";

const CHAPTER_COLUMNS: &str =
    "id, course_id, title, description, video_url, position, is_published, is_free, created_at, updated_at";

const VIDEO_ASSET_COLUMNS: &str = "id, chapter_id, asset_id, playback_id, created_at";

pub async fn insert_course(
    db: &SqlitePool,
    user_id: &str,
    req: NewCourseRequest,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO courses (id, user_id, title, description, image_url, is_published, created_at, updated_at) \
         VALUES (?, ?, ?, NULL, NULL, 0, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(&req.title)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        user_id: user_id.to_string(),
        title: req.title,
        description: None,
        image_url: None,
        is_published: false,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Owner check and lookup in one query: returns the course only when it
/// belongs to `user_id`.
pub async fn find_course_for_owner(
    db: &SqlitePool,
    course_id: &str,
    user_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE id = ? AND user_id = ?"
    ))
    .bind(course_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn update_course(
    db: &SqlitePool,
    course_id: &str,
    user_id: &str,
    req: UpdateCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let mut current = match find_course_for_owner(db, course_id, user_id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title;
    }
    if let Some(description) = req.description {
        current.description = Some(description);
    }
    if let Some(image_url) = req.image_url {
        current.image_url = Some(image_url);
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE courses SET title = ?, description = ?, image_url = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(&current.image_url)
    .bind(&current.updated_at)
    .bind(course_id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn insert_chapter(
    db: &SqlitePool,
    course_id: &str,
    req: NewChapterRequest,
) -> Result<Chapter, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let last: Option<(i64,)> = sqlx::query_as(
        "SELECT position FROM chapters WHERE course_id = ? ORDER BY position DESC LIMIT 1",
    )
    .bind(course_id)
    .fetch_optional(db)
    .await?;
    let position = last.map(|(p,)| p + 1).unwrap_or(1);

    sqlx::query(
        "INSERT INTO chapters (id, course_id, title, description, video_url, position, is_published, is_free, created_at, updated_at) \
         VALUES (?, ?, ?, NULL, NULL, ?, 0, 0, ?, ?)",
    )
    .bind(&id)
    .bind(course_id)
    .bind(&req.title)
    .bind(position)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Chapter {
        id,
        course_id: course_id.to_string(),
        title: req.title,
        description: None,
        video_url: None,
        position,
        is_published: false,
        is_free: false,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn find_chapter(
    db: &SqlitePool,
    chapter_id: &str,
    course_id: &str,
) -> Result<Option<Chapter>, sqlx::Error> {
    sqlx::query_as::<_, Chapter>(&format!(
        "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = ? AND course_id = ?"
    ))
    .bind(chapter_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

/// Applies the supplied fields to the chapter. The payload's
/// `is_published` flag is not persisted here.
pub async fn update_chapter(
    db: &SqlitePool,
    chapter_id: &str,
    course_id: &str,
    req: UpdateChapterRequest,
) -> Result<Option<Chapter>, sqlx::Error> {
    let mut current = match find_chapter(db, chapter_id, course_id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title;
    }
    if let Some(description) = req.description {
        current.description = Some(description);
    }
    if let Some(video_url) = req.video_url {
        current.video_url = Some(video_url);
    }
    if let Some(is_free) = req.is_free {
        current.is_free = is_free;
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE chapters SET title = ?, description = ?, video_url = ?, is_free = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(&current.video_url)
    .bind(current.is_free)
    .bind(&current.updated_at)
    .bind(chapter_id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn find_video_asset_by_chapter(
    db: &SqlitePool,
    chapter_id: &str,
) -> Result<Option<VideoAsset>, sqlx::Error> {
    sqlx::query_as::<_, VideoAsset>(&format!(
        "SELECT {VIDEO_ASSET_COLUMNS} FROM video_assets WHERE chapter_id = ? LIMIT 1"
    ))
    .bind(chapter_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_video_asset(
    db: &SqlitePool,
    chapter_id: &str,
    asset_id: &str,
    playback_id: Option<&str>,
) -> Result<VideoAsset, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO video_assets (id, chapter_id, asset_id, playback_id, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(chapter_id)
    .bind(asset_id)
    .bind(playback_id)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(VideoAsset {
        id,
        chapter_id: chapter_id.to_string(),
        asset_id: asset_id.to_string(),
        playback_id: playback_id.map(|p| p.to_string()),
        created_at: now,
    })
}

pub async fn delete_video_asset(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM video_assets WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        // Single connection so every query sees the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    async fn test_insert_and_find_course() {
        let pool = setup_test_db().await;

        let req = NewCourseRequest {
            title: "Advanced Web Development".to_string(),
        };

        let course = insert_course(&pool, "instructor-1", req)
            .await
            .expect("Failed to insert course");
        assert_eq!(course.title, "Advanced Web Development");
        assert_eq!(course.user_id, "instructor-1");
        assert!(!course.is_published);

        let found = find_course_for_owner(&pool, &course.id, "instructor-1")
            .await
            .expect("Failed to find course");
        assert_eq!(found.map(|c| c.id), Some(course.id));
    }

    #[tokio::test]
    async fn test_owner_lookup_rejects_other_user() {
        let pool = setup_test_db().await;

        let course = insert_course(
            &pool,
            "instructor-1",
            NewCourseRequest {
                title: "Advanced Web Development".to_string(),
            },
        )
        .await
        .expect("Failed to insert course");

        let found = find_course_for_owner(&pool, &course.id, "someone-else")
            .await
            .expect("Failed to query course");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_course_applies_partial_fields() {
        let pool = setup_test_db().await;

        let course = insert_course(
            &pool,
            "instructor-1",
            NewCourseRequest {
                title: "Advanced Web Development".to_string(),
            },
        )
        .await
        .expect("Failed to insert course");

        let req = UpdateCourseRequest {
            description: Some("Build a full-stack app from scratch".to_string()),
            ..Default::default()
        };
        let updated = update_course(&pool, &course.id, "instructor-1", req)
            .await
            .expect("Failed to update course")
            .expect("Course not found");

        assert_eq!(updated.title, "Advanced Web Development");
        assert_eq!(
            updated.description.as_deref(),
            Some("Build a full-stack app from scratch")
        );

        let refetched = find_course_for_owner(&pool, &course.id, "instructor-1")
            .await
            .expect("Failed to refetch course")
            .expect("Course not found");
        assert_eq!(refetched.description, updated.description);
    }

    #[tokio::test]
    async fn test_chapter_positions_increment() {
        let pool = setup_test_db().await;

        let course = insert_course(
            &pool,
            "instructor-1",
            NewCourseRequest {
                title: "Advanced Web Development".to_string(),
            },
        )
        .await
        .expect("Failed to insert course");

        let first = insert_chapter(
            &pool,
            &course.id,
            NewChapterRequest {
                title: "Introduction".to_string(),
            },
        )
        .await
        .expect("Failed to insert chapter");
        let second = insert_chapter(
            &pool,
            &course.id,
            NewChapterRequest {
                title: "Setup".to_string(),
            },
        )
        .await
        .expect("Failed to insert chapter");

        assert_eq!(first.position, 1);
        assert_eq!(second.position, 2);
    }

    #[tokio::test]
    async fn test_update_chapter_ignores_is_published() {
        let pool = setup_test_db().await;

        let course = insert_course(
            &pool,
            "instructor-1",
            NewCourseRequest {
                title: "Advanced Web Development".to_string(),
            },
        )
        .await
        .expect("Failed to insert course");
        let chapter = insert_chapter(
            &pool,
            &course.id,
            NewChapterRequest {
                title: "Introduction".to_string(),
            },
        )
        .await
        .expect("Failed to insert chapter");

        let req = UpdateChapterRequest {
            title: Some("Introduction and goals".to_string()),
            is_published: Some(true),
            ..Default::default()
        };
        let updated = update_chapter(&pool, &chapter.id, &course.id, req)
            .await
            .expect("Failed to update chapter")
            .expect("Chapter not found");

        assert_eq!(updated.title, "Introduction and goals");
        assert!(!updated.is_published);

        let refetched = find_chapter(&pool, &chapter.id, &course.id)
            .await
            .expect("Failed to refetch chapter")
            .expect("Chapter not found");
        assert!(!refetched.is_published);
    }

    #[tokio::test]
    async fn test_video_asset_roundtrip() {
        let pool = setup_test_db().await;

        let course = insert_course(
            &pool,
            "instructor-1",
            NewCourseRequest {
                title: "Advanced Web Development".to_string(),
            },
        )
        .await
        .expect("Failed to insert course");
        let chapter = insert_chapter(
            &pool,
            &course.id,
            NewChapterRequest {
                title: "Introduction".to_string(),
            },
        )
        .await
        .expect("Failed to insert chapter");

        assert!(
            find_video_asset_by_chapter(&pool, &chapter.id)
                .await
                .expect("Failed to query asset")
                .is_none()
        );

        let record = insert_video_asset(&pool, &chapter.id, "asset-1", Some("playback-1"))
            .await
            .expect("Failed to insert asset record");
        assert_eq!(record.asset_id, "asset-1");
        assert_eq!(record.playback_id.as_deref(), Some("playback-1"));

        let found = find_video_asset_by_chapter(&pool, &chapter.id)
            .await
            .expect("Failed to query asset")
            .expect("Asset record not found");
        assert_eq!(found.id, record.id);

        assert!(
            delete_video_asset(&pool, &record.id)
                .await
                .expect("Failed to delete asset record")
        );
        assert!(
            find_video_asset_by_chapter(&pool, &chapter.id)
                .await
                .expect("Failed to query asset")
                .is_none()
        );
    }
}
