use reqwest::Client;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Course, UpdateCourseRequest};

/// Typed client for the course API, authenticated with a bearer token.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    pub async fn fetch_course(&self, course_id: &str) -> Result<Course, AppError> {
        let url = format!("{}/api/courses/{}", self.base_url, course_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("course fetch request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!("course fetch failed {}: {}", status, body)));
        }

        response
            .json::<Course>()
            .await
            .map_err(|e| AppError::Http(format!("failed to parse course response: {}", e)))
    }

    pub async fn update_course(
        &self,
        course_id: &str,
        req: &UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        let url = format!("{}/api/courses/{}", self.base_url, course_id);

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("course update request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!("course update failed {}: {}", status, body)));
        }

        response
            .json::<Course>()
            .await
            .map_err(|e| AppError::Http(format!("failed to parse course response: {}", e)))
    }
}

/// Edit-in-place state for a course description: a read-only view, an
/// edit mode, and a submit that validates before it sends anything.
pub struct DescriptionForm {
    course_id: String,
    description: String,
    editing: bool,
}

impl DescriptionForm {
    pub fn new(course_id: impl Into<String>, initial_description: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            description: initial_description.into(),
            editing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn toggle_edit(&mut self) {
        self.editing = !self.editing;
    }

    pub fn display_text(&self) -> &str {
        if self.description.is_empty() {
            "No description"
        } else {
            &self.description
        }
    }

    /// Validates the input, sends the update, then re-fetches the course
    /// so the displayed text matches what the server stored. Empty input
    /// fails validation and no request goes out. On success edit mode is
    /// left; on failure the state is untouched and the caller decides
    /// whether to resubmit.
    pub async fn submit(&mut self, client: &ApiClient, input: &str) -> Result<(), AppError> {
        let req = UpdateCourseRequest {
            description: Some(input.to_string()),
            ..Default::default()
        };
        req.validate()?;

        client.update_course(&self.course_id, &req).await?;

        let course = client.fetch_course(&self.course_id).await?;
        self.description = course.description.unwrap_or_default();
        self.editing = false;

        Ok(())
    }
}
