use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;

use crate::errors::RepoError;

pub const DEFAULT_ICON_COLOR: &str = "#3B82F6";
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon_color: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category row joined with the number of photos it owns.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    pub category: Category,
    pub photo_count: i64,
}

/// Writable fields of a category. Timestamps and id are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon_color: Option<String>,
    pub sort_order: i64,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: None,
            icon_color: Some(DEFAULT_ICON_COLOR.to_string()),
            sort_order: 0,
        }
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        require("name", &self.name, 100)?;
        require("displayName", &self.display_name, 100)?;
        limit("iconColor", self.icon_color.as_deref(), 20)
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub metadata: Option<Json<Value>>,
    pub taken_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub camera_info: Option<String>,
    pub file_size: Option<i64>,
    pub dimensions: Option<String>,
    pub sort_order: i64,
    pub is_featured: bool,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a photo, used for both insert and full update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPhoto {
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub metadata: Option<Value>,
    pub taken_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub camera_info: Option<String>,
    pub file_size: Option<i64>,
    pub dimensions: Option<String>,
    pub sort_order: i64,
    pub is_featured: bool,
}

impl NewPhoto {
    pub fn new(category_id: i64, title: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            category_id,
            title: title.into(),
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        require("title", &self.title, 200)?;
        require("filePath", &self.file_path, 500)?;
        limit("thumbnailPath", self.thumbnail_path.as_deref(), 500)?;
        limit("location", self.location.as_deref(), 200)?;
        limit("cameraInfo", self.camera_info.as_deref(), 200)?;
        limit("dimensions", self.dimensions.as_deref(), 20)?;
        if matches!(self.file_size, Some(size) if size < 0) {
            return Err(RepoError::Validation("fileSize must not be negative".into()));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str, max: usize) -> Result<(), RepoError> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{field} is required")));
    }
    limit(field, Some(value), max)
}

fn limit(field: &str, value: Option<&str>, max: usize) -> Result<(), RepoError> {
    match value {
        Some(value) if value.chars().count() > max => Err(RepoError::Validation(format!(
            "{field} must not exceed {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Zero-based page window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Result<Self, RepoError> {
        if page < 0 {
            return Err(RepoError::Validation("page must not be negative".into()));
        }
        if size <= 0 || size > MAX_PAGE_SIZE {
            return Err(RepoError::Validation(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if page.checked_mul(size).is_none() {
            return Err(RepoError::Validation("page is out of range".into()));
        }
        Ok(Self { page, size })
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: DEFAULT_PAGE_SIZE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_rejects_bad_windows() {
        assert!(PageRequest::new(-1, 10).is_err());
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, -5).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1).is_err());
        assert!(PageRequest::new(i64::MAX, 2).is_err());

        let page = PageRequest::new(2, 2).unwrap();
        assert_eq!(page.offset(), 4);
        assert_eq!(page.limit(), 2);
    }

    #[test]
    fn category_validation_checks_required_and_lengths() {
        assert!(NewCategory::new("nature", "Nature").validate().is_ok());
        assert!(NewCategory::new("   ", "Nature").validate().is_err());
        assert!(NewCategory::new("nature", "").validate().is_err());
        assert!(NewCategory::new("n".repeat(101), "Nature").validate().is_err());

        let mut category = NewCategory::new("nature", "Nature");
        category.icon_color = Some("#".repeat(21));
        assert!(category.validate().is_err());
    }

    #[test]
    fn photo_validation_checks_required_and_lengths() {
        assert!(NewPhoto::new(1, "Sunrise", "/a.jpg").validate().is_ok());
        assert!(NewPhoto::new(1, "", "/a.jpg").validate().is_err());
        assert!(NewPhoto::new(1, "Sunrise", " ").validate().is_err());
        assert!(NewPhoto::new(1, "t".repeat(201), "/a.jpg").validate().is_err());

        let mut photo = NewPhoto::new(1, "Sunrise", "/a.jpg");
        photo.file_size = Some(-1);
        assert!(photo.validate().is_err());

        let mut photo = NewPhoto::new(1, "Sunrise", "/a.jpg");
        photo.dimensions = Some("x".repeat(21));
        assert!(photo.validate().is_err());
    }
}
