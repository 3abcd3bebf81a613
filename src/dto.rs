//! Request and response payloads of the HTTP API. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RepoError;
use crate::models::{
    Category, CategoryWithCount, NewCategory, NewPhoto, PageRequest, Photo, DEFAULT_ICON_COLOR,
    DEFAULT_PAGE_SIZE,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon_color: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub photo_count: i64,
}

impl CategoryResponse {
    pub fn new(category: Category, photo_count: i64) -> Self {
        Self {
            id: category.id,
            name: category.name,
            display_name: category.display_name,
            description: category.description,
            icon_color: category.icon_color,
            sort_order: category.sort_order,
            created_at: category.created_at,
            updated_at: category.updated_at,
            photo_count,
        }
    }
}

impl From<CategoryWithCount> for CategoryResponse {
    fn from(row: CategoryWithCount) -> Self {
        Self::new(row.category, row.photo_count)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: i64,
    pub category_id: i64,
    /// Display name of the owning category.
    pub category_name: Option<String>,
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
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PhotoResponse {
    pub fn new(photo: Photo, category_name: Option<String>) -> Self {
        Self {
            id: photo.id,
            category_id: photo.category_id,
            category_name,
            title: photo.title,
            description: photo.description,
            file_path: photo.file_path,
            thumbnail_path: photo.thumbnail_path,
            metadata: photo.metadata.map(|json| json.0),
            taken_at: photo.taken_at,
            location: photo.location,
            camera_info: photo.camera_info,
            file_size: photo.file_size,
            dimensions: photo.dimensions,
            sort_order: photo.sort_order,
            is_featured: photo.is_featured,
            likes_count: photo.likes_count,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon_color: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl From<CategoryRequest> for NewCategory {
    fn from(request: CategoryRequest) -> Self {
        NewCategory {
            name: request.name,
            display_name: request.display_name,
            description: request.description,
            icon_color: Some(request.icon_color.unwrap_or_else(|| DEFAULT_ICON_COLOR.to_string())),
            sort_order: request.sort_order,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequest {
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
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_featured: bool,
}

impl From<PhotoRequest> for NewPhoto {
    fn from(request: PhotoRequest) -> Self {
        NewPhoto {
            category_id: request.category_id,
            title: request.title,
            description: request.description,
            file_path: request.file_path,
            thumbnail_path: request.thumbnail_path,
            // JSON null carries no metadata
            metadata: request.metadata.filter(|value| !value.is_null()),
            taken_at: request.taken_at,
            location: request.location,
            camera_info: request.camera_info,
            file_size: request.file_size,
            dimensions: request.dimensions,
            sort_order: request.sort_order,
            is_featured: request.is_featured,
        }
    }
}

/// `?page=&size=` query parameters.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    /// Resolves the window to apply. Without any parameter the result is
    /// `fallback`; a partial window fills in page 0 or the default size.
    pub fn resolve(self, fallback: Option<PageRequest>) -> Result<Option<PageRequest>, RepoError> {
        match (self.page, self.size) {
            (None, None) => Ok(fallback),
            (page, size) => {
                PageRequest::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE)).map(Some)
            }
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl SearchParams {
    pub fn page_params(&self) -> PageParams {
        PageParams { page: self.page, size: self.size }
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct TopParams {
    pub limit: Option<i64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct LocationParams {
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_params_resolution() {
        let none = PageParams::default();
        assert_eq!(none.resolve(None).unwrap(), None);
        assert_eq!(
            none.resolve(Some(PageRequest::default())).unwrap(),
            Some(PageRequest::default())
        );

        let only_size = PageParams { page: None, size: Some(5) };
        assert_eq!(only_size.resolve(None).unwrap(), Some(PageRequest { page: 0, size: 5 }));

        let only_page = PageParams { page: Some(3), size: None };
        assert_eq!(
            only_page.resolve(None).unwrap(),
            Some(PageRequest { page: 3, size: DEFAULT_PAGE_SIZE })
        );

        assert!(PageParams { page: Some(-1), size: Some(2) }.resolve(None).is_err());
        assert!(PageParams { page: Some(0), size: Some(0) }.resolve(None).is_err());
    }

    #[test]
    fn photo_request_reads_camel_case_and_defaults() {
        let request: PhotoRequest = serde_json::from_value(json!({
            "categoryId": 3,
            "title": "Forest Stream",
            "filePath": "/forest.jpg",
            "cameraInfo": "Nikon D850",
            "metadata": null
        }))
        .unwrap();

        let photo = NewPhoto::from(request);
        assert_eq!(photo.category_id, 3);
        assert_eq!(photo.camera_info.as_deref(), Some("Nikon D850"));
        assert_eq!(photo.sort_order, 0);
        assert!(!photo.is_featured);
        assert!(photo.metadata.is_none());
    }

    #[test]
    fn category_request_defaults_icon_color() {
        let request: CategoryRequest = serde_json::from_value(json!({
            "name": "macro",
            "displayName": "Macro Photography"
        }))
        .unwrap();
        let category = NewCategory::from(request);
        assert_eq!(category.icon_color.as_deref(), Some(DEFAULT_ICON_COLOR));
        assert_eq!(category.sort_order, 0);
    }
}
