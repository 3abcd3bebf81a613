use std::sync::Arc;

use crate::{
    domain::{CategoryRepository, LikeChange, PhotoRepository},
    errors::RepoError,
    models::{Category, CategoryWithCount, NewCategory, NewPhoto, PageRequest, Photo},
};

/// Largest N accepted by [`PhotoService::top_photos_by_likes`].
pub const MAX_TOP_PHOTOS: i64 = 100;

/// Orchestrates the category and photo stores.
///
/// Every mutating call maps to exactly one store transaction, and every
/// listing is a single read statement.
#[derive(Clone)]
pub struct PhotoService {
    categories: Arc<dyn CategoryRepository>,
    photos: Arc<dyn PhotoRepository>,
}

impl PhotoService {
    pub fn new(categories: Arc<dyn CategoryRepository>, photos: Arc<dyn PhotoRepository>) -> Self {
        Self { categories, photos }
    }

    // --- Categories ---

    pub async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        self.categories.list_all().await
    }

    pub async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        self.categories.list_all_with_counts().await
    }

    pub async fn get_category(&self, id: i64) -> Result<Option<Category>, RepoError> {
        self.categories.get_by_id(id).await
    }

    pub async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        self.categories.get_by_name(name).await
    }

    pub async fn category_exists(&self, name: &str) -> Result<bool, RepoError> {
        self.categories.exists_by_name(name).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, RepoError> {
        // The unique index still guards against a concurrent insert of the same name
        if self.category_exists(&category.name).await? {
            return Err(RepoError::Conflict(format!(
                "Photo category '{}' already exists",
                category.name
            )));
        }
        let created = self.categories.create(category).await?;
        tracing::info!(category_id = created.id, name = %created.name, "Photo category created");
        Ok(created)
    }

    pub async fn update_category(
        &self,
        id: i64,
        category: &NewCategory,
    ) -> Result<Category, RepoError> {
        self.categories.update(id, category).await
    }

    /// Deletes the category together with all of its photos.
    pub async fn delete_category(&self, id: i64) -> Result<(), RepoError> {
        match self.categories.delete(id).await? {
            0 => Err(RepoError::category_not_found(id)),
            _ => {
                tracing::info!(category_id = id, "Photo category deleted");
                Ok(())
            }
        }
    }

    pub async fn count_photos_by_category(&self, category_id: i64) -> Result<i64, RepoError> {
        self.photos.count_by_category(category_id).await
    }

    // --- Photos ---

    pub async fn list_photos(&self, page: Option<PageRequest>) -> Result<Vec<Photo>, RepoError> {
        match page {
            Some(page) => self.photos.list_all_paged(page).await,
            None => self.photos.list_all().await,
        }
    }

    pub async fn get_photo(&self, id: i64) -> Result<Option<Photo>, RepoError> {
        self.photos.get_by_id(id).await
    }

    pub async fn list_photos_by_category(
        &self,
        category_id: i64,
        page: Option<PageRequest>,
    ) -> Result<Vec<Photo>, RepoError> {
        match page {
            Some(page) => self.photos.list_by_category_paged(category_id, page).await,
            None => self.photos.list_by_category(category_id).await,
        }
    }

    pub async fn list_featured_photos(&self) -> Result<Vec<Photo>, RepoError> {
        self.photos.list_featured().await
    }

    pub async fn list_photos_by_likes(&self) -> Result<Vec<Photo>, RepoError> {
        self.photos.list_by_likes().await
    }

    /// Empty for an unknown category.
    pub async fn list_popular_photos_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Photo>, RepoError> {
        if self.categories.get_by_id(category_id).await?.is_none() {
            return Ok(Vec::new());
        }
        self.photos.list_by_category_by_likes(category_id).await
    }

    pub async fn top_photos_by_likes(&self, limit: i64) -> Result<Vec<Photo>, RepoError> {
        if !(1..=MAX_TOP_PHOTOS).contains(&limit) {
            return Err(RepoError::Validation(format!(
                "limit must be between 1 and {MAX_TOP_PHOTOS}"
            )));
        }
        self.photos.top_by_likes(limit).await
    }

    /// Case-insensitive substring search over title and description.
    /// A blank keyword is rejected rather than matching everything.
    pub async fn search_photos(
        &self,
        keyword: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<Photo>, RepoError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(RepoError::Validation("keyword is required".into()));
        }
        self.photos.search(keyword, page).await
    }

    pub async fn list_photos_by_location(&self, location: &str) -> Result<Vec<Photo>, RepoError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(RepoError::Validation("location is required".into()));
        }
        self.photos.list_by_location(location).await
    }

    pub async fn create_photo(&self, photo: &NewPhoto) -> Result<Photo, RepoError> {
        self.require_category(photo.category_id).await?;
        let created = self.photos.create(photo).await?;
        tracing::info!(photo_id = created.id, category_id = created.category_id, "Photo created");
        Ok(created)
    }

    pub async fn update_photo(&self, id: i64, photo: &NewPhoto) -> Result<Photo, RepoError> {
        self.require_category(photo.category_id).await?;
        self.photos
            .update(id, photo)
            .await?
            .ok_or_else(|| RepoError::photo_not_found(id))
    }

    pub async fn delete_photo(&self, id: i64) -> Result<(), RepoError> {
        match self.photos.delete(id).await? {
            0 => Err(RepoError::photo_not_found(id)),
            _ => Ok(()),
        }
    }

    pub async fn increment_likes(&self, id: i64) -> Result<Photo, RepoError> {
        self.photos
            .increment_likes(id)
            .await?
            .ok_or_else(|| RepoError::photo_not_found(id))
    }

    /// Removes one like. A photo that has no likes left is an invalid state,
    /// distinct from a photo that does not exist.
    pub async fn decrement_likes(&self, id: i64) -> Result<Photo, RepoError> {
        match self.photos.decrement_likes(id).await? {
            LikeChange::Updated(photo) => Ok(photo),
            LikeChange::AlreadyZero(_) => Err(RepoError::InvalidState(format!(
                "Photo {id} has no likes to remove"
            ))),
            LikeChange::Missing => Err(RepoError::photo_not_found(id)),
        }
    }

    async fn require_category(&self, category_id: i64) -> Result<Category, RepoError> {
        self.categories
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| RepoError::category_not_found(category_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::repositories::{SqliteCategoryRepository, SqlitePhotoRepository};

    async fn service() -> PhotoService {
        let pool = connect_in_memory().await.unwrap();
        PhotoService::new(
            Arc::new(SqliteCategoryRepository::new(pool.clone())),
            Arc::new(SqlitePhotoRepository::new(pool)),
        )
    }

    async fn seeded_photo(service: &PhotoService) -> Photo {
        let category = service
            .create_category(&NewCategory::new("travel", "Travel Photography"))
            .await
            .unwrap();
        service
            .create_photo(&NewPhoto::new(category.id, "Ancient Temple", "/temple.jpg"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn increment_then_decrement_restores_likes() {
        let service = service().await;
        let photo = seeded_photo(&service).await;
        service.increment_likes(photo.id).await.unwrap();
        let before = service.get_photo(photo.id).await.unwrap().unwrap().likes_count;

        let liked = service.increment_likes(photo.id).await.unwrap();
        assert_eq!(liked.likes_count, before + 1);
        let unliked = service.decrement_likes(photo.id).await.unwrap();
        assert_eq!(unliked.likes_count, before);
    }

    #[tokio::test]
    async fn decrement_at_zero_is_invalid_state_not_missing() {
        let service = service().await;
        let photo = seeded_photo(&service).await;

        let err = service.decrement_likes(photo.id).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)), "unexpected error: {err:?}");
        assert_eq!(service.get_photo(photo.id).await.unwrap().unwrap().likes_count, 0);

        let err = service.decrement_likes(photo.id + 100).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { .. }), "unexpected error: {err:?}");
        let err = service.increment_likes(photo.id + 100).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { .. }), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn concurrent_likes_are_not_lost() {
        let service = service().await;
        let photo = seeded_photo(&service).await;

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.increment_likes(photo.id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(service.get_photo(photo.id).await.unwrap().unwrap().likes_count, 20);
    }

    #[tokio::test]
    async fn blank_search_keyword_is_rejected() {
        let service = service().await;
        seeded_photo(&service).await;

        for keyword in ["", "   "] {
            let err = service.search_photos(keyword, None).await.unwrap_err();
            assert!(matches!(err, RepoError::Validation(_)));
        }
        assert_eq!(service.search_photos("  temple ", None).await.unwrap().len(), 1);
        assert!(service.search_photos("vista", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn photo_writes_require_an_existing_category() {
        let service = service().await;
        let photo = seeded_photo(&service).await;

        let err = service
            .create_photo(&NewPhoto::new(999, "Lost", "/lost.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: "Photo category", id: 999 }));

        let err = service
            .update_photo(photo.id, &NewPhoto::new(999, "Lost", "/lost.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: "Photo category", .. }));

        let err = service
            .update_photo(photo.id + 1, &NewPhoto::new(photo.category_id, "Gone", "/gone.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: "Photo", .. }));
    }

    #[tokio::test]
    async fn deleting_missing_records_is_not_found() {
        let service = service().await;
        let photo = seeded_photo(&service).await;

        service.delete_photo(photo.id).await.unwrap();
        assert!(matches!(
            service.delete_photo(photo.id).await,
            Err(RepoError::NotFound { .. })
        ));

        service.delete_category(photo.category_id).await.unwrap();
        assert!(matches!(
            service.delete_category(photo.category_id).await,
            Err(RepoError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn popular_by_unknown_category_is_empty() {
        let service = service().await;
        let photo = seeded_photo(&service).await;

        let popular = service.list_popular_photos_by_category(photo.category_id).await.unwrap();
        assert_eq!(popular.len(), 1);
        assert!(service.list_popular_photos_by_category(4242).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn top_limit_is_bounded() {
        let service = service().await;
        seeded_photo(&service).await;

        assert!(service.top_photos_by_likes(0).await.is_err());
        assert!(service.top_photos_by_likes(MAX_TOP_PHOTOS + 1).await.is_err());
        assert_eq!(service.top_photos_by_likes(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unpaged_and_paged_photo_listing() {
        let service = service().await;
        let category = service
            .create_category(&NewCategory::new("nature", "Nature"))
            .await
            .unwrap();
        for i in 0..5 {
            let mut photo = NewPhoto::new(category.id, format!("Photo {i}"), format!("/{i}.jpg"));
            photo.sort_order = i;
            service.create_photo(&photo).await.unwrap();
        }

        assert_eq!(service.list_photos(None).await.unwrap().len(), 5);
        let page = service.list_photos(Some(PageRequest::new(2, 2).unwrap())).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Photo 4");

        let page = service
            .list_photos_by_category(category.id, Some(PageRequest::new(0, 2).unwrap()))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(service.count_photos_by_category(category.id).await.unwrap(), 5);
    }
}
