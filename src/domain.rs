use crate::errors::RepoError;
use crate::models::{Category, CategoryWithCount, NewCategory, NewPhoto, PageRequest, Photo};
use async_trait::async_trait;

/// Trait defining operations for storing and retrieving photo categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Lists all categories ordered by sort order, then name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    /// Same ordering as [`Self::list_all`], with each category's photo count.
    async fn list_all_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    /// Returns Ok(None) if the category is not found.
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, RepoError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    async fn create(&self, category: &NewCategory) -> Result<Category, RepoError>;

    /// Upserts the category under `id`, keeping `created_at` of an existing row.
    async fn update(&self, id: i64, category: &NewCategory) -> Result<Category, RepoError>;

    /// Deletes the category and, through the foreign key, its photos.
    /// Returns the number of category rows removed.
    async fn delete(&self, id: i64) -> Result<u64, RepoError>;
}

/// Trait defining operations for storing and retrieving photos.
///
/// Listings use sort order ascending, then newest first. Likes listings use
/// likes descending, then newest first.
#[async_trait]
pub trait PhotoRepository: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Photo>, RepoError>;

    async fn list_all_paged(&self, page: PageRequest) -> Result<Vec<Photo>, RepoError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError>;

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Photo>, RepoError>;

    async fn list_by_category_paged(
        &self,
        category_id: i64,
        page: PageRequest,
    ) -> Result<Vec<Photo>, RepoError>;

    async fn list_featured(&self) -> Result<Vec<Photo>, RepoError>;

    async fn list_by_likes(&self) -> Result<Vec<Photo>, RepoError>;

    async fn list_by_category_by_likes(&self, category_id: i64) -> Result<Vec<Photo>, RepoError>;

    async fn top_by_likes(&self, limit: i64) -> Result<Vec<Photo>, RepoError>;

    /// Returns 0 for unknown categories.
    async fn count_by_category(&self, category_id: i64) -> Result<i64, RepoError>;

    /// Case-insensitive substring match against title or description.
    async fn search(
        &self,
        keyword: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<Photo>, RepoError>;

    /// Case-insensitive substring match against location.
    async fn list_by_location(&self, location: &str) -> Result<Vec<Photo>, RepoError>;

    async fn create(&self, photo: &NewPhoto) -> Result<Photo, RepoError>;

    /// Returns Ok(None) if no photo has this id.
    async fn update(&self, id: i64, photo: &NewPhoto) -> Result<Option<Photo>, RepoError>;

    async fn delete(&self, id: i64) -> Result<u64, RepoError>;

    /// Atomically adds one like. Returns Ok(None) if the photo does not exist.
    async fn increment_likes(&self, id: i64) -> Result<Option<Photo>, RepoError>;

    /// Atomically removes one like, never going below zero.
    async fn decrement_likes(&self, id: i64) -> Result<LikeChange, RepoError>;
}

/// Outcome of a conditional like removal.
#[derive(Debug, Clone, PartialEq)]
pub enum LikeChange {
    Updated(Photo),
    AlreadyZero(Photo),
    Missing,
}
