use crate::{
    domain::{CategoryRepository, LikeChange, PhotoRepository},
    errors::RepoError,
    models::{Category, CategoryWithCount, NewCategory, NewPhoto, PageRequest, Photo},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, QueryBuilder, Sqlite, SqlitePool};
use tracing::{self, info};

/// Sort order ascending, then newest first.
const LISTING_ORDER: &str = " order by sort_order asc, created_at desc, id desc";
const LIKES_ORDER: &str = " order by likes_count desc, created_at desc, id desc";

const BEGIN_FAILED: &str = "SQLite: Failed to begin transaction";

fn db_err(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> RepoError {
    let context = context.into();
    move |e| RepoError::from_sqlx(e, context)
}

#[derive(Debug, Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        info!("Initializing SqliteCategoryRepository");
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        sqlx::query_as::<_, Category>(
            "select * from photo_categories order by sort_order asc, name asc",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("SQLite: Failed to list photo categories"))
    }

    async fn list_all_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        sqlx::query_as::<_, CategoryWithCount>(
            "select c.*, count(p.id) as photo_count
            from photo_categories c
            left join photos p on p.category_id = c.id
            group by c.id
            order by c.sort_order asc, c.name asc",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("SQLite: Failed to list photo categories with counts"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        sqlx::query_as::<_, Category>("select * from photo_categories where id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to get photo category (id: {id})")))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        sqlx::query_as::<_, Category>("select * from photo_categories where name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to get photo category (name: {name})")))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "select exists(select 1 from photo_categories where name = ?)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err(format!("SQLite: Failed to check photo category (name: {name})")))
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, RepoError> {
        category.validate()?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let created = sqlx::query_as::<_, Category>(
            "insert into photo_categories
                (name, display_name, description, icon_color, sort_order, created_at, updated_at)
            values (?, ?, ?, ?, ?, ?, ?)
            returning *",
        )
        .bind(&category.name)
        .bind(&category.display_name)
        .bind(&category.description)
        .bind(&category.icon_color)
        .bind(category.sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err(format!(
            "SQLite: Failed to insert photo category (name: {})",
            category.name
        )))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit photo category insert"))?;

        tracing::debug!(
            category_id = created.id,
            name = %created.name,
            "SQLite: Photo category created"
        );
        Ok(created)
    }

    async fn update(&self, id: i64, category: &NewCategory) -> Result<Category, RepoError> {
        category.validate()?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let stored = sqlx::query_as::<_, Category>(
            "insert into photo_categories
                (id, name, display_name, description, icon_color, sort_order,
                created_at, updated_at)
            values (?, ?, ?, ?, ?, ?, ?, ?)
            on conflict (id) do update set
                name = excluded.name,
                display_name = excluded.display_name,
                description = excluded.description,
                icon_color = excluded.icon_color,
                sort_order = excluded.sort_order,
                updated_at = excluded.updated_at
            returning *",
        )
        .bind(id)
        .bind(&category.name)
        .bind(&category.display_name)
        .bind(&category.description)
        .bind(&category.icon_color)
        .bind(category.sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err(format!("SQLite: Failed to upsert photo category (id: {id})")))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit photo category upsert"))?;

        tracing::debug!(category_id = id, "SQLite: Photo category stored");
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<u64, RepoError> {
        tracing::debug!(category_id = id, "SQLite: Deleting photo category");

        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let rows_deleted = sqlx::query("delete from photo_categories where id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|result| result.rows_affected())
            .map_err(db_err(format!("SQLite: Failed to delete photo category (id: {id})")))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit photo category delete"))?;

        Ok(rows_deleted)
    }
}

#[derive(Debug, Clone)]
pub struct SqlitePhotoRepository {
    pool: SqlitePool,
}

impl SqlitePhotoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        info!("Initializing SqlitePhotoRepository");
        Self { pool }
    }

    async fn fetch_list(&self, sql: &str, what: &str) -> Result<Vec<Photo>, RepoError> {
        let photos = sqlx::query_as::<_, Photo>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to list {what}")))?;
        tracing::debug!("SQLite: Listed {} {}", photos.len(), what);
        Ok(photos)
    }
}

#[async_trait]
impl PhotoRepository for SqlitePhotoRepository {
    async fn list_all(&self) -> Result<Vec<Photo>, RepoError> {
        self.fetch_list(&format!("select * from photos{LISTING_ORDER}"), "photos")
            .await
    }

    async fn list_all_paged(&self, page: PageRequest) -> Result<Vec<Photo>, RepoError> {
        let sql = format!("select * from photos{LISTING_ORDER} limit ? offset ?");
        sqlx::query_as::<_, Photo>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to page photos (page: {})", page.page)))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Photo>, RepoError> {
        sqlx::query_as::<_, Photo>("select * from photos where id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to get photo (id: {id})")))
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Photo>, RepoError> {
        let sql = format!("select * from photos where category_id = ?{LISTING_ORDER}");
        sqlx::query_as::<_, Photo>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!(
                "SQLite: Failed to list photos (category: {category_id})"
            )))
    }

    async fn list_by_category_paged(
        &self,
        category_id: i64,
        page: PageRequest,
    ) -> Result<Vec<Photo>, RepoError> {
        let sql =
            format!("select * from photos where category_id = ?{LISTING_ORDER} limit ? offset ?");
        sqlx::query_as::<_, Photo>(&sql)
            .bind(category_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!(
                "SQLite: Failed to page photos (category: {category_id}, page: {})",
                page.page
            )))
    }

    async fn list_featured(&self) -> Result<Vec<Photo>, RepoError> {
        let sql = format!("select * from photos where is_featured = 1{LISTING_ORDER}");
        self.fetch_list(&sql, "featured photos").await
    }

    async fn list_by_likes(&self) -> Result<Vec<Photo>, RepoError> {
        self.fetch_list(&format!("select * from photos{LIKES_ORDER}"), "photos by likes")
            .await
    }

    async fn list_by_category_by_likes(&self, category_id: i64) -> Result<Vec<Photo>, RepoError> {
        let sql = format!("select * from photos where category_id = ?{LIKES_ORDER}");
        sqlx::query_as::<_, Photo>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!(
                "SQLite: Failed to list photos by likes (category: {category_id})"
            )))
    }

    async fn top_by_likes(&self, limit: i64) -> Result<Vec<Photo>, RepoError> {
        sqlx::query_as::<_, Photo>(&format!("select * from photos{LIKES_ORDER} limit ?"))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to list top {limit} photos")))
    }

    async fn count_by_category(&self, category_id: i64) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>("select count(*) from photos where category_id = ?")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err(format!(
                "SQLite: Failed to count photos (category: {category_id})"
            )))
    }

    async fn search(
        &self,
        keyword: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<Photo>, RepoError> {
        let pattern = contains_pattern(keyword);

        // The search_* columns hold the same folding as the pattern
        let mut builder =
            QueryBuilder::<Sqlite>::new("select * from photos where search_title like ");
        builder
            .push_bind(&pattern)
            .push(r" escape '\' or search_description like ")
            .push_bind(&pattern)
            .push(r" escape '\'")
            .push(LISTING_ORDER);
        if let Some(page) = page {
            builder
                .push(" limit ")
                .push_bind(page.limit())
                .push(" offset ")
                .push_bind(page.offset());
        }

        let photos = builder
            .build_query_as::<Photo>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to search photos (keyword: {keyword})")))?;

        tracing::debug!(%keyword, matches = photos.len(), "SQLite: Photo search complete");
        Ok(photos)
    }

    async fn list_by_location(&self, location: &str) -> Result<Vec<Photo>, RepoError> {
        let sql = format!(
            r"select * from photos where search_location like ? escape '\'{LISTING_ORDER}"
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(contains_pattern(location))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err(format!("SQLite: Failed to list photos (location: {location})")))
    }

    async fn create(&self, photo: &NewPhoto) -> Result<Photo, RepoError> {
        photo.validate()?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let created = sqlx::query_as::<_, Photo>(
            "insert into photos (category_id, title, description, file_path, thumbnail_path,
                metadata, taken_at, location, camera_info, file_size, dimensions, sort_order,
                is_featured, likes_count, created_at, updated_at, search_title,
                search_description, search_location)
            values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)
            returning *",
        )
        .bind(photo.category_id)
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.file_path)
        .bind(&photo.thumbnail_path)
        .bind(photo.metadata.as_ref().map(Json))
        .bind(photo.taken_at)
        .bind(&photo.location)
        .bind(&photo.camera_info)
        .bind(photo.file_size)
        .bind(&photo.dimensions)
        .bind(photo.sort_order)
        .bind(photo.is_featured)
        .bind(now)
        .bind(now)
        .bind(fold(&photo.title))
        .bind(fold_optional(photo.description.as_deref()))
        .bind(fold_optional(photo.location.as_deref()))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err(format!("SQLite: Failed to insert photo (title: {})", photo.title)))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit photo insert"))?;

        tracing::debug!(
            photo_id = created.id,
            category_id = created.category_id,
            "SQLite: Photo created"
        );
        Ok(created)
    }

    async fn update(&self, id: i64, photo: &NewPhoto) -> Result<Option<Photo>, RepoError> {
        photo.validate()?;

        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let updated = sqlx::query_as::<_, Photo>(
            "update photos set category_id = ?, title = ?, description = ?, file_path = ?,
                thumbnail_path = ?, metadata = ?, taken_at = ?, location = ?, camera_info = ?,
                file_size = ?, dimensions = ?, sort_order = ?, is_featured = ?, updated_at = ?,
                search_title = ?, search_description = ?, search_location = ?
            where id = ?
            returning *",
        )
        .bind(photo.category_id)
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.file_path)
        .bind(&photo.thumbnail_path)
        .bind(photo.metadata.as_ref().map(Json))
        .bind(photo.taken_at)
        .bind(&photo.location)
        .bind(&photo.camera_info)
        .bind(photo.file_size)
        .bind(&photo.dimensions)
        .bind(photo.sort_order)
        .bind(photo.is_featured)
        .bind(Utc::now())
        .bind(fold(&photo.title))
        .bind(fold_optional(photo.description.as_deref()))
        .bind(fold_optional(photo.location.as_deref()))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err(format!("SQLite: Failed to update photo (id: {id})")))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit photo update"))?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<u64, RepoError> {
        tracing::debug!(photo_id = id, "SQLite: Deleting photo");

        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let rows_deleted = sqlx::query("delete from photos where id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|result| result.rows_affected())
            .map_err(db_err(format!("SQLite: Failed to delete photo (id: {id})")))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit photo delete"))?;

        Ok(rows_deleted)
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<Photo>, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let photo = sqlx::query_as::<_, Photo>(
            "update photos set likes_count = likes_count + 1, updated_at = ?
            where id = ?
            returning *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err(format!("SQLite: Failed to increment likes (id: {id})")))?;

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit like"))?;

        Ok(photo)
    }

    async fn decrement_likes(&self, id: i64) -> Result<LikeChange, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db_err(BEGIN_FAILED))?;

        let updated = sqlx::query_as::<_, Photo>(
            "update photos set likes_count = likes_count - 1, updated_at = ?
            where id = ? and likes_count > 0
            returning *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err(format!("SQLite: Failed to decrement likes (id: {id})")))?;

        let change = match updated {
            Some(photo) => LikeChange::Updated(photo),
            // Nothing matched: either the photo is gone or it has no likes left
            None => sqlx::query_as::<_, Photo>("select * from photos where id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err(format!("SQLite: Failed to get photo (id: {id})")))?
                .map_or(LikeChange::Missing, LikeChange::AlreadyZero),
        };

        tx.commit()
            .await
            .map_err(db_err("SQLite: Failed to commit unlike"))?;

        Ok(change)
    }
}

/// Case folding shared by the stored search columns and the LIKE patterns.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so both sides are folded
/// here instead.
fn fold(text: &str) -> String {
    text.to_lowercase()
}

fn fold_optional(text: Option<&str>) -> String {
    text.map(fold).unwrap_or_default()
}

/// Folded `%keyword%` pattern with LIKE wildcards escaped.
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in fold(keyword).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
