use crate::{
    dto::{
        CategoryRequest, CategoryResponse, LocationParams, PageParams, PhotoRequest, PhotoResponse,
        SearchParams, TopParams,
    },
    errors::{AppError, RepoError},
    extract::{AppJson, AppPath, AppQuery},
    models::{Category, NewCategory, NewPhoto, PageRequest, Photo},
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::{collections::HashMap, sync::Arc};
use tracing;

const DEFAULT_TOP_PHOTOS: i64 = 10;

pub async fn hello() -> &'static str {
    "Photo portfolio backend is running"
}

pub async fn health() -> &'static str {
    "OK"
}

// --- Categories ---

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.service.list_categories_with_counts().await?;
    tracing::debug!("Handler retrieved {} photo categories", categories.len());
    let response: Vec<CategoryResponse> =
        categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(response))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .service
        .get_category(id)
        .await?
        .ok_or(RepoError::category_not_found(id))?;
    Ok(Json(category_response(&state, category).await?))
}

pub async fn get_category_by_name(
    State(state): State<Arc<AppState>>,
    AppPath(name): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .service
        .get_category_by_name(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Photo category not found with name: {name}")))?;
    Ok(Json(category_response(&state, category).await?))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.service.create_category(&NewCategory::from(request)).await?;
    tracing::info!(category_id = category.id, "Photo category created via handler");
    Ok((StatusCode::CREATED, Json(CategoryResponse::new(category, 0))))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.service.update_category(id, &NewCategory::from(request)).await?;
    Ok(Json(category_response(&state, category).await?))
}

/// Deletes the category and every photo it owns.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_category(id).await?;
    tracing::info!(category_id = id, "Photo category deleted via handler");
    Ok(StatusCode::NO_CONTENT)
}

// --- Photos ---

pub async fn list_photos(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.resolve(None)?;
    let photos = state.service.list_photos(page).await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(photo_id = id, "Fetching photo details via handler");
    let photo = state
        .service
        .get_photo(id)
        .await?
        .ok_or(RepoError::photo_not_found(id))?;
    Ok(Json(photo_response(&state, photo).await?))
}

pub async fn create_photo(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<PhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state.service.create_photo(&NewPhoto::from(request)).await?;
    tracing::info!(photo_id = photo.id, "Photo created via handler");
    Ok((StatusCode::CREATED, Json(photo_response(&state, photo).await?)))
}

pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<PhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state.service.update_photo(id, &NewPhoto::from(request)).await?;
    Ok(Json(photo_response(&state, photo).await?))
}

pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_photo(id).await?;
    tracing::info!(photo_id = id, "Photo deleted via handler");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_photos_by_category(
    State(state): State<Arc<AppState>>,
    AppPath(category_id): AppPath<i64>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.resolve(Some(PageRequest::default()))?;
    let photos = state.service.list_photos_by_category(category_id, page).await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn list_popular_photos_by_category(
    State(state): State<Arc<AppState>>,
    AppPath(category_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let photos = state.service.list_popular_photos_by_category(category_id).await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn search_photos(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page_params().resolve(None)?;
    let keyword = params.keyword.as_deref().unwrap_or_default();
    let photos = state.service.search_photos(keyword, page).await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn list_popular_photos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let photos = state.service.list_photos_by_likes().await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn list_top_photos(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<TopParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_PHOTOS);
    let photos = state.service.top_photos_by_likes(limit).await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn list_featured_photos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let photos = state.service.list_featured_photos().await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn list_photos_by_location(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<LocationParams>,
) -> Result<impl IntoResponse, AppError> {
    let location = params.location.as_deref().unwrap_or_default();
    let photos = state.service.list_photos_by_location(location).await?;
    Ok(Json(photo_responses(&state, photos).await?))
}

pub async fn like_photo(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state.service.increment_likes(id).await?;
    tracing::debug!(photo_id = id, likes = photo.likes_count, "Photo liked");
    Ok(Json(photo_response(&state, photo).await?))
}

pub async fn unlike_photo(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state.service.decrement_likes(id).await?;
    tracing::debug!(photo_id = id, likes = photo.likes_count, "Photo unliked");
    Ok(Json(photo_response(&state, photo).await?))
}

// --- Response assembly ---

async fn category_response(
    state: &AppState,
    category: Category,
) -> Result<CategoryResponse, AppError> {
    let photo_count = state.service.count_photos_by_category(category.id).await?;
    Ok(CategoryResponse::new(category, photo_count))
}

async fn photo_response(state: &AppState, photo: Photo) -> Result<PhotoResponse, AppError> {
    let category_name = state
        .service
        .get_category(photo.category_id)
        .await?
        .map(|category| category.display_name);
    Ok(PhotoResponse::new(photo, category_name))
}

/// Resolves category names with one lookup for the whole batch.
async fn photo_responses(
    state: &AppState,
    photos: Vec<Photo>,
) -> Result<Vec<PhotoResponse>, AppError> {
    if photos.is_empty() {
        return Ok(Vec::new());
    }

    let names: HashMap<i64, String> = state
        .service
        .list_categories()
        .await?
        .into_iter()
        .map(|category| (category.id, category.display_name))
        .collect();

    Ok(photos
        .into_iter()
        .map(|photo| {
            let category_name = names.get(&photo.category_id).cloned();
            PhotoResponse::new(photo, category_name)
        })
        .collect())
}
