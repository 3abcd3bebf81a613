use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tracing;

use crate::{
    errors::RepoError,
    models::{Category, NewCategory, NewPhoto},
    service::PhotoService,
};

struct SeedCategory {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    icon_color: &'static str,
    sort_order: i64,
}

struct SeedPhoto {
    category: &'static str,
    title: &'static str,
    description: &'static str,
    file_path: &'static str,
    thumbnail_path: &'static str,
    location: &'static str,
    camera_info: &'static str,
    featured: bool,
    sort_order: i64,
    taken_on: (i32, u32, u32),
    file_size: i64,
}

const DEFAULT_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "nature",
        display_name: "Nature Photography",
        description: "Beautiful landscapes, wildlife, and natural scenes",
        icon_color: "#10B981",
        sort_order: 1,
    },
    SeedCategory {
        name: "street",
        display_name: "Street Photography",
        description: "Urban life, people, and candid moments",
        icon_color: "#6B7280",
        sort_order: 2,
    },
    SeedCategory {
        name: "portrait",
        display_name: "Portrait Photography",
        description: "People portraits and character studies",
        icon_color: "#EC4899",
        sort_order: 3,
    },
    SeedCategory {
        name: "travel",
        display_name: "Travel Photography",
        description: "Adventures and places around the world",
        icon_color: "#3B82F6",
        sort_order: 4,
    },
];

const SAMPLE_PHOTOS: &[SeedPhoto] = &[
    SeedPhoto {
        category: "nature",
        title: "Mountain Sunrise",
        description: "Golden hour over the mountain peaks",
        file_path: "/images/photography/nature/mountain-sunrise.jpg",
        thumbnail_path: "/images/photography/nature/thumbs/mountain-sunrise-thumb.jpg",
        location: "Rocky Mountains, Colorado",
        camera_info: "Canon EOS R5",
        featured: true,
        sort_order: 1,
        taken_on: (2024, 9, 7),
        file_size: 4_812_330,
    },
    SeedPhoto {
        category: "nature",
        title: "Forest Stream",
        description: "Peaceful stream flowing through autumn forest",
        file_path: "/images/photography/nature/forest-stream.jpg",
        thumbnail_path: "/images/photography/nature/thumbs/forest-stream-thumb.jpg",
        location: "Pacific Northwest",
        camera_info: "Nikon D850",
        featured: false,
        sort_order: 2,
        taken_on: (2024, 10, 19),
        file_size: 3_204_118,
    },
    SeedPhoto {
        category: "street",
        title: "City Rush",
        description: "People rushing through the busy intersection",
        file_path: "/images/photography/street/city-rush.jpg",
        thumbnail_path: "/images/photography/street/thumbs/city-rush-thumb.jpg",
        location: "New York City",
        camera_info: "Fujifilm X-T4",
        featured: true,
        sort_order: 1,
        taken_on: (2025, 3, 2),
        file_size: 2_751_904,
    },
    SeedPhoto {
        category: "street",
        title: "Coffee Shop Moments",
        description: "Candid scene from a local coffee shop",
        file_path: "/images/photography/street/coffee-shop.jpg",
        thumbnail_path: "/images/photography/street/thumbs/coffee-shop-thumb.jpg",
        location: "San Francisco",
        camera_info: "Leica Q2",
        featured: false,
        sort_order: 2,
        taken_on: (2024, 11, 23),
        file_size: 1_988_412,
    },
    SeedPhoto {
        category: "portrait",
        title: "Artist at Work",
        description: "Portrait of a painter in her studio",
        file_path: "/images/photography/portrait/artist-work.jpg",
        thumbnail_path: "/images/photography/portrait/thumbs/artist-work-thumb.jpg",
        location: "Studio, Brooklyn",
        camera_info: "Canon 5D Mark IV",
        featured: true,
        sort_order: 1,
        taken_on: (2024, 6, 15),
        file_size: 5_430_076,
    },
    SeedPhoto {
        category: "portrait",
        title: "Young Entrepreneur",
        description: "Professional headshot for business profile",
        file_path: "/images/photography/portrait/entrepreneur.jpg",
        thumbnail_path: "/images/photography/portrait/thumbs/entrepreneur-thumb.jpg",
        location: "Silicon Valley",
        camera_info: "Sony A7R IV",
        featured: false,
        sort_order: 2,
        taken_on: (2024, 5, 4),
        file_size: 1_402_559,
    },
    SeedPhoto {
        category: "travel",
        title: "Ancient Temple",
        description: "Sunrise over ancient temple complex",
        file_path: "/images/photography/travel/ancient-temple.jpg",
        thumbnail_path: "/images/photography/travel/thumbs/ancient-temple-thumb.jpg",
        location: "Angkor Wat, Cambodia",
        camera_info: "Canon EOS R6",
        featured: true,
        sort_order: 1,
        taken_on: (2024, 1, 13),
        file_size: 5_912_740,
    },
    SeedPhoto {
        category: "travel",
        title: "Market Vendors",
        description: "Colorful spices at traditional market",
        file_path: "/images/photography/travel/market-vendors.jpg",
        thumbnail_path: "/images/photography/travel/thumbs/market-vendors-thumb.jpg",
        location: "Marrakech, Morocco",
        camera_info: "Fujifilm X-Pro3",
        featured: false,
        sort_order: 2,
        taken_on: (2024, 2, 24),
        file_size: 3_667_205,
    },
];

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub photos_created: usize,
}

/// Populates the default categories and their sample photos.
///
/// Categories are only inserted into an empty store, and sample photos only
/// into default categories that own no photos yet. Failures of single items
/// are logged and skipped.
pub async fn seed_sample_data(service: &PhotoService) -> Result<SeedReport, RepoError> {
    let mut report = SeedReport {
        categories_created: seed_categories(service).await?,
        photos_created: 0,
    };

    let categories = service.list_categories().await?;
    if categories.is_empty() {
        tracing::warn!("Seed: No photo categories found, skipping sample photos");
        return Ok(report);
    }

    for category in &categories {
        report.photos_created += seed_photos_for(service, category).await?;
    }

    tracing::info!(
        categories = report.categories_created,
        photos = report.photos_created,
        "Seed: Sample data initialization complete"
    );
    Ok(report)
}

async fn seed_categories(service: &PhotoService) -> Result<usize, RepoError> {
    if !service.list_categories().await?.is_empty() {
        tracing::info!("Seed: Photo categories already exist, skipping");
        return Ok(0);
    }

    let mut created = 0;
    for seed in DEFAULT_CATEGORIES {
        let category = NewCategory {
            name: seed.name.to_string(),
            display_name: seed.display_name.to_string(),
            description: Some(seed.description.to_string()),
            icon_color: Some(seed.icon_color.to_string()),
            sort_order: seed.sort_order,
        };
        match service.create_category(&category).await {
            Ok(saved) => {
                tracing::info!(
                    category_id = saved.id,
                    "Seed: Created photo category '{}'",
                    saved.display_name
                );
                created += 1;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Seed: Failed to create photo category '{}'",
                    seed.display_name
                );
            }
        }
    }
    Ok(created)
}

async fn seed_photos_for(service: &PhotoService, category: &Category) -> Result<usize, RepoError> {
    let name = category.name.to_lowercase();
    let samples: Vec<&SeedPhoto> = SAMPLE_PHOTOS.iter().filter(|p| p.category == name).collect();
    if samples.is_empty() {
        tracing::debug!(category = %category.name, "Seed: No sample photos for category");
        return Ok(0);
    }
    if service.count_photos_by_category(category.id).await? > 0 {
        tracing::debug!(category = %category.name, "Seed: Category already has photos, skipping");
        return Ok(0);
    }

    let mut created = 0;
    for sample in samples {
        let photo = NewPhoto {
            category_id: category.id,
            title: sample.title.to_string(),
            description: Some(sample.description.to_string()),
            file_path: sample.file_path.to_string(),
            thumbnail_path: Some(sample.thumbnail_path.to_string()),
            metadata: Some(json!({
                "aperture": "f/2.8",
                "shutterSpeed": "1/125",
                "iso": 800,
                "focalLength": "85mm"
            })),
            taken_at: taken_at(sample.taken_on),
            location: Some(sample.location.to_string()),
            camera_info: Some(sample.camera_info.to_string()),
            file_size: Some(sample.file_size),
            dimensions: Some("1920x1080".to_string()),
            sort_order: sample.sort_order,
            is_featured: sample.featured,
        };
        match service.create_photo(&photo).await {
            Ok(saved) => {
                tracing::info!(
                    photo_id = saved.id,
                    "Seed: Created sample photo '{}' for '{}'",
                    saved.title,
                    category.display_name
                );
                created += 1;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Seed: Failed to create sample photo '{}' for '{}'",
                    sample.title,
                    category.display_name
                );
            }
        }
    }
    Ok(created)
}

/// Sample capture time: 09:00 UTC on the given day.
fn taken_at((year, month, day): (i32, u32, u32)) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(9, 0, 0)
        .map(|naive| naive.and_utc())
}
