use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use models::{franchise_listing, gallery, industry};
use crate::errors::ServiceError;
use crate::gallery_service::{self, remove_objects_logged};
use crate::storage::{ImageUpload, ObjectStore};
use crate::taxonomy::NamedRef;
use super::domain::{FranchiseInput, FranchiseView};

/// Attach industry and gallery URLs to each row; two extra queries in total.
pub async fn enrich(db: &DatabaseConnection, rows: Vec<franchise_listing::Model>) -> Result<Vec<FranchiseView>, ServiceError> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let industry_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.industry_id).collect();
    let industries = async {
        if industry_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let found = industry::Entity::find()
            .filter(industry::Column::Id.is_in(industry_ids))
            .all(db)
            .await?;
        Ok::<_, ServiceError>(found.into_iter().map(|i| (i.id, i.name)).collect::<HashMap<Uuid, String>>())
    };
    let (industries, mut galleries) = tokio::try_join!(industries, gallery_service::gallery_urls_for(db, &ids))?;

    Ok(rows
        .into_iter()
        .map(|listing| {
            let industry = listing
                .industry_id
                .and_then(|id| industries.get(&id).map(|name| NamedRef { id, name: name.clone() }));
            let gallery_images = galleries.remove(&listing.id).unwrap_or_default();
            FranchiseView { listing, industry, gallery_images }
        })
        .collect())
}

/// Active listings, newest first.
pub async fn list_public(db: &DatabaseConnection) -> Result<Vec<FranchiseView>, ServiceError> {
    let rows = franchise_listing::Entity::find()
        .filter(franchise_listing::Column::IsActive.eq(true))
        .order_by_desc(franchise_listing::Column::CreatedAt)
        .all(db)
        .await?;
    enrich(db, rows).await
}

/// Every listing, newest first.
pub async fn list_admin(db: &DatabaseConnection) -> Result<Vec<FranchiseView>, ServiceError> {
    let rows = franchise_listing::Entity::find()
        .order_by_desc(franchise_listing::Column::CreatedAt)
        .all(db)
        .await?;
    enrich(db, rows).await
}

async fn load_view(db: &DatabaseConnection, id: Uuid, active_only: bool) -> Result<FranchiseView, ServiceError> {
    let mut query = franchise_listing::Entity::find_by_id(id).find_also_related(industry::Entity);
    if active_only {
        query = query.filter(franchise_listing::Column::IsActive.eq(true));
    }
    let (found, images) = tokio::try_join!(
        async { query.one(db).await.map_err(ServiceError::from) },
        gallery_service::list_gallery_images(db, id),
    )?;
    let (listing, industry) = found.ok_or_else(|| ServiceError::not_found("franchise"))?;
    Ok(FranchiseView {
        listing,
        industry: industry.map(|i| NamedRef { id: i.id, name: i.name }),
        gallery_images: images.into_iter().map(|g| g.image_url).collect(),
    })
}

/// Detail page: inactive listings read as missing.
pub async fn get_public(db: &DatabaseConnection, id: Uuid) -> Result<FranchiseView, ServiceError> {
    load_view(db, id, true).await
}

/// Admin edit view, whatever the status.
pub async fn get_complete(db: &DatabaseConnection, id: Uuid) -> Result<FranchiseView, ServiceError> {
    load_view(db, id, false).await
}

/// Upload then insert one gallery row per file, numbering from `start`.
/// Failures are logged and skipped. Returns the URLs that made it in.
async fn attach_gallery(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    franchise_id: Uuid,
    files: &[ImageUpload],
    start: usize,
) -> Vec<String> {
    let mut added = Vec::new();
    let folder = franchise_id.to_string();
    for (i, file) in files.iter().enumerate() {
        let position = start + i;
        let stored = match gallery_service::upload_image(store, file, &folder).await {
            Ok(s) => s,
            Err(e) => {
                warn!(%franchise_id, file = %file.file_name, error = %e, "gallery upload skipped");
                continue;
            }
        };
        let alt = Some(format!("Gallery image {}", position + 1));
        match gallery_service::add_gallery_image(db, franchise_id, &stored.public_url, alt, position as i32).await {
            Ok(_) => added.push(stored.public_url),
            Err(e) => {
                warn!(%franchise_id, error = %e, "gallery row insert failed");
                remove_objects_logged(store, &[stored.public_url]).await;
            }
        }
    }
    added
}

/// Validate, upload the logo, insert the listing, then attach gallery files.
#[instrument(skip_all, fields(brand = %input.brand_name, gallery = gallery.len()))]
pub async fn create(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    input: FranchiseInput,
    logo: Option<ImageUpload>,
    gallery: Vec<ImageUpload>,
) -> Result<franchise_listing::Model, ServiceError> {
    let mut input = input.normalize()?;
    let id = Uuid::new_v4();
    if let Some(logo) = logo.as_ref() {
        let stored = gallery_service::upload_image(store, logo, &id.to_string()).await?;
        input.logo_url = Some(stored.public_url);
    }

    let now = Utc::now();
    let mut am = franchise_listing::ActiveModel {
        id: Set(id),
        status: Set(franchise_listing::STATUS_ACTIVE.to_string()),
        is_active: Set(true),
        logo_url: Set(input.logo_url.take()),
        created_at: Set(now.into()),
        ..Default::default()
    };
    input.apply_to(&mut am);
    let created = am.insert(db).await?;
    info!(%id, "franchise_created");

    if !gallery.is_empty() {
        let added = attach_gallery(db, store, id, &gallery, 0).await;
        info!(%id, added = added.len(), requested = gallery.len(), "franchise_gallery_attached");
    }
    Ok(created)
}

/// Current rows that are neither kept nor freshly uploaded.
pub fn removed_images(current: Vec<gallery::Model>, keep: &[String], fresh: &[String]) -> Vec<gallery::Model> {
    current
        .into_iter()
        .filter(|g| !keep.contains(&g.image_url) && !fresh.contains(&g.image_url))
        .collect()
}

/// Update the row, then sync the gallery: append new files after the current
/// ones and, when a keep list is given, drop what it no longer names.
/// Gallery problems are logged; the row update stands.
#[instrument(skip_all, fields(%id, gallery = gallery.len()))]
pub async fn update(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    id: Uuid,
    input: FranchiseInput,
    logo: Option<ImageUpload>,
    gallery: Vec<ImageUpload>,
) -> Result<franchise_listing::Model, ServiceError> {
    let mut input = input.normalize()?;
    let existing = franchise_listing::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("franchise"))?;
    if let Some(logo) = logo.as_ref() {
        let stored = gallery_service::upload_image(store, logo, &id.to_string()).await?;
        input.logo_url = Some(stored.public_url);
    }
    let keep = input.existing_gallery_images.take();

    let mut am: franchise_listing::ActiveModel = existing.into();
    input.apply_to(&mut am);
    let updated = am.update(db).await?;
    info!("franchise_updated");

    if let Err(e) = sync_gallery(db, store, id, &gallery, keep).await {
        error!(error = %e, "gallery sync failed; listing update kept");
    }
    Ok(updated)
}

async fn sync_gallery(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    id: Uuid,
    files: &[ImageUpload],
    keep: Option<Vec<String>>,
) -> Result<(), ServiceError> {
    let current = gallery_service::list_gallery_images(db, id).await?;
    let fresh = attach_gallery(db, store, id, files, current.len()).await;
    let Some(keep) = keep else { return Ok(()) };

    for row in removed_images(current, &keep, &fresh) {
        if let Err(e) = gallery_service::delete_gallery_image_complete(db, store, row.id).await {
            warn!(image_id = %row.id, error = %e, "gallery image removal failed");
        }
    }
    Ok(())
}

/// Gallery objects and rows first (best-effort), then the listing.
#[instrument(skip(db, store))]
pub async fn delete(db: &DatabaseConnection, store: &dyn ObjectStore, id: Uuid) -> Result<(), ServiceError> {
    if let Err(e) = gallery_service::delete_franchise_gallery(db, store, id).await {
        warn!(error = %e, "gallery cleanup failed; deleting listing anyway");
    }
    let res = franchise_listing::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("franchise"));
    }
    info!("franchise_deleted");
    Ok(())
}

#[instrument(skip(db))]
pub async fn toggle_status(db: &DatabaseConnection, id: Uuid, is_active: bool) -> Result<franchise_listing::Model, ServiceError> {
    let mut am: franchise_listing::ActiveModel = franchise_listing::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("franchise"))?
        .into();
    am.is_active = Set(is_active);
    am.status = Set(franchise_listing::status_for(is_active).to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
