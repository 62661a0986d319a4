//! Franchise gallery images and the public gallery page.
//!
//! Rows live in `gallery`; the image bytes live in the object store. Row and
//! object are removed separately, and a failed object removal never fails the
//! row operation.

use std::collections::HashMap;

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use models::{franchise_listing, gallery, team_action_image};
use crate::errors::ServiceError;
use crate::storage::{check_image, key_from_public_url, object_key, ImageUpload, ObjectStore, StoredObject};

/// Partial update for a gallery row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryPatch {
    pub image_alt_text: Option<String>,
    pub display_order: Option<i32>,
}

/// Card on the public gallery page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub image: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Which collection the public gallery page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GallerySource {
    Franchises,
    Team,
}

impl GallerySource {
    /// `team` selects the team-action images; anything else the franchise gallery.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("team") => GallerySource::Team,
            _ => GallerySource::Franchises,
        }
    }
}

/// Validate and store one image under `folder`.
#[instrument(skip(store, upload), fields(file = %upload.file_name, size = upload.bytes.len()))]
pub async fn upload_image(store: &dyn ObjectStore, upload: &ImageUpload, folder: &str) -> Result<StoredObject, ServiceError> {
    if let Err(e) = check_image(upload, store.max_object_bytes()) {
        common::metrics::IMAGE_UPLOAD_FAILURES_TOTAL.inc();
        return Err(e.into());
    }
    let key = object_key(folder, &upload.file_name, &upload.content_type);
    if let Err(e) = store.put(&key, &upload.bytes).await {
        common::metrics::IMAGE_UPLOAD_FAILURES_TOTAL.inc();
        return Err(e.into());
    }
    common::metrics::IMAGE_UPLOADS_TOTAL.inc();
    let public_url = store.public_url(&key);
    info!(%key, "image_uploaded");
    Ok(StoredObject { key, public_url })
}

#[instrument(skip(db))]
pub async fn add_gallery_image<C: ConnectionTrait>(
    db: &C,
    franchise_id: Uuid,
    image_url: &str,
    alt_text: Option<String>,
    display_order: i32,
) -> Result<gallery::Model, ServiceError> {
    Ok(gallery::create(db, franchise_id, image_url, alt_text, display_order).await?)
}

/// Store `upload` and append it after the listing's current images. The
/// stored object is removed again when the row insert fails.
#[instrument(skip(db, store, upload), fields(file = %upload.file_name))]
pub async fn append_image(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    franchise_id: Uuid,
    upload: &ImageUpload,
    alt_text: Option<String>,
) -> Result<gallery::Model, ServiceError> {
    let position = list_gallery_images(db, franchise_id).await?.len();
    let stored = upload_image(store, upload, &franchise_id.to_string()).await?;
    let alt_text = alt_text.or_else(|| Some(format!("Gallery image {}", position + 1)));
    match add_gallery_image(db, franchise_id, &stored.public_url, alt_text, position as i32).await {
        Ok(row) => Ok(row),
        Err(e) => {
            if let Err(cleanup) = delete_images(store, &[stored.key.clone()]).await {
                warn!(key = %stored.key, error = %cleanup, "orphaned gallery object");
            }
            Err(e)
        }
    }
}

pub async fn list_gallery_images(db: &DatabaseConnection, franchise_id: Uuid) -> Result<Vec<gallery::Model>, ServiceError> {
    Ok(gallery::Entity::find()
        .filter(gallery::Column::FranchiseId.eq(franchise_id))
        .order_by_asc(gallery::Column::DisplayOrder)
        .all(db)
        .await?)
}

/// Gallery URLs per listing, each list ordered by display_order. One query for all ids.
pub async fn gallery_urls_for(db: &DatabaseConnection, franchise_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<String>>, ServiceError> {
    if franchise_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = gallery::Entity::find()
        .filter(gallery::Column::FranchiseId.is_in(franchise_ids.to_vec()))
        .order_by_asc(gallery::Column::FranchiseId)
        .order_by_asc(gallery::Column::DisplayOrder)
        .all(db)
        .await?;
    Ok(group_urls(rows))
}

fn group_urls(rows: Vec<gallery::Model>) -> HashMap<Uuid, Vec<String>> {
    let mut out: HashMap<Uuid, Vec<(i32, String)>> = HashMap::new();
    for r in rows {
        out.entry(r.franchise_id).or_default().push((r.display_order, r.image_url));
    }
    out.into_iter()
        .map(|(id, mut v)| {
            v.sort_by_key(|(order, _)| *order);
            (id, v.into_iter().map(|(_, url)| url).collect())
        })
        .collect()
}

#[instrument(skip(db))]
pub async fn update_gallery_image(db: &DatabaseConnection, id: Uuid, patch: GalleryPatch) -> Result<gallery::Model, ServiceError> {
    let mut am: gallery::ActiveModel = gallery::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("gallery image"))?
        .into();
    if let Some(alt) = patch.image_alt_text {
        am.image_alt_text = Set(models::validation::non_blank(Some(alt)));
    }
    if let Some(order) = patch.display_order {
        if order < 0 {
            return Err(ServiceError::Validation("display_order must be >= 0".into()));
        }
        am.display_order = Set(order);
    }
    Ok(am.update(db).await?)
}

/// Row only; the stored object is left in place.
#[instrument(skip(db))]
pub async fn delete_gallery_image(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = gallery::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("gallery image"));
    }
    Ok(())
}

/// Row first, then the stored object (best-effort).
#[instrument(skip(db, store))]
pub async fn delete_gallery_image_complete(db: &DatabaseConnection, store: &dyn ObjectStore, id: Uuid) -> Result<gallery::Model, ServiceError> {
    let row = gallery::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("gallery image"))?;
    delete_gallery_image(db, id).await?;
    remove_objects_logged(store, &[row.image_url.clone()]).await;
    info!(%id, franchise_id = %row.franchise_id, "gallery_image_deleted");
    Ok(row)
}

/// Remove objects by key; an empty list does nothing.
pub async fn delete_images(store: &dyn ObjectStore, keys: &[String]) -> Result<(), ServiceError> {
    if keys.is_empty() {
        return Ok(());
    }
    store.remove(keys).await?;
    Ok(())
}

/// Map URLs to keys and remove them; failures are only logged.
pub(crate) async fn remove_objects_logged(store: &dyn ObjectStore, urls: &[String]) {
    let keys: Vec<String> = urls.iter().filter_map(|u| key_from_public_url(u)).collect();
    if let Err(e) = delete_images(store, &keys).await {
        warn!(error = %e, count = keys.len(), "storage cleanup failed");
    }
}

/// Storage objects first, then every gallery row of the listing.
#[instrument(skip(db, store))]
pub async fn delete_franchise_gallery(db: &DatabaseConnection, store: &dyn ObjectStore, franchise_id: Uuid) -> Result<u64, ServiceError> {
    let rows = list_gallery_images(db, franchise_id).await?;
    let urls: Vec<String> = rows.into_iter().map(|r| r.image_url).collect();
    remove_objects_logged(store, &urls).await;
    let res = gallery::Entity::delete_many()
        .filter(gallery::Column::FranchiseId.eq(franchise_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// `display_order` becomes each id's position in `ordered_ids`.
#[instrument(skip(db, ordered_ids), fields(count = ordered_ids.len()))]
pub async fn reorder_gallery_images(db: &DatabaseConnection, franchise_id: Uuid, ordered_ids: &[Uuid]) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    for (idx, id) in ordered_ids.iter().enumerate() {
        let res = gallery::Entity::update_many()
            .col_expr(gallery::Column::DisplayOrder, Expr::value(idx as i32))
            .filter(gallery::Column::Id.eq(*id))
            .filter(gallery::Column::FranchiseId.eq(franchise_id))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::NotFound(format!("gallery image {id} not found for franchise")));
        }
    }
    txn.commit().await?;
    Ok(())
}

/// Total gallery rows; a failed count reads as 0.
pub async fn gallery_count(db: &DatabaseConnection) -> u64 {
    match gallery::Entity::find().count(db).await {
        Ok(n) => n,
        Err(e) => {
            error!(error = %e, "gallery count failed");
            0
        }
    }
}

pub async fn public_gallery(db: &DatabaseConnection, source: GallerySource) -> Result<Vec<GalleryItem>, ServiceError> {
    match source {
        GallerySource::Team => {
            let rows = crate::team_action_service::list_team_actions(db).await?;
            Ok(rows.into_iter().filter_map(team_item).collect())
        }
        GallerySource::Franchises => {
            let rows = gallery::Entity::find()
                .find_also_related(franchise_listing::Entity)
                .order_by_desc(gallery::Column::CreatedAt)
                .all(db)
                .await?;
            Ok(rows
                .into_iter()
                .map(|(g, f)| GalleryItem {
                    id: g.id,
                    image: g.image_url,
                    title: f.map(|f| f.brand_name),
                    description: g.image_alt_text,
                })
                .collect())
        }
    }
}

/// Inline data wins over the hosted URL; rows with neither are skipped.
fn team_item(t: team_action_image::Model) -> Option<GalleryItem> {
    let image = t.image_data.filter(|s| !s.is_empty()).or(t.image_url.filter(|s| !s.is_empty()))?;
    Some(GalleryItem { id: t.id, image, title: t.heading, description: t.description })
}
