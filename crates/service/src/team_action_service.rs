//! "Our team in action" slides shown on the home page and the team gallery.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{team_action_image, validation::non_blank};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamActionInput {
    pub image_url: Option<String>,
    pub image_data: Option<String>,
    pub heading: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

impl TeamActionInput {
    fn normalized(self) -> Self {
        Self {
            image_url: non_blank(self.image_url),
            image_data: non_blank(self.image_data),
            heading: non_blank(self.heading),
            description: non_blank(self.description),
            sort_order: self.sort_order,
        }
    }

    fn has_image(&self) -> bool {
        self.image_url.is_some() || self.image_data.is_some()
    }
}

/// sort_order ascending (unset last), then oldest first.
pub async fn list_team_actions(db: &DatabaseConnection) -> Result<Vec<team_action_image::Model>, ServiceError> {
    let mut rows = team_action_image::Entity::find()
        .order_by_asc(team_action_image::Column::CreatedAt)
        .all(db)
        .await?;
    // Postgres sorts NULL last on ASC; keep the same order independent of backend
    rows.sort_by_key(|r| (r.sort_order.is_none(), r.sort_order.unwrap_or(0)));
    Ok(rows)
}

#[instrument(skip(db, input))]
pub async fn create_team_action(db: &DatabaseConnection, input: TeamActionInput) -> Result<team_action_image::Model, ServiceError> {
    let input = input.normalized();
    if !input.has_image() {
        return Err(ServiceError::Validation("image_url or image_data required".into()));
    }
    let am = team_action_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        image_url: Set(input.image_url),
        image_data: Set(input.image_data),
        heading: Set(input.heading),
        description: Set(input.description),
        sort_order: Set(input.sort_order),
        created_at: Set(Utc::now().into()),
    };
    let created = am.insert(db).await?;
    info!(id = %created.id, "team_action_created");
    Ok(created)
}

/// Replaces every field with the submitted values; the image may not be cleared.
#[instrument(skip(db, input))]
pub async fn update_team_action(db: &DatabaseConnection, id: Uuid, input: TeamActionInput) -> Result<team_action_image::Model, ServiceError> {
    let input = input.normalized();
    let existing = team_action_image::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("team action image"))?;
    let keeps_image = input.has_image() || existing.image_url.is_some() || existing.image_data.is_some();
    if !keeps_image {
        return Err(ServiceError::Validation("image_url or image_data required".into()));
    }
    let mut am: team_action_image::ActiveModel = existing.into();
    if input.image_url.is_some() || input.image_data.is_some() {
        am.image_url = Set(input.image_url);
        am.image_data = Set(input.image_data);
    }
    am.heading = Set(input.heading);
    am.description = Set(input.description);
    am.sort_order = Set(input.sort_order);
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn delete_team_action(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = team_action_image::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("team action image"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn slide(order: Option<i32>, age_minutes: i64) -> team_action_image::Model {
        team_action_image::Model {
            id: Uuid::new_v4(),
            image_url: Some("/media/b/team/x.png".into()),
            image_data: None,
            heading: None,
            description: None,
            sort_order: order,
            created_at: (Utc::now() - Duration::minutes(age_minutes)).into(),
        }
    }

    #[tokio::test]
    async fn ordered_by_sort_order_then_created() -> Result<(), anyhow::Error> {
        let (old_unsorted, first, second_old, second_new) = (slide(None, 50), slide(Some(1), 10), slide(Some(2), 40), slide(Some(2), 5));
        // rows come back from the query oldest first
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![old_unsorted.clone(), second_old.clone(), first.clone(), second_new.clone()]])
            .into_connection();
        let ids: Vec<Uuid> = list_team_actions(&db).await?.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second_old.id, second_new.id, old_unsorted.id]);
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_an_image() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let input = TeamActionInput { heading: Some("Opening day".into()), image_url: Some("   ".into()), ..Default::default() };
        assert!(matches!(create_team_action(&db, input).await, Err(ServiceError::Validation(_))));
    }
}
