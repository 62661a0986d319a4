//! Contact-form submissions and their admin triage.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{contact_query, validation};
use crate::errors::ServiceError;
use crate::filters::contains_ci;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Admin list filters; both optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactStats {
    pub total: u64,
    pub new: u64,
    pub read: u64,
    pub replied: u64,
    pub closed: u64,
}

impl ContactStats {
    fn from_counts<I: IntoIterator<Item = (String, i64)>>(counts: I) -> Self {
        counts.into_iter().fold(Self::default(), |mut acc, (status, n)| {
            let n = n.max(0) as u64;
            acc.total += n;
            match status.as_str() {
                "new" => acc.new += n,
                "read" => acc.read += n,
                "replied" => acc.replied += n,
                "closed" => acc.closed += n,
                _ => {}
            }
            acc
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

/// Validate and normalize a public submission.
fn normalize(input: ContactInput) -> Result<ContactInput, ServiceError> {
    let name = required("name", &input.name)?;
    let email = required("email", &input.email)?.to_lowercase();
    validation::validate_email(&email)?;
    let phone = match validation::non_blank(input.phone) {
        Some(p) => {
            let compact: String = p.chars().filter(|c| !c.is_whitespace()).collect();
            validation::validate_phone(&compact)?;
            Some(compact)
        }
        None => None,
    };
    let subject = required("subject", &input.subject)?;
    let message = required("message", &input.message)?;
    Ok(ContactInput { name, email, phone, subject, message })
}

#[instrument(skip(db, input))]
pub async fn submit(db: &DatabaseConnection, input: ContactInput) -> Result<contact_query::Model, ServiceError> {
    let c = normalize(input)?;
    let created = contact_query::create(db, c.name, c.email, c.phone, c.subject, c.message).await?;
    common::metrics::CONTACT_SUBMISSIONS_TOTAL.inc();
    info!(id = %created.id, "contact_query_submitted");
    Ok(created)
}

/// Newest first.
pub async fn list(db: &DatabaseConnection, filter: ContactFilter) -> Result<Vec<contact_query::Model>, ServiceError> {
    let mut query = contact_query::Entity::find().order_by_desc(contact_query::Column::CreatedAt);
    if let Some(status) = validation::non_blank(filter.status).filter(|s| s != "all") {
        contact_query::validate_status(&status)?;
        query = query.filter(contact_query::Column::Status.eq(status));
    }
    if let Some(q) = validation::non_blank(filter.q) {
        query = query.filter(
            Condition::any()
                .add(contains_ci(contact_query::Column::Name, &q))
                .add(contains_ci(contact_query::Column::Email, &q))
                .add(contains_ci(contact_query::Column::Subject, &q))
                .add(contains_ci(contact_query::Column::Message, &q)),
        );
    }
    Ok(query.all(db).await?)
}

#[instrument(skip(db, admin_notes))]
pub async fn update_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: &str,
    admin_notes: Option<String>,
) -> Result<contact_query::Model, ServiceError> {
    contact_query::validate_status(status)?;
    let mut am: contact_query::ActiveModel = contact_query::Entity::find_by_id(id)
        .one(db).await?
        .ok_or_else(|| ServiceError::not_found("contact query"))?
        .into();
    am.status = Set(status.to_string());
    if let Some(notes) = validation::non_blank(admin_notes) {
        am.admin_notes = Set(Some(notes));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = contact_query::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("contact query"));
    }
    Ok(())
}

pub async fn stats(db: &DatabaseConnection) -> Result<ContactStats, ServiceError> {
    let counts: Vec<(String, i64)> = contact_query::Entity::find()
        .select_only()
        .column(contact_query::Column::Status)
        .column_as(Expr::col(contact_query::Column::Id).count(), "count")
        .group_by(contact_query::Column::Status)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ContactStats::from_counts(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn input() -> ContactInput {
        ContactInput {
            name: "  Asha ".into(),
            email: " Asha@Example.COM ".into(),
            phone: Some("+91 98765 43210".into()),
            subject: "Franchise enquiry".into(),
            message: "Interested in a Pune outlet".into(),
        }
    }

    #[test]
    fn submission_is_normalized() {
        let c = normalize(input()).unwrap();
        assert_eq!(c.name, "Asha");
        assert_eq!(c.email, "asha@example.com");
        assert_eq!(c.phone.as_deref(), Some("+919876543210"));
    }

    #[test]
    fn bad_fields_rejected() {
        assert!(normalize(ContactInput { email: "nope".into(), ..input() }).is_err());
        assert!(normalize(ContactInput { phone: Some("0123".into()), ..input() }).is_err());
        assert!(normalize(ContactInput { subject: "   ".into(), ..input() }).is_err());
        let no_phone = normalize(ContactInput { phone: Some("  ".into()), ..input() }).unwrap();
        assert!(no_phone.phone.is_none());
    }

    #[test]
    fn stats_fold_counts_known_statuses() {
        let s = ContactStats::from_counts(vec![
            ("new".to_string(), 4),
            ("read".to_string(), 2),
            ("closed".to_string(), 1),
        ]);
        assert_eq!(s, ContactStats { total: 7, new: 4, read: 2, replied: 0, closed: 1 });
    }

    #[test]
    fn free_text_filter_is_case_insensitive_like() {
        let sql = contact_query::Entity::find()
            .filter(contains_ci(contact_query::Column::Subject, "Pune"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("subject") LIKE '%pune%'"#), "{sql}");
    }
}
