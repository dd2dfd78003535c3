use sqlx::PgPool;
use uuid::Uuid;

use crate::forms::registry::FormTypeRegistry;
use crate::models::{FormPageSummary, Page};

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Every page whose content type is in the registry.
pub async fn list_form_pages(
    pool: &PgPool,
    registry: &FormTypeRegistry,
) -> Result<Vec<FormPageSummary>, sqlx::Error> {
    let (app_labels, models) = registry.as_columns();

    sqlx::query_as::<_, FormPageSummary>(
        "SELECT p.id, p.title, p.url_path, p.live, ct.app_label, ct.model,
                COUNT(s.id) AS submission_count
         FROM pages p
         JOIN content_types ct ON p.content_type_id = ct.id
         JOIN UNNEST($1::text[], $2::text[]) AS f(app_label, model)
           ON ct.app_label = f.app_label AND ct.model = f.model
         LEFT JOIN form_submissions s ON s.page_id = p.id
         GROUP BY p.id, ct.app_label, ct.model
         ORDER BY p.title, p.id",
    )
    .bind(app_labels)
    .bind(models)
    .fetch_all(pool)
    .await
}

pub async fn list_by_content_type(
    pool: &PgPool,
    content_type_id: Uuid,
) -> Result<Vec<FormPageSummary>, sqlx::Error> {
    sqlx::query_as::<_, FormPageSummary>(
        "SELECT p.id, p.title, p.url_path, p.live, ct.app_label, ct.model,
                COUNT(s.id) AS submission_count
         FROM pages p
         JOIN content_types ct ON p.content_type_id = ct.id
         LEFT JOIN form_submissions s ON s.page_id = p.id
         WHERE ct.id = $1
         GROUP BY p.id, ct.app_label, ct.model
         ORDER BY p.title, p.id",
    )
    .bind(content_type_id)
    .fetch_all(pool)
    .await
}
