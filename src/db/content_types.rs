use sqlx::PgPool;

use crate::forms::registry::FormTypeKey;
use crate::models::ContentType;

pub async fn find_by_natural_key(
    pool: &PgPool,
    key: &FormTypeKey,
) -> Result<Option<ContentType>, sqlx::Error> {
    sqlx::query_as::<_, ContentType>(
        "SELECT * FROM content_types WHERE app_label = $1 AND model = $2",
    )
    .bind(&key.app_label)
    .bind(&key.model)
    .fetch_optional(pool)
    .await
}
