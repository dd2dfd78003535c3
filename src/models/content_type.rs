use uuid::Uuid;

use crate::forms::registry::FormTypeKey;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentType {
    pub id: Uuid,
    pub app_label: String,
    pub model: String,
}

impl ContentType {
    pub fn key(&self) -> FormTypeKey {
        FormTypeKey::new(&self.app_label, &self.model)
    }
}
