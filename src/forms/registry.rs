use std::fmt;
use std::str::FromStr;

use sqlx::PgPool;

use crate::db;
use crate::error::AppError;
use crate::models::ContentType;

/// Natural key of a content type: `app_label.model`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormTypeKey {
    pub app_label: String,
    pub model: String,
}

impl FormTypeKey {
    /// Exact key; natural-key lookups are case-sensitive.
    pub fn new(app_label: &str, model: &str) -> Self {
        Self {
            app_label: app_label.to_string(),
            model: model.to_string(),
        }
    }
}

impl FromStr for FormTypeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((app_label, model)) if !app_label.is_empty() && !model.is_empty() => {
                // configured names follow the lowercase content type convention
                Ok(FormTypeKey::new(&app_label.to_lowercase(), &model.to_lowercase()))
            }
            _ => Err("expected app_label.model".to_string()),
        }
    }
}

impl fmt::Display for FormTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model)
    }
}

/// The set of content types whose pages accept form submissions.
#[derive(Debug, Clone)]
pub struct FormTypeRegistry {
    keys: Vec<FormTypeKey>,
}

impl FormTypeRegistry {
    pub fn new(keys: Vec<FormTypeKey>) -> Self {
        let mut unique: Vec<FormTypeKey> = Vec::with_capacity(keys.len());
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique }
    }

    pub fn contains(&self, key: &FormTypeKey) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> &[FormTypeKey] {
        &self.keys
    }

    /// Parallel label/model arrays, bound as `TEXT[]` in store queries.
    pub fn as_columns(&self) -> (Vec<String>, Vec<String>) {
        self.keys
            .iter()
            .map(|k| (k.app_label.clone(), k.model.clone()))
            .unzip()
    }

    /// Look up a content type by natural key and make sure it is form-capable.
    ///
    /// Both an unknown key and a known but non-form type are reported as
    /// `NotFound`, so arbitrary content types cannot be probed by URL.
    pub async fn resolve(
        &self,
        pool: &PgPool,
        app_label: &str,
        model: &str,
    ) -> Result<ContentType, AppError> {
        let key = FormTypeKey::new(app_label, model);
        let content_type = db::content_types::find_by_natural_key(pool, &key)
            .await?
            .ok_or_else(|| AppError::NotFound("Form type not found".to_string()))?;

        if !self.contains(&content_type.key()) {
            return Err(AppError::NotFound("Form type not found".to_string()));
        }

        Ok(content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parses_and_lowercases() {
        let key: FormTypeKey = "Forms.FormPage".parse().unwrap();
        assert_eq!(key, FormTypeKey::new("forms", "formpage"));
        assert_eq!(key.to_string(), "forms.formpage");
    }

    #[test]
    fn explicit_keys_keep_their_case() {
        let key = FormTypeKey::new("Forms", "FormPage");
        assert_ne!(key, FormTypeKey::new("forms", "formpage"));

        let registry = FormTypeRegistry::new(vec!["forms.formpage".parse().unwrap()]);
        assert!(!registry.contains(&key));
    }

    #[test]
    fn key_rejects_partial_input() {
        assert!("forms.".parse::<FormTypeKey>().is_err());
        assert!(".formpage".parse::<FormTypeKey>().is_err());
        assert!("formpage".parse::<FormTypeKey>().is_err());
    }

    #[test]
    fn registry_dedupes_and_splits_columns() {
        let registry = FormTypeRegistry::new(vec![
            FormTypeKey::new("forms", "formpage"),
            FormTypeKey::new("events", "signuppage"),
            FormTypeKey::new("forms", "formpage"),
        ]);
        assert_eq!(registry.keys().len(), 2);
        assert!(registry.contains(&FormTypeKey::new("events", "signuppage")));
        assert!(!registry.contains(&FormTypeKey::new("blog", "blogpage")));

        let (labels, models) = registry.as_columns();
        assert_eq!(labels, vec!["forms", "events"]);
        assert_eq!(models, vec!["formpage", "signuppage"]);
    }
}
