use serde::{Deserialize, Serialize};
use tp_db::models::{DEFAULT_CATEGORY_COLOR, NewCategory};
use uuid::Uuid;

use crate::{error::ApiError, validation};

/// Request body for `POST /categories`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl CreateCategoryRequest {
    pub fn validate(self) -> Result<NewCategory, ApiError> {
        validation::validate_length("name", &self.name, 1, 100)?;
        validation::validate_max_length("description", self.description.as_deref(), 500)?;
        validation::validate_max_length("icon", self.icon.as_deref(), 50)?;

        let color = match self.color {
            Some(color) => {
                validation::validate_color(&color)?;
                color
            }
            None => DEFAULT_CATEGORY_COLOR.to_string(),
        };

        Ok(NewCategory {
            name: self.name,
            description: self.description,
            color,
            icon: self.icon,
            is_active: self.is_active,
        })
    }
}

/// Active content counts for a category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category_id: Uuid,
    pub category_name: String,
    pub facts_count: i64,
    pub flashcards_count: i64,
    pub total_content: i64,
}
