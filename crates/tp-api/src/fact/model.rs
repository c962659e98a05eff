use serde::Deserialize;
use tp_db::models::{AgeGroup, Difficulty, NewFact};
use uuid::Uuid;

use crate::{error::ApiError, validation};

/// Request body for `POST /facts`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFactRequest {
    pub title: String,
    pub description: String,
    pub fun_fact: Option<String>,
    pub category_id: Uuid,
    pub age_group: AgeGroup,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl CreateFactRequest {
    pub fn validate(self) -> Result<NewFact, ApiError> {
        validation::validate_length("title", &self.title, 1, 200)?;
        validation::validate_length("description", &self.description, 1, 2000)?;
        validation::validate_max_length("funFact", self.fun_fact.as_deref(), 1000)?;
        validation::validate_url("imageUrl", self.image_url.as_deref())?;

        Ok(NewFact {
            title: self.title,
            description: self.description,
            fun_fact: self.fun_fact,
            category_id: self.category_id,
            age_group: self.age_group,
            difficulty: self.difficulty,
            image_url: self.image_url,
            is_active: self.is_active,
        })
    }
}
