use serde::{Deserialize, Serialize};
use tp_db::models::{AgeGroup, Difficulty, Flashcard, NewFlashcard};
use uuid::Uuid;

use crate::{error::ApiError, validation};

/// Request body for `POST /flashcards`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlashcardRequest {
    pub question: String,
    pub answer: String,
    pub category_id: Uuid,
    pub age_group: AgeGroup,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(alias = "imageUrl")]
    pub question_image: Option<String>,
    pub answer_image: Option<String>,
    pub audio_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl CreateFlashcardRequest {
    pub fn validate(self) -> Result<NewFlashcard, ApiError> {
        validation::validate_length("question", &self.question, 1, 500)?;
        validation::validate_length("answer", &self.answer, 1, 1000)?;
        validation::validate_url("questionImage", self.question_image.as_deref())?;
        validation::validate_url("answerImage", self.answer_image.as_deref())?;
        validation::validate_url("audioUrl", self.audio_url.as_deref())?;

        Ok(NewFlashcard {
            question: self.question,
            answer: self.answer,
            category_id: self.category_id,
            age_group: self.age_group,
            difficulty: self.difficulty,
            question_image: self.question_image,
            answer_image: self.answer_image,
            audio_url: self.audio_url,
            is_active: self.is_active,
        })
    }
}

/// Question and answer only, for text-only clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFlashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

impl From<Flashcard> for TextFlashcard {
    fn from(flashcard: Flashcard) -> Self {
        Self {
            id: flashcard.id,
            question: flashcard.question,
            answer: flashcard.answer,
        }
    }
}
