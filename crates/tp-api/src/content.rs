//! Query parameters and response shapes shared by the fact and flashcard routes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tp_db::{
    ContentStore,
    models::{AgeGroup, CategorySummary, ContentFilter, Difficulty, Page},
};
use uuid::Uuid;

use crate::{error::ApiError, validation};

/// Filter parameters accepted by the random endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub category_id: Option<Uuid>,
    pub age_group: Option<AgeGroup>,
    pub difficulty: Option<Difficulty>,
}

impl FilterQuery {
    pub fn into_filter(self) -> ContentFilter {
        ContentFilter {
            category_id: self.category_id,
            age_group: self.age_group,
            difficulty: self.difficulty,
            search: None,
            active_only: true,
        }
    }
}

/// Filter and pagination parameters accepted by the list endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category_id: Option<Uuid>,
    pub age_group: Option<AgeGroup>,
    pub difficulty: Option<Difficulty>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Validate into a store filter over active content and a page.
    pub fn into_filter_and_page(self) -> Result<(ContentFilter, Page), ApiError> {
        let (limit, offset) = validation::validate_pagination(self.limit, self.offset)?;
        let search = validation::validate_search(self.search.as_deref())?;

        let filter = ContentFilter {
            category_id: self.category_id,
            age_group: self.age_group,
            difficulty: self.difficulty,
            search,
            active_only: true,
        };

        Ok((filter, Page::new(offset, limit)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: i64, page: Page) -> Self {
        Self {
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.offset.saturating_add(page.limit) < total,
        }
    }
}

/// A content item with its category embedded
#[derive(Debug, Clone, Serialize)]
pub struct WithCategory<T> {
    #[serde(flatten)]
    pub item: T,
    pub category: Option<CategorySummary>,
}

/// Embed the category of a single item.
pub async fn with_category<T>(
    store: &dyn ContentStore,
    item: T,
    category_id: Uuid,
) -> Result<WithCategory<T>, ApiError> {
    let category = store
        .find_category(category_id)
        .await?
        .as_ref()
        .map(CategorySummary::from);

    Ok(WithCategory { item, category })
}

/// Embed categories into a page of items with one category lookup.
pub async fn with_categories<T>(
    store: &dyn ContentStore,
    items: Vec<T>,
    category_id: impl Fn(&T) -> Uuid,
) -> Result<Vec<WithCategory<T>>, ApiError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let categories: HashMap<Uuid, CategorySummary> = store
        .list_categories(false)
        .await?
        .iter()
        .map(|c| (c.id, CategorySummary::from(c)))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| {
            let category = categories.get(&category_id(&item)).cloned();
            WithCategory { item, category }
        })
        .collect())
}
