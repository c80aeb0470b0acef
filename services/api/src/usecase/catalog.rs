//! Read-only tag and ingredient lookups.

use crate::domain::repository::{IngredientRepository, TagRepository};
use crate::domain::types::{Ingredient, Tag};
use crate::error::ApiError;

pub struct ListTagsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> ListTagsUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Tag>, ApiError> {
        self.tags.list().await
    }
}

pub struct GetTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> GetTagUseCase<T> {
    pub async fn execute(&self, id: i32) -> Result<Tag, ApiError> {
        self.tags.find_by_id(id).await?.ok_or(ApiError::TagNotFound)
    }
}

pub struct SearchIngredientsUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> SearchIngredientsUseCase<I> {
    /// Blank names match everything.
    pub async fn execute(&self, name: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let prefix = name.map(str::trim).filter(|n| !n.is_empty());
        self.ingredients.search(prefix).await
    }
}

pub struct GetIngredientUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> GetIngredientUseCase<I> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, ApiError> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}
