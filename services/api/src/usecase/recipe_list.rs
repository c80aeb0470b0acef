use crate::domain::repository::{RecipeListRepository, RecipeRepository};
use crate::domain::types::{RecipeListKind, RecipeSummary};
use crate::error::ApiError;

// ── AddToList ────────────────────────────────────────────────────────────────

pub struct AddToListUseCase<R: RecipeRepository, L: RecipeListRepository> {
    pub recipes: R,
    pub lists: L,
}

impl<R: RecipeRepository, L: RecipeListRepository> AddToListUseCase<R, L> {
    pub async fn execute(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<RecipeSummary, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if self.lists.contains(kind, user_id, recipe_id).await? {
            return Err(ApiError::AlreadyInList(kind));
        }
        // A concurrent add loses on the unique index and reports the same error.
        if !self.lists.add(kind, user_id, recipe_id).await? {
            return Err(ApiError::AlreadyInList(kind));
        }
        Ok(RecipeSummary::from(&recipe))
    }
}

// ── RemoveFromList ───────────────────────────────────────────────────────────

pub struct RemoveFromListUseCase<L: RecipeListRepository> {
    pub lists: L,
}

impl<L: RecipeListRepository> RemoveFromListUseCase<L> {
    pub async fn execute(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<(), ApiError> {
        if !self.lists.remove(kind, user_id, recipe_id).await? {
            return Err(ApiError::NotInList(kind));
        }
        Ok(())
    }
}

// ── GetList ──────────────────────────────────────────────────────────────────

pub struct GetListUseCase<L: RecipeListRepository> {
    pub lists: L,
}

impl<L: RecipeListRepository> GetListUseCase<L> {
    pub async fn execute(
        &self,
        kind: RecipeListKind,
        user_id: i32,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        self.lists.list(kind, user_id).await
    }
}
