#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use foodgram_domain::pagination::PageRequest;

use crate::domain::types::{
    ImageUpload, Ingredient, NewUser, Recipe, RecipeChanges, RecipeDetail, RecipeDraft,
    RecipeFilter, RecipeListKind, RecipeSummary, ShoppingListLine, Tag, User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn username_taken(&self, username: &str) -> Result<bool, ApiError>;

    /// Insert a user. A raced unique violation surfaces as `UserAlreadyExists`.
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError>;

    /// One page of users ordered by id, plus the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError>;
}

/// Repository for follower → author links.
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError>;

    /// Insert a follow. Returns `false` when the pair already exists.
    async fn create(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError>;

    /// Delete a follow. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError>;

    /// Subset of `author_ids` that `user_id` follows.
    async fn followed_among(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError>;

    /// One page of authors followed by `user_id`, plus the total count.
    async fn list_authors(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError>;
}

pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError>;
    /// Subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

pub trait IngredientRepository: Send + Sync {
    /// Ingredients ordered by name, optionally narrowed to a case-insensitive name prefix.
    async fn search(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError>;
    /// Subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

/// Repository for recipes and their tag/dosage associations.
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError>;

    /// Expanded recipe with flags resolved for `viewer`.
    async fn detail(&self, id: i32, viewer: Option<i32>)
    -> Result<Option<RecipeDetail>, ApiError>;

    /// One page of expanded recipes, newest first, plus the total count.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
        viewer: Option<i32>,
    ) -> Result<(Vec<RecipeDetail>, u64), ApiError>;

    /// Insert the recipe with its tags and dosages in one transaction. Returns the new id.
    async fn create(&self, draft: &RecipeDraft) -> Result<i32, ApiError>;

    /// Apply `changes` in one transaction, replacing tag and dosage sets when present.
    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError>;

    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;

    /// Newest recipes of an author (capped by `limit`) and the author's recipe count.
    async fn summaries_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<(Vec<RecipeSummary>, u64), ApiError>;
}

/// Repository for favorites and shopping carts.
pub trait RecipeListRepository: Send + Sync {
    async fn contains(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError>;

    /// Insert an entry. Returns `false` when it already exists.
    async fn add(&self, kind: RecipeListKind, user_id: i32, recipe_id: i32)
    -> Result<bool, ApiError>;

    /// Delete an entry. Returns `true` if a row was deleted.
    async fn remove(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError>;

    async fn list(
        &self,
        kind: RecipeListKind,
        user_id: i32,
    ) -> Result<Vec<RecipeSummary>, ApiError>;

    /// Dosages of every recipe in the user's cart, summed per ingredient, ordered by name.
    async fn shopping_list(&self, user_id: i32) -> Result<Vec<ShoppingListLine>, ApiError>;
}

/// Storage for uploaded recipe images.
pub trait ImageStore: Send + Sync {
    /// Persist `upload`. Returns the path relative to the media root.
    async fn save(&self, upload: &ImageUpload) -> Result<String, ApiError>;
    async fn remove(&self, path: &str) -> Result<(), ApiError>;
}
