use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{FollowRepository, RecipeRepository, UserRepository};
use crate::domain::types::{AuthorWithRecipes, User, UserProfile};
use crate::error::ApiError;

async fn with_recipes<R: RecipeRepository>(
    recipes: &R,
    author: User,
    is_subscribed: bool,
    recipes_limit: Option<u64>,
) -> Result<AuthorWithRecipes, ApiError> {
    let (summaries, recipes_count) = recipes.summaries_by_author(author.id, recipes_limit).await?;
    Ok(AuthorWithRecipes {
        profile: UserProfile {
            user: author,
            is_subscribed,
        },
        recipes: summaries,
        recipes_count,
    })
}

// ── Follow ───────────────────────────────────────────────────────────────────

pub struct FollowUseCase<U: UserRepository, F: FollowRepository, R: RecipeRepository> {
    pub users: U,
    pub follows: F,
    pub recipes: R,
}

impl<U: UserRepository, F: FollowRepository, R: RecipeRepository> FollowUseCase<U, F, R> {
    pub async fn execute(
        &self,
        user_id: i32,
        author_id: i32,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorWithRecipes, ApiError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if user_id == author_id {
            return Err(ApiError::CannotFollowSelf);
        }
        if self.follows.exists(user_id, author_id).await? {
            return Err(ApiError::AlreadyFollowing);
        }
        if !self.follows.create(user_id, author_id).await? {
            return Err(ApiError::AlreadyFollowing);
        }
        tracing::info!(user_id, author_id, "user followed author");
        with_recipes(&self.recipes, author, true, recipes_limit).await
    }
}

// ── Unfollow ─────────────────────────────────────────────────────────────────

pub struct UnfollowUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> UnfollowUseCase<U, F> {
    pub async fn execute(&self, user_id: i32, author_id: i32) -> Result<(), ApiError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        if !self.follows.delete(user_id, author_id).await? {
            return Err(ApiError::NotFollowing);
        }
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follows: F,
    pub recipes: R,
}

impl<F: FollowRepository, R: RecipeRepository> ListSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        user_id: i32,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<AuthorWithRecipes>, ApiError> {
        let (authors, count) = self.follows.list_authors(user_id, page).await?;
        let mut results = Vec::with_capacity(authors.len());
        for author in authors {
            results.push(with_recipes(&self.recipes, author, true, recipes_limit).await?);
        }
        Ok(Page::new(results, count, page))
    }
}
