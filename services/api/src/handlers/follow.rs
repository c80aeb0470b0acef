use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::Identity;
use foodgram_domain::pagination::Page;

use crate::domain::types::AuthorWithRecipes;
use crate::error::ApiError;
use crate::handlers::extract::ApiQuery;
use crate::handlers::recipe::RecipeSummaryResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::follow::{FollowUseCase, ListSubscriptionsUseCase, UnfollowUseCase};

/// Followed author with a preview of their recipes.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl SubscriptionResponse {
    fn new(entry: AuthorWithRecipes, state: &AppState) -> Self {
        Self {
            author: entry.profile.into(),
            recipes: entry
                .recipes
                .into_iter()
                .map(|summary| RecipeSummaryResponse::new(summary, state))
                .collect(),
            recipes_count: entry.recipes_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<u64>,
}

// ── GET /api/users/subscriptions/ ────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: Identity,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubscriptionsQuery>,
) -> Result<Json<Page<SubscriptionResponse>>, ApiError> {
    let usecase = ListSubscriptionsUseCase {
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let page = state.page_request(query.page, query.limit);
    let authors = usecase
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    Ok(Json(
        authors.map(|entry| SubscriptionResponse::new(entry, &state)),
    ))
}

// ── POST /api/users/{id}/subscribe/ ──────────────────────────────────────────

pub async fn subscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
    ApiQuery(query): ApiQuery<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let usecase = FollowUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let entry = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(entry, &state)),
    ))
}

// ── DELETE /api/users/{id}/subscribe/ ────────────────────────────────────────

pub async fn unsubscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = UnfollowUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
