use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use foodgram_auth_types::identity::Identity;

use crate::domain::types::RecipeListKind;
use crate::error::ApiError;
use crate::handlers::recipe::RecipeSummaryResponse;
use crate::state::AppState;
use crate::usecase::recipe_list::{AddToListUseCase, GetListUseCase, RemoveFromListUseCase};
use crate::usecase::shopping_list::{DownloadShoppingListUseCase, SHOPPING_LIST_FILENAME};

async fn add(
    kind: RecipeListKind,
    identity: Identity,
    state: AppState,
    recipe_id: i32,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), ApiError> {
    let usecase = AddToListUseCase {
        recipes: state.recipe_repo(),
        lists: state.recipe_list_repo(),
    };
    let summary = usecase.execute(kind, identity.user_id, recipe_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeSummaryResponse::new(summary, &state)),
    ))
}

async fn remove(
    kind: RecipeListKind,
    identity: Identity,
    state: AppState,
    recipe_id: i32,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveFromListUseCase {
        lists: state.recipe_list_repo(),
    };
    usecase.execute(kind, identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list(
    kind: RecipeListKind,
    identity: Identity,
    state: AppState,
) -> Result<Json<Vec<RecipeSummaryResponse>>, ApiError> {
    let usecase = GetListUseCase {
        lists: state.recipe_list_repo(),
    };
    let summaries = usecase.execute(kind, identity.user_id).await?;
    Ok(Json(
        summaries
            .into_iter()
            .map(|summary| RecipeSummaryResponse::new(summary, &state))
            .collect(),
    ))
}

// ── /api/recipes/{id}/favorite/ ──────────────────────────────────────────────

pub async fn add_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), ApiError> {
    add(RecipeListKind::Favorite, identity, state, id).await
}

pub async fn remove_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove(RecipeListKind::Favorite, identity, state, id).await
}

pub async fn list_favorites(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeSummaryResponse>>, ApiError> {
    list(RecipeListKind::Favorite, identity, state).await
}

// ── /api/recipes/{id}/shopping_cart/ ─────────────────────────────────────────

pub async fn add_to_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), ApiError> {
    add(RecipeListKind::ShoppingCart, identity, state, id).await
}

pub async fn remove_from_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove(RecipeListKind::ShoppingCart, identity, state, id).await
}

pub async fn list_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeSummaryResponse>>, ApiError> {
    list(RecipeListKind::ShoppingCart, identity, state).await
}

// ── GET /api/recipes/download_shopping_cart/ ─────────────────────────────────

pub async fn download_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = DownloadShoppingListUseCase {
        lists: state.recipe_list_repo(),
    };
    let document = usecase.execute(identity.user_id).await?;
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
        ),
    ];
    Ok((headers, document))
}
