use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::{Identity, MaybeIdentity};
use foodgram_domain::pagination::Page;
use foodgram_domain::validation::FieldErrors;

use crate::domain::types::{DosageInput, RecipeDetail, RecipeSummary, parse_flag};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiQuery};
use crate::handlers::catalog::TagResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase, RecipeInput,
    RecipeQuery, UpdateRecipeUseCase, WriteMode,
};

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeResponse {
    pub fn new(detail: RecipeDetail, state: &AppState) -> Self {
        let RecipeDetail {
            recipe,
            author,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        } = detail;
        Self {
            id: recipe.id,
            tags: tags.into_iter().map(TagResponse::from).collect(),
            author: author.into(),
            ingredients: ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse {
                    id: line.ingredient.id,
                    name: line.ingredient.name,
                    measurement_unit: line.ingredient.measurement_unit,
                    amount: line.amount,
                })
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: state.media_url(&recipe.image),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Short recipe card used by favorites, the shopping cart and subscriptions.
#[derive(Debug, Serialize)]
pub struct RecipeSummaryResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeSummaryResponse {
    pub fn new(summary: RecipeSummary, state: &AppState) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: state.media_url(&summary.image),
            cooking_time: summary.cooking_time,
        }
    }
}

// ── Request body ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DosageRequest {
    pub id: i32,
    pub amount: i32,
}

/// Body of POST, PUT and PATCH. Which fields are required depends on the method.
#[derive(Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<DosageRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(body: RecipeRequest) -> Self {
        Self {
            name: body.name,
            text: body.text,
            cooking_time: body.cooking_time,
            image: body.image,
            tags: body.tags,
            ingredients: body.ingredients.map(|lines| {
                lines
                    .into_iter()
                    .map(|line| DosageInput {
                        ingredient_id: line.id,
                        amount: line.amount,
                    })
                    .collect()
            }),
        }
    }
}

// ── GET /api/recipes/ ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn flag(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<bool> {
    let raw = raw?;
    let parsed = parse_flag(raw);
    if parsed.is_none() {
        errors.add(field, format!("Expected 0/1 or true/false, got {raw:?}."));
    }
    parsed
}

pub async fn list_recipes(
    viewer: MaybeIdentity,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecipeListQuery>,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let mut errors = FieldErrors::new();
    let is_favorited = flag("is_favorited", query.is_favorited.as_deref(), &mut errors);
    let is_in_shopping_cart = flag(
        "is_in_shopping_cart",
        query.is_in_shopping_cart.as_deref(),
        &mut errors,
    );
    errors.into_result()?;

    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
    };
    let page = state.page_request(query.page, query.limit);
    let recipes = usecase
        .execute(
            RecipeQuery {
                tags: query.tags,
                author: query.author,
                is_favorited,
                is_in_shopping_cart,
            },
            page,
            viewer.user_id(),
        )
        .await?;
    Ok(Json(recipes.map(|detail| RecipeResponse::new(detail, &state))))
}

// ── POST /api/recipes/ ───────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        images: state.image_store(),
        rules: state.config.recipe_rules,
    };
    let detail = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(RecipeResponse::new(detail, &state))))
}

// ── GET /api/recipes/{id}/ ───────────────────────────────────────────────────

pub async fn get_recipe(
    viewer: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    let detail = usecase.execute(id, viewer.user_id()).await?;
    Ok(Json(RecipeResponse::new(detail, &state)))
}

// ── PUT / PATCH /api/recipes/{id}/ ───────────────────────────────────────────

async fn update_recipe(
    identity: Identity,
    state: AppState,
    id: i32,
    body: RecipeRequest,
    mode: WriteMode,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        images: state.image_store(),
        rules: state.config.recipe_rules,
    };
    let detail = usecase.execute(&identity, id, body.into(), mode).await?;
    Ok(Json(RecipeResponse::new(detail, &state)))
}

pub async fn replace_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    update_recipe(identity, state, id, body, WriteMode::Replace).await
}

pub async fn patch_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    update_recipe(identity, state, id, body, WriteMode::Patch).await
}

// ── DELETE /api/recipes/{id}/ ────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
        images: state.image_store(),
    };
    usecase.execute(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
