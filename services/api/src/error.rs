use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::QueryRejection;

use foodgram_domain::validation::FieldErrors;

use crate::domain::types::RecipeListKind;

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("user not found")]
    UserNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("recipe is not in {0}")]
    NotInList(RecipeListKind),
    #[error("not following this user")]
    NotFollowing,
    #[error("recipe is already in {0}")]
    AlreadyInList(RecipeListKind),
    #[error("already following this user")]
    AlreadyFollowing,
    #[error("cannot follow yourself")]
    CannotFollowSelf,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("unable to log in with provided credentials")]
    InvalidCredentials,
    #[error("current password is incorrect")]
    InvalidCurrentPassword,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::NotInList(RecipeListKind::Favorite) => "NOT_IN_FAVORITES",
            Self::NotInList(RecipeListKind::ShoppingCart) => "NOT_IN_SHOPPING_CART",
            Self::NotFollowing => "NOT_FOLLOWING",
            Self::AlreadyInList(RecipeListKind::Favorite) => "ALREADY_IN_FAVORITES",
            Self::AlreadyInList(RecipeListKind::ShoppingCart) => "ALREADY_IN_SHOPPING_CART",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidCurrentPassword => "INVALID_CURRENT_PASSWORD",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::RecipeNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::NotInList(_)
            | Self::NotFollowing => StatusCode::NOT_FOUND,
            Self::Validation(_)
            | Self::AlreadyInList(_)
            | Self::AlreadyFollowing
            | Self::CannotFollowSelf
            | Self::UserAlreadyExists
            | Self::InvalidCredentials
            | Self::InvalidCurrentPassword => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Maps a serde failure (`path: message`, prefixed by the extractor's own
/// wording) onto the field it names, or onto the request as a whole.
fn deserialize_errors(text: &str) -> FieldErrors {
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);
    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            FieldErrors::single(path, message)
        }
        _ => FieldErrors::single(FieldErrors::NON_FIELD, detail),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let errors = match rejection {
            JsonRejection::JsonDataError(e) => deserialize_errors(&e.body_text()),
            other => FieldErrors::single(FieldErrors::NON_FIELD, other.body_text()),
        };
        Self::Validation(errors)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(deserialize_errors(&rejection.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(fields) = &self {
            body["fields"] = serde_json::to_value(fields).unwrap_or_default();
        }
        (status, axum::Json(body)).into_response()
    }
}
