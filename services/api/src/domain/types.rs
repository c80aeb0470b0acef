use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use foodgram_domain::user::UserRole;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account data for registration, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub password_hash: String,
}

/// A user as seen by the requester.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub is_subscribed: bool,
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct AuthorWithRecipes {
    pub profile: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Recipe row. `image` is relative to the media root.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub pub_date: DateTime<Utc>,
}

/// Short recipe form used by favorites, cart and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// Fully expanded recipe, flags resolved for the requester.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub author: UserProfile,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosageInput {
    pub ingredient_id: i32,
    pub amount: i32,
}

/// Validated data for a new recipe.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub tag_ids: Vec<i32>,
    pub dosages: Vec<DosageInput>,
}

/// Validated changes to an existing recipe. `None` keeps the stored value;
/// `Some` tag or dosage lists replace the stored sets entirely.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    pub tag_ids: Option<Vec<i32>>,
    pub dosages: Option<Vec<DosageInput>>,
}

/// Narrowing applied to the recipe listing.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Tag slugs, OR semantics.
    pub tags: Vec<String>,
    pub author_id: Option<i32>,
    pub favorited_by: Option<i32>,
    pub in_cart_of: Option<i32>,
}

/// Per-user recipe list. Favorites and the shopping cart share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeListKind {
    Favorite,
    ShoppingCart,
}

impl fmt::Display for RecipeListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping cart",
        })
    }
}

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Bounds applied when validating recipe payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeRules {
    pub name_max_len: usize,
    pub cooking_time_min: i32,
    pub cooking_time_max: i32,
}

impl Default for RecipeRules {
    fn default() -> Self {
        Self {
            name_max_len: 200,
            cooking_time_min: 1,
            cooking_time_max: 1440,
        }
    }
}

/// Decoded `data:image/<ext>;base64,<payload>` upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Parse a base64 data URL. `None` when the URL or payload is malformed.
    pub fn from_data_url(input: &str) -> Option<Self> {
        let (header, payload) = input.split_once(";base64,")?;
        let extension = header.strip_prefix("data:image/")?.to_ascii_lowercase();
        let extension = match extension.as_str() {
            "jpeg" => "jpg".to_owned(),
            "svg+xml" => "svg".to_owned(),
            _ => extension,
        };
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let bytes = STANDARD.decode(payload.trim()).ok()?;
        if bytes.is_empty() {
            return None;
        }
        Some(Self { extension, bytes })
    }
}

/// Parse a boolean-like query flag: `1`/`true` or `0`/`false`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
