use std::collections::HashSet;

use foodgram_auth_types::identity::Identity;
use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_domain::validation::FieldErrors;

use crate::domain::repository::{
    ImageStore, IngredientRepository, RecipeRepository, TagRepository,
};
use crate::domain::types::{
    DosageInput, ImageUpload, RecipeChanges, RecipeDetail, RecipeDraft, RecipeFilter,
    RecipeRules,
};
use crate::error::ApiError;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

/// Raw recipe payload. Absent fields are `None`.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    /// `data:image/<ext>;base64,<payload>`
    pub image: Option<String>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<DosageInput>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every field required.
    Create,
    /// Every field required except `image`.
    Replace,
    /// Any subset.
    Patch,
}

impl WriteMode {
    fn requires(self, field: &str) -> bool {
        match self {
            Self::Create => true,
            Self::Replace => field != "image",
            Self::Patch => false,
        }
    }
}

/// Fields that passed shape validation.
#[derive(Debug, Default)]
struct CheckedRecipe {
    name: Option<String>,
    text: Option<String>,
    cooking_time: Option<i32>,
    image: Option<ImageUpload>,
    tags: Option<Vec<i32>>,
    dosages: Option<Vec<DosageInput>>,
}

fn has_duplicates(ids: impl IntoIterator<Item = i32>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().any(|id| !seen.insert(id))
}

fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&String>,
    mode: WriteMode,
    max_len: Option<usize>,
) -> Option<String> {
    let Some(value) = value else {
        if mode.requires(field) {
            errors.add(field, REQUIRED);
        }
        return None;
    };
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if let Some(max) = max_len.filter(|max| value.chars().count() > *max) {
        errors.add(
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
        return None;
    }
    Some(value.to_owned())
}

/// Validate every present field and report missing required ones. All problems are collected.
fn check_fields(
    input: &RecipeInput,
    mode: WriteMode,
    rules: &RecipeRules,
) -> (CheckedRecipe, FieldErrors) {
    let mut errors = FieldErrors::new();
    let mut checked = CheckedRecipe {
        name: check_text(
            &mut errors,
            "name",
            input.name.as_ref(),
            mode,
            Some(rules.name_max_len),
        ),
        text: check_text(&mut errors, "text", input.text.as_ref(), mode, None),
        ..Default::default()
    };

    match input.cooking_time {
        Some(minutes) if (rules.cooking_time_min..=rules.cooking_time_max).contains(&minutes) => {
            checked.cooking_time = Some(minutes);
        }
        Some(_) => errors.add(
            "cooking_time",
            format!(
                "Cooking time must be between {} and {} minutes.",
                rules.cooking_time_min, rules.cooking_time_max
            ),
        ),
        None if mode.requires("cooking_time") => errors.add("cooking_time", REQUIRED),
        None => {}
    }

    match input.image.as_deref() {
        Some(data_url) => match ImageUpload::from_data_url(data_url) {
            Some(upload) => checked.image = Some(upload),
            None => errors.add("image", "Upload a valid base64-encoded image."),
        },
        None if mode.requires("image") => errors.add("image", REQUIRED),
        None => {}
    }

    match &input.tags {
        Some(tags) if tags.is_empty() => errors.add("tags", "Select at least one tag."),
        Some(tags) if has_duplicates(tags.iter().copied()) => {
            errors.add("tags", "Tags must not repeat.");
        }
        Some(tags) => checked.tags = Some(tags.clone()),
        None if mode.requires("tags") => errors.add("tags", REQUIRED),
        None => {}
    }

    match &input.ingredients {
        Some(dosages) if dosages.is_empty() => {
            errors.add("ingredients", "Add at least one ingredient.");
        }
        Some(dosages) => {
            let mut valid = true;
            if has_duplicates(dosages.iter().map(|d| d.ingredient_id)) {
                errors.add("ingredients", "Ingredients must not repeat.");
                valid = false;
            }
            if dosages.iter().any(|d| d.amount <= 0) {
                errors.add("ingredients", "Amount must be greater than 0.");
                valid = false;
            }
            if valid {
                checked.dosages = Some(dosages.clone());
            }
        }
        None if mode.requires("ingredients") => errors.add("ingredients", REQUIRED),
        None => {}
    }

    (checked, errors)
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flag tag and ingredient ids that do not exist.
async fn check_references<T: TagRepository, I: IngredientRepository>(
    tags: &T,
    ingredients: &I,
    checked: &CheckedRecipe,
    errors: &mut FieldErrors,
) -> Result<(), ApiError> {
    if let Some(ids) = &checked.tags {
        let known = tags.existing_ids(ids).await?;
        let unknown: Vec<i32> = ids.iter().copied().filter(|id| !known.contains(id)).collect();
        if !unknown.is_empty() {
            errors.add("tags", format!("Unknown tag ids: {}.", join_ids(&unknown)));
        }
    }
    if let Some(dosages) = &checked.dosages {
        let ids: Vec<i32> = dosages.iter().map(|d| d.ingredient_id).collect();
        let known = ingredients.existing_ids(&ids).await?;
        let unknown: Vec<i32> = ids.into_iter().filter(|id| !known.contains(id)).collect();
        if !unknown.is_empty() {
            errors.add(
                "ingredients",
                format!("Unknown ingredient ids: {}.", join_ids(&unknown)),
            );
        }
    }
    Ok(())
}

async fn discard_image<S: ImageStore>(images: &S, path: &str) {
    if let Err(e) = images.remove(path).await {
        tracing::warn!(error = %e, path, "failed to remove recipe image");
    }
}

fn ensure_can_modify(identity: &Identity, author_id: i32) -> Result<(), ApiError> {
    if identity.user_id == author_id || identity.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
    pub images: S,
    pub rules: RecipeRules,
}

impl<R, T, I, S> CreateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    pub async fn execute(
        &self,
        author_id: i32,
        input: RecipeInput,
    ) -> Result<RecipeDetail, ApiError> {
        let (checked, mut errors) = check_fields(&input, WriteMode::Create, &self.rules);
        check_references(&self.tags, &self.ingredients, &checked, &mut errors).await?;
        errors.into_result()?;

        let CheckedRecipe {
            name: Some(name),
            text: Some(text),
            cooking_time: Some(cooking_time),
            image: Some(upload),
            tags: Some(tag_ids),
            dosages: Some(dosages),
        } = checked
        else {
            return Err(anyhow::anyhow!("validated recipe is missing fields").into());
        };

        let image = self.images.save(&upload).await?;
        let draft = RecipeDraft {
            author_id,
            name,
            text,
            cooking_time,
            image: image.clone(),
            tag_ids,
            dosages,
        };
        let id = match self.recipes.create(&draft).await {
            Ok(id) => id,
            Err(e) => {
                discard_image(&self.images, &image).await;
                return Err(e);
            }
        };
        tracing::info!(recipe_id = id, author_id, "recipe created");

        self.recipes
            .detail(id, Some(author_id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
    pub images: S,
    pub rules: RecipeRules,
}

impl<R, T, I, S> UpdateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    /// `mode` is `Replace` for PUT and `Patch` for PATCH.
    pub async fn execute(
        &self,
        identity: &Identity,
        recipe_id: i32,
        input: RecipeInput,
        mode: WriteMode,
    ) -> Result<RecipeDetail, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        ensure_can_modify(identity, recipe.author_id)?;

        let (checked, mut errors) = check_fields(&input, mode, &self.rules);
        check_references(&self.tags, &self.ingredients, &checked, &mut errors).await?;
        errors.into_result()?;

        let new_image = match &checked.image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };
        let changes = RecipeChanges {
            name: checked.name,
            text: checked.text,
            cooking_time: checked.cooking_time,
            image: new_image.clone(),
            tag_ids: checked.tags,
            dosages: checked.dosages,
        };
        if let Err(e) = self.recipes.update(recipe_id, &changes).await {
            if let Some(path) = &new_image {
                discard_image(&self.images, path).await;
            }
            return Err(e);
        }
        if new_image.is_some() {
            discard_image(&self.images, &recipe.image).await;
        }
        tracing::info!(recipe_id, user_id = identity.user_id, "recipe updated");

        self.recipes
            .detail(recipe_id, Some(identity.user_id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository, S: ImageStore> {
    pub recipes: R,
    pub images: S,
}

impl<R: RecipeRepository, S: ImageStore> DeleteRecipeUseCase<R, S> {
    pub async fn execute(&self, identity: &Identity, recipe_id: i32) -> Result<(), ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        ensure_can_modify(identity, recipe.author_id)?;
        if !self.recipes.delete(recipe_id).await? {
            return Err(ApiError::RecipeNotFound);
        }
        discard_image(&self.images, &recipe.image).await;
        tracing::info!(recipe_id, user_id = identity.user_id, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(
        &self,
        recipe_id: i32,
        viewer: Option<i32>,
    ) -> Result<RecipeDetail, ApiError> {
        self.recipes
            .detail(recipe_id, viewer)
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        query: RecipeQuery,
        page: PageRequest,
        viewer: Option<i32>,
    ) -> Result<Page<RecipeDetail>, ApiError> {
        let wants_favorites = query.is_favorited == Some(true);
        let wants_cart = query.is_in_shopping_cart == Some(true);
        if viewer.is_none() && (wants_favorites || wants_cart) {
            return Ok(Page::empty(page));
        }
        let filter = RecipeFilter {
            tags: query.tags,
            author_id: query.author,
            favorited_by: viewer.filter(|_| wants_favorites),
            in_cart_of: viewer.filter(|_| wants_cart),
        };
        let (recipes, count) = self.recipes.list(&filter, page, viewer).await?;
        Ok(Page::new(recipes, count, page))
    }
}
