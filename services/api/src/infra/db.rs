use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, TransactionTrait,
    sea_query::{Expr, SelectStatement},
};

use foodgram_core::sea_ext::{FilterStartsWithCi, is_unique_violation};
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;
use foodgram_schema::{
    dosages, favorites, follows, ingredients, recipe_tags, recipes, shopping_carts, tags, users,
};

use crate::domain::repository::{
    FollowRepository, IngredientRepository, RecipeListRepository, RecipeRepository,
    TagRepository, UserRepository,
};
use crate::domain::types::{
    DosageInput, Ingredient, NewUser, Recipe, RecipeChanges, RecipeDetail, RecipeDraft,
    RecipeFilter, RecipeIngredient, RecipeListKind, RecipeSummary, ShoppingListLine, Tag, User,
    UserProfile,
};
use crate::error::ApiError;

// ── Model conversions ────────────────────────────────────────────────────────

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("user {} has invalid role", model.id))?;
    Ok(User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        role,
        password_hash: model.password_hash,
        created_at: model.created_at,
    })
}

fn users_from_models(models: Vec<users::Model>) -> Result<Vec<User>, ApiError> {
    models.into_iter().map(user_from_model).collect()
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        text: model.text,
        cooking_time: model.cooking_time,
        image: model.image,
        pub_date: model.pub_date,
    }
}

fn summary_from_model(model: &recipes::Model) -> RecipeSummary {
    RecipeSummary {
        id: model.id,
        name: model.name.clone(),
        image: model.image.clone(),
        cooking_time: model.cooking_time,
    }
}

// ── Shared queries ───────────────────────────────────────────────────────────

/// `SELECT recipe_id FROM <favorites|shopping_carts> WHERE user_id = ?`
fn list_subquery(kind: RecipeListKind, user_id: i32) -> SelectStatement {
    match kind {
        RecipeListKind::Favorite => favorites::Entity::find()
            .select_only()
            .column(favorites::Column::RecipeId)
            .filter(favorites::Column::UserId.eq(user_id))
            .into_query(),
        RecipeListKind::ShoppingCart => shopping_carts::Entity::find()
            .select_only()
            .column(shopping_carts::Column::RecipeId)
            .filter(shopping_carts::Column::UserId.eq(user_id))
            .into_query(),
    }
}

/// `SELECT author_id FROM follows WHERE user_id = ?`
fn followed_subquery(user_id: i32) -> SelectStatement {
    follows::Entity::find()
        .select_only()
        .column(follows::Column::AuthorId)
        .filter(follows::Column::UserId.eq(user_id))
        .into_query()
}

async fn followed_among(
    db: &DatabaseConnection,
    user_id: i32,
    author_ids: &[i32],
) -> Result<HashSet<i32>, ApiError> {
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids = follows::Entity::find()
        .select_only()
        .column(follows::Column::AuthorId)
        .filter(follows::Column::UserId.eq(user_id))
        .filter(follows::Column::AuthorId.is_in(author_ids.to_vec()))
        .into_tuple::<i32>()
        .all(db)
        .await
        .context("find followed authors")?;
    Ok(ids.into_iter().collect())
}

async fn list_members(
    db: &DatabaseConnection,
    kind: RecipeListKind,
    user_id: i32,
    recipe_ids: &[i32],
) -> Result<HashSet<i32>, ApiError> {
    let ids = recipes::Entity::find()
        .select_only()
        .column(recipes::Column::Id)
        .filter(recipes::Column::Id.is_in(recipe_ids.to_vec()))
        .filter(recipes::Column::Id.in_subquery(list_subquery(kind, user_id)))
        .into_tuple::<i32>()
        .all(db)
        .await
        .with_context(|| format!("find recipes in {kind}"))?;
    Ok(ids.into_iter().collect())
}

/// Expand recipe rows with authors, tags, ingredients and the viewer's flags.
/// Batched: one query per association regardless of page size.
async fn load_details(
    db: &DatabaseConnection,
    models: Vec<recipes::Model>,
    viewer: Option<i32>,
) -> Result<Vec<RecipeDetail>, ApiError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut author_ids: Vec<i32> = models.iter().map(|m| m.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i32, User> = users_from_models(
        users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids.clone()))
            .all(db)
            .await
            .context("load recipe authors")?,
    )?
    .into_iter()
    .map(|u| (u.id, u))
    .collect();

    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    let tag_rows = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.clone()))
        .order_by_asc(recipe_tags::Column::Id)
        .find_also_related(tags::Entity)
        .all(db)
        .await
        .context("load recipe tags")?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag_from_model(tag));
        }
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
    let dosage_rows = dosages::Entity::find()
        .filter(dosages::Column::RecipeId.is_in(recipe_ids.clone()))
        .order_by_asc(dosages::Column::Id)
        .find_also_related(ingredients::Entity)
        .all(db)
        .await
        .context("load recipe dosages")?;
    for (dosage, ingredient) in dosage_rows {
        if let Some(ingredient) = ingredient {
            ingredients_by_recipe
                .entry(dosage.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    ingredient: ingredient_from_model(ingredient),
                    amount: dosage.amount,
                });
        }
    }

    let (subscribed, favorited, in_cart) = match viewer {
        Some(viewer) => (
            followed_among(db, viewer, &author_ids).await?,
            list_members(db, RecipeListKind::Favorite, viewer, &recipe_ids).await?,
            list_members(db, RecipeListKind::ShoppingCart, viewer, &recipe_ids).await?,
        ),
        None => Default::default(),
    };

    models
        .into_iter()
        .map(|model| -> Result<RecipeDetail, ApiError> {
            let author = authors
                .get(&model.author_id)
                .cloned()
                .with_context(|| format!("author of recipe {} is missing", model.id))?;
            Ok(RecipeDetail {
                author: UserProfile {
                    is_subscribed: subscribed.contains(&author.id),
                    user: author,
                },
                tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
                is_favorited: favorited.contains(&model.id),
                is_in_shopping_cart: in_cart.contains(&model.id),
                recipe: recipe_from_model(model),
            })
        })
        .collect()
}

async fn insert_recipe_tags<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let rows = tag_ids.iter().map(|&tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(tag_id),
        ..Default::default()
    });
    recipe_tags::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

async fn insert_dosages<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    dosages_in: &[DosageInput],
) -> Result<(), DbErr> {
    if dosages_in.is_empty() {
        return Ok(());
    }
    let rows = dosages_in.iter().map(|d| dosages::ActiveModel {
        recipe_id: Set(recipe_id),
        ingredient_id: Set(d.ingredient_id),
        amount: Set(d.amount),
        ..Default::default()
    });
    dosages::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn username_taken(&self, username: &str) -> Result<bool, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let result = users::ActiveModel {
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(user.role.as_str().to_owned()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => user_from_model(model),
            Err(e) if is_unique_violation(&e) => Err(ApiError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update user password")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let query = users::Entity::find();
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = query
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        Ok((users_from_models(models)?, count))
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn exists(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        let count = follows::Entity::find()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("check follow")?;
        Ok(count > 0)
    }

    async fn create(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        let result = follows::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("create follow").into()),
        }
    }

    async fn delete(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn followed_among(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError> {
        followed_among(&self.db, user_id, author_ids).await
    }

    async fn list_authors(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let query =
            users::Entity::find().filter(users::Column::Id.in_subquery(followed_subquery(user_id)));
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count followed authors")?;
        let models = query
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list followed authors")?;
        Ok((users_from_models(models)?, count))
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        let found = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find existing tag ids")?;
        Ok(found.into_iter().collect())
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix {
            query = query.filter_starts_with_ci(ingredients::Column::Name, prefix);
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("search ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        let found = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find existing ingredient ids")?;
        Ok(found.into_iter().collect())
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn detail(
        &self,
        id: i32,
        viewer: Option<i32>,
    ) -> Result<Option<RecipeDetail>, ApiError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?
        else {
            return Ok(None);
        };
        Ok(load_details(&self.db, vec![model], viewer).await?.pop())
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
        viewer: Option<i32>,
    ) -> Result<(Vec<RecipeDetail>, u64), ApiError> {
        let mut query = recipes::Entity::find();
        if !filter.tags.is_empty() {
            let tagged = recipe_tags::Entity::find()
                .select_only()
                .column(recipe_tags::Column::RecipeId)
                .inner_join(tags::Entity)
                .filter(tags::Column::Slug.is_in(filter.tags.clone()))
                .into_query();
            query = query.filter(recipes::Column::Id.in_subquery(tagged));
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if let Some(user_id) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(list_subquery(RecipeListKind::Favorite, user_id)),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id
                    .in_subquery(list_subquery(RecipeListKind::ShoppingCart, user_id)),
            );
        }

        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok((load_details(&self.db, models, viewer).await?, count))
    }

    async fn create(&self, draft: &RecipeDraft) -> Result<i32, ApiError> {
        let id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                let draft = draft.clone();
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(draft.author_id),
                        name: Set(draft.name),
                        text: Set(draft.text),
                        cooking_time: Set(draft.cooking_time),
                        image: Set(draft.image),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_recipe_tags(txn, recipe.id, &draft.tag_ids).await?;
                    insert_dosages(txn, recipe.id, &draft.dosages).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .context("create recipe with tags and dosages")?;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let mut am = recipes::ActiveModel {
                        id: Unchanged(id),
                        ..Default::default()
                    };
                    if let Some(name) = changes.name {
                        am.name = Set(name);
                    }
                    if let Some(text) = changes.text {
                        am.text = Set(text);
                    }
                    if let Some(cooking_time) = changes.cooking_time {
                        am.cooking_time = Set(cooking_time);
                    }
                    if let Some(image) = changes.image {
                        am.image = Set(image);
                    }
                    if am.is_changed() {
                        am.update(txn).await?;
                    }

                    if let Some(tag_ids) = changes.tag_ids {
                        recipe_tags::Entity::delete_many()
                            .filter(recipe_tags::Column::RecipeId.eq(id))
                            .exec(txn)
                            .await?;
                        insert_recipe_tags(txn, id, &tag_ids).await?;
                    }
                    if let Some(new_dosages) = changes.dosages {
                        dosages::Entity::delete_many()
                            .filter(dosages::Column::RecipeId.eq(id))
                            .exec(txn)
                            .await?;
                        insert_dosages(txn, id, &new_dosages).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("update recipe with tags and dosages")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn summaries_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<(Vec<RecipeSummary>, u64), ApiError> {
        let query = recipes::Entity::find().filter(recipes::Column::AuthorId.eq(author_id));
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count author recipes")?;
        let models = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list author recipes")?;
        Ok((models.iter().map(summary_from_model).collect(), count))
    }
}

// ── Recipe list repository (favorites / shopping cart) ──────────────────────

#[derive(Clone)]
pub struct DbRecipeListRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct ShoppingListRow {
    name: String,
    measurement_unit: String,
    total: i64,
}

impl RecipeListRepository for DbRecipeListRepository {
    async fn contains(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        let members = list_members(&self.db, kind, user_id, &[recipe_id]).await?;
        Ok(members.contains(&recipe_id))
    }

    async fn add(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        let result = match kind {
            RecipeListKind::Favorite => favorites::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            RecipeListKind::ShoppingCart => shopping_carts::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("add recipe to {kind}"))
                .into()),
        }
    }

    async fn remove(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        let result = match kind {
            RecipeListKind::Favorite => {
                favorites::Entity::delete_many()
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await
            }
            RecipeListKind::ShoppingCart => {
                shopping_carts::Entity::delete_many()
                    .filter(shopping_carts::Column::UserId.eq(user_id))
                    .filter(shopping_carts::Column::RecipeId.eq(recipe_id))
                    .exec(&self.db)
                    .await
            }
        }
        .with_context(|| format!("remove recipe from {kind}"))?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        kind: RecipeListKind,
        user_id: i32,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let models = recipes::Entity::find()
            .filter(recipes::Column::Id.in_subquery(list_subquery(kind, user_id)))
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .all(&self.db)
            .await
            .with_context(|| format!("list {kind}"))?;
        Ok(models.iter().map(summary_from_model).collect())
    }

    async fn shopping_list(&self, user_id: i32) -> Result<Vec<ShoppingListLine>, ApiError> {
        let rows = dosages::Entity::find()
            .select_only()
            .column_as(ingredients::Column::Name, "name")
            .column_as(ingredients::Column::MeasurementUnit, "measurement_unit")
            .column_as(
                Expr::col((dosages::Entity, dosages::Column::Amount)).sum(),
                "total",
            )
            .inner_join(ingredients::Entity)
            .filter(
                dosages::Column::RecipeId
                    .in_subquery(list_subquery(RecipeListKind::ShoppingCart, user_id)),
            )
            .group_by(ingredients::Column::Id)
            .group_by(ingredients::Column::Name)
            .group_by(ingredients::Column::MeasurementUnit)
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit)
            .into_model::<ShoppingListRow>()
            .all(&self.db)
            .await
            .context("aggregate shopping list")?;
        Ok(rows
            .into_iter()
            .map(|row| ShoppingListLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total: row.total,
            })
            .collect())
    }
}
