use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use tower::ServiceExt;

use foodgram_api::config::ApiConfig;
use foodgram_api::domain::repository::{
    FollowRepository, ImageStore, IngredientRepository, RecipeListRepository, RecipeRepository,
    TagRepository, UserRepository,
};
use foodgram_api::domain::types::{
    ImageUpload, Ingredient, NewUser, Recipe, RecipeChanges, RecipeDetail, RecipeDraft,
    RecipeFilter, RecipeListKind, RecipeRules, RecipeSummary, ShoppingListLine, Tag, User,
    UserProfile,
};
use foodgram_api::error::ApiError;
use foodgram_api::router::build_router;
use foodgram_api::state::AppState;
use foodgram_api::usecase::password::hash_password;
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;
use foodgram_migration::Migrator;
use foodgram_schema::{ingredients, tags, users};
use foodgram_testing::auth::TEST_TOKEN_SECRET;

/// 8-byte PNG signature as a data URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: i32, username: &str) -> User {
    User {
        id,
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        role: UserRole::User,
        password_hash: "not-a-real-hash".to_owned(),
        created_at: Utc::now(),
    }
}

pub fn test_user_with_password(id: i32, username: &str, password: &str) -> User {
    User {
        password_hash: hash_password(password).unwrap(),
        ..test_user(id, username)
    }
}

pub fn test_recipe(id: i32, author_id: i32) -> Recipe {
    Recipe {
        id,
        author_id,
        name: format!("Recipe {id}"),
        text: "Mix and bake.".to_owned(),
        cooking_time: 30,
        image: format!("recipes/{id}.png"),
        pub_date: Utc::now(),
    }
}

pub fn test_tag(id: i32, slug: &str) -> Tag {
    Tag {
        id,
        name: slug.to_uppercase(),
        color: format!("#0000{id:02}"),
        slug: slug.to_owned(),
    }
}

pub fn test_ingredient(id: i32, name: &str, unit: &str) -> Ingredient {
    Ingredient {
        id,
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

fn write_failed() -> ApiError {
    ApiError::Internal(anyhow::anyhow!("simulated write failure"))
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn username_taken(&self, username: &str) -> Result<bool, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username))
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let created = User {
            id: users.len() as i32 + 1,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            password_hash: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let users = self.users.lock().unwrap();
        let results = users
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((results, users.len() as u64))
    }
}

// ── MockFollowRepo ───────────────────────────────────────────────────────────

pub struct MockFollowRepo {
    pub follows: Arc<Mutex<HashSet<(i32, i32)>>>,
    pub users: Vec<User>,
    /// Pre-check sees nothing but every insert hits an existing row.
    pub raced: bool,
}

impl MockFollowRepo {
    pub fn new(users: Vec<User>, follows: &[(i32, i32)]) -> Self {
        Self {
            follows: Arc::new(Mutex::new(follows.iter().copied().collect())),
            users,
            raced: false,
        }
    }

    /// A concurrent follow wins between `exists` and `create`.
    pub fn raced(users: Vec<User>) -> Self {
        Self {
            raced: true,
            ..Self::new(users, &[])
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], &[])
    }

    pub fn follows_handle(&self) -> Arc<Mutex<HashSet<(i32, i32)>>> {
        Arc::clone(&self.follows)
    }
}

impl FollowRepository for MockFollowRepo {
    async fn exists(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        if self.raced {
            return Ok(false);
        }
        Ok(self.follows.lock().unwrap().contains(&(user_id, author_id)))
    }

    async fn create(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        if self.raced {
            return Ok(false);
        }
        Ok(self.follows.lock().unwrap().insert((user_id, author_id)))
    }

    async fn delete(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        Ok(self.follows.lock().unwrap().remove(&(user_id, author_id)))
    }

    async fn followed_among(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError> {
        let follows = self.follows.lock().unwrap();
        Ok(author_ids
            .iter()
            .copied()
            .filter(|author| follows.contains(&(user_id, *author)))
            .collect())
    }

    async fn list_authors(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let follows = self.follows.lock().unwrap();
        let authors: Vec<User> = self
            .users
            .iter()
            .filter(|u| follows.contains(&(user_id, u.id)))
            .cloned()
            .collect();
        let count = authors.len() as u64;
        let results = authors
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((results, count))
    }
}

// ── MockTagRepo / MockIngredientRepo ─────────────────────────────────────────

pub struct MockTagRepo {
    pub tags: Vec<Tag>,
}

impl MockTagRepo {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }
}

impl TagRepository for MockTagRepo {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        Ok(self.tags.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        Ok(self.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        Ok(ids
            .iter()
            .copied()
            .filter(|id| self.tags.iter().any(|t| t.id == *id))
            .collect())
    }
}

pub struct MockIngredientRepo {
    pub ingredients: Vec<Ingredient>,
}

impl MockIngredientRepo {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self { ingredients }
    }
}

impl IngredientRepository for MockIngredientRepo {
    async fn search(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let prefix = name_prefix.unwrap_or_default().to_lowercase();
        Ok(self
            .ingredients
            .iter()
            .filter(|i| i.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        Ok(self.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        Ok(ids
            .iter()
            .copied()
            .filter(|id| self.ingredients.iter().any(|i| i.id == *id))
            .collect())
    }
}

// ── MockRecipeRepo ───────────────────────────────────────────────────────────

pub struct MockRecipeRepo {
    pub recipes: Arc<Mutex<Vec<Recipe>>>,
    pub fail_writes: bool,
}

impl MockRecipeRepo {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(Mutex::new(recipes)),
            fail_writes: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Every create and update fails with an internal error.
    pub fn failing(recipes: Vec<Recipe>) -> Self {
        Self {
            fail_writes: true,
            ..Self::new(recipes)
        }
    }

    pub fn recipes_handle(&self) -> Arc<Mutex<Vec<Recipe>>> {
        Arc::clone(&self.recipes)
    }
}

fn detail_of(recipe: &Recipe) -> RecipeDetail {
    RecipeDetail {
        recipe: recipe.clone(),
        author: UserProfile {
            user: test_user(recipe.author_id, "author"),
            is_subscribed: false,
        },
        tags: vec![],
        ingredients: vec![],
        is_favorited: false,
        is_in_shopping_cart: false,
    }
}

impl RecipeRepository for MockRecipeRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn detail(
        &self,
        id: i32,
        _viewer: Option<i32>,
    ) -> Result<Option<RecipeDetail>, ApiError> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(detail_of))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        _page: PageRequest,
        _viewer: Option<i32>,
    ) -> Result<(Vec<RecipeDetail>, u64), ApiError> {
        let results: Vec<RecipeDetail> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.author_id.is_none_or(|author| r.author_id == author))
            .map(detail_of)
            .collect();
        let count = results.len() as u64;
        Ok((results, count))
    }

    async fn create(&self, draft: &RecipeDraft) -> Result<i32, ApiError> {
        if self.fail_writes {
            return Err(write_failed());
        }
        let mut recipes = self.recipes.lock().unwrap();
        let id = recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        recipes.push(Recipe {
            id,
            author_id: draft.author_id,
            name: draft.name.clone(),
            text: draft.text.clone(),
            cooking_time: draft.cooking_time,
            image: draft.image.clone(),
            pub_date: Utc::now(),
        });
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError> {
        if self.fail_writes {
            return Err(write_failed());
        }
        let mut recipes = self.recipes.lock().unwrap();
        let Some(recipe) = recipes.iter_mut().find(|r| r.id == id) else {
            return Err(ApiError::RecipeNotFound);
        };
        if let Some(name) = &changes.name {
            recipe.name = name.clone();
        }
        if let Some(text) = &changes.text {
            recipe.text = text.clone();
        }
        if let Some(cooking_time) = changes.cooking_time {
            recipe.cooking_time = cooking_time;
        }
        if let Some(image) = &changes.image {
            recipe.image = image.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() < before)
    }

    async fn summaries_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<(Vec<RecipeSummary>, u64), ApiError> {
        let recipes = self.recipes.lock().unwrap();
        let own: Vec<&Recipe> = recipes.iter().filter(|r| r.author_id == author_id).collect();
        let take = limit.map_or(own.len(), |limit| limit as usize);
        let summaries = own.iter().take(take).map(|r| RecipeSummary::from(*r)).collect();
        Ok((summaries, own.len() as u64))
    }
}

// ── MockRecipeListRepo ───────────────────────────────────────────────────────

pub struct MockRecipeListRepo {
    pub entries: Arc<Mutex<HashSet<(RecipeListKind, i32, i32)>>>,
    pub recipes: Vec<Recipe>,
    pub lines: Vec<ShoppingListLine>,
    /// Pre-check sees nothing but every insert hits an existing row.
    pub raced: bool,
}

impl MockRecipeListRepo {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashSet::new())),
            recipes,
            lines: vec![],
            raced: false,
        }
    }

    /// A concurrent add wins between `contains` and `add`.
    pub fn raced(recipes: Vec<Recipe>) -> Self {
        Self {
            raced: true,
            ..Self::new(recipes)
        }
    }

    pub fn with_lines(lines: Vec<ShoppingListLine>) -> Self {
        Self {
            lines,
            ..Self::new(vec![])
        }
    }

    pub fn entries_handle(&self) -> Arc<Mutex<HashSet<(RecipeListKind, i32, i32)>>> {
        Arc::clone(&self.entries)
    }
}

impl RecipeListRepository for MockRecipeListRepo {
    async fn contains(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        if self.raced {
            return Ok(false);
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .contains(&(kind, user_id, recipe_id)))
    }

    async fn add(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        if self.raced {
            return Ok(false);
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .insert((kind, user_id, recipe_id)))
    }

    async fn remove(
        &self,
        kind: RecipeListKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .remove(&(kind, user_id, recipe_id)))
    }

    async fn list(
        &self,
        kind: RecipeListKind,
        user_id: i32,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let entries = self.entries.lock().unwrap();
        Ok(self
            .recipes
            .iter()
            .filter(|r| entries.contains(&(kind, user_id, r.id)))
            .map(RecipeSummary::from)
            .collect())
    }

    async fn shopping_list(&self, _user_id: i32) -> Result<Vec<ShoppingListLine>, ApiError> {
        Ok(self.lines.clone())
    }
}

// ── MockImageStore ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockImageStore {
    pub saved: Arc<Mutex<Vec<String>>>,
    pub removed: Arc<Mutex<Vec<String>>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.saved)
    }

    pub fn removed_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.removed)
    }
}

impl ImageStore for MockImageStore {
    async fn save(&self, upload: &ImageUpload) -> Result<String, ApiError> {
        let mut saved = self.saved.lock().unwrap();
        let path = format!("recipes/mock-{}.{}", saved.len() + 1, upload.extension);
        saved.push(path.clone());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), ApiError> {
        self.removed.lock().unwrap().push(path.to_owned());
        Ok(())
    }
}

// ── TestApp ──────────────────────────────────────────────────────────────────

/// Full router over a migrated SQLite database and a temporary media root.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("foodgram.db").display()
    );
    let db = Database::connect(&database_url).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = ApiConfig {
        database_url,
        jwt_secret: TEST_TOKEN_SECRET.to_owned(),
        api_port: 0,
        token_ttl_secs: 3600,
        media_root: dir.path().join("media"),
        media_url: "/media/".to_owned(),
        recipe_rules: RecipeRules::default(),
        page_size: 6,
    };
    let state = AppState::new(db, config);
    TestApp {
        router: build_router(state.clone()),
        state,
        dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Insert a user directly. The password is not usable for login.
    pub async fn create_user(&self, username: &str) -> i32 {
        let user = users::ActiveModel {
            email: Set(format!("{username}@example.com")),
            username: Set(username.to_owned()),
            first_name: Set("Test".to_owned()),
            last_name: Set("User".to_owned()),
            role: Set(UserRole::User.as_str().to_owned()),
            password_hash: Set("not-a-real-hash".to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.state.db)
        .await
        .unwrap();
        user.id
    }

    pub async fn create_tag(&self, slug: &str, color: &str) -> i32 {
        let tag = tags::ActiveModel {
            name: Set(slug.to_uppercase()),
            color: Set(color.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.state.db)
        .await
        .unwrap();
        tag.id
    }

    pub async fn create_ingredient(&self, name: &str, unit: &str) -> i32 {
        let ingredient = ingredients::ActiveModel {
            name: Set(name.to_owned()),
            measurement_unit: Set(unit.to_owned()),
            ..Default::default()
        }
        .insert(&self.state.db)
        .await
        .unwrap();
        ingredient.id
    }
}
