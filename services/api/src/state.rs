use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use foodgram_auth_types::identity::TokenSecret;
use foodgram_domain::pagination::PageRequest;

use crate::config::ApiConfig;
use crate::infra::db::{
    DbFollowRepository, DbIngredientRepository, DbRecipeListRepository, DbRecipeRepository,
    DbTagRepository, DbUserRepository,
};
use crate::infra::media::FsImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<ApiConfig>,
    pub token_secret: TokenSecret,
    pub images: FsImageStore,
}

impl FromRef<AppState> for TokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.token_secret.clone()
    }
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: ApiConfig) -> Self {
        Self {
            db,
            token_secret: TokenSecret(Arc::from(config.jwt_secret.as_str())),
            images: FsImageStore::new(config.media_root.clone()),
            config: Arc::new(config),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_list_repo(&self) -> DbRecipeListRepository {
        DbRecipeListRepository {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> FsImageStore {
        self.images.clone()
    }

    pub fn page_request(&self, page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::new(page, limit, self.config.page_size)
    }

    /// Public URL of a stored media path.
    pub fn media_url(&self, path: &str) -> String {
        format!("{}{}", self.config.media_url, path)
    }
}
