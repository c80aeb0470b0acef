pub mod auth;
pub mod catalog;
pub mod extract;
pub mod follow;
pub mod health;
pub mod recipe;
pub mod recipe_list;
pub mod user;

use serde::Deserialize;

/// `?page=&limit=` shared by paginated endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
