pub mod catalog;
pub mod follow;
pub mod password;
pub mod recipe;
pub mod recipe_list;
pub mod shopping_list;
pub mod user;
