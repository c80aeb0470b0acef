//! sea-orm entities for the Foodgram database.

pub mod dosages;
pub mod favorites;
pub mod follows;
pub mod ingredients;
pub mod recipe_tags;
pub mod recipes;
pub mod shopping_carts;
pub mod tags;
pub mod users;
