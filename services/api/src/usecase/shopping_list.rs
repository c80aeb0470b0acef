use std::fmt::Write as _;

use crate::domain::repository::RecipeListRepository;
use crate::domain::types::ShoppingListLine;
use crate::error::ApiError;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// Render aggregated lines as a plain-text document, one ingredient per line.
pub fn render_shopping_list(lines: &[ShoppingListLine]) -> String {
    let mut out = String::from("Shopping list:\n");
    for line in lines {
        let _ = writeln!(
            out,
            "- {} ({}) — {}",
            line.name, line.measurement_unit, line.total
        );
    }
    out
}

pub struct DownloadShoppingListUseCase<L: RecipeListRepository> {
    pub lists: L,
}

impl<L: RecipeListRepository> DownloadShoppingListUseCase<L> {
    pub async fn execute(&self, user_id: i32) -> Result<String, ApiError> {
        let lines = self.lists.shopping_list(user_id).await?;
        Ok(render_shopping_list(&lines))
    }
}
