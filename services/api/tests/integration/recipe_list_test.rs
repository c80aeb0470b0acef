use foodgram_api::domain::types::{RecipeListKind, ShoppingListLine};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe_list::{AddToListUseCase, GetListUseCase, RemoveFromListUseCase};
use foodgram_api::usecase::shopping_list::DownloadShoppingListUseCase;

use crate::helpers::{MockRecipeListRepo, MockRecipeRepo, test_recipe};

// ── AddToListUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_add_recipe_to_favorites_and_return_summary() {
    let lists = MockRecipeListRepo::new(vec![]);
    let entries = lists.entries_handle();
    let usecase = AddToListUseCase {
        recipes: MockRecipeRepo::new(vec![test_recipe(3, 1)]),
        lists,
    };

    let summary = usecase
        .execute(RecipeListKind::Favorite, 2, 3)
        .await
        .unwrap();

    assert_eq!(summary.id, 3);
    assert_eq!(summary.image, "recipes/3.png");
    assert!(
        entries
            .lock()
            .unwrap()
            .contains(&(RecipeListKind::Favorite, 2, 3))
    );
}

#[tokio::test]
async fn should_reject_adding_the_same_recipe_twice() {
    let usecase = AddToListUseCase {
        recipes: MockRecipeRepo::new(vec![test_recipe(3, 1)]),
        lists: MockRecipeListRepo::new(vec![]),
    };
    usecase
        .execute(RecipeListKind::ShoppingCart, 2, 3)
        .await
        .unwrap();

    let err = usecase
        .execute(RecipeListKind::ShoppingCart, 2, 3)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::AlreadyInList(RecipeListKind::ShoppingCart)),
        "got {err:?}"
    );
    assert_eq!(err.kind(), "ALREADY_IN_SHOPPING_CART");
}

#[tokio::test]
async fn should_report_duplicate_when_concurrent_add_wins_the_insert() {
    let usecase = AddToListUseCase {
        recipes: MockRecipeRepo::new(vec![test_recipe(3, 1)]),
        lists: MockRecipeListRepo::raced(vec![]),
    };

    let err = usecase
        .execute(RecipeListKind::Favorite, 2, 3)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::AlreadyInList(RecipeListKind::Favorite)),
        "got {err:?}"
    );
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_keep_favorites_and_cart_independent() {
    let usecase = AddToListUseCase {
        recipes: MockRecipeRepo::new(vec![test_recipe(3, 1)]),
        lists: MockRecipeListRepo::new(vec![]),
    };

    usecase
        .execute(RecipeListKind::Favorite, 2, 3)
        .await
        .unwrap();
    usecase
        .execute(RecipeListKind::ShoppingCart, 2, 3)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_return_not_found_for_unknown_recipe() {
    let usecase = AddToListUseCase {
        recipes: MockRecipeRepo::empty(),
        lists: MockRecipeListRepo::new(vec![]),
    };

    let err = usecase
        .execute(RecipeListKind::Favorite, 2, 404)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RecipeNotFound));
}

// ── RemoveFromListUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_missing_entry_on_remove() {
    let usecase = RemoveFromListUseCase {
        lists: MockRecipeListRepo::new(vec![]),
    };

    let err = usecase
        .execute(RecipeListKind::Favorite, 2, 3)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotInList(RecipeListKind::Favorite)));
    assert_eq!(err.kind(), "NOT_IN_FAVORITES");
}

#[tokio::test]
async fn should_list_only_own_entries_of_requested_kind() {
    let lists = MockRecipeListRepo::new(vec![test_recipe(1, 9), test_recipe(2, 9)]);
    {
        let mut entries = lists.entries.lock().unwrap();
        entries.insert((RecipeListKind::Favorite, 2, 1));
        entries.insert((RecipeListKind::ShoppingCart, 2, 2));
        entries.insert((RecipeListKind::Favorite, 3, 2));
    }
    let usecase = GetListUseCase { lists };

    let favorites = usecase.execute(RecipeListKind::Favorite, 2).await.unwrap();

    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, 1);
}

// ── DownloadShoppingListUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_render_aggregated_lines_as_text() {
    let usecase = DownloadShoppingListUseCase {
        lists: MockRecipeListRepo::with_lines(vec![
            ShoppingListLine {
                name: "flour".to_owned(),
                measurement_unit: "g".to_owned(),
                total: 450,
            },
            ShoppingListLine {
                name: "milk".to_owned(),
                measurement_unit: "ml".to_owned(),
                total: 300,
            },
        ]),
    };

    let document = usecase.execute(2).await.unwrap();

    assert!(document.contains("flour (g) — 450"), "{document}");
    assert!(document.contains("milk (ml) — 300"), "{document}");
}
