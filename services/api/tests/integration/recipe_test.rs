use foodgram_api::domain::types::{DosageInput, RecipeRules};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, ListRecipesUseCase, RecipeInput, RecipeQuery,
    UpdateRecipeUseCase, WriteMode,
};
use foodgram_auth_types::identity::Identity;
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;

use crate::helpers::{
    MockImageStore, MockIngredientRepo, MockRecipeRepo, MockTagRepo, PNG_DATA_URL,
    test_ingredient, test_recipe, test_tag,
};

fn full_input() -> RecipeInput {
    RecipeInput {
        name: Some("Pancakes".to_owned()),
        text: Some("Whisk and fry.".to_owned()),
        cooking_time: Some(20),
        image: Some(PNG_DATA_URL.to_owned()),
        tags: Some(vec![1]),
        ingredients: Some(vec![DosageInput {
            ingredient_id: 1,
            amount: 200,
        }]),
    }
}

fn tags() -> MockTagRepo {
    MockTagRepo::new(vec![test_tag(1, "breakfast"), test_tag(2, "dinner")])
}

fn ingredients() -> MockIngredientRepo {
    MockIngredientRepo::new(vec![
        test_ingredient(1, "flour", "g"),
        test_ingredient(2, "milk", "ml"),
    ])
}

fn author(user_id: i32) -> Identity {
    Identity {
        user_id,
        role: UserRole::User,
    }
}

fn field_errors(err: ApiError) -> foodgram_domain::validation::FieldErrors {
    match err {
        ApiError::Validation(errors) => errors,
        other => panic!("expected Validation, got {other:?}"),
    }
}

// ── CreateRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_recipe_with_saved_image() {
    let images = MockImageStore::new();
    let saved = images.saved_handle();
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::empty(),
        tags: tags(),
        ingredients: ingredients(),
        images,
        rules: RecipeRules::default(),
    };

    let detail = usecase.execute(7, full_input()).await.unwrap();

    assert_eq!(detail.recipe.author_id, 7);
    assert_eq!(detail.recipe.name, "Pancakes");
    assert_eq!(detail.recipe.image, "recipes/mock-1.png");
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_report_every_missing_field_on_create() {
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::empty(),
        tags: tags(),
        ingredients: ingredients(),
        images: MockImageStore::new(),
        rules: RecipeRules::default(),
    };

    let errors = field_errors(
        usecase
            .execute(7, RecipeInput::default())
            .await
            .unwrap_err(),
    );

    for field in ["name", "text", "cooking_time", "image", "tags", "ingredients"] {
        assert!(errors.contains(field), "missing error for {field}");
    }
}

#[tokio::test]
async fn should_reject_duplicate_ingredients_and_bad_amounts() {
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::empty(),
        tags: tags(),
        ingredients: ingredients(),
        images: MockImageStore::new(),
        rules: RecipeRules::default(),
    };
    let input = RecipeInput {
        ingredients: Some(vec![
            DosageInput {
                ingredient_id: 1,
                amount: 0,
            },
            DosageInput {
                ingredient_id: 1,
                amount: 5,
            },
        ]),
        ..full_input()
    };

    let errors = field_errors(usecase.execute(7, input).await.unwrap_err());

    let messages = errors.get("ingredients").unwrap();
    assert!(messages.iter().any(|m| m.contains("must not repeat")));
    assert!(messages.iter().any(|m| m.contains("greater than 0")));
}

#[tokio::test]
async fn should_reject_unknown_tag_and_ingredient_ids() {
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::empty(),
        tags: tags(),
        ingredients: ingredients(),
        images: MockImageStore::new(),
        rules: RecipeRules::default(),
    };
    let input = RecipeInput {
        tags: Some(vec![1, 99]),
        ingredients: Some(vec![DosageInput {
            ingredient_id: 42,
            amount: 1,
        }]),
        ..full_input()
    };

    let errors = field_errors(usecase.execute(7, input).await.unwrap_err());

    assert_eq!(errors.get("tags").unwrap(), ["Unknown tag ids: 99."]);
    assert_eq!(
        errors.get("ingredients").unwrap(),
        ["Unknown ingredient ids: 42."]
    );
}

#[tokio::test]
async fn should_reject_cooking_time_outside_configured_bounds() {
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::empty(),
        tags: tags(),
        ingredients: ingredients(),
        images: MockImageStore::new(),
        rules: RecipeRules {
            cooking_time_max: 60,
            ..RecipeRules::default()
        },
    };
    let input = RecipeInput {
        cooking_time: Some(61),
        ..full_input()
    };

    let errors = field_errors(usecase.execute(7, input).await.unwrap_err());

    assert_eq!(
        errors.get("cooking_time").unwrap(),
        ["Cooking time must be between 1 and 60 minutes."]
    );
}

#[tokio::test]
async fn should_not_store_image_when_validation_fails() {
    let images = MockImageStore::new();
    let saved = images.saved_handle();
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::empty(),
        tags: tags(),
        ingredients: ingredients(),
        images,
        rules: RecipeRules::default(),
    };
    let input = RecipeInput {
        name: Some("   ".to_owned()),
        ..full_input()
    };

    let err = usecase.execute(7, input).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_discard_saved_image_when_create_fails() {
    let images = MockImageStore::new();
    let removed = images.removed_handle();
    let usecase = CreateRecipeUseCase {
        recipes: MockRecipeRepo::failing(vec![]),
        tags: tags(),
        ingredients: ingredients(),
        images,
        rules: RecipeRules::default(),
    };

    let err = usecase.execute(7, full_input()).await.unwrap_err();

    assert!(matches!(err, ApiError::Internal(_)));
    assert_eq!(*removed.lock().unwrap(), ["recipes/mock-1.png"]);
}

// ── UpdateRecipeUseCase ──────────────────────────────────────────────────────

fn update_usecase(
    recipes: MockRecipeRepo,
    images: MockImageStore,
) -> UpdateRecipeUseCase<MockRecipeRepo, MockTagRepo, MockIngredientRepo, MockImageStore> {
    UpdateRecipeUseCase {
        recipes,
        tags: tags(),
        ingredients: ingredients(),
        images,
        rules: RecipeRules::default(),
    }
}

#[tokio::test]
async fn should_return_not_found_before_checking_ownership() {
    let usecase = update_usecase(MockRecipeRepo::empty(), MockImageStore::new());

    let err = usecase
        .execute(&author(2), 5, RecipeInput::default(), WriteMode::Patch)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RecipeNotFound), "got {err:?}");
}

#[tokio::test]
async fn should_forbid_non_author_before_validating() {
    let usecase = update_usecase(
        MockRecipeRepo::new(vec![test_recipe(5, 1)]),
        MockImageStore::new(),
    );

    let err = usecase
        .execute(&author(2), 5, RecipeInput::default(), WriteMode::Replace)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden), "got {err:?}");
}

#[tokio::test]
async fn should_let_admin_edit_any_recipe() {
    let repo = MockRecipeRepo::new(vec![test_recipe(5, 1)]);
    let usecase = update_usecase(repo, MockImageStore::new());
    let admin = Identity {
        user_id: 99,
        role: UserRole::Admin,
    };
    let input = RecipeInput {
        name: Some("Renamed".to_owned()),
        ..RecipeInput::default()
    };

    let detail = usecase
        .execute(&admin, 5, input, WriteMode::Patch)
        .await
        .unwrap();

    assert_eq!(detail.recipe.name, "Renamed");
    assert_eq!(detail.recipe.author_id, 1);
}

#[tokio::test]
async fn should_require_all_fields_but_image_on_replace() {
    let usecase = update_usecase(
        MockRecipeRepo::new(vec![test_recipe(5, 1)]),
        MockImageStore::new(),
    );
    let input = RecipeInput {
        image: None,
        ..full_input()
    };

    let detail = usecase
        .execute(&author(1), 5, input, WriteMode::Replace)
        .await
        .unwrap();
    assert_eq!(detail.recipe.image, "recipes/5.png");

    let err = usecase
        .execute(
            &author(1),
            5,
            RecipeInput {
                name: Some("Only name".to_owned()),
                ..RecipeInput::default()
            },
            WriteMode::Replace,
        )
        .await
        .unwrap_err();
    let errors = field_errors(err);
    assert!(errors.contains("text"));
    assert!(!errors.contains("image"));
}

#[tokio::test]
async fn should_remove_previous_image_after_replacing_it() {
    let images = MockImageStore::new();
    let removed = images.removed_handle();
    let usecase = update_usecase(MockRecipeRepo::new(vec![test_recipe(5, 1)]), images);
    let input = RecipeInput {
        image: Some(PNG_DATA_URL.to_owned()),
        ..RecipeInput::default()
    };

    let detail = usecase
        .execute(&author(1), 5, input, WriteMode::Patch)
        .await
        .unwrap();

    assert_eq!(detail.recipe.image, "recipes/mock-1.png");
    assert_eq!(*removed.lock().unwrap(), ["recipes/5.png"]);
}

#[tokio::test]
async fn should_keep_previous_image_when_update_fails() {
    let images = MockImageStore::new();
    let removed = images.removed_handle();
    let usecase = update_usecase(MockRecipeRepo::failing(vec![test_recipe(5, 1)]), images);
    let input = RecipeInput {
        image: Some(PNG_DATA_URL.to_owned()),
        ..RecipeInput::default()
    };

    let err = usecase
        .execute(&author(1), 5, input, WriteMode::Patch)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Internal(_)));
    assert_eq!(*removed.lock().unwrap(), ["recipes/mock-1.png"]);
}

// ── DeleteRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_recipe_and_its_image() {
    let repo = MockRecipeRepo::new(vec![test_recipe(5, 1)]);
    let recipes = repo.recipes_handle();
    let images = MockImageStore::new();
    let removed = images.removed_handle();
    let usecase = DeleteRecipeUseCase {
        recipes: repo,
        images,
    };

    usecase.execute(&author(1), 5).await.unwrap();

    assert!(recipes.lock().unwrap().is_empty());
    assert_eq!(*removed.lock().unwrap(), ["recipes/5.png"]);
}

#[tokio::test]
async fn should_forbid_deleting_someone_elses_recipe() {
    let repo = MockRecipeRepo::new(vec![test_recipe(5, 1)]);
    let recipes = repo.recipes_handle();
    let usecase = DeleteRecipeUseCase {
        recipes: repo,
        images: MockImageStore::new(),
    };

    let err = usecase.execute(&author(2), 5).await.unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
    assert_eq!(recipes.lock().unwrap().len(), 1);
}

// ── ListRecipesUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_empty_page_for_anonymous_favorites_filter() {
    let usecase = ListRecipesUseCase {
        recipes: MockRecipeRepo::new(vec![test_recipe(1, 1), test_recipe(2, 1)]),
    };
    let query = RecipeQuery {
        is_favorited: Some(true),
        ..RecipeQuery::default()
    };

    let page = usecase
        .execute(query, PageRequest::new(None, None, 6), None)
        .await
        .unwrap();

    assert_eq!(page.count, 0);
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn should_ignore_false_flags_for_anonymous_viewer() {
    let usecase = ListRecipesUseCase {
        recipes: MockRecipeRepo::new(vec![test_recipe(1, 1), test_recipe(2, 2)]),
    };
    let query = RecipeQuery {
        is_in_shopping_cart: Some(false),
        author: Some(2),
        ..RecipeQuery::default()
    };

    let page = usecase
        .execute(query, PageRequest::new(None, None, 6), None)
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].recipe.id, 2);
}
