use foodgram_api::error::ApiError;
use foodgram_api::usecase::follow::{FollowUseCase, ListSubscriptionsUseCase, UnfollowUseCase};
use foodgram_domain::pagination::PageRequest;

use crate::helpers::{MockFollowRepo, MockRecipeRepo, MockUserRepo, test_recipe, test_user};

fn users() -> Vec<foodgram_api::domain::types::User> {
    vec![test_user(1, "reader"), test_user(2, "chef"), test_user(3, "baker")]
}

// ── FollowUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_follow_author_and_preview_limited_recipes() {
    let follows = MockFollowRepo::new(users(), &[]);
    let handle = follows.follows_handle();
    let usecase = FollowUseCase {
        users: MockUserRepo::new(users()),
        follows,
        recipes: MockRecipeRepo::new(vec![
            test_recipe(1, 2),
            test_recipe(2, 2),
            test_recipe(3, 2),
        ]),
    };

    let entry = usecase.execute(1, 2, Some(2)).await.unwrap();

    assert!(entry.profile.is_subscribed);
    assert_eq!(entry.profile.user.id, 2);
    assert_eq!(entry.recipes.len(), 2);
    assert_eq!(entry.recipes_count, 3);
    assert!(handle.lock().unwrap().contains(&(1, 2)));
}

#[tokio::test]
async fn should_reject_following_yourself() {
    let usecase = FollowUseCase {
        users: MockUserRepo::new(users()),
        follows: MockFollowRepo::new(users(), &[]),
        recipes: MockRecipeRepo::empty(),
    };

    let err = usecase.execute(1, 1, None).await.unwrap_err();

    assert!(matches!(err, ApiError::CannotFollowSelf), "got {err:?}");
}

#[tokio::test]
async fn should_reject_duplicate_follow() {
    let usecase = FollowUseCase {
        users: MockUserRepo::new(users()),
        follows: MockFollowRepo::new(users(), &[(1, 2)]),
        recipes: MockRecipeRepo::empty(),
    };

    let err = usecase.execute(1, 2, None).await.unwrap_err();

    assert!(matches!(err, ApiError::AlreadyFollowing), "got {err:?}");
}

#[tokio::test]
async fn should_report_duplicate_when_concurrent_follow_wins_the_insert() {
    let usecase = FollowUseCase {
        users: MockUserRepo::new(users()),
        follows: MockFollowRepo::raced(users()),
        recipes: MockRecipeRepo::empty(),
    };

    let err = usecase.execute(1, 2, None).await.unwrap_err();

    assert!(matches!(err, ApiError::AlreadyFollowing), "got {err:?}");
    assert_eq!(err.kind(), "ALREADY_FOLLOWING");
}

#[tokio::test]
async fn should_return_not_found_when_following_unknown_user() {
    let usecase = FollowUseCase {
        users: MockUserRepo::new(users()),
        follows: MockFollowRepo::empty(),
        recipes: MockRecipeRepo::empty(),
    };

    let err = usecase.execute(1, 77, None).await.unwrap_err();

    assert!(matches!(err, ApiError::UserNotFound));
}

// ── UnfollowUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_unfollow_followed_author() {
    let follows = MockFollowRepo::new(users(), &[(1, 2)]);
    let handle = follows.follows_handle();
    let usecase = UnfollowUseCase {
        users: MockUserRepo::new(users()),
        follows,
    };

    usecase.execute(1, 2).await.unwrap();

    assert!(handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_not_following_on_unfollow() {
    let usecase = UnfollowUseCase {
        users: MockUserRepo::new(users()),
        follows: MockFollowRepo::new(users(), &[]),
    };

    let err = usecase.execute(1, 2).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFollowing));
}

// ── ListSubscriptionsUseCase ─────────────────────────────────────────────────

#[tokio::test]
async fn should_page_followed_authors_with_counts() {
    let usecase = ListSubscriptionsUseCase {
        follows: MockFollowRepo::new(users(), &[(1, 2), (1, 3)]),
        recipes: MockRecipeRepo::new(vec![test_recipe(1, 2), test_recipe(2, 3), test_recipe(3, 3)]),
    };

    let page = usecase
        .execute(1, PageRequest::new(Some(1), Some(1), 6), None)
        .await
        .unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.next, Some(2));
    assert_eq!(page.results.len(), 1);
    assert!(page.results.iter().all(|entry| entry.profile.is_subscribed));
}
