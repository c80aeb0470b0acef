use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use foodgram_core::health::healthz;
use foodgram_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, logout},
    catalog::{get_ingredient, get_tag, list_ingredients, list_tags},
    follow::{list_subscriptions, subscribe, unsubscribe},
    health::readyz,
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, patch_recipe, replace_recipe},
    recipe_list::{
        add_favorite, add_to_cart, download_shopping_cart, list_cart, list_favorites,
        remove_favorite, remove_from_cart,
    },
    user::{get_me, get_user, list_users, register_user, set_password},
};
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        // Recipes
        .route("/recipes/", get(list_recipes).post(create_recipe))
        .route("/recipes/favorite/", get(list_favorites))
        .route("/recipes/shopping_cart/", get(list_cart))
        .route(
            "/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/recipes/{id}/",
            get(get_recipe)
                .put(replace_recipe)
                .patch(patch_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite/",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart/",
            post(add_to_cart).delete(remove_from_cart),
        )
        // Tags & ingredients
        .route("/tags/", get(list_tags))
        .route("/tags/{id}/", get(get_tag))
        .route("/ingredients/", get(list_ingredients))
        .route("/ingredients/{id}/", get(get_ingredient))
        // Users
        .route("/users/", get(list_users).post(register_user))
        .route("/users/me/", get(get_me))
        .route("/users/set_password/", post(set_password))
        .route("/users/subscriptions/", get(list_subscriptions))
        .route("/users/{id}/", get(get_user))
        .route("/users/{id}/subscribe/", post(subscribe).delete(unsubscribe))
        // Auth
        .route("/auth/token/login/", post(login))
        .route("/auth/token/logout/", post(logout))
}

/// Mount point for the media root. `None` when `media_url` points off-host.
fn media_mount(media_url: &str) -> Option<&str> {
    let path = media_url.trim_end_matches('/');
    (path.starts_with('/') && path.len() > 1).then_some(path)
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api_routes());
    if let Some(mount) = media_mount(&state.config.media_url) {
        router = router.nest_service(mount, ServeDir::new(&state.config.media_root));
    }
    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
