//! Mock auth helpers for integration tests.
//!
//! `MockAuth` signs a real token with the test secret, so requests pass through the
//! same `Identity` extractor as production traffic.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

use foodgram_auth_types::token::issue_token;
use foodgram_domain::user::UserRole;

/// Secret shared by test app states and `MockAuth`.
pub const TEST_TOKEN_SECRET: &str = "test-token-secret-for-integration-tests";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: i32,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn user(user_id: i32) -> Self {
        Self::new(user_id, UserRole::User)
    }

    pub fn admin(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    /// `Authorization` header value, e.g. `Token eyJ...`.
    pub fn header_value(&self) -> String {
        let (token, _) = issue_token(self.user_id, self.role, TEST_TOKEN_SECRET, 3600)
            .expect("sign test token");
        format!("Token {token}")
    }

    /// Return headers as if the client had logged in.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.header_value()).expect("valid header value"),
        );
        map
    }
}
