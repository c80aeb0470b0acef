use foodgram_auth_types::token::issue_token;
use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_domain::user::UserRole;
use foodgram_domain::validation::FieldErrors;

use crate::domain::repository::{FollowRepository, UserRepository};
use crate::domain::types::{NewUser, User, UserProfile};
use crate::error::ApiError;
use crate::usecase::password::{hash_password, verify_password};

pub const EMAIL_MAX_LEN: usize = 254;
pub const USER_FIELD_MAX_LEN: usize = 150;
const REQUIRED: &str = "This field is required.";

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
    }
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, ApiError> {
        let email = input.email.trim().to_owned();
        let username = input.username.trim().to_owned();
        let first_name = input.first_name.trim().to_owned();
        let last_name = input.last_name.trim().to_owned();

        let mut errors = FieldErrors::new();
        check_length(&mut errors, "email", &email, EMAIL_MAX_LEN);
        if !email.is_empty() && !looks_like_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }
        check_length(&mut errors, "username", &username, USER_FIELD_MAX_LEN);
        if !username.chars().all(is_username_char) {
            errors.add(
                "username",
                "Username may contain only letters, digits and @/./+/-/_ characters.",
            );
        }
        if username.eq_ignore_ascii_case("me") {
            errors.add("username", "Username \"me\" is reserved.");
        }
        check_length(&mut errors, "first_name", &first_name, USER_FIELD_MAX_LEN);
        check_length(&mut errors, "last_name", &last_name, USER_FIELD_MAX_LEN);
        if input.password.is_empty() {
            errors.add("password", REQUIRED);
        }

        if !errors.contains("email") && self.users.find_by_email(&email).await?.is_some() {
            errors.add("email", "A user with that email already exists.");
        }
        if !errors.contains("username") && self.users.username_taken(&username).await? {
            errors.add("username", "A user with that username already exists.");
        }
        errors.into_result()?;

        let new_user = NewUser {
            email,
            username,
            first_name,
            last_name,
            role: UserRole::User,
            password_hash: hash_password(&input.password)?,
        };
        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub token_secret: String,
    pub token_ttl_secs: u64,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// Returns a signed auth token.
    pub async fn execute(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }
        let (token, _) = issue_token(
            user.id,
            user.role,
            &self.token_secret,
            self.token_ttl_secs,
        )
        .map_err(anyhow::Error::from)?;
        Ok(token)
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> SetPasswordUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        if new_password.is_empty() {
            return Err(FieldErrors::single("new_password", REQUIRED).into());
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if !verify_password(current_password, &user.password_hash)? {
            return Err(ApiError::InvalidCurrentPassword);
        }
        let hash = hash_password(new_password)?;
        self.users.update_password(user_id, &hash).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository, F: FollowRepository> {
    pub users: R,
    pub follows: F,
}

impl<R: UserRepository, F: FollowRepository> GetUserUseCase<R, F> {
    pub async fn execute(&self, id: i32, viewer: Option<i32>) -> Result<UserProfile, ApiError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let is_subscribed = match viewer {
            Some(viewer) if viewer != id => self.follows.exists(viewer, id).await?,
            _ => false,
        };
        Ok(UserProfile {
            user,
            is_subscribed,
        })
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository, F: FollowRepository> {
    pub users: R,
    pub follows: F,
}

impl<R: UserRepository, F: FollowRepository> ListUsersUseCase<R, F> {
    pub async fn execute(
        &self,
        page: PageRequest,
        viewer: Option<i32>,
    ) -> Result<Page<UserProfile>, ApiError> {
        let (users, count) = self.users.list(page).await?;
        let followed = match viewer {
            Some(viewer) => {
                let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
                self.follows.followed_among(viewer, &ids).await?
            }
            None => Default::default(),
        };
        let profiles = users
            .into_iter()
            .map(|user| UserProfile {
                is_subscribed: followed.contains(&user.id),
                user,
            })
            .collect();
        Ok(Page::new(profiles, count, page))
    }
}
