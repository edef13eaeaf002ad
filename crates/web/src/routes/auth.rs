//! Authentication route handlers.
//!
//! Username + password sign-up, login and logout. The logged-in user is kept
//! in the session as a [`CurrentUser`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::forms::{FormErrors, LoginForm, SignupForm};
use crate::middleware::{OptionalAuth, clear_current_user, push_flash, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

const USERNAME_TAKEN: &str = "That username is taken. Please choose a different one.";
const INVALID_LOGIN: &str = "Invalid username or password.";

// =============================================================================
// Templates
// =============================================================================

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub layout: Layout,
    /// Previously entered username; passwords are never echoed back.
    pub username: String,
    pub errors: FormErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub username: String,
    pub errors: FormErrors,
    /// Form-level error, e.g. bad credentials.
    pub error: Option<String>,
}

// =============================================================================
// Sign-up
// =============================================================================

/// Display the sign-up page.
pub async fn signup_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<SignupTemplate> {
    Ok(SignupTemplate {
        layout: Layout::load(&session, user).await?,
        username: String::new(),
        errors: FormErrors::default(),
    })
}

/// Handle sign-up form submission.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(errors) => errors,
    };

    if errors.is_empty() {
        match AuthService::new(state.pool())
            .register(&form.username, &form.password)
            .await
        {
            Ok(_) => {
                push_flash(&session, "Account Created.").await?;
                return Ok(Redirect::to("/auth/login").into_response());
            }
            Err(AuthError::UserAlreadyExists) => errors.add("username", USERNAME_TAKEN),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(SignupTemplate {
        layout: Layout::load(&session, current).await?,
        username: form.username,
        errors,
    }
    .into_response())
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<LoginTemplate> {
    Ok(LoginTemplate {
        layout: Layout::load(&session, user).await?,
        username: String::new(),
        errors: FormErrors::default(),
        error: None,
    })
}

/// Handle login form submission.
///
/// Unknown usernames and wrong passwords get the same message.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let (errors, error) = match form.validate() {
        Err(errors) => (errors, None),
        Ok(()) => match AuthService::new(state.pool())
            .login(&form.username, &form.password)
            .await
        {
            Ok(user) => {
                let current_user = CurrentUser::from(&user);
                set_current_user(&session, &current_user).await?;
                set_sentry_user(&current_user.id, Some(current_user.username.as_str()));

                tracing::info!(user_id = %current_user.id, "User logged in");
                return Ok(Redirect::to("/").into_response());
            }
            Err(AuthError::InvalidCredentials) => {
                tracing::info!("Login failed");
                (FormErrors::default(), Some(INVALID_LOGIN.to_string()))
            }
            Err(e) => return Err(e.into()),
        },
    };

    Ok(LoginTemplate {
        layout: Layout::load(&session, current).await?,
        username: form.username,
        errors,
        error,
    }
    .into_response())
}

/// Log out and drop the session.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
