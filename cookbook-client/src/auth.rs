use cookbook::basic_models::User;
use strum::{Display, IntoStaticStr};

/// Where to send someone who may not use the authoring form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum Redirect {
    /// Nobody is logged in.
    #[strum(serialize = "/login")]
    Login,
    /// Logged in, but not an administrator.
    #[strum(serialize = "/")]
    Home,
}

/// Decide once, before the form mounts, whether the session user may author recipes.
pub fn authorize(user: Option<User>) -> Result<User, Redirect> {
    match user {
        None => Err(Redirect::Login),
        Some(user) if user.can_author_recipes() => Ok(user),
        Some(user) => {
            tracing::info!(
                "User {} with role {} may not author recipes",
                user.username,
                user.app_user_role
            );
            Err(Redirect::Home)
        }
    }
}
