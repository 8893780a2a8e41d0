//! Roster sign-in commands.

use shopfront_core::{User, UserId};
use shopfront_storefront::session::SessionError;
use shopfront_storefront::state::AppState;
use tracing::info;

/// List roster users.
pub fn list(state: &AppState) {
    let session = state.session();
    let current = session.current_user().map(|user| user.id);

    for user in User::roster() {
        let marker = if Some(user.id) == current { "*" } else { " " };
        info!(
            "{marker} {:>2}  {:<12} {:<12} [{}]",
            user.id.as_i32(),
            user.username,
            user.name,
            user.avatar
        );
    }
}

/// Sign in as `user_id`.
///
/// # Errors
///
/// Returns an error if no roster user has that id.
pub fn login(state: &AppState, user_id: UserId) -> Result<(), SessionError> {
    let mut session = state.session();
    let user = session.login(user_id)?;
    info!("Signed in as {} ({})", user.name, user.username);
    Ok(())
}

/// Sign out.
pub fn logout(state: &AppState) {
    let mut session = state.session();
    if session.current_user().is_none() {
        info!("Not signed in");
        return;
    }
    session.logout();
    info!("Signed out");
}

/// Show the signed-in user.
pub fn whoami(state: &AppState) {
    let session = state.session();
    match session.current_user() {
        Some(user) => info!(
            "{} ({}), {} item(s) in cart",
            user.name,
            user.username,
            session.get_cart_items_count()
        ),
        None => info!("Not signed in. Use `shopfront login <id>`"),
    }
}
