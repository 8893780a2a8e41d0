//! Theme preference command.

use shopfront_storefront::state::AppState;
use tracing::info;

/// Show the theme, or persist a new one when `dark` is given.
pub fn theme(state: &AppState, dark: Option<bool>) {
    let mut session = state.session();
    if let Some(dark) = dark {
        session.set_dark_mode(dark);
    }
    info!(
        "Theme: {}",
        if session.dark_mode() { "dark" } else { "light" }
    );
}
