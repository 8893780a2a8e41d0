//! Store users.
//!
//! Users come from a fixed roster; "login" is a trusted selection from it.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A selectable store user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Display name.
    pub name: String,
    /// Initials shown in the avatar badge.
    pub avatar: String,
}

static ROSTER: LazyLock<Vec<User>> = LazyLock::new(|| {
    [
        (1, "jeevan_A", "Jeevan A", "JK"),
        (2, "jithesh_A", "Jithesh A", "JA"),
        (3, "mokshith", "Mokshith K", "MK"),
        (4, "sujith", "Sujith", "SJ"),
        (5, "sachith", "Sachith K", "SK"),
    ]
    .into_iter()
    .map(|(id, username, name, avatar)| User {
        id: UserId::new(id),
        username: username.to_string(),
        name: name.to_string(),
        avatar: avatar.to_string(),
    })
    .collect()
});

impl User {
    /// Every selectable user, in display order.
    #[must_use]
    pub fn roster() -> &'static [Self] {
        &ROSTER
    }

    /// Look up a roster user by id.
    #[must_use]
    pub fn find(id: UserId) -> Option<&'static Self> {
        ROSTER.iter().find(|user| user.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_has_five_users() {
        assert_eq!(User::roster().len(), 5);
    }

    #[test]
    fn test_find() {
        let user = User::find(UserId::new(3)).unwrap();
        assert_eq!(user.username, "mokshith");
        assert_eq!(user.avatar, "MK");
        assert!(User::find(UserId::new(6)).is_none());
    }
}
