//! Well-known role name constants.
//!
//! These must match the seed values accepted by the `users.role` column.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_VOLUNTEER: &str = "volunteer";

/// Whether a role may manage parish settings (event types, field
/// definitions, scripts, presets).
pub fn can_manage_settings(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Whether a role may create and edit events.
pub fn can_manage_events(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_STAFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_manages_settings() {
        assert!(can_manage_settings(ROLE_ADMIN));
        assert!(!can_manage_settings(ROLE_STAFF));
        assert!(!can_manage_settings(ROLE_VOLUNTEER));
    }

    #[test]
    fn staff_manages_events_but_not_settings() {
        assert!(can_manage_events(ROLE_STAFF));
        assert!(!can_manage_settings(ROLE_STAFF));
    }
}
