//! Acting-user configuration for maintenance commands.
//!
//! Interactive callers pass the acting user explicitly. The maintenance binary has
//! no request context, so it reads the username from `TRACKER_USER` instead and
//! falls back to an anonymous system change when the variable is unset.

/// Environment variable naming the user that maintenance commands act as
pub const ACTING_USER_VAR: &str = "TRACKER_USER";

/// Actor named in logs when no user is acting
pub const SYSTEM_ACTOR: &str = "System/Unknown";

/// Reads the acting username from the environment, ignoring blank values.
#[must_use]
pub fn get_acting_username() -> Option<String> {
    std::env::var(ACTING_USER_VAR)
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Label used in activity logs for an optional acting user id.
#[must_use]
pub fn actor_label(acting_user: Option<i64>) -> String {
    acting_user.map_or_else(|| SYSTEM_ACTOR.to_string(), |id| format!("user#{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_label() {
        assert_eq!(actor_label(None), "System/Unknown");
        assert_eq!(actor_label(Some(3)), "user#3");
    }
}
