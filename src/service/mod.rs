//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate the user store and the relation store.

mod profile;
mod relation;
mod user;

pub use profile::{ProfileUpdateService, UserUpdate};
pub use relation::RelationService;
pub use user::{Registration, UserService};

/// Permissive email syntax check: one `@`, non-empty local part, domain
/// with at least one dot, no whitespace anywhere.
pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("jacob@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("notanemail"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
    }
}
