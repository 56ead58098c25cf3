//! Ownership policy
//!
//! The single owner-or-staff predicate shared by order cancellation and
//! reservation cancellation, instead of per-handler role branching.

use super::CurrentUser;

/// May `actor` manage a resource owned by `owner_id` / `owner_email`?
///
/// Staff and admin always may. Otherwise the actor must match the owner by
/// user id, or — for resources created before login, which only carry a
/// contact email — by email, case-insensitively.
pub fn can_manage_resource(
    actor: &CurrentUser,
    owner_id: Option<&str>,
    owner_email: Option<&str>,
) -> bool {
    if actor.is_staff() {
        return true;
    }

    if let Some(owner) = owner_id
        && owner == actor.id
    {
        return true;
    }

    if let (Some(owner), Some(email)) = (owner_email, actor.email.as_deref())
        && owner.eq_ignore_ascii_case(email)
    {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn user(id: &str, email: Option<&str>, role: Role) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            name: "test".to_string(),
            email: email.map(|e| e.to_string()),
            role,
        }
    }

    #[test]
    fn test_staff_and_admin_always_allowed() {
        let staff = user("s1", None, Role::Staff);
        let admin = user("a1", None, Role::Admin);
        assert!(can_manage_resource(&staff, Some("someone-else"), None));
        assert!(can_manage_resource(&admin, None, None));
    }

    #[test]
    fn test_owner_by_id() {
        let customer = user("c1", None, Role::Customer);
        assert!(can_manage_resource(&customer, Some("c1"), None));
        assert!(!can_manage_resource(&customer, Some("c2"), None));
    }

    #[test]
    fn test_owner_by_email_case_insensitive() {
        let customer = user("c1", Some("Ana@Example.com"), Role::Customer);
        assert!(can_manage_resource(&customer, None, Some("ana@example.com")));
        assert!(!can_manage_resource(&customer, None, Some("other@example.com")));
    }

    #[test]
    fn test_customer_without_match_denied() {
        let customer = user("c1", None, Role::Customer);
        assert!(!can_manage_resource(&customer, None, None));
        assert!(!can_manage_resource(&customer, Some("c2"), Some("x@example.com")));
    }
}
