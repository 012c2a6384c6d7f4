//! Access decision functions.
//!
//! Every function is pure: all inputs are explicit parameters and nothing is
//! read from storage or global state, so they can be called concurrently from
//! any number of request handlers.
//!
//! Resource checks evaluate in a fixed order: ownership first, then the role
//! hierarchy, then club scoping, and finally a default deny.

use super::catalog::RoleCatalog;
use super::decision::{Decision, DenialReason};
use super::identity::{ClubId, IdentityContext, UserId, MANAGED_CLUB_CLAIM, SUBJECT_CLAIM};
use super::role::Role;

pub fn is_super_admin(ctx: &IdentityContext) -> Decision {
    Decision::allow_if(ctx.has_role(Role::SuperAdmin), DenialReason::RoleNotAllowed)
}

pub fn is_admin_or_higher(ctx: &IdentityContext) -> Decision {
    Decision::allow_if(
        ctx.has_any_role(&[Role::SuperAdmin, Role::Admin]),
        DenialReason::RoleNotAllowed,
    )
}

pub fn is_manager_or_higher(ctx: &IdentityContext) -> Decision {
    Decision::allow_if(
        ctx.has_any_role(&[Role::SuperAdmin, Role::Admin, Role::Manager]),
        DenialReason::RoleNotAllowed,
    )
}

/// Admins manage every club, a manager exactly the club named in their claim.
pub fn can_manage_club(ctx: &IdentityContext, club_id: ClubId) -> Decision {
    if is_admin_or_higher(ctx).is_allowed() {
        return Decision::Allow;
    }

    if ctx.has_role(Role::Manager) {
        return match ctx.managed_club_id() {
            Some(managed) if managed == club_id => Decision::Allow,
            Some(_) => Decision::Deny(DenialReason::ResourceScopeDenied),
            None => Decision::Deny(scope_denial(ctx, MANAGED_CLUB_CLAIM)),
        };
    }

    Decision::Deny(DenialReason::ResourceScopeDenied)
}

pub fn can_view_user(ctx: &IdentityContext, target_user_id: UserId) -> Decision {
    if is_self(ctx, target_user_id) {
        return Decision::Allow;
    }

    if is_admin_or_higher(ctx).is_allowed() {
        return Decision::Allow;
    }

    Decision::Deny(scope_denial(ctx, SUBJECT_CLAIM))
}

/// Editing shares the viewing rule: self or admin-or-higher.
pub fn can_edit_user(ctx: &IdentityContext, target_user_id: UserId) -> Decision {
    can_view_user(ctx, target_user_id)
}

/// Without a club id a manager is always denied, even for bookings in their own club.
pub fn can_view_booking(
    ctx: &IdentityContext,
    booking_owner_user_id: UserId,
    club_id: Option<ClubId>,
) -> Decision {
    if is_self(ctx, booking_owner_user_id) {
        return Decision::Allow;
    }

    if is_admin_or_higher(ctx).is_allowed() {
        return Decision::Allow;
    }

    if ctx.has_role(Role::Manager) {
        if let Some(club_id) = club_id {
            return can_manage_club(ctx, club_id);
        }
    }

    Decision::Deny(scope_denial(ctx, SUBJECT_CLAIM))
}

/// Matrix check across all held roles; inactive roles grant nothing.
///
/// Runs after the request gate, so a denial is a resource-level one.
pub fn has_permission(
    ctx: &IdentityContext,
    catalog: &RoleCatalog,
    section: &str,
    action: &str,
) -> Decision {
    Decision::allow_if(
        ctx.roles()
            .any(|role| catalog.is_allowed(role, section, action)),
        DenialReason::ResourceScopeDenied,
    )
}

fn is_self(ctx: &IdentityContext, user_id: UserId) -> bool {
    ctx.user_id() == Some(user_id)
}

fn scope_denial(ctx: &IdentityContext, claim: &str) -> DenialReason {
    if ctx.has_malformed_claim(claim) {
        DenialReason::MalformedClaim
    } else {
        DenialReason::ResourceScopeDenied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::identity::{Claim, Principal};

    fn actor(user_id: UserId, roles: &[Role]) -> IdentityContext {
        IdentityContext::new(Some(user_id), roles.iter().copied())
    }

    fn manager_of(user_id: UserId, club_id: ClubId) -> IdentityContext {
        actor(user_id, &[Role::Manager]).with_managed_club(club_id)
    }

    /// Every combination of held roles, including none
    fn role_sets() -> Vec<Vec<Role>> {
        let all = Role::all();
        (0..16u8)
            .map(|mask| {
                all.iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, role)| *role)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_hierarchy_predicates() {
        let super_admin = actor(1, &[Role::SuperAdmin]);
        let admin = actor(2, &[Role::Admin]);
        let manager = manager_of(3, 7);
        let user = actor(4, &[Role::User]);

        assert!(is_super_admin(&super_admin).is_allowed());
        assert!(is_super_admin(&admin).is_denied());

        assert!(is_admin_or_higher(&super_admin).is_allowed());
        assert!(is_admin_or_higher(&admin).is_allowed());
        assert!(is_admin_or_higher(&manager).is_denied());

        assert!(is_manager_or_higher(&manager).is_allowed());
        assert_eq!(
            is_manager_or_higher(&user),
            Decision::Deny(DenialReason::RoleNotAllowed)
        );
    }

    #[test]
    fn test_manager_scoped_to_exact_club() {
        let manager = manager_of(2, 7);

        assert!(can_manage_club(&manager, 7).is_allowed());
        assert_eq!(
            can_manage_club(&manager, 8),
            Decision::Deny(DenialReason::ResourceScopeDenied)
        );
    }

    #[test]
    fn test_manager_without_club_claim_is_denied() {
        let manager = actor(2, &[Role::Manager]);
        for club_id in [0, 1, 3, 7, u64::MAX] {
            assert!(can_manage_club(&manager, club_id).is_denied());
        }
    }

    #[test]
    fn test_manager_with_malformed_club_claim() {
        let principal = Principal::authenticated(vec![
            Claim::new("sub", "2"),
            Claim::new("role", "Manager"),
            Claim::new("club_id", "3x"),
        ]);
        let ctx = IdentityContext::from_principal(&principal);

        assert_eq!(
            can_manage_club(&ctx, 3),
            Decision::Deny(DenialReason::MalformedClaim)
        );
    }

    #[test]
    fn test_non_admins_without_matching_club_never_manage() {
        for roles in role_sets() {
            if roles.contains(&Role::SuperAdmin) || roles.contains(&Role::Admin) {
                continue;
            }
            // Managed club 7 when Manager is held, never matched below
            let ctx = actor(10, &roles).with_managed_club(7);
            for club_id in [0, 1, 3, 8, 100] {
                assert!(
                    can_manage_club(&ctx, club_id).is_denied(),
                    "roles {:?} managed club {}",
                    roles,
                    club_id
                );
            }
        }
    }

    #[test]
    fn test_self_access_always_wins() {
        for roles in role_sets() {
            let ctx = actor(42, &roles);
            assert!(can_view_user(&ctx, 42).is_allowed(), "roles {:?}", roles);
            assert!(can_edit_user(&ctx, 42).is_allowed(), "roles {:?}", roles);
            assert!(
                can_view_booking(&ctx, 42, None).is_allowed(),
                "roles {:?}",
                roles
            );
        }
    }

    #[test]
    fn test_admin_monotonicity() {
        for roles in role_sets() {
            let ctx = actor(1, &roles);
            if is_admin_or_higher(&ctx).is_denied() {
                continue;
            }
            for target in [0, 2, 99] {
                assert!(can_view_user(&ctx, target).is_allowed());
                assert!(can_edit_user(&ctx, target).is_allowed());
                assert!(can_view_booking(&ctx, target, None).is_allowed());
                assert!(can_view_booking(&ctx, target, Some(5)).is_allowed());
                assert!(can_manage_club(&ctx, target).is_allowed());
            }
        }
    }

    #[test]
    fn test_other_users_hidden_from_non_admins() {
        let manager = manager_of(2, 3);
        let user = actor(5, &[Role::User]);

        assert_eq!(
            can_view_user(&user, 9),
            Decision::Deny(DenialReason::ResourceScopeDenied)
        );
        assert!(can_view_user(&manager, 9).is_denied());
        assert!(can_edit_user(&manager, 9).is_denied());
    }

    #[test]
    fn test_missing_user_id_never_matches() {
        let ctx = IdentityContext::new(None, [Role::User]);

        assert!(can_view_user(&ctx, 0).is_denied());
        assert!(can_view_booking(&ctx, 0, None).is_denied());
    }

    #[test]
    fn test_view_booking_scenarios() {
        let user = actor(5, &[Role::User]);
        assert!(can_view_booking(&user, 5, None).is_allowed());
        assert_eq!(
            can_view_booking(&user, 9, Some(3)),
            Decision::Deny(DenialReason::ResourceScopeDenied)
        );

        let manager = manager_of(2, 3);
        assert!(can_view_booking(&manager, 9, Some(3)).is_allowed());
        assert!(can_view_booking(&manager, 9, Some(4)).is_denied());
    }

    #[test]
    fn test_view_booking_fails_closed_without_club() {
        // Manager of club 3 is denied when the caller omits the booking's club
        let manager = manager_of(2, 3);
        assert_eq!(
            can_view_booking(&manager, 9, None),
            Decision::Deny(DenialReason::ResourceScopeDenied)
        );
    }

    #[test]
    fn test_manage_club_scenario() {
        let manager = manager_of(2, 3);

        assert!(can_manage_club(&manager, 3).is_allowed());
        assert!(can_manage_club(&manager, 4).is_denied());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let contexts = [manager_of(2, 3), actor(5, &[Role::User]), actor(1, &[Role::Admin])];
        for ctx in &contexts {
            let first = [
                can_manage_club(ctx, 3),
                can_view_user(ctx, 9),
                can_edit_user(ctx, 9),
                can_view_booking(ctx, 9, Some(3)),
                can_view_booking(ctx, 9, None),
            ];
            for _ in 0..3 {
                let again = [
                    can_manage_club(ctx, 3),
                    can_view_user(ctx, 9),
                    can_edit_user(ctx, 9),
                    can_view_booking(ctx, 9, Some(3)),
                    can_view_booking(ctx, 9, None),
                ];
                assert_eq!(first, again);
            }
        }
    }

    #[test]
    fn test_has_permission_uses_any_active_role() {
        let mut catalog = RoleCatalog::builtin();
        let ctx = actor(2, &[Role::Manager, Role::User]);

        assert!(has_permission(&ctx, &catalog, "halls", "edit").is_allowed());
        assert!(has_permission(&ctx, &catalog, "bookings", "create").is_allowed());
        assert_eq!(
            has_permission(&ctx, &catalog, "roles", "view"),
            Decision::Deny(DenialReason::ResourceScopeDenied)
        );

        catalog.set_active(Role::Manager, false);
        assert!(has_permission(&ctx, &catalog, "halls", "edit").is_denied());
        // User role still grants its own entries
        assert!(has_permission(&ctx, &catalog, "bookings", "create").is_allowed());
    }

    #[test]
    fn test_has_permission_without_roles() {
        let catalog = RoleCatalog::builtin();
        let ctx = IdentityContext::new(Some(1), []);
        assert!(has_permission(&ctx, &catalog, "clubs", "view").is_denied());
    }
}
