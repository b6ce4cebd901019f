//! Role policy: one table mapping `(role, permission)` to allowed or denied.

use models::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageRoles,
    ManageGamification,
    ManageContent,
    ManageCategories,
    ManageFormations,
    HandleComplaints,
    ModerateServices,
    ModerateComments,
    BlockUsers,
    DeleteAnyService,
    OfferServices,
}

impl Permission {
    pub const ALL: [Permission; 11] = [
        Permission::ManageRoles,
        Permission::ManageGamification,
        Permission::ManageContent,
        Permission::ManageCategories,
        Permission::ManageFormations,
        Permission::HandleComplaints,
        Permission::ModerateServices,
        Permission::ModerateComments,
        Permission::BlockUsers,
        Permission::DeleteAnyService,
        Permission::OfferServices,
    ];
}

pub fn allows(role: Role, permission: Permission) -> bool {
    use Permission::*;
    match permission {
        ManageRoles | ManageGamification | ManageContent | DeleteAnyService => role == Role::Administrador,
        ManageCategories | ManageFormations | HandleComplaints | ModerateServices | ModerateComments | BlockUsers => {
            matches!(role, Role::Administrador | Role::Moderador)
        }
        OfferServices => role == Role::Prestador,
    }
}

/// The authenticated caller as resolved from the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self { Self { user_id, role } }

    pub fn can(&self, permission: Permission) -> bool { allows(self.role, permission) }

    pub fn require(&self, permission: Permission) -> Result<(), ServiceError> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!("{:?} requires {:?}", self.role, permission)))
        }
    }

    /// Owner of the resource, or a holder of `permission`.
    pub fn require_owner_or(&self, owner_id: Uuid, permission: Permission) -> Result<(), ServiceError> {
        if self.user_id == owner_id { Ok(()) } else { self.require(permission) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [Role; 4] = [Role::Administrador, Role::Moderador, Role::Prestador, Role::Cliente];

    #[test]
    fn administrator_only_permissions() {
        for p in [Permission::ManageRoles, Permission::ManageGamification, Permission::ManageContent, Permission::DeleteAnyService] {
            assert!(allows(Role::Administrador, p));
            for r in [Role::Moderador, Role::Prestador, Role::Cliente] {
                assert!(!allows(r, p), "{r:?} must not hold {p:?}");
            }
        }
    }

    #[test]
    fn moderation_permissions() {
        for p in [
            Permission::ManageCategories,
            Permission::ManageFormations,
            Permission::HandleComplaints,
            Permission::ModerateServices,
            Permission::ModerateComments,
            Permission::BlockUsers,
        ] {
            assert!(allows(Role::Administrador, p));
            assert!(allows(Role::Moderador, p));
            assert!(!allows(Role::Prestador, p));
            assert!(!allows(Role::Cliente, p));
        }
    }

    #[test]
    fn only_providers_offer_services() {
        let holders: Vec<Role> = ROLES.into_iter().filter(|r| allows(*r, Permission::OfferServices)).collect();
        assert_eq!(holders, vec![Role::Prestador]);
    }

    #[test]
    fn clients_hold_nothing() {
        assert!(Permission::ALL.iter().all(|p| !allows(Role::Cliente, *p)));
    }

    #[test]
    fn owner_bypasses_permission() {
        let me = Actor::new(Uuid::new_v4(), Role::Cliente);
        assert!(me.require_owner_or(me.user_id, Permission::ModerateComments).is_ok());
        let err = me.require_owner_or(Uuid::new_v4(), Permission::ModerateComments).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        assert!(moderator.require_owner_or(me.user_id, Permission::ModerateComments).is_ok());
    }
}
