//! Ownership-based access decisions.
//!
//! Access to a record is decided by walking its ownership chain
//! (Property → Room → Tenant → Payment | Complaint). Loading the chain is an
//! infrastructure concern; deciding over a loaded chain is pure and lives here.

use serde::Serialize;
use uuid::Uuid;

use crate::user::UserRole;

/// The authenticated identity a decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub role: UserRole,
}

impl Requester {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_tenant(&self) -> bool {
        self.role == UserRole::Tenant
    }

    /// Owners and admins manage properties.
    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

wire_enum! {
    ResourceKind {
        Property => "property",
        Room => "room",
        Tenant => "tenant",
        Payment => "payment",
        Complaint => "complaint",
    }
}

/// A protected record, by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    Property(Uuid),
    Room(Uuid),
    Tenant(Uuid),
    Payment(Uuid),
    Complaint(Uuid),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Property(_) => ResourceKind::Property,
            ResourceRef::Room(_) => ResourceKind::Room,
            ResourceRef::Tenant(_) => ResourceKind::Tenant,
            ResourceRef::Payment(_) => ResourceKind::Payment,
            ResourceRef::Complaint(_) => ResourceKind::Complaint,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            ResourceRef::Property(id)
            | ResourceRef::Room(id)
            | ResourceRef::Tenant(id)
            | ResourceRef::Payment(id)
            | ResourceRef::Complaint(id) => id,
        }
    }

    /// Human-readable name used in not-found messages.
    pub fn label(&self) -> &'static str {
        match self.kind() {
            ResourceKind::Property => "Property",
            ResourceKind::Room => "Room",
            ResourceKind::Tenant => "Tenant",
            ResourceKind::Payment => "Payment",
            ResourceKind::Complaint => "Complaint",
        }
    }
}

/// The identities that can claim a record, resolved from its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipChain {
    Property { owner: Uuid },
    Room { property_owner: Uuid },
    /// Tenants, payments and complaints all resolve through a tenant record.
    Tenancy { property_owner: Uuid, tenant_user: Uuid },
}

impl OwnershipChain {
    pub fn property_owner(&self) -> Uuid {
        match *self {
            OwnershipChain::Property { owner } => owner,
            OwnershipChain::Room { property_owner }
            | OwnershipChain::Tenancy { property_owner, .. } => property_owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The record or a member of its chain does not exist
    NotFound,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(Denial),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Decide whether `requester` may read or write the record whose chain is
/// `chain`. A missing chain is `NotFound` for everyone, admins included,
/// so existence is always reported before authorization.
pub fn decide(requester: &Requester, chain: Option<&OwnershipChain>) -> Access {
    let Some(chain) = chain else {
        return Access::Deny(Denial::NotFound);
    };

    if requester.is_admin() {
        return Access::Allow;
    }

    let allowed = match *chain {
        OwnershipChain::Property { owner } => owner == requester.id,
        OwnershipChain::Room { property_owner } => {
            !requester.is_tenant() && property_owner == requester.id
        }
        OwnershipChain::Tenancy {
            property_owner,
            tenant_user,
        } => property_owner == requester.id || tenant_user == requester.id,
    };

    if allowed {
        Access::Allow
    } else {
        Access::Deny(Denial::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct World {
        owner: Requester,
        other_owner: Requester,
        tenant: Requester,
        other_tenant: Requester,
        admin: Requester,
    }

    fn world() -> World {
        World {
            owner: Requester::new(Uuid::new_v4(), UserRole::Owner),
            other_owner: Requester::new(Uuid::new_v4(), UserRole::Owner),
            tenant: Requester::new(Uuid::new_v4(), UserRole::Tenant),
            other_tenant: Requester::new(Uuid::new_v4(), UserRole::Tenant),
            admin: Requester::new(Uuid::new_v4(), UserRole::Admin),
        }
    }

    #[test]
    fn test_missing_chain_is_not_found_for_everyone() {
        let w = world();
        for requester in [w.owner, w.tenant, w.admin] {
            assert_eq!(decide(&requester, None), Access::Deny(Denial::NotFound));
        }
    }

    #[test]
    fn test_property_owner_only() {
        let w = world();
        let chain = OwnershipChain::Property { owner: w.owner.id };

        assert!(decide(&w.owner, Some(&chain)).is_allowed());
        assert!(decide(&w.admin, Some(&chain)).is_allowed());
        assert_eq!(
            decide(&w.other_owner, Some(&chain)),
            Access::Deny(Denial::Forbidden)
        );
        assert_eq!(decide(&w.tenant, Some(&chain)), Access::Deny(Denial::Forbidden));
    }

    #[test]
    fn test_tenant_never_matches_room() {
        let w = world();
        let chain = OwnershipChain::Room {
            property_owner: w.owner.id,
        };

        assert!(decide(&w.owner, Some(&chain)).is_allowed());
        assert_eq!(decide(&w.tenant, Some(&chain)), Access::Deny(Denial::Forbidden));
    }

    #[test]
    fn test_tenancy_chain_matrix() {
        let w = world();
        let chain = OwnershipChain::Tenancy {
            property_owner: w.owner.id,
            tenant_user: w.tenant.id,
        };

        assert!(decide(&w.owner, Some(&chain)).is_allowed());
        assert!(decide(&w.tenant, Some(&chain)).is_allowed());
        assert!(decide(&w.admin, Some(&chain)).is_allowed());
        assert!(!decide(&w.other_owner, Some(&chain)).is_allowed());
        assert!(!decide(&w.other_tenant, Some(&chain)).is_allowed());
    }

    #[test]
    fn test_owner_living_in_another_property_sees_own_tenancy() {
        let w = world();
        let chain = OwnershipChain::Tenancy {
            property_owner: w.other_owner.id,
            tenant_user: w.owner.id,
        };
        assert!(decide(&w.owner, Some(&chain)).is_allowed());
    }

    #[test]
    fn test_resource_ref_accessors() {
        let id = Uuid::new_v4();
        let r = ResourceRef::Payment(id);
        assert_eq!(r.id(), id);
        assert_eq!(r.kind(), ResourceKind::Payment);
        assert_eq!(r.label(), "Payment");
    }
}
