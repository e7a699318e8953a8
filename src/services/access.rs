//! Authorization resolver.
//!
//! Loads the ownership chain of a protected record through the repositories
//! and hands it to the pure decision in `domain::access`. Existence is
//! checked before ownership, so a missing record is a 404 for everyone.

use std::sync::Arc;

use uuid::Uuid;

use domain::{decide, Access, Denial, OwnershipChain, Requester, ResourceRef, Tenant};

use crate::errors::{AppError, AppResult, FORBIDDEN_MESSAGE};
use crate::infra::UnitOfWork;
use crate::types::TenantFilter;

pub struct AccessResolver<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccessResolver<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Resolve the chain of `resource`, or `None` when the record or one of
    /// its ancestors is missing.
    pub async fn chain(&self, resource: ResourceRef) -> AppResult<Option<OwnershipChain>> {
        match resource {
            ResourceRef::Property(id) => Ok(self
                .uow
                .properties()
                .find_by_id(id)
                .await?
                .map(|property| OwnershipChain::Property {
                    owner: property.owner_id,
                })),
            ResourceRef::Room(id) => {
                let Some(room) = self.uow.rooms().find_by_id(id).await? else {
                    return Ok(None);
                };
                Ok(self
                    .property_owner(room.property_id)
                    .await?
                    .map(|property_owner| OwnershipChain::Room { property_owner }))
            }
            ResourceRef::Tenant(id) => {
                let tenant = self.uow.tenants().find_by_id(id).await?;
                self.tenancy(tenant).await
            }
            ResourceRef::Payment(id) => {
                let Some(payment) = self.uow.payments().find_by_id(id).await? else {
                    return Ok(None);
                };
                let tenant = self.uow.tenants().find_by_id(payment.tenant_id).await?;
                self.tenancy(tenant).await
            }
            ResourceRef::Complaint(id) => {
                let Some(complaint) = self.uow.complaints().find_by_id(id).await? else {
                    return Ok(None);
                };
                let tenant = self.uow.tenants().find_by_id(complaint.tenant_id).await?;
                self.tenancy(tenant).await
            }
        }
    }

    pub async fn resolve(&self, requester: &Requester, resource: ResourceRef) -> AppResult<Access> {
        let chain = self.chain(resource).await?;
        Ok(decide(requester, chain.as_ref()))
    }

    /// Resolve access and turn a denial into the matching error. Returns the
    /// chain so callers can tell a manager from the tenant themselves.
    pub async fn authorize(
        &self,
        requester: &Requester,
        resource: ResourceRef,
    ) -> AppResult<OwnershipChain> {
        let chain = self.chain(resource).await?;

        match (decide(requester, chain.as_ref()), chain) {
            (Access::Allow, Some(chain)) => Ok(chain),
            (Access::Deny(Denial::Forbidden), _) => {
                tracing::debug!(
                    user_id = %requester.id,
                    resource = ?resource,
                    "Access denied"
                );
                Err(AppError::forbidden(FORBIDDEN_MESSAGE))
            }
            _ => Err(AppError::not_found(resource.label())),
        }
    }

    /// Tenant records linked to a user account, across properties.
    pub async fn tenancies_of(&self, user_id: Uuid) -> AppResult<Vec<Tenant>> {
        self.uow
            .tenants()
            .list(TenantFilter {
                user: Some(user_id),
                ..Default::default()
            })
            .await
    }

    async fn property_owner(&self, property_id: Uuid) -> AppResult<Option<Uuid>> {
        Ok(self
            .uow
            .properties()
            .find_by_id(property_id)
            .await?
            .map(|property| property.owner_id))
    }

    async fn tenancy(&self, tenant: Option<Tenant>) -> AppResult<Option<OwnershipChain>> {
        let Some(tenant) = tenant else {
            return Ok(None);
        };
        Ok(self
            .property_owner(tenant.property_id)
            .await?
            .map(|property_owner| OwnershipChain::Tenancy {
                property_owner,
                tenant_user: tenant.user_id,
            }))
    }
}

/// Admins and the owner of the record's property manage it. The tenant a
/// record belongs to can see it without managing it.
pub fn manages(requester: &Requester, chain: &OwnershipChain) -> bool {
    requester.is_admin() || chain.property_owner() == requester.id
}

/// Reject requesters whose role cannot manage properties.
pub fn require_manager(requester: &Requester) -> AppResult<()> {
    if requester.is_manager() {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "User role '{}' is not authorized to access this route",
            requester.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUnitOfWork;
    use chrono::Utc;
    use domain::{
        Address, BillingMonth, Contact, NewPayment, NewProperty, Payment, Property,
        PropertyAmenities, PropertyType, UserRole,
    };
    use mockall::predicate::eq;

    fn property(owner: Uuid) -> Property {
        Property::create(
            owner,
            NewProperty {
                name: "Sunrise PG".to_string(),
                property_type: PropertyType::Boys,
                address: Address {
                    street: "1 Main Road".to_string(),
                    city: "Pune".to_string(),
                    state: "Maharashtra".to_string(),
                    pincode: "411001".to_string(),
                    landmark: None,
                },
                contact: Contact {
                    person_name: "Ravi".to_string(),
                    phone: "9876543210".to_string(),
                    email: None,
                },
                amenities: PropertyAmenities::default(),
                description: None,
                rules: None,
                status: None,
            },
            Utc::now(),
        )
    }

    fn tenant(user_id: Uuid, property_id: Uuid) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            user_id,
            property_id,
            room_id: Uuid::new_v4(),
            full_name: "Kiran".to_string(),
            email: "kiran@example.com".to_string(),
            phone: "9123456780".to_string(),
            alternate_phone: None,
            emergency_contact: None,
            id_proof: None,
            occupation: None,
            permanent_address: None,
            move_in_date: Utc::now().date_naive(),
            move_out_date: None,
            rent_amount: 8000,
            security_deposit: 0,
            security_deposit_paid: false,
            status: domain::TenantStatus::Active,
            notice_period: None,
            agreement: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_property_is_not_found_even_for_admin() {
        let mut uow = MockUnitOfWork::new();
        uow.properties.expect_find_by_id().returning(|_| Ok(None));

        let resolver = AccessResolver::new(Arc::new(uow));
        let admin = Requester::new(Uuid::new_v4(), UserRole::Admin);
        let result = resolver
            .authorize(&admin, ResourceRef::Property(Uuid::new_v4()))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(label)) if label == "Property"));
    }

    #[tokio::test]
    async fn test_payment_resolves_through_tenant_and_property() {
        let owner = Uuid::new_v4();
        let tenant_user = Uuid::new_v4();
        let p = property(owner);
        let t = tenant(tenant_user, p.id);
        let payment = Payment::create(
            NewPayment {
                tenant_id: t.id,
                month: BillingMonth::new(2024, 1).unwrap(),
                amount: 8000,
                late_fee: 0,
                discount: 0,
                due_date: Utc::now().date_naive(),
                payment_date: None,
                payment_method: None,
                transaction_id: None,
                status: None,
                receipt: None,
                notes: None,
            },
            &t,
            owner,
            Utc::now().date_naive(),
            Utc::now(),
        )
        .unwrap();
        let payment_id = payment.id;

        let mut uow = MockUnitOfWork::new();
        uow.payments
            .expect_find_by_id()
            .with(eq(payment_id))
            .returning(move |_| Ok(Some(payment.clone())));
        let tenant_id = t.id;
        uow.tenants
            .expect_find_by_id()
            .with(eq(tenant_id))
            .returning(move |_| Ok(Some(t.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));

        let resolver = AccessResolver::new(Arc::new(uow));
        let resource = ResourceRef::Payment(payment_id);

        let chain = resolver
            .authorize(&Requester::new(tenant_user, UserRole::Tenant), resource)
            .await
            .unwrap();
        assert!(!manages(&Requester::new(tenant_user, UserRole::Tenant), &chain));
        assert!(manages(&Requester::new(owner, UserRole::Owner), &chain));

        let stranger = Requester::new(Uuid::new_v4(), UserRole::Owner);
        assert!(matches!(
            resolver.authorize(&stranger, resource).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_room_with_missing_property_is_not_found() {
        let mut uow = MockUnitOfWork::new();
        uow.rooms.expect_find_by_id().returning(|id| {
            Ok(Some(
                domain::Room::create(
                    domain::NewRoom {
                        property_id: Uuid::new_v4(),
                        room_number: "101".to_string(),
                        floor: 1,
                        room_type: domain::RoomType::Single,
                        capacity: 1,
                        rent: 5000,
                        security_deposit: 0,
                        area: None,
                        furnishing: Default::default(),
                        amenities: Default::default(),
                        status: None,
                        images: Vec::new(),
                        description: None,
                    },
                    Utc::now(),
                )
                .map(|mut room| {
                    room.id = id;
                    room
                })
                .unwrap(),
            ))
        });
        uow.properties.expect_find_by_id().returning(|_| Ok(None));

        let resolver = AccessResolver::new(Arc::new(uow));
        let access = resolver
            .resolve(
                &Requester::new(Uuid::new_v4(), UserRole::Admin),
                ResourceRef::Room(Uuid::new_v4()),
            )
            .await
            .unwrap();

        assert_eq!(access, Access::Deny(Denial::NotFound));
    }

    #[test]
    fn test_require_manager() {
        assert!(require_manager(&Requester::new(Uuid::new_v4(), UserRole::Owner)).is_ok());
        assert!(matches!(
            require_manager(&Requester::new(Uuid::new_v4(), UserRole::Tenant)),
            Err(AppError::Forbidden(msg)) if msg.contains("tenant")
        ));
    }
}
