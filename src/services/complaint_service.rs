//! Complaint service.
//!
//! Tenants file complaints against their own placement; owners and admins
//! may file on a tenant's behalf. Status changes are recorded on the
//! complaint's timeline and mailed to the tenant.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::{Complaint, ComplaintChanges, ComplaintView, NewComplaint, Requester, ResourceRef, Tenant};

use super::access::{manages, AccessResolver};
use crate::errors::{AppError, AppResult, OptionExt, FORBIDDEN_MESSAGE};
use crate::infra::{Mailer, Notifications, UnitOfWork};
use crate::types::ComplaintFilter;
use crate::utils::EmailTemplates;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ComplaintService: Send + Sync {
    async fn list(&self, requester: Requester, filter: ComplaintFilter) -> AppResult<Vec<ComplaintView>>;

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<ComplaintView>;

    async fn create(&self, requester: Requester, input: NewComplaint) -> AppResult<ComplaintView>;

    async fn update(&self, requester: Requester, id: Uuid, changes: ComplaintChanges) -> AppResult<ComplaintView>;

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()>;
}

pub struct ComplaintManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
    notifications: Notifications,
    mailer: Arc<dyn Mailer>,
    templates: EmailTemplates,
}

impl<U: UnitOfWork> ComplaintManager<U> {
    pub fn new(
        uow: Arc<U>,
        notifications: Notifications,
        mailer: Arc<dyn Mailer>,
        templates: EmailTemplates,
    ) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
            notifications,
            mailer,
            templates,
        }
    }

    /// Tenant record a complaint is filed against.
    async fn filing_tenant(&self, requester: &Requester, tenant_id: Option<Uuid>) -> AppResult<Tenant> {
        if requester.is_tenant() {
            let residences: Vec<Tenant> = self
                .access
                .tenancies_of(requester.id)
                .await?
                .into_iter()
                .filter(|tenant| tenant.status.is_resident())
                .collect();
            let chosen = match tenant_id {
                Some(id) => residences.into_iter().find(|tenant| tenant.id == id),
                None => residences.into_iter().next(),
            };
            return chosen.ok_or_not_found("Tenant profile");
        }

        let tenant_id = tenant_id
            .ok_or_else(|| AppError::validation("tenant_id is required when filing for a tenant"))?;
        let chain = self
            .access
            .authorize(requester, ResourceRef::Tenant(tenant_id))
            .await?;
        if !manages(requester, &chain) {
            return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
        }
        self.uow
            .tenants()
            .find_by_id(tenant_id)
            .await?
            .ok_or_not_found("Tenant")
    }
}

#[async_trait]
impl<U: UnitOfWork> ComplaintService for ComplaintManager<U> {
    async fn list(&self, requester: Requester, filter: ComplaintFilter) -> AppResult<Vec<ComplaintView>> {
        let mut complaints = self.uow.complaints().list(filter).await?;
        if requester.is_tenant() {
            let own: Vec<Uuid> = self
                .access
                .tenancies_of(requester.id)
                .await?
                .into_iter()
                .map(|tenant| tenant.id)
                .collect();
            complaints.retain(|complaint| own.contains(&complaint.tenant_id));
        }
        Ok(complaints.into_iter().map(ComplaintView::from).collect())
    }

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<ComplaintView> {
        self.access
            .authorize(&requester, ResourceRef::Complaint(id))
            .await?;
        let complaint = self
            .uow
            .complaints()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Complaint")?;
        Ok(complaint.into())
    }

    async fn create(&self, requester: Requester, input: NewComplaint) -> AppResult<ComplaintView> {
        let tenant = self.filing_tenant(&requester, input.tenant_id).await?;

        let complaint = Complaint::open(input, &tenant, requester.id, Utc::now());
        let complaint = self.uow.complaints().insert(complaint).await?;

        tracing::info!(
            complaint_id = %complaint.id,
            tenant_id = %tenant.id,
            category = %complaint.category,
            priority = %complaint.priority,
            "Complaint filed"
        );
        self.notifications
            .complaint_created(&complaint, &tenant)
            .await;
        Ok(complaint.into())
    }

    async fn update(&self, requester: Requester, id: Uuid, changes: ComplaintChanges) -> AppResult<ComplaintView> {
        let chain = self
            .access
            .authorize(&requester, ResourceRef::Complaint(id))
            .await?;
        if !changes.is_tenant_editable() && !manages(&requester, &chain) {
            return Err(AppError::forbidden(
                "Only the property owner can assign, respond to or progress a complaint",
            ));
        }

        let mut complaint = self
            .uow
            .complaints()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Complaint")?;
        let previous = complaint.status;
        complaint.apply(changes, requester.id, Utc::now());
        let complaint = self.uow.complaints().update(complaint).await?;

        if let Some(tenant) = self.uow.tenants().find_by_id(complaint.tenant_id).await? {
            self.notifications
                .complaint_updated(&complaint, &tenant)
                .await;
            if complaint.status != previous {
                tracing::info!(
                    complaint_id = %id,
                    from = %previous,
                    to = %complaint.status,
                    "Complaint status changed"
                );
                let email = self.templates.complaint_update(&tenant, &complaint);
                if let Err(e) = self.mailer.send(email).await {
                    tracing::warn!(complaint_id = %id, error = %e, "Failed to send complaint update email");
                }
            }
        }
        Ok(complaint.into())
    }

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        let chain = self
            .access
            .authorize(&requester, ResourceRef::Complaint(id))
            .await?;
        if !manages(&requester, &chain) {
            return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
        }
        self.uow.complaints().delete(id).await?;
        tracing::info!(complaint_id = %id, "Complaint deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockMailer, MockNotifier, MockUnitOfWork};
    use chrono::NaiveDate;
    use domain::{
        Address, ComplaintCategory, ComplaintStatus, Contact, Property, PropertyStatus,
        PropertyType, TenantStatus, UserRole,
    };

    fn property(owner: Uuid) -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4(),
            owner_id: owner,
            name: "Maple House".to_string(),
            property_type: PropertyType::CoLiving,
            address: Address {
                street: "3 Hill Road".to_string(),
                city: "Mumbai".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "400050".to_string(),
                landmark: None,
            },
            contact: Contact {
                person_name: "Rahul".to_string(),
                phone: "9820000000".to_string(),
                email: None,
            },
            amenities: Default::default(),
            description: None,
            rules: None,
            images: Vec::new(),
            total_rooms: 1,
            occupied_rooms: 1,
            status: PropertyStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn tenant(property_id: Uuid, status: TenantStatus) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            property_id,
            room_id: Uuid::new_v4(),
            full_name: "Sana".to_string(),
            email: "sana@example.com".to_string(),
            phone: "9820011111".to_string(),
            alternate_phone: None,
            emergency_contact: None,
            id_proof: None,
            occupation: None,
            permanent_address: None,
            move_in_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            move_out_date: None,
            rent_amount: 12000,
            security_deposit: 0,
            security_deposit_paid: true,
            status,
            notice_period: None,
            agreement: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn leaking_tap() -> NewComplaint {
        NewComplaint {
            tenant_id: None,
            title: "Leaking tap".to_string(),
            description: "Bathroom tap drips all night".to_string(),
            category: ComplaintCategory::Plumbing,
            priority: None,
            images: Vec::new(),
        }
    }

    fn service(uow: MockUnitOfWork, notifier: MockNotifier, mailer: MockMailer) -> ComplaintManager<MockUnitOfWork> {
        ComplaintManager::new(
            Arc::new(uow),
            Notifications::new(Arc::new(notifier)),
            Arc::new(mailer),
            EmailTemplates::new("http://localhost:3000"),
        )
    }

    #[tokio::test]
    async fn test_tenant_files_against_own_residence() {
        let p = property(Uuid::new_v4());
        let moved_out = tenant(p.id, TenantStatus::Inactive);
        let mut current = tenant(p.id, TenantStatus::Active);
        current.user_id = moved_out.user_id;
        let requester = Requester::new(current.user_id, UserRole::Tenant);
        let current_id = current.id;

        let mut uow = MockUnitOfWork::new();
        uow.tenants
            .expect_list()
            .returning(move |_| Ok(vec![moved_out.clone(), current.clone()]));
        uow.complaints.expect_insert().times(1).returning(Ok);

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(2).returning(|_, _| ());

        let view = service(uow, notifier, MockMailer::new())
            .create(requester, leaking_tap())
            .await
            .unwrap();

        assert_eq!(view.complaint.tenant_id, current_id);
        assert_eq!(view.complaint.status, ComplaintStatus::Open);
        assert_eq!(view.complaint.timeline.len(), 1);
    }

    #[tokio::test]
    async fn test_owner_must_name_the_tenant() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let result = service(MockUnitOfWork::new(), MockNotifier::new(), MockMailer::new())
            .create(owner, leaking_tap())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_resolving_mails_the_tenant() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let p = property(owner.id);
        let t = tenant(p.id, TenantStatus::Active);
        let complaint = Complaint::open(leaking_tap(), &t, t.user_id, Utc::now());
        let complaint_id = complaint.id;

        let mut uow = MockUnitOfWork::new();
        uow.complaints
            .expect_find_by_id()
            .returning(move |_| Ok(Some(complaint.clone())));
        uow.tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(t.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        uow.complaints.expect_update().returning(Ok);

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_, _| ());
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| email.to == "sana@example.com" && email.body.contains("resolved"))
            .times(1)
            .returning(|_| Ok(()));

        let view = service(uow, notifier, mailer)
            .update(
                owner,
                complaint_id,
                ComplaintChanges {
                    status: Some(ComplaintStatus::Resolved),
                    response: Some("Washer replaced".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.complaint.timeline.len(), 2);
        assert_eq!(view.complaint.resolved_by, Some(owner.id));
        assert!(view.resolution_time_hours.is_some());
    }
}
