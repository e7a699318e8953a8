//! Payment service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::{NewPayment, Payment, PaymentChanges, Requester, ResourceRef};

use super::access::{manages, AccessResolver};
use crate::errors::{AppError, AppResult, OptionExt, FORBIDDEN_MESSAGE};
use crate::infra::{Notifications, UnitOfWork};
use crate::types::PaymentFilter;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Tenants only see payments of their own tenant records
    async fn list(&self, requester: Requester, filter: PaymentFilter) -> AppResult<Vec<Payment>>;

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<Payment>;

    /// Record a month's rent; one payment per tenant and month
    async fn create(&self, requester: Requester, input: NewPayment) -> AppResult<Payment>;

    /// Tenants may only report how they paid
    async fn update(&self, requester: Requester, id: Uuid, changes: PaymentChanges) -> AppResult<Payment>;

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()>;
}

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
    notifications: Notifications,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(uow: Arc<U>, notifications: Notifications) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
            notifications,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn list(&self, requester: Requester, filter: PaymentFilter) -> AppResult<Vec<Payment>> {
        let mut payments = self.uow.payments().list(filter).await?;
        if requester.is_tenant() {
            let own: Vec<Uuid> = self
                .access
                .tenancies_of(requester.id)
                .await?
                .into_iter()
                .map(|tenant| tenant.id)
                .collect();
            payments.retain(|payment| own.contains(&payment.tenant_id));
        }
        Ok(payments)
    }

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<Payment> {
        self.access.authorize(&requester, ResourceRef::Payment(id)).await?;
        self.uow
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Payment")
    }

    async fn create(&self, requester: Requester, input: NewPayment) -> AppResult<Payment> {
        let chain = self
            .access
            .authorize(&requester, ResourceRef::Tenant(input.tenant_id))
            .await?;
        if !manages(&requester, &chain) {
            return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
        }

        let tenant = self
            .uow
            .tenants()
            .find_by_id(input.tenant_id)
            .await?
            .ok_or_not_found("Tenant")?;
        let now = Utc::now();
        let payment = Payment::create(input, &tenant, requester.id, now.date_naive(), now)?;
        let payment = self.uow.payments().insert(payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            tenant_id = %tenant.id,
            month = %payment.month,
            total = payment.total_amount,
            status = %payment.status,
            "Payment recorded"
        );
        self.notifications.payment_created(&payment, &tenant).await;
        Ok(payment)
    }

    async fn update(&self, requester: Requester, id: Uuid, changes: PaymentChanges) -> AppResult<Payment> {
        let chain = self.access.authorize(&requester, ResourceRef::Payment(id)).await?;
        if !changes.is_remittance_only() && !manages(&requester, &chain) {
            return Err(AppError::forbidden(
                "Tenants can only update the payment method and transaction id",
            ));
        }

        let mut payment = self
            .uow
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Payment")?;
        let now = Utc::now();
        payment.apply(changes, now.date_naive(), now)?;
        let payment = self.uow.payments().update(payment).await?;

        if let Some(tenant) = self.uow.tenants().find_by_id(payment.tenant_id).await? {
            self.notifications.payment_updated(&payment, &tenant).await;
        }
        Ok(payment)
    }

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        let chain = self.access.authorize(&requester, ResourceRef::Payment(id)).await?;
        if !manages(&requester, &chain) {
            return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
        }
        self.uow.payments().delete(id).await?;
        tracing::info!(payment_id = %id, "Payment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockNotifier, MockUnitOfWork};
    use chrono::NaiveDate;
    use domain::{
        Address, BillingMonth, Contact, PaymentMethod, PaymentStatus, Property, PropertyStatus,
        PropertyType, Tenant, TenantStatus, UserRole,
    };

    fn property(owner: Uuid) -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4(),
            owner_id: owner,
            name: "Orchid PG".to_string(),
            property_type: PropertyType::Girls,
            address: Address {
                street: "12 MG Road".to_string(),
                city: "Indore".to_string(),
                state: "Madhya Pradesh".to_string(),
                pincode: "452001".to_string(),
                landmark: None,
            },
            contact: Contact {
                person_name: "Neha".to_string(),
                phone: "9826000000".to_string(),
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

    fn tenant(property_id: Uuid) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            property_id,
            room_id: Uuid::new_v4(),
            full_name: "Pooja".to_string(),
            email: "pooja@example.com".to_string(),
            phone: "9826011111".to_string(),
            alternate_phone: None,
            emergency_contact: None,
            id_proof: None,
            occupation: None,
            permanent_address: None,
            move_in_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            move_out_date: None,
            rent_amount: 10000,
            security_deposit: 0,
            security_deposit_paid: false,
            status: TenantStatus::Active,
            notice_period: None,
            agreement: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn january(tenant_id: Uuid) -> NewPayment {
        NewPayment {
            tenant_id,
            month: BillingMonth::new(2024, 1).unwrap(),
            amount: 10000,
            late_fee: 500,
            discount: 0,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            payment_date: None,
            payment_method: None,
            transaction_id: None,
            status: None,
            receipt: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_derives_placement_and_notifies_tenant() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let p = property(owner.id);
        let t = tenant(p.id);
        let (tenant_id, room_id, tenant_user) = (t.id, t.room_id, t.user_id);

        let mut uow = MockUnitOfWork::new();
        uow.tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(t.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        uow.payments.expect_insert().times(1).returning(Ok);

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |audience, event| {
                *audience == crate::infra::Audience::User(tenant_user) && event.name == "payment:new"
            })
            .times(1)
            .returning(|_, _| ());
        notifier
            .expect_notify()
            .withf(|audience, _| matches!(audience, crate::infra::Audience::Property(_)))
            .returning(|_, _| ());

        let payment = PaymentManager::new(Arc::new(uow), Notifications::new(Arc::new(notifier)))
            .create(owner, january(tenant_id))
            .await
            .unwrap();

        assert_eq!(payment.room_id, room_id);
        assert_eq!(payment.total_amount, 10500);
        assert_eq!(payment.status, PaymentStatus::Overdue);
        assert_eq!(payment.recorded_by, Some(owner.id));
    }

    #[tokio::test]
    async fn test_tenant_cannot_record_payment() {
        let p = property(Uuid::new_v4());
        let t = tenant(p.id);
        let tenant_req = Requester::new(t.user_id, UserRole::Tenant);
        let tenant_id = t.id;

        let mut uow = MockUnitOfWork::new();
        uow.tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(t.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        uow.payments.expect_insert().never();

        let result = PaymentManager::new(Arc::new(uow), Notifications::new(Arc::new(MockNotifier::new())))
            .create(tenant_req, january(tenant_id))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_tenant_may_report_remittance() {
        let p = property(Uuid::new_v4());
        let t = tenant(p.id);
        let tenant_req = Requester::new(t.user_id, UserRole::Tenant);
        let payment = Payment::create(
            january(t.id),
            &t,
            p.owner_id,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            Utc::now(),
        )
        .unwrap();
        let payment_id = payment.id;

        let mut uow = MockUnitOfWork::new();
        uow.payments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(payment.clone())));
        uow.tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(t.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        uow.payments.expect_update().times(1).returning(Ok);

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_, _| ());
        let service = PaymentManager::new(Arc::new(uow), Notifications::new(Arc::new(notifier)));

        let updated = service
            .update(
                tenant_req,
                payment_id,
                PaymentChanges {
                    payment_method: Some(PaymentMethod::Upi),
                    transaction_id: Some("UPI-7781".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.payment_method, Some(PaymentMethod::Upi));

        let result = service
            .update(
                tenant_req,
                payment_id,
                PaymentChanges {
                    status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
