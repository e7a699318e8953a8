//! Unit of work over mocked repositories.
//!
//! Transactions run the body directly against the mocks, so expectations
//! set on a repository apply both inside and outside a transaction.

use async_trait::async_trait;

use super::repositories::{
    ComplaintRepository, MockComplaintRepository, MockNoticeRepository, MockPaymentRepository,
    MockPropertyRepository, MockRoomRepository, MockTenantRepository, MockUserRepository,
    NoticeRepository, PaymentRepository, PropertyRepository, RoomRepository, TenantRepository,
    UserRepository,
};
use super::unit_of_work::{Repositories, TransactionContext, TxFuture, UnitOfWork};
use crate::errors::AppResult;

#[derive(Default)]
pub struct MockUnitOfWork {
    pub users: MockUserRepository,
    pub properties: MockPropertyRepository,
    pub rooms: MockRoomRepository,
    pub tenants: MockTenantRepository,
    pub payments: MockPaymentRepository,
    pub complaints: MockComplaintRepository,
    pub notices: MockNoticeRepository,
}

impl MockUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repositories for MockUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn properties(&self) -> &dyn PropertyRepository {
        &self.properties
    }

    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn tenants(&self) -> &dyn TenantRepository {
        &self.tenants
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn complaints(&self) -> &dyn ComplaintRepository {
        &self.complaints
    }

    fn notices(&self) -> &dyn NoticeRepository {
        &self.notices
    }
}

#[async_trait]
impl UnitOfWork for MockUnitOfWork {
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        f(TransactionContext::new(self)).await
    }
}
