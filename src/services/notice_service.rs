//! Notice service.
//!
//! Global notices reach everyone; property notices reach the property's
//! owner and residents. Listings hide drafts, archived and out-of-window
//! notices unless a manager asks for them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::notice::sort_for_display;
use domain::{NewNotice, Notice, NoticeChanges, NoticeStatus, Requester, ResourceRef};

use super::access::{require_manager, AccessResolver};
use crate::errors::{AppError, AppResult, OptionExt, FORBIDDEN_MESSAGE};
use crate::infra::{Notifications, UnitOfWork};
use crate::types::{NoticeFilter, NoticeScope, PropertyFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NoticeService: Send + Sync {
    /// Visible notices, most urgent first
    async fn list(&self, requester: Requester, filter: NoticeFilter) -> AppResult<Vec<Notice>>;

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<Notice>;

    async fn create(&self, requester: Requester, input: NewNotice) -> AppResult<Notice>;

    async fn update(&self, requester: Requester, id: Uuid, changes: NoticeChanges) -> AppResult<Notice>;

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()>;

    /// Record that the requester read the notice
    async fn mark_read(&self, requester: Requester, id: Uuid) -> AppResult<Notice>;
}

pub struct NoticeManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
    notifications: Notifications,
}

impl<U: UnitOfWork> NoticeManager<U> {
    pub fn new(uow: Arc<U>, notifications: Notifications) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
            notifications,
        }
    }

    async fn scope_of(&self, requester: &Requester) -> AppResult<NoticeScope> {
        if requester.is_admin() {
            return Ok(NoticeScope::Everything);
        }

        let mut properties: Vec<Uuid> = if requester.is_tenant() {
            self.access
                .tenancies_of(requester.id)
                .await?
                .into_iter()
                .filter(|tenant| tenant.status.is_resident())
                .map(|tenant| tenant.property_id)
                .collect()
        } else {
            self.uow
                .properties()
                .list(PropertyFilter::owned_by(requester.id))
                .await?
                .into_iter()
                .map(|property| property.id)
                .collect()
        };
        properties.sort();
        properties.dedup();
        Ok(NoticeScope::GlobalAnd(properties))
    }

    async fn visible(&self, requester: &Requester, id: Uuid) -> AppResult<Notice> {
        let notice = self
            .uow
            .notices()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Notice")?;
        if self.scope_of(requester).await?.admits(&notice) {
            Ok(notice)
        } else {
            Err(AppError::forbidden(FORBIDDEN_MESSAGE))
        }
    }

    /// Admins, the author and the owner of the notice's property may edit it.
    async fn editable(&self, requester: &Requester, id: Uuid) -> AppResult<Notice> {
        let notice = self
            .uow
            .notices()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Notice")?;
        if requester.is_admin() || notice.created_by == requester.id {
            return Ok(notice);
        }
        if let Some(property_id) = notice.property_id {
            let owner = self
                .uow
                .properties()
                .find_by_id(property_id)
                .await?
                .map(|property| property.owner_id);
            if owner == Some(requester.id) {
                return Ok(notice);
            }
        }
        Err(AppError::forbidden(FORBIDDEN_MESSAGE))
    }
}

#[async_trait]
impl<U: UnitOfWork> NoticeService for NoticeManager<U> {
    async fn list(&self, requester: Requester, mut filter: NoticeFilter) -> AppResult<Vec<Notice>> {
        if !requester.is_manager() {
            filter.include_inactive = false;
        }
        let include_inactive = filter.include_inactive;
        let scope = self.scope_of(&requester).await?;

        let mut notices = self.uow.notices().list(filter, scope).await?;
        if !include_inactive {
            let now = Utc::now();
            notices.retain(|notice| notice.is_currently_valid(now));
        }
        sort_for_display(&mut notices);
        Ok(notices)
    }

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<Notice> {
        self.visible(&requester, id).await
    }

    async fn create(&self, requester: Requester, input: NewNotice) -> AppResult<Notice> {
        require_manager(&requester)?;
        if let Some(property_id) = input.property_id {
            self.access
                .authorize(&requester, ResourceRef::Property(property_id))
                .await?;
        }

        let notice = Notice::publish(input, requester.id, Utc::now())?;
        let notice = self.uow.notices().insert(notice).await?;

        tracing::info!(
            notice_id = %notice.id,
            property_id = ?notice.property_id,
            priority = %notice.priority,
            "Notice created"
        );
        if notice.status == NoticeStatus::Active {
            self.notifications.notice_published(&notice).await;
        }
        Ok(notice)
    }

    async fn update(&self, requester: Requester, id: Uuid, changes: NoticeChanges) -> AppResult<Notice> {
        let mut notice = self.editable(&requester, id).await?;
        notice.apply(changes, Utc::now())?;
        self.uow.notices().update(notice).await
    }

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        self.editable(&requester, id).await?;
        self.uow.notices().delete(id).await?;
        tracing::info!(notice_id = %id, "Notice deleted");
        Ok(())
    }

    async fn mark_read(&self, requester: Requester, id: Uuid) -> AppResult<Notice> {
        let mut notice = self.visible(&requester, id).await?;
        if notice.mark_read(requester.id, Utc::now()) {
            notice = self.uow.notices().update(notice).await?;
        }
        Ok(notice)
    }
}
