//! Notices published to residents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::{Image, Priority};
use crate::error::{DomainError, DomainResult};

wire_enum! {
    NoticeCategory {
        General => "general",
        Maintenance => "maintenance",
        Event => "event",
        Payment => "payment",
        Policy => "policy",
        Safety => "safety",
        Other => "other",
    }
}

impl Default for NoticeCategory {
    fn default() -> Self {
        NoticeCategory::General
    }
}

wire_enum! {
    TargetAudience {
        All => "all",
        SpecificProperty => "specific_property",
        SpecificFloor => "specific_floor",
    }
}

impl Default for TargetAudience {
    fn default() -> Self {
        TargetAudience::All
    }
}

wire_enum! {
    NoticeStatus {
        Active => "active",
        Archived => "archived",
        Draft => "draft",
    }
}

impl Default for NoticeStatus {
    fn default() -> Self {
        NoticeStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReadReceipt {
    pub user_id: Uuid,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notice {
    pub id: Uuid,
    /// `None` addresses every property
    pub property_id: Option<Uuid>,
    pub created_by: Uuid,
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    pub priority: Priority,
    pub target_audience: TargetAudience,
    pub target_floor: Option<i32>,
    pub valid_from: DateTime<Utc>,
    /// `None` means open-ended
    pub valid_till: Option<DateTime<Utc>>,
    pub status: NoticeStatus,
    pub attachments: Vec<Image>,
    pub read_by: Vec<ReadReceipt>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notice {
    /// Build a notice authored by `created_by`.
    pub fn publish(input: NewNotice, created_by: Uuid, now: DateTime<Utc>) -> DomainResult<Self> {
        let notice = Self {
            id: Uuid::new_v4(),
            property_id: input.property_id,
            created_by,
            title: input.title.trim().to_string(),
            content: input.content,
            category: input.category,
            priority: input.priority.unwrap_or_default(),
            target_audience: input.target_audience,
            target_floor: input.target_floor,
            valid_from: input.valid_from.unwrap_or(now),
            valid_till: input.valid_till,
            status: input.status.unwrap_or_default(),
            attachments: input.attachments,
            read_by: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        notice.check()?;
        Ok(notice)
    }

    /// Active and inside `[valid_from, valid_till]`.
    pub fn is_currently_valid(&self, now: DateTime<Utc>) -> bool {
        self.status == NoticeStatus::Active
            && self.valid_from <= now
            && self.valid_till.map_or(true, |till| now <= till)
    }

    pub fn is_read_by(&self, user_id: Uuid) -> bool {
        self.read_by.iter().any(|receipt| receipt.user_id == user_id)
    }

    /// Record that `user_id` read the notice. Returns `false` if they had
    /// already, leaving the original receipt in place.
    pub fn mark_read(&mut self, user_id: Uuid, now: DateTime<Utc>) -> bool {
        if self.is_read_by(user_id) {
            return false;
        }
        self.read_by.push(ReadReceipt {
            user_id,
            read_at: now,
        });
        true
    }

    pub fn apply(&mut self, changes: NoticeChanges, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(audience) = changes.target_audience {
            self.target_audience = audience;
        }
        if let Some(floor) = changes.target_floor {
            self.target_floor = Some(floor);
        }
        if let Some(valid_from) = changes.valid_from {
            self.valid_from = valid_from;
        }
        if let Some(valid_till) = changes.valid_till {
            self.valid_till = Some(valid_till);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(attachments) = changes.attachments {
            self.attachments = attachments;
        }
        self.updated_at = now;
        self.check()
    }

    fn check(&self) -> DomainResult<()> {
        if let Some(till) = self.valid_till {
            if till < self.valid_from {
                return Err(DomainError::validation(
                    "valid_till cannot be before valid_from",
                ));
            }
        }
        match self.target_audience {
            TargetAudience::All => Ok(()),
            TargetAudience::SpecificProperty if self.property_id.is_none() => Err(
                DomainError::validation("A property-specific notice needs a property"),
            ),
            TargetAudience::SpecificFloor
                if self.property_id.is_none() || self.target_floor.is_none() =>
            {
                Err(DomainError::validation(
                    "A floor-specific notice needs a property and a floor",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Order for display: most urgent first, then newest first.
pub fn sort_for_display(notices: &mut [Notice]) {
    notices.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Notice creation request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewNotice {
    pub property_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Water supply interruption"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
    #[serde(default)]
    pub category: NoticeCategory,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub target_audience: TargetAudience,
    pub target_floor: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub status: Option<NoticeStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub attachments: Vec<Image>,
}

/// Notice update request. The scope property and author are fixed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NoticeChanges {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: Option<String>,
    pub category: Option<NoticeCategory>,
    pub priority: Option<Priority>,
    pub target_audience: Option<TargetAudience>,
    pub target_floor: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub status: Option<NoticeStatus>,
    #[validate(nested)]
    pub attachments: Option<Vec<Image>>,
}
