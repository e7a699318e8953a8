//! Maintenance complaints raised by tenants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::{Image, Priority};
use crate::tenant::Tenant;

wire_enum! {
    ComplaintCategory {
        Plumbing => "plumbing",
        Electrical => "electrical",
        Cleaning => "cleaning",
        Maintenance => "maintenance",
        Wifi => "wifi",
        Security => "security",
        Noise => "noise",
        PestControl => "pest_control",
        Other => "other",
    }
}

wire_enum! {
    ComplaintStatus {
        Open => "open",
        InProgress => "in-progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl Default for ComplaintStatus {
    fn default() -> Self {
        ComplaintStatus::Open
    }
}

/// One status change. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimelineEntry {
    pub status: ComplaintStatus,
    pub comment: Option<String>,
    pub updated_by: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Complaint {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub room_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub images: Vec<Image>,
    pub assigned_to: Option<String>,
    pub response: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    /// Open a complaint against the tenant's current placement.
    pub fn open(input: NewComplaint, tenant: &Tenant, raised_by: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            property_id: tenant.property_id,
            room_id: tenant.room_id,
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category,
            priority: input.priority.unwrap_or_default(),
            status: ComplaintStatus::Open,
            images: input.images,
            assigned_to: None,
            response: None,
            resolved_at: None,
            resolved_by: None,
            timeline: vec![TimelineEntry {
                status: ComplaintStatus::Open,
                comment: Some("Complaint registered".to_string()),
                updated_by: Some(raised_by),
                timestamp: now,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, appending a timeline entry. Returns `false` when the
    /// status is unchanged, in which case nothing is recorded.
    pub fn transition(
        &mut self,
        next: ComplaintStatus,
        comment: Option<String>,
        by: Uuid,
        now: DateTime<Utc>,
    ) -> bool {
        if next == self.status {
            return false;
        }

        match next {
            ComplaintStatus::Resolved => {
                self.resolved_at = Some(now);
                self.resolved_by = Some(by);
            }
            ComplaintStatus::Open | ComplaintStatus::InProgress => {
                self.resolved_at = None;
                self.resolved_by = None;
            }
            ComplaintStatus::Closed => {}
        }

        self.status = next;
        self.timeline.push(TimelineEntry {
            status: next,
            comment,
            updated_by: Some(by),
            timestamp: now,
        });
        self.updated_at = now;
        true
    }

    /// Hours from creation to resolution.
    pub fn resolution_time_hours(&self) -> Option<i64> {
        self.resolved_at
            .map(|resolved| (resolved - self.created_at).num_hours())
    }

    /// Apply client changes. A status change goes through [`Self::transition`].
    pub fn apply(&mut self, changes: ComplaintChanges, by: Uuid, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(images) = changes.images {
            self.images = images;
        }
        if let Some(assigned_to) = changes.assigned_to {
            self.assigned_to = Some(assigned_to);
        }
        if let Some(response) = changes.response {
            self.response = Some(response);
        }
        if let Some(status) = changes.status {
            self.transition(status, changes.comment, by, now);
        }
        self.updated_at = now;
    }
}

/// Complaint plus its derived read-time fields.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub resolution_time_hours: Option<i64>,
}

impl From<Complaint> for ComplaintView {
    fn from(complaint: Complaint) -> Self {
        Self {
            resolution_time_hours: complaint.resolution_time_hours(),
            complaint,
        }
    }
}

/// Complaint creation request. `tenant_id` is required when an owner or
/// admin files on a tenant's behalf and ignored for tenants themselves.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewComplaint {
    pub tenant_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Leaking tap"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: Option<Priority>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<Image>,
}

/// Complaint update request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComplaintChanges {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: Option<String>,
    pub category: Option<ComplaintCategory>,
    pub priority: Option<Priority>,
    pub status: Option<ComplaintStatus>,
    /// Note attached to the timeline entry of a status change
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[validate(length(max = 100))]
    pub assigned_to: Option<String>,
    #[validate(length(max = 1000, message = "Response cannot exceed 1000 characters"))]
    pub response: Option<String>,
    #[validate(nested)]
    pub images: Option<Vec<Image>>,
}

impl ComplaintChanges {
    /// Handling fields belong to the property's management. The filing
    /// tenant may only describe the problem or close it.
    pub fn is_tenant_editable(&self) -> bool {
        self.assigned_to.is_none()
            && self.response.is_none()
            && self
                .status
                .map_or(true, |status| status == ComplaintStatus::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(now: DateTime<Utc>) -> Complaint {
        let tenant_user = Uuid::new_v4();
        let mut complaint = Complaint {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            title: "No hot water".to_string(),
            description: "Geyser is off".to_string(),
            category: ComplaintCategory::Plumbing,
            priority: Priority::High,
            status: ComplaintStatus::Open,
            images: Vec::new(),
            assigned_to: None,
            response: None,
            resolved_at: None,
            resolved_by: None,
            timeline: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        complaint.timeline.push(TimelineEntry {
            status: ComplaintStatus::Open,
            comment: None,
            updated_by: Some(tenant_user),
            timestamp: now,
        });
        complaint
    }

    #[test]
    fn test_each_status_change_appends_timeline() {
        let now = Utc::now();
        let mut c = complaint(now);
        let warden = Uuid::new_v4();

        assert!(c.transition(ComplaintStatus::InProgress, None, warden, now));
        assert!(c.transition(ComplaintStatus::Resolved, Some("Fixed".into()), warden, now));

        assert_eq!(c.timeline.len(), 3);
        assert_eq!(c.timeline[2].status, ComplaintStatus::Resolved);
        assert_eq!(c.timeline[2].comment.as_deref(), Some("Fixed"));
    }

    #[test]
    fn test_same_status_records_nothing() {
        let now = Utc::now();
        let mut c = complaint(now);
        assert!(!c.transition(ComplaintStatus::Open, None, Uuid::new_v4(), now));
        assert_eq!(c.timeline.len(), 1);
    }

    #[test]
    fn test_resolution_stamps_and_duration() {
        let created = Utc::now();
        let mut c = complaint(created);
        let warden = Uuid::new_v4();
        let resolved = created + chrono::Duration::hours(26);

        c.transition(ComplaintStatus::Resolved, None, warden, resolved);

        assert_eq!(c.resolved_at, Some(resolved));
        assert_eq!(c.resolved_by, Some(warden));
        assert_eq!(c.resolution_time_hours(), Some(26));
    }

    #[test]
    fn test_reopen_clears_resolution() {
        let now = Utc::now();
        let mut c = complaint(now);
        c.transition(ComplaintStatus::Resolved, None, Uuid::new_v4(), now);
        c.transition(ComplaintStatus::Open, Some("Still leaking".into()), Uuid::new_v4(), now);

        assert!(c.resolved_at.is_none());
        assert_eq!(c.timeline.len(), 3);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            "in-progress".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::InProgress
        );
        assert_eq!(ComplaintCategory::PestControl.as_str(), "pest_control");
    }

    #[test]
    fn test_tenant_editable_changes() {
        let close = ComplaintChanges {
            status: Some(ComplaintStatus::Closed),
            ..Default::default()
        };
        assert!(close.is_tenant_editable());

        let resolve = ComplaintChanges {
            status: Some(ComplaintStatus::Resolved),
            ..Default::default()
        };
        assert!(!resolve.is_tenant_editable());
    }
}
