//! Realtime notifications.
//!
//! Services publish events to an audience through the `Notifier` trait.
//! Delivery is best effort: a notifier never fails the request that
//! triggered it. The bundled adapter logs each event; a websocket gateway
//! would implement the same trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use domain::{Complaint, Notice, Payment, Room, Tenant, UserRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Who receives an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    User(Uuid),
    /// Everyone following a property (its owner and residents)
    Property(Uuid),
    Role(UserRole),
    All,
}

/// A named event with its payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Value,
}

impl Event {
    pub fn new(name: &'static str, data: Value) -> Self {
        Self {
            name,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, audience: Audience, event: Event);
}

/// Notifier that writes every event to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, audience: Audience, event: Event) {
        tracing::info!(
            event = event.name,
            audience = ?audience,
            message = event.message.as_deref().unwrap_or(""),
            "Notification published"
        );
    }
}

fn tenant_ref(tenant: &Tenant) -> Value {
    json!({ "id": tenant.id, "name": tenant.full_name })
}

fn payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// The events the services publish, addressed to the right audiences.
#[derive(Clone)]
pub struct Notifications {
    notifier: Arc<dyn Notifier>,
}

impl Notifications {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn payment_created(&self, payment: &Payment, tenant: &Tenant) {
        self.notifier
            .notify(
                Audience::User(tenant.user_id),
                Event::new("payment:new", json!({ "payment": payload(payment) }))
                    .with_message("New payment record created"),
            )
            .await;
        self.notifier
            .notify(
                Audience::Property(payment.property_id),
                Event::new(
                    "payment:created",
                    json!({ "payment": payload(payment), "tenant": tenant_ref(tenant) }),
                ),
            )
            .await;
    }

    pub async fn payment_updated(&self, payment: &Payment, tenant: &Tenant) {
        self.notifier
            .notify(
                Audience::User(tenant.user_id),
                Event::new("payment:updated", json!({ "payment": payload(payment) }))
                    .with_message("Payment status updated"),
            )
            .await;
        self.notifier
            .notify(
                Audience::Property(payment.property_id),
                Event::new(
                    "payment:updated",
                    json!({ "payment": payload(payment), "tenant": tenant_ref(tenant) }),
                ),
            )
            .await;
    }

    pub async fn complaint_created(&self, complaint: &Complaint, tenant: &Tenant) {
        let data = json!({ "complaint": payload(complaint), "tenant": tenant_ref(tenant) });
        self.notifier
            .notify(
                Audience::Property(complaint.property_id),
                Event::new("complaint:new", data.clone()),
            )
            .await;
        self.notifier
            .notify(
                Audience::Role(UserRole::Admin),
                Event::new("complaint:new", data),
            )
            .await;
    }

    pub async fn complaint_updated(&self, complaint: &Complaint, tenant: &Tenant) {
        self.notifier
            .notify(
                Audience::User(tenant.user_id),
                Event::new("complaint:updated", json!({ "complaint": payload(complaint) }))
                    .with_message(format!(
                        "Your complaint \"{}\" has been updated",
                        complaint.title
                    )),
            )
            .await;
        self.notifier
            .notify(
                Audience::Property(complaint.property_id),
                Event::new(
                    "complaint:updated",
                    json!({ "complaint": payload(complaint), "tenant": tenant_ref(tenant) }),
                ),
            )
            .await;
    }

    pub async fn notice_published(&self, notice: &Notice) {
        let audience = match notice.property_id {
            Some(property_id) => Audience::Property(property_id),
            None => Audience::Role(UserRole::Tenant),
        };
        self.notifier
            .notify(
                audience,
                Event::new("notice:new", json!({ "notice": payload(notice) }))
                    .with_message(format!("New notice: {}", notice.title)),
            )
            .await;
    }

    pub async fn room_assigned(&self, tenant: &Tenant, room: &Room) {
        self.notifier
            .notify(
                Audience::User(tenant.user_id),
                Event::new(
                    "tenant:room-assigned",
                    json!({ "tenant": payload(tenant), "room": payload(room) }),
                )
                .with_message(format!(
                    "You have been assigned to Room {}",
                    room.room_number
                )),
            )
            .await;
        self.notifier
            .notify(
                Audience::Property(room.property_id),
                Event::new(
                    "tenant:new",
                    json!({ "tenant": payload(tenant), "room": payload(room) }),
                )
                .with_message(format!(
                    "New tenant assigned to Room {}",
                    room.room_number
                )),
            )
            .await;
    }
}
