//! Monthly rent payments.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::tenant::Tenant;

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth(NaiveDate);

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| DomainError::validation(format!("Invalid month {}-{:02}", year, month)))
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl FromStr for BillingMonth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::validation(format!("'{}' is not a month in YYYY-MM form", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for BillingMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BillingMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

wire_enum! {
    PaymentMethod {
        Cash => "cash",
        Upi => "upi",
        BankTransfer => "bank_transfer",
        Cheque => "cheque",
        Online => "online",
        Card => "card",
    }
}

wire_enum! {
    PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
        Partial => "partial",
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// Rent collected from one tenant for one month. At most one per
/// (tenant, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Payment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub room_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-01"))]
    pub month: BillingMonth,
    pub amount: i64,
    pub late_fee: i64,
    pub discount: i64,
    /// Always `amount + late_fee - discount`
    pub total_amount: i64,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub receipt: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Build a payment for `tenant`, recorded by `recorded_by`, and settle it.
    pub fn create(
        input: NewPayment,
        tenant: &Tenant,
        recorded_by: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut payment = Self {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            property_id: tenant.property_id,
            room_id: tenant.room_id,
            month: input.month,
            amount: input.amount,
            late_fee: input.late_fee,
            discount: input.discount,
            total_amount: 0,
            due_date: input.due_date,
            payment_date: input.payment_date,
            payment_method: input.payment_method,
            transaction_id: input.transaction_id,
            status: input.status.unwrap_or_default(),
            receipt: input.receipt,
            notes: input.notes,
            recorded_by: Some(recorded_by),
            created_at: now,
            updated_at: now,
        };
        payment.settle(today)?;
        Ok(payment)
    }

    /// Recompute derived state before every save.
    ///
    /// Derives the total, flips a past-due pending payment to overdue and
    /// stamps the payment date on a paid payment that lacks one.
    pub fn settle(&mut self, today: NaiveDate) -> DomainResult<()> {
        if self.amount < 0 || self.late_fee < 0 || self.discount < 0 {
            return Err(DomainError::validation("Amounts cannot be negative"));
        }
        let gross = self.amount + self.late_fee;
        if self.discount > gross {
            return Err(DomainError::validation(
                "Discount cannot exceed amount plus late fee",
            ));
        }
        self.total_amount = gross - self.discount;

        if self.status == PaymentStatus::Pending && self.due_date < today {
            self.status = PaymentStatus::Overdue;
        }
        if self.status == PaymentStatus::Paid && self.payment_date.is_none() {
            self.payment_date = Some(today);
        }
        Ok(())
    }

    /// Apply client changes and settle again.
    pub fn apply(&mut self, changes: PaymentChanges, today: NaiveDate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(month) = changes.month {
            self.month = month;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(late_fee) = changes.late_fee {
            self.late_fee = late_fee;
        }
        if let Some(discount) = changes.discount {
            self.discount = discount;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(payment_date) = changes.payment_date {
            self.payment_date = Some(payment_date);
        }
        if let Some(method) = changes.payment_method {
            self.payment_method = Some(method);
        }
        if let Some(transaction_id) = changes.transaction_id {
            self.transaction_id = Some(transaction_id);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(receipt) = changes.receipt {
            self.receipt = Some(receipt);
        }
        if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
        self.updated_at = now;
        self.settle(today)
    }
}

/// Payment creation request. Tenant placement and the recorder are
/// resolved server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewPayment {
    pub tenant_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-01"))]
    pub month: BillingMonth,
    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub amount: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Late fee cannot be negative"))]
    pub late_fee: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Discount cannot be negative"))]
    pub discount: i64,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    pub status: Option<PaymentStatus>,
    pub receipt: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

/// Payment update request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentChanges {
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2024-02"))]
    pub month: Option<BillingMonth>,
    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub amount: Option<i64>,
    #[validate(range(min = 0, message = "Late fee cannot be negative"))]
    pub late_fee: Option<i64>,
    #[validate(range(min = 0, message = "Discount cannot be negative"))]
    pub discount: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    pub status: Option<PaymentStatus>,
    pub receipt: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl PaymentChanges {
    /// Whether the change only reports how the tenant paid, which is all a
    /// tenant may edit on their own payment.
    pub fn is_remittance_only(&self) -> bool {
        self.month.is_none()
            && self.amount.is_none()
            && self.late_fee.is_none()
            && self.discount.is_none()
            && self.due_date.is_none()
            && self.payment_date.is_none()
            && self.status.is_none()
            && self.receipt.is_none()
    }
}
