//! Ownership-transfer requests ("mutations" in land-records parlance).
//!
//! A mutation is created `pending` and resolved exactly once: approved,
//! rejected, or cancelled. There is no path back to `pending` and no second
//! resolution; the transition methods return [`InvalidTransitionError`]
//! rather than mutate a resolved record. The previous owner is captured at
//! creation time and never recomputed: approval is predicated on who owned
//! the parcel when the transfer was requested, not on who owns it now.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::auth::OwnerId;
use super::hash::Sha256Digest;

/// Human-readable transfer identifier in the canonical form `MUT-NNNNN`.
///
/// Lookups are case-insensitive; the canonical rendering is uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

/// Validation error returned when parsing a [`TransactionId`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("transaction id must match MUT-NNNNN")]
pub struct TransactionIdFormatError;

impl TransactionId {
    /// Render a serial number as `MUT-NNNNN`.
    ///
    /// Serials are taken modulo 100 000 so any `u32` produces a valid id.
    #[must_use]
    pub fn from_serial(serial: u32) -> Self {
        Self(format!("MUT-{:05}", serial % 100_000))
    }

    /// Parse a transfer identifier, accepting any letter case.
    pub fn parse(value: &str) -> Result<Self, TransactionIdFormatError> {
        let canonical = value.trim().to_ascii_uppercase();
        let digits = canonical
            .strip_prefix("MUT-")
            .ok_or(TransactionIdFormatError)?;
        if digits.len() != 5 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(TransactionIdFormatError);
        }
        Ok(Self(canonical))
    }

    /// Borrow the canonical rendering.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TransactionId {
    type Error = TransactionIdFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.0
    }
}

/// External e-registry reference in the form `EREG/NNNNN/YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryNumber(String);

impl RegistryNumber {
    /// Render a serial and year as `EREG/NNNNN/YYYY`.
    #[must_use]
    pub fn from_serial(serial: u32, year: i32) -> Self {
        Self(format!("EREG/{:05}/{year}", serial % 100_000))
    }

    /// Borrow the rendered reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RegistryNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a transfer was requested.
///
/// The enumerated categories are the ones the mutation desk recognises;
/// free text is preserved under [`TransferReason::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransferReason {
    /// Outright sale.
    Sale,
    /// Inheritance on the owner's death.
    Inheritance,
    /// Registered gift deed.
    GiftDeed,
    /// Partition among family members.
    FamilyPartition,
    /// Transfer ordered by a court.
    CourtOrder,
    /// Transfer through a power of attorney.
    PowerOfAttorney,
    /// Transfer under a will.
    WillTransfer,
    /// Exchange of parcels.
    Exchange,
    /// Any other reason, carried as free text.
    Other(String),
}

impl TransferReason {
    /// Display label for the reason.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sale => "Sale",
            Self::Inheritance => "Inheritance",
            Self::GiftDeed => "Gift Deed",
            Self::FamilyPartition => "Family Partition",
            Self::CourtOrder => "Court Order",
            Self::PowerOfAttorney => "Power of Attorney",
            Self::WillTransfer => "Will Transfer",
            Self::Exchange => "Exchange",
            Self::Other(text) => text.as_str(),
        }
    }
}

impl From<String> for TransferReason {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Sale" => Self::Sale,
            "Inheritance" => Self::Inheritance,
            "Gift Deed" => Self::GiftDeed,
            "Family Partition" => Self::FamilyPartition,
            "Court Order" => Self::CourtOrder,
            "Power of Attorney" => Self::PowerOfAttorney,
            "Will Transfer" => Self::WillTransfer,
            "Exchange" => Self::Exchange,
            _ => Self::Other(value),
        }
    }
}

impl From<TransferReason> for String {
    fn from(value: TransferReason) -> Self {
        match value {
            TransferReason::Other(text) => text,
            other => other.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for TransferReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata stamped onto a mutation at approval; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    /// When the registrar picked the request up for review.
    pub review_date: DateTime<Utc>,
    /// When the transfer was approved.
    pub approved_date: DateTime<Utc>,
    /// Stamp duty levied, in INR.
    pub stamp_duty_inr: u64,
    /// Registration fee levied, in INR.
    pub registration_fee_inr: u64,
    /// Tamper-evidence digest over the transfer facts.
    pub verification_hash: Sha256Digest,
    /// External e-registry reference.
    pub registry_number: RegistryNumber,
}

/// Metadata stamped onto a mutation at rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionRecord {
    /// When the registrar picked the request up for review.
    pub review_date: DateTime<Utc>,
    /// When the transfer was rejected.
    pub rejected_date: DateTime<Utc>,
    /// Registrar's stated grounds.
    pub reason: String,
}

/// Metadata stamped onto a mutation when the requester withdraws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRecord {
    /// When the request was withdrawn.
    pub cancelled_date: DateTime<Utc>,
}

/// Lifecycle state of a mutation, tagged with the per-state metadata.
///
/// `pending` is the only non-terminal state. Cancellation is a soft
/// delete: the record stays retrievable for audit but drops out of default
/// listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationStatus {
    /// Awaiting a registrar's decision.
    Pending,
    /// Approved; ownership moved.
    Approved(ApprovalRecord),
    /// Rejected; the parcel is untouched.
    Rejected(RejectionRecord),
    /// Withdrawn by the requester while still pending.
    Cancelled(CancellationRecord),
}

/// Discriminant of [`MutationStatus`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatusKind {
    /// Awaiting review.
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
    /// Withdrawn.
    Cancelled,
}

impl MutationStatusKind {
    /// Stable wire label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a wire label back into a status kind.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for MutationStatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a transition is attempted on a resolved mutation.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("cannot {attempted} a mutation that is {current}")]
pub struct InvalidTransitionError {
    /// The transition that was attempted.
    pub attempted: &'static str,
    /// The record's current status.
    pub current: MutationStatusKind,
}

/// An ownership-transfer request.
// No deny_unknown_fields here: serde does not support it alongside the
// flattened status payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    /// Unique identifier assigned at creation.
    pub id: Uuid,
    /// Human-readable transfer identifier (`MUT-NNNNN`).
    pub transaction_id: TransactionId,
    /// Parcel the transfer applies to.
    pub property_id: Uuid,
    /// Owner on record when the request was created; never recomputed.
    pub previous_owner_id: OwnerId,
    /// Proposed new owner.
    pub new_owner_id: OwnerId,
    /// Stated reason for the transfer.
    pub reason: TransferReason,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Lifecycle state plus per-state metadata.
    #[serde(flatten)]
    pub status: MutationStatus,
}

impl Mutation {
    /// Current status discriminant.
    #[must_use]
    pub fn status_kind(&self) -> MutationStatusKind {
        match self.status {
            MutationStatus::Pending => MutationStatusKind::Pending,
            MutationStatus::Approved(_) => MutationStatusKind::Approved,
            MutationStatus::Rejected(_) => MutationStatusKind::Rejected,
            MutationStatus::Cancelled(_) => MutationStatusKind::Cancelled,
        }
    }

    /// Whether the request still awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.status, MutationStatus::Pending)
    }

    /// Resolve the request as approved.
    pub fn approve(self, record: ApprovalRecord) -> Result<Self, InvalidTransitionError> {
        self.transition("approve", MutationStatus::Approved(record))
    }

    /// Resolve the request as rejected.
    pub fn reject(self, record: RejectionRecord) -> Result<Self, InvalidTransitionError> {
        self.transition("reject", MutationStatus::Rejected(record))
    }

    /// Withdraw the request.
    pub fn cancel(self, record: CancellationRecord) -> Result<Self, InvalidTransitionError> {
        self.transition("cancel", MutationStatus::Cancelled(record))
    }

    fn transition(
        self,
        attempted: &'static str,
        next: MutationStatus,
    ) -> Result<Self, InvalidTransitionError> {
        if !self.is_pending() {
            return Err(InvalidTransitionError {
                attempted,
                current: self.status_kind(),
            });
        }
        Ok(Self {
            status: next,
            ..self
        })
    }

    /// Tamper-evidence digest over the transfer facts, stamped at approval.
    #[must_use]
    pub fn verification_digest(&self) -> Sha256Digest {
        Sha256Digest::of_str(&format!(
            "{}-{}-{}-{}-approved",
            self.id, self.property_id, self.previous_owner_id, self.new_owner_id
        ))
    }
}

/// Filter applied to mutation listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationFilter {
    /// Restrict to a single status.
    pub status: Option<MutationStatusKind>,
    /// Restrict to transfers of one parcel.
    pub property_id: Option<Uuid>,
    /// Restrict to transfers where this owner is a participant (previous or
    /// proposed new owner).
    pub participant: Option<OwnerId>,
}

impl MutationFilter {
    /// Whether `mutation` passes the filter.
    ///
    /// Cancelled records are excluded unless explicitly requested via
    /// `status = cancelled`.
    #[must_use]
    pub fn matches(&self, mutation: &Mutation) -> bool {
        let kind = mutation.status_kind();
        match self.status {
            Some(wanted) if kind != wanted => return false,
            None if kind == MutationStatusKind::Cancelled => return false,
            _ => {}
        }
        if let Some(property_id) = self.property_id {
            if mutation.property_id != property_id {
                return false;
            }
        }
        if let Some(participant) = &self.participant {
            if mutation.previous_owner_id != *participant
                && mutation.new_owner_id != *participant
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
