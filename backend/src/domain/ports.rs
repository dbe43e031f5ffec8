//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe what the domain expects from adapters (the record
//! store, the identity directory, the audit sink); driving ports are the
//! use-case surface the HTTP layer consumes. Every driven port exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::auth::{Caller, OwnerId};
use super::document::{Document, DocumentKind};
use super::error::Error;
use super::fees::FeeBreakdown;
use super::hash::Sha256Digest;
use super::mutation::{
    ApprovalRecord, CancellationRecord, Mutation, MutationFilter, MutationStatusKind,
    RejectionRecord, TransactionId, TransferReason,
};
use super::property::{Property, PropertyFilter, PropertySubmission, SurveyNumber};

/// Errors surfaced by the property store.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PropertyStoreError {
    /// A parcel with this survey number is already registered.
    #[error("survey number {survey_number} is already registered")]
    DuplicateSurveyNumber {
        /// The colliding survey number.
        survey_number: String,
    },
    /// The referenced parcel does not exist.
    #[error("property {property_id} not found")]
    NotFound {
        /// The missing parcel id.
        property_id: Uuid,
    },
    /// Catch-all for backend failures bubbling up from the adapter.
    #[error("property store failure: {message}")]
    Backend {
        /// Adapter-supplied description.
        message: String,
    },
}

impl PropertyStoreError {
    /// Helper for survey-number collisions.
    pub fn duplicate_survey(survey_number: impl Into<String>) -> Self {
        Self::DuplicateSurveyNumber {
            survey_number: survey_number.into(),
        }
    }

    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the document store.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DocumentStoreError {
    /// Catch-all for backend failures bubbling up from the adapter.
    #[error("document store failure: {message}")]
    Backend {
        /// Adapter-supplied description.
        message: String,
    },
}

impl DocumentStoreError {
    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the mutation store.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum MutationStoreError {
    /// The referenced mutation does not exist.
    #[error("mutation {mutation_id} not found")]
    NotFound {
        /// The missing mutation id.
        mutation_id: Uuid,
    },
    /// A mutation with this transaction id already exists.
    #[error("transaction id {transaction_id} is already taken")]
    DuplicateTransactionId {
        /// The colliding transaction id.
        transaction_id: String,
    },
    /// The mutation has already left `pending`.
    #[error("mutation {mutation_id} is already {status}")]
    AlreadyResolved {
        /// The resolved mutation id.
        mutation_id: Uuid,
        /// Its terminal status.
        status: MutationStatusKind,
    },
    /// The parcel referenced by the mutation no longer resolves.
    #[error("property {property_id} referenced by the mutation not found")]
    PropertyMissing {
        /// The missing parcel id.
        property_id: Uuid,
    },
    /// Ownership moved since the request was created; the approval lost.
    #[error("ownership of property {property_id} changed, now held by {current_owner}")]
    OwnershipChanged {
        /// The contested parcel id.
        property_id: Uuid,
        /// Owner currently on record.
        current_owner: String,
    },
    /// Catch-all for backend failures bubbling up from the adapter.
    #[error("mutation store failure: {message}")]
    Backend {
        /// Adapter-supplied description.
        message: String,
    },
}

impl MutationStoreError {
    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Persistence port for the property registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Insert a newly registered parcel, enforcing survey-number uniqueness.
    async fn insert(&self, property: &Property) -> Result<(), PropertyStoreError>;

    /// Fetch a parcel by id.
    async fn find_by_id(&self, property_id: Uuid) -> Result<Option<Property>, PropertyStoreError>;

    /// Fetch a parcel by survey number (exact match).
    async fn find_by_survey(
        &self,
        survey_number: &SurveyNumber,
    ) -> Result<Option<Property>, PropertyStoreError>;

    /// List parcels matching the filter, in registration order.
    async fn list(&self, filter: &PropertyFilter) -> Result<Vec<Property>, PropertyStoreError>;

    /// Record the hash of the latest title document uploaded for a parcel.
    async fn set_title_document(
        &self,
        property_id: Uuid,
        hash: &Sha256Digest,
        at: DateTime<Utc>,
    ) -> Result<(), PropertyStoreError>;
}

/// Persistence port for uploaded documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Store an uploaded document.
    async fn insert(&self, document: &Document) -> Result<(), DocumentStoreError>;

    /// List a parcel's documents in upload order.
    async fn list_by_property(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Fetch a document by exact content hash.
    async fn find_by_hash(
        &self,
        hash: &Sha256Digest,
    ) -> Result<Option<Document>, DocumentStoreError>;
}

/// Persistence port for ownership-transfer requests.
///
/// The resolution methods are the transactional units of the workflow: the
/// adapter performs the pending-status check and the status transition (and,
/// for [`MutationRepository::approve`], the owner compare-and-swap) inside a
/// single critical section, so concurrent resolutions of one mutation (or
/// concurrent approvals against one parcel) have exactly one winner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MutationRepository: Send + Sync {
    /// Record a new pending transfer, enforcing transaction-id uniqueness.
    async fn insert(&self, mutation: &Mutation) -> Result<(), MutationStoreError>;

    /// Fetch a mutation by id.
    async fn find_by_id(&self, mutation_id: Uuid) -> Result<Option<Mutation>, MutationStoreError>;

    /// Fetch a mutation by its human-readable transaction id.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Mutation>, MutationStoreError>;

    /// List mutations matching the filter, newest first; ties keep
    /// insertion order.
    async fn list(&self, filter: &MutationFilter) -> Result<Vec<Mutation>, MutationStoreError>;

    /// Approve a pending mutation and move the parcel's owner atomically.
    async fn approve(
        &self,
        mutation_id: Uuid,
        record: ApprovalRecord,
    ) -> Result<Mutation, MutationStoreError>;

    /// Reject a pending mutation; the parcel is untouched.
    async fn reject(
        &self,
        mutation_id: Uuid,
        record: RejectionRecord,
    ) -> Result<Mutation, MutationStoreError>;

    /// Cancel a pending mutation (soft delete); the parcel is untouched.
    async fn cancel(
        &self,
        mutation_id: Uuid,
        record: CancellationRecord,
    ) -> Result<Mutation, MutationStoreError>;
}

/// Errors surfaced by the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum IdentityResolutionError {
    /// Catch-all for resolver failures.
    #[error("identity resolution failed: {message}")]
    Backend {
        /// Resolver-supplied description.
        message: String,
    },
}

/// Port resolving opaque bearer tokens to caller identities.
///
/// Identity management is an external collaborator; the core only asks
/// "who is this token". Unknown tokens resolve to `None` and the caller
/// receives 401; there is no fallback identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a bearer token, returning `None` when the token is unknown.
    async fn resolve(&self, token: &str) -> Result<Option<Caller>, IdentityResolutionError>;
}

/// Audit event emitted by the verification surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The lookup performed, e.g. `verify_property`.
    pub action: &'static str,
    /// The key that was looked up.
    pub subject: String,
    /// Whether a record was found.
    pub success: bool,
}

/// Port receiving audit events from read-side lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Record one audit event. Failures are the adapter's concern; lookups
    /// never fail because auditing did.
    async fn record(&self, event: AuditEvent);
}

/// Validated payload for a document upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// Parcel the document belongs to.
    pub property_id: Uuid,
    /// Document category.
    pub kind: DocumentKind,
    /// Original file name.
    pub file_name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Raw uploaded bytes.
    pub bytes: Vec<u8>,
}

/// Validated payload for a transfer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Parcel to transfer.
    pub property_id: Uuid,
    /// Proposed new owner.
    pub new_owner_id: OwnerId,
    /// Stated reason.
    pub reason: TransferReason,
}

/// Driving port: property registry use-cases.
#[async_trait]
pub trait PropertyRegistryPort: Send + Sync {
    /// Register a parcel owned by the caller.
    async fn register(
        &self,
        caller: &Caller,
        submission: PropertySubmission,
    ) -> Result<Property, Error>;

    /// Fetch a parcel the caller may view.
    async fn get(&self, caller: &Caller, property_id: Uuid) -> Result<Property, Error>;

    /// List parcels visible to the caller.
    async fn list(&self, caller: &Caller, filter: PropertyFilter) -> Result<Vec<Property>, Error>;
}

/// Driving port: document store use-cases.
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Store an uploaded document against a parcel the caller controls.
    async fn upload(&self, caller: &Caller, upload: DocumentUpload) -> Result<Document, Error>;

    /// List a parcel's documents in upload order.
    async fn list_for_property(
        &self,
        caller: &Caller,
        property_id: Uuid,
    ) -> Result<Vec<Document>, Error>;
}

/// Driving port: mutation workflow use-cases.
#[async_trait]
pub trait MutationWorkflowPort: Send + Sync {
    /// Create a pending transfer request.
    async fn create(&self, caller: &Caller, request: TransferRequest) -> Result<Mutation, Error>;

    /// Fetch a mutation visible to the caller.
    async fn get(&self, caller: &Caller, mutation_id: Uuid) -> Result<Mutation, Error>;

    /// List mutations visible to the caller, newest first.
    async fn list(&self, caller: &Caller, filter: MutationFilter) -> Result<Vec<Mutation>, Error>;

    /// Approve a pending transfer (registrar only).
    async fn approve(
        &self,
        caller: &Caller,
        mutation_id: Uuid,
        fees: Option<FeeBreakdown>,
    ) -> Result<Mutation, Error>;

    /// Reject a pending transfer (registrar only).
    async fn reject(
        &self,
        caller: &Caller,
        mutation_id: Uuid,
        reason: String,
    ) -> Result<Mutation, Error>;

    /// Withdraw a pending transfer.
    async fn cancel(&self, caller: &Caller, mutation_id: Uuid) -> Result<Mutation, Error>;
}

/// Driving port: public record verification.
#[async_trait]
pub trait VerificationPort: Send + Sync {
    /// Look up a parcel by survey number.
    async fn verify_property(&self, survey_number: &SurveyNumber) -> Result<Property, Error>;

    /// Look up a document by exact content hash.
    async fn verify_document(&self, hash: &Sha256Digest) -> Result<Document, Error>;

    /// Look up a transfer by transaction id (case-insensitive).
    async fn verify_transaction(&self, transaction_id: &TransactionId)
    -> Result<Mutation, Error>;
}
