//! Domain model of the land-records core.
//!
//! Purpose: strongly typed entities, value objects and services for the
//! four components: property registry, document store, mutation workflow
//! and verification lookup. Types are immutable where the paper trail is
//! (documents, resolved mutations), and every invariant a record carries is
//! documented on the type that enforces it. Transport and persistence
//! concerns live in the adapter layers.

pub mod auth;
pub mod document;
pub mod documents;
pub mod error;
pub mod fees;
pub mod hash;
pub mod mutation;
pub mod mutations;
pub mod ports;
pub mod property;
pub mod registry;
pub mod verification;

pub use self::auth::{Caller, OwnerId, OwnerIdValidationError};
pub use self::document::{Document, DocumentKind};
pub use self::documents::{DEFAULT_MAX_UPLOAD_BYTES, DocumentStoreService};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::fees::{FeeBreakdown, FeePolicy};
pub use self::hash::{DigestParseError, Sha256Digest};
pub use self::mutation::{
    ApprovalRecord, CancellationRecord, Mutation, MutationFilter, MutationStatus,
    MutationStatusKind, RegistryNumber, RejectionRecord, TransactionId, TransactionIdFormatError,
    TransferReason,
};
pub use self::mutations::MutationWorkflowService;
pub use self::property::{
    AreaSqFt, GeoPoint, Property, PropertyFilter, PropertySubmission, SurveyNumber,
    SurveyNumberValidationError, ZeroAreaError,
};
pub use self::registry::PropertyRegistryService;
pub use self::verification::VerificationService;

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
