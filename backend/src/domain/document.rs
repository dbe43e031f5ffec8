//! Uploaded property documents.
//!
//! Documents are immutable once stored: the content hash is computed from
//! the uploaded bytes at upload time and never recomputed. Retrieval is by
//! owning property or by exact content hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hash::Sha256Digest;

/// Category of an uploaded document.
///
/// The set mirrors the paperwork a land-records office actually handles;
/// anything else files under [`DocumentKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Registered sale deed.
    SaleDeed,
    /// Property tax receipt.
    PropertyTax,
    /// Survey map extract.
    SurveyMap,
    /// Certificate issued on mutation approval.
    MutationCertificate,
    /// e-Stamp certificate.
    EStamp,
    /// Registry extract.
    Registry,
    /// Khatauni (record of holdings).
    Khatauni,
    /// Jamabandi (record of rights).
    Jamabandi,
    /// No-objection certificate.
    Noc,
    /// Encumbrance certificate.
    EncumbranceCertificate,
    /// Anything not covered by a dedicated category.
    Other,
}

impl DocumentKind {
    /// All recognised categories, in display order.
    pub const ALL: [Self; 11] = [
        Self::SaleDeed,
        Self::PropertyTax,
        Self::SurveyMap,
        Self::MutationCertificate,
        Self::EStamp,
        Self::Registry,
        Self::Khatauni,
        Self::Jamabandi,
        Self::Noc,
        Self::EncumbranceCertificate,
        Self::Other,
    ];

    /// Stable wire label, matching the serde rendering.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaleDeed => "sale_deed",
            Self::PropertyTax => "property_tax",
            Self::SurveyMap => "survey_map",
            Self::MutationCertificate => "mutation_certificate",
            Self::EStamp => "e_stamp",
            Self::Registry => "registry",
            Self::Khatauni => "khatauni",
            Self::Jamabandi => "jamabandi",
            Self::Noc => "noc",
            Self::EncumbranceCertificate => "encumbrance_certificate",
            Self::Other => "other",
        }
    }

    /// Parse a wire label back into a category.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == label)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document attached to a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Unique identifier assigned at upload.
    pub id: Uuid,
    /// Property this document belongs to.
    pub property_id: Uuid,
    /// Document category.
    pub kind: DocumentKind,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Optional free-text description supplied by the uploader.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// SHA-256 digest of the uploaded bytes; immutable after upload.
    pub content_hash: Sha256Digest,
    /// Size of the uploaded file in bytes.
    pub size_bytes: u64,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}
