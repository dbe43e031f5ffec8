//! Land parcel aggregate.
//!
//! A property's identity fields (survey number, address, area, geometry)
//! are fixed at registration. The owner reference is the only mutable
//! relationship, and it moves exclusively through an approved mutation;
//! [`Property::transfer_to`] verifies the expected current owner so racing
//! approvals cannot both win.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::auth::OwnerId;
use super::hash::Sha256Digest;

/// Jurisdictional parcel identifier, e.g. `45/2`.
///
/// ## Invariants
/// - Non-empty once trimmed of whitespace.
/// - No surrounding whitespace.
/// - Unique across the registry (enforced by the store on insert).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SurveyNumber(String);

/// Validation errors returned when constructing [`SurveyNumber`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SurveyNumberValidationError {
    /// Survey number is empty after trimming whitespace.
    #[error("survey number must not be empty")]
    Empty,
    /// Survey number carries leading or trailing whitespace.
    #[error("survey number must not contain surrounding whitespace")]
    ContainsWhitespace,
}

impl SurveyNumber {
    /// Construct a survey number after validating shape.
    pub fn new(value: impl Into<String>) -> Result<Self, SurveyNumberValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(SurveyNumberValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(SurveyNumberValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for SurveyNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SurveyNumber {
    type Error = SurveyNumberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SurveyNumber> for String {
    fn from(value: SurveyNumber) -> Self {
        value.0
    }
}

/// Parcel area in square feet, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct AreaSqFt(u64);

/// Validation error returned when constructing [`AreaSqFt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("area must be greater than zero")]
pub struct ZeroAreaError;

impl AreaSqFt {
    /// Construct an area, rejecting zero.
    pub fn new(value: u64) -> Result<Self, ZeroAreaError> {
        if value == 0 {
            return Err(ZeroAreaError);
        }
        Ok(Self(value))
    }

    /// The area in square feet.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for AreaSqFt {
    type Error = ZeroAreaError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AreaSqFt> for u64 {
    fn from(value: AreaSqFt) -> Self {
        value.0
    }
}

/// WGS 84 coordinates of the parcel centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct GeoPoint {
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,
}

/// Validation errors returned when constructing [`GeoPoint`].
#[derive(Debug, Clone, Copy, PartialEq, ThisError)]
pub enum GeoPointValidationError {
    /// Latitude outside [-90, 90].
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude outside [-180, 180].
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl GeoPoint {
    /// Construct a coordinate pair after range validation.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointValidationError> {
        if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
            return Err(GeoPointValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
            return Err(GeoPointValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A registered land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Property {
    /// Unique identifier assigned at registration.
    pub id: Uuid,
    /// Jurisdictional survey/khasra number, unique across the registry.
    pub survey_number: SurveyNumber,
    /// Postal address of the parcel.
    pub address: String,
    /// Parcel area.
    pub area_sqft: AreaSqFt,
    /// Optional centroid coordinates for the map view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    /// Current owner reference; moves only through an approved mutation.
    pub owner_id: OwnerId,
    /// Content hash of the most recently uploaded title document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_document_hash: Option<Sha256Digest>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last owner or title-document change.
    pub updated_at: DateTime<Utc>,
}

/// Error raised when an owner transfer does not match the live record.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("property is owned by {current}, expected {expected}")]
pub struct OwnerMismatchError {
    /// Owner the transfer was predicated on.
    pub expected: OwnerId,
    /// Owner currently on record.
    pub current: OwnerId,
}

impl Property {
    /// Register a new parcel owned by `owner_id`.
    #[must_use]
    pub fn register(
        id: Uuid,
        submission: PropertySubmission,
        owner_id: OwnerId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            survey_number: submission.survey_number,
            address: submission.address,
            area_sqft: submission.area_sqft,
            geo: submission.geo,
            owner_id,
            title_document_hash: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Move ownership to `new_owner`, verifying the expected current owner.
    ///
    /// The expected owner is the one captured on the mutation at request
    /// time; a mismatch means another transfer won in between, and the
    /// caller must re-fetch and re-decide.
    pub fn transfer_to(
        self,
        expected: &OwnerId,
        new_owner: OwnerId,
        at: DateTime<Utc>,
    ) -> Result<Self, OwnerMismatchError> {
        if self.owner_id != *expected {
            return Err(OwnerMismatchError {
                expected: expected.clone(),
                current: self.owner_id,
            });
        }
        Ok(Self {
            owner_id: new_owner,
            updated_at: at,
            ..self
        })
    }

    /// Record the hash of the latest uploaded title document.
    #[must_use]
    pub fn with_title_document(self, hash: Sha256Digest, at: DateTime<Utc>) -> Self {
        Self {
            title_document_hash: Some(hash),
            updated_at: at,
            ..self
        }
    }
}

/// Validated attributes submitted when registering a parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySubmission {
    /// Jurisdictional survey number.
    pub survey_number: SurveyNumber,
    /// Postal address.
    pub address: String,
    /// Parcel area.
    pub area_sqft: AreaSqFt,
    /// Optional centroid coordinates.
    pub geo: Option<GeoPoint>,
}

/// Filter applied to property listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Restrict results to parcels held by this owner.
    pub owner_id: Option<OwnerId>,
}
