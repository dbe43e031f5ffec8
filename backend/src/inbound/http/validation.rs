//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns a `domain::Error` with an `invalid_request` code and
//! structured details naming the offending field, so clients can highlight
//! the right form input.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AreaSqFt, DocumentKind, Error, GeoPoint, MutationStatusKind, OwnerId, Sha256Digest,
    SurveyNumber, TransactionId,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: impl Into<String>, code: &'static str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, format!("missing required field: {name}"), "missing_field")
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        field_error(field, format!("{name} must be a valid UUID"), "invalid_uuid")
    })
}

pub(crate) fn parse_owner_id(value: String, field: FieldName) -> Result<OwnerId, Error> {
    OwnerId::new(value).map_err(|err| field_error(field, err.to_string(), "invalid_owner_id"))
}

pub(crate) fn parse_survey_number(value: String, field: FieldName) -> Result<SurveyNumber, Error> {
    SurveyNumber::new(value)
        .map_err(|err| field_error(field, err.to_string(), "invalid_survey_number"))
}

pub(crate) fn parse_area(value: u64, field: FieldName) -> Result<AreaSqFt, Error> {
    AreaSqFt::new(value).map_err(|err| field_error(field, err.to_string(), "invalid_area"))
}

pub(crate) fn parse_geo(
    latitude: f64,
    longitude: f64,
    field: FieldName,
) -> Result<GeoPoint, Error> {
    GeoPoint::new(latitude, longitude)
        .map_err(|err| field_error(field, err.to_string(), "invalid_coordinates"))
}

pub(crate) fn parse_document_kind(value: &str, field: FieldName) -> Result<DocumentKind, Error> {
    DocumentKind::parse(value).ok_or_else(|| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} is not a recognised document type"),
            "invalid_document_type",
        )
    })
}

pub(crate) fn parse_digest(value: &str, field: FieldName) -> Result<Sha256Digest, Error> {
    Sha256Digest::parse(value)
        .map_err(|err| field_error(field, err.to_string(), "invalid_digest"))
}

pub(crate) fn parse_transaction_id(
    value: &str,
    field: FieldName,
) -> Result<TransactionId, Error> {
    TransactionId::parse(value)
        .map_err(|err| field_error(field, err.to_string(), "invalid_transaction_id"))
}

pub(crate) fn parse_status_kind(
    value: &str,
    field: FieldName,
) -> Result<MutationStatusKind, Error> {
    MutationStatusKind::parse(value).ok_or_else(|| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be one of pending, approved, rejected, cancelled"),
            "invalid_status",
        )
    })
}
