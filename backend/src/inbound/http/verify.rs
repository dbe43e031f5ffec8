//! Public record-verification HTTP handlers.
//!
//! ```text
//! GET /api/v1/verify/property?survey_number=45/2
//! GET /api/v1/verify/document?hash=<sha256 hex>
//! GET /api/v1/verify/transaction?id=MUT-00042
//! ```
//!
//! These endpoints take no bearer token: anyone holding a survey number,
//! content hash or transaction id may confirm the corresponding record
//! exists. Lookups are audited, never mutating.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::documents::DocumentResponse;
use crate::inbound::http::mutations::MutationResponse;
use crate::inbound::http::properties::PropertyResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_digest, parse_survey_number, parse_transaction_id, require,
};

/// Query parameters for property verification.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPropertyQuery {
    /// Survey/khasra number to look up.
    pub survey_number: Option<String>,
}

/// Query parameters for document verification.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDocumentQuery {
    /// Full SHA-256 content hash (64 hex characters).
    pub hash: Option<String>,
}

/// Query parameters for transaction verification.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTransactionQuery {
    /// Transaction id, e.g. `MUT-00042` (case-insensitive).
    pub id: Option<String>,
}

/// Confirm a property record by survey number.
#[utoipa::path(
    get,
    path = "/api/v1/verify/property",
    params(VerifyPropertyQuery),
    security([]),
    responses(
        (status = 200, description = "Matching property", body = PropertyResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No matching record", body = ErrorSchema)
    ),
    tags = ["verification"],
    operation_id = "verifyProperty"
)]
#[get("/verify/property")]
pub async fn verify_property(
    state: web::Data<HttpState>,
    query: web::Query<VerifyPropertyQuery>,
) -> ApiResult<web::Json<PropertyResponse>> {
    let raw = require(query.into_inner().survey_number, FieldName::new("surveyNumber"))?;
    let survey_number = parse_survey_number(raw, FieldName::new("surveyNumber"))?;
    let property = state.verification.verify_property(&survey_number).await?;
    Ok(web::Json(PropertyResponse::from(property)))
}

/// Confirm a document by exact content hash.
#[utoipa::path(
    get,
    path = "/api/v1/verify/document",
    params(VerifyDocumentQuery),
    security([]),
    responses(
        (status = 200, description = "Matching document", body = DocumentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No matching record", body = ErrorSchema)
    ),
    tags = ["verification"],
    operation_id = "verifyDocument"
)]
#[get("/verify/document")]
pub async fn verify_document(
    state: web::Data<HttpState>,
    query: web::Query<VerifyDocumentQuery>,
) -> ApiResult<web::Json<DocumentResponse>> {
    let raw = require(query.into_inner().hash, FieldName::new("hash"))?;
    let hash = parse_digest(&raw, FieldName::new("hash"))?;
    let document = state.verification.verify_document(&hash).await?;
    Ok(web::Json(DocumentResponse::from(document)))
}

/// Confirm a transfer by transaction id.
#[utoipa::path(
    get,
    path = "/api/v1/verify/transaction",
    params(VerifyTransactionQuery),
    security([]),
    responses(
        (status = 200, description = "Matching mutation", body = MutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No matching record", body = ErrorSchema)
    ),
    tags = ["verification"],
    operation_id = "verifyTransaction"
)]
#[get("/verify/transaction")]
pub async fn verify_transaction(
    state: web::Data<HttpState>,
    query: web::Query<VerifyTransactionQuery>,
) -> ApiResult<web::Json<MutationResponse>> {
    let raw = require(query.into_inner().id, FieldName::new("id"))?;
    let transaction_id = parse_transaction_id(&raw, FieldName::new("id"))?;
    let mutation = state
        .verification
        .verify_transaction(&transaction_id)
        .await?;
    Ok(web::Json(MutationResponse::from(mutation)))
}
