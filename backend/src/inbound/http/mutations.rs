//! Mutation workflow HTTP handlers.
//!
//! ```text
//! POST   /api/v1/mutations
//! GET    /api/v1/mutations
//! GET    /api/v1/mutations/{mutation_id}
//! POST   /api/v1/mutations/{mutation_id}/approve
//! POST   /api/v1/mutations/{mutation_id}/reject
//! DELETE /api/v1/mutations/{mutation_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    FeeBreakdown, Mutation, MutationFilter, MutationStatus, TransferReason,
};
use crate::domain::ports::TransferRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_owner_id, parse_status_kind, parse_uuid, require,
};

/// Request payload for creating a transfer request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationRequest {
    /// Parcel to transfer.
    pub property_id: Option<String>,
    /// Proposed new owner.
    pub new_owner_id: Option<String>,
    /// Reason for the transfer; a recognised category or free text.
    pub reason: Option<String>,
}

/// Optional explicit fees supplied on approval.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeesRequest {
    /// Stamp duty in INR.
    pub stamp_duty_inr: u64,
    /// Registration fee in INR.
    pub registration_fee_inr: u64,
}

/// Request payload for approving a mutation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    /// Explicit fee figures; derived from the fee schedule when absent.
    pub fees: Option<FeesRequest>,
}

/// Request payload for rejecting a mutation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    /// Grounds for the rejection.
    pub reason: Option<String>,
}

/// Query parameters accepted by the mutation listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MutationListQuery {
    /// Restrict to one status (`pending`, `approved`, `rejected`,
    /// `cancelled`). Cancelled records only appear when asked for.
    pub status: Option<String>,
    /// Restrict to transfers of one parcel.
    pub property_id: Option<String>,
}

/// Response payload for a mutation.
///
/// The per-status fields mirror the tagged domain record: approval fees and
/// attestation only exist on approved transfers, the rejection reason only
/// on rejected ones.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    /// Mutation identifier.
    pub id: String,
    /// Human-readable transaction id (`MUT-NNNNN`).
    pub transaction_id: String,
    /// Parcel under transfer.
    pub property_id: String,
    /// Owner on record when the request was created.
    pub previous_owner_id: String,
    /// Proposed new owner.
    pub new_owner_id: String,
    /// Stated reason.
    pub reason: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Lifecycle status.
    pub status: String,
    /// Review start timestamp, once resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<String>,
    /// Approval timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<String>,
    /// Rejection timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_date: Option<String>,
    /// Withdrawal timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_date: Option<String>,
    /// Stamp duty in INR, on approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp_duty_inr: Option<u64>,
    /// Registration fee in INR, on approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_fee_inr: Option<u64>,
    /// Tamper-evidence digest, on approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_hash: Option<String>,
    /// External e-registry reference, on approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_number: Option<String>,
    /// Registrar's grounds, on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl From<Mutation> for MutationResponse {
    fn from(mutation: Mutation) -> Self {
        let mut response = Self {
            id: mutation.id.to_string(),
            transaction_id: mutation.transaction_id.to_string(),
            property_id: mutation.property_id.to_string(),
            previous_owner_id: mutation.previous_owner_id.to_string(),
            new_owner_id: mutation.new_owner_id.to_string(),
            reason: mutation.reason.to_string(),
            created_at: mutation.created_at.to_rfc3339(),
            status: mutation.status_kind().to_string(),
            review_date: None,
            approved_date: None,
            rejected_date: None,
            cancelled_date: None,
            stamp_duty_inr: None,
            registration_fee_inr: None,
            verification_hash: None,
            registry_number: None,
            rejection_reason: None,
        };
        match mutation.status {
            MutationStatus::Pending => {}
            MutationStatus::Approved(record) => {
                response.review_date = Some(record.review_date.to_rfc3339());
                response.approved_date = Some(record.approved_date.to_rfc3339());
                response.stamp_duty_inr = Some(record.stamp_duty_inr);
                response.registration_fee_inr = Some(record.registration_fee_inr);
                response.verification_hash = Some(record.verification_hash.to_string());
                response.registry_number = Some(record.registry_number.to_string());
            }
            MutationStatus::Rejected(record) => {
                response.review_date = Some(record.review_date.to_rfc3339());
                response.rejected_date = Some(record.rejected_date.to_rfc3339());
                response.rejection_reason = Some(record.reason);
            }
            MutationStatus::Cancelled(record) => {
                response.cancelled_date = Some(record.cancelled_date.to_rfc3339());
            }
        }
        response
    }
}

fn parse_transfer(payload: MutationRequest) -> Result<TransferRequest, crate::domain::Error> {
    let property_id = require(payload.property_id, FieldName::new("propertyId"))?;
    let new_owner_id = require(payload.new_owner_id, FieldName::new("newOwnerId"))?;
    let reason = require(payload.reason, FieldName::new("reason"))?;

    Ok(TransferRequest {
        property_id: parse_uuid(&property_id, FieldName::new("propertyId"))?,
        new_owner_id: parse_owner_id(new_owner_id, FieldName::new("newOwnerId"))?,
        reason: TransferReason::from(reason),
    })
}

/// Create a transfer request for a property the caller controls.
#[utoipa::path(
    post,
    path = "/api/v1/mutations",
    request_body = MutationRequest,
    responses(
        (status = 201, description = "Transfer request recorded", body = MutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["mutations"],
    operation_id = "createMutation"
)]
#[post("/mutations")]
pub async fn create_mutation(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<MutationRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_transfer(payload.into_inner())?;
    let mutation = state.mutations.create(&identity.0, request).await?;
    Ok(HttpResponse::Created().json(MutationResponse::from(mutation)))
}

/// List mutations visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/mutations",
    params(MutationListQuery),
    responses(
        (status = 200, description = "Mutations", body = [MutationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["mutations"],
    operation_id = "listMutations"
)]
#[get("/mutations")]
pub async fn list_mutations(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<MutationListQuery>,
) -> ApiResult<web::Json<Vec<MutationResponse>>> {
    let query = query.into_inner();
    let filter = MutationFilter {
        status: query
            .status
            .map(|raw| parse_status_kind(&raw, FieldName::new("status")))
            .transpose()?,
        property_id: query
            .property_id
            .map(|raw| parse_uuid(&raw, FieldName::new("propertyId")))
            .transpose()?,
        participant: None,
    };
    let mutations = state.mutations.list(&identity.0, filter).await?;
    Ok(web::Json(
        mutations.into_iter().map(MutationResponse::from).collect(),
    ))
}

/// Fetch one mutation by id.
#[utoipa::path(
    get,
    path = "/api/v1/mutations/{mutation_id}",
    params(
        ("mutation_id" = String, Path, description = "Mutation identifier")
    ),
    responses(
        (status = 200, description = "Mutation", body = MutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["mutations"],
    operation_id = "getMutation"
)]
#[get("/mutations/{mutation_id}")]
pub async fn get_mutation(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MutationResponse>> {
    let mutation_id = parse_uuid(&path.into_inner(), FieldName::new("mutationId"))?;
    let mutation = state.mutations.get(&identity.0, mutation_id).await?;
    Ok(web::Json(MutationResponse::from(mutation)))
}

/// Approve a pending mutation (registrar only).
#[utoipa::path(
    post,
    path = "/api/v1/mutations/{mutation_id}/approve",
    request_body = ApproveRequest,
    params(
        ("mutation_id" = String, Path, description = "Mutation identifier")
    ),
    responses(
        (status = 200, description = "Transfer approved", body = MutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already resolved or ownership changed", body = ErrorSchema)
    ),
    tags = ["mutations"],
    operation_id = "approveMutation"
)]
#[post("/mutations/{mutation_id}/approve")]
pub async fn approve_mutation(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
    payload: Option<web::Json<ApproveRequest>>,
) -> ApiResult<web::Json<MutationResponse>> {
    let mutation_id = parse_uuid(&path.into_inner(), FieldName::new("mutationId"))?;
    let fees = payload
        .map(web::Json::into_inner)
        .unwrap_or_default()
        .fees
        .map(|fees| FeeBreakdown {
            stamp_duty_inr: fees.stamp_duty_inr,
            registration_fee_inr: fees.registration_fee_inr,
        });
    let mutation = state
        .mutations
        .approve(&identity.0, mutation_id, fees)
        .await?;
    Ok(web::Json(MutationResponse::from(mutation)))
}

/// Reject a pending mutation (registrar only).
#[utoipa::path(
    post,
    path = "/api/v1/mutations/{mutation_id}/reject",
    request_body = RejectRequest,
    params(
        ("mutation_id" = String, Path, description = "Mutation identifier")
    ),
    responses(
        (status = 200, description = "Transfer rejected", body = MutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already resolved", body = ErrorSchema)
    ),
    tags = ["mutations"],
    operation_id = "rejectMutation"
)]
#[post("/mutations/{mutation_id}/reject")]
pub async fn reject_mutation(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
    payload: web::Json<RejectRequest>,
) -> ApiResult<web::Json<MutationResponse>> {
    let mutation_id = parse_uuid(&path.into_inner(), FieldName::new("mutationId"))?;
    let reason = require(payload.into_inner().reason, FieldName::new("reason"))?;
    let mutation = state
        .mutations
        .reject(&identity.0, mutation_id, reason)
        .await?;
    Ok(web::Json(MutationResponse::from(mutation)))
}

/// Withdraw a pending mutation.
#[utoipa::path(
    delete,
    path = "/api/v1/mutations/{mutation_id}",
    params(
        ("mutation_id" = String, Path, description = "Mutation identifier")
    ),
    responses(
        (status = 200, description = "Request withdrawn", body = MutationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already resolved", body = ErrorSchema)
    ),
    tags = ["mutations"],
    operation_id = "cancelMutation"
)]
#[delete("/mutations/{mutation_id}")]
pub async fn cancel_mutation(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MutationResponse>> {
    let mutation_id = parse_uuid(&path.into_inner(), FieldName::new("mutationId"))?;
    let mutation = state.mutations.cancel(&identity.0, mutation_id).await?;
    Ok(web::Json(MutationResponse::from(mutation)))
}
