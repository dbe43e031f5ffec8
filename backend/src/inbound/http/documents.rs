//! Document upload and listing HTTP handlers.
//!
//! ```text
//! POST /api/v1/properties/{property_id}/documents
//! GET  /api/v1/properties/{property_id}/documents
//! ```
//!
//! Uploads carry the raw file bytes as the request body; the document type,
//! file name and optional description travel as query parameters. The body
//! is hashed verbatim, so what the client sends is what verification will
//! attest to.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Document;
use crate::domain::ports::DocumentUpload;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_document_kind, parse_uuid, require,
};

/// Query parameters accompanying a document upload.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadQuery {
    /// Document category, e.g. `sale_deed`.
    pub document_type: Option<String>,
    /// Original file name.
    pub file_name: Option<String>,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// Response payload for a stored document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    /// Document identifier.
    pub id: String,
    /// Owning property identifier.
    pub property_id: String,
    /// Document category.
    pub document_type: String,
    /// Original file name.
    pub file_name: String,
    /// Free-text description, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// SHA-256 content hash (lowercase hex).
    pub content_hash: String,
    /// Upload size in bytes.
    pub size_bytes: u64,
    /// Upload timestamp (RFC 3339).
    pub uploaded_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id.to_string(),
            property_id: document.property_id.to_string(),
            document_type: document.kind.to_string(),
            file_name: document.file_name,
            description: document.description,
            content_hash: document.content_hash.to_string(),
            size_bytes: document.size_bytes,
            uploaded_at: document.uploaded_at.to_rfc3339(),
        }
    }
}

/// Upload a document for a property.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{property_id}/documents",
    params(
        ("property_id" = String, Path, description = "Property identifier"),
        DocumentUploadQuery
    ),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "uploadDocument"
)]
#[post("/properties/{property_id}/documents")]
pub async fn upload_document(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
    query: web::Query<DocumentUploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let property_id = parse_uuid(&path.into_inner(), FieldName::new("propertyId"))?;
    let query = query.into_inner();
    let document_type = require(query.document_type, FieldName::new("documentType"))?;
    let file_name = require(query.file_name, FieldName::new("fileName"))?;

    let upload = DocumentUpload {
        property_id,
        kind: parse_document_kind(&document_type, FieldName::new("documentType"))?,
        file_name,
        description: query.description,
        bytes: body.to_vec(),
    };
    let document = state.documents.upload(&identity.0, upload).await?;
    Ok(HttpResponse::Created().json(DocumentResponse::from(document)))
}

/// List a property's documents in upload order.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}/documents",
    params(
        ("property_id" = String, Path, description = "Property identifier")
    ),
    responses(
        (status = 200, description = "Documents", body = [DocumentResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "listDocuments"
)]
#[get("/properties/{property_id}/documents")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<DocumentResponse>>> {
    let property_id = parse_uuid(&path.into_inner(), FieldName::new("propertyId"))?;
    let documents = state
        .documents
        .list_for_property(&identity.0, property_id)
        .await?;
    Ok(web::Json(
        documents.into_iter().map(DocumentResponse::from).collect(),
    ))
}
