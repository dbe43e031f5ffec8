//! Property registry HTTP handlers.
//!
//! ```text
//! POST /api/v1/properties
//! GET  /api/v1/properties
//! GET  /api/v1/properties/{property_id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{GeoPoint, Property, PropertyFilter, PropertySubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_area, parse_geo, parse_owner_id, parse_survey_number, parse_uuid, require,
};

/// Request payload for registering a property.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    /// Jurisdictional survey/khasra number, e.g. `45/2`.
    pub survey_number: Option<String>,
    /// Postal address of the parcel.
    pub address: Option<String>,
    /// Parcel area in square feet; must be positive.
    pub area_sqft: Option<u64>,
    /// Optional centroid coordinates.
    pub geo: Option<GeoRequest>,
}

/// Coordinate pair carried in registration payloads.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoRequest {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Query parameters accepted by the property listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListQuery {
    /// Restrict results to one owner (registrars only; citizens are always
    /// scoped to themselves).
    pub owner_id: Option<String>,
}

/// Response payload for a property.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    /// Property identifier.
    pub id: String,
    /// Survey/khasra number.
    pub survey_number: String,
    /// Postal address.
    pub address: String,
    /// Area in square feet.
    pub area_sqft: u64,
    /// Centroid coordinates, when registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoRequest>,
    /// Current owner reference.
    pub owner_id: String,
    /// Content hash of the latest title document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_document_hash: Option<String>,
    /// Registration timestamp (RFC 3339).
    pub created_at: String,
    /// Last change timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        Self {
            id: property.id.to_string(),
            survey_number: property.survey_number.to_string(),
            address: property.address,
            area_sqft: property.area_sqft.get(),
            geo: property.geo.map(|geo| GeoRequest {
                latitude: geo.latitude,
                longitude: geo.longitude,
            }),
            owner_id: property.owner_id.to_string(),
            title_document_hash: property.title_document_hash.map(|hash| hash.to_string()),
            created_at: property.created_at.to_rfc3339(),
            updated_at: property.updated_at.to_rfc3339(),
        }
    }
}

fn parse_submission(payload: PropertyRequest) -> Result<PropertySubmission, crate::domain::Error> {
    let survey_number = require(payload.survey_number, FieldName::new("surveyNumber"))?;
    let address = require(payload.address, FieldName::new("address"))?;
    let area_sqft = require(payload.area_sqft, FieldName::new("areaSqft"))?;
    let geo: Option<GeoPoint> = payload
        .geo
        .map(|geo| parse_geo(geo.latitude, geo.longitude, FieldName::new("geo")))
        .transpose()?;

    Ok(PropertySubmission {
        survey_number: parse_survey_number(survey_number, FieldName::new("surveyNumber"))?,
        address,
        area_sqft: parse_area(area_sqft, FieldName::new("areaSqft"))?,
        geo,
    })
}

/// Register a new property owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = PropertyRequest,
    responses(
        (status = 201, description = "Property registered", body = PropertyResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "registerProperty"
)]
#[post("/properties")]
pub async fn register_property(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<PropertyRequest>,
) -> ApiResult<HttpResponse> {
    let submission = parse_submission(payload.into_inner())?;
    let property = state.properties.register(&identity.0, submission).await?;
    Ok(HttpResponse::Created().json(PropertyResponse::from(property)))
}

/// List properties visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    params(PropertyListQuery),
    responses(
        (status = 200, description = "Properties", body = [PropertyResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "listProperties"
)]
#[get("/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<PropertyListQuery>,
) -> ApiResult<web::Json<Vec<PropertyResponse>>> {
    let filter = PropertyFilter {
        owner_id: query
            .into_inner()
            .owner_id
            .map(|raw| parse_owner_id(raw, FieldName::new("ownerId")))
            .transpose()?,
    };
    let properties = state.properties.list(&identity.0, filter).await?;
    Ok(web::Json(
        properties.into_iter().map(PropertyResponse::from).collect(),
    ))
}

/// Fetch one property by id.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{property_id}",
    params(
        ("property_id" = String, Path, description = "Property identifier")
    ),
    responses(
        (status = 200, description = "Property", body = PropertyResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "getProperty"
)]
#[get("/properties/{property_id}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<PropertyResponse>> {
    let property_id = parse_uuid(&path.into_inner(), FieldName::new("propertyId"))?;
    let property = state.properties.get(&identity.0, property_id).await?;
    Ok(web::Json(PropertyResponse::from(property)))
}
