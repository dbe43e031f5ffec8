//! Property registry domain service.
//!
//! Owns parcel registration and read access. Ownership transfer is not on
//! this surface: it happens exclusively inside the mutation workflow's
//! approval path, which is what keeps "owner changed" equivalent to
//! "mutation approved".

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use super::auth::Caller;
use super::error::Error;
use super::ports::{PropertyRegistryPort, PropertyRepository, PropertyStoreError};
use super::property::{Property, PropertyFilter, PropertySubmission};

/// Property registry service implementing [`PropertyRegistryPort`].
#[derive(Clone)]
pub struct PropertyRegistryService<P> {
    properties: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> PropertyRegistryService<P> {
    /// Create a new registry over the given store.
    pub fn new(properties: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { properties, clock }
    }
}

/// Map property-store failures onto domain errors.
pub(super) fn map_property_store_error(error: PropertyStoreError) -> Error {
    match error {
        PropertyStoreError::DuplicateSurveyNumber { survey_number } => {
            Error::invalid_request("survey number is already registered").with_details(json!({
                "surveyNumber": survey_number,
                "code": "duplicate_survey_number",
            }))
        }
        PropertyStoreError::NotFound { property_id } => {
            Error::not_found("property not found").with_details(json!({
                "propertyId": property_id,
            }))
        }
        PropertyStoreError::Backend { message } => {
            Error::internal(format!("property store error: {message}"))
        }
    }
}

impl<P> PropertyRegistryService<P>
where
    P: PropertyRepository,
{
    async fn load(&self, property_id: Uuid) -> Result<Property, Error> {
        self.properties
            .find_by_id(property_id)
            .await
            .map_err(map_property_store_error)?
            .ok_or_else(|| {
                Error::not_found("property not found")
                    .with_details(json!({ "propertyId": property_id }))
            })
    }
}

#[async_trait]
impl<P> PropertyRegistryPort for PropertyRegistryService<P>
where
    P: PropertyRepository,
{
    async fn register(
        &self,
        caller: &Caller,
        submission: PropertySubmission,
    ) -> Result<Property, Error> {
        if submission.address.trim().is_empty() {
            return Err(
                Error::invalid_request("address must not be empty").with_details(json!({
                    "field": "address",
                    "code": "missing_field",
                })),
            );
        }

        let property = Property::register(
            Uuid::new_v4(),
            submission,
            caller.owner_id.clone(),
            self.clock.utc(),
        );
        self.properties
            .insert(&property)
            .await
            .map_err(map_property_store_error)?;
        tracing::info!(
            property_id = %property.id,
            survey_number = %property.survey_number,
            owner_id = %property.owner_id,
            "property registered"
        );
        Ok(property)
    }

    async fn get(&self, caller: &Caller, property_id: Uuid) -> Result<Property, Error> {
        let property = self.load(property_id).await?;
        if !caller.may_act_for(&property.owner_id) {
            return Err(Error::forbidden("not authorised to view this property"));
        }
        Ok(property)
    }

    async fn list(&self, caller: &Caller, filter: PropertyFilter) -> Result<Vec<Property>, Error> {
        // Citizens only ever see their own holdings; the owner filter is a
        // registrar refinement.
        let effective = if caller.registrar {
            filter
        } else {
            PropertyFilter {
                owner_id: Some(caller.owner_id.clone()),
            }
        };
        self.properties
            .list(&effective)
            .await
            .map_err(map_property_store_error)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
