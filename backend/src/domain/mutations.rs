//! Mutation workflow domain service.
//!
//! Implements the transfer desk: requests are recorded `pending`, reviewed
//! by a registrar, and resolved exactly once. The store's resolution
//! methods are atomic (see [`MutationRepository`]); this service owns
//! validation, authorization, fee assessment and attestation, and maps
//! store failures onto the domain error taxonomy. Nothing here retries:
//! a lost race is surfaced as `conflict` for the caller to re-decide.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use uuid::Uuid;

use super::auth::Caller;
use super::error::Error;
use super::fees::{FeeBreakdown, FeePolicy};
use super::mutation::{
    ApprovalRecord, CancellationRecord, Mutation, MutationFilter, MutationStatus, RegistryNumber,
    RejectionRecord, TransactionId, TransferReason,
};
use super::ports::{
    MutationRepository, MutationStoreError, MutationWorkflowPort, PropertyRepository,
    TransferRequest,
};
use super::property::Property;
use super::registry::map_property_store_error;

const TRANSACTION_ID_ATTEMPTS: u32 = 5;

/// Mutation workflow service implementing [`MutationWorkflowPort`].
#[derive(Clone)]
pub struct MutationWorkflowService<M, P> {
    mutations: Arc<M>,
    properties: Arc<P>,
    clock: Arc<dyn Clock>,
    fees: FeePolicy,
}

impl<M, P> MutationWorkflowService<M, P> {
    /// Create a new workflow over the given stores and fee policy.
    pub fn new(
        mutations: Arc<M>,
        properties: Arc<P>,
        clock: Arc<dyn Clock>,
        fees: FeePolicy,
    ) -> Self {
        Self {
            mutations,
            properties,
            clock,
            fees,
        }
    }
}

fn map_mutation_store_error(error: MutationStoreError) -> Error {
    match error {
        MutationStoreError::NotFound { mutation_id } => {
            Error::not_found("mutation not found").with_details(json!({
                "mutationId": mutation_id,
            }))
        }
        MutationStoreError::AlreadyResolved {
            mutation_id,
            status,
        } => Error::invalid_state(format!("mutation is already {status}")).with_details(json!({
            "mutationId": mutation_id,
            "status": status.as_str(),
        })),
        MutationStoreError::OwnershipChanged {
            property_id,
            current_owner,
        } => Error::conflict("property ownership changed since the request was made")
            .with_details(json!({
                "propertyId": property_id,
                "currentOwner": current_owner,
                "code": "ownership_changed",
            })),
        MutationStoreError::PropertyMissing { property_id } => Error::internal(format!(
            "property {property_id} referenced by the mutation is missing"
        )),
        MutationStoreError::DuplicateTransactionId { transaction_id } => Error::internal(format!(
            "unexpected transaction id collision: {transaction_id}"
        )),
        MutationStoreError::Backend { message } => {
            Error::internal(format!("mutation store error: {message}"))
        }
    }
}

impl<M, P> MutationWorkflowService<M, P>
where
    M: MutationRepository,
    P: PropertyRepository,
{
    async fn load_property(&self, property_id: Uuid) -> Result<Property, Error> {
        self.properties
            .find_by_id(property_id)
            .await
            .map_err(map_property_store_error)?
            .ok_or_else(|| {
                Error::not_found("property not found")
                    .with_details(json!({ "propertyId": property_id }))
            })
    }

    async fn load_mutation(&self, mutation_id: Uuid) -> Result<Mutation, Error> {
        self.mutations
            .find_by_id(mutation_id)
            .await
            .map_err(map_mutation_store_error)?
            .ok_or_else(|| {
                Error::not_found("mutation not found")
                    .with_details(json!({ "mutationId": mutation_id }))
            })
    }

    fn require_registrar(caller: &Caller, action: &str) -> Result<(), Error> {
        if caller.registrar {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "only a registrar may {action} a mutation"
            )))
        }
    }

    fn validate_reason(reason: &TransferReason) -> Result<(), Error> {
        if let TransferReason::Other(text) = reason {
            if text.trim().is_empty() {
                return Err(Error::invalid_request("transfer reason must not be empty")
                    .with_details(json!({ "field": "reason", "code": "missing_field" })));
            }
        }
        Ok(())
    }

    /// Record the request, retrying the randomly drawn transaction id on the
    /// unlikely collision.
    async fn insert_with_fresh_transaction_id(
        &self,
        mut mutation: Mutation,
    ) -> Result<Mutation, Error> {
        let mut rng = SmallRng::from_entropy();
        for _ in 0..TRANSACTION_ID_ATTEMPTS {
            mutation.transaction_id = TransactionId::from_serial(rng.gen_range(0..100_000));
            match self.mutations.insert(&mutation).await {
                Ok(()) => return Ok(mutation),
                Err(MutationStoreError::DuplicateTransactionId { .. }) => {}
                Err(err) => return Err(map_mutation_store_error(err)),
            }
        }
        Err(Error::internal(
            "could not allocate a unique transaction id",
        ))
    }
}

#[async_trait]
impl<M, P> MutationWorkflowPort for MutationWorkflowService<M, P>
where
    M: MutationRepository,
    P: PropertyRepository,
{
    async fn create(&self, caller: &Caller, request: TransferRequest) -> Result<Mutation, Error> {
        Self::validate_reason(&request.reason)?;
        let property = self.load_property(request.property_id).await?;
        if !caller.may_act_for(&property.owner_id) {
            return Err(Error::forbidden(
                "not authorised to request a transfer of this property",
            ));
        }
        if request.new_owner_id == property.owner_id {
            return Err(
                Error::invalid_request("new owner already holds this property").with_details(
                    json!({ "field": "newOwnerId", "code": "no_op_transfer" }),
                ),
            );
        }

        // Capture the owner as of this instant; approval is predicated on
        // it even if it later turns out to be stale.
        let mutation = Mutation {
            id: Uuid::new_v4(),
            transaction_id: TransactionId::from_serial(0),
            property_id: property.id,
            previous_owner_id: property.owner_id.clone(),
            new_owner_id: request.new_owner_id,
            reason: request.reason,
            created_at: self.clock.utc(),
            status: MutationStatus::Pending,
        };
        let mutation = self.insert_with_fresh_transaction_id(mutation).await?;
        tracing::info!(
            mutation_id = %mutation.id,
            transaction_id = %mutation.transaction_id,
            property_id = %mutation.property_id,
            "transfer request recorded"
        );
        Ok(mutation)
    }

    async fn get(&self, caller: &Caller, mutation_id: Uuid) -> Result<Mutation, Error> {
        let mutation = self.load_mutation(mutation_id).await?;
        let participant = caller.may_act_for(&mutation.previous_owner_id)
            || caller.may_act_for(&mutation.new_owner_id);
        if !participant {
            return Err(Error::forbidden("not authorised to view this mutation"));
        }
        Ok(mutation)
    }

    async fn list(&self, caller: &Caller, filter: MutationFilter) -> Result<Vec<Mutation>, Error> {
        let effective = if caller.registrar {
            filter
        } else {
            MutationFilter {
                participant: Some(caller.owner_id.clone()),
                ..filter
            }
        };
        self.mutations
            .list(&effective)
            .await
            .map_err(map_mutation_store_error)
    }

    async fn approve(
        &self,
        caller: &Caller,
        mutation_id: Uuid,
        fees: Option<FeeBreakdown>,
    ) -> Result<Mutation, Error> {
        Self::require_registrar(caller, "approve")?;
        let mutation = self.load_mutation(mutation_id).await?;
        if !mutation.is_pending() {
            return Err(map_mutation_store_error(
                MutationStoreError::AlreadyResolved {
                    mutation_id,
                    status: mutation.status_kind(),
                },
            ));
        }

        // Fees may be supplied by the registrar; otherwise derive them from
        // the configured schedule. Area is immutable, so reading it outside
        // the critical section is safe.
        let property = self.load_property(mutation.property_id).await?;
        let assessed = fees.unwrap_or_else(|| self.fees.assess(property.area_sqft));

        let now = self.clock.utc();
        let mut rng = SmallRng::from_entropy();
        let record = ApprovalRecord {
            review_date: now,
            approved_date: now,
            stamp_duty_inr: assessed.stamp_duty_inr,
            registration_fee_inr: assessed.registration_fee_inr,
            verification_hash: mutation.verification_digest(),
            registry_number: RegistryNumber::from_serial(rng.gen_range(0..100_000), now.year()),
        };

        let approved = self
            .mutations
            .approve(mutation_id, record)
            .await
            .map_err(map_mutation_store_error)?;
        tracing::info!(
            mutation_id = %approved.id,
            transaction_id = %approved.transaction_id,
            property_id = %approved.property_id,
            new_owner_id = %approved.new_owner_id,
            "transfer approved, ownership moved"
        );
        Ok(approved)
    }

    async fn reject(
        &self,
        caller: &Caller,
        mutation_id: Uuid,
        reason: String,
    ) -> Result<Mutation, Error> {
        Self::require_registrar(caller, "reject")?;
        if reason.trim().is_empty() {
            return Err(Error::invalid_request("rejection reason must not be empty")
                .with_details(json!({ "field": "reason", "code": "missing_field" })));
        }

        let now = self.clock.utc();
        let record = RejectionRecord {
            review_date: now,
            rejected_date: now,
            reason,
        };
        let rejected = self
            .mutations
            .reject(mutation_id, record)
            .await
            .map_err(map_mutation_store_error)?;
        tracing::info!(
            mutation_id = %rejected.id,
            transaction_id = %rejected.transaction_id,
            "transfer rejected, property untouched"
        );
        Ok(rejected)
    }

    async fn cancel(&self, caller: &Caller, mutation_id: Uuid) -> Result<Mutation, Error> {
        let mutation = self.load_mutation(mutation_id).await?;
        if !caller.may_act_for(&mutation.previous_owner_id) {
            return Err(Error::forbidden(
                "only the requesting owner may withdraw a mutation",
            ));
        }

        let record = CancellationRecord {
            cancelled_date: self.clock.utc(),
        };
        let cancelled = self
            .mutations
            .cancel(mutation_id, record)
            .await
            .map_err(map_mutation_store_error)?;
        tracing::info!(
            mutation_id = %cancelled.id,
            transaction_id = %cancelled.transaction_id,
            "transfer request withdrawn"
        );
        Ok(cancelled)
    }
}

#[cfg(test)]
#[path = "mutations_tests.rs"]
mod tests;
