//! In-memory record store.
//!
//! The single owner of mutable state (no ambient globals): one store
//! instance is built at startup and shared with every service. All three
//! tables sit behind a single `tokio::sync::RwLock`, so mutating
//! operations serialise and reads run concurrently. The mutation
//! resolution methods do their pending-status check, the owner
//! compare-and-swap and the status transition inside one write-guard
//! critical section. That is the whole concurrency story the workflow
//! relies on: of two racing approvals, exactly one commits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{
    DocumentRepository, DocumentStoreError, MutationRepository, MutationStoreError,
    PropertyRepository, PropertyStoreError,
};
use crate::domain::{
    ApprovalRecord, CancellationRecord, Document, Mutation, MutationFilter, Property,
    PropertyFilter, RejectionRecord, Sha256Digest, SurveyNumber, TransactionId,
};

#[derive(Default)]
struct Tables {
    properties: Vec<Property>,
    documents: Vec<Document>,
    mutations: Vec<Mutation>,
}

impl Tables {
    fn property_mut(&mut self, property_id: Uuid) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.id == property_id)
    }

    fn mutation_mut(&mut self, mutation_id: Uuid) -> Option<&mut Mutation> {
        self.mutations.iter_mut().find(|m| m.id == mutation_id)
    }
}

/// Shared in-memory store implementing all three persistence ports.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyRepository for MemoryStore {
    async fn insert(&self, property: &Property) -> Result<(), PropertyStoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .properties
            .iter()
            .any(|existing| existing.survey_number == property.survey_number)
        {
            return Err(PropertyStoreError::duplicate_survey(
                property.survey_number.as_str(),
            ));
        }
        tables.properties.push(property.clone());
        Ok(())
    }

    async fn find_by_id(&self, property_id: Uuid) -> Result<Option<Property>, PropertyStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .properties
            .iter()
            .find(|p| p.id == property_id)
            .cloned())
    }

    async fn find_by_survey(
        &self,
        survey_number: &SurveyNumber,
    ) -> Result<Option<Property>, PropertyStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .properties
            .iter()
            .find(|p| p.survey_number == *survey_number)
            .cloned())
    }

    async fn list(&self, filter: &PropertyFilter) -> Result<Vec<Property>, PropertyStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .properties
            .iter()
            .filter(|p| {
                filter
                    .owner_id
                    .as_ref()
                    .is_none_or(|owner| p.owner_id == *owner)
            })
            .cloned()
            .collect())
    }

    async fn set_title_document(
        &self,
        property_id: Uuid,
        hash: &Sha256Digest,
        at: DateTime<Utc>,
    ) -> Result<(), PropertyStoreError> {
        let mut tables = self.tables.write().await;
        let property = tables
            .property_mut(property_id)
            .ok_or(PropertyStoreError::NotFound { property_id })?;
        *property = property.clone().with_title_document(hash.clone(), at);
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn insert(&self, document: &Document) -> Result<(), DocumentStoreError> {
        let mut tables = self.tables.write().await;
        tables.documents.push(document.clone());
        Ok(())
    }

    async fn list_by_property(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .filter(|d| d.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn find_by_hash(
        &self,
        hash: &Sha256Digest,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.content_hash == *hash)
            .cloned())
    }
}

#[async_trait]
impl MutationRepository for MemoryStore {
    async fn insert(&self, mutation: &Mutation) -> Result<(), MutationStoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .mutations
            .iter()
            .any(|existing| existing.transaction_id == mutation.transaction_id)
        {
            return Err(MutationStoreError::DuplicateTransactionId {
                transaction_id: mutation.transaction_id.as_str().to_owned(),
            });
        }
        tables.mutations.push(mutation.clone());
        Ok(())
    }

    async fn find_by_id(&self, mutation_id: Uuid) -> Result<Option<Mutation>, MutationStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .mutations
            .iter()
            .find(|m| m.id == mutation_id)
            .cloned())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Mutation>, MutationStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .mutations
            .iter()
            .find(|m| m.transaction_id == *transaction_id)
            .cloned())
    }

    async fn list(&self, filter: &MutationFilter) -> Result<Vec<Mutation>, MutationStoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Mutation> = tables
            .mutations
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        // Stable sort: ties on created_at keep insertion order.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn approve(
        &self,
        mutation_id: Uuid,
        record: ApprovalRecord,
    ) -> Result<Mutation, MutationStoreError> {
        let mut tables = self.tables.write().await;

        let mutation = tables
            .mutations
            .iter()
            .find(|m| m.id == mutation_id)
            .cloned()
            .ok_or(MutationStoreError::NotFound { mutation_id })?;
        if !mutation.is_pending() {
            return Err(MutationStoreError::AlreadyResolved {
                mutation_id,
                status: mutation.status_kind(),
            });
        }

        let property = tables
            .properties
            .iter()
            .find(|p| p.id == mutation.property_id)
            .cloned()
            .ok_or(MutationStoreError::PropertyMissing {
                property_id: mutation.property_id,
            })?;

        // Owner compare-and-swap against the owner captured at creation
        // time. A mismatch means another approval moved the parcel first.
        let moved = property
            .transfer_to(
                &mutation.previous_owner_id,
                mutation.new_owner_id.clone(),
                record.approved_date,
            )
            .map_err(|err| MutationStoreError::OwnershipChanged {
                property_id: mutation.property_id,
                current_owner: err.current.to_string(),
            })?;
        let approved =
            mutation
                .approve(record)
                .map_err(|err| MutationStoreError::AlreadyResolved {
                    mutation_id,
                    status: err.current,
                })?;

        // Both checks passed under the write guard; commit the pair.
        if let Some(slot) = tables.property_mut(moved.id) {
            *slot = moved;
        }
        if let Some(slot) = tables.mutation_mut(mutation_id) {
            *slot = approved.clone();
        }
        Ok(approved)
    }

    async fn reject(
        &self,
        mutation_id: Uuid,
        record: RejectionRecord,
    ) -> Result<Mutation, MutationStoreError> {
        self.resolve(mutation_id, move |mutation| mutation.reject(record))
            .await
    }

    async fn cancel(
        &self,
        mutation_id: Uuid,
        record: CancellationRecord,
    ) -> Result<Mutation, MutationStoreError> {
        self.resolve(mutation_id, move |mutation| mutation.cancel(record))
            .await
    }
}

impl MemoryStore {
    /// Apply a single-record terminal transition under the write guard.
    async fn resolve<F>(&self, mutation_id: Uuid, apply: F) -> Result<Mutation, MutationStoreError>
    where
        F: FnOnce(
            Mutation,
        )
            -> Result<Mutation, crate::domain::mutation::InvalidTransitionError>,
    {
        let mut tables = self.tables.write().await;
        let mutation = tables
            .mutations
            .iter()
            .find(|m| m.id == mutation_id)
            .cloned()
            .ok_or(MutationStoreError::NotFound { mutation_id })?;
        let resolved = apply(mutation).map_err(|err| MutationStoreError::AlreadyResolved {
            mutation_id,
            status: err.current,
        })?;
        if let Some(slot) = tables.mutation_mut(mutation_id) {
            *slot = resolved.clone();
        }
        Ok(resolved)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
