//! Public record verification.
//!
//! Pure read side composed from the other three components. Lookups never
//! mutate anything; each one emits an audit event through the [`AuditLog`]
//! port so the office can see what the public is checking.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::document::Document;
use super::error::Error;
use super::hash::Sha256Digest;
use super::mutation::{Mutation, TransactionId};
use super::ports::{
    AuditEvent, AuditLog, DocumentRepository, MutationRepository, PropertyRepository,
    VerificationPort,
};
use super::property::{Property, SurveyNumber};
use super::registry::map_property_store_error;

/// Verification service implementing [`VerificationPort`].
#[derive(Clone)]
pub struct VerificationService<P, D, M, A> {
    properties: Arc<P>,
    documents: Arc<D>,
    mutations: Arc<M>,
    audit: Arc<A>,
}

impl<P, D, M, A> VerificationService<P, D, M, A> {
    /// Create a new verification surface over the given stores.
    pub fn new(properties: Arc<P>, documents: Arc<D>, mutations: Arc<M>, audit: Arc<A>) -> Self {
        Self {
            properties,
            documents,
            mutations,
            audit,
        }
    }
}

impl<P, D, M, A> VerificationService<P, D, M, A>
where
    A: AuditLog,
{
    async fn audited<T>(
        &self,
        action: &'static str,
        subject: String,
        outcome: Result<Option<T>, Error>,
        missing: &str,
    ) -> Result<T, Error> {
        match outcome {
            Ok(Some(record)) => {
                self.audit
                    .record(AuditEvent {
                        action,
                        subject,
                        success: true,
                    })
                    .await;
                Ok(record)
            }
            Ok(None) => {
                self.audit
                    .record(AuditEvent {
                        action,
                        subject: subject.clone(),
                        success: false,
                    })
                    .await;
                Err(Error::not_found(missing).with_details(json!({ "subject": subject })))
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl<P, D, M, A> VerificationPort for VerificationService<P, D, M, A>
where
    P: PropertyRepository,
    D: DocumentRepository,
    M: MutationRepository,
    A: AuditLog,
{
    async fn verify_property(&self, survey_number: &SurveyNumber) -> Result<Property, Error> {
        let outcome = self
            .properties
            .find_by_survey(survey_number)
            .await
            .map_err(map_property_store_error);
        self.audited(
            "verify_property",
            survey_number.to_string(),
            outcome,
            "no property registered under this survey number",
        )
        .await
    }

    async fn verify_document(&self, hash: &Sha256Digest) -> Result<Document, Error> {
        // Exact match only: a partial hash that happens to be a prefix of a
        // stored digest must not attest to anything.
        let outcome = self.documents.find_by_hash(hash).await.map_err(|err| {
            Error::internal(format!("document store error: {err}"))
        });
        self.audited(
            "verify_document",
            hash.to_string(),
            outcome,
            "no document matches this content hash",
        )
        .await
    }

    async fn verify_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Mutation, Error> {
        let outcome = self
            .mutations
            .find_by_transaction_id(transaction_id)
            .await
            .map_err(|err| Error::internal(format!("mutation store error: {err}")));
        self.audited(
            "verify_transaction",
            transaction_id.to_string(),
            outcome,
            "no mutation matches this transaction id",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{
        MockAuditLog, MockDocumentRepository, MockMutationRepository, MockPropertyRepository,
    };
    use crate::domain::property::{AreaSqFt, PropertySubmission};
    use crate::domain::auth::OwnerId;
    use uuid::Uuid;

    fn sample_property() -> Property {
        Property::register(
            Uuid::new_v4(),
            PropertySubmission {
                survey_number: SurveyNumber::new("45/2").expect("valid survey number"),
                address: "12 MG Road, Bengaluru".to_owned(),
                area_sqft: AreaSqFt::new(1200).expect("positive area"),
                geo: None,
            },
            OwnerId::new("user-1").expect("valid owner id"),
            chrono::Utc::now(),
        )
    }

    fn expect_audit(success: bool) -> MockAuditLog {
        let mut audit = MockAuditLog::new();
        audit
            .expect_record()
            .withf(move |event: &AuditEvent| event.success == success)
            .times(1)
            .return_once(|_| ());
        audit
    }

    #[tokio::test]
    async fn found_surveys_are_attested_and_audited() {
        let stored = sample_property();
        let survey = stored.survey_number.clone();
        let mut properties = MockPropertyRepository::new();
        properties
            .expect_find_by_survey()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let service = VerificationService::new(
            Arc::new(properties),
            Arc::new(MockDocumentRepository::new()),
            Arc::new(MockMutationRepository::new()),
            Arc::new(expect_audit(true)),
        );
        let property = service
            .verify_property(&survey)
            .await
            .expect("record attested");
        assert_eq!(property.survey_number, survey);
    }

    #[tokio::test]
    async fn missing_records_audit_the_failed_lookup() {
        let mut properties = MockPropertyRepository::new();
        properties
            .expect_find_by_survey()
            .times(1)
            .return_once(|_| Ok(None));

        let service = VerificationService::new(
            Arc::new(properties),
            Arc::new(MockDocumentRepository::new()),
            Arc::new(MockMutationRepository::new()),
            Arc::new(expect_audit(false)),
        );
        let survey = SurveyNumber::new("999/1").expect("valid survey number");
        let err = service
            .verify_property(&survey)
            .await
            .expect_err("nothing registered");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn document_lookup_is_exact_match_only() {
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_hash()
            .times(1)
            .return_once(|_| Ok(None));

        let service = VerificationService::new(
            Arc::new(MockPropertyRepository::new()),
            Arc::new(documents),
            Arc::new(MockMutationRepository::new()),
            Arc::new(expect_audit(false)),
        );
        let digest = Sha256Digest::of_str("only a prefix of this was quoted");
        let err = service
            .verify_document(&digest)
            .await
            .expect_err("prefix must not attest");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
