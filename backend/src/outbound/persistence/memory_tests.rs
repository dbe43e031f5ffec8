//! Tests for the in-memory record store.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::MemoryStore;
use crate::domain::ports::{
    DocumentRepository, MutationRepository, MutationStoreError, PropertyRepository,
    PropertyStoreError,
};
use crate::domain::{
    ApprovalRecord, AreaSqFt, CancellationRecord, Document, DocumentKind, Mutation,
    MutationFilter, MutationStatus, MutationStatusKind, OwnerId, Property, PropertyFilter,
    PropertySubmission, RegistryNumber, RejectionRecord, Sha256Digest, SurveyNumber,
    TransactionId, TransferReason,
};

fn owner(id: &str) -> OwnerId {
    OwnerId::new(id).expect("valid owner id")
}

fn parcel(survey: &str, owner_id: &str) -> Property {
    Property::register(
        Uuid::new_v4(),
        PropertySubmission {
            survey_number: SurveyNumber::new(survey).expect("valid survey number"),
            address: "12 MG Road, Bengaluru".to_owned(),
            area_sqft: AreaSqFt::new(1200).expect("positive area"),
            geo: None,
        },
        owner(owner_id),
        Utc::now(),
    )
}

fn pending(property: &Property, new_owner: &str, serial: u32) -> Mutation {
    Mutation {
        id: Uuid::new_v4(),
        transaction_id: TransactionId::from_serial(serial),
        property_id: property.id,
        previous_owner_id: property.owner_id.clone(),
        new_owner_id: owner(new_owner),
        reason: TransferReason::Sale,
        created_at: Utc::now(),
        status: MutationStatus::Pending,
    }
}

fn approval() -> ApprovalRecord {
    let now = Utc::now();
    ApprovalRecord {
        review_date: now,
        approved_date: now,
        stamp_duty_inr: 210_000,
        registration_fee_inr: 42_000,
        verification_hash: Sha256Digest::of_str("attestation"),
        registry_number: RegistryNumber::from_serial(7, 2025),
    }
}

fn document(property_id: Uuid, body: &[u8]) -> Document {
    Document {
        id: Uuid::new_v4(),
        property_id,
        kind: DocumentKind::SaleDeed,
        file_name: "deed.pdf".to_owned(),
        description: None,
        content_hash: Sha256Digest::of_bytes(body),
        size_bytes: body.len() as u64,
        uploaded_at: Utc::now(),
    }
}

#[tokio::test]
async fn duplicate_survey_numbers_are_rejected() {
    let store = MemoryStore::new();
    PropertyRepository::insert(&store, &parcel("123/456", "user-1"))
        .await
        .expect("first registration");

    let err = PropertyRepository::insert(&store, &parcel("123/456", "user-2"))
        .await
        .expect_err("second registration collides");
    assert!(matches!(
        err,
        PropertyStoreError::DuplicateSurveyNumber { .. }
    ));
}

#[tokio::test]
async fn property_listing_filters_by_owner() {
    let store = MemoryStore::new();
    PropertyRepository::insert(&store, &parcel("45/1", "user-1"))
        .await
        .expect("insert");
    PropertyRepository::insert(&store, &parcel("45/2", "user-2"))
        .await
        .expect("insert");

    let mine = PropertyRepository::list(
        &store,
        &PropertyFilter {
            owner_id: Some(owner("user-1")),
        },
    )
    .await
    .expect("list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine.first().map(|p| p.survey_number.as_str()), Some("45/1"));
}

#[tokio::test]
async fn documents_list_in_upload_order_and_match_hashes_exactly() {
    let store = MemoryStore::new();
    let property_id = Uuid::new_v4();
    let first = document(property_id, b"first");
    let second = document(property_id, b"second");
    DocumentRepository::insert(&store, &first)
        .await
        .expect("insert");
    DocumentRepository::insert(&store, &second)
        .await
        .expect("insert");

    let listed = store
        .list_by_property(property_id)
        .await
        .expect("list documents");
    assert_eq!(
        listed.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let found = store
        .find_by_hash(&first.content_hash)
        .await
        .expect("lookup");
    assert_eq!(found.map(|d| d.id), Some(first.id));
}

#[tokio::test]
async fn approval_moves_ownership_and_resolves_the_mutation() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    PropertyRepository::insert(&store, &property)
        .await
        .expect("insert property");
    let mutation = pending(&property, "user-9", 1);
    MutationRepository::insert(&store, &mutation)
        .await
        .expect("insert mutation");

    let approved = store
        .approve(mutation.id, approval())
        .await
        .expect("approval commits");
    assert_eq!(approved.status_kind(), MutationStatusKind::Approved);

    let reloaded = PropertyRepository::find_by_id(&store, property.id)
        .await
        .expect("lookup")
        .expect("property present");
    assert_eq!(reloaded.owner_id, owner("user-9"));
}

#[tokio::test]
async fn a_second_approval_of_the_same_mutation_fails_without_touching_the_parcel() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    PropertyRepository::insert(&store, &property)
        .await
        .expect("insert property");
    let mutation = pending(&property, "user-9", 1);
    MutationRepository::insert(&store, &mutation)
        .await
        .expect("insert mutation");

    store
        .approve(mutation.id, approval())
        .await
        .expect("first approval");
    let err = store
        .approve(mutation.id, approval())
        .await
        .expect_err("second approval refused");
    assert!(matches!(
        err,
        MutationStoreError::AlreadyResolved {
            status: MutationStatusKind::Approved,
            ..
        }
    ));

    let reloaded = PropertyRepository::find_by_id(&store, property.id)
        .await
        .expect("lookup")
        .expect("property present");
    assert_eq!(reloaded.owner_id, owner("user-9"));
}

#[tokio::test]
async fn competing_approvals_on_one_parcel_have_exactly_one_winner() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    PropertyRepository::insert(&store, &property)
        .await
        .expect("insert property");
    let first = pending(&property, "user-9", 1);
    let second = pending(&property, "user-5", 2);
    MutationRepository::insert(&store, &first)
        .await
        .expect("insert");
    MutationRepository::insert(&store, &second)
        .await
        .expect("insert");

    store.approve(first.id, approval()).await.expect("winner");
    let err = store
        .approve(second.id, approval())
        .await
        .expect_err("loser sees the stale owner");
    assert!(matches!(err, MutationStoreError::OwnershipChanged { .. }));

    let reloaded = PropertyRepository::find_by_id(&store, property.id)
        .await
        .expect("lookup")
        .expect("property present");
    assert_eq!(reloaded.owner_id, owner("user-9"));
    let losing = MutationRepository::find_by_id(&store, second.id)
        .await
        .expect("lookup")
        .expect("mutation present");
    assert!(losing.is_pending());
}

#[tokio::test]
async fn rejection_leaves_the_parcel_untouched() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    PropertyRepository::insert(&store, &property)
        .await
        .expect("insert property");
    let mutation = pending(&property, "user-9", 1);
    MutationRepository::insert(&store, &mutation)
        .await
        .expect("insert mutation");

    let now = Utc::now();
    let rejected = store
        .reject(
            mutation.id,
            RejectionRecord {
                review_date: now,
                rejected_date: now,
                reason: "Title dispute".to_owned(),
            },
        )
        .await
        .expect("rejection commits");
    assert_eq!(rejected.status_kind(), MutationStatusKind::Rejected);

    let reloaded = PropertyRepository::find_by_id(&store, property.id)
        .await
        .expect("lookup")
        .expect("property present");
    assert_eq!(reloaded.owner_id, owner("user-1"));
}

#[tokio::test]
async fn duplicate_transaction_ids_are_rejected() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    let first = pending(&property, "user-9", 7);
    let mut second = pending(&property, "user-5", 7);
    second.id = Uuid::new_v4();

    MutationRepository::insert(&store, &first)
        .await
        .expect("insert");
    let err = MutationRepository::insert(&store, &second)
        .await
        .expect_err("same serial collides");
    assert!(matches!(
        err,
        MutationStoreError::DuplicateTransactionId { .. }
    ));
}

#[tokio::test]
async fn listings_are_newest_first_with_insertion_order_ties() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    let base = Utc::now();

    let mut older = pending(&property, "user-9", 1);
    older.created_at = base - Duration::hours(2);
    let mut tied_a = pending(&property, "user-5", 2);
    tied_a.created_at = base;
    let mut tied_b = pending(&property, "user-6", 3);
    tied_b.created_at = base;

    for mutation in [&older, &tied_a, &tied_b] {
        MutationRepository::insert(&store, mutation)
            .await
            .expect("insert");
    }

    let listed = MutationRepository::list(&store, &MutationFilter::default())
        .await
        .expect("list mutations");
    assert_eq!(
        listed.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![tied_a.id, tied_b.id, older.id]
    );
}

#[tokio::test]
async fn cancelled_mutations_stay_retrievable_but_leave_default_listings() {
    let store = MemoryStore::new();
    let property = parcel("45/2", "user-1");
    let mutation = pending(&property, "user-9", 1);
    MutationRepository::insert(&store, &mutation)
        .await
        .expect("insert");

    store
        .cancel(
            mutation.id,
            CancellationRecord {
                cancelled_date: Utc::now(),
            },
        )
        .await
        .expect("cancel commits");

    let listed = MutationRepository::list(&store, &MutationFilter::default())
        .await
        .expect("list mutations");
    assert!(listed.is_empty());

    let reloaded = MutationRepository::find_by_id(&store, mutation.id)
        .await
        .expect("lookup")
        .expect("cancelled record retained");
    assert_eq!(reloaded.status_kind(), MutationStatusKind::Cancelled);
}
