//! Document store domain service.
//!
//! Uploads are hashed with SHA-256 at ingest; the digest is the document's
//! permanent identity for verification. The owning property's title-document
//! hash tracks the latest upload, mirroring what the registry office stamps
//! on the paper file.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use super::auth::Caller;
use super::document::Document;
use super::error::Error;
use super::hash::Sha256Digest;
use super::ports::{
    DocumentRepository, DocumentStoreError, DocumentStorePort, DocumentUpload, PropertyRepository,
};
use super::property::Property;
use super::registry::map_property_store_error;

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Document store service implementing [`DocumentStorePort`].
#[derive(Clone)]
pub struct DocumentStoreService<D, P> {
    documents: Arc<D>,
    properties: Arc<P>,
    clock: Arc<dyn Clock>,
    max_upload_bytes: u64,
}

impl<D, P> DocumentStoreService<D, P> {
    /// Create a new service with the default upload ceiling.
    pub fn new(documents: Arc<D>, properties: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self::with_limit(documents, properties, clock, DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Create a new service with an explicit upload ceiling in bytes.
    pub fn with_limit(
        documents: Arc<D>,
        properties: Arc<P>,
        clock: Arc<dyn Clock>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            documents,
            properties,
            clock,
            max_upload_bytes,
        }
    }
}

impl<D, P> DocumentStoreService<D, P>
where
    D: DocumentRepository,
    P: PropertyRepository,
{
    fn map_store_error(error: DocumentStoreError) -> Error {
        match error {
            DocumentStoreError::Backend { message } => {
                Error::internal(format!("document store error: {message}"))
            }
        }
    }

    async fn load_accessible_property(
        &self,
        caller: &Caller,
        property_id: Uuid,
    ) -> Result<Property, Error> {
        let property = self
            .properties
            .find_by_id(property_id)
            .await
            .map_err(map_property_store_error)?
            .ok_or_else(|| {
                Error::not_found("property not found")
                    .with_details(json!({ "propertyId": property_id }))
            })?;
        if !caller.may_act_for(&property.owner_id) {
            return Err(Error::forbidden(
                "not authorised to manage documents for this property",
            ));
        }
        Ok(property)
    }

    fn validate_upload(&self, upload: &DocumentUpload) -> Result<(), Error> {
        if upload.file_name.trim().is_empty() {
            return Err(
                Error::invalid_request("file name must not be empty").with_details(json!({
                    "field": "fileName",
                    "code": "missing_field",
                })),
            );
        }
        let size = u64::try_from(upload.bytes.len()).unwrap_or(u64::MAX);
        if size > self.max_upload_bytes {
            return Err(
                Error::invalid_request("file exceeds the upload size limit").with_details(json!({
                    "sizeBytes": size,
                    "limitBytes": self.max_upload_bytes,
                    "code": "file_too_large",
                })),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl<D, P> DocumentStorePort for DocumentStoreService<D, P>
where
    D: DocumentRepository,
    P: PropertyRepository,
{
    async fn upload(&self, caller: &Caller, upload: DocumentUpload) -> Result<Document, Error> {
        self.validate_upload(&upload)?;
        let property = self
            .load_accessible_property(caller, upload.property_id)
            .await?;

        let now = self.clock.utc();
        let content_hash = Sha256Digest::of_bytes(&upload.bytes);
        let document = Document {
            id: Uuid::new_v4(),
            property_id: property.id,
            kind: upload.kind,
            file_name: upload.file_name,
            description: upload.description,
            content_hash: content_hash.clone(),
            size_bytes: u64::try_from(upload.bytes.len()).unwrap_or(u64::MAX),
            uploaded_at: now,
        };

        self.documents
            .insert(&document)
            .await
            .map_err(Self::map_store_error)?;
        // The parcel record tracks its most recent title document.
        self.properties
            .set_title_document(property.id, &content_hash, now)
            .await
            .map_err(map_property_store_error)?;

        tracing::info!(
            document_id = %document.id,
            property_id = %property.id,
            kind = %document.kind,
            size_bytes = document.size_bytes,
            "document stored"
        );
        Ok(document)
    }

    async fn list_for_property(
        &self,
        caller: &Caller,
        property_id: Uuid,
    ) -> Result<Vec<Document>, Error> {
        self.load_accessible_property(caller, property_id).await?;
        self.documents
            .list_by_property(property_id)
            .await
            .map_err(Self::map_store_error)
    }
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
