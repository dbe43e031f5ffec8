//! Wiring of stores, services and HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::{
    DocumentStoreService, MutationWorkflowService, PropertyRegistryService, VerificationService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::audit::TracingAuditLog;
use crate::outbound::identity::StaticTokenDirectory;
use crate::outbound::persistence::MemoryStore;

use super::config::{AppSettings, SettingsError};

/// Build the HTTP dependency bundle from settings.
///
/// One [`MemoryStore`] instance backs every service; it is the single owner
/// of record state for the process lifetime.
pub fn build_http_state(settings: &AppSettings) -> Result<HttpState, SettingsError> {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(DefaultClock);

    let properties = Arc::new(PropertyRegistryService::new(store.clone(), clock.clone()));
    let documents = Arc::new(DocumentStoreService::with_limit(
        store.clone(),
        store.clone(),
        clock.clone(),
        settings.max_upload_bytes(),
    ));
    let mutations = Arc::new(MutationWorkflowService::new(
        store.clone(),
        store.clone(),
        clock,
        settings.fee_policy(),
    ));
    let verification = Arc::new(VerificationService::new(
        store.clone(),
        store.clone(),
        store,
        Arc::new(TracingAuditLog),
    ));
    let identity = Arc::new(StaticTokenDirectory::new(settings.token_entries()?));
    if identity.is_empty() {
        tracing::warn!("no auth tokens configured; every write will be rejected with 401");
    }

    Ok(HttpState {
        properties,
        documents,
        mutations,
        verification,
        identity,
    })
}
