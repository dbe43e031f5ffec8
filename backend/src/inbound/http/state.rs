//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentStorePort, IdentityResolver, MutationWorkflowPort, PropertyRegistryPort,
    VerificationPort,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Property registry use-cases.
    pub properties: Arc<dyn PropertyRegistryPort>,
    /// Document store use-cases.
    pub documents: Arc<dyn DocumentStorePort>,
    /// Mutation workflow use-cases.
    pub mutations: Arc<dyn MutationWorkflowPort>,
    /// Public verification lookups.
    pub verification: Arc<dyn VerificationPort>,
    /// Bearer-token resolver.
    pub identity: Arc<dyn IdentityResolver>,
}
