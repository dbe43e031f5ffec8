//! Land-records core backend.
//!
//! A backend-shaped implementation of a land-records administration
//! portal's record-keeping core: property registry, document store,
//! ownership-transfer ("mutation") workflow and public record
//! verification, exposed over a bearer-token-gated REST API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Trace middleware re-exported for server assembly and tests.
pub use middleware::Trace;
/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
