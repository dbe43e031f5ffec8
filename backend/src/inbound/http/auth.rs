//! Bearer-token authentication for the HTTP surface.
//!
//! Tokens are opaque; the [`IdentityResolver`] port decides who they are.
//! Handlers take an [`Identity`] extractor argument and never touch the
//! `Authorization` header themselves.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{IdentityResolutionError, IdentityResolver};
use crate::domain::{Caller, Error};

use super::state::HttpState;

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = raw
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization scheme must be Bearer"))?;
    if token.trim().is_empty() {
        return Err(Error::unauthorized("missing bearer token"));
    }
    Ok(token.to_owned())
}

fn map_resolution_error(err: IdentityResolutionError) -> Error {
    match err {
        IdentityResolutionError::Backend { message } => {
            Error::internal(format!("identity resolution failed: {message}"))
        }
    }
}

/// Resolve the request's bearer token through the identity port.
pub async fn authenticate(
    resolver: &dyn IdentityResolver,
    req: &HttpRequest,
) -> Result<Caller, Error> {
    let token = bearer_token(req)?;
    resolver
        .resolve(&token)
        .await
        .map_err(map_resolution_error)?
        .ok_or_else(|| Error::unauthorized("unknown bearer token"))
}

/// Extractor wrapping the resolved caller identity.
pub struct Identity(pub Caller);

impl FromRequest for Identity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| Error::internal("http state missing"))?;
            let caller = authenticate(state.identity.as_ref(), &req).await?;
            Ok(Identity(caller))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OwnerId;
    use crate::domain::ports::MockIdentityResolver;
    use actix_web::test::TestRequest;

    fn caller(id: &str) -> Caller {
        Caller::citizen(OwnerId::new(id).expect("valid owner id"))
    }

    #[tokio::test]
    async fn a_known_token_authenticates() {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .return_once(|_| Ok(Some(caller("user-1"))));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer tok-1"))
            .to_http_request();
        let resolved = authenticate(&resolver, &req).await.expect("authenticated");
        assert_eq!(resolved, caller("user-1"));
    }

    #[tokio::test]
    async fn a_missing_header_is_unauthorized() {
        let resolver = MockIdentityResolver::new();
        let req = TestRequest::default().to_http_request();
        let err = authenticate(&resolver, &req)
            .await
            .expect_err("no header, no entry");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn a_non_bearer_scheme_is_unauthorized() {
        let resolver = MockIdentityResolver::new();
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_http_request();
        let err = authenticate(&resolver, &req)
            .await
            .expect_err("wrong scheme");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn an_unknown_token_is_unauthorized() {
        let mut resolver = MockIdentityResolver::new();
        resolver.expect_resolve().times(1).return_once(|_| Ok(None));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer who-is-this"))
            .to_http_request();
        let err = authenticate(&resolver, &req)
            .await
            .expect_err("unknown token");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }
}
