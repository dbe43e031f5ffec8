//! Static bearer-token directory.
//!
//! Identity management proper is an external collaborator; this adapter is
//! the minimal stand-in a deployment configures with a fixed token table.
//! Unknown tokens resolve to nothing and the request fails with 401;
//! deliberately no fallback identity.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::Caller;
use crate::domain::ports::{IdentityResolutionError, IdentityResolver};

/// Identity resolver backed by a fixed token table from configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenDirectory {
    entries: HashMap<String, Caller>,
}

impl StaticTokenDirectory {
    /// Build a directory from `(token, caller)` pairs. Later duplicates of
    /// a token replace earlier ones.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, Caller)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Number of configured tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for StaticTokenDirectory {
    async fn resolve(&self, token: &str) -> Result<Option<Caller>, IdentityResolutionError> {
        Ok(self.entries.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OwnerId;

    fn caller(id: &str) -> Caller {
        Caller::citizen(OwnerId::new(id).expect("valid owner id"))
    }

    #[tokio::test]
    async fn known_tokens_resolve_to_their_caller() {
        let directory =
            StaticTokenDirectory::new([("tok-1".to_owned(), caller("user-1"))]);
        let resolved = directory.resolve("tok-1").await.expect("resolver works");
        assert_eq!(resolved, Some(caller("user-1")));
    }

    #[tokio::test]
    async fn unknown_tokens_resolve_to_none() {
        let directory = StaticTokenDirectory::default();
        let resolved = directory.resolve("missing").await.expect("resolver works");
        assert_eq!(resolved, None);
    }
}
