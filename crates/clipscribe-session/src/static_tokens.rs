use std::collections::HashMap;

use async_trait::async_trait;
use clipscribe_config::StaticSessionUser;
use clipscribe_core::Session;
use indexmap::IndexMap;

use crate::{SessionError, SessionResolver};

/// Resolver backed by a fixed token table
#[derive(Debug, Clone, Default)]
pub struct StaticSessionResolver {
    sessions: HashMap<String, Session>,
}

impl StaticSessionResolver {
    /// Build from the `[session.resolver.tokens]` table
    pub fn from_config(tokens: &IndexMap<String, StaticSessionUser>) -> Self {
        let sessions = tokens
            .iter()
            .map(|(token, user)| {
                let session = Session {
                    user_id: user.user_id.clone(),
                    email: user.email.clone(),
                    name: user.name.clone(),
                };
                (token.clone(), session)
            })
            .collect();

        Self { sessions }
    }

    /// Register a token, replacing any previous session for it
    #[must_use]
    pub fn with_session(mut self, token: impl Into<String>, session: Session) -> Self {
        self.sessions.insert(token.into(), session);
        self
    }
}

#[async_trait]
impl SessionResolver for StaticSessionResolver {
    async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError> {
        Ok(self.sessions.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_resolves() {
        let mut tokens = IndexMap::new();
        tokens.insert(
            "dev-token".to_string(),
            StaticSessionUser {
                user_id: "ada".to_string(),
                email: Some("ada@example.com".to_string()),
                name: None,
            },
        );

        let resolver = StaticSessionResolver::from_config(&tokens);
        let session = resolver.resolve("dev-token").await.unwrap().unwrap();

        assert_eq!(session.user_id, "ada");
        assert_eq!(session.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn unknown_token_has_no_session() {
        let resolver = StaticSessionResolver::default().with_session("a", Session::new("ada"));

        assert!(resolver.resolve("b").await.unwrap().is_none());
        assert!(resolver.resolve("").await.unwrap().is_none());
    }
}
