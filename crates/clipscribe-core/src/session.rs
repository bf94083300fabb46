use serde::{Deserialize, Serialize};

/// Identity of an authenticated caller
///
/// Resolved once per request by the session layer and stored in the request
/// extensions for handlers to pick up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable user identifier (the OIDC `sub` claim)
    #[serde(rename = "sub")]
    pub user_id: String,
    /// Email address, when the identity provider shares it
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

impl Session {
    /// Session for a user known only by identifier
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            name: None,
        }
    }
}
