use std::fmt;

use serde::{Deserialize, Serialize};

/// PagerDuty REST API token. Never printed by `Debug` or `Display`.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    #[must_use]
    pub fn new(token: impl ToString) -> Self {
        Self(token.to_string())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Value for the `Authorization` header of the v2 REST API.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Token token={}", self.0)
    }
}

const REDACTED: &str = "********";

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for ApiToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}
