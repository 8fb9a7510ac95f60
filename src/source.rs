use crate::error::FetchError;
use crate::types::EscalationPolicy;

#[async_trait::async_trait]
pub trait PolicySource: Send + Sync {
    /// Returns every escalation policy of the account, in listing order
    async fn fetch_policies(&self) -> Result<Vec<EscalationPolicy>, FetchError>;
}
