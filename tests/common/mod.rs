#![allow(dead_code)] // Needed because this module is imported as module by many test crates

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fake_pagerduty::FakePagerDuty;
use pd_oncall::client::PagerDutyClient;
use pd_oncall::config::ApiConfig;
use pd_oncall::types::ApiToken;
use tokio::task::JoinHandle;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const TEST_TOKEN: &str = "y_NbAkKc66ryYTWUXYEu";

pub struct FakePagerDutyHandle {
    pub fake: Arc<FakePagerDuty>,
    local_addr: SocketAddr,
    server_handle: JoinHandle<eyre::Result<()>>,
}

impl FakePagerDutyHandle {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn api_config(&self, token: Option<&str>, page_size: u32) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url().parse().expect("valid local url"),
            timeout: Duration::from_secs(5),
            page_size,
            token: token.map(ApiToken::new),
        }
    }

    pub fn client(&self, page_size: u32) -> eyre::Result<PagerDutyClient> {
        Ok(PagerDutyClient::new(
            &self.api_config(Some(TEST_TOKEN), page_size),
        )?)
    }
}

impl Drop for FakePagerDutyHandle {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub fn setup_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

pub async fn setup_fake_pagerduty() -> eyre::Result<FakePagerDutyHandle> {
    let (fake, server) = fake_pagerduty::serve(0, TEST_TOKEN).await;

    let local_addr = server.local_addr();

    let server_handle = tokio::spawn(async move {
        server.await?;
        Ok(())
    });

    Ok(FakePagerDutyHandle {
        fake,
        local_addr,
        server_handle,
    })
}

/// Two policies; the second has a gap at level 2.
pub async fn seed_account(fake: &FakePagerDuty) {
    fake.add_user("U1", "Alice", "alice@example.com").await;
    fake.add_user("U2", "Bob", "bob@example.com").await;
    fake.add_user("U3", "Carol", "carol@example.com").await;

    fake.add_escalation_policy("P1", "Checkout").await;
    fake.add_escalation_policy("P2", "Platform").await;

    fake.add_oncall("P1", 1, "U1").await;
    fake.add_oncall("P1", 2, "U2").await;
    fake.add_oncall("P1", 2, "U3").await;
    fake.add_oncall("P2", 1, "U2").await;
    fake.add_oncall("P2", 3, "U1").await;
}
