use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
struct Args {
    #[clap(short, long, default_value = "8080")]
    port: u16,

    /// Token the server accepts
    #[clap(short, long, env = "PAGERDUTY_TOKEN", default_value = "fake-token")]
    token: String,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty().compact())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let (fake, server) = fake_pagerduty::serve(args.port, &args.token).await;

    fake.add_user("PXPGF42", "Earline Greenholt", "earline@example.com")
        .await;
    fake.add_user("PT23IWX", "Tim Wright", "tim@example.com").await;
    fake.add_escalation_policy("PANZZEQ", "Checkout Primary").await;
    fake.add_escalation_policy("PT20YPA", "Platform").await;
    fake.add_oncall("PANZZEQ", 1, "PT23IWX").await;
    fake.add_oncall("PANZZEQ", 2, "PXPGF42").await;
    fake.add_oncall("PT20YPA", 1, "PXPGF42").await;

    tracing::info!("Serving fake PagerDuty API at {}", server.local_addr());

    server.await?;

    Ok(())
}
