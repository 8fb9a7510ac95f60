use clap::ValueEnum;

use crate::output;
use crate::source::PolicySource;
use crate::types::EscalationPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OncallFormat {
    #[default]
    Tree,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Policy name to id mapping for Terraform state imports
    #[default]
    Tfstate,
}

/// Renders who is on call for each escalation policy.
///
/// `filter` keeps policies whose name contains it, ignoring case.
pub async fn who_is_oncall(
    source: &dyn PolicySource,
    filter: Option<&str>,
    format: OncallFormat,
) -> eyre::Result<String> {
    let policies = source.fetch_policies().await?;
    let policies = filter_policies(policies, filter);

    tracing::info!(policies = policies.len(), ?format, "Rendering on-calls");

    match format {
        OncallFormat::Tree => Ok(output::build_tree_output(&policies)),
        OncallFormat::Json => output::build_json_output(&policies),
        OncallFormat::Csv => output::build_csv_output(&policies),
    }
}

pub async fn export(
    source: &dyn PolicySource,
    format: ExportFormat,
) -> eyre::Result<String> {
    let policies = source.fetch_policies().await?;

    tracing::info!(policies = policies.len(), ?format, "Exporting policies");

    match format {
        ExportFormat::Tfstate => output::build_tfstate_output(&policies),
    }
}

fn filter_policies(
    policies: Vec<EscalationPolicy>,
    filter: Option<&str>,
) -> Vec<EscalationPolicy> {
    let Some(filter) = filter else {
        return policies;
    };

    policies
        .into_iter()
        .filter(|policy| policy.name_contains(filter))
        .collect()
}
