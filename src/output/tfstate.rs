use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::EscalationPolicy;

/// Policy name to id mapping consumed by Terraform state imports.
///
/// Names keep the position of their first occurrence; a later policy with
/// the same name replaces the id.
#[derive(Debug, Default, Serialize)]
pub struct TfStateExportData {
    escalation_policies: Map<String, Value>,
}

impl TfStateExportData {
    pub fn add_escalation_policy(&mut self, policy: &EscalationPolicy) {
        let previous = self
            .escalation_policies
            .insert(policy.name.clone(), Value::String(policy.id.clone()));

        if let Some(previous) = previous {
            if previous.as_str() != Some(policy.id.as_str()) {
                tracing::warn!(
                    name = %policy.name,
                    previous_id = previous.as_str().unwrap_or_default(),
                    id = %policy.id,
                    "Duplicate escalation policy name, keeping the last one"
                );
            }
        }
    }
}

impl<'a> FromIterator<&'a EscalationPolicy> for TfStateExportData {
    fn from_iter<I: IntoIterator<Item = &'a EscalationPolicy>>(iter: I) -> Self {
        let mut export = Self::default();

        for policy in iter {
            export.add_escalation_policy(policy);
        }

        export
    }
}
