use std::collections::HashMap;

use super::models::{EscalationPolicyModel, OnCallModel, UserModel};
use crate::types::{EscalationLevel, EscalationPolicy, OnCallUser};

/// Joins the three flat listings into policies with their on-call levels.
///
/// Policies keep the listing order. Every policy gets levels `1..=max`, where
/// `max` is the deepest on-call level seen for it (or 1), so gaps show up as
/// empty levels.
pub fn make_escalation_policies(
    policies: Vec<EscalationPolicyModel>,
    users: Vec<UserModel>,
    oncalls: Vec<OnCallModel>,
) -> Vec<EscalationPolicy> {
    let users: HashMap<String, UserModel> = users
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect();

    policies
        .into_iter()
        .map(|policy| {
            let oncalls_for_policy: Vec<&OnCallModel> = oncalls
                .iter()
                .filter(|oncall| oncall.escalation_policy.id == policy.id)
                .collect();

            let max_level = oncalls_for_policy
                .iter()
                .map(|oncall| oncall.escalation_level)
                .max()
                .unwrap_or(1);

            let levels = (1..=max_level)
                .map(|index| EscalationLevel {
                    index,
                    people: oncalls_for_policy
                        .iter()
                        .filter(|oncall| oncall.escalation_level == index)
                        .filter_map(|oncall| resolve_user(&users, oncall))
                        .collect(),
                })
                .collect();

            EscalationPolicy {
                id: policy.id,
                name: policy.name,
                levels,
            }
        })
        .collect()
}

fn resolve_user(
    users: &HashMap<String, UserModel>,
    oncall: &OnCallModel,
) -> Option<OnCallUser> {
    let Some(user) = users.get(&oncall.user.id) else {
        tracing::debug!(
            user_id = %oncall.user.id,
            escalation_policy_id = %oncall.escalation_policy.id,
            "Skipping on-call for unknown user"
        );
        return None;
    };

    Some(OnCallUser {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
    })
}
