//! Wire models of the PagerDuty v2 REST API listings.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct EscalationPolicyModel {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserModel {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OnCallModel {
    pub escalation_policy: ModelReference,
    pub escalation_level: u32,
    pub user: ModelReference,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ModelReference {
    pub id: String,
}

/// A single page of any listing endpoint.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(flatten)]
    pub objects: PagerDutyObjects,
    pub limit: u32,
    pub offset: u32,
    pub more: bool,
}

#[derive(Debug, Deserialize)]
pub enum PagerDutyObjects {
    #[serde(rename = "escalation_policies")]
    EscalationPolicies(Vec<EscalationPolicyModel>),
    #[serde(rename = "oncalls")]
    Oncalls(Vec<OnCallModel>),
    #[serde(rename = "users")]
    Users(Vec<UserModel>),
}

/// A model that is served by a paginated listing endpoint.
pub trait Listing: Sized + Send {
    /// Path relative to the API base url.
    const PATH: &'static str;

    /// Values for the `include[]` query parameter.
    const INCLUDES: &'static [&'static str];

    fn from_objects(objects: PagerDutyObjects) -> Option<Vec<Self>>;
}

impl Listing for EscalationPolicyModel {
    const PATH: &'static str = "escalation_policies";
    const INCLUDES: &'static [&'static str] = &["targets"];

    fn from_objects(objects: PagerDutyObjects) -> Option<Vec<Self>> {
        match objects {
            PagerDutyObjects::EscalationPolicies(policies) => Some(policies),
            _ => None,
        }
    }
}

impl Listing for OnCallModel {
    const PATH: &'static str = "oncalls";
    const INCLUDES: &'static [&'static str] = &["targets"];

    fn from_objects(objects: PagerDutyObjects) -> Option<Vec<Self>> {
        match objects {
            PagerDutyObjects::Oncalls(oncalls) => Some(oncalls),
            _ => None,
        }
    }
}

impl Listing for UserModel {
    const PATH: &'static str = "users";
    const INCLUDES: &'static [&'static str] = &[];

    fn from_objects(objects: PagerDutyObjects) -> Option<Vec<Self>> {
        match objects {
            PagerDutyObjects::Users(users) => Some(users),
            _ => None,
        }
    }
}
