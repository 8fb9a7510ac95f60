use serde::{Deserialize, Serialize};

pub mod api_token;

pub use api_token::ApiToken;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EscalationPolicy {
    pub id: String,
    pub name: String,
    pub levels: Vec<EscalationLevel>,
}

/// One rung of an escalation policy. `index` is 1-based.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EscalationLevel {
    pub index: u32,
    pub people: Vec<OnCallUser>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OnCallUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl EscalationPolicy {
    pub fn new(id: impl ToString, name: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            levels: vec![],
        }
    }

    /// Appends a level numbered after the existing ones.
    pub fn with_level<I>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = OnCallUser>,
    {
        let index = self.levels.len() as u32 + 1;

        self.levels.push(EscalationLevel {
            index,
            people: people.into_iter().collect(),
        });

        self
    }

    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl OnCallUser {
    pub fn new(id: impl ToString, name: impl ToString) -> Self {
        let id = id.to_string();
        let name = name.to_string();
        let email = format!("{}@example.com", name.to_lowercase());

        Self { id, name, email }
    }
}
