use serde::{Deserialize, Serialize};

use super::{Object, Vars};

/// A host group. Membership is declared on the host side (`Host::groups`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostGroup {
    #[serde(default, skip_serializing)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes_url: String,
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl HostGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

impl Object for HostGroup {
    const COLLECTION: &'static str = "hostgroups";
    const KIND: &'static str = "hostgroup";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn vars(&self) -> &Vars {
        &self.vars
    }
}
