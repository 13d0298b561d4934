use serde::{Deserialize, Serialize};

use super::{Checkable, Object, Vars};

/// A monitored host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    /// Object name. Taken from the URL on writes, so never serialized.
    #[serde(default, skip_serializing)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address6: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub check_command: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes_url: String,
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Templates to import on create. Not an object attribute.
    #[serde(skip)]
    pub templates: Vec<String>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_check_command(mut self, command: impl Into<String>) -> Self {
        self.check_command = command.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.templates.push(template.into());
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Object for Host {
    const COLLECTION: &'static str = "hosts";
    const KIND: &'static str = "host";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn vars(&self) -> &Vars {
        &self.vars
    }
}

impl Checkable for Host {
    fn check_command(&self) -> &str {
        &self.check_command
    }

    fn notes(&self) -> &str {
        &self.notes
    }

    fn notes_url(&self) -> &str {
        &self.notes_url
    }
}
