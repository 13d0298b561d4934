use serde::{Deserialize, Serialize};

use super::{Checkable, Object, Vars};

/// A service attached to a host.
///
/// Icinga addresses services by their full name, `<host_name>!<name>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Short service name. Taken from the URL on writes.
    #[serde(default, skip_serializing)]
    pub name: String,
    /// Owning host. Taken from the URL on writes.
    #[serde(default, skip_serializing)]
    pub host_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
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
    #[serde(skip)]
    pub templates: Vec<String>,
}

impl Service {
    pub fn new(host_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_name: host_name.into(),
            ..Self::default()
        }
    }

    /// `host!service`
    pub fn full_name(&self) -> String {
        format!("{}!{}", self.host_name, self.name)
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

impl Object for Service {
    const COLLECTION: &'static str = "services";
    const KIND: &'static str = "service";

    fn key(&self) -> String {
        self.full_name()
    }

    fn is_addressable(&self) -> bool {
        !self.host_name.is_empty() && !self.name.is_empty()
    }

    fn vars(&self) -> &Vars {
        &self.vars
    }
}

impl Checkable for Service {
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
