use serde::{Deserialize, Serialize};

/// A passive check result submitted through `process-check-result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// 0=OK, 1=WARNING, 2=CRITICAL, 3=UNKNOWN
    pub exit_status: i32,
    pub plugin_output: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performance_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_source: Option<String>,
    /// Seconds until the result goes stale and freshness checks kick in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl Action {
    pub fn new(exit_status: i32, plugin_output: impl Into<String>) -> Self {
        Self {
            exit_status,
            plugin_output: plugin_output.into(),
            ..Self::default()
        }
    }

    pub fn with_performance_data(mut self, data: impl Into<String>) -> Self {
        self.performance_data.push(data.into());
        self
    }

    pub fn with_check_source(mut self, source: impl Into<String>) -> Self {
        self.check_source = Some(source.into());
        self
    }
}
