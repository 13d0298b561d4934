// Bulk result reconciliation
//
// Icinga's mutation endpoints answer with a list of per-object results and
// may report HTTP 200 while individual items failed, or fail at the HTTP
// level with a structured body. `reconcile` folds both signals into one
// verdict with a message whose exact shape downstream tooling matches on.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, OperationKind};

/// One entry of a bulk response `results` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResultItem {
    /// Per-item status code. The API encodes it as a JSON float.
    pub code: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
}

impl BulkResultItem {
    pub fn is_failure(&self) -> bool {
        self.code >= 400.0
    }
}

/// `{"results": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResults {
    #[serde(default)]
    pub results: Vec<BulkResultItem>,
}

impl BulkResults {
    fn failures(&self) -> impl Iterator<Item = &BulkResultItem> {
        self.results.iter().filter(|item| item.is_failure())
    }
}

impl From<Vec<BulkResultItem>> for BulkResults {
    fn from(results: Vec<BulkResultItem>) -> Self {
        Self { results }
    }
}

/// A completed HTTP exchange with a bulk mutation endpoint.
///
/// `results` holds the body of a successful response; `error_channel` holds
/// the structured body of a failed one. Both are scanned by `reconcile`.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub results: BulkResults,
    pub error_channel: BulkResults,
}

impl Exchange {
    pub fn new(
        status: StatusCode,
        results: impl Into<BulkResults>,
        error_channel: impl Into<BulkResults>,
    ) -> Self {
        Self {
            status,
            results: results.into(),
            error_channel: error_channel.into(),
        }
    }

    /// Route a raw response body to the right channel.
    ///
    /// A 2xx body must decode (an empty body counts as no results). A non-2xx
    /// body that is not in bulk shape yields an empty error channel; the
    /// status alone then drives the verdict.
    pub fn from_body(status: StatusCode, body: &str) -> Result<Self, Error> {
        if status.is_success() {
            let results = if body.trim().is_empty() {
                BulkResults::default()
            } else {
                serde_json::from_str(body).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: body.to_owned(),
                })?
            };
            return Ok(Self::new(status, results, BulkResults::default()));
        }

        let error_channel = serde_json::from_str(body).unwrap_or_else(|e| {
            debug!(%status, error = %e, "error body is not a bulk result list");
            BulkResults::default()
        });
        Ok(Self::new(status, BulkResults::default(), error_channel))
    }
}

/// `"<code> <reason>"`, or just the code when it has no canonical reason.
pub(crate) fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Fold a bulk exchange into a single verdict.
///
/// A transport error is returned untouched. Otherwise every failing item
/// (`code >= 400`) in `results`, then in `error_channel`, contributes
/// `"<status> <errors...> "` to a report. A transport status >= 400 fails with
/// `"<kind> <target> : <status text> - <report>"`; a non-empty report alone
/// fails with `"<kind> <target> : <report>"`.
pub fn reconcile(
    kind: OperationKind,
    target: &str,
    outcome: Result<Exchange, Error>,
) -> Result<(), Error> {
    let exchange = outcome?;

    let mut report = String::new();
    for item in exchange
        .results
        .failures()
        .chain(exchange.error_channel.failures())
    {
        report.push_str(&item.status);
        report.push(' ');
        report.push_str(&item.errors.join(" "));
        report.push(' ');
    }

    let status = exchange.status.as_u16();
    if status >= 400 {
        return Err(Error::Reconciliation {
            kind,
            target: target.to_owned(),
            status,
            detail: format!("{} - {report}", status_text(exchange.status)),
        });
    }

    if !report.is_empty() {
        return Err(Error::Reconciliation {
            kind,
            target: target.to_owned(),
            status,
            detail: report,
        });
    }

    Ok(())
}
