// Icinga 2 object models
//
// Serde types for the objects exposed through `/v1/objects`. Reads arrive as
// `{"results": [{"attrs": {...}, "name": "...", "type": "Host"}]}`; writes
// send `{"templates": [...], "attrs": {...}}`. Fields use `#[serde(default)]`
// liberally because the API omits unset attributes, and empty attributes are
// left out of writes so template values and server-side state survive.

mod action;
mod downtime;
mod host;
mod host_group;
mod service;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use action::Action;
pub use downtime::Downtime;
pub use host::Host;
pub use host_group::HostGroup;
pub use service::Service;

/// Custom variables (`vars`) attached to an object. Values are unconstrained.
pub type Vars = serde_json::Map<String, serde_json::Value>;

/// An object addressable under `/v1/objects/<collection>/<key>`.
pub trait Object {
    /// Collection segment of the object path (`hosts`, `services`, ...).
    const COLLECTION: &'static str;

    /// Singular label used in error messages.
    const KIND: &'static str;

    /// Stable identifying key. Services use `host!service`.
    fn key(&self) -> String;

    fn vars(&self) -> &Vars;

    /// Operation target, e.g. `/hosts/web01`.
    fn path(&self) -> String {
        format!("/{}/{}", Self::COLLECTION, self.key())
    }

    /// Whether every component of the key is set.
    fn is_addressable(&self) -> bool {
        !self.key().is_empty()
    }
}

/// An object with an active check.
pub trait Checkable: Object {
    fn check_command(&self) -> &str;
    fn notes(&self) -> &str;
    fn notes_url(&self) -> &str;
}

pub(crate) fn ensure_name(kind: &'static str, name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::InvalidName { kind });
    }
    Ok(())
}

pub(crate) fn ensure_addressable<T: Object + ?Sized>(object: &T) -> Result<(), Error> {
    if !object.is_addressable() {
        return Err(Error::InvalidName { kind: T::KIND });
    }
    Ok(())
}

// ── Wire envelopes ───────────────────────────────────────────────────

/// Read envelope for `/v1/objects` queries.
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<ObjectEntry<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectEntry<T> {
    pub attrs: T,
}

impl<T> ObjectResults<T> {
    pub(crate) fn into_attrs(self) -> Vec<T> {
        self.results.into_iter().map(|entry| entry.attrs).collect()
    }
}

/// Body of a create (`PUT`) request.
#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a, T> {
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub templates: &'a [String],
    pub attrs: &'a T,
}

/// Body of an update (`POST`) request.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateBody<'a, T> {
    pub attrs: &'a T,
}
