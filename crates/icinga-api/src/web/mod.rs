// Live client for the Icinga 2 REST API
//
// `client` holds the HTTP mechanics (URL construction, auth, bulk exchange,
// reads); `objects` implements `IcingaApi` on top of it.

pub mod client;
mod objects;

pub use client::{ClientConfig, WebClient};
