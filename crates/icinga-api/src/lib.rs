// icinga-api: Async Rust client for the Icinga 2 object configuration API

pub mod api;
pub mod error;
pub mod mock;
pub mod models;
pub mod reconcile;
pub mod transport;
pub mod web;

pub use api::IcingaApi;
pub use error::{Error, OperationKind};
pub use mock::MockClient;
pub use models::{Action, Checkable, Downtime, Host, HostGroup, Object, Service, Vars};
pub use reconcile::{BulkResultItem, BulkResults, Exchange, reconcile};
pub use transport::TransportConfig;
pub use web::{ClientConfig, WebClient};
