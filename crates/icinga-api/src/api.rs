// The operation surface shared by the live and mock clients.

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{Action, Downtime, Host, HostGroup, Service};

/// Typed CRUD over Icinga 2 objects.
///
/// Implemented by [`WebClient`](crate::WebClient) against a live API and by
/// [`MockClient`](crate::MockClient) in memory. Consumers should depend on
/// `dyn IcingaApi` (or a generic bound) and swap the mock in for tests.
///
/// # Error semantics differ by implementation
///
/// The live client reconciles bulk responses: a failed create or update
/// yields [`Error::Reconciliation`] whose message is
/// `"<kind> <target> : <detail>"`, and reads surface [`Error::Api`] or
/// transport errors. The mock only performs key-existence checks and yields
/// [`Error::NotFound`] / [`Error::AlreadyExists`]. Do not assert on message
/// text across implementations; use [`Error::is_not_found`] or match the
/// variant you expect from the implementation under test.
#[async_trait]
pub trait IcingaApi: Send + Sync {
    async fn get_host(&self, name: &str) -> Result<Host, Error>;
    async fn create_host(&self, host: &Host) -> Result<(), Error>;
    async fn list_hosts(&self) -> Result<Vec<Host>, Error>;
    async fn delete_host(&self, name: &str) -> Result<(), Error>;
    async fn update_host(&self, host: &Host) -> Result<(), Error>;

    async fn get_host_group(&self, name: &str) -> Result<HostGroup, Error>;
    async fn create_host_group(&self, group: &HostGroup) -> Result<(), Error>;
    async fn list_host_groups(&self) -> Result<Vec<HostGroup>, Error>;
    async fn delete_host_group(&self, name: &str) -> Result<(), Error>;
    async fn update_host_group(&self, group: &HostGroup) -> Result<(), Error>;

    /// List downtimes, optionally narrowed by an Icinga filter expression
    /// such as `host.name=="web01"`.
    async fn list_downtimes(&self, filter: Option<&str>) -> Result<Vec<Downtime>, Error>;

    /// Look up a service by full name (`host!service`).
    async fn get_service(&self, full_name: &str) -> Result<Service, Error>;
    async fn create_service(&self, service: &Service) -> Result<(), Error>;
    /// List services, optionally only those of one host.
    async fn list_services(&self, host_name: Option<&str>) -> Result<Vec<Service>, Error>;
    async fn delete_service(&self, full_name: &str) -> Result<(), Error>;
    async fn update_service(&self, service: &Service) -> Result<(), Error>;

    /// Submit a passive check result for a service.
    async fn process_check_result(&self, service: &Service, action: &Action)
    -> Result<(), Error>;
}
