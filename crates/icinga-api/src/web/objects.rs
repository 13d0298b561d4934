// `IcingaApi` over HTTP
//
// Hosts, host groups and services share the same shape: reads under
// `/v1/objects/<collection>`, creates as PUT with templates, updates as POST
// with attrs only. Check results go through `/v1/actions`.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::WebClient;
use crate::api::IcingaApi;
use crate::error::{Error, OperationKind};
use crate::models::{
    Action, CreateBody, Downtime, Host, HostGroup, Object, Service, UpdateBody, ensure_addressable,
    ensure_name,
};

impl WebClient {
    async fn get_one<T: Object + DeserializeOwned>(&self, key: &str) -> Result<T, Error> {
        ensure_name(T::KIND, key)?;
        let path = format!("/{}/{key}", T::COLLECTION);
        self.query_objects(OperationKind::Get, &path, None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                kind: T::KIND,
                name: key.to_owned(),
            })
    }

    async fn list_all<T: Object + DeserializeOwned>(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let path = format!("/{}", T::COLLECTION);
        self.query_objects(OperationKind::List, &path, filter).await
    }

    async fn create<T: Object + Serialize + Sync>(
        &self,
        object: &T,
        templates: &[String],
    ) -> Result<(), Error> {
        ensure_addressable(object)?;
        debug!(kind = T::KIND, key = %object.key(), "creating object");
        let body = CreateBody {
            templates,
            attrs: object,
        };
        self.create_object(&object.path(), &body).await
    }

    async fn update<T: Object + Serialize + Sync>(&self, object: &T) -> Result<(), Error> {
        ensure_addressable(object)?;
        debug!(kind = T::KIND, key = %object.key(), "updating object");
        self.update_object(&object.path(), &UpdateBody { attrs: object })
            .await
    }

    async fn delete<T: Object>(&self, key: &str) -> Result<(), Error> {
        ensure_name(T::KIND, key)?;
        debug!(kind = T::KIND, key, "deleting object");
        self.delete_object(&format!("/{}/{key}", T::COLLECTION))
            .await
    }
}

/// Render `value` as an Icinga DSL string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[async_trait]
impl IcingaApi for WebClient {
    // ── Hosts ────────────────────────────────────────────────────────

    async fn get_host(&self, name: &str) -> Result<Host, Error> {
        self.get_one(name).await
    }

    async fn create_host(&self, host: &Host) -> Result<(), Error> {
        self.create(host, &host.templates).await
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, Error> {
        self.list_all(None).await
    }

    async fn delete_host(&self, name: &str) -> Result<(), Error> {
        self.delete::<Host>(name).await
    }

    async fn update_host(&self, host: &Host) -> Result<(), Error> {
        self.update(host).await
    }

    // ── Host groups ──────────────────────────────────────────────────

    async fn get_host_group(&self, name: &str) -> Result<HostGroup, Error> {
        self.get_one(name).await
    }

    async fn create_host_group(&self, group: &HostGroup) -> Result<(), Error> {
        self.create(group, &[]).await
    }

    async fn list_host_groups(&self) -> Result<Vec<HostGroup>, Error> {
        self.list_all(None).await
    }

    async fn delete_host_group(&self, name: &str) -> Result<(), Error> {
        self.delete::<HostGroup>(name).await
    }

    async fn update_host_group(&self, group: &HostGroup) -> Result<(), Error> {
        self.update(group).await
    }

    // ── Downtimes ────────────────────────────────────────────────────

    async fn list_downtimes(&self, filter: Option<&str>) -> Result<Vec<Downtime>, Error> {
        self.query_objects(OperationKind::List, "/downtimes", filter)
            .await
    }

    // ── Services ─────────────────────────────────────────────────────

    async fn get_service(&self, full_name: &str) -> Result<Service, Error> {
        self.get_one(full_name).await
    }

    async fn create_service(&self, service: &Service) -> Result<(), Error> {
        self.create(service, &service.templates).await
    }

    async fn list_services(&self, host_name: Option<&str>) -> Result<Vec<Service>, Error> {
        let filter = host_name.map(|host| format!("host.name=={}", quote(host)));
        self.list_all(filter.as_deref()).await
    }

    async fn delete_service(&self, full_name: &str) -> Result<(), Error> {
        self.delete::<Service>(full_name).await
    }

    async fn update_service(&self, service: &Service) -> Result<(), Error> {
        self.update(service).await
    }

    // ── Actions ──────────────────────────────────────────────────────

    async fn process_check_result(
        &self,
        service: &Service,
        action: &Action,
    ) -> Result<(), Error> {
        ensure_addressable(service)?;
        let full_name = service.full_name();
        debug!(service = %full_name, exit_status = action.exit_status, "submitting check result");
        self.post_action(
            "process-check-result",
            &[("service", full_name.as_str())],
            &service.path(),
            action,
        )
        .await
    }
}
