// In-memory `IcingaApi` for consumer tests
//
// No network, no JSON, no reconciliation. Errors are plain key-existence
// checks (`NotFound`, `AlreadyExists`). One mutex guards the whole store and
// is held for the full body of each method; no method calls another that
// locks.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::trace;

use crate::api::IcingaApi;
use crate::error::Error;
use crate::models::{
    Action, Downtime, Host, HostGroup, Object, Service, ensure_addressable, ensure_name,
};

/// Everything the mock knows, guarded as one unit.
#[derive(Debug, Default)]
pub struct MockStore {
    pub host_groups: HashMap<String, HostGroup>,
    pub hosts: HashMap<String, Host>,
    /// Keyed by full name (`host!service`).
    pub services: HashMap<String, Service>,
    /// Append-only check result log, keyed by service full name.
    pub actions: HashMap<String, Vec<Action>>,
}

/// In-memory stand-in for [`WebClient`](crate::WebClient).
#[derive(Debug, Default)]
pub struct MockClient {
    store: Mutex<MockStore>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check results submitted for a service, oldest first.
    pub fn actions(&self, full_name: &str) -> Vec<Action> {
        self.lock()
            .actions
            .get(full_name)
            .cloned()
            .unwrap_or_default()
    }

    // A panic while the lock is held cannot leave a map half-updated: every
    // mutation is a single insert or remove.
    fn lock(&self) -> MutexGuard<'_, MockStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn get<T: Object + Clone>(map: &HashMap<String, T>, key: &str) -> Result<T, Error> {
    ensure_name(T::KIND, key)?;
    map.get(key).cloned().ok_or_else(|| Error::NotFound {
        kind: T::KIND,
        name: key.to_owned(),
    })
}

fn create<T: Object + Clone>(map: &mut HashMap<String, T>, object: &T) -> Result<(), Error> {
    ensure_addressable(object)?;
    let key = object.key();
    if map.contains_key(&key) {
        return Err(Error::AlreadyExists {
            kind: T::KIND,
            name: key,
        });
    }
    trace!(kind = T::KIND, %key, "mock create");
    map.insert(key, object.clone());
    Ok(())
}

fn update<T: Object + Clone>(map: &mut HashMap<String, T>, object: &T) -> Result<(), Error> {
    ensure_addressable(object)?;
    let key = object.key();
    match map.get_mut(&key) {
        Some(existing) => {
            trace!(kind = T::KIND, %key, "mock update");
            *existing = object.clone();
            Ok(())
        }
        None => Err(Error::NotFound {
            kind: T::KIND,
            name: key,
        }),
    }
}

fn delete<T: Object>(map: &mut HashMap<String, T>, key: &str) -> Result<(), Error> {
    ensure_name(T::KIND, key)?;
    match map.remove(key) {
        Some(_) => {
            trace!(kind = T::KIND, key, "mock delete");
            Ok(())
        }
        None => Err(Error::NotFound {
            kind: T::KIND,
            name: key.to_owned(),
        }),
    }
}

#[async_trait]
impl IcingaApi for MockClient {
    // ── Hosts ────────────────────────────────────────────────────────

    async fn get_host(&self, name: &str) -> Result<Host, Error> {
        get(&self.lock().hosts, name)
    }

    async fn create_host(&self, host: &Host) -> Result<(), Error> {
        create(&mut self.lock().hosts, host)
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, Error> {
        Ok(self.lock().hosts.values().cloned().collect())
    }

    async fn delete_host(&self, name: &str) -> Result<(), Error> {
        delete(&mut self.lock().hosts, name)
    }

    async fn update_host(&self, host: &Host) -> Result<(), Error> {
        update(&mut self.lock().hosts, host)
    }

    // ── Host groups ──────────────────────────────────────────────────

    async fn get_host_group(&self, name: &str) -> Result<HostGroup, Error> {
        get(&self.lock().host_groups, name)
    }

    async fn create_host_group(&self, group: &HostGroup) -> Result<(), Error> {
        create(&mut self.lock().host_groups, group)
    }

    async fn list_host_groups(&self) -> Result<Vec<HostGroup>, Error> {
        Ok(self.lock().host_groups.values().cloned().collect())
    }

    async fn delete_host_group(&self, name: &str) -> Result<(), Error> {
        delete(&mut self.lock().host_groups, name)
    }

    async fn update_host_group(&self, group: &HostGroup) -> Result<(), Error> {
        update(&mut self.lock().host_groups, group)
    }

    // ── Downtimes ────────────────────────────────────────────────────

    /// The mock keeps no downtimes.
    async fn list_downtimes(&self, _filter: Option<&str>) -> Result<Vec<Downtime>, Error> {
        Ok(Vec::new())
    }

    // ── Services ─────────────────────────────────────────────────────

    async fn get_service(&self, full_name: &str) -> Result<Service, Error> {
        get(&self.lock().services, full_name)
    }

    async fn create_service(&self, service: &Service) -> Result<(), Error> {
        create(&mut self.lock().services, service)
    }

    async fn list_services(&self, host_name: Option<&str>) -> Result<Vec<Service>, Error> {
        let store = self.lock();
        Ok(store
            .services
            .values()
            .filter(|svc| host_name.is_none_or(|host| svc.host_name == host))
            .cloned()
            .collect())
    }

    async fn delete_service(&self, full_name: &str) -> Result<(), Error> {
        delete(&mut self.lock().services, full_name)
    }

    async fn update_service(&self, service: &Service) -> Result<(), Error> {
        update(&mut self.lock().services, service)
    }

    // ── Actions ──────────────────────────────────────────────────────

    async fn process_check_result(
        &self,
        service: &Service,
        action: &Action,
    ) -> Result<(), Error> {
        ensure_addressable(service)?;
        self.lock()
            .actions
            .entry(service.full_name())
            .or_default()
            .push(action.clone());
        Ok(())
    }
}
