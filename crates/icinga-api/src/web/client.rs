// Icinga 2 API HTTP client
//
// Wraps `reqwest::Client` with basic auth, `/v1/objects` URL construction and
// bulk-response reconciliation. The `IcingaApi` impl in `objects.rs` stays
// focused on per-object paths and bodies.

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, OperationKind};
use crate::models::ObjectResults;
use crate::reconcile::{Exchange, reconcile, status_text};
use crate::transport::TransportConfig;

/// Everything needed to construct a [`WebClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://icinga.example.com:5665`. Trailing slashes are
    /// stripped.
    pub url: String,
    pub username: String,
    pub password: SecretString,
    /// Zone label. Carried for callers; not interpreted by the client.
    pub zone: Option<String>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password,
            zone: None,
            transport: TransportConfig::default(),
        }
    }
}

/// HTTP client for the Icinga 2 object API.
///
/// Every create, update and action response goes through
/// [`reconcile`](crate::reconcile::reconcile); reads and deletes only check
/// the HTTP status.
pub struct WebClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: SecretString,
    zone: Option<String>,
    debug: bool,
}

impl WebClient {
    /// Build the transport from `config` and create a client.
    ///
    /// Inputs are not validated. Fails only if the TLS backend cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let client = Self::with_client(http, &config.url, config.username, config.password)
            .with_debug(config.transport.debug);
        Ok(match config.zone {
            Some(zone) => client.with_zone(zone),
            None => client,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            username: username.into(),
            password,
            zone: None,
            debug: false,
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Log request and response bodies at `debug` level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The API root, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/v1/objects{path}`
    pub(crate) fn objects_url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}/v1/objects{path}", self.base_url))?)
    }

    /// `{base}/v1/actions/{action}`
    pub(crate) fn actions_url(&self, action: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}/v1/actions/{action}", self.base_url))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(ACCEPT, "application/json")
    }

    // ── Bulk mutations ───────────────────────────────────────────────

    /// `PUT {base}/v1/objects{path}`, reconciled as a create.
    pub async fn create_object(&self, path: &str, body: &impl Serialize) -> Result<(), Error> {
        let url = self.objects_url(path)?;
        debug!("PUT {}", url);

        let outcome = self.exchange(self.request(Method::PUT, url), body).await;
        reconcile(OperationKind::Create, path, outcome)
    }

    /// `POST {base}/v1/objects{path}`, reconciled as an update.
    pub async fn update_object(&self, path: &str, body: &impl Serialize) -> Result<(), Error> {
        let url = self.objects_url(path)?;
        debug!("POST {}", url);

        let outcome = self.exchange(self.request(Method::POST, url), body).await;
        reconcile(OperationKind::Update, path, outcome)
    }

    /// `POST {base}/v1/actions/{action}?{query}`, reconciled as an update
    /// against `target`.
    pub(crate) async fn post_action(
        &self,
        action: &str,
        query: &[(&str, &str)],
        target: &str,
        body: &impl Serialize,
    ) -> Result<(), Error> {
        let url = self.actions_url(action)?;
        debug!("POST {} {:?}", url, query);

        let builder = self.request(Method::POST, url).query(query);
        let outcome = self.exchange(builder, body).await;
        reconcile(OperationKind::Update, target, outcome)
    }

    /// Send a JSON body and route the response into an [`Exchange`].
    async fn exchange(
        &self,
        builder: RequestBuilder,
        body: &impl Serialize,
    ) -> Result<Exchange, Error> {
        if self.debug {
            if let Ok(json) = serde_json::to_string(body) {
                debug!(body = %json, "request body");
            }
        }

        let resp = builder.json(body).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;

        if self.debug {
            debug!(%status, body = %text, "response body");
        }

        Exchange::from_body(status, &text)
    }

    // ── Reads and deletes ────────────────────────────────────────────

    /// `GET {base}/v1/objects{path}` and unwrap the `attrs` of every result.
    pub(crate) async fn query_objects<T: DeserializeOwned>(
        &self,
        kind: OperationKind,
        path: &str,
        filter: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.objects_url(path)?;
        debug!("GET {} filter={:?}", url, filter);

        let mut builder = self.request(Method::GET, url);
        if let Some(filter) = filter {
            builder = builder.query(&[("filter", filter)]);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;
        let body = self.checked_body(kind, path, resp).await?;

        let envelope: ObjectResults<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;
        Ok(envelope.into_attrs())
    }

    /// `DELETE {base}/v1/objects{path}?cascade=1`
    ///
    /// Cascading removes dependent objects (a host's services, a service's
    /// downtimes) instead of refusing the delete.
    pub(crate) async fn delete_object(&self, path: &str) -> Result<(), Error> {
        let url = self.objects_url(path)?;
        debug!("DELETE {}", url);

        let resp = self
            .request(Method::DELETE, url)
            .query(&[("cascade", "1")])
            .send()
            .await
            .map_err(Error::Transport)?;
        self.checked_body(OperationKind::Delete, path, resp).await?;
        Ok(())
    }

    /// Read the body, failing with `Error::Api` on a non-2xx status.
    async fn checked_body(
        &self,
        kind: OperationKind,
        target: &str,
        resp: reqwest::Response,
    ) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if self.debug {
            debug!(%status, body = %body, "response body");
        }

        if !status.is_success() {
            return Err(Error::Api {
                kind,
                target: target.to_owned(),
                status: status.as_u16(),
                message: status_text(status),
            });
        }
        Ok(body)
    }
}
