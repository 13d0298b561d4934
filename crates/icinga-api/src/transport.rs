// Transport configuration for building the reqwest::Client used by WebClient.
//
// Holds the TLS, connection reuse and verbosity knobs. Inputs are accepted
// as-is; the only failure is the TLS backend refusing to build.

use std::path::Path;
use std::time::Duration;

use crate::error::Error;

/// Transport configuration for the live client.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Log connection activity and response bodies.
    pub debug: bool,
    /// Skip certificate verification entirely.
    pub insecure: bool,
    /// Disable persistent connection reuse.
    pub disable_keep_alives: bool,
    /// Custom trust roots. When set they replace the platform trust store;
    /// when `None` the operating system's roots are used.
    pub root_certificates: Option<Vec<reqwest::Certificate>>,
    /// Overall request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("icinga-api/", env!("CARGO_PKG_VERSION")))
            .connection_verbose(self.debug);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if self.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref roots) = self.root_certificates {
            builder = builder.tls_built_in_root_certs(false);
            for cert in roots {
                builder = builder.add_root_certificate(cert.clone());
            }
        }

        if self.disable_keep_alives {
            builder = builder.pool_max_idle_per_host(0);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Use the certificates in the given PEM bundle as the trust roots.
    pub fn with_ca_bundle(mut self, path: &Path) -> Result<Self, Error> {
        self.root_certificates = Some(load_pem_bundle(path)?);
        Ok(self)
    }
}

/// Read every certificate from a PEM file.
pub fn load_pem_bundle(path: &Path) -> Result<Vec<reqwest::Certificate>, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("failed to read CA bundle {}: {e}", path.display())))?;
    let certs = reqwest::Certificate::from_pem_bundle(&pem)
        .map_err(|e| Error::Tls(format!("invalid CA bundle {}: {e}", path.display())))?;
    if certs.is_empty() {
        return Err(Error::Tls(format!(
            "CA bundle {} contains no certificates",
            path.display()
        )));
    }
    Ok(certs)
}
