#![allow(clippy::unwrap_used)]
// Integration tests for `WebClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use icinga_api::{
    Action, ClientConfig, Error, Host, HostGroup, IcingaApi, OperationKind, Service, WebClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WebClient) {
    let server = MockServer::start().await;
    let client = WebClient::with_client(
        reqwest::Client::new(),
        &format!("{}/", server.uri()),
        "root",
        SecretString::from("icinga".to_string()),
    );
    (server, client)
}

fn created(name: &str) -> serde_json::Value {
    json!({
        "results": [{ "code": 200.0, "status": "Object was created", "name": name, "type": "Host" }]
    })
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_host_puts_templates_and_attrs() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hosts/web01"))
        .and(basic_auth("root", "icinga"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({
            "templates": ["generic-host"],
            "attrs": { "address": "10.0.0.1", "check_command": "hostalive", "vars": { "os": "Linux" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("web01")))
        .expect(1)
        .mount(&server)
        .await;

    let host = Host::new("web01")
        .with_template("generic-host")
        .with_address("10.0.0.1")
        .with_check_command("hostalive")
        .with_var("os", "Linux");

    client.create_host(&host).await.unwrap();
}

#[tokio::test]
async fn test_create_item_failure_under_http_200() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hosts/x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "code": 200 },
                { "code": 500, "status": "error", "errors": ["bad name"] }
            ]
        })))
        .mount(&server)
        .await;

    let err = client.create_host(&Host::new("x")).await.unwrap_err();

    assert!(
        matches!(
            err,
            Error::Reconciliation {
                kind: OperationKind::Create,
                status: 200,
                ..
            }
        ),
        "expected Reconciliation, got: {err:?}"
    );
    assert_eq!(err.to_string(), "create /hosts/x : error bad name ");
}

#[tokio::test]
async fn test_create_http_500_without_body_items() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hosts/x"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let err = client.create_host(&Host::new("x")).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "create /hosts/x : 500 Internal Server Error - "
    );
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_create_http_500_reports_error_body_items() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hosts/web01"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "results": [{
                "code": 500.0,
                "status": "Object could not be created.",
                "errors": ["Object 'web01' of type 'Host' re-defined"]
            }]
        })))
        .mount(&server)
        .await;

    let err = client.create_host(&Host::new("web01")).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "create /hosts/web01 : 500 Internal Server Error - Object could not be created. Object 'web01' of type 'Host' re-defined "
    );
}

#[tokio::test]
async fn test_create_http_error_with_plain_text_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hostgroups/linux"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized. Please check your user credentials."))
        .mount(&server)
        .await;

    let err = client
        .create_host_group(&HostGroup::new("linux"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "create /hostgroups/linux : 401 Unauthorized - ");
}

#[tokio::test]
async fn test_create_service_path_uses_full_name() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/services/web01!http"))
        .and(body_partial_json(json!({ "attrs": { "check_command": "http" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("web01!http")))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_service(&Service::new("web01", "http").with_check_command("http"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_templated_create_leaves_unset_attrs_to_template() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hosts/web01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("web01")))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_host(&Host::new("web01").with_template("generic-host"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({ "templates": ["generic-host"], "attrs": {} }));
    assert!(body["attrs"].get("check_command").is_none());
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_host_posts_attrs() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/objects/hosts/web01"))
        .and(body_partial_json(json!({ "attrs": { "address": "10.0.0.2" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "code": 200.0, "status": "Attributes updated.", "name": "web01", "type": "Host" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_host(&Host::new("web01").with_address("10.0.0.2"))
        .await
        .unwrap();

    // Unset attributes must not overwrite server-side values.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({ "attrs": { "address": "10.0.0.2" } }));
}

#[tokio::test]
async fn test_update_failure_uses_update_kind() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/objects/services/web01!http"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "code": 500.0,
                "status": "Attribute could not be set.",
                "errors": ["Attribute 'check_command' is invalid", "Command 'nope' does not exist"]
            }]
        })))
        .mount(&server)
        .await;

    let err = client
        .update_service(&Service::new("web01", "http").with_check_command("nope"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "update /services/web01!http : Attribute could not be set. Attribute 'check_command' is invalid Command 'nope' does not exist "
    );
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_host_decodes_attrs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hosts/web01"))
        .and(basic_auth("root", "icinga"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "attrs": {
                    "name": "web01",
                    "display_name": "Web 01",
                    "address": "10.0.0.1",
                    "check_command": "hostalive",
                    "notes_url": "https://wiki/web01",
                    "vars": { "os": "Linux", "disks": { "/": { "warn": "20%" } } },
                    "zone": "master",
                    "groups": ["linux"],
                    "last_check": 1_700_000_000.0
                },
                "joins": {},
                "meta": {},
                "name": "web01",
                "type": "Host"
            }]
        })))
        .mount(&server)
        .await;

    let host = client.get_host("web01").await.unwrap();

    assert_eq!(host.name, "web01");
    assert_eq!(host.display_name, "Web 01");
    assert_eq!(host.address, "10.0.0.1");
    assert_eq!(host.notes_url, "https://wiki/web01");
    assert_eq!(host.zone.as_deref(), Some("master"));
    assert_eq!(host.groups, vec!["linux".to_string()]);
    assert_eq!(host.vars["disks"]["/"]["warn"], "20%");
}

#[tokio::test]
async fn test_get_missing_host_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hosts/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": 404, "status": "No objects found." })),
        )
        .mount(&server)
        .await;

    let err = client.get_host("ghost").await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
    assert_eq!(err.to_string(), "get /hosts/ghost : 404 Not Found");
}

#[tokio::test]
async fn test_get_non_canonical_status_renders_code_only() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hosts/web01"))
        .respond_with(ResponseTemplate::new(599))
        .mount(&server)
        .await;

    let err = client.get_host("web01").await.unwrap_err();
    assert_eq!(err.status(), Some(599));
    assert_eq!(err.to_string(), "get /hosts/web01 : 599");
}

#[tokio::test]
async fn test_get_with_empty_results_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hostgroups/linux"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let result = client.get_host_group("linux").await;
    assert!(matches!(result, Err(Error::NotFound { kind: "hostgroup", .. })));
}

#[tokio::test]
async fn test_get_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hosts/web01"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let result = client.get_host("web01").await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "<html>proxy</html>"),
        "expected Deserialization, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_hosts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "attrs": { "name": "web01" }, "name": "web01", "type": "Host" },
                { "attrs": { "name": "db01" }, "name": "db01", "type": "Host" }
            ]
        })))
        .mount(&server)
        .await;

    let names: Vec<String> = client
        .list_hosts()
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names, vec!["web01", "db01"]);
}

#[tokio::test]
async fn test_list_services_filters_by_host() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/services"))
        .and(query_param("filter", "host.name==\"web01\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "attrs": { "name": "http", "host_name": "web01", "check_command": "http" },
                "name": "web01!http",
                "type": "Service"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = client.list_services(Some("web01")).await.unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].full_name(), "web01!http");
}

#[tokio::test]
async fn test_list_services_escapes_host_name_in_filter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/services"))
        .and(query_param("filter", r#"host.name=="we\"b\\01""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let services = client.list_services(Some(r#"we"b\01"#)).await.unwrap();
    assert!(services.is_empty());
}

#[tokio::test]
async fn test_list_downtimes_passes_filter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/downtimes"))
        .and(query_param("filter", "host.name==\"web01\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "attrs": {
                    "name": "web01!abc",
                    "host_name": "web01",
                    "author": "ops",
                    "comment": "kernel update",
                    "start_time": 1_700_000_000.0,
                    "end_time": 1_700_003_600.0,
                    "fixed": true
                },
                "name": "web01!abc",
                "type": "Downtime"
            }]
        })))
        .mount(&server)
        .await;

    let downtimes = client
        .list_downtimes(Some("host.name==\"web01\""))
        .await
        .unwrap();
    assert_eq!(downtimes.len(), 1);
    assert_eq!(downtimes[0].author, "ops");
    assert!(!downtimes[0].is_service_downtime());
}

#[tokio::test]
async fn test_list_server_error_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hostgroups"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_host_groups().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Api {
            kind: OperationKind::List,
            status: 503,
            ..
        }
    ));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_host_group_get_and_update() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/objects/hostgroups/linux"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "attrs": { "name": "linux", "display_name": "Linux Servers", "vars": {} },
                "name": "linux",
                "type": "HostGroup"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/objects/hostgroups/linux"))
        .and(body_partial_json(json!({ "attrs": { "display_name": "Linux" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "code": 200.0, "status": "Attributes updated.", "name": "linux", "type": "HostGroup" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let group = client.get_host_group("linux").await.unwrap();
    assert_eq!(group.display_name, "Linux Servers");

    client
        .update_host_group(&group.with_display_name("Linux"))
        .await
        .unwrap();
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_host_cascades() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/objects/hosts/web01"))
        .and(query_param("cascade", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "code": 200.0, "status": "Object was deleted.", "name": "web01", "type": "Host" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_host("web01").await.unwrap();
}

#[tokio::test]
async fn test_delete_non_success_status_fails() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/objects/services/web01!http"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.delete_service("web01!http").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "delete /services/web01!http : 404 Not Found");
}

// ── Actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_process_check_result() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/actions/process-check-result"))
        .and(query_param("service", "web01!backup"))
        .and(body_partial_json(json!({
            "exit_status": 2,
            "plugin_output": "CRITICAL - backup failed",
            "performance_data": ["size=0B"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "code": 200.0, "status": "Successfully processed check result for object 'web01!backup'." }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let action = Action::new(2, "CRITICAL - backup failed").with_performance_data("size=0B");
    client
        .process_check_result(&Service::new("web01", "backup"), &action)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_process_check_result_failure_is_update_class() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/actions/process-check-result"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "results": [{ "code": 404.0, "status": "No objects found.", "errors": [] }]
        })))
        .mount(&server)
        .await;

    let err = client
        .process_check_result(&Service::new("web01", "backup"), &Action::new(0, "OK"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "update /services/web01!backup : 404 Not Found - No objects found.  "
    );
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_transport_error_short_circuits_reconciliation() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = WebClient::with_client(
        reqwest::Client::new(),
        &format!("http://{addr}"),
        "root",
        SecretString::from("icinga".to_string()),
    );

    let result = client.create_host(&Host::new("web01")).await;
    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_client_from_config_with_debug_and_no_keep_alive() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/hosts/web01"))
        .and(basic_auth("api", "pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("web01")))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(
        format!("{}//", server.uri()),
        "api",
        SecretString::from("pw".to_string()),
    );
    config.transport.debug = true;
    config.transport.disable_keep_alives = true;
    config.zone = Some("satellite".into());

    let client = WebClient::new(config).unwrap();
    assert_eq!(client.base_url(), server.uri());
    assert_eq!(client.zone(), Some("satellite"));

    client.create_host(&Host::new("web01")).await.unwrap();
    client.create_host(&Host::new("web01")).await.unwrap();
}

#[tokio::test]
async fn test_empty_names_fail_before_any_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(matches!(
        client.get_host("").await,
        Err(Error::InvalidName { kind: "host" })
    ));
    assert!(matches!(
        client.create_service(&Service::new("web01", "")).await,
        Err(Error::InvalidName { kind: "service" })
    ));
}
