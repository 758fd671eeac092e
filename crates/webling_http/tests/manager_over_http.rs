//! Integration tests running the entity manager over the HTTP transport.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;
use webling_core::{Entity, EntityManager, Method, QueryBuilder, WeblingError};
use webling_http::{ClientConfig, HttpClient, HttpRequest, HttpResponse, HttpTransport};

/// A client answering from a fixed route table keyed by method and path.
#[derive(Default)]
struct ScriptedClient {
    routes: HashMap<(Method, String), HttpResponse>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    fn route(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((method, path.to_string()), HttpResponse::new(status, body));
        self
    }
}

impl HttpClient for ScriptedClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let path = request
            .url
            .strip_prefix("https://demo.webling.ch/api/1")
            .and_then(|rest| rest.split('?').next())
            .ok_or_else(|| format!("unexpected URL {}", request.url))?
            .to_string();
        let method = request.method;
        self.sent.lock().push(request);

        self.routes
            .get(&(method, path))
            .cloned()
            .ok_or_else(|| "connection reset".to_string())
    }
}

fn manager(client: ScriptedClient) -> EntityManager<HttpTransport<ScriptedClient>> {
    EntityManager::new(HttpTransport::new(&ClientConfig::new("demo", "key"), client))
}

#[test]
fn find_and_update_member() {
    let client = ScriptedClient::default()
        .route(
            Method::Get,
            "/member/3",
            200,
            r#"{"type":"member","readonly":false,"properties":{"Name":"Muster"},"children":{},"parents":[1],"links":{}}"#,
        )
        .route(Method::Put, "/member/3", 204, "");
    let mut manager = manager(client);

    let member = manager.find("member", 3).unwrap();
    let again = manager.find("member", 3).unwrap();
    assert!(Arc::ptr_eq(&member, &again));

    member.write().set_property("Name", "Meier");
    manager.persist(&member).unwrap();

    let sent = manager.transport().client().sent.lock();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].method, Method::Put);
    assert!(sent[1].url.contains("apikey=key"));

    let body: serde_json::Value = serde_json::from_str(sent[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["properties"]["Name"], "Meier");
    assert_eq!(body.get("children"), None);
}

#[test]
fn create_assigns_id() {
    let client = ScriptedClient::default().route(Method::Post, "/membergroup", 201, "42");
    let mut manager = manager(client);

    let group = manager.attach(Entity::new("membergroup"));
    manager.persist(&group).unwrap();

    assert_eq!(group.read().id(), Some(42));
    assert!(manager.cache().contains("membergroup", 42));
}

#[test]
fn list_with_filter_and_order() {
    let client =
        ScriptedClient::default().route(Method::Get, "/member", 200, r#"{"objects":[5,4]}"#);
    let mut manager = manager(client);

    let query = QueryBuilder::new()
        .property("Ort")
        .is_in(["Bern", "Basel"])
        .into_query();
    let list = manager
        .find_by("member", &query, &[("Name", "ASC")], false)
        .unwrap();
    assert_eq!(list.ids(), &[5, 4]);

    let sent = manager.transport().client().sent.lock();
    assert_eq!(
        sent[0].url,
        "https://demo.webling.ch/api/1/member?apikey=key\
         &filter=Ort%20IN%20%28%22Bern%22%2C%20%22Basel%22%29\
         &order=Name%20ASC"
    );
}

#[test]
fn remote_errors_propagate() {
    let client = ScriptedClient::default()
        .route(Method::Get, "/member/9", 404, r#"{"error":"Object not found"}"#)
        .route(Method::Delete, "/member/3", 403, r#"{"error":"Permission denied"}"#);
    let mut manager = manager(client);

    assert_eq!(
        manager.find("member", 9).unwrap_err(),
        WeblingError::not_found("Object not found")
    );

    let member = manager.attach(Entity::new("member").with_id(3));
    assert_eq!(
        manager.remove(&member).unwrap_err(),
        WeblingError::api(403, "Permission denied")
    );
    assert_eq!(member.read().id(), Some(3));
    assert!(manager.cache().contains("member", 3));

    let err = manager.latest_revision().unwrap_err();
    assert_eq!(err, WeblingError::transport("connection reset"));
}

#[test]
fn replication() {
    let client = ScriptedClient::default()
        .route(Method::Get, "/replicate", 200, r#"{"revision":512}"#)
        .route(
            Method::Get,
            "/replicate/500",
            200,
            r#"{"revision":512,"document":{"created":[],"updated":[8],"deleted":[]}}"#,
        );
    let manager = manager(client);

    assert_eq!(manager.latest_revision().unwrap(), 512);

    let changes = manager.changes(500).unwrap();
    assert_eq!(changes.to_revision(), Some(512));
    assert_eq!(changes.updated("document").ids(), &[8]);
    assert!(changes.created("document").is_empty());
}
