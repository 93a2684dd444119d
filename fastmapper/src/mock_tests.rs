use crate::{
    client::Body,
    core::{GroupKind, GroupVersionKind, GroupVersionResource, MappingError},
    fast_discovery_rest_mapper, Client, Error, LoaderStatus,
};
use anyhow::Result;
use futures::{future::join_all, poll};
use http::{Request, Response, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn discovers_allowed_groups_on_first_query() -> Result<()> {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::AllowedGroups);

    let mapper = fast_discovery_rest_mapper(client);
    assert_eq!(mapper.status(), LoaderStatus::Unloaded);

    let deploy = mapper
        .rest_mapping(&GroupKind::gk("apps", "Deployment"), &[])
        .await?;
    assert_eq!(deploy.gvk, GroupVersionKind::gvk("apps", "v1", "Deployment"));
    assert_eq!(
        deploy.url_path(Some("default")),
        "/apis/apps/v1/namespaces/default/deployments"
    );
    timeout_after_1s(mocksrv).await;

    // the mock apiserver is gone, so these are answered from the cached mapper
    let pods = mapper.resource_for(&GroupVersionResource::resource("pod")).await?;
    assert_eq!(pods, GroupVersionResource::gvr("", "v1", "pods"));
    let ns = mapper.rest_mapping(&GroupKind::gk("", "Namespace"), &["v1"]).await?;
    assert_eq!(ns.url_path(Some("default")), "/api/v1/namespaces");

    // custom.io is not in the default allow-list; apps/v1beta1 failed to list
    let widgets = mapper.kind_for(&GroupVersionResource::gvr("custom.io", "v1", "widgets")).await;
    assert!(matches!(widgets, Err(Error::Mapping(MappingError::NoResourceMatch(_)))));
    let legacy = mapper
        .rest_mapping(&GroupKind::gk("apps", "Deployment"), &["v1beta1"])
        .await;
    assert!(matches!(legacy, Err(Error::Mapping(MappingError::NoKindMatch { .. }))));
    assert_eq!(mapper.status(), LoaderStatus::Loaded);
    Ok(())
}

#[tokio::test]
async fn concurrent_first_queries_share_discovery() -> Result<()> {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::AllowedGroups);

    let mapper = fast_discovery_rest_mapper(client);
    let mut pending = Box::pin(join_all((0..5).map(|_| mapper.mapper())));
    assert!(poll!(pending.as_mut()).is_pending());
    assert_eq!(mapper.status(), LoaderStatus::Loading);

    // the scenario answers one discovery run; a second run would fail on a closed service
    let loaded = pending.await.into_iter().collect::<Result<Vec<_>, _>>()?;
    assert!(loaded.iter().all(|m| std::sync::Arc::ptr_eq(m, &loaded[0])));
    timeout_after_1s(mocksrv).await;
    Ok(())
}

#[tokio::test]
async fn group_list_failure_fails_the_query() -> Result<()> {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::CoreGroupFailure);

    let mapper = fast_discovery_rest_mapper(client);
    let err = mapper
        .kind_for(&GroupVersionResource::resource("pods"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MapperLoad(_)));
    assert_eq!(err.api_response().map(|r| r.code), Some(500));
    assert_eq!(mapper.status(), LoaderStatus::Failed);
    timeout_after_1s(mocksrv).await;
    Ok(())
}

// ------------------------------------------------------------------------
// mock test setup cruft
// ------------------------------------------------------------------------

// We wrap tower_test::mock::Handle
type ApiServerHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;
struct ApiServerVerifier(ApiServerHandle);

async fn timeout_after_1s(handle: tokio::task::JoinHandle<()>) {
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("timeout on mock apiserver")
        .expect("scenario succeeded")
}

/// Scenarios we test for in ApiServerVerifier above
enum Scenario {
    /// Full discovery of a small cluster with one failing group version
    AllowedGroups,
    /// The legacy `/api` endpoint errors before any group is discovered
    CoreGroupFailure,
}

impl ApiServerVerifier {
    /// Tests only get to run specific scenarios that has matching handlers
    ///
    /// NB: If the test is causing more calls than we are handling in the scenario,
    /// you then typically see an `Error::Service` from the test.
    ///
    /// You should await the `JoinHandle` (with a timeout) from this function to ensure that the
    /// scenario runs to completion (i.e. all expected calls were responded to),
    /// using the timeout to catch missing api calls to Kubernetes.
    fn run(self, scenario: Scenario) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            // moving self => one scenario per test
            match scenario {
                Scenario::AllowedGroups => {
                    self.handle_group_list()
                        .await
                        .unwrap()
                        .handle_group_versions()
                        .await
                }
                Scenario::CoreGroupFailure => self.handle_core_failure().await,
            }
            .expect("scenario completed without errors");
        })
    }

    // chainable scenario handlers

    async fn handle_group_list(mut self) -> Result<Self> {
        {
            let (request, send) = self.0.next_request().await.expect("service not called 1");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(request.uri().to_string(), "/api");
            let respdata = json!({
                "kind": "APIVersions",
                "versions": ["v1"],
                "serverAddressByClientCIDRs": [],
            });
            send.send_response(ok(respdata));
        }
        {
            let (request, send) = self.0.next_request().await.expect("service not called 2");
            assert_eq!(request.uri().to_string(), "/apis");
            let respdata = json!({
                "kind": "APIGroupList",
                "apiVersion": "v1",
                "groups": [
                    group("apps", &["v1", "v1beta1"]),
                    group("custom.io", &["v1"]),
                ],
            });
            send.send_response(ok(respdata));
        }
        Ok(self)
    }

    // one task per allowed group, so these arrive in any order
    async fn handle_group_versions(mut self) -> Result<Self> {
        let mut seen = vec![];
        for _ in 0..3 {
            let (request, send) = self.0.next_request().await.expect("group version not discovered");
            let path = request.uri().to_string();
            let response = match path.as_str() {
                "/api/v1" => ok(resource_list("v1", &[
                    ("pods", "Pod", true),
                    ("pods/log", "Pod", true),
                    ("namespaces", "Namespace", false),
                ])),
                "/apis/apps/v1" => ok(resource_list("apps/v1", &[("deployments", "Deployment", true)])),
                "/apis/apps/v1beta1" => status(StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailable"),
                other => panic!("unexpected discovery of {other}"),
            };
            send.send_response(response);
            seen.push(path);
        }
        seen.sort();
        assert_eq!(seen, vec!["/api/v1", "/apis/apps/v1", "/apis/apps/v1beta1"]);
        Ok(self)
    }

    async fn handle_core_failure(mut self) -> Result<Self> {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.uri().to_string(), "/api");
        send.send_response(status(StatusCode::INTERNAL_SERVER_ERROR, "InternalError"));
        Ok(self)
    }
}

fn group(name: &str, versions: &[&str]) -> Value {
    let versions: Vec<_> = versions
        .iter()
        .map(|v| json!({ "groupVersion": format!("{name}/{v}"), "version": v }))
        .collect();
    json!({
        "name": name,
        "versions": versions,
        "preferredVersion": versions[0],
    })
}

fn resource_list(group_version: &str, resources: &[(&str, &str, bool)]) -> Value {
    let resources: Vec<_> = resources
        .iter()
        .map(|(name, kind, namespaced)| {
            json!({
                "name": name,
                "singularName": "",
                "kind": kind,
                "namespaced": namespaced,
                "verbs": ["get", "list", "watch"],
            })
        })
        .collect();
    json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": group_version,
        "resources": resources,
    })
}

fn ok(data: Value) -> Response<Body> {
    let response = serde_json::to_vec(&data).unwrap(); // respond as the apiserver would have
    Response::builder().body(Body::from(response)).unwrap()
}

fn status(code: StatusCode, reason: &str) -> Response<Body> {
    let data = json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("the server is currently unable to handle the request ({reason})"),
        "reason": reason,
        "code": code.as_u16(),
    });
    Response::builder()
        .status(code)
        .body(Body::from(serde_json::to_vec(&data).unwrap()))
        .unwrap()
}

// Create a test context with a mocked discovery client
fn testcontext() -> (Client, ApiServerVerifier) {
    let (mock_service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
    let mock_client = Client::new(mock_service, "default");
    (mock_client, ApiServerVerifier(handle))
}
