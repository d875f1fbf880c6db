//! Integration coverage for `executor::Executor` against the fixture HTTP
//! server in `tests/support`.

mod support;

use std::time::Duration;

use httpspec::executor::Executor;
use httpspec::model::{Method, Request, Version};
use support::{FixtureHandle, FixtureResponse};

fn get_request(url: String) -> Request {
    Request {
        method: Method::Get,
        url,
        version: Version::Http11,
        headers: vec![],
        body: None,
        assertions: vec![],
        name: None,
    }
}

#[test]
fn executes_a_request_and_normalizes_the_response() {
    let server = FixtureHandle::spawn(|_req| async {
        FixtureResponse::new(404)
            .header("X-Trace", "abc123")
            .body("not found")
    });

    let executor = Executor::new(Duration::from_secs(2)).expect("build executor");
    let response = executor
        .execute(&get_request(server.url("/status/404")))
        .expect("execute request");

    assert_eq!(response.status, Some(404));
    assert_eq!(response.header("x-trace"), Some("abc123"));
    assert_eq!(response.body, b"not found");
}

#[test]
fn headers_are_sent_and_lowercased_on_the_way_back() {
    let server = FixtureHandle::spawn(|req| async move {
        let echoed = req
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("x-request-id"))
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        FixtureResponse::new(200).header("X-Echo", &echoed)
    });

    let mut request = get_request(server.url("/echo"));
    request.headers.push(("X-Request-Id".to_string(), "r-1".to_string()));

    let executor = Executor::new(Duration::from_secs(2)).expect("build executor");
    let response = executor.execute(&request).expect("execute request");

    assert_eq!(response.header("x-echo"), Some("r-1"));
}

#[test]
fn connection_refused_is_a_transport_error() {
    let executor = Executor::new(Duration::from_millis(200)).expect("build executor");
    let request = get_request("http://127.0.0.1:1/".to_string());
    let result = executor.execute(&request);
    assert!(result.is_err());
}
