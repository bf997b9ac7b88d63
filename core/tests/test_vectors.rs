//! Verify requests and response handling against JSON vectors in `test-vectors/`.
//!
//! Each case names an operation, the request the client must send, a
//! simulated response, and either the parsed result or the expected error.
//! Results are compared as parsed JSON so field order does not matter.

use std::sync::Mutex;

use redisgreen_core::{
    ApiError, ClientConfig, CreateMonitor, CreateServer, HttpMethod, HttpRequest, HttpResponse,
    Monitor, RedisGreenClient, Server, Transport,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:4100";
const TOKEN: &str = "vector-token";
const USER_AGENT: &str = "redisgreen-vectors/1.0";

/// Answers every request with one canned response and remembers the request.
struct Replay {
    response: HttpResponse,
    sent: Mutex<Option<HttpRequest>>,
}

impl Transport for Replay {
    fn send(&self, request: &HttpRequest) -> redisgreen_core::Result<HttpResponse> {
        *self.sent.lock().unwrap() = Some(request.clone());
        Ok(self.response.clone())
    }
}

fn replay_client(case: &Value) -> RedisGreenClient<Replay> {
    let sim = &case["simulated_response"];
    let response = HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
    };
    RedisGreenClient::with_transport(
        TOKEN,
        ClientConfig::default()
            .with_base_url(BASE_URL)
            .with_user_agent(USER_AGENT),
        Replay {
            response,
            sent: Mutex::new(None),
        },
    )
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, client: &RedisGreenClient<Replay>, expected: &Value) {
    let req = client
        .transport()
        .sent
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| panic!("{name}: no request sent"));

    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    assert_eq!(req.header("Accept"), Some("application/vnd.redisgreen.1+json"), "{name}: accept");
    assert_eq!(req.header("Content-Type"), Some("application/json"), "{name}: content-type");
    assert_eq!(req.header("User-Agent"), Some(USER_AGENT), "{name}: user-agent");
    assert_eq!(req.header("X-API-Token"), Some(TOKEN), "{name}: token");

    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

/// Compare an outcome with the case's `expected_result` / `expected_error`.
fn check_outcome<T: serde::Serialize + std::fmt::Debug>(name: &str, case: &Value, outcome: Result<T, ApiError>) {
    match case.get("expected_error") {
        Some(expected) => {
            let err = outcome.unwrap_err();
            match expected["kind"].as_str().unwrap() {
                "Service" => {
                    assert!(matches!(err, ApiError::Service { .. }), "{name}: expected Service, got {err:?}");
                    assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
                }
                "Deserialization" => {
                    assert!(matches!(err, ApiError::Deserialization(_)), "{name}: expected Deserialization, got {err:?}");
                }
                other => panic!("{name}: unknown expected_error kind: {other}"),
            }
        }
        None => {
            let value = outcome.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
            if let Some(expected) = case.get("expected_result") {
                assert_eq!(&serde_json::to_value(&value).unwrap(), expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Servers
// ---------------------------------------------------------------------------

#[test]
fn server_test_vectors() {
    let raw = include_str!("../../test-vectors/servers.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let client = replay_client(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                let outcome: Result<Vec<Server>, _> = client.list_servers();
                check_outcome(name, case, outcome);
            }
            "create" => {
                let input = &case["input"];
                let create = CreateServer::new(
                    input["name"].as_str().unwrap(),
                    input["plan"].as_str().unwrap(),
                )
                .in_region(input["region"].as_str().unwrap())
                .with_replicas(input["replica_count"].as_u64().unwrap() as u32);
                check_outcome(name, case, client.create_server(&create));
            }
            "get" => {
                let id = case["input_id"].as_str().unwrap();
                check_outcome(name, case, client.get_server(id));
            }
            "delete" => {
                let id = case["input_id"].as_str().unwrap();
                check_outcome(name, case, client.delete_server(id));
            }
            other => panic!("{name}: unknown operation {other}"),
        }

        check_request(name, &client, &case["expected_request"]);
    }
}

// ---------------------------------------------------------------------------
// Monitors
// ---------------------------------------------------------------------------

#[test]
fn monitor_test_vectors() {
    let raw = include_str!("../../test-vectors/monitors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let client = replay_client(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                let outcome: Result<Vec<Monitor>, _> = client.list_monitors();
                check_outcome(name, case, outcome);
            }
            "create" => {
                let input = &case["input"];
                let create = CreateMonitor::new(
                    input["name"].as_str().unwrap(),
                    input["url"].as_str().unwrap(),
                );
                check_outcome(name, case, client.create_monitor(&create));
            }
            "get" => {
                let id = case["input_id"].as_str().unwrap();
                check_outcome(name, case, client.get_monitor(id));
            }
            "delete" => {
                let id = case["input_id"].as_str().unwrap();
                check_outcome(name, case, client.delete_monitor(id));
            }
            other => panic!("{name}: unknown operation {other}"),
        }

        check_request(name, &client, &case["expected_request"]);
    }
}
