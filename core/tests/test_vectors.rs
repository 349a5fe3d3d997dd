//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Request vectors name an operation, its inputs and the request it must
//! produce. Response vectors give a simulated response and either the payload
//! or the normalized error message it must resolve to. Typed vectors feed
//! sparse and extended payloads through each response DTO. Bodies are compared
//! as parsed JSON, not raw strings, to avoid field-ordering noise.

use std::time::Duration;

use riding_core::{
    AccountsResponse, CheckAllResponse, CheckRecordResponse, Dispatcher, GenerateRecordResponse,
    HttpMethod, HttpRequest, HttpResponse, LoginResponse, RidingClient,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn build(client: &RidingClient, operation: &str, input: &Value) -> HttpRequest {
    let field = |name: &str| input[name].as_str().unwrap().to_string();
    match operation {
        "admin_login" => client.build_admin_login(&field("password")).unwrap(),
        "list_accounts" => client.build_list_accounts(),
        "batch_generate" => client.build_batch_generate(&strings(&input["usernames"])).unwrap(),
        "check_all" => client.build_check_all(),
        "check_riding_record" => client
            .build_check_riding_record(&field("username"), &field("password"))
            .unwrap(),
        "generate_riding_record" => client
            .build_generate_riding_record(&field("username"), &field("password"))
            .unwrap(),
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let client = RidingClient::new(base_url);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&client, case["operation"].as_str().unwrap(), &case["input"]);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(
            req.timeout,
            Duration::from_secs(expected["timeout_secs"].as_u64().unwrap()),
            "{name}: timeout"
        );
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())],
            "{name}: headers"
        );

        let body = match req.body.as_deref() {
            Some(body) => serde_json::from_str(body).unwrap(),
            None => Value::Null,
        };
        assert_eq!(body, expected["body"], "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let client = RidingClient::new("http://localhost:8000/api");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let dispatcher = match case["dispatcher"].as_str().unwrap() {
            "standard" => client.standard(),
            "generation" => client.generation(),
            other => panic!("unknown dispatcher: {other}"),
        };
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };

        let result = dispatcher.parse::<Value>(response);
        match case.get("expected_error") {
            Some(expected) => {
                let err = result.unwrap_err();
                assert_eq!(err.message(), expected.as_str().unwrap(), "{name}: error");
            }
            None => {
                assert_eq!(result.unwrap(), case["expected_payload"], "{name}: payload");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Typed payloads
// ---------------------------------------------------------------------------

/// Parse `response` into the named DTO and serialize it back, so sparse and
/// extended payloads can be checked field by field.
fn parse_typed(dispatcher: &Dispatcher, type_name: &str, response: HttpResponse) -> Value {
    fn roundtrip<T: DeserializeOwned + Serialize>(
        dispatcher: &Dispatcher,
        response: HttpResponse,
    ) -> Value {
        let typed: T = dispatcher.parse(response).unwrap();
        serde_json::to_value(typed).unwrap()
    }
    match type_name {
        "LoginResponse" => roundtrip::<LoginResponse>(dispatcher, response),
        "AccountsResponse" => roundtrip::<AccountsResponse>(dispatcher, response),
        "CheckAllResponse" => roundtrip::<CheckAllResponse>(dispatcher, response),
        "CheckRecordResponse" => roundtrip::<CheckRecordResponse>(dispatcher, response),
        "GenerateRecordResponse" => roundtrip::<GenerateRecordResponse>(dispatcher, response),
        other => panic!("unknown type: {other}"),
    }
}

#[test]
fn typed_payload_test_vectors() {
    let raw = include_str!("../../test-vectors/typed.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let client = RidingClient::new("http://localhost:8000/api");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let parsed = parse_typed(client.standard(), case["type"].as_str().unwrap(), response);

        for (pointer, expected) in case["expect"].as_object().unwrap() {
            assert_eq!(
                parsed.pointer(pointer),
                Some(expected),
                "{name}: {pointer} in {parsed}"
            );
        }
    }
}
