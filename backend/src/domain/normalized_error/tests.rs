//! Tests for failure normalization.

use super::*;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn not_found_without_body() -> Failure {
    Failure::Transport(
        TransportFailure::new("Request failed with status code 404")
            .with_code("ERR_BAD_REQUEST")
            .with_status(404),
    )
}

#[rstest]
fn transport_status_without_body_appears_in_details(not_found_without_body: Failure) {
    let normalized = normalize(&not_found_without_body);
    assert_eq!(normalized.message(), "Request failed with status code 404");
    let details = normalized.details().expect("status details");
    assert!(details.contains("404"), "details were {details}");
    assert_eq!(normalized.code(), Some("ERR_BAD_REQUEST"));
}

#[rstest]
#[case(json!({"error": "Email is already verified", "message": "ignored"}), "Email is already verified")]
#[case(json!({"message": "Invalid token"}), "Invalid token")]
#[case(json!({"error": "", "message": "Invalid token"}), "Invalid token")]
#[case(json!({"unrelated": true}), "Request failed with status code 400")]
#[case(json!("not an object"), "Request failed with status code 400")]
fn transport_message_follows_preference_order(#[case] body: Value, #[case] expected: &str) {
    let failure = Failure::Transport(
        TransportFailure::new("Request failed with status code 400")
            .with_status(400)
            .with_body(body),
    );
    assert_eq!(normalize(&failure).message(), expected);
}

#[rstest]
fn transport_without_any_message_uses_fixed_literal() {
    let failure = Failure::Transport(TransportFailure::default());
    let normalized = normalize(&failure);
    assert_eq!(normalized.message(), API_REQUEST_FAILED);
    assert_eq!(normalized.details(), None);
    assert_eq!(normalized.code(), None);
}

#[rstest]
#[case(
    TransportFailure::new("x").with_status(502).with_status_text("Bad Gateway")
        .with_body(json!({"details": "upstream mail relay down"})),
    Some("upstream mail relay down")
)]
#[case(
    TransportFailure::new("x").with_status(502).with_status_text("Bad Gateway"),
    Some("Bad Gateway")
)]
#[case(
    TransportFailure::new("x").with_status(502).with_status_text(""),
    Some("Status code: 502")
)]
#[case(TransportFailure::new("x"), None)]
fn transport_details_follow_preference_order(
    #[case] transport: TransportFailure,
    #[case] expected: Option<&str>,
) {
    assert_eq!(normalize(&Failure::Transport(transport)).details(), expected);
}

#[rstest]
fn generic_failures_keep_message_with_fixed_details() {
    let failure = Failure::Generic(GenericFailure::new("x is undefined").expect("message"));
    let normalized = normalize(&failure);
    assert_eq!(normalized.message(), "x is undefined");
    assert_eq!(normalized.details(), Some(CLIENT_SIDE_DETAILS));
    assert_eq!(normalized.code(), None);
    assert_eq!(normalized.admin_hint(), None);
}

#[rstest]
fn rust_errors_normalize_as_generic() {
    let error = std::io::Error::other("connection reset");
    let normalized = normalize_error(&error);
    assert_eq!(normalized.message(), "connection reset");
    assert_eq!(normalized.details(), Some(CLIENT_SIDE_DETAILS));
}

#[rstest]
fn unknown_failures_use_fixed_default() {
    assert_eq!(normalize(&Failure::Unknown), NormalizedError::unexpected());
    assert_eq!(NormalizedError::unexpected().message(), UNEXPECTED_MESSAGE);
    assert_eq!(
        NormalizedError::unexpected().details(),
        Some(UNEXPECTED_DETAILS)
    );
}

#[rstest]
fn serialisation_omits_absent_fields() {
    let value = serde_json::to_value(NormalizedError::try_new("boom").expect("message"))
        .expect("serialise");
    assert_eq!(value, json!({"message": "boom"}));
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result = serde_json::from_value::<NormalizedError>(json!({"message": "  "}));
    assert!(result.is_err());
}

#[rstest]
fn code_enables_admin_hint() {
    let normalized = NormalizedError::from(TransportFailure::new("x").with_code("ERR_NETWORK"));
    assert_eq!(normalized.admin_hint(), Some(ADMIN_HINT));
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>().prop_map(|n| json!(n)),
        ".{0,16}".prop_map(Value::String),
        Just(Value::String("   ".to_owned())),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("name".to_owned()),
                    Just("message".to_owned()),
                    Just("isAxiosError".to_owned()),
                    Just("response".to_owned()),
                    Just("data".to_owned()),
                    Just("error".to_owned()),
                    Just("status".to_owned()),
                    Just("statusText".to_owned()),
                    Just("details".to_owned()),
                    Just("code".to_owned()),
                    "[a-z]{1,8}",
                ],
                inner,
                0..8,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn normalize_value_is_total(value in arb_json()) {
        let normalized = normalize_value(&value);
        prop_assert!(!normalized.message().trim().is_empty());
    }

    #[test]
    fn thrown_strings_always_use_fixed_default(text in ".*") {
        let normalized = normalize_value(&Value::String(text));
        prop_assert_eq!(normalized, NormalizedError::unexpected());
    }

    #[test]
    fn axios_flag_always_yields_non_empty_message(body in arb_json(), status in any::<u16>()) {
        let value = json!({
            "isAxiosError": true,
            "response": {"status": status, "data": body}
        });
        let normalized = normalize_value(&value);
        prop_assert!(!normalized.message().trim().is_empty());
        prop_assert!(normalized.details().is_some());
    }
}
