//! Property tests for the token codec.
//!
//! Increase cases locally with: PROPTEST_CASES=800 cargo test --test session_props

mod common;

use proptest::prelude::*;
use serde_json::{Map, Value};
use session_backend::session::{DecodeFailure, DecodeResult, SessionClaims, TokenCodec};
use session_backend::SessionConfig;

const NOW: i64 = 1_700_000_000;

fn codec(key: &str) -> TokenCodec {
    TokenCodec::new(&SessionConfig::new(key).unwrap())
}

/// Application claims; lifecycle names are excluded by construction.
fn app_claims() -> impl Strategy<Value = Map<String, Value>> {
    let value = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 _.-]{0,24}".prop_map(Value::from),
    ];
    prop::collection::btree_map("app_[a-z]{1,8}", value, 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

fn with_window(mut map: Map<String, Value>, nbf: i64, exp: i64) -> SessionClaims {
    map.insert("nbf".to_string(), Value::from(nbf));
    map.insert("exp".to_string(), Value::from(exp));
    SessionClaims::from(map)
}

proptest! {
    #![proptest_config(common::proptest_config())]

    #[test]
    fn roundtrip_inside_window(
        map in app_claims(),
        nbf_back in 0i64..10_000,
        exp_ahead in 1i64..100_000,
    ) {
        let codec = codec("k1");
        let claims = with_window(map, NOW - nbf_back, NOW + exp_ahead);
        let token = codec.encode(&claims).unwrap();

        prop_assert_eq!(codec.decode(&token, NOW), DecodeResult::Valid(claims));
    }

    #[test]
    fn expired_tokens_never_decode(map in app_claims(), ago in 0i64..100_000) {
        let codec = codec("k1");
        let token = codec.encode(&with_window(map, NOW - 200_000, NOW - ago)).unwrap();

        prop_assert_eq!(codec.decode(&token, NOW), DecodeResult::Invalid(DecodeFailure::Expired));
    }

    #[test]
    fn premature_tokens_never_decode(map in app_claims(), ahead in 1i64..100_000) {
        let codec = codec("k1");
        let token = codec.encode(&with_window(map, NOW + ahead, NOW + 200_000)).unwrap();

        prop_assert_eq!(codec.decode(&token, NOW), DecodeResult::Invalid(DecodeFailure::Premature));
    }

    #[test]
    fn other_key_never_verifies(
        map in app_claims(),
        k1 in "[a-z0-9]{8,16}",
        k2 in "[A-Z]{8,16}",
    ) {
        let token = codec(&k1).encode(&with_window(map, NOW, NOW + 900)).unwrap();

        prop_assert_eq!(
            codec(&k2).decode(&token, NOW),
            DecodeResult::Invalid(DecodeFailure::InvalidSignature)
        );
    }
}
