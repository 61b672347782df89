//! Environment-driven configuration. Tests mutate process env, so they run
//! serially.

mod common;

use std::env;

use serial_test::serial;
use session_backend::config::session::{
    SESSION_JWT_ALGORITHM, SESSION_JWT_KEY, SESSION_LIFETIME_SECONDS, SESSION_TOKEN_NAME,
    SESSION_TRANSPORT,
};
use session_backend::config::slack::{
    SLACK_ALERT_CHANNEL, SLACK_CHANNEL, SLACK_LEVEL, SLACK_USE_ATTACHMENT, SLACK_WEBHOOK_URL,
};
use session_backend::config::{SessionOptions, SlackSettings};
use session_backend::{SessionConfig, TransportKind};
use tracing::Level;

const ALL_VARS: [&str; 10] = [
    SESSION_JWT_KEY,
    SESSION_JWT_ALGORITHM,
    SESSION_LIFETIME_SECONDS,
    SESSION_TOKEN_NAME,
    SESSION_TRANSPORT,
    SLACK_WEBHOOK_URL,
    SLACK_LEVEL,
    SLACK_CHANNEL,
    SLACK_USE_ATTACHMENT,
    SLACK_ALERT_CHANNEL,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

fn set(var: &str, value: &str) {
    env::set_var(var, value);
}

#[test]
#[serial]
fn session_defaults_apply_when_only_key_is_set() {
    clear_env();
    set(SESSION_JWT_KEY, "s3cr3t");

    let config = SessionConfig::configure(SessionOptions::from_env().unwrap()).unwrap();

    assert_eq!(config.algorithm, jsonwebtoken::Algorithm::HS512);
    assert_eq!(config.lifetime_seconds, 900);
    assert_eq!(config.token_name, "X-Access-Token");
    assert_eq!(config.transport, TransportKind::Cookie);
    assert_eq!(config.issuer, None);
}

#[test]
#[serial]
fn session_overrides_are_read() {
    clear_env();
    set(SESSION_JWT_KEY, "s3cr3t");
    set(SESSION_JWT_ALGORITHM, "HS256");
    set(SESSION_LIFETIME_SECONDS, "60");
    set(SESSION_TOKEN_NAME, "sid");
    set(SESSION_TRANSPORT, "header");

    let config = SessionConfig::configure(SessionOptions::from_env().unwrap()).unwrap();

    assert_eq!(config.algorithm, jsonwebtoken::Algorithm::HS256);
    assert_eq!(config.lifetime_seconds, 60);
    assert_eq!(config.token_name, "sid");
    assert_eq!(config.transport, TransportKind::Header);
}

#[test]
#[serial]
fn missing_key_is_a_configuration_error() {
    clear_env();

    let err = SessionConfig::configure(SessionOptions::from_env().unwrap()).unwrap_err();
    assert!(err.to_string().contains("configuration"));
}

#[test]
#[serial]
fn bad_lifetime_is_reported() {
    clear_env();
    set(SESSION_LIFETIME_SECONDS, "soon");

    assert!(SessionOptions::from_env().is_err());
}

#[test]
#[serial]
fn oversized_lifetime_is_a_configuration_error() {
    clear_env();
    set(SESSION_JWT_KEY, "s3cr3t");
    set(SESSION_LIFETIME_SECONDS, &i64::MAX.to_string());

    let options = SessionOptions::from_env().unwrap();
    assert!(SessionConfig::configure(options).is_err());
}

#[test]
#[serial]
fn slack_disabled_without_webhook() {
    clear_env();
    set(SLACK_LEVEL, "warn");

    assert!(SlackSettings::from_env().unwrap().is_none());
}

#[test]
#[serial]
fn slack_settings_are_read() {
    clear_env();
    set(SLACK_WEBHOOK_URL, "https://hooks.slack.test/services/T0/B0/x");
    set(SLACK_LEVEL, "warn");
    set(SLACK_CHANNEL, "#alerts");
    set(SLACK_USE_ATTACHMENT, "false");
    set(SLACK_ALERT_CHANNEL, "yes");

    let settings = SlackSettings::from_env().unwrap().unwrap();

    assert_eq!(settings.level, Level::WARN);
    assert_eq!(settings.client.channel.as_deref(), Some("#alerts"));
    assert!(!settings.formatter.use_attachment);
    assert!(settings.formatter.alert_channel);
}

#[test]
#[serial]
fn slack_rejects_unknown_level() {
    clear_env();
    set(SLACK_WEBHOOK_URL, "https://hooks.slack.test/services/T0/B0/x");
    set(SLACK_LEVEL, "loud");

    assert!(SlackSettings::from_env().is_err());
}
