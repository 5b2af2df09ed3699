//! Unit tests for the signing engine

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::{AccessClaims, Identity};
use crate::errors::TokenError;
use crate::services::token::SigningEngine;

const SECRET: &str = "signing-engine-test-secret";
const ISSUER: &str = "tessera-api";

fn claims_at(issued_at: chrono::DateTime<Utc>) -> AccessClaims {
    AccessClaims::new(&Identity::new("u1").unwrap(), issued_at, Duration::minutes(15), ISSUER)
}

/// Replaces one character in the middle of the signature segment
fn tamper_signature(token: &str) -> String {
    let dot = token.rfind('.').unwrap();
    let mut chars: Vec<char> = token.chars().collect();
    let target = dot + (token.len() - dot) / 2;
    chars[target] = if chars[target] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[test]
fn test_empty_secret_rejected() {
    let result = SigningEngine::new("", ISSUER, 0);
    assert!(matches!(result, Err(TokenError::Signing(_))));
}

#[test]
fn test_sign_then_verify() {
    let engine = SigningEngine::new(SECRET, ISSUER, 0).unwrap();
    let now = Utc::now();
    let claims = claims_at(now);

    let token = engine.sign(&claims).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let verified = engine.verify(&token, now).unwrap();
    assert_eq!(verified, claims);
}

#[test]
fn test_expired_is_not_reported_as_bad_signature() {
    let engine = SigningEngine::new(SECRET, ISSUER, 0).unwrap();
    let issued = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let token = engine.sign(&claims_at(issued)).unwrap();

    assert!(engine.verify(&token, issued + Duration::minutes(14)).is_ok());
    assert!(matches!(
        engine.verify(&token, issued + Duration::minutes(15)),
        Err(TokenError::Expired)
    ));
}

#[test]
fn test_leeway_extends_window() {
    let engine = SigningEngine::new(SECRET, ISSUER, 30).unwrap();
    let issued = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let token = engine.sign(&claims_at(issued)).unwrap();

    assert!(engine.verify(&token, issued + Duration::minutes(15) + Duration::seconds(29)).is_ok());
    assert!(matches!(
        engine.verify(&token, issued + Duration::minutes(15) + Duration::seconds(30)),
        Err(TokenError::Expired)
    ));
    assert!(engine.verify(&token, issued - Duration::seconds(30)).is_ok());
}

#[test]
fn test_not_yet_valid() {
    let engine = SigningEngine::new(SECRET, ISSUER, 0).unwrap();
    let issued = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let token = engine.sign(&claims_at(issued)).unwrap();

    assert!(matches!(
        engine.verify(&token, issued - Duration::seconds(1)),
        Err(TokenError::NotYetValid)
    ));
}

#[test]
fn test_tampered_signature() {
    let engine = SigningEngine::new(SECRET, ISSUER, 0).unwrap();
    let now = Utc::now();
    let token = engine.sign(&claims_at(now)).unwrap();

    let tampered = tamper_signature(&token);
    assert_ne!(tampered, token);
    assert!(matches!(engine.verify(&tampered, now), Err(TokenError::InvalidSignature)));
}

#[test]
fn test_foreign_key_or_issuer_is_invalid_signature() {
    let now = Utc::now();
    let ours = SigningEngine::new(SECRET, ISSUER, 0).unwrap();

    let other_key = SigningEngine::new("another-secret", ISSUER, 0).unwrap();
    let token = other_key.sign(&claims_at(now)).unwrap();
    assert!(matches!(ours.verify(&token, now), Err(TokenError::InvalidSignature)));

    let other_issuer = SigningEngine::new(SECRET, "someone-else", 0).unwrap();
    let foreign = AccessClaims::new(&Identity::new("u1").unwrap(), now, Duration::minutes(15), "someone-else");
    let token = other_issuer.sign(&foreign).unwrap();
    assert!(matches!(ours.verify(&token, now), Err(TokenError::InvalidSignature)));
}

#[test]
fn test_structural_damage_is_malformed() {
    let engine = SigningEngine::new(SECRET, ISSUER, 0).unwrap();
    let now = Utc::now();
    let token = engine.sign(&claims_at(now)).unwrap();

    let without_dot = token.replacen('.', "", 1);
    assert!(matches!(engine.verify(&without_dot, now), Err(TokenError::Malformed)));
    assert!(matches!(engine.verify("", now), Err(TokenError::Malformed)));
    assert!(matches!(engine.verify("not-a-token", now), Err(TokenError::Malformed)));
}

#[test]
fn test_debug_does_not_leak_secret() {
    let engine = SigningEngine::new(SECRET, ISSUER, 0).unwrap();
    assert!(!format!("{:?}", engine).contains(SECRET));
}
