//! Unit tests for session credential entities

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{
    AccessClaims, ClientContext, CredentialState, RefreshCredential, TokenPair, MAX_IP_ADDRESS_CHARS,
    MAX_USER_AGENT_CHARS,
};

fn identity() -> Identity {
    Identity::new("u1").unwrap()
}

#[test]
fn test_access_claims_timestamps() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let claims = AccessClaims::new(&identity(), t0, Duration::minutes(15), "tessera-api");

    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.iss, "tessera-api");
    assert_eq!(claims.iat, t0.timestamp());
    assert_eq!(claims.nbf, t0.timestamp());
    assert_eq!(claims.exp, t0.timestamp() + 15 * 60);
    assert!(claims.exp > claims.iat);
    assert_eq!(claims.expires_at(), Some(t0 + Duration::minutes(15)));
    assert_eq!(claims.identity().unwrap(), identity());
}

#[test]
fn test_access_claims_expiry_boundary() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let claims = AccessClaims::new(&identity(), t0, Duration::minutes(15), "iss");

    assert!(!claims.is_expired_at(t0 + Duration::minutes(14), 0));
    assert!(claims.is_expired_at(t0 + Duration::minutes(15), 0));
    // Skew extends the window
    assert!(!claims.is_expired_at(t0 + Duration::minutes(15), 30));
}

#[test]
fn test_access_claims_not_before() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let claims = AccessClaims::new(&identity(), t0, Duration::minutes(15), "iss");

    assert!(claims.is_premature_at(t0 - Duration::seconds(10), 0));
    assert!(!claims.is_premature_at(t0 - Duration::seconds(10), 10));
    assert!(!claims.is_premature_at(t0, 0));
}

#[test]
fn test_refresh_credential_creation() {
    let now = Utc::now();
    let client = ClientContext::new(Some("10.0.0.1".to_string()), Some("curl/8".to_string()));
    let credential = RefreshCredential::new(identity(), "hash".to_string(), now, Duration::minutes(3600))
        .with_client(&client);

    assert_eq!(credential.identity, identity());
    assert_eq!(credential.token_hash, "hash");
    assert_eq!(credential.expires_at, now + Duration::minutes(3600));
    assert_eq!(credential.created_from_ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(credential.user_agent.as_deref(), Some("curl/8"));
    assert!(credential.revoked_at.is_none());
    assert!(credential.is_usable_at(now));
    assert_eq!(credential.state_at(now), CredentialState::Active);
}

#[test]
fn test_refresh_credential_expiry() {
    let now = Utc::now();
    let credential = RefreshCredential::new(identity(), "hash".to_string(), now, Duration::minutes(10));

    assert!(credential.is_usable_at(now + Duration::minutes(9)));
    assert!(!credential.is_usable_at(now + Duration::minutes(10)));
    assert_eq!(credential.state_at(now + Duration::minutes(11)), CredentialState::Expired);
}

#[test]
fn test_refresh_credential_revocation_is_permanent() {
    let now = Utc::now();
    let mut credential = RefreshCredential::new(identity(), "hash".to_string(), now, Duration::minutes(10));

    let first = now + Duration::minutes(1);
    assert!(credential.revoke(first));
    assert_eq!(credential.revoked_at, Some(first));

    // Second revoke keeps the original timestamp
    assert!(!credential.revoke(now + Duration::minutes(2)));
    assert_eq!(credential.revoked_at, Some(first));
    assert!(!credential.is_usable_at(now));
}

#[test]
fn test_revoked_wins_over_expired() {
    let now = Utc::now();
    let mut credential = RefreshCredential::new(identity(), "hash".to_string(), now, Duration::minutes(1));
    credential.revoke(now);

    assert_eq!(credential.state_at(now + Duration::hours(1)), CredentialState::Revoked);
}

#[test]
fn test_token_pair_debug_redacts_tokens() {
    let now = Utc::now();
    let pair = TokenPair {
        access_token: "eyJhbGciOiJIUzI1NiJ9.secret.sig".to_string(),
        access_token_expires_at: now + Duration::minutes(15),
        refresh_token: "opaque-refresh-secret".to_string(),
        refresh_token_expires_at: now + Duration::minutes(3600),
    };

    let debug = format!("{:?}", pair);
    assert!(!debug.contains("opaque-refresh-secret"));
    assert!(!debug.contains("eyJhbGciOiJIUzI1NiJ9"));
    assert_eq!(pair.access_expires_in(now), 15 * 60);
}

#[test]
fn test_client_context_strips_port_from_address() {
    let v4 = ClientContext::new(Some("198.51.100.4:51234".to_string()), None);
    assert_eq!(v4.ip_address.as_deref(), Some("198.51.100.4"));

    let v6 = ClientContext::new(Some("[2001:db8:85a3::8a2e:370:7334]:65535".to_string()), None);
    assert_eq!(v6.ip_address.as_deref(), Some("2001:db8:85a3::8a2e:370:7334"));

    let bracketed = ClientContext::new(Some("[::1]".to_string()), None);
    assert_eq!(bracketed.ip_address.as_deref(), Some("::1"));
}

#[test]
fn test_client_context_bounds_untrusted_values() {
    let forged = "x".repeat(300);
    let agent = "é".repeat(1000);
    let client = ClientContext::new(Some(forged), Some(agent));

    assert_eq!(client.ip_address.unwrap().chars().count(), MAX_IP_ADDRESS_CHARS);
    let agent = client.user_agent.unwrap();
    assert_eq!(agent.chars().count(), MAX_USER_AGENT_CHARS);
    assert!(agent.chars().all(|c| c == 'é'));

    let blank = ClientContext::new(Some("  ".to_string()), Some(String::new()));
    assert_eq!(blank, ClientContext::default());
}

#[test]
fn test_with_client_bounds_hand_built_context() {
    let client = ClientContext {
        ip_address: Some("10.1.2.3:8080".to_string()),
        user_agent: Some("a".repeat(2000)),
    };
    let credential = RefreshCredential::new(identity(), "hash".to_string(), Utc::now(), Duration::minutes(1))
        .with_client(&client);

    assert_eq!(credential.created_from_ip.as_deref(), Some("10.1.2.3"));
    assert_eq!(credential.user_agent.map(|a| a.len()), Some(MAX_USER_AGENT_CHARS));
}

#[test]
fn test_oversized_lifetime_saturates() {
    let now = Utc::now();
    let ttl = Duration::days(100_000_000);

    let credential = RefreshCredential::new(identity(), "hash".to_string(), now, ttl);
    assert!(credential.expires_at > now);
    assert!(credential.is_usable_at(now));

    let claims = AccessClaims::new(&identity(), now, ttl, "iss");
    assert!(claims.exp > claims.iat);
}
