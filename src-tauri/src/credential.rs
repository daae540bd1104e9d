//! Keychain-backed storage for the Gemini API key.
//!
//! The keychain entry holds a versioned JSON payload with an expiry
//! timestamp. A stale or corrupt entry reads as "no credential" and is
//! deleted, never surfaced to the user as an error.

use chrono::{Duration, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Keychain service for the current, versioned credential format.
pub const CREDENTIAL_SERVICE: &str = "craftspire-gemini-v1";

/// Keychain service used by early builds. Deleted on sight, never migrated.
pub const LEGACY_SERVICE: &str = "craftspire-gemini";

const ACCOUNT: &str = "craftspire";

/// How long a saved key stays valid before it must be re-entered.
pub const CREDENTIAL_TTL_HOURS: i64 = 24;

/// The versioned payload stored in the keychain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub key: String,
    /// Expiry as epoch milliseconds, always save time + the fixed TTL.
    pub expiry: i64,
}

impl StoredCredential {
    /// Build a payload expiring [`CREDENTIAL_TTL_HOURS`] after `now_millis`.
    pub fn issued_at(key: &str, now_millis: i64) -> Self {
        StoredCredential {
            key: key.to_string(),
            expiry: now_millis + Duration::hours(CREDENTIAL_TTL_HOURS).num_milliseconds(),
        }
    }

    pub fn issued_now(key: &str) -> Self {
        StoredCredential::issued_at(key, Utc::now().timestamp_millis())
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize credential: {}", e))
    }
}

/// Outcome of decoding a stored payload against a clock.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialStatus {
    Valid(String),
    Expired,
    Malformed,
}

/// Decode a stored payload. Pure so tests can inject the clock.
pub fn evaluate_payload(payload: &str, now_millis: i64) -> CredentialStatus {
    match serde_json::from_str::<StoredCredential>(payload) {
        Ok(cred) if now_millis < cred.expiry => CredentialStatus::Valid(cred.key),
        Ok(_) => CredentialStatus::Expired,
        Err(_) => CredentialStatus::Malformed,
    }
}

/// Read the stored API key, enforcing the TTL.
///
/// Expired and malformed entries are deleted and reported as absent, as is
/// any keychain read failure. Also removes the legacy unversioned entry.
pub fn load() -> Option<String> {
    delete_legacy_entry();

    let entry = match Entry::new(CREDENTIAL_SERVICE, ACCOUNT) {
        Ok(entry) => entry,
        Err(e) => {
            warn!("Failed to open keychain entry: {}", e);
            return None;
        }
    };

    let payload = match entry.get_password() {
        Ok(payload) => payload,
        Err(keyring::Error::NoEntry) => return None,
        Err(e) => {
            warn!("Failed to read stored credential: {}", e);
            return None;
        }
    };

    match evaluate_payload(&payload, Utc::now().timestamp_millis()) {
        CredentialStatus::Valid(key) => Some(key),
        CredentialStatus::Expired => {
            info!("Stored API key has expired, deleting");
            let _ = entry.delete_credential();
            None
        }
        CredentialStatus::Malformed => {
            warn!("Stored credential did not parse, deleting");
            let _ = entry.delete_credential();
            None
        }
    }
}

/// Persist the key with a fresh expiry, replacing any prior value.
pub fn save(key: &str) -> Result<(), String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err("API key must not be empty".to_string());
    }

    let payload = StoredCredential::issued_now(trimmed).to_json()?;
    let entry = Entry::new(CREDENTIAL_SERVICE, ACCOUNT).map_err(|e| e.to_string())?;
    entry.set_password(&payload).map_err(|e| {
        warn!("Failed to store credential: {}", e);
        e.to_string()
    })
}

/// Delete the stored credential unconditionally. Used on logout.
pub fn clear() -> Result<(), String> {
    let entry = Entry::new(CREDENTIAL_SERVICE, ACCOUNT).map_err(|e| e.to_string())?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => {
            warn!("Failed to delete credential: {}", e);
            Err(e.to_string())
        }
    }
}

/// Remove the unversioned entry left behind by early builds. Cleanup only,
/// the old value is never migrated into the new format.
fn delete_legacy_entry() {
    let entry = match Entry::new(LEGACY_SERVICE, ACCOUNT) {
        Ok(entry) => entry,
        Err(_) => return,
    };
    match entry.delete_credential() {
        Ok(()) => info!("Removed legacy credential entry"),
        Err(keyring::Error::NoEntry) => {}
        Err(e) => warn!("Failed to remove legacy credential entry: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

    #[test]
    fn test_issued_at_expiry_is_save_time_plus_ttl() {
        let cred = StoredCredential::issued_at("AIzaSyTest123", 1_000_000);
        assert_eq!(cred.key, "AIzaSyTest123");
        assert_eq!(cred.expiry, 1_000_000 + DAY_MILLIS);
    }

    #[test]
    fn test_payload_round_trip_returns_same_key() {
        let cred = StoredCredential::issued_at("AIzaSyRoundTrip", 5_000);
        let json = cred.to_json().unwrap();

        match evaluate_payload(&json, 5_001) {
            CredentialStatus::Valid(key) => assert_eq!(key, "AIzaSyRoundTrip"),
            other => panic!("Expected Valid, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_expired_after_ttl() {
        let cred = StoredCredential::issued_at("AIzaSyExpired", 0);
        let json = cred.to_json().unwrap();

        // One millisecond past the window
        assert_eq!(evaluate_payload(&json, DAY_MILLIS + 1), CredentialStatus::Expired);
        // Exactly at expiry is no longer valid (now < expiry required)
        assert_eq!(evaluate_payload(&json, DAY_MILLIS), CredentialStatus::Expired);
        // One millisecond before is still valid
        assert!(matches!(
            evaluate_payload(&json, DAY_MILLIS - 1),
            CredentialStatus::Valid(_)
        ));
    }

    #[test]
    fn test_payload_evaluation_is_idempotent() {
        let cred = StoredCredential::issued_at("AIzaSyTwice", 0);
        let json = cred.to_json().unwrap();

        let first = evaluate_payload(&json, 1);
        let second = evaluate_payload(&json, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_payload_reads_as_malformed() {
        assert_eq!(evaluate_payload("not json at all", 0), CredentialStatus::Malformed);
        assert_eq!(evaluate_payload("", 0), CredentialStatus::Malformed);
        // Legacy unversioned format was a bare string, not an object
        assert_eq!(
            evaluate_payload("\"AIzaSyBareKey\"", 0),
            CredentialStatus::Malformed
        );
    }

    #[test]
    fn test_payload_missing_expiry_is_malformed() {
        assert_eq!(
            evaluate_payload(r#"{"key":"AIzaSyNoExpiry"}"#, 0),
            CredentialStatus::Malformed
        );
    }
}
