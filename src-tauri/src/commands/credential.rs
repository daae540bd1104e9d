//! Tauri commands around the keychain credential store.

use tracing::info;

use crate::credential;

/// Persist the Gemini API key with a fresh 24-hour expiry.
#[tauri::command]
pub fn save_api_key(key: &str) -> Result<(), String> {
    info!("Saving Gemini API key");
    credential::save(key)
}

/// Return the stored key if one exists and has not expired. Expired or
/// corrupt entries are cleaned up and read as absent.
#[tauri::command]
pub fn get_api_key() -> Option<String> {
    credential::load()
}

/// Delete the stored key unconditionally (logout).
#[tauri::command]
pub fn clear_api_key() -> Result<(), String> {
    info!("Clearing stored Gemini API key");
    credential::clear()
}
