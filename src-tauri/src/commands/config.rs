//! Theme preference persistence.

use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::warn;

const STORE_FILE: &str = "preferences.json";
const THEME_KEY: &str = "theme";

/// Read the saved theme preference ("system", "light" or "dark").
#[tauri::command]
pub fn get_theme(app: AppHandle) -> Result<Option<String>, String> {
    let store = app.store(STORE_FILE).map_err(|e| {
        warn!("Failed to open preferences store: {}", e);
        e.to_string()
    })?;
    Ok(store
        .get(THEME_KEY)
        .and_then(|v| v.as_str().map(|s| s.to_string())))
}

/// Persist the theme preference.
#[tauri::command]
pub fn set_theme(app: AppHandle, theme: &str) -> Result<(), String> {
    let store = app.store(STORE_FILE).map_err(|e| {
        warn!("Failed to open preferences store: {}", e);
        e.to_string()
    })?;
    store.set(THEME_KEY, serde_json::json!(theme));
    store.save().map_err(|e| {
        warn!("Failed to save preferences store: {}", e);
        e.to_string()
    })
}
