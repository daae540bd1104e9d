pub mod analysis;
mod commands;
pub mod credential;
pub mod error;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            commands::credential::save_api_key,
            commands::credential::get_api_key,
            commands::credential::clear_api_key,
            commands::config::get_theme,
            commands::config::set_theme,
            commands::analyze::analyze_craft,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
