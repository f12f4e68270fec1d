// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod app;
mod chat;
mod commands;
mod config;
mod errors;
mod events;
mod keyboard;
mod library;
mod listener;
mod llm;
mod paths;
mod profiles;
mod shortcuts;
mod shutdown;
mod triggers;
mod util;

use tauri_plugin_log::{Target, TargetKind};

// Re-export log macros for use throughout the crate
pub use tauri_plugin_log::log::{debug, error, info, trace, warn};

/// Application entry point - starts the Tauri event loop.
/// Note: This function cannot be unit tested as it starts a GUI.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let result = tauri::Builder::default()
        .plugin(tauri_plugin_http::init())
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::Webview),
                    Target::new(TargetKind::LogDir {
                        file_name: Some("textpilot".to_string()),
                    }),
                ])
                .level(if cfg!(debug_assertions) {
                    tauri_plugin_log::log::LevelFilter::Debug
                } else {
                    tauri_plugin_log::log::LevelFilter::Info
                })
                .build(),
        )
        .setup(|app| app::setup::setup(app))
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                app::windows::on_window_destroyed(window);
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_startup_status,
            commands::list_shortcuts,
            commands::add_shortcut,
            commands::delete_shortcut,
            commands::set_shortcut_enabled,
            commands::list_model_configs,
            commands::add_model_config,
            commands::delete_model_config,
            commands::refresh_models,
            commands::list_models,
            commands::get_supported_parameters,
            commands::list_profiles,
            commands::get_profile_form,
            commands::save_profile,
            commands::delete_profile,
            commands::list_tools,
            commands::save_tool,
            commands::delete_tool,
            commands::select_tools,
            commands::list_saved_items,
            commands::get_saved_item,
            commands::delete_saved_item,
            commands::use_saved_item,
            commands::list_files,
            commands::add_file,
            commands::delete_file,
            commands::open_chat,
            commands::get_chat_state,
            commands::get_chat_state_for_session,
            commands::send_chat,
            commands::new_conversation,
            commands::apply_profile,
            commands::attach_image,
            commands::use_file,
            commands::save_from_chat,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        error!("Error while running tauri application: {}", e);
        std::process::exit(1);
    }
}
