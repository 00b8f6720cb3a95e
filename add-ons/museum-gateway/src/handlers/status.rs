//! Liveness and identity endpoints.

use crate::AppState;
use axum::extract::State;
use axum::Json;
use museum_core::ModuleId;
use serde::Serialize;

/// One entry of the module catalog as exposed to scripts.
#[derive(Debug, Serialize)]
pub(crate) struct ModuleEntry {
    pub(crate) id: ModuleId,
    pub(crate) name: &'static str,
    pub(crate) url: String,
}

impl From<ModuleId> for ModuleEntry {
    fn from(module: ModuleId) -> Self {
        Self {
            id: module,
            name: module.display_name(),
            url: module.frame_url(),
        }
    }
}

/// GET /api/v1/health – liveness check.
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/status – app identity, port and the module catalog.
pub(crate) async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let modules: Vec<ModuleEntry> = ModuleId::all().into_iter().map(ModuleEntry::from).collect();
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "modules": modules,
    }))
}
