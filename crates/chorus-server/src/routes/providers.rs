use crate::state::{AppState, ProviderInfo};
use axum::{extract::State, routing::get, Json, Router};

async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    Json(state.providers.as_ref().clone())
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/providers", get(list_providers))
        .with_state(state)
}
