use axum::{extract::State, response::Html};

use crate::state::AppState;

const SHELL: &str = include_str!("../../assets/index.html");

/// Chat UI shell with the current assistant name interpolated.
pub async fn home_handler(State(state): State<AppState>) -> Html<String> {
    let name = state.assistant_name.read().clone();
    Html(SHELL.replace("{{alias}}", &name))
}
