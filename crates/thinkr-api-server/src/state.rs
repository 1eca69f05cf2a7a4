use std::sync::Arc;

use axum::extract::FromRef;
use parking_lot::RwLock;

use crate::config::Settings;
use crate::history::FileHistoryStore;
use crate::services::{ChatModel, Classifier, ImageService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub history: Arc<FileHistoryStore>,
    pub chat_model: Arc<dyn ChatModel>,
    pub classifier: Arc<Classifier>,
    pub image_service: Arc<ImageService>,
    /// Mutable display name, changed by the "call me" directive.
    pub assistant_name: Arc<RwLock<String>>,
}

impl FromRef<AppState> for Arc<FileHistoryStore> {
    fn from_ref(state: &AppState) -> Self {
        state.history.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ChatModel> {
    fn from_ref(state: &AppState) -> Self {
        state.chat_model.clone()
    }
}
