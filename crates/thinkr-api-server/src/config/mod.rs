pub mod settings;

pub use settings::{
    AssistantConfig, GeminiConfig, HistoryConfig, ImageConfig, IntentConfig, ServerConfig,
    Settings,
};
