pub mod gemini;
pub mod image;
pub mod intent;
pub mod prompt;

pub use gemini::{AiError, ChatModel, GeminiService};
pub use image::ImageService;
pub use intent::{Classifier, Intent};
