use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info};

use crate::history::{HistoryEntry, Sender};
use crate::models::chat::{AskRequest, AskResponse, ImageIntentResponse};
use crate::services::intent::Intent;
use crate::services::prompt;
use crate::services::AiError;
use crate::state::AppState;
use crate::utils::error::ApiError;

/// Fixed user-facing reply for any generative-backend failure. The real
/// detail goes to the log.
const APOLOGY: &str = "Sorry, I couldn't process that request.";

const CREATOR_REPLY: &str =
    "I was created by Rishabh, using a large language model from Google.";

pub async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Response, ApiError> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    state
        .history
        .append(HistoryEntry::text(Sender::User, message.clone()))
        .await;

    let intent = state.classifier.classify(&message);
    debug!("Classified /ask message: {:?}", intent);

    match intent {
        Intent::ImageRequest { cleaned_prompt } => {
            Ok(Json(ImageIntentResponse::new(cleaned_prompt)).into_response())
        }

        Intent::CreatorQuery => Ok(Json(AskResponse {
            response: CREATOR_REPLY.to_string(),
        })
        .into_response()),

        Intent::IdentityQuery => {
            let name = state.assistant_name.read().clone();
            Ok(Json(AskResponse {
                response: format!("Hi! I'm {}, your assistant. How can I help you today?", name),
            })
            .into_response())
        }

        Intent::RenameDirective { new_name } => {
            *state.assistant_name.write() = new_name.clone();
            info!("Assistant renamed to '{}'", new_name);

            Ok(Json(AskResponse {
                response: format!("Got it! I'll call you {} from now on.", new_name),
            })
            .into_response())
        }

        Intent::GenericChat => {
            let history = state.history.read_all().await;
            let assistant_name = state.assistant_name.read().clone();
            let prompt = prompt::assemble(&history, &message, &assistant_name);

            let answer = state
                .chat_model
                .generate(&prompt)
                .await
                .map_err(apologize)?;

            state
                .history
                .append(HistoryEntry::text(Sender::Assistant, answer.clone()))
                .await;

            Ok(Json(AskResponse { response: answer }).into_response())
        }
    }
}

pub async fn ask_with_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AskResponse>, ApiError> {
    let mut message = String::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());

        match name.as_deref() {
            Some("message") => {
                message = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid message field: {}", e)))?;
            }
            Some("image") => {
                let mime = field
                    .content_type()
                    .map(|m| m.to_string())
                    .or_else(|| {
                        field
                            .file_name()
                            .map(|n| mime_guess::from_path(n).first_or_octet_stream().to_string())
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid image field: {}", e)))?;

                image = Some((mime, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (mime, bytes) = image
        .ok_or_else(|| ApiError::BadRequest("Image file is required".to_string()))?;

    let message = if message.trim().is_empty() {
        "Describe this image.".to_string()
    } else {
        message.trim().to_string()
    };

    info!("Multimodal request: {} bytes, mime {}", bytes.len(), mime);

    state
        .history
        .append(HistoryEntry::text(Sender::User, message.clone()))
        .await;

    let answer = state
        .chat_model
        .generate_with_image(&message, &mime, &bytes)
        .await
        .map_err(apologize)?;

    state
        .history
        .append(HistoryEntry::text(Sender::Assistant, answer.clone()))
        .await;

    Ok(Json(AskResponse { response: answer }))
}

fn apologize(e: AiError) -> ApiError {
    error!("Chat generation failed: {}", e);
    ApiError::Upstream(APOLOGY.to_string())
}
