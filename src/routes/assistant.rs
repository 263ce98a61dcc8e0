use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    assistant::{fallback, AssistantError, ChatTurn},
    state::AppState,
};

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/assistant/message").route(web::post().to(message)));
}

/// Chat endpoint for the home page widget. Failures never surface as
/// HTTP errors; the visitor gets a canned reply instead.
async fn message(
    state: web::Data<AppState>,
    payload: web::Json<ChatRequest>,
) -> Result<HttpResponse> {
    let text = payload.message.trim();
    if text.is_empty() {
        return Ok(HttpResponse::BadRequest().finish());
    }

    let reply = match state.assistant.reply(text, &payload.history).await {
        Ok(reply) => reply,
        Err(err) => {
            if !matches!(err, AssistantError::Offline) {
                log::warn!("Assistant request failed: {err}");
            }
            fallback(&err).to_string()
        }
    };
    Ok(HttpResponse::Ok().json(ChatResponse { reply }))
}
