use actix_web::{web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::core::chat_guard::{
    continues_maternal_topic, normalize_message, topic_of, Topic, CHAT_SYSTEM_PROMPT,
    OFF_TOPIC_REPLY,
};
use crate::error::ApiError;
use crate::models::{ChatHistoryResponse, ChatRequest, ChatResponse, ListQuery};
use crate::routes::AppState;
use crate::services::{Content, ResponseFormat};

const MAX_HISTORY_PAGE: u16 = 100;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(send_message))
        .route("/chat/history", web::get().to(chat_history));
}

/// Restricted-topic assistant
///
/// POST /api/v1/chat
///
/// Off-topic messages get a fixed refusal. They are neither sent to the
/// model nor stored. Messages made only of everyday words ("is a short walk
/// fine?") are answered when the conversation is already about pregnancy.
async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let message = normalize_message(&req.message, state.chat.max_message_chars)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let topic = topic_of(message);
    if topic == Topic::OffTopic {
        return Ok(refuse(&user.user_id));
    }

    let history = state
        .postgres
        .recent_chat_messages(&user.user_id, state.chat.history_limit)
        .await?;

    if topic == Topic::Context && !continues_maternal_topic(&history) {
        return Ok(refuse(&user.user_id));
    }

    let mut contents: Vec<Content> = history
        .into_iter()
        .map(|m| Content::from_chat(m.role, m.content))
        .collect();
    contents.push(Content::user(message));

    let reply = state
        .chat_model
        .generate(CHAT_SYSTEM_PROMPT, &contents, ResponseFormat::Text)
        .await?;
    let reply = reply.trim().to_string();

    state
        .postgres
        .insert_chat_exchange(&user.user_id, message, &reply)
        .await?;

    tracing::debug!(
        "Chat reply for {} using {} context turns",
        user.user_id,
        contents.len() - 1
    );

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply,
        on_topic: true,
    }))
}

fn refuse(user_id: &str) -> HttpResponse {
    tracing::info!("Refused off-topic chat message from {}", user_id);
    HttpResponse::Ok().json(ChatResponse {
        reply: OFF_TOPIC_REPLY.to_string(),
        on_topic: false,
    })
}

/// The caller's most recent messages, oldest first
///
/// GET /api/v1/chat/history?limit=30
async fn chat_history(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.clamp(1, MAX_HISTORY_PAGE) as usize;

    let messages = state
        .postgres
        .recent_chat_messages(&user.user_id, limit)
        .await?;

    Ok(HttpResponse::Ok().json(ChatHistoryResponse {
        count: messages.len(),
        messages,
    }))
}
