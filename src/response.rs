//! Response helpers shared by handlers.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

pub fn message(text: impl Into<String>) -> Json<Message> {
    Json(Message {
        message: text.into(),
    })
}
