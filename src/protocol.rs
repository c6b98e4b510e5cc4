//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//! Bundle DTOs carry presentation text only; expected answers never leave
//! the server.

use serde::{Deserialize, Serialize};

use crate::domain::Level;

/// Messages the chat transport can send over WebSocket. Each carries the
/// stable user id; `Reply` is the free-text (non-command) path.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Start {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "displayName")]
        display_name: Option<String>,
    },
    Help,
    Daily {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "displayName")]
        display_name: Option<String>,
    },
    Score {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Level {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Streak {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Reply {
        #[serde(rename = "userId")]
        user_id: String,
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Info {
        text: String,
    },
    Bundle {
        text: String,
    },
    AnswerResult {
        gained: u32,
        score: u32,
        level: Level,
        streak: u32,
        text: String,
    },
    Score {
        score: u32,
    },
    Level {
        level: Level,
    },
    Streak {
        streak: u32,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyIn {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct ReplyIn {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct TextOut {
    pub text: String,
}

#[derive(Serialize)]
pub struct ReplyOut {
    pub gained: u32,
    pub score: u32,
    pub level: Level,
    pub streak: u32,
    pub text: String,
}

#[derive(Serialize)]
pub struct ScoreOut {
    pub score: u32,
}
#[derive(Serialize)]
pub struct LevelOut {
    pub level: Level,
}
#[derive(Serialize)]
pub struct StreakOut {
    pub streak: u32,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
