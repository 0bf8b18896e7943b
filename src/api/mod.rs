use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::auth::{ AuthResponse, Credentials };
use crate::models::wellbeing::{
    AssessmentPayload,
    ChatMessage,
    FusedPredictionInput,
    HistoryEntry,
    SentimentResult,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed or the body was not valid JSON.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with an `error` field.
    #[error("{0}")]
    Server(String),
    /// The server answered with JSON of an unexpected shape.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin client over the dashboard backends. Each method is a single awaited
/// round trip: no retries, no timeouts, no cancellation. Callers decide what
/// a failure means for the user.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    default_user: String,
}

impl ApiClient {
    pub fn new(base_url: String, default_user: String) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_user,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T
    ) -> Result<Value, ApiError> {
        debug!("POST {}", path);
        let body = self.http
            .post(self.url(path))
            .json(payload)
            .send().await?
            .json::<Value>().await?;
        Ok(body)
    }

    /// POST `/api/analyze-sentiment` with `{text}`.
    pub async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult, ApiError> {
        let body = self.post_json("/api/analyze-sentiment", &serde_json::json!({ "text": text })).await?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(ApiError::Server(message.to_string()));
        }
        let result = serde_json::from_value(body)?;
        Ok(result)
    }

    /// GET `/api/history`. Entries come back in server order and are not
    /// reordered here.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        debug!("GET /api/history");
        let entries = self.http
            .get(self.url("/api/history"))
            .send().await?
            .json().await?;
        Ok(entries)
    }

    /// POST `/api/login`. A non-2xx reply is still a parsed reply, not an
    /// error; `http_ok` carries the status outcome.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.auth("/api/login", username, password).await
    }

    /// POST `/api/signup`, same contract as [`ApiClient::login`].
    pub async fn signup(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.auth("/api/signup", username, password).await
    }

    async fn auth(
        &self,
        path: &str,
        username: &str,
        password: &str
    ) -> Result<AuthResponse, ApiError> {
        let creds = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        debug!("POST {}", path);
        let resp = self.http.post(self.url(path)).json(&creds).send().await?;
        let http_ok = resp.status().is_success();
        let mut body: AuthResponse = resp.json().await?;
        body.http_ok = http_ok;
        Ok(body)
    }

    // The four pass-through wrappers below serialize a fixed-shape body and
    // hand the parsed reply back verbatim; they never touch the surface or
    // the session store.

    /// POST `/login` with `{user_id}`.
    pub async fn session_login(&self, user_id: &str) -> Result<Value, ApiError> {
        self.post_json("/login", &serde_json::json!({ "user_id": user_id })).await
    }

    /// POST `/api/assessment` with `{user_id, score, answers}`.
    pub async fn submit_assessment(
        &self,
        score: i64,
        answers: Vec<Value>
    ) -> Result<Value, ApiError> {
        let payload = AssessmentPayload {
            user_id: self.default_user.clone(),
            score,
            answers,
        };
        self.post_json("/api/assessment", &payload).await
    }

    /// POST `/chat` with `{user_id, message}`.
    pub async fn chat(&self, message: &str) -> Result<Value, ApiError> {
        let payload = ChatMessage {
            user_id: self.default_user.clone(),
            message: message.to_string(),
        };
        self.post_json("/chat", &payload).await
    }

    /// POST `/predict_fused` with `{questionnaire_score, behavior_features}`.
    pub async fn predict_fused(
        &self,
        questionnaire_score: f64,
        behavior_features: BTreeMap<String, f64>
    ) -> Result<Value, ApiError> {
        let payload = FusedPredictionInput {
            questionnaire_score,
            behavior_features,
        };
        self.post_json("/predict_fused", &payload).await
    }
}
