use serde::{ Serialize, Deserialize };
use serde_json::Value;

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of an `/api/login` or `/api/signup` reply. Every field is optional
/// because the server omits the ones that do not apply; `http_ok` records
/// whether the HTTP status was 2xx and never travels on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthResponse {
    pub status: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<Value>,
    pub error: Option<String>,
    #[serde(skip)]
    pub http_ok: bool,
}

impl AuthResponse {
    pub fn is_success(&self) -> bool {
        self.http_ok && self.status.as_deref() == Some("success")
    }

    /// The user id as a plain string, whether the server sent a string or a
    /// number.
    pub fn user_id_text(&self) -> Option<String> {
        match &self.user_id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }
}
