use std::sync::Arc;

use log::error;

use crate::api::{ ApiClient, ApiError };
use crate::session::{ SessionError, SessionStore, TOKEN_KEY, USER_ID_KEY };
use crate::ui::Surface;

pub const GENERIC_SERVER_ERROR: &str = "Server error. Please try again.";
pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const SIGNUP_SUCCESS: &str = "Signup successful! Please login.";

pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const LOGIN_ROUTE: &str = "/login";

/// One method per user action on the dashboard pages. Every failure is
/// terminal for its action: the outcome is surfaced and the user retries by
/// hand. Nothing here retries, times out, or coordinates requests beyond the
/// analyze-then-refresh sequence.
pub struct Actions {
    api: ApiClient,
    session: Arc<dyn SessionStore>,
    surface: Arc<dyn Surface>,
}

impl Actions {
    pub fn new(api: ApiClient, session: Arc<dyn SessionStore>, surface: Arc<dyn Surface>) -> Self {
        Actions { api, session, surface }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Analyze a piece of text, render the result, then refresh the history
    /// view. The refresh is only issued once the analysis has resolved.
    pub async fn analyze_text(&self, input: &str) {
        match self.api.analyze_sentiment(input).await {
            Ok(result) => {
                self.surface.show_result(&result.summary());
                self.load_history().await;
            }
            Err(ApiError::Server(message)) => {
                self.surface.alert(&message);
            }
            Err(err) => {
                error!("Sentiment request failed: {}", err);
                self.surface.alert(GENERIC_SERVER_ERROR);
            }
        }
    }

    /// Replace the history view with whatever the server returns, in server
    /// order, no pagination.
    pub async fn load_history(&self) {
        match self.api.history().await {
            Ok(entries) => {
                let lines: Vec<String> = entries.iter().map(ToString::to_string).collect();
                self.surface.replace_history(&lines);
            }
            Err(err) => {
                error!("History request failed: {}", err);
                self.surface.alert(GENERIC_SERVER_ERROR);
            }
        }
    }

    /// Submit login credentials. On success the token and user id are
    /// persisted and the user lands on the dashboard; any other outcome is
    /// an alert and nothing is stored.
    pub async fn submit_login(&self, username: &str, password: &str) {
        let username = username.trim();
        let password = password.trim();

        match self.api.login(username, password).await {
            Ok(reply) if reply.is_success() => {
                if let Some(token) = &reply.token {
                    self.store(TOKEN_KEY, token);
                }
                if let Some(user_id) = reply.user_id_text() {
                    self.store(USER_ID_KEY, &user_id);
                }
                self.surface.navigate(DASHBOARD_ROUTE);
            }
            Ok(reply) => {
                self.surface.alert(reply.error.as_deref().unwrap_or(LOGIN_FAILED));
            }
            Err(err) => {
                error!("Login request failed: {}", err);
                self.surface.alert(GENERIC_SERVER_ERROR);
            }
        }
    }

    /// Submit signup credentials. Success routes back to the login page; the
    /// account is not logged in automatically.
    pub async fn submit_signup(&self, username: &str, password: &str) {
        let username = username.trim();
        let password = password.trim();

        match self.api.signup(username, password).await {
            Ok(reply) if reply.is_success() => {
                self.surface.alert(SIGNUP_SUCCESS);
                self.surface.navigate(LOGIN_ROUTE);
            }
            Ok(reply) => {
                self.surface.alert(reply.error.as_deref().unwrap_or(SIGNUP_FAILED));
            }
            Err(err) => {
                error!("Signup request failed: {}", err);
                self.surface.alert(GENERIC_SERVER_ERROR);
            }
        }
    }

    /// Send one chat message and render the reply payload as-is.
    pub async fn send_chat(&self, message: &str) {
        match self.api.chat(message).await {
            Ok(reply) => {
                self.surface.show_result(&reply.to_string());
            }
            Err(err) => {
                error!("Chat request failed: {}", err);
                self.surface.alert(GENERIC_SERVER_ERROR);
            }
        }
    }

    /// Drop the stored session. The only path that ever clears the store.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.clear()
    }

    fn store(&self, key: &str, value: &str) {
        if let Err(err) = self.session.set(key, value) {
            error!("Failed to persist session key {}: {}", key, err);
        }
    }
}
