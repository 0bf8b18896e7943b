use std::collections::BTreeMap;

use clap::{ Parser, Subcommand };
use serde_json::Value;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the MEDCARE backend.
    #[arg(long, env = "API_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// User id attached to assessment and chat requests.
    #[arg(long, env = "MEDCARE_USER_ID", default_value = "demo_user")]
    pub user_id: String,

    /// Path of the file holding the persisted session token and user id.
    #[arg(long, env = "SESSION_PATH", default_value = "medcare_session.json")]
    pub session_path: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and persist the returned session.
    Login {
        username: String,
        password: String,
    },
    /// Create an account. Log in separately afterwards.
    Signup {
        username: String,
        password: String,
    },
    /// Run sentiment analysis on a piece of text and refresh the history view.
    Analyze {
        text: String,
    },
    /// Show the server-side list of past analyses.
    History,
    /// Announce a user id to the demo session endpoint and print the reply.
    Session {
        user_id: String,
    },
    /// Submit questionnaire answers with their total score and print the reply.
    Assessment {
        #[arg(long)]
        score: i64,
        /// Answers in order; each is parsed as JSON, or kept as a string.
        answers: Vec<String>,
    },
    /// Send one chat message and print the reply payload.
    Chat {
        message: String,
    },
    /// Request a fused prediction and print the reply.
    Predict {
        #[arg(long)]
        score: f64,
        /// Behavior features as name=value pairs.
        features: Vec<String>,
    },
    /// Clear the stored session.
    Logout,
    /// Wire up a page preset (login, signup, dashboard, chatbot) and run its
    /// on-load handlers.
    Open {
        page: String,
    },
}

/// Each answer is opaque to the client: anything that parses as JSON is sent
/// as-is, anything else travels as a string.
pub fn parse_answers(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|answer| {
            serde_json::from_str(answer).unwrap_or_else(|_| Value::String(answer.clone()))
        })
        .collect()
}

/// Behavior features arrive as `name=value` pairs with numeric values.
pub fn parse_features(raw: &[String]) -> Result<BTreeMap<String, f64>, String> {
    let mut features = BTreeMap::new();
    for pair in raw {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got: {}", pair))?;
        let value: f64 = value
            .parse()
            .map_err(|_| format!("feature {} has a non-numeric value: {}", name, value))?;
        features.insert(name.to_string(), value);
    }
    Ok(features)
}
