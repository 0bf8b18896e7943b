pub mod actions;
pub mod api;
pub mod cli;
pub mod models;
pub mod page;
pub mod session;
pub mod ui;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use log::info;

use actions::Actions;
use api::ApiClient;
use cli::{ Args, Command };
use ui::{ ConsoleSurface, Surface };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("API Base URL: {}", args.base_url);
    info!("Default User: {}", args.user_id);
    info!("Session Path: {}", args.session_path);
    info!("-------------------------");

    let api = ApiClient::new(args.base_url.clone(), args.user_id.clone());
    let session = session::create_session_store(Some(Path::new(&args.session_path)))?;
    let surface: Arc<dyn Surface> = Arc::new(ConsoleSurface);
    let actions = Actions::new(api, session, surface);

    match args.command {
        Command::Login { username, password } => {
            actions.submit_login(&username, &password).await;
        }
        Command::Signup { username, password } => {
            actions.submit_signup(&username, &password).await;
        }
        Command::Analyze { text } => {
            actions.analyze_text(&text).await;
        }
        Command::History => {
            actions.load_history().await;
        }
        Command::Session { user_id } => {
            let reply = actions.api().session_login(&user_id).await?;
            println!("{}", reply);
        }
        Command::Assessment { score, answers } => {
            let answers = cli::parse_answers(&answers);
            let reply = actions.api().submit_assessment(score, answers).await?;
            println!("{}", reply);
        }
        Command::Chat { message } => {
            actions.send_chat(&message).await;
        }
        Command::Predict { score, features } => {
            let features = cli::parse_features(&features)?;
            let reply = actions.api().predict_fused(score, features).await?;
            println!("{}", reply);
        }
        Command::Logout => {
            actions.logout()?;
            info!("Session cleared");
        }
        Command::Open { page } => {
            let page = page::preset(&page).ok_or_else(|| {
                format!("Unknown page: {} (expected login, signup, dashboard or chatbot)", page)
            })?;
            let wiring = page::bootstrap(&page);
            info!("Attached handlers: {:?}", wiring.attached_elements());
            wiring.run_eager(&actions).await;
        }
    }

    Ok(())
}
