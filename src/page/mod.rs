use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{ info, warn };

use crate::actions::Actions;

/// Interactive elements a dashboard page can carry. A page only gets the
/// handlers for the elements it actually has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    LoginForm,
    SignupForm,
    AnalyzeInput,
    HistoryPanel,
    ChatBox,
}

/// User input handed to a handler when its element is activated.
#[derive(Clone, Debug)]
pub enum Submission {
    Credentials { username: String, password: String },
    Text(String),
    None,
}

/// A page is just the set of elements present on it.
#[derive(Clone, Debug)]
pub struct Page {
    name: String,
    elements: HashSet<Element>,
}

impl Page {
    pub fn new(name: &str, elements: impl IntoIterator<Item = Element>) -> Self {
        Page {
            name: name.to_string(),
            elements: elements.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }
}

/// The page presets the backend serves as static pages.
pub fn preset(name: &str) -> Option<Page> {
    match name {
        "login" => Some(Page::new("login", [Element::LoginForm])),
        "signup" => Some(Page::new("signup", [Element::SignupForm])),
        "dashboard" => Some(Page::new("dashboard", [Element::AnalyzeInput, Element::HistoryPanel])),
        "chatbot" =>
            Some(
                Page::new("chatbot", [Element::AnalyzeInput, Element::HistoryPanel, Element::ChatBox])
            ),
        _ => None,
    }
}

#[async_trait]
trait ElementBinding: Send + Sync {
    fn target(&self) -> Element;

    /// Eager bindings fire once at bootstrap instead of waiting for input.
    fn eager(&self) -> bool {
        false
    }

    async fn activate(&self, actions: &Actions, submission: Submission);
}

struct LoginFormBinding;

#[async_trait]
impl ElementBinding for LoginFormBinding {
    fn target(&self) -> Element {
        Element::LoginForm
    }

    async fn activate(&self, actions: &Actions, submission: Submission) {
        if let Submission::Credentials { username, password } = submission {
            actions.submit_login(&username, &password).await;
        } else {
            warn!("Login form activated without credentials");
        }
    }
}

struct SignupFormBinding;

#[async_trait]
impl ElementBinding for SignupFormBinding {
    fn target(&self) -> Element {
        Element::SignupForm
    }

    async fn activate(&self, actions: &Actions, submission: Submission) {
        if let Submission::Credentials { username, password } = submission {
            actions.submit_signup(&username, &password).await;
        } else {
            warn!("Signup form activated without credentials");
        }
    }
}

struct AnalyzeInputBinding;

#[async_trait]
impl ElementBinding for AnalyzeInputBinding {
    fn target(&self) -> Element {
        Element::AnalyzeInput
    }

    async fn activate(&self, actions: &Actions, submission: Submission) {
        if let Submission::Text(text) = submission {
            actions.analyze_text(&text).await;
        } else {
            warn!("Analyze input activated without text");
        }
    }
}

struct HistoryPanelBinding;

#[async_trait]
impl ElementBinding for HistoryPanelBinding {
    fn target(&self) -> Element {
        Element::HistoryPanel
    }

    // The history panel fills itself on page load.
    fn eager(&self) -> bool {
        true
    }

    async fn activate(&self, actions: &Actions, _submission: Submission) {
        actions.load_history().await;
    }
}

struct ChatBoxBinding;

#[async_trait]
impl ElementBinding for ChatBoxBinding {
    fn target(&self) -> Element {
        Element::ChatBox
    }

    async fn activate(&self, actions: &Actions, submission: Submission) {
        if let Submission::Text(message) = submission {
            actions.send_chat(&message).await;
        } else {
            warn!("Chat box activated without a message");
        }
    }
}

fn registry() -> Vec<Arc<dyn ElementBinding>> {
    vec![
        Arc::new(LoginFormBinding),
        Arc::new(SignupFormBinding),
        Arc::new(AnalyzeInputBinding),
        Arc::new(HistoryPanelBinding),
        Arc::new(ChatBoxBinding)
    ]
}

/// Handlers attached to one page. Bindings whose element is absent from the
/// page are never attached, so dispatching to them is a no-op.
pub struct Wiring {
    attached: Vec<Arc<dyn ElementBinding>>,
}

impl Wiring {
    pub fn attached_elements(&self) -> Vec<Element> {
        self.attached
            .iter()
            .map(|binding| binding.target())
            .collect()
    }

    /// Run the bindings that fire on page load.
    pub async fn run_eager(&self, actions: &Actions) {
        for binding in &self.attached {
            if binding.eager() {
                binding.activate(actions, Submission::None).await;
            }
        }
    }

    /// Route user input to the handler for `element`, if the page has one.
    pub async fn dispatch(&self, actions: &Actions, element: Element, submission: Submission) {
        match self.attached.iter().find(|binding| binding.target() == element) {
            Some(binding) => binding.activate(actions, submission).await,
            None => warn!("No {:?} on this page, input ignored", element),
        }
    }
}

/// Attach every registered binding whose element the page carries.
pub fn bootstrap(page: &Page) -> Wiring {
    let attached: Vec<Arc<dyn ElementBinding>> = registry()
        .into_iter()
        .filter(|binding| page.has(binding.target()))
        .collect();
    info!("Page {} wired with {} handler(s)", page.name(), attached.len());
    Wiring { attached }
}
