use std::sync::Mutex;

use log::info;

/// Where the glue writes what the user sees. Mirrors the side effects the
/// dashboard pages perform: a result line, a history list that is replaced
/// wholesale, alert popups, and route navigation.
pub trait Surface: Send + Sync {
    fn show_result(&self, text: &str);
    fn replace_history(&self, lines: &[String]);
    fn alert(&self, message: &str);
    fn navigate(&self, route: &str);
}

/// Terminal rendering for the CLI binary.
pub struct ConsoleSurface;

impl Surface for ConsoleSurface {
    fn show_result(&self, text: &str) {
        println!("{}", text);
    }

    fn replace_history(&self, lines: &[String]) {
        println!("History ({} entries):", lines.len());
        for line in lines {
            println!("  {}", line);
        }
    }

    fn alert(&self, message: &str) {
        println!("! {}", message);
    }

    fn navigate(&self, route: &str) {
        info!("Navigating to {}", route);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Result(String),
    History(Vec<String>),
    Alert(String),
    Navigate(String),
}

/// Surface that records everything it is told to show, for asserting on
/// behavior in tests.
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn take(&self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Surface for RecordingSurface {
    fn show_result(&self, text: &str) {
        self.push(SurfaceEvent::Result(text.to_string()));
    }

    fn replace_history(&self, lines: &[String]) {
        self.push(SurfaceEvent::History(lines.to_vec()));
    }

    fn alert(&self, message: &str) {
        self.push(SurfaceEvent::Alert(message.to_string()));
    }

    fn navigate(&self, route: &str) {
        self.push(SurfaceEvent::Navigate(route.to_string()));
    }
}
