//! Shared application state handed to every handler

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::Environment,
    services::{MemoryProfileStore, ProfileStore, ReflectionGenerator, TextGenerator},
    tasks::FocusRegistry,
};

/// Main application state: collaborators, live focus sessions and server metadata
pub struct AppState {
    /// Generative-text provider behind summaries, flashcards and plans
    pub generator: Arc<dyn TextGenerator>,
    /// Profile storage for register/lookup
    pub profiles: Arc<dyn ProfileStore>,
    /// Open focus views
    pub focus: FocusRegistry,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    pub environment: Environment,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    pub fn builder(generator: Arc<dyn TextGenerator>) -> AppStateBuilder {
        AppStateBuilder::new(generator)
    }

    /// Record the most recent state-changing request for `/status`
    pub fn record_action(&self, action: &str) {
        debug!(action, "record_action: called");
        *self.last_action.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((action.to_string(), Utc::now()));
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self
            .last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Close every focus session so no countdown outlives the server
    pub fn shutdown(&self) {
        info!(sessions = self.focus.len(), "Shutting down application state");
        self.focus.teardown_all();
    }
}

fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

pub struct AppStateBuilder {
    generator: Arc<dyn TextGenerator>,
    question_count: usize,
    reflection_timeout: Duration,
    tick_interval: Duration,
    port: u16,
    host: String,
    environment: Environment,
}

impl AppStateBuilder {
    fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            question_count: crate::services::DEFAULT_QUESTION_COUNT,
            reflection_timeout: Duration::from_secs(10),
            tick_interval: Duration::from_secs(1),
            port: 5000,
            host: "127.0.0.1".to_string(),
            environment: Environment::Development,
        }
    }

    pub fn reflection(mut self, count: usize, timeout: Duration) -> Self {
        self.question_count = count;
        self.reflection_timeout = timeout;
        self
    }

    pub fn tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn bind(mut self, host: &str, port: u16) -> Self {
        self.host = host.to_string();
        self.port = port;
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn build(self) -> AppState {
        let reflection = Arc::new(ReflectionGenerator::new(
            Arc::clone(&self.generator),
            self.question_count,
            self.reflection_timeout,
        ));

        AppState {
            generator: self.generator,
            profiles: Arc::new(MemoryProfileStore::new()),
            focus: FocusRegistry::new(reflection, self.tick_interval),
            start_time: Instant::now(),
            port: self.port,
            host: self.host,
            environment: self.environment,
            last_action: Mutex::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::UnconfiguredGenerator;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn last_action_is_recorded() {
        let state = AppState::builder(Arc::new(UnconfiguredGenerator)).build();
        assert_eq!(state.get_last_action(), (None, None));

        state.record_action("focus-start");
        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("focus-start"));
        assert!(at.is_some());
    }

    #[test]
    fn builder_applies_reflection_count() {
        let state = AppState::builder(Arc::new(UnconfiguredGenerator))
            .reflection(5, Duration::from_secs(1))
            .bind("0.0.0.0", 8080)
            .build();
        assert_eq!(state.focus.reflection().count(), 5);
        assert_eq!(state.port, 8080);
    }
}
