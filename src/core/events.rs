use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: Uuid,
    pub event_type: GameEventType,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventType {
    RunStarted,
    RunStopped,
    GameOver,
    InputAttached,
    InputDetached,
}

impl GameEvent {
    pub fn new(event_type: GameEventType, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn run_started(run_id: Uuid, canvas_width: f64, canvas_height: f64) -> Self {
        let data = serde_json::json!({
            "run_id": run_id,
            "canvas_width": canvas_width,
            "canvas_height": canvas_height
        });
        Self::new(GameEventType::RunStarted, data)
    }

    pub fn run_stopped(run_id: Uuid, score: u32) -> Self {
        let data = serde_json::json!({
            "run_id": run_id,
            "score": score
        });
        Self::new(GameEventType::RunStopped, data)
    }

    pub fn game_over(run_id: Uuid, score: u32, frames: u64) -> Self {
        let data = serde_json::json!({
            "run_id": run_id,
            "score": score,
            "frames": frames
        });
        Self::new(GameEventType::GameOver, data)
    }

    pub fn input_attached() -> Self {
        Self::new(GameEventType::InputAttached, serde_json::Value::Null)
    }

    pub fn input_detached(reason: &str) -> Self {
        let data = serde_json::json!({
            "reason": reason
        });
        Self::new(GameEventType::InputDetached, data)
    }
}

pub trait GameEventHandler {
    fn handle_event(&mut self, event: &GameEvent);
}

/// Bounded in-memory event history; the oldest entries fall off first.
pub struct EventLogger {
    events: Vec<GameEvent>,
    max_events: usize,
}

impl EventLogger {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    pub fn get_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn get_events_by_type(&self, event_type: &GameEventType) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|event| &event.event_type == event_type)
            .collect()
    }

    pub fn export_events(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl GameEventHandler for EventLogger {
    fn handle_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());

        if self.events.len() > self.max_events {
            self.events.remove(0);
        }
    }
}

/// Logs every event through `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingEventHandler;

impl GameEventHandler for TracingEventHandler {
    fn handle_event(&mut self, event: &GameEvent) {
        tracing::debug!(event = ?event.event_type, data = %event.data, "game event");
    }
}

// Multiple event handlers can be combined
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler<H: GameEventHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventHandler for CompositeEventHandler {
    fn handle_event(&mut self, event: &GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_game_over_event() {
        let run_id = Uuid::new_v4();
        let event = GameEvent::game_over(run_id, 42, 900);

        assert_eq!(event.event_type, GameEventType::GameOver);
        assert_eq!(event.data["score"], 42);
        assert_eq!(event.data["frames"], 900);
        assert_eq!(event.data["run_id"], run_id.to_string());
    }

    #[test]
    fn test_event_logger_capacity() {
        let mut logger = EventLogger::new(3);

        for score in 1..=4 {
            logger.handle_event(&GameEvent::run_stopped(Uuid::new_v4(), score));
        }

        assert_eq!(logger.get_events().len(), 3);
        assert_eq!(logger.get_events()[0].data["score"], 2);
        assert_eq!(logger.get_events()[2].data["score"], 4);
    }

    #[test]
    fn test_event_filtering() {
        let mut logger = EventLogger::default();

        logger.handle_event(&GameEvent::run_started(Uuid::new_v4(), 600.0, 800.0));
        logger.handle_event(&GameEvent::input_detached("stop"));
        logger.handle_event(&GameEvent::input_attached());
        logger.handle_event(&GameEvent::input_detached("game_over"));

        assert_eq!(logger.get_events_by_type(&GameEventType::RunStarted).len(), 1);
        assert_eq!(logger.get_events_by_type(&GameEventType::InputDetached).len(), 2);

        let exported = logger.export_events().unwrap();
        assert!(exported.contains("InputDetached"));
    }

    struct Counter(Rc<RefCell<usize>>);

    impl GameEventHandler for Counter {
        fn handle_event(&mut self, _event: &GameEvent) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_composite_event_handler() {
        let seen = Rc::new(RefCell::new(0));
        let mut composite = CompositeEventHandler::new();
        composite.add_handler(Counter(seen.clone()));
        composite.add_handler(Counter(seen.clone()));
        composite.add_handler(TracingEventHandler);

        composite.handle_event(&GameEvent::input_attached());

        assert_eq!(composite.len(), 3);
        assert_eq!(*seen.borrow(), 2);
    }
}
