//! Event system for broadcasting physics events
//!
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Queuing support (immediate + deferred delivery)

use std::collections::HashMap;

use crate::ecs::Entity;
use crate::foundation::math::Vec2;

/// Argument key for the first entity of a collision pair
pub const ARG_ENTITY_A: &str = "entity_a";
/// Argument key for the second entity of a collision pair
pub const ARG_ENTITY_B: &str = "entity_b";
/// Argument key for the trigger entity of a trigger event
pub const ARG_TRIGGER: &str = "trigger";
/// Argument key for the entity that entered, stayed in or left a trigger
pub const ARG_OTHER: &str = "other";
/// Argument key for a contact normal
pub const ARG_NORMAL: &str = "normal";
/// Argument key for a penetration depth
pub const ARG_PENETRATION: &str = "penetration";

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Two colliders started overlapping
    CollisionEnter,
    /// Two colliders stopped overlapping
    CollisionExit,
    /// An entity was admitted into a trigger
    TriggerEnter,
    /// An entity is still inside a trigger
    TriggerStay,
    /// An entity left a trigger
    TriggerExit,
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventArg {
    /// Entity reference
    Entity(Entity),
    /// 2D vector
    Vector(f32, f32),
    /// Scalar value
    Scalar(f32),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Timestamp when event was created (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get an entity argument if present
    pub fn get_entity(&self, key: &str) -> Option<Entity> {
        if let Some(EventArg::Entity(entity)) = self.get_arg(key) {
            Some(*entity)
        } else {
            None
        }
    }

    /// Get a vector argument if present
    pub fn get_vector(&self, key: &str) -> Option<Vec2> {
        if let Some(EventArg::Vector(x, y)) = self.get_arg(key) {
            Some(Vec2::new(*x, *y))
        } else {
            None
        }
    }

    /// Get a scalar argument if present
    pub fn get_scalar(&self, key: &str) -> Option<f32> {
        if let Some(EventArg::Scalar(value)) = self.get_arg(key) {
            Some(*value)
        } else {
            None
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) -> bool,
{
    fn on_event(&mut self, event: &Event) -> bool {
        self(event)
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(f64, Event)>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    current_time: f64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            handlers: HashMap::new(),
            current_time: 0.0,
        }
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Current time as last set by [`EventSystem::update_time`]
    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Number of handlers registered for an event type
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.get(&event_type).map_or(0, Vec::len)
    }

    /// Send event for immediate handling this frame
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Post event for deferred delivery at specified time
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        self.deferred_queue.push((delivery_time, event));
    }

    /// Number of events waiting for delivery (immediate and deferred)
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Dispatch all pending events
    /// Processes immediate queue first, then due deferred events
    pub fn dispatch(&mut self) {
        let immediate = std::mem::take(&mut self.immediate_queue);
        for event in immediate {
            self.dispatch_event(&event);
        }

        let mut i = 0;
        while i < self.deferred_queue.len() {
            if self.deferred_queue[i].0 <= self.current_time {
                let (_, event) = self.deferred_queue.remove(i);
                self.dispatch_event(&event);
            } else {
                i += 1;
            }
        }
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        consume: bool,
    ) -> Box<dyn EventHandler> {
        let log = Rc::clone(log);
        Box::new(move |_: &Event| {
            log.borrow_mut().push(name);
            consume
        })
    }

    #[test]
    fn test_immediate_dispatch() {
        let mut system = EventSystem::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        system.register_handler(EventType::CollisionEnter, recorder(&log, "enter", false));
        system.register_handler(EventType::CollisionExit, recorder(&log, "exit", false));

        let event = Event::new(EventType::CollisionEnter, 0.0)
            .with_arg(ARG_ENTITY_A, EventArg::Entity(Entity::new(1)))
            .with_arg(ARG_ENTITY_B, EventArg::Entity(Entity::new(2)));
        system.send(event);
        system.dispatch();

        assert_eq!(*log.borrow(), vec!["enter"]);
        assert_eq!(system.pending(), 0);
    }

    #[test]
    fn test_deferred_dispatch() {
        let mut system = EventSystem::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        system.register_handler(EventType::TriggerEnter, recorder(&log, "late", false));
        system.update_time(0.0);

        system.post(1.0, Event::new(EventType::TriggerEnter, 0.0));

        system.update_time(0.5);
        system.dispatch();
        assert!(log.borrow().is_empty());
        assert_eq!(system.pending(), 1);

        system.update_time(1.0);
        system.dispatch();
        assert_eq!(*log.borrow(), vec!["late"]);
        assert_eq!(system.pending(), 0);
    }

    #[test]
    fn test_event_consumption() {
        let mut system = EventSystem::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        system.register_handler(EventType::TriggerStay, recorder(&log, "first", true));
        system.register_handler(EventType::TriggerStay, recorder(&log, "second", false));
        assert_eq!(system.handler_count(EventType::TriggerStay), 2);

        system.send(Event::new(EventType::TriggerStay, 0.0));
        system.dispatch();

        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn test_typed_argument_accessors() {
        let event = Event::new(EventType::CollisionEnter, 2.5)
            .with_arg(ARG_ENTITY_A, EventArg::Entity(Entity::new(4)))
            .with_arg(ARG_NORMAL, EventArg::Vector(0.0, 1.0))
            .with_arg(ARG_PENETRATION, EventArg::Scalar(0.25));

        assert_eq!(event.get_entity(ARG_ENTITY_A), Some(Entity::new(4)));
        assert_eq!(event.get_vector(ARG_NORMAL), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(event.get_scalar(ARG_PENETRATION), Some(0.25));
        // Wrong variant under a key reads as absent
        assert_eq!(event.get_scalar(ARG_NORMAL), None);
        assert_eq!(event.get_entity(ARG_ENTITY_B), None);
    }
}
