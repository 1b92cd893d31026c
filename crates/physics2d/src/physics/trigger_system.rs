//! Trigger volumes built on collision events
//!
//! Membership of an entity in a trigger only changes in response to collision
//! events: an enter event may admit it, an exit event removes it. Admission is
//! gated by the trigger's active flag, its allow-list, one-shot state and
//! cooldown. An entity turned away by a gate stays outside until it leaves and
//! enters again.
//!
//! Per tick, in order: cooldowns count down, collision events are applied
//! (firing Enter and Exit), then every member admitted on an earlier tick gets
//! one Stay while the trigger is active, not a spent one-shot and not cooling
//! down.

use std::collections::{BTreeSet, HashMap};

use crate::ecs::Entity;
use crate::foundation::collections::{CallbackHandle, CallbackRegistry};
use crate::physics::collision_system::{CollisionEvent, CollisionEventKind};

/// Trigger behaviour settings
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerConfig {
    /// Inactive triggers admit nobody and fire nothing
    pub active: bool,
    /// Fire Enter at most once for the lifetime of the trigger
    pub one_shot: bool,
    /// Seconds after an admission during which nobody else is admitted
    pub cooldown: f32,
    /// Entities allowed in; empty admits everyone
    pub allowed: Vec<Entity>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            active: true,
            one_shot: false,
            cooldown: 0.0,
            allowed: Vec::new(),
        }
    }
}

impl TriggerConfig {
    /// One-shot trigger
    pub fn one_shot() -> Self {
        Self {
            one_shot: true,
            ..Self::default()
        }
    }

    /// Trigger that re-arms `seconds` after firing
    pub fn with_cooldown(seconds: f32) -> Self {
        Self {
            cooldown: seconds,
            ..Self::default()
        }
    }

    /// Restrict admission to `entities`
    pub fn allow(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.allowed.extend(entities);
        self
    }

    fn admits(&self, entity: Entity) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&entity)
    }
}

/// Trigger transition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEventKind {
    /// An entity was admitted
    Enter,
    /// A member is still inside
    Stay,
    /// A member left
    Exit,
}

/// Event emitted by [`TriggerSystem::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Enter, stay or exit
    pub kind: TriggerEventKind,
    /// The trigger entity
    pub trigger: Entity,
    /// The entity entering, staying or leaving
    pub other: Entity,
}

/// Trigger callback
pub type TriggerCallback = dyn FnMut(&TriggerEvent);

struct TriggerState {
    config: TriggerConfig,
    has_fired: bool,
    cooldown_remaining: f32,
    inside: BTreeSet<Entity>,
    entered_this_tick: Vec<Entity>,
    callbacks: CallbackRegistry<TriggerCallback>,
}

impl TriggerState {
    fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            has_fired: false,
            cooldown_remaining: 0.0,
            inside: BTreeSet::new(),
            entered_this_tick: Vec::new(),
            callbacks: CallbackRegistry::new(),
        }
    }

    fn spent(&self) -> bool {
        self.config.one_shot && self.has_fired
    }

    fn cooling_down(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    fn tick_cooldown(&mut self, dt: f32) {
        if self.cooling_down() {
            self.cooldown_remaining -= dt;
            if self.cooldown_remaining <= 0.0 {
                self.cooldown_remaining = 0.0;
                self.has_fired = false;
            }
        } else if self.has_fired && !self.config.one_shot {
            self.has_fired = false;
        }
    }
}

/// Tracks trigger membership and fires trigger callbacks
#[derive(Default)]
pub struct TriggerSystem {
    triggers: HashMap<Entity, TriggerState>,
    global_callbacks: CallbackRegistry<TriggerCallback>,
    events: Vec<TriggerEvent>,
}

impl TriggerSystem {
    /// Create an empty trigger system
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `entity` as a trigger; `false` if it already is one
    pub fn add_trigger(&mut self, entity: Entity, config: TriggerConfig) -> bool {
        if self.triggers.contains_key(&entity) {
            log::warn!("{entity} is already a trigger");
            return false;
        }
        self.triggers.insert(entity, TriggerState::new(config));
        log::debug!("added trigger {entity}");
        true
    }

    /// Stop tracking a trigger; members are dropped without Exit callbacks
    pub fn remove_trigger(&mut self, entity: Entity) -> bool {
        self.triggers.remove(&entity).is_some()
    }

    /// Whether `entity` is a tracked trigger
    pub fn is_trigger(&self, entity: Entity) -> bool {
        self.triggers.contains_key(&entity)
    }

    /// Activate or deactivate a trigger
    ///
    /// Deactivating drops all members without Exit callbacks. Entities already
    /// overlapping when the trigger is reactivated are admitted only after they
    /// leave and enter again.
    pub fn set_active(&mut self, entity: Entity, active: bool) -> bool {
        let Some(state) = self.triggers.get_mut(&entity) else {
            return false;
        };
        state.config.active = active;
        if !active {
            state.inside.clear();
        }
        true
    }

    /// Re-arm a trigger, clearing its fired flag and cooldown
    pub fn reset(&mut self, entity: Entity) -> bool {
        let Some(state) = self.triggers.get_mut(&entity) else {
            return false;
        };
        state.has_fired = false;
        state.cooldown_remaining = 0.0;
        true
    }

    /// Whether `other` is currently inside `trigger`
    pub fn is_inside(&self, trigger: Entity, other: Entity) -> bool {
        self.triggers
            .get(&trigger)
            .is_some_and(|state| state.inside.contains(&other))
    }

    /// Current members of a trigger in id order
    pub fn members(&self, trigger: Entity) -> Vec<Entity> {
        self.triggers
            .get(&trigger)
            .map(|state| state.inside.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the trigger has fired and not re-armed yet
    pub fn has_fired(&self, trigger: Entity) -> Option<bool> {
        self.triggers.get(&trigger).map(|state| state.has_fired)
    }

    /// Seconds until the trigger re-arms
    pub fn cooldown_remaining(&self, trigger: Entity) -> Option<f32> {
        self.triggers.get(&trigger).map(|state| state.cooldown_remaining)
    }

    /// Register a callback on one trigger for one kind of event
    pub fn register_callback(
        &mut self,
        trigger: Entity,
        kind: TriggerEventKind,
        mut callback: impl FnMut(&TriggerEvent) + 'static,
    ) -> Option<CallbackHandle> {
        let state = self.triggers.get_mut(&trigger)?;
        Some(state.callbacks.register(Box::new(move |event: &TriggerEvent| {
            if event.kind == kind {
                callback(event);
            }
        })))
    }

    /// Remove a trigger-local callback
    pub fn unregister_callback(&mut self, trigger: Entity, handle: CallbackHandle) -> bool {
        self.triggers
            .get_mut(&trigger)
            .is_some_and(|state| state.callbacks.unregister(handle))
    }

    /// Register a callback invoked for every trigger event of every trigger
    pub fn register_global_callback(
        &mut self,
        callback: impl FnMut(&TriggerEvent) + 'static,
    ) -> CallbackHandle {
        self.global_callbacks.register(Box::new(callback))
    }

    /// Remove a global callback
    pub fn unregister_global_callback(&mut self, handle: CallbackHandle) -> bool {
        self.global_callbacks.unregister(handle)
    }

    /// Events produced by the latest update
    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    /// Apply one tick of collision events
    pub fn update(&mut self, collision_events: &[CollisionEvent], delta_time: f32) {
        self.events.clear();

        for state in self.triggers.values_mut() {
            state.entered_this_tick.clear();
            state.tick_cooldown(delta_time);
        }

        for event in collision_events {
            let (a, b) = (event.pair.entity_a, event.pair.entity_b);
            for (trigger, other) in [(a, b), (b, a)] {
                match event.kind {
                    CollisionEventKind::Enter => self.try_admit(trigger, other),
                    CollisionEventKind::Exit => self.release(trigger, other),
                }
            }
        }

        let mut triggers: Vec<Entity> = self.triggers.keys().copied().collect();
        triggers.sort_unstable();
        for trigger in triggers {
            let Some(state) = self.triggers.get_mut(&trigger) else {
                continue;
            };
            if !state.config.active || state.spent() || state.cooling_down() {
                continue;
            }
            let staying: Vec<Entity> = state
                .inside
                .iter()
                .copied()
                .filter(|other| !state.entered_this_tick.contains(other))
                .collect();
            for other in staying {
                self.fire(TriggerEvent {
                    kind: TriggerEventKind::Stay,
                    trigger,
                    other,
                });
            }
        }
    }

    fn try_admit(&mut self, trigger: Entity, other: Entity) {
        let Some(state) = self.triggers.get_mut(&trigger) else {
            return;
        };
        if !state.config.active
            || !state.config.admits(other)
            || state.spent()
            || state.cooling_down()
            || state.inside.contains(&other)
        {
            log::trace!("trigger {trigger} turned away {other}");
            return;
        }

        state.inside.insert(other);
        state.entered_this_tick.push(other);
        state.has_fired = true;
        if state.config.cooldown > 0.0 {
            state.cooldown_remaining = state.config.cooldown;
        }

        self.fire(TriggerEvent {
            kind: TriggerEventKind::Enter,
            trigger,
            other,
        });
    }

    fn release(&mut self, trigger: Entity, other: Entity) {
        let removed = self
            .triggers
            .get_mut(&trigger)
            .is_some_and(|state| state.inside.remove(&other));
        if removed {
            self.fire(TriggerEvent {
                kind: TriggerEventKind::Exit,
                trigger,
                other,
            });
        }
    }

    /// Trigger-local callbacks first, then global ones
    fn fire(&mut self, event: TriggerEvent) {
        if let Some(state) = self.triggers.get_mut(&event.trigger) {
            for callback in state.callbacks.iter_mut() {
                callback(&event);
            }
        }
        for callback in self.global_callbacks.iter_mut() {
            callback(&event);
        }
        self.events.push(event);
    }
}
