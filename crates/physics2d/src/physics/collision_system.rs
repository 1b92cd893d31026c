//! Core collision detection system
//!
//! Detection runs in two phases: the broad phase (a [`SpatialQuery`]) culls
//! pairs that cannot touch, the narrow phase tests the remaining pairs
//! exactly. Pair results are kept for two passes so every pass can report
//! which pairs started and which stopped touching.
//!
//! The system owns every collider in a slot map. Callers hold
//! [`ColliderKey`]s or look colliders up by [`Entity`].

use std::collections::{HashMap, HashSet};

use crate::ecs::Entity;
use crate::foundation::collections::{
    BodyKey, CallbackHandle, CallbackRegistry, ColliderKey, SlotMap,
};
use crate::foundation::math::Vec2;
use crate::physics::collision::{narrow_phase, Aabb, ContactResult, Ray, RayHit, Shape};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::config::CollisionConfig;
use crate::spatial::{SpatialQuery, UniformGrid};

/// Collision pair representing two entities that are colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Entity with the smaller id
    pub entity_a: Entity,
    /// Entity with the larger id
    pub entity_b: Entity,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller entity ID first for consistency)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a.id() < entity_b.id() {
            Self { entity_a, entity_b }
        } else {
            Self {
                entity_a: entity_b,
                entity_b: entity_a,
            }
        }
    }

    /// Both ids packed into one integer, smaller id in the high half
    pub const fn key(&self) -> u64 {
        ((self.entity_a.id() as u64) << 32) | self.entity_b.id() as u64
    }

    /// The partner of `entity`, if `entity` is part of the pair
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.entity_a == entity {
            Some(self.entity_b)
        } else if self.entity_b == entity {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// Anything the collision system can track
pub trait Collidable {
    /// Stable id of the object
    fn entity(&self) -> Entity;
    /// Current world-space shape
    fn shape(&self) -> &Shape;
    /// Layers this object belongs to
    fn layer(&self) -> CollisionLayers;
    /// Layers this object collides with
    fn mask(&self) -> CollisionLayers;
    /// Whether the object only reports overlaps and takes no physical response
    fn is_trigger(&self) -> bool {
        false
    }
}

/// Collider record stored by the collision system
#[derive(Debug, Clone)]
pub struct Collider {
    /// Owning entity
    pub entity: Entity,
    /// World-space shape
    pub shape: Shape,
    /// Layers this collider belongs to
    pub layer: CollisionLayers,
    /// Layers this collider collides with
    pub mask: CollisionLayers,
    /// Trigger volumes report overlaps but are skipped by contact resolution
    pub is_trigger: bool,
    /// Physics body driving this collider, if any
    pub body: Option<BodyKey>,
}

impl Collider {
    /// Plain collider with no body attached
    pub const fn new(
        entity: Entity,
        shape: Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Self {
        Self {
            entity,
            shape,
            layer,
            mask,
            is_trigger: false,
            body: None,
        }
    }

    /// Mark the collider as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Attach a physics body
    pub fn with_body(mut self, body: BodyKey) -> Self {
        self.body = Some(body);
        self
    }
}

impl Collidable for Collider {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn layer(&self) -> CollisionLayers {
        self.layer
    }

    fn mask(&self) -> CollisionLayers {
        self.mask
    }

    fn is_trigger(&self) -> bool {
        self.is_trigger
    }
}

/// Whether a pair started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// The pair is touching this pass and was not last pass
    Enter,
    /// The pair touched last pass and does not any more
    Exit,
}

/// Collision transition reported by [`CollisionSystem::update`]
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent {
    /// Enter or exit
    pub kind: CollisionEventKind,
    /// The entities involved
    pub pair: CollisionPair,
    /// Contact with the normal pointing from `pair.entity_a` to `pair.entity_b`;
    /// `None` for exits
    pub contact: Option<ContactResult>,
}

fn has_finite_transform(position: Vec2, rotation: f32) -> bool {
    position.x.is_finite() && position.y.is_finite() && rotation.is_finite()
}

/// Immediate collision callback
pub type CollisionCallback = dyn FnMut(&CollisionEvent);

/// Core collision detection system
///
/// This system manages collision detection between entities using a two-phase
/// approach: broad-phase (spatial query) and narrow-phase (shape intersection).
/// Queries see the broad phase as of the last [`CollisionSystem::update`] or
/// [`CollisionSystem::refresh_broad_phase`].
pub struct CollisionSystem {
    /// Spatial partitioning structure for broad-phase
    spatial_query: Box<dyn SpatialQuery>,

    colliders: SlotMap<ColliderKey, Collider>,
    by_entity: HashMap<Entity, ColliderKey>,

    /// Pair results from the current pass
    current_pairs: HashMap<CollisionPair, bool>,

    /// Pair results from the previous pass
    previous_pairs: HashMap<CollisionPair, bool>,

    events: Vec<CollisionEvent>,
    callbacks: CallbackRegistry<CollisionCallback>,
    world_bounds: Aabb,
    generate_events: bool,
}

impl CollisionSystem {
    /// Create a new collision system with the given spatial query implementation
    ///
    /// `world_bounds` is the region enumerated on every pass.
    pub fn new(spatial_query: Box<dyn SpatialQuery>, world_bounds: Aabb) -> Self {
        Self {
            spatial_query,
            colliders: SlotMap::with_key(),
            by_entity: HashMap::new(),
            current_pairs: HashMap::new(),
            previous_pairs: HashMap::new(),
            events: Vec::new(),
            callbacks: CallbackRegistry::new(),
            world_bounds,
            generate_events: true,
        }
    }

    /// Create a collision system backed by a [`UniformGrid`]
    pub fn from_config(config: &CollisionConfig) -> Self {
        let grid = UniformGrid::new(config.cell_size, config.world_width, config.world_height);
        let bounds = grid.bounds();
        let mut system = Self::new(Box::new(grid), bounds);
        system.generate_events = config.generate_events;
        system
    }

    /// Enable or disable enter/exit event generation
    pub fn set_generate_events(&mut self, enabled: bool) {
        self.generate_events = enabled;
    }

    // ---- Registration ----

    /// Register a collider record
    ///
    /// Returns `None` without side effects if the entity already has a
    /// collider or the shape has a non-finite transform.
    pub fn register_collider(&mut self, collider: Collider) -> Option<ColliderKey> {
        if self.by_entity.contains_key(&collider.entity) {
            log::warn!("entity {} already has a collider", collider.entity);
            return None;
        }
        let shape = &collider.shape;
        if !has_finite_transform(shape.position, shape.rotation) {
            log::warn!("rejecting collider for {}: non-finite transform", collider.entity);
            return None;
        }

        let entity = collider.entity;
        if !self
            .spatial_query
            .insert(entity, shape.aabb(), collider.layer, collider.mask)
        {
            log::warn!("broad phase refused entity {entity}");
            return None;
        }

        let key = self.colliders.insert(collider);
        self.by_entity.insert(entity, key);
        log::debug!("registered collider for {entity}");
        Some(key)
    }

    /// Register a solid collider
    pub fn register(
        &mut self,
        entity: Entity,
        shape: Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Option<ColliderKey> {
        self.register_collider(Collider::new(entity, shape, layer, mask))
    }

    /// Register a trigger volume
    pub fn register_trigger(
        &mut self,
        entity: Entity,
        shape: Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Option<ColliderKey> {
        self.register_collider(Collider::new(entity, shape, layer, mask).as_trigger())
    }

    /// Register any [`Collidable`] by copying its current state
    pub fn register_collidable(&mut self, collidable: &impl Collidable) -> Option<ColliderKey> {
        let mut collider = Collider::new(
            collidable.entity(),
            collidable.shape().clone(),
            collidable.layer(),
            collidable.mask(),
        );
        collider.is_trigger = collidable.is_trigger();
        self.register_collider(collider)
    }

    /// Remove an entity's collider
    ///
    /// Pairs it was part of are reported as exits on the next pass.
    pub fn unregister(&mut self, entity: Entity) -> bool {
        let Some(key) = self.by_entity.remove(&entity) else {
            log::debug!("unregister: {entity} has no collider");
            return false;
        };
        self.colliders.remove(key);
        self.spatial_query.remove(entity);
        log::debug!("unregistered collider for {entity}");
        true
    }

    /// Move a collider; the broad phase sees the new bounds immediately
    ///
    /// A non-finite transform is refused and leaves the collider where it was.
    pub fn set_transform(&mut self, key: ColliderKey, position: Vec2, rotation: f32) -> bool {
        let Some(collider) = self.colliders.get_mut(key) else {
            return false;
        };
        if !has_finite_transform(position, rotation) {
            log::warn!("ignoring non-finite transform for {}", collider.entity);
            return false;
        }
        collider.shape.set_transform(position, rotation);
        self.spatial_query.update(collider.entity, collider.shape.aabb())
    }

    /// Replace a collider's shape
    ///
    /// A shape with a non-finite transform is refused.
    pub fn update_shape(&mut self, key: ColliderKey, shape: Shape) -> bool {
        let Some(collider) = self.colliders.get_mut(key) else {
            return false;
        };
        if !has_finite_transform(shape.position, shape.rotation) {
            log::warn!("ignoring non-finite shape for {}", collider.entity);
            return false;
        }
        collider.shape = shape;
        self.spatial_query.update(collider.entity, collider.shape.aabb())
    }

    /// Change a collider's layers and trigger flag
    ///
    /// The broad phase filters on the new layers from the next rebuild.
    pub fn set_filter(
        &mut self,
        key: ColliderKey,
        layer: CollisionLayers,
        mask: CollisionLayers,
        is_trigger: bool,
    ) -> bool {
        let Some(collider) = self.colliders.get_mut(key) else {
            return false;
        };
        collider.is_trigger = is_trigger;
        if collider.layer == layer && collider.mask == mask {
            return true;
        }
        collider.layer = layer;
        collider.mask = mask;
        self.spatial_query.set_filter(collider.entity, layer, mask)
    }

    /// Push every collider's current bounds to the broad phase and rebuild it
    pub fn refresh_broad_phase(&mut self) {
        for collider in self.colliders.values() {
            self.spatial_query.update(collider.entity, collider.shape.aabb());
        }
        self.spatial_query.rebuild();
    }

    // ---- Callbacks ----

    /// Register a callback invoked for every enter/exit event
    pub fn register_collision_callback(
        &mut self,
        callback: impl FnMut(&CollisionEvent) + 'static,
    ) -> CallbackHandle {
        self.callbacks.register(Box::new(callback))
    }

    /// Remove a collision callback; returns `false` for unknown handles
    pub fn unregister_collision_callback(&mut self, handle: CallbackHandle) -> bool {
        self.callbacks.unregister(handle)
    }

    // ---- Per-pass update ----

    /// Run one detection pass and report enter/exit transitions
    pub fn update(&mut self) {
        self.refresh_broad_phase();

        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();
        self.events.clear();

        let mut entities = Vec::with_capacity(self.colliders.len());
        self.spatial_query
            .query_region(&self.world_bounds, &mut |entity| entities.push(entity));
        entities.sort_unstable();

        let mut evaluated = HashSet::new();
        for entity in entities {
            let Some(collider) = self.collider_by_entity(entity) else {
                continue;
            };
            let mut candidates = self.spatial_query.potential_collisions(
                &collider.shape.aabb(),
                collider.layer,
                collider.mask,
            );
            candidates.sort_unstable();

            for other in candidates {
                if other == entity {
                    continue;
                }
                let pair = CollisionPair::new(entity, other);
                if !evaluated.insert(pair.key()) {
                    continue;
                }
                let (Some(a), Some(b)) = (
                    self.collider_by_entity(pair.entity_a),
                    self.collider_by_entity(pair.entity_b),
                ) else {
                    continue;
                };

                let contact = narrow_phase::test(&a.shape, &b.shape);
                self.current_pairs.insert(pair, contact.is_some());

                if let Some(contact) = contact {
                    if self.generate_events && !self.was_colliding(pair) {
                        self.events.push(CollisionEvent {
                            kind: CollisionEventKind::Enter,
                            pair,
                            contact: Some(contact),
                        });
                    }
                }
            }
        }

        if self.generate_events {
            let mut ended: Vec<CollisionPair> = self
                .previous_pairs
                .iter()
                .filter(|(pair, colliding)| **colliding && !self.is_colliding(**pair))
                .map(|(pair, _)| *pair)
                .collect();
            ended.sort_unstable();
            self.events.extend(ended.into_iter().map(|pair| CollisionEvent {
                kind: CollisionEventKind::Exit,
                pair,
                contact: None,
            }));
        }

        log::trace!(
            "collision pass: {} pairs tested, {} events",
            evaluated.len(),
            self.events.len()
        );

        for event in &self.events {
            for callback in self.callbacks.iter_mut() {
                callback(event);
            }
        }
    }

    fn was_colliding(&self, pair: CollisionPair) -> bool {
        self.previous_pairs.get(&pair).copied().unwrap_or(false)
    }

    /// Whether the pair was found touching in the latest pass
    pub fn is_colliding(&self, pair: CollisionPair) -> bool {
        self.current_pairs.get(&pair).copied().unwrap_or(false)
    }

    /// Events produced by the latest pass, enters first
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Pairs that started touching in the latest pass
    pub fn get_collision_entered(&self) -> Vec<CollisionPair> {
        self.pairs_of_kind(CollisionEventKind::Enter)
    }

    /// Pairs that stopped touching in the latest pass
    pub fn get_collision_exited(&self) -> Vec<CollisionPair> {
        self.pairs_of_kind(CollisionEventKind::Exit)
    }

    fn pairs_of_kind(&self, kind: CollisionEventKind) -> Vec<CollisionPair> {
        self.events
            .iter()
            .filter(|event| event.kind == kind)
            .map(|event| event.pair)
            .collect()
    }

    /// Every pair touching in the latest pass
    pub fn get_current_collisions(&self) -> impl Iterator<Item = CollisionPair> + '_ {
        self.current_pairs
            .iter()
            .filter(|(_, colliding)| **colliding)
            .map(|(pair, _)| *pair)
    }

    // ---- Queries ----

    /// Whether `point` lies inside `shape`
    pub fn point_in_shape(point: Vec2, shape: &Shape) -> bool {
        shape.contains_point(point)
    }

    /// Test two arbitrary shapes against each other
    pub fn check_shapes(a: &Shape, b: &Shape) -> Option<ContactResult> {
        narrow_phase::test(a, b)
    }

    /// Nearest registered collider touching `shape`
    ///
    /// "Nearest" compares shape centres. The contact normal points from
    /// `shape` toward the collider.
    pub fn check_collision(
        &self,
        shape: &Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
        exclude: Option<Entity>,
    ) -> Option<(Entity, ContactResult)> {
        let center = shape.center();
        self.contacts_with(shape, layer, mask, exclude)
            .min_by(|(_, a_center, _), (_, b_center, _)| {
                (a_center - center)
                    .magnitude_squared()
                    .total_cmp(&(b_center - center).magnitude_squared())
            })
            .map(|(entity, _, contact)| (entity, contact))
    }

    /// Every registered collider touching `shape`, nearest first
    pub fn get_all_collisions(
        &self,
        shape: &Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
        exclude: Option<Entity>,
    ) -> Vec<(Entity, ContactResult)> {
        let center = shape.center();
        let mut hits: Vec<_> = self.contacts_with(shape, layer, mask, exclude).collect();
        hits.sort_by(|(_, a, _), (_, b, _)| {
            (a - center)
                .magnitude_squared()
                .total_cmp(&(b - center).magnitude_squared())
        });
        hits.into_iter()
            .map(|(entity, _, contact)| (entity, contact))
            .collect()
    }

    fn contacts_with<'a>(
        &'a self,
        shape: &'a Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
        exclude: Option<Entity>,
    ) -> impl Iterator<Item = (Entity, Vec2, ContactResult)> + 'a {
        self.spatial_query
            .potential_collisions(&shape.aabb(), layer, mask)
            .into_iter()
            .filter(move |entity| Some(*entity) != exclude)
            .filter_map(move |entity| {
                let collider = self.collider_by_entity(entity)?;
                let contact = narrow_phase::test(shape, &collider.shape)?;
                Some((entity, collider.shape.center(), contact))
            })
    }

    /// Colliders containing `point` whose layer is in `mask`
    pub fn query_point(&self, point: Vec2, mask: CollisionLayers) -> Vec<Entity> {
        let mut found = Vec::new();
        self.spatial_query
            .query_region(&Aabb::new(point, point), &mut |entity| {
                if let Some(collider) = self.collider_by_entity(entity) {
                    if collider.layer.intersects(mask) && collider.shape.contains_point(point) {
                        found.push(entity);
                    }
                }
            });
        found.sort_unstable();
        found
    }

    /// Closest collider hit by `ray` within `max_distance`
    pub fn ray_cast(&self, ray: &Ray, max_distance: f32, mask: CollisionLayers) -> Option<RayHit> {
        self.ray_cast_all(ray, max_distance, mask).into_iter().next()
    }

    /// Every collider hit by `ray` within `max_distance`, nearest first
    pub fn ray_cast_all(&self, ray: &Ray, max_distance: f32, mask: CollisionLayers) -> Vec<RayHit> {
        if !(max_distance >= 0.0) {
            return Vec::new();
        }
        let mut hits = Vec::new();
        self.spatial_query
            .query_region(&ray.segment_aabb(max_distance), &mut |entity| {
                let Some(collider) = self.collider_by_entity(entity) else {
                    return;
                };
                if !collider.layer.intersects(mask) {
                    return;
                }
                if let Some((distance, normal)) =
                    narrow_phase::ray_intersection(&collider.shape, ray, max_distance)
                {
                    hits.push(RayHit {
                        entity,
                        distance,
                        point: ray.point_at(distance),
                        normal,
                    });
                }
            });
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Visit every collider whose bounds overlap `region`
    pub fn query_region(&self, region: &Aabb, mut callback: impl FnMut(Entity)) {
        self.spatial_query.query_region(region, &mut |entity| {
            if self
                .collider_by_entity(entity)
                .is_some_and(|collider| collider.shape.aabb().overlaps(region))
            {
                callback(entity);
            }
        });
    }

    /// Broad-phase candidates for `shape` in id order (no exact test)
    pub fn potential_collisions(
        &self,
        shape: &Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Vec<Entity> {
        let mut candidates = self
            .spatial_query
            .potential_collisions(&shape.aabb(), layer, mask);
        candidates.sort_unstable();
        candidates
    }

    // ---- Accessors ----

    /// Collider by key
    pub fn collider(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key)
    }

    /// Collider by entity
    pub fn collider_by_entity(&self, entity: Entity) -> Option<&Collider> {
        self.by_entity
            .get(&entity)
            .and_then(|key| self.colliders.get(*key))
    }

    /// Key of an entity's collider
    pub fn key_of(&self, entity: Entity) -> Option<ColliderKey> {
        self.by_entity.get(&entity).copied()
    }

    /// Check if an entity is registered
    pub fn has_collider(&self, entity: Entity) -> bool {
        self.by_entity.contains_key(&entity)
    }

    /// Get the number of registered colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Get spatial query for direct access (e.g., for visualization)
    pub fn spatial_query(&self) -> &dyn SpatialQuery {
        self.spatial_query.as_ref()
    }

    /// Clear all collision data
    ///
    /// Pair history is dropped too, so no exit events follow.
    pub fn clear(&mut self) {
        self.spatial_query.clear();
        self.colliders.clear();
        self.by_entity.clear();
        self.current_pairs.clear();
        self.previous_pairs.clear();
        self.events.clear();
    }
}
