//! Abstract spatial query interface for broad-phase collision detection
//!
//! The broad phase quickly culls pairs of objects that cannot possibly be
//! colliding. This abstraction allows swapping partitioning schemes (grid,
//! quadtree, BVH) without changing the collision system.

use crate::ecs::Entity;
use crate::physics::collision::Aabb;
use crate::physics::CollisionLayers;

/// Abstract interface for spatial partitioning used in broad-phase collision detection
///
/// Registration calls (`insert`, `remove`, `update`) take effect on the
/// id-to-proxy map immediately. Implementations may defer structural work, so
/// query results are only guaranteed complete after the next [`rebuild`].
///
/// [`rebuild`]: SpatialQuery::rebuild
pub trait SpatialQuery: Send + Sync {
    /// Register an entity with its bounds and collision filter
    ///
    /// Returns `false` if the entity is already registered.
    fn insert(
        &mut self,
        entity: Entity,
        aabb: Aabb,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> bool;

    /// Remove an entity; returns `false` if it was not registered
    fn remove(&mut self, entity: Entity) -> bool;

    /// Replace an entity's bounds; returns `false` if it was not registered
    fn update(&mut self, entity: Entity, aabb: Aabb) -> bool;

    /// Replace an entity's collision filter; returns `false` if it was not registered
    fn set_filter(
        &mut self,
        entity: Entity,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> bool;

    /// Rebuild the partition from the registered bounds
    fn rebuild(&mut self);

    /// Entities whose bounds overlap `aabb` and whose layers pass the
    /// symmetric filter against `layer`/`mask`, each reported once
    fn potential_collisions(
        &self,
        aabb: &Aabb,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Vec<Entity>;

    /// Visit every entity stored in the partition cells covering `aabb`, each once
    fn query_region(&self, aabb: &Aabb, callback: &mut dyn FnMut(Entity));

    /// Registered bounds of an entity
    fn get_entity_data(&self, entity: Entity) -> Option<Aabb>;

    /// Clear all entities from the spatial structure
    fn clear(&mut self);

    /// Get the number of entities in the structure
    fn entity_count(&self) -> usize;
}
