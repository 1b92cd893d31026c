//! Uniform grid broad phase
//!
//! The world rectangle `[0, width] x [0, height]` is split into square cells.
//! Every proxy is appended to each cell its bounds touch, so one entity may sit
//! in several cells. Bounds outside the world are clamped onto the border
//! cells. Cells are rebuilt from scratch on every [`SpatialQuery::rebuild`].

use std::collections::{HashMap, HashSet};

use super::SpatialQuery;
use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use crate::physics::collision::Aabb;
use crate::physics::CollisionLayers;

#[derive(Debug, Clone, Copy)]
struct Proxy {
    aabb: Aabb,
    layer: CollisionLayers,
    mask: CollisionLayers,
}

/// Inclusive range of cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min_col: usize,
    min_row: usize,
    max_col: usize,
    max_row: usize,
}

/// Fixed-size uniform grid over the world rectangle
pub struct UniformGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<Entity>>,
    proxies: HashMap<Entity, Proxy>,
}

impl UniformGrid {
    /// Create a grid with `ceil(world / cell_size)` cells per axis (at least one)
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(cell_size: f32, world_width: f32, world_height: f32) -> Self {
        let cell_size = if cell_size > 0.0 && cell_size.is_finite() {
            cell_size
        } else {
            log::warn!("invalid grid cell size {cell_size}, using 1.0");
            1.0
        };
        let columns = ((world_width / cell_size).ceil().max(1.0)) as usize;
        let rows = ((world_height / cell_size).ceil().max(1.0)) as usize;

        log::debug!("uniform grid: {columns}x{rows} cells of size {cell_size}");

        Self {
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
            proxies: HashMap::new(),
        }
    }

    /// Edge length of a cell
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid dimensions as (columns, rows)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// The world rectangle covered by the grid
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec2::zeros(),
            Vec2::new(
                self.columns as f32 * self.cell_size,
                self.rows as f32 * self.cell_size,
            ),
        )
    }

    /// Number of entries stored in the cell at `(column, row)`
    pub fn cell_population(&self, column: usize, row: usize) -> usize {
        if column < self.columns && row < self.rows {
            self.cells[row * self.columns + column].len()
        } else {
            0
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cell_range(&self, aabb: &Aabb) -> Option<CellRange> {
        let finite = aabb.min.iter().chain(aabb.max.iter()).all(|v| v.is_finite());
        if !finite {
            return None;
        }
        let to_cell = |value: f32, count: usize| -> usize {
            ((value / self.cell_size).floor().max(0.0) as usize).min(count - 1)
        };
        Some(CellRange {
            min_col: to_cell(aabb.min.x, self.columns),
            min_row: to_cell(aabb.min.y, self.rows),
            max_col: to_cell(aabb.max.x, self.columns),
            max_row: to_cell(aabb.max.y, self.rows),
        })
    }

    fn for_each_in_range(&self, range: CellRange, mut visit: impl FnMut(Entity)) {
        let mut seen = HashSet::new();
        for row in range.min_row..=range.max_row {
            for col in range.min_col..=range.max_col {
                for &entity in &self.cells[row * self.columns + col] {
                    if seen.insert(entity) {
                        visit(entity);
                    }
                }
            }
        }
    }
}

impl SpatialQuery for UniformGrid {
    fn insert(
        &mut self,
        entity: Entity,
        aabb: Aabb,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> bool {
        if self.proxies.contains_key(&entity) {
            return false;
        }
        self.proxies.insert(entity, Proxy { aabb, layer, mask });
        true
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.proxies.remove(&entity).is_some()
    }

    fn update(&mut self, entity: Entity, aabb: Aabb) -> bool {
        match self.proxies.get_mut(&entity) {
            Some(proxy) => {
                proxy.aabb = aabb;
                true
            }
            None => false,
        }
    }

    fn set_filter(
        &mut self,
        entity: Entity,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> bool {
        match self.proxies.get_mut(&entity) {
            Some(proxy) => {
                proxy.layer = layer;
                proxy.mask = mask;
                true
            }
            None => false,
        }
    }

    fn rebuild(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }

        let mut placed = 0;
        for (&entity, proxy) in &self.proxies {
            let Some(range) = self.cell_range(&proxy.aabb) else {
                continue;
            };
            for row in range.min_row..=range.max_row {
                for col in range.min_col..=range.max_col {
                    self.cells[row * self.columns + col].push(entity);
                    placed += 1;
                }
            }
        }

        log::trace!(
            "grid rebuilt: {} proxies in {} cell slots",
            self.proxies.len(),
            placed
        );
    }

    fn potential_collisions(
        &self,
        aabb: &Aabb,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Vec<Entity> {
        let Some(range) = self.cell_range(aabb) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();
        self.for_each_in_range(range, |entity| {
            let Some(proxy) = self.proxies.get(&entity) else {
                return;
            };
            if CollisionLayers::should_collide(layer, mask, proxy.layer, proxy.mask)
                && proxy.aabb.overlaps(aabb)
            {
                candidates.push(entity);
            }
        });
        candidates
    }

    fn query_region(&self, aabb: &Aabb, callback: &mut dyn FnMut(Entity)) {
        if let Some(range) = self.cell_range(aabb) {
            self.for_each_in_range(range, |entity| {
                if self.proxies.contains_key(&entity) {
                    callback(entity);
                }
            });
        }
    }

    fn get_entity_data(&self, entity: Entity) -> Option<Aabb> {
        self.proxies.get(&entity).map(|proxy| proxy.aabb)
    }

    fn clear(&mut self) {
        self.proxies.clear();
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    fn entity_count(&self) -> usize {
        self.proxies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const ALL: CollisionLayers = CollisionLayers::ALL;

    fn boxed(x: f32, y: f32, half: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec2::new(x, y), Vec2::new(half, half))
    }

    #[test]
    fn test_dimensions_round_up() {
        let grid = UniformGrid::new(10.0, 95.0, 40.0);
        assert_eq!(grid.dimensions(), (10, 4));

        let tiny = UniformGrid::new(10.0, 0.0, 0.0);
        assert_eq!(tiny.dimensions(), (1, 1));
    }

    #[test]
    fn test_insert_remove() {
        let mut grid = UniformGrid::new(10.0, 100.0, 100.0);
        let entity = Entity::new(1);
        assert!(grid.insert(entity, boxed(5.0, 5.0, 1.0), ALL, ALL));
        assert!(!grid.insert(entity, boxed(5.0, 5.0, 1.0), ALL, ALL));
        assert_eq!(grid.entity_count(), 1);

        assert!(grid.remove(entity));
        assert!(!grid.remove(entity));
        assert_eq!(grid.entity_count(), 0);
    }

    #[test]
    fn test_proxy_spans_several_cells() {
        let mut grid = UniformGrid::new(10.0, 100.0, 100.0);
        grid.insert(Entity::new(1), boxed(10.0, 10.0, 2.0), ALL, ALL);
        grid.rebuild();
        for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(grid.cell_population(col, row), 1);
        }
        assert_eq!(grid.cell_population(2, 2), 0);
    }

    #[test]
    fn test_cells_follow_update_after_rebuild() {
        let mut grid = UniformGrid::new(10.0, 100.0, 100.0);
        let entity = Entity::new(7);
        grid.insert(entity, boxed(5.0, 5.0, 1.0), ALL, ALL);
        grid.rebuild();

        assert!(grid.update(entity, boxed(85.0, 85.0, 1.0)));
        assert_eq!(grid.get_entity_data(entity), Some(boxed(85.0, 85.0, 1.0)));
        grid.rebuild();
        assert_eq!(grid.cell_population(0, 0), 0);
        assert_eq!(grid.cell_population(8, 8), 1);

        let found = grid.potential_collisions(&boxed(85.0, 85.0, 0.5), ALL, ALL);
        assert_eq!(found, vec![entity]);
    }

    #[test]
    fn test_out_of_world_bounds_clamp_to_edge() {
        let mut grid = UniformGrid::new(10.0, 50.0, 50.0);
        grid.insert(Entity::new(1), boxed(-20.0, 25.0, 1.0), ALL, ALL);
        grid.rebuild();
        assert_eq!(grid.cell_population(0, 2), 1);

        let mut visited = Vec::new();
        grid.query_region(&grid.bounds(), &mut |entity| visited.push(entity));
        assert_eq!(visited, vec![Entity::new(1)]);
    }

    #[test]
    fn test_layer_filter() {
        let mut grid = UniformGrid::new(10.0, 100.0, 100.0);
        let (player, enemy) = (CollisionLayers::PLAYER, CollisionLayers::ENEMY);
        grid.insert(Entity::new(1), boxed(5.0, 5.0, 1.0), enemy, player);
        grid.insert(Entity::new(2), boxed(5.0, 5.0, 1.0), CollisionLayers::DEBRIS, ALL);
        grid.rebuild();

        let found = grid.potential_collisions(&boxed(5.0, 5.0, 1.0), player, enemy);
        assert_eq!(found, vec![Entity::new(1)]);
    }

    #[test]
    fn test_filter_change_applies_to_queries() {
        let mut grid = UniformGrid::new(10.0, 100.0, 100.0);
        let entity = Entity::new(4);
        grid.insert(entity, boxed(5.0, 5.0, 1.0), CollisionLayers::DEBRIS, ALL);
        grid.rebuild();

        let query = boxed(5.0, 5.0, 1.0);
        let (player, enemy) = (CollisionLayers::PLAYER, CollisionLayers::ENEMY);
        assert!(grid.potential_collisions(&query, player, enemy).is_empty());

        assert!(grid.set_filter(entity, enemy, player));
        let found = grid.potential_collisions(&query, player, enemy);
        assert_eq!(found, vec![entity]);

        assert!(!grid.set_filter(Entity::new(99), ALL, ALL));
        assert_eq!(grid.get_entity_data(Entity::new(99)), None);
    }

    #[test]
    fn test_query_region_reports_each_entity_once() {
        let mut grid = UniformGrid::new(5.0, 100.0, 100.0);
        grid.insert(Entity::new(3), boxed(50.0, 50.0, 20.0), ALL, ALL);
        grid.rebuild();

        let mut count = 0;
        grid.query_region(&grid.bounds(), &mut |_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_broad_phase_is_superset_of_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut grid = UniformGrid::new(8.0, 100.0, 100.0);
        let mut boxes = Vec::new();

        for id in 0..120 {
            let aabb = boxed(
                rng.gen_range(-10.0..110.0),
                rng.gen_range(-10.0..110.0),
                rng.gen_range(0.1..12.0),
            );
            grid.insert(Entity::new(id), aabb, ALL, ALL);
            boxes.push((Entity::new(id), aabb));
        }
        grid.rebuild();

        for (entity, aabb) in &boxes {
            let candidates: HashSet<Entity> = grid
                .potential_collisions(aabb, ALL, ALL)
                .into_iter()
                .collect();
            for (other, other_aabb) in &boxes {
                if other != entity && aabb.overlaps(other_aabb) {
                    assert!(
                        candidates.contains(other),
                        "{entity} missed overlapping {other}"
                    );
                }
            }
        }
    }
}
