//! Collision layer system for filtering collision detection
//!
//! Every collidable carries two 32-bit masks: its *layer* ("what I am") and
//! its *mask* ("what I collide with"). Two collidables interact only when
//! each one's layer appears in the other's mask.

bitflags::bitflags! {
    /// Collision layer bitmask
    ///
    /// The named layers occupy bits 0-7; bits 8-31 are free for game-specific
    /// layers via [`CollisionLayers::custom`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles (bullets, arrows, etc.)
        const PROJECTILE = 1 << 2;
        /// Static environment geometry (walls, map objects)
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 4;
        /// Debris and small physics objects
        const DEBRIS = 1 << 5;
        /// NPCs and interactables
        const NPC = 1 << 6;
        /// Pickups and collectibles
        const PICKUP = 1 << 7;
    }
}

impl CollisionLayers {
    /// No collision layer
    pub const NONE: Self = Self::empty();

    /// Every bit set, including the custom range
    pub const ALL: Self = Self::from_bits_retain(u32::MAX);

    /// A user-defined layer in the custom range (bits 8-31)
    ///
    /// Out-of-range bits yield [`CollisionLayers::NONE`].
    pub const fn custom(bit: u32) -> Self {
        if bit >= 8 && bit < 32 {
            Self::from_bits_retain(1 << bit)
        } else {
            Self::NONE
        }
    }

    /// Check if two collidables should interact based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use physics2d::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::ENVIRONMENT;
    /// let enemy_mask = CollisionLayers::PLAYER | CollisionLayers::PROJECTILE;
    /// let player = (CollisionLayers::PLAYER, player_mask);
    /// let enemy = (CollisionLayers::ENEMY, enemy_mask);
    /// assert!(CollisionLayers::should_collide(player.0, player.1, enemy.0, enemy.1));
    /// ```
    pub fn should_collide(
        layer_a: Self,
        mask_a: Self,
        layer_b: Self,
        mask_b: Self,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }

    /// Combine several layers into one mask
    pub fn mask(layers: &[Self]) -> Self {
        layers.iter().fold(Self::NONE, |acc, &layer| acc | layer)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player wants the enemy, the enemy only listens for projectiles
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PROJECTILE,
        ));
    }

    #[test]
    fn test_mask_creation() {
        let mask = CollisionLayers::mask(&[
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENVIRONMENT,
        ]);
        assert_eq!(
            mask,
            CollisionLayers::PLAYER | CollisionLayers::ENEMY | CollisionLayers::ENVIRONMENT
        );
    }

    #[test]
    fn test_custom_layers_survive_masking() {
        let layer = CollisionLayers::custom(20);
        assert_eq!(layer.bits(), 1 << 20);
        assert!(CollisionLayers::ALL.intersects(layer));
        assert!(CollisionLayers::custom(3).is_empty());
        assert!(CollisionLayers::custom(40).is_empty());
    }
}
