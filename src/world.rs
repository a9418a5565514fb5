use macroquad::prelude::*;

use crate::tween::{Ease, Tween};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Spike,
    Coin,
}

pub type EntityId = u64;

pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub spin: Option<Tween>,
}

impl Entity {
    pub fn bounds(&self) -> Rect {
        centered_rect(self.position, self.size)
    }

    /// Visual rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.spin.as_ref().map_or(0.0, Tween::value)
    }
}

pub fn centered_rect(center: Vec2, size: Vec2) -> Rect {
    Rect::new(
        center.x - size.x / 2.0,
        center.y - size.y / 2.0,
        size.x,
        size.y,
    )
}

/// Live obstacles and coins of one run. Nothing here outlives a reset.
pub struct World {
    pub spikes: Vec<Entity>,
    pub coins: Vec<Entity>,
    despawn_x: f32,
    next_id: EntityId,
}

impl World {
    pub fn new(despawn_x: f32) -> Self {
        Self {
            spikes: Vec::new(),
            coins: Vec::new(),
            despawn_x,
            next_id: 1,
        }
    }

    pub fn spawn(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        velocity: Vec2,
        size: Vec2,
        spin_duration: Option<f32>,
    ) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;

        let entity = Entity {
            id,
            kind,
            position,
            velocity,
            size,
            spin: spin_duration.map(|d| Tween::new(0.0, 360.0, d, Ease::Linear).looping()),
        };
        match kind {
            EntityKind::Spike => self.spikes.push(entity),
            EntityKind::Coin => self.coins.push(entity),
        }
        id
    }

    /// Moves every entity by its velocity and advances coin spin.
    pub fn advance(&mut self, dt: f32) {
        for entity in self.spikes.iter_mut().chain(self.coins.iter_mut()) {
            entity.position += entity.velocity * dt;
            if let Some(spin) = entity.spin.as_mut() {
                spin.update(dt);
            }
        }
    }

    /// Drops entities that have left the viewport on the left. Returns how
    /// many were removed.
    pub fn cull(&mut self) -> usize {
        let before = self.len();
        let limit = self.despawn_x;
        self.spikes.retain(|e| e.position.x >= limit);
        self.coins.retain(|e| e.position.x >= limit);
        before - self.len()
    }

    /// Removes an entity by id. Returns `None` if it is already gone, which
    /// callers treat as a no-op.
    pub fn take(&mut self, kind: EntityKind, id: EntityId) -> Option<Entity> {
        let list = self.list_mut(kind);
        let index = list.iter().position(|e| e.id == id)?;
        Some(list.remove(index))
    }

    pub fn get(&self, kind: EntityKind, id: EntityId) -> Option<&Entity> {
        self.list(kind).iter().find(|e| e.id == id)
    }

    pub fn clear(&mut self) {
        self.spikes.clear();
        self.coins.clear();
    }

    pub fn len(&self) -> usize {
        self.spikes.len() + self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn list(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Spike => &self.spikes,
            EntityKind::Coin => &self.coins,
        }
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Spike => &mut self.spikes,
            EntityKind::Coin => &mut self.coins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_spike_at(x: f32) -> (World, EntityId) {
        let mut world = World::new(-40.0);
        let id = world.spawn(
            EntityKind::Spike,
            vec2(x, 100.0),
            vec2(-180.0, 0.0),
            vec2(22.0, 22.0),
            None,
        );
        (world, id)
    }

    #[test]
    fn test_advance_moves_left_by_velocity() {
        let (mut world, id) = world_with_spike_at(400.0);
        world.advance(0.5);
        let spike = world.get(EntityKind::Spike, id).unwrap();
        assert_eq!(spike.position, vec2(310.0, 100.0));
    }

    #[test]
    fn test_cull_removes_entities_past_left_edge() {
        let (mut world, _) = world_with_spike_at(-30.0);
        world.spawn(
            EntityKind::Coin,
            vec2(200.0, 100.0),
            vec2(-160.0, 0.0),
            vec2(38.4, 38.4),
            Some(1.2),
        );

        world.advance(0.125);
        assert_eq!(world.cull(), 1);
        assert!(world.spikes.is_empty());
        assert_eq!(world.coins.len(), 1);
    }

    #[test]
    fn test_entity_exactly_on_limit_survives() {
        let (mut world, _) = world_with_spike_at(-40.0);
        assert_eq!(world.cull(), 0);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_take_twice_is_noop() {
        let (mut world, id) = world_with_spike_at(100.0);
        assert!(world.take(EntityKind::Spike, id).is_some());
        assert!(world.take(EntityKind::Spike, id).is_none());
        assert!(world.take(EntityKind::Coin, id).is_none());
    }

    #[test]
    fn test_coin_spin_is_cosmetic() {
        let mut world = World::new(-40.0);
        let id = world.spawn(
            EntityKind::Coin,
            vec2(100.0, 100.0),
            vec2(-160.0, 0.0),
            vec2(38.4, 38.4),
            Some(1.0),
        );
        world.advance(0.25);
        let coin = world.get(EntityKind::Coin, id).unwrap();
        assert!((coin.rotation() - 90.0).abs() < 1e-3);
        assert_eq!(coin.bounds().w, 38.4);
    }

    #[test]
    fn test_ids_are_unique() {
        let (mut world, first) = world_with_spike_at(100.0);
        let second = world.spawn(
            EntityKind::Coin,
            vec2(100.0, 100.0),
            Vec2::ZERO,
            vec2(10.0, 10.0),
            None,
        );
        assert_ne!(first, second);
    }
}
