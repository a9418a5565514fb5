use macroquad::prelude::*;

use crate::run::RunState;
use crate::world::{EntityId, EntityKind, World};

/// What the player touched during one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Contacts {
    pub coins: u32,
    pub spikes: u32,
}

impl Contacts {
    pub fn hit(&self) -> bool {
        self.spikes > 0
    }
}

pub fn overlapping(world: &World, kind: EntityKind, player: &Rect) -> Vec<EntityId> {
    world
        .list(kind)
        .iter()
        .filter(|e| e.bounds().overlaps(player))
        .map(|e| e.id)
        .collect()
}

/// Collects a coin. Returns false when the coin no longer exists, so a
/// second overlap report for the same coin cannot count twice.
pub fn pickup_coin(world: &mut World, state: &mut RunState, id: EntityId, points: u32) -> bool {
    if world.take(EntityKind::Coin, id).is_none() {
        return false;
    }
    state.collect_coin(points);
    true
}

pub fn strike_spike(world: &mut World, state: &mut RunState, id: EntityId) -> bool {
    if world.take(EntityKind::Spike, id).is_none() {
        return false;
    }
    state.lose_life();
    true
}

/// Applies every overlap of this tick. Coin pickups are resolved before
/// spike damage.
pub fn resolve(
    world: &mut World,
    state: &mut RunState,
    player: Rect,
    coin_points: u32,
) -> Contacts {
    let mut contacts = Contacts::default();

    for id in overlapping(world, EntityKind::Coin, &player) {
        if pickup_coin(world, state, id, coin_points) {
            contacts.coins += 1;
        }
    }
    for id in overlapping(world, EntityKind::Spike, &player) {
        if strike_spike(world, state, id) {
            contacts.spikes += 1;
        }
    }

    contacts
}
