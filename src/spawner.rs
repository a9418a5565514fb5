use ::rand::Rng;
use macroquad::prelude::*;

use crate::rules::GameRules;
use crate::timer::Timer;
use crate::world::{EntityId, EntityKind, World};

/// Drives the obstacle and coin timers of a run.
pub struct Spawner {
    obstacle_timer: Timer,
    coin_timer: Timer,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpawnCounts {
    pub spikes: u32,
    pub coins: u32,
}

impl Spawner {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            obstacle_timer: Timer::repeating(rules.obstacle_interval),
            coin_timer: Timer::repeating(rules.coin_interval),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        world: &mut World,
        rules: &GameRules,
        rng: &mut impl Rng,
    ) -> SpawnCounts {
        let mut counts = SpawnCounts::default();

        for _ in 0..self.obstacle_timer.tick(dt) {
            spawn_obstacle(world, rules, rng);
            counts.spikes += 1;
        }
        for _ in 0..self.coin_timer.tick(dt) {
            spawn_coin(world, rules, rng);
            counts.coins += 1;
        }

        counts
    }

    pub fn stop(&mut self) {
        self.obstacle_timer.cancel();
        self.coin_timer.cancel();
    }

    pub fn restart(&mut self) {
        self.obstacle_timer.restart();
        self.coin_timer.restart();
    }

    pub fn is_active(&self) -> bool {
        self.obstacle_timer.is_active() || self.coin_timer.is_active()
    }
}

pub fn spawn_obstacle(world: &mut World, rules: &GameRules, rng: &mut impl Rng) -> EntityId {
    let h = rules.viewport_height;
    let y = rng.gen_range(h * rules.obstacle_min_y..=h * rules.obstacle_max_y);
    world.spawn(
        EntityKind::Spike,
        vec2(rules.viewport_width + rules.spawn_offset_x, y),
        vec2(-rules.obstacle_speed, 0.0),
        vec2(rules.obstacle_size, rules.obstacle_size),
        None,
    )
}

pub fn spawn_coin(world: &mut World, rules: &GameRules, rng: &mut impl Rng) -> EntityId {
    let h = rules.viewport_height;
    let y = rng.gen_range(h * rules.coin_min_y..=h * rules.coin_max_y);
    world.spawn(
        EntityKind::Coin,
        vec2(rules.viewport_width + rules.spawn_offset_x, y),
        vec2(-rules.coin_speed, 0.0),
        vec2(rules.coin_size, rules.coin_size),
        Some(rules.coin_spin_duration),
    )
}
