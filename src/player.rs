use macroquad::prelude::*;

use crate::rules::GameRules;
use crate::timer::Timer;
use crate::tween::{Ease, Tween};
use crate::world::centered_rect;

/// Wing poses cycled while flying.
pub const WING_FRAMES: usize = 3;

pub struct Player {
    pub position: Vec2,
    pub velocity_y: f32,
    pub size: Vec2,
    gravity: f32,
    flap_strength: f32,
    tilt_degrees: f32,
    tilt_duration: f32,
    tilt: Option<Tween>,
    frame: usize,
    frame_timer: Timer,
}

impl Player {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            position: start_position(rules),
            velocity_y: 0.0,
            size: vec2(rules.player_width, rules.player_height),
            gravity: rules.gravity,
            flap_strength: rules.flap_strength,
            tilt_degrees: rules.flap_tilt_degrees,
            tilt_duration: rules.flap_tilt_duration,
            tilt: None,
            frame: 1,
            frame_timer: Timer::repeating(rules.wing_frame_interval),
        }
    }

    /// Sets the upward velocity outright. Repeated flaps never stack.
    pub fn flap(&mut self) {
        self.velocity_y = -self.flap_strength;
        self.tilt = Some(
            Tween::new(0.0, self.tilt_degrees, self.tilt_duration, Ease::SineInOut).yoyo(),
        );
    }

    pub fn launch(&mut self, strength: f32) {
        self.velocity_y = -strength;
    }

    pub fn update(&mut self, dt: f32) {
        self.velocity_y += self.gravity * dt;
        self.position.y += self.velocity_y * dt;

        if let Some(tilt) = self.tilt.as_mut() {
            tilt.update(dt);
            if tilt.is_finished() {
                self.tilt = None;
            }
        }

        let steps = self.frame_timer.tick(dt) as usize;
        self.frame = (self.frame + steps) % WING_FRAMES;
    }

    pub fn bounds(&self) -> Rect {
        centered_rect(self.position, self.size)
    }

    /// Visual tilt in degrees.
    pub fn rotation(&self) -> f32 {
        self.tilt.as_ref().map_or(0.0, Tween::value)
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_out_of_bounds(&self, height: f32, fall_margin: f32, ceiling_margin: f32) -> bool {
        self.position.y > height + fall_margin || self.position.y < -ceiling_margin
    }
}

pub fn start_position(rules: &GameRules) -> Vec2 {
    vec2(
        rules.viewport_width * rules.player_start_x,
        rules.viewport_height * rules.player_start_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flap_overrides_velocity() {
        let mut player = Player::new(&GameRules::default());
        player.velocity_y = 400.0;
        player.flap();
        assert_eq!(player.velocity_y, -260.0);
        player.flap();
        assert_eq!(player.velocity_y, -260.0);
    }

    #[test]
    fn test_gravity_integrates_each_tick() {
        let mut player = Player::new(&GameRules::default());
        let start_y = player.position.y;
        player.update(0.5);
        assert_eq!(player.velocity_y, 300.0);
        assert_eq!(player.position.y, start_y + 150.0);
    }

    #[test]
    fn test_flap_then_fall_is_parabolic() {
        let mut player = Player::new(&GameRules::default());
        let start_y = player.position.y;
        player.flap();
        player.update(0.25);
        assert!(player.position.y < start_y);
        player.update(1.0);
        assert!(player.velocity_y > 0.0);
    }

    #[test]
    fn test_tilt_is_cosmetic_and_settles() {
        let mut player = Player::new(&GameRules::default());
        player.flap();
        player.update(0.12);
        assert!((player.rotation() + 12.0).abs() < 1e-3);
        player.update(0.2);
        assert_eq!(player.rotation(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_margins() {
        let mut player = Player::new(&GameRules::default());
        player.position.y = 671.0;
        assert!(player.is_out_of_bounds(640.0, 30.0, 40.0));
        player.position.y = 670.0;
        assert!(!player.is_out_of_bounds(640.0, 30.0, 40.0));
        player.position.y = -41.0;
        assert!(player.is_out_of_bounds(640.0, 30.0, 40.0));
    }

    #[test]
    fn test_wing_frames_cycle() {
        let mut rules = GameRules::default();
        rules.wing_frame_interval = 0.125;
        let mut player = Player::new(&rules);
        assert_eq!(player.frame(), 1);
        player.update(0.125);
        assert_eq!(player.frame(), 2);
        player.update(0.125);
        assert_eq!(player.frame(), 0);
    }
}
