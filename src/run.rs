use ::rand::rngs::StdRng;
use log::{debug, info};

use crate::collision;
use crate::player::Player;
use crate::rules::GameRules;
use crate::spawner::Spawner;
use crate::timer::Timer;
use crate::tween::{Ease, Tween};
use crate::world::World;

/// Handed from the menu to a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameParams {
    pub coins_needed: u32,
}

impl Default for GameParams {
    fn default() -> Self {
        Self { coins_needed: 8 }
    }
}

/// Final tally carried into the end scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResult {
    pub coins: u32,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub coins_collected: u32,
    pub lives: i32,
    pub score: u32,
    pub coins_needed: u32,
    start_lives: i32,
}

impl RunState {
    pub fn new(coins_needed: u32, start_lives: i32) -> Self {
        Self {
            coins_collected: 0,
            lives: start_lives,
            score: 0,
            coins_needed: coins_needed.max(1),
            start_lives,
        }
    }

    pub fn collect_coin(&mut self, points: u32) {
        self.coins_collected = self.coins_collected.saturating_add(1);
        self.score = self.score.saturating_add(points);
    }

    pub fn lose_life(&mut self) {
        self.lives -= 1;
    }

    pub fn add_time_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn is_defeated(&self) -> bool {
        self.lives <= 0
    }

    pub fn is_complete(&self) -> bool {
        self.coins_collected >= self.coins_needed
    }

    /// Back to a fresh run with the same coin target.
    pub fn reset(&mut self) {
        self.coins_collected = 0;
        self.lives = self.start_lives;
        self.score = 0;
    }

    pub fn result(&self) -> RunResult {
        RunResult {
            coins: self.coins_collected,
            score: self.score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnCause {
    OutOfBounds,
    LivesExhausted,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    Continue,
    Respawned(RespawnCause),
    Completed,
    /// The completion fade is over; emitted exactly once per run.
    Finished(RunResult),
}

/// One game run: the player, live entities, the three timers and the tally.
pub struct GameRun {
    rules: GameRules,
    rng: StdRng,
    state: RunState,
    player: Player,
    world: World,
    spawner: Spawner,
    score_timer: Timer,
    phase: RunPhase,
    fade: Option<Tween>,
    flash: Option<Tween>,
    delivered: bool,
    respawns: u32,
    background_offset: f32,
}

impl GameRun {
    pub fn new(rules: &GameRules, params: GameParams, rng: StdRng) -> Self {
        let mut player = Player::new(rules);
        player.launch(rules.launch_strength);

        Self {
            rules: rules.clone(),
            rng,
            state: RunState::new(params.coins_needed, rules.start_lives),
            player,
            world: World::new(rules.despawn_x),
            spawner: Spawner::new(rules),
            score_timer: Timer::repeating(rules.score_interval),
            phase: RunPhase::Running,
            fade: None,
            flash: None,
            delivered: false,
            respawns: 0,
            background_offset: 0.0,
        }
    }

    pub fn flap(&mut self) {
        if self.phase == RunPhase::Running {
            self.player.flap();
        }
    }

    pub fn update(&mut self, dt: f32) -> RunEvent {
        if let Some(flash) = self.flash.as_mut() {
            flash.update(dt);
            if flash.is_finished() {
                self.flash = None;
            }
        }

        match self.phase {
            RunPhase::Running => self.update_running(dt),
            RunPhase::Completed => self.update_completed(dt),
        }
    }

    fn update_running(&mut self, dt: f32) -> RunEvent {
        let ticks = self.score_timer.tick(dt);
        self.state.add_time_score(ticks);

        self.spawner
            .update(dt, &mut self.world, &self.rules, &mut self.rng);

        self.player.update(dt);
        self.world.advance(dt);
        self.world.cull();

        let contacts = collision::resolve(
            &mut self.world,
            &mut self.state,
            self.player.bounds(),
            self.rules.coin_score,
        );
        if contacts.hit() {
            self.flash = Some(Tween::new(
                1.0,
                0.0,
                self.rules.hit_flash_duration,
                Ease::Linear,
            ));
        }

        self.background_offset += self.rules.background_scroll_speed * dt;

        if self.player.is_out_of_bounds(
            self.rules.viewport_height,
            self.rules.fall_margin,
            self.rules.ceiling_margin,
        ) {
            self.respawn(RespawnCause::OutOfBounds);
            return RunEvent::Respawned(RespawnCause::OutOfBounds);
        }

        if self.state.is_defeated() {
            self.respawn(RespawnCause::LivesExhausted);
            return RunEvent::Respawned(RespawnCause::LivesExhausted);
        }

        if self.state.is_complete() {
            self.complete();
            return RunEvent::Completed;
        }

        RunEvent::Continue
    }

    fn update_completed(&mut self, dt: f32) -> RunEvent {
        if self.delivered {
            return RunEvent::Continue;
        }

        let done = match self.fade.as_mut() {
            Some(fade) => {
                fade.update(dt);
                fade.is_finished()
            }
            None => true,
        };

        if done {
            self.delivered = true;
            return RunEvent::Finished(self.state.result());
        }
        RunEvent::Continue
    }

    fn respawn(&mut self, cause: RespawnCause) {
        self.respawns += 1;
        info!(
            "Run reset ({:?}) after {} coins, score {}",
            cause, self.state.coins_collected, self.state.score
        );

        self.state.reset();
        self.world.clear();
        self.player = Player::new(&self.rules);
        self.player.launch(self.rules.launch_strength);
        self.spawner.restart();
        self.score_timer.restart();
    }

    fn complete(&mut self) {
        self.stop_timers();
        self.phase = RunPhase::Completed;
        self.fade = Some(Tween::new(
            0.0,
            1.0,
            self.rules.finish_fade_duration,
            Ease::Linear,
        ));
        info!(
            "Level complete: {} coins, score {}",
            self.state.coins_collected, self.state.score
        );
    }

    /// Cancels the obstacle, coin and score timers.
    pub fn stop_timers(&mut self) {
        self.spawner.stop();
        self.score_timer.cancel();
        debug!("Run timers stopped");
    }

    pub fn timers_active(&self) -> bool {
        self.spawner.is_active() || self.score_timer.is_active()
    }

    pub fn teardown(&mut self) {
        self.stop_timers();
        self.world.clear();
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn respawns(&self) -> u32 {
        self.respawns
    }

    pub fn background_offset(&self) -> f32 {
        self.background_offset
    }

    /// Opacity of the black completion overlay.
    pub fn fade_alpha(&self) -> f32 {
        self.fade.as_ref().map_or(0.0, Tween::value)
    }

    pub fn flash_alpha(&self) -> f32 {
        self.flash.as_ref().map_or(0.0, Tween::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::EntityKind;
    use ::rand::SeedableRng;
    use macroquad::prelude::*;

    fn quiet_rules() -> GameRules {
        // No gravity or launch so the player hovers in place.
        GameRules {
            gravity: 0.0,
            launch_strength: 0.0,
            ..GameRules::default()
        }
    }

    fn new_run(rules: &GameRules) -> GameRun {
        GameRun::new(rules, GameParams::default(), StdRng::seed_from_u64(3))
    }

    fn coin_on_player(run: &mut GameRun) {
        let pos = run.player().position;
        run.world_mut()
            .spawn(EntityKind::Coin, pos, Vec2::ZERO, vec2(20.0, 20.0), None);
    }

    #[test]
    fn test_score_ticks_every_half_second() {
        let rules = quiet_rules();
        let mut run = new_run(&rules);
        for _ in 0..8 {
            assert_eq!(run.update(0.25), RunEvent::Continue);
        }
        assert_eq!(run.state().score, 4);
    }

    #[test]
    fn test_coin_and_time_score_add_up() {
        let rules = quiet_rules();
        let mut run = new_run(&rules);
        coin_on_player(&mut run);
        run.update(0.5);
        assert_eq!(run.state().coins_collected, 1);
        assert_eq!(run.state().score, 11);
    }

    #[test]
    fn test_spike_hit_resets_whole_run() {
        let rules = quiet_rules();
        let mut run = new_run(&rules);
        coin_on_player(&mut run);
        run.update(0.25);
        assert_eq!(run.state().score, 10);

        run.world_mut().spawn(
            EntityKind::Coin,
            vec2(300.0, 100.0),
            Vec2::ZERO,
            vec2(10.0, 10.0),
            None,
        );
        let pos = run.player().position;
        run.world_mut()
            .spawn(EntityKind::Spike, pos, Vec2::ZERO, vec2(22.0, 22.0), None);

        let event = run.update(0.125);
        assert_eq!(event, RunEvent::Respawned(RespawnCause::LivesExhausted));
        assert_eq!(run.state().coins_collected, 0);
        assert_eq!(run.state().score, 0);
        assert_eq!(run.state().lives, 1);
        assert_eq!(run.state().coins_needed, 8);
        assert!(run.world().is_empty());
        assert_eq!(run.phase(), RunPhase::Running);
        assert!(run.flash_alpha() > 0.0);
    }

    #[test]
    fn test_falling_below_viewport_resets_with_lives_left() {
        let rules = GameRules {
            start_lives: 3,
            ..quiet_rules()
        };
        let mut run = new_run(&rules);
        coin_on_player(&mut run);
        run.update(0.125);
        assert_eq!(run.state().coins_collected, 1);

        run.player_mut().position.y = 671.0;
        let event = run.update(0.0);
        assert_eq!(event, RunEvent::Respawned(RespawnCause::OutOfBounds));
        assert_eq!(run.state().coins_collected, 0);
        assert_eq!(run.state().lives, 3);
        assert_eq!(run.respawns(), 1);
        assert_eq!(run.player().position, crate::player::start_position(&rules));
    }

    #[test]
    fn test_out_of_bounds_outranks_completion() {
        let rules = quiet_rules();
        let mut run = GameRun::new(
            &rules,
            GameParams { coins_needed: 1 },
            StdRng::seed_from_u64(3),
        );
        coin_on_player(&mut run);
        run.player_mut().position.y = -100.0;
        let pos = run.player().position;
        run.world_mut()
            .spawn(EntityKind::Coin, pos, Vec2::ZERO, vec2(20.0, 20.0), None);

        assert_eq!(
            run.update(0.0),
            RunEvent::Respawned(RespawnCause::OutOfBounds)
        );
    }

    #[test]
    fn test_spike_hit_outranks_final_coin_in_same_tick() {
        let rules = quiet_rules();
        let mut run = GameRun::new(
            &rules,
            GameParams { coins_needed: 1 },
            StdRng::seed_from_u64(3),
        );
        coin_on_player(&mut run);
        let pos = run.player().position;
        run.world_mut()
            .spawn(EntityKind::Spike, pos, Vec2::ZERO, vec2(22.0, 22.0), None);

        let event = run.update(0.0625);
        assert_eq!(event, RunEvent::Respawned(RespawnCause::LivesExhausted));
        assert_eq!(run.phase(), RunPhase::Running);
        assert_eq!(run.state().coins_collected, 0);
        assert!(run.timers_active());
    }

    #[test]
    fn test_completion_stops_timers_and_finishes_once() {
        let rules = quiet_rules();
        let mut run = new_run(&rules);

        let mut completed_at = None;
        for tick in 0..8 {
            coin_on_player(&mut run);
            let event = run.update(0.25);
            if event == RunEvent::Completed {
                completed_at = Some(tick);
            }
        }
        assert_eq!(completed_at, Some(7));
        assert_eq!(run.phase(), RunPhase::Completed);
        assert!(!run.timers_active());

        let expected = RunResult {
            coins: 8,
            score: 8 * 10 + 4,
        };
        assert_eq!(run.state().result(), expected);

        // World frozen while fading: no more spawns, score or pickups.
        coin_on_player(&mut run);
        assert_eq!(run.update(0.25), RunEvent::Continue);
        assert_eq!(run.state().result(), expected);
        assert!(run.fade_alpha() > 0.0);

        let mut finished = Vec::new();
        for _ in 0..20 {
            if let RunEvent::Finished(result) = run.update(0.25) {
                finished.push(result);
            }
        }
        assert_eq!(finished, vec![expected]);
        assert!(!run.timers_active());
    }

    #[test]
    fn test_flap_ignored_after_completion() {
        let rules = quiet_rules();
        let mut run = GameRun::new(
            &rules,
            GameParams { coins_needed: 1 },
            StdRng::seed_from_u64(3),
        );
        coin_on_player(&mut run);
        assert_eq!(run.update(0.0), RunEvent::Completed);

        run.flap();
        assert_eq!(run.player().velocity_y, 0.0);
    }

    #[test]
    fn test_spawned_entities_scroll_off_and_are_culled() {
        let rules = quiet_rules();
        let mut run = new_run(&rules);
        run.update(1.25);
        assert!(!run.world().is_empty());

        // 440 units at 160/s takes under 3s; keep ticking past that while
        // the spawner keeps adding new ones on the right.
        for _ in 0..40 {
            run.update(0.125);
            for e in run.world().spikes.iter().chain(run.world().coins.iter()) {
                assert!(e.position.x >= rules.despawn_x);
            }
        }
    }

    #[test]
    fn test_teardown_clears_and_stops() {
        let rules = quiet_rules();
        let mut run = new_run(&rules);
        run.update(2.0);
        run.teardown();
        assert!(run.world().is_empty());
        assert!(!run.timers_active());
    }
}
