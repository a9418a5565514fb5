//! Scene sequencing: Menu → Game → End.
//!
//! Each scene is a small state machine with `on_enter`, `on_tick`,
//! `on_input` and `on_exit`. [`SceneFlow`] owns the active scene, queues
//! input and performs transitions, so no scene ever holds a reference to
//! another.

use std::collections::VecDeque;
use std::fmt;

use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};
use log::{debug, info};

use crate::dialogue::{DialogueSequencer, DialogueStep};
use crate::input::InputEvent;
use crate::rules::GameRules;
use crate::run::{GameParams, GameRun, RunEvent, RunResult};
use crate::tween::{Ease, Tween};

pub trait Scene {
    type Params;

    fn on_enter(&mut self, params: Self::Params);
    fn on_tick(&mut self, dt: f32) -> Option<SceneChange>;
    fn on_input(&mut self, event: InputEvent) -> Option<SceneChange>;
    fn on_exit(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    StartGame(GameParams),
    ShowEnd(RunResult),
    ReturnToMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Menu,
    Game,
    End,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneKind::Menu => "Menu",
            SceneKind::Game => "Game",
            SceneKind::End => "End",
        };
        f.write_str(name)
    }
}

pub struct MenuScene {
    coins_needed: u32,
    elapsed: f32,
}

impl MenuScene {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            coins_needed: rules.coins_needed,
            elapsed: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Scene for MenuScene {
    type Params = ();

    fn on_enter(&mut self, _params: ()) {
        self.elapsed = 0.0;
    }

    fn on_tick(&mut self, dt: f32) -> Option<SceneChange> {
        self.elapsed += dt;
        None
    }

    fn on_input(&mut self, event: InputEvent) -> Option<SceneChange> {
        match event {
            InputEvent::Tap => Some(SceneChange::StartGame(GameParams {
                coins_needed: self.coins_needed,
            })),
            _ => None,
        }
    }

    fn on_exit(&mut self) {}
}

pub struct GameScene {
    rules: GameRules,
    seed: u64,
    run: Option<GameRun>,
}

impl GameScene {
    pub fn new(rules: &GameRules, seed: u64) -> Self {
        Self {
            rules: rules.clone(),
            seed,
            run: None,
        }
    }

    pub fn run(&self) -> Option<&GameRun> {
        self.run.as_ref()
    }

    pub fn run_mut(&mut self) -> Option<&mut GameRun> {
        self.run.as_mut()
    }
}

impl Scene for GameScene {
    type Params = GameParams;

    fn on_enter(&mut self, params: GameParams) {
        debug!(
            "Starting run: {} coins needed, seed {}",
            params.coins_needed, self.seed
        );
        self.run = Some(GameRun::new(
            &self.rules,
            params,
            StdRng::seed_from_u64(self.seed),
        ));
    }

    fn on_tick(&mut self, dt: f32) -> Option<SceneChange> {
        let run = self.run.as_mut()?;
        match run.update(dt) {
            RunEvent::Finished(result) => Some(SceneChange::ShowEnd(result)),
            RunEvent::Respawned(cause) => {
                debug!("Respawned: {:?}", cause);
                None
            }
            RunEvent::Completed | RunEvent::Continue => None,
        }
    }

    fn on_input(&mut self, event: InputEvent) -> Option<SceneChange> {
        if event == InputEvent::Tap {
            if let Some(run) = self.run.as_mut() {
                run.flap();
            }
        }
        None
    }

    fn on_exit(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.teardown();
        }
    }
}

pub struct EndScene {
    messages: Vec<String>,
    coins_needed: u32,
    buttons_enabled: bool,
    reveal_duration: f32,
    result: RunResult,
    dialogue: DialogueSequencer,
    heart: Option<Tween>,
}

impl EndScene {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            messages: rules.dialogue_messages.clone(),
            coins_needed: rules.coins_needed,
            buttons_enabled: rules.end_scene_buttons,
            reveal_duration: rules.heart_reveal_duration,
            result: RunResult::default(),
            dialogue: DialogueSequencer::new(rules.dialogue_messages.clone()),
            heart: None,
        }
    }

    pub fn result(&self) -> RunResult {
        self.result
    }

    pub fn dialogue(&self) -> &DialogueSequencer {
        &self.dialogue
    }

    pub fn buttons_enabled(&self) -> bool {
        self.buttons_enabled
    }

    /// Reveal progress of the heart: 0 hidden, 1 fully shown. Overshoots
    /// slightly during the back-out ease.
    pub fn heart_progress(&self) -> f32 {
        self.heart.as_ref().map_or(0.0, Tween::value)
    }

    pub fn summary(&self) -> Option<String> {
        if !self.dialogue.is_settled() {
            return None;
        }
        Some(format!(
            "Moedas coletadas: {}\nScore: {}",
            self.result.coins, self.result.score
        ))
    }
}

impl Scene for EndScene {
    type Params = RunResult;

    fn on_enter(&mut self, result: RunResult) {
        self.result = result;
        self.dialogue = DialogueSequencer::new(self.messages.clone());
        self.heart = None;
    }

    fn on_tick(&mut self, dt: f32) -> Option<SceneChange> {
        if let Some(heart) = self.heart.as_mut() {
            heart.update(dt);
        }
        None
    }

    fn on_input(&mut self, event: InputEvent) -> Option<SceneChange> {
        match event {
            InputEvent::Tap => {
                if self.dialogue.advance() == DialogueStep::Settled {
                    self.heart = Some(Tween::new(0.0, 1.0, self.reveal_duration, Ease::BackOut));
                    info!(
                        "Dialogue settled: {} coins, score {}",
                        self.result.coins, self.result.score
                    );
                }
                None
            }
            InputEvent::Restart if self.buttons_enabled => {
                Some(SceneChange::StartGame(GameParams {
                    coins_needed: self.coins_needed,
                }))
            }
            InputEvent::Home if self.buttons_enabled => Some(SceneChange::ReturnToMenu),
            _ => None,
        }
    }

    fn on_exit(&mut self) {}
}

pub enum ActiveScene {
    Menu(MenuScene),
    Game(GameScene),
    End(EndScene),
}

impl ActiveScene {
    pub fn kind(&self) -> SceneKind {
        match self {
            ActiveScene::Menu(_) => SceneKind::Menu,
            ActiveScene::Game(_) => SceneKind::Game,
            ActiveScene::End(_) => SceneKind::End,
        }
    }

    fn tick(&mut self, dt: f32) -> Option<SceneChange> {
        match self {
            ActiveScene::Menu(s) => s.on_tick(dt),
            ActiveScene::Game(s) => s.on_tick(dt),
            ActiveScene::End(s) => s.on_tick(dt),
        }
    }

    fn input(&mut self, event: InputEvent) -> Option<SceneChange> {
        match self {
            ActiveScene::Menu(s) => s.on_input(event),
            ActiveScene::Game(s) => s.on_input(event),
            ActiveScene::End(s) => s.on_input(event),
        }
    }

    fn exit(&mut self) {
        match self {
            ActiveScene::Menu(s) => s.on_exit(),
            ActiveScene::Game(s) => s.on_exit(),
            ActiveScene::End(s) => s.on_exit(),
        }
    }
}

/// Owns the active scene for the whole process.
pub struct SceneFlow {
    rules: GameRules,
    rng: StdRng,
    active: ActiveScene,
    pending: VecDeque<InputEvent>,
    transitions: u32,
}

impl SceneFlow {
    pub fn new(rules: GameRules, seed: u64) -> Self {
        let mut menu = MenuScene::new(&rules);
        menu.on_enter(());
        Self {
            rules,
            rng: StdRng::seed_from_u64(seed),
            active: ActiveScene::Menu(menu),
            pending: VecDeque::new(),
            transitions: 0,
        }
    }

    /// Queues an event; it is dispatched at the start of the next update.
    pub fn queue_input(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Dispatches an event to the active scene right away.
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(change) = self.active.input(event) {
            self.apply(change);
        }
    }

    pub fn update(&mut self, dt: f32) {
        while let Some(event) = self.pending.pop_front() {
            self.handle_input(event);
        }

        let dt = dt.clamp(0.0, self.rules.max_frame_delta);
        if let Some(change) = self.active.tick(dt) {
            self.apply(change);
        }
    }

    fn apply(&mut self, change: SceneChange) {
        let from = self.active.kind();
        self.active.exit();

        self.active = match change {
            SceneChange::StartGame(params) => {
                let mut scene = GameScene::new(&self.rules, self.rng.gen());
                scene.on_enter(params);
                ActiveScene::Game(scene)
            }
            SceneChange::ShowEnd(result) => {
                let mut scene = EndScene::new(&self.rules);
                scene.on_enter(result);
                ActiveScene::End(scene)
            }
            SceneChange::ReturnToMenu => {
                let mut scene = MenuScene::new(&self.rules);
                scene.on_enter(());
                ActiveScene::Menu(scene)
            }
        };

        self.transitions += 1;
        info!("Scene {} -> {}", from, self.active.kind());
    }

    pub fn scene(&self) -> &ActiveScene {
        &self.active
    }

    pub fn scene_mut(&mut self) -> &mut ActiveScene {
        &mut self.active
    }

    pub fn kind(&self) -> SceneKind {
        self.active.kind()
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }
}
