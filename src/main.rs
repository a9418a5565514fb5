use std::path::Path;

use bat_path::assets::Assets;
use bat_path::flow::SceneFlow;
use bat_path::input::poll_input;
use bat_path::render;
use bat_path::rules::{load_rules, save_rules, GameRules};
use bat_path::texture_gen::Palette;
use log::{info, warn};
use macroquad::prelude::*;

const RULES_PATH: &str = "assets/config/rules.json";

fn window_conf() -> Conf {
    let defaults = GameRules::default();
    Conf {
        window_title: "Caminho do Morcego".to_string(),
        window_width: defaults.viewport_width as i32,
        window_height: defaults.viewport_height as i32,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let rules = load_rules(RULES_PATH);
    if !Path::new(RULES_PATH).exists() {
        // Leave an editable copy of the defaults behind.
        if let Err(e) = save_rules(RULES_PATH, &rules) {
            warn!("Could not write default rules: {e}");
        }
    }

    let seed = rules.seed.unwrap_or_else(random_seed_from_time);
    info!("Using seed {seed}");

    render::draw_loading(&rules);
    next_frame().await;
    let assets = Assets::generate(&Palette::default());

    let mut flow = SceneFlow::new(rules, seed);

    loop {
        let frame_start = std::time::Instant::now();

        for event in poll_input() {
            flow.queue_input(event);
        }
        flow.update(get_frame_time());

        render::draw(&flow, &assets, flow.rules());

        if flow.rules().vsync_enabled {
            let target = std::time::Duration::from_micros(16_666);
            let elapsed = frame_start.elapsed();
            if elapsed < target {
                std::thread::sleep(target - elapsed);
            }
        }

        next_frame().await;
    }
}

fn random_seed_from_time() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_secs() ^ (now.subsec_nanos() as u64).rotate_left(32)
}
