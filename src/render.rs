use macroquad::prelude::*;

use crate::assets::{Assets, SpriteKind};
use crate::flow::{ActiveScene, EndScene, MenuScene, SceneFlow};
use crate::rules::GameRules;
use crate::run::GameRun;

const MENU_TINT: Color = rgb(0x22, 0x33, 0x5a);
const FLASH: Color = rgb(0xff, 0x64, 0x3c);
const DARK_TEXT: Color = rgb(0x11, 0x11, 0x11);
const SUMMARY_TEXT: Color = rgb(0x00, 0x66, 0x44);
const HINT_TEXT: Color = rgb(0xdd, 0xdd, 0xdd);

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

/// Maps the fixed logical viewport onto the window, letterboxed.
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub camera: Camera2D,
}

impl Viewport {
    pub fn fit(rules: &GameRules) -> Self {
        let (w, h) = (rules.viewport_width, rules.viewport_height);
        let sw = screen_width();
        let sh = screen_height();
        let scale = (sw / w).min(sh / h).max(f32::EPSILON);

        let camera = Camera2D {
            target: vec2(w / 2.0, h / 2.0),
            zoom: vec2(2.0 * scale / sw, 2.0 * scale / sh),
            ..Default::default()
        };

        Self {
            width: w,
            height: h,
            scale,
            camera,
        }
    }

    fn to_screen(&self, p: Vec2) -> Vec2 {
        self.camera.world_to_screen(p)
    }

    /// Text is drawn with the default camera so glyphs stay crisp; positions
    /// and sizes are given in viewport units.
    fn text_centered(&self, text: &str, center: Vec2, size: f32, color: Color) {
        let font_size = (size * self.scale).round().max(1.0) as u16;
        let line_height = size * 1.25;
        let lines: Vec<&str> = text.lines().collect();
        let top = center.y - line_height * (lines.len() as f32 - 1.0) / 2.0;

        for (i, line) in lines.iter().enumerate() {
            let dims = measure_text(line, None, font_size, 1.0);
            let anchor = self.to_screen(vec2(center.x, top + i as f32 * line_height));
            draw_text(
                line,
                anchor.x - dims.width / 2.0,
                anchor.y + dims.offset_y / 2.0,
                font_size as f32,
                color,
            );
        }
    }

    fn text_at(&self, text: &str, pos: Vec2, size: f32, color: Color, align_right: bool) {
        let font_size = (size * self.scale).round().max(1.0) as u16;
        let dims = measure_text(text, None, font_size, 1.0);
        let anchor = self.to_screen(pos);
        let x = if align_right { anchor.x - dims.width } else { anchor.x };
        draw_text(text, x, anchor.y + dims.offset_y, font_size as f32, color);
    }
}

pub fn draw(flow: &SceneFlow, assets: &Assets, rules: &GameRules) {
    clear_background(BLACK);
    let view = Viewport::fit(rules);

    match flow.scene() {
        ActiveScene::Menu(menu) => draw_menu(menu, assets, &view),
        ActiveScene::Game(game) => {
            if let Some(run) = game.run() {
                draw_game(run, assets, &view, rules.debug_overlay);
            }
        }
        ActiveScene::End(end) => draw_end(end, assets, &view),
    }

    set_default_camera();
}

/// Plain loading frame shown while textures are generated.
pub fn draw_loading(rules: &GameRules) {
    clear_background(BLACK);
    let view = Viewport::fit(rules);
    view.text_centered(
        "Carregando...",
        vec2(view.width / 2.0, view.height / 2.0),
        18.0,
        WHITE,
    );
}

fn draw_menu(menu: &MenuScene, assets: &Assets, view: &Viewport) {
    let (w, h) = (view.width, view.height);
    set_camera(&view.camera);

    draw_tiled(assets.texture(SpriteKind::PathTile), 0.0, view, MENU_TINT);

    let t = menu.elapsed();
    let frame = (t / 0.12) as usize;
    let bob = (t * 3.0).sin() * 6.0;
    draw_sprite(assets.bat_frame(frame), vec2(w / 2.0, h * 0.45 + bob), 1.6, 0.0, WHITE);

    let button = Rect::new(w * 0.2, h * 0.68 - 28.0, w * 0.6, 56.0);
    draw_rectangle(button.x, button.y, button.w, button.h, WHITE);
    draw_rectangle_lines(button.x, button.y, button.w, button.h, 2.0, DARK_TEXT);

    set_default_camera();
    view.text_centered("Caminho do Morcego", vec2(w / 2.0, h * 0.18), 22.0, WHITE);
    view.text_centered(
        "Toque na tela para subir/voar\nEvite espinhos, colete moedas",
        vec2(w / 2.0, h * 0.28),
        14.0,
        HINT_TEXT,
    );
    view.text_centered("Começar", vec2(w / 2.0, h * 0.68), 20.0, DARK_TEXT);
}

fn draw_game(run: &GameRun, assets: &Assets, view: &Viewport, debug_overlay: bool) {
    let (w, h) = (view.width, view.height);
    set_camera(&view.camera);

    draw_tiled(
        assets.texture(SpriteKind::PathTile),
        run.background_offset(),
        view,
        WHITE,
    );

    let world = run.world();
    for spike in &world.spikes {
        draw_sprite(assets.texture(SpriteKind::Spike), spike.position, 1.0, 0.0, WHITE);
    }
    for coin in &world.coins {
        draw_sprite(
            assets.texture(SpriteKind::Coin),
            coin.position,
            1.2,
            coin.rotation(),
            WHITE,
        );
    }

    let player = run.player();
    draw_sprite(
        assets.bat_frame(player.frame()),
        player.position,
        1.0,
        player.rotation(),
        WHITE,
    );

    if debug_overlay {
        let r = player.bounds();
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, BLUE);
        for e in world.spikes.iter() {
            let r = e.bounds();
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, RED);
        }
        for e in world.coins.iter() {
            let r = e.bounds();
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, YELLOW);
        }
    }

    let flash = run.flash_alpha();
    if flash > 0.0 {
        draw_rectangle(0.0, 0.0, w, h, Color { a: flash * 0.8, ..FLASH });
    }
    let fade = run.fade_alpha();
    if fade > 0.0 {
        draw_rectangle(0.0, 0.0, w, h, Color { a: fade, ..BLACK });
    }

    set_default_camera();
    let state = run.state();
    view.text_at(
        &format!("Moedas: {}/{}", state.coins_collected, state.coins_needed),
        vec2(10.0, 10.0),
        14.0,
        WHITE,
        false,
    );
    view.text_at(
        &format!("Vidas: {}", state.lives),
        vec2(10.0, 32.0),
        14.0,
        WHITE,
        false,
    );
    view.text_at(
        &format!("Score: {}", state.score),
        vec2(w - 10.0, 10.0),
        14.0,
        WHITE,
        true,
    );
}

fn draw_end(end: &EndScene, assets: &Assets, view: &Viewport) {
    let (w, h) = (view.width, view.height);
    set_camera(&view.camera);

    draw_texture_ex(
        assets.texture(SpriteKind::CalmBackground),
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(w, h)),
            ..Default::default()
        },
    );
    draw_sprite(
        assets.texture(SpriteKind::Bat),
        vec2(w * 0.36, h * 0.5),
        2.2,
        0.0,
        WHITE,
    );

    let progress = end.heart_progress();
    if progress > 0.0 {
        let alpha = progress.clamp(0.0, 1.0);
        draw_sprite(
            assets.texture(SpriteKind::Heart),
            vec2(w / 2.0, h * 0.62),
            0.6 + 0.4 * progress,
            0.0,
            Color { a: alpha, ..WHITE },
        );
    }

    let dialog = Rect::new(w * 0.06, h * 0.78 - 41.0, w * 0.88, 82.0);
    draw_rectangle(dialog.x, dialog.y, dialog.w, dialog.h, WHITE);
    draw_rectangle_lines(dialog.x, dialog.y, dialog.w, dialog.h, 2.0, LIGHTGRAY);

    let buttons = [
        (w * 0.32, Color::from_rgba(0x2b, 0x8a, 0x78, 255), "Reiniciar [R]"),
        (w * 0.68, Color::from_rgba(0x53, 0x66, 0xf2, 255), "Início [Esc]"),
    ];
    if end.buttons_enabled() {
        for (cx, color, _) in buttons {
            draw_rectangle(cx - w * 0.19, h * 0.9 - 20.0, w * 0.38, 40.0, color);
        }
    }

    set_default_camera();
    let wrapped = wrap_text(end.dialogue().current_text(), w * 0.8, 16.0, view.scale);
    view.text_centered(&wrapped, vec2(w / 2.0, h * 0.78), 16.0, DARK_TEXT);

    if let Some(summary) = end.summary() {
        view.text_centered(&summary, vec2(w / 2.0, h * 0.69), 14.0, SUMMARY_TEXT);
    }

    if end.buttons_enabled() {
        for (cx, _, label) in buttons {
            view.text_centered(label, vec2(cx, h * 0.9), 14.0, WHITE);
        }
    }
}

fn draw_sprite(texture: &Texture2D, center: Vec2, scale: f32, rotation_deg: f32, tint: Color) {
    let size = vec2(texture.width(), texture.height()) * scale;
    draw_texture_ex(
        texture,
        center.x - size.x / 2.0,
        center.y - size.y / 2.0,
        tint,
        DrawTextureParams {
            dest_size: Some(size),
            rotation: rotation_deg.to_radians(),
            ..Default::default()
        },
    );
}

fn draw_tiled(tile: &Texture2D, offset_x: f32, view: &Viewport, tint: Color) {
    let (tw, th) = (tile.width().max(1.0), tile.height().max(1.0));
    let shift = offset_x.rem_euclid(tw);

    let mut y = 0.0;
    while y < view.height {
        let mut x = -shift;
        while x < view.width {
            draw_texture(tile, x, y, tint);
            x += tw;
        }
        y += th;
    }
}

/// Greedy word wrap measured at the on-screen font size.
fn wrap_text(text: &str, max_width: f32, size: f32, scale: f32) -> String {
    let font_size = (size * scale).round().max(1.0) as u16;
    let limit = max_width * scale;

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && measure_text(&candidate, None, font_size, 1.0).width > limit {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
