use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Screen tap, click or the flap keys.
    Tap,
    /// Play again from the end scene.
    Restart,
    /// Back to the menu from the end scene.
    Home,
}

/// Collects this frame's input. Touches are mirrored to the left mouse
/// button by macroquad, so reading both would count a tap twice.
pub fn poll_input() -> Vec<InputEvent> {
    let mut events = Vec::new();

    if is_mouse_button_pressed(MouseButton::Left) {
        events.push(InputEvent::Tap);
    }
    for key in [KeyCode::Space, KeyCode::Enter, KeyCode::Up, KeyCode::W] {
        if is_key_pressed(key) {
            events.push(InputEvent::Tap);
        }
    }
    if is_key_pressed(KeyCode::R) {
        events.push(InputEvent::Restart);
    }
    if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::H) {
        events.push(InputEvent::Home);
    }

    events
}
