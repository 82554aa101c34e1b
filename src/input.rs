use phong_camera::Axis;
use phong_scene::CanvasAction;
use winit::keyboard::{Key, NamedKey};

/// Keyboard shortcut for a canvas button, if any.
pub fn action_for_key(key: &Key) -> Option<CanvasAction> {
    match key {
        Key::Named(NamedKey::PageUp) => Some(CanvasAction::MoveUp),
        Key::Named(NamedKey::PageDown) => Some(CanvasAction::MoveDown),
        Key::Character(c) => match c.as_str() {
            "x" | "X" => Some(CanvasAction::Turn(Axis::Plate)),
            "y" | "Y" => Some(CanvasAction::Turn(Axis::Horizontal)),
            "z" | "Z" => Some(CanvasAction::Turn(Axis::Vertical)),
            "+" | "=" => Some(CanvasAction::ZoomIn),
            "-" | "_" => Some(CanvasAction::ZoomOut),
            "b" | "B" => Some(CanvasAction::RandomBackground),
            "r" | "R" => Some(CanvasAction::RandomRotation),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_close_key(key: &Key) -> bool {
    matches!(key, Key::Named(NamedKey::Escape))
}
