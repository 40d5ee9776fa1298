//! egui on top of SDL2 and glow.
//!
//! [`Overlay`] owns the egui context and its glow painter, and feeds egui the
//! SDL2 events of each frame. Only the input the debug panel needs is
//! translated: pointer, wheel, text and editing keys.

use std::{sync::Arc, time::Instant};

use sdl2::{
    event::{Event, WindowEvent},
    keyboard::{Keycode, Mod},
    mouse::MouseButton,
};

use crate::error::{Error, Result};

fn modifiers(keymod: Mod) -> egui::Modifiers {
    let ctrl = keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD);
    egui::Modifiers {
        alt: keymod.intersects(Mod::LALTMOD | Mod::RALTMOD),
        ctrl,
        shift: keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD),
        mac_cmd: false,
        command: ctrl,
    }
}

fn pointer_button(button: MouseButton) -> Option<egui::PointerButton> {
    match button {
        MouseButton::Left => Some(egui::PointerButton::Primary),
        MouseButton::Right => Some(egui::PointerButton::Secondary),
        MouseButton::Middle => Some(egui::PointerButton::Middle),
        _ => None,
    }
}

fn key(keycode: Keycode) -> Option<egui::Key> {
    use egui::Key;
    Some(match keycode {
        Keycode::Backspace => Key::Backspace,
        Keycode::Delete => Key::Delete,
        Keycode::Return | Keycode::KpEnter => Key::Enter,
        Keycode::Tab => Key::Tab,
        Keycode::Escape => Key::Escape,
        Keycode::Left => Key::ArrowLeft,
        Keycode::Right => Key::ArrowRight,
        Keycode::Up => Key::ArrowUp,
        Keycode::Down => Key::ArrowDown,
        Keycode::Home => Key::Home,
        Keycode::End => Key::End,
        Keycode::A => Key::A,
        Keycode::C => Key::C,
        Keycode::V => Key::V,
        Keycode::X => Key::X,
        _ => return None,
    })
}

/// Converts one SDL2 event into the egui event it stands for, if any.
pub fn translate_event(event: &Event) -> Option<egui::Event> {
    let pos = |x: i32, y: i32| egui::pos2(x as f32, y as f32);
    match event {
        Event::MouseMotion { x, y, .. } => Some(egui::Event::PointerMoved(pos(*x, *y))),
        Event::MouseButtonDown {
            mouse_btn, x, y, ..
        } => Some(egui::Event::PointerButton {
            pos: pos(*x, *y),
            button: pointer_button(*mouse_btn)?,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        }),
        Event::MouseButtonUp {
            mouse_btn, x, y, ..
        } => Some(egui::Event::PointerButton {
            pos: pos(*x, *y),
            button: pointer_button(*mouse_btn)?,
            pressed: false,
            modifiers: egui::Modifiers::default(),
        }),
        Event::MouseWheel { x, y, .. } => Some(egui::Event::MouseWheel {
            unit: egui::MouseWheelUnit::Line,
            delta: egui::vec2(*x as f32, *y as f32),
            modifiers: egui::Modifiers::default(),
        }),
        Event::TextInput { text, .. } => Some(egui::Event::Text(text.clone())),
        Event::KeyDown {
            keycode: Some(keycode),
            keymod,
            repeat,
            ..
        } => Some(egui::Event::Key {
            key: key(*keycode)?,
            physical_key: None,
            pressed: true,
            repeat: *repeat,
            modifiers: modifiers(*keymod),
        }),
        Event::KeyUp {
            keycode: Some(keycode),
            keymod,
            ..
        } => Some(egui::Event::Key {
            key: key(*keycode)?,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: modifiers(*keymod),
        }),
        Event::Window {
            win_event: WindowEvent::Leave,
            ..
        } => Some(egui::Event::PointerGone),
        _ => None,
    }
}

/// The egui context, its painter and the input gathered since the last
/// frame.
pub struct Overlay {
    ctx: egui::Context,
    painter: egui_glow::Painter,
    events: Vec<egui::Event>,
    modifiers: egui::Modifiers,
    start: Instant,
}

impl Overlay {
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        let painter = egui_glow::Painter::new(Arc::clone(gl), "", None, false)
            .map_err(|e| Error::Overlay(e.to_string()))?;
        Ok(Self {
            ctx: egui::Context::default(),
            painter,
            events: Vec::new(),
            modifiers: egui::Modifiers::default(),
            start: Instant::now(),
        })
    }

    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Some(egui_event) = translate_event(event) {
            if let egui::Event::Key { modifiers, .. } = &egui_event {
                self.modifiers = *modifiers;
            }
            self.events.push(egui_event);
        }
    }

    /// Starts an egui pass. `window_size` is in points (SDL window
    /// coordinates), `drawable_size` in pixels.
    pub fn begin_frame(&mut self, window_size: (u32, u32), drawable_size: (u32, u32)) {
        let pixels_per_point = drawable_size.0 as f32 / window_size.0.max(1) as f32;
        let mut raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(window_size.0 as f32, window_size.1 as f32),
            )),
            time: Some(self.start.elapsed().as_secs_f64()),
            modifiers: self.modifiers,
            events: std::mem::take(&mut self.events),
            ..Default::default()
        };
        raw_input
            .viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(pixels_per_point);
        self.ctx.begin_pass(raw_input);
    }

    /// Ends the pass and paints it over whatever is in the default
    /// framebuffer.
    pub fn end_frame(&mut self, drawable_size: (u32, u32)) {
        let output = self.ctx.end_pass();
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.painter.paint_and_update_textures(
            [drawable_size.0, drawable_size.1],
            output.pixels_per_point,
            &primitives,
            &output.textures_delta,
        );
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.painter.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_events() {
        let moved = Event::MouseMotion {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mousestate: sdl2::mouse::MouseState::from_sdl_state(0),
            x: 12,
            y: 34,
            xrel: 1,
            yrel: 1,
        };
        assert_eq!(
            translate_event(&moved),
            Some(egui::Event::PointerMoved(egui::pos2(12.0, 34.0)))
        );

        let pressed = Event::MouseButtonDown {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mouse_btn: MouseButton::Left,
            clicks: 1,
            x: 5,
            y: 6,
        };
        assert!(matches!(
            translate_event(&pressed),
            Some(egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            })
        ));

        let extra = Event::MouseButtonUp {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mouse_btn: MouseButton::X1,
            clicks: 1,
            x: 5,
            y: 6,
        };
        assert_eq!(translate_event(&extra), None);
    }

    #[test]
    fn test_text_and_leave() {
        let text = Event::TextInput {
            timestamp: 0,
            window_id: 0,
            text: "1.5".to_string(),
        };
        assert_eq!(
            translate_event(&text),
            Some(egui::Event::Text("1.5".to_string()))
        );

        let leave = Event::Window {
            timestamp: 0,
            window_id: 0,
            win_event: WindowEvent::Leave,
        };
        assert_eq!(translate_event(&leave), Some(egui::Event::PointerGone));
    }

    #[test]
    fn test_modifiers() {
        let m = modifiers(Mod::LSHIFTMOD | Mod::RCTRLMOD);
        assert!(m.shift && m.ctrl && m.command && !m.alt);
        assert_eq!(key(Keycode::Return), Some(egui::Key::Enter));
        assert_eq!(key(Keycode::F5), None);
    }
}
