use glam::Vec2;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use crate::{
    abs::App,
    config::Config,
    context::Context,
    error::Result,
    input::{ButtonAction, KeyboardState},
    overlay::Overlay,
};

mod abs;
mod camera;
mod config;
mod context;
mod error;
mod input;
mod light;
mod logging;
mod model;
mod overlay;
mod panel;
mod pixels;
mod scene;
mod shading;

fn log_error(error: &dyn std::error::Error) {
    log::error!("{error}");
    let mut source = error.source();
    while let Some(cause) = source {
        log::error!("  caused by: {cause}");
        source = cause.source();
    }
}

fn main() {
    let (config, config_path) = match Config::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            let _ = logging::init("info");
            log_error(&e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init(&config.log_level.0) {
        eprintln!("failed to initialize logging: {e}");
    }
    match &config_path {
        Some(path) => log::info!("using config {}", path.display()),
        None => log::info!("no config file found, using defaults"),
    }

    if let Err(e) = run(&config) {
        log_error(&e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let mut app = App::new(&config.window)?;
    let mut overlay = Overlay::new(&app.gl)?;
    let mut context = Context::new(&app.gl, config)?;
    let (width, height) = app.drawable_size();
    context.reshape(width, height)?;

    let mut keyboard = KeyboardState::default();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            overlay.handle_event(&event);
            keyboard.handle_event(&event);
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    context.reshape(width, height)?;
                }
                Event::MouseMotion { x, y, .. } => {
                    context.mouse_move(Vec2::new(x as f32, y as f32));
                }
                Event::MouseButtonDown {
                    mouse_btn, x, y, ..
                } => {
                    // Clicks on the panel belong to the panel.
                    if !overlay.context().wants_pointer_input() {
                        context.mouse_button(
                            mouse_btn,
                            ButtonAction::Press,
                            Vec2::new(x as f32, y as f32),
                        );
                    }
                }
                Event::MouseButtonUp {
                    mouse_btn, x, y, ..
                } => {
                    context.mouse_button(
                        mouse_btn,
                        ButtonAction::Release,
                        Vec2::new(x as f32, y as f32),
                    );
                }
                _ => {}
            }
        }

        context.process_input(&keyboard);

        let drawable_size = app.window.drawable_size();
        overlay.begin_frame(app.window.size(), drawable_size);
        context.render(overlay.context());
        overlay.end_frame(drawable_size);

        app.window.gl_swap_window();
    }

    log::info!("shutting down");
    Ok(())
}
