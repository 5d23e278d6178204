use std::sync::Arc;

use eframe::egui;

use crate::clicker::{click_interval, AutoClicker, RunState, SPEED_MAX, SPEED_MIN};
use crate::hotkeys::{HotkeyCommand, HotkeyService};
use crate::simulator::EnigoSimulator;

const START_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::CTRL.plus(egui::Modifiers::ALT), egui::Key::S);
const STOP_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::CTRL.plus(egui::Modifiers::ALT), egui::Key::D);

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 120, 212);
const STOP_RED: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

fn speed_slider(ui: &mut egui::Ui, value: &mut f64, range: std::ops::RangeInclusive<f64>) -> bool {
    let desired_width = ui.available_width();
    let height = 20.0;
    let (response, painter) = ui.allocate_painter(
        egui::vec2(desired_width, height),
        egui::Sense::click_and_drag(),
    );

    let old_value = *value;

    if response.dragged() || response.clicked() {
        if let Some(pos) = response.hover_pos() {
            let rect = response.rect;
            let normalized = ((pos.x - rect.left()) / rect.width()).clamp(0.0, 1.0) as f64;
            *value = range.start() + normalized * (range.end() - range.start());
        }
    }

    // Track, then filled portion.
    painter.rect_filled(
        response.rect,
        egui::Rounding::same(8.0),
        egui::Color32::from_rgb(60, 60, 60),
    );
    let span = range.end() - range.start();
    let fill_width = response.rect.width() * ((*value - range.start()) / span) as f32;
    let fill_rect = egui::Rect::from_min_size(
        response.rect.left_top(),
        egui::vec2(fill_width, height),
    );
    painter.rect_filled(fill_rect, egui::Rounding::same(8.0), ACCENT);

    old_value != *value
}

pub fn speed_label(speed_cps: f64) -> String {
    format!(
        "{:.1} cps (~{:.2}s interval)",
        speed_cps,
        click_interval(speed_cps).as_secs_f64()
    )
}

pub struct AutoClickerApp {
    clicker: AutoClicker,
    hotkeys: HotkeyService,
    speed: f64,
}

impl AutoClickerApp {
    pub fn new() -> Self {
        let mut hotkeys = HotkeyService::new();
        hotkeys.register();
        Self::with_parts(AutoClicker::new(Arc::new(EnigoSimulator::new())), hotkeys, 5.0)
    }

    fn with_parts(clicker: AutoClicker, hotkeys: HotkeyService, speed: f64) -> Self {
        Self {
            clicker,
            hotkeys,
            speed,
        }
    }

    /// Single entry point for every control path — buttons, in-window
    /// shortcuts, and global hotkeys all land here.
    fn apply(&mut self, command: HotkeyCommand) {
        match command {
            HotkeyCommand::Start => self.clicker.start(self.speed),
            HotkeyCommand::Stop => self.clicker.stop(),
        }
    }
}

impl eframe::App for AutoClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The status text settles asynchronously after a stop, so keep
        // repainting even without input.
        ctx.request_repaint();

        self.clicker.pump();

        for command in self.hotkeys.poll() {
            self.apply(command);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&START_SHORTCUT)) {
            self.apply(HotkeyCommand::Start);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&STOP_SHORTCUT)) {
            self.apply(HotkeyCommand::Stop);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("AutoClicker");

            ui.add_space(10.0);

            ui.label("Click speed (clicks/sec)");
            speed_slider(ui, &mut self.speed, SPEED_MIN..=SPEED_MAX);
            ui.label(speed_label(self.speed));

            ui.add_space(10.0);

            let idle = self.clicker.run_state() == RunState::Idle;
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(idle, egui::Button::new("Start").fill(ACCENT))
                    .clicked()
                {
                    self.apply(HotkeyCommand::Start);
                }
                ui.add_space(8.0);
                if ui
                    .add_enabled(!idle, egui::Button::new("Stop").fill(STOP_RED))
                    .clicked()
                {
                    self.apply(HotkeyCommand::Stop);
                }
            });

            ui.add_space(10.0);

            ui.label(format!("Status: {}", self.clicker.status()));

            ui.add_space(10.0);

            if self.hotkeys.is_available() {
                ui.label("Global hotkeys: Ctrl+Alt+S start, Ctrl+Alt+D stop");
            } else {
                ui.label("Global hotkeys unavailable; shortcuts work while this window is focused");
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.clicker.stop();
        self.hotkeys.unregister();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{InputSimulator, SimulatorError};

    struct NoopSimulator;

    impl InputSimulator for NoopSimulator {
        fn click(&self) -> Result<(), SimulatorError> {
            Ok(())
        }
    }

    fn test_app() -> AutoClickerApp {
        AutoClickerApp::with_parts(
            AutoClicker::new(Arc::new(NoopSimulator)),
            HotkeyService::Unavailable,
            10.0,
        )
    }

    #[test]
    fn speed_label_matches_slider_extremes() {
        assert_eq!(speed_label(1.0), "1.0 cps (~1.00s interval)");
        assert_eq!(speed_label(20.0), "20.0 cps (~0.05s interval)");
    }

    #[test]
    fn hotkey_commands_drive_the_same_transitions_as_buttons() {
        let mut app = test_app();

        app.apply(HotkeyCommand::Start);
        assert_eq!(app.clicker.run_state(), RunState::Running);
        assert!(app.clicker.status().contains("Running"));

        app.apply(HotkeyCommand::Stop);
        assert_eq!(app.clicker.run_state(), RunState::Idle);
        assert_eq!(app.clicker.status(), "Stopped");
    }

    #[test]
    fn start_command_is_idempotent_through_the_app() {
        let mut app = test_app();

        app.apply(HotkeyCommand::Start);
        app.apply(HotkeyCommand::Start);
        assert_eq!(app.clicker.run_state(), RunState::Running);

        app.apply(HotkeyCommand::Stop);
    }
}
