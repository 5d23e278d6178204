use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HotkeyCommand {
    Start,
    Stop,
}

pub struct Registration {
    manager: GlobalHotKeyManager,
    start: HotKey,
    stop: HotKey,
    registered: bool,
}

/// System-wide start/stop shortcuts, when the OS lets us have them.
///
/// On platforms without a usable hotkey backend (e.g. Wayland without the
/// right portal) the service degrades to `Unavailable` and the in-window
/// shortcuts remain the only keyboard path.
pub enum HotkeyService {
    Available(Registration),
    Unavailable,
}

impl HotkeyService {
    pub fn new() -> Self {
        match GlobalHotKeyManager::new() {
            Ok(manager) => HotkeyService::Available(Registration {
                manager,
                start: HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::KeyS),
                stop: HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::KeyD),
                registered: false,
            }),
            Err(err) => {
                warn!(%err, "global hotkeys unavailable; in-window shortcuts still work");
                HotkeyService::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, HotkeyService::Available(_))
    }

    /// Registers both combinations. No-op when already registered or when
    /// the service is unavailable; a registration refusal (combo taken by
    /// another program) demotes the service to `Unavailable`.
    pub fn register(&mut self) {
        let HotkeyService::Available(reg) = self else {
            return;
        };
        if reg.registered {
            return;
        }

        let result = reg
            .manager
            .register(reg.start)
            .and_then(|()| reg.manager.register(reg.stop));
        match result {
            Ok(()) => {
                reg.registered = true;
                info!("global hotkeys registered: Ctrl+Alt+S start, Ctrl+Alt+D stop");
            }
            Err(err) => {
                warn!(%err, "failed to register global hotkeys");
                let _ = reg.manager.unregister(reg.start);
                *self = HotkeyService::Unavailable;
            }
        }
    }

    pub fn unregister(&mut self) {
        let HotkeyService::Available(reg) = self else {
            return;
        };
        if !reg.registered {
            return;
        }

        let _ = reg.manager.unregister(reg.start);
        let _ = reg.manager.unregister(reg.stop);
        reg.registered = false;
        info!("global hotkeys unregistered");
    }

    /// Drains pending hotkey presses into commands.
    ///
    /// The hotkey backend queues events from its own thread; calling this
    /// from the UI thread each frame is what keeps controller state
    /// single-threaded. Key releases are ignored.
    pub fn poll(&mut self) -> Vec<HotkeyCommand> {
        let HotkeyService::Available(reg) = self else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if event.id == reg.start.id() {
                commands.push(HotkeyCommand::Start);
            } else if event.id == reg.stop.id() {
                commands.push(HotkeyCommand::Stop);
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_service_is_inert() {
        let mut service = HotkeyService::Unavailable;

        service.register();
        assert!(service.poll().is_empty());
        service.unregister();

        assert!(!service.is_available());
    }

    #[test]
    fn register_and_unregister_are_guarded_by_flag() {
        // Without a desktop session the manager may not construct; both
        // outcomes must behave, and repeated calls must stay no-ops.
        let mut service = HotkeyService::new();

        service.register();
        service.register();
        service.unregister();
        service.unregister();
    }
}
