use std::sync::Mutex;

use enigo::{Button, Direction, Enigo, Mouse, Settings};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    #[error("synthetic click rejected: {0}")]
    Rejected(String),
    #[error("pointer parked in failsafe corner")]
    Failsafe,
}

/// A source of synthetic pointer clicks at the current cursor position.
///
/// The click loop only ever talks to this trait, so tests swap the OS
/// backend for an in-memory recorder.
pub trait InputSimulator: Send + Sync {
    fn click(&self) -> Result<(), SimulatorError>;
}

/// Production simulator backed by `enigo`.
///
/// The enigo connection is created lazily on the first click so that a
/// missing display server surfaces as a status-text error instead of a
/// startup crash. With the failsafe enabled, a click is refused while the
/// pointer sits in the top-left screen corner.
pub struct EnigoSimulator {
    conn: Mutex<Option<Enigo>>,
    failsafe: bool,
}

impl EnigoSimulator {
    pub fn new() -> Self {
        Self {
            conn: Mutex::new(None),
            failsafe: true,
        }
    }
}

impl Default for EnigoSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSimulator for EnigoSimulator {
    fn click(&self) -> Result<(), SimulatorError> {
        let mut conn = self.conn.lock().unwrap();
        if conn.is_none() {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|err| SimulatorError::Unavailable(err.to_string()))?;
            debug!("input backend connected");
            *conn = Some(enigo);
        }
        let enigo = conn.as_mut().unwrap();

        if self.failsafe {
            let (x, y) = enigo
                .location()
                .map_err(|err| SimulatorError::Rejected(err.to_string()))?;
            if x <= 0 && y <= 0 {
                return Err(SimulatorError::Failsafe);
            }
        }

        enigo
            .button(Button::Left, Direction::Click)
            .map_err(|err| SimulatorError::Rejected(err.to_string()))
    }
}
