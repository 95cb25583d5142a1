use std::fmt;
use std::thread;

use log::info;
use serde::Serialize;

use super::{Dmd, commands};
use crate::error::ProtocolError;
use crate::transport::Transport;

/// Power state composed from the idle and sleep queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    Normal,
    Idle,
    Standby,
    /// Combination the programmer's guide does not list.
    Undocumented { sleep: u8, idle: u8 },
}

impl PowerMode {
    pub fn from_flags(sleep: u8, idle: u8) -> Self {
        match (sleep, idle) {
            (0, 0) => PowerMode::Normal,
            (0, 1) => PowerMode::Idle,
            (1, _) => PowerMode::Standby,
            (sleep, idle) => PowerMode::Undocumented { sleep, idle },
        }
    }
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerMode::Normal => write!(f, "normal"),
            PowerMode::Idle => write!(f, "idle"),
            PowerMode::Standby => write!(f, "standby"),
            PowerMode::Undocumented { sleep, idle } => {
                write!(f, "undocumented (sleep {sleep}, idle {idle})")
            }
        }
    }
}

const POWER_NORMAL: u8 = 0;
const POWER_STANDBY: u8 = 1;
const POWER_RESET: u8 = 2;
const IDLE_ENABLE: u8 = 1;
const IDLE_DISABLE: u8 = 3;

impl<T: Transport> Dmd<T> {
    /// Stop any sequence, enter standby and confirm it by read-back.
    ///
    /// # Errors
    /// `TransitionFailed` when the device does not report standby afterwards.
    pub fn standby(&mut self) -> Result<(), ProtocolError> {
        self.stop_pattern()?;
        self.write(commands::POWER_MODE, &[POWER_STANDBY])?;
        thread::sleep(self.timing().power_settle());
        let actual = self.get_current_powermode()?;
        if actual != PowerMode::Standby {
            return Err(ProtocolError::TransitionFailed {
                requested: PowerMode::Standby,
                actual,
            });
        }
        info!("controller in standby");
        Ok(())
    }

    pub fn wakeup(&mut self) -> Result<(), ProtocolError> {
        self.write(commands::POWER_MODE, &[POWER_NORMAL])
    }

    /// Software reset; the cached display mode is dropped.
    pub fn reset(&mut self) -> Result<(), ProtocolError> {
        self.current_mode = None;
        self.write(commands::POWER_MODE, &[POWER_RESET])
    }

    pub fn idle_on(&mut self) -> Result<(), ProtocolError> {
        self.stop_pattern()?;
        self.write(commands::IDLE_MODE, &[IDLE_ENABLE])
    }

    pub fn idle_off(&mut self) -> Result<(), ProtocolError> {
        self.write(commands::IDLE_MODE, &[IDLE_DISABLE])
    }

    pub fn get_current_powermode(&mut self) -> Result<PowerMode, ProtocolError> {
        let idle = self.query_byte(commands::IDLE_MODE)?;
        let sleep = self.query_byte(commands::POWER_MODE)?;
        Ok(PowerMode::from_flags(sleep, idle))
    }
}

#[cfg(test)]
mod tests {
    use super::PowerMode;

    #[test]
    fn power_mode_from_flags() {
        assert_eq!(PowerMode::from_flags(0, 0), PowerMode::Normal);
        assert_eq!(PowerMode::from_flags(0, 1), PowerMode::Idle);
        assert_eq!(PowerMode::from_flags(1, 0), PowerMode::Standby);
        assert_eq!(PowerMode::from_flags(1, 1), PowerMode::Standby);
        assert_eq!(
            PowerMode::from_flags(2, 0),
            PowerMode::Undocumented { sleep: 2, idle: 0 }
        );
        assert_eq!(
            PowerMode::from_flags(0, 7),
            PowerMode::Undocumented { sleep: 0, idle: 7 }
        );
    }
}
