use std::fmt;
use std::thread;

use log::{info, warn};
use serde::Serialize;

use super::{Dmd, commands};
use crate::error::ProtocolError;
use crate::transport::Transport;

/// Display mode (command 0x1A1B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Video,
    Pattern,
    VideoPattern,
    #[serde(rename = "otf")]
    OnTheFly,
}

impl DisplayMode {
    pub fn code(self) -> u8 {
        match self {
            DisplayMode::Video => 0,
            DisplayMode::Pattern => 1,
            DisplayMode::VideoPattern => 2,
            DisplayMode::OnTheFly => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DisplayMode::Video),
            1 => Some(DisplayMode::Pattern),
            2 => Some(DisplayMode::VideoPattern),
            3 => Some(DisplayMode::OnTheFly),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Video => write!(f, "video"),
            DisplayMode::Pattern => write!(f, "pattern"),
            DisplayMode::VideoPattern => write!(f, "video-pattern"),
            DisplayMode::OnTheFly => write!(f, "otf"),
        }
    }
}

impl<T: Transport> Dmd<T> {
    /// Switch display mode and verify the switch by reading it back.
    ///
    /// Video-pattern mode is only reachable from video mode (with a locked
    /// source); the check uses the cached mode and fails before anything is
    /// sent. One extra read-back is allowed when the first one fails or
    /// disagrees.
    ///
    /// # Errors
    /// - `InvalidTransition` when video-pattern is requested outside video mode.
    /// - `ModeActivationFailed` when both read-backs disagree with `target`.
    pub fn set_display_mode(&mut self, target: DisplayMode) -> Result<(), ProtocolError> {
        if target == DisplayMode::VideoPattern && self.current_mode != Some(DisplayMode::Video) {
            return Err(ProtocolError::InvalidTransition {
                from: self.current_mode,
                to: target,
            });
        }

        self.write(commands::DISPLAY_MODE, &[target.code()])?;
        self.current_mode = None;
        thread::sleep(self.timing().display_mode_settle());

        match self.get_display_mode() {
            Ok(mode) if mode == target => {
                info!("display mode set to {target}");
                return Ok(());
            }
            Ok(mode) => warn!("display mode read back as {mode}, expected {target}; querying again"),
            Err(err) => warn!("display mode read-back failed ({err}); querying again"),
        }

        let actual = self.get_display_mode()?;
        if actual != target {
            return Err(ProtocolError::ModeActivationFailed {
                requested: target,
                actual,
            });
        }
        info!("display mode set to {target}");
        Ok(())
    }

    /// Query the display mode and refresh the cache.
    pub fn get_display_mode(&mut self) -> Result<DisplayMode, ProtocolError> {
        let code = self.query_byte(commands::DISPLAY_MODE)?;
        let mode = DisplayMode::from_code(code).ok_or(ProtocolError::UnexpectedValue {
            command: commands::DISPLAY_MODE,
            value: code,
        })?;
        self.current_mode = Some(mode);
        Ok(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::DisplayMode;

    #[test]
    fn codes_round_trip() {
        for mode in [
            DisplayMode::Video,
            DisplayMode::Pattern,
            DisplayMode::VideoPattern,
            DisplayMode::OnTheFly,
        ] {
            assert_eq!(DisplayMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(DisplayMode::from_code(4), None);
    }

    #[test]
    fn names_match_cli_spelling() {
        assert_eq!(DisplayMode::VideoPattern.to_string(), "video-pattern");
        assert_eq!(DisplayMode::OnTheFly.to_string(), "otf");
        let json = serde_json::to_string(&DisplayMode::VideoPattern).unwrap();
        assert_eq!(json, "\"video-pattern\"");
    }
}
