// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard zoom shortcuts

/// A zoom command bound to a key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    ZoomIn,
    ZoomOut,
    ZoomToFit,
    ZoomToLevel(f64),
    /// Fit, but only when zoomed in past 1:1
    Escape,
}

impl KeyCommand {
    /// Map a key name (as in `KeyboardEvent.key`) to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        let command = match key {
            "+" | "=" => Self::ZoomIn,
            "-" => Self::ZoomOut,
            "0" => Self::ZoomToFit,
            "1" => Self::ZoomToLevel(1.0),
            "2" => Self::ZoomToLevel(2.0),
            "3" => Self::ZoomToLevel(3.0),
            "Escape" => Self::Escape,
            _ => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_zoom_keys() {
        assert_eq!(KeyCommand::from_key("="), Some(KeyCommand::ZoomIn));
        assert_eq!(KeyCommand::from_key("+"), Some(KeyCommand::ZoomIn));
        assert_eq!(KeyCommand::from_key("-"), Some(KeyCommand::ZoomOut));
        assert_eq!(KeyCommand::from_key("2"), Some(KeyCommand::ZoomToLevel(2.0)));
        assert_eq!(KeyCommand::from_key("Escape"), Some(KeyCommand::Escape));
        assert_eq!(KeyCommand::from_key("a"), None);
        assert_eq!(KeyCommand::from_key("4"), None);
    }
}
