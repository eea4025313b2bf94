//! Play/pause state of the video widget.

/// Visible state of a video container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Paused,
    Playing,
}

/// Something that moves the video widget between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The custom play control was activated
    ControlActivated,
    /// The video element reported `play`, whatever started it
    MediaPlay,
    /// The video element reported `pause`
    MediaPause,
}

impl PlayState {
    /// State after `trigger`.
    pub fn next(self, trigger: Trigger) -> Self {
        match trigger {
            Trigger::ControlActivated | Trigger::MediaPlay => Self::Playing,
            Trigger::MediaPause => Self::Paused,
        }
    }

    /// State matching a media element's paused flag.
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            Self::Paused
        } else {
            Self::Playing
        }
    }

    /// Attribute value for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Playing => "playing",
        }
    }

    /// Parse an attribute value; anything unrecognized is `Paused`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("playing") => Self::Playing,
            _ => Self::Paused,
        }
    }
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
