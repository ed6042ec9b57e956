//! Choosing a backend at startup.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ttk_core::{RecordingRenderer, Renderer, Result, TtkError};

/// Environment variable naming the preferred backend.
pub const BACKEND_ENV: &str = "TTK_BACKEND";

/// The backend families a program can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Character-cell terminal.
    #[default]
    Terminal,
    /// Desktop window.
    Desktop,
    /// Null backend that records commands.
    Recording,
}

/// A backend name that is not one of `terminal`, `desktop`, `recording`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend {0:?} (expected terminal, desktop or recording)")]
pub struct ParseBackendError(pub String);

impl FromStr for BackendKind {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" | "term" | "tty" => Ok(Self::Terminal),
            "desktop" | "window" | "gui" => Ok(Self::Desktop),
            "recording" | "null" => Ok(Self::Recording),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Terminal => "terminal",
            Self::Desktop => "desktop",
            Self::Recording => "recording",
        })
    }
}

impl BackendKind {
    /// Backend named by `TTK_BACKEND`, if set and valid.
    pub fn from_env() -> Option<Self> {
        Self::from_env_value(std::env::var(BACKEND_ENV).ok().as_deref())
    }

    /// [`from_env`](Self::from_env) over an explicit value.
    pub fn from_env_value(value: Option<&str>) -> Option<Self> {
        let value = value?;
        match value.parse() {
            Ok(kind) => Some(kind),
            Err(err) => {
                tracing::warn!(%err, "ignoring {BACKEND_ENV}");
                None
            }
        }
    }

    /// The backend to use: the terminal unless `TTK_BACKEND` asks for
    /// something this build supports.
    pub fn recommended() -> Self {
        Self::recommend(Self::from_env())
    }

    fn recommend(requested: Option<Self>) -> Self {
        match requested {
            Some(Self::Desktop) if cfg!(feature = "desktop") => Self::Desktop,
            Some(Self::Recording) => Self::Recording,
            _ => Self::Terminal,
        }
    }

    /// Whether this build can create the backend.
    pub const fn is_available(self) -> bool {
        match self {
            Self::Terminal => cfg!(feature = "terminal"),
            Self::Desktop => cfg!(feature = "desktop"),
            Self::Recording => true,
        }
    }

    /// Create an uninitialized renderer with default configuration.
    ///
    /// Desktop backends need a platform window, so they are built directly
    /// from a `WindowSurface` instead.
    pub fn create(self) -> Result<Box<dyn Renderer>> {
        tracing::debug!(backend = %self, "creating renderer");
        match self {
            #[cfg(feature = "terminal")]
            Self::Terminal => Ok(Box::new(ttk_terminal::TerminalRenderer::new(
                ttk_terminal::TerminalConfig::default(),
            ))),
            Self::Recording => Ok(Box::new(RecordingRenderer::default())),
            Self::Desktop => Err(TtkError::Init(
                "desktop backends are created from a window surface".to_string(),
            )),
            #[cfg(not(feature = "terminal"))]
            Self::Terminal => Err(TtkError::Init(
                "built without the terminal feature".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("terminal".parse::<BackendKind>(), Ok(BackendKind::Terminal));
        assert_eq!(" Desktop ".parse::<BackendKind>(), Ok(BackendKind::Desktop));
        assert_eq!("NULL".parse::<BackendKind>(), Ok(BackendKind::Recording));
        assert_eq!(
            "curses".parse::<BackendKind>(),
            Err(ParseBackendError("curses".to_string()))
        );
    }

    #[test]
    fn test_display_round_trip() {
        for kind in [BackendKind::Terminal, BackendKind::Desktop, BackendKind::Recording] {
            assert_eq!(kind.to_string().parse::<BackendKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_env_value() {
        assert_eq!(BackendKind::from_env_value(None), None);
        assert_eq!(BackendKind::from_env_value(Some("bogus")), None);
        assert_eq!(
            BackendKind::from_env_value(Some("recording")),
            Some(BackendKind::Recording)
        );
    }

    #[test]
    fn test_recommend() {
        assert_eq!(BackendKind::recommend(None), BackendKind::Terminal);
        assert_eq!(
            BackendKind::recommend(Some(BackendKind::Recording)),
            BackendKind::Recording
        );
        let desktop = BackendKind::recommend(Some(BackendKind::Desktop));
        if cfg!(feature = "desktop") {
            assert_eq!(desktop, BackendKind::Desktop);
        } else {
            assert_eq!(desktop, BackendKind::Terminal);
        }
    }

    #[test]
    fn test_create_recording() {
        let mut r = BackendKind::Recording.create().unwrap();
        r.initialize().unwrap();
        assert_eq!(r.get_dimensions(), (24, 80));
        assert!(matches!(
            BackendKind::Desktop.create(),
            Err(TtkError::Init(_))
        ));
    }
}
