//! View filters over the media collection
//!
//! Filters never mutate the collection. They only decide which tiles are
//! shown and where focus may land after a delete.

use crate::media::MediaKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Filter by media kind
///
/// `Model` covers every 3D kind, gaussian splats included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Image,
    Video,
    Audio,
    Model,
}

impl TypeFilter {
    /// Returns `true` if an entry of `kind` passes this filter
    #[must_use]
    pub const fn matches(self, kind: MediaKind) -> bool {
        match self {
            Self::All => true,
            Self::Image => matches!(kind, MediaKind::Image),
            Self::Video => matches!(kind, MediaKind::Video),
            Self::Audio => matches!(kind, MediaKind::Audio),
            Self::Model => kind.is_three_d(),
        }
    }

    /// Returns `true` if this filter hides anything (not `All`)
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::All)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "image" | "images" => Ok(Self::Image),
            "video" | "videos" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "model" | "models" | "3d" => Ok(Self::Model),
            other => Err(format!("unknown media type filter '{other}'")),
        }
    }
}
