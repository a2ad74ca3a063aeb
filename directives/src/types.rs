//! Core types for the directive catalog.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the web frontend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// The closed set of discipline directives a user can be challenged with.
///
/// Serialized names match the labels the frontend displays and persists,
/// so stored sessions round-trip without a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Directive {
    Study,
    Sport,
    Socialize,
    Dishes,
    Reading,
    #[serde(rename = "Healthy Eating")]
    HealthyEating,
    Hydrate,
    #[serde(rename = "Wake Up")]
    WakeUp,
    Coding,
    Outdoors,
}

impl Directive {
    /// Get the display name used in prompts and persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "Study",
            Self::Sport => "Sport",
            Self::Socialize => "Socialize",
            Self::Dishes => "Dishes",
            Self::Reading => "Reading",
            Self::HealthyEating => "Healthy Eating",
            Self::Hydrate => "Hydrate",
            Self::WakeUp => "Wake Up",
            Self::Coding => "Coding",
            Self::Outdoors => "Outdoors",
        }
    }

    /// All directives, in catalog order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Study,
            Self::Sport,
            Self::Socialize,
            Self::Dishes,
            Self::Reading,
            Self::HealthyEating,
            Self::Hydrate,
            Self::WakeUp,
            Self::Coding,
            Self::Outdoors,
        ]
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Directive {
    type Err = UnknownDirective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDirective(s.to_string()))
    }
}

/// Error for directive names that are not part of the catalog.
///
/// Only reachable at string boundaries (persisted data, external input);
/// lookups on a [`Directive`] value itself are total.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown directive: {0}")]
pub struct UnknownDirective(pub String);

/// How a directive is verified from photographic evidence.
///
/// The random requirement is the anti-cheat element: a pose that is
/// unlikely to appear in stock or pre-existing photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct VerificationMethod {
    /// What the directive is, in the overlord's voice
    pub description: &'static str,
    /// What the evidence photo must show
    pub success_criteria: &'static str,
    /// Pose the submitter must include to prove the photo is fresh
    pub random_requirement: &'static str,
}
