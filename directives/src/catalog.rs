//! The verification catalog: one method per directive.
//!
//! Catalog data lives in code rather than config so the mapping is total
//! by construction and versioned with the crate.

use crate::types::{Directive, VerificationMethod};

impl Directive {
    /// Get the verification method for this directive.
    ///
    /// Total: every directive has exactly one catalog entry.
    pub fn method(&self) -> &'static VerificationMethod {
        match self {
            Self::Study => &VerificationMethod {
                description: "Intense cognitive absorption session.",
                success_criteria: "Show your study materials (books, notes, screen).",
                random_requirement: "Hold a pen between your teeth.",
            },
            Self::Sport => &VerificationMethod {
                description: "Physical optimization routine.",
                success_criteria: "Show your workout gear or sweat.",
                random_requirement: "Give a thumbs up with your non-dominant hand.",
            },
            Self::Socialize => &VerificationMethod {
                description: "Human interaction simulation.",
                success_criteria: "Show yourself with another human unit.",
                random_requirement: "Both units must make a peace sign.",
            },
            Self::Dishes => &VerificationMethod {
                description: "Sanitation of feeding implements.",
                success_criteria: "Show a clean sink and drying rack.",
                random_requirement: "Hold a clean plate like a steering wheel.",
            },
            Self::Reading => &VerificationMethod {
                description: "Analog data ingestion.",
                success_criteria: "Show the book you are currently processing.",
                random_requirement: "Cover one eye with the book.",
            },
            Self::HealthyEating => &VerificationMethod {
                description: "Nutritional fuel intake.",
                success_criteria: "Show your unprocessed organic fuel.",
                random_requirement: "Balance a piece of fruit on your shoulder.",
            },
            Self::Hydrate => &VerificationMethod {
                description: "H2O level maintenance.",
                success_criteria: "Show a full or recently emptied water container.",
                random_requirement: "Point at the container with both index fingers.",
            },
            Self::WakeUp => &VerificationMethod {
                description: "System boot sequence completion.",
                success_criteria: "Show yourself out of the sleep pod.",
                random_requirement: "Make a 'V' sign with your fingers over your eyes.",
            },
            Self::Coding => &VerificationMethod {
                description: "Logic structure assembly.",
                success_criteria: "Show your IDE with active code.",
                random_requirement: "Rest your chin on your palm while looking at the screen.",
            },
            Self::Outdoors => &VerificationMethod {
                description: "Atmospheric exposure session.",
                success_criteria: "Show natural light and vegetation.",
                random_requirement: "Touch a leaf or blade of grass.",
            },
        }
    }
}
