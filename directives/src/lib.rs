//! Directive catalog and judgment prompt assembly for b0rguii.
//!
//! A directive is one of the closed set of discipline tasks a human unit
//! can be challenged with. Each directive maps to exactly one
//! [`VerificationMethod`]: what the evidence photo must show plus a
//! mandatory random requirement that defeats pre-staged photos.
//!
//! # Key Components
//!
//! - [`Directive`]: the closed task enumeration, total catalog lookup via
//!   [`Directive::method`]
//! - [`VerificationMethod`]: description / success criteria / random
//!   requirement triple
//! - [`PromptAssembler`]: builds the judgment prompt sent to the model
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use directives::{Directive, PromptAssembler};
//!
//! let directive = Directive::Study;
//! let method = directive.method();
//! assert_eq!(method.random_requirement, "Hold a pen between your teeth.");
//!
//! let prompt = PromptAssembler::build_judgment_prompt(directive, None, None, Utc::now());
//! assert!(prompt.contains("MANDATORY RANDOM REQUIREMENT"));
//! ```

pub mod catalog;
pub mod prompt;
pub mod types;

// Re-export main types
pub use prompt::{PromptAssembler, UNKNOWN_INSTANT};
pub use types::{Directive, UnknownDirective, VerificationMethod};
