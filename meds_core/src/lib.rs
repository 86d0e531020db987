#![forbid(unsafe_code)]

//! Core domain model and query logic for the ADHD medication reference.
//!
//! This crate provides:
//! - Domain types (locales, regions, drug records, travel rules)
//! - Localized field resolution
//! - Cross-border travel status inference
//! - Curated interaction and nutrient checks
//! - Loading, validation and export of the record corpus

pub mod types;
pub mod error;
pub mod i18n;
pub mod drug;
pub mod library;
pub mod glossary;
pub mod catalog;
pub mod travel;
pub mod interactions;
pub mod loader;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use i18n::{resolve_list, resolve_text, LocalizedList, LocalizedText};
pub use drug::{Approval, CrossBorderRule, DrugInteraction, DrugRecord, ExternalIds, TravelRules};
pub use library::{DrugLibrary, DrugQuery};
pub use glossary::{Glossary, Term};
pub use catalog::get_reference_tables;
pub use travel::{find_rule, infer_status, InferredTravelStatus, TravelReason};
pub use interactions::{check_interactions, InteractionOptions, InteractionReport};
pub use config::Config;
