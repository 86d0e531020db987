//! Glossary of terms used across the reference.
//!
//! A [`Glossary`] is loaded explicitly by the caller (see
//! [`crate::loader::load_glossary`]) and passed by reference; there is no
//! process-wide term cache.

use crate::i18n::LocalizedText;
use crate::Locale;
use serde::{Deserialize, Serialize};

/// One glossary entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Term {
    pub id: String,
    pub term: LocalizedText,
    pub definition: LocalizedText,
}

/// Immutable list of glossary terms
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Glossary {
    terms: Vec<Term>,
}

impl Glossary {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn get(&self, id: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms whose resolved name contains `query`, ignoring case
    ///
    /// An empty query returns every term.
    pub fn search<'a>(&'a self, query: &str, locale: Locale) -> Vec<&'a Term> {
        let needle = query.trim().to_lowercase();
        self.terms
            .iter()
            .filter(|t| needle.is_empty() || t.term.resolve(locale).to_lowercase().contains(&needle))
            .collect()
    }
}
