//! Collection identity reconciliation
//!
//! The remote service names collections however its source export did
//! ("Sahih al-Bukhari", "sunan abi dawud", ...) while the local store
//! keys everything by canonical short id. The alias table maps known
//! variants; anything unknown degrades to its normalized label as a
//! best-guess id so a service-side rename never breaks search outright.

use crate::normalize::normalize_collection_label;
use std::collections::HashMap;

/// Known label variants for the nine canonical compilations, as they
/// have appeared in data exports and service responses.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("sahihalbukhari", "bukhari"),
    ("bukhari", "bukhari"),
    ("sahihmuslim", "muslim"),
    ("muslim", "muslim"),
    ("sunanabudawud", "abudawud"),
    ("sunanabidawud", "abudawud"),
    ("abudawud", "abudawud"),
    ("jamialtirmidhi", "tirmidhi"),
    ("jamiattirmidhi", "tirmidhi"),
    ("tirmidhi", "tirmidhi"),
    ("sunanibnmajah", "ibnmajah"),
    ("ibnmajah", "ibnmajah"),
    ("sunanannasai", "nasai"),
    ("annasai", "nasai"),
    ("nasai", "nasai"),
    ("muwattamalik", "malik"),
    ("malik", "malik"),
    ("musnadahmad", "ahmed"),
    ("ahmed", "ahmed"),
    ("sunanaddarimi", "darimi"),
    ("aldarimi", "darimi"),
    ("darimi", "darimi"),
];

#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|&(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        Self { aliases }
    }
}

impl AliasTable {
    /// An empty table; useful when the canonical set comes from config.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Register a newly-discovered label variant. The label is stored
    /// in normalized form, so callers pass it as the service emits it.
    pub fn insert(&mut self, label: &str, canonical_id: &str) {
        self.aliases
            .insert(normalize_collection_label(label), canonical_id.to_string());
    }

    /// Map a raw service label to a canonical collection id. Never
    /// fails: unrecognized labels resolve to their normalized form, and
    /// a later "not found locally" is a data-availability condition for
    /// the caller, not a reconciliation bug.
    pub fn resolve(&self, raw_label: &str) -> String {
        let normalized = normalize_collection_label(raw_label);
        if normalized.is_empty() {
            return "unknown".to_string();
        }
        self.aliases
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_variants() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("Sahih al-Bukhari"), "bukhari");
        assert_eq!(table.resolve("Sunan Abī Dāwūd"), "abudawud");
        assert_eq!(table.resolve("sunan an-nasa'i"), "nasai");
        assert_eq!(table.resolve("MUSLIM"), "muslim");
    }

    #[test]
    fn unknown_labels_fall_back_to_normalized_form() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("Made-Up Collection"), "madeupcollection");
    }

    #[test]
    fn empty_label_resolves_to_unknown() {
        let table = AliasTable::default();
        assert_eq!(table.resolve(""), "unknown");
        assert_eq!(table.resolve("  "), "unknown");
    }

    #[test]
    fn new_aliases_are_addable_at_runtime() {
        let mut table = AliasTable::default();
        assert_eq!(table.resolve("Riyad as-Salihin"), "riyadassalihin");
        table.insert("Riyad as-Salihin", "riyadussalihin");
        assert_eq!(table.resolve("Riyad as-Salihin"), "riyadussalihin");
    }
}
