//! Subject entities: binomial species names with optional gene context.

use serde::{Deserialize, Serialize};

/// A validated binomial species name, e.g. "Escherichia coli".
///
/// Exactly two whitespace-separated words (genus and species). Names that
/// do not match are rejected when the entity list is loaded, so every
/// entity that reaches task expansion is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinomialName(String);

impl BinomialName {
    /// Parse a binomial name, requiring exactly two words.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(genus), Some(species), None) => Some(Self(format!("{genus} {species}"))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BinomialName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One prediction subject: a binomial name plus optional gene context.
///
/// Immutable once read from input; the gene list is substituted into
/// templates that declare a `{gene_list}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: BinomialName,
    pub genes: Option<Vec<String>>,
}

impl Entity {
    pub fn new(name: BinomialName) -> Self {
        Self { name, genes: None }
    }

    pub fn with_genes(name: BinomialName, genes: Vec<String>) -> Self {
        Self {
            name,
            genes: Some(genes),
        }
    }

    /// Number of genes attached to this entity, zero when none.
    pub fn gene_count(&self) -> usize {
        self.genes.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_two_words() {
        let name = BinomialName::parse("Escherichia coli").unwrap();
        assert_eq!(name.as_str(), "Escherichia coli");
    }

    #[test]
    fn parse_normalizes_whitespace() {
        let name = BinomialName::parse("  Bacillus   subtilis ").unwrap();
        assert_eq!(name.as_str(), "Bacillus subtilis");
    }

    #[test]
    fn parse_rejects_one_word() {
        assert!(BinomialName::parse("Escherichia").is_none());
    }

    #[test]
    fn parse_rejects_three_words() {
        assert!(BinomialName::parse("Escherichia coli K12").is_none());
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(BinomialName::parse("   ").is_none());
    }

    #[test]
    fn gene_count_defaults_to_zero() {
        let entity = Entity::new(BinomialName::parse("Escherichia coli").unwrap());
        assert_eq!(entity.gene_count(), 0);
    }
}
