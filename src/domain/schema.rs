//! Phenotype schema: the declared field names and value domains.
//!
//! The schema is configuration data. The validator enforces whatever
//! field set a schema declares, so templates with new phenotype fields
//! only need a new schema file, never new validation code.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Allowed value domain for one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldDomain {
    /// Exactly one value from a closed set.
    Scalar { values: Vec<String> },
    /// One or more values from a closed set.
    Multi { values: Vec<String> },
    /// A scalar domain over TRUE / FALSE.
    Bool,
}

impl FieldDomain {
    /// Case-normalize a candidate value to its canonical enumeration
    /// member, or `None` when it is outside the domain.
    pub fn normalize(&self, candidate: &str) -> Option<String> {
        let trimmed = candidate.trim();
        match self {
            FieldDomain::Scalar { values } | FieldDomain::Multi { values } => values
                .iter()
                .find(|allowed| allowed.eq_ignore_ascii_case(trimmed))
                .cloned(),
            FieldDomain::Bool => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Some("TRUE".to_string())
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Some("FALSE".to_string())
                } else {
                    None
                }
            }
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, FieldDomain::Multi { .. })
    }
}

/// One declared field: name plus value domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub domain: FieldDomain,
}

/// The full declared schema, in output column order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Schema {
    #[serde(rename = "field")]
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Load a schema from a TOML file of `[[field]]` declarations.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let schema: Schema = toml::from_str(&content).map_err(ConfigError::Parse)?;
        if schema.fields.is_empty() {
            return Err(ConfigError::EmptyInput {
                what: "schema fields",
            }
            .into());
        }
        Ok(schema)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// A schema-validated prediction record.
///
/// Values are already case-normalized to canonical enumeration members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Render for a tabular cell: lists join with ", ".
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Scalar(value) => value.clone(),
            FieldValue::List(values) => values.join(", "),
        }
    }
}

impl Record {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

fn scalar(name: &str, values: &[&str]) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        domain: FieldDomain::Scalar {
            values: values.iter().map(ToString::to_string).collect(),
        },
    }
}

fn multi(name: &str, values: &[&str]) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        domain: FieldDomain::Multi {
            values: values.iter().map(ToString::to_string).collect(),
        },
    }
}

fn boolean(name: &str) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        domain: FieldDomain::Bool,
    }
}

/// The stock phenotype schema matching the shipped templates.
pub fn stock_schema() -> Schema {
    Schema {
        fields: vec![
            scalar(
                "gram_staining",
                &[
                    "gram stain negative",
                    "gram stain positive",
                    "gram stain variable",
                ],
            ),
            boolean("motility"),
            multi(
                "aerophilicity",
                &[
                    "aerobic",
                    "aerotolerant",
                    "anaerobic",
                    "facultatively anaerobic",
                    "microaerophilic",
                ],
            ),
            boolean("extreme_environment_tolerance"),
            boolean("biofilm_formation"),
            boolean("animal_pathogenicity"),
            scalar(
                "biosafety_level",
                &[
                    "biosafety level 1",
                    "biosafety level 2",
                    "biosafety level 3",
                ],
            ),
            boolean("health_association"),
            boolean("host_association"),
            boolean("plant_pathogenicity"),
            boolean("spore_formation"),
            scalar(
                "hemolysis",
                &["alpha", "beta", "gamma", "non-hemolytic"],
            ),
            multi(
                "cell_shape",
                &[
                    "bacillus shaped",
                    "coccus shaped",
                    "spiral shaped",
                    "filament shaped",
                    "pleomorphic shaped",
                ],
            ),
        ],
    }
}
