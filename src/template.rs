//! Prompt templates and placeholder rendering.
//!
//! A template pair is plain text with `{binomial_name}` (and optionally
//! `{gene_list}`) placeholders. Rendering is pure: it can run concurrently
//! and repeating it for the same entity yields the same prompts.

use std::path::{Path, PathBuf};

use crate::domain::entity::Entity;
use crate::error::{Result, TemplateError};

/// An ordered (system, user) template pair identified by its source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    /// Source label, the system template path for file-loaded pairs.
    pub label: String,
    pub system: String,
    pub user: String,
}

/// Finalized prompts for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

impl TemplatePair {
    pub fn new(label: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Load a pair from two text files. The system path becomes the label.
    pub fn load(system_path: &Path, user_path: &Path) -> Result<Self> {
        let system = read_template(system_path)?;
        let user = read_template(user_path)?;
        Ok(Self {
            label: system_path.display().to_string(),
            system,
            user,
        })
    }

    /// Substitute entity fields into both templates.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` when a placeholder names a field the entity
    /// does not carry, e.g. `{gene_list}` for an entity without genes.
    pub fn render(&self, entity: &Entity) -> std::result::Result<RenderedPrompt, TemplateError> {
        Ok(RenderedPrompt {
            system: substitute(&self.system, &self.label, entity)?,
            user: substitute(&self.user, &self.label, entity)?,
        })
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        TemplateError::ReadFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Derive the `_with_genes` variant of a template path, mirroring the
/// naming convention of the stock templates.
pub fn with_genes_variant(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_file_name(format!(
            "{}_with_genes.{ext}",
            path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
        )),
        None => path.with_file_name(format!(
            "{}_with_genes",
            path.file_name().and_then(|s| s.to_str()).unwrap_or_default()
        )),
    }
}

/// Replace `{identifier}` placeholders with entity fields.
///
/// Only brace pairs wrapping a bare identifier are placeholders, so JSON
/// examples embedded in a system prompt pass through untouched.
fn substitute(
    template: &str,
    label: &str,
    entity: &Entity,
) -> std::result::Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                let name = &after[..close];
                match lookup(name, entity) {
                    Some(value) => out.push_str(&value),
                    None => {
                        return Err(TemplateError::UnresolvedPlaceholder {
                            template: label.to_string(),
                            placeholder: name.to_string(),
                        })
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_identifier(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn lookup(name: &str, entity: &Entity) -> Option<String> {
    match name {
        "binomial_name" => Some(entity.name.as_str().to_string()),
        "gene_list" => entity.genes.as_ref().map(|genes| genes.join(", ")),
        _ => None,
    }
}
