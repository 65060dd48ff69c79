//! Input parsing: `;`-delimited entity lists and gene files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::entity::{BinomialName, Entity};
use crate::error::{Error, Result};

/// Read the entity list from a `;`-delimited CSV file.
///
/// Blank cells are dropped and duplicate names are removed preserving
/// first-seen order. Names that are not well-formed binomials are logged
/// and excluded before task expansion, so every loaded entity yields
/// outcomes. When `gene_column` is given, the named column holds per-row
/// paths to gene files whose contents become the entity's gene list.
pub fn read_entities(
    path: &Path,
    column: &str,
    gene_column: Option<&str>,
) -> Result<Vec<Entity>> {
    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header = lines
        .next()
        .ok_or_else(|| Error::Input(format!("input file '{}' is empty", path.display())))?;
    let headers = split_row(header);

    let name_index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| Error::Input(format!("column '{column}' not found in input header")))?;
    let gene_index = match gene_column {
        Some(gene_column) => Some(headers.iter().position(|h| h == gene_column).ok_or_else(
            || Error::Input(format!("gene column '{gene_column}' not found in input header")),
        )?),
        None => None,
    };

    let mut seen = HashSet::new();
    let mut entities = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_row(line);
        let raw_name = match cells.get(name_index) {
            Some(cell) if !cell.trim().is_empty() => cell.trim().to_string(),
            _ => continue,
        };
        if !seen.insert(raw_name.clone()) {
            continue;
        }
        let Some(name) = BinomialName::parse(&raw_name) else {
            warn!(name = %raw_name, "Skipping malformed binomial name");
            continue;
        };

        let entity = match gene_index.and_then(|i| cells.get(i)) {
            Some(gene_path) if !gene_path.trim().is_empty() => {
                let genes = read_genes(&PathBuf::from(gene_path.trim()))?;
                Entity::with_genes(name, genes)
            }
            _ => Entity::new(name),
        };
        entities.push(entity);
    }
    Ok(entities)
}

/// Read gene identifiers from a file, one per line.
pub fn read_genes(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Split one `;`-delimited row, honoring double-quoted cells.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_named_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "input.csv",
            "Binomial.name;Habitat\nEscherichia coli;gut\nBacillus subtilis;soil\n",
        );
        let entities = read_entities(&path, "Binomial.name", None).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name.as_str(), "Escherichia coli");
    }

    #[test]
    fn drops_duplicates_preserving_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "input.csv",
            "Binomial.name\nEscherichia coli\nBacillus subtilis\nEscherichia coli\n",
        );
        let entities = read_entities(&path, "Binomial.name", None).unwrap();
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn skips_blank_and_malformed_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "input.csv",
            "Binomial.name\nEscherichia coli\n\n;\nunknown\n",
        );
        let entities = read_entities(&path, "Binomial.name", None).unwrap();
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "input.csv", "Name\nEscherichia coli\n");
        assert!(read_entities(&path, "Binomial.name", None).is_err());
    }

    #[test]
    fn loads_genes_from_gene_column() {
        let dir = tempfile::tempdir().unwrap();
        let gene_path = write_file(&dir, "genes.txt", "recA\nlacZ\n\n");
        let path = write_file(
            &dir,
            "input.csv",
            &format!(
                "Binomial.name;Gene_file\nEscherichia coli;{}\n",
                gene_path.display()
            ),
        );
        let entities = read_entities(&path, "Binomial.name", Some("Gene_file")).unwrap();
        assert_eq!(
            entities[0].genes,
            Some(vec!["recA".to_string(), "lacZ".to_string()])
        );
    }

    #[test]
    fn split_row_honors_quotes() {
        assert_eq!(
            split_row(r#"a;"b;c";d"#),
            vec!["a".to_string(), "b;c".to_string(), "d".to_string()]
        );
        assert_eq!(
            split_row(r#""say ""hi""";x"#),
            vec!["say \"hi\"".to_string(), "x".to_string()]
        );
    }
}
