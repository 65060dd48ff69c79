//! Batch-submission output: OpenAI Batch API JSONL documents.
//!
//! This is a request-generation mode, not a query-execution mode: it
//! renders every task into a self-contained request object and never
//! touches the dispatcher or retry engine. The Batch API processes one
//! model per file, so multi-model runs are rejected up front.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::ProviderConfig;
use crate::domain::task::Task;
use crate::error::{ConfigError, Result};
use crate::template::TemplatePair;

#[derive(Serialize)]
struct BatchRequest {
    custom_id: String,
    method: &'static str,
    url: &'static str,
    body: BatchBody,
}

#[derive(Serialize)]
struct BatchBody {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<BatchMessage>,
}

#[derive(Serialize)]
struct BatchMessage {
    role: &'static str,
    content: String,
}

/// Serialize one request object per task, JSONL, to `path`.
///
/// # Errors
///
/// Rejects task sets naming more than one distinct model, checked before
/// any document is emitted; fails on a template defect (nothing useful
/// can be uploaded for that task), leaving no partial file behind.
pub fn write_batch(
    path: &Path,
    tasks: &[Task],
    pairs: &[TemplatePair],
    provider: &ProviderConfig,
) -> Result<()> {
    let models: BTreeSet<&str> = tasks.iter().map(|t| t.model.as_str()).collect();
    if models.len() > 1 {
        return Err(ConfigError::MultiModelBatch {
            count: models.len(),
        }
        .into());
    }

    // Render everything before opening the file so a template defect
    // leaves no partial document behind.
    let mut requests = Vec::with_capacity(tasks.len());
    for task in tasks {
        let prompt = pairs[task.pair_index].render(&task.entity)?;
        requests.push(BatchRequest {
            custom_id: task.correlation_id(),
            method: "POST",
            url: "/v1/chat/completions",
            body: BatchBody {
                model: task
                    .model
                    .strip_prefix("openai/")
                    .unwrap_or(&task.model)
                    .to_string(),
                max_tokens: provider.max_tokens,
                temperature: provider.temperature,
                messages: vec![
                    BatchMessage {
                        role: "system",
                        content: prompt.system,
                    },
                    BatchMessage {
                        role: "user",
                        content: prompt.user,
                    },
                ],
            },
        });
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for request in &requests {
        serde_json::to_writer(&mut writer, request)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
