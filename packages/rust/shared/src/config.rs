//! Run parameters for minutegen.
//!
//! The parameter file is TOML, selected by the CLI's positional argument,
//! the `MINUTEGEN_CONFIG` environment variable, or `./minutegen.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MinutegenError, Result};

/// Default listing endpoint (GitHub contents API for a working group).
const DEFAULT_LISTING_URL: &str = "https://api.github.com/repos/w3c/{scope}/contents/minutes";

/// Default content endpoint (published HTML for a repository path).
const DEFAULT_CONTENT_URL: &str = "https://w3c.github.io/{scope}/{path}";

// ---------------------------------------------------------------------------
// Params structs (matching the parameter file schema)
// ---------------------------------------------------------------------------

/// Top-level run parameters, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Working-group scope identifier, substituted into the URL templates.
    pub scope: String,

    /// Listing endpoint URL template; `{scope}` is replaced at run time.
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// Content endpoint URL template; `{scope}` and `{path}` are replaced
    /// per listing entry.
    #[serde(default = "default_content_url")]
    pub content_url: String,

    /// Maximum concurrent document fetches.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// `[index]` render target (the meeting index page).
    pub index: TargetParams,

    /// `[resolutions]` render target (the resolutions digest page).
    pub resolutions: TargetParams,

    /// `[[task_forces]]` entries. The `""` and `"f2f"` keys are mandatory.
    pub task_forces: Vec<TaskForce>,
}

/// One render target: template in, filled document out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetParams {
    /// Path to the HTML template file.
    pub template: String,
    /// `id` of the template element receiving the generated sections.
    pub slot_id: String,
    /// Output file path.
    pub output: String,
    /// Message rendered when no task force produced any content.
    pub empty_message: String,
}

/// A task force: filename-suffix key plus display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskForce {
    /// Filename-embedded key (`""` for the default group).
    pub key: String,
    /// Display name used in section headings.
    pub name: String,
}

fn default_listing_url() -> String {
    DEFAULT_LISTING_URL.into()
}
fn default_content_url() -> String {
    DEFAULT_CONTENT_URL.into()
}
fn default_fetch_concurrency() -> usize {
    8
}

impl Params {
    /// Validate the task-force table: the `""` and `"f2f"` keys must be
    /// present (they are the two groups every working group publishes).
    pub fn validate(&self) -> Result<()> {
        for required in ["", "f2f"] {
            if !self.task_forces.iter().any(|tf| tf.key == required) {
                return Err(MinutegenError::config(format!(
                    "task_forces must contain the {required:?} key"
                )));
            }
        }
        Ok(())
    }
}

/// Look up a task force's display name; unknown keys get a visible fallback.
pub fn task_force_display(task_forces: &[TaskForce], key: &str) -> String {
    task_forces
        .iter()
        .find(|tf| tf.key == key)
        .map(|tf| tf.name.clone())
        .unwrap_or_else(|| format!("Unknown task force {key}"))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate run parameters from a TOML file.
pub fn load_params_from(path: &Path) -> Result<Params> {
    let content = std::fs::read_to_string(path).map_err(|e| MinutegenError::io(path, e))?;

    let params: Params = toml::from_str(&content).map_err(|e| {
        MinutegenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    params.validate()?;
    tracing::debug!(path = %path.display(), scope = %params.scope, "parameters loaded");
    Ok(params)
}
