//! Core domain types for harvested meeting minutes.

use std::collections::HashMap;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// MinutesRecord
// ---------------------------------------------------------------------------

/// The identity of one published meeting-minutes document.
///
/// Built by the harvester from a listing entry; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinutesRecord {
    /// Raw file name as listed in the repository (e.g. `2024-03-04-f2f.html`).
    pub file_name: String,
    /// Absolute URL of the published document.
    pub url: String,
    /// Meeting date, parsed from the leading date portion of the file name.
    pub date: NaiveDate,
    /// Task-force key embedded in the file name suffix; `""` when absent.
    pub task_force: String,
}

impl MinutesRecord {
    /// Build a record from a listed file name and its published URL.
    ///
    /// The date derives from the portion of the file name preceding the
    /// first `.`: its leading ten characters must parse as `YYYY-MM-DD`.
    /// Anything after a `-` following the date is the task-force key.
    /// Returns `None` for file names without a parseable leading date.
    pub fn from_file_name(file_name: impl Into<String>, url: impl Into<String>) -> Option<Self> {
        let file_name = file_name.into();
        let stem = file_name.split('.').next().unwrap_or(&file_name);
        let date = parse_leading_date(stem)?;
        let task_force = task_force_suffix(stem);

        Some(Self {
            file_name,
            url: url.into(),
            date,
            task_force,
        })
    }
}

/// Parse the `YYYY-MM-DD` prefix of a file-name stem.
fn parse_leading_date(stem: &str) -> Option<NaiveDate> {
    let prefix = stem.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Extract the task-force key following the date (`2024-03-04-f2f` → `f2f`).
fn task_force_suffix(stem: &str) -> String {
    match stem.get(10..11) {
        Some("-") => stem[11..].to_string(),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// ExtractedMinutes
// ---------------------------------------------------------------------------

/// The displayable fragments extracted from one minutes document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMinutes {
    /// Absolute URL of the source document.
    pub url: String,
    /// Meeting date.
    pub date: NaiveDate,
    /// Table-of-contents fragment, one markup line per element.
    pub toc: Vec<String>,
    /// Resolutions-summary fragment, one markup line per element.
    pub resolutions: Vec<String>,
}

// ---------------------------------------------------------------------------
// GroupedByYear
// ---------------------------------------------------------------------------

/// All minutes of one calendar year, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearGroup {
    /// Calendar year.
    pub year: i32,
    /// Extracted minutes, in the harvester's listing order.
    pub entries: Vec<ExtractedMinutes>,
}

/// Minutes grouped by calendar year.
///
/// Years appear in first-encounter order (the harvester lists file names in
/// descending order, so in practice newest year first); entries within a
/// year preserve arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedByYear {
    groups: Vec<YearGroup>,
}

impl GroupedByYear {
    /// Append one entry to its year's bucket, creating the bucket on first
    /// encounter.
    pub fn insert(&mut self, entry: ExtractedMinutes) {
        use chrono::Datelike;

        let year = entry.date.year();
        match self.groups.iter_mut().find(|g| g.year == year) {
            Some(group) => group.entries.push(entry),
            None => self.groups.push(YearGroup {
                year,
                entries: vec![entry],
            }),
        }
    }

    /// Whether no year holds any entry.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of year buckets.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Year buckets in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &YearGroup> {
        self.groups.iter()
    }
}

/// Grouped minutes per task-force key (`""` = default, `"f2f"` = fixed
/// special group).
pub type TaskForceGroups = HashMap<String, GroupedByYear>;
