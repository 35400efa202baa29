//! End-to-end run: harvest → extract → group → two render targets.
//!
//! The two output documents are built independently and concurrently; a
//! failure in one is caught at the target boundary and reported per
//! target, so the sibling target still completes and persists.

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, instrument, warn};

use minutegen_extract::extract;
use minutegen_harvest::Harvester;
use minutegen_shared::{
    MinutegenError, Params, Result, TargetParams, TaskForce, TaskForceGroups,
};
use minutegen_template::Template;

use crate::group::{group_by_year, partition_by_task_force};
use crate::sections::{build_resolutions_section, build_toc_section};

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// The two render targets of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The meeting index page.
    Index,
    /// The resolutions digest page.
    Resolutions,
}

impl TargetKind {
    /// Short name used in logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Resolutions => "resolutions",
        }
    }
}

/// Per-target result of a run.
#[derive(Debug)]
pub struct TargetOutcome {
    /// Which target this outcome belongs to.
    pub kind: TargetKind,
    /// Configured output path.
    pub output: String,
    /// Success, or the error that stopped this target.
    pub result: Result<()>,
}

/// Outcome of both render targets.
#[derive(Debug)]
pub struct RunReport {
    /// One outcome per target, index first.
    pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
    /// Number of failed targets.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run the full pipeline: harvest the scope's minutes, extract and group
/// them per task force, then render and persist both output documents.
#[instrument(skip_all, fields(scope = %params.scope))]
pub async fn run(params: &Params) -> Result<RunReport> {
    let groups = Arc::new(collect_groups(params).await?);
    let params = Arc::new(params.clone());

    let index_task = tokio::spawn(render_target(
        params.clone(),
        groups.clone(),
        TargetKind::Index,
    ));
    let resolutions_task = tokio::spawn(render_target(
        params.clone(),
        groups,
        TargetKind::Resolutions,
    ));

    let (index_joined, resolutions_joined) = tokio::join!(index_task, resolutions_task);

    let report = RunReport {
        outcomes: vec![
            outcome(TargetKind::Index, &params.index, index_joined),
            outcome(TargetKind::Resolutions, &params.resolutions, resolutions_joined),
        ],
    };

    info!(
        targets = report.outcomes.len(),
        failed = report.failed(),
        "run complete"
    );
    Ok(report)
}

/// Harvest, extract, and group the minutes of every task-force partition.
async fn collect_groups(params: &Params) -> Result<TaskForceGroups> {
    let harvester = Harvester::new(params)?;
    let records = harvester.list_minutes().await?;

    let mut groups = TaskForceGroups::new();
    for (tf, partition) in partition_by_task_force(records) {
        let fetched = harvester.fetch_all(partition).await;
        let extracted: Vec<_> = fetched
            .into_iter()
            .map(|(record, lines)| extract(&record, &lines))
            .collect();
        groups.insert(tf, group_by_year(extracted));
    }

    Ok(groups)
}

/// Collapse a joined render task into a per-target outcome.
fn outcome(
    kind: TargetKind,
    target: &TargetParams,
    joined: std::result::Result<Result<()>, tokio::task::JoinError>,
) -> TargetOutcome {
    let result = match joined {
        Ok(result) => result,
        Err(e) => Err(MinutegenError::Render(format!(
            "{} render task failed: {e}",
            kind.name()
        ))),
    };

    if let Err(e) = &result {
        warn!(target = kind.name(), error = %e, "render target failed");
    }

    TargetOutcome {
        kind,
        output: target.output.clone(),
        result,
    }
}

// ---------------------------------------------------------------------------
// Per-target rendering
// ---------------------------------------------------------------------------

/// Render one target: load its template, fill it, and persist the output.
async fn render_target(
    params: Arc<Params>,
    groups: Arc<TaskForceGroups>,
    kind: TargetKind,
) -> Result<()> {
    let target = match kind {
        TargetKind::Index => &params.index,
        TargetKind::Resolutions => &params.resolutions,
    };

    let mut template = Template::load(Path::new(&target.template))?;
    render_into(&mut template, target, &params.task_forces, &groups, kind)?;
    let html = template.serialize();

    let output = Path::new(&target.output);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| MinutegenError::io(parent, e))?;
        }
    }
    std::fs::write(output, html).map_err(|e| MinutegenError::io(output, e))?;

    info!(target = kind.name(), output = %target.output, "render target written");
    Ok(())
}

/// Fill a loaded template for one target.
fn render_into(
    template: &mut Template,
    target: &TargetParams,
    task_forces: &[TaskForce],
    groups: &TaskForceGroups,
    kind: TargetKind,
) -> Result<()> {
    let slot = template.element_by_id(&target.slot_id).ok_or_else(|| {
        MinutegenError::config(format!(
            "slot \"{}\" not found in template {}",
            target.slot_id, target.template
        ))
    })?;

    let mut any_content = false;
    for tf in task_force_order(task_forces) {
        let produced = match groups.get(&tf) {
            Some(tf_groups) => match kind {
                TargetKind::Index => {
                    build_toc_section(template, task_forces, slot, tf_groups, &tf)
                }
                TargetKind::Resolutions => {
                    build_resolutions_section(template, task_forces, slot, tf_groups, &tf)
                }
            },
            None => false,
        };
        any_content |= produced;
    }

    if !any_content {
        template.add_child_with_content(slot, "p", &target.empty_message);
    }

    // Copyright stamp, when the template carries a year slot.
    if let Some(year_slot) = template.element_by_id("year") {
        template.set_content(year_slot, &Utc::now().year().to_string());
    }

    Ok(())
}

/// Task-force iteration order: the default group first, then `f2f`, then
/// the remaining configured keys sorted alphabetically.
fn task_force_order(task_forces: &[TaskForce]) -> Vec<String> {
    let mut rest: Vec<String> = task_forces
        .iter()
        .filter(|tf| tf.key != "" && tf.key != "f2f")
        .map(|tf| tf.key.clone())
        .collect();
    rest.sort();
    rest.dedup();

    let mut order = vec![String::new(), "f2f".to_string()];
    order.extend(rest);
    order
}
