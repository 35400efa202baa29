//! Grouping of extracted minutes by calendar year and task force.

use std::collections::HashMap;

use minutegen_shared::{ExtractedMinutes, GroupedByYear, MinutesRecord};

/// Group minutes by calendar year, preserving arrival order within a year
/// and first-encounter order across years.
pub fn group_by_year(entries: Vec<ExtractedMinutes>) -> GroupedByYear {
    let mut grouped = GroupedByYear::default();
    for entry in entries {
        grouped.insert(entry);
    }
    grouped
}

/// Partition records by their filename-embedded task-force key.
///
/// The `""` (default) and `"f2f"` buckets always exist, even when empty;
/// they are the two groups every working group publishes.
pub fn partition_by_task_force(records: Vec<MinutesRecord>) -> HashMap<String, Vec<MinutesRecord>> {
    let mut partitions: HashMap<String, Vec<MinutesRecord>> = HashMap::new();
    partitions.insert(String::new(), Vec::new());
    partitions.insert("f2f".to_string(), Vec::new());

    for record in records {
        partitions
            .entry(record.task_force.clone())
            .or_default()
            .push(record);
    }

    partitions
}
