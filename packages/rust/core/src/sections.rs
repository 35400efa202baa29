//! Per-task-force section builders for the two render targets.
//!
//! Each builder appends one `<section id="{tf}">` under the slot element
//! and reports whether it produced visible content. The meeting-index
//! builder checks for emptiness up front; the resolutions builder builds
//! speculatively and removes the section afterwards if nothing was emitted,
//! since a task force can hold meetings without taking any resolutions.

use minutegen_shared::{GroupedByYear, TaskForce, task_force_display};
use minutegen_template::{NodeId, Template};

/// Date form used in rendered entries (`Mon Jan 08 2024`).
const DATE_FORMAT: &str = "%a %b %d %Y";

/// Append the meeting-index section for one task force.
///
/// Years render as collapsible `<details>` blocks; the first rendered year
/// is initially expanded, the rest collapsed. Also appends a link entry
/// into the template's "toc" slot, if one exists.
pub fn build_toc_section(
    template: &mut Template,
    task_forces: &[TaskForce],
    parent: NodeId,
    groups: &GroupedByYear,
    tf: &str,
) -> bool {
    if groups.is_empty() {
        return false;
    }

    let section = template.add_child(parent, "section");
    template.set_attribute(section, "id", tf);

    let title = format!("{} meetings", task_force_display(task_forces, tf));
    template.add_child_with_content(section, "h2", &title);
    let ul = template.add_child(section, "ul");

    let mut open_details = true;
    for group in groups.iter() {
        let li_year = template.add_child(ul, "li");
        template.add_child_with_content(li_year, "h3", &format!("Minutes in {}", group.year));

        let details_year = template.add_child(li_year, "details");
        if open_details {
            // Only the most recent year starts expanded.
            open_details = false;
            template.set_attribute(details_year, "open", "true");
        }
        template.add_child_with_content(details_year, "summary", "List of Meetings");
        let ul_meetings = template.add_child(details_year, "ul");

        for entry in &group.entries {
            let li_meeting = template.add_child(ul_meetings, "li");
            template.add_child_with_content(
                li_meeting,
                "h4",
                &format!(
                    "<a target=\"_blank\" href=\"{}\">{}</a>",
                    entry.url,
                    entry.date.format(DATE_FORMAT)
                ),
            );

            let details_meeting = template.add_child(li_meeting, "details");
            template.add_child_with_content(details_meeting, "summary", "Agenda");
            let ul_toc = template.add_child(details_meeting, "ul");
            for line in &entry.toc {
                template.add_child_with_content(ul_toc, "li", line);
            }
        }
    }

    if let Some(toc_slot) = template.element_by_id("toc") {
        template.add_child_with_content(
            toc_slot,
            "li",
            &format!("<a href=\"#{tf}\">{title}</a>"),
        );
    }

    true
}

/// Append the resolutions section for one task force.
///
/// The section is built speculatively; if no resolution line was emitted
/// for any year, the just-built section is detached again and the builder
/// reports no content.
pub fn build_resolutions_section(
    template: &mut Template,
    task_forces: &[TaskForce],
    parent: NodeId,
    groups: &GroupedByYear,
    tf: &str,
) -> bool {
    let section = template.add_child(parent, "section");
    template.set_attribute(section, "id", tf);

    let display = task_force_display(task_forces, tf);
    template.add_child_with_content(section, "h2", &format!("{display} resolutions"));
    let ul = template.add_child(section, "ul");

    let mut emitted = 0usize;
    for group in groups.iter() {
        let li_year = template.add_child(ul, "li");
        template.add_child_with_content(li_year, "h3", &format!("Resolutions in {}", group.year));
        let ul_resolutions = template.add_child(li_year, "ul");

        for entry in &group.entries {
            let date = entry.date.format(DATE_FORMAT);
            for resolution in &entry.resolutions {
                template.add_child_with_content(
                    ul_resolutions,
                    "li",
                    &format!("{resolution} ({date})"),
                );
                emitted += 1;
            }
        }
    }

    if emitted == 0 {
        template.remove_child(parent, section);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use minutegen_shared::ExtractedMinutes;

    const TEMPLATE: &str = r#"<html><body>
        <ul id="toc"></ul>
        <div id="slot"></div>
        </body></html>"#;

    fn task_forces() -> Vec<TaskForce> {
        vec![
            TaskForce {
                key: String::new(),
                name: "Plenary".into(),
            },
            TaskForce {
                key: "f2f".into(),
                name: "Face-to-face".into(),
            },
        ]
    }

    fn minutes(date: &str, toc: &[&str], resolutions: &[&str]) -> ExtractedMinutes {
        ExtractedMinutes {
            url: format!("https://example.org/minutes/{date}.html"),
            date: chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            toc: toc.iter().map(|s| s.to_string()).collect(),
            resolutions: resolutions.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn grouped(entries: Vec<ExtractedMinutes>) -> GroupedByYear {
        let mut groups = GroupedByYear::default();
        for entry in entries {
            groups.insert(entry);
        }
        groups
    }

    #[test]
    fn toc_section_skips_empty_groups_upfront() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        let produced = build_toc_section(
            &mut template,
            &task_forces(),
            slot,
            &GroupedByYear::default(),
            "f2f",
        );

        assert!(!produced);
        assert!(!template.serialize().contains("<section"));
    }

    #[test]
    fn toc_section_renders_years_and_meetings() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        let groups = grouped(vec![
            minutes("2024-01-08", &["<li>Agenda item</li>"], &[]),
            minutes("2023-05-02", &[], &[]),
        ]);

        assert!(build_toc_section(&mut template, &task_forces(), slot, &groups, ""));

        let html = template.serialize();
        assert!(html.contains("<section id=\"\">"));
        assert!(html.contains("Plenary meetings"));
        assert!(html.contains("Minutes in 2024"));
        assert!(html.contains("Minutes in 2023"));
        assert!(html.contains("Mon Jan 08 2024"));
        assert!(html.contains("<li>Agenda item</li>"));
    }

    #[test]
    fn only_first_year_starts_expanded() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        let groups = grouped(vec![
            minutes("2024-01-08", &[], &[]),
            minutes("2023-05-02", &[], &[]),
            minutes("2022-11-14", &[], &[]),
        ]);

        build_toc_section(&mut template, &task_forces(), slot, &groups, "");

        let html = template.serialize();
        assert_eq!(html.matches("open=\"true\"").count(), 1);
        // The expanded details block belongs to the first rendered year.
        let open_pos = html.find("open=\"true\"").unwrap();
        let year_2024 = html.find("Minutes in 2024").unwrap();
        let year_2023 = html.find("Minutes in 2023").unwrap();
        assert!(year_2024 < open_pos && open_pos < year_2023);
    }

    #[test]
    fn toc_section_links_itself_into_toc_slot() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        let groups = grouped(vec![minutes("2024-02-05", &[], &[])]);
        build_toc_section(&mut template, &task_forces(), slot, &groups, "f2f");

        let html = template.serialize();
        assert!(html.contains("<a href=\"#f2f\">Face-to-face meetings</a>"));
    }

    #[test]
    fn resolutions_section_removed_when_nothing_emitted() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        // Meetings exist, but none took a resolution.
        let groups = grouped(vec![
            minutes("2024-01-08", &["<li>item</li>"], &[]),
            minutes("2023-05-02", &[], &[]),
        ]);

        let produced =
            build_resolutions_section(&mut template, &task_forces(), slot, &groups, "f2f");

        assert!(!produced);
        let html = template.serialize();
        assert!(!html.contains("<section id=\"f2f\""));
        assert!(!html.contains("resolutions"));
    }

    #[test]
    fn resolutions_section_lists_entries_with_dates() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        let groups = grouped(vec![minutes(
            "2024-01-08",
            &[],
            &["Resolved: publish the draft"],
        )]);

        assert!(build_resolutions_section(
            &mut template,
            &task_forces(),
            slot,
            &groups,
            ""
        ));

        let html = template.serialize();
        assert!(html.contains("Plenary resolutions"));
        assert!(html.contains("Resolutions in 2024"));
        assert!(html.contains("Resolved: publish the draft (Mon Jan 08 2024)"));
    }

    #[test]
    fn unknown_task_force_gets_fallback_heading() {
        let mut template = Template::parse(TEMPLATE);
        let slot = template.element_by_id("slot").unwrap();

        let groups = grouped(vec![minutes("2024-01-08", &[], &[])]);
        build_toc_section(&mut template, &task_forces(), slot, &groups, "pub");

        assert!(template.serialize().contains("Unknown task force pub meetings"));
    }
}
