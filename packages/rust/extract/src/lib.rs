//! Fragment extraction from raw minutes documents.
//!
//! [`extract`] is a pure function: one record plus its content lines in,
//! one [`ExtractedMinutes`] out. Each fragment (table of contents,
//! resolutions summary) is delimited by a marker pair; a missing marker
//! degrades to an empty fragment, never an error, so a malformed document
//! can only shrink the output.

use tracing::debug;

use minutegen_shared::{ExtractedMinutes, MinutesRecord};

/// Opening marker of the table-of-contents block.
const TOC_OPEN: &str = "<nav id=toc>";
/// Closing marker of the table-of-contents block.
const TOC_CLOSE: &str = "</nav>";

/// Opening marker of the resolutions block.
const RES_OPEN: &str = "<div id=ResolutionSummary>";
/// Closing marker of the resolutions block.
const RES_CLOSE: &str = "</div>";

/// Whether the marker lines themselves belong to the sliced fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markers {
    /// Keep the opening and closing lines (the TOC keeps its `<nav>` shell).
    Keep,
    /// Drop both marker lines (the resolutions `<div>` shell is discarded,
    /// along with the `<h2>` heading the cleanup strips).
    Drop,
}

/// Extract the displayable fragments from one minutes document.
pub fn extract(record: &MinutesRecord, lines: &[String]) -> ExtractedMinutes {
    let toc = cleaned_fragment(record, bracketed(lines, TOC_OPEN, TOC_CLOSE, Markers::Keep));
    let resolutions =
        cleaned_fragment(record, bracketed(lines, RES_OPEN, RES_CLOSE, Markers::Drop));

    if toc.is_empty() {
        debug!(file = %record.file_name, "no table of contents found");
    }

    ExtractedMinutes {
        url: record.url.clone(),
        date: record.date,
        toc,
        resolutions,
    }
}

// ---------------------------------------------------------------------------
// Marker bracketing
// ---------------------------------------------------------------------------

/// Scanner state for marker bracketing.
enum Scan {
    SearchingOpen,
    SearchingClose { start: usize },
}

/// Slice the lines bracketed by an exact-match marker pair.
///
/// A two-state scan: searching-for-open, then searching-for-close. Either
/// marker absent yields an empty slice.
fn bracketed<'a>(lines: &'a [String], open: &str, close: &str, markers: Markers) -> &'a [String] {
    let mut state = Scan::SearchingOpen;

    for (i, line) in lines.iter().enumerate() {
        match state {
            Scan::SearchingOpen if line == open => {
                state = Scan::SearchingClose { start: i };
            }
            Scan::SearchingClose { start } if line == close => {
                return match markers {
                    Markers::Keep => &lines[start..=i],
                    Markers::Drop => &lines[start + 1..i],
                };
            }
            _ => {}
        }
    }

    &[]
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

/// Apply the cleanup transform to every fragment line and drop the lines
/// left empty by it.
fn cleaned_fragment(record: &MinutesRecord, lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| cleanup_line(line, &record.url))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Cleanup transform for one fragment line:
/// headings that would fight the generated page structure are stripped,
/// the nav's distinguishing id is removed, and in-document relative links
/// are rewritten to absolute links anchored at the source document.
fn cleanup_line(line: &str, document_url: &str) -> String {
    line.replace("<h2>Contents</h2>", "")
        .replace("<h2>Summary of resolutions</h2>", "")
        .replace(TOC_OPEN, "<nav>")
        .replace("href=\"#", &format!("href=\"{document_url}#"))
}
