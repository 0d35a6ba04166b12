//! Markdown export implementation.
//!
//! Exports graph analysis results in Markdown format for documentation and
//! reporting, and renders benchmark tables.

use super::{Exporter, ReportData};
use crate::analysis::{largest_components, EdgeKind};
use crate::benchmark::RuntimeSample;
use std::io::{self, Write};

/// Largest components listed in a report.
const LARGEST_LISTED: usize = 10;
/// Members shown per listed component.
const MEMBERS_SHOWN: usize = 8;

/// Column headers of the benchmark runtime table.
pub const RUNTIME_HEADERS: [&str; 5] = ["Density Factor", "Size ", "   V   ", "   E   ", "Time (sec)"];

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Graph Analysis Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Graph:** {}", data.name)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Nodes | {} |", data.stats.nodes)?;
        writeln!(writer, "| Edges | {} |", data.stats.edges)?;
        writeln!(writer, "| Average Out-Degree | {:.2} |", data.stats.avg_degree)?;
        writeln!(writer, "| Undeclared Nodes | {} |", data.undeclared)?;
        writeln!(writer, "| Strongly Connected Components | {} |", data.summary.count)?;
        writeln!(writer, "| Single-Node Components | {} |", data.summary.trivial)?;
        writeln!(writer, "| Multi-Node Components | {} |", data.summary.non_trivial)?;
        writeln!(writer, "| Largest Component | {} |", data.summary.largest)?;
        writeln!(writer)?;

        // Largest components
        if data.summary.non_trivial > 0 {
            writeln!(writer, "## Largest Components")?;
            writeln!(writer)?;
            writeln!(writer, "| Size | Members |")?;
            writeln!(writer, "|------|---------|")?;
            for component in largest_components(&data.components, LARGEST_LISTED) {
                if component.len() < 2 {
                    break;
                }
                let mut members: Vec<&str> =
                    component.iter().take(MEMBERS_SHOWN).map(String::as_str).collect();
                if component.len() > MEMBERS_SHOWN {
                    members.push("...");
                }
                writeln!(writer, "| {} | {} |", component.len(), members.join(", "))?;
            }
            writeln!(writer)?;
        }

        // Depth-first trees
        if let Some(forest) = &data.forest {
            writeln!(writer, "## Depth-First Forest")?;
            writeln!(writer)?;
            writeln!(writer, "| Root | Nodes | Interval |")?;
            writeln!(writer, "|------|-------|----------|")?;
            for tree in forest {
                let root = tree.root().unwrap_or_default();
                let interval = tree.get(root).map(|iv| iv.to_string()).unwrap_or_default();
                writeln!(writer, "| {} | {} | {} |", root, tree.len(), interval)?;
            }
            writeln!(writer)?;
        }

        // Edge distribution
        if let Some(edges) = &data.classification {
            writeln!(writer, "## Edge Classification")?;
            writeln!(writer)?;
            writeln!(writer, "| Kind | Count | Share |")?;
            writeln!(writer, "|------|-------|-------|")?;
            for (kind, count) in edges.counts() {
                writeln!(
                    writer,
                    "| {} | {} | {:.2}% |",
                    kind,
                    count,
                    edges.percentage(kind)
                )?;
            }
            writeln!(writer)?;

            if !edges.get(EdgeKind::Back).is_empty() {
                writeln!(
                    writer,
                    "{} back edge(s) were found; every one closes a cycle.",
                    edges.get(EdgeKind::Back).len()
                )?;
                writeln!(writer)?;
            }
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by sccscope*")?;

        Ok(())
    }
}

/// Formats samples as rows of [`runtime_table`] matching [`RUNTIME_HEADERS`].
pub fn runtime_rows(samples: &[RuntimeSample]) -> Vec<Vec<String>> {
    samples
        .iter()
        .map(|s| {
            vec![
                s.density.to_string(),
                s.size.to_string(),
                s.vertices.to_string(),
                s.edges.to_string(),
                s.seconds.to_string(),
            ]
        })
        .collect()
}

/// Renders a markdown table with every cell left-aligned and padded to the
/// width of its column header.
///
/// Cells wider than their header are kept whole.
///
/// # Example
///
/// ```
/// use sccscope::export::markdown::runtime_table;
///
/// let rows = vec![vec!["1".to_string(), "0.5".to_string()]];
/// let table = runtime_table(&rows, &["Size ", "Time"]);
///
/// assert_eq!(table, "| Size  | Time |\n| ----- | ---- |\n| 1     | 0.5  |\n");
/// ```
pub fn runtime_table<S: AsRef<str>>(rows: &[Vec<String>], headers: &[S]) -> String {
    let headers: Vec<&str> = headers.iter().map(AsRef::as_ref).collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!(
        "| {} |",
        widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join(" | ")
    ));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(field, &width)| format!("{:<width$}", field, width = width))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    let mut table = lines.join("\n");
    table.push('\n');
    table
}
