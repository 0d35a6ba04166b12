//! CSV export implementation.
//!
//! Exports one row per node with its component and, in detailed reports,
//! its depth-first interval.

use super::{Exporter, ReportData};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "node,component,component_size,pre,post")?;

        let index = data.component_index();
        let intervals = data
            .forest
            .as_ref()
            .map(|forest| forest.intervals())
            .unwrap_or_default();

        for node in &data.nodes {
            let (component, size) = match index.get(node.as_str()) {
                Some(&i) => (i.to_string(), data.components[i].len().to_string()),
                None => (String::new(), String::new()),
            };
            // pre/post stay empty in summary reports
            let (pre, post) = match intervals.get(node.as_str()) {
                Some(iv) => (iv.pre.to_string(), iv.post.to_string()),
                None => (String::new(), String::new()),
            };

            writeln!(
                writer,
                "{},{},{},{},{}",
                Self::escape_field(node),
                component,
                size,
                pre,
                post
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RootOrder;
    use crate::export::lecture_graph;
    use crate::graph::DirectedGraph;

    fn export_lines(data: &ReportData) -> Vec<String> {
        let mut output = Vec::new();
        CsvExporter.export(data, &mut output).unwrap();

        let csv_str = String::from_utf8(output).unwrap();
        csv_str.lines().map(String::from).collect()
    }

    #[test]
    fn test_csv_export_basic() {
        let lines = export_lines(&ReportData::new("lecture", &lecture_graph()));

        // Header + 4 nodes
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "node,component,component_size,pre,post");
        assert_eq!(lines[1], "a,1,3,,");
        assert_eq!(lines[4], "d,0,1,,");
    }

    #[test]
    fn test_csv_export_detailed() {
        let data = ReportData::detailed("lecture", &lecture_graph(), &RootOrder::Insertion).unwrap();
        let lines = export_lines(&data);

        assert_eq!(lines[1], "a,1,3,1,8");
        assert_eq!(lines[2], "b,1,3,2,7");
        assert_eq!(lines[3], "c,1,3,3,6");
        assert_eq!(lines[4], "d,0,1,4,5");
    }

    #[test]
    fn test_csv_escape_field() {
        // No escaping needed
        assert_eq!(CsvExporter::escape_field("simple"), "simple");

        // Contains comma
        assert_eq!(
            CsvExporter::escape_field("has,comma"),
            "\"has,comma\""
        );

        // Contains quotes
        assert_eq!(
            CsvExporter::escape_field("has\"quote"),
            "\"has\"\"quote\""
        );

        // Contains newline
        assert_eq!(
            CsvExporter::escape_field("has\nnewline"),
            "\"has\nnewline\""
        );
    }

    #[test]
    fn test_csv_export_special_characters() {
        let graph = DirectedGraph::from_adjacency([("Smith, J.", vec!["x"])]);
        let mut output = Vec::new();
        CsvExporter
            .export(&ReportData::new("votes", &graph), &mut output)
            .unwrap();

        let csv_str = String::from_utf8(output).unwrap();
        assert!(csv_str.contains("\"Smith, J.\","));
    }

    #[test]
    fn test_csv_export_empty_graph() {
        let lines = export_lines(&ReportData::new("empty", &DirectedGraph::new()));
        assert_eq!(lines, vec!["node,component,component_size,pre,post"]);
    }
}
