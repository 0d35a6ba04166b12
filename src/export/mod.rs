//! Export functionality for graph analysis results.
//!
//! This module provides exporters for outputting component and edge
//! analysis results in various formats: JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use crate::analysis::{
    classify_edges, component_index, find_sccs, traverse, AnalysisResult, Component,
    EdgeClassification, Forest, RootOrder, SccSummary,
};
use crate::graph::{DirectedGraph, GraphStats};
use std::collections::HashMap;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds all the analysis results that can be exported. The forest and the
/// edge classification are only present in detailed reports.
#[derive(Debug, Clone)]
pub struct ReportData {
    /// Name of the analyzed graph, usually its file name
    pub name: String,
    /// Node labels in insertion order
    pub nodes: Vec<String>,
    pub stats: GraphStats,
    /// Number of successors that were never declared as nodes
    pub undeclared: usize,
    /// Strongly connected components, sink components first
    pub components: Vec<Component>,
    pub summary: SccSummary,
    pub forest: Option<Forest>,
    pub classification: Option<EdgeClassification>,
}

impl ReportData {
    /// Create report data with the component analysis of `graph`.
    pub fn new(name: impl Into<String>, graph: &DirectedGraph) -> Self {
        let components = find_sccs(graph);
        let summary = SccSummary::from_components(&components);

        Self {
            name: name.into(),
            nodes: graph.node_names().into_iter().map(String::from).collect(),
            stats: graph.stats(),
            undeclared: graph.undeclared_nodes().len(),
            components,
            summary,
            forest: None,
            classification: None,
        }
    }

    /// Create report data that also carries the depth-first forest and the
    /// edge classification.
    pub fn detailed(
        name: impl Into<String>,
        graph: &DirectedGraph,
        order: &RootOrder,
    ) -> AnalysisResult<Self> {
        let forest = traverse(graph, order);
        let classification = classify_edges(graph, &forest)?;

        let mut data = Self::new(name, graph);
        data.forest = Some(forest);
        data.classification = Some(classification);
        Ok(data)
    }

    /// Map from node label to the index of its component.
    pub fn component_index(&self) -> HashMap<&str, usize> {
        component_index(&self.components)
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ReportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ReportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) fn lecture_graph() -> DirectedGraph {
    DirectedGraph::from_adjacency([
        ("a", vec!["b"]),
        ("b", vec!["c"]),
        ("c", vec!["a", "d"]),
        ("d", vec![]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Csv), "csv");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_report_data_new() {
        let data = ReportData::new("lecture", &lecture_graph());

        assert_eq!(data.name, "lecture");
        assert_eq!(data.nodes, vec!["a", "b", "c", "d"]);
        assert_eq!(data.summary.count, 2);
        assert_eq!(data.summary.largest, 3);
        assert!(data.forest.is_none());
        assert!(data.classification.is_none());
    }

    #[test]
    fn test_report_data_detailed() {
        let data = ReportData::detailed("lecture", &lecture_graph(), &RootOrder::Insertion).unwrap();

        assert_eq!(data.forest.as_ref().unwrap().len(), 1);
        assert_eq!(data.classification.as_ref().unwrap().total(), 4);
        assert_eq!(data.component_index()["d"], 0);
        assert_eq!(data.component_index()["a"], 1);
    }

    #[test]
    fn test_export_to_string_all_formats() {
        let data = ReportData::new("lecture", &lecture_graph());
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Markdown] {
            assert!(!export_to_string(format, &data).unwrap().is_empty());
        }
    }
}
