//! JSON export implementation.
//!
//! Exports graph analysis results in JSON format for machine-readable output.

use super::{Exporter, ReportData};
use crate::analysis::EdgeKind;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    nodes: usize,
    edges: usize,
    avg_degree: f64,
    undeclared_nodes: usize,
    components: usize,
    trivial_components: usize,
    non_trivial_components: usize,
    largest_component: usize,
}

/// One depth-first tree for JSON output.
#[derive(Serialize)]
struct JsonTree {
    root: String,
    /// Node label to `[pre, post]`
    intervals: Map<String, Value>,
}

/// Edge distribution for JSON output.
#[derive(Serialize)]
struct JsonEdges {
    counts: Map<String, Value>,
    edges: Map<String, Value>,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    graph: String,
    summary: JsonSummary,
    components: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forest: Option<Vec<JsonTree>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<JsonEdges>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        let forest = data.forest.as_ref().map(|forest| {
            forest
                .iter()
                .map(|tree| JsonTree {
                    root: tree.root().unwrap_or_default().to_string(),
                    intervals: tree
                        .iter()
                        .map(|(name, iv)| (name.to_string(), Value::from(vec![iv.pre, iv.post])))
                        .collect(),
                })
                .collect()
        });

        let classification = data.classification.as_ref().map(|edges| {
            let mut counts = Map::new();
            let mut lists = Map::new();
            for kind in EdgeKind::ALL {
                let set = edges.get(kind);
                counts.insert(kind.key().to_string(), Value::from(set.len()));
                lists.insert(
                    kind.key().to_string(),
                    Value::from(
                        set.iter()
                            .map(|(from, to)| Value::from(vec![from.as_str(), to.as_str()]))
                            .collect::<Vec<_>>(),
                    ),
                );
            }
            JsonEdges {
                counts,
                edges: lists,
            }
        });

        let export = JsonExport {
            graph: data.name.clone(),
            summary: JsonSummary {
                nodes: data.stats.nodes,
                edges: data.stats.edges,
                avg_degree: data.stats.avg_degree,
                undeclared_nodes: data.undeclared,
                components: data.summary.count,
                trivial_components: data.summary.trivial,
                non_trivial_components: data.summary.non_trivial,
                largest_component: data.summary.largest,
            },
            components: data
                .components
                .iter()
                .map(|c| c.iter().cloned().collect())
                .collect(),
            forest,
            classification,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
