//! Loader for signed-vote edge lists in CSV format.
//!
//! Each row is a vote cast by a source user on a target user, as in the
//! Wikipedia Requests-for-Adminship dataset. Voters point at the users they
//! voted on; the vote column can be used to keep only one sign.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;

use super::{ParseError, ParseResult};
use crate::graph::DirectedGraph;

/// Accepted header names for each required column (case-insensitive).
const SOURCE_COLUMNS: &[&str] = &["SOURCE", "SRC"];
const TARGET_COLUMNS: &[&str] = &["TARGET", "TGT"];
const VOTE_COLUMNS: &[&str] = &["VOTE", "VOT"];

/// Keeps only rows carrying one vote value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteFilter {
    /// Support votes (`1`)
    Positive,
    /// Oppose votes (`-1`)
    Negative,
    /// Neutral votes (`0`)
    Neutral,
}

impl VoteFilter {
    /// The vote value this filter keeps.
    pub fn value(&self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
            Self::Neutral => 0,
        }
    }
}

impl FromStr for VoteFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" | "1" | "+1" => Ok(Self::Positive),
            "negative" | "-1" => Ok(Self::Negative),
            "neutral" | "0" => Ok(Self::Neutral),
            _ => Err(format!(
                "Unknown vote filter: '{}'. Valid filters: positive, negative, neutral",
                s
            )),
        }
    }
}

impl fmt::Display for VoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Positions of the required columns in a record.
#[derive(Debug, Clone, Copy)]
struct Columns {
    source: usize,
    target: usize,
    vote: usize,
}

impl Columns {
    fn locate(header: &[String]) -> ParseResult<Self> {
        let find = |names: &[&'static str]| {
            header
                .iter()
                .position(|column| {
                    names
                        .iter()
                        .any(|name| column.trim().eq_ignore_ascii_case(name))
                })
                .ok_or(ParseError::MissingColumn(names[0]))
        };

        Ok(Self {
            source: find(SOURCE_COLUMNS)?,
            target: find(TARGET_COLUMNS)?,
            vote: find(VOTE_COLUMNS)?,
        })
    }

    fn width(&self) -> usize {
        self.source.max(self.target).max(self.vote) + 1
    }
}

/// Reads one CSV record, following quoted fields across line breaks.
///
/// Returns `None` at end of input. `line` is advanced by the number of
/// physical lines consumed.
fn read_record<B: BufRead>(lines: &mut Lines<B>, line: &mut usize) -> Option<io::Result<Vec<String>>> {
    let mut text = match lines.next()? {
        Ok(text) => text,
        Err(e) => return Some(Err(e)),
    };
    *line += 1;

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    loop {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                ('"', false) if field.is_empty() => in_quotes = true,
                (',', false) => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }

        if !in_quotes {
            break;
        }

        // quoted field continues on the next line
        field.push('\n');
        text = match lines.next() {
            Some(Ok(text)) => text,
            Some(Err(e)) => return Some(Err(e)),
            None => break,
        };
        *line += 1;
    }

    fields.push(field);
    Some(Ok(fields))
}

/// Builds a vote graph from CSV content.
///
/// Every voter and every candidate becomes a node, in order of first
/// appearance. Repeated votes from the same source on the same target add a
/// single edge.
///
/// # Example
///
/// ```
/// use sccscope::parser::vote_csv::{parse_reader, VoteFilter};
///
/// let csv = "SOURCE,TARGET,VOTE\nalice,bob,1\nbob,carol,-1\n";
/// let graph = parse_reader(csv.as_bytes(), Some(VoteFilter::Positive)).unwrap();
///
/// assert_eq!(graph.node_names(), vec!["alice", "bob"]);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub fn parse_reader<R: BufRead>(reader: R, filter: Option<VoteFilter>) -> ParseResult<DirectedGraph> {
    let mut lines = reader.lines();
    let mut line = 0;

    let header = read_record(&mut lines, &mut line).ok_or(ParseError::MissingHeader)??;
    let columns = Columns::locate(&header)?;

    let mut graph = DirectedGraph::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut rows = 0;
    let mut skipped = 0;

    while let Some(record) = read_record(&mut lines, &mut line) {
        let record = record?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if record.len() < columns.width() {
            log::warn!(
                "Line {}: expected at least {} columns, got {}; skipping",
                line,
                columns.width(),
                record.len()
            );
            skipped += 1;
            continue;
        }

        let source = &record[columns.source];
        let target = &record[columns.target];
        if source.is_empty() || target.is_empty() {
            log::warn!("Line {}: empty source or target; skipping", line);
            skipped += 1;
            continue;
        }

        let raw_vote = record[columns.vote].trim();
        let vote: i64 = raw_vote.parse().map_err(|_| ParseError::InvalidVote {
            line,
            value: raw_vote.to_string(),
        })?;
        rows += 1;

        if filter.is_some_and(|f| f.value() != vote) {
            continue;
        }

        graph.add_node(source);
        if seen.insert((source.clone(), target.clone())) {
            graph.connect(source, target);
        }
        graph.add_node(target);
    }

    log::info!(
        "Read {} vote row(s) ({} skipped): {} node(s), {} edge(s)",
        rows,
        skipped,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Loads a vote graph from a CSV file.
pub fn load_file(path: &Path, filter: Option<VoteFilter>) -> ParseResult<DirectedGraph> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), filter)
}
