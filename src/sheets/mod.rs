//! Interpretation of curation sheets.
//!
//! A curation sheet is a table whose first row is a header. Each subsequent
//! row proposes one BEL statement (`Subject`, `Relation`, `Object`) together
//! with its provenance and curator verdicts. Rows that were checked and judged
//! correct (or corrected) become graph edges; rows that cannot be interpreted
//! become graph warnings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{Annotations, BelGraph, Edge, EdgeData, Relation, UnknownRelation, Warning};

pub const SUBJECT_COLUMN: &str = "Subject";
pub const RELATION_COLUMN: &str = "Relation";
pub const RELATION_ALIAS_COLUMN: &str = "Predicate";
pub const OBJECT_COLUMN: &str = "Object";
pub const EVIDENCE_COLUMN: &str = "Evidence";
pub const PMID_COLUMN: &str = "PMID";
pub const CHECKED_COLUMN: &str = "Checked";
pub const CORRECT_COLUMN: &str = "Correct";
pub const CHANGED_COLUMN: &str = "Changed";
pub const COMMENT_COLUMN: &str = "Comment";

/// Separator used for multi-valued annotation cells.
pub const ANNOTATION_VALUE_SEPARATOR: char = '|';

const RESERVED_COLUMNS: [&str; 10] = [
    SUBJECT_COLUMN,
    RELATION_COLUMN,
    RELATION_ALIAS_COLUMN,
    OBJECT_COLUMN,
    EVIDENCE_COLUMN,
    PMID_COLUMN,
    CHECKED_COLUMN,
    CORRECT_COLUMN,
    CHANGED_COLUMN,
    COMMENT_COLUMN,
];

/// A worksheet (or TSV file) as a grid of cell strings.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    /// Path of the file the sheet was read from.
    pub path: String,
    /// Worksheet name for workbooks, `None` for TSV files.
    pub sheet: Option<String>,
    pub rows: Vec<SheetRow>,
}

/// One row of a sheet with the 1-based line it occupies in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawSheet {
    fn label(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}#{sheet}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Per-sheet curation progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetStatistics {
    pub source: String,
    pub rows: usize,
    pub checked: usize,
    pub correct: usize,
    pub changed: usize,
    pub included: usize,
    pub warnings: usize,
}

impl SheetStatistics {
    pub const COLUMNS: [&'static str; 7] = [
        "Source", "Rows", "Checked", "Correct", "Changed", "Included", "Warnings",
    ];

    fn new(source: String) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn counts(&self) -> [usize; 6] {
        [
            self.rows,
            self.checked,
            self.correct,
            self.changed,
            self.included,
            self.warnings,
        ]
    }

    /// Sums a set of statistics into a single row labelled `source`.
    pub fn total<'a>(source: &str, items: impl IntoIterator<Item = &'a SheetStatistics>) -> Self {
        items
            .into_iter()
            .fold(Self::new(source.to_string()), |mut total, item| {
                total.rows += item.rows;
                total.checked += item.checked;
                total.correct += item.correct;
                total.changed += item.changed;
                total.included += item.included;
                total.warnings += item.warnings;
                total
            })
    }
}

struct ColumnLayout {
    subject: usize,
    relation: usize,
    object: usize,
    evidence: Option<usize>,
    pmid: Option<usize>,
    checked: Option<usize>,
    correct: Option<usize>,
    changed: Option<usize>,
    annotations: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_header(header: &[String]) -> std::result::Result<Self, String> {
        let positions: BTreeMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim(), index))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let required = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| format!("missing required column '{name}'"))
        };
        let relation = positions
            .get(RELATION_COLUMN)
            .or_else(|| positions.get(RELATION_ALIAS_COLUMN))
            .copied()
            .ok_or_else(|| format!("missing required column '{RELATION_COLUMN}'"))?;

        let annotations = positions
            .iter()
            .filter(|(name, _)| !RESERVED_COLUMNS.contains(*name))
            .map(|(name, &index)| (index, name.to_string()))
            .collect();

        Ok(Self {
            subject: required(SUBJECT_COLUMN)?,
            relation,
            object: required(OBJECT_COLUMN)?,
            evidence: positions.get(EVIDENCE_COLUMN).copied(),
            pmid: positions.get(PMID_COLUMN).copied(),
            checked: positions.get(CHECKED_COLUMN).copied(),
            correct: positions.get(CORRECT_COLUMN).copied(),
            changed: positions.get(CHANGED_COLUMN).copied(),
            annotations,
        })
    }

    /// Without these columns no row can be accepted.
    fn missing_verdicts(&self) -> Option<String> {
        if self.checked.is_none() {
            return Some(format!("missing verdict column '{CHECKED_COLUMN}'"));
        }
        if self.correct.is_none() && self.changed.is_none() {
            return Some(format!(
                "missing verdict column '{CORRECT_COLUMN}' or '{CHANGED_COLUMN}'"
            ));
        }
        None
    }
}

/// Adds the statements of `sheet` to `graph` and records its warnings.
pub fn process_sheet(sheet: &RawSheet, graph: &mut BelGraph) -> SheetStatistics {
    let mut stats = SheetStatistics::new(sheet.label());

    let Some(header) = sheet.rows.first() else {
        return stats;
    };
    let layout = match ColumnLayout::from_header(&header.cells) {
        Ok(layout) => layout,
        Err(message) => {
            warn(graph, &mut stats, sheet, header.line, message);
            return stats;
        }
    };
    if let Some(message) = layout.missing_verdicts() {
        warn(graph, &mut stats, sheet, header.line, message);
    }

    for SheetRow { line, cells: row } in sheet.rows.iter().skip(1) {
        let line = *line;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        stats.rows += 1;

        if !flag(row, layout.checked) {
            continue;
        }
        stats.checked += 1;

        let correct = flag(row, layout.correct);
        let changed = flag(row, layout.changed);
        if correct {
            stats.correct += 1;
        }
        if changed {
            stats.changed += 1;
        }
        if !correct && !changed {
            continue;
        }

        match build_edge(row, &layout) {
            Ok(edge) => {
                graph.add_edge(edge);
                stats.included += 1;
            }
            Err(message) => warn(graph, &mut stats, sheet, line, message),
        }
    }

    stats
}

fn warn(
    graph: &mut BelGraph,
    stats: &mut SheetStatistics,
    sheet: &RawSheet,
    line: usize,
    message: String,
) {
    let message = match &sheet.sheet {
        Some(name) => format!("[{name}] {message}"),
        None => message,
    };
    graph.add_warning(Warning {
        path: sheet.path.clone(),
        line,
        message,
    });
    stats.warnings += 1;
}

fn build_edge(row: &[String], layout: &ColumnLayout) -> std::result::Result<Edge, String> {
    let subject = term(row, layout.subject, SUBJECT_COLUMN)?;
    let object = term(row, layout.object, OBJECT_COLUMN)?;
    let relation: Relation = cell(row, Some(layout.relation))
        .parse()
        .map_err(|err: UnknownRelation| err.to_string())?;

    let mut data = EdgeData::new(relation);

    let pmid = cell(row, layout.pmid);
    if !pmid.is_empty() {
        if !pmid.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid PMID '{pmid}'"));
        }
        data.citation = Some(format!("pubmed:{pmid}"));
    }

    let evidence = cell(row, layout.evidence);
    if !evidence.is_empty() {
        data.evidence = Some(evidence.to_string());
    }

    let mut annotations = Annotations::new();
    for (index, name) in &layout.annotations {
        let values: BTreeSet<String> = cell(row, Some(*index))
            .split(ANNOTATION_VALUE_SEPARATOR)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        if !values.is_empty() {
            annotations.insert(name.clone(), values);
        }
    }
    data.annotations = Some(annotations);

    Ok(Edge::new(subject, object, data))
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|index| row.get(index))
        .map(|value| value.trim())
        .unwrap_or_default()
}

fn term(row: &[String], index: usize, column: &str) -> std::result::Result<String, String> {
    let value = normalize_term(cell(row, Some(index)));
    if value.is_empty() {
        return Err(format!("empty {}", column.to_ascii_lowercase()));
    }
    if !is_bel_term(&value) {
        return Err(format!("malformed BEL term '{value}'"));
    }
    Ok(value)
}

/// Interprets a curator verdict cell.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    if let Ok(number) = value.parse::<f64>() {
        return number != 0.0 && !number.is_nan();
    }
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "x"
    )
}

fn flag(row: &[String], index: Option<usize>) -> bool {
    is_truthy(cell(row, index))
}

/// Collapses runs of whitespace into single spaces.
pub fn normalize_term(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Checks the outer shape of a BEL term: `function(...)` with balanced
/// parentheses and quotes.
pub fn is_bel_term(value: &str) -> bool {
    let Some(open) = value.find('(') else {
        return false;
    };
    let function = &value[..open];
    if function.is_empty() || !function.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !value.ends_with(')') {
        return false;
    }

    let mut depth = 0usize;
    let mut quoted = false;
    let mut escaped = false;
    for (position, c) in value.char_indices().skip(open) {
        if quoted {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
                if depth == 0 && position + 1 != value.len() {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && !quoted
}
