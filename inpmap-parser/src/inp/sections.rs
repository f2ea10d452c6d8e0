//! Section Parser
//!
//!     Turns `.inp` source text into a [`Sections`] table: an ordered mapping from section
//!     name to the whitespace-split rows that follow its `[NAME]` header.
//!
//! Line Rules
//!
//!     `\n`, `\r\n` and a lone `\r` all end a line. Lines are processed in file order,
//!     after trimming:
//!         - empty lines and lines starting with `;` are skipped;
//!         - a line starting with `[` must end with `]` and name a section; a name seen
//!           before re-opens the existing entry, rows keep appending to it;
//!         - any other line holding `[` or `]` is rejected, even inside a section;
//!         - data before the first header is orphaned and dropped;
//!         - data inside a section is split on whitespace runs into a [`Row`].
//!
//!     Insertion order is preserved for sections and for rows, since it decides the
//!     order in which slots are discovered later on.
//!
//! Parser State
//!
//!     The "current section" cursor lives in [`SectionParser`], which is fed one line at a
//!     time and finished into the table. Nothing else holds state, so partial inputs can be
//!     fed and inspected directly in tests.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Comment marker; a trimmed line starting with it is ignored entirely.
pub const COMMENT_MARKER: char = ';';

/// Section names the discovery engine and the validator read.
pub mod names {
    pub const OPTIONS: &str = "OPTIONS";
    pub const RAINGAGES: &str = "RAINGAGES";
    pub const SUBCATCHMENTS: &str = "SUBCATCHMENTS";
    pub const SUBAREAS: &str = "SUBAREAS";
    pub const INFILTRATION: &str = "INFILTRATION";
    pub const JUNCTIONS: &str = "JUNCTIONS";
    pub const OUTFALLS: &str = "OUTFALLS";
    pub const STORAGE: &str = "STORAGE";
    pub const CONDUITS: &str = "CONDUITS";
    pub const PUMPS: &str = "PUMPS";
    pub const ORIFICES: &str = "ORIFICES";
    pub const WEIRS: &str = "WEIRS";
    pub const XSECTIONS: &str = "XSECTIONS";
    pub const CONTROLS: &str = "CONTROLS";
    pub const DWF: &str = "DWF";
}

/// One whitespace-split data line.
pub type Row = Vec<String>;

/// Errors that stop a parse. No partial table survives one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed section header at line {line}: '{text}' - missing closing bracket ']'")]
    MalformedHeader { line: usize, text: String },

    #[error("Empty section name at line {line}: '{text}'")]
    EmptySectionName { line: usize, text: String },

    #[error("Invalid syntax at line {line}: '{text}' - unexpected bracket character")]
    UnexpectedBracket { line: usize, text: String },
}

impl ParseError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedHeader { line, .. }
            | ParseError::EmptySectionName { line, .. }
            | ParseError::UnexpectedBracket { line, .. } => *line,
        }
    }
}

/// A named group of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    rows: Vec<Row>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First field of every non-empty row, in declaration order.
    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().map(String::as_str))
    }
}

/// The Section Table: sections in first-seen order, addressable by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&i| &self.sections[i])
    }

    /// Rows of `name`, or an empty slice when the section is absent.
    pub fn rows(&self, name: &str) -> &[Row] {
        self.get(name).map(Section::rows).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// True when the section exists and holds at least one row.
    pub fn has_rows(&self, name: &str) -> bool {
        !self.rows(name).is_empty()
    }

    /// Whether `element` is the first field of some row in `name`.
    pub fn declares(&self, name: &str, element: &str) -> bool {
        self.rows(name)
            .iter()
            .any(|row| row.first().is_some_and(|first| first == element))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Index of `name`, creating an empty entry the first time it is seen.
    fn open(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.sections.len();
        self.sections.push(Section::new(name));
        self.index.insert(name.to_string(), i);
        i
    }
}

impl<N, R> FromIterator<(N, R)> for Sections
where
    N: Into<String>,
    R: IntoIterator<Item = Row>,
{
    /// Builds a table from `(name, rows)` pairs; repeated names append, empty rows are dropped.
    fn from_iter<T: IntoIterator<Item = (N, R)>>(iter: T) -> Self {
        let mut sections = Sections::new();
        for (name, rows) in iter {
            let name = name.into();
            let i = sections.open(&name);
            sections.sections[i]
                .rows
                .extend(rows.into_iter().filter(|row| !row.is_empty()));
        }
        sections
    }
}

/// Single-pass parser state.
#[derive(Debug, Default)]
pub struct SectionParser {
    table: Sections,
    current: Option<usize>,
    orphans: usize,
}

impl SectionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the section data lines are currently appended to.
    pub fn current_section(&self) -> Option<&str> {
        self.current.map(|i| self.table.sections[i].name())
    }

    /// Processes one raw line. `line_number` is 1-based and only used for errors.
    pub fn feed_line(&mut self, line_number: usize, raw: &str) -> Result<(), ParseError> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(());
        }

        if line.starts_with('[') {
            let name = parse_header(line_number, line)?;
            self.current = Some(self.table.open(name));
            return Ok(());
        }

        if line.contains(['[', ']']) {
            return Err(ParseError::UnexpectedBracket {
                line: line_number,
                text: line.to_string(),
            });
        }

        match self.current {
            Some(i) => {
                let row: Row = line.split_whitespace().map(str::to_string).collect();
                if !row.is_empty() {
                    self.table.sections[i].rows.push(row);
                }
            }
            None => self.orphans += 1,
        }
        Ok(())
    }

    pub fn finish(self) -> Sections {
        if self.orphans > 0 {
            debug!(
                lines = self.orphans,
                "discarded data lines before the first section header"
            );
        }
        self.table
    }
}

/// Extracts the section name from a trimmed line known to start with `[`.
fn parse_header(line_number: usize, line: &str) -> Result<&str, ParseError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ParseError::MalformedHeader {
            line: line_number,
            text: line.to_string(),
        })?;

    let name = inner.trim();
    if name.is_empty() {
        return Err(ParseError::EmptySectionName {
            line: line_number,
            text: line.to_string(),
        });
    }
    if name.contains(['[', ']']) {
        return Err(ParseError::UnexpectedBracket {
            line: line_number,
            text: line.to_string(),
        });
    }
    Ok(name)
}

/// Splits `source` into lines, accepting LF, CRLF and old Mac CR endings.
pub(crate) fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Parses `.inp` source text into a Section Table.
pub fn parse_sections(source: &str) -> Result<Sections, ParseError> {
    let mut parser = SectionParser::new();
    for (i, line) in source_lines(source).enumerate() {
        parser.feed_line(i + 1, line)?;
    }
    let sections = parser.finish();
    debug!(sections = sections.len(), "parsed section table");
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn parses_headers_and_rows_in_order() {
        let source = "[TITLE]\nDemo model\n\n[JUNCTIONS]\nJ1 10 5\nJ2\t12   6\n";
        let sections = parse_sections(source).unwrap();

        assert_eq!(sections.names().collect::<Vec<_>>(), ["TITLE", "JUNCTIONS"]);
        assert_eq!(sections.rows("TITLE"), &[row(&["Demo", "model"])]);
        assert_eq!(
            sections.rows("JUNCTIONS"),
            &[row(&["J1", "10", "5"]), row(&["J2", "12", "6"])]
        );
    }

    #[test]
    fn splits_on_every_line_ending() {
        let lines: Vec<_> = source_lines("a\r\nb\rc\nd").collect();
        assert_eq!(lines, ["a", "b", "c", "d"]);
    }

    #[test]
    fn carriage_return_only_files_parse() {
        let sections = parse_sections("[OUTFALLS]\rOUT1 90 FREE\r[JUNCTIONS]\rJ1 10\r").unwrap();
        assert!(sections.declares("OUTFALLS", "OUT1"));
        assert_eq!(sections.rows("JUNCTIONS"), &[row(&["J1", "10"])]);
    }

    #[test]
    fn error_lines_count_any_line_ending() {
        let crlf = parse_sections("[A]\r\nx\r\n[B\r\n").unwrap_err();
        assert_eq!(crlf.line(), 3);
        let cr = parse_sections("[A]\rx\r[B\r").unwrap_err();
        assert_eq!(cr.line(), 3);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let source = ";; header comment\n[RAINGAGES]\n;;Name Format\n   \nRG1 INTENSITY\n  ; indented\n";
        let sections = parse_sections(source).unwrap();
        assert_eq!(sections.rows("RAINGAGES"), &[row(&["RG1", "INTENSITY"])]);
    }

    #[test]
    fn reopened_section_appends() {
        let source = "[STORAGE]\nS1\n[OUTFALLS]\nO1\n[STORAGE]\nS2\n";
        let sections = parse_sections(source).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections.rows("STORAGE"), &[row(&["S1"]), row(&["S2"])]);
        assert_eq!(sections.names().collect::<Vec<_>>(), ["STORAGE", "OUTFALLS"]);
    }

    #[test]
    fn orphan_data_is_dropped() {
        let sections = parse_sections("stray data\n[A]\nx y\n").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.rows("A"), &[row(&["x", "y"])]);
    }

    #[test]
    fn header_name_is_trimmed_and_may_contain_spaces() {
        let sections = parse_sections("[  SECTION WITH SPACES ]\nd v\n").unwrap();
        assert!(sections.contains("SECTION WITH SPACES"));
    }

    #[test]
    fn empty_section_is_kept() {
        let sections = parse_sections("[EMPTY]\n\n[DATA]\na b\n").unwrap();
        assert!(sections.contains("EMPTY"));
        assert!(!sections.has_rows("EMPTY"));
        assert!(sections.has_rows("DATA"));
    }

    #[test]
    fn missing_closing_bracket_fails() {
        let err = parse_sections("[OPTIONS]\nFLOW_UNITS CFS\n[JUNCTIONS\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 3, .. }));
        assert!(err.to_string().contains("missing closing bracket"));
    }

    #[test]
    fn blank_header_fails() {
        let err = parse_sections("\n[   ]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::EmptySectionName {
                line: 2,
                text: "[   ]".to_string()
            }
        );
    }

    #[test]
    fn bracket_in_data_line_fails() {
        let err = parse_sections("[VALID]\ndata1 value1\ndata2 [invalid] value2\n").unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(err.to_string().contains("Invalid syntax"));
        assert!(err.to_string().contains("unexpected bracket"));
    }

    #[test]
    fn nested_brackets_in_header_fail() {
        let err = parse_sections("[A]B]\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedBracket { line: 1, .. }));
    }

    #[test]
    fn parser_state_tracks_current_section() {
        let mut parser = SectionParser::new();
        assert_eq!(parser.current_section(), None);
        parser.feed_line(1, "[PUMPS]").unwrap();
        assert_eq!(parser.current_section(), Some("PUMPS"));
        parser.feed_line(2, "P1 WET OUT DUMMY ON").unwrap();
        let sections = parser.finish();
        assert_eq!(sections.rows("PUMPS").len(), 1);
    }

    #[test]
    fn from_iter_builds_table() {
        let sections: Sections = vec![
            ("WEIRS", vec![row(&["W1", "A", "B"])]),
            ("WEIRS", vec![row(&["W2", "B", "C"]), Vec::new()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(sections.rows("WEIRS").len(), 2);
        assert!(sections.declares("WEIRS", "W2"));
        assert!(!sections.declares("WEIRS", "W3"));
        assert!(sections.rows("MISSING").is_empty());
    }
}
