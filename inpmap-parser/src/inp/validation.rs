//! Structural validation of a parsed model
//!
//! Catches the mistakes that make SWMM reject a model before the model ever reaches the
//! engine. Validation never fails; it returns a [`ValidationReport`] and leaves the
//! decision of whether ERROR issues block generation to the caller.
//!
//! ## Checks
//!
//! 1. **Required sections**: missing core sections are warnings, a model without
//!    outfalls is an error.
//! 2. **Node references**: every conduit, orifice and weir must connect declared nodes.
//! 3. **Cross-section arity**: `XSECTIONS` entries must carry enough geometry parameters
//!    for their link category and shape.
//!
//! A geometry entry for an unknown link is only a warning, while a link pointing at an
//! unknown node is an error.

use super::sections::{names, Row, Sections};
use std::collections::HashSet;
use std::fmt;

/// Sections every runnable model is expected to carry.
pub const REQUIRED_SECTIONS: [&str; 5] = [
    names::OPTIONS,
    names::RAINGAGES,
    names::SUBCATCHMENTS,
    names::SUBAREAS,
    names::INFILTRATION,
];

/// Sections whose rows declare nodes.
pub const NODE_SECTIONS: [&str; 3] = [names::JUNCTIONS, names::STORAGE, names::OUTFALLS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// What a validation issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    MissingSection,
    MissingOutfall,
    NoNodes,
    DanglingNode,
    UnknownGeometryLink,
    GeometryArity,
}

/// One finding of the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
    /// Follow-up lines: the offending source line, the expected format, a fix.
    pub notes: Vec<String>,
}

impl Issue {
    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        for note in &self.notes {
            write!(f, "\n  {}", note)?;
        }
        Ok(())
    }
}

/// Ordered list of issues found in a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }
}

/// Runs every check, in order, over `sections`.
pub fn validate(sections: &Sections) -> ValidationReport {
    let mut issues = Vec::new();
    issues.extend(check_required_sections(sections));
    issues.extend(check_node_references(sections));
    issues.extend(check_cross_sections(sections));
    ValidationReport { issues }
}

pub fn check_required_sections(sections: &Sections) -> Vec<Issue> {
    let mut issues: Vec<Issue> = REQUIRED_SECTIONS
        .iter()
        .filter(|name| !sections.has_rows(name))
        .map(|name| {
            Issue::warning(
                IssueKind::MissingSection,
                format!("Missing or empty [{}] section - model may not run", name),
            )
        })
        .collect();

    if !sections.has_rows(names::OUTFALLS) {
        issues.push(Issue::error(
            IssueKind::MissingOutfall,
            "No outfalls defined - SWMM requires at least one outlet node",
        ));
    }
    issues
}

/// Link categories that connect two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Conduit,
    Orifice,
    Weir,
    Pump,
}

impl LinkKind {
    pub fn section(self) -> &'static str {
        match self {
            LinkKind::Conduit => names::CONDUITS,
            LinkKind::Orifice => names::ORIFICES,
            LinkKind::Weir => names::WEIRS,
            LinkKind::Pump => names::PUMPS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkKind::Conduit => "Conduit",
            LinkKind::Orifice => "Orifice",
            LinkKind::Weir => "Weir",
            LinkKind::Pump => "Pump",
        }
    }
}

/// Links whose endpoints are checked against declared nodes.
const CONNECTED_LINKS: [LinkKind; 3] = [LinkKind::Conduit, LinkKind::Orifice, LinkKind::Weir];

/// Links an `XSECTIONS` entry may legitimately refer to. A name declared under several
/// categories is checked against the rules of each one.
const GEOMETRY_LINKS: [LinkKind; 4] = [
    LinkKind::Conduit,
    LinkKind::Orifice,
    LinkKind::Weir,
    LinkKind::Pump,
];

fn declared_nodes(sections: &Sections) -> HashSet<&str> {
    NODE_SECTIONS
        .iter()
        .filter_map(|name| sections.get(name))
        .flat_map(|section| section.element_names())
        .collect()
}

pub fn check_node_references(sections: &Sections) -> Vec<Issue> {
    let nodes = declared_nodes(sections);
    if nodes.is_empty() {
        return vec![Issue::warning(IssueKind::NoNodes, "No nodes defined in model")];
    }

    let mut issues = Vec::new();
    for kind in CONNECTED_LINKS {
        for row in sections.rows(kind.section()) {
            let [link, from, to, ..] = row.as_slice() else {
                continue;
            };
            for (end, node) in [("from-node", from), ("to-node", to)] {
                if !nodes.contains(node.as_str()) {
                    issues.push(Issue::error(
                        IssueKind::DanglingNode,
                        format!(
                            "{} '{}' references non-existent {} '{}'",
                            kind.label(),
                            link,
                            end,
                            node
                        ),
                    ));
                }
            }
        }
    }
    issues
}

/// Parameter-count requirement of a geometry rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    AtLeast(usize),
    /// Two parameters, or four and more; exactly three is rejected.
    TwoOrFour,
}

/// Minimum geometry parameters for a link category and cross-section shape.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRule {
    pub link: LinkKind,
    pub shape: &'static str,
    pub arity: Arity,
    /// Parameter names for the suggested format.
    pub parameters: &'static str,
}

pub const GEOMETRY_RULES: [GeometryRule; 4] = [
    GeometryRule {
        link: LinkKind::Weir,
        shape: "RECT_OPEN",
        arity: Arity::TwoOrFour,
        parameters: "<height> <width> [side_slope_left] [side_slope_right]",
    },
    GeometryRule {
        link: LinkKind::Orifice,
        shape: "CIRCULAR",
        arity: Arity::AtLeast(1),
        parameters: "<diameter>",
    },
    GeometryRule {
        link: LinkKind::Conduit,
        shape: "CIRCULAR",
        arity: Arity::AtLeast(1),
        parameters: "<diameter>",
    },
    GeometryRule {
        link: LinkKind::Conduit,
        shape: "RECT_OPEN",
        arity: Arity::AtLeast(2),
        parameters: "<height> <width>",
    },
];

fn link_kinds_of(sections: &Sections, link: &str) -> Vec<LinkKind> {
    GEOMETRY_LINKS
        .into_iter()
        .filter(|kind| sections.declares(kind.section(), link))
        .collect()
}

pub fn check_cross_sections(sections: &Sections) -> Vec<Issue> {
    let mut issues = Vec::new();
    for row in sections.rows(names::XSECTIONS) {
        let [link, shape, params @ ..] = row.as_slice() else {
            continue;
        };

        let kinds = link_kinds_of(sections, link);
        if kinds.is_empty() {
            issues.push(Issue::warning(
                IssueKind::UnknownGeometryLink,
                format!(
                    "XSECTION for '{}' but link not found in CONDUITS, ORIFICES, WEIRS, or PUMPS",
                    link
                ),
            ));
            continue;
        }

        for kind in kinds {
            let rules = GEOMETRY_RULES
                .iter()
                .filter(|rule| rule.link == kind && rule.shape == shape.as_str());
            for rule in rules {
                issues.extend(check_arity(rule, link, row, params.len()));
            }
        }
    }
    issues
}

fn check_arity(rule: &GeometryRule, link: &str, row: &Row, count: usize) -> Option<Issue> {
    let current = format!("Current line: {}", row.join(" "));
    let expected = format!("Expected format: {} {} {}", link, rule.shape, rule.parameters);
    match rule.arity {
        Arity::AtLeast(min) if count < min => Some(
            Issue::error(
                IssueKind::GeometryArity,
                format!(
                    "{} '{}' with {} needs at least {} parameter{}, found {}",
                    rule.link.label(),
                    link,
                    rule.shape,
                    min,
                    if min == 1 { "" } else { "s" },
                    count
                ),
            )
            .with_note(current)
            .with_note(expected),
        ),
        Arity::TwoOrFour if count < 2 => Some(
            Issue::error(
                IssueKind::GeometryArity,
                format!(
                    "{} '{}' with {} needs at least 2 parameters, found {}",
                    rule.link.label(),
                    link,
                    rule.shape,
                    count
                ),
            )
            .with_note(current)
            .with_note(expected),
        ),
        Arity::TwoOrFour if count == 3 => Some(
            Issue::error(
                IssueKind::GeometryArity,
                format!(
                    "{} '{}' with {} has 3 parameters - SWMM expects 2 or 4",
                    rule.link.label(),
                    link,
                    rule.shape
                ),
            )
            .with_note(current)
            .with_note(format!(
                "Fix: {} {} <height> <width>, or {} {} {}",
                link, rule.shape, link, rule.shape, rule.parameters
            )),
        ),
        _ => None,
    }
}
