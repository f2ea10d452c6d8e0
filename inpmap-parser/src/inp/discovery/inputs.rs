//! Sentinel-driven input discovery

use super::slots::{IndexedPush, InputObjectType, InputSlot};
use super::SENTINEL;
use crate::inp::sections::{names, Row, Sections};
use crate::inp::validation::NODE_SECTIONS;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// A sentinel reference that could not be honoured. The element is left out of the
/// slot list; discovery carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryWarning {
    UnknownReference {
        object_type: InputObjectType,
        name: String,
        expected_in: &'static [&'static str],
    },
}

impl fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryWarning::UnknownReference {
                object_type,
                name,
                expected_in,
            } => {
                let sections: Vec<String> =
                    expected_in.iter().map(|s| format!("[{}]", s)).collect();
                let listed = match sections.as_slice() {
                    [only] => format!("{} section", only),
                    [init @ .., last] => format!("{}, or {} sections", init.join(", "), last),
                    [] => "any section".to_string(),
                };
                write!(
                    f,
                    "Skipping {} reference to {} '{}' - not found in {}",
                    SENTINEL,
                    object_type.as_str().to_lowercase(),
                    name,
                    listed
                )
            }
        }
    }
}

/// Input slots in index order plus the warnings raised while finding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDiscovery {
    pub slots: Vec<InputSlot>,
    pub warnings: Vec<DiscoveryWarning>,
}

type Scan = fn(&Sections, &mut Vec<DiscoveryWarning>) -> Vec<String>;

/// One discovery stage: which category it yields and how it finds element names.
pub struct InputStage {
    pub object_type: InputObjectType,
    scan: Scan,
}

/// Stages after ElapsedTime, in priority order.
pub const INPUT_STAGES: [InputStage; 5] = [
    InputStage {
        object_type: InputObjectType::Gage,
        scan: scan_rain_gages,
    },
    InputStage {
        object_type: InputObjectType::Pump,
        scan: scan_pumps,
    },
    InputStage {
        object_type: InputObjectType::Orifice,
        scan: scan_orifices,
    },
    InputStage {
        object_type: InputObjectType::Weir,
        scan: scan_weirs,
    },
    InputStage {
        object_type: InputObjectType::Node,
        scan: scan_node_inflows,
    },
];

/// Runs every stage in order, ElapsedTime first.
pub fn discover_inputs(sections: &Sections) -> InputDiscovery {
    let mut slots = vec![InputSlot::elapsed_time()];
    let mut warnings = Vec::new();

    for stage in &INPUT_STAGES {
        let found = (stage.scan)(sections, &mut warnings);
        debug!(object_type = %stage.object_type, count = found.len(), "input stage done");
        for name in found {
            slots.push_indexed(|index| InputSlot {
                name,
                object_type: stage.object_type,
                index,
            });
        }
    }

    for warning in &warnings {
        warn!("{}", warning);
    }
    InputDiscovery { slots, warnings }
}

/// First field of every row with at least `min_fields` fields that satisfies `keep`.
pub(crate) fn filtered_names<'a>(
    rows: &'a [Row],
    min_fields: usize,
    keep: impl Fn(&[String]) -> bool + 'a,
) -> impl Iterator<Item = &'a str> + 'a {
    rows.iter()
        .filter(move |row| row.len() >= min_fields.max(1) && keep(row.as_slice()))
        .map(|row| row[0].as_str())
}

fn owned<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names.map(str::to_string).collect()
}

/// `Name Format Interval SCF TIMESERIES DUMMY`
fn scan_rain_gages(sections: &Sections, _: &mut Vec<DiscoveryWarning>) -> Vec<String> {
    owned(filtered_names(
        sections.rows(names::RAINGAGES),
        6,
        |row| row[4] == "TIMESERIES" && row[5] == SENTINEL,
    ))
}

/// `Name FromNode ToNode DUMMY ...`
fn scan_pumps(sections: &Sections, _: &mut Vec<DiscoveryWarning>) -> Vec<String> {
    owned(filtered_names(sections.rows(names::PUMPS), 4, |row| {
        row[3] == SENTINEL
    }))
}

const ORIFICE_SECTIONS: &[&str] = &[names::ORIFICES];
const WEIR_SECTIONS: &[&str] = &[names::WEIRS];

fn scan_orifices(sections: &Sections, warnings: &mut Vec<DiscoveryWarning>) -> Vec<String> {
    controlled_links(
        sections,
        "ORIFICE",
        ORIFICE_SECTIONS,
        InputObjectType::Orifice,
        warnings,
    )
}

fn scan_weirs(sections: &Sections, warnings: &mut Vec<DiscoveryWarning>) -> Vec<String> {
    controlled_links(
        sections,
        "WEIR",
        WEIR_SECTIONS,
        InputObjectType::Weir,
        warnings,
    )
}

/// Links set from the sentinel in a control rule, e.g.
/// `THEN ORIFICE OR1 SETTING = CURVE DUMMY`. The link named after the first `keyword`
/// must be declared in `declared_in`; results follow that section's declaration order.
fn controlled_links(
    sections: &Sections,
    keyword: &str,
    declared_in: &'static [&'static str],
    object_type: InputObjectType,
    warnings: &mut Vec<DiscoveryWarning>,
) -> Vec<String> {
    let section = declared_in[0];
    let mut referenced: HashSet<&str> = HashSet::new();

    for row in sections.rows(names::CONTROLS) {
        if !row.iter().any(|t| t == SENTINEL) {
            continue;
        }
        let Some(pos) = row.iter().position(|t| t == keyword) else {
            continue;
        };
        let Some(name) = row.get(pos + 1) else {
            continue;
        };
        if sections.declares(section, name) {
            referenced.insert(name.as_str());
        } else {
            warnings.push(DiscoveryWarning::UnknownReference {
                object_type,
                name: name.clone(),
                expected_in: declared_in,
            });
        }
    }

    owned(filtered_names(sections.rows(section), 1, |row| {
        referenced.contains(row[0].as_str())
    }))
}

/// `Node Constituent Average Pat1 Pat2 Pat3 Pat4`; any pattern may be the sentinel.
/// A node is reported once, the first matching row wins.
fn scan_node_inflows(sections: &Sections, warnings: &mut Vec<DiscoveryWarning>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut nodes = Vec::new();

    for row in sections.rows(names::DWF) {
        if row.len() < 4 {
            continue;
        }
        let patterns = &row[3..row.len().min(7)];
        if !patterns.iter().any(|p| p == SENTINEL) {
            continue;
        }

        let node = row[0].as_str();
        let declared = NODE_SECTIONS
            .iter()
            .any(|section| sections.declares(section, node));
        if !declared {
            warnings.push(DiscoveryWarning::UnknownReference {
                object_type: InputObjectType::Node,
                name: node.to_string(),
                expected_in: &NODE_SECTIONS,
            });
        } else if seen.insert(node) {
            nodes.push(node.to_string());
        }
    }
    nodes
}
