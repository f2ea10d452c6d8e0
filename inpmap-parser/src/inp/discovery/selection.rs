//! Explicit slot selection
//!
//! Instead of marking elements with the sentinel, a caller may list the elements to expose.
//! Each name is looked up in a fixed sequence of sections and takes the category of the
//! first section that declares it.

use super::slots::{IndexedPush, InputObjectType, InputSlot, OutputObjectType, OutputSlot};
use crate::inp::sections::{names, Sections};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Input element '{0}' not found in model")]
    InputNotFound(String),

    #[error("Output element '{0}' not found in model")]
    OutputNotFound(String),

    #[error("Element '{0}' selected more than once")]
    Duplicate(String),
}

const INPUT_LOOKUP: [(&str, InputObjectType); 6] = [
    (names::RAINGAGES, InputObjectType::Gage),
    (names::PUMPS, InputObjectType::Pump),
    (names::ORIFICES, InputObjectType::Orifice),
    (names::WEIRS, InputObjectType::Weir),
    (names::JUNCTIONS, InputObjectType::Node),
    (names::STORAGE, InputObjectType::Node),
];

const OUTPUT_LOOKUP: [(&str, OutputObjectType); 8] = [
    (names::SUBCATCHMENTS, OutputObjectType::Subcatch),
    (names::STORAGE, OutputObjectType::Storage),
    (names::JUNCTIONS, OutputObjectType::Junction),
    (names::OUTFALLS, OutputObjectType::Outfall),
    (names::PUMPS, OutputObjectType::Pump),
    (names::ORIFICES, OutputObjectType::Orifice),
    (names::WEIRS, OutputObjectType::Weir),
    (names::CONDUITS, OutputObjectType::Conduit),
];

fn lookup<T: Copy>(sections: &Sections, table: &[(&str, T)], name: &str) -> Option<T> {
    table
        .iter()
        .find(|(section, _)| sections.declares(section, name))
        .map(|&(_, ty)| ty)
}

fn ensure_unique<'a>(seen: &mut HashSet<&'a str>, name: &'a str) -> Result<(), SelectionError> {
    if seen.insert(name) {
        Ok(())
    } else {
        Err(SelectionError::Duplicate(name.to_string()))
    }
}

/// ElapsedTime followed by `requested`, in the given order.
pub fn select_inputs<S: AsRef<str>>(
    sections: &Sections,
    requested: &[S],
) -> Result<Vec<InputSlot>, SelectionError> {
    let mut slots = vec![InputSlot::elapsed_time()];
    let mut seen = HashSet::new();

    for name in requested.iter().map(|s| s.as_ref().trim()) {
        ensure_unique(&mut seen, name)?;
        let object_type = lookup(sections, &INPUT_LOOKUP, name)
            .ok_or_else(|| SelectionError::InputNotFound(name.to_string()))?;
        slots.push_indexed(|index| InputSlot {
            name: name.to_string(),
            object_type,
            index,
        });
    }
    Ok(slots)
}

/// Output slots for `requested`, in the given order.
pub fn select_outputs<S: AsRef<str>>(
    sections: &Sections,
    requested: &[S],
) -> Result<Vec<OutputSlot>, SelectionError> {
    let mut slots = Vec::new();
    let mut seen = HashSet::new();

    for name in requested.iter().map(|s| s.as_ref().trim()) {
        ensure_unique(&mut seen, name)?;
        let (object_type, value_kind) = lookup(sections, &OUTPUT_LOOKUP, name)
            .and_then(|ty| ty.value_kind().map(|kind| (ty, kind)))
            .ok_or_else(|| SelectionError::OutputNotFound(name.to_string()))?;
        slots.push_indexed(|index| OutputSlot {
            name: name.to_string(),
            object_type,
            value_kind,
            index,
        });
    }
    Ok(slots)
}
