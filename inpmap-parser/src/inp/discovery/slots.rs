//! Slot types and element categories

use super::ELAPSED_TIME;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputObjectType {
    System,
    Gage,
    Pump,
    Orifice,
    Weir,
    Node,
    /// Tag not known to this version; only produced when reading a document.
    #[serde(other)]
    Unknown,
}

impl InputObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputObjectType::System => "SYSTEM",
            InputObjectType::Gage => "GAGE",
            InputObjectType::Pump => "PUMP",
            InputObjectType::Orifice => "ORIFICE",
            InputObjectType::Weir => "WEIR",
            InputObjectType::Node => "NODE",
            InputObjectType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for InputObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputObjectType {
    Storage,
    Outfall,
    Orifice,
    Weir,
    Subcatch,
    Junction,
    Pump,
    Conduit,
    #[serde(other)]
    Unknown,
}

impl OutputObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputObjectType::Storage => "STORAGE",
            OutputObjectType::Outfall => "OUTFALL",
            OutputObjectType::Orifice => "ORIFICE",
            OutputObjectType::Weir => "WEIR",
            OutputObjectType::Subcatch => "SUBCATCH",
            OutputObjectType::Junction => "JUNCTION",
            OutputObjectType::Pump => "PUMP",
            OutputObjectType::Conduit => "CONDUIT",
            OutputObjectType::Unknown => "UNKNOWN",
        }
    }

    /// The value reported for this category, `None` for unknown tags.
    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            OutputObjectType::Storage => Some(ValueKind::Volume),
            OutputObjectType::Subcatch => Some(ValueKind::Runoff),
            OutputObjectType::Junction => Some(ValueKind::Inflow),
            OutputObjectType::Outfall
            | OutputObjectType::Orifice
            | OutputObjectType::Weir
            | OutputObjectType::Pump
            | OutputObjectType::Conduit => Some(ValueKind::Flow),
            OutputObjectType::Unknown => None,
        }
    }
}

impl fmt::Display for OutputObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantity an output slot reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    Volume,
    Flow,
    Runoff,
    Inflow,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Volume => "VOLUME",
            ValueKind::Flow => "FLOW",
            ValueKind::Runoff => "RUNOFF",
            ValueKind::Inflow => "INFLOW",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSlot {
    pub name: String,
    pub object_type: InputObjectType,
    pub index: usize,
}

impl InputSlot {
    /// The elapsed-time pseudo-element at index 0.
    pub fn elapsed_time() -> Self {
        Self {
            name: ELAPSED_TIME.to_string(),
            object_type: InputObjectType::System,
            index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlot {
    pub name: String,
    pub object_type: OutputObjectType,
    pub value_kind: ValueKind,
    pub index: usize,
}

/// Appends a slot at the next free index, keeping indices contiguous from 0.
pub(crate) trait IndexedPush<T> {
    fn push_indexed(&mut self, make: impl FnOnce(usize) -> T);
}

impl<T> IndexedPush<T> for Vec<T> {
    fn push_indexed(&mut self, make: impl FnOnce(usize) -> T) {
        let index = self.len();
        self.push(make(index));
    }
}
