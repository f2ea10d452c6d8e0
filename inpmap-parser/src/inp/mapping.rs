//! Interface Document
//!
//!     The JSON file handed to the bridge. It lists every input and output slot with the
//!     property the bridge reads or writes for it, plus the fingerprint of the model the
//!     slots were discovered in.
//!
//!     Key names are fixed by the bridge's loader: the fingerprint travels as
//!     `inp_file_hash` and the engine index placeholder as `swmm_index`.
//!
//! Reloading
//!
//!     [`InterfaceDocument::from_json`] applies the same checks the bridge does before it
//!     trusts a document: known version, counts matching the lists, indices contiguous
//!     from 0. [`InterfaceDocument::freshness`] then tells whether the document still
//!     describes the model it sits next to.

use super::discovery::{InputObjectType, InputSlot, OutputObjectType, OutputSlot, ValueKind};
use super::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Document format version written and accepted.
pub const FORMAT_VERSION: &str = "1.0";

/// What the bridge reads or sets on a slot's element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Property {
    #[serde(rename = "ELAPSEDTIME")]
    ElapsedTime,
    Rainfall,
    Setting,
    #[serde(rename = "LATFLOW")]
    LatFlow,
    Volume,
    Flow,
    Runoff,
    Inflow,
    #[serde(other)]
    Unknown,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Property::ElapsedTime => "ELAPSEDTIME",
            Property::Rainfall => "RAINFALL",
            Property::Setting => "SETTING",
            Property::LatFlow => "LATFLOW",
            Property::Volume => "VOLUME",
            Property::Flow => "FLOW",
            Property::Runoff => "RUNOFF",
            Property::Inflow => "INFLOW",
            Property::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<InputObjectType> for Property {
    fn from(object_type: InputObjectType) -> Self {
        match object_type {
            InputObjectType::System => Property::ElapsedTime,
            InputObjectType::Gage => Property::Rainfall,
            InputObjectType::Pump | InputObjectType::Orifice | InputObjectType::Weir => {
                Property::Setting
            }
            InputObjectType::Node => Property::LatFlow,
            InputObjectType::Unknown => Property::Unknown,
        }
    }
}

impl From<ValueKind> for Property {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Volume => Property::Volume,
            ValueKind::Flow => Property::Flow,
            ValueKind::Runoff => Property::Runoff,
            ValueKind::Inflow => Property::Inflow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEntry {
    pub index: usize,
    pub name: String,
    pub object_type: InputObjectType,
    pub property: Property,
}

impl From<&InputSlot> for InputEntry {
    fn from(slot: &InputSlot) -> Self {
        InputEntry {
            index: slot.index,
            name: slot.name.clone(),
            object_type: slot.object_type,
            property: slot.object_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntry {
    pub index: usize,
    pub name: String,
    pub object_type: OutputObjectType,
    pub property: Property,
    /// Resolved by the bridge at run time; always written as 0.
    #[serde(rename = "swmm_index")]
    pub engine_index: usize,
}

impl From<&OutputSlot> for OutputEntry {
    fn from(slot: &OutputSlot) -> Self {
        let property = match slot.object_type {
            OutputObjectType::Unknown => Property::Unknown,
            _ => slot.value_kind.into(),
        };
        OutputEntry {
            index: slot.index,
            name: slot.name.clone(),
            object_type: slot.object_type,
            property,
            engine_index: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported mapping version '{found}', expected '1.0'")]
    UnsupportedVersion { found: String },

    #[error("{list}_count is {declared} but {actual} entries are listed")]
    CountMismatch {
        list: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("{list} entry at position {position} has index {found}")]
    IndexGap {
        list: &'static str,
        position: usize,
        found: usize,
    },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Whether a document still matches the model it was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

impl Freshness {
    pub fn is_fresh(self) -> bool {
        self == Freshness::Fresh
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDocument {
    pub version: String,
    #[serde(rename = "inp_file_hash")]
    pub content_fingerprint: String,
    pub input_count: usize,
    pub output_count: usize,
    pub inputs: Vec<InputEntry>,
    pub outputs: Vec<OutputEntry>,
}

impl InterfaceDocument {
    pub fn assemble(
        inputs: &[InputSlot],
        outputs: &[OutputSlot],
        fingerprint: &Fingerprint,
    ) -> Self {
        InterfaceDocument {
            version: FORMAT_VERSION.to_string(),
            content_fingerprint: fingerprint.to_string(),
            input_count: inputs.len(),
            output_count: outputs.len(),
            inputs: inputs.iter().map(InputEntry::from).collect(),
            outputs: outputs.iter().map(OutputEntry::from).collect(),
        }
    }

    /// Pretty JSON with two-space indentation and no trailing newline.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: InterfaceDocument = serde_json::from_str(json)?;
        document.verify()?;
        Ok(document)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks version, counts and index contiguity.
    pub fn verify(&self) -> Result<(), DocumentError> {
        if self.version != FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.version.clone(),
            });
        }
        check_count("input", self.input_count, self.inputs.len())?;
        check_count("output", self.output_count, self.outputs.len())?;
        check_contiguous("input", self.inputs.iter().map(|e| e.index))?;
        check_contiguous("output", self.outputs.iter().map(|e| e.index))?;
        Ok(())
    }

    pub fn freshness(&self, current: &Fingerprint) -> Freshness {
        if self.content_fingerprint == current.as_str() {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

fn check_count(list: &'static str, declared: usize, actual: usize) -> Result<(), DocumentError> {
    if declared == actual {
        Ok(())
    } else {
        Err(DocumentError::CountMismatch {
            list,
            declared,
            actual,
        })
    }
}

fn check_contiguous(
    list: &'static str,
    indices: impl Iterator<Item = usize>,
) -> Result<(), DocumentError> {
    for (position, found) in indices.enumerate() {
        if position != found {
            return Err(DocumentError::IndexGap {
                list,
                position,
                found,
            });
        }
    }
    Ok(())
}
