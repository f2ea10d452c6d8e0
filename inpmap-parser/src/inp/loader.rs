//! Model loading and the generate pipeline
//!
//! `ModelLoader` holds the raw text of a model, read from a file or given as a string, and
//! runs the stages over it: parse, validate, discover (or select), assemble. It is used by
//! the CLI and by tests alike.
//!
//! # Example
//!
//! ```rust,ignore
//! use inpmap_parser::inp::{GenerateOptions, ModelLoader};
//!
//! let loader = ModelLoader::from_path("model.inp")?;
//! let generation = loader.generate(&GenerateOptions::default())?;
//! generation.document.write_to("SwmmGoldSimBridge.json")?;
//! ```

use super::discovery::{
    discover_inputs, discover_outputs, select_inputs, select_outputs, DiscoveryWarning,
    InputDiscovery, SelectionError,
};
use super::fingerprint::{fingerprint, Fingerprint};
use super::mapping::InterfaceDocument;
use super::sections::{parse_sections, ParseError, Sections};
use super::validation::{validate, ValidationReport};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Model has {} validation error(s); generation aborted", .0.errors().count())]
    Blocked(ValidationReport),
}

/// What to do when validation reports an ERROR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop and return the report.
    #[default]
    Abort,
    /// Produce the document anyway; the report travels alongside it.
    Annotate,
}

/// Knobs for [`ModelLoader::generate`].
///
/// Non-empty `inputs` / `outputs` replace discovery with explicit selection of the named
/// elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub policy: ErrorPolicy,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl GenerateOptions {
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Everything a generate run produced.
#[derive(Debug, Clone)]
pub struct Generation {
    pub sections: Sections,
    pub report: ValidationReport,
    pub warnings: Vec<DiscoveryWarning>,
    pub document: InterfaceDocument,
}

pub struct ModelLoader {
    source: String,
}

impl ModelLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ModelLoader { source })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        ModelLoader {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parse(&self) -> Result<Sections, LoadError> {
        Ok(parse_sections(&self.source)?)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(&self.source)
    }

    /// Parse, validate and build the interface document.
    pub fn generate(&self, options: &GenerateOptions) -> Result<Generation, GenerateError> {
        let sections = self.parse()?;
        debug!(sections = sections.len(), "parsed model");

        let report = validate(&sections);
        if report.has_errors() && options.policy == ErrorPolicy::Abort {
            return Err(GenerateError::Blocked(report));
        }

        let (inputs, warnings) = if options.inputs.is_empty() {
            let InputDiscovery { slots, warnings } = discover_inputs(&sections);
            (slots, warnings)
        } else {
            (select_inputs(&sections, &options.inputs)?, Vec::new())
        };
        let outputs = if options.outputs.is_empty() {
            discover_outputs(&sections)
        } else {
            select_outputs(&sections, &options.outputs)?
        };
        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            "slots assigned"
        );

        let document = InterfaceDocument::assemble(&inputs, &outputs, &self.fingerprint());
        Ok(Generation {
            sections,
            report,
            warnings,
            document,
        })
    }
}
