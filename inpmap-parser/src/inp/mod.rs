//! Main module for inp interface discovery

pub mod discovery;
pub mod fingerprint;
pub mod loader;
pub mod mapping;
pub mod sections;
pub mod validation;

pub use discovery::{
    discover, discover_inputs, discover_outputs, select_inputs, select_outputs, Discovery,
    DiscoveryWarning, InputDiscovery, InputObjectType, InputSlot, OutputObjectType, OutputSlot,
    SelectionError, ValueKind, SENTINEL,
};
pub use fingerprint::{canonicalize, fingerprint, Fingerprint};
pub use loader::{ErrorPolicy, GenerateError, GenerateOptions, Generation, LoadError, ModelLoader};
pub use mapping::{
    DocumentError, Freshness, InputEntry, InterfaceDocument, OutputEntry, Property, FORMAT_VERSION,
};
pub use sections::{parse_sections, ParseError, Row, Section, Sections};
pub use validation::{validate, Issue, IssueKind, Severity, ValidationReport};
