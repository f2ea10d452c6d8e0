//! # inpmap-parser
//!
//! Interface discovery for SWMM `.inp` model files.
//!
//! The crate reads a model description, checks it for structural problems, decides which
//! elements become dynamic interface slots and in what order, and emits the declarative
//! mapping document consumed by the GoldSim bridge at run time.
//!
//! File Layout
//!
//!     src/inp
//!       ├── sections      Section parser (text -> Section Table)
//!       ├── validation    Structural checks over a parsed table
//!       ├── fingerprint   Canonical content hash
//!       ├── discovery     Input / output slot discovery and explicit selection
//!       ├── mapping       Interface document assembly, rendering and reloading
//!       └── loader        File loading and the generation pipeline
//!
//! Every stage below the loader is a pure function of its input; only the loader and
//! [`InterfaceDocument::write_to`](inp::mapping::InterfaceDocument::write_to) touch the
//! filesystem.

pub mod inp;
