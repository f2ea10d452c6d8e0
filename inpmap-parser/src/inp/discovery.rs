//! Slot Discovery
//!
//!     Decides which model elements become interface slots and assigns their indices.
//!     Two independent index spaces exist: inputs (values driven into SWMM) and outputs
//!     (values read back out).
//!
//! Inputs
//!
//!     Input discovery is sentinel-driven. An element is a dynamic input only when the
//!     model wires it to the literal token `DUMMY`, meaning "overridden at run time".
//!     Stages run in a fixed priority order, see [`inputs::INPUT_STAGES`]:
//!         0. ElapsedTime, always index 0
//!         1. rain gages fed by a `DUMMY` time series
//!         2. pumps on a `DUMMY` curve
//!         3. orifices set from a `DUMMY` curve in a control rule
//!         4. weirs, same as orifices
//!         5. nodes with a `DUMMY` dry-weather-flow pattern
//!
//! Outputs
//!
//!     Output discovery is exhaustive: every storage node, outfall, orifice, weir and
//!     subcatchment becomes a slot, in that category order, file order within each.
//!
//! Explicit Selection
//!
//!     Callers that already know which elements they want can name them instead, see
//!     [`selection`]. Types are detected from the section that declares each name.
//!
//!     Discovery never fails. Short rows and missing sections produce fewer slots,
//!     references to undeclared elements produce a [`DiscoveryWarning`].

pub mod inputs;
pub mod outputs;
pub mod selection;
pub mod slots;

pub use inputs::{discover_inputs, DiscoveryWarning, InputDiscovery};
pub use outputs::discover_outputs;
pub use selection::{select_inputs, select_outputs, SelectionError};
pub use slots::{InputObjectType, InputSlot, OutputObjectType, OutputSlot, ValueKind};

use super::sections::Sections;

/// Token marking a value as driven externally. Matched exactly, case-sensitive.
pub const SENTINEL: &str = "DUMMY";

/// Name of the pseudo-element that always occupies input index 0.
pub const ELAPSED_TIME: &str = "ElapsedTime";

/// Both slot lists plus the warnings raised while finding the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub inputs: Vec<InputSlot>,
    pub outputs: Vec<OutputSlot>,
    pub warnings: Vec<DiscoveryWarning>,
}

/// Runs sentinel input discovery and exhaustive output discovery.
pub fn discover(sections: &Sections) -> Discovery {
    let InputDiscovery { slots, warnings } = discover_inputs(sections);
    Discovery {
        inputs: slots,
        outputs: discover_outputs(sections),
        warnings,
    }
}
