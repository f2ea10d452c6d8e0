//! Exhaustive output discovery

use super::inputs::filtered_names;
use super::slots::{IndexedPush, OutputObjectType, OutputSlot, ValueKind};
use crate::inp::sections::{names, Sections};

/// One output category: where its elements are declared and what they report.
#[derive(Debug, Clone, Copy)]
pub struct OutputStage {
    pub section: &'static str,
    pub object_type: OutputObjectType,
    pub value_kind: ValueKind,
}

/// Output categories in priority order.
pub const OUTPUT_STAGES: [OutputStage; 5] = [
    OutputStage {
        section: names::STORAGE,
        object_type: OutputObjectType::Storage,
        value_kind: ValueKind::Volume,
    },
    OutputStage {
        section: names::OUTFALLS,
        object_type: OutputObjectType::Outfall,
        value_kind: ValueKind::Flow,
    },
    OutputStage {
        section: names::ORIFICES,
        object_type: OutputObjectType::Orifice,
        value_kind: ValueKind::Flow,
    },
    OutputStage {
        section: names::WEIRS,
        object_type: OutputObjectType::Weir,
        value_kind: ValueKind::Flow,
    },
    OutputStage {
        section: names::SUBCATCHMENTS,
        object_type: OutputObjectType::Subcatch,
        value_kind: ValueKind::Runoff,
    },
];

/// Every declared element of every output category, in category then file order.
pub fn discover_outputs(sections: &Sections) -> Vec<OutputSlot> {
    let mut slots = Vec::new();
    for stage in &OUTPUT_STAGES {
        for name in filtered_names(sections.rows(stage.section), 1, |_| true) {
            slots.push_indexed(|index| OutputSlot {
                name: name.to_string(),
                object_type: stage.object_type,
                value_kind: stage.value_kind,
                index,
            });
        }
    }
    slots
}
