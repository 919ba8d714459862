//! Generation-and-render pipeline
//!
//! Requirements run in three stages: extraction (description -> JSON
//! requirements), markup synthesis (requirements -> mermaid) and rendering
//! (mermaid -> image via mermaid.ink). The design generator is a single
//! extraction-style stage.

mod artifact;
mod design;
mod error;
mod markup;
mod prompts;
mod render;
mod requirements;
mod stage;

pub use artifact::RequirementsArtifact;
pub use design::{DesignGenerator, DesignReport};
pub use error::{PipelineError, PipelineResult, Stage};
pub use markup::{encode_markup, extract_mermaid};
pub use render::MermaidInkRenderer;
pub use requirements::{RequirementsPipeline, RequirementsReport};
pub use stage::StageModel;

#[cfg(test)]
pub(crate) use render::stub;
