//! Multi-detector segmentation engine for aerial rasters.
//!
//! The pipeline is a strict top-down dataflow: raster → color planes → band
//! masks → cleaned masks → connected regions → scored detections. Every stage
//! is a pure transform that allocates fresh buffers, so concurrent runs over
//! different images never share mutable state.

pub mod detect;
pub mod mask;
pub mod morphology;
pub mod planes;
pub mod regions;

pub use detect::{aggregate_confidence, segment, DetectorModel, SegmentationOutcome};
pub use mask::Mask;
pub use planes::ImagePlanes;
pub use regions::Region;
