//! Detector dispatch. Each phenomenon class owns one specialized pipeline
//! (bands → cleanup → regions → scoring); the general model runs all six and
//! unions their detections. All per-class constants that shape the aggregate
//! confidence live in one table here so the formulas cannot silently diverge.

use std::str::FromStr;

use terrascan_types::{Detection, PhenomenonClass, Raster, SegResult};

use crate::planes::ImagePlanes;

pub mod agriculture;
pub mod deforestation;
pub mod forest_fire;
pub mod mining;
pub mod urban;
pub mod water;

/// Per-class constants: the area gate and the aggregate-confidence curve.
pub struct ClassProfile {
    /// Regions at or below this pixel area are discarded before scoring.
    pub min_area: usize,
    pub aggregate: AggregateParams,
}

/// Saturating aggregate confidence: `min(cap, count * slope + base)`, or
/// `default_when_empty` for a run with no detections.
pub struct AggregateParams {
    pub slope: f64,
    pub base: f64,
    pub cap: f64,
    pub default_when_empty: f64,
}

pub fn profile(class: PhenomenonClass) -> &'static ClassProfile {
    match class {
        PhenomenonClass::Deforestation => &ClassProfile {
            min_area: 1000,
            aggregate: AggregateParams { slope: 15.0, base: 45.0, cap: 90.0, default_when_empty: 25.0 },
        },
        PhenomenonClass::Mining => &ClassProfile {
            min_area: 2000,
            aggregate: AggregateParams { slope: 20.0, base: 40.0, cap: 85.0, default_when_empty: 30.0 },
        },
        PhenomenonClass::ForestFire => &ClassProfile {
            min_area: 500,
            aggregate: AggregateParams { slope: 25.0, base: 35.0, cap: 90.0, default_when_empty: 20.0 },
        },
        PhenomenonClass::Agriculture => &ClassProfile {
            min_area: 1500,
            aggregate: AggregateParams { slope: 12.0, base: 30.0, cap: 75.0, default_when_empty: 20.0 },
        },
        PhenomenonClass::UrbanExpansion => &ClassProfile {
            min_area: 2500,
            aggregate: AggregateParams { slope: 18.0, base: 25.0, cap: 70.0, default_when_empty: 15.0 },
        },
        PhenomenonClass::WaterBody => &ClassProfile {
            min_area: 1000,
            aggregate: AggregateParams { slope: 25.0, base: 30.0, cap: 80.0, default_when_empty: 20.0 },
        },
    }
}

const GENERAL_SLOPE: f64 = 8.0;
const GENERAL_BASE: f64 = 50.0;
const GENERAL_CAP: f64 = 90.0;
const GENERAL_DEFAULT: f64 = 35.0;

/// The requested detector: one class pipeline, or the union of all six.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorModel {
    Class(PhenomenonClass),
    General,
}

impl DetectorModel {
    /// Resolve a request-side model name. Unknown names fall back to the
    /// general model, matching the platform's historical dispatch.
    pub fn parse(name: &str) -> Self {
        if name == "general" {
            return DetectorModel::General;
        }
        match PhenomenonClass::from_str(name) {
            Ok(class) => DetectorModel::Class(class),
            Err(_) => DetectorModel::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorModel::Class(class) => class.as_str(),
            DetectorModel::General => "general",
        }
    }
}

/// Aggregate output of one detector run over one raster.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationOutcome {
    pub detections: Vec<Detection>,
    pub confidence: f64,
}

/// Run the requested detector over the raster.
pub fn segment(raster: &Raster, model: DetectorModel) -> SegResult<SegmentationOutcome> {
    let planes = ImagePlanes::new(raster);
    Ok(match model {
        DetectorModel::Class(class) => {
            let detections = detect_class(class, &planes);
            let confidence = aggregate_confidence(class, detections.len());
            SegmentationOutcome {
                detections,
                confidence,
            }
        }
        DetectorModel::General => {
            let mut detections = Vec::new();
            for class in PhenomenonClass::ALL {
                detections.extend(detect_class(class, &planes));
            }
            let confidence = general_confidence(detections.len());
            SegmentationOutcome {
                detections,
                confidence,
            }
        }
    })
}

fn detect_class(class: PhenomenonClass, planes: &ImagePlanes) -> Vec<Detection> {
    match class {
        PhenomenonClass::Deforestation => deforestation::detect(planes),
        PhenomenonClass::Mining => mining::detect(planes),
        PhenomenonClass::ForestFire => forest_fire::detect(planes),
        PhenomenonClass::Agriculture => agriculture::detect(planes),
        PhenomenonClass::UrbanExpansion => urban::detect(planes),
        PhenomenonClass::WaterBody => water::detect(planes),
    }
}

pub fn aggregate_confidence(class: PhenomenonClass, count: usize) -> f64 {
    let params = &profile(class).aggregate;
    if count == 0 {
        params.default_when_empty
    } else {
        (count as f64 * params.slope + params.base).min(params.cap)
    }
}

pub fn general_confidence(count: usize) -> f64 {
    if count == 0 {
        GENERAL_DEFAULT
    } else {
        (count as f64 * GENERAL_SLOPE + GENERAL_BASE).min(GENERAL_CAP)
    }
}

/// Round to two decimals, the precision detections carry on the wire.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
