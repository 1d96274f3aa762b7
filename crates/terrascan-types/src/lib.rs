//! Shared domain models for the terrascan workspace.
//!
//! This crate centralizes lightweight data structures used across the
//! segmentation engine and the CLI. Keep it backend-agnostic and avoid heavy
//! dependencies so every crate can depend on it without pulling image codecs
//! or async runtimes.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

pub type SegResult<T> = Result<T, SegmentationError>;

/// Immutable RGB8 raster, row-major, three bytes per pixel.
///
/// Owned by the orchestrator for the duration of one run; every downstream
/// stage reads it through a shared reference or a cheap clone.
#[derive(Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Raster {
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> SegResult<Self> {
        if width == 0 || height == 0 {
            return Err(SegmentationError::invalid_input("zero-sized raster"));
        }
        let required = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| {
                SegmentationError::invalid_input("calculated raster length overflowed")
            })?;
        if data.len() < required {
            return Err(SegmentationError::invalid_input(format!(
                "insufficient pixel data: got {} bytes expected at least {}",
                data.len(),
                required
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y); callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// The six phenomenon classes the engine can segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhenomenonClass {
    Deforestation,
    Mining,
    ForestFire,
    Agriculture,
    UrbanExpansion,
    WaterBody,
}

impl PhenomenonClass {
    pub const ALL: [PhenomenonClass; 6] = [
        PhenomenonClass::Deforestation,
        PhenomenonClass::Mining,
        PhenomenonClass::ForestFire,
        PhenomenonClass::Agriculture,
        PhenomenonClass::UrbanExpansion,
        PhenomenonClass::WaterBody,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhenomenonClass::Deforestation => "deforestation",
            PhenomenonClass::Mining => "mining",
            PhenomenonClass::ForestFire => "forest_fire",
            PhenomenonClass::Agriculture => "agriculture",
            PhenomenonClass::UrbanExpansion => "urban_expansion",
            PhenomenonClass::WaterBody => "water_body",
        }
    }
}

impl FromStr for PhenomenonClass {
    type Err = SegmentationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        // "urban" and "water" are the request-side aliases used by the
        // calling platform; the canonical names are what detections carry.
        match name {
            "deforestation" => Ok(PhenomenonClass::Deforestation),
            "mining" => Ok(PhenomenonClass::Mining),
            "forest_fire" => Ok(PhenomenonClass::ForestFire),
            "agriculture" => Ok(PhenomenonClass::Agriculture),
            "urban" | "urban_expansion" => Ok(PhenomenonClass::UrbanExpansion),
            "water" | "water_body" => Ok(PhenomenonClass::WaterBody),
            other => Err(SegmentationError::UnsupportedClass {
                class: other.to_string(),
            }),
        }
    }
}

/// Ordinal risk bucket assigned per class-specific rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FireType {
    ActiveFire,
    Smoke,
    BurnedArea,
    FireRisk,
}

/// Class-specific measurements attached to a detection. Serialized flattened
/// into the detection object, so each class contributes its own extra keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassMetrics {
    Deforestation {
        vegetation_loss: f64,
    },
    Mining {
        aspect_ratio: f64,
        edge_density: f64,
    },
    ForestFire {
        fire_type: FireType,
        active_fire_ratio: f64,
        smoke_ratio: f64,
        burned_ratio: f64,
    },
    None {},
}

/// One scored, classified, located finding. Immutable once created; the
/// confidence and severity are deterministic functions of the measured
/// ratios for the region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class: PhenomenonClass,
    pub confidence: f64,
    /// Bounding box as [x, y, width, height] in pixel coordinates.
    pub bbox: [u32; 4],
    /// Pixel area of the connected region (member pixel count).
    pub area: u64,
    /// Bounding-box center, the convention downstream consumers expect.
    pub center: [u32; 2],
    pub severity: Severity,
    #[serde(flatten)]
    pub metrics: ClassMetrics,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// The full wire-shape result of one segmentation run, including the failure
/// form the caller expects on any error.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub detections: Vec<Detection>,
    pub confidence: f64,
    pub processing_time: f64,
    pub image_size: ImageSize,
    pub model_used: String,
    #[serde(rename = "resultImagePath")]
    pub result_image_path: String,
}

impl SegmentationReport {
    /// The all-zero failure shape: same keys, empty detections, exit-worthy.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            detections: Vec::new(),
            confidence: 0.0,
            processing_time: 0.0,
            image_size: ImageSize::default(),
            model_used: "error".to_string(),
            result_image_path: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("could not load image from {path}: {message}")]
    ImageLoad { path: PathBuf, message: String },

    #[error("no detector pipeline registered for class '{class}'")]
    UnsupportedClass { class: String },

    #[error("could not write result image to {path}: {message}")]
    OutputWrite { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SegmentationError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn image_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ImageLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn output_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OutputWrite {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_rejects_zero_size() {
        assert!(matches!(
            Raster::from_rgb8(0, 10, vec![]),
            Err(SegmentationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn raster_rejects_short_buffer() {
        assert!(matches!(
            Raster::from_rgb8(4, 4, vec![0u8; 4 * 4 * 3 - 1]),
            Err(SegmentationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn raster_pixel_access() {
        let mut data = vec![0u8; 2 * 2 * 3];
        data[(1 * 2 + 1) * 3..(1 * 2 + 1) * 3 + 3].copy_from_slice(&[9, 8, 7]);
        let raster = Raster::from_rgb8(2, 2, data).unwrap();
        assert_eq!(raster.pixel(1, 1), [9, 8, 7]);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn class_names_round_trip() {
        for class in PhenomenonClass::ALL {
            assert_eq!(class.as_str().parse::<PhenomenonClass>().unwrap(), class);
        }
    }

    #[test]
    fn class_aliases_resolve() {
        assert_eq!(
            "urban".parse::<PhenomenonClass>().unwrap(),
            PhenomenonClass::UrbanExpansion
        );
        assert_eq!(
            "water".parse::<PhenomenonClass>().unwrap(),
            PhenomenonClass::WaterBody
        );
        assert!(matches!(
            "glacier".parse::<PhenomenonClass>(),
            Err(SegmentationError::UnsupportedClass { .. })
        ));
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn detection_serializes_flattened_metrics() {
        let detection = Detection {
            class: PhenomenonClass::Mining,
            confidence: 75.0,
            bbox: [10, 20, 30, 40],
            area: 1200,
            center: [25, 40],
            severity: Severity::Medium,
            metrics: ClassMetrics::Mining {
                aspect_ratio: 0.75,
                edge_density: 0.123,
            },
        };
        let json = serde_json::to_value(&detection).unwrap();
        assert_eq!(json["class"], "mining");
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["aspect_ratio"], 0.75);
        assert_eq!(json["edge_density"], 0.123);
        assert_eq!(json["bbox"], serde_json::json!([10, 20, 30, 40]));
    }

    #[test]
    fn plain_metrics_add_no_keys() {
        let detection = Detection {
            class: PhenomenonClass::WaterBody,
            confidence: 75.0,
            bbox: [0, 0, 10, 10],
            area: 100,
            center: [5, 5],
            severity: Severity::Low,
            metrics: ClassMetrics::None {},
        };
        let json = serde_json::to_value(&detection).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            ["area", "bbox", "center", "class", "confidence", "severity"]
        );
    }

    #[test]
    fn failure_report_shape() {
        let report = SegmentationReport::failure("boom");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["model_used"], "error");
        assert_eq!(json["confidence"], 0.0);
        assert_eq!(json["resultImagePath"], "");
        assert!(json["detections"].as_array().unwrap().is_empty());
    }
}
