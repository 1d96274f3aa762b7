//! Agriculture detector: a single broad crop-green band. Cultivated fields
//! are benign, so every accepted region carries the same fixed confidence
//! and severity.

use terrascan_types::{ClassMetrics, Detection, PhenomenonClass, Severity};

use super::profile;
use crate::planes::ImagePlanes;
use crate::regions::extract_regions;

const CROP_GREEN: ([u8; 3], [u8; 3]) = ([25, 30, 30], [95, 255, 255]);

const CONFIDENCE: f64 = 60.0;

pub(crate) fn detect(planes: &ImagePlanes) -> Vec<Detection> {
    let min_area = profile(PhenomenonClass::Agriculture).min_area;
    let crops = planes.in_range(CROP_GREEN.0, CROP_GREEN.1);

    let mut detections = Vec::new();
    for region in extract_regions(&crops) {
        if region.area <= min_area {
            continue;
        }
        let (cx, cy) = region.center();
        detections.push(Detection {
            class: PhenomenonClass::Agriculture,
            confidence: CONFIDENCE,
            bbox: [
                region.x as u32,
                region.y as u32,
                region.width as u32,
                region.height as u32,
            ],
            area: region.area as u64,
            center: [cx as u32, cy as u32],
            severity: Severity::Low,
            metrics: ClassMetrics::None {},
        });
    }
    detections
}
