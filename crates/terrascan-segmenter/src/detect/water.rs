//! Water-body detector: one blue hue band, fixed score.

use terrascan_types::{ClassMetrics, Detection, PhenomenonClass, Severity};

use super::profile;
use crate::planes::ImagePlanes;
use crate::regions::extract_regions;

const WATER_BLUE: ([u8; 3], [u8; 3]) = ([100, 50, 50], [130, 255, 255]);

const CONFIDENCE: f64 = 75.0;

pub(crate) fn detect(planes: &ImagePlanes) -> Vec<Detection> {
    let min_area = profile(PhenomenonClass::WaterBody).min_area;
    let water = planes.in_range(WATER_BLUE.0, WATER_BLUE.1);

    let mut detections = Vec::new();
    for region in extract_regions(&water) {
        if region.area <= min_area {
            continue;
        }
        let (cx, cy) = region.center();
        detections.push(Detection {
            class: PhenomenonClass::WaterBody,
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
