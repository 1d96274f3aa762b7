//! Urban-expansion detector. Built-up areas are not a color: the signal is
//! texture density, the thresholded Laplacian response of the intensity
//! plane.

use terrascan_types::{ClassMetrics, Detection, PhenomenonClass, Severity};

use super::profile;
use crate::planes::ImagePlanes;
use crate::regions::extract_regions;

const EDGE_CUTOFF: i32 = 30;
const CONFIDENCE: f64 = 70.0;

pub(crate) fn detect(planes: &ImagePlanes) -> Vec<Detection> {
    let min_area = profile(PhenomenonClass::UrbanExpansion).min_area;
    let texture = planes.edge_mask(EDGE_CUTOFF);

    let mut detections = Vec::new();
    for region in extract_regions(&texture) {
        if region.area <= min_area {
            continue;
        }
        let (cx, cy) = region.center();
        detections.push(Detection {
            class: PhenomenonClass::UrbanExpansion,
            confidence: CONFIDENCE,
            bbox: [
                region.x as u32,
                region.y as u32,
                region.width as u32,
                region.height as u32,
            ],
            area: region.area as u64,
            center: [cx as u32, cy as u32],
            severity: Severity::Medium,
            metrics: ClassMetrics::None {},
        });
    }
    detections
}
