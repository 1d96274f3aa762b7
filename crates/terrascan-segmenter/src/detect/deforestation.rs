//! Deforestation detector: cleared/bare-soil bands mark candidate regions,
//! the vegetation bands measure how much green cover is missing inside each
//! candidate's bounding box.

use terrascan_types::{ClassMetrics, Detection, PhenomenonClass, Severity};

use super::{profile, round2};
use crate::morphology;
use crate::planes::ImagePlanes;
use crate::regions::extract_regions;

const VEGETATION_PRIMARY: ([u8; 3], [u8; 3]) = ([35, 40, 40], [85, 255, 255]);
const VEGETATION_DRY: ([u8; 3], [u8; 3]) = ([25, 30, 30], [45, 255, 255]);
const BARE_SOIL: ([u8; 3], [u8; 3]) = ([8, 50, 20], [25, 255, 200]);
const CLEARED: ([u8; 3], [u8; 3]) = ([15, 30, 100], [30, 150, 255]);

const KERNEL: usize = 5;
const MIN_CONFIDENCE: f64 = 35.0;

pub(crate) fn detect(planes: &ImagePlanes) -> Vec<Detection> {
    let min_area = profile(PhenomenonClass::Deforestation).min_area;

    let vegetation = planes
        .in_range(VEGETATION_PRIMARY.0, VEGETATION_PRIMARY.1)
        .union(&planes.in_range(VEGETATION_DRY.0, VEGETATION_DRY.1));

    let cleared = planes
        .in_range(BARE_SOIL.0, BARE_SOIL.1)
        .union(&planes.in_range(CLEARED.0, CLEARED.1));
    let cleared = morphology::open(&morphology::close(&cleared, KERNEL), KERNEL);

    let mut detections = Vec::new();
    for region in extract_regions(&cleared) {
        if region.area <= min_area {
            continue;
        }

        let box_area = region.box_area() as f64;
        let coverage =
            cleared.count_in_box(region.x, region.y, region.width, region.height) as f64
                / box_area
                * 100.0;
        let vegetation_cover =
            vegetation.count_in_box(region.x, region.y, region.width, region.height) as f64
                / box_area
                * 100.0;
        let vegetation_loss = 100.0 - vegetation_cover;

        let confidence = (coverage * 0.4 + vegetation_loss * 0.4 + 20.0).clamp(30.0, 95.0);
        if confidence <= MIN_CONFIDENCE {
            continue;
        }

        let severity = if region.area > 10000 && vegetation_loss > 70.0 {
            Severity::Critical
        } else if region.area > 5000 && vegetation_loss > 50.0 {
            Severity::High
        } else if vegetation_loss > 30.0 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let (cx, cy) = region.center();
        detections.push(Detection {
            class: PhenomenonClass::Deforestation,
            confidence: round2(confidence),
            bbox: [
                region.x as u32,
                region.y as u32,
                region.width as u32,
                region.height as u32,
            ],
            area: region.area as u64,
            center: [cx as u32, cy as u32],
            severity,
            metrics: ClassMetrics::Deforestation {
                vegetation_loss: round2(vegetation_loss),
            },
        });
    }
    detections
}
