//! Mining detector: exposed rock, metallic surfaces and disturbed earth form
//! the candidate mask; geometric regularity and edge density inside each
//! candidate raise its score, since pits and equipment yards are far more
//! structured than natural terrain.

use terrascan_types::{ClassMetrics, Detection, PhenomenonClass, Severity};

use super::{profile, round2, round3};
use crate::morphology;
use crate::planes::ImagePlanes;
use crate::regions::extract_regions;

const ROCK: ([u8; 3], [u8; 3]) = ([0, 0, 80], [30, 80, 255]);
const METAL: ([u8; 3], [u8; 3]) = ([0, 0, 150], [180, 50, 255]);
const DISTURBED_EARTH: ([u8; 3], [u8; 3]) = ([5, 100, 50], [20, 255, 200]);

const KERNEL: usize = 7;
const EDGE_CUTOFF: i32 = 30;
const MIN_CONFIDENCE: f64 = 60.0;

pub(crate) fn detect(planes: &ImagePlanes) -> Vec<Detection> {
    let min_area = profile(PhenomenonClass::Mining).min_area;

    let mining = planes
        .in_range(ROCK.0, ROCK.1)
        .union(&planes.in_range(METAL.0, METAL.1))
        .union(&planes.in_range(DISTURBED_EARTH.0, DISTURBED_EARTH.1));
    let mining = morphology::close(&mining, KERNEL);

    let edges = planes.edge_mask(EDGE_CUTOFF);

    let mut detections = Vec::new();
    for region in extract_regions(&mining) {
        if region.area <= min_area {
            continue;
        }

        let box_area = region.box_area() as f64;
        let aspect_ratio = region.width as f64 / region.height as f64;
        let extent = region.area as f64 / box_area;
        let edge_density =
            edges.count_in_box(region.x, region.y, region.width, region.height) as f64 / box_area;

        let mut confidence: f64 = 50.0;
        if aspect_ratio > 0.3 && aspect_ratio < 3.0 {
            confidence += 15.0;
        }
        if extent > 0.5 {
            confidence += 10.0;
        }
        if edge_density > 0.1 {
            confidence += 15.0;
        }
        let confidence = confidence.min(95.0);
        if confidence <= MIN_CONFIDENCE {
            continue;
        }

        let severity = if region.area > 50000 && edge_density > 0.15 {
            Severity::Critical
        } else if region.area > 20000 {
            Severity::High
        } else if region.area > 10000 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let (cx, cy) = region.center();
        detections.push(Detection {
            class: PhenomenonClass::Mining,
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
            metrics: ClassMetrics::Mining {
                aspect_ratio: round2(aspect_ratio),
                edge_density: round3(edge_density),
            },
        });
    }
    detections
}
