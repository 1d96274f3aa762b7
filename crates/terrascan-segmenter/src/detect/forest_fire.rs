//! Forest-fire detector. Three independent signals — active flame hues,
//! desaturated smoke, and near-black burned ground — union into the candidate
//! mask; the dominant signal inside each region decides its fire type.

use terrascan_types::{ClassMetrics, Detection, FireType, PhenomenonClass, Severity};

use super::{profile, round2, round3};
use crate::planes::ImagePlanes;
use crate::regions::extract_regions;

// Red wraps around the hue circle, so active fire needs both ends.
const FIRE_LOW_RED: ([u8; 3], [u8; 3]) = ([0, 100, 100], [10, 255, 255]);
const FIRE_HIGH_RED: ([u8; 3], [u8; 3]) = ([170, 100, 100], [180, 255, 255]);
const FLAME: ([u8; 3], [u8; 3]) = ([15, 150, 150], [35, 255, 255]);
const SMOKE: ([u8; 3], [u8; 3]) = ([0, 0, 100], [180, 30, 200]);
const BURNED: ([u8; 3], [u8; 3]) = ([0, 0, 0], [180, 255, 80]);

const MIN_CONFIDENCE: f64 = 50.0;

const ACTIVE_FIRE_RATIO: f64 = 0.1;
const SMOKE_RATIO: f64 = 0.3;
const BURNED_RATIO: f64 = 0.5;

pub(crate) fn detect(planes: &ImagePlanes) -> Vec<Detection> {
    let min_area = profile(PhenomenonClass::ForestFire).min_area;

    let active = planes
        .in_range(FIRE_LOW_RED.0, FIRE_LOW_RED.1)
        .union(&planes.in_range(FIRE_HIGH_RED.0, FIRE_HIGH_RED.1))
        .union(&planes.in_range(FLAME.0, FLAME.1));
    let smoke = planes.in_range(SMOKE.0, SMOKE.1);
    let burned = planes.in_range(BURNED.0, BURNED.1);

    let indicators = active.union(&smoke).union(&burned);

    let mut detections = Vec::new();
    for region in extract_regions(&indicators) {
        if region.area <= min_area {
            continue;
        }

        let box_area = region.box_area() as f64;
        let active_fire_ratio =
            active.count_in_box(region.x, region.y, region.width, region.height) as f64 / box_area;
        let smoke_ratio =
            smoke.count_in_box(region.x, region.y, region.width, region.height) as f64 / box_area;
        let burned_ratio =
            burned.count_in_box(region.x, region.y, region.width, region.height) as f64 / box_area;

        let mut confidence: f64 = 40.0;
        let fire_type = if active_fire_ratio > ACTIVE_FIRE_RATIO {
            confidence += 30.0;
            FireType::ActiveFire
        } else if smoke_ratio > SMOKE_RATIO {
            confidence += 25.0;
            FireType::Smoke
        } else if burned_ratio > BURNED_RATIO {
            confidence += 20.0;
            FireType::BurnedArea
        } else {
            FireType::FireRisk
        };
        let confidence = confidence.min(95.0);
        if confidence <= MIN_CONFIDENCE {
            continue;
        }

        let total_indicators = active_fire_ratio + smoke_ratio + burned_ratio * 0.5;
        let severity = if total_indicators > 0.7 || region.area > 20000 {
            Severity::Critical
        } else if total_indicators > 0.4 || region.area > 10000 {
            Severity::High
        } else if total_indicators > 0.2 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let (cx, cy) = region.center();
        detections.push(Detection {
            class: PhenomenonClass::ForestFire,
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
            metrics: ClassMetrics::ForestFire {
                fire_type,
                active_fire_ratio: round3(active_fire_ratio),
                smoke_ratio: round3(smoke_ratio),
                burned_ratio: round3(burned_ratio),
            },
        });
    }
    detections
}
