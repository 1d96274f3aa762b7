use image::RgbImage;
use terrascan::params::RequestParams;
use terrascan::pipeline::run_segmentation;
use terrascan_types::{PhenomenonClass, SegmentationError, SegmentationReport, Severity};

// Yellow-green inside both the cleared and dry-vegetation HSV bands.
const CLEARED_GREEN: [u8; 3] = [150, 145, 90];
// Saturated purple, outside every detection band.
const PURPLE: [u8; 3] = [180, 60, 200];

fn write_test_image(
    path: &std::path::Path,
    width: u32,
    height: u32,
    background: [u8; 3],
    patch: Option<(u32, u32, u32, u32, [u8; 3])>,
) {
    let image = RgbImage::from_fn(width, height, |x, y| {
        if let Some((px, py, pw, ph, color)) = patch {
            if x >= px && x < px + pw && y >= py && y < py + ph {
                return image::Rgb(color);
            }
        }
        image::Rgb(background)
    });
    image.save(path).expect("write test image");
}

#[tokio::test(flavor = "multi_thread")]
async fn deforestation_run_produces_report_and_annotated_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.png");
    write_test_image(&input, 200, 160, [0, 0, 0], Some((30, 30, 50, 40, CLEARED_GREEN)));

    let params = RequestParams::load(&format!(
        r#"{{"imagePath": "{}", "outputDir": "{}", "modelType": "deforestation"}}"#,
        input.display(),
        dir.path().join("results").display()
    ))
    .unwrap();

    let report = run_segmentation(&params).await.unwrap();
    assert!(report.error.is_none());
    assert_eq!(report.model_used, "enhanced_deforestation");
    assert_eq!(report.image_size.width, 200);
    assert_eq!(report.image_size.height, 160);
    assert!(report.processing_time >= 0.0);
    assert_eq!(report.confidence, 60.0);

    assert_eq!(report.detections.len(), 1);
    let detection = &report.detections[0];
    assert_eq!(detection.class, PhenomenonClass::Deforestation);
    assert_eq!(detection.bbox, [30, 30, 50, 40]);
    assert_eq!(detection.area, 2000);
    assert_eq!(detection.center, [55, 50]);
    assert_eq!(detection.severity, Severity::Low);
    assert!(detection.confidence >= 30.0 && detection.confidence <= 95.0);

    // The annotated image lands in outputDir with the documented name and
    // the source dimensions.
    let result_path = std::path::Path::new(&report.result_image_path);
    assert!(result_path.exists());
    let name = result_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("segmentation_result_deforestation_"));
    assert!(name.ends_with(".jpg"));
    let rendered = image::open(result_path).unwrap();
    assert_eq!(rendered.width(), 200);
    assert_eq!(rendered.height(), 160);
}

#[tokio::test(flavor = "multi_thread")]
async fn general_run_on_featureless_frame_is_empty_with_default_confidence() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.png");
    write_test_image(&input, 120, 120, PURPLE, None);

    let params = RequestParams::load(&format!(
        r#"{{"imagePath": "{}", "outputDir": "{}"}}"#,
        input.display(),
        dir.path().display()
    ))
    .unwrap();

    let report = run_segmentation(&params).await.unwrap();
    assert!(report.detections.is_empty());
    assert_eq!(report.confidence, 35.0);
    assert_eq!(report.model_used, "enhanced_general");

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("error").is_none());
    assert!(json["resultImagePath"].as_str().unwrap().ends_with(".jpg"));
    assert_eq!(json["image_size"]["width"], 120);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_image_fails_with_image_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let params = RequestParams::load(&format!(
        r#"{{"imagePath": "{}", "outputDir": "{}"}}"#,
        dir.path().join("missing.png").display(),
        dir.path().display()
    ))
    .unwrap();

    let err = run_segmentation(&params).await.unwrap_err();
    assert!(matches!(err, SegmentationError::ImageLoad { .. }));

    // The CLI boundary folds any failure into the all-zero report shape.
    let report = SegmentationReport::failure(err.to_string());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["model_used"], "error");
    assert_eq!(json["confidence"], 0.0);
    assert!(json["detections"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_invocations_yield_identical_detections() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.png");
    write_test_image(&input, 200, 150, PURPLE, Some((60, 40, 50, 40, [0, 100, 255])));

    let params = RequestParams::load(&format!(
        r#"{{"imagePath": "{}", "outputDir": "{}", "modelType": "water"}}"#,
        input.display(),
        dir.path().display()
    ))
    .unwrap();

    let first = run_segmentation(&params).await.unwrap();
    let second = run_segmentation(&params).await.unwrap();
    assert_eq!(first.detections, second.detections);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.model_used, "enhanced_water_body");
    assert_eq!(first.detections.len(), 1);
}
