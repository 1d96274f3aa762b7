//! Orchestrator for one segmentation run: load the raster, time the
//! dispatch, render the annotated result, assemble the report. Loading and
//! the pixel crunching run on blocking threads; the engine itself is
//! synchronous and stateless.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use chrono::Local;
use terrascan_segmenter::{segment, DetectorModel};
use terrascan_types::{
    ImageSize, PhenomenonClass, Raster, SegResult, SegmentationError, SegmentationReport,
};
use tokio::task;

use crate::output;
use crate::params::RequestParams;

pub async fn run_segmentation(params: &RequestParams) -> SegResult<SegmentationReport> {
    let model = resolve_model(&params.model_type);

    let started = Instant::now();
    let raster = load_raster(&params.image_path).await?;
    let image_size = ImageSize {
        width: raster.width(),
        height: raster.height(),
    };

    let compute_raster = raster.clone();
    let outcome = task::spawn_blocking(move || segment(&compute_raster, model))
        .await
        .map_err(|err| {
            SegmentationError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("segmentation task failed: {err}"),
            ))
        })??;
    let processing_time = started.elapsed().as_secs_f64();

    tokio::fs::create_dir_all(&params.output_dir).await?;
    let result_path = params.output_dir.join(result_filename(model));
    output::image::render_annotated(&raster, &outcome.detections, &result_path).await?;

    Ok(SegmentationReport {
        error: None,
        detections: outcome.detections,
        confidence: outcome.confidence,
        processing_time,
        image_size,
        model_used: format!("enhanced_{}", model.as_str()),
        result_image_path: result_path.display().to_string(),
    })
}

fn resolve_model(name: &str) -> DetectorModel {
    if name != "general" && PhenomenonClass::from_str(name).is_err() {
        eprintln!("unknown model type '{name}', falling back to general");
    }
    DetectorModel::parse(name)
}

fn result_filename(model: DetectorModel) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("segmentation_result_{}_{timestamp}.jpg", model.as_str())
}

async fn load_raster(path: &Path) -> SegResult<Raster> {
    let source = path.to_path_buf();
    let loaded: Result<Raster, (PathBuf, String)> = task::spawn_blocking(move || {
        let decoded = image::open(&source).map_err(|err| (source.clone(), err.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Raster::from_rgb8(width, height, rgb.into_raw())
            .map_err(|err| (source.clone(), err.to_string()))
    })
    .await
    .map_err(|err| {
        SegmentationError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("image load task failed: {err}"),
        ))
    })?;
    loaded.map_err(|(path, message)| SegmentationError::image_load(path, message))
}
