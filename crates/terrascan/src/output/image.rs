//! Annotated-result rendering: color-coded, severity-weighted bounding boxes
//! with a `class: confidence%` label, drawn straight onto an RGB copy of the
//! source raster and written out as JPEG.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use terrascan_types::{Detection, PhenomenonClass, Raster, SegResult, SegmentationError, Severity};
use tokio::task;

use super::font::{glyph, GLYPH_HEIGHT, GLYPH_WIDTH};

const JPEG_QUALITY: u8 = 90;
const LABEL_SCALE: usize = 2;
// Pixel gap between the label baseline and the box's top edge.
const LABEL_OFFSET: usize = GLYPH_HEIGHT * LABEL_SCALE + 4;

pub async fn render_annotated(
    raster: &Raster,
    detections: &[Detection],
    path: &Path,
) -> SegResult<()> {
    let width = raster.width() as usize;
    let height = raster.height() as usize;

    let mut rgb = raster.data()[..width * height * 3].to_vec();
    for detection in detections {
        draw_detection(&mut rgb, width, height, detection);
    }

    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
    encoder
        .encode(&rgb, raster.width(), raster.height(), ColorType::Rgb8)
        .map_err(|err| SegmentationError::output_write(path, err.to_string()))?;

    let target = path.to_path_buf();
    let written = task::spawn_blocking(move || std::fs::write(&target, encoded))
        .await
        .map_err(|err| {
            SegmentationError::output_write(path, format!("write task failed: {err}"))
        })?;
    written.map_err(|err| SegmentationError::output_write(path, err.to_string()))
}

fn class_color(class: PhenomenonClass) -> [u8; 3] {
    match class {
        PhenomenonClass::Deforestation => [255, 0, 0],
        PhenomenonClass::Mining => [255, 165, 0],
        PhenomenonClass::ForestFire => [255, 69, 0],
        PhenomenonClass::Agriculture => [0, 255, 0],
        PhenomenonClass::UrbanExpansion => [128, 128, 128],
        PhenomenonClass::WaterBody => [0, 0, 255],
    }
}

fn severity_thickness(severity: Severity) -> usize {
    match severity {
        Severity::Critical => 4,
        Severity::High => 3,
        _ => 2,
    }
}

fn draw_detection(buffer: &mut [u8], width: usize, height: usize, detection: &Detection) {
    let [x, y, w, h] = detection.bbox;
    let color = class_color(detection.class);
    let thickness = severity_thickness(detection.severity);

    draw_hollow_rect(
        buffer,
        width,
        height,
        x as usize,
        y as usize,
        w as usize,
        h as usize,
        thickness,
        color,
    );

    let label = format!("{}: {:.1}%", detection.class.as_str(), detection.confidence);
    let label_y = (y as usize).saturating_sub(LABEL_OFFSET);
    draw_label(buffer, width, height, x as usize, label_y, &label, color);
}

#[allow(clippy::too_many_arguments)]
fn draw_hollow_rect(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    thickness: usize,
    color: [u8; 3],
) {
    if w == 0 || h == 0 {
        return;
    }
    let x1 = x + w - 1;
    let y1 = y + h - 1;
    for offset in 0..thickness {
        let top = y.saturating_add(offset);
        let bottom = y1.saturating_sub(offset);
        if top > bottom {
            break;
        }
        for col in x..=x1 {
            put_pixel(buffer, width, height, col, top, color);
            put_pixel(buffer, width, height, col, bottom, color);
        }

        let left = x.saturating_add(offset);
        let right = x1.saturating_sub(offset);
        if left > right {
            break;
        }
        for row in y..=y1 {
            put_pixel(buffer, width, height, left, row, color);
            put_pixel(buffer, width, height, right, row, color);
        }
    }
}

fn draw_label(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    text: &str,
    color: [u8; 3],
) {
    let advance = (GLYPH_WIDTH + 1) * LABEL_SCALE;
    for (pos, c) in text.chars().enumerate() {
        let bitmap = glyph(c);
        let glyph_x = x + pos * advance;
        for (row, &bits) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..LABEL_SCALE {
                    for dx in 0..LABEL_SCALE {
                        put_pixel(
                            buffer,
                            width,
                            height,
                            glyph_x + col * LABEL_SCALE + dx,
                            y + row * LABEL_SCALE + dy,
                            color,
                        );
                    }
                }
            }
        }
    }
}

fn put_pixel(buffer: &mut [u8], width: usize, height: usize, x: usize, y: usize, color: [u8; 3]) {
    if x >= width || y >= height {
        return;
    }
    let idx = (y * width + x) * 3;
    buffer[idx..idx + 3].copy_from_slice(&color);
}
