//! Crop, resample and write saved images.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::RgbImage;

use super::types::{ExportError, ExportImage, ExportRequest, ExportSummary};
use crate::bucket::BucketDimensions;
use crate::geometry::CropRect;

/// JPEG quality used for exported files.
pub const JPEG_QUALITY: u8 = 95;

/// Label/caption files that travel with an image when exported.
pub const COMPANION_EXTENSIONS: [&str; 4] = ["txt", "json", "caption", "tags"];

/// Crop `source` to `crop`, resize to exactly `target` with Lanczos3 and
/// write the RGB result to `output`.
///
/// The format follows the output extension; JPEG is written at
/// [`JPEG_QUALITY`].
pub fn crop_and_resize(
    source: &Path,
    crop: &CropRect,
    target: BucketDimensions,
    output: &Path,
) -> Result<(), ExportError> {
    let img = image::open(source).map_err(|e| ExportError::Open {
        path: source.to_path_buf(),
        source: e,
    })?;

    if crop.width == 0 || crop.height == 0 || !crop.fits_within(img.width(), img.height()) {
        return Err(ExportError::CropOutOfBounds {
            crop: *crop,
            width: img.width(),
            height: img.height(),
        });
    }

    let resized = img
        .crop_imm(crop.x, crop.y, crop.width, crop.height)
        .resize_exact(target.width, target.height, FilterType::Lanczos3)
        .to_rgb8();

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    save_rgb(&resized, output)
}

fn save_rgb(img: &RgbImage, output: &Path) -> Result<(), ExportError> {
    let is_jpeg = output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false);

    let encode_err = |e: image::ImageError| ExportError::Encode {
        path: output.to_path_buf(),
        source: e,
    };

    if is_jpeg {
        let file = File::create(output).map_err(|e| ExportError::Write {
            path: output.to_path_buf(),
            source: e,
        })?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
        img.write_with_encoder(encoder).map_err(encode_err)
    } else {
        img.save(output).map_err(encode_err)
    }
}

/// Companion files next to `image_path` sharing its stem.
pub fn find_companions(image_path: &Path) -> Vec<PathBuf> {
    COMPANION_EXTENSIONS
        .iter()
        .map(|ext| image_path.with_extension(ext))
        .filter(|p| p.is_file())
        .collect()
}

/// Copy an image's companion files into `output_dir`, returning the new
/// paths. Individual copy failures are logged and skipped.
pub fn copy_companions(image_path: &Path, output_dir: &Path) -> Vec<PathBuf> {
    let mut copied = Vec::new();
    for companion in find_companions(image_path) {
        let Some(name) = companion.file_name() else {
            continue;
        };
        let destination = output_dir.join(name);
        match fs::copy(&companion, &destination) {
            Ok(_) => copied.push(destination),
            Err(e) => log::warn!("Failed to copy companion {:?}: {}", companion, e),
        }
    }
    copied
}

fn export_one(image: &ExportImage, crop: &CropRect, request: &ExportRequest) -> Result<(), ExportError> {
    let target = request
        .buckets
        .get(&image.assigned_bucket)
        .copied()
        .ok_or(ExportError::MissingBucket(image.assigned_bucket))?;

    // Keep the source filename so label files still match
    let name = Path::new(&image.filename)
        .file_name()
        .ok_or_else(|| ExportError::InvalidFilename(image.filename.clone()))?;
    let output = request.output_dir.join(name);

    let source = Path::new(&image.path);
    crop_and_resize(source, crop, target, &output)?;

    if request.copy_companions {
        copy_companions(source, &request.output_dir);
    }
    Ok(())
}

/// Export every saved image of a request.
///
/// Images that are not marked cropped (or carry no rectangle) are skipped.
/// Per-image failures are counted and described in `errors`; only failing
/// to create the output directory aborts the batch.
pub fn export_batch(request: &ExportRequest) -> Result<ExportSummary, ExportError> {
    fs::create_dir_all(&request.output_dir).map_err(|e| ExportError::OutputDir {
        path: request.output_dir.clone(),
        source: e,
    })?;

    let mut summary = ExportSummary {
        total: request.images.len(),
        ..ExportSummary::default()
    };

    for image in &request.images {
        let crop = match (image.cropped, image.crop_params) {
            (true, Some(crop)) => crop,
            _ => {
                summary.skipped += 1;
                continue;
            }
        };

        match export_one(image, &crop, request) {
            Ok(()) => summary.success += 1,
            Err(e) => {
                log::warn!("Export failed for {}: {}", image.path, e);
                summary.failed += 1;
                summary.errors.push(format!("{}: {}", image.filename, e));
            }
        }
    }

    log::info!(
        "Exported {} of {} images to {:?} ({} skipped, {} failed)",
        summary.success,
        summary.total,
        request.output_dir,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}
