//! Recursive folder scanning.

use std::path::Path;

use walkdir::WalkDir;

use super::analyze::analyze_buckets;
use super::types::{ScanError, ScanResult, ScannedImage};
use crate::bucket::Orientation;
use crate::config::SessionConfig;

/// File extensions recognized as images (lowercase).
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "gif"];

/// Whether a path has a supported image extension (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Find every supported image under `folder` and classify it.
///
/// Only image headers are read. Entries below the root that cannot be
/// walked, files whose size cannot be read, and files that report a zero
/// side are skipped with a warning. Results are sorted by
/// path so repeated scans are stable.
pub fn scan_folder(folder: &Path, config: &SessionConfig) -> Result<Vec<ScannedImage>, ScanError> {
    if !folder.exists() {
        return Err(ScanError::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(ScanError::NotADirectory(folder.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Walk {
                    path: folder.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry under {:?}: {}", folder, e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_supported_image(path) {
            continue;
        }

        let (width, height) = match image::image_dimensions(path) {
            Ok(dims) => dims,
            Err(e) => {
                log::warn!("Skipping unreadable image {:?}: {}", path, e);
                continue;
            }
        };
        if width == 0 || height == 0 {
            log::warn!("Skipping zero-sized image {:?}", path);
            continue;
        }

        let orientation = Orientation::classify(width, height, &config.classification);
        images.push(ScannedImage {
            path: path.to_string_lossy().into_owned(),
            filename: entry.file_name().to_string_lossy().into_owned(),
            width,
            height,
            orientation,
            assigned_bucket: orientation.bucket_id(),
        });
    }

    images.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(images)
}

/// Scan a folder and propose buckets for it.
pub fn scan(folder: &Path, config: &SessionConfig) -> Result<ScanResult, ScanError> {
    let images = scan_folder(folder, config)?;
    if images.is_empty() {
        return Err(ScanError::NoImages(folder.to_path_buf()));
    }
    let buckets = analyze_buckets(&images, &config.fallback);
    log::info!("Scanned {:?}: {} images", folder, images.len());
    Ok(ScanResult { images, buckets })
}
