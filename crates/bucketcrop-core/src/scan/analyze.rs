//! Bucket proposals from scanned image sizes.

use super::types::ScannedImage;
use crate::bucket::{Bucket, BucketId, Orientation};
use crate::config::FallbackDimensions;
use crate::dimension::normalize;

/// Median of a list, averaging the two middle values for even lengths.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn median_of(images: &[&ScannedImage], f: impl Fn(&ScannedImage) -> f64) -> Option<f64> {
    let mut values: Vec<f64> = images.iter().map(|&img| f(img)).collect();
    median(&mut values)
}

/// Propose the three standard buckets from a scan.
///
/// Landscape and portrait buckets take the median width and median height
/// of their class; the square bucket takes the median of `(w + h) / 2` for
/// both sides. Every side is aligned. Empty classes fall back to the
/// configured defaults.
pub fn analyze_buckets(images: &[ScannedImage], fallback: &FallbackDimensions) -> Vec<Bucket> {
    [Orientation::Landscape, Orientation::Square, Orientation::Portrait]
        .into_iter()
        .map(|orientation| {
            let class: Vec<&ScannedImage> = images
                .iter()
                .filter(|img| img.orientation == orientation)
                .collect();

            let (width, height) = match orientation {
                Orientation::Square => match median_of(&class, |img| (img.width as f64 + img.height as f64) / 2.0) {
                    Some(side) => {
                        let side = normalize(side);
                        (side, side)
                    }
                    None => orientation.fallback_dimensions(fallback),
                },
                _ => match (
                    median_of(&class, |img| img.width as f64),
                    median_of(&class, |img| img.height as f64),
                ) {
                    (Some(w), Some(h)) => (normalize(w), normalize(h)),
                    _ => orientation.fallback_dimensions(fallback),
                },
            };

            log::debug!(
                "{} bucket proposed at {}x{} from {} images",
                orientation.bucket_name(),
                width,
                height,
                class.len()
            );
            Bucket::for_orientation(orientation, width, height)
        })
        .collect()
}

/// Count of scanned images per proposed bucket.
pub fn count_assigned(images: &[ScannedImage], bucket: BucketId) -> usize {
    images.iter().filter(|img| img.assigned_bucket == bucket).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(name: &str, width: u32, height: u32, orientation: Orientation) -> ScannedImage {
        ScannedImage {
            path: format!("/d/{name}"),
            filename: name.to_string(),
            width,
            height,
            orientation,
            assigned_bucket: orientation.bucket_id(),
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_landscape_bucket_from_medians() {
        let images = vec![
            scanned("a", 1920, 1080, Orientation::Landscape),
            scanned("b", 1600, 900, Orientation::Landscape),
            scanned("c", 1000, 700, Orientation::Landscape),
        ];
        let buckets = analyze_buckets(&images, &FallbackDimensions::default());
        assert_eq!(buckets[0].id, BucketId::A);
        // Medians 1600 x 900 -> aligned 1600 x 896
        assert_eq!((buckets[0].width(), buckets[0].height()), (1600, 896));
    }

    #[test]
    fn test_square_bucket_from_mean_side() {
        let images = vec![
            scanned("a", 1000, 1000, Orientation::Square),
            scanned("b", 520, 500, Orientation::Square),
        ];
        let buckets = analyze_buckets(&images, &FallbackDimensions::default());
        // Sides 1000 and 510, median 755 -> 768
        assert_eq!((buckets[1].width(), buckets[1].height()), (768, 768));
    }

    #[test]
    fn test_empty_classes_use_fallback() {
        let buckets = analyze_buckets(&[], &FallbackDimensions::default());
        assert_eq!(buckets.len(), 3);
        assert_eq!((buckets[0].width(), buckets[0].height()), (1024, 768));
        assert_eq!((buckets[1].width(), buckets[1].height()), (1024, 1024));
        assert_eq!((buckets[2].width(), buckets[2].height()), (768, 1024));
    }

    #[test]
    fn test_buckets_keep_orientation_labels() {
        let buckets = analyze_buckets(&[], &FallbackDimensions::default());
        let labels: Vec<_> = buckets.iter().map(|b| (b.id, b.orientation)).collect();
        assert_eq!(
            labels,
            vec![
                (BucketId::A, Orientation::Landscape),
                (BucketId::B, Orientation::Square),
                (BucketId::C, Orientation::Portrait),
            ]
        );
    }

    #[test]
    fn test_count_assigned() {
        let images = vec![
            scanned("a", 1000, 500, Orientation::Landscape),
            scanned("b", 500, 1000, Orientation::Portrait),
            scanned("c", 400, 1000, Orientation::Portrait),
        ];
        assert_eq!(count_assigned(&images, BucketId::C), 2);
        assert_eq!(count_assigned(&images, BucketId::B), 0);
    }
}
