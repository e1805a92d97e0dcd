//! Global binarization with Otsu's automatic threshold selection.

use image::GrayImage;

/// Compute Otsu's threshold from the grayscale histogram: the gray level
/// that maximizes between-class variance.
///
/// Returns `None` for degenerate histograms (empty image or a single gray
/// level), where no threshold separates anything; callers fall back to a
/// fixed global threshold.
pub fn otsu_threshold(img: &GrayImage) -> Option<u8> {
    let mut histogram = [0u64; 256];
    for pixel in img.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }
    let total = (img.width() as u64) * (img.height() as u64);
    if total == 0 {
        return None;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_sum = 0.0;
    let mut background_weight = 0u64;
    let mut best_variance = 0.0;
    let mut best_threshold = None;

    for level in 0..256usize {
        background_weight += histogram[level];
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }
        background_sum += level as f64 * histogram[level] as f64;

        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_sum - background_sum) / foreground_weight as f64;
        let diff = background_mean - foreground_mean;
        let variance = background_weight as f64 * foreground_weight as f64 * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_threshold = Some(level as u8);
        }
    }

    best_threshold
}

/// Binarize `img` in place semantics: pixels above the threshold become
/// white, the rest black. Uses Otsu's threshold, or `fallback` when the
/// histogram is degenerate.
pub fn binarize(img: &GrayImage, fallback: u8) -> GrayImage {
    let threshold = otsu_threshold(img).unwrap_or(fallback);
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    out
}
