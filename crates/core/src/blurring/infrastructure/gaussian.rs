use crate::shared::constants::MAX_BLUR_RADIUS;

/// Kernel width beyond which blurring runs on a downscaled copy.
const DOWNSCALE_KERNEL_STEP: usize = 50;

/// Odd kernel size covering roughly ±3 sigma for a blur of `radius` pixels.
///
/// `radius` is treated as the Gaussian standard deviation (PIL's convention).
/// Non-positive or NaN radii give a size of 1, i.e. no blur. Radii above
/// [`MAX_BLUR_RADIUS`] are capped.
pub fn kernel_size_for_radius(radius: f64) -> usize {
    if radius.is_nan() || radius <= 0.0 {
        return 1;
    }
    ((radius.min(MAX_BLUR_RADIUS) * 6.0).ceil() as usize) | 1
}

/// Precompute a 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1. Sigma is derived as `kernel_size / 6.0`.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = kernel_size as f64 / 6.0;
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Integer downscale factor used for a kernel of `kernel_size` taps.
pub fn downscale_factor(kernel_size: usize) -> usize {
    (kernel_size / DOWNSCALE_KERNEL_STEP).max(1)
}

/// Separable Gaussian blur of a whole interleaved image, in place.
///
/// Rows are blurred into `temp`, then columns back into `data`, a full row
/// at a time. Samples past the border repeat the edge pixel.
pub fn separable_gaussian_blur_with_kernel(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let half = kernel.len() / 2;
    if half == 0 || width == 0 || height == 0 {
        return;
    }
    let row_len = width * channels;
    temp.clear();
    temp.resize(row_len * height, 0.0);

    for (src_row, dst_row) in data.chunks_exact(row_len).zip(temp.chunks_exact_mut(row_len)) {
        for (x, dst) in dst_row.chunks_exact_mut(channels).enumerate() {
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = edge_index(x + k, half, width);
                let src = &src_row[sx * channels..(sx + 1) * channels];
                for (acc, &v) in dst.iter_mut().zip(src) {
                    *acc += v as f32 * weight;
                }
            }
        }
    }

    let mut acc_row = vec![0.0f32; row_len];
    for (y, dst_row) in data.chunks_exact_mut(row_len).take(height).enumerate() {
        acc_row.fill(0.0);
        for (k, &weight) in kernel.iter().enumerate() {
            let sy = edge_index(y + k, half, height);
            let src_row = &temp[sy * row_len..(sy + 1) * row_len];
            for (acc, &v) in acc_row.iter_mut().zip(src_row) {
                *acc += v * weight;
            }
        }
        for (dst, &v) in dst_row.iter_mut().zip(&acc_row) {
            *dst = to_u8(v);
        }
    }
}

/// `shifted - half`, held inside `[0, len)`.
fn edge_index(shifted: usize, half: usize, len: usize) -> usize {
    shifted.saturating_sub(half).min(len - 1)
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Blur an image buffer in place, running on a downscaled copy when
/// `scale > 1` and the image is large enough for it.
#[allow(clippy::too_many_arguments)]
pub fn blur_in_place(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    small_kernel: &[f32],
    scale: usize,
    temp: &mut Vec<f32>,
) {
    if scale <= 1 || height < scale * 2 || width < scale * 2 {
        separable_gaussian_blur_with_kernel(data, width, height, channels, kernel, temp);
    } else {
        let size = width * height * channels;
        let (mut small, sw, sh) = downscale(data, width, height, channels, scale);
        separable_gaussian_blur_with_kernel(&mut small, sw, sh, channels, small_kernel, temp);
        let upscaled = upscale(&small, sw, sh, channels, width, height);
        data[..size].copy_from_slice(&upscaled);
    }
}

/// Shrink by an integer factor, averaging each `scale x scale` cell.
///
/// Trailing rows and columns that do not fill a whole cell are ignored.
pub fn downscale(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    scale: usize,
) -> (Vec<u8>, usize, usize) {
    let (small_w, small_h) = (width / scale, height / scale);
    let row_len = width * channels;
    let used_len = small_w * scale * channels;
    let mut sums = vec![0u32; small_w * small_h * channels];

    for (y, row) in data.chunks_exact(row_len).take(small_h * scale).enumerate() {
        let out_row = (y / scale) * small_w;
        for (x, px) in row[..used_len].chunks_exact(channels).enumerate() {
            let base = (out_row + x / scale) * channels;
            for (acc, &v) in sums[base..base + channels].iter_mut().zip(px) {
                *acc += v as u32;
            }
        }
    }

    let cell = (scale * scale) as u32;
    let out = sums.into_iter().map(|s| ((s + cell / 2) / cell) as u8).collect();
    (out, small_w, small_h)
}

/// For each target coordinate: the two neighbouring source indices and the
/// weight of the second. First and last samples of both grids line up.
fn bilinear_axis(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let ratio = if dst_len > 1 {
        (src_len - 1) as f32 / (dst_len - 1) as f32
    } else {
        0.0
    };
    (0..dst_len)
        .map(|i| {
            let pos = i as f32 * ratio;
            let lo = (pos.floor() as usize).min(src_len - 1);
            let hi = (lo + 1).min(src_len - 1);
            (lo, hi, pos - lo as f32)
        })
        .collect()
}

/// Bilinear resize of a non-empty image to `target_w x target_h`.
pub fn upscale(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<u8> {
    let xs = bilinear_axis(width, target_w);
    let ys = bilinear_axis(height, target_h);
    let sample = |x: usize, y: usize, c: usize| data[(y * width + x) * channels + c] as f32;

    let mut out = Vec::with_capacity(target_w * target_h * channels);
    for &(y0, y1, fy) in &ys {
        for &(x0, x1, fx) in &xs {
            for c in 0..channels {
                let top = sample(x0, y0, c) * (1.0 - fx) + sample(x1, y0, c) * fx;
                let bottom = sample(x0, y1, c) * (1.0 - fx) + sample(x1, y1, c) * fx;
                out.push(to_u8(top * (1.0 - fy) + bottom * fy));
            }
        }
    }
    out
}
