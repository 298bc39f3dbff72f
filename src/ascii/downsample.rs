//! Area-average resampling of RGBA pixel data.

/// Averaged color of one destination cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Average alpha. Zero only if every source pixel in the cell is fully transparent.
    pub a: u8,
}

impl CellColor {
    /// Whether no source pixel contributed any coverage.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Source pixel span `[start, end)` covered by destination cell `index` of `cells`.
///
/// Integer math keeps the last span flush with the image edge. When the
/// destination is larger than the source, spans would be empty, so every
/// cell covers at least one pixel.
#[inline]
fn span(index: u32, cells: u32, extent: u32) -> (u32, u32) {
    let start = (index as u64 * extent as u64 / cells as u64) as u32;
    let end = ((index as u64 + 1) * extent as u64 / cells as u64) as u32;
    let start = start.min(extent - 1);
    (start, end.max(start + 1).min(extent))
}

/// Resample an RGBA image to `out_width x out_height` with a box filter.
///
/// Every source pixel that maps into a destination cell contributes to its
/// average. Color channels are weighted by alpha so transparent pixels do
/// not bleed their (arbitrary) color into the cell.
///
/// # Arguments
/// * `rgba` - Pixel data (4 bytes per pixel, row-major order)
/// * `img_width` - Width of the source image in pixels
/// * `img_height` - Height of the source image in pixels
/// * `out_width` - Destination width in cells
/// * `out_height` - Destination height in cells
///
/// # Returns
/// `out_width * out_height` cells in row-major order, or an empty vector
/// if any dimension is zero or the buffer is too short.
pub fn area_average(
    rgba: &[u8],
    img_width: u32,
    img_height: u32,
    out_width: u32,
    out_height: u32,
) -> Vec<CellColor> {
    if out_width == 0
        || out_height == 0
        || img_width == 0
        || img_height == 0
        || rgba.len() < img_width as usize * img_height as usize * 4
    {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(out_width as usize * out_height as usize);

    for cy in 0..out_height {
        let (start_y, end_y) = span(cy, out_height, img_height);
        for cx in 0..out_width {
            let (start_x, end_x) = span(cx, out_width, img_width);

            let mut sum_r = 0u64;
            let mut sum_g = 0u64;
            let mut sum_b = 0u64;
            let mut sum_a = 0u64;
            let mut count = 0u64;

            for py in start_y..end_y {
                let row = py as usize * img_width as usize;
                for px in start_x..end_x {
                    let idx = (row + px as usize) * 4;
                    let a = rgba[idx + 3] as u64;
                    sum_r += rgba[idx] as u64 * a;
                    sum_g += rgba[idx + 1] as u64 * a;
                    sum_b += rgba[idx + 2] as u64 * a;
                    sum_a += a;
                    count += 1;
                }
            }

            result.push(if sum_a == 0 {
                CellColor::default()
            } else {
                CellColor {
                    r: (sum_r / sum_a) as u8,
                    g: (sum_g / sum_a) as u8,
                    b: (sum_b / sum_a) as u8,
                    // Partial coverage never truncates to fully transparent
                    a: (sum_a / count).max(1) as u8,
                }
            });
        }
    }

    result
}
