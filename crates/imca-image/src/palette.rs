//! Adaptive palette discretization.
//!
//! Reduces an image to `W` representative colors with median cut and maps
//! every pixel to the index of its nearest representative. Palette entries
//! are always distinct and sorted by luma, so weapon 0 is the darkest color.

use std::collections::{BTreeMap, HashMap};

use image::{DynamicImage, Rgb, RgbImage};
use rhizome_imca_rps::{ConfigError, MAX_WEAPONS, Weapon, WeaponGrid};

/// An RGB color.
pub type Color = [u8; 3];

/// Distinct colors indexed by weapon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Creates a palette from distinct colors, in weapon order.
    ///
    /// Returns `None` if the list is empty, too long, or holds duplicates.
    pub fn from_colors(colors: Vec<Color>) -> Option<Self> {
        let mut seen = colors.clone();
        seen.sort_unstable();
        seen.dedup();
        let valid = !colors.is_empty()
            && colors.len() <= MAX_WEAPONS as usize
            && seen.len() == colors.len();
        valid.then_some(Self { colors })
    }

    /// Returns the colors in weapon order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the number of weapons.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a palette has at least one color.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the color of a weapon.
    pub fn color(&self, weapon: Weapon) -> Option<Color> {
        self.colors.get(weapon as usize).copied()
    }

    /// Returns the color → weapon mapping.
    pub fn weapons(&self) -> BTreeMap<Color, Weapon> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as Weapon))
            .collect()
    }

    /// Returns the weapon whose color is closest to `color`.
    ///
    /// Ties go to the lower weapon.
    pub fn nearest(&self, color: Color) -> Weapon {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (i, &c) in self.colors.iter().enumerate() {
            let dist = distance_sq(c, color);
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best as Weapon
    }

    /// Maps every pixel to its nearest weapon.
    pub fn index(&self, image: &RgbImage) -> WeaponGrid {
        let (width, height) = image.dimensions();
        let mut cache: HashMap<Color, Weapon> = HashMap::new();
        WeaponGrid::from_fn(width as usize, height as usize, |x, y| {
            let color = image.get_pixel(x as u32, y as u32).0;
            *cache.entry(color).or_insert_with(|| self.nearest(color))
        })
    }

    /// Paints a grid with the palette colors.
    ///
    /// Weapons outside the palette are painted black.
    pub fn paint(&self, grid: &WeaponGrid) -> RgbImage {
        RgbImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
            Rgb(self.color(grid.get(x as usize, y as usize)).unwrap_or([0, 0, 0]))
        })
    }
}

/// An image reduced to weapon indices.
#[derive(Debug, Clone)]
pub struct Discretized {
    /// Weapon of every pixel.
    pub grid: WeaponGrid,
    /// Color of every weapon.
    pub palette: Palette,
}

/// Quantizes an image to `weapons` colors.
///
/// # Example
///
/// ```
/// use image::{DynamicImage, RgbImage, Rgb};
/// use rhizome_imca_image::discretize;
///
/// let img = RgbImage::from_fn(4, 1, |x, _| Rgb([x as u8 * 60, 0, 0]));
/// let d = discretize(&DynamicImage::ImageRgb8(img), 2).unwrap();
/// assert_eq!(d.palette.len(), 2);
/// assert_eq!(d.grid.cells(), &[0, 0, 1, 1]);
/// ```
pub fn discretize(image: &DynamicImage, weapons: u32) -> Result<Discretized, ConfigError> {
    if weapons == 0 {
        return Err(ConfigError::NoWeapons);
    }
    if weapons > MAX_WEAPONS {
        return Err(ConfigError::TooManyWeapons { weapons });
    }

    let rgb = image.to_rgb8();
    let histogram = histogram(&rgb);
    let mut colors = if histogram.len() <= weapons as usize {
        let mut colors: Vec<Color> = histogram.iter().map(|&(c, _)| c).collect();
        pad_distinct(&mut colors, weapons as usize);
        colors
    } else {
        median_cut(histogram, weapons as usize)
    };
    colors.sort_by_key(|&c| (luma(c), c));

    let palette = Palette { colors };
    let grid = palette.index(&rgb);
    Ok(Discretized { grid, palette })
}

/// Distinct colors and their pixel counts, sorted by color.
fn histogram(image: &RgbImage) -> Vec<(Color, u32)> {
    let mut counts: BTreeMap<Color, u32> = BTreeMap::new();
    for p in image.pixels() {
        *counts.entry(p.0).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Adds gray levels not yet present until there are `n` colors.
fn pad_distinct(colors: &mut Vec<Color>, n: usize) {
    for v in 0..=255u8 {
        if colors.len() >= n {
            break;
        }
        let gray = [v, v, v];
        if !colors.contains(&gray) {
            colors.push(gray);
        }
    }
}

/// Splits the color histogram into `n` boxes and returns their mean colors.
///
/// Requires more distinct colors than `n`. Boxes are split at a value
/// boundary, so they occupy disjoint regions and their means are distinct.
fn median_cut(histogram: Vec<(Color, u32)>, n: usize) -> Vec<Color> {
    let mut boxes = vec![histogram];

    while boxes.len() < n {
        let widest = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() > 1)
            .map(|(i, b)| {
                let (channel, range) = widest_channel(b);
                (i, channel, range)
            })
            .max_by_key(|&(i, _, range)| (range, std::cmp::Reverse(i)));
        let Some((i, channel, _)) = widest else {
            break;
        };

        let mut colors = boxes.swap_remove(i);
        colors.sort_by_key(|&(c, _)| (c[channel], c));
        let split = split_value(&colors, channel);
        let at = colors.partition_point(|&(c, _)| c[channel] <= split);
        let upper = colors.split_off(at);
        boxes.push(colors);
        boxes.push(upper);
    }

    boxes.iter().map(|b| mean(b)).collect()
}

/// Returns the channel with the largest spread and that spread.
fn widest_channel(colors: &[(Color, u32)]) -> (usize, u8) {
    (0..3)
        .map(|ch| {
            let min = colors.iter().map(|(c, _)| c[ch]).min().unwrap_or(0);
            let max = colors.iter().map(|(c, _)| c[ch]).max().unwrap_or(0);
            (ch, max - min)
        })
        .max_by_key(|&(ch, range)| (range, std::cmp::Reverse(ch)))
        .unwrap_or((0, 0))
}

/// Weighted median along `channel`, kept below the maximum so both halves are non-empty.
///
/// `colors` must be sorted by `channel` and span more than one value on it.
fn split_value(colors: &[(Color, u32)], channel: usize) -> u8 {
    let total: u64 = colors.iter().map(|&(_, w)| w as u64).sum();
    let max = colors.last().map_or(0, |(c, _)| c[channel]);

    let mut acc = 0u64;
    let mut median = colors.first().map_or(0, |(c, _)| c[channel]);
    for &(c, w) in colors {
        acc += w as u64;
        median = c[channel];
        if acc * 2 >= total {
            break;
        }
    }

    if median < max {
        median
    } else {
        colors
            .iter()
            .map(|(c, _)| c[channel])
            .filter(|&v| v < max)
            .max()
            .unwrap_or(median)
    }
}

fn mean(colors: &[(Color, u32)]) -> Color {
    let total: u64 = colors.iter().map(|&(_, w)| w as u64).sum::<u64>().max(1);
    let mut out = [0u8; 3];
    for (ch, slot) in out.iter_mut().enumerate() {
        let sum: u64 = colors.iter().map(|&(c, w)| c[ch] as u64 * w as u64).sum();
        *slot = ((sum + total / 2) / total) as u8;
    }
    out
}

fn luma(c: Color) -> u32 {
    299 * c[0] as u32 + 587 * c[1] as u32 + 114 * c[2] as u32
}

fn distance_sq(a: Color, b: Color) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&x, y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}
