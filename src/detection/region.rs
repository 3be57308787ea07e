//! Candidate measurement regions produced by the extractors

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Number of pixels covered by the rectangle
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Center point, used to order pads along the strip
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Whether the rectangle lies inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Which pixels of the bounding box belong to the region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelSet {
    /// Every pixel of the bounding box
    Rect,
    /// Only the listed `(x, y)` pixels (a connected component)
    Members(Vec<(u32, u32)>),
}

/// One candidate measurement pad.
///
/// `index` is the pad position in strip order and maps to
/// [`crate::Parameter::from_pad_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub index: usize,
    pub bounds: BoundingBox,
    /// Number of member pixels
    pub area: u64,
    pub pixels: PixelSet,
}

impl Region {
    /// Region covering a whole rectangle
    pub fn from_rect(index: usize, bounds: BoundingBox) -> Self {
        Self {
            index,
            area: bounds.area(),
            bounds,
            pixels: PixelSet::Rect,
        }
    }

    /// Region made of explicit member pixels; the bounds are computed from them
    pub fn from_members(index: usize, members: Vec<(u32, u32)>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }

        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0u32, 0u32);
        for &(x, y) in &members {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Some(Self {
            index,
            bounds: BoundingBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1),
            area: members.len() as u64,
            pixels: PixelSet::Members(members),
        })
    }

    /// Visit the RGB value of every member pixel.
    ///
    /// Coordinates outside `image` are skipped.
    pub fn for_each_pixel<F>(&self, image: &RgbImage, mut f: F)
    where
        F: FnMut([u8; 3]),
    {
        let (w, h) = image.dimensions();
        match &self.pixels {
            PixelSet::Rect => {
                let x_end = (self.bounds.x.saturating_add(self.bounds.width)).min(w);
                let y_end = (self.bounds.y.saturating_add(self.bounds.height)).min(h);
                for y in self.bounds.y..y_end {
                    for x in self.bounds.x..x_end {
                        f(image.get_pixel(x, y).0);
                    }
                }
            }
            PixelSet::Members(members) => {
                for &(x, y) in members {
                    if x < w && y < h {
                        f(image.get_pixel(x, y).0);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_bounds_from_members() {
        let region = Region::from_members(2, vec![(3, 4), (5, 4), (4, 7)]).unwrap();
        assert_eq!(region.bounds, BoundingBox::new(3, 4, 3, 4));
        assert_eq!(region.area, 3);
        assert_eq!(region.index, 2);
    }

    #[test]
    fn test_empty_members_rejected() {
        assert!(Region::from_members(0, Vec::new()).is_none());
    }

    #[test]
    fn test_rect_pixel_visit_is_clipped() {
        let image = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let region = Region::from_rect(0, BoundingBox::new(2, 2, 5, 5));
        let mut count = 0;
        region.for_each_pixel(&image, |px| {
            assert_eq!(px, [1, 2, 3]);
            count += 1;
        });
        assert_eq!(count, 4);
    }

    #[test]
    fn test_member_pixel_visit() {
        let mut image = RgbImage::new(3, 3);
        image.put_pixel(1, 1, Rgb([9, 9, 9]));
        let region = Region::from_members(0, vec![(1, 1)]).unwrap();
        let mut seen = Vec::new();
        region.for_each_pixel(&image, |px| seen.push(px));
        assert_eq!(seen, vec![[9, 9, 9]]);
    }
}
