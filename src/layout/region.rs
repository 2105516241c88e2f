//! Header, footer and body bands of a page.
//!
//! Page space is y-down, so the header band hugs the top edge (the one
//! nearest the origin) and the footer band hugs the bottom edge. Bands are
//! half-open in `y` (`[top, bottom)`), except the footer which also owns the
//! page's bottom edge, so every point on the page falls in exactly one band.

use crate::model::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default height of the header and footer bands, in points.
pub const DEFAULT_BAND_HEIGHT: f32 = 75.0;

/// Name of a page region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionName {
    /// Band at the top edge
    Header,
    /// Interior of the page
    Body,
    /// Band at the bottom edge
    Footer,
}

impl RegionName {
    /// All region names, top to bottom.
    pub const ALL: [RegionName; 3] = [RegionName::Header, RegionName::Body, RegionName::Footer];
}

impl std::fmt::Display for RegionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
            Self::Footer => write!(f, "footer"),
        }
    }
}

/// A named rectangle on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Region name
    pub name: RegionName,
    /// Region rectangle
    pub rect: Rect,
}

/// The three bands of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionLayout {
    page: Rect,
    header: Region,
    body: Region,
    footer: Region,
}

impl RegionLayout {
    /// Split `page` into header, body and footer bands of height `band`.
    ///
    /// A band taller than half the page is clamped to half the page; a
    /// negative or non-finite band is treated as zero.
    pub fn new(page: Rect, band: f32) -> Self {
        let half = (page.height() / 2.0).max(0.0);
        let mut height = if band.is_finite() { band.max(0.0) } else { 0.0 };
        if height > half {
            log::warn!(
                "Band height {} exceeds half the page height ({}), clamping",
                height,
                half
            );
            height = half;
        }

        let header_bottom = page.top + height;
        let footer_top = page.bottom - height;

        Self {
            page,
            header: Region {
                name: RegionName::Header,
                rect: Rect::new(page.x0, page.top, page.x1, header_bottom),
            },
            body: Region {
                name: RegionName::Body,
                rect: Rect::new(page.x0, header_bottom, page.x1, footer_top),
            },
            footer: Region {
                name: RegionName::Footer,
                rect: Rect::new(page.x0, footer_top, page.x1, page.bottom),
            },
        }
    }

    /// Page rectangle the layout was built from.
    pub fn page(&self) -> Rect {
        self.page
    }

    /// Get a region by name.
    pub fn region(&self, name: RegionName) -> &Region {
        match name {
            RegionName::Header => &self.header,
            RegionName::Body => &self.body,
            RegionName::Footer => &self.footer,
        }
    }

    /// Get a region's rectangle by name.
    pub fn rect(&self, name: RegionName) -> Rect {
        self.region(name).rect
    }

    /// All regions, top to bottom.
    pub fn regions(&self) -> [&Region; 3] {
        [&self.header, &self.body, &self.footer]
    }

    /// Find the single region a point belongs to.
    ///
    /// Returns `None` for points outside the page.
    pub fn locate(&self, point: Point) -> Option<RegionName> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let x_inside = point.x >= self.page.x0 && point.x <= self.page.x1;
        if !x_inside || point.y < self.page.top || point.y > self.page.bottom {
            return None;
        }

        if point.y < self.header.rect.bottom {
            Some(RegionName::Header)
        } else if point.y < self.body.rect.bottom {
            Some(RegionName::Body)
        } else {
            Some(RegionName::Footer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_on_letter() {
        let layout = RegionLayout::new(Rect::letter(), DEFAULT_BAND_HEIGHT);

        assert_eq!(layout.rect(RegionName::Header), Rect::new(0.0, 0.0, 612.0, 75.0));
        assert_eq!(layout.rect(RegionName::Body), Rect::new(0.0, 75.0, 612.0, 717.0));
        assert_eq!(layout.rect(RegionName::Footer), Rect::new(0.0, 717.0, 612.0, 792.0));
    }

    #[test]
    fn test_partition_tiles_page() {
        let page = Rect::new(10.0, 20.0, 600.0, 820.0);
        for band in [0.0, 1.0, 37.5, 75.0, 200.0, 399.0] {
            let layout = RegionLayout::new(page, band);
            let header = layout.rect(RegionName::Header);
            let body = layout.rect(RegionName::Body);
            let footer = layout.rect(RegionName::Footer);

            assert_eq!(header.top, page.top);
            assert_eq!(header.bottom, body.top);
            assert_eq!(body.bottom, footer.top);
            assert_eq!(footer.bottom, page.bottom);
            assert!(body.height() >= 0.0);
            let total = header.height() + body.height() + footer.height();
            assert!((total - page.height()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_locate_is_exclusive() {
        let layout = RegionLayout::new(Rect::letter(), 75.0);

        assert_eq!(layout.locate(Point::new(50.0, 0.0)), Some(RegionName::Header));
        assert_eq!(layout.locate(Point::new(50.0, 74.9)), Some(RegionName::Header));
        assert_eq!(layout.locate(Point::new(50.0, 75.0)), Some(RegionName::Body));
        assert_eq!(layout.locate(Point::new(50.0, 717.0)), Some(RegionName::Footer));
        assert_eq!(layout.locate(Point::new(50.0, 792.0)), Some(RegionName::Footer));
        assert_eq!(layout.locate(Point::new(50.0, 800.0)), None);
        assert_eq!(layout.locate(Point::new(-5.0, 100.0)), None);
    }

    #[test]
    fn test_oversized_band_is_clamped() {
        let layout = RegionLayout::new(Rect::new(0.0, 0.0, 100.0, 100.0), 80.0);
        assert_eq!(layout.rect(RegionName::Header).bottom, 50.0);
        assert_eq!(layout.rect(RegionName::Body).height(), 0.0);
    }

    #[test]
    fn test_region_name_display() {
        assert_eq!(RegionName::Header.to_string(), "header");
        assert_eq!(RegionName::Footer.to_string(), "footer");
    }
}
