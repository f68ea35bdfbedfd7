#![forbid(unsafe_code)]

//! Visibility and geometry of the palette overlay.
//!
//! The result list is shown exactly when the filter matched something. The
//! overlay is a header (the query line) plus up to `max_rows` result rows,
//! as wide as the host allows up to a preferred width, centered
//! horizontally at a fixed offset from the top of the host.

use cmdpal_core::geometry::{Rect, Size};

/// Geometry constants for the palette overlay.
///
/// Defaults are in pixels; [`PaletteMetrics::cells`] is a preset for
/// character-cell hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteMetrics {
    /// Width used when the host is wide enough.
    pub preferred_width: u16,
    /// Horizontal room kept free inside the host.
    pub parent_padding: u16,
    /// Maximum number of result rows shown at once.
    pub max_rows: u16,
    /// Distance of the overlay from the top of the host.
    pub top_offset: u16,
    /// Height of the query line including its margins.
    pub header_height: u16,
    /// Height of one result row.
    pub row_height: u16,
}

impl Default for PaletteMetrics {
    fn default() -> Self {
        Self {
            preferred_width: 400,
            parent_padding: 50,
            max_rows: 7,
            top_offset: 50,
            header_height: 30,
            row_height: 20,
        }
    }
}

impl PaletteMetrics {
    /// Terminal preset: one row per result. The header counts both borders,
    /// the query line, and the divider above the results.
    #[must_use]
    pub const fn cells() -> Self {
        Self {
            preferred_width: 60,
            parent_padding: 4,
            max_rows: 7,
            top_offset: 2,
            header_height: 4,
            row_height: 1,
        }
    }

    #[must_use]
    pub const fn with_preferred_width(mut self, width: u16) -> Self {
        self.preferred_width = width;
        self
    }

    #[must_use]
    pub const fn with_parent_padding(mut self, padding: u16) -> Self {
        self.parent_padding = padding;
        self
    }

    #[must_use]
    pub const fn with_max_rows(mut self, rows: u16) -> Self {
        self.max_rows = rows;
        self
    }

    #[must_use]
    pub const fn with_top_offset(mut self, offset: u16) -> Self {
        self.top_offset = offset;
        self
    }

    #[must_use]
    pub const fn with_header_height(mut self, height: u16) -> Self {
        self.header_height = height;
        self
    }

    #[must_use]
    pub const fn with_row_height(mut self, height: u16) -> Self {
        self.row_height = height;
        self
    }
}

/// Derived visibility and size of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteLayout {
    /// Whether the result list is shown.
    pub list_visible: bool,
    /// Number of result rows shown.
    pub rows: u16,
    /// Overlay width.
    pub width: u16,
    /// Overlay height.
    pub height: u16,
}

impl PaletteLayout {
    /// Layout for `len` filtered results in a host `parent_width` wide.
    ///
    /// With no known host width the preferred width is used.
    #[must_use]
    pub fn compute(len: usize, parent_width: Option<u16>, metrics: &PaletteMetrics) -> Self {
        let list_visible = len > 0;
        let width = match parent_width {
            Some(parent) => metrics
                .preferred_width
                .min(parent.saturating_sub(metrics.parent_padding)),
            None => metrics.preferred_width,
        };
        let rows = if list_visible {
            u16::try_from(len).map_or(metrics.max_rows, |len| len.min(metrics.max_rows))
        } else {
            0
        };
        let height = metrics
            .header_height
            .saturating_add(rows.saturating_mul(metrics.row_height));
        Self {
            list_visible,
            rows,
            width,
            height,
        }
    }

    /// Position the overlay inside `host`: centered horizontally, `top_offset`
    /// from the top, clipped to the host.
    #[must_use]
    pub fn place(&self, host: Size, metrics: &PaletteMetrics) -> Rect {
        let width = self.width.min(host.width);
        let x = (host.width - width) / 2;
        let y = metrics.top_offset.min(host.height);
        let height = self.height.min(host.height - y);
        Rect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifteen_entries_show_seven_rows() {
        let m = PaletteMetrics::default();
        let layout = PaletteLayout::compute(15, Some(800), &m);
        assert!(layout.list_visible);
        assert_eq!(layout.rows, 7);
        assert_eq!(layout.height, m.header_height + 7 * m.row_height);
        assert_eq!(layout.width, 400);
    }

    #[test]
    fn empty_result_collapses_to_header() {
        let m = PaletteMetrics::default();
        let layout = PaletteLayout::compute(0, Some(800), &m);
        assert!(!layout.list_visible);
        assert_eq!(layout.rows, 0);
        assert_eq!(layout.height, 30);
    }

    #[test]
    fn few_entries_size_to_content() {
        let m = PaletteMetrics::default();
        let layout = PaletteLayout::compute(3, Some(800), &m);
        assert_eq!(layout.height, 30 + 3 * 20);
    }

    #[test]
    fn narrow_host_shrinks_width() {
        let m = PaletteMetrics::default();
        assert_eq!(PaletteLayout::compute(1, Some(300), &m).width, 250);
        assert_eq!(PaletteLayout::compute(1, Some(20), &m).width, 0);
        assert_eq!(PaletteLayout::compute(1, None, &m).width, 400);
    }

    #[test]
    fn huge_result_count_is_capped() {
        let m = PaletteMetrics::default();
        let layout = PaletteLayout::compute(usize::MAX, Some(800), &m);
        assert_eq!(layout.rows, 7);
    }

    #[test]
    fn place_centers_below_top_offset() {
        let m = PaletteMetrics::default();
        let layout = PaletteLayout::compute(2, Some(800), &m);
        let rect = layout.place(Size::new(800, 600), &m);
        assert_eq!(rect, Rect::new(200, 50, 400, 70));
    }

    #[test]
    fn place_clips_to_small_host() {
        let m = PaletteMetrics::cells();
        let layout = PaletteLayout::compute(7, Some(30), &m);
        assert_eq!(layout.width, 26);
        let rect = layout.place(Size::new(30, 6), &m);
        assert_eq!(rect, Rect::new(2, 2, 26, 4));
    }

    #[test]
    fn builders_override_defaults() {
        let m = PaletteMetrics::default().with_max_rows(3).with_row_height(1);
        let layout = PaletteLayout::compute(10, None, &m);
        assert_eq!(layout.height, 30 + 3);
    }

    #[test]
    fn cells_preset_fits_a_full_list() {
        let m = PaletteMetrics::cells();
        let layout = PaletteLayout::compute(15, Some(80), &m);
        assert_eq!(layout.height, 4 + 7);
        let rect = layout.place(Size::new(80, 24), &m);
        assert_eq!(rect, Rect::new(10, 2, 60, 11));
    }
}
