//! Scratch surface coverage tracking
//!
//! The surface is a grid of unit cells. A scratch uncovers every cell whose
//! centre lies inside the brush disk. The uncovered count is maintained on
//! every reveal, so reading the fraction never rescans the grid.

use serde::{Deserialize, Serialize};

/// Fraction that must be strictly exceeded before a ticket is revealed
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.60;

#[derive(Debug, Clone)]
pub struct CoverageSurface {
    width: usize,
    height: usize,
    uncovered: Vec<bool>,
    uncovered_count: usize,
    threshold: f64,
    revealed: bool,
}

/// Snapshot handed back after each scratch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoverageProgress {
    pub uncovered_fraction: f64,
    pub newly_uncovered: usize,
    pub revealed: bool,
    /// True only for the scratch that crossed the threshold
    pub just_revealed: bool,
}

impl CoverageSurface {
    /// Fully covered surface using [`DEFAULT_REVEAL_THRESHOLD`]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_threshold(width, height, DEFAULT_REVEAL_THRESHOLD)
    }

    pub fn with_threshold(width: u32, height: u32, threshold: f64) -> Self {
        let width = width as usize;
        let height = height as usize;
        Self {
            width,
            height,
            uncovered: vec![false; width * height],
            uncovered_count: 0,
            threshold,
            revealed: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_cells(&self) -> usize {
        self.uncovered.len()
    }

    pub fn uncovered_cells(&self) -> usize {
        self.uncovered_count
    }

    pub fn is_uncovered(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.uncovered[y * self.width + x]
    }

    /// Uncover the disk of `radius` around `(x, y)`, clipped to the surface.
    ///
    /// Returns the number of cells this call uncovered. Non-finite input
    /// and negative radii uncover nothing.
    pub fn reveal_disk(&mut self, x: f64, y: f64, radius: f64) -> usize {
        if self.uncovered.is_empty()
            || !(x.is_finite() && y.is_finite() && radius.is_finite())
            || radius < 0.0
        {
            return 0;
        }

        // cell i has its centre at i + 0.5
        let Some((col_lo, col_hi)) = clip_span(x, radius, self.width) else {
            return 0;
        };
        let Some((row_lo, row_hi)) = clip_span(y, radius, self.height) else {
            return 0;
        };

        let radius_sq = radius * radius;
        let mut newly = 0;
        for row in row_lo..=row_hi {
            let dy = row as f64 + 0.5 - y;
            let base = row * self.width;
            for col in col_lo..=col_hi {
                let dx = col as f64 + 0.5 - x;
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let cell = &mut self.uncovered[base + col];
                if !*cell {
                    *cell = true;
                    newly += 1;
                }
            }
        }

        self.uncovered_count += newly;
        if !self.revealed && self.uncovered_fraction() > self.threshold {
            self.revealed = true;
            tracing::info!(
                "Scratch surface revealed at {:.1}% uncovered",
                self.uncovered_fraction() * 100.0
            );
        }
        newly
    }

    /// Reveal a disk and describe the resulting state
    pub fn scratch(&mut self, x: f64, y: f64, radius: f64) -> CoverageProgress {
        let was_revealed = self.revealed;
        let newly_uncovered = self.reveal_disk(x, y, radius);
        CoverageProgress {
            uncovered_fraction: self.uncovered_fraction(),
            newly_uncovered,
            revealed: self.revealed,
            just_revealed: self.revealed && !was_revealed,
        }
    }

    pub fn uncovered_fraction(&self) -> f64 {
        if self.uncovered.is_empty() {
            return 0.0;
        }
        self.uncovered_count as f64 / self.uncovered.len() as f64
    }

    /// Latched: stays true once the threshold has been crossed
    pub fn is_reveal_threshold_met(&self) -> bool {
        self.revealed
    }
}

/// Inclusive index range of cells whose centre lies within `radius` of
/// `centre` along one axis, clipped to `0..len`
fn clip_span(centre: f64, radius: f64, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let lo = (centre - radius - 0.5).ceil().max(0.0);
    let hi = (centre + radius - 0.5).floor().min((len - 1) as f64);
    if hi < 0.0 || lo > hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Uncover exactly `cells` cells of a 100x1 strip, one cell per disk
    fn strip_with_cells(cells: usize) -> CoverageSurface {
        let mut surface = CoverageSurface::new(100, 1);
        for i in 0..cells {
            assert_eq!(surface.reveal_disk(i as f64 + 0.5, 0.5, 0.5), 1);
        }
        surface
    }

    #[test]
    fn test_new_surface_is_covered() {
        let surface = CoverageSurface::new(400, 300);
        assert_eq!(surface.total_cells(), 120_000);
        assert_eq!(surface.uncovered_fraction(), 0.0);
        assert!(!surface.is_reveal_threshold_met());
    }

    #[test]
    fn test_threshold_boundaries() {
        assert!(strip_with_cells(61).is_reveal_threshold_met());
        assert!(!strip_with_cells(59).is_reveal_threshold_met());
        // strictly greater than 60%
        assert!(!strip_with_cells(60).is_reveal_threshold_met());
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut surface = strip_with_cells(30);
        let before = surface.uncovered_fraction();
        assert_eq!(surface.reveal_disk(10.5, 0.5, 0.5), 0);
        assert_eq!(surface.uncovered_fraction(), before);
        assert_eq!(surface.uncovered_cells(), 30);
    }

    #[test]
    fn test_disk_geometry() {
        let mut surface = CoverageSurface::new(10, 10);
        // radius 1 around a cell centre: the cell plus its 4 neighbours
        assert_eq!(surface.reveal_disk(5.5, 5.5, 1.0), 5);
        assert!(surface.is_uncovered(5, 5));
        assert!(surface.is_uncovered(4, 5));
        assert!(surface.is_uncovered(5, 6));
        assert!(!surface.is_uncovered(4, 4));
    }

    #[test]
    fn test_disk_clipped_at_bounds() {
        let mut surface = CoverageSurface::new(10, 10);
        // centred on the corner, only the in-bounds quarter counts
        let newly = surface.reveal_disk(0.0, 0.0, 3.0);
        assert_eq!(newly, 8);
        assert!(surface.is_uncovered(0, 0));
        assert!(surface.is_uncovered(2, 0));
        assert!(!surface.is_uncovered(2, 2));

        assert_eq!(surface.reveal_disk(-50.0, -50.0, 5.0), 0);
        assert_eq!(surface.reveal_disk(500.0, 5.0, 30.0), 0);
        assert_eq!(surface.reveal_disk(f64::NAN, 5.0, 30.0), 0);
        assert_eq!(surface.reveal_disk(5.0, 5.0, -1.0), 0);
        assert_eq!(surface.uncovered_cells(), 8);
    }

    #[test]
    fn test_large_disk_uncovers_everything() {
        let mut surface = CoverageSurface::new(20, 15);
        let progress = surface.scratch(10.0, 7.5, 1_000.0);
        assert_eq!(progress.uncovered_fraction, 1.0);
        assert!(progress.revealed);
        assert!(progress.just_revealed);

        let again = surface.scratch(10.0, 7.5, 1_000.0);
        assert_eq!(again.newly_uncovered, 0);
        assert!(again.revealed);
        assert!(!again.just_revealed);
    }

    #[test]
    fn test_empty_surface() {
        let mut surface = CoverageSurface::new(0, 10);
        assert_eq!(surface.reveal_disk(0.0, 0.0, 10.0), 0);
        assert_eq!(surface.uncovered_fraction(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_reveal_is_monotonic(
            strokes in prop::collection::vec((-20.0f64..60.0, -20.0f64..50.0, 0.0f64..25.0), 1..60)
        ) {
            let mut surface = CoverageSurface::new(40, 30);
            let mut last_fraction = 0.0;
            let mut was_revealed = false;
            for (x, y, r) in strokes {
                surface.reveal_disk(x, y, r);
                let fraction = surface.uncovered_fraction();
                prop_assert!((0.0..=1.0).contains(&fraction));
                prop_assert!(fraction >= last_fraction);
                if was_revealed {
                    prop_assert!(surface.is_reveal_threshold_met());
                }
                was_revealed = surface.is_reveal_threshold_met();
                last_fraction = fraction;
            }
        }

        #[test]
        fn prop_count_matches_grid(
            strokes in prop::collection::vec((0.0f64..40.0, 0.0f64..30.0, 0.0f64..8.0), 1..30)
        ) {
            let mut surface = CoverageSurface::new(40, 30);
            for (x, y, r) in strokes {
                surface.reveal_disk(x, y, r);
            }
            let counted = (0..30)
                .flat_map(|y| (0..40).map(move |x| (x, y)))
                .filter(|&(x, y)| surface.is_uncovered(x, y))
                .count();
            prop_assert_eq!(counted, surface.uncovered_cells());
        }
    }
}
