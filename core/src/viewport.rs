use serde::{Deserialize, Serialize};

use crate::*;

/// Rendered cell edge in CSS pixels.
pub const CELL_SIZE_PX: f64 = 32.;

/// Visible window size in cells. Both axes are odd so one cell is always exactly centered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    width: Coord,
    height: Coord,
}

impl ViewportSize {
    pub const DEFAULT: Self = Self::new(31, 31);

    /// Rounds even extents up to the next odd one, and keeps both within `1..=DOMAIN_WIDTH`.
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self {
            width: normalize_extent(width),
            height: normalize_extent(height),
        }
    }

    /// Number of cells needed to cover a container of the given pixel size.
    pub fn from_pixels(width_px: f64, height_px: f64, cell_px: f64) -> Self {
        let cells = |px: f64| -> Coord {
            if cell_px > 0. && px.is_finite() {
                (px / cell_px).ceil().clamp(1., DOMAIN_WIDTH as f64) as Coord
            } else {
                1
            }
        };
        Self::new(cells(width_px), cells(height_px))
    }

    pub const fn width(self) -> Coord {
        self.width
    }

    pub const fn height(self) -> Coord {
        self.height
    }

    pub const fn half_width(self) -> Coord {
        self.width / 2
    }

    pub const fn half_height(self) -> Coord {
        self.height / 2
    }

}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn normalize_extent(extent: Coord) -> Coord {
    let extent = if extent < 1 { 1 } else { extent };
    let extent = if extent % 2 == 0 { extent + 1 } else { extent };
    if extent > DOMAIN_WIDTH {
        DOMAIN_WIDTH
    } else {
        extent
    }
}

/// How one axis reacted to a pan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisMove {
    Unchanged,
    Moved,
    /// The target would expose cells outside the domain, the axis kept its offset.
    Rejected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanOutcome {
    pub x: AxisMove,
    pub y: AxisMove,
}

impl PanOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self.x, AxisMove::Moved) || matches!(self.y, AxisMove::Moved)
    }
}

/// Moves `current` to `target` if it fits inside `min..=max`.
fn move_axis(current: &mut Coord, target: i64, min: Coord, max: Coord) -> AxisMove {
    if target < i64::from(min) || target > i64::from(max) {
        AxisMove::Rejected
    } else if target == i64::from(*current) {
        AxisMove::Unchanged
    } else {
        *current = target as Coord;
        AxisMove::Moved
    }
}

/// Window onto the world. A screen cell `(vx, vy)` relative to the center shows world cell `(vx - ox, vy - oy)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    size: ViewportSize,
    offset: (Coord, Coord),
}

impl Viewport {
    pub fn new(size: ViewportSize) -> Self {
        let mut viewport = Self {
            size,
            offset: (0, 0),
        };
        viewport.clamp_offset();
        viewport
    }

    pub const fn size(&self) -> ViewportSize {
        self.size
    }

    pub const fn offset(&self) -> (Coord, Coord) {
        self.offset
    }

    /// World coordinates shown at the center cell.
    pub const fn center(&self) -> Coords {
        Coords::new(-self.offset.0, -self.offset.1)
    }

    /// Allowed offset range per axis, `(x_range, y_range)`.
    pub const fn offset_bounds(&self) -> ((Coord, Coord), (Coord, Coord)) {
        let half_width = self.size.half_width();
        let half_height = self.size.half_height();
        (
            (MIN_COORD + half_width, MAX_COORD - half_width),
            (MIN_COORD + half_height, MAX_COORD - half_height),
        )
    }

    pub fn resize(&mut self, size: ViewportSize) {
        if self.size != size {
            log::debug!("viewport resized: {}x{}", size.width(), size.height());
            self.size = size;
            self.clamp_offset();
        }
    }

    /// Translates the offset by whole cells.
    pub fn pan(&mut self, delta: (Coord, Coord)) -> PanOutcome {
        self.pan_from(self.offset, delta)
    }

    /// Moves to `origin + delta`, dropping any axis that would leave the domain.
    pub fn pan_from(&mut self, origin: (Coord, Coord), delta: (Coord, Coord)) -> PanOutcome {
        let ((min_x, max_x), (min_y, max_y)) = self.offset_bounds();
        let target_x = i64::from(origin.0) + i64::from(delta.0);
        let target_y = i64::from(origin.1) + i64::from(delta.1);
        PanOutcome {
            x: move_axis(&mut self.offset.0, target_x, min_x, max_x),
            y: move_axis(&mut self.offset.1, target_y, min_y, max_y),
        }
    }

    /// Centers `coords`. Near the domain edge the axis that would expose outside cells keeps its offset.
    pub fn jump_to(&mut self, coords: Coords) -> Result<PanOutcome> {
        let coords = coords.validate()?;
        let ((min_x, max_x), (min_y, max_y)) = self.offset_bounds();
        let outcome = PanOutcome {
            x: move_axis(&mut self.offset.0, -i64::from(coords.x), min_x, max_x),
            y: move_axis(&mut self.offset.1, -i64::from(coords.y), min_y, max_y),
        };
        log::debug!("jump to {}, offset: {:?}", coords, self.offset);
        Ok(outcome)
    }

    pub fn contains(&self, coords: Coords) -> bool {
        let vx = i64::from(coords.x) + i64::from(self.offset.0);
        let vy = i64::from(coords.y) + i64::from(self.offset.1);
        vx.abs() <= i64::from(self.size.half_width()) && vy.abs() <= i64::from(self.size.half_height())
    }

    /// Visible world coordinates in row-major order, top row first.
    pub fn visible_coordinates(&self) -> VisibleIter {
        VisibleIter::new(*self)
    }

    /// Like [`Viewport::visible_coordinates`], paired with whether each cell lies inside the domain.
    pub fn visible_cells(&self) -> impl Iterator<Item = (Coords, bool)> + use<> {
        self.visible_coordinates()
            .map(|coords| (coords, coords.in_domain()))
    }

    fn clamp_offset(&mut self) {
        let ((min_x, max_x), (min_y, max_y)) = self.offset_bounds();
        self.offset = (
            self.offset.0.clamp(min_x, max_x),
            self.offset.1.clamp(min_y, max_y),
        );
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportSize::DEFAULT)
    }
}

#[derive(Clone, Debug)]
pub struct VisibleIter {
    viewport: Viewport,
    vx: Coord,
    vy: Coord,
}

impl VisibleIter {
    fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            vx: -viewport.size.half_width(),
            vy: -viewport.size.half_height(),
        }
    }
}

impl Iterator for VisibleIter {
    type Item = Coords;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.viewport.size;
        if self.vy > size.half_height() {
            return None;
        }

        let (ox, oy) = self.viewport.offset;
        let item = Coords::new(self.vx - ox, self.vy - oy);

        self.vx += 1;
        if self.vx > size.half_width() {
            self.vx = -size.half_width();
            self.vy += 1;
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.viewport.size;
        if self.vy > size.half_height() {
            return (0, Some(0));
        }
        let full_rows = (size.half_height() - self.vy) as usize;
        let in_row = (size.half_width() - self.vx + 1) as usize;
        let remaining = full_rows * size.width() as usize + in_row;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for VisibleIter {}

/// Pointer drag in progress. Every update pans from the offset the drag started at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragGesture {
    origin: (Coord, Coord),
    start: (f64, f64),
    cell_px: f64,
}

impl DragGesture {
    pub fn begin(viewport: &Viewport, pointer: (f64, f64), cell_px: f64) -> Self {
        Self {
            origin: viewport.offset(),
            start: pointer,
            cell_px,
        }
    }

    /// Whole-cell travel since the drag began.
    pub fn delta(&self, pointer: (f64, f64)) -> (Coord, Coord) {
        let cells = |from: f64, to: f64| -> Coord {
            if self.cell_px > 0. {
                ((to - from) / self.cell_px)
                    .round()
                    .clamp(-(DOMAIN_WIDTH as f64), DOMAIN_WIDTH as f64) as Coord
            } else {
                0
            }
        };
        (
            cells(self.start.0, pointer.0),
            cells(self.start.1, pointer.1),
        )
    }

    pub fn update(&self, viewport: &mut Viewport, pointer: (f64, f64)) -> PanOutcome {
        viewport.pan_from(self.origin, self.delta(pointer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_within_bounds(viewport: &Viewport) {
        let (ox, oy) = viewport.offset();
        let size = viewport.size();
        assert!(MIN_COORD + size.half_width() <= ox && ox <= MAX_COORD - size.half_width());
        assert!(MIN_COORD + size.half_height() <= oy && oy <= MAX_COORD - size.half_height());
        assert!(viewport.visible_cells().all(|(_, in_domain)| in_domain));
    }

    #[test]
    fn sizes_are_normalized_to_odd() {
        let size = ViewportSize::new(30, 17);
        assert_eq!((size.width(), size.height()), (31, 17));
        assert_eq!((size.half_width(), size.half_height()), (15, 8));

        let size = ViewportSize::new(0, 40_000);
        assert_eq!((size.width(), size.height()), (1, DOMAIN_WIDTH));
    }

    #[test]
    fn sizes_from_pixels_round_up() {
        let size = ViewportSize::from_pixels(1280., 720., CELL_SIZE_PX);
        assert_eq!((size.width(), size.height()), (41, 23));
        let size = ViewportSize::from_pixels(1000., 10., CELL_SIZE_PX);
        assert_eq!((size.width(), size.height()), (33, 1));
    }

    #[test]
    fn visible_coordinates_are_row_major() {
        let mut viewport = Viewport::new(ViewportSize::new(3, 3));
        viewport.pan((-10, 4));

        let cells: Vec<_> = viewport.visible_coordinates().collect();

        assert_eq!(viewport.visible_coordinates().len(), 9);
        assert_eq!(cells[0], Coords::new(9, -5));
        assert_eq!(cells[1], Coords::new(10, -5));
        assert_eq!(cells[3], Coords::new(9, -4));
        assert_eq!(cells[4], viewport.center());
        assert_eq!(cells[8], Coords::new(11, -3));
        assert!(cells.iter().all(|&coords| viewport.contains(coords)));
        assert!(!viewport.contains(Coords::new(12, -4)));
    }

    #[test]
    fn pan_rejects_only_the_offending_axis() {
        let size = ViewportSize::new(5, 5);
        let mut viewport = Viewport::new(size);
        viewport.jump_to(Coords::new(-9_998, 0)).unwrap();
        assert_eq!(viewport.offset(), (9_998, 0));

        let outcome = viewport.pan((1, 3));
        assert_eq!(outcome.x, AxisMove::Rejected);
        assert_eq!(outcome.y, AxisMove::Moved);
        assert_eq!(viewport.offset(), (9_998, 3));
        assert_within_bounds(&viewport);

        let outcome = viewport.pan((0, 0));
        assert!(!outcome.has_update());
    }

    #[test]
    fn jump_centers_and_drops_axes_past_edges() {
        let mut viewport = Viewport::new(ViewportSize::new(31, 31));
        let outcome = viewport.jump_to(Coords::new(100, -200)).unwrap();
        assert_eq!(viewport.center(), Coords::new(100, -200));
        assert!(outcome.has_update());

        let outcome = viewport.jump_to(Coords::new(MAX_COORD, 0)).unwrap();
        assert_eq!(outcome.x, AxisMove::Rejected);
        assert_eq!(outcome.y, AxisMove::Moved);
        assert_eq!(viewport.offset(), (-100, 0));
        assert_within_bounds(&viewport);

        let outcome = viewport.jump_to(Coords::new(MAX_COORD - 15, MIN_COORD)).unwrap();
        assert_eq!(outcome.x, AxisMove::Moved);
        assert_eq!(outcome.y, AxisMove::Rejected);
        assert_eq!(viewport.center(), Coords::new(MAX_COORD - 15, 0));
        assert_within_bounds(&viewport);

        let before = viewport;
        assert_eq!(
            viewport.jump_to(Coords::new(10_001, 0)),
            Err(GameError::OutOfDomain)
        );
        assert_eq!(viewport, before);
    }

    #[test]
    fn resize_keeps_window_inside_domain() {
        let mut viewport = Viewport::new(ViewportSize::new(3, 3));
        viewport.jump_to(Coords::new(MAX_COORD - 1, MAX_COORD - 1)).unwrap();
        assert_eq!(viewport.offset(), (1 - MAX_COORD, 1 - MAX_COORD));
        viewport.resize(ViewportSize::new(101, 51));
        assert_within_bounds(&viewport);
    }

    #[test]
    fn arbitrary_pans_never_leave_bounds() {
        let mut viewport = Viewport::new(ViewportSize::new(41, 23));
        let deltas = [
            (7_000, -3),
            (5_000, 9_000),
            (-40_000, 1),
            (i32::MAX, i32::MIN),
            (-19_000, -19_000),
            (9_979, 12),
        ];
        for delta in deltas {
            viewport.pan(delta);
            assert_within_bounds(&viewport);
        }
    }

    #[test]
    fn drag_pans_from_origin_in_whole_cells() {
        let mut viewport = Viewport::new(ViewportSize::new(5, 5));
        let drag = DragGesture::begin(&viewport, (100., 100.), CELL_SIZE_PX);

        assert_eq!(drag.delta((115., 90.)), (0, 0));
        assert_eq!(drag.delta((149., 35.)), (2, -2));

        drag.update(&mut viewport, (132., 100.));
        drag.update(&mut viewport, (164., 68.));
        assert_eq!(viewport.offset(), (2, -1));
    }

    #[test]
    fn drag_past_edge_holds_axis_until_pointer_returns() {
        let mut viewport = Viewport::new(ViewportSize::new(5, 5));
        viewport.jump_to(Coords::new(-9_996, 0)).unwrap();
        assert_eq!(viewport.offset(), (9_996, 0));
        let drag = DragGesture::begin(&viewport, (0., 0.), CELL_SIZE_PX);

        // three cells right would need offset 9_999, one past the bound
        let outcome = drag.update(&mut viewport, (96., 64.));
        assert_eq!(outcome.x, AxisMove::Rejected);
        assert_eq!(outcome.y, AxisMove::Moved);
        assert_eq!(viewport.offset(), (9_996, 2));
        assert_within_bounds(&viewport);

        let outcome = drag.update(&mut viewport, (320., 32.));
        assert_eq!(outcome.x, AxisMove::Rejected);
        assert_eq!(viewport.offset(), (9_996, 1));

        // back within bounds in the same gesture, measured from the press origin
        let outcome = drag.update(&mut viewport, (64., 32.));
        assert_eq!(outcome.x, AxisMove::Moved);
        assert_eq!(outcome.y, AxisMove::Unchanged);
        assert_eq!(viewport.offset(), (9_998, 1));
        assert_within_bounds(&viewport);
    }
}
