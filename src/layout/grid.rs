use super::types::Region;

/// Uniform cell grid. Spans are fractional so a cell may start or end half
/// way through a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub origin_x: f32,
    pub origin_y: f32,
    pub columns: f32,
    pub rows: f32,
    pub col_width: f32,
    pub row_height: f32,
    /// Space between adjacent cells.
    pub gutter: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub col: f32,
    pub row: f32,
    pub col_span: f32,
    pub row_span: f32,
}

impl Placement {
    pub const fn cell(col: f32, row: f32) -> Self {
        Self::span(col, row, 1.0, 1.0)
    }

    pub const fn span(col: f32, row: f32, col_span: f32, row_span: f32) -> Self {
        Self {
            col,
            row,
            col_span,
            row_span,
        }
    }
}

impl GridSpec {
    /// Grid filling `width`×`height` at `(x, y)` with `columns`×`rows`
    /// equal cells separated by `gutter`.
    pub fn fill(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        columns: f32,
        rows: f32,
        gutter: f32,
    ) -> Self {
        let col_width = (width - gutter * (columns - 1.0)) / columns;
        let row_height = (height - gutter * (rows - 1.0)) / rows;
        Self {
            origin_x: x,
            origin_y: y,
            columns,
            rows,
            col_width,
            row_height,
            gutter,
        }
    }

    pub fn width(&self) -> f32 {
        self.columns * self.col_width + (self.columns - 1.0) * self.gutter
    }

    pub fn height(&self) -> f32 {
        self.rows * self.row_height + (self.rows - 1.0) * self.gutter
    }

    pub fn bounds(&self) -> Region {
        Region::new(self.origin_x, self.origin_y, self.width(), self.height())
    }

    pub fn place(&self, placement: Placement) -> Region {
        let x = self.origin_x + placement.col * (self.col_width + self.gutter);
        let y = self.origin_y + placement.row * (self.row_height + self.gutter);
        let width = placement.col_span * self.col_width + (placement.col_span - 1.0) * self.gutter;
        let height =
            placement.row_span * self.row_height + (placement.row_span - 1.0) * self.gutter;
        Region::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_spans_requested_extent() {
        let grid = GridSpec::fill(80.0, 80.0, 1840.0, 1840.0, 2.0, 2.0, 80.0);
        assert_eq!(grid.col_width, 880.0);
        assert_eq!(grid.bounds(), Region::new(80.0, 80.0, 1840.0, 1840.0));
        let br = grid.place(Placement::cell(1.0, 1.0));
        assert_eq!(br, Region::new(1040.0, 1040.0, 880.0, 880.0));
    }

    #[test]
    fn fractional_spans_stay_exact() {
        let grid = GridSpec::fill(0.0, 0.0, 500.0, 300.0, 5.0, 3.0, 0.0);
        let left = grid.place(Placement::span(0.0, 2.0, 2.5, 1.0));
        let right = grid.place(Placement::span(2.5, 2.0, 2.5, 1.0));
        assert_eq!(left.width, 250.0);
        assert_eq!(right.x, 250.0);
        assert_eq!(right.right(), 500.0);
        assert!(!left.overlaps(&right));
    }
}
