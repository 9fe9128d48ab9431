/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts. A full 255x255 board fits.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// `ndarray` index of a cell, boards are stored `[x, y]`.
pub(crate) const fn grid_index((x, y): Coord2) -> [usize; 2] {
    [x as usize, y as usize]
}

/// Up, down, left, right. Diagonals never count as adjacent.
const DISPLACEMENTS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// In-bounds orthogonal neighbors of `center` on a `bounds`-sized board.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    let (x, y) = center;
    let (width, height) = bounds;

    DISPLACEMENTS.into_iter().filter_map(move |(dx, dy)| {
        let next = (x.checked_add_signed(dx)?, y.checked_add_signed(dy)?);
        (next.0 < width && next.1 < height).then_some(next)
    })
}
