//! Moore (8-connected) neighbourhoods on a bounded, non-toroidal lattice.
use crate::grid::Coord;

/// Offsets of the 8 surrounding cells, row by row.
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Returns the in-bounds Moore neighbours of `coord` on a `length × width` board.
///
/// Corners have 3 neighbours, other border cells 5 and interior cells 8. There is no
/// wraparound. On boards thinner than 3 cells the counts shrink accordingly (a 1×1 board
/// has no neighbours at all).
pub fn moore_neighbors(coord: Coord, length: usize, width: usize) -> impl Iterator<Item = Coord> {
    MOORE_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let x = coord.x.checked_add_signed(dx)?;
        let y = coord.y.checked_add_signed(dy)?;
        (x < length && y < width).then_some(Coord::new(x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn neighbors(x: usize, y: usize, length: usize, width: usize) -> Vec<Coord> {
        moore_neighbors(Coord::new(x, y), length, width).collect()
    }

    #[test]
    fn corner_cells() {
        assert_eq!(
            neighbors(0, 0, 3, 3),
            vec![Coord::new(0, 1), Coord::new(1, 0), Coord::new(1, 1)]
        );
        assert_eq!(
            neighbors(2, 2, 3, 3),
            vec![Coord::new(1, 1), Coord::new(1, 2), Coord::new(2, 1)]
        );
        assert_eq!(neighbors(0, 4, 3, 5).len(), 3);
        assert_eq!(neighbors(2, 0, 3, 5).len(), 3);
    }

    #[test]
    fn border_cell() {
        assert_eq!(
            neighbors(0, 1, 3, 3),
            vec![
                Coord::new(0, 0),
                Coord::new(0, 2),
                Coord::new(1, 0),
                Coord::new(1, 1),
                Coord::new(1, 2)
            ]
        );
    }

    #[test]
    fn interior_cell() {
        let all = neighbors(1, 1, 3, 3);
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&Coord::new(1, 1)));
    }

    #[test]
    fn degenerate_boards() {
        assert!(neighbors(0, 0, 1, 1).is_empty());
        assert_eq!(neighbors(0, 0, 1, 3).len(), 1);
        assert_eq!(neighbors(0, 1, 1, 3).len(), 2);
    }

    #[test]
    fn exhaustive_counts_on_small_boards() {
        for length in 3..=6 {
            for width in 3..=6 {
                for x in 0..length {
                    for y in 0..width {
                        let on_x_edge = x == 0 || x == length - 1;
                        let on_y_edge = y == 0 || y == width - 1;
                        let expected = match (on_x_edge, on_y_edge) {
                            (true, true) => 3,
                            (true, false) | (false, true) => 5,
                            (false, false) => 8,
                        };
                        assert_eq!(
                            neighbors(x, y, length, width).len(),
                            expected,
                            "cell ({x}, {y}) on {length}x{width}"
                        );
                    }
                }
            }
        }
    }

    proptest! {
        #[test]
        fn neighbors_are_adjacent_distinct_and_in_bounds(
            length in 1usize..40,
            width in 1usize..40,
            x_frac in 0.0f64..1.0,
            y_frac in 0.0f64..1.0,
        ) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let coord = Coord::new(
                (x_frac * length as f64) as usize,
                (y_frac * width as f64) as usize,
            );
            let found = neighbors(coord.x, coord.y, length, width);
            let mut deduped = found.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), found.len());
            for n in &found {
                prop_assert!(n.x < length && n.y < width);
                prop_assert!(n.x.abs_diff(coord.x) <= 1 && n.y.abs_diff(coord.y) <= 1);
                prop_assert_ne!(*n, coord);
            }
            // Neighbourhood is symmetric.
            for n in &found {
                prop_assert!(neighbors(n.x, n.y, length, width).contains(&coord));
            }
        }
    }
}
