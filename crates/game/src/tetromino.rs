//! Static definitions of the seven playable shapes.
//!
//! Each shape is a 4x4 matrix whose non-zero cells carry the shape id
//! (1..=7). The id doubles as the color index on the client side, so a
//! locked cell remembers which kind of piece it came from.

/// Side length of a piece window.
pub const PIECE_SIZE: usize = 4;

/// A piece as a flattened row-major 4x4 window.
pub type PieceCells = [u8; PIECE_SIZE * PIECE_SIZE];

/// The seven tetromino kinds: I, O, T, S, Z, J, L.
pub const TETROMINOES: [[[u8; PIECE_SIZE]; PIECE_SIZE]; 7] = [
    // I
    [
        [0, 0, 0, 0],
        [1, 1, 1, 1],
        [0, 0, 0, 0],
        [0, 0, 0, 0],
    ],
    // O
    [
        [0, 0, 0, 0],
        [0, 2, 2, 0],
        [0, 2, 2, 0],
        [0, 0, 0, 0],
    ],
    // T
    [
        [0, 0, 0, 0],
        [3, 3, 3, 0],
        [0, 3, 0, 0],
        [0, 0, 0, 0],
    ],
    // S
    [
        [0, 0, 0, 0],
        [0, 4, 4, 0],
        [4, 4, 0, 0],
        [0, 0, 0, 0],
    ],
    // Z
    [
        [0, 0, 0, 0],
        [5, 5, 0, 0],
        [0, 5, 5, 0],
        [0, 0, 0, 0],
    ],
    // J
    [
        [0, 0, 0, 0],
        [6, 6, 6, 0],
        [0, 0, 6, 0],
        [0, 0, 0, 0],
    ],
    // L
    [
        [0, 0, 0, 0],
        [7, 7, 7, 0],
        [7, 0, 0, 0],
        [0, 0, 0, 0],
    ],
];

/// Flattens a 4x4 matrix into a row-major cell array.
pub fn flatten(matrix: &[[u8; PIECE_SIZE]; PIECE_SIZE]) -> PieceCells {
    let mut out = [0u8; PIECE_SIZE * PIECE_SIZE];
    for (y, row) in matrix.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            out[y * PIECE_SIZE + x] = cell;
        }
    }
    out
}

/// Rotates a flattened 4x4 window clockwise.
///
/// The transform is `out[x*4 + (3-y)] = in[y*4 + x]` for the whole window,
/// applied uniformly to every shape. Four applications return the input.
pub fn rotate_cw(cells: &PieceCells) -> PieceCells {
    let mut out = [0u8; PIECE_SIZE * PIECE_SIZE];
    for y in 0..PIECE_SIZE {
        for x in 0..PIECE_SIZE {
            out[x * PIECE_SIZE + (PIECE_SIZE - 1 - y)] = cells[y * PIECE_SIZE + x];
        }
    }
    out
}

/// Derives the shape id from a cell window: the first non-zero value.
///
/// Returns 0 for an empty window, which never identifies a real shape.
pub fn piece_id(cells: &PieceCells) -> u8 {
    cells.iter().copied().find(|&v| v != 0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_is_row_major() {
        let cells = flatten(&TETROMINOES[0]);
        // I piece occupies the whole second row of the window
        assert_eq!(cells[4..8], [1, 1, 1, 1]);
        assert!(cells[..4].iter().all(|&c| c == 0));
        assert!(cells[8..].iter().all(|&c| c == 0));
    }

    #[test]
    fn each_shape_has_four_cells_with_its_own_id() {
        for (i, matrix) in TETROMINOES.iter().enumerate() {
            let id = (i + 1) as u8;
            let cells = flatten(matrix);
            assert_eq!(cells.iter().filter(|&&c| c != 0).count(), 4);
            assert!(cells.iter().all(|&c| c == 0 || c == id));
            assert_eq!(piece_id(&cells), id);
        }
    }

    #[test]
    fn rotation_four_times_is_identity() {
        for matrix in &TETROMINOES {
            let original = flatten(matrix);
            let mut cells = original;
            for _ in 0..4 {
                cells = rotate_cw(&cells);
            }
            assert_eq!(cells, original);
        }
    }

    #[test]
    fn rotation_preserves_cell_count() {
        for matrix in &TETROMINOES {
            let cells = flatten(matrix);
            let rotated = rotate_cw(&cells);
            assert_eq!(
                rotated.iter().filter(|&&c| c != 0).count(),
                cells.iter().filter(|&&c| c != 0).count()
            );
        }
    }

    #[test]
    fn piece_id_of_empty_window_is_zero() {
        assert_eq!(piece_id(&[0u8; 16]), 0);
    }
}
