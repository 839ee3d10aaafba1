//! Grid-maze generation and ASCII rendering.
//!
//! A rows × columns grid graph enumerates its vertices row-major. Each cell
//! emits its rightward edge and then its downward edge where they exist, so
//! the edge count is `vertices * 2 - rows - columns`. Solving the grid's MST
//! and drawing the surviving edges yields a maze.

use std::path::Path;

use rand::Rng;

use crate::{
    error::EngineError,
    graph::{Edge, WeightedGraph},
    io::write_graph_file,
};

/// Exclusive upper bound for generated edge weights.
pub const MAXIMUM_RANDOM: i32 = 100;

const EMPTY_FIELD: u8 = b' ';
const HORIZONTAL_EDGE: u8 = b'-';
const VERTICAL_EDGE: u8 = b'|';
const VERTEX: u8 = b'+';

/// Generates a rows × columns grid graph with uniform random edge weights
/// in `[0, MAXIMUM_RANDOM)`.
#[must_use]
pub fn generate_grid_graph<R: Rng>(rows: usize, columns: usize, rng: &mut R) -> WeightedGraph {
    let vertices = rows * columns;
    let mut edges = Vec::with_capacity((vertices * 2).saturating_sub(rows + columns));

    for row in 0..rows {
        for column in 0..columns {
            let vertex = row * columns + column;
            if column != columns - 1 {
                edges.push(Edge::new(
                    vertex,
                    vertex + 1,
                    rng.gen_range(0..MAXIMUM_RANDOM),
                ));
            }
            if row != rows - 1 {
                edges.push(Edge::new(
                    vertex,
                    vertex + columns,
                    rng.gen_range(0..MAXIMUM_RANDOM),
                ));
            }
        }
    }

    WeightedGraph::from_edges(vertices, &edges)
}

/// Generates a grid maze and writes it to `path` in the graph-file format.
///
/// # Errors
/// Returns [`EngineError::GraphFile`] when the file cannot be written.
pub fn write_maze_file<R: Rng>(
    path: &Path,
    rows: usize,
    columns: usize,
    rng: &mut R,
) -> Result<(), EngineError> {
    let graph = generate_grid_graph(rows, columns, rng);
    write_graph_file(path, &graph)
}

/// Renders `mst` as an ASCII maze over a rows × columns grid.
///
/// The output grid is `(2 * rows - 1) × (2 * columns - 1)` characters:
/// every even row/column intersection is a vertex, MST edges fill the cell
/// between their endpoints, everything else stays blank. Self-edges (the
/// Prim root sentinel) and edges that do not fit the grid are skipped.
#[must_use]
pub fn render_maze(mst: &WeightedGraph, rows: usize, columns: usize) -> String {
    if rows == 0 || columns == 0 {
        return String::new();
    }

    let maze_rows = rows * 2 - 1;
    let maze_columns = columns * 2 - 1;
    let mut cells = vec![vec![EMPTY_FIELD; maze_columns]; maze_rows];

    for (row, line) in cells.iter_mut().enumerate() {
        for (column, cell) in line.iter_mut().enumerate() {
            if row % 2 == 0 && column % 2 == 0 {
                *cell = VERTEX;
            }
        }
    }

    for edge in mst.iter_edges() {
        if edge.from == edge.to {
            continue;
        }
        let (from, to) = if edge.from < edge.to {
            (edge.from, edge.to)
        } else {
            (edge.to, edge.from)
        };

        let row = from / columns + to / columns;
        let column = if row % 2 == 1 {
            // Odd maze rows hold the vertical connections.
            (to % columns) * 2
        } else {
            match (to % columns).checked_sub(1) {
                Some(left) => left * 2 + 1,
                None => continue,
            }
        };
        if row < maze_rows && column < maze_columns {
            cells[row][column] = if row % 2 == 1 {
                VERTICAL_EDGE
            } else {
                HORIZONTAL_EDGE
            };
        }
    }

    let mut text = String::with_capacity(maze_rows * (maze_columns + 1));
    for line in cells {
        text.push_str(&String::from_utf8_lossy(&line));
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::SmallRng, SeedableRng};
    use rstest::rstest;

    #[rstest]
    #[case::two_by_three(2, 3)]
    #[case::five_by_five(5, 5)]
    #[case::single_row(1, 6)]
    #[case::single_column(4, 1)]
    fn grid_has_the_expected_edge_count(#[case] rows: usize, #[case] columns: usize) {
        let mut rng = SmallRng::seed_from_u64(7);
        let graph = generate_grid_graph(rows, columns, &mut rng);

        let vertices = rows * columns;
        assert_eq!(graph.vertices(), vertices);
        assert_eq!(graph.edge_count(), vertices * 2 - rows - columns);
    }

    #[test]
    fn grid_edges_connect_neighbouring_cells() {
        let mut rng = SmallRng::seed_from_u64(11);
        let columns = 4;
        let graph = generate_grid_graph(3, columns, &mut rng);

        for edge in graph.iter_edges() {
            let gap = edge.to - edge.from;
            assert!(gap == 1 || gap == columns);
            if gap == 1 {
                assert_ne!(edge.from % columns, columns - 1);
            }
            assert!((0..MAXIMUM_RANDOM).contains(&edge.weight));
        }
    }

    #[test]
    fn renders_a_two_by_two_spanning_tree() {
        let mst = WeightedGraph::from_edges(
            4,
            &[Edge::new(0, 1, 1), Edge::new(0, 2, 2), Edge::new(2, 3, 3)],
        );
        assert_eq!(render_maze(&mst, 2, 2), "+-+\n|  \n+-+\n");
    }

    #[test]
    fn sentinel_self_edge_is_skipped() {
        let with_sentinel = WeightedGraph::from_edges(
            4,
            &[
                Edge::new(0, 0, 0),
                Edge::new(0, 1, 1),
                Edge::new(0, 2, 2),
                Edge::new(2, 3, 3),
            ],
        );
        let without = WeightedGraph::from_edges(
            4,
            &[Edge::new(0, 1, 1), Edge::new(0, 2, 2), Edge::new(2, 3, 3)],
        );
        assert_eq!(render_maze(&with_sentinel, 2, 2), render_maze(&without, 2, 2));
    }

    #[test]
    fn reversed_endpoints_render_identically() {
        let forward = WeightedGraph::from_edges(2, &[Edge::new(0, 1, 5)]);
        let backward = WeightedGraph::from_edges(2, &[Edge::new(1, 0, 5)]);
        assert_eq!(render_maze(&forward, 1, 2), render_maze(&backward, 1, 2));
    }
}
