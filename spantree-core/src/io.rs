//! Graph-file reading and writing.
//!
//! The format is whitespace-separated decimal ASCII: a `vertices edges`
//! header followed by one `from to weight` triple per edge. Only rank 0
//! ever touches these files.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use crate::{
    error::EngineError,
    graph::{Edge, WeightedGraph},
};

/// Reads a graph file.
///
/// # Errors
/// Returns [`EngineError::GraphFile`] when the file cannot be opened or
/// read, and [`EngineError::GraphFormat`] when its contents do not follow
/// the expected layout.
pub fn read_graph_file(path: &Path) -> Result<WeightedGraph, EngineError> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|source| EngineError::GraphFile {
            path: path.to_path_buf(),
            source,
        })?;

    parse_graph(&contents, path)
}

fn parse_graph(contents: &str, path: &Path) -> Result<WeightedGraph, EngineError> {
    let format_error = |reason| EngineError::GraphFormat {
        path: path.to_path_buf(),
        reason,
    };
    let mut tokens = contents.split_whitespace();
    let mut next_number = |reason| {
        tokens
            .next()
            .ok_or(reason)
            .and_then(|token| token.parse::<i64>().map_err(|_| reason))
    };

    let vertices = next_number("missing or invalid vertex count").map_err(format_error)?;
    let edges = next_number("missing or invalid edge count").map_err(format_error)?;
    if vertices < 0 || edges < 0 {
        return Err(format_error("negative count in header"));
    }
    let vertices = vertices as usize;

    let mut graph = WeightedGraph::new(vertices, edges as usize);
    for index in 0..graph.edge_count() {
        let from = next_number("truncated edge list").map_err(format_error)?;
        let to = next_number("truncated edge list").map_err(format_error)?;
        let weight = next_number("truncated edge list").map_err(format_error)?;

        let in_range = |endpoint: i64| endpoint >= 0 && (endpoint as usize) < vertices;
        if !in_range(from) || !in_range(to) {
            return Err(format_error("edge endpoint out of range"));
        }
        graph.set_edge(
            index,
            Edge::new(from as usize, to as usize, weight as i32),
        );
    }

    Ok(graph)
}

/// Writes `graph` to `path` in the graph-file format.
///
/// # Errors
/// Returns [`EngineError::GraphFile`] when the file cannot be created or
/// written.
pub fn write_graph_file(path: &Path, graph: &WeightedGraph) -> Result<(), EngineError> {
    let io_error = |source| EngineError::GraphFile {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{} {}", graph.vertices(), graph.edge_count()).map_err(io_error)?;
    for edge in graph.iter_edges() {
        writeln!(writer, "{} {} {}", edge.from, edge.to, edge.weight).map_err(io_error)?;
    }
    writer.flush().map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use tempfile::TempDir;

    use crate::error::EngineErrorCode;

    fn write_fixture(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("graph.csv");
        std::fs::write(&path, contents).expect("fixture must write");
        path
    }

    #[test]
    fn round_trips_a_graph() {
        let dir = TempDir::new().expect("temp dir must create");
        let graph = WeightedGraph::from_edges(
            3,
            &[Edge::new(0, 1, 10), Edge::new(1, 2, -3), Edge::new(0, 2, 99)],
        );
        let path = dir.path().join("graph.csv");

        write_graph_file(&path, &graph).expect("write must succeed");
        let read_back = read_graph_file(&path).expect("read must succeed");
        assert_eq!(read_back, graph);
    }

    #[test]
    fn reads_the_documented_format() {
        let dir = TempDir::new().expect("temp dir must create");
        let path = write_fixture(&dir, "3 2\n0 1 5\n1 2 7\n");

        let graph = read_graph_file(&path).expect("read must succeed");
        assert_eq!(graph.vertices(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge(1), Edge::new(1, 2, 7));
    }

    #[test]
    fn missing_file_reports_an_io_failure() {
        let dir = TempDir::new().expect("temp dir must create");
        let err = read_graph_file(&dir.path().join("absent.csv"))
            .expect_err("absent file must fail");
        assert_eq!(err.code(), EngineErrorCode::GraphFile);
    }

    #[rstest]
    #[case::empty("")]
    #[case::header_only("4 2\n")]
    #[case::non_numeric("4 1\n0 x 3\n")]
    #[case::truncated_edge("4 2\n0 1 5\n2 3\n")]
    #[case::endpoint_out_of_range("2 1\n0 5 3\n")]
    #[case::negative_endpoint("2 1\n-1 1 3\n")]
    fn malformed_contents_are_rejected(#[case] contents: &str) {
        let dir = TempDir::new().expect("temp dir must create");
        let path = write_fixture(&dir, contents);

        let err = read_graph_file(&path).expect_err("malformed input must fail");
        assert_eq!(err.code(), EngineErrorCode::GraphFormat);
    }
}
