//! Edge-list sorting: sequential merge sort plus the cluster-wide sort that
//! feeds Kruskal.
//!
//! The sequential merge copies the left half forward and the right half
//! reversed into the scratch buffer, then runs two pointers inwards from
//! both ends; each half acts as the other's sentinel, so neither pointer
//! needs an end-of-run check. The parallel sort scatters edge chunks,
//! sorts them locally, and combines them with a recursive-doubling pairwise
//! merge that leaves the fully sorted list on rank 0.

use crate::{
    cluster::{scatter_edge_list, Communicator},
    error::EngineError,
    graph::{WeightedGraph, EDGE_WORDS},
};

/// Sorts a flat edge-word slice by ascending weight, stably.
pub fn merge_sort(words: &mut [i32]) {
    let edges = words.len() / EDGE_WORDS;
    if edges > 1 {
        sort_range(words, 0, edges - 1);
    }
}

/// Sorts edges `start..=end`.
fn sort_range(words: &mut [i32], start: usize, end: usize) {
    if start == end {
        return;
    }
    let pivot = (start + end) / 2;
    sort_range(words, start, pivot);
    sort_range(words, pivot + 1, end);
    merge(words, start, end, pivot);
}

/// Merges the sorted runs `start..=pivot` and `pivot + 1..=end`.
pub(crate) fn merge(words: &mut [i32], start: usize, end: usize, pivot: usize) {
    let length = end - start + 1;
    let mut working = vec![0_i32; length * EDGE_WORDS];

    let left_words = (pivot - start + 1) * EDGE_WORDS;
    working[..left_words]
        .copy_from_slice(&words[start * EDGE_WORDS..(pivot + 1) * EDGE_WORDS]);

    // Right half goes in reversed so the largest elements meet in the middle.
    let working_end = end + pivot - start + 1;
    for index in pivot + 1..=end {
        let target = (working_end - index) * EDGE_WORDS;
        let source = index * EDGE_WORDS;
        working[target..target + EDGE_WORDS]
            .copy_from_slice(&words[source..source + EDGE_WORDS]);
    }

    let mut left = 0;
    let mut right = end - start;
    for target in start..=end {
        let slot = if working[right * EDGE_WORDS + 2] < working[left * EDGE_WORDS + 2] {
            let slot = right;
            right -= 1;
            slot
        } else {
            let slot = left;
            left += 1;
            slot
        };
        words[target * EDGE_WORDS..(target + 1) * EDGE_WORDS]
            .copy_from_slice(&working[slot * EDGE_WORDS..(slot + 1) * EDGE_WORDS]);
    }
}

/// Sorts `graph`'s edge list across the cluster.
///
/// Rank 0 broadcasts the edge count and scatters the list; every rank sorts
/// its chunk; chunks then combine pairwise with doubling stride until rank 0
/// holds the full sorted list and installs it into `graph`. With a single
/// rank this degenerates to the sequential sort.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedPartition`] when the edge list cannot
/// be distributed over the rank count, or a cluster error when a peer rank
/// failed mid-exchange.
pub(crate) fn parallel_sort<C: Communicator>(
    comm: &C,
    graph: &mut WeightedGraph,
) -> Result<(), EngineError> {
    if comm.size() == 1 {
        merge_sort(graph.edge_words_mut());
        return Ok(());
    }

    let mut header = if comm.rank() == 0 {
        vec![graph.edge_count() as i32]
    } else {
        Vec::new()
    };
    comm.broadcast(&mut header, 0)?;
    let elements = header[0] as usize;

    let mut part = scatter_edge_list(comm, graph.edge_words(), elements)?;
    merge_sort(&mut part);

    let mut step = 1;
    while step < comm.size() {
        if comm.rank() % (2 * step) == 0 {
            let from = comm.rank() + step;
            if from < comm.size() {
                let received = comm.recv(from)?;
                let pivot_edges = part.len() / EDGE_WORDS;
                part.extend_from_slice(&received);
                let total_edges = part.len() / EDGE_WORDS;
                if pivot_edges > 0 && total_edges > pivot_edges {
                    merge(&mut part, 0, total_edges - 1, pivot_edges - 1);
                }
            }
        } else if comm.rank() % step == 0 {
            comm.send(comm.rank() - step, &part)?;
        }
        step *= 2;
    }

    if comm.rank() == 0 {
        graph.replace_edge_words(part);
    }
    Ok(())
}
