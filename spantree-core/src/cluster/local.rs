//! In-process cluster: one OS thread per rank, one channel per ordered
//! rank pair.
//!
//! Each rank owns a dedicated receiver per peer, so a receive names its
//! sender exactly as the kernels expect. A rank that bails out early drops
//! its endpoints; peers blocked on it observe a closed channel and fail with
//! [`ClusterError::Disconnected`] instead of deadlocking.

use std::{
    num::NonZeroUsize,
    sync::mpsc::{Receiver, Sender},
    thread,
};

use super::{ClusterError, Communicator};

/// One rank's endpoints inside a [`LocalCluster`] run.
pub struct ThreadComm {
    rank: usize,
    peers_tx: Vec<Option<Sender<Vec<i32>>>>,
    peers_rx: Vec<Option<Receiver<Vec<i32>>>>,
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers_tx.len()
    }

    fn send(&self, to: usize, payload: &[i32]) -> Result<(), ClusterError> {
        let slot = self.peers_tx.get(to).ok_or(ClusterError::PeerOutOfRange {
            peer: to,
            size: self.size(),
        })?;
        let sender = slot
            .as_ref()
            .ok_or(ClusterError::SelfMessage { rank: self.rank })?;
        sender
            .send(payload.to_vec())
            .map_err(|_| ClusterError::Disconnected { peer: to })
    }

    fn recv(&self, from: usize) -> Result<Vec<i32>, ClusterError> {
        let slot = self.peers_rx.get(from).ok_or(ClusterError::PeerOutOfRange {
            peer: from,
            size: self.size(),
        })?;
        let receiver = slot
            .as_ref()
            .ok_or(ClusterError::SelfMessage { rank: self.rank })?;
        receiver
            .recv()
            .map_err(|_| ClusterError::Disconnected { peer: from })
    }
}

/// Runs single-program-multiple-data jobs on an in-process rank cluster.
pub struct LocalCluster;

impl LocalCluster {
    /// Executes `job` once per rank on `ranks` threads and returns the
    /// per-rank results in rank order.
    ///
    /// A panicking rank propagates its panic to the caller after the
    /// remaining ranks finish or disconnect.
    pub fn run<T, F>(ranks: NonZeroUsize, job: F) -> Vec<T>
    where
        F: Fn(&ThreadComm) -> T + Sync,
        T: Send,
    {
        let comms = build_mesh(ranks.get());
        thread::scope(|scope| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    let job = &job;
                    scope.spawn(move || job(&comm))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }
}

/// Wires a full mesh of channels and splits it into per-rank endpoints.
fn build_mesh(size: usize) -> Vec<ThreadComm> {
    let mut senders: Vec<Vec<Option<Sender<Vec<i32>>>>> =
        (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
    let mut receivers: Vec<Vec<Option<Receiver<Vec<i32>>>>> =
        (0..size).map(|_| (0..size).map(|_| None).collect()).collect();

    for from in 0..size {
        for to in 0..size {
            if from != to {
                let (sender, receiver) = std::sync::mpsc::channel();
                senders[from][to] = Some(sender);
                receivers[to][from] = Some(receiver);
            }
        }
    }

    senders
        .into_iter()
        .zip(receivers)
        .enumerate()
        .map(|(rank, (peers_tx, peers_rx))| ThreadComm {
            rank,
            peers_tx,
            peers_rx,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: NonZeroUsize = NonZeroUsize::MIN;

    fn ranks(count: usize) -> NonZeroUsize {
        NonZeroUsize::new(count).expect("test rank counts are positive")
    }

    #[test]
    fn single_rank_runs_without_peers() {
        let results = LocalCluster::run(ONE, |comm| (comm.rank(), comm.size()));
        assert_eq!(results, vec![(0, 1)]);
    }

    #[test]
    fn matched_sends_and_receives_pair_up() {
        let results = LocalCluster::run(ranks(2), |comm| {
            if comm.rank() == 0 {
                comm.send(1, &[1, 2, 3])?;
                comm.recv(1)
            } else {
                let payload = comm.recv(0)?;
                comm.send(0, &payload)?;
                Ok(Vec::new())
            }
        });
        let mut results = results.into_iter();
        let echoed = results.next().expect("rank 0 result");
        assert_eq!(echoed.expect("round trip succeeds"), vec![1, 2, 3]);
    }

    #[test]
    fn broadcast_replaces_every_buffer() {
        let results = LocalCluster::run(ranks(4), |comm| {
            let mut buffer = if comm.rank() == 0 {
                vec![7, 8, 9]
            } else {
                Vec::new()
            };
            comm.broadcast(&mut buffer, 0).map(|()| buffer)
        });
        for buffer in results {
            assert_eq!(buffer.expect("broadcast succeeds"), vec![7, 8, 9]);
        }
    }

    #[test]
    fn early_exit_surfaces_as_disconnected() {
        let results = LocalCluster::run(ranks(2), |comm| {
            if comm.rank() == 0 {
                // Exit without sending anything.
                Ok(Vec::new())
            } else {
                comm.recv(0)
            }
        });
        let outcome = results.into_iter().nth(1).expect("rank 1 result");
        assert!(matches!(
            outcome,
            Err(ClusterError::Disconnected { peer: 0 })
        ));
    }

    #[test]
    fn messaging_yourself_is_rejected() {
        let results = LocalCluster::run(ONE, |comm| comm.send(0, &[1]));
        assert!(matches!(
            results.into_iter().next(),
            Some(Err(ClusterError::SelfMessage { rank: 0 }))
        ));
    }

    #[test]
    fn out_of_range_peer_is_rejected() {
        let results = LocalCluster::run(ONE, |comm| comm.recv(5));
        assert!(matches!(
            results.into_iter().next(),
            Some(Err(ClusterError::PeerOutOfRange { peer: 5, size: 1 }))
        ));
    }
}
