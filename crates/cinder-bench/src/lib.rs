//! Benchmark workloads for Cinder shared buffers.
//!
//! A workload is a seeded, reproducible sequence of [`BufferOp`]s applied
//! to a single working handle plus a pool of sibling handles. Replaying a
//! workload tallies which resize path every operation took, so benches can
//! check that a profile actually exercises the branch it claims to.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use cinder_buffer::{BufferError, ResizePath, SharedBuffer};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a benchmark workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferOp {
    /// `resize(count, preserve)` on the working handle.
    Resize {
        /// Target element count.
        count: usize,
        /// Keep the common prefix.
        preserve: bool,
    },
    /// `resize_fill(count, value)` on the working handle.
    Fill {
        /// Target element count.
        count: usize,
        /// Value written into new slots.
        value: u32,
    },
    /// Clone the working handle into the sibling pool.
    Share,
    /// Drop the oldest sibling, if any.
    Unshare,
    /// Write `value` at `index % len` through `make_mut`.
    Write {
        /// Raw index; wrapped to the current length.
        index: usize,
        /// Value to store.
        value: u32,
    },
}

/// Shape of a generated workload.
#[derive(Clone, Debug)]
pub struct WorkloadProfile {
    /// Number of operations.
    pub ops: usize,
    /// Largest count any resize asks for.
    pub max_count: usize,
    /// Probability that a step clones or drops a sibling.
    pub share_ratio: f64,
    /// Probability that a step writes an element.
    pub write_ratio: f64,
}

impl WorkloadProfile {
    /// Mostly sole-owned shrinks and grows over small buffers.
    pub fn reference() -> Self {
        Self {
            ops: 10_000,
            max_count: 1024,
            share_ratio: 0.1,
            write_ratio: 0.2,
        }
    }

    /// Heavy sharing, so most resizes take the copy-on-write path.
    pub fn shared_heavy() -> Self {
        Self {
            ops: 10_000,
            max_count: 1024,
            share_ratio: 0.5,
            write_ratio: 0.2,
        }
    }

    /// Generate the operation sequence for `seed`.
    ///
    /// The same seed always yields the same sequence.
    pub fn generate(&self, seed: u64) -> Vec<BufferOp> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let max_count = self.max_count.max(1);
        (0..self.ops)
            .map(|_| {
                if rng.random_bool(self.share_ratio) {
                    if rng.random_bool(0.5) {
                        BufferOp::Share
                    } else {
                        BufferOp::Unshare
                    }
                } else if rng.random_bool(self.write_ratio) {
                    BufferOp::Write {
                        index: rng.random_range(0..max_count),
                        value: rng.random(),
                    }
                } else if rng.random_bool(0.25) {
                    BufferOp::Fill {
                        count: rng.random_range(0..=max_count),
                        value: rng.random(),
                    }
                } else {
                    BufferOp::Resize {
                        count: rng.random_range(0..=max_count),
                        preserve: rng.random_bool(0.8),
                    }
                }
            })
            .collect()
    }
}

/// Tally of resize outcomes from a replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Resizes that released the block.
    pub released: usize,
    /// Resizes that only rewrote the header count.
    pub shrunk_in_place: usize,
    /// Resizes that allocated a fresh block.
    pub reallocated: usize,
    /// Element writes that landed on a non-empty buffer.
    pub writes: usize,
}

impl ReplayStats {
    fn record(&mut self, path: ResizePath) {
        match path {
            ResizePath::Released => self.released += 1,
            ResizePath::ShrunkInPlace => self.shrunk_in_place += 1,
            ResizePath::Reallocated => self.reallocated += 1,
        }
    }

    /// Total resize calls recorded.
    pub fn resizes(&self) -> usize {
        self.released + self.shrunk_in_place + self.reallocated
    }
}

/// Apply `ops` to a fresh empty buffer and tally the outcomes.
///
/// Returns the final working handle alongside the stats.
pub fn replay(ops: &[BufferOp]) -> Result<(SharedBuffer<u32>, ReplayStats), BufferError> {
    let mut buffer = SharedBuffer::new();
    let mut siblings = std::collections::VecDeque::new();
    let mut stats = ReplayStats::default();
    for op in ops {
        match *op {
            BufferOp::Resize { count, preserve } => stats.record(buffer.resize(count, preserve)?),
            BufferOp::Fill { count, value } => stats.record(buffer.resize_fill(count, value)?),
            BufferOp::Share => siblings.push_back(buffer.clone()),
            BufferOp::Unshare => {
                siblings.pop_front();
            }
            BufferOp::Write { index, value } => {
                let len = buffer.len();
                if len > 0 {
                    buffer.make_mut()?[index % len] = value;
                    stats.writes += 1;
                }
            }
        }
    }
    Ok((buffer, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let profile = WorkloadProfile::reference();
        assert_eq!(profile.generate(7), profile.generate(7));
        assert_ne!(profile.generate(7), profile.generate(8));
    }

    #[test]
    fn generated_counts_stay_within_profile() {
        let profile = WorkloadProfile {
            ops: 500,
            max_count: 16,
            share_ratio: 0.2,
            write_ratio: 0.2,
        };
        for op in profile.generate(1) {
            match op {
                BufferOp::Resize { count, .. } | BufferOp::Fill { count, .. } => {
                    assert!(count <= 16)
                }
                BufferOp::Write { index, .. } => assert!(index < 16),
                BufferOp::Share | BufferOp::Unshare => {}
            }
        }
    }

    #[test]
    fn replay_counts_every_resize() {
        let ops = [
            BufferOp::Resize {
                count: 4,
                preserve: true,
            },
            BufferOp::Resize {
                count: 2,
                preserve: true,
            },
            BufferOp::Share,
            BufferOp::Fill { count: 1, value: 3 },
            BufferOp::Write { index: 5, value: 9 },
            BufferOp::Resize {
                count: 0,
                preserve: false,
            },
        ];
        let (buffer, stats) = replay(&ops).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(
            stats,
            ReplayStats {
                released: 1,
                shrunk_in_place: 1,
                reallocated: 2,
                writes: 1,
            }
        );
        assert_eq!(stats.resizes(), 4);
    }

    #[test]
    fn shared_heavy_profile_reallocates_more() {
        let (_, reference) = replay(&WorkloadProfile::reference().generate(42)).unwrap();
        let (_, shared) = replay(&WorkloadProfile::shared_heavy().generate(42)).unwrap();
        let ratio = |s: &ReplayStats| s.shrunk_in_place as f64 / s.resizes().max(1) as f64;
        assert!(ratio(&shared) < ratio(&reference));
    }
}
