//! Policies for choosing which queue a newly arrived car joins.

use border_core::{QueueId, SimRng};

use crate::queue::Queue;

/// Which policy an [`Assigner`] applies.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentKind {
    Random,
    Shortest,
    RoundRobin,
}

/// Chooses a destination queue for each arrival. Full queues are never
/// selected; if every queue is full, `choose` returns `None` and the
/// caller is responsible for counting the arrival as dropped.
pub struct Assigner {
    kind: AssignmentKind,
    rr_index: usize,
}

impl Assigner {
    pub fn new(kind: AssignmentKind) -> Self {
        Self { kind, rr_index: 0 }
    }

    pub fn kind(&self) -> AssignmentKind {
        self.kind
    }

    /// Pick a non-full queue from `queues` according to the configured
    /// policy.
    pub fn choose(&mut self, queues: &[Queue], rng: &mut SimRng) -> Option<QueueId> {
        let candidates: Vec<usize> = queues
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_full())
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return None;
        }

        match self.kind {
            AssignmentKind::Random => {
                let pick = candidates[rng.choose_index(candidates.len())];
                Some(queues[pick].queue_id)
            }
            AssignmentKind::Shortest => {
                let pick = candidates
                    .into_iter()
                    .min_by_key(|&i| (queues[i].len(), queues[i].queue_id))?;
                Some(queues[pick].queue_id)
            }
            AssignmentKind::RoundRobin => {
                // Scan forward from rr_index, wrapping, for the first
                // non-full queue; advance rr_index past whatever is chosen.
                let n = queues.len();
                for step in 0..n {
                    let i = (self.rr_index + step) % n;
                    if !queues[i].is_full() {
                        self.rr_index = (i + 1) % n;
                        return Some(queues[i].queue_id);
                    }
                }
                None
            }
        }
    }
}
