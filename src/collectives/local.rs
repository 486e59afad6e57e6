use std::mem;
use std::sync::{Arc, Condvar, Mutex};

use crate::collectives::Collectives;
use crate::common::CommError;

// which reduction a round is running; a contribution of a different
// kind or length is a protocol violation
#[derive(Debug, PartialEq, Clone, Copy)]
enum OpKind {
    MaxNarrow,
    SumNarrow,
    SumWide,
}

// one reduction round in progress. the accumulators belong to the
// current round; the out vectors hold the previous round's result until
// every straggler has copied it (no worker can re-enter before then)
struct Round {
    generation: u64,
    arrived: usize,
    kind: Option<OpKind>,
    len: usize,
    acc_narrow: Vec<i32>,
    acc_wide: Vec<i64>,
    out_narrow: Vec<i32>,
    out_wide: Vec<i64>,
    poisoned: bool,
}

struct Shared {
    size: usize,
    round: Mutex<Round>,
    done: Condvar,
}

// an in-process simulated cluster: one handle per worker thread, all
// sharing a rendezvous. each reduction blocks until every handle has
// contributed, so the blocking-barrier semantics of the real backend
// hold on a single machine. a mismatched contribution poisons the
// world and every current and future call reports the violation
// instead of hanging
pub struct LocalWorld {
    rank: usize,
    shared: Arc<Shared>,
}

impl LocalWorld {
    // creates the handles for a simulated cluster of the given size,
    // one per worker, ranked in order
    pub fn cluster(size: usize) -> Vec<LocalWorld> {
        let shared = Arc::new(Shared {
            size,
            round: Mutex::new(Round {
                generation: 0,
                arrived: 0,
                kind: None,
                len: 0,
                acc_narrow: Vec::new(),
                acc_wide: Vec::new(),
                out_narrow: Vec::new(),
                out_wide: Vec::new(),
                poisoned: false,
            }),
            done: Condvar::new(),
        });
        (0..size)
            .map(|rank| LocalWorld {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    fn rendezvous_narrow(&self, buf: &mut [i32], kind: OpKind) -> Result<(), CommError> {
        let mut round = self.shared.round.lock().unwrap();
        if round.poisoned {
            return Err(CommError::ProtocolViolation);
        }
        match round.kind {
            None => {
                round.kind = Some(kind);
                round.len = buf.len();
                round.acc_narrow.clear();
                round.acc_narrow.extend_from_slice(buf);
            }
            Some(current) => {
                if current != kind || round.len != buf.len() {
                    round.poisoned = true;
                    self.shared.done.notify_all();
                    return Err(CommError::ProtocolViolation);
                }
                for (acc, value) in round.acc_narrow.iter_mut().zip(buf.iter()) {
                    match kind {
                        OpKind::MaxNarrow => {
                            if *value > *acc {
                                *acc = *value;
                            }
                        }
                        _ => *acc += *value,
                    }
                }
            }
        }
        round.arrived += 1;
        if round.arrived == self.shared.size {
            round.out_narrow = mem::replace(&mut round.acc_narrow, Vec::new());
            round.generation += 1;
            round.arrived = 0;
            round.kind = None;
            buf.copy_from_slice(&round.out_narrow);
            self.shared.done.notify_all();
            return Ok(());
        }
        let generation = round.generation;
        while round.generation == generation && !round.poisoned {
            round = self.shared.done.wait(round).unwrap();
        }
        if round.poisoned {
            return Err(CommError::ProtocolViolation);
        }
        buf.copy_from_slice(&round.out_narrow);
        return Ok(());
    }

    fn rendezvous_wide(&self, buf: &mut [i64]) -> Result<(), CommError> {
        let mut round = self.shared.round.lock().unwrap();
        if round.poisoned {
            return Err(CommError::ProtocolViolation);
        }
        match round.kind {
            None => {
                round.kind = Some(OpKind::SumWide);
                round.len = buf.len();
                round.acc_wide.clear();
                round.acc_wide.extend_from_slice(buf);
            }
            Some(current) => {
                if current != OpKind::SumWide || round.len != buf.len() {
                    round.poisoned = true;
                    self.shared.done.notify_all();
                    return Err(CommError::ProtocolViolation);
                }
                for (acc, value) in round.acc_wide.iter_mut().zip(buf.iter()) {
                    *acc += *value;
                }
            }
        }
        round.arrived += 1;
        if round.arrived == self.shared.size {
            round.out_wide = mem::replace(&mut round.acc_wide, Vec::new());
            round.generation += 1;
            round.arrived = 0;
            round.kind = None;
            buf.copy_from_slice(&round.out_wide);
            self.shared.done.notify_all();
            return Ok(());
        }
        let generation = round.generation;
        while round.generation == generation && !round.poisoned {
            round = self.shared.done.wait(round).unwrap();
        }
        if round.poisoned {
            return Err(CommError::ProtocolViolation);
        }
        buf.copy_from_slice(&round.out_wide);
        return Ok(());
    }
}

impl Collectives for LocalWorld {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn reduce_max(&self, buf: &mut [i32]) -> Result<(), CommError> {
        self.rendezvous_narrow(buf, OpKind::MaxNarrow)
    }

    fn reduce_sum_wide(&self, buf: &mut [i64]) -> Result<(), CommError> {
        self.rendezvous_wide(buf)
    }

    fn reduce_sum(&self, buf: &mut [i32]) -> Result<(), CommError> {
        self.rendezvous_narrow(buf, OpKind::SumNarrow)
    }
}

#[cfg(test)]
mod tests {
    use super::LocalWorld;
    use crate::collectives::Collectives;
    use crate::common::CommError;
    use std::thread;

    #[test]
    fn test_reduce_max_and_sum() {
        let mut handles = Vec::new();
        for world in LocalWorld::cluster(3) {
            handles.push(thread::spawn(move || {
                let rank = world.rank() as i32;
                let mut maxes = vec![rank, 2 - rank];
                world.reduce_max(&mut maxes).unwrap();
                assert_eq!(vec![2, 2], maxes);

                let mut sums = vec![rank, 1];
                world.reduce_sum(&mut sums).unwrap();
                assert_eq!(vec![3, 3], sums);

                let mut wide = vec![rank as i64 * 1_000_000_000_000];
                world.reduce_sum_wide(&mut wide).unwrap();
                assert_eq!(vec![3_000_000_000_000], wide);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_single_worker_reduces_to_itself() {
        let world = LocalWorld::cluster(1).pop().unwrap();
        let mut buf = vec![5, -3];
        world.reduce_max(&mut buf).unwrap();
        assert_eq!(vec![5, -3], buf);
    }

    #[test]
    fn test_mismatched_lengths_fail_fast() {
        let mut handles = Vec::new();
        for world in LocalWorld::cluster(2) {
            handles.push(thread::spawn(move || {
                let mut buf = vec![0; 4 + world.rank()];
                world.reduce_max(&mut buf)
            }));
        }
        for handle in handles {
            assert_eq!(Err(CommError::ProtocolViolation), handle.join().unwrap());
        }
    }

    #[test]
    fn test_mismatched_operations_fail_fast() {
        let mut handles = Vec::new();
        for world in LocalWorld::cluster(2) {
            handles.push(thread::spawn(move || {
                let mut buf = vec![1, 2];
                if world.rank() == 0 {
                    world.reduce_max(&mut buf)
                } else {
                    world.reduce_sum(&mut buf)
                }
            }));
        }
        for handle in handles {
            assert_eq!(Err(CommError::ProtocolViolation), handle.join().unwrap());
        }
    }

    #[test]
    fn test_poisoned_world_stays_failed() {
        // after any violation, later well-formed calls must also error
        let mut handles = Vec::new();
        for world in LocalWorld::cluster(2) {
            handles.push(thread::spawn(move || {
                let mut buf = vec![0; 4 + world.rank()];
                let violated = world.reduce_max(&mut buf);
                let mut ok_shape = vec![0; 4];
                let after = world.reduce_sum(&mut ok_shape);
                (violated, after)
            }));
        }
        for handle in handles {
            let (violated, after) = handle.join().unwrap();
            assert_eq!(Err(CommError::ProtocolViolation), violated);
            assert_eq!(Err(CommError::ProtocolViolation), after);
        }
    }
}
