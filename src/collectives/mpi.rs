use mpi::collective::SystemOperation;
use mpi::topology::SystemCommunicator;
use mpi::traits::*;

use crate::collectives::Collectives;
use crate::common::CommError;

// the production backend: every reduction maps to one MPI_Allreduce
// over the world communicator, mirroring the in-place MPI_MAX/MPI_SUM
// calls of the reference protocol
pub struct WorldCollectives {
    world: SystemCommunicator,
}

impl WorldCollectives {
    pub fn new(world: SystemCommunicator) -> WorldCollectives {
        WorldCollectives { world }
    }
}

impl Collectives for WorldCollectives {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn reduce_max(&self, buf: &mut [i32]) -> Result<(), CommError> {
        let local = buf.to_vec();
        self.world
            .all_reduce_into(&local[..], buf, SystemOperation::max());
        Ok(())
    }

    fn reduce_sum_wide(&self, buf: &mut [i64]) -> Result<(), CommError> {
        let local = buf.to_vec();
        self.world
            .all_reduce_into(&local[..], buf, SystemOperation::sum());
        Ok(())
    }

    fn reduce_sum(&self, buf: &mut [i32]) -> Result<(), CommError> {
        let local = buf.to_vec();
        self.world
            .all_reduce_into(&local[..], buf, SystemOperation::sum());
        Ok(())
    }
}
