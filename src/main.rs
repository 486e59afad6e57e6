use std::env;
use std::fs::File;
use std::process;
use std::time::Instant;

use distributed_kmeans::collectives::mpi::WorldCollectives;
use distributed_kmeans::init::choose_initial_centroids;
use distributed_kmeans::kmeans::{checksum, DistributedKMeans};
use distributed_kmeans::point::points_from_file;

// fixed seed so separate runs select the same starting centroids
const CENTROID_SEED: u64 = 42;

fn parse_count(arg: &str, name: &str) -> usize {
    match arg.parse::<usize>() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: {} must be a non-negative integer, got '{}'", name, arg);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 6 {
        eprintln!("Usage: {} <data_file> <M_points> <D_dimensions> <K_clusters> <I_iterations>", args[0]);
        process::exit(1);
    }

    let universe = match mpi::initialize() {
        Some(u) => u,
        None => {
            eprintln!("Error: could not initialise the MPI environment");
            process::exit(1);
        }
    };
    let world = universe.world();

    let m = parse_count(&args[2], "M");
    let dims = parse_count(&args[3], "D");
    let k = parse_count(&args[4], "K");
    let iterations = parse_count(&args[5], "I");

    // every rank validates the same values, so either all ranks enter
    // the collective protocol or none do
    let comm = WorldCollectives::new(world);
    let mut trainer = match DistributedKMeans::new(comm, m, dims, k, iterations) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error in parameters ({:?}). Check that M,D,K,I > 0 and K <= M.", e);
            process::exit(1);
        }
    };

    let file = match File::open(&args[1]) {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Error: could not open the file '{}'", args[1]);
            process::exit(1);
        }
    };
    let mut points = match points_from_file(&file, m, dims) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: data file malformed or incomplete ({:?})", e);
            process::exit(1);
        }
    };
    let mut centroids = choose_initial_centroids(&points, k, CENTROID_SEED);

    // only the iteration loop is timed
    let timer = Instant::now();
    if let Err(e) = trainer.train(&mut points, &mut centroids) {
        eprintln!("Error: collective protocol failure ({:?})", e);
        process::exit(1);
    }
    let elapsed = timer.elapsed().as_secs_f64();

    // script-readable report from the coordinator: time, then checksum
    if trainer.rank() == 0 {
        println!("{}", elapsed);
        println!("{}", checksum(&centroids));
    }
}
