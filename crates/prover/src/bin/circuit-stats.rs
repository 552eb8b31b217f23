//! Circuit statistics utility - reports constraint counts and proof timing
//!
//! Usage:
//!   cargo run --release --bin circuit-stats           # Just constraint counts
//!   cargo run --release --bin circuit-stats -- --time # Include proof timing (needs keys)

use std::path::Path;
use std::time::Instant;

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef};

use fogmove_circuits::encoding::{bucket_bits_var, one_hot_var};
use fogmove_circuits::griffin::permutation_var;
use fogmove_circuits::mimc::mimc7_hash_var;
use fogmove_circuits::{
    build_commitment, CircuitParams, GridPosition, Mimc7, PathCommitmentInput, RevealCircuit,
    RevealWitness, MAP_WIDTH,
};

fn witness(cs: &ConstraintSystemRef<Fr>, v: u64) -> FpVar<Fr> {
    FpVar::new_witness(cs.clone(), || Ok(Fr::from(v))).unwrap()
}

/// Count the constraints added by one gadget invocation
fn count_gadget(name: &str, build: impl FnOnce(ConstraintSystemRef<Fr>)) -> usize {
    let cs = ConstraintSystem::<Fr>::new_ref();
    build(cs.clone());
    let count = cs.num_constraints();
    println!("{:25} {:>8} constraints", name, count);
    count
}

fn count_constraints<C: ConstraintSynthesizer<Fr>>(circuit: C, name: &str) -> usize {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).unwrap();
    let count = cs.num_constraints();
    // Note: empty circuits use dummy values so they may not satisfy all constraints
    // The constraint count is still accurate
    println!("{:25} {:>8} constraints", name, count);
    count
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let include_timing = args.iter().any(|a| a == "--time");
    let params = CircuitParams::default();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              HIDDEN MOVEMENT CIRCUIT STATS               ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!("Path slots:  {}", params.max_points);
    println!("Hash rounds: {}\n", params.hash_rounds);

    println!("─────────────────────────────────────────────────────────────");
    println!("COMPONENT CONSTRAINTS:");
    println!("─────────────────────────────────────────────────────────────\n");

    let griffin = count_gadget("Griffin permutation", |cs| {
        let input = [1u64, 2, 3].map(|v| witness(&cs, v));
        permutation_var(cs.clone(), input).unwrap();
    });

    let mimc = count_gadget("MiMC-7 hash", |cs| {
        mimc7_hash_var(&witness(&cs, 1), &witness(&cs, 2)).unwrap();
    });

    let bucket = count_gadget("Bucket one-hot", |cs| {
        let bits = bucket_bits_var(&witness(&cs, 12345)).unwrap();
        one_hot_var(&bits, &Boolean::TRUE).unwrap();
    });

    println!("\n─────────────────────────────────────────────────────────────");
    println!("CIRCUIT CONSTRAINTS:");
    println!("─────────────────────────────────────────────────────────────\n");

    let reveal = count_constraints(RevealCircuit::empty(params), "Reveal");

    let slots = params.max_points;
    let chains = slots * params.hash_rounds;
    let estimate = slots.div_ceil(3) * griffin + chains * (mimc + bucket);
    println!("\nPer-slot estimate:         {:>8}", estimate);
    println!("Other (flags, OR, packing): {:>7}", reveal.saturating_sub(estimate));

    if include_timing {
        println!("\n─────────────────────────────────────────────────────────────");
        println!("PROOF TIMING:");
        println!("─────────────────────────────────────────────────────────────\n");

        let keys_path = Path::new("keys");
        if keys_path.exists() {
            run_timing_benchmarks(keys_path, reveal);
        } else {
            println!("Keys not found. Generate keys first with:");
            println!("  cargo run --release --bin export-vk");
        }
    } else {
        println!("\n(Run with --time to include proof generation timing)");
    }
}

fn run_timing_benchmarks(keys_path: &Path, constraints: usize) {
    use fogmove_prover::{prove::prove_reveal, setup::RevealKeys};

    println!("Loading keys from {:?}...", keys_path);
    let start = Instant::now();
    let keys = match RevealKeys::load_from_directory(keys_path) {
        Ok(k) => k,
        Err(e) => {
            println!("Failed to load keys: {}", e);
            return;
        }
    };
    println!("Keys loaded in {:?}\n", start.elapsed());

    let points = (0..keys.params.max_points as u32)
        .map(|i| GridPosition::new(i % MAP_WIDTH, i / MAP_WIDTH))
        .collect();
    let input = PathCommitmentInput::new(
        points,
        Fr::from(2u64),
        Fr::from(1u64),
        MAP_WIDTH,
        keys.params.hash_rounds,
    );
    let commitment = match build_commitment(&input, &Mimc7) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to build commitment: {}", e);
            return;
        }
    };
    let witness = RevealWitness {
        input,
        commitment,
        duration: 10,
        target_occupied: false,
    };

    // Warm up (first proof is slower due to caching)
    let _ = prove_reveal(&keys, &witness);

    const RUNS: usize = 3;

    let mut times = Vec::new();
    for _ in 0..RUNS {
        let start = Instant::now();
        let _ = prove_reveal(&keys, &witness);
        times.push(start.elapsed().as_micros());
    }
    let avg_us = times.iter().sum::<u128>() / RUNS as u128;
    let us_per_constraint = avg_us as f64 / constraints as f64;

    println!("Circuit          Constraints    Avg Time    μs/constraint");
    println!("────────────────────────────────────────────────────────────");
    println!(
        "Reveal              {:>7}       {:>4}ms         {:.2}",
        constraints,
        avg_us / 1000,
        us_per_constraint
    );
}
