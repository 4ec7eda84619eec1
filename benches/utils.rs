use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::{Value, json};

/// Generate n random argument sets to use in the benchmark
pub fn generate_random_args(n: usize) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(42); // Fixed seed for reproducibility
    let mut args = Vec::with_capacity(n);

    for _ in 0..n {
        args.push(json!({
            "IncludeReviews": rng.random_bool(0.7),
            "IncludeCount": rng.random_bool(0.5),
            "GetMany": rng.random_bool(0.3),
            "Offset": rng.random_range(0..1000),
        }));
    }

    args
}

// Print binary size information - can be used from individual benchmarks
pub fn print_binary_size() {
    let binary_path = std::env::current_exe().unwrap();
    let metadata = std::fs::metadata(binary_path.clone()).unwrap();
    let size_bytes = metadata.len();
    let size_kb = size_bytes as f64 / 1024.0;
    let size_mb = size_kb / 1024.0;

    println!(
        "Binary size: {:.2} MB ({:.2} KB, {} bytes)",
        size_mb, size_kb, size_bytes
    );
    println!("Binary path: {}", binary_path.display());
}
