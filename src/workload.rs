use std::hint::black_box;

use rand::Rng;

/// Burn CPU for a fixed number of iterations.
///
/// Each iteration takes a square root of a pseudo-random input, so the
/// work is neither cacheable nor foldable at compile time; the result is
/// routed through `black_box` so the optimizer cannot drop the loop.
pub fn workload(iterations: u32) {
    let mut rng = rand::rng();
    let mut acc = 0.0f64;
    for _ in 0..iterations {
        acc += black_box(rng.random::<u32>() as f64).sqrt();
    }
    black_box(acc);
}
