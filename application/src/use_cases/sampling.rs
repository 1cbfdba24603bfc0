//! Uniform sampling of dataset items.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Draw `size` items uniformly without replacement.
///
/// When the dataset is not larger than `size`, every item is returned in
/// dataset order. A seed makes the draw reproducible.
pub fn sample_items<T: Clone>(items: &[T], size: usize, seed: Option<u64>) -> Vec<T> {
    if items.len() <= size {
        return items.to_vec();
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    items.choose_multiple(&mut rng, size).cloned().collect()
}
