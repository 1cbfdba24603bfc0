//! Batch-wide execution options.

/// Knobs that apply to every experiment of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Queries of one item allowed in flight at once (1 = sequential)
    pub concurrency: usize,
    /// Seed for dataset sampling; fresh entropy when absent
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            seed: None,
        }
    }
}

impl RunOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        let options = RunOptions::default();
        assert_eq!(options.concurrency, 1);
        assert!(options.seed.is_none());
    }

    #[test]
    fn test_concurrency_floor() {
        assert_eq!(RunOptions::default().with_concurrency(0).concurrency, 1);
        assert_eq!(RunOptions::default().with_concurrency(4).concurrency, 4);
    }
}
