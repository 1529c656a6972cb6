//! Registry usage statistics

/// Counters for monitoring pool churn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered pools, quarantine excluded
    pub active_pools: usize,
    /// Resources checked out across all pools, quarantine excluded
    pub in_use: usize,
    /// Resources parked in quarantine
    pub quarantined: usize,
    /// Successful acquires since creation
    pub total_acquired: u64,
    /// Resources returned to a pool since creation
    pub total_released: u64,
    /// Resources manufactured since creation, pre-warming included
    pub total_manufactured: u64,
    /// Resources destroyed since creation
    pub total_destroyed: u64,
    /// Acquires that had to grow their pool
    pub growth_events: u64,
    /// Foreign resources taken over by a pool
    pub adoptions: u64,
}

impl RegistryStats {
    /// Fraction of acquires that were served by recycling rather than growing
    pub fn reuse_ratio(&self) -> f64 {
        if self.total_acquired == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = (self.total_acquired - self.growth_events) as f64 / self.total_acquired as f64;
        ratio
    }
}
