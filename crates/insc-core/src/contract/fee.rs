use serde::Serialize;

use crate::chunk::MAX_BATCH_SIZE;

/// Fee parameters read from the contract's fee unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub fee_unit: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeEstimate {
    pub fee_unit: u128,
    pub batch_count: u64,
    pub begin_fee: u128,
    pub seal_fee: u128,
    pub total_fee: u128,
}

impl FeeSchedule {
    pub fn new(fee_unit: u128) -> Self {
        Self { fee_unit }
    }

    /// Begin costs one unit; sealing costs one unit plus one per chunk batch.
    pub fn estimate(&self, total_chunks: u64) -> FeeEstimate {
        let batch_count = total_chunks.div_ceil(MAX_BATCH_SIZE as u64);
        let begin_fee = self.fee_unit;
        let seal_fee = self
            .fee_unit
            .saturating_mul(1u128.saturating_add(batch_count as u128));
        FeeEstimate {
            fee_unit: self.fee_unit,
            batch_count,
            begin_fee,
            seal_fee,
            total_fee: begin_fee.saturating_add(seal_fee),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_batches() {
        let estimate = FeeSchedule::new(100_000).estimate(120);
        assert_eq!(estimate.batch_count, 3);
        assert_eq!(estimate.begin_fee, 100_000);
        assert_eq!(estimate.seal_fee, 400_000);
        assert_eq!(estimate.total_fee, 500_000);
    }

    #[test]
    fn empty_upload_pays_begin_and_base_seal() {
        let estimate = FeeSchedule::new(7).estimate(0);
        assert_eq!(estimate.batch_count, 0);
        assert_eq!(estimate.total_fee, 14);
    }

    #[test]
    fn estimate_saturates_instead_of_overflowing() {
        let estimate = FeeSchedule::new(u128::MAX).estimate(10);
        assert_eq!(estimate.seal_fee, u128::MAX);
        assert_eq!(estimate.total_fee, u128::MAX);
    }
}
