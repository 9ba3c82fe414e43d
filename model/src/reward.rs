use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Timestamp, TokenAmount, SECONDS_IN_MINUTE};

/// Time bucketing used by the staking contract to accrue rewards.
///
/// The deployed contract counts lock duration and elapsed time in minutes and
/// treats a year as 360 of those units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RewardSchedule {
    pub seconds_per_unit: u64,
    pub units_per_year: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("reward schedule must have non-zero seconds per unit and units per year")]
    InvalidSchedule,
    #[error("pending reward overflows 128 bits")]
    Overflow,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            seconds_per_unit: SECONDS_IN_MINUTE,
            units_per_year: 360,
        }
    }
}

impl RewardSchedule {
    pub fn is_valid(&self) -> bool {
        self.seconds_per_unit > 0 && self.units_per_year > 0
    }

    /// Whole units elapsed since `last_checkpoint`. A checkpoint in the future yields zero.
    pub fn elapsed_units(&self, last_checkpoint: Timestamp, now: Timestamp) -> Result<u64, RewardError> {
        now.saturating_sub(last_checkpoint)
            .checked_div(self.seconds_per_unit)
            .ok_or(RewardError::InvalidSchedule)
    }

    /// Reward accrued by `staked` since `last_checkpoint`.
    ///
    /// Computes `staked * units * apy / units_per_year / 100` where `units` is the number of
    /// whole elapsed units clamped to `lock_units`. Each division truncates and the order of
    /// operations is the contract's own, so the result matches it exactly.
    pub fn pending_reward(
        &self,
        staked: TokenAmount,
        last_checkpoint: Timestamp,
        now: Timestamp,
        lock_units: u64,
        apy: u64,
    ) -> Result<TokenAmount, RewardError> {
        if !self.is_valid() {
            return Err(RewardError::InvalidSchedule);
        }

        let units = self.elapsed_units(last_checkpoint, now)?.min(lock_units);

        staked
            .checked_mul(units.into())
            .and_then(|value| value.checked_mul(apy.into()))
            .map(|value| value / TokenAmount::from(self.units_per_year) / 100)
            .ok_or(RewardError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use fake::Fake;

    use crate::reward::{RewardError, RewardSchedule};

    const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;
    const T0: u64 = 1_700_000_000;

    #[test]
    fn reward_at_lock_boundary() {
        let schedule = RewardSchedule::default();

        // 1e18 * 30 * 10 / 360 / 100, truncated at each division
        assert_eq!(
            Ok(8_333_333_333_333_333),
            schedule.pending_reward(ONE_TOKEN, T0, T0 + 1800, 30, 10)
        );
    }

    #[test]
    fn partial_unit_does_not_accrue() {
        let schedule = RewardSchedule::default();

        assert_eq!(Ok(0), schedule.pending_reward(ONE_TOKEN, T0, T0 + 59, 30, 10));
        assert_eq!(
            schedule.pending_reward(ONE_TOKEN, T0, T0 + 60, 30, 10),
            schedule.pending_reward(ONE_TOKEN, T0, T0 + 119, 30, 10)
        );
    }

    #[test]
    fn checkpoint_in_future_yields_nothing() {
        let schedule = RewardSchedule::default();

        assert_eq!(Ok(0), schedule.pending_reward(ONE_TOKEN, T0 + 600, T0, 30, 10));
    }

    #[test]
    fn multiplies_before_dividing() {
        let schedule = RewardSchedule::default();

        // 35_999 * 1 * 15 / 360 / 100 = 14, applying the rate after the divisions would give 0
        assert_eq!(Ok(14), schedule.pending_reward(35_999, 0, 60, 10, 15));
        assert_eq!(Ok(0), schedule.pending_reward(7, 0, 60, 10, 10));
    }

    #[test]
    fn monotonic_until_lock_expiry() {
        let schedule = RewardSchedule::default();

        for _ in 0..1_000 {
            let staked: u128 = (0..u64::MAX).fake::<u64>().into();
            let apy: u64 = (0..1_000).fake();
            let lock: u64 = (1..10_000).fake();

            let mut previous = 0;
            for units in (0..=lock).step_by((lock / 20).max(1) as usize) {
                let reward = schedule.pending_reward(staked, T0, T0 + units * 60, lock, apy).unwrap();
                assert!(reward >= previous, "reward decreased at {units} units");
                previous = reward;
            }
        }
    }

    #[test]
    fn accrual_stops_at_lock_expiry() {
        let schedule = RewardSchedule::default();

        for _ in 0..1_000 {
            let staked: u128 = (0..u64::MAX).fake::<u64>().into();
            let apy: u64 = (0..1_000).fake();
            let lock: u64 = (0..10_000).fake();
            let extra: u64 = (1..1_000_000).fake();

            assert_eq!(
                schedule.pending_reward(staked, T0, T0 + lock * 60, lock, apy),
                schedule.pending_reward(staked, T0, T0 + (lock + extra) * 60, lock, apy),
            );
        }
    }

    #[test]
    fn custom_schedule() {
        let daily = RewardSchedule {
            seconds_per_unit: 86_400,
            units_per_year: 365,
        };

        assert_eq!(Ok(1_000), daily.pending_reward(365_000, 0, 86_400 * 100, 365, 1));
    }

    #[test]
    fn overflow_and_invalid_schedule() {
        let schedule = RewardSchedule::default();
        assert_eq!(
            Err(RewardError::Overflow),
            schedule.pending_reward(u128::MAX, 0, 600, 10, 10)
        );

        let broken = RewardSchedule {
            seconds_per_unit: 0,
            units_per_year: 360,
        };
        assert_eq!(Err(RewardError::InvalidSchedule), broken.pending_reward(1, 0, 600, 10, 10));
    }
}
