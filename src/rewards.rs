//! Time-weighted reward accrual. All math is integer-only with floor
//! semantics: payouts round down, never up, so the sum of credits can not
//! exceed the tracked reward obligation.

use crate::error::ContractError;
use crate::state::{GlobalRewardState, UserRewardCheckpoint};

/// Scaler of `accumulated_rewards_per_unit`.
pub const RPU_SCALER: u64 = 1_000_000_000;

/// `floor(a * b / scaler)` with a double-width intermediate.
pub fn scaled_mul_div(a: u64, b: u64, scaler: u64) -> Result<u64, ContractError> {
    let product = a as u128 * b as u128;
    u64::try_from(product / scaler as u128).map_err(|_| ContractError::Overflow {})
}

impl GlobalRewardState {
    /// Rate in force at `at`: the current rate inside the window, zero past
    /// its end.
    pub fn effective_rate(&self, at: u64) -> Result<u64, ContractError> {
        if at < self.last_update_timestamp {
            return Err(ContractError::TimeTravel {
                last_update_timestamp: self.last_update_timestamp,
                requested: at,
            });
        }
        if at > self.current_reward_rate_end_timestamp {
            Ok(0)
        } else {
            Ok(self.current_reward_rate_per_time)
        }
    }

    /// Advances the cumulative density and `last_update_timestamp` to
    /// `to_timestamp`. With nothing staked there is no denominator to
    /// distribute into, so only the clock moves.
    pub fn accrue(&mut self, to_timestamp: u64) -> Result<(), ContractError> {
        if to_timestamp < self.last_update_timestamp {
            return Err(ContractError::TimeTravel {
                last_update_timestamp: self.last_update_timestamp,
                requested: to_timestamp,
            });
        }
        if self.total_staked_amount != 0 {
            let delta = self.density_delta(to_timestamp)?;
            self.accumulated_rewards_per_unit = self
                .accumulated_rewards_per_unit
                .checked_add(delta)
                .ok_or(ContractError::Overflow {})?;
        }
        self.last_update_timestamp = to_timestamp;
        Ok(())
    }

    /// Density earned over `[last_update_timestamp, to_timestamp)`. Time past
    /// the rate window accrues at rate zero, so an interval crossing the
    /// expiry reduces to one increment that stops at the boundary.
    fn density_delta(&self, to_timestamp: u64) -> Result<u64, ContractError> {
        let boundary = to_timestamp.min(self.current_reward_rate_end_timestamp);
        if boundary <= self.last_update_timestamp {
            return Ok(0);
        }
        let duration = boundary - self.last_update_timestamp;
        let reward = self.current_reward_rate_per_time as u128 * duration as u128;
        let scaled = reward
            .checked_mul(RPU_SCALER as u128)
            .ok_or(ContractError::Overflow {})?
            / self.total_staked_amount as u128;
        u64::try_from(scaled).map_err(|_| ContractError::Overflow {})
    }

    /// Density the state would hold after `accrue(at)`, without mutating.
    /// Used by read-only queries.
    pub fn projected_rewards_per_unit(&self, at: u64) -> Result<u64, ContractError> {
        if self.total_staked_amount == 0 {
            return Ok(self.accumulated_rewards_per_unit);
        }
        self.accumulated_rewards_per_unit
            .checked_add(self.density_delta(at)?)
            .ok_or(ContractError::Overflow {})
    }

    /// Installs a new reward window. The unspent remainder of a still-open
    /// previous window is reclaimed from `total_reward_amount_sum` before the
    /// new allocation is added.
    pub fn set_reward_rate(
        &mut self,
        total_reward_amount: u64,
        end_timestamp: u64,
        now: u64,
    ) -> Result<(), ContractError> {
        if end_timestamp <= now {
            return Err(ContractError::InvalidWindow {});
        }
        self.accrue(now)?;

        if now < self.current_reward_rate_end_timestamp {
            let unspent = self.current_reward_rate_per_time as u128
                * (self.current_reward_rate_end_timestamp - now) as u128;
            let unspent = u64::try_from(unspent).map_err(|_| ContractError::Overflow {})?;
            self.total_reward_amount_sum = self
                .total_reward_amount_sum
                .checked_sub(unspent)
                .ok_or(ContractError::Overflow {})?;
        }
        self.total_reward_amount_sum = self
            .total_reward_amount_sum
            .checked_add(total_reward_amount)
            .ok_or(ContractError::Overflow {})?;

        self.last_reward_rate_per_time = self.current_reward_rate_per_time;
        self.current_reward_rate_per_time = total_reward_amount / (end_timestamp - now);
        self.current_reward_rate_end_timestamp = end_timestamp;
        Ok(())
    }
}

impl UserRewardCheckpoint {
    /// Reward earned since the checkpoint's last sync, against the given
    /// global density.
    pub fn pending_rewards(&self, accumulated_rewards_per_unit: u64) -> Result<u64, ContractError> {
        let density_delta = accumulated_rewards_per_unit
            .checked_sub(self.accumulated_rewards_per_unit_at_last_update)
            .ok_or(ContractError::Overflow {})?;
        scaled_mul_div(self.staked_amount, density_delta, RPU_SCALER)
    }

    /// Banks pending reward against the old balance and moves the density
    /// reference forward. Must run before any `staked_amount` mutation.
    pub fn sync(&mut self, global: &GlobalRewardState, now: u64) -> Result<u64, ContractError> {
        let pending = self.pending_rewards(global.accumulated_rewards_per_unit)?;
        self.accumulated_rewards = self
            .accumulated_rewards
            .checked_add(pending)
            .ok_or(ContractError::Overflow {})?;
        self.accumulated_rewards_per_unit_at_last_update = global.accumulated_rewards_per_unit;
        self.timestamp = now;
        Ok(pending)
    }
}
