use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdError, StdResult, Storage};
use cw_storage_plus::Item;

/// Sentinel for "the current rate never lapses".
pub const NO_EXPIRATION: u64 = u64::MAX;

/// Storage slot of the serialized [`GlobalRewardState`].
pub const GLOBAL_STATE_KEY: &[u8] = b"global_state";

/// Per-account checkpoint slots live under this prefix, keyed by address bytes.
pub const USER_CHECKPOINT_PREFIX: &[u8] = b"user_checkpoint/";

#[cw_serde]
pub struct Config {
    pub staked_denom: String,
    pub reward_denom: String,
    pub power_oracle: Addr,
    pub power_threshold: u64,
}

/// Protocol-wide accumulator. Field order is the wire/storage layout and must
/// not be reordered.
#[cw_serde]
pub struct GlobalRewardState {
    pub current_reward_rate_per_time: u64,
    pub current_reward_rate_end_timestamp: u64,
    pub last_reward_rate_per_time: u64,
    /// Cumulative reward density, scaled by `RPU_SCALER`. Never decreases.
    pub accumulated_rewards_per_unit: u64,
    pub total_staked_amount: u64,
    pub total_staker_count: u64,
    /// Timestamp through which `accumulated_rewards_per_unit` is valid.
    pub last_update_timestamp: u64,
    pub total_reward_amount_sum: u64,
    pub total_claimed_reward_amount: u64,
}

/// Per-account record. Created at first stake and retained even at zero
/// balance so the density reference stays defined for a later top-up.
#[cw_serde]
pub struct UserRewardCheckpoint {
    pub staked_amount: u64,
    pub accumulated_rewards_per_unit_at_last_update: u64,
    /// Banked (realized, unclaimed) reward. Zeroed by a claim.
    pub accumulated_rewards: u64,
    pub timestamp: u64,
}

impl GlobalRewardState {
    pub fn new(last_update_timestamp: u64) -> Self {
        GlobalRewardState {
            current_reward_rate_per_time: 0,
            current_reward_rate_end_timestamp: NO_EXPIRATION,
            last_reward_rate_per_time: 0,
            accumulated_rewards_per_unit: 0,
            total_staked_amount: 0,
            total_staker_count: 0,
            last_update_timestamp,
            total_reward_amount_sum: 0,
            total_claimed_reward_amount: 0,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let fields = [
            self.current_reward_rate_per_time,
            self.current_reward_rate_end_timestamp,
            self.last_reward_rate_per_time,
            self.accumulated_rewards_per_unit,
            self.total_staked_amount,
            self.total_staker_count,
            self.last_update_timestamp,
            self.total_reward_amount_sum,
            self.total_claimed_reward_amount,
        ];
        encode_fields(&fields)
    }

    pub fn from_bytes(data: &[u8]) -> StdResult<Self> {
        let fields = decode_fields::<9>("GlobalRewardState", data)?;
        Ok(GlobalRewardState {
            current_reward_rate_per_time: fields[0],
            current_reward_rate_end_timestamp: fields[1],
            last_reward_rate_per_time: fields[2],
            accumulated_rewards_per_unit: fields[3],
            total_staked_amount: fields[4],
            total_staker_count: fields[5],
            last_update_timestamp: fields[6],
            total_reward_amount_sum: fields[7],
            total_claimed_reward_amount: fields[8],
        })
    }

    pub fn load(storage: &dyn Storage) -> StdResult<Self> {
        let data = storage
            .get(GLOBAL_STATE_KEY)
            .ok_or_else(|| StdError::not_found("GlobalRewardState"))?;
        Self::from_bytes(&data)
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        storage.set(GLOBAL_STATE_KEY, &self.to_bytes());
    }
}

impl UserRewardCheckpoint {
    pub fn new() -> Self {
        UserRewardCheckpoint {
            staked_amount: 0,
            accumulated_rewards_per_unit_at_last_update: 0,
            accumulated_rewards: 0,
            timestamp: 0,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let fields = [
            self.staked_amount,
            self.accumulated_rewards_per_unit_at_last_update,
            self.accumulated_rewards,
            self.timestamp,
        ];
        encode_fields(&fields)
    }

    pub fn from_bytes(data: &[u8]) -> StdResult<Self> {
        let fields = decode_fields::<4>("UserRewardCheckpoint", data)?;
        Ok(UserRewardCheckpoint {
            staked_amount: fields[0],
            accumulated_rewards_per_unit_at_last_update: fields[1],
            accumulated_rewards: fields[2],
            timestamp: fields[3],
        })
    }

    pub fn key(account: &Addr) -> Vec<u8> {
        let mut key = Vec::with_capacity(USER_CHECKPOINT_PREFIX.len() + account.as_bytes().len());
        key.extend_from_slice(USER_CHECKPOINT_PREFIX);
        key.extend_from_slice(account.as_bytes());
        key
    }

    pub fn may_load(storage: &dyn Storage, account: &Addr) -> StdResult<Option<Self>> {
        match storage.get(&Self::key(account)) {
            Some(data) => Ok(Some(Self::from_bytes(&data)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, storage: &mut dyn Storage, account: &Addr) {
        storage.set(&Self::key(account), &self.to_bytes());
    }
}

impl Default for UserRewardCheckpoint {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_fields(fields: &[u64]) -> Vec<u8> {
    let mut data = Vec::with_capacity(fields.len() * 8);
    for field in fields {
        data.extend_from_slice(&field.to_be_bytes());
    }
    data
}

fn decode_fields<const N: usize>(kind: &str, data: &[u8]) -> StdResult<[u64; N]> {
    if data.len() != N * 8 {
        return Err(StdError::generic_err(format!(
            "invalid {} encoding: expected {} bytes, got {}",
            kind,
            N * 8,
            data.len()
        )));
    }
    let mut fields = [0u64; N];
    for (i, chunk) in data.chunks_exact(8).enumerate() {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        fields[i] = u64::from_be_bytes(buf);
    }
    Ok(fields)
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const MANAGER: Item<Addr> = Item::new("manager");
