use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint64;

#[cw_serde]
pub struct InstantiateMsg {
    pub staked_denom: String,
    pub reward_denom: String,
    pub power_oracle: String,
    pub power_threshold: Uint64,
    pub manager: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    IncreaseStake {},
    DecreaseStake {
        amount: Uint64,
    },
    ClaimRewards {},
    /// Plain accrual to the current block time. Permissionless; crossing a
    /// rate expiry is handled transparently.
    UpdateState {},
    SetRewardRate {
        total_reward_amount: Uint64,
        end_timestamp: Uint64,
    },
    SetPowerThreshold {
        threshold: Uint64,
    },
    SetManager {
        address: String,
    },
}

#[cw_serde]
pub enum QueryMsg {
    GetConfig {},
    GetManager {},
    GetState {},
    GetTotalStaked {},
    /// Reward-token balance the contract must hold to stay solvent:
    /// `total_reward_amount_sum - total_claimed_reward_amount`.
    GetRequiredRewardReserve {},
    GetUserCheckpoint {
        account: String,
    },
    GetClaimableAmount {
        account: String,
    },
}

/// Query interface of the external voting-power oracle consulted by the
/// stake/claim gating checks.
#[cw_serde]
pub enum PowerOracleQueryMsg {
    PowerOf { account: String, timestamp: Uint64 },
}
