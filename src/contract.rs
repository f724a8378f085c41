#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary,
    Addr,
    BankMsg,
    Binary,
    Coin,
    CosmosMsg,
    Deps,
    DepsMut,
    Env,
    MessageInfo,
    Response,
    StdError,
    StdResult,
    Uint128,
    Uint64,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{ ExecuteMsg, InstantiateMsg, PowerOracleQueryMsg, QueryMsg };
use crate::state::{ Config, GlobalRewardState, UserRewardCheckpoint, CONFIG, MANAGER };

// version info for migration info
const CONTRACT_NAME: &str = "liquid-staking-rewards";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg
) -> Result<Response, ContractError> {
    let config = Config {
        staked_denom: msg.staked_denom,
        reward_denom: msg.reward_denom,
        power_oracle: deps.api.addr_validate(&msg.power_oracle)?,
        power_threshold: msg.power_threshold.u64(),
    };

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    CONFIG.save(deps.storage, &config)?;
    MANAGER.save(deps.storage, &deps.api.addr_validate(&msg.manager)?)?;

    let state = GlobalRewardState::new(env.block.time.seconds());
    state.save(deps.storage);

    Ok(
        Response::new()
            .add_attribute("method", "instantiate")
            .add_attribute("manager", msg.manager)
            .add_attribute("staked_denom", config.staked_denom)
            .add_attribute("reward_denom", config.reward_denom)
    )
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::IncreaseStake {} => increase_stake(deps, env, info),
        ExecuteMsg::DecreaseStake { amount } => decrease_stake(deps, env, info, amount),
        ExecuteMsg::ClaimRewards {} => claim_rewards(deps, env, info),
        ExecuteMsg::UpdateState {} => update_state(deps, env),
        ExecuteMsg::SetRewardRate { total_reward_amount, end_timestamp } =>
            set_reward_rate(deps, env, info, total_reward_amount, end_timestamp),
        ExecuteMsg::SetPowerThreshold { threshold } => set_power_threshold(deps, info, threshold),
        ExecuteMsg::SetManager { address } => set_manager(deps, info, address),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetConfig {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::GetManager {} => to_json_binary(&MANAGER.load(deps.storage)?),
        QueryMsg::GetState {} => to_json_binary(&GlobalRewardState::load(deps.storage)?),
        QueryMsg::GetTotalStaked {} => to_json_binary(&query_total_staked(deps)?),
        QueryMsg::GetRequiredRewardReserve {} =>
            to_json_binary(&query_required_reward_reserve(deps)?),
        QueryMsg::GetUserCheckpoint { account } =>
            to_json_binary(&query_user_checkpoint(deps, account)?),
        QueryMsg::GetClaimableAmount { account } =>
            to_json_binary(&query_claimable_amount(deps, env, account)?),
    }
}

pub fn increase_stake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds {});
    }

    let coin = &info.funds[0];

    if coin.denom != config.staked_denom {
        return Err(ContractError::InvalidCoin {});
    }
    if coin.amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }

    let amount = u64::try_from(coin.amount.u128()).map_err(|_| ContractError::Overflow {})?;
    let now = env.block.time.seconds();

    assert_power(deps.as_ref(), &config, &info.sender, now)?;

    let mut state = GlobalRewardState::load(deps.storage)?;
    state.accrue(now)?;

    let mut checkpoint = UserRewardCheckpoint::may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    checkpoint.sync(&state, now)?;

    let first_stake = checkpoint.staked_amount == 0;
    checkpoint.staked_amount = checkpoint.staked_amount
        .checked_add(amount)
        .ok_or(ContractError::Overflow {})?;
    state.total_staked_amount = state.total_staked_amount
        .checked_add(amount)
        .ok_or(ContractError::Overflow {})?;
    if first_stake {
        state.total_staker_count += 1;
    }

    checkpoint.save(deps.storage, &info.sender);
    state.save(deps.storage);

    Ok(
        Response::new()
            .add_attribute("method", "increase_stake")
            .add_attribute("user", info.sender)
            .add_attribute("amount_staked", amount.to_string())
            .add_attribute(
                "accumulated_rewards_per_unit",
                state.accumulated_rewards_per_unit.to_string()
            )
    )
}

pub fn decrease_stake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint64
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let amount = amount.u64();

    if amount == 0 {
        return Err(ContractError::ZeroAmount {});
    }

    let mut checkpoint = UserRewardCheckpoint::may_load(deps.storage, &info.sender)?.ok_or(
        ContractError::UnknownAccount {}
    )?;

    if amount > checkpoint.staked_amount {
        return Err(ContractError::InsufficientStake {});
    }

    let now = env.block.time.seconds();
    assert_power(deps.as_ref(), &config, &info.sender, now)?;

    let mut state = GlobalRewardState::load(deps.storage)?;
    state.accrue(now)?;
    checkpoint.sync(&state, now)?;

    checkpoint.staked_amount -= amount;
    state.total_staked_amount -= amount;
    // the checkpoint is retained at zero balance; only the count drops
    if checkpoint.staked_amount == 0 {
        state.total_staker_count -= 1;
    }

    checkpoint.save(deps.storage, &info.sender);
    state.save(deps.storage);

    let payout_msg = BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: vec![Coin {
            denom: config.staked_denom,
            amount: Uint128::from(amount),
        }],
    };

    Ok(
        Response::new()
            .add_message(CosmosMsg::Bank(payout_msg))
            .add_attribute("method", "decrease_stake")
            .add_attribute("user", info.sender)
            .add_attribute("amount_unstaked", amount.to_string())
    )
}

pub fn claim_rewards(
    deps: DepsMut,
    env: Env,
    info: MessageInfo
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let now = env.block.time.seconds();

    let mut checkpoint = UserRewardCheckpoint::may_load(deps.storage, &info.sender)?.ok_or(
        ContractError::UnknownAccount {}
    )?;

    assert_power(deps.as_ref(), &config, &info.sender, now)?;

    let mut state = GlobalRewardState::load(deps.storage)?;
    state.accrue(now)?;
    checkpoint.sync(&state, now)?;

    let payout = checkpoint.accumulated_rewards;
    checkpoint.accumulated_rewards = 0;
    state.total_claimed_reward_amount = state.total_claimed_reward_amount
        .checked_add(payout)
        .ok_or(ContractError::Overflow {})?;

    let mut response = Response::new()
        .add_attribute("method", "claim_rewards")
        .add_attribute("user", info.sender.clone())
        .add_attribute("amount_claimed", payout.to_string());

    // a second claim within the same instant pays zero, it is not an error
    if payout > 0 {
        let balance = deps.querier.query_balance(
            env.contract.address.to_string(),
            config.reward_denom.clone()
        )?;
        let mut required = payout as u128;
        if config.reward_denom == config.staked_denom {
            required += state.total_staked_amount as u128;
        }
        if balance.amount.u128() < required {
            return Err(ContractError::InsufficientRewardBalance {});
        }

        response = response.add_message(
            CosmosMsg::Bank(BankMsg::Send {
                to_address: info.sender.to_string(),
                amount: vec![Coin {
                    denom: config.reward_denom,
                    amount: Uint128::from(payout),
                }],
            })
        );
    }

    checkpoint.save(deps.storage, &info.sender);
    state.save(deps.storage);

    Ok(response)
}

pub fn update_state(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let mut state = GlobalRewardState::load(deps.storage)?;
    state.accrue(env.block.time.seconds())?;
    state.save(deps.storage);

    Ok(
        Response::new()
            .add_attribute("method", "update_state")
            .add_attribute("last_update_timestamp", state.last_update_timestamp.to_string())
            .add_attribute(
                "accumulated_rewards_per_unit",
                state.accumulated_rewards_per_unit.to_string()
            )
    )
}

pub fn set_reward_rate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    total_reward_amount: Uint64,
    end_timestamp: Uint64
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let manager = MANAGER.load(deps.storage)?;

    if manager != info.sender {
        return Err(ContractError::Unauthorized {});
    }

    // the reward allocation may be topped up with the same call
    if !info.funds.is_empty() {
        if info.funds.len() != 1 {
            return Err(ContractError::InvalidFunds {});
        }
        if info.funds[0].denom != config.reward_denom {
            return Err(ContractError::InvalidCoin {});
        }
    }

    let mut state = GlobalRewardState::load(deps.storage)?;
    state.set_reward_rate(
        total_reward_amount.u64(),
        end_timestamp.u64(),
        env.block.time.seconds()
    )?;
    state.save(deps.storage);

    Ok(
        Response::new()
            .add_attribute("method", "set_reward_rate")
            .add_attribute("reward_rate_per_time", state.current_reward_rate_per_time.to_string())
            .add_attribute("end_timestamp", state.current_reward_rate_end_timestamp.to_string())
            .add_attribute("total_reward_amount_sum", state.total_reward_amount_sum.to_string())
    )
}

pub fn set_power_threshold(
    deps: DepsMut,
    info: MessageInfo,
    threshold: Uint64
) -> Result<Response, ContractError> {
    let manager = MANAGER.load(deps.storage)?;

    if manager != info.sender {
        return Err(ContractError::Unauthorized {});
    }

    CONFIG.update(deps.storage, |mut config| -> StdResult<Config> {
        config.power_threshold = threshold.u64();
        Ok(config)
    })?;

    Ok(
        Response::new()
            .add_attribute("method", "set_power_threshold")
            .add_attribute("power_threshold", threshold.to_string())
    )
}

pub fn set_manager(
    deps: DepsMut,
    info: MessageInfo,
    new_manager: String
) -> Result<Response, ContractError> {
    let manager = MANAGER.load(deps.storage)?;

    if manager != info.sender {
        return Err(ContractError::Unauthorized {});
    }

    MANAGER.save(deps.storage, &deps.api.addr_validate(&new_manager)?)?;

    Ok(Response::new().add_attribute("method", "set_manager").add_attribute("manager", new_manager))
}

fn assert_power(
    deps: Deps,
    config: &Config,
    account: &Addr,
    now: u64
) -> Result<(), ContractError> {
    let power: Uint64 = deps.querier.query_wasm_smart(
        config.power_oracle.clone(),
        &(PowerOracleQueryMsg::PowerOf {
            account: account.to_string(),
            timestamp: Uint64::new(now),
        })
    )?;

    if power.u64() < config.power_threshold {
        return Err(ContractError::InsufficientPower {});
    }

    Ok(())
}

pub fn query_total_staked(deps: Deps) -> StdResult<Uint64> {
    let state = GlobalRewardState::load(deps.storage)?;

    Ok(Uint64::new(state.total_staked_amount))
}

pub fn query_required_reward_reserve(deps: Deps) -> StdResult<Uint64> {
    let state = GlobalRewardState::load(deps.storage)?;

    Ok(
        Uint64::new(
            state.total_reward_amount_sum.saturating_sub(state.total_claimed_reward_amount)
        )
    )
}

pub fn query_user_checkpoint(deps: Deps, account: String) -> StdResult<UserRewardCheckpoint> {
    let account = deps.api.addr_validate(&account)?;

    UserRewardCheckpoint::may_load(deps.storage, &account)?.ok_or_else(||
        StdError::not_found("UserRewardCheckpoint")
    )
}

pub fn query_claimable_amount(deps: Deps, env: Env, account: String) -> StdResult<Uint64> {
    let account = deps.api.addr_validate(&account)?;
    let state = GlobalRewardState::load(deps.storage)?;
    let checkpoint = UserRewardCheckpoint::may_load(deps.storage, &account)?.ok_or_else(||
        StdError::not_found("UserRewardCheckpoint")
    )?;

    let projected = state
        .projected_rewards_per_unit(env.block.time.seconds())
        .map_err(|err| StdError::generic_err(err.to_string()))?;
    let pending = checkpoint
        .pending_rewards(projected)
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    Ok(Uint64::new(checkpoint.accumulated_rewards + pending))
}
