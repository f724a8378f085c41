use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")] Std(#[from] StdError),

    #[error("Only manager")] Unauthorized {},

    #[error("Invalid funds were provided")] InvalidFunds {},

    #[error("Invalid coin passed in funds")] InvalidCoin {},

    #[error("Amount must be positive")] ZeroAmount {},

    #[error("Clock regression: state is at {last_update_timestamp}, requested {requested}")] TimeTravel {
        last_update_timestamp: u64,
        requested: u64,
    },

    #[error("Reward window must end after it starts")] InvalidWindow {},

    #[error("Insufficient staked balance")] InsufficientStake {},

    #[error("Voting power below threshold")] InsufficientPower {},

    #[error("No checkpoint exists for this account")] UnknownAccount {},

    #[error("Insufficient contract reward balance")] InsufficientRewardBalance {},

    #[error("Arithmetic overflow in reward accounting")] Overflow {},
}
