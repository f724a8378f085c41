#[cfg(test)]
pub mod tests {
    use anyhow::Result as AnyResult;
    use cosmwasm_std::{ coin, coins, Addr, Empty, Uint64 };
    use cw_multi_test::{ App, AppBuilder, AppResponse, Contract, ContractWrapper, Executor };

    use crate::helpers::CwTemplateContract;
    use crate::msg::InstantiateMsg;

    pub const USER: &str = "user";
    pub const USER2: &str = "user2";
    pub const MANAGER: &str = "manager";
    pub const STAKED_DENOM: &str = "ustaked";
    pub const REWARD_DENOM: &str = "ureward";
    pub const POWER_THRESHOLD: u64 = 1_000;

    /// Mock of the external voting-power oracle. Answers `PowerOf` with a
    /// per-account override or the instantiate-time default.
    pub mod power_oracle {
        use cosmwasm_schema::cw_serde;
        use cosmwasm_std::{
            to_json_binary,
            Binary,
            Deps,
            DepsMut,
            Empty,
            Env,
            MessageInfo,
            Response,
            StdResult,
            Uint64,
        };
        use cw_multi_test::{ Contract, ContractWrapper };
        use cw_storage_plus::{ Item, Map };

        use crate::msg::PowerOracleQueryMsg;

        #[cw_serde]
        pub struct InstantiateMsg {
            pub default_power: Uint64,
        }

        #[cw_serde]
        pub enum ExecuteMsg {
            SetPower {
                account: String,
                power: Uint64,
            },
        }

        const DEFAULT_POWER: Item<u64> = Item::new("default_power");
        const POWERS: Map<&str, u64> = Map::new("powers");

        fn instantiate(
            deps: DepsMut,
            _env: Env,
            _info: MessageInfo,
            msg: InstantiateMsg
        ) -> StdResult<Response> {
            DEFAULT_POWER.save(deps.storage, &msg.default_power.u64())?;
            Ok(Response::new())
        }

        fn execute(
            deps: DepsMut,
            _env: Env,
            _info: MessageInfo,
            msg: ExecuteMsg
        ) -> StdResult<Response> {
            match msg {
                ExecuteMsg::SetPower { account, power } => {
                    POWERS.save(deps.storage, &account, &power.u64())?;
                    Ok(Response::new())
                }
            }
        }

        fn query(deps: Deps, _env: Env, msg: PowerOracleQueryMsg) -> StdResult<Binary> {
            match msg {
                PowerOracleQueryMsg::PowerOf { account, .. } => {
                    let power = match POWERS.may_load(deps.storage, &account)? {
                        Some(power) => power,
                        None => DEFAULT_POWER.load(deps.storage)?,
                    };
                    to_json_binary(&Uint64::new(power))
                }
            }
        }

        pub fn contract() -> Box<dyn Contract<Empty>> {
            Box::new(ContractWrapper::new(execute, instantiate, query))
        }
    }

    pub fn contract_template() -> Box<dyn Contract<Empty>> {
        Box::new(
            ContractWrapper::new(
                crate::contract::execute,
                crate::contract::instantiate,
                crate::contract::query
            )
        )
    }

    fn mock_app() -> App {
        AppBuilder::new().build(|router, _, storage| {
            router.bank
                .init_balance(storage, &Addr::unchecked(USER), coins(1_000_000_000, STAKED_DENOM))
                .unwrap();
            router.bank
                .init_balance(storage, &Addr::unchecked(USER2), coins(1_000_000_000, STAKED_DENOM))
                .unwrap();
            router.bank
                .init_balance(
                    storage,
                    &Addr::unchecked(MANAGER),
                    vec![coin(1_000_000_000, REWARD_DENOM), coin(1_000_000_000, STAKED_DENOM)]
                )
                .unwrap();
        })
    }

    /// Spins up the oracle and the staking contract. Every account passes the
    /// power gate by default; tests lower individual accounts to exercise it.
    pub fn proper_instantiate() -> (App, CwTemplateContract, Addr) {
        let mut app = mock_app();

        let oracle_code_id = app.store_code(power_oracle::contract());
        let oracle = app
            .instantiate_contract(
                oracle_code_id,
                Addr::unchecked(MANAGER),
                &(power_oracle::InstantiateMsg {
                    default_power: Uint64::new(POWER_THRESHOLD),
                }),
                &[],
                "power-oracle",
                None
            )
            .unwrap();

        let code_id = app.store_code(contract_template());
        let contract_addr = app
            .instantiate_contract(
                code_id,
                Addr::unchecked(MANAGER),
                &(InstantiateMsg {
                    staked_denom: STAKED_DENOM.to_string(),
                    reward_denom: REWARD_DENOM.to_string(),
                    power_oracle: oracle.to_string(),
                    power_threshold: Uint64::new(POWER_THRESHOLD),
                    manager: MANAGER.to_string(),
                }),
                &[],
                "liquid-staking-rewards",
                None
            )
            .unwrap();

        (app, CwTemplateContract(contract_addr), oracle)
    }

    pub fn set_power(app: &mut App, oracle: &Addr, account: &str, power: u64) {
        app.execute_contract(
            Addr::unchecked(MANAGER),
            oracle.clone(),
            &(power_oracle::ExecuteMsg::SetPower {
                account: account.to_string(),
                power: Uint64::new(power),
            }),
            &[]
        ).unwrap();
    }

    pub fn expect_error(res: AnyResult<AppResponse>, message: String) {
        let err = res.unwrap_err();

        assert_eq!(err.root_cause().to_string(), message);
    }
}
