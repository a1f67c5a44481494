//! CLI tool for deploying and interacting with the farming contracts.

use harvest_contracts::farming::farm::Farm;
use harvest_contracts::tokens::receipt_token::ReceiptToken;
use harvest_contracts::tokens::reward_token::RewardToken;
use harvest_contracts::tokens::stake_token::StakeToken;
use odra::casper_types::U256;
use odra::prelude::{Address, Addressable};
use odra::host::HostEnv;
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// Deploys the HVST reward token and the sHVST receipt token.
pub struct TokensDeployScript;

impl DeployScript for TokensDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use odra::host::NoArgs;

        let _reward = RewardToken::load_or_deploy(
            &env,
            NoArgs,
            container,
            300_000_000_000 // Gas limit for token deployment
        )?;

        let _receipt = ReceiptToken::load_or_deploy(
            &env,
            NoArgs,
            container,
            300_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the Farm and hands it the mint/burn roles of both tokens.
/// Requires the tokens to be deployed first.
pub struct FarmDeployScript;

impl DeployScript for FarmDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use harvest_contracts::farming::farm::FarmInitArgs;

        let mut reward = container.contract_ref::<RewardToken>(env)?;
        let mut receipt = container.contract_ref::<ReceiptToken>(env)?;

        let caller = env.caller();
        let farm = Farm::load_or_deploy(
            &env,
            FarmInitArgs {
                reward_token: reward.address().clone(),
                receipt_token: receipt.address().clone(),
                dev: caller,
                reward_per_unit: U256::from(1000),
                start_time: 0,
            },
            container,
            500_000_000_000 // Gas limit for farm deployment
        )?;

        env.set_gas(10_000_000_000);
        reward.try_transfer_minter_role(farm.address().clone())?;
        receipt.try_transfer_farm_role(farm.address().clone())?;

        Ok(())
    }
}

/// Deploys the complete farming stack (tokens + farm).
pub struct FarmingStackDeployScript;

impl DeployScript for FarmingStackDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        // Tokens first, then the farm that controls them
        TokensDeployScript.deploy(env, container)?;
        FarmDeployScript.deploy(env, container)?;

        Ok(())
    }
}

/// Scenario to register a new stake pool.
pub struct AddPoolScenario;

impl Scenario for AddPoolScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "stake_token",
                "Address of the CEP-18 token the pool accepts",
                NamedCLType::Key,
            ),
            CommandArg::new(
                "weight",
                "Emission weight of the new pool",
                NamedCLType::U64,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut farm = container.contract_ref::<Farm>(env)?;
        let stake_token = args.get_single::<Address>("stake_token")?;
        let weight = args.get_single::<u64>("weight")?;

        env.set_gas(100_000_000_000);
        farm.try_add_pool(U256::from(weight), stake_token, true)?;

        println!("Pool registered successfully!");
        Ok(())
    }
}

impl ScenarioMetadata for AddPoolScenario {
    const NAME: &'static str = "add-pool";
    const DESCRIPTION: &'static str = "Registers a new stake pool with the given weight";
}

/// Main function to run the CLI tool.
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the Harvest farming contracts")
        // Deploy scripts
        .deploy(TokensDeployScript)
        .deploy(FarmDeployScript)
        .deploy(FarmingStackDeployScript)
        // Contract references
        .contract::<Farm>()
        .contract::<RewardToken>()
        .contract::<ReceiptToken>()
        .contract::<StakeToken>()
        // Scenarios
        .scenario(AddPoolScenario)
        .build()
        .run();
}
