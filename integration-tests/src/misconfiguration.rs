use std::sync::Arc;

use staking_dapp::{notify::RecordingNotifier, Config, DappError, StakingDapp};
use staking_dapp_model::Address;

use crate::context::Context;

fn dapp(context: &Context, config: Config) -> (StakingDapp, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let dapp = StakingDapp::new(
        config,
        Arc::new(context.sandbox.provider(context.alice)),
        notifier.clone(),
    );
    (dapp, notifier)
}

#[tokio::test]
#[mutants::skip]
async fn staking_contract_on_another_network() -> anyhow::Result<()> {
    println!("👷🏽 Run missing staking contract test");

    let context = Context::new().await?;
    let nowhere = context.sandbox.account();

    let (dapp, notifier) = dapp(
        &context,
        Config {
            staking_contract: nowhere,
            ..context.config.clone()
        },
    );

    let result = dapp.aggregate(&context.alice.to_string()).await;
    assert_eq!(Err(DappError::ContractNotFound { address: nowhere }), result);

    let result = dapp.orchestrator().claim(0).await;
    assert!(matches!(result, Err(DappError::ContractNotFound { .. })));
    assert_eq!(2, notifier.errors().len());

    Ok(())
}

#[tokio::test]
#[mutants::skip]
async fn unset_reward_token() -> anyhow::Result<()> {
    println!("👷🏽 Run unset reward token test");

    let context = Context::new().await?;
    let (dapp, _) = dapp(
        &context,
        Config {
            reward_token: Address::ZERO,
            ..context.config.clone()
        },
    );

    let result = dapp.aggregate(&context.alice.to_string()).await;
    assert!(matches!(result, Err(DappError::Configuration(_))));

    // No token sale in this deployment
    let result = dapp.load_ico(&context.alice.to_string()).await;
    assert!(matches!(result, Err(DappError::Configuration(_))));

    Ok(())
}

#[tokio::test]
#[mutants::skip]
async fn wallet_not_connected() -> anyhow::Result<()> {
    println!("👷🏽 Run disconnected wallet test");

    let context = Context::new().await?;
    let notifier = Arc::new(RecordingNotifier::default());
    let dapp = StakingDapp::new(
        context.config.clone(),
        Arc::new(context.sandbox.disconnected()),
        notifier.clone(),
    );

    let result = dapp.aggregate(&context.alice.to_string()).await;
    assert!(matches!(result, Err(DappError::Connectivity(_))));

    let result = dapp.orchestrator().stake(0, "1").await;
    assert!(matches!(result, Err(DappError::Connectivity(_))));

    let result = dapp.aggregate("alice").await;
    assert!(matches!(result, Err(DappError::Validation(_))));
    assert_eq!(3, notifier.errors().len());

    Ok(())
}
