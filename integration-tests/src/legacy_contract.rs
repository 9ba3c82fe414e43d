use staking_dapp_model::pool::RewardSource;

use crate::context::Context;

/// Staking contracts deployed before `pendingReward` existed are read with the local reward schedule.
#[tokio::test]
#[mutants::skip]
async fn legacy_contract_rewards_match() -> anyhow::Result<()> {
    println!("👷🏽 Run legacy contract test");

    let context = Context::new().await?;
    let alice = context.alice.to_string();

    let (dapp, _) = context.dapp(context.alice);
    dapp.orchestrator().stake(0, "5").await?;

    context.fast_forward_minutes(10);

    let modern = dapp.aggregate(&alice).await?;
    let modern = modern.pool(0).expect("Pool 0 is listed");
    assert_eq!(RewardSource::Contract, modern.reward_source);
    assert_eq!(13_888_888_888_888_888, modern.pending_reward_raw.0);

    context.sandbox.remove_method(context.staking, "pendingReward");
    let (legacy, notifier) = context.dapp(context.alice);

    let snapshot = legacy.aggregate(&alice).await?;
    let pool = snapshot.pool(0).expect("Pool 0 is listed");
    assert_eq!(RewardSource::Local, pool.reward_source);
    assert_eq!(modern.pending_reward_raw, pool.pending_reward_raw);

    context.fast_forward_minutes(40);

    let snapshot = legacy.aggregate(&alice).await?;
    assert_eq!(
        41_666_666_666_666_666,
        snapshot.pool(0).expect("Pool 0 is listed").pending_reward_raw.0
    );
    assert!(notifier.errors().is_empty());

    Ok(())
}
