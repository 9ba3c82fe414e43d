use staking_dapp::{FlowState, OperationKind};
use staking_dapp_model::{notification::NotificationKind, pool::RewardSource, UDecimal};

use crate::context::{Context, TokenUtils};

#[tokio::test]
#[mutants::skip]
async fn happy_flow() -> anyhow::Result<()> {
    println!("👷🏽 Run happy flow test");

    let context = Context::new().await?;
    let (dapp, notifier) = context.dapp(context.alice);
    let alice = context.alice.to_string();

    let snapshot = dapp.aggregate(&alice).await?;
    assert_eq!(2, snapshot.pools.len());
    assert_eq!(context.owner, snapshot.contract_owner);
    assert_eq!("STK", snapshot.deposit_token.symbol);
    assert_eq!(UDecimal::parse("1000", 18)?, snapshot.deposit_token.balance);
    assert!(snapshot.notifications.is_empty());

    dapp.orchestrator().stake(0, "100").await?;
    assert_eq!(
        vec![
            FlowState::Idle,
            FlowState::Validating,
            FlowState::Approving,
            FlowState::Estimating,
            FlowState::Submitting,
            FlowState::Confirming,
            FlowState::Succeeded,
        ],
        notifier.states(OperationKind::Stake)
    );

    let snapshot = dapp.aggregate(&alice).await?;
    assert_eq!(UDecimal::parse("100", 18)?, snapshot.total_deposited);
    assert_eq!(UDecimal::parse("900", 18)?, snapshot.deposit_token.balance);

    context.fast_forward_minutes(30);

    let snapshot = dapp.aggregate(&alice).await?;
    let pool = snapshot.pool(0).expect("Pool 0 is listed");
    assert_eq!(RewardSource::Contract, pool.reward_source);
    assert_eq!(833_333_333_333_333_333, pool.pending_reward_raw.0);

    dapp.orchestrator().claim(0).await?;
    assert_eq!(
        833_333_333_333_333_333,
        context.sandbox.token_balance(context.reward_token, context.alice)
    );

    dapp.orchestrator().unstake(0, "100").await?;
    assert_eq!(
        1_000u128.to_wei(),
        context.sandbox.token_balance(context.deposit_token, context.alice)
    );

    let snapshot = dapp.aggregate(&alice).await?;
    assert!(snapshot.total_deposited.is_zero());
    assert_eq!(
        vec![NotificationKind::Withdraw, NotificationKind::Claim, NotificationKind::Deposit],
        snapshot
            .notifications
            .iter()
            .map(|notification| notification.kind.clone())
            .collect::<Vec<_>>()
    );
    assert!(notifier.errors().is_empty());

    Ok(())
}

#[tokio::test]
#[mutants::skip]
async fn repeated_stakes_approve_each_amount() -> anyhow::Result<()> {
    println!("👷🏽 Run repeated stakes test");

    let context = Context::new().await?;
    let (dapp, _) = context.dapp(context.alice);

    dapp.orchestrator().stake(1, "20").await?;
    dapp.orchestrator().stake(1, "30").await?;

    let approvals = context
        .sandbox
        .writes()
        .into_iter()
        .filter(|write| write.method == "approve")
        .count();
    assert_eq!(2, approvals);
    assert_eq!(0, context.sandbox.allowance(context.deposit_token, context.alice, context.staking));

    let snapshot = dapp.aggregate(&context.alice.to_string()).await?;
    let pool = snapshot.pool(1).expect("Pool 1 is listed");
    assert_eq!(UDecimal::parse("50", 18)?, pool.deposited_amount);
    assert_eq!(25, pool.apy());
    assert_eq!(60, pool.lock_days());

    Ok(())
}
