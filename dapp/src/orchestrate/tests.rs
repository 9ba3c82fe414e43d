#![cfg(test)]

use rstest::rstest;
use serde_json::json;
use staking_dapp_model::{sandbox::WriteRecord, transaction::Transaction, UDecimal, U128};

use crate::{
    common::testing::{Context, TokenUtils},
    error::DappError,
    notify::Notice,
    orchestrate::{FlowState, OperationKind, PoolTerms},
};

fn mined(context: &Context) -> Vec<(String, bool)> {
    context
        .sandbox
        .writes()
        .into_iter()
        .map(|WriteRecord { method, status, .. }| (method, status))
        .collect()
}

fn ok(method: &str) -> (String, bool) {
    (method.to_string(), true)
}

#[tokio::test]
async fn stake_without_allowance_approves_first() {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    let receipt = dapp.orchestrator().stake(0, "5").await.unwrap();

    assert!(receipt.status);
    assert_eq!(vec![ok("approve"), ok("deposit")], mined(&context));
    assert_eq!(
        5u128.to_wei(),
        context.sandbox.token_balance(context.deposit_token, context.staking)
    );
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
    assert_eq!(
        vec![
            Notice::Progress("Approving token...".to_string()),
            Notice::Progress("Staking token call...".to_string()),
            Notice::Success("Token staked successfully".to_string()),
        ],
        notifier.messages()
    );
}

#[tokio::test]
async fn stake_with_allowance_skips_approve() {
    let context = Context::new();
    context
        .sandbox
        .apply(
            context.alice,
            Transaction::new(
                context.deposit_token,
                "approve",
                json!([context.staking, U128(10u128.to_wei())]),
            ),
        )
        .unwrap();

    let (dapp, notifier) = context.dapp();
    dapp.orchestrator().stake(0, "5").await.unwrap();

    assert_eq!(vec![ok("deposit")], mined(&context));
    assert!(!notifier.states(OperationKind::Stake).contains(&FlowState::Approving));
    assert_eq!(
        5u128.to_wei(),
        context
            .sandbox
            .allowance(context.deposit_token, context.alice, context.staking)
    );
}

#[tokio::test]
async fn unstake_while_locked_fails_estimation() {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    dapp.orchestrator().stake(0, "5").await.unwrap();
    notifier.clear();

    let result = dapp.orchestrator().unstake(0, "1").await;

    assert_eq!(
        Err(DappError::Estimation {
            reason: Some("Lock is active".to_string())
        }),
        result.map(|receipt| receipt.status)
    );
    assert_eq!(vec![ok("approve"), ok("deposit")], mined(&context));
    assert_eq!(
        vec![
            FlowState::Idle,
            FlowState::Validating,
            FlowState::Estimating,
            FlowState::Failed
        ],
        notifier.states(OperationKind::Unstake)
    );
    assert_eq!(vec!["transaction would fail: Lock is active".to_string()], notifier.errors());
}

#[tokio::test]
async fn unstake_after_lock_returns_stake_and_reward() {
    let context = Context::new();
    let (dapp, _) = context.dapp();

    dapp.orchestrator().stake(0, "5").await.unwrap();
    context.fast_forward_minutes(30);
    dapp.orchestrator().unstake(0, "5").await.unwrap();

    assert_eq!(
        1_000u128.to_wei(),
        context.sandbox.token_balance(context.deposit_token, context.alice)
    );
    // 5e18 * 30 * 10 / 360 / 100
    assert_eq!(
        41_666_666_666_666_666,
        context.sandbox.token_balance(context.reward_token, context.alice)
    );
}

#[tokio::test]
async fn claim_pays_pending_reward() {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    dapp.orchestrator().stake(0, "5").await.unwrap();
    context.fast_forward_minutes(10);

    let snapshot = dapp.aggregate(&context.alice.to_string()).await.unwrap();
    let pending = snapshot.pool(0).unwrap().pending_reward_raw;

    dapp.orchestrator().claim(0).await.unwrap();

    assert_eq!(13_888_888_888_888_888, pending.0);
    assert_eq!(
        pending.0,
        context.sandbox.token_balance(context.reward_token, context.alice)
    );
    assert_eq!(
        Some(&Notice::Success("Transaction successfully completed".to_string())),
        notifier.messages().last()
    );

    let result = dapp.orchestrator().claim(0).await;
    assert_eq!(
        Err(DappError::Estimation {
            reason: Some("No reward to claim".to_string())
        }),
        result.map(|receipt| receipt.status)
    );
}

#[tokio::test]
async fn validation_precedes_remote_calls() {
    let context = Context::new();
    let (dapp, notifier) = context.disconnected_dapp();
    let details = DappError::validation("Provide all the details");

    assert_eq!(Err(details.clone()), dapp.orchestrator().stake(0, " ").await.map(|_| ()));
    assert_eq!(Err(details.clone()), dapp.orchestrator().unstake(0, "").await.map(|_| ()));
    assert_eq!(Err(details.clone()), dapp.orchestrator().transfer("", "1").await.map(|_| ()));
    assert_eq!(
        Err(details.clone()),
        dapp.orchestrator().add_pool(&PoolTerms::default()).await.map(|_| ())
    );
    assert_eq!(Err(details.clone()), dapp.orchestrator().modify_pool(0, "").await.map(|_| ()));
    assert_eq!(Err(details.clone()), dapp.orchestrator().buy("").await.map(|_| ()));
    assert_eq!(Err(details), dapp.orchestrator().update_token_price("").await.map(|_| ()));

    assert!(matches!(
        dapp.orchestrator().transfer("0x12", "1").await,
        Err(DappError::Validation(_))
    ));
    assert!(matches!(
        dapp.orchestrator().modify_pool(0, "12.5").await,
        Err(DappError::Validation(_))
    ));

    assert_eq!(
        vec![FlowState::Idle, FlowState::Validating, FlowState::Failed],
        notifier.states(OperationKind::Stake)
    );
    assert_eq!(9, notifier.errors().len());
    assert!(context.sandbox.writes().is_empty());
}

#[tokio::test]
async fn malformed_amounts_fail_without_a_wallet() {
    let context = Context::new();
    let (dapp, notifier) = context.disconnected_dapp();
    let zero = DappError::validation("Amount should be greater than 0");
    let bob = context.bob.to_string();
    let reward_token = context.reward_token.to_string();

    assert_eq!(
        Err(DappError::validation("amount `1.5.3` is not a non-negative decimal number")),
        dapp.orchestrator().stake(0, "1.5.3").await.map(|_| ())
    );
    assert_eq!(Err(zero.clone()), dapp.orchestrator().stake(0, "0").await.map(|_| ()));
    assert_eq!(
        Err(DappError::validation("amount `-1` is not a non-negative decimal number")),
        dapp.orchestrator().unstake(0, "-1").await.map(|_| ())
    );
    assert_eq!(
        Err(DappError::validation("amount `abc` is not a non-negative decimal number")),
        dapp.orchestrator().transfer(&bob, "abc").await.map(|_| ())
    );
    assert_eq!(Err(zero), dapp.orchestrator().sweep(&reward_token, "0.00").await.map(|_| ()));

    assert_eq!(
        vec![FlowState::Idle, FlowState::Validating, FlowState::Failed],
        notifier.states(OperationKind::Sweep)
    );
    assert_eq!(5, notifier.errors().len());
    assert!(context.sandbox.writes().is_empty());
}

#[rstest]
#[case("0.000", "Amount should be greater than 0")]
#[case("1.5.3", "amount `1.5.3` is not a non-negative decimal number")]
#[case("0.0000000000000000001", "amount `0.0000000000000000001` has more than 18 fractional digits")]
#[tokio::test]
async fn malformed_amounts(#[case] amount: &str, #[case] message: &str) {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    assert_eq!(
        Err(DappError::validation(message)),
        dapp.orchestrator().stake(0, amount).await.map(|_| ())
    );
    assert_eq!(vec![message.to_string()], notifier.errors());
    assert!(context.sandbox.writes().is_empty());
}

#[tokio::test]
async fn one_flow_per_operation_kind() {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    let running = dapp.orchestrator().in_flight.acquire(OperationKind::Stake).unwrap();

    assert_eq!(
        Err(DappError::validation("Another stake transaction is in progress")),
        dapp.orchestrator().stake(0, "5").await.map(|_| ())
    );
    assert!(context.sandbox.writes().is_empty());

    dapp.orchestrator().transfer(&context.bob.to_string(), "1").await.unwrap();

    drop(running);
    dapp.orchestrator().stake(0, "5").await.unwrap();

    assert_eq!(
        vec!["Another stake transaction is in progress".to_string()],
        notifier.errors()
    );
}

#[tokio::test]
async fn transfer_project_token() {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    dapp.orchestrator()
        .transfer(&context.bob.to_string(), "12.5")
        .await
        .unwrap();

    assert_eq!(
        12_500_000_000_000_000_000,
        context.sandbox.token_balance(context.deposit_token, context.bob)
    );
    assert_eq!(
        vec![
            Notice::Progress("Calling token transfer...".to_string()),
            Notice::Success("Token transferred successfully".to_string()),
        ],
        notifier.messages()
    );
}

#[tokio::test]
async fn administer_pools() {
    let mut context = Context::new();

    let (dapp, _) = context.dapp();
    let terms = PoolTerms {
        deposit_token: context.deposit_token.to_string(),
        reward_token: context.reward_token.to_string(),
        apy: "40".to_string(),
        lock_days: "90".to_string(),
    };

    assert_eq!(
        Err(DappError::Estimation {
            reason: Some("Ownable: caller is not the owner".to_string())
        }),
        dapp.orchestrator().add_pool(&terms).await.map(|_| ())
    );

    context.switch_account(context.owner);
    let (dapp, notifier) = context.dapp();

    dapp.orchestrator().add_pool(&terms).await.unwrap();
    dapp.orchestrator().modify_pool(0, "20").await.unwrap();

    let snapshot = dapp.aggregate(&context.owner.to_string()).await.unwrap();
    assert_eq!(3, snapshot.pools.len());
    assert_eq!(20, snapshot.pool(0).unwrap().apy());
    assert_eq!(40, snapshot.pool(2).unwrap().apy());
    assert_eq!(90, snapshot.pool(2).unwrap().lock_days());

    assert_eq!(
        vec![
            Notice::Progress("Calling contract...".to_string()),
            Notice::Success("Pool created successfully".to_string()),
            Notice::Progress("Calling contract...".to_string()),
            Notice::Success("Pool modified successfully".to_string()),
        ],
        notifier.messages()
    );
}

#[tokio::test]
async fn sweep_to_owner() {
    let mut context = Context::new();
    context.switch_account(context.owner);
    let before = context.sandbox.token_balance(context.reward_token, context.owner);

    let (dapp, _) = context.dapp();
    dapp.orchestrator()
        .sweep(&context.reward_token.to_string(), "100")
        .await
        .unwrap();

    assert_eq!(
        before + 100u128.to_wei(),
        context.sandbox.token_balance(context.reward_token, context.owner)
    );
    assert_eq!(
        99_900u128.to_wei(),
        context.sandbox.token_balance(context.reward_token, context.staking)
    );
}

#[tokio::test]
async fn buy_tokens() {
    let context = Context::new().with_ico(1_000_000_000_000_000);
    let (dapp, notifier) = context.dapp();

    dapp.orchestrator().buy("3").await.unwrap();

    assert_eq!(3u128.to_wei(), context.sandbox.token_balance(context.ico_token, context.alice));
    assert_eq!(
        100u128.to_wei() - 3_000_000_000_000_000,
        context.sandbox.native_balance(context.alice)
    );
    assert_eq!(
        Some(&Notice::Success("Token purchased successfully".to_string())),
        notifier.messages().last()
    );

    let ico = dapp.load_ico(&context.alice.to_string()).await.unwrap().unwrap();
    assert_eq!(3, ico.sold_tokens);
    assert_eq!(UDecimal::new(9_997, 0), ico.available);

    assert_eq!(
        Err(DappError::validation("Amount must be a whole number")),
        dapp.orchestrator().buy("1.5").await.map(|_| ())
    );
    assert_eq!(
        Err(DappError::Estimation {
            reason: Some("Not enough tokens left for sale".to_string())
        }),
        dapp.orchestrator().buy("20000").await.map(|_| ())
    );
}

#[tokio::test]
async fn buy_without_funds() {
    let mut context = Context::new().with_ico(1_000_000_000_000_000);
    context.switch_account(context.bob);
    let (dapp, _) = context.dapp();

    assert!(matches!(
        dapp.orchestrator().buy("1").await,
        Err(DappError::Estimation { reason: Some(_) })
    ));
    assert!(context.sandbox.writes().is_empty());
}

#[tokio::test]
async fn administer_token_sale() {
    let mut context = Context::new().with_ico(1_000_000_000_000_000);

    let (dapp, _) = context.dapp();
    assert_eq!(
        Err(DappError::Estimation {
            reason: Some("Only owner can perform this action".to_string())
        }),
        dapp.orchestrator().update_token_price("0.002").await.map(|_| ())
    );

    context.switch_account(context.owner);
    let (dapp, notifier) = context.dapp();

    dapp.orchestrator().update_token_price("0.002").await.unwrap();
    let ico = dapp.load_ico(&context.owner.to_string()).await.unwrap().unwrap();
    assert_eq!("0.002", ico.token_price.to_string());

    dapp.orchestrator().withdraw_all().await.unwrap();
    assert_eq!(0, context.sandbox.token_balance(context.ico_token, context.ico));

    let nothing_left = DappError::validation("Insufficient tokens available for purchase/withdrawal");
    assert_eq!(Err(nothing_left.clone()), dapp.orchestrator().withdraw_all().await.map(|_| ()));
    assert_eq!(Err(nothing_left), dapp.orchestrator().buy("1").await.map(|_| ()));

    dapp.orchestrator()
        .update_token_address(&context.reward_token.to_string())
        .await
        .unwrap();
    let ico = dapp.load_ico(&context.owner.to_string()).await.unwrap().unwrap();
    assert_eq!(context.reward_token, ico.token_address);
    assert_eq!("RWD", ico.symbol);

    assert_eq!(
        Some(&Notice::Success("Transaction completed successfully".to_string())),
        notifier.messages().last()
    );
}
