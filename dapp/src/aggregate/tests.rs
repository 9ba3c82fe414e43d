#![cfg(test)]

use serde_json::json;
use staking_dapp_model::{
    notification::NotificationKind, pool::RewardSource, readable_timestamp, sandbox::GENESIS_TIMESTAMP,
    transaction::Transaction, Address, UDecimal, U128,
};

use crate::{
    common::testing::{Context, TokenUtils},
    error::DappError,
};

#[tokio::test]
async fn no_pools() {
    let mut context = Context::new();
    context.config.staking_contract = context.sandbox.deploy_staking(context.owner);

    let (dapp, _) = context.dapp();
    let snapshot = dapp.aggregate(&context.alice.to_string()).await.unwrap();

    assert!(snapshot.pools.is_empty());
    assert!(snapshot.notifications.is_empty());
    assert_eq!(UDecimal::zero(), snapshot.total_deposited);
    assert_eq!(context.config.staking_contract, snapshot.contract_address);
}

#[tokio::test]
async fn snapshot_of_staked_position() {
    let context = Context::new();
    context.stake_directly(context.alice, 0, 5u128.to_wei());
    context.fast_forward_minutes(30);

    let (dapp, notifier) = context.dapp();
    let snapshot = dapp.aggregate(&context.alice.to_string()).await.unwrap();

    assert_eq!(context.owner, snapshot.contract_owner);
    assert_eq!(2, snapshot.pools.len());

    let pool = snapshot.pool(0).unwrap();
    assert_eq!(10, pool.apy());
    assert_eq!(30, pool.lock_days());
    assert_eq!(UDecimal::new(5, 0), pool.deposited_amount);
    assert_eq!(RewardSource::Contract, pool.reward_source);
    // 5e18 * 30 * 10 / 360 / 100
    assert_eq!(U128(41_666_666_666_666_666), pool.pending_reward_raw);
    assert_eq!("0.041666666666666666", pool.pending_reward.to_string());
    assert_eq!("STK", pool.deposit_token.symbol);
    assert_eq!("RWD", pool.reward_token.symbol);

    let untouched = snapshot.pool(1).unwrap();
    assert!(untouched.deposited_amount.is_zero());
    assert_eq!(U128(0), untouched.pending_reward_raw);

    assert_eq!(UDecimal::new(5, 0), snapshot.total_deposited);
    assert_eq!(UDecimal::zero(), snapshot.available_supply);
    assert_eq!(UDecimal::new(995, 0), snapshot.deposit_token.balance);

    assert_eq!(1, snapshot.notifications.len());
    let notification = &snapshot.notifications[0];
    assert_eq!(NotificationKind::Deposit, notification.kind);
    assert_eq!(UDecimal::new(5, 0), notification.amount);
    assert_eq!(context.alice, notification.user);
    assert_eq!(readable_timestamp(GENESIS_TIMESTAMP), notification.date);

    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn reward_stops_at_lock_expiry() {
    let context = Context::new();
    context.stake_directly(context.alice, 0, 5u128.to_wei());
    context.fast_forward_minutes(30);

    let (dapp, _) = context.dapp();
    let at_expiry = dapp.aggregate(&context.alice.to_string()).await.unwrap();

    context.fast_forward_minutes(600);
    let later = dapp.aggregate(&context.alice.to_string()).await.unwrap();

    assert_eq!(
        at_expiry.pool(0).unwrap().pending_reward_raw,
        later.pool(0).unwrap().pending_reward_raw
    );
}

#[tokio::test]
async fn local_reward_matches_contract() {
    let context = Context::new();
    context.stake_directly(context.alice, 0, 7u128.to_wei());
    context.stake_directly(context.alice, 1, 3u128.to_wei() + 1);

    for minutes in [0, 1, 17, 29, 45, 90] {
        let (remote, _) = context.dapp();
        let remote = remote.aggregate(&context.alice.to_string()).await.unwrap();

        context.sandbox.remove_method(context.staking, "pendingReward");
        let (local, _) = context.dapp();
        let local = local.aggregate(&context.alice.to_string()).await.unwrap();
        context.sandbox.clear_removed();

        for (remote, local) in remote.pools.iter().zip(&local.pools) {
            assert_eq!(RewardSource::Contract, remote.reward_source);
            assert_eq!(RewardSource::Local, local.reward_source);
            assert_eq!(
                remote.pending_reward_raw, local.pending_reward_raw,
                "pool {} after {minutes} minutes",
                remote.pool_id
            );
        }

        context.fast_forward_minutes(minutes);
    }
}

#[tokio::test]
async fn failed_position_read_aborts() {
    let context = Context::new();
    context.stake_directly(context.alice, 0, 5u128.to_wei());
    context.sandbox.fail_method(context.staking, "userInfo");

    let (dapp, notifier) = context.dapp();
    let result = dapp.aggregate(&context.alice.to_string()).await;

    assert_eq!(
        Err(DappError::ContractCall {
            reason: Some("userInfo failed".to_string())
        }),
        result.map(|snapshot| snapshot.pools.len())
    );
    assert_eq!(
        vec!["contract call failed: userInfo failed".to_string()],
        notifier.errors()
    );
}

#[tokio::test]
async fn one_failed_pool_aborts_the_whole_snapshot() {
    let context = Context::new();
    context.stake_directly(context.alice, 0, 5u128.to_wei());
    context.stake_directly(context.alice, 1, 3u128.to_wei());
    context
        .sandbox
        .fail_call(context.staking, "userInfo", json!([1, context.alice]));

    let (dapp, notifier) = context.dapp();
    let result = dapp.aggregate(&context.alice.to_string()).await;

    assert_eq!(
        Err(DappError::ContractCall {
            reason: Some("userInfo failed".to_string())
        }),
        result.map(|snapshot| snapshot.pools.len())
    );
    assert_eq!(1, notifier.errors().len());

    context.sandbox.clear_faults();

    let snapshot = dapp.aggregate(&context.alice.to_string()).await.unwrap();
    assert_eq!(2, snapshot.pools.len());
    assert_eq!(UDecimal::parse("8", 18).unwrap(), snapshot.total_deposited);
}

#[tokio::test]
async fn reverted_symbol_degrades() {
    let context = Context::new();
    context.sandbox.fail_method(context.reward_token, "symbol");

    let (dapp, notifier) = context.dapp();
    let snapshot = dapp.aggregate(&context.alice.to_string()).await.unwrap();

    assert_eq!("", snapshot.reward_token.symbol);
    assert_eq!("", snapshot.pool(0).unwrap().reward_token.symbol);
    assert_eq!("Reward Token", snapshot.reward_token.name);
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn amounts_use_each_token_decimals() {
    let context = Context::new();
    let six = context.deploy_token("Six Decimals", "SIX", 6, 1_000_000_000_000);
    context.add_pool(six, context.reward_token, 10, 30);
    context.transfer(six, context.owner, context.alice, 10_000_000);

    context.stake_directly(context.alice, 0, 5u128.to_wei());
    context
        .sandbox
        .apply(
            context.alice,
            Transaction::new(six, "approve", json!([context.staking, U128(2_500_000)])),
        )
        .unwrap();
    context
        .sandbox
        .apply(
            context.alice,
            Transaction::new(context.staking, "deposit", json!([2, U128(2_500_000)])),
        )
        .unwrap();

    let (dapp, _) = context.dapp();
    let snapshot = dapp.aggregate(&context.alice.to_string()).await.unwrap();

    let pool = snapshot.pool(2).unwrap();
    assert_eq!(6, pool.deposit_token.decimals);
    assert_eq!("2.5", pool.deposited_amount.to_string());
    assert_eq!("7.5", snapshot.total_deposited.to_string());

    assert_eq!(2, snapshot.notifications[0].pool_id);
    assert_eq!("2.5", snapshot.notifications[0].amount.to_string());
    assert_eq!("5.0", snapshot.notifications[1].amount.to_string());
}

#[tokio::test]
async fn missing_user_address() {
    let context = Context::new();
    let (dapp, notifier) = context.dapp();

    assert_eq!(
        Err(DappError::validation("User address is required")),
        dapp.aggregate("  ").await.map(|snapshot| snapshot.pools.len())
    );
    assert!(matches!(
        dapp.aggregate("0x1234").await,
        Err(DappError::Validation(_))
    ));
    assert_eq!(2, notifier.errors().len());
}

#[tokio::test]
async fn disconnected_wallet() {
    let context = Context::new();
    let (dapp, _) = context.disconnected_dapp();

    assert!(matches!(
        dapp.aggregate(&context.alice.to_string()).await,
        Err(DappError::Connectivity(_))
    ));
}

#[tokio::test]
async fn ico_snapshot() {
    let context = Context::new().with_ico(1_000_000_000_000_000);
    let (dapp, _) = context.dapp();

    let ico = dapp.load_ico(&context.alice.to_string()).await.unwrap().unwrap();

    assert_eq!(context.ico_token, ico.token_address);
    assert_eq!("ICO", ico.symbol);
    assert_eq!(UDecimal::new(10_000, 0), ico.available);
    assert_eq!(UDecimal::new(1_000_000, 0), ico.supply);
    assert_eq!("0.001", ico.token_price.to_string());
    assert_eq!(context.owner, ico.owner);
    assert_eq!(0, ico.sold_tokens);
    assert_eq!(UDecimal::new(100, 0), ico.native_balance);
    assert!(ico.token.balance.is_zero());
}

#[tokio::test]
async fn ico_without_token() {
    let context = Context::new().with_ico(1_000);
    context
        .sandbox
        .apply(
            context.owner,
            Transaction::new(context.ico, "updateToken", json!([Address::ZERO])),
        )
        .unwrap();

    let (dapp, _) = context.dapp();

    assert_eq!(Ok(None), dapp.load_ico(&context.alice.to_string()).await);
}
