use staking_dapp::{DappError, PoolTerms};
use staking_dapp_model::UDecimal;

use crate::context::{Context, TokenUtils};

#[tokio::test]
#[mutants::skip]
async fn owner_administers_pools() -> anyhow::Result<()> {
    println!("👷🏽 Run pool administration test");

    let context = Context::new().await?;
    let (admin, notifier) = context.dapp(context.owner);
    let owner = context.owner.to_string();

    admin
        .orchestrator()
        .add_pool(&PoolTerms {
            deposit_token: context.deposit_token.to_string(),
            reward_token: context.reward_token.to_string(),
            apy: "5".to_string(),
            lock_days: "10".to_string(),
        })
        .await?;
    admin.orchestrator().modify_pool(0, "20").await?;

    let snapshot = admin.aggregate(&owner).await?;
    assert_eq!(3, snapshot.pools.len());
    assert_eq!(20, snapshot.pool(0).expect("Pool 0 is listed").apy());
    assert_eq!(5, snapshot.pool(2).expect("Pool 2 is listed").apy());
    assert_eq!(10, snapshot.pool(2).expect("Pool 2 is listed").lock_days());

    let before = context.sandbox.token_balance(context.reward_token, context.owner);
    admin
        .orchestrator()
        .sweep(&context.reward_token.to_string(), "1000")
        .await?;
    assert_eq!(
        before + 1_000u128.to_wei(),
        context.sandbox.token_balance(context.reward_token, context.owner)
    );

    let snapshot = admin.aggregate(&owner).await?;
    assert_eq!(UDecimal::parse("99000", 18)?, snapshot.reward_token.contract_balance);
    assert!(notifier.errors().is_empty());

    Ok(())
}

#[tokio::test]
#[mutants::skip]
async fn only_owner_administers_pools() -> anyhow::Result<()> {
    println!("👷🏽 Run pool administration access test");

    let context = Context::new().await?;
    let (dapp, notifier) = context.dapp(context.alice);

    let result = dapp.orchestrator().modify_pool(0, "99").await;
    assert!(matches!(result, Err(DappError::Estimation { .. })));

    let result = dapp
        .orchestrator()
        .sweep(&context.reward_token.to_string(), "1")
        .await;
    assert!(matches!(result, Err(DappError::Estimation { .. })));

    assert_eq!(2, notifier.errors().len());
    assert!(notifier.errors()[0].contains("Ownable: caller is not the owner"));

    let snapshot = dapp.aggregate(&context.alice.to_string()).await?;
    assert_eq!(10, snapshot.pool(0).expect("Pool 0 is listed").apy());

    Ok(())
}

#[tokio::test]
#[mutants::skip]
async fn transfer_project_token() -> anyhow::Result<()> {
    println!("👷🏽 Run project token transfer test");

    let context = Context::new().await?;
    let (dapp, _) = context.dapp(context.alice);

    dapp.orchestrator()
        .transfer(&context.bob.to_string(), "12.5")
        .await?;

    assert_eq!(
        12_500_000_000_000_000_000,
        context.sandbox.token_balance(context.deposit_token, context.bob)
    );

    let asset = dapp.watch_asset().await?;
    assert_eq!("STK", asset.symbol);
    assert_eq!(18, asset.decimals);
    assert_eq!("https://example.org/stk.png", asset.image);

    Ok(())
}
