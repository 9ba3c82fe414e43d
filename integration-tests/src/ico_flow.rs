use staking_dapp::DappError;
use staking_dapp_model::UDecimal;

use crate::context::Context;

const PRICE: u128 = 10_000_000_000_000_000;

#[tokio::test]
#[mutants::skip]
async fn token_sale() -> anyhow::Result<()> {
    println!("👷🏽 Run token sale test");

    let context = Context::new().await?.with_ico(PRICE)?;
    let alice = context.alice.to_string();
    let (dapp, notifier) = context.dapp(context.alice);

    let sale = dapp.load_ico(&alice).await?.expect("Token sale is configured");
    assert_eq!("ICO", sale.symbol);
    assert_eq!(0, sale.sold_tokens);
    assert_eq!(UDecimal::parse("10000", 18)?, sale.available);
    assert_eq!(UDecimal::parse("0.01", 18)?, sale.token_price);

    dapp.orchestrator().buy("25").await?;

    let sale = dapp.load_ico(&alice).await?.expect("Token sale is configured");
    assert_eq!(25, sale.sold_tokens);
    assert_eq!(UDecimal::parse("25", 18)?, sale.token.balance);
    assert_eq!(UDecimal::parse("9975", 18)?, sale.available);
    assert_eq!(UDecimal::parse("99.75", 18)?, sale.native_balance);

    let (admin, _) = context.dapp(context.owner);
    admin.orchestrator().update_token_price("0.02").await?;
    admin.orchestrator().withdraw_all().await?;

    let sale = admin.load_ico(&context.owner.to_string()).await?.expect("Token sale is configured");
    assert_eq!(UDecimal::parse("0.02", 18)?, sale.token_price);
    assert!(sale.available.is_zero());
    assert_eq!(UDecimal::parse("999975", 18)?, sale.token.balance);

    let result = dapp.orchestrator().buy("1").await;
    assert_eq!(
        Err(DappError::validation("Insufficient tokens available for purchase/withdrawal")),
        result
    );
    assert_eq!(
        vec!["Insufficient tokens available for purchase/withdrawal".to_string()],
        notifier.errors()
    );

    Ok(())
}

#[tokio::test]
#[mutants::skip]
async fn sale_without_token() -> anyhow::Result<()> {
    println!("👷🏽 Run token sale without token test");

    let context = Context::new().await?.with_ico(PRICE)?;
    let (admin, _) = context.dapp(context.owner);

    admin
        .orchestrator()
        .update_token_address("0x0000000000000000000000000000000000000000")
        .await?;

    assert_eq!(None, admin.load_ico(&context.owner.to_string()).await?);

    Ok(())
}
