use anyhow::Result;

mod context;
mod measure;

#[tokio::main]
async fn main() -> Result<()> {
    let context = context::Context::new().await?;
    let (dapp, _) = context.dapp(context.alice);

    dapp.orchestrator().stake(0, "100").await?;
    context.fast_forward_minutes(15);

    let snapshot = dapp.aggregate(&context.alice.to_string()).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    println!("{}", measure::report(measure::measure().await?)?);

    Ok(())
}
