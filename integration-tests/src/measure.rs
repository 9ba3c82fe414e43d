//! Gas spent by each dapp operation on a fresh deployment.

use std::collections::HashMap;

use anyhow::Result;
use itertools::Itertools;
use num_format::{Buffer, CustomFormat};
use serde_json::{to_string_pretty, Map, Value};
use staking_dapp::OperationKind;
use staking_dapp_model::Gas;

use crate::context::Context;

const PRICE: u128 = 10_000_000_000_000_000;

/// Runs every operation once and collects the gas of its final transaction.
pub async fn measure() -> Result<Vec<(OperationKind, Gas)>> {
    let context = Context::new().await?.with_ico(PRICE)?;
    let (dapp, _) = context.dapp(context.alice);
    let (admin, _) = context.dapp(context.owner);

    let mut measured = vec![];

    measured.push((OperationKind::Stake, dapp.orchestrator().stake(0, "10").await?.gas_used));
    measured.push((OperationKind::Stake, dapp.orchestrator().stake(1, "10").await?.gas_used));

    context.fast_forward_minutes(60);

    measured.push((OperationKind::Claim, dapp.orchestrator().claim(0).await?.gas_used));
    measured.push((OperationKind::Unstake, dapp.orchestrator().unstake(1, "10").await?.gas_used));
    measured.push((
        OperationKind::Transfer,
        dapp.orchestrator().transfer(&context.bob.to_string(), "1").await?.gas_used,
    ));
    measured.push((OperationKind::Buy, dapp.orchestrator().buy("3").await?.gas_used));

    measured.push((OperationKind::ModifyPool, admin.orchestrator().modify_pool(0, "12").await?.gas_used));
    measured.push((
        OperationKind::Sweep,
        admin
            .orchestrator()
            .sweep(&context.reward_token.to_string(), "1")
            .await?
            .gas_used,
    ));
    measured.push((
        OperationKind::UpdateTokenPrice,
        admin.orchestrator().update_token_price("0.02").await?.gas_used,
    ));
    measured.push((OperationKind::WithdrawAll, admin.orchestrator().withdraw_all().await?.gas_used));

    Ok(measured)
}

/// Pretty JSON with the gas of every measured run, grouped by operation.
pub fn report(measured: Vec<(OperationKind, Gas)>) -> Result<String> {
    let grouped: HashMap<OperationKind, Vec<Gas>> = measured.into_iter().into_group_map();

    let mut report = Map::new();
    for (operation, gas) in grouped.into_iter().sorted_by_key(|(operation, _)| operation.to_string()) {
        let runs = gas.iter().map(|gas| format_number(*gas)).collect::<Result<Vec<_>>>()?;
        report.insert(operation.to_string(), Value::from(runs));
    }

    Ok(to_string_pretty(&Value::Object(report))?)
}

fn format_number<T: num_format::ToFormattedStr>(number: T) -> Result<String> {
    let format = CustomFormat::builder().separator(" ").build()?;

    let mut buf = Buffer::new();
    buf.write_formatted(&number, &format);

    Ok(buf.to_string())
}

#[cfg(test)]
mod tests {
    use staking_dapp::OperationKind;

    use crate::measure::{format_number, measure, report};

    #[test]
    fn numbers_are_grouped_by_thousands() -> anyhow::Result<()> {
        assert_eq!("131 000", format_number(131_000u64)?);
        assert_eq!("21", format_number(21u64)?);
        Ok(())
    }

    #[tokio::test]
    #[mutants::skip]
    async fn gas_report() -> anyhow::Result<()> {
        println!("👷🏽 Run gas report");

        let measured = measure().await?;
        assert!(measured.iter().all(|(_, gas)| *gas > 21_000));

        let stakes = measured
            .iter()
            .filter(|(operation, _)| *operation == OperationKind::Stake)
            .count();
        assert_eq!(2, stakes);

        let report = report(measured)?;
        println!("{report}");
        assert!(report.contains("\"stake\": [\n    \"131 000\",\n    \"131 000\"\n  ]"));

        Ok(())
    }
}
