mod flow;
mod ico;
mod staking;
mod tests;

use std::{fmt, sync::Arc};

use staking_dapp_model::{
    api::Provider,
    amount_is_zero,
    transaction::{Receipt, Transaction, TxHash},
    Address, Gas,
};
use tracing::info;

use self::flow::{Flow, InFlight};
pub use self::staking::PoolTerms;
use crate::{
    connector::Connector,
    error::{DappError, DappResult},
    notify::Notifier,
};

/// User-initiated mutation kinds. At most one flow of each kind runs at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Stake,
    Unstake,
    Claim,
    Transfer,
    AddPool,
    ModifyPool,
    Sweep,
    Buy,
    WithdrawAll,
    UpdateTokenAddress,
    UpdateTokenPrice,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Stake => "stake",
            OperationKind::Unstake => "unstake",
            OperationKind::Claim => "claim",
            OperationKind::Transfer => "transfer",
            OperationKind::AddPool => "add pool",
            OperationKind::ModifyPool => "modify pool",
            OperationKind::Sweep => "sweep",
            OperationKind::Buy => "buy",
            OperationKind::WithdrawAll => "withdraw all",
            OperationKind::UpdateTokenAddress => "update token address",
            OperationKind::UpdateTokenPrice => "update token price",
        };
        f.write_str(name)
    }
}

/// Flow states: `Idle → Validating → (Approving →) Estimating → Submitting → Confirming → Succeeded | Failed`.
///
/// `Approving` is entered only when the allowance is insufficient. A failure from any state
/// goes straight to `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Validating,
    Approving,
    Estimating,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

/// Runs state-mutating operations as one-shot flows.
///
/// Each flow validates input before any remote call, tops up the allowance when it spends the
/// user's tokens, estimates gas, submits and waits for one block inclusion. Failures are
/// reported to the notifier and returned to the caller. Nothing is retried.
pub struct Orchestrator {
    connector: Arc<Connector>,
    notifier: Arc<dyn Notifier>,
    pub(crate) in_flight: InFlight,
}

impl Orchestrator {
    pub fn new(connector: Arc<Connector>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            connector,
            notifier,
            in_flight: InFlight::default(),
        }
    }

    fn flow(&self, operation: OperationKind) -> Flow<'_> {
        Flow::new(operation, self.notifier.as_ref(), &self.in_flight)
    }

    fn provider(&self) -> &dyn Provider {
        self.connector.provider().as_ref()
    }

    /// Estimates, submits and confirms the flow's target call.
    async fn execute(&self, flow: &mut Flow<'_>, transaction: Transaction) -> DappResult<Receipt> {
        flow.enter(FlowState::Estimating);
        let gas = self.estimate(&transaction).await?;

        flow.enter(FlowState::Submitting);
        let hash = self.provider().send_transaction(transaction, gas).await?;
        info!(operation = %flow.operation(), %hash, gas, "transaction submitted");

        flow.enter(FlowState::Confirming);
        self.confirm(flow.operation(), hash).await
    }

    /// Sends a prerequisite transaction within the current flow state.
    async fn prerequisite(&self, flow: &Flow<'_>, transaction: Transaction) -> DappResult<Receipt> {
        let gas = self.estimate(&transaction).await?;
        let method = transaction.method.clone();

        let hash = self.provider().send_transaction(transaction, gas).await?;
        info!(operation = %flow.operation(), method = %method, %hash, gas, "prerequisite submitted");

        self.confirm(flow.operation(), hash).await
    }

    async fn estimate(&self, transaction: &Transaction) -> DappResult<Gas> {
        self.provider()
            .estimate_gas(transaction)
            .await
            .map_err(DappError::from_estimation)
    }

    async fn confirm(&self, operation: OperationKind, hash: TxHash) -> DappResult<Receipt> {
        let receipt = self.provider().wait_for_receipt(&hash).await?;

        if !receipt.status {
            return Err(DappError::ContractCall {
                reason: Some(format!("transaction {hash} reverted")),
            });
        }

        info!(
            %operation,
            %hash,
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            "transaction confirmed"
        );

        Ok(receipt)
    }
}

/// A present, non-blank field.
fn required(value: &str) -> DappResult<&str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DappError::validation("Provide all the details"));
    }
    Ok(value)
}

/// A well-formed, non-zero amount. Checks that need the token's decimals come after its read.
fn amount_text(value: &str) -> DappResult<&str> {
    let value = required(value)?;
    if amount_is_zero(value)? {
        return Err(DappError::validation("Amount should be greater than 0"));
    }
    Ok(value)
}

fn address(value: &str) -> DappResult<Address> {
    required(value)?
        .parse::<Address>()
        .map_err(|error| DappError::validation(format!("Invalid address: {error}")))
}

fn whole_number(field: &str, value: &str) -> DappResult<u64> {
    required(value)?
        .parse::<u64>()
        .map_err(|_| DappError::validation(format!("{field} must be a whole number")))
}
