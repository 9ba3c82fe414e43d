pub mod address;
pub mod api;
pub mod ico;
mod numbers;
pub mod notification;
pub mod pool;
pub mod reward;
#[cfg(feature = "integration-test")]
pub mod sandbox;
pub mod snapshot;
mod timestamps;
pub mod token;
pub mod transaction;
mod udecimal;

pub use address::Address;
pub use numbers::U128;
pub use timestamps::readable_timestamp;
pub use udecimal::*;

/// Index of a pool in the staking contract. Stable for the pool's lifetime.
pub type PoolId = u64;

/// Amount of fungible tokens in the token's native indivisible unit
pub type TokenAmount = u128;

/// Seconds since the Unix epoch, as reported by the chain
pub type Timestamp = u64;

/// Execution budget of a transaction
pub type Gas = u64;

/// Decimals assumed for a token whose `decimals()` value is unknown. ERC-20 tokens
/// overwhelmingly use 18, but every caller relying on this must say so.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Decimals of the chain's native currency (wei per ether).
pub const NATIVE_DECIMALS: u8 = 18;

pub const SECONDS_IN_MINUTE: u64 = 60;
