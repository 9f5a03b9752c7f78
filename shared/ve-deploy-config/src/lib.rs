//! Per-network deployment variables for the voting escrow contracts.
//!
//! The deploy scripts read a [`DeploymentVariables`] record for the target network. Built-in
//! defaults live in [`resolver`]; callers patch them with [`FixtureOverrides`].

pub mod errors;
pub mod lint;
pub mod network;
pub mod overrides;
pub mod resolver;
pub mod schedule;
pub mod variables;

pub use errors::ConfigError;
pub use lint::{LintPolicy, RuleSetting, Severity};
pub use network::Network;
pub use overrides::{AccountOverrides, ContractOverrides, FixtureOverrides, TokenOverrides};
pub use resolver::{apply_overrides, defaults, resolve, resolve_tag};
pub use schedule::{MultiplierSchedule, MultiplierStep};
pub use variables::{AdminAccount, ContractSource, DeploymentVariables, NativeWrapper};
