mod deployments;

use std::{fs, path::PathBuf};

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ve_deploy_config::{
    resolve,
    variables::{parse_address, parse_address_override},
    ConfigError, FixtureOverrides, LintPolicy, Network,
};

use crate::deployments::{record_deployment, write_json_atomic, DeploymentRecord};

/// Deployment helper for the voting escrow contracts.
///
/// `resolve` prints the variables a deploy script should use for a network, `record` stores a
/// finished deployment in a deployments JSON, and `lint-policy` writes the solhint ruleset.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve deployment variables for a network (defaults patched with overrides).
    Resolve(ResolveArgs),
    /// Merge a deployed contract address into the deployments JSON.
    Record(RecordArgs),
    /// Write the solhint configuration.
    LintPolicy {
        #[arg(long, default_value = ".solhint.json")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Network tag (bsc, bscTestnet, hardhat).
    #[arg(long, env = "NETWORK")]
    network: Network,

    /// JSON file of overrides (`accounts`, `contracts`, `token`, `escrowWeightLens`).
    #[arg(long, env = "OVERRIDES_PATH")]
    overrides: Option<PathBuf>,

    #[arg(long, env = "ADMIN_ACCOUNT", value_parser = parse_address_flag)]
    admin: Option<AddressFlag>,

    #[arg(long, env = "W_NATIVE", value_parser = parse_address_flag)]
    w_native: Option<AddressFlag>,

    #[arg(long, env = "LOCK_TOKEN", value_parser = parse_address_flag)]
    lock_token: Option<AddressFlag>,

    #[arg(long, env = "ESCROW_IMPLEMENTATION", value_parser = parse_address_flag)]
    escrow_implementation: Option<AddressFlag>,

    #[arg(long, env = "PROXY_ADMIN", value_parser = parse_address_flag)]
    proxy_admin: Option<AddressFlag>,

    #[arg(long, env = "ART_PROXY", value_parser = parse_address_flag)]
    art_proxy: Option<AddressFlag>,

    /// Write to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Address override from a flag or env var. Blank and `0x` leave the default in place.
#[derive(Clone, Copy, Debug)]
struct AddressFlag(Option<Address>);

fn parse_address_flag(s: &str) -> Result<AddressFlag, ConfigError> {
    parse_address_override(s).map(AddressFlag)
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[arg(long, env = "NETWORK")]
    network: Network,

    /// Key under `deployments` to store this contract (eg, voting-escrow).
    #[arg(long)]
    contract_key: String,

    #[arg(long, value_parser = parse_address)]
    address: Address,

    /// Deployment transaction hash; repeatable.
    #[arg(long = "tx-hash")]
    tx_hashes: Vec<String>,

    /// Defaults to `deployments.<network>.json`.
    #[arg(long)]
    deployments_path: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match Cli::parse().command {
        Command::Resolve(args) => run_resolve(&args),
        Command::Record(args) => run_record(&args),
        Command::LintPolicy { out } => {
            write_json_atomic(&out, &LintPolicy::standard().to_solhint_json())?;
            println!("Wrote lint policy to {}", out.display());
            Ok(())
        }
    }
}

fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let overrides = collect_overrides(args)?;
    let vars = resolve(args.network, &overrides);
    let value = serde_json::to_value(&vars).context("failed serialising deployment variables")?;

    match &args.out {
        Some(path) => {
            write_json_atomic(path, &value)?;
            info!(network = %args.network, path = %path.display(), "wrote deployment variables");
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&value).context("failed serialising JSON")?
        ),
    }
    Ok(())
}

/// Overrides file first, then individual flags on top of it.
fn collect_overrides(args: &ResolveArgs) -> Result<FixtureOverrides> {
    let mut overrides = match &args.overrides {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            FixtureOverrides::from_json(&raw)
                .with_context(|| format!("failed parsing overrides in {}", path.display()))?
        }
        None => FixtureOverrides::default(),
    };

    let contracts = &mut overrides.contracts;
    for (flag, field) in [
        (args.admin, &mut overrides.accounts.admin),
        (args.w_native, &mut contracts.w_native),
        (args.lock_token, &mut contracts.lock_token),
        (args.escrow_implementation, &mut contracts.escrow_implementation),
        (args.proxy_admin, &mut contracts.proxy_admin),
        (args.art_proxy, &mut contracts.art_proxy),
    ] {
        if let Some(address) = flag.and_then(|f| f.0) {
            *field = Some(address);
        }
    }
    Ok(overrides)
}

fn run_record(args: &RecordArgs) -> Result<()> {
    let path = args
        .deployments_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("deployments.{}.json", args.network)));

    let record = DeploymentRecord {
        network: args.network,
        contract_key: &args.contract_key,
        address: args.address,
        tx_hashes: &args.tx_hashes,
    };
    record_deployment(&path, &record)?;

    println!(
        "Recorded `{}` at {} in {}",
        args.contract_key,
        args.address,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("overrides.json");
        fs::write(
            &file,
            r#"{ "contracts": {
                "lockToken": "0x00000000000000000000000000000000000000aa",
                "artProxy": "0x00000000000000000000000000000000000000bb"
            } }"#,
        )
        .unwrap();

        let cli = parse(&[
            "ve-deployer",
            "resolve",
            "--network",
            "bscTestnet",
            "--overrides",
            file.to_str().unwrap(),
            "--lock-token",
            "0x00000000000000000000000000000000000000cc",
        ]);
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        let overrides = collect_overrides(&args).unwrap();
        assert_eq!(overrides.contracts.lock_token, Some(Address::with_last_byte(0xcc)));
        assert_eq!(overrides.contracts.art_proxy, Some(Address::with_last_byte(0xbb)));
        assert_eq!(overrides.accounts.admin, None);
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        let err = Cli::try_parse_from(["ve-deployer", "resolve", "--network", "goerli"]).unwrap_err();
        assert!(err.to_string().contains("no configuration for network `goerli`"));
    }

    #[test]
    fn test_bad_address_flag_is_rejected() {
        assert!(Cli::try_parse_from([
            "ve-deployer",
            "resolve",
            "--network",
            "hardhat",
            "--admin",
            "0x12",
        ])
        .is_err());
    }

    #[test]
    fn test_blank_address_flags_keep_defaults() {
        let cli = parse(&[
            "ve-deployer",
            "resolve",
            "--network",
            "bscTestnet",
            "--lock-token",
            "",
            "--w-native",
            "0x",
            "--admin",
            "   ",
        ]);
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        let overrides = collect_overrides(&args).unwrap();
        assert!(overrides.is_empty());

        let vars = resolve(args.network, &overrides);
        let value = serde_json::to_value(&vars).unwrap();
        assert_eq!(value["lockToken"], "0xedb8b85a779e872e2aeef39df96a7fcc7d5ea6af");
        assert_eq!(value["wNative"], "0x");
        assert_eq!(value["adminAccount"], "deployer");
    }

    #[test]
    fn test_empty_lock_token_env_keeps_default() {
        std::env::set_var("LOCK_TOKEN", "");
        let parsed = Cli::try_parse_from(["ve-deployer", "resolve", "--network", "bscTestnet"]);
        std::env::remove_var("LOCK_TOKEN");

        let Command::Resolve(args) = parsed.unwrap().command else {
            panic!("expected resolve");
        };
        let overrides = collect_overrides(&args).unwrap();
        assert_eq!(overrides.contracts.lock_token, None);

        let value = serde_json::to_value(resolve(args.network, &overrides)).unwrap();
        assert_eq!(value["lockToken"], "0xedb8b85a779e872e2aeef39df96a7fcc7d5ea6af");
    }

    #[test]
    fn test_checked_in_solhint_matches_policy() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../.solhint.json");
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(on_disk, LintPolicy::standard().to_solhint_json());
    }

    #[test]
    fn test_resolve_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("vars").join("bscTestnet.json");
        let cli = parse(&[
            "ve-deployer",
            "resolve",
            "--network",
            "bscTestnet",
            "--out",
            out.to_str().unwrap(),
        ]);
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        run_resolve(&args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["lockToken"], "0xedb8b85a779e872e2aeef39df96a7fcc7d5ea6af");
        assert_eq!(written["wNative"], "0x");
    }
}
