//! Deployments JSON bookkeeping.
//!
//! Layout:
//! ```json
//! { "network": "bscTestnet", "chain_id": 97, "updated_at": "...",
//!   "deployments": { "<key>": { "address": "0x..", "deployed_at": "...", "tx_hashes": [..] } } }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use ve_deploy_config::{variables::format_address, Network};

pub struct DeploymentRecord<'a> {
    pub network: Network,
    pub contract_key: &'a str,
    pub address: Address,
    pub tx_hashes: &'a [String],
}

fn validate(record: &DeploymentRecord<'_>) -> Result<()> {
    let re_key = Regex::new(r"^[a-z0-9][a-z0-9-]*$")?;
    let re_tx = Regex::new(r"^0x[a-fA-F0-9]{64}$")?;

    if !re_key.is_match(record.contract_key) {
        return Err(anyhow!(
            "contract key `{}` must be lowercase kebab-case (eg, voting-escrow)",
            record.contract_key
        ));
    }
    if let Some(bad) = record.tx_hashes.iter().find(|h| !re_tx.is_match(h)) {
        return Err(anyhow!("`{bad}` is not a transaction hash"));
    }
    Ok(())
}

/// Insert or replace `record.contract_key` in the deployments file at `path`.
pub fn record_deployment(path: &Path, record: &DeploymentRecord<'_>) -> Result<()> {
    validate(record)?;

    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?
    } else {
        String::new()
    };

    let mut root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", path.display()))?
    };

    if !root.is_object() {
        root = json!({});
    }

    if let Some(recorded) = root.get("network").and_then(Value::as_str) {
        if recorded != record.network.tag() {
            return Err(anyhow!(
                "{} holds `{}` deployments, refusing to add a `{}` one",
                path.display(),
                recorded,
                record.network
            ));
        }
    }

    root["network"] = json!(record.network.tag());
    root["chain_id"] = json!(record.network.chain_id());
    root["updated_at"] = json!(now);

    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }

    let mut entry = json!({
        "address": format_address(&record.address),
        "deployed_at": now,
    });
    if !record.tx_hashes.is_empty() {
        entry["tx_hashes"] = json!(record.tx_hashes);
    }

    root["deployments"][record.contract_key] = entry;

    write_json_atomic(path, &root)
}

pub fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let mut serialised = serde_json::to_string_pretty(value).context("failed serialising JSON")?;
    serialised.push('\n');
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
