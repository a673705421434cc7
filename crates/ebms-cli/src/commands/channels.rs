//! `ebms channels`: list registered and declared channels

use anyhow::Result;
use ebms_mpc::{Mpc, MpcRegistry};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ChannelReport {
    registered: Vec<Mpc>,
    declared: Vec<String>,
}

/// Print the channel registry as JSON
pub fn handle_channels(registry: &MpcRegistry) -> Result<()> {
    let registered = registry
        .keys()
        .iter()
        .map(|key| registry.lookup(key.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let report = ChannelReport {
        registered,
        declared: registry
            .declared_keys()
            .into_iter()
            .map(String::from)
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
