//! Splitting the `soc` sub-table into map overrides and forwarded arguments.

use crate::types::SocOptions;
use ethgen_common::{GenError, GenResult};
use ethgen_platform::SocMaps;
use serde::de::DeserializeOwned;

/// Splits the `soc` sub-table.
///
/// `csr_map`, `interrupt_map` and `mem_map` become map overrides, merged
/// entry-wise over the base SoC defaults later on. Every other entry is
/// forwarded as a construction argument.
pub fn split_soc(value: Option<&toml::Value>) -> GenResult<SocOptions> {
    let Some(value) = value else {
        return Ok(SocOptions::default());
    };
    let table = value
        .as_table()
        .ok_or_else(|| GenError::config("soc", format!("expected a table, found {value}")))?;

    let mut options = SocOptions::default();
    let mut maps = SocMaps::default();
    for (key, entry) in table {
        match key.as_str() {
            "csr_map" => maps.csr_map = map_entries(key, entry)?,
            "interrupt_map" => maps.interrupt_map = map_entries(key, entry)?,
            "mem_map" => maps.mem_map = map_entries(key, entry)?,
            _ => {
                options.args.insert(key.clone(), entry.clone());
            }
        }
    }
    options.maps = maps;
    Ok(options)
}

fn map_entries<T: DeserializeOwned>(key: &str, value: &toml::Value) -> GenResult<T> {
    value
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| GenError::config(format!("soc.{key}"), e.message()))
}
