/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::{Config, Rates};
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use log::debug;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

/// Environment variable that, when set, wins over any key in the config.
pub const API_KEY_ENV: &str = "DIVISA_API_KEY";

/// Fetches the config from the given path, or default path if none.
/// The boolean argument indicates whether it is necessary to resolve the
/// API key, which is skipped when rates come from a local file.
pub fn get_config(
	custom_config_path: Option<&PathBuf>,
	expand_auth: bool,
) -> Result<Config, Error> {
	let config_path = match custom_config_path {
		None => home_dir()
			.ok_or_else(|| anyhow!("unable to determine home directory"))?
			.join(".config/divisa/config.toml"),
		Some(p) => p.clone(),
	};
	debug!("using config at {}", config_path.display());

	// create empty config file if it doesn't exist
	if !config_path.exists() && custom_config_path.is_none() {
		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent)?;
		}
		File::create(&config_path)?;
	}

	let content = fs::read_to_string(&config_path).map_err(|e| {
		anyhow!("failed to read config {}: {}", config_path.display(), e)
	})?;
	let mut config: Config = toml::from_str(&content)
		.map_err(|e| anyhow!("failed to parse config: {}", e))?;

	if expand_auth {
		let rates = config.rates.get_or_insert_with(Rates::default);
		resolve_api_key(rates, std::env::var(API_KEY_ENV).ok())?;
	}

	Ok(config)
}

/// Settles on a single API key: the environment override if present,
/// otherwise `api_key`, otherwise the trimmed output of `api_key_cmd`.
pub fn resolve_api_key(
	rates: &mut Rates,
	env_key: Option<String>,
) -> Result<(), Error> {
	if rates.api_key_cmd.is_some() && rates.api_key.is_some() {
		bail!("Only one of rates.api_key and rates.api_key_cmd may be specified")
	}

	if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
		debug!("api key taken from {}", API_KEY_ENV);
		rates.api_key = Some(key.trim().to_string());
		return Ok(());
	}

	if let Some(api_key_cmd) = &rates.api_key_cmd {
		let output = Command::new("sh")
			.arg("-c")
			.arg(api_key_cmd)
			.output()
			.map_err(|e| anyhow!("failed to execute api_key_cmd: {}", e))?;

		if !output.status.success() {
			bail!(
				"rates api_key_cmd failed with status {}: {}",
				output.status,
				String::from_utf8_lossy(&output.stderr)
			);
		}

		let key = String::from_utf8(output.stdout)
			.map_err(|e| anyhow!("failed to parse command output: {}", e))?;
		rates.api_key = Some(key.trim().to_string());
	}

	Ok(())
}
