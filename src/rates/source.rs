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
use crate::config::config_file::Rates;
use crate::rates::http::Client;
use crate::rates::models::{LatestParams, LatestRates};
use crate::rates::rate_table::RateTable;
use anyhow::{anyhow, Context, Error};
use log::info;
use std::fs;
use std::path::PathBuf;

const OPEN_EXCHANGE_RATES_URL: &str = "https://openexchangerates.org/api";

/// Anything that can produce the session's rate table. Called exactly once
/// at startup; a failure there ends the program.
pub trait RateSource {
	fn fetch(&self) -> Result<RateTable, Error>;
}

/// Open Exchange Rates, or any service speaking the same `latest.json`
/// dialect. Read-only.
pub struct OpenExchangeRates {
	http: Client,
	base: Option<String>,
}

impl OpenExchangeRates {
	pub fn new(config: Rates) -> Result<Self, Error> {
		let api_key = config.api_key.ok_or_else(|| {
			anyhow!("no api key: set rates.api_key in config or DIVISA_API_KEY")
		})?;

		let api_url = config
			.api_url
			.unwrap_or_else(|| OPEN_EXCHANGE_RATES_URL.to_owned());

		Ok(Self {
			http: Client::new(&api_url, api_key),
			base: config.base,
		})
	}
}

impl RateSource for OpenExchangeRates {
	fn fetch(&self) -> Result<RateTable, Error> {
		let resp: LatestRates = self.http.get(
			"latest.json",
			Some(LatestParams {
				base: self.base.clone(),
			}),
		)?;

		let table = resp.into_table()?;
		info!("fetched {} rates against {}", table.len(), table.base());
		Ok(table)
	}
}

/// A `latest.json`-shaped payload saved on disk, for offline use.
pub struct RatesFile {
	path: PathBuf,
}

impl RatesFile {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}
}

impl RateSource for RatesFile {
	fn fetch(&self) -> Result<RateTable, Error> {
		let content = fs::read_to_string(&self.path)
			.with_context(|| format!("reading {}", self.path.display()))?;
		let latest: LatestRates = serde_json::from_str(&content)
			.with_context(|| format!("parsing {}", self.path.display()))?;

		let table = latest.into_table()?;
		info!(
			"loaded {} rates against {} from {}",
			table.len(),
			table.base(),
			self.path.display()
		);
		Ok(table)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn test_rates_file() {
		let mut file = NamedTempFile::new().unwrap();
		write!(
			file,
			r#"{{"base": "USD", "rates": {{"EUR": 0.9, "COP": 4000}}}}"#
		)
		.unwrap();

		let table = RatesFile::new(file.path().to_path_buf()).fetch().unwrap();
		assert_eq!(table.len(), 3);
		assert!(table.contains("USD"));
	}

	#[test]
	fn test_rates_file_missing() {
		let source = RatesFile::new(PathBuf::from("/nonexistent/rates.json"));
		assert!(source.fetch().is_err());
	}

	#[test]
	fn test_rates_file_malformed() {
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "not json").unwrap();
		assert!(RatesFile::new(file.path().to_path_buf()).fetch().is_err());
	}

	#[test]
	fn test_api_requires_key() {
		assert!(OpenExchangeRates::new(Rates::default()).is_err());
	}
}
