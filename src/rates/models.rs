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
use crate::rates::rate_table::RateTable;
use crate::util::quant::Quant;
use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct LatestParams {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base: Option<String>,
}

// ---------------
// -- RECEIVING --
// ---------------

/// Payload of the `latest.json` endpoint; rate files on disk use the
/// same shape.
#[derive(Deserialize, Debug)]
pub struct LatestRates {
	pub base: String,

	pub timestamp: Option<i64>,

	#[serde(deserialize_with = "deserialize_numbers_as_strings")]
	pub rates: BTreeMap<String, String>,
}

impl LatestRates {
	pub fn into_table(self) -> Result<RateTable, Error> {
		let mut parsed = Vec::with_capacity(self.rates.len());
		for (code, text) in self.rates {
			let rate = Quant::from_str(&text)
				.with_context(|| format!("bad rate for {}: {}", code, text))?;
			parsed.push((code, rate));
		}

		RateTable::new(&self.base, parsed, self.timestamp)
	}
}

// Keeps the provider's decimal text intact instead of going through f64;
// relies on serde_json's `arbitrary_precision` feature
fn deserialize_numbers_as_strings<'de, D>(
	deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let values =
		BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;

	values
		.into_iter()
		.map(|(code, value)| match value {
			serde_json::Value::Number(num) => Ok((code, num.to_string())),
			_ => Err(serde::de::Error::custom(format!(
				"expected a number for {}",
				code
			))),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_payload() {
		let body = r#"{
			"disclaimer": "ignored",
			"base": "USD",
			"timestamp": 1700000000,
			"rates": {"EUR": 0.9, "JPY": 150, "COP": 4000.25, "USD": 1}
		}"#;

		let latest: LatestRates = serde_json::from_str(body).unwrap();
		assert_eq!(latest.rates["COP"], "4000.25");

		let table = latest.into_table().unwrap();
		assert_eq!(table.base(), "USD");
		assert_eq!(table.get("EUR"), Some(Quant::from_str("0.9").unwrap()));
		assert_eq!(table.timestamp(), Some(1_700_000_000));
	}

	#[test]
	fn test_long_fraction_rate_kept_exact() {
		let body = r#"{
			"base": "USD",
			"rates": {"XYZ": 0.12345678901234567890123, "BIG": 1e3}
		}"#;

		let latest: LatestRates = serde_json::from_str(body).unwrap();
		assert_eq!(latest.rates["XYZ"], "0.12345678901234567890123");

		let table = latest.into_table().unwrap();
		assert_eq!(
			table.get("XYZ"),
			Some(Quant::from_frac(
				12345678901234567890123,
				100000000000000000000000
			))
		);
		assert_eq!(table.get("BIG"), Some(Quant::from_i128(1000)));
	}

	#[test]
	fn test_non_numeric_rate_rejected() {
		let body = r#"{"base": "USD", "rates": {"EUR": "0.9"}}"#;
		assert!(serde_json::from_str::<LatestRates>(body).is_err());
	}

	#[test]
	fn test_missing_rates_rejected() {
		let body = r#"{"base": "USD"}"#;
		assert!(serde_json::from_str::<LatestRates>(body).is_err());
	}

	#[test]
	fn test_zero_rate_rejected_when_building_table() {
		let body = r#"{"base": "USD", "rates": {"EUR": 0}}"#;
		let latest: LatestRates = serde_json::from_str(body).unwrap();
		assert!(latest.into_table().is_err());
	}

	#[test]
	fn test_params_skip_empty_base() {
		let params = LatestParams { base: None };
		assert_eq!(serde_json::to_string(&params).unwrap(), "{}");
	}
}
