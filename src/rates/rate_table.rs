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
use crate::util::quant::Quant;
use anyhow::{bail, Error};
use std::collections::BTreeMap;

/// A snapshot of exchange rates, every one of them quoted against the same
/// base currency: `rate(X)` is how many units of X one unit of base buys.
/// The base's own rate is always exactly one.
///
/// Built once per session and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RateTable {
	base: String,
	rates: BTreeMap<String, Quant>,

	/// Seconds since the epoch at which the provider took the snapshot
	timestamp: Option<i64>,
}

impl RateTable {
	/// Validates and normalizes raw (code, rate) pairs. Codes are uppercased;
	/// any non-positive rate, a duplicate code, or a base rate other than one
	/// is rejected. A base missing from the pairs is added with rate one.
	pub fn new<I>(
		base: &str,
		rates: I,
		timestamp: Option<i64>,
	) -> Result<Self, Error>
	where
		I: IntoIterator<Item = (String, Quant)>,
	{
		let base = base.trim().to_uppercase();
		if !is_code_shaped(&base) {
			bail!("invalid base currency code: {:?}", base);
		}

		let mut table = BTreeMap::new();
		for (code, rate) in rates {
			let code = code.trim().to_uppercase();
			if !is_code_shaped(&code) {
				bail!("invalid currency code in rate table: {:?}", code);
			}
			if !rate.is_positive() {
				bail!("rate for {} must be positive, got {}", code, rate);
			}
			if table.insert(code.clone(), rate).is_some() {
				bail!("duplicate rate for {}", code);
			}
		}

		match table.get(&base) {
			Some(rate) if *rate != 1 => {
				bail!("base currency {} must have rate 1, got {}", base, rate)
			},
			Some(_) => {},
			None => {
				table.insert(base.clone(), Quant::from_i128(1));
			},
		}

		Ok(Self {
			base,
			rates: table,
			timestamp,
		})
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	pub fn timestamp(&self) -> Option<i64> {
		self.timestamp
	}

	/// Looks up an already-normalized code.
	pub fn get(&self, code: &str) -> Option<Quant> {
		self.rates.get(code).copied()
	}

	pub fn contains(&self, code: &str) -> bool {
		self.rates.contains_key(code)
	}

	/// All codes, sorted.
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.rates.keys().map(String::as_str)
	}

	/// All (code, rate) pairs, sorted by code.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Quant)> {
		self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
	}

	pub fn len(&self) -> usize {
		self.rates.len()
	}
}

/// Currency codes are short and purely alphabetic, e.g. USD or BTC.
fn is_code_shaped(code: &str) -> bool {
	!code.is_empty()
		&& code.len() <= 10
		&& code.chars().all(|c| c.is_ascii_alphabetic())
}
