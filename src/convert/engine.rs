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
use crate::error::InputError;
use crate::rates::rate_table::RateTable;
use crate::util::amount::Amount;
use crate::util::quant::Quant;
use log::debug;
use std::fmt;

/// Decimal places shown for every amount, in messages and in history.
pub const DISPLAY_PLACES: u32 = 2;

/// One completed conversion. Both amounts are kept already rounded to
/// [`DISPLAY_PLACES`], so what is stored is exactly what was shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
	from: String,
	to: String,
	input: Quant,
	output: Quant,
}

impl HistoryEntry {
	pub fn from(&self) -> &str {
		&self.from
	}

	pub fn to(&self) -> &str {
		&self.to
	}

	pub fn input(&self) -> Quant {
		self.input
	}

	pub fn output(&self) -> Quant {
		self.output
	}
}

impl fmt::Display for HistoryEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[{} -> {}] {:.p$} -> {:.p$}",
			self.from,
			self.to,
			self.input,
			self.output,
			p = DISPLAY_PLACES as usize
		)
	}
}

/// What a conversion attempt produced: always a message for the user, and
/// a history entry only when the conversion actually happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionResult {
	pub message: String,
	pub entry: Option<HistoryEntry>,
}

/// Converts `amount` of `from` into `to`. Rates are only quoted against the
/// table's base, so the amount is first brought into base units and then
/// scaled into the destination.
///
/// Never fails: unset inputs (or a zero amount) yield the missing-data
/// message and no entry. Codes are expected to be validated already; one
/// that is not in the table yields the unknown-currency message, and an
/// amount too large to convert yields the invalid-amount message.
pub fn convert(
	rates: &RateTable,
	from: Option<&str>,
	to: Option<&str>,
	amount: Option<Quant>,
) -> ConversionResult {
	match try_convert(rates, from, to, amount) {
		Ok(entry) => ConversionResult {
			message: format!(
				"{:.p$} equivale a {:.p$}",
				Amount::new(entry.input, &entry.from),
				Amount::new(entry.output, &entry.to),
				p = DISPLAY_PLACES as usize
			),
			entry: Some(entry),
		},
		Err(e) => {
			debug!("conversion not performed: {}", e);
			ConversionResult {
				message: e.to_string(),
				entry: None,
			}
		},
	}
}

fn try_convert(
	rates: &RateTable,
	from: Option<&str>,
	to: Option<&str>,
	amount: Option<Quant>,
) -> Result<HistoryEntry, InputError> {
	let (Some(from), Some(to), Some(amount)) = (from, to, amount) else {
		return Err(InputError::MissingData);
	};
	if amount.is_zero() {
		return Err(InputError::MissingData);
	}

	let from_rate = rates
		.get(from)
		.ok_or_else(|| InputError::InvalidCurrency(from.to_string()))?;
	let to_rate = rates
		.get(to)
		.ok_or_else(|| InputError::InvalidCurrency(to.to_string()))?;

	// overflow means the amount is too large to convert
	let converted = amount
		.checked_div(from_rate)
		.and_then(|in_base| in_base.checked_mul(to_rate))
		.ok_or(InputError::InvalidAmount)?;
	debug!("converted {} {} into {} {}", amount, from, converted, to);

	let (Some(input), Some(output)) = (
		amount.rounded(DISPLAY_PLACES),
		converted.rounded(DISPLAY_PLACES),
	) else {
		return Err(InputError::InvalidAmount);
	};

	Ok(HistoryEntry {
		from: from.to_string(),
		to: to.to_string(),
		input,
		output,
	})
}
