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
use crate::convert::engine::DISPLAY_PLACES;
use crate::error::InputError;
use crate::rates::rate_table::RateTable;
use crate::util::quant::Quant;

/// Canonical form of a user-typed currency code.
pub fn normalize_code(code: &str) -> String {
	code.trim().to_uppercase()
}

/// True iff the code, ignoring case and surrounding whitespace, is in the
/// table.
pub fn is_valid_code(rates: &RateTable, code: &str) -> bool {
	rates.contains(&normalize_code(code))
}

/// Returns the normalized code when it is in the table.
pub fn validate_code(
	rates: &RateTable,
	code: &str,
) -> Result<String, InputError> {
	if is_valid_code(rates, code) {
		Ok(normalize_code(code))
	} else {
		Err(InputError::InvalidCurrency(normalize_code(code)))
	}
}

/// Some(amount) iff the text is a finite number strictly above zero that
/// can still be shown with [`DISPLAY_PLACES`] decimals.
pub fn parse_amount(text: &str) -> Option<Quant> {
	Quant::from_str(text.trim())
		.ok()
		.filter(|amount| amount.is_positive())
		.filter(|amount| amount.rounded(DISPLAY_PLACES).is_some())
}

/// Same check as [`parse_amount`], with the single generic rejection every
/// failure kind shares.
pub fn validate_amount(text: &str) -> Result<Quant, InputError> {
	parse_amount(text).ok_or(InputError::InvalidAmount)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rates() -> RateTable {
		RateTable::new(
			"USD",
			vec![
				("EUR".to_string(), Quant::from_str("0.9").unwrap()),
				("JPY".to_string(), Quant::from_i128(150)),
			],
			None,
		)
		.unwrap()
	}

	#[test]
	fn test_code_case_and_whitespace() {
		let rates = rates();
		assert!(is_valid_code(&rates, "USD"));
		assert!(is_valid_code(&rates, " usd "));
		assert!(is_valid_code(&rates, "\tJpy\n"));
	}

	#[test]
	fn test_unknown_codes() {
		let rates = rates();
		assert!(!is_valid_code(&rates, "GBP"));
		assert!(!is_valid_code(&rates, ""));
		assert!(!is_valid_code(&rates, "U SD"));
	}

	#[test]
	fn test_validate_code_normalizes() {
		let rates = rates();
		assert_eq!(validate_code(&rates, " eur"), Ok("EUR".to_string()));
		assert_eq!(
			validate_code(&rates, "gbp"),
			Err(InputError::InvalidCurrency("GBP".to_string()))
		);
	}

	#[test]
	fn test_valid_amounts() {
		assert_eq!(parse_amount("150.75"), Some(Quant::from_frac(603, 4)));
		assert_eq!(parse_amount(" 10 "), Some(Quant::from_i128(10)));
		assert_eq!(parse_amount("1e3"), Some(Quant::from_i128(1000)));
		assert_eq!(parse_amount("0.001"), Some(Quant::from_frac(1, 1000)));
	}

	#[test]
	fn test_rejected_amounts() {
		for text in ["-5", "0", "0.00", "-0", "abc", "", "  ", "NaN", "inf"] {
			assert_eq!(parse_amount(text), None, "{:?}", text);
			assert_eq!(validate_amount(text), Err(InputError::InvalidAmount));
		}
	}

	#[test]
	fn test_amounts_too_large_to_show() {
		assert_eq!(parse_amount("1e37"), None);
		assert_eq!(validate_amount("1e37"), Err(InputError::InvalidAmount));
		assert_eq!(parse_amount(&"9".repeat(40)), None);
		assert_eq!(
			parse_amount("1e30"),
			Some(Quant::from_str("1e30").unwrap())
		);
	}

	#[test]
	fn test_long_fraction_amount_accepted() {
		let text = "0.1234567890123456789012345678901234567";
		assert_eq!(parse_amount(text), Some(Quant::from_str(text).unwrap()));
	}

	#[test]
	fn test_rejections_share_one_message() {
		let messages: Vec<String> = ["-5", "0", "abc"]
			.iter()
			.map(|t| validate_amount(t).unwrap_err().to_string())
			.collect();
		assert!(messages
			.iter()
			.all(|m| m == "please enter a positive numeric value"));
	}
}
