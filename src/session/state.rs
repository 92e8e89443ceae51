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
use crate::convert::engine::{convert, HistoryEntry};
use crate::rates::rate_table::RateTable;
use crate::util::quant::Quant;
use std::slice;

/// Everything the user has chosen during one run of the program. Lives from
/// startup to exit and is never persisted.
#[derive(Debug, Default)]
pub struct SessionState {
	source: Option<String>,
	destination: Option<String>,
	amount: Option<Quant>,

	/// Append-only, in the order conversions happened
	history: Vec<HistoryEntry>,
}

impl SessionState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn source(&self) -> Option<&str> {
		self.source.as_deref()
	}

	pub fn destination(&self) -> Option<&str> {
		self.destination.as_deref()
	}

	pub fn amount(&self) -> Option<Quant> {
		self.amount
	}

	pub fn set_source(&mut self, code: String) {
		self.source = Some(code);
	}

	pub fn set_destination(&mut self, code: String) {
		self.destination = Some(code);
	}

	pub fn set_amount(&mut self, amount: Quant) {
		self.amount = Some(amount);
	}

	pub fn append_history(&mut self, entry: HistoryEntry) {
		self.history.push(entry);
	}

	/// Past conversions, oldest first. Each call starts over from the
	/// beginning.
	pub fn history(&self) -> slice::Iter<'_, HistoryEntry> {
		self.history.iter()
	}

	pub fn history_len(&self) -> usize {
		self.history.len()
	}

	/// Runs the conversion for the current selections and records it when
	/// it succeeds. Returns the message to show either way.
	pub fn convert_pending(&mut self, rates: &RateTable) -> String {
		let result =
			convert(rates, self.source(), self.destination(), self.amount);
		if let Some(entry) = result.entry {
			self.append_history(entry);
		}
		result.message
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rates() -> RateTable {
		RateTable::new(
			"USD",
			vec![
				("EUR".to_string(), Quant::from_str("0.9").unwrap()),
				("COP".to_string(), Quant::from_i128(4000)),
			],
			None,
		)
		.unwrap()
	}

	#[test]
	fn test_starts_empty() {
		let state = SessionState::new();
		assert!(state.source().is_none());
		assert!(state.destination().is_none());
		assert!(state.amount().is_none());
		assert_eq!(state.history().count(), 0);
	}

	#[test]
	fn test_incomplete_selection_records_nothing() {
		let rates = rates();
		let mut state = SessionState::new();
		state.set_source("USD".to_string());
		state.set_amount(Quant::from_i128(5));

		let message = state.convert_pending(&rates);
		assert!(message.starts_with("missing required data"));
		assert_eq!(state.history_len(), 0);
	}

	#[test]
	fn test_history_in_insertion_order() {
		let rates = rates();
		let mut state = SessionState::new();
		state.set_source("USD".to_string());
		state.set_destination("EUR".to_string());

		for n in 1..=3 {
			state.set_amount(Quant::from_i128(n * 10));
			state.convert_pending(&rates);
		}
		state.set_source("EUR".to_string());
		state.set_destination("COP".to_string());
		state.set_amount(Quant::from_i128(10));
		state.convert_pending(&rates);

		let rendered: Vec<String> =
			state.history().map(|e| e.to_string()).collect();
		assert_eq!(
			rendered,
			vec![
				"[USD -> EUR] 10.00 -> 9.00",
				"[USD -> EUR] 20.00 -> 18.00",
				"[USD -> EUR] 30.00 -> 27.00",
				"[EUR -> COP] 10.00 -> 44444.44",
			]
		);

		// restartable: a second pass sees the same entries
		assert_eq!(state.history().count(), 4);
	}

	#[test]
	fn test_selections_survive_conversion() {
		let rates = rates();
		let mut state = SessionState::new();
		state.set_source("USD".to_string());
		state.set_destination("COP".to_string());
		state.set_amount(Quant::from_i128(2));
		state.convert_pending(&rates);

		assert_eq!(state.source(), Some("USD"));
		assert_eq!(state.destination(), Some("COP"));
		assert_eq!(state.amount(), Some(Quant::from_i128(2)));
	}
}
