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
use crate::reports::table::Table;
use chrono::DateTime;
use std::io;
use std::io::Write;

/// How many codes to put on one line of the currency list
const CODES_PER_LINE: usize = 10;

pub struct RateReporter<'a> {
	rates: &'a RateTable,
}

impl<'a> RateReporter<'a> {
	pub fn new(rates: &'a RateTable) -> Self {
		Self { rates }
	}

	/// Just the codes, several to a line.
	pub fn write_currencies(&self, out: &mut impl Write) -> io::Result<()> {
		writeln!(out, "Available currencies ({}):", self.rates.len())?;

		let codes: Vec<&str> = self.rates.codes().collect();
		for line in codes.chunks(CODES_PER_LINE) {
			writeln!(out, "  {}", line.join(" "))?;
		}

		Ok(())
	}

	/// Every code with its rate against the base.
	pub fn write_all_rates(&self, out: &mut impl Write) -> io::Result<()> {
		writeln!(out, "{}", self.snapshot_line())?;

		let mut table = Table::new(2);
		table.right_align(vec![1]);
		table.add_header(vec!["Code", "Rate"]);
		table.add_separator();

		for (code, rate) in self.rates.iter() {
			table.add_row(vec![code, &rate.to_string()]);
		}

		table.write(out)
	}

	fn snapshot_line(&self) -> String {
		let observed = self
			.rates
			.timestamp()
			.and_then(|ts| DateTime::from_timestamp(ts, 0))
			.map(|dt| format!(" as of {}", dt.format("%Y-%m-%d %H:%M UTC")))
			.unwrap_or_default();

		format!("1 {} buys{}:", self.rates.base(), observed)
	}
}
