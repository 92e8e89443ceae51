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
use std::io;
use std::io::Write;

/// Standard table writer for reports that list a potentially large number
/// of single-line objects, such as rates or history.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

pub enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Adds a header row.
	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	/// Adds a data row.
	pub fn add_row(&mut self, row: Vec<&str>) {
		self.rows
			.push(Row::Data(row.into_iter().map(|s| s.to_string()).collect()));
	}

	/// Adds a full separator row.
	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
		let mut max_widths = vec![0; self.column_count];

		// Calculate maximum column widths for proper spacing
		for row in &self.rows {
			if let Row::Data(data_row) | Row::Header(data_row) = row {
				for (i, value) in data_row.iter().enumerate() {
					max_widths[i] = max_widths[i].max(value.chars().count());
				}
			}
		}

		for row in &self.rows {
			let line = match row {
				Row::Header(header_row) => header_row
					.iter()
					.enumerate()
					.map(|(i, v)| Table::center_align(v, max_widths[i]))
					.collect::<Vec<_>>()
					.join(" | "),
				Row::Data(data_row) => data_row
					.iter()
					.enumerate()
					.map(|(i, v)| self.pad(i, v, max_widths[i]))
					.collect::<Vec<_>>()
					.join("   "),
				Row::Separator => {
					let total_width: usize = max_widths.iter().sum::<usize>()
						+ (3 * (self.column_count - 1));
					"-".repeat(total_width)
				},
			};
			writeln!(out, "{}", line.trim_end())?;
		}

		Ok(())
	}

	fn pad(&self, col: usize, value: &str, width: usize) -> String {
		if self.right_align[col] {
			format!("{:>width$}", value, width = width)
		} else {
			format!("{:<width$}", value, width = width)
		}
	}

	fn center_align(value: &str, width: usize) -> String {
		let len = value.chars().count();
		if len >= width {
			return value.to_string();
		}
		let total_padding = width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layout() {
		let mut table = Table::new(2);
		table.add_header(vec!["Code", "Rate"]);
		table.add_separator();
		table.add_row(vec!["EUR", "0.9"]);
		table.add_row(vec!["COP", "4000"]);
		table.right_align(vec![1]);

		let mut out = Vec::new();
		table.write(&mut out).unwrap();

		let expected = "Code | Rate\n\
			-----------\n\
			EUR     0.9\n\
			COP    4000\n";
		assert_eq!(String::from_utf8(out).unwrap(), expected);
	}
}
