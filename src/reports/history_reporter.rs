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
use crate::session::state::SessionState;
use std::io;
use std::io::Write;

pub const EMPTY_HISTORY: &str = "no conversions yet in this session";

pub struct HistoryReporter<'a> {
	state: &'a SessionState,
}

impl<'a> HistoryReporter<'a> {
	pub fn new(state: &'a SessionState) -> Self {
		Self { state }
	}

	pub fn write_history(&self, out: &mut impl Write) -> io::Result<()> {
		if self.state.history_len() == 0 {
			return writeln!(out, "{}", EMPTY_HISTORY);
		}

		for (i, entry) in self.state.history().enumerate() {
			writeln!(out, "{:>3}. {}", i + 1, entry)?;
		}

		Ok(())
	}
}
