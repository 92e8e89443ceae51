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
use anyhow::Error;
use log::debug;
use std::io::{BufRead, Write};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Where a single retry-until-valid prompt currently stands.
enum PromptState<T> {
	Prompting,
	Validating(String),
	Accepted(T),
}

/// The session's handle on the terminal. Acquired once at startup and
/// dropped exactly once when the session ends, on every exit path.
pub struct Console<R: BufRead, W: Write> {
	input: R,
	output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
	pub fn new(input: R, output: W) -> Self {
		Self { input, output }
	}

	pub fn out(&mut self) -> &mut W {
		&mut self.output
	}

	pub fn say(&mut self, message: &str) -> Result<(), Error> {
		writeln!(self.output, "{}", message)?;
		Ok(())
	}

	pub fn clear(&mut self) -> Result<(), Error> {
		write!(self.output, "{}", CLEAR_SCREEN)?;
		Ok(())
	}

	/// Shows the prompt and reads one line, without its line terminator.
	/// None means the input is exhausted.
	pub fn read_line(
		&mut self,
		prompt: &str,
	) -> Result<Option<String>, Error> {
		write!(self.output, "{}", prompt)?;
		self.output.flush()?;

		let mut line = String::new();
		if self.input.read_line(&mut line)? == 0 {
			return Ok(None);
		}

		let trimmed = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
		Ok(Some(trimmed.to_string()))
	}

	/// Keeps prompting until `validate` accepts a line. Each rejection is
	/// shown to the user before asking again. None means the input ran
	/// out before anything was accepted.
	pub fn prompt_until<T, F>(
		&mut self,
		prompt: &str,
		validate: F,
	) -> Result<Option<T>, Error>
	where
		F: Fn(&str) -> Result<T, InputError>,
	{
		let mut state = PromptState::Prompting;

		loop {
			state = match state {
				PromptState::Prompting => match self.read_line(prompt)? {
					Some(line) => PromptState::Validating(line),
					None => return Ok(None),
				},
				PromptState::Validating(line) => match validate(&line) {
					Ok(value) => PromptState::Accepted(value),
					Err(e) => {
						debug!("rejected {:?}: {}", line, e);
						self.say(&e.to_string())?;
						PromptState::Prompting
					},
				},
				PromptState::Accepted(value) => return Ok(Some(value)),
			};
		}
	}
}

impl<R: BufRead, W: Write> Drop for Console<R, W> {
	fn drop(&mut self) {
		// nothing useful to do with a failed flush at this point
		let _ = self.output.flush();
		debug!("console released");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
		Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
	}

	fn even(line: &str) -> Result<u32, InputError> {
		line.trim()
			.parse::<u32>()
			.ok()
			.filter(|n| n % 2 == 0)
			.ok_or(InputError::InvalidAmount)
	}

	#[test]
	fn test_read_line_strips_terminator() {
		let mut c = console("hello\r\nworld\n");
		assert_eq!(c.read_line("> ").unwrap().as_deref(), Some("hello"));
		assert_eq!(c.read_line("> ").unwrap().as_deref(), Some("world"));
		assert_eq!(c.read_line("> ").unwrap(), None);
	}

	#[test]
	fn test_prompt_until_retries() {
		let mut c = console("x\n3\n4\n");
		assert_eq!(c.prompt_until("n? ", even).unwrap(), Some(4));

		let shown = String::from_utf8(c.out().clone()).unwrap();
		assert_eq!(shown.matches("n? ").count(), 3);
		assert_eq!(
			shown.matches("please enter a positive numeric value").count(),
			2
		);
	}

	#[test]
	fn test_prompt_until_accepts_first_try() {
		let mut c = console("8\n");
		assert_eq!(c.prompt_until("n? ", even).unwrap(), Some(8));
		assert_eq!(String::from_utf8(c.out().clone()).unwrap(), "n? ");
	}

	#[test]
	fn test_prompt_until_eof() {
		let mut c = console("bad\n");
		assert_eq!(c.prompt_until("n? ", even).unwrap(), None);
	}
}
