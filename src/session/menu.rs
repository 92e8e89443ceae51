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
use crate::convert::validate::{validate_amount, validate_code};
use crate::rates::rate_table::RateTable;
use crate::reports::history_reporter::HistoryReporter;
use crate::reports::rate_reporter::RateReporter;
use crate::session::console::Console;
use crate::session::state::SessionState;
use anyhow::Error;
use log::debug;
use std::io::{BufRead, Write};

/// Everything the user can ask for from the main menu, in menu order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
	ListCurrencies,
	ListRates,
	SetSource,
	SetDestination,
	Convert,
	ViewHistory,
	Exit,
}

impl Action {
	pub const ALL: [Action; 7] = [
		Action::ListCurrencies,
		Action::ListRates,
		Action::SetSource,
		Action::SetDestination,
		Action::Convert,
		Action::ViewHistory,
		Action::Exit,
	];

	pub fn label(self) -> &'static str {
		match self {
			Action::ListCurrencies => "List currencies",
			Action::ListRates => "List all rates",
			Action::SetSource => "Set source currency",
			Action::SetDestination => "Set destination currency",
			Action::Convert => "Enter amount and convert",
			Action::ViewHistory => "View history",
			Action::Exit => "Exit",
		}
	}

	/// Maps what the user typed to an action; options are numbered from 1.
	pub fn from_choice(choice: &str) -> Option<Action> {
		let n = choice.trim().parse::<usize>().ok()?;
		n.checked_sub(1).and_then(|i| Action::ALL.get(i)).copied()
	}
}

enum Flow {
	Continue,
	Exit,
}

/// The interactive loop. Owns the console for as long as the session lasts;
/// the console is released when `run` returns.
pub struct Session<'a, R: BufRead, W: Write> {
	rates: &'a RateTable,
	console: Console<R, W>,
	clear_screen: bool,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
	pub fn new(
		rates: &'a RateTable,
		console: Console<R, W>,
		clear_screen: bool,
	) -> Self {
		Self {
			rates,
			console,
			clear_screen,
		}
	}

	/// Runs until the user exits or the input runs out, and hands back the
	/// final state.
	pub fn run(
		mut self,
		mut state: SessionState,
	) -> Result<SessionState, Error> {
		loop {
			self.render_menu(&state)?;

			let Some(choice) = self.console.read_line("Choose an option: ")?
			else {
				break;
			};

			let flow = match Action::from_choice(&choice) {
				Some(action) => {
					debug!("menu action {:?}", action);
					self.dispatch(action, &mut state)?
				},
				None => {
					self.console.say("unrecognized option")?;
					Flow::Continue
				},
			};

			if let Flow::Exit = flow {
				break;
			}
			if let Flow::Exit = self.pause()? {
				break;
			}
		}

		self.console.say("Goodbye!")?;
		Ok(state)
	}

	fn dispatch(
		&mut self,
		action: Action,
		state: &mut SessionState,
	) -> Result<Flow, Error> {
		let rates = self.rates;

		match action {
			Action::ListCurrencies => {
				RateReporter::new(rates).write_currencies(self.console.out())?
			},
			Action::ListRates => {
				RateReporter::new(rates).write_all_rates(self.console.out())?
			},
			Action::SetSource => {
				let Some(code) = self.console.prompt_until(
					"Source currency: ",
					|l| validate_code(rates, l),
				)?
				else {
					return Ok(Flow::Exit);
				};
				self.console.say(&format!("source currency set to {}", code))?;
				state.set_source(code);
			},
			Action::SetDestination => {
				let Some(code) = self.console.prompt_until(
					"Destination currency: ",
					|l| validate_code(rates, l),
				)?
				else {
					return Ok(Flow::Exit);
				};
				self.console
					.say(&format!("destination currency set to {}", code))?;
				state.set_destination(code);
			},
			Action::Convert => {
				let Some(amount) =
					self.console.prompt_until("Amount: ", validate_amount)?
				else {
					return Ok(Flow::Exit);
				};
				state.set_amount(amount);
				let message = state.convert_pending(rates);
				self.console.say(&message)?;
			},
			Action::ViewHistory => {
				HistoryReporter::new(state).write_history(self.console.out())?
			},
			Action::Exit => return Ok(Flow::Exit),
		}

		Ok(Flow::Continue)
	}

	fn render_menu(&mut self, state: &SessionState) -> Result<(), Error> {
		if self.clear_screen {
			self.console.clear()?;
		}

		let amount = state
			.amount()
			.map(|a| format!("{:.p$}", a, p = DISPLAY_PLACES as usize));
		let header = format!(
			"Source: {} | Destination: {} | Amount: {}",
			state.source().unwrap_or("-"),
			state.destination().unwrap_or("-"),
			amount.as_deref().unwrap_or("-"),
		);

		self.console.say("")?;
		self.console.say(&header)?;
		for (i, action) in Action::ALL.iter().enumerate() {
			self.console.say(&format!("  {}. {}", i + 1, action.label()))?;
		}

		Ok(())
	}

	/// Gives the user time to read the last output before the screen is
	/// cleared. A no-op when clearing is off.
	fn pause(&mut self) -> Result<Flow, Error> {
		if !self.clear_screen {
			return Ok(Flow::Continue);
		}

		match self.console.read_line("Press Enter to continue...")? {
			Some(_) => Ok(Flow::Continue),
			None => Ok(Flow::Exit),
		}
	}
}
