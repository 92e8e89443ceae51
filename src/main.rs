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
use anyhow::{Context, Error};
use clap::Parser;
use divisa::config::loader::get_config;
use divisa::rates::source::{OpenExchangeRates, RateSource, RatesFile};
use divisa::session::console::Console;
use divisa::session::menu::Session;
use divisa::session::state::SessionState;
use log::info;
use std::io;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
	name = "divisa",
	version,
	about = "Interactive command-line currency converter"
)]
struct Cli {
	/// Custom config file location (default: ~/.config/divisa/config.toml)
	#[arg(long)]
	config: Option<PathBuf>,

	/// Load rates from a saved latest.json payload instead of the network
	#[arg(long)]
	rates_file: Option<PathBuf>,

	/// Ask the rate service to quote against this currency
	#[arg(short, long)]
	base: Option<String>,

	/// Never clear the terminal between menus
	#[arg(long)]
	no_clear: bool,
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or("warn"),
	)
	.init();

	let args = Cli::parse();

	// The only handle on the terminal for the whole run; `run` owns it from
	// here on, so it is released however `run` returns.
	let console = Console::new(io::stdin().lock(), io::stdout());

	match run(args, console) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {:#}", e);
			ExitCode::FAILURE
		},
	}
}

fn run<R: BufRead, W: Write>(
	args: Cli,
	console: Console<R, W>,
) -> Result<(), Error> {
	let config = get_config(args.config.as_ref(), args.rates_file.is_none())?;

	let source: Box<dyn RateSource> = match args.rates_file {
		Some(path) => Box::new(RatesFile::new(path)),
		None => {
			let mut rates_config = config.rates.unwrap_or_default();
			if args.base.is_some() {
				rates_config.base = args.base;
			}
			Box::new(
				OpenExchangeRates::new(rates_config)
					.context("could not fetch exchange rates")?,
			)
		},
	};

	let rates = source.fetch().context("could not fetch exchange rates")?;

	let clear_screen = !args.no_clear && config.clear_screen.unwrap_or(true);
	let state =
		Session::new(&rates, console, clear_screen).run(SessionState::new())?;

	info!("session ended after {} conversions", state.history_len());
	Ok(())
}
