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
use thiserror::Error;

/// Problems with what the user typed. All of these are recoverable: they
/// are shown to the user and the session carries on. The Display text is
/// exactly what gets printed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
	#[error("missing required data: set source currency, destination currency, and amount")]
	MissingData,

	#[error("unknown currency code: {0}")]
	InvalidCurrency(String),

	#[error("please enter a positive numeric value")]
	InvalidAmount,
}
