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
use anyhow::{anyhow, bail, Error};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A rational number backed by a fraction of u128s. Money amounts and
/// exchange rates both live in here, so a conversion like 10 / 0.9 * 4000
/// stays exact until the moment it is rounded for display.
///
/// Automatically simplifies its underlying fractional representation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quant {
	numerator: u128,
	denominator: u128,

	/// Is always false if the numerator is zero.
	is_negative: bool,

	/// How many decimal places to render when printed without an explicit
	/// precision. Has no effect on the underlying fraction.
	render_precision: u32,
}

impl Quant {
	pub fn zero() -> Self {
		Self {
			numerator: 0,
			denominator: 1,
			render_precision: 0,
			is_negative: false,
		}
	}

	/// Creates a new Quant with the given numerator and the denominator
	/// set at 10^exp, as though a decimal point were inserted that many
	/// places from the right.
	pub fn new(numerator: i128, exp: u32) -> Self {
		let mut out = Self {
			numerator: numerator.unsigned_abs(),
			denominator: 10u128.pow(exp),
			render_precision: exp,
			is_negative: numerator < 0,
		};
		out.reduce();
		out
	}

	pub fn from_frac(numerator: i128, denominator: i128) -> Self {
		if denominator == 0 {
			panic!("Denominator cannot be zero");
		}

		let mut out = Self {
			numerator: numerator.unsigned_abs(),
			denominator: denominator.unsigned_abs(),
			render_precision: 0,
			is_negative: (numerator < 0) ^ (denominator < 0),
		};

		out.reduce();
		out
	}

	pub fn from_i128(amount: i128) -> Self {
		Self {
			numerator: amount.unsigned_abs(),
			denominator: 1,
			render_precision: 0,
			is_negative: amount < 0,
		}
	}

	/// Parses plain decimal text ("150.75", "-3", ".5") and scientific
	/// notation ("1.5e3", "2E-4"). Anything that would not fit the
	/// underlying fraction is an error rather than a wrap-around.
	pub fn from_str(input: &str) -> Result<Self, Error> {
		let (is_negative, unsigned) = match input.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, input.strip_prefix('+').unwrap_or(input)),
		};

		let exp_marker = unsigned.find(|c: char| c == 'e' || c == 'E');
		let (mantissa, exponent) = match exp_marker {
			Some(idx) => {
				let exp = unsigned[idx + 1..]
					.parse::<i32>()
					.map_err(|e| anyhow!("invalid exponent: {}", e))?;
				(&unsigned[..idx], exp)
			},
			None => (unsigned, 0),
		};

		let parts: Vec<&str> = mantissa.split('.').collect();
		let (whole, decimal) = match parts.as_slice() {
			[whole] => (*whole, ""),
			[whole, decimal] => (*whole, *decimal),
			_ => bail!("Invalid decimal format"),
		};

		if whole.is_empty() && decimal.is_empty() {
			bail!("Invalid decimal format");
		}
		if !whole.chars().chain(decimal.chars()).all(|c| c.is_ascii_digit())
		{
			bail!("Invalid characters in number: {}", input);
		}

		let precision = decimal.len() as u32;
		let scale = pow10(precision)?;
		let whole_value = if whole.is_empty() {
			0
		} else {
			whole.parse::<u128>()?
		};
		let fractional = if decimal.is_empty() {
			0
		} else {
			decimal.parse::<u128>()?
		};

		let mut numerator = whole_value
			.checked_mul(scale)
			.and_then(|n| n.checked_add(fractional))
			.ok_or_else(|| anyhow!("number too large: {}", input))?;
		let mut denominator = scale;

		let shift = pow10(exponent.unsigned_abs())?;
		if exponent >= 0 {
			numerator = numerator
				.checked_mul(shift)
				.ok_or_else(|| anyhow!("number too large: {}", input))?;
		} else {
			denominator = denominator
				.checked_mul(shift)
				.ok_or_else(|| anyhow!("number too precise: {}", input))?;
		}

		let mut out = Self {
			numerator,
			denominator,
			render_precision: (precision as i64 - exponent as i64).max(0)
				as u32,
			is_negative: is_negative && numerator > 0,
		};
		out.reduce();
		Ok(out)
	}

	/// Modifies the underlying fraction to represent a value that is rounded
	/// off to the given number of decimal places when rendered as a decimal.
	/// Uses Banker's rounding (rounds to nearest, ties to even).
	///
	/// Returns the rounding error in the form such that
	/// rounded amount + error == original amount, or None (leaving self
	/// untouched) when the rounded value does not fit the fraction.
	pub fn round(&mut self, decimal_places: u32) -> Option<Self> {
		let rounded = self.rounded(decimal_places)?;
		let error = self.checked_sub(rounded)?;
		*self = rounded;
		Some(error)
	}

	/// Returns a copy rounded to the given number of decimal places, or None
	/// if scaling by 10^decimal_places overflows.
	pub fn rounded(&self, decimal_places: u32) -> Option<Self> {
		let mut reduced = *self;
		reduced.reduce();

		let scale = 10u128.checked_pow(decimal_places)?;
		let scaled_numerator = reduced.numerator.checked_mul(scale)?;
		let quotient = scaled_numerator / reduced.denominator;
		let remainder = scaled_numerator % reduced.denominator;

		// Perform Banker's rounding
		let rounded_quotient =
			match compare_to_half(remainder, reduced.denominator) {
				Ordering::Greater => quotient.checked_add(1)?,
				Ordering::Equal if quotient % 2 != 0 => quotient.checked_add(1)?,
				_ => quotient,
			};

		let mut out = Self {
			numerator: rounded_quotient,
			denominator: scale,
			render_precision: decimal_places,
			is_negative: reduced.is_negative && rounded_quotient > 0,
		};
		out.reduce();
		Some(out)
	}

	pub fn is_zero(&self) -> bool {
		self.numerator == 0
	}

	pub fn is_positive(&self) -> bool {
		self.numerator > 0 && !self.is_negative
	}

	pub fn checked_add(self, rhs: Self) -> Option<Self> {
		// Special cases for zero
		if self.numerator == 0 {
			return Some(rhs);
		}
		if rhs.numerator == 0 {
			return Some(self);
		}

		// Compute GCD of denominators
		let gcd = Self::gcd(self.denominator, rhs.denominator);
		let lcm = (self.denominator / gcd).checked_mul(rhs.denominator)?;

		// Scale numerators to the common denominator
		let term_a = self.numerator.checked_mul(lcm / self.denominator)?;
		let term_b = rhs.numerator.checked_mul(lcm / rhs.denominator)?;

		let (numerator, result_is_negative) =
			match (self.is_negative, rhs.is_negative) {
				(true, true) => (term_a.checked_add(term_b)?, true),
				(false, false) => (term_a.checked_add(term_b)?, false),
				(true, false) => {
					if term_a > term_b {
						(term_a - term_b, true)
					} else {
						(term_b - term_a, false)
					}
				},
				(false, true) => {
					if term_a > term_b {
						(term_a - term_b, false)
					} else {
						(term_b - term_a, true)
					}
				},
			};

		let mut out = Self {
			numerator,
			denominator: lcm,
			render_precision: self.render_precision.max(rhs.render_precision),
			is_negative: result_is_negative && numerator > 0,
		};
		out.reduce();
		Some(out)
	}

	pub fn checked_sub(self, rhs: Self) -> Option<Self> {
		self.checked_add(-rhs)
	}

	pub fn checked_mul(self, rhs: Self) -> Option<Self> {
		// reduce overflow risk
		let gcd_self = Self::gcd(self.numerator, rhs.denominator).max(1);
		let gcd_rhs = Self::gcd(rhs.numerator, self.denominator).max(1);

		let numerator = (self.numerator / gcd_self)
			.checked_mul(rhs.numerator / gcd_rhs)?;
		let denominator = (self.denominator / gcd_rhs)
			.checked_mul(rhs.denominator / gcd_self)?;

		let is_negative = numerator > 0 && (self.is_negative ^ rhs.is_negative);

		let mut out = Self {
			numerator,
			denominator,
			is_negative,
			render_precision: self.render_precision.max(rhs.render_precision),
		};
		out.reduce();
		Some(out)
	}

	/// None on overflow or when dividing by zero.
	pub fn checked_div(self, rhs: Self) -> Option<Self> {
		if rhs.numerator == 0 {
			return None;
		}
		self.checked_mul(rhs.recip())
	}

	/// Reduces the underlying fraction as much as possible while still
	/// representing the same value. Called after every operation that
	/// affects the fraction, to guard against overflow.
	fn reduce(&mut self) {
		let gcd = Self::gcd(self.numerator, self.denominator);
		if gcd > 1 {
			self.numerator /= gcd;
			self.denominator /= gcd;
		}
		if self.numerator == 0 {
			self.denominator = 1;
			self.is_negative = false;
		}
	}

	/// Implementation of Euclid's algorithm for greatest common divisor
	fn gcd(mut a: u128, mut b: u128) -> u128 {
		while b != 0 {
			let temp = b;
			b = a % b;
			a = temp;
		}
		a
	}

	/// Takes the reciprocal in like terms if possible, else
	/// divides 1 by self.
	pub fn recip(&self) -> Self {
		if self.numerator == 0 {
			Quant::from_i128(1) / *self
		} else {
			Self {
				numerator: self.denominator,
				denominator: self.numerator,
				..*self
			}
		}
	}
}

fn pow10(exp: u32) -> Result<u128, Error> {
	10u128
		.checked_pow(exp)
		.ok_or_else(|| anyhow!("exponent out of range: {}", exp))
}

/// Compares remainder / denominator against one half, for remainder below
/// the denominator, without doubling anything.
fn compare_to_half(remainder: u128, denominator: u128) -> Ordering {
	remainder.cmp(&(denominator - remainder))
}

/// Next decimal digit of remainder / denominator: returns
/// (10 * remainder / denominator, 10 * remainder % denominator) for a
/// remainder below the denominator, by repeated modular addition.
fn next_digit(remainder: u128, denominator: u128) -> (u8, u128) {
	let gap = denominator - remainder;
	let mut digit = 0;
	let mut acc = 0u128;
	for _ in 0..10 {
		if acc >= gap {
			acc -= gap;
			digit += 1;
		} else {
			acc += remainder;
		}
	}
	(digit, acc)
}

/// Renders with exactly the requested number of decimal places, rounding
/// half to even. `{:.2}` asks for two; otherwise the render precision
/// picked up at parse time is used. No digit grouping.
///
/// Works by long division, so any representable value can be printed.
impl fmt::Display for Quant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let precision =
			f.precision().unwrap_or(self.render_precision as usize);

		let mut integer_part = self.numerator / self.denominator;
		let mut remainder = self.numerator % self.denominator;
		let mut digits = Vec::with_capacity(precision);
		for _ in 0..precision {
			let (digit, rest) = next_digit(remainder, self.denominator);
			digits.push(digit);
			remainder = rest;
		}

		let last_is_odd = match digits.last() {
			Some(digit) => digit % 2 != 0,
			None => integer_part % 2 != 0,
		};
		let round_up = match compare_to_half(remainder, self.denominator) {
			Ordering::Greater => true,
			Ordering::Equal => last_is_odd,
			Ordering::Less => false,
		};

		if round_up {
			let mut carry = true;
			for digit in digits.iter_mut().rev() {
				if *digit == 9 {
					*digit = 0;
				} else {
					*digit += 1;
					carry = false;
					break;
				}
			}
			// a nonzero remainder means the integer part is below u128::MAX
			if carry {
				integer_part += 1;
			}
		}

		let is_nonzero = integer_part > 0 || digits.iter().any(|d| *d > 0);
		let is_negative = self.is_negative && is_nonzero;
		let sign = if is_negative { "-" } else { "" };

		if precision == 0 {
			write!(f, "{}{}", sign, integer_part)
		} else {
			let fraction: String =
				digits.iter().map(|d| char::from(b'0' + d)).collect();
			write!(f, "{}{}.{}", sign, integer_part, fraction)
		}
	}
}

// -----------------
// -- BOILERPLATE --
// -----------------

impl Add for Quant {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		match self.checked_add(rhs) {
			Some(out) => out,
			None => panic!("Quant addition overflowed"),
		}
	}
}

impl Sub for Quant {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		self + (-rhs)
	}
}

impl Mul for Quant {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self::Output {
		match self.checked_mul(rhs) {
			Some(out) => out,
			None => panic!("Quant multiplication overflowed"),
		}
	}
}

impl Div for Quant {
	type Output = Self;

	fn div(self, rhs: Self) -> Self::Output {
		if rhs.numerator == 0 {
			panic!("Attempt to divide by zero");
		}

		self * rhs.recip()
	}
}

impl Neg for Quant {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Self {
			is_negative: self.numerator > 0 && !self.is_negative,
			..self
		}
	}
}

impl PartialEq<i128> for Quant {
	fn eq(&self, &other: &i128) -> bool {
		self.is_negative == (other < 0)
			&& other
				.unsigned_abs()
				.checked_mul(self.denominator)
				.is_some_and(|scaled| scaled == self.numerator)
	}
}

impl PartialEq for Quant {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Quant {}

impl PartialOrd for Quant {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Quant {
	fn cmp(&self, other: &Self) -> Ordering {
		if self.numerator == 0 && other.numerator == 0 {
			return Ordering::Equal;
		}

		match (self.is_negative, other.is_negative) {
			(true, false) => return Ordering::Less,
			(false, true) => return Ordering::Greater,
			_ => {},
		};

		let magnitude = cmp_fractions(
			(self.numerator, self.denominator),
			(other.numerator, other.denominator),
		);

		if self.is_negative {
			magnitude.reverse()
		} else {
			magnitude
		}
	}
}

/// Orders a/b against c/d by comparing whole parts, then the reciprocals
/// of what is left (a continued fraction expansion). Never multiplies.
fn cmp_fractions(
	(mut a, mut b): (u128, u128),
	(mut c, mut d): (u128, u128),
) -> Ordering {
	loop {
		let (whole_left, whole_right) = (a / b, c / d);
		if whole_left != whole_right {
			return whole_left.cmp(&whole_right);
		}

		let (rest_left, rest_right) = (a % b, c % d);
		match (rest_left, rest_right) {
			(0, 0) => return Ordering::Equal,
			(0, _) => return Ordering::Less,
			(_, 0) => return Ordering::Greater,
			// r1/b vs r2/d orders the same as d/r2 vs b/r1
			_ => {
				(a, b, c, d) = (d, rest_right, b, rest_left);
			},
		}
	}
}

impl Hash for Quant {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.numerator.hash(state);
		self.denominator.hash(state);
		self.is_negative.hash(state);
		// `render_precision` intentionally excluded from the hash
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod creation {
		use super::*;

		#[test]
		fn test_number_reduction() {
			let quant = Quant::new(1500, 2);
			assert_eq!(quant.numerator, 15);
			assert_eq!(quant.denominator, 1);
			assert_eq!(quant.render_precision, 2);
		}

		#[test]
		fn test_from_str_positive_decimal() {
			let quant = Quant::from_str("150.75").unwrap();
			assert_eq!(quant.numerator, 603);
			assert_eq!(quant.denominator, 4);
			assert_eq!(quant.render_precision, 2);
			assert!(!quant.is_negative);
		}

		#[test]
		fn test_from_str_negative_decimal() {
			let quant = Quant::from_str("-5.5").unwrap();
			assert_eq!(quant, Quant::from_frac(-11, 2));
			assert!(quant.is_negative);
		}

		#[test]
		fn test_from_str_explicit_plus() {
			assert_eq!(Quant::from_str("+7").unwrap(), Quant::from_i128(7));
		}

		#[test]
		fn test_from_str_leading_point() {
			assert_eq!(Quant::from_str(".5").unwrap(), Quant::from_frac(1, 2));
		}

		#[test]
		fn test_from_str_scientific() {
			assert_eq!(
				Quant::from_str("1.5e3").unwrap(),
				Quant::from_i128(1500)
			);
			let small = Quant::from_str("2E-4").unwrap();
			assert_eq!(small, Quant::from_frac(1, 5000));
			assert_eq!(small.render_precision, 4);
		}

		#[test]
		fn test_from_str_negative_zero() {
			let quant = Quant::from_str("-0.00").unwrap();
			assert_eq!(quant.numerator, 0);
			assert_eq!(quant.denominator, 1);
			assert!(!quant.is_negative);
		}

		#[test]
		fn test_from_str_invalid() {
			for input in
				["", ".", "abc", "1.2.3", "12abc", "NaN", "inf", "1e", "- 1"]
			{
				assert!(Quant::from_str(input).is_err(), "{}", input);
			}
		}

		#[test]
		fn test_from_str_overflow_is_error() {
			assert!(Quant::from_str(&"9".repeat(60)).is_err());
			assert!(Quant::from_str("1e400").is_err());
		}
	}

	mod math {
		use super::*;

		#[test]
		fn test_add_mixed_signs() {
			let a = Quant::from_frac(5, 6);
			let b = Quant::from_frac(-1, 3);
			assert_eq!(a + b, Quant::from_frac(1, 2));
		}

		#[test]
		fn test_sub_to_negative() {
			let a = Quant::from_frac(1, 4);
			let b = Quant::from_frac(1, 2);
			assert_eq!(a - b, Quant::from_frac(-1, 4));
		}

		#[test]
		fn test_mul_and_div_stay_exact() {
			let ten = Quant::from_i128(10);
			let eur = Quant::from_str("0.9").unwrap();
			let cop = Quant::from_i128(4000);
			assert_eq!(ten / eur * cop, Quant::from_frac(400000, 9));
		}

		#[test]
		#[should_panic(expected = "Attempt to divide by zero")]
		fn test_div_by_zero() {
			let _ = Quant::from_i128(1) / Quant::zero();
		}

		#[test]
		fn test_checked_ops_report_overflow() {
			let big = Quant::from_str("1e36").unwrap();
			let rate = Quant::from_i128(4000);
			assert_eq!(big.checked_mul(rate), None);
			assert_eq!(
				big.checked_add(big),
				Some(Quant::from_str("2e36").unwrap())
			);
			assert_eq!(rate.checked_div(Quant::zero()), None);
			assert_eq!(
				big.checked_div(rate),
				Some(Quant::from_str("2.5e32").unwrap())
			);
		}

		#[test]
		#[should_panic(expected = "Quant multiplication overflowed")]
		fn test_mul_overflow_panics_in_every_profile() {
			let big = Quant::from_str("1e36").unwrap();
			let _ = big * Quant::from_i128(4000);
		}

		#[test]
		fn test_ordering_near_the_limit() {
			let max = i128::MAX;
			assert!(Quant::from_frac(max, max - 1) > Quant::from_i128(1));
			assert!(Quant::from_frac(max - 2, max - 1) < Quant::from_i128(1));
			assert!(Quant::from_frac(1, max - 1) > Quant::from_frac(1, max));
		}

		#[test]
		fn test_ordering() {
			assert!(Quant::from_frac(-1, 2) < Quant::zero());
			assert!(Quant::from_frac(1, 3) < Quant::from_frac(1, 2));
			assert!(Quant::from_frac(-1, 3) > Quant::from_frac(-1, 2));
		}
	}

	mod rounding {
		use super::*;

		#[test]
		fn test_round_half_to_even() {
			let mut q = Quant::from_str("2.125").unwrap();
			q.round(2);
			assert_eq!(q, Quant::from_str("2.12").unwrap());

			let mut q = Quant::from_str("2.135").unwrap();
			q.round(2);
			assert_eq!(q, Quant::from_str("2.14").unwrap());
		}

		#[test]
		fn test_round_odd_denominator() {
			// 2/3 is past the midpoint even though the quotient is even
			let mut q = Quant::from_frac(2, 3);
			q.round(0);
			assert_eq!(q, Quant::from_i128(1));
		}

		#[test]
		fn test_round_returns_error_term() {
			let mut q = Quant::from_frac(400000, 9);
			let err = q.round(2).unwrap();
			assert_eq!(q + err, Quant::from_frac(400000, 9));
		}

		#[test]
		fn test_round_negative_to_zero() {
			let mut q = Quant::from_str("-0.004").unwrap();
			q.round(2);
			assert!(q.is_zero());
			assert!(!q.is_negative);
		}

		#[test]
		fn test_round_overflow_leaves_value() {
			let mut q = Quant::from_str("1e37").unwrap();
			assert_eq!(q.round(2), None);
			assert_eq!(q, Quant::from_str("1e37").unwrap());
			assert_eq!(q.rounded(2), None);
		}

		#[test]
		fn test_round_long_fraction() {
			let q = Quant::from_str("0.1234567890123456789012345678901234567")
				.unwrap();
			assert_eq!(q.rounded(2), Some(Quant::from_str("0.12").unwrap()));
		}
	}

	mod display {
		use super::*;

		#[test]
		fn test_fixed_two_places() {
			assert_eq!(format!("{:.2}", Quant::from_i128(90)), "90.00");
			assert_eq!(
				format!("{:.2}", Quant::from_frac(400000, 9)),
				"44444.44"
			);
			assert_eq!(format!("{:.2}", Quant::from_frac(1, 2)), "0.50");
		}

		#[test]
		fn test_no_grouping() {
			let q = Quant::from_i128(1234567);
			assert_eq!(format!("{:.2}", q), "1234567.00");
		}

		#[test]
		fn test_render_precision_default() {
			let rate = Quant::from_str("0.912345").unwrap();
			assert_eq!(rate.to_string(), "0.912345");
			assert_eq!(Quant::from_str("4000").unwrap().to_string(), "4000");
		}

		#[test]
		fn test_huge_values_render() {
			let max = Quant::from_str(&u128::MAX.to_string()).unwrap();
			assert_eq!(
				format!("{:.2}", max),
				"340282366920938463463374607431768211455.00"
			);
			assert_eq!(
				format!("{:.2}", Quant::from_str("1e37").unwrap()),
				"10000000000000000000000000000000000000.00"
			);
		}

		#[test]
		fn test_tiny_denominator_headroom() {
			// remainder * 10 would not fit; long division still works
			let q = Quant::from_frac(i128::MAX - 1, i128::MAX);
			assert_eq!(format!("{:.3}", q), "1.000");
			assert_eq!(format!("{:.2}", Quant::from_frac(2, 3)), "0.67");
		}

		#[test]
		fn test_negative() {
			assert_eq!(format!("{:.1}", Quant::from_frac(-5, 4)), "-1.2");
		}
	}
}
