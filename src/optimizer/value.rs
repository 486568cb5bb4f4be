use std::fmt::Display;

use Constant::*;

use crate::ast::{BinaryOperator, PrefixOperator};

/// The value of a literal, as far as folding is concerned.
///
/// Text is kept exactly as written between the quotes, escape sequences
/// included, so concatenating two strings never has to re-escape anything.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Constant {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	Char(String),
}

impl Display for Constant {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Null => write!(f, "null"),
			Bool(b) => write!(f, "{b}"),
			Int(n) => write!(f, "{n}"),
			Float(n) => write!(f, "{n:?}"),
			Str(s) => write!(f, "\"{s}\""),
			Char(c) => write!(f, "'{c}'"),
		}
	}
}

impl Constant {
	/// Read a literal's source text. `None` means the text has no value the
	/// folder understands, which blocks folding instead of reading as zero.
	pub fn parse(text: &str) -> Option<Self> {
		let text = text.trim();
		match text.to_ascii_lowercase().as_str() {
			"null" => return Some(Null),
			"true" => return Some(Bool(true)),
			"false" => return Some(Bool(false)),
			_ => {}
		}
		if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
			return Some(Str(inner.to_string()));
		}
		if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
			return Some(Char(inner.to_string()));
		}
		parse_number(text)
	}

	fn is_zero(&self) -> bool {
		match self {
			Int(n) => *n == 0,
			Float(n) => *n == 0.0,
			_ => false,
		}
	}

	fn as_float(&self) -> Option<f64> {
		match self {
			Int(n) => Some(*n as f64),
			Float(n) => Some(*n),
			_ => None,
		}
	}

	/// Fold `self operator right`, `None` when the fold must be abandoned.
	pub fn binary(&self, operator: BinaryOperator, right: &Self) -> Option<Self> {
		use BinaryOperator::*;

		match operator {
			Add | Sub | Mul | Div | Mod => self.arithmetic(operator, right),
			Greater | Less | GreaterEqual | LessEqual => {
				let (l, r) = (self.as_float()?, right.as_float()?);
				Some(Bool(match operator {
					Greater => l > r,
					Less => l < r,
					GreaterEqual => l >= r,
					_ => l <= r,
				}))
			}
			Equal => self.equal(right).map(Bool),
			NotEqual => self.equal(right).map(|equal| Bool(!equal)),
			And | Or => match (self, right) {
				(Bool(l), Bool(r)) => Some(Bool(if operator == And { *l && *r } else { *l || *r })),
				_ => None,
			},
			BitAnd | BitOr | BitXor | LeftShift | RightShift | UnsignedRightShift => {
				let (Int(l), Int(r)) = (self, right) else { return None };
				let (l, r) = (*l, *r);
				let value = match operator {
					BitAnd => l & r,
					BitOr => l | r,
					BitXor => l ^ r,
					LeftShift => {
						let shift = u32::try_from(r).ok().filter(|shift| *shift < 64)?;
						i64::try_from(i128::from(l) << shift).ok()?
					}
					// `>>>` is folded as a sign-preserving shift too.
					_ => l.checked_shr(u32::try_from(r).ok()?)?,
				};
				Some(Int(value))
			}
		}
	}

	fn arithmetic(&self, operator: BinaryOperator, right: &Self) -> Option<Self> {
		use BinaryOperator::*;

		if matches!(operator, Div | Mod) && right.is_zero() {
			return None;
		}
		match (self, right) {
			(Str(l), Str(r)) if operator == Add => Some(Str(format!("{l}{r}"))),
			(Int(l), Int(r)) => {
				let value = match operator {
					Add => l.checked_add(*r),
					Sub => l.checked_sub(*r),
					Mul => l.checked_mul(*r),
					// Truncates toward zero.
					Div => l.checked_div(*r),
					_ => l.checked_rem(*r),
				};
				value.map(Int)
			}
			_ => {
				let (l, r) = (self.as_float()?, right.as_float()?);
				let value = match operator {
					Add => l + r,
					Sub => l - r,
					Mul => l * r,
					Div => l / r,
					_ => l % r,
				};
				value.is_finite().then_some(Float(value))
			}
		}
	}

	/// Only like with like: numbers with numbers, text with text.
	fn equal(&self, other: &Self) -> Option<bool> {
		match (self, other) {
			(Null, Null) => Some(true),
			(Bool(l), Bool(r)) => Some(l == r),
			(Int(l), Int(r)) => Some(l == r),
			// Two spellings of one character, such as `\n` and `\u000a`.
			(Str(l), Str(r)) | (Char(l), Char(r)) if l.contains('\\') || r.contains('\\') => None,
			(Str(l), Str(r)) | (Char(l), Char(r)) => Some(l == r),
			_ => Some(self.as_float()? == other.as_float()?),
		}
	}

	pub fn prefix(&self, operator: PrefixOperator) -> Option<Self> {
		match (operator, self) {
			(PrefixOperator::Plus, Int(_) | Float(_)) => Some(self.clone()),
			(PrefixOperator::Minus, Int(n)) => n.checked_neg().map(Int),
			(PrefixOperator::Minus, Float(n)) => Some(Float(-n)),
			(PrefixOperator::BitNot, Int(n)) => Some(Int(!n)),
			(PrefixOperator::Not, Bool(b)) => Some(Bool(!b)),
			_ => None,
		}
	}
}

fn parse_number(text: &str) -> Option<Constant> {
	let (negative, body) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text),
	};
	let body = body.replace('_', "");
	let lower = body.to_ascii_lowercase();

	let radix = [("0x", 16), ("0b", 2)].into_iter().find(|(prefix, _)| lower.starts_with(prefix));
	let value = if let Some((prefix, radix)) = radix {
		let digits = lower[prefix.len()..].trim_end_matches('l');
		Int(i64::from_str_radix(digits, radix).ok()?)
	} else {
		let (digits, floating) = match lower.strip_suffix(['f', 'd']) {
			Some(digits) => (digits, true),
			None => (lower.strip_suffix('l').unwrap_or(&lower), false),
		};
		if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | '+' | '-')) {
			return None;
		}
		if !floating && digits.chars().all(|c| c.is_ascii_digit()) {
			match digits.strip_prefix('0').filter(|rest| !rest.is_empty()) {
				Some(octal) => Int(i64::from_str_radix(octal, 8).ok()?),
				None => Int(digits.parse().ok()?),
			}
		} else {
			Float(digits.parse::<f64>().ok().filter(|n| n.is_finite())?)
		}
	};
	if !negative {
		return Some(value);
	}
	value.prefix(PrefixOperator::Minus)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_literals() {
		assert_eq!(Constant::parse("42"), Some(Int(42)));
		assert_eq!(Constant::parse("-7"), Some(Int(-7)));
		assert_eq!(Constant::parse("1_000L"), Some(Int(1000)));
		assert_eq!(Constant::parse("0xFF"), Some(Int(255)));
		assert_eq!(Constant::parse("0b101"), Some(Int(5)));
		assert_eq!(Constant::parse("017"), Some(Int(15)));
		assert_eq!(Constant::parse("0"), Some(Int(0)));
		assert_eq!(Constant::parse("2.5"), Some(Float(2.5)));
		assert_eq!(Constant::parse("1f"), Some(Float(1.0)));
		assert_eq!(Constant::parse("1e3"), Some(Float(1000.0)));
		assert_eq!(Constant::parse("TRUE"), Some(Bool(true)));
		assert_eq!(Constant::parse("null"), Some(Null));
		assert_eq!(Constant::parse("\"hi\""), Some(Str("hi".into())));
		assert_eq!(Constant::parse("'c'"), Some(Char("c".into())));
	}

	#[test]
	fn parse_rejects_non_numbers() {
		assert_eq!(Constant::parse("abc"), None);
		assert_eq!(Constant::parse("inf"), None);
		assert_eq!(Constant::parse("NaN"), None);
		assert_eq!(Constant::parse("99999999999999999999"), None);
		assert_eq!(Constant::parse("1.2.3"), None);
	}

	#[test]
	fn arithmetic() {
		use BinaryOperator::*;
		assert_eq!(Int(2).binary(Add, &Int(3)), Some(Int(5)));
		assert_eq!(Int(7).binary(Div, &Int(2)), Some(Int(3)));
		assert_eq!(Int(-7).binary(Div, &Int(2)), Some(Int(-3)));
		assert_eq!(Int(-7).binary(Mod, &Int(3)), Some(Int(-1)));
		assert_eq!(Int(1).binary(Div, &Float(4.0)), Some(Float(0.25)));
		assert_eq!(Int(6).binary(Div, &Int(0)), None);
		assert_eq!(Float(1.0).binary(Mod, &Float(0.0)), None);
		assert_eq!(Int(i64::MAX).binary(Add, &Int(1)), None);
		assert_eq!(Str("a".into()).binary(Add, &Str("b".into())), Some(Str("ab".into())));
		assert_eq!(Str("a".into()).binary(Add, &Int(1)), None);
		assert_eq!(Char("a".into()).binary(Add, &Int(1)), None);
	}

	#[test]
	fn comparisons() {
		use BinaryOperator::*;
		assert_eq!(Int(2).binary(Less, &Float(2.5)), Some(Bool(true)));
		assert_eq!(Int(2).binary(Equal, &Float(2.0)), Some(Bool(true)));
		assert_eq!(Str("a".into()).binary(NotEqual, &Str("b".into())), Some(Bool(true)));
		assert_eq!(Str("\\n".into()).binary(Equal, &Str("\\u000a".into())), None);
		assert_eq!(Bool(true).binary(Equal, &Int(1)), None);
		assert_eq!(Str("a".into()).binary(Less, &Str("b".into())), None);
	}

	#[test]
	fn logic_and_bits() {
		use BinaryOperator::*;
		assert_eq!(Bool(true).binary(And, &Bool(false)), Some(Bool(false)));
		assert_eq!(Bool(false).binary(Or, &Bool(true)), Some(Bool(true)));
		assert_eq!(Int(1).binary(And, &Bool(true)), None);
		assert_eq!(Int(6).binary(BitAnd, &Int(3)), Some(Int(2)));
		assert_eq!(Int(1).binary(LeftShift, &Int(4)), Some(Int(16)));
		assert_eq!(Int(-16).binary(RightShift, &Int(2)), Some(Int(-4)));
		assert_eq!(Int(-16).binary(UnsignedRightShift, &Int(2)), Some(Int(-4)));
		assert_eq!(Int(1).binary(LeftShift, &Int(64)), None);
		assert_eq!(Int(i64::MAX).binary(LeftShift, &Int(1)), None);
		assert_eq!(Float(1.0).binary(BitOr, &Int(1)), None);
	}

	#[test]
	fn unary() {
		assert_eq!(Int(5).prefix(PrefixOperator::Minus), Some(Int(-5)));
		assert_eq!(Float(0.5).prefix(PrefixOperator::Plus), Some(Float(0.5)));
		assert_eq!(Int(0).prefix(PrefixOperator::BitNot), Some(Int(-1)));
		assert_eq!(Bool(true).prefix(PrefixOperator::Not), Some(Bool(false)));
		assert_eq!(Float(1.0).prefix(PrefixOperator::BitNot), None);
		assert_eq!(Int(1).prefix(PrefixOperator::Not), None);
		assert_eq!(Int(1).prefix(PrefixOperator::Increment), None);
	}

	#[test]
	fn rendering() {
		assert_eq!(Int(-3).to_string(), "-3");
		assert_eq!(Float(5.0).to_string(), "5.0");
		assert_eq!(Bool(false).to_string(), "false");
		assert_eq!(Str("a\\\"b".into()).to_string(), "\"a\\\"b\"");
		assert_eq!(Char("x".into()).to_string(), "'x'");
	}
}
