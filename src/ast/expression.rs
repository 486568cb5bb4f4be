//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `-123 * (45.67)`
//! as nested nodes. Parentheses are not kept: the tree shape already encodes
//! the grouping.

use Expression::*;

use super::Position;
use crate::scanner::TokenType;

/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	/// A literal kept as its source text: `42`, `1.5f`, `"hi"`, `'c'`, `true`,
	/// `null`.
	Literal { value: String, position: Position },
	/// A plain name, also `this` and `super`.
	Identifier { name: String, position: Position },
	/// `object.name`
	Member { object: Box<Expression>, name: String, position: Position },
	/// `callee(arguments)`
	Call { callee: Box<Expression>, arguments: Vec<Expression>, position: Position },
	/// `target[index]`
	Index { target: Box<Expression>, index: Box<Expression>, position: Position },
	/// `new Class(arguments)`
	New { class: String, arguments: Vec<Expression>, position: Position },
	/// `new int[n][m][]`, `extra` counts the trailing unsized dimensions.
	NewArray { element: String, dimensions: Vec<Expression>, extra: usize, position: Position },
	/// `{a, b, c}` or `new T[]{a, b, c}`
	ArrayInit { elements: Vec<Expression>, position: Position },
	Binary { operator: BinaryOperator, left: Box<Expression>, right: Box<Expression>, position: Position },
	Prefix { operator: PrefixOperator, operand: Box<Expression>, position: Position },
	/// `(int) operand`, only primitive target types are recognised.
	Cast { ty: String, operand: Box<Expression>, position: Position },
	Postfix { operator: PostfixOperator, operand: Box<Expression>, position: Position },
	Ternary {
		condition:   Box<Expression>,
		then_branch: Box<Expression>,
		else_branch: Box<Expression>,
		position:    Position,
	},
	/// Something the parser could not make sense of, as `TYPE:text`.
	Unknown { text: String, position: Position },
}

impl Expression {
	pub fn literal(value: impl Into<String>, position: Position) -> Self { Literal { value: value.into(), position } }

	pub fn identifier(name: impl Into<String>, position: Position) -> Self {
		Identifier { name: name.into(), position }
	}

	pub fn member(object: Self, name: impl Into<String>) -> Self {
		let position = object.position();
		Member { object: Box::new(object), name: name.into(), position }
	}

	pub fn call(callee: Self, arguments: Vec<Self>) -> Self {
		let position = callee.position();
		Call { callee: Box::new(callee), arguments, position }
	}

	pub fn index(target: Self, index: Self) -> Self {
		let position = target.position();
		Index { target: Box::new(target), index: Box::new(index), position }
	}

	pub fn binary(operator: BinaryOperator, left: Self, right: Self) -> Self {
		let position = left.position();
		Binary { operator, left: Box::new(left), right: Box::new(right), position }
	}

	pub fn prefix(operator: PrefixOperator, operand: Self, position: Position) -> Self {
		Prefix { operator, operand: Box::new(operand), position }
	}

	pub fn postfix(operator: PostfixOperator, operand: Self) -> Self {
		let position = operand.position();
		Postfix { operator, operand: Box::new(operand), position }
	}

	pub fn ternary(condition: Self, then_branch: Self, else_branch: Self) -> Self {
		let position = condition.position();
		Ternary {
			condition: Box::new(condition),
			then_branch: Box::new(then_branch),
			else_branch: Box::new(else_branch),
			position,
		}
	}

	pub fn unknown(text: impl Into<String>, position: Position) -> Self { Unknown { text: text.into(), position } }

	pub fn position(&self) -> Position {
		match self {
			Literal { position, .. }
			| Identifier { position, .. }
			| Member { position, .. }
			| Call { position, .. }
			| Index { position, .. }
			| New { position, .. }
			| NewArray { position, .. }
			| ArrayInit { position, .. }
			| Binary { position, .. }
			| Prefix { position, .. }
			| Cast { position, .. }
			| Postfix { position, .. }
			| Ternary { position, .. }
			| Unknown { position, .. } => *position,
		}
	}

	/// The name when this is a plain identifier.
	pub fn as_identifier(&self) -> Option<&str> {
		match self {
			Identifier { name, .. } => Some(name),
			_ => None,
		}
	}

	/// The literal text when this is a literal.
	pub fn as_literal(&self) -> Option<&str> {
		match self {
			Literal { value, .. } => Some(value),
			_ => None,
		}
	}

	/// Structural equality that ignores positions, used to recognise
	/// `x = x op y`.
	pub fn same_place(&self, other: &Self) -> bool {
		match (self, other) {
			(Identifier { name: a, .. }, Identifier { name: b, .. }) => a == b,
			(Member { object: a, name: x, .. }, Member { object: b, name: y, .. }) => x == y && a.same_place(b),
			_ => false,
		}
	}
}

/// Binary operators, the precedence values drive precedence climbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
	Mul,
	Div,
	Mod,
	Add,
	Sub,
	Greater,
	Less,
	GreaterEqual,
	LessEqual,
	Equal,
	NotEqual,
	And,
	Or,
	BitAnd,
	BitOr,
	BitXor,
	LeftShift,
	RightShift,
	UnsignedRightShift,
}

impl BinaryOperator {
	pub fn from_token(r#type: TokenType) -> Option<Self> {
		use BinaryOperator::*;
		Some(match r#type {
			TokenType::Star => Mul,
			TokenType::Slash => Div,
			TokenType::Percent => Mod,
			TokenType::Plus => Add,
			TokenType::Minus => Sub,
			TokenType::Greater => Greater,
			TokenType::Less => Less,
			TokenType::GreaterEqual => GreaterEqual,
			TokenType::LessEqual => LessEqual,
			TokenType::EqualEqual => Equal,
			TokenType::BangEqual => NotEqual,
			TokenType::AndAnd => And,
			TokenType::OrOr => Or,
			TokenType::Amp => BitAnd,
			TokenType::Pipe => BitOr,
			TokenType::Caret => BitXor,
			TokenType::LeftShift => LeftShift,
			TokenType::RightShift => RightShift,
			TokenType::UnsignedRightShift => UnsignedRightShift,
			_ => return None,
		})
	}

	/// The operator a compound assignment such as `+=` applies.
	pub fn from_compound(r#type: TokenType) -> Option<Self> {
		use BinaryOperator::*;
		Some(match r#type {
			TokenType::PlusAssign => Add,
			TokenType::MinusAssign => Sub,
			TokenType::StarAssign => Mul,
			TokenType::SlashAssign => Div,
			TokenType::PercentAssign => Mod,
			TokenType::AmpAssign => BitAnd,
			TokenType::PipeAssign => BitOr,
			TokenType::CaretAssign => BitXor,
			TokenType::LeftShiftAssign => LeftShift,
			TokenType::RightShiftAssign => RightShift,
			TokenType::UnsignedRightShiftAssign => UnsignedRightShift,
			_ => return None,
		})
	}

	pub fn precedence(&self) -> u8 {
		use BinaryOperator::*;
		match self {
			Mul | Div | Mod => 60,
			Add | Sub => 50,
			Greater | Less | GreaterEqual | LessEqual => 40,
			Equal | NotEqual => 30,
			And => 20,
			Or => 10,
			BitAnd | BitOr | BitXor | LeftShift | RightShift | UnsignedRightShift => 5,
		}
	}

	pub fn symbol(&self) -> &'static str {
		use BinaryOperator::*;
		match self {
			Mul => "*",
			Div => "/",
			Mod => "%",
			Add => "+",
			Sub => "-",
			Greater => ">",
			Less => "<",
			GreaterEqual => ">=",
			LessEqual => "<=",
			Equal => "==",
			NotEqual => "!=",
			And => "&&",
			Or => "||",
			BitAnd => "&",
			BitOr => "|",
			BitXor => "^",
			LeftShift => "<<",
			RightShift => ">>",
			UnsignedRightShift => ">>>",
		}
	}

	pub fn is_arithmetic(&self) -> bool {
		matches!(self, Self::Mul | Self::Div | Self::Mod | Self::Add | Self::Sub)
	}

	pub fn is_relational(&self) -> bool {
		matches!(self, Self::Greater | Self::Less | Self::GreaterEqual | Self::LessEqual)
	}

	pub fn is_equality(&self) -> bool { matches!(self, Self::Equal | Self::NotEqual) }

	pub fn is_logical(&self) -> bool { matches!(self, Self::And | Self::Or) }

	pub fn is_bitwise(&self) -> bool { self.precedence() == 5 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
	Increment,
	Decrement,
	Not,
	Plus,
	Minus,
	BitNot,
}

impl PrefixOperator {
	pub fn from_token(r#type: TokenType) -> Option<Self> {
		use PrefixOperator::*;
		Some(match r#type {
			TokenType::PlusPlus => Increment,
			TokenType::MinusMinus => Decrement,
			TokenType::Bang => Not,
			TokenType::Plus => Plus,
			TokenType::Minus => Minus,
			TokenType::Tilde => BitNot,
			_ => return None,
		})
	}

	pub fn symbol(&self) -> &'static str {
		use PrefixOperator::*;
		match self {
			Increment => "++",
			Decrement => "--",
			Not => "!",
			Plus => "+",
			Minus => "-",
			BitNot => "~",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOperator {
	Increment,
	Decrement,
}

impl PostfixOperator {
	pub fn symbol(&self) -> &'static str {
		match self {
			PostfixOperator::Increment => "++",
			PostfixOperator::Decrement => "--",
		}
	}
}

fn join(expressions: &[Expression]) -> String {
	expressions.iter().map(|e| format!(" {e}")).collect()
}

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Literal { value, .. } => write!(f, "{value}"),
			Identifier { name, .. } => write!(f, "{name}"),
			Member { object, name, .. } => write!(f, "(. {object} {name})"),
			Call { callee, arguments, .. } => write!(f, "(call {callee}{})", join(arguments)),
			Index { target, index, .. } => write!(f, "(index {target} {index})"),
			New { class, arguments, .. } => write!(f, "(new {class}{})", join(arguments)),
			NewArray { element, dimensions, extra, .. } => {
				write!(f, "(new-array {element}{}{})", join(dimensions), " []".repeat(*extra))
			}
			ArrayInit { elements, .. } => write!(f, "[{}]", join(elements).trim_start()),
			Binary { operator, left, right, .. } => write!(f, "({} {left} {right})", operator.symbol()),
			Prefix { operator, operand, .. } => write!(f, "({} {operand})", operator.symbol()),
			Cast { ty, operand, .. } => write!(f, "(cast {ty} {operand})"),
			Postfix { operator, operand, .. } => write!(f, "(post{} {operand})", operator.symbol()),
			Ternary { condition, then_branch, else_branch, .. } => {
				write!(f, "(? {condition} {then_branch} {else_branch})")
			}
			Unknown { text, .. } => write!(f, "?{text}"),
		}
	}
}
