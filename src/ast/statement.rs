//! There is no place in the grammar where both an expression and a statement
//! are allowed. Assignments are statements here, so an assignment never
//! appears inside an expression.

use super::{Param, Position, VarDecl, expression::Expression};

/// A statement inside a method, constructor or initializer body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// `int a = 1, b;` declares one variable per entry.
	Declaration(Vec<VarDecl>),
	/// An expression used as a statement.
	Expression(Expression),
	/// `target = value`, compound assignments arrive desugared as
	/// `target = target op value`.
	Assign {
		target:   Expression,
		value:    Expression,
		position: Position,
	},
	/// A block of statements.
	Block(Vec<Statement>),
	If {
		condition:   Expression,
		then_branch: Vec<Statement>,
		/// Another `If` for `else if`, a `Block` for `else { }`, or a single
		/// statement.
		else_branch: Option<Box<Statement>>,
		position:    Position,
	},
	While {
		condition: Expression,
		body:      Vec<Statement>,
		position:  Position,
	},
	DoWhile {
		body:      Vec<Statement>,
		condition: Expression,
		position:  Position,
	},
	For {
		init:      Vec<Statement>,
		condition: Option<Expression>,
		update:    Vec<Statement>,
		body:      Vec<Statement>,
		position:  Position,
	},
	ForEach {
		variable: Param,
		iterable: Expression,
		body:     Vec<Statement>,
		position: Position,
	},
	Switch {
		scrutinee: Expression,
		cases:     Vec<SwitchCase>,
		position:  Position,
	},
	Try {
		body:     Vec<Statement>,
		catches:  Vec<CatchClause>,
		finally:  Option<Vec<Statement>>,
		position: Position,
	},
	/// A return statement.
	Return {
		value:    Option<Expression>,
		position: Position,
	},
	/// A break statement to exit loops and switches.
	Break(Position),
	Continue(Position),
	Throw {
		value:    Expression,
		position: Position,
	},
	/// `assert`, `synchronized` and `goto`, kept as their source text.
	Unknown {
		text:     String,
		position: Position,
	},
}

/// One `case label:` or `default:` arm, `label` is `None` for `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
	pub label:    Option<Expression>,
	pub body:     Vec<Statement>,
	pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
	pub parameter: Option<Param>,
	pub body:      Vec<Statement>,
	pub position:  Position,
}

impl Statement {
	pub fn position(&self) -> Position {
		use Statement::*;
		match self {
			Declaration(declarations) => declarations.first().map(|d| d.position).unwrap_or_default(),
			Expression(expression) => expression.position(),
			Block(statements) => statements.first().map(Statement::position).unwrap_or_default(),
			Assign { position, .. }
			| If { position, .. }
			| While { position, .. }
			| DoWhile { position, .. }
			| For { position, .. }
			| ForEach { position, .. }
			| Switch { position, .. }
			| Try { position, .. }
			| Return { position, .. }
			| Throw { position, .. }
			| Unknown { position, .. } => *position,
			Break(position) | Continue(position) => *position,
		}
	}
}
