//! The abstract syntax tree.
//!
//! ``` markdown
//! CompilationUnit
//! └── ClassDecl: Counter
//!     ├── FieldDecl: int count
//!     └── MethodDecl: increment
//!         └── Assign
//!             ├── Identifier: count
//!             └── BinaryOp: +
//! ```
//!
//! The tree is single-owner: a node owns its children and never points back
//! at its parent. Every node remembers where it came from for diagnostics.

mod dump;
pub mod expression;
pub mod statement;

pub use expression::{BinaryOperator, Expression, PostfixOperator, PrefixOperator};
pub use statement::{CatchClause, Statement, SwitchCase};

use crate::scanner::{Token, TokenType};

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
	pub line:   usize,
	pub column: usize,
}

impl Position {
	pub fn new(line: usize, column: usize) -> Self { Self { line, column } }
}

impl From<&Token<'_>> for Position {
	fn from(token: &Token<'_>) -> Self { Self { line: token.line, column: token.column } }
}

impl std::fmt::Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}

/// The root: every class declared in one source text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
	pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
	Public,
	Private,
	Protected,
	Static,
	Final,
	Abstract,
}

impl Modifier {
	pub fn from_token(r#type: TokenType) -> Option<Self> {
		Some(match r#type {
			TokenType::Public => Modifier::Public,
			TokenType::Private => Modifier::Private,
			TokenType::Protected => Modifier::Protected,
			TokenType::Static => Modifier::Static,
			TokenType::Final => Modifier::Final,
			TokenType::Abstract => Modifier::Abstract,
			_ => return None,
		})
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Modifier::Public => "public",
			Modifier::Private => "private",
			Modifier::Protected => "protected",
			Modifier::Static => "static",
			Modifier::Final => "final",
			Modifier::Abstract => "abstract",
		}
	}
}

fn is_static(modifiers: &[Modifier]) -> bool { modifiers.contains(&Modifier::Static) }

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
	pub name:      String,
	pub modifiers: Vec<Modifier>,
	/// The `extends` target.
	pub base:      Option<String>,
	pub members:   Vec<Member>,
	pub position:  Position,
}

impl ClassDecl {
	pub fn fields(&self) -> impl Iterator<Item = &VarDecl> {
		self.members.iter().filter_map(|member| match member {
			Member::Field(field) => Some(field),
			_ => None,
		})
	}

	pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
		self.members.iter().filter_map(|member| match member {
			Member::Method(method) => Some(method),
			_ => None,
		})
	}

	pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
		self.members.iter().filter_map(|member| match member {
			Member::Constructor(constructor) => Some(constructor),
			_ => None,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
	Field(VarDecl),
	Method(MethodDecl),
	Constructor(ConstructorDecl),
	/// An instance initializer block `{ ... }` in the class body.
	Initializer(Vec<Statement>),
}

/// A field or local variable declaration. `ty` keeps the source spelling
/// without whitespace, e.g. `Map<String,Integer>` or `int[][]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
	pub ty:        String,
	pub name:      String,
	pub modifiers: Vec<Modifier>,
	pub init:      Option<Expression>,
	pub position:  Position,
}

impl VarDecl {
	pub fn is_static(&self) -> bool { is_static(&self.modifiers) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
	pub ty:       String,
	pub name:     String,
	pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
	pub name:        String,
	pub return_type: String,
	pub modifiers:   Vec<Modifier>,
	pub params:      Vec<Param>,
	/// `None` for a bodiless `abstract` declaration.
	pub body:        Option<Vec<Statement>>,
	pub position:    Position,
}

impl MethodDecl {
	pub fn is_static(&self) -> bool { is_static(&self.modifiers) }

	/// `static void main(String[] args)`
	pub fn is_entry_point(&self) -> bool {
		self.name == "main"
			&& self.is_static()
			&& self.return_type == "void"
			&& matches!(self.params.as_slice(), [param] if param.ty == "String[]")
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
	pub name:      String,
	pub modifiers: Vec<Modifier>,
	pub params:    Vec<Param>,
	pub body:      Vec<Statement>,
	pub position:  Position,
}
