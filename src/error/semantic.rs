use crate::ast::Position;

/// A static-semantics diagnostic. These accumulate and never stop
/// translation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub struct SemanticError {
	pub message:  String,
	pub position: Option<Position>,
}

impl SemanticError {
	pub fn new(message: impl Into<String>, position: Option<Position>) -> Self {
		Self { message: message.into(), position }
	}

	pub fn line(&self) -> Option<usize> { self.position.map(|p| p.line) }

	pub fn column(&self) -> Option<usize> { self.position.map(|p| p.column) }
}

impl std::fmt::Display for SemanticError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.position {
			Some(position) => write!(f, "{} ({position})", self.message),
			None => write!(f, "{}", self.message),
		}
	}
}
