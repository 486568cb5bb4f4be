#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	ParseError(#[from] ParseError),
}

/// The first grammar violation found, with where it happened.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}, column {column}: {type}")]
pub struct ParseError {
	pub line:   usize,
	pub column: usize,
	pub r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(line: usize, column: usize, r#type: ParseErrorType) -> Self { Self { line, column, r#type } }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
	/// A required token is missing, `found` is the lexeme seen instead.
	ExpectedToken { expected: String, found: String },
	/// Input ended where more was required.
	UnexpectedEof { expected: String },
	UnclosedClassBody(String),
	UnclosedBlock,
	/// A `for` header part not followed by its `;`.
	ForHeaderSemicolon { after: String, found: String },
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			ExpectedToken { expected, found } => {
				write!(f, "Expected {expected}, found '{found}'")
			}
			UnexpectedEof { expected } => {
				write!(f, "Unexpected end of input, expected {expected}")
			}
			UnclosedClassBody(name) => {
				write!(f, "Unclosed class body for class {name}")
			}
			UnclosedBlock => {
				write!(f, "Reached end of input while parsing a block, missing '}}'")
			}
			ForHeaderSemicolon { after, found } => {
				write!(f, "Missing ';' after for {after}, found '{found}'")
			}
		}
	}
}
