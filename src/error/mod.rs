pub mod parser;
pub mod semantic;

/// JpyerError is the top-level error type for the translator.
#[derive(thiserror::Error, Debug)]
pub enum JpyerError {
	/// Internal translator error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// The source text is not grammatical, translation stops at the first one
	#[error("SyntaxError: {0}")]
	SyntaxError(#[from] parser::ParseError),
	/// The source parsed but declares no class to translate
	#[error("no class declaration found in source")]
	NoClassDeclaration,
	/// Indentation other than a run of spaces or a single tab
	#[error("unsupported indentation {0:?}, expected spaces or a tab")]
	InvalidIndent(String),
}
