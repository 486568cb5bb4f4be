//! # How Java-like source turns into Python-like source
//!
//! User's source code: `int total = (min + max) / 2;`

//! ## Scanning
//!
//! Also known as `lexing`, takes in the characters and converts them into
//! tokens. Single characters `(`, `;`, operators `>>>=`, numbers `0x1FL`,
//! string literals `"hi!"`, identifiers `min` are all tokens.
//!
//! Whitespaces and comments are dropped. A character that fits nowhere still
//! becomes a token of its own, so scanning never fails.

//! ## Parsing
//!
//! A recursive-descent parser with precedence climbing builds the
//! `abstract syntax tree`. It stops at the first `syntax error`.
//!
//! ``` markdown
//! total (Declaration)
//! └── / (BinaryOp)
//!     ├── + (BinaryOp)
//!     │   ├── min (Identifier)
//!     │   └── max (Identifier)
//!     └── 2 (Literal)
//! ```

//! ## Static analysis
//!
//! Names are resolved against a chain of scopes, classes are registered
//! before any body is read so later declarations are visible, and every
//! expression gets a type. Problems are collected and reported, they never
//! stop translation.

//! ## Optimization
//!
//! Constant folding and algebraic simplification, both careful never to
//! change what the program does:
//!
//! `area = 3 * (4 + 1) + 0;` => `area = 15;`

//! ## Code generation
//!
//! Instead of lowering to machine code, the tree is printed as source code
//! for another high-level language. Control flow the target lacks (`do`,
//! three-clause `for`, `switch`, overloaded constructors) is rebuilt from
//! what it has.

pub mod analyzer;
pub mod ast;
pub mod cli;
mod error;
mod jpyer;
pub mod optimizer;
pub mod parser;
pub mod scanner;
pub mod translator;

pub use error::{
	JpyerError,
	parser::{ParseError, ParseErrorType},
	semantic::SemanticError,
};
pub use jpyer::{Jpyer, Options};
pub use translator::Indent;
