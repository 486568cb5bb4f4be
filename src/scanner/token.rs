/// A token produced by the scanner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
	pub r#type: TokenType,
	pub lexeme: &'a str,
	/// Byte offset of the first character
	pub start:  usize,
	/// Byte offset one past the last character
	pub end:    usize,
	pub line:   usize,
	pub column: usize,
}

impl<'a> Token<'a> {
	pub fn new(r#type: TokenType, lexeme: &'a str, start: usize, line: usize, column: usize) -> Self {
		Self { r#type, lexeme, start, end: start + lexeme.len(), line, column }
	}

	pub fn is(&self, r#type: TokenType) -> bool { self.r#type == r#type }
}

/// The different types of tokens, the copying is lightweight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// Identifier, e.g. variable, class or method name.
	Identifier,
	/// Number literal, e.g. `123`, `1.5e3f`, `0xFFL`.
	Number,
	/// String literal with its quotes, e.g. `"hello"`.
	StringLiteral,
	/// Char literal with its quotes, e.g. `'a'`.
	CharLiteral,

	Abstract,
	Assert,
	Boolean,
	Break,
	Byte,
	Case,
	Catch,
	Char,
	Class,
	Const,
	Continue,
	Default,
	Do,
	Double,
	Else,
	Enum,
	Extends,
	Final,
	Finally,
	Float,
	For,
	Goto,
	If,
	Implements,
	Import,
	Instanceof,
	Int,
	Interface,
	Long,
	Native,
	New,
	Package,
	Private,
	Protected,
	Public,
	Return,
	Short,
	Static,
	Strictfp,
	Super,
	Switch,
	Synchronized,
	This,
	Throw,
	Throws,
	Transient,
	Try,
	Void,
	Volatile,
	While,
	True,
	False,
	Null,

	/// `>>>=`
	UnsignedRightShiftAssign,
	/// `>>=`
	RightShiftAssign,
	/// `<<=`
	LeftShiftAssign,
	/// `>>>`
	UnsignedRightShift,
	/// `>>`
	RightShift,
	/// `<<`
	LeftShift,
	/// `==`
	EqualEqual,
	/// `<=`
	LessEqual,
	/// `>=`
	GreaterEqual,
	/// `!=`
	BangEqual,
	/// `&&`
	AndAnd,
	/// `||`
	OrOr,
	/// `++`
	PlusPlus,
	/// `--`
	MinusMinus,
	/// `+=`
	PlusAssign,
	/// `-=`
	MinusAssign,
	/// `*=`
	StarAssign,
	/// `/=`
	SlashAssign,
	/// `&=`
	AmpAssign,
	/// `|=`
	PipeAssign,
	/// `^=`
	CaretAssign,
	/// `%=`
	PercentAssign,
	/// `->`
	Arrow,
	/// `::`
	ColonColon,
	/// `...`
	Ellipsis,
	LeftBrace,
	RightBrace,
	LeftParen,
	RightParen,
	LeftBracket,
	RightBracket,
	Semicolon,
	Comma,
	Dot,
	Equal,
	Greater,
	Less,
	Bang,
	Tilde,
	Question,
	Colon,
	Plus,
	Minus,
	Star,
	Slash,
	Amp,
	Pipe,
	Caret,
	Percent,
	At,

	/// A character no other rule accepts.
	Unknown,
	/// End of file/input.
	Eof,
}

/// Operators and punctuation, longest first so the first prefix match is the
/// maximal munch.
pub(crate) static SYMBOLS: &[(&str, TokenType)] = {
	use TokenType::*;
	&[
		(">>>=", UnsignedRightShiftAssign),
		(">>=", RightShiftAssign),
		("<<=", LeftShiftAssign),
		(">>>", UnsignedRightShift),
		("...", Ellipsis),
		(">>", RightShift),
		("<<", LeftShift),
		("==", EqualEqual),
		("<=", LessEqual),
		(">=", GreaterEqual),
		("!=", BangEqual),
		("&&", AndAnd),
		("||", OrOr),
		("++", PlusPlus),
		("--", MinusMinus),
		("+=", PlusAssign),
		("-=", MinusAssign),
		("*=", StarAssign),
		("/=", SlashAssign),
		("&=", AmpAssign),
		("|=", PipeAssign),
		("^=", CaretAssign),
		("%=", PercentAssign),
		("->", Arrow),
		("::", ColonColon),
		("{", LeftBrace),
		("}", RightBrace),
		("(", LeftParen),
		(")", RightParen),
		("[", LeftBracket),
		("]", RightBracket),
		(";", Semicolon),
		(",", Comma),
		(".", Dot),
		("=", Equal),
		(">", Greater),
		("<", Less),
		("!", Bang),
		("~", Tilde),
		("?", Question),
		(":", Colon),
		("+", Plus),
		("-", Minus),
		("*", Star),
		("/", Slash),
		("&", Amp),
		("|", Pipe),
		("^", Caret),
		("%", Percent),
		("@", At),
	]
};

impl TokenType {
	pub fn keyword_or_identifier(value: &str) -> Self {
		use TokenType::*;
		match value {
			"abstract" => Abstract,
			"assert" => Assert,
			"boolean" => Boolean,
			"break" => Break,
			"byte" => Byte,
			"case" => Case,
			"catch" => Catch,
			"char" => Char,
			"class" => Class,
			"const" => Const,
			"continue" => Continue,
			"default" => Default,
			"do" => Do,
			"double" => Double,
			"else" => Else,
			"enum" => Enum,
			"extends" => Extends,
			"final" => Final,
			"finally" => Finally,
			"float" => Float,
			"for" => For,
			"goto" => Goto,
			"if" => If,
			"implements" => Implements,
			"import" => Import,
			"instanceof" => Instanceof,
			"int" => Int,
			"interface" => Interface,
			"long" => Long,
			"native" => Native,
			"new" => New,
			"package" => Package,
			"private" => Private,
			"protected" => Protected,
			"public" => Public,
			"return" => Return,
			"short" => Short,
			"static" => Static,
			"strictfp" => Strictfp,
			"super" => Super,
			"switch" => Switch,
			"synchronized" => Synchronized,
			"this" => This,
			"throw" => Throw,
			"throws" => Throws,
			"transient" => Transient,
			"try" => Try,
			"void" => Void,
			"volatile" => Volatile,
			"while" => While,
			"true" => True,
			"false" => False,
			"null" => Null,
			_ => Identifier,
		}
	}

	/// Declaration modifiers the parser understands.
	pub fn is_modifier(&self) -> bool {
		use TokenType::*;
		matches!(self, Public | Private | Protected | Static | Final | Abstract)
	}

	/// Primitive type keywords plus `void`.
	pub fn is_type_keyword(&self) -> bool {
		use TokenType::*;
		matches!(self, Int | Float | Double | Boolean | Char | Void | Byte | Short | Long)
	}

	pub fn is_literal(&self) -> bool {
		use TokenType::*;
		matches!(self, Number | StringLiteral | CharLiteral | True | False | Null)
	}
}
