//! Mapping source types, literals and names onto the target language.

/// Which `typing` names the generated text refers to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Typing {
	pub any:      bool,
	pub optional: bool,
}

impl Typing {
	/// The `from typing import ...` line, if one is needed.
	pub fn import(&self) -> Option<String> {
		let names: Vec<&str> = [(self.any, "Any"), (self.optional, "Optional")]
			.into_iter()
			.filter_map(|(used, name)| used.then_some(name))
			.collect();
		(!names.is_empty()).then(|| format!("from typing import {}", names.join(", ")))
	}
}

/// Split `a,Map<b,c>,d` at the commas that are not nested in `<...>`.
fn split_arguments(arguments: &str) -> Vec<&str> {
	let mut parts = Vec::new();
	let mut depth = 0usize;
	let mut start = 0;
	for (i, c) in arguments.char_indices() {
		match c {
			'<' => depth += 1,
			'>' => depth = depth.saturating_sub(1),
			',' if depth == 0 => {
				parts.push(arguments[start..i].trim());
				start = i + 1;
			}
			_ => {}
		}
	}
	let last = arguments[start..].trim();
	if !last.is_empty() {
		parts.push(last);
	}
	parts
}

/// The annotation for a declared type: `int` → `int`, `String[]` →
/// `list[str]`, `Map<String,Integer>` → `dict[str, int]`. Unknown class names
/// pass through with their type arguments dropped.
pub fn python_type(ty: &str, typing: &mut Typing) -> String {
	let ty: String = ty.chars().filter(|c| !c.is_whitespace()).collect();
	if ty.is_empty() {
		typing.any = true;
		return "Any".to_string();
	}
	let mut base = ty.as_str();
	let mut dimensions = 0;
	while let Some(element) = base.strip_suffix("[]") {
		base = element;
		dimensions += 1;
	}
	let (name, arguments) = match base.split_once('<') {
		Some((name, rest)) => (name, rest.strip_suffix('>').map(split_arguments).unwrap_or_default()),
		None => (base, Vec::new()),
	};
	let argument = |index: usize, typing: &mut Typing| match arguments.get(index) {
		Some(argument) => python_type(argument, typing),
		None => {
			typing.any = true;
			"Any".to_string()
		}
	};
	let mut rendered = match name.to_ascii_lowercase().as_str() {
		"byte" | "short" | "int" | "integer" | "long" => "int".to_string(),
		"float" | "double" => "float".to_string(),
		"boolean" => "bool".to_string(),
		"char" | "character" | "string" => "str".to_string(),
		"object" => "object".to_string(),
		"void" => "None".to_string(),
		"list" | "arraylist" | "linkedlist" => format!("list[{}]", argument(0, typing)),
		"set" | "hashset" | "treeset" | "linkedhashset" => format!("set[{}]", argument(0, typing)),
		"map" | "hashmap" | "treemap" | "linkedhashmap" => {
			let key = argument(0, typing);
			format!("dict[{key}, {}]", argument(1, typing))
		}
		"optional" => {
			typing.optional = true;
			format!("Optional[{}]", argument(0, typing))
		}
		_ => name.to_string(),
	};
	for _ in 0..dimensions {
		rendered = format!("list[{rendered}]");
	}
	rendered
}

/// The zero value for an annotation produced by [`python_type`].
pub fn default_value(python_type: &str) -> &'static str {
	match python_type {
		"int" => "0",
		"float" => "0.0",
		"bool" => "False",
		"str" => "\"\"",
		ty if ty.starts_with("list[") => "[]",
		_ => "None",
	}
}

/// Exception classes with a close built-in counterpart.
pub fn exception_type(name: &str) -> Option<&'static str> {
	Some(match name {
		"Exception" | "RuntimeException" | "Throwable" => "Exception",
		"ArithmeticException" => "ZeroDivisionError",
		"ArrayIndexOutOfBoundsException" | "IndexOutOfBoundsException" | "StringIndexOutOfBoundsException" => {
			"IndexError"
		}
		"IllegalArgumentException" | "NumberFormatException" => "ValueError",
		"IllegalStateException" => "RuntimeError",
		"NullPointerException" => "AttributeError",
		"UnsupportedOperationException" => "NotImplementedError",
		"ClassCastException" => "TypeError",
		_ => return None,
	})
}

/// Collection classes whose constructors map onto a built-in.
pub fn collection_constructor(name: &str) -> Option<&'static str> {
	Some(match name {
		"ArrayList" | "LinkedList" => "list",
		"HashMap" | "TreeMap" | "LinkedHashMap" => "dict",
		"HashSet" | "TreeSet" | "LinkedHashSet" => "set",
		_ => return None,
	})
}

static KEYWORDS: &[&str] = &[
	"False", "None", "True", "and", "as", "assert", "async", "await", "def", "del", "elif", "except", "from", "global",
	"in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "with", "yield",
];

/// Names that collide with a target keyword get a trailing underscore.
pub fn escape_name(name: &str) -> String {
	if KEYWORDS.contains(&name) { format!("{name}_") } else { name.to_string() }
}

/// A numeric literal without its type suffix. Octal `017` becomes `0o17`,
/// a floating suffix on an integral spelling keeps the value floating.
pub fn number(text: &str) -> String {
	if let Some(magnitude) = text.strip_prefix('-') {
		return format!("-{}", number(magnitude));
	}
	let lower = text.to_ascii_lowercase();
	if lower.starts_with("0x") || lower.starts_with("0b") {
		return text.trim_end_matches(['l', 'L']).to_string();
	}
	let (digits, floating) = match text.strip_suffix(['f', 'F', 'd', 'D']) {
		Some(digits) => (digits, true),
		None => (text.trim_end_matches(['l', 'L']), false),
	};
	let integral = digits.chars().all(|c| c.is_ascii_digit() || c == '_');
	if floating && integral {
		return format!("{digits}.0");
	}
	if integral && digits.len() > 1 && digits.starts_with('0') {
		return format!("0o{}", &digits[1..]);
	}
	digits.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn py(ty: &str) -> String { python_type(ty, &mut Typing::default()) }

	#[test]
	fn scalar_types() {
		assert_eq!(py("int"), "int");
		assert_eq!(py("long"), "int");
		assert_eq!(py("Integer"), "int");
		assert_eq!(py("double"), "float");
		assert_eq!(py("boolean"), "bool");
		assert_eq!(py("char"), "str");
		assert_eq!(py("String"), "str");
		assert_eq!(py("void"), "None");
		assert_eq!(py("Point"), "Point");
	}

	#[test]
	fn container_types() {
		assert_eq!(py("int[]"), "list[int]");
		assert_eq!(py("String[][]"), "list[list[str]]");
		assert_eq!(py("List<String>"), "list[str]");
		assert_eq!(py("Map<String,List<Integer>>"), "dict[str, list[int]]");
		assert_eq!(py("Set<Point>"), "set[Point]");
		assert_eq!(py("Box<T>"), "Box");
	}

	#[test]
	fn typing_names_are_tracked() {
		let mut typing = Typing::default();
		assert_eq!(python_type("List", &mut typing), "list[Any]");
		assert_eq!(python_type("Optional<String>", &mut typing), "Optional[str]");
		assert_eq!(typing.import().as_deref(), Some("from typing import Any, Optional"));
		assert_eq!(Typing::default().import(), None);
	}

	#[test]
	fn defaults() {
		assert_eq!(default_value("int"), "0");
		assert_eq!(default_value("float"), "0.0");
		assert_eq!(default_value("bool"), "False");
		assert_eq!(default_value("str"), "\"\"");
		assert_eq!(default_value("list[int]"), "[]");
		assert_eq!(default_value("Point"), "None");
	}

	#[test]
	fn numbers() {
		assert_eq!(number("42"), "42");
		assert_eq!(number("42L"), "42");
		assert_eq!(number("1.5f"), "1.5");
		assert_eq!(number("2d"), "2.0");
		assert_eq!(number("0xFF"), "0xFF");
		assert_eq!(number("0x1FL"), "0x1F");
		assert_eq!(number("017"), "0o17");
		assert_eq!(number("0"), "0");
		assert_eq!(number("1_000"), "1_000");
		assert_eq!(number("1e3"), "1e3");
		assert_eq!(number("-3f"), "-3.0");
	}

	#[test]
	fn keywords() {
		assert_eq!(escape_name("from"), "from_");
		assert_eq!(escape_name("lambda"), "lambda_");
		assert_eq!(escape_name("count"), "count");
	}
}
