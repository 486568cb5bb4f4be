//! Rendering the syntax tree as target-language text.
//!
//! The translator walks the (optimized) tree once and appends finished lines
//! to a buffer. It never fails: a shape it has no rendering for becomes a
//! `# Unknown node: ...` comment, trailing the line when the shape is an
//! expression.

mod class;
mod expression;
mod statement;
mod types;

use std::collections::HashMap;

use statement::Jump;
use tracing::debug;
use types::{Typing, python_type};

use crate::{ast::CompilationUnit, error::JpyerError};

/// One level of indentation in the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
	Spaces(usize),
	Tab,
}

impl Default for Indent {
	fn default() -> Self { Indent::Spaces(4) }
}

impl Indent {
	pub fn unit(&self) -> String {
		match self {
			Indent::Spaces(n) => " ".repeat(*n),
			Indent::Tab => "\t".to_string(),
		}
	}
}

/// Accepts a width (`"4"`, `"2"`), `"tab"`, or the indentation itself: a run
/// of spaces or a single tab character.
impl TryFrom<&str> for Indent {
	type Error = JpyerError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		let invalid = || JpyerError::InvalidIndent(value.to_string());
		if value == "\t" || value.eq_ignore_ascii_case("tab") {
			return Ok(Indent::Tab);
		}
		if !value.is_empty() && value.chars().all(|c| c == ' ') {
			return Ok(Indent::Spaces(value.len()));
		}
		match value.parse::<usize>() {
			Ok(width) if (1..=16).contains(&width) => Ok(Indent::Spaces(width)),
			_ => Err(invalid()),
		}
	}
}

impl std::str::FromStr for Indent {
	type Err = JpyerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> { Indent::try_from(s) }
}

/// Translate `unit` with the given indentation.
pub fn translate(unit: &CompilationUnit, indent: Indent) -> String { Translator::new(indent).translate(unit) }

/// Member name to declared type: a field's type or a method's return type.
type Members = HashMap<String, String>;

/// How bare names inside the class being rendered resolve.
#[derive(Debug, Default)]
struct Context {
	class:      String,
	instance:   Members,
	statics:    Members,
	/// Innermost last; parameters and each source block open a frame.
	locals:     Vec<Members>,
	in_static:  bool,
	/// Rendering class-level statements, where statics are in scope bare.
	class_body: bool,
}

pub struct Translator {
	unit:    String,
	/// Every class of the unit with its members, inherited ones included.
	classes: HashMap<String, Members>,
	level:   usize,
	lines:   Vec<String>,
	/// Unknown expression shapes met since the last emitted line.
	notes:   Vec<String>,
	typing:  Typing,
	context: Context,
	jumps:   Vec<Jump>,
}

impl Translator {
	pub fn new(indent: Indent) -> Self {
		Self {
			unit:    indent.unit(),
			classes: HashMap::new(),
			level:   0,
			lines:   Vec::new(),
			notes:   Vec::new(),
			typing:  Typing::default(),
			context: Context::default(),
			jumps:   Vec::new(),
		}
	}

	pub fn translate(&mut self, unit: &CompilationUnit) -> String {
		self.classes = unit
			.classes
			.iter()
			.map(|class| {
				let (instance, statics) = class::members(unit, class);
				(class.name.clone(), instance.into_iter().chain(statics).collect())
			})
			.collect();
		for (i, class) in unit.classes.iter().enumerate() {
			if i > 0 {
				self.blank();
				self.blank();
			}
			self.class(unit, class);
		}
		let entry = unit
			.classes
			.iter()
			.find(|class| class.methods().any(|method| method.is_entry_point()))
			.map(|class| class.name.clone());

		let mut out = vec!["from __future__ import annotations".to_string()];
		out.extend(self.typing.import());
		if entry.is_some() {
			out.push("import sys".to_string());
		}
		out.push(String::new());
		out.push(String::new());
		out.append(&mut self.lines);
		if let Some(class) = entry {
			out.push(String::new());
			out.push(String::new());
			out.push("if __name__ == \"__main__\":".to_string());
			out.push(format!("{}{class}.main(sys.argv[1:])", self.unit));
		}
		debug!(classes = unit.classes.len(), lines = out.len(), "translation finished");
		let mut text = out.join("\n");
		text.push('\n');
		text
	}

	/// Emit one line at the current level, with any pending unknown-node
	/// notes trailing it.
	fn line(&mut self, text: impl AsRef<str>) {
		let mut line = format!("{}{}", self.unit.repeat(self.level), text.as_ref());
		for note in self.notes.drain(..) {
			line.push_str("  # Unknown node: ");
			line.push_str(&note);
		}
		self.lines.push(line);
	}

	fn blank(&mut self) { self.lines.push(String::new()); }

	fn indented(&mut self, f: impl FnOnce(&mut Self)) {
		self.level += 1;
		f(self);
		self.level -= 1;
	}

	/// Run `f` with a fresh buffer and hand back what it emitted.
	fn capture(&mut self, f: impl FnOnce(&mut Self)) -> Vec<String> {
		let outer = std::mem::take(&mut self.lines);
		f(self);
		std::mem::replace(&mut self.lines, outer)
	}

	/// Emit an indented suite, with `pass` when it would hold no statement.
	fn suite(&mut self, f: impl FnOnce(&mut Self)) {
		let start = self.lines.len();
		self.indented(|t| {
			f(t);
			if t.lines[start..].iter().all(|line| line.trim_start().starts_with('#')) {
				t.line("pass");
			}
		});
	}

	/// Run `f` in a new frame holding `names` with their declared types.
	fn scoped(&mut self, names: impl IntoIterator<Item = (String, String)>, f: impl FnOnce(&mut Self)) {
		self.context.locals.push(names.into_iter().collect());
		f(self);
		self.context.locals.pop();
	}

	fn declare(&mut self, name: &str, ty: &str) {
		if let Some(frame) = self.context.locals.last_mut() {
			frame.insert(name.to_string(), ty.to_string());
		}
	}

	fn is_local(&self, name: &str) -> bool { self.local_type(name).is_some() }

	fn local_type(&self, name: &str) -> Option<&str> {
		self.context.locals.iter().rev().find_map(|frame| frame.get(name)).map(String::as_str)
	}

	fn python_type(&mut self, ty: &str) -> String { python_type(ty, &mut self.typing) }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{optimizer, parser::Parser, scanner::Scanner};

	pub(super) fn render(source: &str) -> String {
		let unit = Parser::new(Scanner::new(source).scan_tokens()).parse().unwrap();
		translate(&unit, Indent::default())
	}

	pub(super) fn render_optimized(source: &str) -> String {
		let unit = Parser::new(Scanner::new(source).scan_tokens()).parse().unwrap();
		translate(&optimizer::optimize(unit), Indent::default())
	}

	/// The lines of `void run(params) { body }` inside `class T`, without
	/// their method-level indentation.
	pub(super) fn body(params: &str, body: &str) -> Vec<String> {
		let text = render(&format!("class T {{ void run({params}) {{ {body} }} }}"));
		text.lines()
			.skip_while(|line| !line.contains("def run"))
			.skip(1)
			.map(|line| line.get(8..).unwrap_or_default().to_string())
			.collect()
	}

	#[test]
	fn indent_parsing() {
		assert_eq!(Indent::try_from("4").unwrap(), Indent::Spaces(4));
		assert_eq!(Indent::try_from("2").unwrap(), Indent::Spaces(2));
		assert_eq!(Indent::try_from("tab").unwrap(), Indent::Tab);
		assert_eq!(Indent::try_from("\t").unwrap(), Indent::Tab);
		assert_eq!(Indent::try_from("   ").unwrap(), Indent::Spaces(3));
		assert!(matches!(Indent::try_from("x"), Err(JpyerError::InvalidIndent(s)) if s == "x"));
		assert!(Indent::try_from("").is_err());
		assert!(Indent::try_from("0").is_err());
	}

	#[test]
	fn prelude_and_entry_point() {
		let text = render("public class Main { public static void main(String[] args) { System.out.println(\"hi\"); } }");
		assert_eq!(
			text,
			"from __future__ import annotations\n\
			 import sys\n\
			 \n\
			 \n\
			 class Main:\n    \
			     @staticmethod\n    \
			     def main(args: list[str]) -> None:\n        \
			         print(\"hi\")\n\
			 \n\
			 \n\
			 if __name__ == \"__main__\":\n    \
			     Main.main(sys.argv[1:])\n"
		);
	}

	#[test]
	fn typing_import_lists_used_names() {
		let text = render("class A { List items; Optional<String> name; }");
		assert!(text.contains("from typing import Any, Optional\n"));
		assert!(!text.contains("import sys"));
	}

	#[test]
	fn classes_are_separated_by_two_blank_lines() {
		let text = render("class A {} class B extends A {}");
		assert!(text.contains("class A:\n    pass\n\n\nclass B(A):\n    pass\n"));
	}

	#[test]
	fn tab_indentation() {
		let unit = Parser::new(Scanner::new("class A { void f() { return; } }").scan_tokens()).parse().unwrap();
		let text = translate(&unit, Indent::Tab);
		assert!(text.contains("class A:\n\tdef f(self) -> None:\n\t\treturn\n"));
	}

	#[test]
	fn unknown_expression_trails_its_line() {
		let unit = CompilationUnit {
			classes: vec![crate::ast::ClassDecl {
				name:      "A".into(),
				modifiers: vec![],
				base:      None,
				members:   vec![crate::ast::Member::Method(crate::ast::MethodDecl {
					name:        "f".into(),
					return_type: "void".into(),
					modifiers:   vec![],
					params:      vec![],
					body:        Some(vec![
						crate::ast::Statement::Expression(crate::ast::Expression::unknown(
							"LAMBDA:x -> x",
							Default::default(),
						)),
						crate::ast::Statement::Unknown { text: "assert x;".into(), position: Default::default() },
					]),
					position:    Default::default(),
				})],
				position:  Default::default(),
			}],
		};
		let text = translate(&unit, Indent::default());
		assert!(text.contains("        None  # Unknown node: LAMBDA:x -> x\n"));
		assert!(text.contains("        # Unknown node: assert x;\n"));
	}
}
