use std::{fs::read_to_string, path::Path};

use anyhow::Context;
use tracing::debug;

use crate::{
	JpyerError, SemanticError,
	analyzer::{Analyzer, AnalyzerOptions},
	ast::CompilationUnit,
	optimizer::{Optimizer, OptimizerOptions},
	parser::Parser,
	scanner::Scanner,
	translator::{Indent, Translator},
};

/// Knobs for the passes between parsing and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
	pub optimizer: OptimizerOptions,
	pub analyzer:  AnalyzerOptions,
}

/// Jpyer runs the whole pipeline: scan, parse, optimize and translate.
/// Every call starts from nothing, so one value can serve any number of
/// independent sources.
#[derive(Debug, Clone, Default)]
pub struct Jpyer {
	pub options: Options,
}

impl Jpyer {
	pub fn new(options: Options) -> Self { Self { options } }

	/// Translate the source in `path`.
	pub fn translate_file<P: AsRef<Path>>(
		&self,
		path: P,
		indent: Indent,
	) -> Result<(String, CompilationUnit), JpyerError> {
		let path = path.as_ref();
		let source = read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		self.translate(&source, indent)
	}

	/// Translate `source`, returning the text together with the tree as
	/// parsed, before optimization.
	pub fn translate(&self, source: &str, indent: Indent) -> Result<(String, CompilationUnit), JpyerError> {
		let unit = self.parse(source)?;
		let optimized = Optimizer::new(self.options.optimizer).optimize(unit.clone());
		let text = Translator::new(indent).translate(&optimized);
		debug!(bytes = text.len(), "translated source");
		Ok((text, unit))
	}

	/// Parse `source`, which must declare at least one class.
	pub fn parse(&self, source: &str) -> Result<CompilationUnit, JpyerError> {
		let tokens = Scanner::new(source).scan_tokens();
		let unit = Parser::new(tokens).parse()?;
		if unit.classes.is_empty() {
			return Err(JpyerError::NoClassDeclaration);
		}
		Ok(unit)
	}

	/// Static checks over a parsed tree. Problems are reported, never fatal.
	pub fn analyze(&self, unit: &CompilationUnit) -> Vec<SemanticError> {
		Analyzer::new(self.options.analyzer).analyze(unit)
	}

	/// The indented `Kind: value` rendering of a tree.
	pub fn dump(&self, unit: &CompilationUnit) -> String { unit.dump() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn translate_returns_text_and_tree() {
		let (text, unit) = Jpyer::default().translate("class A { int f() { return 1 + 2; } }", Indent::Spaces(2)).unwrap();
		assert_eq!(unit.classes[0].name, "A");
		assert!(text.contains("class A:\n  def f(self) -> int:\n    return 3\n"));
		assert!(unit.dump().contains("BinaryOp: +"));
	}

	#[test]
	fn optimization_can_be_disabled() {
		let options = Options {
			optimizer: OptimizerOptions { constant_folding: false, simplify: false },
			..Default::default()
		};
		let (text, _) = Jpyer::new(options).translate("class A { int f() { return 1 + 2; } }", Indent::default()).unwrap();
		assert!(text.contains("return 1 + 2\n"));
	}

	#[test]
	fn source_without_class_is_rejected() {
		let result = Jpyer::default().translate("import java.util.List;", Indent::default());
		assert!(matches!(result, Err(JpyerError::NoClassDeclaration)));
	}

	#[test]
	fn syntax_error_carries_position() {
		let Err(JpyerError::SyntaxError(error)) = Jpyer::default().translate("class A {\n  void f( {\n}", Indent::default())
		else {
			panic!("expected a syntax error");
		};
		assert_eq!(error.line, 2);
	}

	#[test]
	fn analysis_is_independent_of_translation() {
		let jpyer = Jpyer::default();
		let (text, unit) = jpyer.translate("class A { void f() { int x = true; } }", Indent::default()).unwrap();
		assert!(text.contains("x: int = True"));
		let errors = jpyer.analyze(&unit);
		assert_eq!(errors.len(), 1);
		assert!(errors[0].message.contains("int") && errors[0].message.contains("boolean"));
	}

	#[test]
	fn missing_file_is_an_internal_error() {
		let result = Jpyer::default().translate_file("/definitely/not/here.java", Indent::default());
		assert!(matches!(result, Err(JpyerError::InternalError(_))));
	}
}
