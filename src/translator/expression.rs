//! Expressions render bottom-up, each child parenthesized only when its
//! target precedence is lower than its position requires.

use super::{
	Translator,
	types::{collection_constructor, default_value, escape_name, exception_type, number},
};
use crate::ast::{BinaryOperator, Expression, PostfixOperator, PrefixOperator};

const TERNARY: u8 = 1;
const OR: u8 = 2;
const AND: u8 = 3;
const NOT: u8 = 4;
const COMPARISON: u8 = 5;
const BIT_OR: u8 = 6;
const BIT_XOR: u8 = 7;
const BIT_AND: u8 = 8;
const SHIFT: u8 = 9;
const SUM: u8 = 10;
const PRODUCT: u8 = 11;
const UNARY: u8 = 12;
const PRIMARY: u8 = 15;

fn precedence(operator: BinaryOperator) -> u8 {
	use BinaryOperator::*;
	match operator {
		Or => OR,
		And => AND,
		Greater | Less | GreaterEqual | LessEqual | Equal | NotEqual => COMPARISON,
		BitOr => BIT_OR,
		BitXor => BIT_XOR,
		BitAnd => BIT_AND,
		LeftShift | RightShift | UnsignedRightShift => SHIFT,
		Add | Sub => SUM,
		Mul | Div | Mod => PRODUCT,
	}
}

fn literal(value: &str) -> (String, u8) {
	match value.to_ascii_lowercase().as_str() {
		"true" => return ("True".to_string(), PRIMARY),
		"false" => return ("False".to_string(), PRIMARY),
		"null" => return ("None".to_string(), PRIMARY),
		_ => {}
	}
	if value.starts_with(['"', '\'']) {
		return (value.to_string(), PRIMARY);
	}
	let number = number(value);
	let precedence = if number.starts_with('-') { UNARY } else { PRIMARY };
	(number, precedence)
}

fn base_name(ty: &str) -> &str { ty.split('<').next().unwrap_or(ty) }

fn returns_text(method: &str) -> bool {
	matches!(method, "substring" | "trim" | "toUpperCase" | "toLowerCase" | "concat" | "replace" | "strip" | "repeat")
}

fn is_null(expression: &Expression) -> bool { expression.as_literal() == Some("null") }

/// `System.out` for the tree of `System.out`.
fn dotted(expression: &Expression) -> Option<String> {
	match expression {
		Expression::Identifier { name, .. } => Some(name.clone()),
		Expression::Member { object, name, .. } => dotted(object).map(|object| format!("{object}.{name}")),
		_ => None,
	}
}

fn is_primitive(ty: &str) -> bool {
	matches!(ty, "byte" | "short" | "int" | "long" | "float" | "double" | "boolean" | "char")
}

impl Translator {
	pub(super) fn expression(&mut self, expression: &Expression) -> String { self.render(expression).0 }

	pub(super) fn operator(operator: BinaryOperator) -> &'static str {
		use BinaryOperator::*;
		match operator {
			And => "and",
			Or => "or",
			// Python integers have no fixed width to shift zeros into.
			UnsignedRightShift => ">>",
			_ => operator.symbol(),
		}
	}

	/// Render `expression` where at least `min` precedence is required.
	fn operand(&mut self, expression: &Expression, min: u8) -> String {
		let (text, precedence) = self.render(expression);
		if precedence < min { format!("({text})") } else { text }
	}

	fn arguments(&mut self, arguments: &[Expression]) -> String {
		arguments.iter().map(|argument| self.expression(argument)).collect::<Vec<_>>().join(", ")
	}

	fn render(&mut self, expression: &Expression) -> (String, u8) {
		use Expression::*;
		match expression {
			Literal { value, .. } => literal(value),
			Identifier { name, .. } => (self.name(name), PRIMARY),
			Member { object, name, .. } if name == "length" && !self.is_user_object(object) => {
				(format!("len({})", self.expression(object)), PRIMARY)
			}
			Member { object, name, .. } => (format!("{}.{}", self.operand(object, PRIMARY), escape_name(name)), PRIMARY),
			Call { callee, arguments, .. } => self.call(callee, arguments),
			Index { target, index, .. } => {
				let target = self.operand(target, PRIMARY);
				(format!("{target}[{}]", self.expression(index)), PRIMARY)
			}
			New { class, arguments, .. } => self.new_object(class, arguments),
			NewArray { element, dimensions, extra, .. } => self.new_array(element, dimensions, *extra),
			ArrayInit { elements, .. } => (format!("[{}]", self.arguments(elements)), PRIMARY),
			Binary { operator, left, right, .. } => self.binary(*operator, left, right),
			Prefix { operator, operand, .. } => self.prefix(*operator, operand),
			Cast { ty, operand, .. } => self.cast(ty, operand),
			Postfix { operator, operand, .. } => self.postfix(*operator, operand),
			Ternary { condition, then_branch, else_branch, .. } => {
				let condition = self.operand(condition, OR);
				let then_branch = self.operand(then_branch, OR);
				let else_branch = self.operand(else_branch, TERNARY);
				(format!("{then_branch} if {condition} else {else_branch}"), TERNARY)
			}
			Unknown { text, .. } => {
				self.notes.push(text.clone());
				("None".to_string(), PRIMARY)
			}
		}
	}

	/// A bare name: locals stay bare, members of the class go through
	/// `self` or the class name.
	fn name(&self, name: &str) -> String {
		let context = &self.context;
		let escaped = escape_name(name);
		match name {
			"this" => "self".to_string(),
			"super" => "super()".to_string(),
			_ if self.is_local(name) => escaped,
			_ if context.statics.contains_key(name) && context.class_body => escaped,
			_ if context.instance.contains_key(name) && !context.in_static && !context.class_body => {
				format!("self.{escaped}")
			}
			_ if context.statics.contains_key(name) => format!("{}.{escaped}", context.class),
			_ => escaped,
		}
	}

	/// The source type of `expression` as far as declarations tell it:
	/// literals, locals, members of classes in the unit and a few library
	/// calls known to return text.
	fn type_of(&self, expression: &Expression) -> Option<String> {
		use Expression::*;
		match expression {
			Literal { value, .. } if value.starts_with('"') => Some("String".to_string()),
			Literal { value, .. } if value.starts_with('\'') => Some("char".to_string()),
			Identifier { name, .. } if name == "this" => Some(self.context.class.clone()),
			Identifier { name, .. } => self
				.local_type(name)
				.or_else(|| {
					let context = &self.context;
					context.instance.get(name).or_else(|| context.statics.get(name)).map(String::as_str)
				})
				.map(str::to_string)
				.or_else(|| self.classes.contains_key(name).then(|| name.clone())),
			Member { object, name, .. } => {
				let object = self.type_of(object)?;
				if name == "length" && object.ends_with("[]") {
					return Some("int".to_string());
				}
				self.member_type(&object, name)
			}
			Call { callee, .. } => match callee.as_ref() {
				Identifier { name, .. } => self.type_of(callee).filter(|_| name != "this" && name != "super"),
				Member { object, name, .. } => match self.type_of(object) {
					Some(class) if self.classes.contains_key(base_name(&class)) => self.member_type(&class, name),
					_ if dotted(callee).as_deref() == Some("String.valueOf") => Some("String".to_string()),
					Some(text) if text == "String" && returns_text(name) => Some(text),
					_ if name == "toString" => Some("String".to_string()),
					_ => None,
				},
				_ => None,
			},
			Index { target, .. } => self.type_of(target)?.strip_suffix("[]").map(str::to_string),
			New { class, .. } => Some(class.clone()),
			Cast { ty, .. } => Some(ty.clone()),
			Binary { operator, left, right, .. } if operator.is_arithmetic() || operator.is_bitwise() => {
				let left = self.type_of(left);
				let concatenation =
					*operator == BinaryOperator::Add && (left.as_deref() == Some("String") || self.is_text(right));
				if concatenation { Some("String".to_string()) } else { left }
			}
			Ternary { then_branch, .. } => self.type_of(then_branch),
			_ => None,
		}
	}

	fn member_type(&self, class: &str, name: &str) -> Option<String> {
		self.classes.get(base_name(class))?.get(name).cloned()
	}

	/// Text operands of `+`, whose partner gets converted with `str()`.
	pub(super) fn is_text(&self, expression: &Expression) -> bool {
		self.type_of(expression).as_deref() == Some("String")
	}

	/// `this`, `super` or a value of a class declared in the unit, whose
	/// `length` and `size()` are its own members.
	fn is_user_object(&self, expression: &Expression) -> bool {
		matches!(expression.as_identifier(), Some("this" | "super"))
			|| self.type_of(expression).is_some_and(|ty| self.classes.contains_key(base_name(&ty)))
	}

	fn call(&mut self, callee: &Expression, arguments: &[Expression]) -> (String, u8) {
		let args = self.arguments(arguments);
		let text = match callee {
			Expression::Identifier { name, .. } if name == "this" => format!("self.__init__({args})"),
			Expression::Identifier { name, .. } if name == "super" => format!("super().__init__({args})"),
			Expression::Member { object, name, .. } => match dotted(callee).as_deref() {
				Some("System.out.println") => format!("print({args})"),
				Some("System.out.print") if args.is_empty() => "print(end='')".to_string(),
				Some("System.out.print") => format!("print({args}, end='')"),
				Some("List.of" | "Arrays.asList") => format!("[{args}]"),
				_ if arguments.is_empty()
					&& matches!(name.as_str(), "length" | "size")
					&& !self.is_user_object(object) =>
				{
					format!("len({})", self.expression(object))
				}
				_ => format!("{}.{}({args})", self.operand(object, PRIMARY), escape_name(name)),
			},
			_ => format!("{}({args})", self.operand(callee, PRIMARY)),
		};
		(text, PRIMARY)
	}

	fn new_object(&mut self, class: &str, arguments: &[Expression]) -> (String, u8) {
		let base = class.split('<').next().unwrap_or(class);
		let args = self.arguments(arguments);
		if let Some(builtin) = collection_constructor(base) {
			// a numeric argument is an initial capacity
			let capacity = matches!(
				arguments,
				[argument] if argument.as_literal().is_some_and(|value| value.starts_with(|c: char| c.is_ascii_digit()))
			);
			return (if capacity { format!("{builtin}()") } else { format!("{builtin}({args})") }, PRIMARY);
		}
		(format!("{}({args})", exception_type(base).unwrap_or(base)), PRIMARY)
	}

	/// `[0] * n`, or a comprehension per outer dimension.
	fn new_array(&mut self, element: &str, dimensions: &[Expression], extra: usize) -> (String, u8) {
		let fill = if extra == 0 && is_primitive(element) {
			let ty = self.python_type(element);
			default_value(&ty)
		} else {
			"None"
		};
		let Some((last, outer)) = dimensions.split_last() else { return ("[]".to_string(), PRIMARY) };
		let mut text = format!("[{fill}] * {}", self.operand(last, UNARY));
		let mut precedence = PRODUCT;
		for dimension in outer.iter().rev() {
			text = format!("[{text} for _ in range({})]", self.expression(dimension));
			precedence = PRIMARY;
		}
		(text, precedence)
	}

	fn binary(&mut self, operator: BinaryOperator, left: &Expression, right: &Expression) -> (String, u8) {
		let precedence = precedence(operator);
		if operator == BinaryOperator::Add && (self.is_text(left) || self.is_text(right)) {
			let left = self.concatenated(left, precedence);
			let right = self.concatenated(right, precedence + 1);
			return (format!("{left} + {right}"), precedence);
		}
		// comparisons chain in Python, so neither side may be one
		let (left_min, right_min) =
			if precedence == COMPARISON { (COMPARISON + 1, COMPARISON + 1) } else { (precedence, precedence + 1) };
		let symbol = match operator {
			BinaryOperator::Equal if is_null(left) || is_null(right) => "is",
			BinaryOperator::NotEqual if is_null(left) || is_null(right) => "is not",
			_ => Self::operator(operator),
		};
		let left = self.operand(left, left_min);
		let right = self.operand(right, right_min);
		(format!("{left} {symbol} {right}"), precedence)
	}

	pub(super) fn concatenated(&mut self, expression: &Expression, min: u8) -> String {
		if self.is_text(expression) {
			self.operand(expression, min)
		} else {
			format!("str({})", self.expression(expression))
		}
	}

	fn prefix(&mut self, operator: PrefixOperator, operand: &Expression) -> (String, u8) {
		use PrefixOperator::*;
		match operator {
			Not => (format!("not {}", self.operand(operand, NOT)), NOT),
			Plus | Minus | BitNot => (format!("{}{}", operator.symbol(), self.operand(operand, UNARY)), UNARY),
			Increment | Decrement => {
				let sign = if operator == Increment { '+' } else { '-' };
				match operand.as_identifier().filter(|name| self.is_local(name)).map(escape_name) {
					Some(name) => (format!("({name} := {name} {sign} 1)"), PRIMARY),
					None => self.unsupported_step(operand, operator.symbol(), true),
				}
			}
		}
	}

	/// `x++` yields the old value: `((x := x + 1) - 1)`.
	fn postfix(&mut self, operator: PostfixOperator, operand: &Expression) -> (String, u8) {
		let (sign, undo) = match operator {
			PostfixOperator::Increment => ('+', '-'),
			PostfixOperator::Decrement => ('-', '+'),
		};
		match operand.as_identifier().filter(|name| self.is_local(name)).map(escape_name) {
			Some(name) => (format!("(({name} := {name} {sign} 1) {undo} 1)"), PRIMARY),
			None => self.unsupported_step(operand, operator.symbol(), false),
		}
	}

	/// Only plain locals can be updated inside an expression.
	fn unsupported_step(&mut self, operand: &Expression, symbol: &str, prefix: bool) -> (String, u8) {
		let (text, precedence) = self.render(operand);
		self.notes.push(if prefix { format!("{symbol}{text}") } else { format!("{text}{symbol}") });
		(text, precedence)
	}

	fn cast(&mut self, ty: &str, operand: &Expression) -> (String, u8) {
		let function = match ty {
			"int" | "long" | "short" | "byte" => "int",
			"float" | "double" => "float",
			"char" => "chr",
			"boolean" => "bool",
			"String" => "str",
			_ => return self.render(operand),
		};
		(format!("{function}({})", self.expression(operand)), PRIMARY)
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::{body, render, render_optimized};

	#[test]
	fn printing_and_concatenation() {
		assert_eq!(body("int n", "System.out.println(\"n = \" + n); System.out.print(n); System.out.println();"), [
			"print(\"n = \" + str(n))",
			"print(n, end='')",
			"print()"
		]);
		assert_eq!(body("int a, int b", "String s = a + b + \"!\"; String t = \"x\" + a + b;"), [
			"s: str = str(a + b) + \"!\"",
			"t: str = \"x\" + str(a) + str(b)"
		]);
	}

	#[test]
	fn parentheses_follow_target_precedence() {
		assert_eq!(
			body(
				"int a, int b, int c",
				"int r = (a + b) * c; int s = a - (b - c); int u = (a | b) & c; boolean t = !(a > b) || a == b && c != 0;"
			),
			[
				"r: int = (a + b) * c",
				"s: int = a - (b - c)",
				"u: int = (a | b) & c",
				"t: bool = not a > b or a == b and c != 0"
			]
		);
		assert_eq!(body("boolean p, boolean q", "boolean r = (p == q) == p; boolean s = !(p && q);"), [
			"r: bool = (p == q) == p",
			"s: bool = not (p and q)"
		]);
	}

	#[test]
	fn ternary_and_shifts() {
		assert_eq!(body("int a, int b", "int m = a > b ? a : b; int z = a >>> 1; int w = -(a + b);"), [
			"m: int = a if a > b else b",
			"z: int = a >> 1",
			"w: int = -(a + b)"
		]);
	}

	#[test]
	fn casts() {
		assert_eq!(body("int a", "int k = (int) 3.7; double d = (double) a; char ch = (char) a;"), [
			"k: int = int(3.7)",
			"d: float = float(a)",
			"ch: str = chr(a)"
		]);
	}

	#[test]
	fn literals() {
		assert_eq!(
			body("", "long big = 10L; float f = 2f; boolean ok = true; String s = null; int o = 017; char c = 'c';"),
			["big: int = 10", "f: float = 2.0", "ok: bool = True", "s: str = None", "o: int = 0o17", "c: str = 'c'"]
		);
	}

	#[test]
	fn increments_inside_expressions() {
		assert_eq!(body("int i", "int j = i++; int k = ++i; int l = i--;"), [
			"j: int = ((i := i + 1) - 1)",
			"k: int = (i := i + 1)",
			"l: int = ((i := i - 1) + 1)"
		]);
		let text = render("class C { int count; int f() { int v = count++; return v; } }");
		assert!(text.contains("        v: int = self.count  # Unknown node: self.count++\n"));
	}

	#[test]
	fn objects_and_collections() {
		assert_eq!(
			body(
				"",
				"List<Integer> xs = new ArrayList<>(); Map<String, Integer> m = new HashMap<>(16); Point p = new Point(1, \
				 2); List<Integer> ys = List.of(1, 2, 3); int[] arr = {1, 2};"
			),
			[
				"xs: list[int] = list()",
				"m: dict[str, int] = dict()",
				"p: Point = Point(1, 2)",
				"ys: list[int] = [1, 2, 3]",
				"arr: list[int] = [1, 2]"
			]
		);
	}

	#[test]
	fn lengths_and_null_checks() {
		assert_eq!(
			body("int[] arr, List<String> names, String s", "int n = arr.length + names.size() + s.length(); boolean e = s == null;"),
			["n: int = len(arr) + len(names) + len(s)", "e: bool = s is None"]
		);
	}

	#[test]
	fn own_length_and_size_stay_members() {
		let text =
			render("class Seg { int length; int size() { return length; } int f(Seg o) { return o.length + this.size(); } }");
		assert!(text.contains("        return self.length\n"));
		assert!(text.contains("        return o.length + self.size()\n"));
		assert!(!text.contains("len("));
	}

	#[test]
	fn text_variables_convert_their_partner() {
		assert_eq!(body("String t, int n", "String u = t + n; String v = n + t; int w = n + n;"), [
			"u: str = t + str(n)",
			"v: str = str(n) + t",
			"w: int = n + n"
		]);
		let text = render("class P { String name; int age; String show() { return name + \": \" + age; } }");
		assert!(text.contains("return self.name + \": \" + str(self.age)\n"));
	}

	#[test]
	fn self_and_super() {
		let text = render("class A { void f() {} } class B extends A { void f() { super.f(); this.g(); g(); } void g() {} }");
		assert!(text.contains("        super().f()\n        self.g()\n        self.g()\n"));
	}

	#[test]
	fn optimized_tree_renders_folded_values() {
		let text = render_optimized("class A { int f(int x) { int y = 2 * 3 + 4; return x * 1 + 0; } }");
		assert!(text.contains("        y: int = 10\n        return x\n"));
	}
}
