use std::collections::HashSet;

use super::{
	Context, Members, Translator,
	types::{default_value, escape_name, exception_type},
};
use crate::ast::{ClassDecl, CompilationUnit, ConstructorDecl, Expression, Member, MethodDecl, Statement, VarDecl};

/// Instance and static members visible in `class` with their types,
/// inherited ones included when the superclass is declared in the same unit.
/// A member hides an inherited one of the same name.
pub(super) fn members(unit: &CompilationUnit, class: &ClassDecl) -> (Members, Members) {
	let mut instance = Members::new();
	let mut statics = Members::new();
	let mut visited = HashSet::new();
	let mut current = Some(class);
	while let Some(class) = current {
		if !visited.insert(class.name.clone()) {
			break;
		}
		for member in &class.members {
			let (name, ty, is_static) = match member {
				Member::Field(field) => (&field.name, &field.ty, field.is_static()),
				Member::Method(method) => (&method.name, &method.return_type, method.is_static()),
				_ => continue,
			};
			if instance.contains_key(name) || statics.contains_key(name) {
				continue;
			}
			let members = if is_static { &mut statics } else { &mut instance };
			members.insert(name.clone(), ty.clone());
		}
		current = class.base.as_deref().and_then(|base| unit.classes.iter().find(|c| c.name == base));
	}
	(instance, statics)
}

/// `this(...)` or `super(...)` as the first statement.
fn delegates(body: &[Statement]) -> bool {
	matches!(
		body.first(),
		Some(Statement::Expression(Expression::Call { callee, .. }))
			if matches!(callee.as_identifier(), Some("this" | "super"))
	)
}

fn base_name(base: &str) -> String {
	match exception_type(base) {
		Some(builtin) => builtin.to_string(),
		None => base.split('<').next().unwrap_or(base).to_string(),
	}
}

impl Translator {
	pub(super) fn class(&mut self, unit: &CompilationUnit, class: &ClassDecl) {
		let (instance, statics) = members(unit, class);
		self.context = Context { class: class.name.clone(), instance, statics, ..Default::default() };
		match &class.base {
			Some(base) => self.line(format!("class {}({}):", class.name, base_name(base))),
			None => self.line(format!("class {}:", class.name)),
		}

		self.indented(|t| {
			let mut chunks = vec![t.capture(|t| t.static_fields(class)), t.capture(|t| t.constructor(class))];
			for method in class.methods() {
				chunks.push(t.capture(|t| t.method(method)));
			}
			chunks.retain(|chunk| !chunk.is_empty());
			if chunks.is_empty() {
				t.line("pass");
			}
			for (i, chunk) in chunks.into_iter().enumerate() {
				if i > 0 {
					t.blank();
				}
				t.lines.extend(chunk);
			}
		});
	}

	fn static_fields(&mut self, class: &ClassDecl) {
		self.context.class_body = true;
		for field in class.fields().filter(|field| field.is_static()) {
			let declaration = self.declaration(field);
			self.line(declaration);
		}
		self.context.class_body = false;
	}

	/// All constructors merge into one `__init__`: the first one with the
	/// most parameters supplies the signature and the body, parameters past
	/// the smallest arity get defaults. Instance fields not assigned by that
	/// body are initialized ahead of it.
	fn constructor(&mut self, class: &ClassDecl) {
		let constructors: Vec<&ConstructorDecl> = class.constructors().collect();
		let fields: Vec<&VarDecl> = class.fields().filter(|field| !field.is_static()).collect();
		let initializers: Vec<&Vec<Statement>> = class
			.members
			.iter()
			.filter_map(|member| match member {
				Member::Initializer(block) => Some(block),
				_ => None,
			})
			.collect();
		let primary = constructors.iter().rev().max_by_key(|constructor| constructor.params.len()).copied();
		if primary.is_none() && fields.is_empty() && initializers.is_empty() {
			return;
		}

		let min = constructors.iter().map(|constructor| constructor.params.len()).min().unwrap_or(0);
		let params = primary.map(|constructor| constructor.params.as_slice()).unwrap_or_default();
		let body = primary.map(|constructor| constructor.body.as_slice()).unwrap_or_default();
		let mut signature = vec!["self".to_string()];
		for (i, param) in params.iter().enumerate() {
			let ty = self.python_type(&param.ty);
			let name = escape_name(&param.name);
			signature.push(match (i < min, default_value(&ty)) {
				(true, _) => format!("{name}: {ty}"),
				(false, "[]") => format!("{name}: {ty} = None"),
				(false, value) => format!("{name}: {ty} = {value}"),
			});
		}
		self.line(format!("def __init__({}):", signature.join(", ")));

		let delegates = delegates(body);
		self.suite(|t| {
			let names: Vec<_> = params.iter().map(|param| (param.name.clone(), param.ty.clone())).collect();
			let rendered = t.capture(|t| t.scoped(names, |t| t.statements(body)));
			if !delegates {
				if class.base.is_some() {
					t.line("super().__init__()");
				}
				for field in &fields {
					let assigned = format!("self.{} = ", escape_name(&field.name));
					if rendered.iter().any(|line| line.contains(&assigned)) {
						continue;
					}
					let declaration = t.declaration(field);
					t.line(format!("self.{declaration}"));
				}
				for block in &initializers {
					t.scoped(Vec::new(), |t| t.statements(block));
				}
			}
			t.lines.extend(rendered);
		});
	}

	fn method(&mut self, method: &MethodDecl) {
		let is_static = method.is_static();
		let mut params = if is_static { Vec::new() } else { vec!["self".to_string()] };
		for param in &method.params {
			let ty = self.python_type(&param.ty);
			params.push(format!("{}: {ty}", escape_name(&param.name)));
		}
		let returns = self.python_type(&method.return_type);
		if is_static {
			self.line("@staticmethod");
		}
		self.line(format!("def {}({}) -> {returns}:", escape_name(&method.name), params.join(", ")));

		self.context.in_static = is_static;
		match &method.body {
			Some(body) => {
				let names: Vec<_> = method.params.iter().map(|param| (param.name.clone(), param.ty.clone())).collect();
				self.suite(|t| t.scoped(names, |t| t.statements(body)));
			}
			None => self.indented(|t| t.line("raise NotImplementedError")),
		}
		self.context.in_static = false;
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::render;

	#[test]
	fn constructors_merge_into_one_initializer() {
		let text = render(
			"class Point {
				int x; int y;
				Point() { this(0, 0); }
				Point(int x) { this.x = x; }
				Point(int x, int y) { this.x = x; this.y = y; }
			}",
		);
		assert!(text.contains(
			"class Point:\n    def __init__(self, x: int = 0, y: int = 0):\n        self.x = x\n        self.y = y\n"
		));
		assert_eq!(text.matches("def __init__").count(), 1);
	}

	#[test]
	fn optional_parameter_past_minimum_arity() {
		let text = render("class C { C() {} C(int x) {} }");
		assert!(text.contains("def __init__(self, x: int = 0):\n        pass\n"));
	}

	#[test]
	fn instance_fields_are_injected_unless_assigned() {
		let text = render(
			"class Counter {
				private int count;
				private String label = \"c\";
				static int created = 0;
				Counter(int start) { count = start; created++; }
				int next() { count = count + 1; return count; }
			}",
		);
		assert_eq!(
			text,
			"from __future__ import annotations\n\n\n\
			 class Counter:\n    \
			     created: int = 0\n\n    \
			     def __init__(self, start: int):\n        \
			         self.label: str = \"c\"\n        \
			         self.count = start\n        \
			         Counter.created += 1\n\n    \
			     def next(self) -> int:\n        \
			         self.count += 1\n        \
			         return self.count\n"
		);
	}

	#[test]
	fn delegating_constructor_skips_injection() {
		let text = render("class A { int n = 5; A() { this(1); } A(int n) { this.n = n; } }");
		assert!(text.contains("def __init__(self, n: int = 0):\n        self.n = n\n"));
		let text = render("class B { int n = 5; B(int k) { this(); } B() {} }");
		assert!(text.contains("def __init__(self, k: int = 0):\n        self.__init__()\n"));
		assert!(!text.contains("self.n: int"));
	}

	#[test]
	fn generated_initializer_for_fields_and_blocks() {
		let text = render("class Box extends Base { List<Integer> items; { items.add(1); } }");
		assert!(text.contains(
			"class Box(Base):\n    def __init__(self):\n        super().__init__()\n        self.items: list[int] = []\n        self.items.add(1)\n"
		));
	}

	#[test]
	fn exception_subclass() {
		let text = render("class Oops extends RuntimeException { Oops(String m) { super(m); } }");
		assert!(text.contains("class Oops(Exception):\n    def __init__(self, m: str):\n        super().__init__(m)\n"));
	}

	#[test]
	fn abstract_method_raises() {
		let text = render(
			"abstract class Shape { abstract double area(); public String describe() { return \"area \" + area(); } }",
		);
		assert!(text.contains("    def area(self) -> float:\n        raise NotImplementedError\n\n"));
		assert!(text.contains("        return \"area \" + str(self.area())\n"));
	}

	#[test]
	fn static_members_resolve_through_the_class() {
		let text = render(
			"class T {
				static final int LIMIT = 3;
				static int BIGGER = LIMIT + 1;
				static int twice(int v) { return helper(v) * LIMIT; }
				static int helper(int v) { return v; }
			}",
		);
		assert!(text.contains("    LIMIT: int = 3\n    BIGGER: int = LIMIT + 1\n"));
		assert!(text.contains("        return T.helper(v) * T.LIMIT\n"));
	}

	#[test]
	fn inherited_members_resolve_to_self() {
		let text = render(
			"class Base { int size; int grow() { return 1; } }
			 class Child extends Base { int twice() { return size + grow(); } }",
		);
		assert!(text.contains("        return self.size + self.grow()\n"));
	}

	#[test]
	fn locals_shadow_fields() {
		let text = render("class A { int x; int f(int x) { return x; } int g() { int x = 2; return x; } }");
		assert!(text.contains("    def f(self, x: int) -> int:\n        return x\n"));
		assert!(text.contains("        x: int = 2\n        return x\n"));
	}

	#[test]
	fn keyword_names_are_escaped() {
		let text = render("class A { void f(int from) { int lambda = from; } }");
		assert!(text.contains("    def f(self, from_: int) -> None:\n        lambda_: int = from_\n"));
	}

	#[test]
	fn inheritance_cycle_terminates() {
		let text = render("class A extends B { } class B extends A { }");
		assert!(text.contains("class A(B):\n    pass\n"));
	}
}
