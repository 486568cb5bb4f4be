//! Human-readable tree dump: one node per line as `Kind: value`, children two
//! spaces deeper than their parent.

use std::fmt::Write;

use super::*;

struct Dumper {
	out: String,
}

impl Dumper {
	fn node(&mut self, depth: usize, kind: &str, value: Option<&str>) {
		let indent = "  ".repeat(depth);
		// Writing to a String never fails.
		let _ = match value {
			Some(value) => writeln!(self.out, "{indent}{kind}: {value}"),
			None => writeln!(self.out, "{indent}{kind}"),
		};
	}

	fn class(&mut self, depth: usize, class: &ClassDecl) {
		self.node(depth, "ClassDecl", Some(&class.name));
		if !class.modifiers.is_empty() {
			self.node(depth + 1, "Modifiers", Some(&modifiers(&class.modifiers)));
		}
		if let Some(base) = &class.base {
			self.node(depth + 1, "Base", Some(base));
		}
		for member in &class.members {
			match member {
				Member::Field(field) => self.var(depth + 1, "FieldDecl", field),
				Member::Method(method) => {
					self.node(depth + 1, "MethodDecl", Some(&method.name));
					if !method.modifiers.is_empty() {
						self.node(depth + 2, "Modifiers", Some(&modifiers(&method.modifiers)));
					}
					self.node(depth + 2, "ReturnType", Some(&method.return_type));
					self.params(depth + 2, &method.params);
					if let Some(body) = &method.body {
						self.block(depth + 2, "Body", body);
					}
				}
				Member::Constructor(constructor) => {
					self.node(depth + 1, "ConstructorDecl", Some(&constructor.name));
					self.params(depth + 2, &constructor.params);
					self.block(depth + 2, "Body", &constructor.body);
				}
				Member::Initializer(body) => self.block(depth + 1, "Initializer", body),
			}
		}
	}

	fn params(&mut self, depth: usize, params: &[Param]) {
		for param in params {
			self.node(depth, "Param", Some(&format!("{} {}", param.ty, param.name)));
		}
	}

	fn var(&mut self, depth: usize, kind: &str, var: &VarDecl) {
		self.node(depth, kind, Some(&format!("{} {}", var.ty, var.name)));
		if let Some(init) = &var.init {
			self.expression(depth + 1, init);
		}
	}

	fn block(&mut self, depth: usize, kind: &str, statements: &[Statement]) {
		self.node(depth, kind, None);
		for statement in statements {
			self.statement(depth + 1, statement);
		}
	}

	fn statement(&mut self, depth: usize, statement: &Statement) {
		match statement {
			Statement::Declaration(vars) => {
				for var in vars {
					self.var(depth, "LocalVarDecl", var);
				}
			}
			Statement::Expression(expression) => {
				self.node(depth, "ExprStmt", None);
				self.expression(depth + 1, expression);
			}
			Statement::Assign { target, value, .. } => {
				self.node(depth, "Assign", None);
				self.expression(depth + 1, target);
				self.expression(depth + 1, value);
			}
			Statement::Block(statements) => self.block(depth, "Block", statements),
			Statement::If { condition, then_branch, else_branch, .. } => {
				self.node(depth, "IfStatement", None);
				self.expression(depth + 1, condition);
				self.block(depth + 1, "Then", then_branch);
				if let Some(else_branch) = else_branch {
					self.node(depth + 1, "Else", None);
					self.statement(depth + 2, else_branch);
				}
			}
			Statement::While { condition, body, .. } => {
				self.node(depth, "WhileStatement", None);
				self.expression(depth + 1, condition);
				self.block(depth + 1, "Body", body);
			}
			Statement::DoWhile { body, condition, .. } => {
				self.node(depth, "DoWhileStatement", None);
				self.block(depth + 1, "Body", body);
				self.expression(depth + 1, condition);
			}
			Statement::For { init, condition, update, body, .. } => {
				self.node(depth, "ForStatement", None);
				self.block(depth + 1, "Init", init);
				if let Some(condition) = condition {
					self.node(depth + 1, "Condition", None);
					self.expression(depth + 2, condition);
				}
				self.block(depth + 1, "Update", update);
				self.block(depth + 1, "Body", body);
			}
			Statement::ForEach { variable, iterable, body, .. } => {
				self.node(depth, "ForEachStatement", Some(&format!("{} {}", variable.ty, variable.name)));
				self.expression(depth + 1, iterable);
				self.block(depth + 1, "Body", body);
			}
			Statement::Switch { scrutinee, cases, .. } => {
				self.node(depth, "SwitchStatement", None);
				self.expression(depth + 1, scrutinee);
				for case in cases {
					match &case.label {
						Some(label) => {
							self.node(depth + 1, "CaseLabel", None);
							self.expression(depth + 2, label);
						}
						None => self.node(depth + 1, "DefaultLabel", None),
					}
					for statement in &case.body {
						self.statement(depth + 2, statement);
					}
				}
			}
			Statement::Try { body, catches, finally, .. } => {
				self.node(depth, "TryStatement", None);
				self.block(depth + 1, "Body", body);
				for catch in catches {
					let parameter = catch.parameter.as_ref().map(|p| format!("{} {}", p.ty, p.name));
					self.node(depth + 1, "Catch", parameter.as_deref());
					for statement in &catch.body {
						self.statement(depth + 2, statement);
					}
				}
				if let Some(finally) = finally {
					self.block(depth + 1, "Finally", finally);
				}
			}
			Statement::Return { value, .. } => {
				self.node(depth, "Return", None);
				if let Some(value) = value {
					self.expression(depth + 1, value);
				}
			}
			Statement::Break(_) => self.node(depth, "Break", None),
			Statement::Continue(_) => self.node(depth, "Continue", None),
			Statement::Throw { value, .. } => {
				self.node(depth, "Throw", None);
				self.expression(depth + 1, value);
			}
			Statement::Unknown { text, .. } => self.node(depth, "Unknown", Some(text)),
		}
	}

	fn expression(&mut self, depth: usize, expression: &Expression) {
		match expression {
			Expression::Literal { value, .. } => self.node(depth, "Literal", Some(value)),
			Expression::Identifier { name, .. } => self.node(depth, "Identifier", Some(name)),
			Expression::Member { object, name, .. } => {
				self.node(depth, "Member", Some(name));
				self.expression(depth + 1, object);
			}
			Expression::Call { callee, arguments, .. } => {
				self.node(depth, "Call", None);
				self.expression(depth + 1, callee);
				self.expressions(depth + 1, arguments);
			}
			Expression::Index { target, index, .. } => {
				self.node(depth, "Index", None);
				self.expression(depth + 1, target);
				self.expression(depth + 1, index);
			}
			Expression::New { class, arguments, .. } => {
				self.node(depth, "New", Some(class));
				self.expressions(depth + 1, arguments);
			}
			Expression::NewArray { element, dimensions, extra, .. } => {
				let ty = format!("{element}{}", "[]".repeat(dimensions.len() + extra));
				self.node(depth, "NewArray", Some(&ty));
				self.expressions(depth + 1, dimensions);
			}
			Expression::ArrayInit { elements, .. } => {
				self.node(depth, "ArrayInit", None);
				self.expressions(depth + 1, elements);
			}
			Expression::Binary { operator, left, right, .. } => {
				self.node(depth, "BinaryOp", Some(operator.symbol()));
				self.expression(depth + 1, left);
				self.expression(depth + 1, right);
			}
			Expression::Prefix { operator, operand, .. } => {
				self.node(depth, "PrefixOp", Some(operator.symbol()));
				self.expression(depth + 1, operand);
			}
			Expression::Cast { ty, operand, .. } => {
				self.node(depth, "Cast", Some(ty));
				self.expression(depth + 1, operand);
			}
			Expression::Postfix { operator, operand, .. } => {
				self.node(depth, "PostfixOp", Some(operator.symbol()));
				self.expression(depth + 1, operand);
			}
			Expression::Ternary { condition, then_branch, else_branch, .. } => {
				self.node(depth, "Ternary", None);
				self.expression(depth + 1, condition);
				self.expression(depth + 1, then_branch);
				self.expression(depth + 1, else_branch);
			}
			Expression::Unknown { text, .. } => self.node(depth, "Unknown", Some(text)),
		}
	}

	fn expressions(&mut self, depth: usize, expressions: &[Expression]) {
		for expression in expressions {
			self.expression(depth, expression);
		}
	}
}

fn modifiers(modifiers: &[Modifier]) -> String {
	modifiers.iter().map(Modifier::as_str).collect::<Vec<_>>().join(" ")
}

impl CompilationUnit {
	/// Render the tree for debugging.
	pub fn dump(&self) -> String {
		let mut dumper = Dumper { out: String::new() };
		dumper.node(0, "CompilationUnit", None);
		for class in &self.classes {
			dumper.class(1, class);
		}
		dumper.out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dump_indents_children() {
		let position = Position::new(1, 1);
		let unit = CompilationUnit {
			classes: vec![ClassDecl {
				name:      "A".into(),
				modifiers: vec![Modifier::Public],
				base:      None,
				members:   vec![Member::Field(VarDecl {
					ty: "int".into(),
					name: "x".into(),
					modifiers: vec![],
					init: Some(Expression::binary(
						BinaryOperator::Add,
						Expression::literal("1", position),
						Expression::identifier("y", position),
					)),
					position,
				})],
				position,
			}],
		};
		let expected = "\
CompilationUnit
  ClassDecl: A
    Modifiers: public
    FieldDecl: int x
      BinaryOp: +
        Literal: 1
        Identifier: y
";
		assert_eq!(unit.dump(), expected);
	}
}
