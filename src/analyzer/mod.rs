//! Static checks over the syntax tree.
//!
//! The analyzer never changes the tree and never stops early: every problem
//! becomes a [`SemanticError`] and analysis goes on with the `Unknown` type
//! standing in for whatever could not be worked out. `Unknown` silences every
//! check it reaches, so one mistake does not cascade into unrelated reports.
//!
//! Two passes over the unit:
//!
//! 1. register every class with its fields and method/constructor signatures,
//!    so a class may use classes declared after it;
//! 2. walk every body with a scope chain
//!    `class fields → this/super → parameters → blocks`.

mod expression;
mod scope;
mod symbols;
mod types;

use scope::{ScopeId, Scopes};
use symbols::{ClassInfo, MethodInfo, Registry, VarInfo};
use tracing::debug;
pub use types::{TypeInfo, assignable};

use crate::{
	ast::{ClassDecl, CompilationUnit, Expression, Member, Param, Position, Statement, VarDecl},
	error::semantic::SemanticError,
};

/// Limits checked while analysing. `None` switches a check off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
	/// How many fields the whole unit may declare.
	pub global_var_limit:  Option<usize>,
	/// How deeply blocks may nest, a method body is depth 1.
	pub block_depth_limit: Option<usize>,
}

impl Default for AnalyzerOptions {
	fn default() -> Self { Self { global_var_limit: Some(128), block_depth_limit: None } }
}

/// Check `unit` with the default limits.
pub fn analyze(unit: &CompilationUnit) -> Vec<SemanticError> { Analyzer::new(AnalyzerOptions::default()).analyze(unit) }

pub struct Analyzer {
	options:   AnalyzerOptions,
	registry:  Registry,
	scopes:    Scopes,
	errors:    Vec<SemanticError>,
	/// The class whose members are being checked.
	class:     Option<String>,
	/// The method or constructor whose body is being checked.
	method:    Option<MethodInfo>,
	in_static: bool,
	depth:     usize,
	globals:   usize,
}

impl Analyzer {
	pub fn new(options: AnalyzerOptions) -> Self {
		Self {
			options,
			registry: Registry::default(),
			scopes: Scopes::new(),
			errors: Vec::new(),
			class: None,
			method: None,
			in_static: false,
			depth: 0,
			globals: 0,
		}
	}

	pub fn analyze(mut self, unit: &CompilationUnit) -> Vec<SemanticError> {
		let registered: Vec<bool> = unit.classes.iter().map(|class| self.register(class)).collect();
		for (class, registered) in unit.classes.iter().zip(registered) {
			if registered {
				self.class_body(class);
			}
		}
		debug!(classes = unit.classes.len(), diagnostics = self.errors.len(), "semantic analysis finished");
		self.errors
	}

	fn error(&mut self, message: impl Into<String>, position: Position) {
		self.errors.push(SemanticError::new(message, Some(position)));
	}

	/// First pass. Returns `false` for a duplicate class, which is reported and
	/// then left out of the second pass.
	fn register(&mut self, class: &ClassDecl) -> bool {
		if self.registry.contains(&class.name) {
			self.error(format!("class '{}' is already declared", class.name), class.position);
			return false;
		}
		let mut info = ClassInfo::new(class);
		for member in &class.members {
			match member {
				Member::Field(field) => {
					if info.fields.contains_key(&field.name) {
						self.error(
							format!("field '{}' is already declared in class '{}'", field.name, class.name),
							field.position,
						);
						continue;
					}
					let var = VarInfo::field(&field.name, TypeInfo::new(&field.ty), field.is_static());
					info.fields.insert(field.name.clone(), var);
					self.globals += 1;
					if let Some(limit) = self.options.global_var_limit.filter(|limit| self.globals > *limit) {
						self.error(format!("too many global identifiers (limit {limit})"), field.position);
					}
				}
				Member::Method(method) => info.add_method(MethodInfo::from(method)),
				Member::Constructor(constructor) => info.add_method(MethodInfo::from(constructor)),
				Member::Initializer(_) => {}
			}
		}
		self.registry.insert(info);
		true
	}

	/// Second pass over one class.
	fn class_body(&mut self, class: &ClassDecl) {
		let Some(info) = self.registry.get(&class.name) else { return };
		let fields: Vec<VarInfo> = info.fields.values().cloned().collect();
		let class_scope = self.scopes.push(None);
		for field in fields {
			self.scopes.declare(class_scope, field);
		}
		self.class = Some(class.name.clone());

		for member in &class.members {
			match member {
				Member::Field(field) => {
					if let Some(init) = &field.init {
						self.in_static = field.is_static();
						let scope = self.receiver_scope(class_scope, field.is_static());
						self.initializer(&TypeInfo::new(&field.ty), init, scope);
					}
				}
				Member::Method(method) => {
					if let Some(body) = &method.body {
						self.callable(MethodInfo::from(method), &method.params, body, class_scope);
					}
				}
				Member::Constructor(constructor) => {
					self.callable(MethodInfo::from(constructor), &constructor.params, &constructor.body, class_scope);
				}
				Member::Initializer(body) => {
					self.in_static = false;
					let scope = self.receiver_scope(class_scope, false);
					self.block(body, scope);
				}
			}
		}
		self.class = None;
		self.in_static = false;
	}

	/// A frame holding `this` and, when there is a superclass, `super`. Static
	/// code gets an empty frame.
	fn receiver_scope(&mut self, parent: ScopeId, is_static: bool) -> ScopeId {
		let scope = self.scopes.push(Some(parent));
		if is_static {
			return scope;
		}
		if let Some(class) = self.class.as_deref().and_then(|name| self.registry.get(name)) {
			let this = VarInfo::param("this", TypeInfo::new(&class.name));
			let base = class.super_name.as_ref().map(|base| VarInfo::param("super", TypeInfo::new(base)));
			self.scopes.declare(scope, this);
			if let Some(base) = base {
				self.scopes.declare(scope, base);
			}
		}
		scope
	}

	fn callable(&mut self, method: MethodInfo, params: &[Param], body: &[Statement], class_scope: ScopeId) {
		let scope = self.receiver_scope(class_scope, method.is_static);
		for param in params {
			if !self.scopes.declare(scope, VarInfo::param(&param.name, TypeInfo::new(&param.ty))) {
				self.error(format!("duplicate parameter '{}'", param.name), param.position);
			}
		}
		self.in_static = method.is_static;
		self.method = Some(method);
		self.block(body, scope);
		self.method = None;
	}

	fn block(&mut self, statements: &[Statement], parent: ScopeId) {
		self.depth += 1;
		if let Some(limit) = self.options.block_depth_limit.filter(|limit| self.depth > *limit) {
			if let Some(first) = statements.first() {
				self.error(format!("blocks nested too deeply: {} (limit {limit})", self.depth), first.position());
			}
		}
		let scope = self.scopes.push(Some(parent));
		for statement in statements {
			self.statement(statement, scope);
		}
		self.depth -= 1;
	}

	fn statement(&mut self, statement: &Statement, scope: ScopeId) {
		match statement {
			Statement::Declaration(vars) => {
				for var in vars {
					self.local(var, scope);
				}
			}
			Statement::Expression(expression) => {
				self.expression(expression, scope);
			}
			Statement::Assign { target, value, position } => {
				let target = self.expression(target, scope);
				let value = self.expression(value, scope);
				self.check_assignment(&target, &value, *position);
			}
			Statement::Block(statements) => self.block(statements, scope),
			Statement::If { condition, then_branch, else_branch, .. } => {
				self.condition(condition, scope, "if");
				self.block(then_branch, scope);
				if let Some(else_branch) = else_branch {
					self.statement(else_branch, scope);
				}
			}
			Statement::While { condition, body, .. } => {
				self.condition(condition, scope, "loop");
				self.block(body, scope);
			}
			Statement::DoWhile { body, condition, .. } => {
				self.block(body, scope);
				self.condition(condition, scope, "loop");
			}
			Statement::For { init, condition, update, body, .. } => {
				let header = self.scopes.push(Some(scope));
				for statement in init {
					self.statement(statement, header);
				}
				if let Some(condition) = condition {
					self.condition(condition, header, "loop");
				}
				for statement in update {
					self.statement(statement, header);
				}
				self.block(body, header);
			}
			Statement::ForEach { variable, iterable, body, .. } => {
				let header = self.scopes.push(Some(scope));
				let declared = TypeInfo::new(&variable.ty);
				self.scopes.declare(header, VarInfo::local(&variable.name, declared.clone()));
				let collection = self.expression(iterable, scope);
				if collection.is_array() || collection.is_list() {
					let element = collection.element_type();
					self.check_assignment(&declared, &element, iterable.position());
				}
				self.block(body, header);
			}
			Statement::Switch { scrutinee, cases, .. } => {
				let switched = self.expression(scrutinee, scope);
				if switched.is_boolean() {
					self.error("switch on boolean is not supported", scrutinee.position());
				}
				let body = self.scopes.push(Some(scope));
				for case in cases {
					if let Some(label) = &case.label {
						let labelled = self.expression(label, body);
						let compatible = switched.is_unknown()
							|| labelled.is_unknown()
							|| switched == labelled
							|| switched.is_numeric() && labelled.is_numeric();
						if !compatible {
							self.error(
								format!("case label type does not match switch: {switched} and {labelled}"),
								case.position,
							);
						}
					}
					for statement in &case.body {
						self.statement(statement, body);
					}
				}
			}
			Statement::Try { body, catches, finally, .. } => {
				self.block(body, scope);
				for catch in catches {
					let handler = self.scopes.push(Some(scope));
					if let Some(parameter) = &catch.parameter {
						self.scopes.declare(handler, VarInfo::local(&parameter.name, TypeInfo::new(&parameter.ty)));
					}
					self.block(&catch.body, handler);
				}
				if let Some(finally) = finally {
					self.block(finally, scope);
				}
			}
			Statement::Return { value, position } => self.return_statement(value.as_ref(), *position, scope),
			Statement::Throw { value, .. } => {
				self.expression(value, scope);
			}
			Statement::Break(_) | Statement::Continue(_) | Statement::Unknown { .. } => {}
		}
	}

	fn local(&mut self, var: &VarDecl, scope: ScopeId) {
		let ty = TypeInfo::new(&var.ty);
		if !self.scopes.declare(scope, VarInfo::local(&var.name, ty.clone())) {
			self.error(format!("variable '{}' is already declared", var.name), var.position);
		}
		if let Some(init) = &var.init {
			self.initializer(&ty, init, scope);
		}
	}

	/// An initializer for a variable of type `expected`. Brace initializers
	/// are checked element by element against the element type.
	fn initializer(&mut self, expected: &TypeInfo, init: &Expression, scope: ScopeId) {
		match init {
			Expression::ArrayInit { elements, .. } if expected.is_array() => {
				let element = expected.element_type();
				for item in elements {
					self.initializer(&element, item, scope);
				}
			}
			_ => {
				let actual = self.expression(init, scope);
				self.check_assignment(expected, &actual, init.position());
			}
		}
	}

	fn check_assignment(&mut self, target: &TypeInfo, value: &TypeInfo, position: Position) {
		if !assignable(target, value) {
			self.error(format!("type mismatch in assignment: left {target}, right {value}"), position);
		}
	}

	fn condition(&mut self, condition: &Expression, scope: ScopeId, kind: &str) {
		let ty = self.expression(condition, scope);
		if !ty.is_unknown() && !ty.is_boolean() {
			self.error(format!("{kind} condition must be boolean, got {ty}"), condition.position());
		}
	}

	fn return_statement(&mut self, value: Option<&Expression>, position: Position, scope: ScopeId) {
		let actual = value.map(|value| self.expression(value, scope));
		let Some((is_constructor, expected)) = self.method.as_ref().map(|m| (m.is_constructor, m.return_type.clone()))
		else {
			return;
		};
		if is_constructor {
			if value.is_some() {
				self.error("a constructor cannot return a value", position);
			}
			return;
		}
		match (value, actual) {
			(Some(_), _) if expected.name == "void" => self.error("a void method cannot return a value", position),
			(None, _) if expected.name != "void" => {
				self.error(format!("a method returning {expected} must return a value"), position)
			}
			(Some(value), Some(actual)) => self.check_assignment(&expected, &actual, value.position()),
			_ => {}
		}
	}
}
