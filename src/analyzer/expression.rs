use super::{Analyzer, MethodInfo, ScopeId, TypeInfo, assignable};
use crate::ast::{BinaryOperator, Expression, PrefixOperator, Position};

/// The type of a literal from its spelling.
pub(super) fn literal_type(text: &str) -> TypeInfo {
	match text {
		"true" | "false" => return TypeInfo::boolean(),
		"null" => return TypeInfo::new("null"),
		_ => {}
	}
	if text.starts_with('"') {
		return TypeInfo::new("String");
	}
	if text.starts_with('\'') {
		return TypeInfo::new("char");
	}
	let lower = text.strip_prefix('-').unwrap_or(text).to_ascii_lowercase();
	if lower.starts_with("0x") || lower.starts_with("0b") {
		return TypeInfo::new(if lower.ends_with('l') { "long" } else { "int" });
	}
	if !lower.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
		return TypeInfo::unknown();
	}
	let name = match lower.chars().last() {
		Some('l') => "long",
		Some('f') => "float",
		Some('d') => "double",
		_ if lower.contains(['.', 'e']) => "double",
		_ => "int",
	};
	TypeInfo::new(name)
}

impl Analyzer {
	pub(super) fn expression(&mut self, expression: &Expression, scope: ScopeId) -> TypeInfo {
		match expression {
			Expression::Literal { value, .. } => literal_type(value),
			Expression::Identifier { name, position } => self.identifier(name, *position, scope),
			Expression::Member { object, name, .. } => {
				let object = self.expression(object, scope);
				self.field_type(&object, name)
			}
			Expression::Call { callee, arguments, position } => self.call(callee, arguments, *position, scope),
			Expression::Index { target, index, .. } => {
				let target = self.expression(target, scope);
				self.expression(index, scope);
				target.element_type()
			}
			Expression::New { class, arguments, position } => {
				let arguments = self.arguments(arguments, scope);
				let constructors = self.overloads(class, class);
				if !constructors.is_empty() {
					self.resolve_overload(class, &constructors, &arguments, *position);
				}
				TypeInfo::new(class)
			}
			Expression::NewArray { element, dimensions, extra, .. } => {
				for dimension in dimensions {
					self.expression(dimension, scope);
				}
				TypeInfo::new(element).array_of(dimensions.len() + extra)
			}
			Expression::ArrayInit { elements, .. } => {
				for element in elements {
					self.expression(element, scope);
				}
				TypeInfo::unknown()
			}
			Expression::Binary { operator, left, right, position } => {
				let left = self.expression(left, scope);
				let right = self.expression(right, scope);
				self.binary(*operator, left, right, *position)
			}
			Expression::Prefix { operator, operand, position } => {
				let operand = self.expression(operand, scope);
				self.prefix(*operator, operand, *position)
			}
			Expression::Cast { ty, operand, .. } => {
				self.expression(operand, scope);
				TypeInfo::new(ty)
			}
			Expression::Postfix { operator, operand, position } => {
				let operand = self.expression(operand, scope);
				self.step(operator.symbol(), operand, *position)
			}
			Expression::Ternary { condition, then_branch, else_branch, position } => {
				let condition = self.expression(condition, scope);
				if !condition.is_unknown() && !condition.is_boolean() {
					self.error(format!("ternary condition must be boolean, got {condition}"), *position);
				}
				let then_type = self.expression(then_branch, scope);
				let else_type = self.expression(else_branch, scope);
				self.ternary(then_type, else_type, *position)
			}
			Expression::Unknown { .. } => TypeInfo::unknown(),
		}
	}

	fn identifier(&mut self, name: &str, position: Position, scope: ScopeId) -> TypeInfo {
		if name == "this" || name == "super" {
			if self.in_static {
				self.error(format!("'{name}' cannot be used in a static method"), position);
			}
			// Absent in static code, and `super` without a superclass.
			return self.scopes.resolve(scope, name).map(|var| var.ty.clone()).unwrap_or_else(TypeInfo::unknown);
		}
		if let Some(var) = self.scopes.resolve(scope, name) {
			return var.ty.clone();
		}
		if self.registry.contains(name) {
			return TypeInfo::new(name);
		}
		// Library classes such as `System` or `Math` are opaque.
		if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
			self.error(format!("identifier '{name}' is not declared"), position);
		}
		TypeInfo::unknown()
	}

	/// `object.name`. Unresolvable fields are `Unknown`, not errors.
	fn field_type(&self, object: &TypeInfo, name: &str) -> TypeInfo {
		if object.is_array() && name == "length" {
			return TypeInfo::int();
		}
		self.registry
			.get(&object.name)
			.and_then(|class| self.registry.field(class, name))
			.map(|var| var.ty.clone())
			.unwrap_or_else(TypeInfo::unknown)
	}

	fn arguments(&mut self, arguments: &[Expression], scope: ScopeId) -> Vec<TypeInfo> {
		arguments.iter().map(|argument| self.expression(argument, scope)).collect()
	}

	fn call(&mut self, callee: &Expression, arguments: &[Expression], position: Position, scope: ScopeId) -> TypeInfo {
		let arguments = self.arguments(arguments, scope);
		let (class, method) = match callee {
			// `this(...)` and `super(...)` delegate to another constructor.
			Expression::Identifier { name, .. } if name == "this" || name == "super" => return TypeInfo::unknown(),
			Expression::Identifier { name, .. } => match self.class.clone() {
				Some(class) => (class, name),
				None => return TypeInfo::unknown(),
			},
			Expression::Member { object, name, position } => {
				if object.as_identifier() == Some("super") && !self.in_static {
					let base = self.class.as_deref().and_then(|c| self.registry.get(c)).map(|c| c.super_name.clone());
					if let Some(None) = base {
						self.error("'super' used in a class without a superclass", *position);
						return TypeInfo::unknown();
					}
				}
				let receiver = self.expression(object, scope);
				if receiver.is_unknown() {
					return TypeInfo::unknown();
				}
				(receiver.name, name)
			}
			_ => {
				self.expression(callee, scope);
				return TypeInfo::unknown();
			}
		};

		let Some(info) = self.registry.get(&class) else { return TypeInfo::unknown() };
		let candidates = self.overloads(&class, method);
		if candidates.is_empty() {
			// A superclass outside this unit may declare it.
			let opaque = self.registry.lineage(info).any(|c| c.super_name.as_ref().is_some_and(|s| !self.registry.contains(s)));
			if !opaque {
				self.error(format!("method '{method}' not found in class '{class}'"), position);
			}
			return TypeInfo::unknown();
		}
		self.resolve_overload(method, &candidates, &arguments, position)
	}

	/// Overloads of `method` visible from `class`, nearest class first.
	fn overloads(&self, class: &str, method: &str) -> Vec<MethodInfo> {
		match self.registry.get(class) {
			Some(info) => self.registry.methods(info, method).into_iter().cloned().collect(),
			None => Vec::new(),
		}
	}

	/// The first candidate of the right arity whose parameters all accept the
	/// arguments wins.
	fn resolve_overload(
		&mut self,
		method: &str,
		candidates: &[MethodInfo],
		arguments: &[TypeInfo],
		position: Position,
	) -> TypeInfo {
		let same_arity: Vec<&MethodInfo> =
			candidates.iter().filter(|candidate| candidate.param_types.len() == arguments.len()).collect();
		let Some(first) = same_arity.first() else {
			let expected = candidates.first().map_or(0, |c| c.param_types.len());
			self.error(
				format!("wrong number of arguments calling '{method}': expected {expected}, got {}", arguments.len()),
				position,
			);
			return TypeInfo::unknown();
		};
		let accepted = same_arity.iter().find(|candidate| {
			candidate.param_types.iter().zip(arguments).all(|(expected, actual)| assignable(expected, actual))
		});
		match accepted {
			Some(candidate) => candidate.return_type.clone(),
			None => {
				let expected = join(&first.param_types);
				self.error(
					format!("argument types do not match calling '{method}': expected ({expected}), got ({})", join(arguments)),
					position,
				);
				TypeInfo::unknown()
			}
		}
	}

	fn binary(&mut self, operator: BinaryOperator, left: TypeInfo, right: TypeInfo, position: Position) -> TypeInfo {
		if left.is_unknown() || right.is_unknown() {
			return TypeInfo::unknown();
		}
		let symbol = operator.symbol();
		if operator.is_arithmetic() {
			if left.is_numeric() && right.is_numeric() {
				return left;
			}
			if operator == BinaryOperator::Add && left.is_string() && right.is_string() {
				return left;
			}
			self.error(format!("operand types of binary operator '{symbol}' do not match: {left} and {right}"), position);
			return TypeInfo::unknown();
		}
		if operator.is_relational() || operator.is_equality() {
			if left != right && !(left.is_numeric() && right.is_numeric()) {
				self.error(format!("operand types of binary operator '{symbol}' do not match: {left} and {right}"), position);
			}
			return TypeInfo::boolean();
		}
		if operator.is_logical() {
			if !(left.is_boolean() && right.is_boolean()) {
				self.error(
					format!("logical operator '{symbol}' requires boolean operands, got {left} and {right}"),
					position,
				);
			}
			return TypeInfo::boolean();
		}
		if left.is_numeric() && right.is_numeric() {
			return left;
		}
		self.error(format!("bitwise operator '{symbol}' requires numeric operands, got {left} and {right}"), position);
		TypeInfo::unknown()
	}

	fn prefix(&mut self, operator: PrefixOperator, operand: TypeInfo, position: Position) -> TypeInfo {
		if operand.is_unknown() {
			return if operator == PrefixOperator::Not { TypeInfo::boolean() } else { operand };
		}
		let symbol = operator.symbol();
		match operator {
			PrefixOperator::Increment | PrefixOperator::Decrement => self.step(symbol, operand, position),
			PrefixOperator::Plus | PrefixOperator::Minus => {
				if operand.is_numeric() {
					return operand;
				}
				self.error(format!("unary operator '{symbol}' requires a numeric operand, got {operand}"), position);
				TypeInfo::unknown()
			}
			PrefixOperator::Not => {
				if !operand.is_boolean() {
					self.error(format!("unary operator '!' requires a boolean operand, got {operand}"), position);
				}
				TypeInfo::boolean()
			}
			PrefixOperator::BitNot => {
				if operand.is_integral() {
					return operand;
				}
				self.error(format!("operator '~' requires an integral operand, got {operand}"), position);
				TypeInfo::unknown()
			}
		}
	}

	/// `++` and `--` in either position.
	fn step(&mut self, symbol: &str, operand: TypeInfo, position: Position) -> TypeInfo {
		if operand.is_unknown() || operand.is_numeric() {
			return operand;
		}
		self.error(format!("operator '{symbol}' requires a numeric operand, got {operand}"), position);
		TypeInfo::unknown()
	}

	fn ternary(&mut self, then_type: TypeInfo, else_type: TypeInfo, position: Position) -> TypeInfo {
		if then_type.is_unknown() || else_type.is_unknown() {
			return TypeInfo::unknown();
		}
		if then_type == else_type || then_type.is_numeric() && else_type.is_numeric() {
			return then_type;
		}
		self.error(format!("ternary branches have incompatible types: {then_type} and {else_type}"), position);
		TypeInfo::unknown()
	}
}

fn join(types: &[TypeInfo]) -> String { types.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ") }
