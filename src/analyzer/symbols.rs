use std::collections::{HashMap, HashSet};

use super::TypeInfo;
use crate::ast::{ClassDecl, ConstructorDecl, MethodDecl, Param};

#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
	pub name:      String,
	pub ty:        TypeInfo,
	pub is_field:  bool,
	pub is_static: bool,
	pub is_param:  bool,
}

impl VarInfo {
	pub fn local(name: impl Into<String>, ty: TypeInfo) -> Self {
		Self { name: name.into(), ty, is_field: false, is_static: false, is_param: false }
	}

	pub fn field(name: impl Into<String>, ty: TypeInfo, is_static: bool) -> Self {
		Self { name: name.into(), ty, is_field: true, is_static, is_param: false }
	}

	pub fn param(name: impl Into<String>, ty: TypeInfo) -> Self {
		Self { name: name.into(), ty, is_field: false, is_static: false, is_param: true }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
	pub name:           String,
	pub return_type:    TypeInfo,
	pub param_types:    Vec<TypeInfo>,
	pub is_static:      bool,
	pub is_constructor: bool,
}

fn param_types(params: &[Param]) -> Vec<TypeInfo> { params.iter().map(|p| TypeInfo::new(&p.ty)).collect() }

impl From<&MethodDecl> for MethodInfo {
	fn from(method: &MethodDecl) -> Self {
		Self {
			name:           method.name.clone(),
			return_type:    TypeInfo::new(&method.return_type),
			param_types:    param_types(&method.params),
			is_static:      method.is_static(),
			is_constructor: false,
		}
	}
}

impl From<&ConstructorDecl> for MethodInfo {
	fn from(constructor: &ConstructorDecl) -> Self {
		Self {
			name:           constructor.name.clone(),
			return_type:    TypeInfo::new("void"),
			param_types:    param_types(&constructor.params),
			is_static:      false,
			is_constructor: true,
		}
	}
}

/// What the analyzer knows about a declared class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
	pub name:       String,
	pub fields:     HashMap<String, VarInfo>,
	/// Overloads in declaration order, constructors under the class name.
	pub methods:    HashMap<String, Vec<MethodInfo>>,
	pub super_name: Option<String>,
}

impl ClassInfo {
	pub fn new(class: &ClassDecl) -> Self {
		Self {
			name:       class.name.clone(),
			fields:     HashMap::new(),
			methods:    HashMap::new(),
			super_name: class.base.clone(),
		}
	}

	pub fn add_method(&mut self, method: MethodInfo) {
		self.methods.entry(method.name.clone()).or_default().push(method);
	}
}

/// Every class of the compilation unit by name.
#[derive(Debug, Default)]
pub struct Registry {
	classes: HashMap<String, ClassInfo>,
}

impl Registry {
	pub fn get(&self, name: &str) -> Option<&ClassInfo> { self.classes.get(name) }

	pub fn contains(&self, name: &str) -> bool { self.classes.contains_key(name) }

	pub fn insert(&mut self, class: ClassInfo) { self.classes.insert(class.name.clone(), class); }

	/// `start` and its superclasses, nearest first. A cyclic `extends` chain
	/// stops at the first repeated name.
	pub fn lineage<'a>(&'a self, start: &'a ClassInfo) -> impl Iterator<Item = &'a ClassInfo> + 'a {
		let mut visited = HashSet::new();
		let mut current = Some(start);
		std::iter::from_fn(move || {
			let class = current.take()?;
			if !visited.insert(class.name.as_str()) {
				return None;
			}
			current = class.super_name.as_deref().and_then(|name| self.classes.get(name));
			Some(class)
		})
	}

	/// Every overload named `name` visible from `class`, nearest class first.
	pub fn methods<'a>(&'a self, class: &'a ClassInfo, name: &str) -> Vec<&'a MethodInfo> {
		self.lineage(class).filter_map(|c| c.methods.get(name)).flatten().collect()
	}

	pub fn field<'a>(&'a self, class: &'a ClassInfo, name: &str) -> Option<&'a VarInfo> {
		self.lineage(class).find_map(|c| c.fields.get(name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ast::Position;

	fn class(name: &str, base: Option<&str>) -> ClassInfo {
		ClassInfo::new(&ClassDecl {
			name:      name.into(),
			modifiers: vec![],
			base:      base.map(Into::into),
			members:   vec![],
			position:  Position::new(1, 1),
		})
	}

	fn method(name: &str, params: &[&str]) -> MethodInfo {
		MethodInfo {
			name:           name.into(),
			return_type:    TypeInfo::int(),
			param_types:    params.iter().map(|p| TypeInfo::new(*p)).collect(),
			is_static:      false,
			is_constructor: false,
		}
	}

	#[test]
	fn lookup_walks_superclasses() {
		let mut registry = Registry::default();
		let mut base = class("Shape", None);
		base.add_method(method("area", &[]));
		base.fields.insert("name".into(), VarInfo::field("name", TypeInfo::new("String"), false));
		let mut derived = class("Circle", Some("Shape"));
		derived.add_method(method("area", &["int"]));
		registry.insert(base);
		registry.insert(derived);

		let circle = registry.get("Circle").unwrap();
		let overloads = registry.methods(circle, "area");
		assert_eq!(overloads.len(), 2);
		assert_eq!(overloads[0].param_types, vec![TypeInfo::int()]);
		assert!(registry.field(circle, "name").is_some());
		assert!(registry.field(circle, "radius").is_none());
	}

	#[test]
	fn cyclic_inheritance_terminates() {
		let mut registry = Registry::default();
		registry.insert(class("A", Some("B")));
		registry.insert(class("B", Some("A")));
		let a = registry.get("A").unwrap();
		assert_eq!(registry.lineage(a).count(), 2);
		assert!(registry.methods(a, "missing").is_empty());
	}
}
