use std::collections::HashMap;

use super::symbols::VarInfo;

/// Index of a frame in [`Scopes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug, Default)]
struct Frame {
	parent: Option<ScopeId>,
	vars:   HashMap<String, VarInfo>,
}

/// Every scope of one analysis run. Frames point at their enclosing frame by
/// index, so resolution walks outward without any shared ownership.
#[derive(Debug, Default)]
pub struct Scopes {
	frames: Vec<Frame>,
}

impl Scopes {
	pub fn new() -> Self { Self { frames: Vec::new() } }

	/// Open a new frame nested in `parent`.
	pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
		self.frames.push(Frame { parent, vars: HashMap::new() });
		ScopeId(self.frames.len() - 1)
	}

	/// Declare `var` in `scope`. Returns `false`, leaving the first
	/// declaration in place, when the name already exists in that same frame.
	pub fn declare(&mut self, scope: ScopeId, var: VarInfo) -> bool {
		let vars = &mut self.frames[scope.0].vars;
		if vars.contains_key(&var.name) {
			return false;
		}
		vars.insert(var.name.clone(), var);
		true
	}

	pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<&VarInfo> {
		let mut current = Some(scope);
		while let Some(id) = current {
			let frame = &self.frames[id.0];
			if let Some(var) = frame.vars.get(name) {
				return Some(var);
			}
			current = frame.parent;
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analyzer::TypeInfo;

	#[test]
	fn resolve_walks_outward() {
		let mut scopes = Scopes::new();
		let class = scopes.push(None);
		let method = scopes.push(Some(class));
		assert!(scopes.declare(class, VarInfo::field("count", TypeInfo::int(), false)));
		assert!(scopes.declare(method, VarInfo::local("count", TypeInfo::new("String"))));
		assert_eq!(scopes.resolve(method, "count").map(|v| v.ty.name.as_str()), Some("String"));
		assert_eq!(scopes.resolve(class, "count").map(|v| v.ty.name.as_str()), Some("int"));
		assert!(scopes.resolve(class, "missing").is_none());
	}

	#[test]
	fn duplicate_in_same_frame() {
		let mut scopes = Scopes::new();
		let scope = scopes.push(None);
		assert!(scopes.declare(scope, VarInfo::local("x", TypeInfo::int())));
		assert!(!scopes.declare(scope, VarInfo::local("x", TypeInfo::boolean())));
		assert_eq!(scopes.resolve(scope, "x").map(|v| v.ty.clone()), Some(TypeInfo::int()));
	}
}
