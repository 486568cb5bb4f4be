use std::fmt::Display;

const UNKNOWN: &str = "Unknown";

/// The analyzer's view of a type: just its source spelling. Reference types
/// other than arrays and `List<T>` are opaque and compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
	pub name: String,
}

impl TypeInfo {
	pub fn new(name: impl Into<String>) -> Self {
		let name: String = name.into();
		if name.trim().is_empty() { Self::unknown() } else { Self { name } }
	}

	/// The give-up sentinel. It silences every check it takes part in.
	pub fn unknown() -> Self { Self { name: UNKNOWN.to_string() } }

	pub fn boolean() -> Self { Self::new("boolean") }

	pub fn int() -> Self { Self::new("int") }

	pub fn is_unknown(&self) -> bool { self.name == UNKNOWN }

	pub fn is_primitive(&self) -> bool {
		matches!(self.name.as_str(), "byte" | "short" | "int" | "long" | "float" | "double" | "boolean" | "char")
	}

	pub fn is_boolean(&self) -> bool { self.name == "boolean" }

	/// `char` counts as numeric, as in arithmetic on characters.
	pub fn is_numeric(&self) -> bool {
		matches!(self.name.as_str(), "byte" | "short" | "int" | "long" | "float" | "double" | "char")
	}

	pub fn is_integral(&self) -> bool { matches!(self.name.as_str(), "byte" | "short" | "int" | "long" | "char") }

	pub fn is_string(&self) -> bool { self.name == "String" }

	pub fn is_array(&self) -> bool { self.name.ends_with("[]") }

	pub fn is_list(&self) -> bool { self.list_argument().is_some() }

	fn list_argument(&self) -> Option<&str> {
		["List<", "ArrayList<"]
			.iter()
			.find_map(|prefix| self.name.strip_prefix(prefix))
			.and_then(|rest| rest.strip_suffix('>'))
	}

	/// `T[]` gives `T`, `int[][]` gives `int[]`, `List<T>` gives `T`. Anything
	/// else has no element type.
	pub fn element_type(&self) -> Self {
		if let Some(element) = self.name.strip_suffix("[]") {
			return Self::new(element);
		}
		match self.list_argument() {
			Some(argument) => Self::new(argument),
			None => Self::unknown(),
		}
	}

	pub fn array_of(&self, dimensions: usize) -> Self { Self::new(format!("{}{}", self.name, "[]".repeat(dimensions))) }
}

impl Display for TypeInfo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.name) }
}

/// Assignment, initializer, return and argument compatibility.
///
/// Unknown on either side passes. When either side is primitive or `String`
/// the names must match, so `null` only goes into other reference types.
/// Two reference types are never compared.
pub fn assignable(target: &TypeInfo, value: &TypeInfo) -> bool {
	if target.is_unknown() || value.is_unknown() {
		return true;
	}
	if target.is_primitive() || target.is_string() || value.is_primitive() || value.is_string() {
		return target.name == value.name;
	}
	true
}
