//! Name tables for the builtin scope.

use adder_core::hash::{FastHashMap, fast_map_with_capacity};

use crate::builtins::{self, BuiltinFn, BuiltinFunction};
use crate::core::exceptions::EXCEPTION_TYPES;
use crate::core::object::Value;
use crate::core::types::{OBJECT_TYPE, TYPE_TYPE, TypeInfo};
use crate::iter::{ENUMERATE_TYPE, REVERSED_TYPE, ZIP_TYPE};
use crate::objects::{
    BOOL_TYPE, BYTEARRAY_TYPE, BYTES_TYPE, DICT_TYPE, INT_TYPE, LIST_TYPE, RANGE_TYPE, SET_TYPE, SLICE_TYPE,
    STR_TYPE, TUPLE_TYPE,
};

/// Every type descriptor that scripts can name directly.
pub struct TypeRegistry {
    types: Vec<&'static TypeInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// The constructor types plus every exception kind.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for ty in [
            &BOOL_TYPE,
            &BYTEARRAY_TYPE,
            &BYTES_TYPE,
            &DICT_TYPE,
            &ENUMERATE_TYPE,
            &INT_TYPE,
            &LIST_TYPE,
            &OBJECT_TYPE,
            &RANGE_TYPE,
            &REVERSED_TYPE,
            &SET_TYPE,
            &SLICE_TYPE,
            &STR_TYPE,
            &TUPLE_TYPE,
            &TYPE_TYPE,
            &ZIP_TYPE,
        ] {
            registry.register(ty);
        }
        for ty in EXCEPTION_TYPES {
            registry.register(*ty);
        }
        registry
    }

    pub fn register(&mut self, ty: &'static TypeInfo) {
        if !self.types.iter().any(|t| t.is(ty)) {
            self.types.push(ty);
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static TypeInfo> {
        self.types.iter().copied().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.types.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BuiltinRegistry {
    functions: Vec<(&'static str, BuiltinFn)>,
    types: TypeRegistry,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self { functions: Vec::new(), types: TypeRegistry::new() }
    }

    pub fn register(&mut self, name: &'static str, fun: BuiltinFn) {
        self.functions.push((name, fun));
    }

    pub fn register_type(&mut self, ty: &'static TypeInfo) {
        self.types.register(ty);
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.iter().map(|(n, _)| n.to_string()).collect();
        names.extend(self.types.iter().map(|t| t.name.to_string()));
        names
    }

    /// Materializes every entry as a value, keyed by name.
    pub fn install_into(self, scope: &mut FastHashMap<String, Value>) {
        for (name, fun) in self.functions {
            scope.insert(name.to_string(), BuiltinFunction::value(name, fun));
        }
        for ty in self.types.iter() {
            scope.insert(ty.name.to_string(), ty.value());
        }
    }

    pub fn into_scope(self) -> FastHashMap<String, Value> {
        let mut scope = fast_map_with_capacity(self.functions.len() + self.types.len());
        self.install_into(&mut scope);
        scope
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        registry.register("abs", builtins::builtin_abs);
        registry.register("all", builtins::builtin_all);
        registry.register("any", builtins::builtin_any);
        registry.register("chr", builtins::builtin_chr);
        registry.register("getattr", builtins::builtin_getattr);
        registry.register("hash", builtins::builtin_hash);
        registry.register("hex", builtins::builtin_hex);
        registry.register("isinstance", builtins::builtin_isinstance);
        registry.register("issubclass", builtins::builtin_issubclass);
        registry.register("iter", builtins::builtin_iter);
        registry.register("len", builtins::builtin_len);
        registry.register("max", builtins::builtin_max);
        registry.register("min", builtins::builtin_min);
        registry.register("next", builtins::builtin_next);
        registry.register("open", builtins::builtin_open);
        registry.register("ord", builtins::builtin_ord);
        registry.register("print", builtins::builtin_print);
        registry.register("repr", builtins::builtin_repr);
        registry.register("sorted", builtins::builtin_sorted);
        registry.register("sum", builtins::builtin_sum);
        // constructors and exception kinds
        for ty in TypeRegistry::standard().iter() {
            registry.register_type(ty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::KEY_ERROR_TYPE;

    #[test]
    fn standard_types_are_unique_and_named() {
        let types = TypeRegistry::standard();
        assert!(types.get("int").is_some_and(|t| t.is(&INT_TYPE)));
        assert!(types.get("KeyError").is_some_and(|t| t.is(&KEY_ERROR_TYPE)));
        assert!(types.get("NoneType").is_none());
        let mut names: Vec<&str> = types.iter().map(|t| t.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn provider_fills_the_scope() {
        let mut registry = BuiltinRegistry::new();
        StdBuiltinProvider.install(&mut registry);
        let names = registry.names();
        assert!(names.iter().any(|n| n == "sorted"));
        assert!(names.iter().any(|n| n == "zip"));
        let scope = registry.into_scope();
        assert_eq!(scope["len"].repr().unwrap(), "<built-in function len>");
        assert_eq!(scope["list"].repr().unwrap(), "<class 'list'>");
        assert!(scope["ValueError"].is(&crate::core::exceptions::VALUE_ERROR_TYPE.value()));
    }
}
