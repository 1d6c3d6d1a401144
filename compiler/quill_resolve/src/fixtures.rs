//! Symbol worlds shared by the unit tests.

use quill_ir::{AssemblyIdentity, SharedInterner, Version};
use quill_symbols::{
    Accessibility, MethodDef, MethodKind, MethodSignature, ParameterDecl, SpecialType,
    SymbolDecl, SymbolFlags, SymbolId, SymbolTable, TypeDef, TypeKind,
};
use rustc_hash::FxHashMap;

/// A cor library with `Object`, `ValueType`, `Void`, `Int32` and `String`,
/// plus a source assembly `App`.
pub(crate) struct World {
    pub table: SymbolTable,
    pub app: SymbolId,
    pub app_global: SymbolId,
    pub object: SymbolId,
    pub void: SymbolId,
    pub int32: SymbolId,
    pub string: SymbolId,
}

impl World {
    pub fn new() -> Self {
        let table = SymbolTable::new(SharedInterner::new());
        let library =
            table.define_assembly(AssemblyIdentity::new("Lib", Version::new(1, 0, 0, 0)), true);
        let module = table.define_module(library, table.intern("Lib.dll"), FxHashMap::default());
        let global = table.global_namespace(module).unwrap_or(module);
        let system = table.get_or_define_namespace(global, table.intern("System"));

        let special = |name: &str, kind: TypeKind, special: SpecialType, base: Option<SymbolId>| {
            let ty = table.define_type(
                system,
                TypeDef::new(SymbolDecl::new(table.intern(name)), kind).with_special(special),
            );
            table.set_base_type(ty, base);
            table.set_interfaces(ty, Vec::new());
            ty
        };
        let object = special("Object", TypeKind::Class, SpecialType::Object, None);
        let value_type = special("ValueType", TypeKind::Class, SpecialType::ValueType, Some(object));
        let void = special("Void", TypeKind::Struct, SpecialType::Void, Some(value_type));
        let int32 = special("Int32", TypeKind::Struct, SpecialType::Int32, Some(value_type));
        let string = special("String", TypeKind::Class, SpecialType::String, Some(object));

        let app = table.define_source_assembly(AssemblyIdentity::new("App", Version::new(1, 0, 0, 0)));
        let app_module = table.define_module(app, table.intern("App.dll"), FxHashMap::default());
        let app_global = table.global_namespace(app_module).unwrap_or(app_module);

        World {
            table,
            app,
            app_global,
            object,
            void,
            int32,
            string,
        }
    }

    /// A public class of `App` deriving from `base` (or `Object`).
    pub fn class(&self, name: &str, base: Option<SymbolId>) -> SymbolId {
        self.type_of(name, TypeKind::Class, base.or(Some(self.object)), Vec::new())
    }

    /// A public class of `App` deriving from `Object` and implementing
    /// `interfaces`.
    pub fn class_implementing(&self, name: &str, interfaces: Vec<SymbolId>) -> SymbolId {
        self.type_of(name, TypeKind::Class, Some(self.object), interfaces)
    }

    /// A public interface of `App`.
    pub fn interface(&self, name: &str, bases: Vec<SymbolId>) -> SymbolId {
        self.type_of(name, TypeKind::Interface, None, bases)
    }

    fn type_of(
        &self,
        name: &str,
        kind: TypeKind,
        base: Option<SymbolId>,
        interfaces: Vec<SymbolId>,
    ) -> SymbolId {
        let table = &self.table;
        let ty = table.define_type(
            self.app_global,
            TypeDef::new(SymbolDecl::new(table.intern(name)), kind),
        );
        table.set_base_type(ty, base);
        table.set_interfaces(ty, interfaces);
        ty
    }

    pub fn decl(&self, name: &str) -> SymbolDecl {
        SymbolDecl::new(self.table.intern(name))
    }

    /// A positional parameter `p{index}`.
    pub fn param(&self, index: usize, ty: SymbolId) -> ParameterDecl {
        ParameterDecl::new(self.table.intern(&format!("p{index}")), ty)
    }

    pub fn method(
        &self,
        ty: SymbolId,
        decl: SymbolDecl,
        parameters: Vec<ParameterDecl>,
        ret: SymbolId,
    ) -> SymbolId {
        self.method_of_kind(ty, decl, MethodKind::Ordinary, parameters, ret)
    }

    pub fn method_of_kind(
        &self,
        ty: SymbolId,
        decl: SymbolDecl,
        kind: MethodKind,
        parameters: Vec<ParameterDecl>,
        ret: SymbolId,
    ) -> SymbolId {
        self.table
            .define_method(ty, MethodDef::new(decl, kind), |_| {
                MethodSignature::new(parameters, ret)
            })
    }

    /// A public method with plain positional parameters.
    pub fn simple(&self, ty: SymbolId, name: &str, parameters: &[SymbolId]) -> SymbolId {
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(i, &parameter)| self.param(i, parameter))
            .collect();
        self.method(ty, self.decl(name), parameters, self.void)
    }

    /// A public virtual method with plain positional parameters.
    pub fn virtual_method(&self, ty: SymbolId, name: &str, parameters: &[SymbolId]) -> SymbolId {
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(i, &parameter)| self.param(i, parameter))
            .collect();
        self.method(
            ty,
            self.decl(name).with_flags(SymbolFlags::VIRTUAL),
            parameters,
            self.void,
        )
    }

    /// A method with the given accessibility and plain parameters.
    pub fn with_access(
        &self,
        ty: SymbolId,
        name: &str,
        accessibility: Accessibility,
        parameters: &[SymbolId],
    ) -> SymbolId {
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(i, &parameter)| self.param(i, parameter))
            .collect();
        self.method(
            ty,
            self.decl(name).with_accessibility(accessibility),
            parameters,
            self.void,
        )
    }
}
