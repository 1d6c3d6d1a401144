//! Small symbol worlds shared by the unit tests.

use quill_ir::{AssemblyIdentity, SharedInterner, Version};
use rustc_hash::FxHashMap;

use crate::{
    MethodDef, MethodKind, MethodSignature, ParameterDecl, SpecialType, SymbolDecl, SymbolId,
    SymbolTable, TypeDef, TypeKind, TypeParameterDecl,
};

/// A table with one library assembly defining `System.Object`,
/// `System.Int32` and `System.String`.
pub(crate) struct World {
    pub table: SymbolTable,
    pub assembly: SymbolId,
    pub module: SymbolId,
    pub global: SymbolId,
    pub system: SymbolId,
    pub object: SymbolId,
    pub int32: SymbolId,
    pub string: SymbolId,
}

impl World {
    pub fn new() -> Self {
        let table = SymbolTable::new(SharedInterner::new());
        let assembly =
            table.define_assembly(AssemblyIdentity::new("Lib", Version::new(1, 0, 0, 0)), true);
        let module = table.define_module(assembly, table.intern("Lib.dll"), FxHashMap::default());
        let global = table.global_namespace(module).unwrap_or(module);
        let system = table.get_or_define_namespace(global, table.intern("System"));

        let object = table.define_type(
            system,
            TypeDef::new(SymbolDecl::new(table.intern("Object")), TypeKind::Class)
                .with_special(SpecialType::Object),
        );
        table.set_base_type(object, None);
        let value_type = table.define_type(
            system,
            TypeDef::new(SymbolDecl::new(table.intern("ValueType")), TypeKind::Class)
                .with_special(SpecialType::ValueType),
        );
        table.set_base_type(value_type, Some(object));
        let int32 = table.define_type(
            system,
            TypeDef::new(SymbolDecl::new(table.intern("Int32")), TypeKind::Struct)
                .with_special(SpecialType::Int32),
        );
        table.set_base_type(int32, Some(value_type));
        let string = table.define_type(
            system,
            TypeDef::new(SymbolDecl::new(table.intern("String")), TypeKind::Class)
                .with_special(SpecialType::String),
        );
        table.set_base_type(string, Some(object));

        World {
            table,
            assembly,
            module,
            global,
            system,
            object,
            int32,
            string,
        }
    }

    /// A public class deriving from `System.Object`.
    pub fn class(&self, container: SymbolId, name: &str) -> SymbolId {
        self.generic_class(container, name, &[])
    }

    /// A public generic class deriving from `System.Object`.
    pub fn generic_class(&self, container: SymbolId, name: &str, parameters: &[&str]) -> SymbolId {
        let table = &self.table;
        let parameters = parameters
            .iter()
            .map(|parameter| TypeParameterDecl::new(table.intern(parameter)))
            .collect();
        let ty = table.define_type(
            container,
            TypeDef::new(SymbolDecl::new(table.intern(name)), TypeKind::Class)
                .with_type_parameters(parameters),
        );
        table.set_base_type(ty, Some(self.object));
        table.set_interfaces(ty, Vec::new());
        ty
    }

    /// A public interface.
    pub fn interface(&self, name: &str, bases: Vec<SymbolId>) -> SymbolId {
        let table = &self.table;
        let ty = table.define_type(
            self.system,
            TypeDef::new(SymbolDecl::new(table.intern(name)), TypeKind::Interface),
        );
        table.set_interfaces(ty, bases);
        ty
    }

    /// A public instance method with positional parameters `p0, p1, ...`.
    pub fn method(&self, ty: SymbolId, name: &str, parameters: &[SymbolId], ret: SymbolId) -> SymbolId {
        self.method_with(ty, SymbolDecl::new(self.table.intern(name)), parameters, ret)
    }

    pub fn method_with(
        &self,
        ty: SymbolId,
        decl: SymbolDecl,
        parameters: &[SymbolId],
        ret: SymbolId,
    ) -> SymbolId {
        let table = &self.table;
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(i, &parameter)| ParameterDecl::new(table.intern(&format!("p{i}")), parameter))
            .collect();
        table.define_method(ty, MethodDef::new(decl, MethodKind::Ordinary), |_| {
            MethodSignature::new(parameters, ret)
        })
    }
}
