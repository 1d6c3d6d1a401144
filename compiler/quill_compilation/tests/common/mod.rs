//! Metadata images of a minimal primitive library and guest runtime.

use quill_ir::{AssemblyIdentity, Version};
use quill_metadata::{
    FieldRecord, MemoryReader, MethodRecord, ModuleImage, ParameterRecord, PropertyRecord,
    TypeDefRecord, TypeRef,
};
use quill_symbols::{MethodKind, SymbolFlags, TypeKind};

pub fn corlib_identity() -> AssemblyIdentity {
    AssemblyIdentity::new("System.Private.CoreLib", Version::new(8, 0, 0, 0))
}

pub fn runtime_identity() -> AssemblyIdentity {
    AssemblyIdentity::new("Quill.Runtime", Version::new(1, 0, 0, 0))
}

pub fn corlib() -> ModuleImage {
    let object = TypeRef::local("System", "Object");
    let value_type = TypeRef::local("System", "ValueType");
    let mut image = ModuleImage::new(corlib_identity())
        .with_type(TypeDefRecord::new("System", "Object", TypeKind::Class))
        .with_type(TypeDefRecord::new("System", "ValueType", TypeKind::Class).with_base(object.clone()))
        .with_type(
            TypeDefRecord::new("System", "String", TypeKind::Class)
                .with_base(object)
                .with_flags(SymbolFlags::SEALED),
        );
    for name in ["Void", "Boolean", "Int32", "Int64", "Double"] {
        image = image.with_type(
            TypeDefRecord::new("System", name, TypeKind::Struct).with_base(value_type.clone()),
        );
    }
    image
}

fn system(name: &str) -> TypeRef {
    TypeRef::external(&corlib_identity(), "System", name)
}

fn core(name: &str) -> TypeRef {
    TypeRef::local("Quill.Core", name)
}

fn static_method(name: &str, ret: TypeRef, parameters: &[TypeRef]) -> MethodRecord {
    parameters.iter().enumerate().fold(
        MethodRecord::new(name, ret).with_flags(SymbolFlags::STATIC),
        |method, (i, ty)| method.with_parameter(ParameterRecord::new(&format!("p{i}"), ty.clone())),
    )
}

/// The runtime under `identity`, optionally without `Quill.Core.Operators`.
pub fn runtime_named(identity: AssemblyIdentity, with_operators: bool) -> ModuleImage {
    let value = TypeDefRecord::new("Quill.Core", "Value", TypeKind::Struct)
        .with_base(system("ValueType"))
        .with_field(
            FieldRecord::new("Null", core("Value")).with_flags(SymbolFlags::STATIC | SymbolFlags::READONLY),
        )
        .with_method(static_method("FromLong", core("Value"), &[system("Int64")]))
        .with_method(static_method("FromDouble", core("Value"), &[system("Double")]))
        .with_method(static_method("FromString", core("Value"), &[system("String")]))
        .with_method(MethodRecord::new("ToLong", system("Int64")))
        .with_method(
            static_method("op_Explicit", system("Boolean"), &[core("Value")])
                .with_flags(SymbolFlags::SPECIAL_NAME),
        )
        .with_method(
            static_method("op_Equality", system("Boolean"), &[core("Value"), core("Value")])
                .with_flags(SymbolFlags::SPECIAL_NAME),
        );
    let alias = TypeDefRecord::new("Quill.Core", "Alias", TypeKind::Class)
        .with_base(system("Object"))
        .with_field(FieldRecord::new("Value", core("Value")));
    let context = TypeDefRecord::new("Quill.Core", "Context", TypeKind::Class)
        .with_base(system("Object"))
        .with_method(
            MethodRecord::new("Echo", system("Void"))
                .with_parameter(ParameterRecord::new("value", core("Value"))),
        );
    let array = TypeDefRecord::new("Quill.Core", "Array", TypeKind::Class)
        .with_base(system("Object"))
        .with_method(MethodRecord::constructor(system("Void")))
        .with_method(
            MethodRecord::constructor(system("Void"))
                .with_parameter(ParameterRecord::new("capacity", system("Int32"))),
        )
        .with_method(
            MethodRecord::new("get_Count", system("Int32"))
                .with_kind(MethodKind::PropertyGet)
                .with_flags(SymbolFlags::SPECIAL_NAME),
        )
        .with_property(PropertyRecord::new("Count", system("Int32"), Some(2), None));
    // Base class of compiled guest classes.
    let guest_object = TypeDefRecord::new("Quill.Core", "GuestObject", TypeKind::Class)
        .with_base(system("Object"))
        .with_flags(SymbolFlags::ABSTRACT)
        .with_method(
            MethodRecord::new("ToString", system("String"))
                .with_flags(SymbolFlags::VIRTUAL),
        )
        .with_method(
            MethodRecord::new("Offset", core("Value"))
                .with_flags(SymbolFlags::VIRTUAL)
                .with_parameter(ParameterRecord::new("key", system("Int64"))),
        );

    let mut image = ModuleImage::new(identity)
        .with_reference(corlib_identity())
        .with_type(value)
        .with_type(alias)
        .with_type(context)
        .with_type(array)
        .with_type(guest_object);
    if with_operators {
        image = image.with_type(
            TypeDefRecord::new("Quill.Core", "Operators", TypeKind::Class)
                .with_base(system("Object"))
                .with_method(static_method("Add", core("Value"), &[core("Value"), core("Value")]))
                .with_method(static_method("Concat", system("String"), &[system("String").array()]))
                .with_method(
                    MethodRecord::new("SetValue", system("Void"))
                        .with_flags(SymbolFlags::STATIC)
                        .with_parameter(
                            ParameterRecord::new("target", core("Value"))
                                .with_flags(SymbolFlags::BY_REF),
                        )
                        .with_parameter(ParameterRecord::new("value", core("Value"))),
                ),
        );
    }
    image
}

pub fn runtime() -> ModuleImage {
    runtime_named(runtime_identity(), true)
}

/// A reader serving the primitive library and the runtime.
pub fn standard_reader() -> MemoryReader {
    MemoryReader::new().with(corlib()).with(runtime())
}
