use super::*;
use crate::fixtures::World;
use crate::SymbolCategory;
use pretty_assertions::assert_eq;
use quill_ir::{ConstantValue, Version};

#[test]
fn module_gets_global_namespace_and_ordinal() {
    let world = World::new();
    let table = &world.table;

    let second = table.define_module(world.assembly, table.intern("Lib.Extra.dll"), FxHashMap::default());
    assert_eq!(table.modules(world.assembly), vec![world.module, second]);

    let global = table.global_namespace(second);
    assert!(global.is_some());
    assert_ne!(global, Some(world.global));
    assert!(matches!(
        &table.get(second).kind,
        SymbolKind::Module(data) if data.ordinal == 1
    ));
}

#[test]
fn namespaces_are_defined_once() {
    let world = World::new();
    let table = &world.table;

    let again = table.get_or_define_namespace(world.global, table.intern("System"));
    assert_eq!(again, world.system);

    let collections = table.get_or_define_namespace_path(world.global, "System.Collections.Generic");
    assert_eq!(table.namespace_path(collections), "System.Collections.Generic");
    assert_eq!(
        table.get_or_define_namespace_path(world.global, "System.Collections.Generic"),
        collections
    );
    assert_eq!(table.containing_module(collections), Some(world.module));
}

#[test]
fn type_parameters_are_owned_by_the_type() {
    let world = World::new();
    let table = &world.table;

    let dict = world.generic_class(world.system, "Dictionary", &["TKey", "TValue"]);
    let params = table.type_parameters(dict);
    assert_eq!(params.len(), 2);
    assert_eq!(table.arity(dict), 2);
    for (ordinal, &param) in params.iter().enumerate() {
        assert_eq!(table.containing_symbol(param), Some(dict));
        assert!(matches!(
            &table.get(param).kind,
            SymbolKind::TypeParameter(data)
                if data.ordinal == ordinal && data.owner == TypeParameterOwner::Type
        ));
    }
}

#[test]
fn hierarchy_is_write_once() {
    let world = World::new();
    let table = &world.table;

    let ty = table.define_type(
        world.system,
        TypeDef::new(SymbolDecl::new(table.intern("Widget")), TypeKind::Class),
    );
    assert!(table.set_base_type(ty, Some(world.object)));
    assert!(!table.set_base_type(ty, Some(world.string)));
    assert_eq!(table.base_type(ty), Some(world.object));

    assert!(table.set_interfaces(ty, Vec::new()));
    assert!(!table.set_interfaces(ty, vec![world.object]));
    assert!(!table.set_base_type(world.system, None));
}

#[test]
fn method_signature_sees_own_type_parameters() {
    let world = World::new();
    let table = &world.table;

    let ty = world.class(world.system, "Converter");
    let method = table.define_method(
        ty,
        MethodDef::new(SymbolDecl::new(table.intern("Convert")), MethodKind::Ordinary)
            .with_type_parameters(vec![TypeParameterDecl::new(table.intern("U"))]),
        |params| {
            MethodSignature::new(
                vec![
                    ParameterDecl::new(table.intern("value"), params[0]),
                    ParameterDecl::new(table.intern("fallback"), world.int32)
                        .with_default(DefaultValue::Constant(ConstantValue::Int(0))),
                ],
                params[0],
            )
        },
    );

    let type_params = table.type_parameters(method);
    assert_eq!(type_params.len(), 1);
    let params = table.parameters(method);
    assert_eq!(params.len(), 2);
    assert_eq!(
        table.parameter_type(params[0]).map(|ty| ty.ty),
        Some(type_params[0])
    );
    assert_eq!(table.parameter_ordinal(params[1]), Some(1));
    assert!(table.flags(params[1]).contains(SymbolFlags::OPTIONAL));
    assert_eq!(table.return_type(method).map(|ty| ty.ty), Some(type_params[0]));
    assert_eq!(table.arity(method), 1);
}

#[test]
fn deferred_field_type() {
    let world = World::new();
    let table = &world.table;

    let node = world.class(world.system, "Node");
    let next = table.define_field_deferred(node, SymbolDecl::new(table.intern("next")), None);
    assert_eq!(table.field_type(next), None);

    assert!(table.set_field_type(next, TypeWithModifiers::plain(node)));
    assert!(!table.set_field_type(next, TypeWithModifiers::plain(world.int32)));
    assert_eq!(table.field_type(next), Some(TypeWithModifiers::plain(node)));
}

#[test]
fn property_keeps_accessors() {
    let world = World::new();
    let table = &world.table;

    let ty = world.class(world.system, "Counter");
    let getter = world.method(ty, "get_Count", &[], world.int32);
    let property = table.define_property(
        ty,
        SymbolDecl::new(table.intern("Count")),
        world.int32,
        Some(getter),
        None,
    );
    assert_eq!(table.property_accessors(property), (Some(getter), None));
    assert_eq!(table.property_type(property).map(|ty| ty.ty), Some(world.int32));
}

#[test]
fn missing_types_are_deduplicated_per_assembly() {
    let world = World::new();
    let table = &world.table;
    let lib = AssemblyIdentity::new("Other", Version::new(2, 0, 0, 0));
    let ns = table.intern("Acme");
    let name = table.intern("Gadget");

    let a = table.missing_type(Some(lib.clone()), ns, name, 0);
    let b = table.missing_type(Some(lib.clone()), ns, name, 0);
    let c = table.missing_type(None, ns, name, 0);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(table.is_error(a));
    assert_eq!(
        table.error_type_kind(a),
        Some(ErrorTypeKind::Missing {
            assembly: Some(lib),
            namespace: ns
        })
    );
    assert_eq!(table.qualified_name(a), "Acme.Gadget");
}

#[test]
fn sentinels_answer_name_and_kind() {
    let world = World::new();
    let table = &world.table;

    let error = table.error_symbol(
        table.intern("Frobnicate"),
        ErrorReason::Ambiguous {
            candidates: vec![world.object],
            overloadable: false,
        },
    );
    assert_eq!(table.symbol_name(error), "Frobnicate");
    assert_eq!(table.category(error), SymbolCategory::Error);
    assert_eq!(
        table.error_reason(error).map(|reason| reason.candidates().to_vec()),
        Some(vec![world.object])
    );

    let unsupported = table.error_type(ErrorTypeKind::Unsupported, table.intern("Odd"), 0);
    let again = table.error_type(ErrorTypeKind::Unsupported, table.intern("Odd"), 0);
    assert_ne!(unsupported, again);

    assert_eq!(table.unbound_argument(), table.unbound_argument());
    assert!(table.is_unbound_argument(table.unbound_argument()));
}

#[test]
fn receiver_parameter() {
    let world = World::new();
    let table = &world.table;

    let ty = world.class(world.system, "Widget");
    let instance = world.method(ty, "Draw", &[], world.int32);
    let statik = world.method_with(
        ty,
        SymbolDecl::new(table.intern("Create")).with_flags(SymbolFlags::STATIC),
        &[],
        ty,
    );

    let this = table.this_parameter(instance);
    assert!(this.is_some());
    assert_eq!(this, table.this_parameter(instance));
    let this = this.unwrap_or(instance);
    assert_eq!(table.parameter_ordinal(this), Some(-1));
    assert_eq!(table.parameter_type(this).map(|ty| ty.ty), Some(ty));
    assert!(!table.parameters(instance).contains(&this));

    assert_eq!(table.this_parameter(statik), None);
}

#[test]
fn missing_assembly_is_flagged_and_searchable() {
    let world = World::new();
    let table = &world.table;

    let missing =
        table.define_missing_assembly(AssemblyIdentity::new("Gone", Version::new(1, 0, 0, 0)));
    assert!(table.is_missing_assembly(missing));
    assert!(!table.is_missing_assembly(world.assembly));
    assert!(table.is_cor_library(world.assembly));
    let global = table.global_namespace(missing);
    assert!(global.is_some());
    assert_eq!(global.map(|global| table.members(global)), Some(Vec::new()));
}
