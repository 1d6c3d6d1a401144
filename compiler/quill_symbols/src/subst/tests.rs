use super::*;
use crate::fixtures::World;
use crate::{
    CustomModifier, DefaultValue, MethodDef, MethodKind, MethodSignature, ParameterDecl,
    SymbolDecl, TypeParameterDecl,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn plain(ids: &[SymbolId]) -> Vec<TypeWithModifiers> {
    ids.iter().copied().map(TypeWithModifiers::plain).collect()
}

/// `List<T>` with `T Get(int)`, `void Add(T)`, a field `T[] items` and a
/// property `T First { get; }`.
struct ListFixture {
    world: World,
    list: SymbolId,
    get: SymbolId,
    items: SymbolId,
    first: SymbolId,
    getter: SymbolId,
}

fn list_fixture() -> ListFixture {
    let world = World::new();
    let table = &world.table;
    let list = world.generic_class(world.system, "List", &["T"]);
    let t = table.type_parameters(list)[0];
    let get = world.method(list, "Get", &[world.int32], t);
    world.method(list, "Add", &[t], world.object);
    let items = table.define_field(
        list,
        SymbolDecl::new(table.intern("items")),
        table.array_type(t, 1),
        None,
    );
    let getter = world.method(list, "get_First", &[], t);
    let first = table.define_property(list, SymbolDecl::new(table.intern("First")), t, Some(getter), None);
    ListFixture {
        world,
        list,
        get,
        items,
        first,
        getter,
    }
}

#[test]
fn substituting_a_non_generic_type_is_identity() {
    let world = World::new();
    let table = &world.table;
    let list = world.generic_class(world.system, "List", &["T"]);
    let t = table.type_parameters(list)[0];
    let map = SubstitutionMap::new(&SubstitutionMap::empty(), &[t], &plain(&[world.int32]));

    let before = table.len();
    assert_eq!(table.substitute(world.string, &map), world.string);
    let strings = table.array_type(world.string, 1);
    assert_eq!(table.substitute(strings, &map), strings);
    assert_eq!(table.len(), before + 1);
}

#[test]
fn constructing_with_own_parameters_returns_the_definition() {
    let world = World::new();
    let table = &world.table;
    let dict = world.generic_class(world.system, "Dictionary", &["K", "V"]);
    let params = table.type_parameters(dict);

    assert_eq!(table.construct(dict, plain(&params)), Ok(dict));
    assert_eq!(table.construct(world.string, Vec::new()), Ok(world.string));

    // Swapped parameters are a real construction.
    let swapped = table.construct(dict, plain(&[params[1], params[0]]));
    assert!(matches!(swapped, Ok(id) if id != dict));
}

#[test]
fn equal_constructions_share_one_symbol() {
    let fixture = list_fixture();
    let table = &fixture.world.table;

    let a = table.construct(fixture.list, plain(&[fixture.world.int32]));
    let b = table.construct(fixture.list, plain(&[fixture.world.int32]));
    assert_eq!(a, b);
    let a = a.unwrap_or(fixture.list);
    assert_ne!(a, fixture.list);
    assert_eq!(table.constructed_from(a), fixture.list);
    assert_eq!(table.original_definition(a), fixture.list);
    assert_eq!(table.type_arguments(a), plain(&[fixture.world.int32]));
    assert_eq!(table.special_type(a), SpecialType::None);
    assert_eq!(table.qualified_name(a), "System.List`1[System.Int32]");

    let strings = table.construct(fixture.list, plain(&[fixture.world.string]));
    assert_ne!(strings, Ok(a));
}

#[test]
fn modifiers_distinguish_constructions() {
    let fixture = list_fixture();
    let table = &fixture.world.table;
    let modifier = CustomModifier {
        modifier: fixture.world.object,
        is_optional: true,
    };

    let plain_list = table.construct(fixture.list, plain(&[fixture.world.int32]));
    let modified = table.construct(
        fixture.list,
        vec![TypeWithModifiers::plain(fixture.world.int32).with_modifiers(vec![modifier])],
    );
    assert_ne!(plain_list, modified);
}

#[test]
fn construction_errors() {
    let fixture = list_fixture();
    let table = &fixture.world.table;
    let list = fixture.list;

    assert_eq!(
        table.construct(list, Vec::new()),
        Err(ConstructError::ArityMismatch {
            symbol: list,
            expected: 1,
            found: 0
        })
    );
    assert_eq!(
        table.construct(list, plain(&[table.unbound_argument()])),
        Err(ConstructError::UnboundArgument { symbol: list })
    );
    assert_eq!(
        table.construct(fixture.get, Vec::new()),
        Err(ConstructError::NotConstructible { symbol: fixture.get })
    );

    let ints = table
        .construct(list, plain(&[fixture.world.int32]))
        .unwrap_or(list);
    assert_eq!(
        table.construct(ints, plain(&[fixture.world.int32])),
        Err(ConstructError::NotConstructible { symbol: ints })
    );
}

#[test]
fn members_of_constructed_types_are_substituted() {
    let fixture = list_fixture();
    let world = &fixture.world;
    let table = &world.table;
    let ints = table
        .construct(fixture.list, plain(&[world.int32]))
        .unwrap_or(fixture.list);

    let get = table.substituted_member(ints, fixture.get);
    assert!(get.is_some());
    let get = get.unwrap_or(fixture.get);
    assert_ne!(get, fixture.get);
    assert_eq!(table.original_definition(get), fixture.get);
    assert_eq!(table.containing_symbol(get), Some(ints));
    assert_eq!(
        table.return_type(get),
        Some(TypeWithModifiers::plain(world.int32))
    );
    let params = table.parameters(get);
    assert_eq!(params.len(), 1);
    assert_eq!(table.original_definition(params[0]), table.parameters(fixture.get)[0]);
    // Published once: a second query sees the same parameter symbols.
    assert_eq!(table.parameters(get), params);

    let items = table.substituted_member(ints, fixture.items).unwrap_or(fixture.items);
    assert_eq!(
        table.field_type(items),
        Some(TypeWithModifiers::plain(table.array_type(world.int32, 1)))
    );

    // Member views are created once per constructed type.
    assert_eq!(table.members(ints), table.members(ints));
    assert_eq!(table.members(ints).len(), table.members(fixture.list).len());
}

#[test]
fn substituted_properties_use_substituted_accessors() {
    let fixture = list_fixture();
    let world = &fixture.world;
    let table = &world.table;
    let ints = table
        .construct(fixture.list, plain(&[world.int32]))
        .unwrap_or(fixture.list);

    let first = table.substituted_member(ints, fixture.first).unwrap_or(fixture.first);
    let getter = table.substituted_member(ints, fixture.getter);
    assert_eq!(table.property_accessors(first), (getter, None));
    assert_eq!(table.property_type(first).map(|ty| ty.ty), Some(world.int32));
    assert_eq!(table.original_definition(first), fixture.first);
}

#[test]
fn explicit_method_construction_is_distinct_from_member_views() {
    let world = World::new();
    let table = &world.table;
    let holder = world.generic_class(world.system, "Holder", &["T"]);
    let t = table.type_parameters(holder)[0];
    let convert = table.define_method(
        holder,
        MethodDef::new(SymbolDecl::new(table.intern("Convert")), MethodKind::Ordinary)
            .with_type_parameters(vec![TypeParameterDecl::new(table.intern("U"))]),
        |own| {
            MethodSignature::new(
                vec![ParameterDecl::new(table.intern("value"), t)],
                own[0],
            )
        },
    );

    let direct = table
        .construct_method(convert, plain(&[world.string]))
        .unwrap_or(convert);
    assert_ne!(direct, convert);
    assert_eq!(
        table.return_type(direct).map(|ty| ty.ty),
        Some(world.string)
    );
    // The containing type's parameter stays free.
    assert_eq!(
        table.parameter_type(table.parameters(direct)[0]).map(|ty| ty.ty),
        Some(t)
    );

    let ints = table.construct(holder, plain(&[world.int32])).unwrap_or(holder);
    let member = table.substituted_member(ints, convert).unwrap_or(convert);
    let through_type = table
        .construct_method(member, plain(&[world.string]))
        .unwrap_or(member);

    assert_ne!(through_type, direct);
    assert_eq!(table.original_definition(through_type), convert);
    assert_eq!(table.original_definition(direct), convert);
    assert_eq!(table.constructed_from(through_type), member);
    assert_eq!(
        table.parameter_type(table.parameters(through_type)[0]).map(|ty| ty.ty),
        Some(world.int32)
    );
    assert_eq!(
        table.return_type(through_type).map(|ty| ty.ty),
        Some(world.string)
    );
    assert_eq!(
        table.construct_method(convert, plain(&table.type_parameters(convert))),
        Ok(convert)
    );
}

#[test]
fn nested_types_rebind_to_constructed_container() {
    let world = World::new();
    let table = &world.table;
    let outer = world.generic_class(world.system, "Outer", &["T"]);
    let t = table.type_parameters(outer)[0];
    let inner = world.class(outer, "Inner");
    let value = table.define_field(inner, SymbolDecl::new(table.intern("value")), t, None);

    let ints = table.construct(outer, plain(&[world.int32])).unwrap_or(outer);
    let map = table.substitution_map(ints);

    let inner_view = table.substitute(inner, &map);
    assert_ne!(inner_view, inner);
    assert_eq!(inner_view, table.substituted_nested(ints, inner));
    assert_eq!(table.containing_symbol(inner_view), Some(ints));
    assert_eq!(table.original_definition(inner_view), inner);
    assert!(!table.is_constructed(inner_view));
    assert!(table.type_members(ints).contains(&inner_view));

    let value_view = table.substituted_member(inner_view, value).unwrap_or(value);
    assert_eq!(
        table.field_type(value_view),
        Some(TypeWithModifiers::plain(world.int32))
    );
}

#[test]
fn generic_nested_type_in_constructed_container() {
    let world = World::new();
    let table = &world.table;
    let outer = world.generic_class(world.system, "Outer", &["T"]);
    let t = table.type_parameters(outer)[0];
    let pair = world.generic_class(outer, "Pair", &["U"]);
    let u = table.type_parameters(pair)[0];
    let make = world.method(pair, "Make", &[t], u);

    let ints = table.construct(outer, plain(&[world.int32])).unwrap_or(outer);
    let pair_view = table.substituted_nested(ints, pair);
    let closed = table
        .construct(pair_view, plain(&[world.string]))
        .unwrap_or(pair_view);

    let make = table.substituted_member(closed, make).unwrap_or(make);
    let param = table.parameters(make)[0];
    assert_eq!(table.parameter_type(param).map(|ty| ty.ty), Some(world.int32));
    assert_eq!(table.return_type(make).map(|ty| ty.ty), Some(world.string));

    // Substituting the open definition through the container's map yields
    // the unconstructed view.
    assert_eq!(table.substitute(pair, &table.substitution_map(ints)), pair_view);
}

#[test]
fn substitution_keeps_modifiers_in_order() {
    let world = World::new();
    let table = &world.table;
    let list = world.generic_class(world.system, "List", &["T"]);
    let t = table.type_parameters(list)[0];
    let outer_mod = CustomModifier {
        modifier: world.object,
        is_optional: false,
    };
    let inner_mod = CustomModifier {
        modifier: world.string,
        is_optional: true,
    };
    let map = SubstitutionMap::new(
        &SubstitutionMap::empty(),
        &[t],
        &[TypeWithModifiers::plain(world.int32).with_modifiers(vec![outer_mod])],
    );

    let occurrence = TypeWithModifiers::plain(t).with_modifiers(vec![inner_mod]);
    assert_eq!(
        table.substitute_with_modifiers(&occurrence, &map),
        TypeWithModifiers::plain(world.int32).with_modifiers(vec![outer_mod, inner_mod])
    );

    let unrelated = TypeWithModifiers::plain(world.string).with_modifiers(vec![inner_mod]);
    assert_eq!(table.substitute_with_modifiers(&unrelated, &map), unrelated);
    assert!(occurrence.same_type(&TypeWithModifiers::plain(t), true));
    assert!(!occurrence.same_type(&TypeWithModifiers::plain(t), false));
}

#[test]
fn deferred_field_type_substitutes_once_set() {
    let world = World::new();
    let table = &world.table;
    let node = world.generic_class(world.system, "Node", &["T"]);
    let t = table.type_parameters(node)[0];
    let next = table.define_field_deferred(node, SymbolDecl::new(table.intern("next")), None);

    let ints = table.construct(node, plain(&[world.int32])).unwrap_or(node);
    let view = table.substituted_member(ints, next).unwrap_or(next);
    assert_eq!(table.field_type(view), None);

    table.set_field_type(next, TypeWithModifiers::plain(t));
    assert_eq!(
        table.field_type(view),
        Some(TypeWithModifiers::plain(world.int32))
    );
}

#[test]
fn constructed_base_type_is_substituted() {
    let world = World::new();
    let table = &world.table;
    let base = world.generic_class(world.system, "Base", &["T"]);
    let derived = table.define_type(
        world.system,
        crate::TypeDef::new(SymbolDecl::new(table.intern("Derived")), crate::TypeKind::Class)
            .with_type_parameters(vec![TypeParameterDecl::new(table.intern("U"))]),
    );
    let u = table.type_parameters(derived)[0];
    let base_of_u = table.construct(base, plain(&[u])).unwrap_or(base);
    table.set_base_type(derived, Some(base_of_u));
    table.set_interfaces(derived, Vec::new());

    let ints = table.construct(derived, plain(&[world.int32])).unwrap_or(derived);
    let expected = table.construct(base, plain(&[world.int32]));
    assert_eq!(table.base_type(ints).map(Ok), Some(expected));
    assert!(table.inherits_from_definition(ints, base));
    assert!(!table.derives_from(ints, base));
}

#[test]
fn default_values_survive_substitution() {
    let world = World::new();
    let table = &world.table;
    let list = world.generic_class(world.system, "List", &["T"]);
    let t = table.type_parameters(list)[0];
    let fill = table.define_method(
        list,
        MethodDef::new(SymbolDecl::new(table.intern("Fill")), MethodKind::Ordinary),
        |_| {
            MethodSignature::new(
                vec![ParameterDecl::new(table.intern("value"), t)
                    .with_default(DefaultValue::Constant(quill_ir::ConstantValue::Null))],
                world.object,
            )
        },
    );
    let ints = table.construct(list, plain(&[world.int32])).unwrap_or(list);
    let fill = table.substituted_member(ints, fill).unwrap_or(fill);
    let param = table.parameters(fill)[0];
    assert!(matches!(
        &table.get(param).kind,
        SymbolKind::Parameter(ParameterData {
            default_value: Some(DefaultValue::Constant(quill_ir::ConstantValue::Null)),
            ..
        })
    ));
}

#[test]
fn concurrent_constructions_agree() {
    let fixture = list_fixture();
    let table = &fixture.world.table;
    let ids: Vec<SymbolId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    table
                        .construct(fixture.list, plain(&[fixture.world.string]))
                        .unwrap_or(fixture.list)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(fixture.list))
            .collect()
    });
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_ne!(ids[0], fixture.list);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Equal argument lists, built independently, construct one symbol.
    #[test]
    fn construction_cache_is_keyed_by_value(picks in proptest::collection::vec(0usize..3, 2)) {
        let world = World::new();
        let table = &world.table;
        let dict = world.generic_class(world.system, "Dictionary", &["K", "V"]);
        let pool = [world.int32, world.string, world.object];

        let first: Vec<TypeWithModifiers> =
            picks.iter().map(|&i| TypeWithModifiers::plain(pool[i])).collect();
        let second: Vec<TypeWithModifiers> =
            picks.iter().map(|&i| TypeWithModifiers::plain(pool[i])).collect();

        let a = table.construct(dict, first);
        let b = table.construct(dict, second);
        prop_assert!(a.is_ok());
        prop_assert_eq!(&a, &b);
        let a = a.unwrap_or(dict);
        prop_assert_eq!(table.original_definition(a), dict);
        let map = table.substitution_map(a);
        for (param, &pick) in table.type_parameters(dict).into_iter().zip(&picks) {
            prop_assert_eq!(table.substitute(param, &map), pool[pick]);
        }
    }
}
