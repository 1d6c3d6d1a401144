use super::*;
use crate::fixtures::World;
use pretty_assertions::assert_eq;
use quill_symbols::MethodKind;

fn resolve(world: &World, candidates: &[SymbolId], arguments: &[CallArgument], scope: VisibilityScope) -> MethodResolution {
    OverloadsList::new(candidates.iter().copied()).resolve(&world.table, arguments, scope)
}

#[test]
fn empty_candidate_lists_are_missing() {
    let world = World::new();
    let scope = VisibilityScope::global(world.app);
    assert_eq!(
        resolve(&world, &[], &[CallArgument::of(world.int32)], scope),
        MethodResolution::Unresolved(ErrorReason::Missing)
    );
}

#[test]
fn a_single_sentinel_is_propagated() {
    let world = World::new();
    let reason = ErrorReason::Ambiguous {
        candidates: vec![world.int32],
        overloadable: false,
    };
    let sentinel = world.table.error_symbol(world.table.intern("f"), reason.clone());
    assert_eq!(
        resolve(&world, &[sentinel], &[], VisibilityScope::global(world.app)),
        MethodResolution::Unresolved(reason)
    );
}

#[test]
fn sentinels_among_real_candidates_are_dropped() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let f = world.simple(ty, "f", &[world.int32]);
    let sentinel = world
        .table
        .error_symbol(world.table.intern("f"), ErrorReason::Missing);
    assert_eq!(
        resolve(&world, &[sentinel, f], &[CallArgument::of(world.int32)], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(f)
    );
}

#[test]
fn parameterless_constructor_wins_for_no_arguments() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let ctor = |parameters: Vec<quill_symbols::ParameterDecl>| {
        world.method_of_kind(ty, world.decl(".ctor"), MethodKind::Constructor, parameters, world.void)
    };
    let empty = ctor(Vec::new());
    let with_int = ctor(vec![world.param(0, world.int32)]);

    assert_eq!(
        resolve(&world, &[empty, with_int], &[], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(empty)
    );
}

#[test]
fn exact_argument_types_select_the_overload() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let by_int = world.simple(ty, ".ctor", &[world.int32]);
    let by_string = world.simple(ty, ".ctor", &[world.string]);

    assert_eq!(
        resolve(&world, &[by_int, by_string], &[CallArgument::of(world.string)], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(by_string)
    );
}

#[test]
fn nullable_arguments_still_match_exactly() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let by_int = world.simple(ty, "f", &[world.int32]);
    let by_string = world.simple(ty, "f", &[world.string]);

    assert_eq!(
        resolve(
            &world,
            &[by_int, by_string],
            &[CallArgument::of(world.string).nullable()],
            VisibilityScope::global(world.app)
        ),
        MethodResolution::Resolved(by_string)
    );
}

#[test]
fn perfect_match_beats_variadic() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let variadic = world.method(
        ty,
        world.decl("f"),
        vec![world
            .param(0, world.table.array_type(world.int32, 1))
            .with_flags(SymbolFlags::PARAMS)],
        world.void,
    );
    let plain = world.simple(ty, "f", &[world.int32]);

    assert_eq!(
        resolve(&world, &[variadic, plain], &[CallArgument::of(world.int32)], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(plain)
    );
}

#[test]
fn accessibility_filter_leaves_the_visible_overload() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let caller = world.class("Unrelated", None);
    let private = world.with_access(ty, "m", Accessibility::Private, &[world.int32]);
    let public = world.with_access(ty, "m", Accessibility::Public, &[world.int32, world.int32]);

    assert_eq!(
        resolve(
            &world,
            &[private, public],
            &[CallArgument::of(world.int32), CallArgument::of(world.int32)],
            VisibilityScope::within(caller, world.app)
        ),
        MethodResolution::Resolved(public)
    );
}

#[test]
fn all_inaccessible_reports_every_candidate() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let a = world.with_access(ty, "m", Accessibility::Private, &[]);
    let b = world.with_access(ty, "m", Accessibility::Private, &[world.int32]);

    assert_eq!(
        resolve(&world, &[a, b], &[], VisibilityScope::global(world.app)),
        MethodResolution::Unresolved(ErrorReason::Inaccessible {
            candidates: vec![a, b],
        })
    );
}

#[test]
fn dynamic_scope_defers_non_public_candidates() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let protected = world.with_access(ty, "m", Accessibility::Protected, &[world.int32]);
    let public = world.with_access(ty, "m", Accessibility::Public, &[world.string]);

    assert_eq!(
        resolve(
            &world,
            &[protected, public],
            &[CallArgument::of(world.string)],
            VisibilityScope::global(world.app).dynamic()
        ),
        MethodResolution::Unresolved(ErrorReason::Ambiguous {
            candidates: vec![protected, public],
            overloadable: false,
        })
    );
}

#[test]
fn field_initializing_constructors_are_never_chosen() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let init = world.method_of_kind(
        ty,
        world.decl(".ctor").with_flags(SymbolFlags::INIT_FIELDS_ONLY),
        MethodKind::Constructor,
        Vec::new(),
        world.void,
    );
    let real = world.method_of_kind(ty, world.decl(".ctor"), MethodKind::Constructor, vec![world.param(0, world.int32)], world.void);

    assert_eq!(
        resolve(&world, &[init, real], &[], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(real)
    );
}

#[test]
fn approximate_matches_are_ambiguous_but_overloadable() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let by_int = world.simple(ty, "f", &[world.int32]);
    let by_string = world.simple(ty, "f", &[world.string]);

    assert_eq!(
        resolve(&world, &[by_int, by_string], &[CallArgument::unknown()], VisibilityScope::global(world.app)),
        MethodResolution::Unresolved(ErrorReason::Ambiguous {
            candidates: vec![by_int, by_string],
            overloadable: true,
        })
    );
}

#[test]
fn arity_alone_can_decide() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let one = world.simple(ty, "f", &[world.int32]);
    let two = world.simple(ty, "f", &[world.int32, world.int32]);

    assert_eq!(
        resolve(&world, &[one, two], &[CallArgument::unknown(), CallArgument::unknown()], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(two)
    );
}

#[test]
fn optional_parameters_lower_the_mandatory_count() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let optional = world.method(
        ty,
        world.decl("f"),
        vec![
            world.param(0, world.int32),
            world
                .param(1, world.int32)
                .with_default(quill_symbols::DefaultValue::Constant(quill_ir::ConstantValue::Int(0))),
        ],
        world.void,
    );
    let three = world.simple(ty, "f", &[world.int32, world.int32, world.int32]);

    assert_eq!(
        resolve(&world, &[optional, three], &[CallArgument::unknown()], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(optional)
    );
}

#[test]
fn unpacking_satisfies_any_mandatory_count() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let two = world.simple(ty, "f", &[world.int32, world.int32]);
    let three = world.simple(ty, "f", &[world.int32, world.int32, world.int32, world.int32]);

    assert_eq!(
        resolve(
            &world,
            &[two, three],
            &[CallArgument::unpacking(None)],
            VisibilityScope::global(world.app)
        ),
        MethodResolution::Unresolved(ErrorReason::Ambiguous {
            candidates: vec![two, three],
            overloadable: true,
        })
    );
}

#[test]
fn implicit_parameters_are_not_counted() {
    let world = World::new();
    let ty = world.class("Widget", None);
    let context = world.class("Context", None);
    let with_context = world.method(
        ty,
        world.decl("echo"),
        vec![
            world.param(0, context).with_flags(SymbolFlags::IMPLICIT),
            world.param(1, world.string),
        ],
        world.void,
    );
    let two = world.simple(ty, "echo", &[world.string, world.string]);

    assert_eq!(
        resolve(&world, &[with_context, two], &[CallArgument::of(world.string)], VisibilityScope::global(world.app)),
        MethodResolution::Resolved(with_context)
    );
}

#[test]
fn into_symbol_materializes_failures() {
    let world = World::new();
    let table = &world.table;
    let name = table.intern("f");
    let failed = MethodResolution::Unresolved(ErrorReason::Missing).into_symbol(table, name);

    assert!(table.is_error(failed));
    assert_eq!(table.error_reason(failed), Some(ErrorReason::Missing));
    assert_eq!(MethodResolution::Resolved(world.int32).method(), Some(world.int32));
}
