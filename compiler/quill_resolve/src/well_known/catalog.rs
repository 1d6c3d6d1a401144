//! Descriptors of the privileged-library symbols lowering depends on.

use super::{CoreField, CoreMethod, CoreMethodKind, CoreParam, CoreProperty, CoreType};

// Primitive library.

pub const OBJECT: CoreType = CoreType::primitive("System.Object");
pub const VALUE_TYPE: CoreType = CoreType::primitive("System.ValueType");
pub const VOID: CoreType = CoreType::primitive("System.Void");
pub const BOOLEAN: CoreType = CoreType::primitive("System.Boolean");
pub const INT32: CoreType = CoreType::primitive("System.Int32");
pub const INT64: CoreType = CoreType::primitive("System.Int64");
pub const DOUBLE: CoreType = CoreType::primitive("System.Double");
pub const STRING: CoreType = CoreType::primitive("System.String");

// Runtime library.

/// The universal guest value.
pub const VALUE: CoreType = CoreType::runtime("Quill.Core.Value");
/// A reference to a guest value (`&$x`).
pub const ALIAS: CoreType = CoreType::runtime("Quill.Core.Alias");
/// Per-request execution context.
pub const CONTEXT: CoreType = CoreType::runtime("Quill.Core.Context");
/// The ordered guest array.
pub const ARRAY: CoreType = CoreType::runtime("Quill.Core.Array");
pub const OPERATORS: CoreType = CoreType::runtime("Quill.Core.Operators");

/// Types that must resolve before a compilation can start.
pub const CORE_TYPES: &[CoreType] = &[
    OBJECT, VALUE_TYPE, VOID, BOOLEAN, INT32, INT64, DOUBLE, STRING, VALUE, ALIAS, CONTEXT, ARRAY,
    OPERATORS,
];

const fn method(
    declaring: CoreType,
    name: &'static str,
    parameters: &'static [CoreParam],
    return_type: CoreType,
) -> CoreMethod {
    CoreMethod {
        declaring,
        name,
        kind: CoreMethodKind::Ordinary,
        parameters,
        return_type: Some(return_type),
    }
}

const fn constructor(declaring: CoreType, parameters: &'static [CoreParam]) -> CoreMethod {
    CoreMethod {
        declaring,
        name: ".ctor",
        kind: CoreMethodKind::Constructor,
        parameters,
        return_type: None,
    }
}

const fn operator(
    declaring: CoreType,
    name: &'static str,
    parameters: &'static [CoreParam],
    return_type: CoreType,
) -> CoreMethod {
    CoreMethod {
        declaring,
        name,
        kind: CoreMethodKind::Operator,
        parameters,
        return_type: Some(return_type),
    }
}

const fn explicit_cast(
    declaring: CoreType,
    parameters: &'static [CoreParam],
    to: CoreType,
) -> CoreMethod {
    CoreMethod {
        declaring,
        name: "op_Explicit",
        kind: CoreMethodKind::ExplicitCast,
        parameters,
        return_type: Some(to),
    }
}

pub const VALUE_FROM_LONG: CoreMethod =
    method(VALUE, "FromLong", &[CoreParam::Type(INT64)], VALUE);
pub const VALUE_FROM_DOUBLE: CoreMethod =
    method(VALUE, "FromDouble", &[CoreParam::Type(DOUBLE)], VALUE);
pub const VALUE_FROM_STRING: CoreMethod =
    method(VALUE, "FromString", &[CoreParam::Type(STRING)], VALUE);
pub const VALUE_TO_LONG: CoreMethod = method(VALUE, "ToLong", &[], INT64);
pub const VALUE_TO_BOOLEAN: CoreMethod =
    explicit_cast(VALUE, &[CoreParam::Type(VALUE)], BOOLEAN);
pub const VALUE_EQUALITY: CoreMethod = operator(
    VALUE,
    "op_Equality",
    &[CoreParam::Type(VALUE), CoreParam::Type(VALUE)],
    BOOLEAN,
);

pub const OPERATORS_ADD: CoreMethod = method(
    OPERATORS,
    "Add",
    &[CoreParam::Type(VALUE), CoreParam::Type(VALUE)],
    VALUE,
);
pub const OPERATORS_CONCAT: CoreMethod =
    method(OPERATORS, "Concat", &[CoreParam::ArrayOf(STRING)], STRING);
pub const OPERATORS_SET_VALUE: CoreMethod = method(
    OPERATORS,
    "SetValue",
    &[CoreParam::ByRef(VALUE), CoreParam::Type(VALUE)],
    VOID,
);

pub const ARRAY_NEW: CoreMethod = constructor(ARRAY, &[]);
pub const ARRAY_WITH_CAPACITY: CoreMethod = constructor(ARRAY, &[CoreParam::Type(INT32)]);

pub const CONTEXT_ECHO: CoreMethod = method(CONTEXT, "Echo", &[CoreParam::Type(VALUE)], VOID);

pub const VALUE_NULL: CoreField = CoreField {
    declaring: VALUE,
    name: "Null",
};
pub const ALIAS_VALUE: CoreField = CoreField {
    declaring: ALIAS,
    name: "Value",
};

pub const ARRAY_COUNT: CoreProperty = CoreProperty {
    declaring: ARRAY,
    name: "Count",
};
