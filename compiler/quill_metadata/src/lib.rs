//! Binary metadata for the Quill compiler.
//!
//! Referenced libraries arrive as decoded `ModuleImage`s from a
//! `MetadataReader`. `ReferenceManager` binds them into the symbol table:
//!
//! 1. **Discovery**: every explicit reference is located, then every module's
//!    own references, transitively. An identity that already has a symbol is
//!    never located again, which makes diamonds and reference cycles cheap.
//! 2. **Shells**: assemblies, modules, namespaces and type definitions are
//!    defined as soon as an assembly is located.
//! 3. **Members**: once every name exists, base types, interfaces, methods,
//!    fields and properties are bound, resolving `TypeRef`s through the
//!    module reference tables and type-forwarders.
//!
//! The result is a `ReferenceGraph` that answers top-level type lookups and
//! names the two privileged libraries.

mod error;
mod graph;
mod image;
mod lookup;
mod materialize;
mod names;
mod reader;

pub use error::MetadataError;
pub use graph::{ReferenceGraph, ReferenceManager, ReferenceOptions, DEFAULT_RUNTIME_LIBRARY};
pub use image::{
    AttributeRecord, FieldRecord, ForwardedTypeRecord, MethodRecord, ModuleImage,
    ParameterRecord, PropertyRecord, TypeDefRecord, TypeRef, TypeScope,
};
pub use lookup::lookup_metadata_type;
pub use names::{split_arity, MetadataTypeName};
pub use reader::{MemoryReader, MetadataReader};
