// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IDL-driven default-data patcher for generated DDS publisher sources.
//!
//! The pipeline has three stages:
//!
//! 1. [`parser::IdlParser`] scans a directory of `.idl` files and fills a
//!    [`registry::TypeRegistry`] with struct, enum, union and typedef
//!    definitions.
//! 2. [`codegen::CodeGenerator`] walks a struct definition and emits C++
//!    assignment statements with synthetic values chosen by a configurable
//!    [`values::ValueTable`].
//! 3. [`patcher::FilePatcher`] injects the generated statements into
//!    `*PublisherApp.cxx` sources between marker comments, idempotently and
//!    with a backup of the original file.
//!
//! Malformed input degrades to [`diag::Diagnostic`] entries; a run only fails
//! hard when nothing at all was discovered or patched.

pub mod codegen;
pub mod diag;
pub mod model;
pub mod parser;
pub mod patcher;
pub mod registry;
pub mod report;
pub mod scan;
pub mod values;

pub use codegen::{AccessMode, CodeGenerator};
pub use diag::{Diagnostic, Severity, ToolError};
pub use model::{EnumDef, Field, IdlType, StructDef, TypedefDef, UnionCase, UnionDef};
pub use parser::IdlParser;
pub use patcher::{FilePatcher, PatcherOptions};
pub use registry::TypeRegistry;
pub use report::PatchReport;
pub use values::ValueTable;
