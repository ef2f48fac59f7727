//! # classpeek-core
//!
//! A library for decoding the structural skeleton of JVM class files without
//! loading them.
//!
//! This crate provides the core functionality for:
//! - Reading the class file grammar in a single forward pass
//! - Resolving strings through the constant pool
//! - Parsing field and method descriptors into a type model
//! - Collecting the runtime-visible annotations on a class and its members
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`reader`]: Big-endian primitive reads and modified UTF-8
//! - [`pool`]: The string-bearing constant pool and selector resolution
//! - [`descriptor`]: Field and method descriptor grammar
//! - [`reference`]: Type and member values
//! - [`decoder`]: The structural decode pass
//! - [`container`]: The decoded result and its queries
//! - [`source`]: Finding class files by binary name in directories and jars
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use classpeek_core::{ClassSource, DirectorySource};
//!
//! let classes = DirectorySource::open("./target/classes")?;
//!
//! for container in classes.read_all(true)? {
//!     for (member, annotations) in container.annotated_members() {
//!         for annotation in annotations {
//!             println!(
//!                 "{}#{} @{}",
//!                 container.name(),
//!                 member.name().as_str_lossy(),
//!                 annotation.name()
//!             );
//!         }
//!     }
//! }
//! # Ok::<(), classpeek_core::Error>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`ClassSource`]: Plug in other places to read class files from
//! - [`DescriptorVisitor`](descriptor::DescriptorVisitor): Consume method
//!   descriptors piece by piece
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod container;
pub mod decoder;
pub mod descriptor;
pub mod error;
pub mod pool;
pub mod reader;
pub mod reference;
pub mod source;

// Re-export primary types for convenience
pub use container::{ContainerBuilder, DecodedContainer};
pub use decoder::{Decoder, DecoderConfig, DEFAULT_MAX_MAJOR_VERSION};
pub use error::{Error, ReadError, Result};
pub use reference::{AccessFlags, ClassRef, MemberKind, MemberRef, Primitive, TypeRef};
pub use source::{ArchiveSource, ClassSource, DirectorySource};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
