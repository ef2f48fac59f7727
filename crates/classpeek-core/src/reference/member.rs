//! Fields and methods declared by a class file.
//!
//! A [`MemberRef`] keeps its name and descriptor exactly as they were read,
//! unpaired surrogates included, and uses the pair as its identity. The declaring
//! type and access flags ride along but never take part in equality,
//! hashing or ordering.

use super::{ClassRef, TypeRef};
use crate::descriptor::{self, DescriptorVisitor, ParameterCollector};
use crate::error::DescriptorError;
use bitflags::bitflags;
use java_string::{JavaStr, JavaString};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Name shared by every instance initializer
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Name of the static initializer
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// `access_flags` of a field or method
    pub struct AccessFlags: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private
        const PRIVATE = 0x0002;
        /// Declared protected
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Method is synchronized
        const SYNCHRONIZED = 0x0020;
        /// Field is volatile; on methods this bit marks a bridge
        const VOLATILE = 0x0040;
        /// Field is transient; on methods this bit marks varargs
        const TRANSIENT = 0x0080;
        /// Method is native
        const NATIVE = 0x0100;
        /// Method is abstract
        const ABSTRACT = 0x0400;
        /// Method uses strict floating point
        const STRICT = 0x0800;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Field is an enum constant
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Method is a compiler-generated bridge
    pub const BRIDGE: Self = Self::VOLATILE;
    /// Method takes a variable number of arguments
    pub const VARARGS: Self = Self::TRANSIENT;

    /// Wraps raw flags, keeping bits this type has no name for
    pub fn from_raw(value: u16) -> Self {
        Self::from_bits_retain(value)
    }

    /// Returns true if declared public
    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// Returns true if declared private
    pub fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// Returns true if declared protected
    pub fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    /// Returns true if declared static
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Returns true if declared final
    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    /// Returns true if compiler-generated
    pub fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }
}

/// Whether a member is a field or a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A field
    Field,
    /// A method, constructor included
    Method,
}

#[derive(Debug, Clone)]
enum Signature {
    Field(TypeRef),
    Method {
        return_type: TypeRef,
        parameter_count: usize,
    },
}

/// A field or method of a decoded class
#[derive(Debug, Clone)]
pub struct MemberRef {
    declaring_type: ClassRef,
    name: JavaString,
    descriptor: JavaString,
    flags: AccessFlags,
    signature: Signature,
}

impl MemberRef {
    /// Creates a field from its field descriptor
    pub fn field(
        declaring_type: ClassRef,
        name: impl Into<JavaString>,
        descriptor: impl Into<JavaString>,
        flags: AccessFlags,
    ) -> Result<Self, DescriptorError> {
        let descriptor = descriptor.into();
        let ty = descriptor::parse_field_descriptor(&descriptor.as_str_lossy())?;
        Ok(Self {
            declaring_type,
            name: name.into(),
            descriptor,
            flags,
            signature: Signature::Field(ty),
        })
    }

    /// Creates a method from its method descriptor.
    ///
    /// Only the return type and parameter count are kept; parameter types
    /// are parsed again on demand by [`parameter_types`](Self::parameter_types).
    pub fn method(
        declaring_type: ClassRef,
        name: impl Into<JavaString>,
        descriptor: impl Into<JavaString>,
        flags: AccessFlags,
    ) -> Result<Self, DescriptorError> {
        let descriptor = descriptor.into();
        let (parameter_count, return_type) = {
            let text = descriptor.as_str_lossy();
            let mut capture = ReturnTypeCapture::default();
            let count = descriptor::parse_method_descriptor(&text, &mut capture)?;
            let return_type = capture
                .0
                .ok_or_else(|| DescriptorError::new(&*text, "missing return type"))?;
            (count, return_type)
        };

        Ok(Self {
            declaring_type,
            name: name.into(),
            descriptor,
            flags,
            signature: Signature::Method {
                return_type,
                parameter_count,
            },
        })
    }

    /// The class that declares this member
    pub fn declaring_type(&self) -> &ClassRef {
        &self.declaring_type
    }

    /// The member name exactly as read
    pub fn name(&self) -> &JavaStr {
        &self.name
    }

    /// Returns true if the name is exactly `name`. A name holding an
    /// unpaired surrogate never matches.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_str().is_ok_and(|n| n == name)
    }

    /// The descriptor exactly as read
    pub fn descriptor(&self) -> &JavaStr {
        &self.descriptor
    }

    /// The access flags
    pub fn flags(&self) -> AccessFlags {
        self.flags
    }

    /// Field or method
    pub fn kind(&self) -> MemberKind {
        match self.signature {
            Signature::Field(_) => MemberKind::Field,
            Signature::Method { .. } => MemberKind::Method,
        }
    }

    /// Returns true for fields
    pub fn is_field(&self) -> bool {
        self.kind() == MemberKind::Field
    }

    /// Returns true for methods
    pub fn is_method(&self) -> bool {
        self.kind() == MemberKind::Method
    }

    /// Returns true for instance initializers
    pub fn is_constructor(&self) -> bool {
        self.is_method() && self.has_name(CONSTRUCTOR_NAME)
    }

    /// The type of a field
    pub fn field_type(&self) -> Option<&TypeRef> {
        match &self.signature {
            Signature::Field(ty) => Some(ty),
            Signature::Method { .. } => None,
        }
    }

    /// The return type of a method
    pub fn return_type(&self) -> Option<&TypeRef> {
        match &self.signature {
            Signature::Method { return_type, .. } => Some(return_type),
            Signature::Field(_) => None,
        }
    }

    /// The number of parameters of a method
    pub fn parameter_count(&self) -> Option<usize> {
        match self.signature {
            Signature::Method {
                parameter_count, ..
            } => Some(parameter_count),
            Signature::Field(_) => None,
        }
    }

    /// The parameter types of a method, in declaration order. Empty for fields.
    pub fn parameter_types(&self) -> Vec<TypeRef> {
        let Some(count) = self.parameter_count() else {
            return Vec::new();
        };

        let mut collector = ParameterCollector::with_capacity(count);
        // The descriptor parsed once already in `method`.
        match descriptor::parse_method_descriptor(&self.descriptor.as_str_lossy(), &mut collector) {
            Ok(_) => collector.into_parameters(),
            Err(_) => Vec::new(),
        }
    }

    /// The parenthesised parameter part of a method descriptor, e.g. `(IJ)`
    pub fn parameter_descriptor(&self) -> Option<String> {
        if !self.is_method() {
            return None;
        }
        let descriptor = self.descriptor.as_str_lossy();
        descriptor.rfind(')').map(|end| descriptor[..=end].to_owned())
    }
}

impl PartialEq for MemberRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.descriptor == other.descriptor
    }
}

impl Eq for MemberRef {}

impl Hash for MemberRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.descriptor.hash(state);
    }
}

impl PartialOrd for MemberRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Constructors first, then by name, then by descriptor.
impl Ord for MemberRef {
    fn cmp(&self, other: &Self) -> Ordering {
        let this_ctor = self.has_name(CONSTRUCTOR_NAME);
        let other_ctor = other.has_name(CONSTRUCTOR_NAME);
        other_ctor
            .cmp(&this_ctor)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.descriptor.cmp(&other.descriptor))
    }
}

#[derive(Default)]
struct ReturnTypeCapture(Option<TypeRef>);

impl DescriptorVisitor for ReturnTypeCapture {
    fn visit_return_type(&mut self, ty: TypeRef) {
        self.0 = Some(ty);
    }
}
