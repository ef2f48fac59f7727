//! Value types for the types and members a class file refers to.
//!
//! A [`TypeRef`] is a primitive, a class named by its fully-qualified binary
//! name, or an array of another `TypeRef`. Its [`Display`](std::fmt::Display)
//! output is the wire-format descriptor, so a parsed descriptor prints back
//! exactly as it was read:
//!
//! ```
//! use classpeek_core::reference::{Primitive, TypeRef};
//!
//! let ty = TypeRef::parse("[[I")?;
//! assert_eq!(ty, TypeRef::array_of(TypeRef::array_of(Primitive::Int.into())));
//! assert_eq!(ty.to_string(), "[[I");
//! assert_eq!(ty.name(), "int[][]");
//! # Ok::<(), classpeek_core::error::DescriptorError>(())
//! ```
//!
//! Members live in [`member`].

pub mod member;

use crate::descriptor;
use crate::error::DescriptorError;
use std::cmp::Ordering;
use std::fmt;

pub use member::{AccessFlags, MemberKind, MemberRef};

/// The nine primitive descriptor codes, `void` included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
    /// `V`, only valid as a method return type
    Void,
}

impl Primitive {
    /// All primitives, in descriptor-code order
    pub const ALL: [Primitive; 9] = [
        Primitive::Byte,
        Primitive::Char,
        Primitive::Double,
        Primitive::Float,
        Primitive::Int,
        Primitive::Long,
        Primitive::Short,
        Primitive::Boolean,
        Primitive::Void,
    ];

    /// Looks up a primitive by its descriptor code. `V` yields [`Primitive::Void`].
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'B' => Some(Self::Byte),
            'C' => Some(Self::Char),
            'D' => Some(Self::Double),
            'F' => Some(Self::Float),
            'I' => Some(Self::Int),
            'J' => Some(Self::Long),
            'S' => Some(Self::Short),
            'Z' => Some(Self::Boolean),
            'V' => Some(Self::Void),
            _ => None,
        }
    }

    /// The descriptor code
    pub fn code(self) -> char {
        match self {
            Self::Byte => 'B',
            Self::Char => 'C',
            Self::Double => 'D',
            Self::Float => 'F',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Short => 'S',
            Self::Boolean => 'Z',
            Self::Void => 'V',
        }
    }

    /// The source-level keyword, e.g. `int`
    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Double => "double",
            Self::Float => "float",
            Self::Int => "int",
            Self::Long => "long",
            Self::Short => "short",
            Self::Boolean => "boolean",
            Self::Void => "void",
        }
    }

    /// The wrapper class from `java.lang`
    pub fn boxed(self) -> ClassRef {
        let name = match self {
            Self::Byte => "java.lang.Byte",
            Self::Char => "java.lang.Character",
            Self::Double => "java.lang.Double",
            Self::Float => "java.lang.Float",
            Self::Int => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Short => "java.lang.Short",
            Self::Boolean => "java.lang.Boolean",
            Self::Void => "java.lang.Void",
        };
        ClassRef::new(name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A class named by its fully-qualified binary name (`java.lang.Object`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassRef {
    name: String,
}

impl ClassRef {
    /// Creates a reference from a dotted binary name. The name is not validated.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Parses class notation such as `Ljava/lang/Object;`
    pub fn from_descriptor(notation: &str) -> Result<Self, DescriptorError> {
        descriptor::validate_class_notation(notation)?;
        let internal = &notation[1..notation.len() - 1];
        Ok(Self::new(internal.replace('/', ".")))
    }

    /// Parses an internal name such as `java/lang/Object`
    pub fn from_internal_name(internal: &str) -> Result<Self, DescriptorError> {
        Self::from_descriptor(&format!("L{};", internal))
    }

    /// The fully-qualified name, e.g. `java.lang.Object`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without its package, e.g. `Object`
    pub fn simple_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(i) => &self.name[i + 1..],
            None => &self.name,
        }
    }

    /// The package, or `None` for the unnamed package
    pub fn package(&self) -> Option<&str> {
        self.name.rfind('.').map(|i| &self.name[..i])
    }

    /// The internal name, e.g. `java/lang/Object`
    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }

    /// The class notation, e.g. `Ljava/lang/Object;`
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{};", self.internal_name())
    }
}

/// A primitive, class or array type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive type or `void`
    Primitive(Primitive),
    /// A class or interface type
    Class(ClassRef),
    /// An array of the element type
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Parses a field descriptor such as `I`, `Ljava/lang/String;` or `[[J`
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        descriptor::parse_field_descriptor(descriptor)
    }

    /// Wraps `element` in one array dimension
    pub fn array_of(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// The element type if this is an array
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Returns true for primitives, `void` included
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Returns true for `void`
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Void))
    }

    /// Returns true for class types. Arrays are not classes here.
    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    /// Returns true for arrays
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Source-level name: `int`, `java.lang.String`, `int[]`
    pub fn name(&self) -> String {
        match self {
            Self::Primitive(p) => p.name().to_string(),
            Self::Class(c) => c.name().to_string(),
            Self::Array(element) => format!("{}[]", element.name()),
        }
    }

    /// Like [`name`](Self::name) with packages stripped
    pub fn simple_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.name().to_string(),
            Self::Class(c) => c.simple_name().to_string(),
            Self::Array(element) => format!("{}[]", element.simple_name()),
        }
    }

    /// The wire-format descriptor
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<ClassRef> for TypeRef {
    fn from(c: ClassRef) -> Self {
        Self::Class(c)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::Class(c) => write!(f, "{}", c),
            Self::Array(element) => write!(f, "[{}", element),
        }
    }
}

impl PartialOrd for TypeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Non-arrays sort before arrays and primitives before classes; ties are
/// broken by descriptor.
impl Ord for TypeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => a.cmp(b),
            (Self::Array(_), _) => Ordering::Greater,
            (_, Self::Array(_)) => Ordering::Less,
            (Self::Primitive(_), Self::Class(_)) => Ordering::Less,
            (Self::Class(_), Self::Primitive(_)) => Ordering::Greater,
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}
