//! Field and method descriptor grammar.
//!
//! ```text
//! FieldDescriptor  := BaseType | 'L' ClassName ';' | '[' FieldDescriptor
//! BaseType         := 'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z'
//! MethodDescriptor := '(' FieldDescriptor* ')' ReturnType
//! ReturnType       := FieldDescriptor | 'V'
//! ```
//!
//! Method descriptors are parsed in a single pass that reports through a
//! [`DescriptorVisitor`]. The parameter count is always returned; a visitor
//! decides whether parameter types are built at all, so counting parameters
//! never allocates array wrappers or class references.

use crate::error::DescriptorError;
use crate::reference::{ClassRef, Primitive, TypeRef};
use std::fmt;

/// Receives the pieces of a method descriptor as they are parsed.
///
/// Every method has a no-op default, so implementors only override what
/// they need.
pub trait DescriptorVisitor {
    /// Whether parameter types should be materialized and passed to
    /// [`visit_parameter`](Self::visit_parameter)
    fn wants_parameters(&self) -> bool {
        false
    }

    /// Called once per parameter, in order
    fn visit_parameter(&mut self, ty: TypeRef) {
        let _ = ty;
    }

    /// Called once with the return type
    fn visit_return_type(&mut self, ty: TypeRef) {
        let _ = ty;
    }
}

/// A visitor that only validates; use the returned count
pub struct CountOnly;

impl DescriptorVisitor for CountOnly {}

/// A visitor that collects parameter types
#[derive(Debug, Default)]
pub struct ParameterCollector {
    parameters: Vec<TypeRef>,
}

impl ParameterCollector {
    /// Creates a collector with room for `capacity` parameters
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parameters: Vec::with_capacity(capacity),
        }
    }

    /// The parameters seen so far
    pub fn into_parameters(self) -> Vec<TypeRef> {
        self.parameters
    }
}

impl DescriptorVisitor for ParameterCollector {
    fn wants_parameters(&self) -> bool {
        true
    }

    fn visit_parameter(&mut self, ty: TypeRef) {
        self.parameters.push(ty);
    }
}

/// A fully parsed method descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub parameters: Vec<TypeRef>,
    /// Return type, possibly `void`
    pub return_type: TypeRef,
}

impl MethodDescriptor {
    /// Parses a method descriptor such as `(IJLjava/lang/String;)V`
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        #[derive(Default)]
        struct Full {
            parameters: Vec<TypeRef>,
            return_type: Option<TypeRef>,
        }

        impl DescriptorVisitor for Full {
            fn wants_parameters(&self) -> bool {
                true
            }

            fn visit_parameter(&mut self, ty: TypeRef) {
                self.parameters.push(ty);
            }

            fn visit_return_type(&mut self, ty: TypeRef) {
                self.return_type = Some(ty);
            }
        }

        let mut full = Full::default();
        parse_method_descriptor(descriptor, &mut full)?;
        let return_type = full
            .return_type
            .ok_or_else(|| DescriptorError::new(descriptor, "missing return type"))?;

        Ok(Self {
            parameters: full.parameters,
            return_type,
        })
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for p in &self.parameters {
            write!(f, "{}", p)?;
        }
        write!(f, "){}", self.return_type)
    }
}

/// Parses a field descriptor. `V` is rejected.
pub fn parse_field_descriptor(descriptor: &str) -> Result<TypeRef, DescriptorError> {
    parse_single(descriptor, false)
}

/// Parses a method descriptor, reporting to `visitor`, and returns the
/// number of parameters.
pub fn parse_method_descriptor<V>(descriptor: &str, visitor: &mut V) -> Result<usize, DescriptorError>
where
    V: DescriptorVisitor + ?Sized,
{
    let bytes = descriptor.as_bytes();
    if bytes.len() < 3 {
        return Err(DescriptorError::new(descriptor, "length < 3"));
    }
    if bytes[0] != b'(' {
        return Err(DescriptorError::new(descriptor, "[0] != '('"));
    }

    let materialize = visitor.wants_parameters();
    let mut i = 1;
    let mut parameter_count = 0;
    let mut array_depth = 0;

    loop {
        let Some(&c) = bytes.get(i) else {
            return Err(DescriptorError::new(descriptor, "missing end parenthesis"));
        };

        match c {
            b')' => {
                if array_depth != 0 {
                    return Err(DescriptorError::new(
                        descriptor,
                        "array char [ does not precede another descriptor",
                    ));
                }
                break;
            }
            b'[' => {
                array_depth += 1;
                i += 1;
                continue;
            }
            _ => {}
        }

        let (base, next) = read_base(descriptor, i, materialize, false)?;
        if let Some(base) = base {
            visitor.visit_parameter(wrap_array(base, array_depth));
        }
        array_depth = 0;
        parameter_count += 1;
        i = next;
    }

    let return_type = parse_single(&descriptor[i + 1..], true).map_err(|e| {
        DescriptorError::new(descriptor, format!("invalid return type: {}", e.details))
    })?;
    visitor.visit_return_type(return_type);

    Ok(parameter_count)
}

/// Counts the parameters of a method descriptor without building their types
pub fn parameter_count(descriptor: &str) -> Result<usize, DescriptorError> {
    parse_method_descriptor(descriptor, &mut CountOnly)
}

/// Checks class notation such as `Ljava/lang/Object;`
pub fn validate_class_notation(notation: &str) -> Result<(), DescriptorError> {
    let error = |details: &str| -> Result<(), DescriptorError> {
        Err(DescriptorError::new(
            notation,
            format!("invalid class notation: {}", details),
        ))
    };

    let bytes = notation.as_bytes();
    let len = bytes.len();
    if len < 3 {
        return error("length < 3");
    }
    if bytes[0] != b'L' {
        return error("[0] != 'L'");
    }
    if bytes[len - 1] != b';' {
        return error("[-1] != ';'");
    }
    if bytes[1] == b'/' {
        return error("[1] == '/'");
    }
    if bytes[len - 2] == b'/' {
        return error("[-2] == '/'");
    }
    if bytes[1..len - 1].contains(&b';') {
        return error("';' inside class name");
    }
    Ok(())
}

/// Parses exactly one descriptor spanning all of `s`.
fn parse_single(s: &str, allow_void: bool) -> Result<TypeRef, DescriptorError> {
    if s.is_empty() {
        return Err(DescriptorError::new(s, "empty descriptor"));
    }

    let depth = s.bytes().take_while(|&b| b == b'[').count();
    if depth == s.len() {
        return Err(DescriptorError::new(
            s,
            "array char [ does not precede another descriptor",
        ));
    }

    let (base, next) = read_base(s, depth, true, allow_void && depth == 0)?;
    if next != s.len() {
        return Err(DescriptorError::new(
            s,
            format!("unexpected trailing characters \"{}\"", &s[next..]),
        ));
    }

    // `read_base` always materializes when asked to.
    let base = base.ok_or_else(|| DescriptorError::new(s, "missing type"))?;
    Ok(wrap_array(base, depth))
}

/// Reads one non-array descriptor starting at byte `i`, returning it (when
/// `materialize` is set) and the index just past it.
fn read_base(
    descriptor: &str,
    i: usize,
    materialize: bool,
    allow_void: bool,
) -> Result<(Option<TypeRef>, usize), DescriptorError> {
    let bytes = descriptor.as_bytes();

    if bytes[i] == b'L' {
        let Some(offset) = bytes[i + 1..].iter().position(|&b| b == b';') else {
            return Err(DescriptorError::new(descriptor, "char L is not closed by char ;"));
        };
        let end = i + 1 + offset;
        let notation = &descriptor[i..=end];

        validate_class_notation(notation)
            .map_err(|e| DescriptorError::new(descriptor, e.details))?;

        let ty = if materialize {
            let internal = &notation[1..notation.len() - 1];
            Some(TypeRef::Class(ClassRef::new(internal.replace('/', "."))))
        } else {
            None
        };
        return Ok((ty, end + 1));
    }

    // Structural characters are ASCII, so `i` is always a char boundary.
    let c = descriptor[i..].chars().next().unwrap_or('\0');
    match Primitive::from_code(c) {
        Some(Primitive::Void) if !allow_void => Err(DescriptorError::new(
            descriptor,
            "void is only permitted as a return type",
        )),
        Some(p) => Ok((materialize.then_some(TypeRef::Primitive(p)), i + 1)),
        None => Err(DescriptorError::new(descriptor, format!("illegal char: {}", c))),
    }
}

fn wrap_array(mut ty: TypeRef, depth: usize) -> TypeRef {
    for _ in 0..depth {
        ty = TypeRef::array_of(ty);
    }
    ty
}
