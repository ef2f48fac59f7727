//! Tagged records of the class file grammar.
//!
//! ## Constant pool tags
//!
//! | Tag | Entry | Payload | Kept as |
//! |-----|-------|---------|---------|
//! | 1 | Utf8 | u2 length, bytes | literal |
//! | 3, 4 | Integer, Float | u4 | nothing |
//! | 5, 6 | Long, Double | 2 × u4 | nothing |
//! | 7, 8, 16, 19, 20 | Class, String, MethodType, Module, Package | u2 | single indirection |
//! | 9, 10, 11, 12 | Fieldref, Methodref, InterfaceMethodref, NameAndType | 2 × u2 | pair indirection |
//! | 15 | MethodHandle | u1, u2 | nothing |
//! | 17, 18 | Dynamic, InvokeDynamic | 2 × u2 | nothing |
//!
//! ## Element values
//!
//! Annotation element values are skipped without being decoded. Only their
//! extent matters.

use crate::error::{ReadError, Result};
use crate::pool::PoolEntry;
use crate::reader::ClassReader;
use std::io::Read;
use tracing::debug;

/// Maximum nesting of annotation element values (arrays and nested annotations)
pub const MAX_ELEMENT_VALUE_DEPTH: usize = 256;

/// Constant pool entry tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConstantTag {
    /// Modified UTF-8 text
    Utf8 = 1,
    /// 32-bit integer
    Integer = 3,
    /// 32-bit float
    Float = 4,
    /// 64-bit integer
    Long = 5,
    /// 64-bit float
    Double = 6,
    /// Class or interface by internal name
    Class = 7,
    /// String literal
    String = 8,
    /// Field reference
    Fieldref = 9,
    /// Class method reference
    Methodref = 10,
    /// Interface method reference
    InterfaceMethodref = 11,
    /// Name and descriptor pair
    NameAndType = 12,
    /// Method handle
    MethodHandle = 15,
    /// Method type by descriptor
    MethodType = 16,
    /// Dynamically computed constant
    Dynamic = 17,
    /// Dynamically computed call site
    InvokeDynamic = 18,
    /// Module by name
    Module = 19,
    /// Package by internal name
    Package = 20,
}

impl TryFrom<u8> for ConstantTag {
    type Error = ReadError;

    fn try_from(value: u8) -> std::result::Result<Self, ReadError> {
        match value {
            1 => Ok(Self::Utf8),
            3 => Ok(Self::Integer),
            4 => Ok(Self::Float),
            5 => Ok(Self::Long),
            6 => Ok(Self::Double),
            7 => Ok(Self::Class),
            8 => Ok(Self::String),
            9 => Ok(Self::Fieldref),
            10 => Ok(Self::Methodref),
            11 => Ok(Self::InterfaceMethodref),
            12 => Ok(Self::NameAndType),
            15 => Ok(Self::MethodHandle),
            16 => Ok(Self::MethodType),
            17 => Ok(Self::Dynamic),
            18 => Ok(Self::InvokeDynamic),
            19 => Ok(Self::Module),
            20 => Ok(Self::Package),
            _ => Err(ReadError::invalid_data(format!(
                "unrecognized constant pool info tag: {}",
                value
            ))),
        }
    }
}

impl ConstantTag {
    /// Long and Double, which nominally occupy two pool slots
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Long | Self::Double)
    }

    /// Reads the payload that follows this tag
    pub(crate) fn read_entry<R: Read>(self, reader: &mut ClassReader<R>) -> Result<Option<PoolEntry>> {
        let entry = match self {
            Self::Utf8 => Some(PoolEntry::Literal(reader.read_modified_utf8()?)),
            Self::Integer | Self::Float => {
                reader.skip_u4()?;
                None
            }
            Self::Long | Self::Double => {
                reader.skip_u4()?;
                reader.skip_u4()?;
                None
            }
            Self::Class | Self::String | Self::MethodType | Self::Module | Self::Package => {
                Some(PoolEntry::single(reader.read_u2()?))
            }
            Self::Fieldref | Self::Methodref | Self::InterfaceMethodref | Self::NameAndType => {
                let first = reader.read_u2()?;
                let second = reader.read_u2()?;
                Some(PoolEntry::pair(first, second))
            }
            Self::MethodHandle => {
                reader.skip_u1()?;
                reader.skip_u2()?;
                None
            }
            Self::Dynamic | Self::InvokeDynamic => {
                reader.skip_u2()?;
                reader.skip_u2()?;
                None
            }
        };
        Ok(entry)
    }
}

/// Skips `count` element-value pairs
pub(crate) fn skip_element_value_pairs<R: Read>(
    reader: &mut ClassReader<R>,
    count: u16,
    depth: usize,
) -> Result<()> {
    for _ in 0..count {
        reader.skip_u2()?; // element_name_index
        skip_element_value(reader, depth)?;
    }
    Ok(())
}

/// Skips one element value.
///
/// A tag outside the grammar is tolerated and consumes nothing beyond the
/// tag byte itself.
pub(crate) fn skip_element_value<R: Read>(reader: &mut ClassReader<R>, depth: usize) -> Result<()> {
    if depth > MAX_ELEMENT_VALUE_DEPTH {
        return Err(ReadError::invalid_data(format!(
            "element values nested deeper than {}",
            MAX_ELEMENT_VALUE_DEPTH
        ))
        .into());
    }

    match reader.read_u1()? {
        b'e' => {
            reader.skip_u2()?; // type_name_index
            reader.skip_u2()?; // const_name_index
        }
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => {
            reader.skip_u2()?;
        }
        b'@' => {
            reader.skip_u2()?; // type_index
            let pairs = reader.read_u2()?;
            skip_element_value_pairs(reader, pairs, depth + 1)?;
        }
        b'[' => {
            let values = reader.read_u2()?;
            for _ in 0..values {
                skip_element_value(reader, depth + 1)?;
            }
        }
        other => {
            debug!(
                "Ignoring unknown element value tag 0x{:02X} at offset {}",
                other,
                reader.offset() - 1
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_constant_tag_conversion() {
        assert_eq!(ConstantTag::try_from(1).unwrap(), ConstantTag::Utf8);
        assert_eq!(ConstantTag::try_from(20).unwrap(), ConstantTag::Package);
        assert!(ConstantTag::Long.is_wide());
        assert!(!ConstantTag::Integer.is_wide());

        for bad in [0, 2, 13, 14, 21, 255] {
            let err = ConstantTag::try_from(bad).unwrap_err();
            assert!(err.to_string().contains(&format!("tag: {}", bad)));
        }
    }

    #[test]
    fn test_read_entry_shapes() {
        let data = [0x00, 0x03, 0x00, 0x04, 0x00, 0x09];
        let mut reader = ClassReader::new(&data[..]);
        assert_eq!(
            ConstantTag::NameAndType.read_entry(&mut reader).unwrap(),
            Some(PoolEntry::pair(3, 4))
        );
        assert_eq!(
            ConstantTag::Class.read_entry(&mut reader).unwrap(),
            Some(PoolEntry::single(9))
        );
    }

    #[test]
    fn test_read_entry_skips_numeric_payloads() {
        let data = [0u8; 8 + 4 + 3 + 4];
        let mut reader = ClassReader::new(&data[..]);
        assert_eq!(ConstantTag::Double.read_entry(&mut reader).unwrap(), None);
        assert_eq!(reader.offset(), 8);
        assert_eq!(ConstantTag::Float.read_entry(&mut reader).unwrap(), None);
        assert_eq!(ConstantTag::MethodHandle.read_entry(&mut reader).unwrap(), None);
        assert_eq!(ConstantTag::InvokeDynamic.read_entry(&mut reader).unwrap(), None);
        assert_eq!(reader.offset(), data.len() as u64);
    }

    #[test]
    fn test_skip_nested_element_values() {
        // [ { I, @(1 pair: e), s }
        #[rustfmt::skip]
        let data = [
            b'[', 0x00, 0x03,
            b'I', 0x00, 0x01,
            b'@', 0x00, 0x02, 0x00, 0x01,
                0x00, 0x03, b'e', 0x00, 0x04, 0x00, 0x05,
            b's', 0x00, 0x06,
            0xFF,
        ];
        let mut reader = ClassReader::new(&data[..]);
        skip_element_value(&mut reader, 0).unwrap();
        assert_eq!(reader.read_u1().unwrap(), 0xFF);
    }

    #[test]
    fn test_unknown_element_tag_consumes_only_tag() {
        let data = [b'Q', 0xAB];
        let mut reader = ClassReader::new(&data[..]);
        skip_element_value(&mut reader, 0).unwrap();
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn test_element_value_depth_limit() {
        let mut data = Vec::new();
        for _ in 0..=MAX_ELEMENT_VALUE_DEPTH + 1 {
            data.extend_from_slice(&[b'[', 0x00, 0x01]);
        }
        data.extend_from_slice(&[b'Z', 0x00, 0x00]);

        let err = skip_element_value(&mut ClassReader::new(&data[..]), 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Unprocessable(ReadError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_truncated_element_value() {
        let data = [b'@', 0x00, 0x02, 0x00];
        let err = skip_element_value(&mut ClassReader::new(&data[..]), 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Unprocessable(ReadError::IncompleteData { .. })
        ));
    }
}
