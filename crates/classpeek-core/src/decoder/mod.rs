//! Single-pass structural decoder for class files.
//!
//! ## Pass overview
//!
//! 1. Check the `CAFEBABE` magic byte by byte
//! 2. Skip the minor version and gate on the major version
//! 3. Read the constant pool, keeping only string-bearing entries
//! 4. Resolve `this_class` and skip the super class and interfaces
//! 5. Read fields and methods, collecting `RuntimeVisibleAnnotations`
//! 6. Read class-level attributes the same way
//!
//! Everything outside annotation metadata (code, signatures, debug tables)
//! is skipped by its declared length without being looked at.
//!
//! ```no_run
//! use classpeek_core::{Decoder, DecoderConfig};
//!
//! let decoder = Decoder::with_config(DecoderConfig::new().max_major_version(69));
//! let container = decoder.decode_file("target/classes/com/example/Widget.class")?;
//!
//! for annotation in container.annotations() {
//!     println!("@{}", annotation.name());
//! }
//! # Ok::<(), classpeek_core::Error>(())
//! ```

mod wire;

use crate::container::{ContainerBuilder, DecodedContainer};
use crate::error::{Error, ReadError, Result};
use crate::pool::ConstantPool;
use crate::reader::ClassReader;
use crate::reference::member::STATIC_INITIALIZER_NAME;
use crate::reference::{AccessFlags, ClassRef, MemberKind, MemberRef};
use java_string::JavaStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, trace};

pub use wire::{ConstantTag, MAX_ELEMENT_VALUE_DEPTH};

/// Leading bytes of every class file
pub const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

/// Highest major version accepted by default (Java 21)
pub const DEFAULT_MAX_MAJOR_VERSION: u16 = 65;

/// The only attribute whose contents are read
pub const ANNOTATIONS_ATTRIBUTE: &str = "RuntimeVisibleAnnotations";

/// Configuration for the decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Class files with a newer major version are rejected
    pub max_major_version: u16,
    /// Let Long and Double entries occupy two pool slots
    pub reserve_wide_slots: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_major_version: DEFAULT_MAX_MAJOR_VERSION,
            reserve_wide_slots: false,
        }
    }
}

impl DecoderConfig {
    /// Creates a new decoder config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the highest accepted major version
    pub fn max_major_version(mut self, version: u16) -> Self {
        self.max_major_version = version;
        self
    }

    /// Sets whether Long and Double entries take up the following slot too
    pub fn reserve_wide_slots(mut self, reserve: bool) -> Self {
        self.reserve_wide_slots = reserve;
        self
    }
}

/// Decodes class files into [`DecodedContainer`]s
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a new decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new decoder with custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes one class file from a forward-only byte source.
    ///
    /// Reads exactly as far as the end of the class-level attributes. I/O
    /// faults from `source` come back as [`Error::Io`]; anything wrong with
    /// the bytes themselves comes back as [`Error::Unprocessable`].
    pub fn decode<R: Read>(&self, source: R) -> Result<DecodedContainer> {
        let mut reader = ClassReader::new(source);

        read_magic(&mut reader)?;
        reader.skip_u2()?; // minor_version
        self.read_major_version(&mut reader)?;

        let pool = self.read_constant_pool(&mut reader)?;

        let this_class = reader.read_u2()?;
        let internal_name = pool.resolve(this_class, &[1])?;
        let declared_type = class_from_notation(format!("L{};", internal_name.as_str_lossy()))?;
        debug!("Decoding {}", declared_type.name());

        reader.skip_u2()?; // super_class
        let interfaces = reader.read_u2()?;
        reader.skip(2 * u64::from(interfaces))?;

        let mut builder = DecodedContainer::builder(declared_type);

        let fields = reader.read_u2()?;
        for _ in 0..fields {
            read_member(&mut reader, &pool, &mut builder, MemberKind::Field)?;
        }

        let methods = reader.read_u2()?;
        for _ in 0..methods {
            read_member(&mut reader, &pool, &mut builder, MemberKind::Method)?;
        }
        debug!("Read {} fields and {} methods", fields, methods);

        read_annotations(&mut reader, &pool, |annotation| {
            builder.add_annotation(annotation);
        })?;

        trace!("Decode complete after {} bytes", reader.offset());
        Ok(builder.build())
    }

    /// Decodes a class file held in memory
    pub fn decode_bytes(&self, data: &[u8]) -> Result<DecodedContainer> {
        self.decode(data)
    }

    /// Opens and decodes a class file
    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<DecodedContainer> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
        trace!("Opened {}", path.display());
        self.decode(BufReader::new(file))
    }

    fn read_major_version<R: Read>(&self, reader: &mut ClassReader<R>) -> Result<()> {
        let major = reader.read_u2()?;
        let max = self.config.max_major_version;
        if major > max {
            return Err(ReadError::UnsupportedVersion { major, max }.into());
        }
        trace!("Class file major version {}", major);
        Ok(())
    }

    /// Reads the pool and the access flags that follow it.
    ///
    /// A zero tag ends the pool before the declared count is reached. When
    /// that happens only one byte of access flags follows.
    fn read_constant_pool<R: Read>(&self, reader: &mut ClassReader<R>) -> Result<ConstantPool> {
        let count = reader.read_u2()?;
        if count == 0 {
            return Err(ReadError::invalid_data("constant pool size is 0").into());
        }

        let mut pool = ConstantPool::with_count(count);
        let mut index = 1u32;
        let mut terminated_early = false;

        while index < u32::from(count) {
            let raw = reader.read_u1()?;
            if raw == 0 {
                debug!("Constant pool terminated by zero tag at entry {} of {}", index, count);
                terminated_early = true;
                break;
            }

            let tag = ConstantTag::try_from(raw)?;
            if let Some(entry) = tag.read_entry(reader)? {
                // index < count, so it fits
                pool.set(index as u16, entry)?;
            }

            index += 1;
            if tag.is_wide() && self.config.reserve_wide_slots {
                index += 1;
            }
        }

        if terminated_early {
            reader.skip_u1()?; // access_flags
        } else {
            reader.skip_u2()?; // access_flags
        }

        debug!("Read constant pool with {} slots", pool.len());
        Ok(pool)
    }
}

/// Decodes a class file with the default configuration
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedContainer> {
    Decoder::new().decode_file(path)
}

fn read_magic<R: Read>(reader: &mut ClassReader<R>) -> Result<()> {
    for (offset, &expected) in MAGIC.iter().enumerate() {
        match reader.next_byte()? {
            None => {
                return Err(ReadError::malformed_header(offset, "unexpected end of stream").into())
            }
            Some(found) if found != expected => {
                return Err(ReadError::malformed_header(
                    offset,
                    format!("expected 0x{:02X}, got 0x{:02X}", expected, found),
                )
                .into())
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn read_member<R: Read>(
    reader: &mut ClassReader<R>,
    pool: &ConstantPool,
    builder: &mut ContainerBuilder,
    kind: MemberKind,
) -> Result<()> {
    let flags = AccessFlags::from_raw(reader.read_u2()?);
    let name = pool.resolve_str(reader.read_u2()?)?;
    let descriptor = pool.resolve_str(reader.read_u2()?)?;

    if kind == MemberKind::Method && is_named(name, STATIC_INITIALIZER_NAME) {
        trace!("Skipping static initializer");
        return read_annotations(reader, pool, |_| {});
    }

    let declaring_type = builder.declared_type().clone();
    let member = match kind {
        MemberKind::Field => {
            MemberRef::field(declaring_type, name.to_owned(), descriptor.to_owned(), flags)?
        }
        MemberKind::Method => {
            MemberRef::method(declaring_type, name.to_owned(), descriptor.to_owned(), flags)?
        }
    };
    trace!(
        "Member {} {}",
        member.name().as_str_lossy(),
        member.descriptor().as_str_lossy()
    );

    builder.add_member(member.clone());
    read_annotations(reader, pool, |annotation| {
        builder.add_member_annotation(&member, annotation);
    })
}

/// Reads an attribute table, passing the type of every runtime-visible
/// annotation to `on_annotation`. All other attributes are skipped.
fn read_annotations<R, F>(reader: &mut ClassReader<R>, pool: &ConstantPool, mut on_annotation: F) -> Result<()>
where
    R: Read,
    F: FnMut(ClassRef),
{
    let count = reader.read_u2()?;
    for _ in 0..count {
        let name = pool.resolve_str(reader.read_u2()?)?;
        if !is_named(name, ANNOTATIONS_ATTRIBUTE) {
            let length = reader.read_u4()?;
            trace!("Skipping attribute {} ({} bytes)", name.as_str_lossy(), length);
            reader.skip(u64::from(length))?;
            continue;
        }

        reader.skip_u4()?; // attribute_length
        let annotations = reader.read_u2()?;
        for _ in 0..annotations {
            let type_index = reader.read_u2()?;
            let notation = pool.resolve(type_index, &[1])?;
            on_annotation(class_from_notation(notation.as_str_lossy().into_owned())?);

            let pairs = reader.read_u2()?;
            wire::skip_element_value_pairs(reader, pairs, 0)?;
        }
    }
    Ok(())
}

/// Exact comparison; text with an unpaired surrogate never matches
fn is_named(value: &JavaStr, name: &str) -> bool {
    value.as_str().is_ok_and(|v| v == name)
}

fn class_from_notation(notation: String) -> Result<ClassRef> {
    ClassRef::from_descriptor(&notation).map_err(|e| {
        ReadError::invalid_data_caused_by(
            format!("invalid class reference \"{}\" in constant pool", notation),
            e,
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Primitive, TypeRef};
    use pretty_assertions::assert_eq;
    use std::io;

    /// Assembles class files entry by entry
    struct ClassBytes {
        major: u16,
        pool: Vec<u8>,
        next_index: u16,
        zero_tag_padding: Option<u16>,
        this_class: u16,
        fields: Vec<u8>,
        field_count: u16,
        methods: Vec<u8>,
        method_count: u16,
        attributes: Vec<u8>,
        attribute_count: u16,
    }

    impl ClassBytes {
        fn new(internal_name: &str) -> Self {
            let mut class = Self {
                major: 52,
                pool: Vec::new(),
                next_index: 1,
                zero_tag_padding: None,
                this_class: 0,
                fields: Vec::new(),
                field_count: 0,
                methods: Vec::new(),
                method_count: 0,
                attributes: Vec::new(),
                attribute_count: 0,
            };
            class.this_class = class.class(internal_name);
            class
        }

        fn entry(&mut self, bytes: &[u8], slots: u16) -> u16 {
            self.pool.extend_from_slice(bytes);
            let index = self.next_index;
            self.next_index += slots;
            index
        }

        fn utf8(&mut self, s: &str) -> u16 {
            self.utf8_raw(s.as_bytes())
        }

        /// A `Utf8` entry holding exactly these bytes
        fn utf8_raw(&mut self, raw: &[u8]) -> u16 {
            let mut bytes = vec![1];
            bytes.extend_from_slice(&(raw.len() as u16).to_be_bytes());
            bytes.extend_from_slice(raw);
            self.entry(&bytes, 1)
        }

        fn class(&mut self, internal_name: &str) -> u16 {
            let name = self.utf8(internal_name);
            let [hi, lo] = name.to_be_bytes();
            self.entry(&[7, hi, lo], 1)
        }

        fn long(&mut self, slots: u16) -> u16 {
            self.entry(&[5, 0, 0, 0, 0, 0, 0, 0, 42], slots)
        }

        /// A complete `RuntimeVisibleAnnotations` attribute
        fn annotations(&mut self, descriptors: &[&str]) -> Vec<u8> {
            let mut body = (descriptors.len() as u16).to_be_bytes().to_vec();
            for d in descriptors {
                body.extend_from_slice(&self.utf8(d).to_be_bytes());
                body.extend_from_slice(&0u16.to_be_bytes());
            }
            self.attribute(ANNOTATIONS_ATTRIBUTE, &body)
        }

        fn attribute(&mut self, name: &str, body: &[u8]) -> Vec<u8> {
            let mut bytes = self.utf8(name).to_be_bytes().to_vec();
            bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
            bytes.extend_from_slice(body);
            bytes
        }

        fn member(&mut self, flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) -> Vec<u8> {
            let name = self.utf8(name);
            self.member_at(flags, name, descriptor, attributes)
        }

        fn member_at(&mut self, flags: u16, name: u16, descriptor: &str, attributes: &[Vec<u8>]) -> Vec<u8> {
            let mut bytes = flags.to_be_bytes().to_vec();
            bytes.extend_from_slice(&name.to_be_bytes());
            bytes.extend_from_slice(&self.utf8(descriptor).to_be_bytes());
            bytes.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
            for a in attributes {
                bytes.extend_from_slice(a);
            }
            bytes
        }

        fn field(&mut self, flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) -> &mut Self {
            let bytes = self.member(flags, name, descriptor, attributes);
            self.fields.extend_from_slice(&bytes);
            self.field_count += 1;
            self
        }

        /// A field whose name is given as raw modified UTF-8
        fn field_raw(&mut self, flags: u16, name: &[u8], descriptor: &str, attributes: &[Vec<u8>]) -> &mut Self {
            let name = self.utf8_raw(name);
            let bytes = self.member_at(flags, name, descriptor, attributes);
            self.fields.extend_from_slice(&bytes);
            self.field_count += 1;
            self
        }

        fn method(&mut self, flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) -> &mut Self {
            let bytes = self.member(flags, name, descriptor, attributes);
            self.methods.extend_from_slice(&bytes);
            self.method_count += 1;
            self
        }

        fn class_attribute(&mut self, attribute: Vec<u8>) -> &mut Self {
            self.attributes.extend_from_slice(&attribute);
            self.attribute_count += 1;
            self
        }

        fn build(&self) -> Vec<u8> {
            let mut out = MAGIC.to_vec();
            out.extend_from_slice(&0u16.to_be_bytes());
            out.extend_from_slice(&self.major.to_be_bytes());

            let declared = self.next_index + self.zero_tag_padding.unwrap_or(0);
            out.extend_from_slice(&declared.to_be_bytes());
            out.extend_from_slice(&self.pool);
            match self.zero_tag_padding {
                Some(_) => out.extend_from_slice(&[0x00, 0x21]),
                None => out.extend_from_slice(&0x0021u16.to_be_bytes()),
            }

            out.extend_from_slice(&self.this_class.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // super_class
            out.extend_from_slice(&1u16.to_be_bytes()); // one interface
            out.extend_from_slice(&0u16.to_be_bytes());

            out.extend_from_slice(&self.field_count.to_be_bytes());
            out.extend_from_slice(&self.fields);
            out.extend_from_slice(&self.method_count.to_be_bytes());
            out.extend_from_slice(&self.methods);
            out.extend_from_slice(&self.attribute_count.to_be_bytes());
            out.extend_from_slice(&self.attributes);
            out
        }
    }

    fn read_error(result: Result<DecodedContainer>) -> ReadError {
        match result {
            Err(Error::Unprocessable(e)) => e,
            Err(other) => panic!("expected a read error, got {:?}", other),
            Ok(c) => panic!("expected a read error, decoded {}", c.name()),
        }
    }

    fn widget() -> Vec<u8> {
        let mut class = ClassBytes::new("com/example/Widget");
        let component = class.annotations(&["Lcom/example/Component;"]);
        let key = class.annotations(&["Lcom/example/Key;"]);
        let action = class.annotations(&["Lcom/example/Action;", "Ljava/lang/Deprecated;"]);
        let code = class.attribute("Code", &[0xDE, 0xAD, 0xBE, 0xEF]);
        let source = class.attribute("SourceFile", &[0x00, 0x01]);

        class
            .field(0x0002, "id", "J", &[key])
            .field(0x0001, "label", "Ljava/lang/String;", &[])
            .method(0x0001, "<init>", "()V", &[code.clone()])
            .method(0x0008, "<clinit>", "()V", &[code.clone()])
            .method(0x0001, "resize", "(II)V", &[code, action])
            .class_attribute(source)
            .class_attribute(component);
        class.build()
    }

    #[test]
    fn test_decode_widget() {
        let c = Decoder::new().decode_bytes(&widget()).unwrap();

        assert_eq!(c.name(), "com.example.Widget");
        assert_eq!(c.annotations(), &[ClassRef::new("com.example.Component")]);
        assert_eq!(
            c.field_annotations("id"),
            Some(&[ClassRef::new("com.example.Key")][..])
        );
        assert_eq!(c.field_annotations("label"), Some(&[][..]));

        let int = TypeRef::Primitive(Primitive::Int);
        assert_eq!(
            c.method_annotations("resize", &[int.clone(), int]),
            Some(
                &[
                    ClassRef::new("com.example.Action"),
                    ClassRef::new("java.lang.Deprecated")
                ][..]
            )
        );

        let members: Vec<&str> = c.members().map(|m| m.name().as_str().unwrap()).collect();
        assert_eq!(members, vec!["<init>", "id", "label", "resize"]);
        assert!(c.field("id").unwrap().flags().is_private());
        assert_eq!(c.members().next().unwrap().declaring_type(), c.declared_type());
    }

    #[test]
    fn test_static_initializer_discarded() {
        let c = Decoder::new().decode_bytes(&widget()).unwrap();
        assert!(c.methods().all(|m| !m.has_name(STATIC_INITIALIZER_NAME)));
        assert_eq!(c.methods().count(), 2);
    }

    #[test]
    fn test_single_field_annotation() {
        let mut class = ClassBytes::new("a/B");
        let marker = class.annotations(&["La/Marker;"]);
        class.field(0, "x", "I", &[marker]);

        let c = Decoder::new().decode_bytes(&class.build()).unwrap();
        assert_eq!(c.field_annotations("x").map(<[_]>::len), Some(1));
        assert!(c.annotations().is_empty());
    }

    #[test]
    fn test_unpaired_surrogate_field_names_stay_distinct() {
        // U+D800 and U+D801 as lone three-byte halves
        let first = [0xED, 0xA0, 0x80];
        let second = [0xED, 0xA0, 0x81];

        let mut class = ClassBytes::new("a/B");
        let marker = class.annotations(&["La/Marker;"]);
        class
            .field_raw(0, &first, "I", &[marker])
            .field_raw(0, &second, "I", &[]);

        let c = Decoder::new().decode_bytes(&class.build()).unwrap();
        assert_eq!(c.fields().count(), 2);
        assert!(c.has_annotations());

        let annotated: Vec<_> = c
            .annotated_members()
            .filter(|(_, annotations)| !annotations.is_empty())
            .collect();
        assert_eq!(annotated.len(), 1);
        let (member, annotations) = annotated[0];
        assert_eq!(member.name(), &*JavaStr::from_modified_utf8(&first).unwrap());
        assert_eq!(annotations, &[ClassRef::new("a.Marker")]);
    }

    #[test]
    fn test_bad_magic() {
        let err = read_error(Decoder::new().decode_bytes(&[0xCA, 0xFE, 0xBA, 0xBD]));
        assert!(matches!(err, ReadError::MalformedHeader { offset: 3, .. }));
        assert!(err.to_string().contains("0xBD"));
    }

    #[test]
    fn test_short_magic() {
        for len in 0..MAGIC.len() {
            let err = read_error(Decoder::new().decode_bytes(&MAGIC[..len]));
            assert!(
                matches!(err, ReadError::MalformedHeader { offset, .. } if offset == len),
                "{len}: {err}"
            );
        }
    }

    #[test]
    fn test_version_ceiling() {
        let mut class = ClassBytes::new("a/B");
        class.major = DEFAULT_MAX_MAJOR_VERSION;
        assert!(Decoder::new().decode_bytes(&class.build()).is_ok());

        class.major = DEFAULT_MAX_MAJOR_VERSION + 1;
        let err = read_error(Decoder::new().decode_bytes(&class.build()));
        assert!(matches!(
            err,
            ReadError::UnsupportedVersion { major: 66, max: 65 }
        ));

        let lenient = Decoder::with_config(DecoderConfig::new().max_major_version(70));
        assert!(lenient.decode_bytes(&class.build()).is_ok());
    }

    #[test]
    fn test_truncation_is_incomplete_data() {
        let bytes = widget();
        for len in MAGIC.len()..bytes.len() {
            let err = read_error(Decoder::new().decode_bytes(&bytes[..len]));
            assert!(
                matches!(err, ReadError::IncompleteData { .. }),
                "prefix of {len} bytes: {err}"
            );
        }
    }

    #[test]
    fn test_transport_fault_is_not_reinterpreted() {
        struct Reset;
        impl Read for Reset {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::ErrorKind::ConnectionReset.into())
            }
        }

        let bytes = widget();
        let source = (&bytes[..12]).chain(Reset);
        let err = Decoder::new().decode(source).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
    }

    #[test]
    fn test_zero_sized_pool() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 52, 0, 0]);
        let err = read_error(Decoder::new().decode_bytes(&bytes));
        assert!(err.to_string().contains("constant pool size is 0"));
    }

    #[test]
    fn test_unknown_pool_tag() {
        let mut class = ClassBytes::new("a/B");
        class.entry(&[2, 0, 0], 1);
        let err = read_error(Decoder::new().decode_bytes(&class.build()));
        assert!(err.to_string().contains("unrecognized constant pool info tag: 2"));
    }

    #[test]
    fn test_zero_tag_ends_pool_early() {
        let mut class = ClassBytes::new("com/example/Short");
        let marker = class.annotations(&["Lcom/example/Marker;"]);
        class.class_attribute(marker);
        class.zero_tag_padding = Some(4);

        let c = Decoder::new().decode_bytes(&class.build()).unwrap();
        assert_eq!(c.name(), "com.example.Short");
        assert_eq!(c.annotations(), &[ClassRef::new("com.example.Marker")]);
    }

    #[test]
    fn test_wide_slots() {
        let mut class = ClassBytes::new("com/example/Wide");
        class.long(2);
        let after = class.annotations(&["Lcom/example/After;"]);
        class.class_attribute(after);
        let bytes = class.build();

        let reserving = Decoder::with_config(DecoderConfig::new().reserve_wide_slots(true));
        let c = reserving.decode_bytes(&bytes).unwrap();
        assert_eq!(c.annotations(), &[ClassRef::new("com.example.After")]);

        assert!(Decoder::new().decode_bytes(&bytes).is_err());
    }

    #[test]
    fn test_long_takes_one_slot_by_default() {
        let mut class = ClassBytes::new("com/example/Narrow");
        class.long(1);
        class.field(0, "big", "J", &[]);

        let c = Decoder::new().decode_bytes(&class.build()).unwrap();
        assert!(c.field("big").is_some());
    }

    #[test]
    fn test_element_values_skipped() {
        let mut class = ClassBytes::new("a/B");
        let name = class.utf8("value");
        let inner = class.utf8("La/Inner;");
        let outer = class.utf8("La/Outer;");
        let second = class.utf8("La/Second;");
        let [nh, nl] = name.to_be_bytes();
        let [ih, il] = inner.to_be_bytes();

        let mut body = vec![0x00, 0x02];
        body.extend_from_slice(&outer.to_be_bytes());
        body.extend_from_slice(&[0x00, 0x02]);
        // value = { 1, @Inner(value = E.X) }
        body.extend_from_slice(&[nh, nl, b'[', 0x00, 0x02, b'I', nh, nl]);
        body.extend_from_slice(&[b'@', ih, il, 0x00, 0x01, nh, nl, b'e', ih, il, nh, nl]);
        // value = 'Q'-tagged, tolerated
        body.extend_from_slice(&[nh, nl, b'Q']);
        body.extend_from_slice(&second.to_be_bytes());
        body.extend_from_slice(&[0x00, 0x00]);

        let attribute = class.attribute(ANNOTATIONS_ATTRIBUTE, &body);
        class.class_attribute(attribute);

        let c = Decoder::new().decode_bytes(&class.build()).unwrap();
        assert_eq!(
            c.annotations(),
            &[ClassRef::new("a.Outer"), ClassRef::new("a.Second")]
        );
    }

    #[test]
    fn test_invalid_annotation_type() {
        let mut class = ClassBytes::new("a/B");
        let bad = class.annotations(&["a/NotNotation"]);
        class.class_attribute(bad);

        let err = read_error(Decoder::new().decode_bytes(&class.build()));
        assert!(err.to_string().contains("invalid class reference \"a/NotNotation\""));
    }

    #[test]
    fn test_invalid_member_descriptor() {
        let mut class = ClassBytes::new("a/B");
        class.method(0, "run", "(Q)V", &[]);

        let err = read_error(Decoder::new().decode_bytes(&class.build()));
        assert!(err.to_string().contains("(Q)V"));
    }

    #[test]
    fn test_this_class_index_zero() {
        let mut class = ClassBytes::new("a/B");
        class.this_class = 0;
        let err = read_error(Decoder::new().decode_bytes(&class.build()));
        assert!(matches!(err, ReadError::InvalidData { .. }));
    }

    #[test]
    fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Widget.class");
        std::fs::write(&path, widget()).unwrap();

        let c = decode_file(&path).unwrap();
        assert_eq!(c.simple_name(), "Widget");

        let err = decode_file(dir.path().join("Missing.class")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
