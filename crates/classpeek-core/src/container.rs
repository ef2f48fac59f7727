//! The decoded form of one class file.
//!
//! A [`DecodedContainer`] records the class a file declares, the annotations
//! placed on that class, and every field and method together with the
//! annotations placed on each. It is assembled once through a
//! [`ContainerBuilder`] and never changes afterwards.

use crate::reference::{ClassRef, MemberRef, TypeRef};
use std::collections::BTreeMap;

/// Structural skeleton of a decoded class file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContainer {
    declared_type: ClassRef,
    annotations: Vec<ClassRef>,
    members: BTreeMap<MemberRef, Vec<ClassRef>>,
}

impl DecodedContainer {
    /// Starts building a container for `declared_type`
    pub fn builder(declared_type: ClassRef) -> ContainerBuilder {
        ContainerBuilder {
            declared_type,
            annotations: Vec::new(),
            members: BTreeMap::new(),
        }
    }

    /// The class declared by this file
    pub fn declared_type(&self) -> &ClassRef {
        &self.declared_type
    }

    /// Shorthand for `declared_type().name()`
    pub fn name(&self) -> &str {
        self.declared_type.name()
    }

    /// Shorthand for `declared_type().simple_name()`
    pub fn simple_name(&self) -> &str {
        self.declared_type.simple_name()
    }

    /// Annotations on the class itself, in file order. Member annotations
    /// are not included.
    pub fn annotations(&self) -> &[ClassRef] {
        &self.annotations
    }

    /// Annotations on `member`, empty if it is not declared here
    pub fn member_annotations(&self, member: &MemberRef) -> &[ClassRef] {
        self.members.get(member).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every declared member, constructors first
    pub fn members(&self) -> impl Iterator<Item = &MemberRef> {
        self.members.keys()
    }

    /// Members paired with their annotations
    pub fn annotated_members(&self) -> impl Iterator<Item = (&MemberRef, &[ClassRef])> {
        self.members.iter().map(|(m, a)| (m, a.as_slice()))
    }

    /// Declared fields
    pub fn fields(&self) -> impl Iterator<Item = &MemberRef> {
        self.members().filter(|m| m.is_field())
    }

    /// Declared methods, constructors included
    pub fn methods(&self) -> impl Iterator<Item = &MemberRef> {
        self.members().filter(|m| m.is_method())
    }

    /// Fields declared public
    pub fn public_fields(&self) -> impl Iterator<Item = &MemberRef> {
        self.fields().filter(|m| m.flags().is_public())
    }

    /// Methods declared public
    pub fn public_methods(&self) -> impl Iterator<Item = &MemberRef> {
        self.methods().filter(|m| m.flags().is_public())
    }

    /// The first field called `name`
    pub fn field(&self, name: &str) -> Option<&MemberRef> {
        self.fields().find(|m| m.has_name(name))
    }

    /// Annotations on the field called `name`
    pub fn field_annotations(&self, name: &str) -> Option<&[ClassRef]> {
        self.field(name).map(|f| self.member_annotations(f))
    }

    /// The method with this name and parameter list. The return type is not
    /// part of the match.
    pub fn method(&self, name: &str, parameters: &[TypeRef]) -> Option<&MemberRef> {
        let mut wanted = String::from("(");
        for p in parameters {
            wanted.push_str(&p.descriptor());
        }
        wanted.push(')');

        self.methods()
            .find(|m| m.has_name(name) && m.parameter_descriptor().as_deref() == Some(wanted.as_str()))
    }

    /// Annotations on the method with this name and parameter list
    pub fn method_annotations(&self, name: &str, parameters: &[TypeRef]) -> Option<&[ClassRef]> {
        self.method(name, parameters)
            .map(|m| self.member_annotations(m))
    }

    /// Returns true if the class or any member carries an annotation
    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty() || self.members.values().any(|a| !a.is_empty())
    }
}

/// Accumulates a [`DecodedContainer`] during a decode pass
#[derive(Debug)]
pub struct ContainerBuilder {
    declared_type: ClassRef,
    annotations: Vec<ClassRef>,
    members: BTreeMap<MemberRef, Vec<ClassRef>>,
}

impl ContainerBuilder {
    /// The class being built
    pub fn declared_type(&self) -> &ClassRef {
        &self.declared_type
    }

    /// Records an annotation on the class itself
    pub fn add_annotation(&mut self, annotation: ClassRef) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Registers a member. Registering a member equal to one already present
    /// clears the annotations recorded for it.
    pub fn add_member(&mut self, member: MemberRef) -> &mut Self {
        self.members.entry(member).or_default().clear();
        self
    }

    /// Records an annotation on `member`, registering the member if needed
    pub fn add_member_annotation(&mut self, member: &MemberRef, annotation: ClassRef) -> &mut Self {
        match self.members.get_mut(member) {
            Some(annotations) => annotations.push(annotation),
            None => {
                self.members.insert(member.clone(), vec![annotation]);
            }
        }
        self
    }

    /// Finishes the container
    pub fn build(self) -> DecodedContainer {
        DecodedContainer {
            declared_type: self.declared_type,
            annotations: self.annotations,
            members: self.members,
        }
    }
}
