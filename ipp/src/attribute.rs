//!
//! Attribute-related structs
//!
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use http::Uri;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::IppError,
    parser::IppParseError,
    tag::{DelimiterTag, ValueTag},
    value::IppValue,
};

macro_rules! define_attributes {
    ($($name:ident => $value:literal),* $(,)?) => {
        $(pub const $name: &'static str = $value;)*
    };
}

/// One extra value of a multi-valued attribute, sent with an empty name
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdditionalValue {
    tag: ValueTag,
    value: Bytes,
}

impl AdditionalValue {
    pub fn new(tag: ValueTag, value: Bytes) -> AdditionalValue {
        AdditionalValue { tag, value }
    }

    /// Value syntax
    pub fn tag(&self) -> ValueTag {
        self.tag
    }

    /// Raw value bytes
    pub fn value(&self) -> &Bytes {
        &self.value
    }
}

/// `IppAttribute` represents an IPP attribute with its raw value bytes.
/// The first value is the primary one, the rest are kept as additional values in wire order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IppAttribute {
    tag: ValueTag,
    name: String,
    value: Bytes,
    additional_values: Vec<AdditionalValue>,
}

impl IppAttribute {
    define_attributes! {
        ATTRIBUTES_CHARSET => "attributes-charset",
        ATTRIBUTES_NATURAL_LANGUAGE => "attributes-natural-language",
        COPIES => "copies",
        COPIES_SUPPORTED => "copies-supported",
        DOCUMENT_FORMAT => "document-format",
        DOCUMENT_FORMAT_SUPPORTED => "document-format-supported",
        DOCUMENT_NAME => "document-name",
        JOB_ID => "job-id",
        JOB_IMPRESSIONS_COMPLETED => "job-impressions-completed",
        JOB_MEDIA_SHEETS_COMPLETED => "job-media-sheets-completed",
        JOB_NAME => "job-name",
        JOB_ORIGINATING_USER_NAME => "job-originating-user-name",
        JOB_STATE => "job-state",
        JOB_STATE_REASONS => "job-state-reasons",
        JOB_URI => "job-uri",
        LAST_DOCUMENT => "last-document",
        MEDIA_DEFAULT => "media-default",
        MEDIA_SUPPORTED => "media-supported",
        NUMBER_UP_DEFAULT => "number-up-default",
        NUMBER_UP_SUPPORTED => "number-up-supported",
        ORIENTATION_REQUESTED => "orientation-requested",
        ORIENTATION_REQUESTED_SUPPORTED => "orientation-requested-supported",
        OUTPUT_MODE => "output-mode",
        PAGE_RANGES_SUPPORTED => "page-ranges-supported",
        PRINTER_INFO => "printer-info",
        PRINTER_IS_ACCEPTING_JOBS => "printer-is-accepting-jobs",
        PRINTER_LOCATION => "printer-location",
        PRINTER_MAKE_AND_MODEL => "printer-make-and-model",
        PRINTER_NAME => "printer-name",
        PRINTER_RESOLUTION_DEFAULT => "printer-resolution-default",
        PRINTER_RESOLUTION_SUPPORTED => "printer-resolution-supported",
        PRINTER_STATE => "printer-state",
        PRINTER_URI => "printer-uri",
        PRINTER_URI_SUPPORTED => "printer-uri-supported",
        PRINT_COLOR_MODE_DEFAULT => "print-color-mode-default",
        PRINT_COLOR_MODE_SUPPORTED => "print-color-mode-supported",
        REQUESTED_ATTRIBUTES => "requested-attributes",
        REQUESTING_USER_NAME => "requesting-user-name",
        SIDES_DEFAULT => "sides-default",
        SIDES_SUPPORTED => "sides-supported",
        STATUS_MESSAGE => "status-message",
    }

    /// Create new instance of the attribute
    ///
    /// * `name` - Attribute name<br/>
    /// * `value` - Attribute value<br/>
    pub fn new<S>(name: S, value: IppValue) -> IppAttribute
    where
        S: AsRef<str>,
    {
        IppAttribute {
            tag: value.to_tag(),
            name: name.as_ref().to_owned(),
            value: value.to_bytes(),
            additional_values: Vec::new(),
        }
    }

    /// Create a multi-valued attribute from typed values. Each value keeps its own tag.
    pub fn with_values<S, I>(name: S, values: I) -> IppAttribute
    where
        S: AsRef<str>,
        I: IntoIterator<Item = IppValue>,
    {
        let mut values = values.into_iter();
        let mut attr = IppAttribute::new(name, values.next().unwrap_or(IppValue::NoValue));
        attr.additional_values = values
            .map(|v| AdditionalValue::new(v.to_tag(), v.to_bytes()))
            .collect();
        attr
    }

    /// Create an attribute from raw values sharing one tag, e.g. a keyword list
    pub fn of<S, I, V>(tag: ValueTag, name: S, values: I) -> IppAttribute
    where
        S: AsRef<str>,
        I: IntoIterator<Item = V>,
        V: Into<Bytes>,
    {
        let mut values = values.into_iter().map(Into::into);
        IppAttribute {
            tag,
            name: name.as_ref().to_owned(),
            value: values.next().unwrap_or_default(),
            additional_values: values.map(|v| AdditionalValue::new(tag, v)).collect(),
        }
    }

    pub(crate) fn from_parts(
        tag: ValueTag,
        name: String,
        value: Bytes,
        additional_values: Vec<AdditionalValue>,
    ) -> IppAttribute {
        IppAttribute {
            tag,
            name,
            value,
            additional_values,
        }
    }

    /// Return attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return value tag of the primary value
    pub fn tag(&self) -> ValueTag {
        self.tag
    }

    /// Return raw bytes of the primary value
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Return the values following the primary one
    pub fn additional_values(&self) -> &[AdditionalValue] {
        &self.additional_values
    }

    pub fn is_multi_value(&self) -> bool {
        !self.additional_values.is_empty()
    }

    /// Decode the primary value
    pub fn ipp_value(&self) -> Result<IppValue, IppParseError> {
        IppValue::parse(self.tag, self.value.clone())
    }

    /// Decode all values in wire order
    pub fn ipp_values(&self) -> Result<Vec<IppValue>, IppParseError> {
        std::iter::once(self.ipp_value())
            .chain(
                self.additional_values
                    .iter()
                    .map(|v| IppValue::parse(v.tag, v.value.clone())),
            )
            .collect()
    }

    /// Integer or enum value
    pub fn int_value(&self) -> Result<i32, IppError> {
        match self.ipp_value()? {
            IppValue::Integer(i) | IppValue::Enum(i) => Ok(i),
            _ => Err(IppError::InvalidAttributeType(self.name.clone())),
        }
    }

    pub fn bool_value(&self) -> Result<bool, IppError> {
        match self.ipp_value()? {
            IppValue::Boolean(b) => Ok(b),
            _ => Err(IppError::InvalidAttributeType(self.name.clone())),
        }
    }

    /// Primary value as text, regardless of the syntax
    pub fn string_value(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    pub fn uri_value(&self) -> Result<Uri, IppError> {
        if self.tag != ValueTag::Uri {
            return Err(IppError::InvalidAttributeType(self.name.clone()));
        }
        Ok(self.string_value().parse()?)
    }

    /// Write attribute with all its values to byte array.
    /// Fails when the name or a value is longer than a 16-bit length field can describe.
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();

        buffer.put_u8(self.tag.code());
        self.put_field(&mut buffer, self.name.as_bytes())?;
        self.put_field(&mut buffer, &self.value)?;

        for additional in &self.additional_values {
            buffer.put_u8(additional.tag.code());
            buffer.put_u16(0);
            self.put_field(&mut buffer, &additional.value)?;
        }
        Ok(buffer.freeze())
    }

    fn put_field(&self, buffer: &mut BytesMut, field: &[u8]) -> Result<(), IppParseError> {
        let len = u16::try_from(field.len()).map_err(|_| IppParseError::ValueTooLong {
            name: self.name.clone(),
            len: field.len(),
        })?;
        buffer.put_u16(len);
        buffer.put_slice(field);
        Ok(())
    }

    /// Render every value of the attribute
    pub fn to_long_string(&self) -> String {
        let mut values = vec![render_value(self.tag, &self.value)];
        values.extend(self.additional_values.iter().map(|v| render_value(v.tag, &v.value)));
        format!("{}={}", self.name, values.join(","))
    }
}

fn render_value(tag: ValueTag, value: &Bytes) -> String {
    match IppValue::parse(tag, value.clone()) {
        Ok(IppValue::Other { .. }) | Err(_) => hex::encode(value),
        Ok(v) => v.to_string(),
    }
}

impl fmt::Display for IppAttribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, render_value(self.tag, &self.value))?;
        if self.is_multi_value() {
            f.write_str(",...")?;
        }
        Ok(())
    }
}

/// Attribute group
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IppAttributeGroup {
    tag: DelimiterTag,
    attributes: Vec<IppAttribute>,
}

impl IppAttributeGroup {
    /// Create new attribute group of a given type
    pub fn new(tag: DelimiterTag) -> IppAttributeGroup {
        IppAttributeGroup {
            tag,
            attributes: Vec::new(),
        }
    }

    /// Return group type tag
    pub fn tag(&self) -> DelimiterTag {
        self.tag
    }

    /// Return read-only attributes in wire order
    pub fn attributes(&self) -> &[IppAttribute] {
        &self.attributes
    }

    /// Return mutable attributes
    pub fn attributes_mut(&mut self) -> &mut Vec<IppAttribute> {
        &mut self.attributes
    }

    /// Consume this group and return the attributes
    pub fn into_attributes(self) -> Vec<IppAttribute> {
        self.attributes
    }

    /// Find attribute by name
    pub fn get(&self, name: &str) -> Option<&IppAttribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Add attribute, replacing one with the same name in place
    pub fn add(&mut self, attribute: IppAttribute) {
        match self.attributes.iter_mut().find(|a| a.name() == attribute.name()) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Remove attribute by name
    pub fn remove(&mut self, name: &str) -> Option<IppAttribute> {
        let index = self.attributes.iter().position(|a| a.name() == name)?;
        Some(self.attributes.remove(index))
    }

    /// Write begin tag and attributes to byte array
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();
        buffer.put_u8(self.tag as u8);
        for attr in &self.attributes {
            buffer.put(attr.to_bytes()?);
        }
        Ok(buffer.freeze())
    }
}

/// Attribute list
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IppAttributes {
    groups: Vec<IppAttributeGroup>,
}

impl IppAttributes {
    /// Create attribute list
    pub fn new() -> IppAttributes {
        IppAttributes { ..Default::default() }
    }

    /// Get all groups
    pub fn groups(&self) -> &[IppAttributeGroup] {
        &self.groups
    }

    /// Get all mutable groups
    pub fn groups_mut(&mut self) -> &mut Vec<IppAttributeGroup> {
        &mut self.groups
    }

    /// Consume this attribute list and return all attribute groups
    pub fn into_groups(self) -> Vec<IppAttributeGroup> {
        self.groups
    }

    /// Get a list of attribute groups matching a given delimiter tag
    pub fn groups_of(&self, tag: DelimiterTag) -> impl Iterator<Item = &IppAttributeGroup> {
        self.groups.iter().filter(move |g| g.tag == tag)
    }

    /// Add attribute to the first group with a given tag, creating the group if missing
    pub fn add(&mut self, tag: DelimiterTag, attribute: IppAttribute) {
        match self.groups.iter_mut().find(|g| g.tag() == tag) {
            Some(group) => group.add(attribute),
            None => {
                let mut new_group = IppAttributeGroup::new(tag);
                new_group.add(attribute);
                self.groups.push(new_group);
            }
        }
    }

    /// Find the first attribute with a given name across all groups
    pub fn get(&self, name: &str) -> Option<&IppAttribute> {
        self.groups.iter().flat_map(|g| g.attributes()).find(|a| a.name() == name)
    }

    /// Total number of attributes
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.attributes().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write all groups in order followed by the end-of-attributes tag
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();
        for group in &self.groups {
            buffer.put(group.to_bytes()?);
        }
        buffer.put_u8(DelimiterTag::EndOfAttributes as u8);

        Ok(buffer.freeze())
    }
}
