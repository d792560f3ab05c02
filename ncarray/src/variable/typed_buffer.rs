use ncarray_data_type::ElementType;
use serde_json::Value;

use super::{Element, ElementError, ElementOwned, TransferBytes};

/// A buffer of elements tagged with their [`ElementType`].
///
/// There is one variant per element type.
/// Text is a single element and is only valid as an attribute value.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum TypedBuffer {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    UByte(Vec<u8>),
    UShort(Vec<u16>),
    UInt(Vec<u32>),
    Int64(Vec<i64>),
    Text(String),
}

macro_rules! typed_buffer_dispatch {
    ($self:expr, $elements:ident => $numeric:expr, $text:ident => $text_expr:expr) => {
        match $self {
            TypedBuffer::Byte($elements) => $numeric,
            TypedBuffer::Char($elements) => $numeric,
            TypedBuffer::Short($elements) => $numeric,
            TypedBuffer::Int($elements) => $numeric,
            TypedBuffer::Float($elements) => $numeric,
            TypedBuffer::Double($elements) => $numeric,
            TypedBuffer::UByte($elements) => $numeric,
            TypedBuffer::UShort($elements) => $numeric,
            TypedBuffer::UInt($elements) => $numeric,
            TypedBuffer::Int64($elements) => $numeric,
            TypedBuffer::Text($text) => $text_expr,
        }
    };
}

impl TypedBuffer {
    /// Return the element type of the buffer.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Byte(_) => ElementType::Byte,
            Self::Char(_) => ElementType::Char,
            Self::Short(_) => ElementType::Short,
            Self::Int(_) => ElementType::Int,
            Self::Float(_) => ElementType::Float,
            Self::Double(_) => ElementType::Double,
            Self::UByte(_) => ElementType::UByte,
            Self::UShort(_) => ElementType::UShort,
            Self::UInt(_) => ElementType::UInt,
            Self::Int64(_) => ElementType::Int64,
            Self::Text(_) => ElementType::String,
        }
    }

    /// Return the number of elements in the buffer.
    ///
    /// Text is always one element.
    #[must_use]
    pub fn len(&self) -> usize {
        typed_buffer_dispatch!(self, elements => elements.len(), _text => 1)
    }

    /// Returns true if the buffer has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the text of a [`TypedBuffer::Text`] buffer.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// Create a buffer of `element_type` from native-endian bytes.
    ///
    /// # Errors
    /// Returns an [`ElementError`] if the bytes are not valid elements of `element_type`.
    pub fn from_ne_bytes(element_type: ElementType, bytes: &[u8]) -> Result<Self, ElementError> {
        Ok(match element_type {
            ElementType::Byte => Self::Byte(i8::from_transfer_bytes(element_type, bytes)?),
            ElementType::Char => Self::Char(u8::from_transfer_bytes(element_type, bytes)?),
            ElementType::Short => Self::Short(i16::from_transfer_bytes(element_type, bytes)?),
            ElementType::Int => Self::Int(i32::from_transfer_bytes(element_type, bytes)?),
            ElementType::Float => Self::Float(f32::from_transfer_bytes(element_type, bytes)?),
            ElementType::Double => Self::Double(f64::from_transfer_bytes(element_type, bytes)?),
            ElementType::UByte => Self::UByte(u8::from_transfer_bytes(element_type, bytes)?),
            ElementType::UShort => Self::UShort(u16::from_transfer_bytes(element_type, bytes)?),
            ElementType::UInt => Self::UInt(u32::from_transfer_bytes(element_type, bytes)?),
            ElementType::Int64 => Self::Int64(i64::from_transfer_bytes(element_type, bytes)?),
            ElementType::String => Self::Text(
                String::from_utf8(bytes.to_vec()).map_err(|_| ElementError::InvalidElementValue)?,
            ),
        })
    }

    /// Convert the buffer into native-endian bytes for `element_type`.
    ///
    /// # Errors
    /// Returns [`ElementError::IncompatibleElementType`] if `element_type` is not the element type of the buffer.
    pub fn to_ne_bytes(
        &self,
        element_type: ElementType,
    ) -> Result<TransferBytes<'_>, ElementError> {
        if self.element_type() != element_type {
            return Err(ElementError::IncompatibleElementType(element_type));
        }
        typed_buffer_dispatch!(
            self,
            elements => Element::to_transfer_bytes(element_type, elements.as_slice()),
            text => Ok(text.as_bytes().into())
        )
    }

    /// Convert the buffer into owned native-endian bytes for `element_type`.
    ///
    /// # Errors
    /// Returns [`ElementError::IncompatibleElementType`] if `element_type` is not the element type of the buffer.
    pub fn into_ne_bytes(
        self,
        element_type: ElementType,
    ) -> Result<TransferBytes<'static>, ElementError> {
        if self.element_type() != element_type {
            return Err(ElementError::IncompatibleElementType(element_type));
        }
        typed_buffer_dispatch!(
            self,
            elements => Element::into_transfer_bytes(element_type, elements),
            text => Ok(text.into_bytes().into())
        )
    }

    /// Convert the buffer into a [`Value`].
    ///
    /// A single numeric element is a JSON number, and multiple elements are an array.
    /// Character data and text are JSON strings.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Char(elements) => Value::String(String::from_utf8_lossy(elements).into_owned()),
            Self::Text(text) => Value::String(text.clone()),
            Self::Byte(elements) => numbers_to_json(elements),
            Self::Short(elements) => numbers_to_json(elements),
            Self::Int(elements) => numbers_to_json(elements),
            Self::Float(elements) => numbers_to_json(elements),
            Self::Double(elements) => numbers_to_json(elements),
            Self::UByte(elements) => numbers_to_json(elements),
            Self::UShort(elements) => numbers_to_json(elements),
            Self::UInt(elements) => numbers_to_json(elements),
            Self::Int64(elements) => numbers_to_json(elements),
        }
    }
}

/// A single number is a JSON number, otherwise a JSON array.
fn numbers_to_json<T: Copy + Into<Value>>(elements: &[T]) -> Value {
    match elements {
        [element] => (*element).into(),
        elements => Value::Array(elements.iter().map(|&element| element.into()).collect()),
    }
}

macro_rules! impl_typed_buffer_from {
    ($raw_type:ty, $variant:ident) => {
        impl From<Vec<$raw_type>> for TypedBuffer {
            fn from(elements: Vec<$raw_type>) -> Self {
                Self::$variant(elements)
            }
        }

        impl From<&[$raw_type]> for TypedBuffer {
            fn from(elements: &[$raw_type]) -> Self {
                Self::$variant(elements.to_vec())
            }
        }

        impl From<$raw_type> for TypedBuffer {
            fn from(element: $raw_type) -> Self {
                Self::$variant(vec![element])
            }
        }
    };
}

impl_typed_buffer_from!(i8, Byte);
impl_typed_buffer_from!(i16, Short);
impl_typed_buffer_from!(i32, Int);
impl_typed_buffer_from!(f32, Float);
impl_typed_buffer_from!(f64, Double);
impl_typed_buffer_from!(u8, UByte);
impl_typed_buffer_from!(u16, UShort);
impl_typed_buffer_from!(u32, UInt);
impl_typed_buffer_from!(i64, Int64);

impl From<String> for TypedBuffer {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for TypedBuffer {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
