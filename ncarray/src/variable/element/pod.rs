use ncarray_data_type::ElementType;

use super::{Element, ElementError, ElementOwned};
use crate::variable::{
    TransferBytes, convert_from_bytes_slice, transmute_to_bytes, transmute_to_bytes_vec,
};

/// Helper macro to implement `Element` for POD (plain old data) types.
macro_rules! impl_element_pod {
    ($raw_type:ty, $($element_type:path),+ $(,)?) => {
        impl Element for $raw_type {
            fn validate_element_type(element_type: ElementType) -> Result<(), ElementError> {
                if matches!(element_type, $($element_type)|+) {
                    Ok(())
                } else {
                    Err(ElementError::IncompatibleElementType(element_type))
                }
            }

            fn to_transfer_bytes(
                element_type: ElementType,
                elements: &[Self],
            ) -> Result<TransferBytes<'_>, ElementError> {
                Self::validate_element_type(element_type)?;
                Ok(transmute_to_bytes(elements).into())
            }

            fn into_transfer_bytes(
                element_type: ElementType,
                elements: Vec<Self>,
            ) -> Result<TransferBytes<'static>, ElementError> {
                Self::validate_element_type(element_type)?;
                Ok(transmute_to_bytes_vec(elements).into())
            }
        }

        impl ElementOwned for $raw_type {
            fn from_transfer_bytes(
                element_type: ElementType,
                bytes: &[u8],
            ) -> Result<Vec<Self>, ElementError> {
                Self::validate_element_type(element_type)?;
                if bytes.len().is_multiple_of(size_of::<Self>()) {
                    Ok(convert_from_bytes_slice::<Self>(bytes))
                } else {
                    Err(ElementError::InvalidBytesLength {
                        got: bytes.len(),
                        element_size: size_of::<Self>(),
                    })
                }
            }
        }
    };
}

impl_element_pod!(i8, ElementType::Byte);
impl_element_pod!(u8, ElementType::Char, ElementType::UByte);
impl_element_pod!(i16, ElementType::Short);
impl_element_pod!(u16, ElementType::UShort);
impl_element_pod!(i32, ElementType::Int);
impl_element_pod!(u32, ElementType::UInt);
impl_element_pod!(i64, ElementType::Int64);
impl_element_pod!(f32, ElementType::Float);
impl_element_pod!(f64, ElementType::Double);
