use ncarray_data_type::ElementType;

use super::{Element, ElementError, ElementOwned};
use crate::variable::TransferBytes;

// Text is transferred as its UTF-8 bytes, without a terminator, and always as a single element.
macro_rules! impl_element_string {
    ($raw_type:ty) => {
        impl Element for $raw_type {
            fn validate_element_type(element_type: ElementType) -> Result<(), ElementError> {
                if element_type == ElementType::String {
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
                match elements {
                    [text] => Ok(text.as_bytes().into()),
                    _ => Err(ElementError::InvalidTextElementCount(elements.len())),
                }
            }

            fn into_transfer_bytes(
                element_type: ElementType,
                elements: Vec<Self>,
            ) -> Result<TransferBytes<'static>, ElementError> {
                Ok(Self::to_transfer_bytes(element_type, &elements)?
                    .into_owned()
                    .into())
            }
        }
    };
}

impl_element_string!(&str);
impl_element_string!(String);

impl ElementOwned for String {
    fn from_transfer_bytes(
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<Vec<Self>, ElementError> {
        Self::validate_element_type(element_type)?;
        let text = Self::from_utf8(bytes.to_vec()).map_err(|_| ElementError::InvalidElementValue)?;
        Ok(vec![text])
    }
}
