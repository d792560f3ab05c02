use derive_more::{Display, From};
use ncarray_data_type::ElementType;

/// A container (group) identifier.
///
/// Container ids are unique within a store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct ContainerId(pub u32);

/// A variable identifier.
///
/// The `local` id is only meaningful alongside the owning `container`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{container}:{local}")]
pub struct VariableId {
    /// The owning container.
    pub container: ContainerId,
    /// The id of the variable within its container.
    pub local: u32,
}

/// A dimension identifier.
///
/// The `local` id is only meaningful alongside the owning `container`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{container}:{local}")]
pub struct DimensionId {
    /// The owning container.
    pub container: ContainerId,
    /// The id of the dimension within its container.
    pub local: u32,
}

/// The owner of an attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, From)]
pub enum AttributeOwner {
    /// A group attribute.
    #[display("group {_0}")]
    Group(ContainerId),
    /// A variable attribute.
    #[display("variable {_0}")]
    Variable(VariableId),
}

/// The declared length of a dimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DimensionLength {
    /// A fixed length.
    Fixed(u64),
    /// An unlimited length, which grows as data is written.
    Unlimited,
}

/// Information about a variable returned by [`open_variable`](crate::ReadableStorageTraits::open_variable).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableInfo {
    /// The variable id.
    pub id: VariableId,
    /// The variable name.
    pub name: String,
    /// The element type.
    pub element_type: ElementType,
    /// The ordered dimensions of the variable.
    pub dimensions: Vec<DimensionId>,
}

impl VariableInfo {
    /// Return the dimensionality of the variable.
    #[must_use]
    pub fn ndims(&self) -> usize {
        self.dimensions.len()
    }
}

/// Information about a dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimensionInfo {
    /// The dimension id.
    pub id: DimensionId,
    /// The dimension name.
    pub name: String,
    /// The current length of the dimension.
    pub length: u64,
    /// Whether the dimension is unlimited.
    pub unlimited: bool,
}

/// The raw value of an attribute.
///
/// Numeric values are native-endian elements; string values are UTF-8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeData {
    /// The element type of the attribute.
    pub element_type: ElementType,
    /// The attribute bytes.
    pub bytes: bytes::Bytes,
}
