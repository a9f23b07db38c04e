/// Vertex layout: an ordered list of attributes describing one interleaved vertex.
///
/// Attribute `i` is fed to shader slot `first_slot + i` when the layout is
/// attached to a `VertexArray`. The stride is the sum of all attribute sizes
/// and each offset is the sum of the sizes of the attributes before it.

use crate::graphics_device::AttributeType;

/// One attribute inside a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub component_type: AttributeType,
    /// 1..=4
    pub component_count: u32,
    /// Integer components are mapped to [0, 1] / [-1, 1] when read as float
    pub normalized: bool,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

impl VertexAttribute {
    pub fn size_bytes(&self) -> u32 {
        self.component_count * self.component_type.size_bytes()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Scalar types a vertex attribute can be made of
///
/// Sealed: only the types the graphics device understands implement it.
pub trait VertexComponent: sealed::Sealed {
    const TYPE: AttributeType;
}

macro_rules! vertex_component {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl VertexComponent for $ty {
                const TYPE: AttributeType = AttributeType::$variant;
            }
        )*
    };
}

vertex_component! {
    f32 => F32,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute of `count` components
    ///
    /// # Panics
    ///
    /// Panics if `count` is not in 1..=4. A layout is static configuration,
    /// so a bad count is a programming error rather than a runtime condition.
    pub fn push(&mut self, component_type: AttributeType, count: u32) -> &mut Self {
        self.push_attribute(component_type, count, false)
    }

    /// Append an attribute whose integer components are normalized when read
    ///
    /// # Panics
    ///
    /// Panics if `count` is not in 1..=4.
    pub fn push_normalized(&mut self, component_type: AttributeType, count: u32) -> &mut Self {
        self.push_attribute(component_type, count, true)
    }

    /// Append an attribute of `count` components of scalar type `T`
    ///
    /// ```
    /// # use glint_engine::glint::resource::VertexLayout;
    /// let mut layout = VertexLayout::new();
    /// layout.push_type::<f32>(2).push_type::<f32>(2);
    /// assert_eq!(layout.stride(), 16);
    /// ```
    pub fn push_type<T: VertexComponent>(&mut self, count: u32) -> &mut Self {
        self.push_attribute(T::TYPE, count, false)
    }

    fn push_attribute(&mut self, component_type: AttributeType, count: u32, normalized: bool) -> &mut Self {
        assert!(
            (1..=4).contains(&count),
            "vertex attribute component count must be 1..=4, got {}",
            count
        );
        let attribute = VertexAttribute {
            component_type,
            component_count: count,
            normalized,
            offset: self.stride,
        };
        self.stride += attribute.size_bytes();
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Byte distance between consecutive vertices
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.attributes.iter().map(|a| a.offset).collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
