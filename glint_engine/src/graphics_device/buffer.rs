/// Buffer targets, usage hints and vertex attribute formats

/// Binding target of a buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data (GL_ARRAY_BUFFER)
    Array,
    /// Vertex indices (GL_ELEMENT_ARRAY_BUFFER)
    ElementArray,
}

/// Upload frequency hint passed to the driver with the buffer data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times
    #[default]
    StaticDraw,
    /// Rewritten often, drawn many times
    DynamicDraw,
    /// Written once, drawn a few times
    StreamDraw,
}

/// Scalar type of one vertex attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    F32,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
}

impl AttributeType {
    /// Returns size in bytes of one component
    pub fn size_bytes(&self) -> u32 {
        match self {
            AttributeType::F32 => 4,
            AttributeType::I8 | AttributeType::U8 => 1,
            AttributeType::I16 | AttributeType::U16 => 2,
            AttributeType::I32 | AttributeType::U32 => 4,
        }
    }
}

/// One `glVertexAttribPointer`-style registration against the bound array buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePointer {
    /// Number of components (1..=4)
    pub component_count: u32,
    /// Scalar type of each component
    pub component_type: AttributeType,
    /// Integer data is mapped to [0, 1] / [-1, 1] when true
    pub normalized: bool,
    /// Bytes between two consecutive vertices
    pub stride: u32,
    /// Byte offset of the attribute inside a vertex
    pub offset: u32,
}

/// Index element type used by indexed draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U32,
}

impl IndexType {
    /// Returns size in bytes of one index
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U32 => 4,
        }
    }
}
