/// Conversions from engine enums to OpenGL constants

use glint_engine::glint::device::{
    AttributeType, BufferTarget, BufferUsage, ClearMask, DrawMode, IndexType, ShaderStage,
    TextureFilter, TextureWrap,
};
use glint_engine::glint::log::LogSeverity;

pub(crate) fn shader_stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub(crate) fn buffer_target_to_gl(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn buffer_usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

pub(crate) fn attribute_type_to_gl(component_type: AttributeType) -> u32 {
    match component_type {
        AttributeType::F32 => glow::FLOAT,
        AttributeType::I8 => glow::BYTE,
        AttributeType::U8 => glow::UNSIGNED_BYTE,
        AttributeType::I16 => glow::SHORT,
        AttributeType::U16 => glow::UNSIGNED_SHORT,
        AttributeType::I32 => glow::INT,
        AttributeType::U32 => glow::UNSIGNED_INT,
    }
}

pub(crate) fn index_type_to_gl(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

pub(crate) fn draw_mode_to_gl(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Triangles => glow::TRIANGLES,
        DrawMode::Lines => glow::LINES,
        DrawMode::Points => glow::POINTS,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

pub(crate) fn texture_filter_to_gl(filter: TextureFilter) -> i32 {
    (match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
    }) as i32
}

pub(crate) fn texture_wrap_to_gl(wrap: TextureWrap) -> i32 {
    (match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        TextureWrap::Repeat => glow::REPEAT,
        TextureWrap::MirroredRepeat => glow::MIRRORED_REPEAT,
    }) as i32
}

// ===== DEBUG OUTPUT =====

/// Engine log severity for a `GL_DEBUG_SEVERITY_*` value
pub(crate) fn debug_severity_to_log(severity: u32) -> LogSeverity {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM => LogSeverity::Warn,
        glow::DEBUG_SEVERITY_LOW => LogSeverity::Info,
        _ => LogSeverity::Debug,
    }
}

pub(crate) fn debug_source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    }
}

pub(crate) fn debug_type_name(message_type: u32) -> &'static str {
    match message_type {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        glow::DEBUG_TYPE_PUSH_GROUP => "Push Group",
        glow::DEBUG_TYPE_POP_GROUP => "Pop Group",
        _ => "Other",
    }
}

#[cfg(test)]
#[path = "opengl_format_tests.rs"]
mod tests;
