//! Byte-level helpers shared by the pipelines and algorithm implementations

pub mod arrays;
pub mod base64url;
pub mod compact;
pub mod padding;
