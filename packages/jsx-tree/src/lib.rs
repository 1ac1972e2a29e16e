#![deny(clippy::all)]

//! JSX source tree
//!
//! A small query/mutation facade over JSX/TSX source files. Files are parsed
//! with oxc, lowered into arenas of elements, attributes and import
//! declarations addressed by stable handles, edited in place, and printed back
//! by splicing the edits into the original text.

pub mod document;
pub mod error;
pub mod node;
mod parser;
mod printer;
pub mod value;

pub use document::Document;
pub use error::ParseError;
pub use node::{
    AttrId, ElementId, ImportDecl, ImportId, ImportSpec, JsxAttribute, JsxElement, NodeState,
    Origin, Span,
};
pub use value::{AttrValue, JsExpr, ObjectEntry, ObjectLiteral, Scalar};
