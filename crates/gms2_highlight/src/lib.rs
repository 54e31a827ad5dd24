//! GMS2 Highlight - Token classification for the code viewer
//!
//! Colours GML and GLSL ES source with a stack of regular-expression passes:
//! project word lists first, then keywords, values, strings and comments.
//! Later passes win where matches overlap.

pub mod highlight;
pub mod keywords;
pub mod style;
pub mod syntax;

pub use highlight::{Highlighter, Segment, TokenClass};
pub use style::{Rgb, Style};
pub use syntax::{SyntaxInfo, WordLists};
