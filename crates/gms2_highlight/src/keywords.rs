//! Keywords coloured by the viewer
//!
//! GML control flow and declarations share the table with the GLSL ES
//! qualifiers and types used by `.vsh`/`.fsh` shader stages.

/// GML keywords
pub const GML_KEYWORDS: &[&str] = &[
    "var", "globalvar", "enum",
    "function", "break", "continue", "return", "do", "if", "else", "for", "while",
    "switch", "case", "default", "until", "with", "try", "catch", "new",
    "and", "or", "not", "delete",
];

/// GLSL ES qualifiers and types
pub const SHADER_KEYWORDS: &[&str] = &[
    "discard", "attribute", "varying", "uniform", "const", "in", "out", "inout",
    "float", "int", "void", "bool",
    "lowp", "mediump", "highp", "precision", "invariant",
    "mat2", "mat3", "mat4",
    "vec2", "vec3", "vec4",
    "ivec2", "ivec3", "ivec4",
    "bvec2", "bvec3", "bvec4",
    "sampler2D", "samplerCube", "struct",
];

/// Every keyword, GML first
pub fn keywords() -> impl Iterator<Item = &'static str> {
    GML_KEYWORDS.iter().chain(SHADER_KEYWORDS).copied()
}

/// Check if an identifier is highlighted as a keyword
pub fn is_keyword(name: &str) -> bool {
    GML_KEYWORDS.contains(&name) || SHADER_KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert!(is_keyword("if"));
        assert!(is_keyword("globalvar"));
        assert!(is_keyword("sampler2D"));
        assert!(is_keyword("inout"));
        assert!(!is_keyword("repeat"));
        assert!(!is_keyword("myVariable"));
    }

    #[test]
    fn test_no_duplicates() {
        let all: Vec<_> = keywords().collect();
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }
}
