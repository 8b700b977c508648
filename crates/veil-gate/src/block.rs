//! Block kinds delivered by the content store.

use std::fmt;

use serde::Deserialize;

/// Type tag of a document block.
///
/// Only the listed kinds can carry a gating directive. Any other tag
/// deserializes to [`BlockType::Unsupported`] and is always rendered as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Text,
    Quote,
    BulletedList,
    NumberedList,
    Header,
    SubHeader,
    SubSubHeader,
    Callout,
    Toggle,
    Code,
    #[serde(other)]
    Unsupported,
}

impl BlockType {
    /// Tag as it appears in the content store.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Quote => "quote",
            Self::BulletedList => "bulleted_list",
            Self::NumberedList => "numbered_list",
            Self::Header => "header",
            Self::SubHeader => "sub_header",
            Self::SubSubHeader => "sub_sub_header",
            Self::Callout => "callout",
            Self::Toggle => "toggle",
            Self::Code => "code",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether blocks of this kind are checked for gating directives.
    #[must_use]
    pub fn is_gateable(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_known_tags() {
        let tags: Vec<BlockType> =
            serde_json::from_str(r#"["text", "bulleted_list", "sub_sub_header", "code"]"#).unwrap();
        assert_eq!(
            tags,
            vec![
                BlockType::Text,
                BlockType::BulletedList,
                BlockType::SubSubHeader,
                BlockType::Code
            ]
        );
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let tag: BlockType = serde_json::from_str(r#""tweet""#).unwrap();
        assert_eq!(tag, BlockType::Unsupported);
        assert!(!tag.is_gateable());
    }

    #[test]
    fn test_display_matches_tag() {
        assert_eq!(BlockType::NumberedList.to_string(), "numbered_list");
        assert_eq!(BlockType::Callout.to_string(), "callout");
    }
}
