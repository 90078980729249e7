//! Ordered body content of an article

use serde::{Deserialize, Serialize};

/// One node of an article body, in document order
///
/// Serialized with a `type` discriminator: `{"type": "html", "content": ...}`
/// for text fragments and `{"type": "image", "src": ..., "caption": ...}` for
/// images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentNode {
    /// A cleaned fragment of body markup other than figures/images
    #[serde(rename = "html")]
    Text {
        #[serde(rename = "content")]
        html: String,
    },

    /// One image found in the body
    #[serde(rename = "image")]
    Image {
        src: String,
        #[serde(default)]
        caption: String,
    },
}

impl ContentNode {
    pub fn text(html: impl Into<String>) -> Self {
        Self::Text { html: html.into() }
    }

    pub fn image(src: impl Into<String>, caption: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            caption: caption.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}
