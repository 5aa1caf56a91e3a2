use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity handed to the core by the external authentication layer.
///
/// The core trusts this value as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub author_id: Uuid,
    pub display_name: String,
    /// Durable contact identifier (phone number or email). Never serialized.
    #[serde(skip_serializing, default)]
    pub contact: Option<String>,
    pub masked_contact: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(author_id: Uuid, display_name: impl Into<String>, contact: Option<String>) -> Self {
        let contact = contact.filter(|c| !c.trim().is_empty());
        let masked_contact = contact.as_deref().map(mask_contact);
        Self {
            author_id,
            display_name: display_name.into(),
            contact,
            masked_contact,
        }
    }
}

/// Minimal public profile shown next to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub author_id: Uuid,
    pub display_name: String,
    pub masked_contact: Option<String>,
}

impl AuthorProfile {
    pub fn new(author_id: Uuid, display_name: impl Into<String>, contact: Option<&str>) -> Self {
        Self {
            author_id,
            display_name: display_name.into(),
            masked_contact: contact.filter(|c| !c.is_empty()).map(mask_contact),
        }
    }
}

/// Mask a contact identifier, keeping only its last two characters.
pub fn mask_contact(contact: &str) -> String {
    let chars: Vec<char> = contact.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
    format!("********{tail}")
}
