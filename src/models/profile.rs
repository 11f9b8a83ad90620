//! Profile configuration document and its collection items.
//!
//! The document is the unit of storage: every save replaces it wholesale, and
//! `updated_at` doubles as the cache-freshness tag for conditional GETs.

use serde::{Deserialize, Serialize};

/// Whether an item renders a symbolic icon class or an image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconMode {
    Icon,
    Image,
}

impl Default for IconMode {
    fn default() -> Self {
        IconMode::Icon
    }
}

/// One entry on the life-event timeline. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub highlight: bool,
}

/// An outbound site card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Explicit source of truth for icon-vs-image rendering.
    #[serde(default)]
    pub icon_type: IconMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub accent: bool,
}

/// A social link in the header strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: String,
    #[serde(rename = "type", default)]
    pub link_type: IconMode,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Location/status singleton shown next to the avatar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
}

/// The two named image slots, distinct from per-item icons/images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSlots {
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub background: String,
}

/// The whole-page configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub sites: Vec<SiteCard>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub info: ProfileInfo,
    #[serde(default)]
    pub images: ImageSlots,
    /// Epoch milliseconds of the last successful save. Stamped server-side,
    /// never supplied by the client; `null` until the first save.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl ProfileDocument {
    /// Weak freshness tag derived from `updated_at` (0 when never saved).
    pub fn freshness_tag(&self) -> String {
        format!("W/\"{}\"", self.updated_at.unwrap_or(0))
    }
}

/// The document served when nothing has ever been saved or the read fails.
pub fn default_document() -> ProfileDocument {
    let timeline = [
        ("1", "2025.6", "Moved into the new studio", true),
        ("2", "2024.11", "Shipped the photo archive", false),
        ("3", "2023.8", "First solo exhibition", false),
        ("4", "2021.4", "Started freelancing", false),
        ("5", "2019.9", "Graduated", false),
    ]
    .into_iter()
    .map(|(id, date, title, highlight)| TimelineEvent {
        id: id.to_string(),
        date: date.to_string(),
        title: title.to_string(),
        highlight,
    })
    .collect();

    let sites = [
        ("1", "Blog", "Notes and long-form posts", "fa-lightbulb", false),
        ("2", "Drive", "Shared files and downloads", "fa-cloud", false),
        ("3", "Gallery", "Selected photography", "fa-camera", false),
        ("4", "Contact", "Get in touch", "fa-envelope", true),
    ]
    .into_iter()
    .map(|(id, title, description, icon, accent)| SiteCard {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        icon_type: IconMode::Icon,
        image: None,
        url: "#".to_string(),
        accent,
    })
    .collect();

    ProfileDocument {
        timeline,
        sites,
        tags: [
            "Photography",
            "Design",
            "Film",
            "Coffee",
            "Cycling",
            "Open source",
            "Analog",
            "Maps",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        social_links: Vec::new(),
        info: ProfileInfo {
            location: "Hamburg".to_string(),
            status: "Available for work".to_string(),
        },
        images: ImageSlots {
            avatar: "avatar.jpg".to_string(),
            background: "background.webp".to_string(),
        },
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_shape() {
        let doc = default_document();
        assert_eq!(doc.timeline.len(), 5);
        assert_eq!(doc.sites.len(), 4);
        assert_eq!(doc.tags.len(), 8);
        assert!(doc.social_links.is_empty());
        assert!(doc.updated_at.is_none());
    }

    #[test]
    fn test_wire_format_camel_case() {
        let doc = default_document();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("socialLinks").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json["updatedAt"].is_null());
        assert_eq!(json["sites"][0]["iconType"], "icon");
    }

    #[test]
    fn test_partial_body_parses_with_defaults() {
        // A client body may omit socialLinks and leave images empty.
        let doc: ProfileDocument = serde_json::from_str(
            r#"{"timeline":[],"sites":[],"tags":["a"],"info":{"location":"X","status":"Y"},"images":{}}"#,
        )
        .unwrap();
        assert_eq!(doc.tags, vec!["a"]);
        assert!(doc.social_links.is_empty());
        assert_eq!(doc.images.avatar, "");
        assert!(doc.updated_at.is_none());
    }

    #[test]
    fn test_freshness_tag() {
        let mut doc = default_document();
        assert_eq!(doc.freshness_tag(), "W/\"0\"");
        doc.updated_at = Some(1_736_000_000_000);
        assert_eq!(doc.freshness_tag(), "W/\"1736000000000\"");
    }

    #[test]
    fn test_round_trip() {
        let doc = default_document();
        let json = serde_json::to_string(&doc).unwrap();
        let back: ProfileDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
