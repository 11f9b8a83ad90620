//! Data collection: the literal inverse of rendering.
//!
//! Drafts hold whatever the edit surface could read back, so every required
//! field is an `Option`. Collection normalizes a draft into a complete
//! document: incomplete items are skipped rather than failing the save,
//! missing ids are minted, and all top-level keys are always present.

use chrono::Utc;

use crate::models::{
    IconMode, ImageSlots, ProfileDocument, ProfileInfo, SiteCard, SocialLink, TimelineEvent,
};

/// Opaque best-effort-unique item id: base36 millis plus a random suffix.
/// Uniqueness is not enforced anywhere downstream.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &suffix[..9])
}

fn to_base36(mut n: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_or_fresh(id: &Option<String>) -> String {
    trimmed(id).unwrap_or_else(generate_id)
}

/// A timeline row as read back from the edit surface.
#[derive(Debug, Clone, Default)]
pub struct TimelineDraft {
    pub id: Option<String>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub highlight: bool,
}

/// A site card as read back from the edit surface (modal-edited).
#[derive(Debug, Clone, Default)]
pub struct SiteDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Explicit mode wins; `None` falls back to presence-based inference.
    pub icon_type: Option<IconMode>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub accent: bool,
}

/// A social link as read back from the edit surface (modal-edited).
#[derive(Debug, Clone, Default)]
pub struct SocialDraft {
    pub id: Option<String>,
    pub link_type: Option<IconMode>,
    pub href: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
}

/// Everything the edit surface holds between enter-edit and save.
#[derive(Debug, Clone, Default)]
pub struct DraftDocument {
    pub timeline: Vec<TimelineDraft>,
    pub sites: Vec<SiteDraft>,
    pub tags: Vec<String>,
    pub social_links: Vec<SocialDraft>,
    pub info: ProfileInfo,
    pub images: ImageSlots,
}

impl DraftDocument {
    /// Project a document onto the edit surface.
    pub fn from_document(document: &ProfileDocument) -> Self {
        Self {
            timeline: document
                .timeline
                .iter()
                .map(|event| TimelineDraft {
                    id: Some(event.id.clone()),
                    date: Some(event.date.clone()),
                    title: Some(event.title.clone()),
                    highlight: event.highlight,
                })
                .collect(),
            sites: document
                .sites
                .iter()
                .map(|site| SiteDraft {
                    id: Some(site.id.clone()),
                    title: Some(site.title.clone()),
                    description: Some(site.description.clone()),
                    icon: Some(site.icon.clone()),
                    icon_type: Some(site.icon_type),
                    image: site.image.clone(),
                    url: Some(site.url.clone()),
                    accent: site.accent,
                })
                .collect(),
            tags: document.tags.clone(),
            social_links: document
                .social_links
                .iter()
                .map(|link| SocialDraft {
                    id: Some(link.id.clone()),
                    link_type: Some(link.link_type),
                    href: Some(link.href.clone()),
                    icon: Some(link.icon.clone()),
                    image: link.image.clone(),
                })
                .collect(),
            info: document.info.clone(),
            images: document.images.clone(),
        }
    }
}

/// Reconstruct a document from the edit surface, in draft order.
///
/// `fallback` supplies the singletons (info, image slots) when the draft
/// left them blank; `updated_at` is always cleared — the server stamps it.
pub fn collect(draft: &DraftDocument, fallback: &ProfileDocument) -> ProfileDocument {
    let timeline = draft
        .timeline
        .iter()
        .filter_map(|row| {
            // A row missing its date or title is dropped, not an error.
            let date = trimmed(&row.date)?;
            let title = trimmed(&row.title)?;
            Some(TimelineEvent {
                id: id_or_fresh(&row.id),
                date,
                title,
                highlight: row.highlight,
            })
        })
        .collect();

    let sites = draft
        .sites
        .iter()
        .filter_map(|row| {
            let title = trimmed(&row.title)?;
            let image = trimmed(&row.image);
            let icon_type = row.icon_type.unwrap_or(if image.is_some() {
                IconMode::Image
            } else {
                IconMode::Icon
            });
            Some(SiteCard {
                id: id_or_fresh(&row.id),
                title,
                description: trimmed(&row.description).unwrap_or_default(),
                icon: trimmed(&row.icon).unwrap_or_else(|| "fa-link".to_string()),
                icon_type,
                image,
                url: trimmed(&row.url).unwrap_or_else(|| "#".to_string()),
                accent: row.accent,
            })
        })
        .collect();

    let tags = draft
        .tags
        .iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let social_links = draft
        .social_links
        .iter()
        .filter_map(|row| {
            let href = trimmed(&row.href)?;
            let image = trimmed(&row.image);
            let link_type = row.link_type.unwrap_or(if image.is_some() {
                IconMode::Image
            } else {
                IconMode::Icon
            });
            Some(SocialLink {
                id: id_or_fresh(&row.id),
                link_type,
                href,
                icon: trimmed(&row.icon).unwrap_or_else(|| "fa-link".to_string()),
                image,
            })
        })
        .collect();

    let info = ProfileInfo {
        location: non_blank(&draft.info.location, &fallback.info.location),
        status: non_blank(&draft.info.status, &fallback.info.status),
    };

    let images = ImageSlots {
        avatar: non_blank(&draft.images.avatar, &fallback.images.avatar),
        background: non_blank(&draft.images.background, &fallback.images.background),
    };

    ProfileDocument {
        timeline,
        sites,
        tags,
        social_links,
        info,
        images,
        updated_at: None,
    }
}

fn non_blank(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_document;

    #[test]
    fn test_generate_id_is_opaque_and_fresh() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.len() > 9);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let doc = default_document();
        let draft = DraftDocument::from_document(&doc);
        let collected = collect(&draft, &doc);

        assert_eq!(collected.timeline, doc.timeline);
        assert_eq!(collected.sites, doc.sites);
        assert_eq!(collected.tags, doc.tags);
        assert_eq!(collected.info, doc.info);
        assert_eq!(collected.images, doc.images);
        assert!(collected.updated_at.is_none());
    }

    #[test]
    fn test_incomplete_items_are_skipped() {
        let doc = default_document();
        let mut draft = DraftDocument::from_document(&doc);
        draft.timeline.push(TimelineDraft {
            id: None,
            date: Some("2025.1".to_string()),
            title: None,
            highlight: false,
        });
        draft.sites.push(SiteDraft {
            title: Some("  ".to_string()),
            ..Default::default()
        });
        draft.social_links.push(SocialDraft::default());

        let collected = collect(&draft, &doc);
        assert_eq!(collected.timeline.len(), doc.timeline.len());
        assert_eq!(collected.sites.len(), doc.sites.len());
        assert!(collected.social_links.is_empty());
    }

    #[test]
    fn test_missing_ids_are_minted() {
        let doc = default_document();
        let mut draft = DraftDocument::default();
        draft.timeline.push(TimelineDraft {
            id: None,
            date: Some("2025.1".to_string()),
            title: Some("New event".to_string()),
            highlight: false,
        });

        let collected = collect(&draft, &doc);
        assert_eq!(collected.timeline.len(), 1);
        assert!(!collected.timeline[0].id.is_empty());
    }

    #[test]
    fn test_mode_inference_only_when_unset() {
        let doc = default_document();
        let mut draft = DraftDocument::default();
        draft.social_links.push(SocialDraft {
            href: Some("https://example.org".to_string()),
            image: Some("/api/images/s.png".to_string()),
            ..Default::default()
        });
        draft.social_links.push(SocialDraft {
            href: Some("https://example.com".to_string()),
            link_type: Some(IconMode::Icon),
            image: Some("/api/images/ignored.png".to_string()),
            ..Default::default()
        });

        let collected = collect(&draft, &doc);
        assert_eq!(collected.social_links[0].link_type, IconMode::Image);
        // The explicit stored mode is the source of truth.
        assert_eq!(collected.social_links[1].link_type, IconMode::Icon);
    }

    #[test]
    fn test_output_always_has_all_keys() {
        let doc = default_document();
        let collected = collect(&DraftDocument::default(), &doc);
        let json = serde_json::to_value(&collected).unwrap();

        for key in ["timeline", "sites", "tags", "socialLinks", "info", "images"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert!(json["timeline"].as_array().unwrap().is_empty());
        // Blank singletons fall back to the current document.
        assert_eq!(json["info"]["location"], doc.info.location);
        assert_eq!(json["images"]["avatar"], doc.images.avatar);
    }

    #[test]
    fn test_blank_tags_are_dropped() {
        let doc = default_document();
        let draft = DraftDocument {
            tags: vec!["  a ".to_string(), "".to_string(), "  ".to_string()],
            ..Default::default()
        };

        let collected = collect(&draft, &doc);
        assert_eq!(collected.tags, vec!["a"]);
    }
}
