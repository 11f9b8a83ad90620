//! Region renderers: configuration document in, HTML fragment out.
//!
//! Pure functions — rendering never persists anything. Each list container
//! keeps its trailing "add" control so the edit surface can re-render a
//! region without losing the control's position.

use crate::models::{IconMode, ProfileDocument, SiteCard, SocialLink, TimelineEvent};

fn text(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

fn attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

fn add_control(region: &str) -> String {
    format!(
        "<button class=\"edit-add-btn hidden\" data-add=\"{}\">+</button>",
        attr(region)
    )
}

/// Normalize a symbolic icon name into a full class list.
fn icon_class(icon: &str) -> String {
    if icon.is_empty() {
        "fas fa-link".to_string()
    } else if icon.starts_with("fa-") {
        format!("fas {}", icon)
    } else if icon.starts_with("fas ") || icon.starts_with("fab ") || icon.starts_with("far ") {
        icon.to_string()
    } else {
        format!("fas fa-{}", icon)
    }
}

/// Render the life-event timeline. The first entry always gets the highlight
/// treatment, whatever its stored flag says.
pub fn render_timeline(timeline: &[TimelineEvent]) -> String {
    let mut out = String::new();

    for (index, event) in timeline.iter().enumerate() {
        let highlight = index == 0;
        out.push_str(&format!(
            "<div class=\"timeline-item{}\" data-editable=\"timeline\" data-id=\"{}\">\
             <div class=\"timeline-date\" data-field=\"date\">{}</div>\
             <h4 class=\"timeline-title\" data-field=\"title\">{}</h4>\
             </div>",
            if highlight { " timeline-highlight" } else { "" },
            attr(&event.id),
            text(&event.date),
            text(&event.title),
        ));
    }

    out.push_str(&add_control("timeline"));
    out
}

/// Render the tag list.
pub fn render_tags(tags: &[String]) -> String {
    let mut out = String::new();

    for tag in tags {
        out.push_str(&format!(
            "<span class=\"tag\" data-editable=\"tag\"><span data-field=\"tag\">{}</span></span>",
            text(tag),
        ));
    }

    out.push_str(&add_control("tag"));
    out
}

/// Render the outbound site cards.
pub fn render_sites(sites: &[SiteCard]) -> String {
    let mut out = String::new();

    for site in sites {
        let badge = match (site.icon_type, site.image.as_deref()) {
            (IconMode::Image, Some(image)) => format!(
                "<img class=\"site-card-icon\" src=\"{}\" alt=\"\" data-field=\"image\" />",
                attr(image),
            ),
            _ => format!(
                "<div class=\"site-card-icon{}\" data-field=\"icon\"><i class=\"{}\"></i></div>",
                if site.accent { " accent" } else { "" },
                attr(&icon_class(&site.icon)),
            ),
        };

        out.push_str(&format!(
            "<a class=\"site-card{}\" href=\"{}\" data-editable=\"site\" data-id=\"{}\" data-url=\"{}\">\
             <h3 data-field=\"title\">{}</h3>{}\
             <p data-field=\"description\">{}</p>\
             </a>",
            if site.accent { " site-accent" } else { "" },
            attr(&site.url),
            attr(&site.id),
            attr(&site.url),
            text(&site.title),
            badge,
            text(&site.description),
        ));
    }

    out.push_str(&add_control("site"));
    out
}

/// Render the social-link strip.
pub fn render_social_links(social_links: &[SocialLink]) -> String {
    let mut out = String::new();

    for link in social_links {
        let inner = match (link.link_type, link.image.as_deref()) {
            (IconMode::Image, Some(image)) => format!(
                "<img class=\"social-image\" src=\"{}\" alt=\"Social\" data-field=\"image\" />",
                attr(image),
            ),
            _ => format!(
                "<i class=\"{}\" data-field=\"icon\"></i>",
                attr(&icon_class(&link.icon)),
            ),
        };

        out.push_str(&format!(
            "<a class=\"social-icon\" href=\"{}\" data-editable=\"social\" data-id=\"{}\" data-type=\"{}\">{}</a>",
            attr(&link.href),
            attr(&link.id),
            match link.link_type {
                IconMode::Icon => "icon",
                IconMode::Image => "image",
            },
            inner,
        ));
    }

    out.push_str(&add_control("social"));
    out
}

/// Render the location/status line.
pub fn render_info(document: &ProfileDocument) -> String {
    format!(
        "<span data-field=\"location\">{}</span><span data-field=\"status\">{}</span>",
        text(&document.info.location),
        text(&document.info.status),
    )
}

/// Render the avatar and background slots.
pub fn render_image_slots(document: &ProfileDocument) -> String {
    format!(
        "<img class=\"avatar\" src=\"{}\" alt=\"Avatar\" data-field=\"avatar\" />\
         <img class=\"background\" src=\"{}\" alt=\"\" data-field=\"background\" />",
        attr(&document.images.avatar),
        attr(&document.images.background),
    )
}

/// Compose the full page around the region fragments.
pub fn render_page(document: &ProfileDocument) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\" />\
         <title>Home</title></head><body>\
         <div class=\"backdrop\">{}</div>\
         <header><div id=\"profileInfo\">{}</div>\
         <div id=\"socialLinksContainer\">{}</div></header>\
         <main><section id=\"timelineItems\">{}</section>\
         <section id=\"tagsContainer\">{}</section>\
         <section id=\"sitesContainer\">{}</section></main>\
         </body></html>",
        render_image_slots(document),
        render_info(document),
        render_social_links(&document.social_links),
        render_timeline(&document.timeline),
        render_tags(&document.tags),
        render_sites(&document.sites),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_document;

    #[test]
    fn test_rendering_is_idempotent() {
        let doc = default_document();
        assert_eq!(render_page(&doc), render_page(&doc));
        assert_eq!(
            render_timeline(&doc.timeline),
            render_timeline(&doc.timeline)
        );
    }

    #[test]
    fn test_first_timeline_entry_is_highlighted() {
        let mut doc = default_document();
        // Stored flags say otherwise; render order wins.
        for event in &mut doc.timeline {
            event.highlight = false;
        }
        doc.timeline[1].highlight = true;

        let html = render_timeline(&doc.timeline);
        assert_eq!(html.matches("timeline-highlight").count(), 1);
        assert!(html.starts_with("<div class=\"timeline-item timeline-highlight\""));
    }

    #[test]
    fn test_add_control_stays_trailing() {
        let doc = default_document();
        for html in [
            render_timeline(&doc.timeline),
            render_tags(&doc.tags),
            render_sites(&doc.sites),
            render_social_links(&doc.social_links),
        ] {
            assert!(html.ends_with("</button>"));
            assert!(html.contains("edit-add-btn"));
        }
    }

    #[test]
    fn test_empty_regions_still_carry_add_control() {
        assert!(render_timeline(&[]).contains("data-add=\"timeline\""));
        assert!(render_tags(&[]).contains("data-add=\"tag\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = default_document();
        doc.tags = vec!["<script>alert(1)</script>".to_string()];
        let html = render_tags(&doc.tags);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_icon_class_normalization() {
        assert_eq!(icon_class("fa-cloud"), "fas fa-cloud");
        assert_eq!(icon_class("cloud"), "fas fa-cloud");
        assert_eq!(icon_class("fab fa-github"), "fab fa-github");
        assert_eq!(icon_class(""), "fas fa-link");
    }

    #[test]
    fn test_site_badge_follows_stored_mode() {
        let mut doc = default_document();
        doc.sites[0].icon_type = IconMode::Image;
        doc.sites[0].image = Some("/api/images/site_1.png".to_string());

        let html = render_sites(&doc.sites);
        assert!(html.contains("src=\"/api/images/site_1.png\""));

        // Image mode without an image URL falls back to the icon badge.
        doc.sites[0].image = None;
        let html = render_sites(&doc.sites);
        assert!(!html.contains("src=\"/api/images/site_1.png\""));
        assert!(html.contains("data-field=\"icon\""));
    }
}
