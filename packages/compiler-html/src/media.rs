//! Remote media lookups: social network icons and video thumbnails.

use mailbuilder_blocks::{SocialIconStyle, SocialLink};
use regex::Regex;
use std::sync::OnceLock;

const ICON_CDN: &str = "https://cdn.simpleicons.org";

struct Platform {
    name: &'static str,
    label: &'static str,
    slug: &'static str,
    brand_color: &'static str,
}

const PLATFORMS: &[Platform] = &[
    Platform { name: "facebook", label: "Facebook", slug: "facebook", brand_color: "1877F2" },
    Platform { name: "twitter", label: "X", slug: "x", brand_color: "000000" },
    Platform { name: "x", label: "X", slug: "x", brand_color: "000000" },
    Platform { name: "instagram", label: "Instagram", slug: "instagram", brand_color: "E4405F" },
    Platform { name: "linkedin", label: "LinkedIn", slug: "linkedin", brand_color: "0A66C2" },
    Platform { name: "youtube", label: "YouTube", slug: "youtube", brand_color: "FF0000" },
    Platform { name: "tiktok", label: "TikTok", slug: "tiktok", brand_color: "000000" },
    Platform { name: "pinterest", label: "Pinterest", slug: "pinterest", brand_color: "BD081C" },
    Platform { name: "github", label: "GitHub", slug: "github", brand_color: "181717" },
    Platform { name: "discord", label: "Discord", slug: "discord", brand_color: "5865F2" },
    Platform { name: "whatsapp", label: "WhatsApp", slug: "whatsapp", brand_color: "25D366" },
    Platform { name: "telegram", label: "Telegram", slug: "telegram", brand_color: "26A5E4" },
    Platform { name: "threads", label: "Threads", slug: "threads", brand_color: "000000" },
    Platform { name: "reddit", label: "Reddit", slug: "reddit", brand_color: "FF4500" },
];

fn platform(name: &str) -> Option<&'static Platform> {
    let name = name.trim().to_ascii_lowercase();
    PLATFORMS.iter().find(|p| p.name == name)
}

/// Human readable platform name, used as the icon's alt text
pub fn platform_label(name: &str) -> String {
    match platform(name) {
        Some(p) => p.label.to_string(),
        None => {
            let mut chars = name.trim().chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Icon URL for a social link, honoring a custom icon when set
pub fn social_icon_url(link: &SocialLink, style: SocialIconStyle) -> String {
    if let Some(icon) = link.custom_icon.as_deref().filter(|i| !i.is_empty()) {
        return icon.to_string();
    }

    let known = platform(&link.platform);
    let slug = known
        .map(|p| p.slug.to_string())
        .unwrap_or_else(|| link.platform.trim().to_ascii_lowercase());
    let color = match style {
        SocialIconStyle::Color => known.map(|p| p.brand_color).unwrap_or("6B7280"),
        SocialIconStyle::Dark => "000000",
        SocialIconStyle::Light => "FFFFFF",
        SocialIconStyle::Gray => "6B7280",
    };

    format!("{}/{}/{}", ICON_CDN, slug, color)
}

fn youtube_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|v/)|youtu\.be/)([A-Za-z0-9_-]{6,})",
        )
        .expect("youtube pattern compiles")
    })
}

fn vimeo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"vimeo\.com/(?:video/)?(\d+)").expect("vimeo pattern compiles")
    })
}

/// Thumbnail derived from a known video host's URL
pub fn video_thumbnail(url: &str) -> Option<String> {
    if let Some(caps) = youtube_pattern().captures(url) {
        return Some(format!("https://img.youtube.com/vi/{}/hqdefault.jpg", &caps[1]));
    }
    if let Some(caps) = vimeo_pattern().captures(url) {
        return Some(format!("https://vumbnail.com/{}.jpg", &caps[1]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(platform: &str) -> SocialLink {
        SocialLink {
            id: "link_1".to_string(),
            platform: platform.to_string(),
            url: "https://example.com".to_string(),
            custom_icon: None,
        }
    }

    #[test]
    fn test_youtube_variants() {
        let expected = Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string());
        assert_eq!(video_thumbnail("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(video_thumbnail("https://youtu.be/dQw4w9WgXcQ"), expected);
        assert_eq!(video_thumbnail("https://www.youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(
            video_thumbnail("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            expected
        );
    }

    #[test]
    fn test_vimeo_and_unknown_hosts() {
        assert_eq!(
            video_thumbnail("https://vimeo.com/76979871"),
            Some("https://vumbnail.com/76979871.jpg".to_string())
        );
        assert_eq!(video_thumbnail("https://example.com/movie.mp4"), None);
    }

    #[test]
    fn test_icon_colors_follow_style() {
        assert_eq!(
            social_icon_url(&link("facebook"), SocialIconStyle::Color),
            "https://cdn.simpleicons.org/facebook/1877F2"
        );
        assert_eq!(
            social_icon_url(&link("Twitter"), SocialIconStyle::Light),
            "https://cdn.simpleicons.org/x/FFFFFF"
        );
        assert_eq!(
            social_icon_url(&link("mastodon"), SocialIconStyle::Color),
            "https://cdn.simpleicons.org/mastodon/6B7280"
        );
    }

    #[test]
    fn test_custom_icon_wins() {
        let mut custom = link("facebook");
        custom.custom_icon = Some("https://cdn.example.com/fb.png".to_string());
        assert_eq!(
            social_icon_url(&custom, SocialIconStyle::Dark),
            "https://cdn.example.com/fb.png"
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(platform_label("linkedin"), "LinkedIn");
        assert_eq!(platform_label("mastodon"), "Mastodon");
    }
}
