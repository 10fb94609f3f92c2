//! SoundCloud track URL to embed player URL

const PLAYER_BASE: &str = "https://w.soundcloud.com/player/?url=";
const PLAYER_PARAMS: &str = "&color=%23ff5500&auto_play=false&hide_related=false\
&show_comments=true&show_user=true&show_reposts=false&show_teaser=true";

/// Embed URL for a configured SoundCloud link
///
/// Returns `None` for anything that is not a SoundCloud URL. Player URLs
/// pass through unchanged.
pub fn convert_to_embed_url(track_url: &str) -> Option<String> {
    if !track_url.contains("soundcloud.com") {
        return None;
    }
    if track_url.contains("w.soundcloud.com/player") {
        return Some(track_url.to_string());
    }
    Some(format!(
        "{}{}{}",
        PLAYER_BASE,
        urlencoding::encode(track_url),
        PLAYER_PARAMS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_url_is_wrapped() {
        let url = convert_to_embed_url("https://soundcloud.com/klub/set-01").unwrap();
        assert_eq!(
            url,
            "https://w.soundcloud.com/player/?url=https%3A%2F%2Fsoundcloud.com%2Fklub%2Fset-01\
&color=%23ff5500&auto_play=false&hide_related=false&show_comments=true&show_user=true\
&show_reposts=false&show_teaser=true"
        );
    }

    #[test]
    fn test_player_url_passes_through() {
        let player = "https://w.soundcloud.com/player/?url=https%3A//api.soundcloud.com/tracks/1";
        assert_eq!(convert_to_embed_url(player).as_deref(), Some(player));
    }

    #[test]
    fn test_other_hosts_rejected() {
        assert_eq!(convert_to_embed_url("https://example.com/track"), None);
        assert_eq!(convert_to_embed_url(""), None);
    }
}
