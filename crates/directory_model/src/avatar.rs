use url::Url;

use crate::Profile;

/// Generated avatar image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSize {
    /// Directory profile card
    Card,
    /// Admin panel list thumbnail
    Thumbnail,
}

impl AvatarSize {
    pub fn pixels(&self) -> u32 {
        match self {
            Self::Card => 200,
            Self::Thumbnail => 50,
        }
    }

    fn font_size(&self) -> &'static str {
        match self {
            Self::Card => "0.33",
            Self::Thumbnail => "0.5",
        }
    }

    fn placeholder_path(&self) -> String {
        let px = self.pixels();
        match self {
            Self::Card => format!("{px}x{px}"),
            Self::Thumbnail => px.to_string(),
        }
    }
}

/// Deterministic avatar URLs for profiles without a photo.
#[derive(Debug, Clone)]
pub struct AvatarUrls {
    avatar_url: Url,
    placeholder_url: String,
}

impl AvatarUrls {
    pub fn new(avatar_url: Url, placeholder_url: String) -> Self {
        Self {
            avatar_url,
            placeholder_url,
        }
    }

    pub fn avatar_url(&self, name: &str, size: AvatarSize) -> String {
        if name.is_empty() {
            return format!("{}{}", self.placeholder_url, size.placeholder_path());
        }

        let mut url = self.avatar_url.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("size", &size.pixels().to_string())
            .append_pair("background", "random")
            .append_pair("color", "fff")
            .append_pair("font-size", size.font_size());
        url.into()
    }

    /// Profile photo or generated avatar if the photo is missing.
    pub fn image_url(&self, profile: &Profile, size: AvatarSize) -> String {
        match &profile.photo {
            Some(photo) => photo.clone(),
            None => self.avatar_url(&profile.name, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileId;

    fn urls() -> AvatarUrls {
        AvatarUrls::new(
            Url::parse("https://ui-avatars.com/api/").unwrap(),
            "https://via.placeholder.com/".to_string(),
        )
    }

    #[test]
    fn card_avatar_is_derived_from_name() {
        assert_eq!(
            urls().avatar_url("Ada Lovelace", AvatarSize::Card),
            "https://ui-avatars.com/api/?name=Ada+Lovelace&size=200&background=random&color=fff&font-size=0.33",
        );
    }

    #[test]
    fn thumbnail_avatar_uses_smaller_size() {
        let url = urls().avatar_url("Ada", AvatarSize::Thumbnail);
        assert!(url.contains("size=50"));
        assert!(url.contains("font-size=0.5"));
    }

    #[test]
    fn empty_name_uses_placeholder() {
        assert_eq!(
            urls().avatar_url("", AvatarSize::Card),
            "https://via.placeholder.com/200x200"
        );
        assert_eq!(
            urls().avatar_url("", AvatarSize::Thumbnail),
            "https://via.placeholder.com/50"
        );
    }

    #[test]
    fn own_photo_is_preferred() {
        let mut profile = Profile::from_document_fields(
            ProfileId::new("1".to_string()),
            Some("Ada".to_string()),
            Some("https://example.com/ada.jpg".to_string()),
            None,
            None,
        );
        assert_eq!(
            urls().image_url(&profile, AvatarSize::Card),
            "https://example.com/ada.jpg"
        );
        profile.photo = None;
        assert!(urls().image_url(&profile, AvatarSize::Card).starts_with("https://ui-avatars.com/api/?name=Ada"));
    }
}
