// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::{DEFAULT_LANG, SUPPORTED_LANGS};

/// Idioma da requisição, sempre um dos suportados ("fr" ou "ar").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    /// "ar-DZ,fr;q=0.8" -> "ar". Idiomas fora da lista caem no padrão.
    pub fn from_accept_language(header_str: &str) -> Self {
        accept_language::parse(header_str)
            .iter()
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            .find(|lang| SUPPORTED_LANGS.contains(&lang.as_str()))
            .map(Locale)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_accept_language)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_subtag_is_used() {
        assert_eq!(Locale::from_accept_language("ar-DZ,fr;q=0.8").as_str(), "ar");
        assert_eq!(Locale::from_accept_language("fr-FR").as_str(), "fr");
    }

    #[test]
    fn test_unsupported_languages_are_skipped() {
        assert_eq!(Locale::from_accept_language("en-US,ar;q=0.5").as_str(), "ar");
        assert_eq!(Locale::from_accept_language("en-US").as_str(), "fr");
        assert_eq!(Locale::from_accept_language("").as_str(), "fr");
    }
}
