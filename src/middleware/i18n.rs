// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

pub const DEFAULT_LANG: &str = "en";

// Idioma do cliente, vindo do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

/// "tr-TR,tr;q=0.9" → "tr". Cabeçalho ausente ou vazio → "en".
pub fn primary_language(header_value: Option<&str>) -> String {
    header_value
        .and_then(|header_str| {
            accept_language::parse(header_str)
                .first()
                .and_then(|tag| tag.split('-').next())
                .map(|lang| lang.to_lowercase())
        })
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LANG.to_string())
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        Ok(Locale(primary_language(header_value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_priority_primary_tag() {
        assert_eq!(primary_language(Some("tr-TR,tr;q=0.9,en;q=0.8")), "tr");
        assert_eq!(primary_language(Some("en;q=0.5,pt-BR")), "pt");
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(primary_language(None), "en");
        assert_eq!(primary_language(Some("")), "en");
    }
}
