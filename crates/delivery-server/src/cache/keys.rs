//! Cache key generation and normalization.

use std::fmt;

use delivery_core::NormalizedDimensions;

const KEY_PREFIX: &str = "campaign";

/// Key de cache para el resultado de delivery de una tupla de dimensiones.
///
/// Formato: `campaign:{app}:{os}:{country}`, siempre en lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    app: String,
    os: String,
    country: String,
}

impl CacheKey {
    /// Crea una nueva cache key normalizando los valores a lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use delivery_server::cache::CacheKey;
    ///
    /// let key = CacheKey::new("com.Spotify", "US", "Android");
    /// assert_eq!(key.to_string(), "campaign:com.spotify:android:us");
    /// ```
    pub fn new(app: impl Into<String>, country: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            app: app.into().to_lowercase(),
            os: os.into().to_lowercase(),
            country: country.into().to_lowercase(),
        }
    }

    /// Crea la key a partir de dimensiones ya normalizadas.
    pub fn for_dimensions(dimensions: &NormalizedDimensions) -> Self {
        Self {
            app: dimensions.app_id().to_string(),
            os: dimensions.os().to_string(),
            country: dimensions.country().to_string(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", KEY_PREFIX, self.app, self.os, self.country)
    }
}

/// Key del set que indexa las cache keys pobladas con una campaña.
///
/// ```
/// use delivery_server::cache::index_key;
///
/// assert_eq!(index_key("spotify"), "campaign:spotify:keys");
/// ```
pub fn index_key(campaign_id: &str) -> String {
    format!("{}:{}:keys", KEY_PREFIX, campaign_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_core::Dimensions;

    #[test]
    fn test_cache_key_normalization() {
        let key1 = CacheKey::new("WhatsApp", "BR", "ANDROID");
        let key2 = CacheKey::new("whatsapp", "br", "android");

        assert_eq!(key1, key2);
        assert_eq!(key1.to_string(), "campaign:whatsapp:android:br");
    }

    #[test]
    fn test_key_from_dimensions_matches_new() {
        let dimensions = Dimensions::new("Duolingo", "IN", "iOS").normalize();

        assert_eq!(
            CacheKey::for_dimensions(&dimensions),
            CacheKey::new("duolingo", "in", "ios")
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = Dimensions::new("MyApp", "Us", "Android").normalize();
        let twice = Dimensions::new(once.app_id(), once.country(), once.os()).normalize();

        assert_eq!(
            CacheKey::for_dimensions(&once).to_string(),
            CacheKey::for_dimensions(&twice).to_string()
        );
    }

    #[test]
    fn test_index_key_keeps_campaign_id() {
        assert_eq!(index_key("zepto"), "campaign:zepto:keys");
    }
}
