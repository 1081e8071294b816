//! Request dimensions and their normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DeliveryError, Result};

/// Axis along which targeting rules constrain eligibility.
///
/// The string form is the `dimension` field stored in targeting rules.
///
/// # Example
///
/// ```
/// use delivery_core::Dimension;
///
/// assert_eq!(Dimension::App.as_str(), "app");
/// assert_eq!(Dimension::ALL.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Application identifier (e.g. `com.whatsapp`).
    App,
    /// Country of the requester.
    Country,
    /// Operating system of the requester.
    Os,
}

impl Dimension {
    /// Every dimension, in the order they are combined into a targeting filter.
    pub const ALL: [Dimension; 3] = [Dimension::App, Dimension::Country, Dimension::Os];

    /// Returns the stored name of this dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Country => "country",
            Self::Os => "os",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimension tuple as supplied by the caller, in whatever casing it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Application identifier.
    pub app_id: String,
    /// Country.
    pub country: String,
    /// Operating system.
    pub os: String,
}

impl Dimensions {
    /// Creates a new dimension tuple.
    pub fn new(
        app_id: impl Into<String>,
        country: impl Into<String>,
        os: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            country: country.into(),
            os: os.into(),
        }
    }

    /// Rejects tuples with a blank field.
    ///
    /// # Example
    ///
    /// ```
    /// use delivery_core::Dimensions;
    ///
    /// assert!(Dimensions::new("spotify", "us", "android").validate().is_ok());
    /// assert!(Dimensions::new("spotify", "  ", "android").validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        for dimension in Dimension::ALL {
            if self.value(dimension).trim().is_empty() {
                return Err(DeliveryError::invalid_dimension(
                    dimension.as_str(),
                    format!("Parameter {} is required", dimension),
                ));
            }
        }
        Ok(())
    }

    /// Returns the raw value supplied for a dimension.
    pub fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::App => &self.app_id,
            Dimension::Country => &self.country,
            Dimension::Os => &self.os,
        }
    }

    /// Lower-cases every field.
    ///
    /// This is the only way to obtain a [`NormalizedDimensions`], which is
    /// what cache-key derivation and rule matching accept.
    pub fn normalize(&self) -> NormalizedDimensions {
        NormalizedDimensions {
            app_id: self.app_id.to_lowercase(),
            country: self.country.to_lowercase(),
            os: self.os.to_lowercase(),
        }
    }
}

/// Dimension tuple after lower-casing.
///
/// # Example
///
/// ```
/// use delivery_core::Dimensions;
///
/// let a = Dimensions::new("App", "US", "Android").normalize();
/// let b = Dimensions::new("app", "us", "android").normalize();
/// assert_eq!(a, b);
/// assert_eq!(a.country(), "us");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedDimensions {
    app_id: String,
    country: String,
    os: String,
}

impl NormalizedDimensions {
    /// Returns the application identifier.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the country.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Returns the operating system.
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Returns the normalized value of a dimension.
    pub fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::App => &self.app_id,
            Dimension::Country => &self.country,
            Dimension::Os => &self.os,
        }
    }
}

impl fmt::Display for NormalizedDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.app_id, self.country, self.os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_every_field() {
        let normalized = Dimensions::new("COM.WhatsApp", "Brazil", "ANDROID").normalize();

        assert_eq!(normalized.app_id(), "com.whatsapp");
        assert_eq!(normalized.country(), "brazil");
        assert_eq!(normalized.os(), "android");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = Dimensions::new("Spotify", "US", "iOS").normalize();
        let twice = Dimensions::new(once.app_id(), once.country(), once.os()).normalize();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_validate_reports_first_blank_dimension() {
        let err = Dimensions::new("spotify", "", "").validate().unwrap_err();

        match err {
            DeliveryError::InvalidDimension { dimension, reason } => {
                assert_eq!(dimension, "country");
                assert_eq!(reason, "Parameter country is required");
            },
            other => panic!("Expected InvalidDimension, got {:?}", other),
        }
    }

    #[test]
    fn test_dimension_serde_names() {
        let json = serde_json::to_string(&Dimension::Os).unwrap();
        assert_eq!(json, r#""os""#);

        let parsed: Dimension = serde_json::from_str(r#""country""#).unwrap();
        assert_eq!(parsed, Dimension::Country);
    }
}
