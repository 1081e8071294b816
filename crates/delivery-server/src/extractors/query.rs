use delivery_core::Dimensions;
use serde::Deserialize;

/// Query parameters de `GET /v1/delivery`.
///
/// Todos son opcionales en la deserializacion para que un parametro faltante
/// se reporte como 400 con el nombre de la dimension, no como un rechazo
/// generico del extractor.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DeliveryQuery {
    pub app: Option<String>,
    pub country: Option<String>,
    pub os: Option<String>,
}

impl DeliveryQuery {
    /// Convierte los parametros en dimensiones (sin validar).
    pub fn into_dimensions(self) -> Dimensions {
        Dimensions::new(
            self.app.unwrap_or_default(),
            self.country.unwrap_or_default(),
            self.os.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_become_empty() {
        let query = DeliveryQuery {
            app: Some("spotify".to_string()),
            ..Default::default()
        };

        let dimensions = query.into_dimensions();
        assert_eq!(dimensions.app_id, "spotify");
        assert!(dimensions.country.is_empty());
        assert!(dimensions.validate().is_err());
    }
}
