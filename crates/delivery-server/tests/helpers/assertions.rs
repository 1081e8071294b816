//! Custom assertions para tests.

use serde_json::Value;

/// Verifica el cuerpo de error `{code, statusCode, reason}`.
pub fn assert_error_body(json: &Value, code: &str, status: u16) {
    let obj = json.as_object().expect("Error body should be a JSON object");

    assert_eq!(obj["code"], code, "unexpected error code in {}", json);
    assert_eq!(obj["statusCode"], status, "unexpected statusCode in {}", json);
    assert!(obj["reason"].is_string(), "'reason' should be a string");
}

/// Verifica que la respuesta sea un array de `{cid, img, cta}` y retorna los ids.
pub fn assert_campaign_array(json: &Value) -> Vec<String> {
    let items = json.as_array().expect("Response should be a JSON array");

    items
        .iter()
        .map(|item| {
            let obj = item.as_object().expect("Campaign should be an object");
            assert_eq!(obj.len(), 3, "Campaign should only carry cid, img, cta: {}", item);
            assert!(obj["img"].is_string(), "'img' should be a string");
            assert!(obj["cta"].is_string(), "'cta' should be a string");
            obj["cid"]
                .as_str()
                .expect("'cid' should be a string")
                .to_string()
        })
        .collect()
}
