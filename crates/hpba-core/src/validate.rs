use url::Url;

use crate::error::ValidationError;

/// Host fragment every accepted listing URL must contain.
pub const LISTING_HOST: &str = "hotpepper.jp";

/// Check a URL typed into the dashboard form and return it trimmed.
///
/// # Errors
///
/// - [`ValidationError::EmptyUrl`] for blank input.
/// - [`ValidationError::NotListingUrl`] when it does not point at the listing site.
/// - [`ValidationError::MalformedUrl`] when it is not an absolute `http(s)` URL.
pub fn validate_listing_url(raw: &str) -> Result<String, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if !url.contains(LISTING_HOST) {
        return Err(ValidationError::NotListingUrl);
    }

    let parsed = Url::parse(url).map_err(|e| ValidationError::MalformedUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::MalformedUrl(
            "must start with http:// or https://".into(),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MalformedUrl("missing host".into()));
    }
    if url.contains(char::is_whitespace) {
        return Err(ValidationError::MalformedUrl("contains whitespace".into()));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_listing_url_and_trims() {
        let url = validate_listing_url("  https://beauty.hotpepper.jp/svcSA/macAA/salon/  ")
            .expect("valid");
        assert_eq!(url, "https://beauty.hotpepper.jp/svcSA/macAA/salon/");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(validate_listing_url("   "), Err(ValidationError::EmptyUrl));
    }

    #[test]
    fn rejects_other_sites() {
        assert_eq!(
            validate_listing_url("https://example.com/salons"),
            Err(ValidationError::NotListingUrl)
        );
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(matches!(
            validate_listing_url("beauty.hotpepper.jp/svcSA/"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn rejects_non_web_scheme() {
        assert!(matches!(
            validate_listing_url("ftp://beauty.hotpepper.jp/svcSA/"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(matches!(
            validate_listing_url("https://beauty.hotpepper.jp:99999/svcSA/"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn rejects_broken_host() {
        assert!(matches!(
            validate_listing_url("https://[beauty.hotpepper.jp/"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn accepts_query_and_port() {
        assert_eq!(
            validate_listing_url("http://beauty.hotpepper.jp:8080/svcSA/?page=2"),
            Ok("http://beauty.hotpepper.jp:8080/svcSA/?page=2".to_string())
        );
    }

    #[test]
    fn rejects_embedded_whitespace() {
        assert!(matches!(
            validate_listing_url("https://beauty.hotpepper.jp/svc SA/"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }
}
