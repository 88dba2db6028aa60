use crate::registry::{Vendor, VendorSignature, REGISTRY};

/// Classify a job posting into an ATS vendor. The URL pass runs first and
/// short-circuits the content pass entirely; content is only consulted when
/// the URL matched nothing and the caller supplied page text. No I/O here —
/// callers fetch content themselves.
pub fn detect(url: &str, content: Option<&str>) -> &'static VendorSignature {
    let by_url = detect_from_url(url);
    if by_url.vendor != Vendor::Unknown {
        return by_url;
    }
    if let Some(content) = content {
        let by_content = detect_from_content(content);
        if by_content.vendor != Vendor::Unknown {
            return by_content;
        }
    }
    REGISTRY.unknown()
}

pub fn detect_from_url(url: &str) -> &'static VendorSignature {
    let url_lower = url.to_lowercase();
    for sig in REGISTRY.known() {
        if sig.matches_url(&url_lower) {
            return sig;
        }
    }
    REGISTRY.unknown()
}

pub fn detect_from_content(content: &str) -> &'static VendorSignature {
    let content_lower = content.to_lowercase();
    for sig in REGISTRY.known() {
        if sig.matches_content(&content_lower) {
            return sig;
        }
    }
    REGISTRY.unknown()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_known_vendors_from_url() {
        assert_eq!(
            detect("https://boards.greenhouse.io/acme/jobs/123", None).vendor,
            Vendor::Greenhouse
        );
        assert_eq!(
            detect("https://acme.wd5.myworkday.com/careers", None).vendor,
            Vendor::Workday
        );
        assert_eq!(
            detect("https://jobs.lever.co/acme/abc", None).vendor,
            Vendor::Lever
        );
        assert_eq!(
            detect("https://jobs.ashbyhq.com/acme/abc", None).vendor,
            Vendor::Ashby
        );
    }

    #[test]
    fn url_match_is_case_insensitive() {
        assert_eq!(
            detect("https://BOARDS.GREENHOUSE.IO/acme", None).vendor,
            Vendor::Greenhouse
        );
    }

    #[test]
    fn url_pass_short_circuits_content_pass() {
        // content says Lever, URL says Greenhouse; URL wins
        let sig = detect(
            "https://boards.greenhouse.io/acme/jobs/123",
            Some("...powered by Lever..."),
        );
        assert_eq!(sig.vendor, Vendor::Greenhouse);
    }

    #[test]
    fn falls_back_to_content_when_url_is_opaque() {
        let sig = detect(
            "https://careers.acme.com/apply",
            Some("...powered by Lever..."),
        );
        assert_eq!(sig.vendor, Vendor::Lever);
    }

    #[test]
    fn nothing_matches_means_unknown_not_an_error() {
        assert_eq!(detect("https://careers.acme.com/apply", None).vendor, Vendor::Unknown);
        assert_eq!(
            detect("https://careers.acme.com/apply", Some("<html>apply here</html>")).vendor,
            Vendor::Unknown
        );
        assert_eq!(detect("", None).vendor, Vendor::Unknown);
    }

    #[test]
    fn priority_order_breaks_url_ties() {
        // crafted URL carrying both Workday and Greenhouse substrings
        let sig = detect(
            "https://myworkdayjobs.com/redirect?to=boards.greenhouse.io/acme",
            None,
        );
        assert_eq!(sig.vendor, Vendor::Workday);
    }

    #[test]
    fn priority_order_breaks_content_ties() {
        let sig = detect(
            "https://careers.acme.com/apply",
            Some("hosted on greenhouse, formerly lever"),
        );
        assert_eq!(sig.vendor, Vendor::Greenhouse);
    }
}
