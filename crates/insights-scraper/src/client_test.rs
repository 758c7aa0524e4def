use super::*;

fn fetcher() -> PageFetcher {
    PageFetcher::new("https://www.linkedin.com/", 5, "insights-test/0.1").unwrap()
}

#[test]
fn profile_url_has_trailing_slash() {
    assert_eq!(
        fetcher().document_url("acme", DocumentKind::Profile),
        "https://www.linkedin.com/company/acme/"
    );
}

#[test]
fn posts_and_people_urls() {
    let f = fetcher();
    assert_eq!(
        f.document_url("acme", DocumentKind::Posts),
        "https://www.linkedin.com/company/acme/posts/"
    );
    assert_eq!(
        f.document_url("acme", DocumentKind::People),
        "https://www.linkedin.com/company/acme/people/"
    );
}

#[test]
fn page_id_is_percent_encoded() {
    assert_eq!(
        fetcher().document_url("acme?x=1#frag", DocumentKind::Profile),
        "https://www.linkedin.com/company/acme%3Fx=1%23frag/"
    );
    assert_eq!(
        fetcher().document_url("café", DocumentKind::Profile),
        "https://www.linkedin.com/company/caf%C3%A9/"
    );
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    assert_eq!(fetcher().base_url(), "https://www.linkedin.com");
}

#[test]
fn relative_base_url_is_rejected() {
    let err = PageFetcher::new("not-a-url", 5, "ua").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}
