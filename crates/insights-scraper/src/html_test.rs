use super::*;

const BASE: &str = "https://www.linkedin.com";

const PROFILE_HTML: &str = r#"<html><head>
<title>Acme Corp | LinkedIn</title>
<meta property="og:title" content="Acme Corporation | LinkedIn">
<meta name="description" content="Acme makes anvils.">
<meta property="og:image" content="https://media.licdn.com/acme-og.png">
</head><body data-entity="urn:li:organization:1234">
<section class="top-card-layout">
  <h1 class="top-card-layout__title font-sans">Acme Corp</h1>
  <img class="top-card-layout__entity-image artdeco-entity-image" data-delayed-url="https://media.licdn.com/acme-logo.png" src="data:image/gif;base64,R0">
  <h3 class="top-card-layout__first-subline">Manufacturing <span>12,345 followers</span></h3>
</section>
<p class="break-words">We make anvils &amp; rockets.</p>
<dl>
  <div data-test-id="about-us__website"><dt>Website</dt><dd><a href="https://acme.example">acme.example</a></dd></div>
  <div data-test-id="about-us__industry"><dt>Industry</dt><dd>Manufacturing</dd></div>
  <div data-test-id="about-us__size"><dt>Company size</dt><dd>51-200 employees</dd></div>
  <div data-test-id="about-us__headquarters"><dt>Headquarters</dt><dd>Phoenix, AZ</dd></div>
  <div data-test-id="about-us__organizationType"><dt>Type</dt><dd>Privately Held</dd></div>
  <div data-test-id="about-us__foundedOn"><dt>Founded</dt><dd>1949</dd></div>
  <div data-test-id="about-us__specialties"><dt>Specialties</dt><dd>anvils, rockets and giant magnets</dd></div>
</dl>
</body></html>"#;

#[test]
fn profile_uses_primary_rules() {
    let profile = parse_profile(PROFILE_HTML, "https://www.linkedin.com/company/acme/");

    assert_eq!(profile.page_url, "https://www.linkedin.com/company/acme/");
    assert_eq!(profile.page_name, "Acme Corp");
    assert_eq!(profile.linkedin_id.as_deref(), Some("1234"));
    assert_eq!(
        profile.profile_picture_url.as_deref(),
        Some("https://media.licdn.com/acme-logo.png")
    );
    assert_eq!(profile.description.as_deref(), Some("We make anvils & rockets."));
    assert_eq!(profile.website.as_deref(), Some("https://acme.example"));
    assert_eq!(profile.industry.as_deref(), Some("Manufacturing"));
    assert_eq!(profile.total_followers, 12_345);
    assert_eq!(profile.head_count, Some(51));
    assert_eq!(profile.location.as_deref(), Some("Phoenix, AZ"));
    assert_eq!(profile.company_type.as_deref(), Some("Privately Held"));
    assert_eq!(profile.founded_year.as_deref(), Some("1949"));
    assert_eq!(
        profile.specialties,
        vec!["anvils", "rockets", "giant magnets"]
    );
}

#[test]
fn profile_falls_back_field_by_field() {
    let html = r#"<html><head><title>Globex | LinkedIn</title>
<meta content="Globex Corporation | LinkedIn" property="og:title">
<meta content="Energy for everyone" name="description"></head>
<body><div class="about"><p>Industry: Energy</p><p>Headquarters: Springfield</p><p>Specialties: power, plants</p></div>
<a href="https://www.linkedin.com/legal">Terms</a><a href="https://globex.example/">Home</a>
<span>1.2K followers</span><span>See all 87 employees on LinkedIn</span></body></html>"#;

    let profile = parse_profile(html, "https://www.linkedin.com/company/globex/");

    assert_eq!(profile.page_name, "Globex Corporation");
    assert_eq!(profile.description.as_deref(), Some("Energy for everyone"));
    assert_eq!(profile.industry.as_deref(), Some("Energy"));
    assert_eq!(profile.location.as_deref(), Some("Springfield"));
    assert_eq!(profile.specialties, vec!["power", "plants"]);
    assert_eq!(profile.website.as_deref(), Some("https://globex.example/"));
    assert_eq!(profile.total_followers, 1_200);
    assert_eq!(profile.head_count, Some(87));
    assert_eq!(profile.linkedin_id, None);
    assert_eq!(profile.company_type, None);
    assert_eq!(profile.founded_year, None);
    assert_eq!(profile.profile_picture_url, None);
}

#[test]
fn empty_document_yields_defaults() {
    let profile = parse_profile("<html></html>", "https://www.linkedin.com/company/x/");
    assert_eq!(profile.page_name, "Unknown");
    assert_eq!(profile.total_followers, 0);
    assert!(profile.specialties.is_empty());
    assert_eq!(profile.head_count, None);
    assert_eq!(profile.description, None);
}

const POSTS_HTML: &str = r#"<div class="feed-container">
<div class="feed-shared-update-v2" data-urn="urn:li:activity:111">
  <div class="feed-shared-update-v2__description"><span>Launching rockets today!</span></div>
  <img class="update-components-actor__avatar" src="https://media.licdn.com/profile-displayphoto/a.png">
  <img class="update-components-image__image" src="https://media.licdn.com/feedshare/rocket.png">
  <span class="social-details-social-counts__reactions-count">1,204</span>
  <span>37 comments</span><span>5 reposts</span>
  <time datetime="2024-05-01T10:00:00Z">2w</time>
  <article class="comments-comment-item" data-id="urn:li:comment:(activity:111,9)">
    <a href="/in/road-runner/"><span class="comments-post-meta__name-text">Road Runner</span></a>
    <div class="comments-comment-item__main-content">Meep meep</div>
    <span>3 likes</span>
  </article>
</div>
<div class="feed-shared-update-v2">
  <p>Second post without urn</p>
</div>
</div>"#;

#[test]
fn posts_are_split_per_container() {
    let posts = parse_posts(
        POSTS_HTML,
        BASE,
        "https://www.linkedin.com/company/acme/posts/",
        10,
    );
    assert_eq!(posts.len(), 2);

    let first = &posts[0];
    assert_eq!(first.post_id.as_deref(), Some("urn:li:activity:111"));
    assert_eq!(
        first.post_url,
        "https://www.linkedin.com/feed/update/urn:li:activity:111/"
    );
    assert_eq!(first.content, "Launching rockets today!");
    assert_eq!(
        first.media_urls,
        vec!["https://media.licdn.com/feedshare/rocket.png"]
    );
    assert_eq!(first.likes, 1_204);
    assert_eq!(first.comments_count, 37);
    assert_eq!(first.reposts, 5);
    assert_eq!(
        first.posted_at.map(|t| t.to_rfc3339()),
        Some("2024-05-01T10:00:00+00:00".to_string())
    );

    assert_eq!(first.comments.len(), 1);
    let comment = &first.comments[0];
    assert_eq!(
        comment.comment_id.as_deref(),
        Some("urn:li:comment:(activity:111,9)")
    );
    assert_eq!(comment.author_name, "Road Runner");
    assert_eq!(
        comment.author_profile_url.as_deref(),
        Some("https://www.linkedin.com/in/road-runner/")
    );
    assert_eq!(comment.content, "Meep meep");
    assert_eq!(comment.likes, 3);
}

#[test]
fn post_without_urn_links_to_posts_page_and_keeps_defaults() {
    let posts = parse_posts(
        POSTS_HTML,
        BASE,
        "https://www.linkedin.com/company/acme/posts/",
        10,
    );
    let second = &posts[1];
    assert_eq!(second.post_id, None);
    assert_eq!(second.post_url, "https://www.linkedin.com/company/acme/posts/");
    assert_eq!(second.content, "Second post without urn");
    assert_eq!(second.likes, 0);
    assert_eq!(second.comments_count, 0);
    assert_eq!(second.reposts, 0);
    assert_eq!(second.posted_at, None);
    assert!(second.media_urls.is_empty());
    assert!(second.comments.is_empty());
}

#[test]
fn posts_respect_maximum() {
    let posts = parse_posts(POSTS_HTML, BASE, "u", 1);
    assert_eq!(posts.len(), 1);
    assert!(parse_posts(POSTS_HTML, BASE, "u", 0).is_empty());
}

#[test]
fn posts_fall_back_to_list_item_layout() {
    let html = r#"<ul><li class="updates__list-item"><div class="feed-shared-text">Hello</div><span>4 reactions</span></li></ul>"#;
    let posts = parse_posts(html, BASE, "u", 10);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "Hello");
    assert_eq!(posts[0].likes, 4);
}

#[test]
fn post_without_text_gets_placeholder_content() {
    let html = r#"<div class="main-feed-activity-card"><span>nothing here</span></div>"#;
    let posts = parse_posts(html, BASE, "u", 10);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "Post content unavailable");
}

const PEOPLE_HTML: &str = r#"<section>
<div class="org-people-profile-card">
  <a href="/in/jane-doe?trk=people"><img src="https://media.licdn.com/jane.png" alt="Jane Doe"></a>
  <div class="org-people-profile-card__profile-title">Jane Doe</div>
  <div class="artdeco-entity-lockup__subtitle">Rocket Engineer at Acme</div>
</div>
<div class="org-people-profile-card">
  <div class="person-position">Janitor</div>
</div>
</section>"#;

#[test]
fn employees_are_extracted_per_card() {
    let people = parse_employees(PEOPLE_HTML, BASE, 10);
    assert_eq!(people.len(), 2);

    let jane = &people[0];
    assert_eq!(jane.user_id.as_deref(), Some("jane-doe"));
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.profile_url, "https://www.linkedin.com/in/jane-doe?trk=people");
    assert_eq!(
        jane.profile_picture_url.as_deref(),
        Some("https://media.licdn.com/jane.png")
    );
    assert_eq!(jane.headline.as_deref(), Some("Rocket Engineer at Acme"));
    assert_eq!(jane.position, None);

    let anonymous = &people[1];
    assert_eq!(anonymous.user_id, None);
    assert_eq!(anonymous.name, "Unknown Employee");
    assert_eq!(anonymous.profile_url, "");
    assert_eq!(anonymous.position.as_deref(), Some("Janitor"));
}

#[test]
fn employees_fall_back_to_base_cards() {
    let html = r#"<ul><li><div class="base-card"><h3 class="base-main-card__title">Sam</h3></div></li></ul>"#;
    let people = parse_employees(html, BASE, 10);
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Sam");
    assert_eq!(parse_employees(html, BASE, 0).len(), 0);
}

fn large_people_page(cards: usize) -> String {
    let mut html = String::from("<html><body><main class=\"org-people\">");
    for i in 0..cards {
        html.push_str(&format!(
            "<div class=\"org-people-profile-card\" data-index=\"{i}\">\
             <span data-x=\"{i}\"><a href=\"/in/user-{i}\" class=\"profile-link\">\
             <div class=\"profile-title\">User {i}</div></a></span></div>\n"
        ));
    }
    html.push_str("<span>12,345 followers</span></main></body></html>");
    html
}

#[test]
fn large_documents_extract_in_linear_time() {
    let html = large_people_page(4_000);
    assert!(html.len() > 400_000);

    let started = std::time::Instant::now();
    let profile = parse_profile(&html, "https://www.linkedin.com/company/acme/");
    let people = parse_employees(&html, BASE, usize::MAX);
    let elapsed = started.elapsed();

    assert_eq!(profile.total_followers, 12_345);
    assert_eq!(people.len(), 4_000);
    assert_eq!(people[3_999].user_id.as_deref(), Some("user-3999"));
    assert_eq!(people[3_999].name, "User 3999");
    assert!(
        elapsed < std::time::Duration::from_secs(5),
        "extraction of {} bytes took {elapsed:?}",
        html.len()
    );
}
