//! End-to-end extraction scenarios and properties.

use post_extraction::{
    Document, ExtractionPath, ExtractorConfig, Limit, PostExtractor, DEFAULT_MAX_BODY_CHARS,
};
use proptest::prelude::*;
use url::Url;

fn extract(html: &str, page: &str, limit: Limit) -> Vec<post_extraction::PostRecord> {
    let document = Document::from_html(html, Url::parse(page).unwrap());
    PostExtractor::default().extract(&document, limit).into_records()
}

fn blog_with_posts(n: usize) -> String {
    let posts: String = (1..=n)
        .map(|i| {
            format!(
                r#"<article><h2>Post {i}</h2><p>Body of post {i}.</p><a href="/post/{i}">Read more</a></article>"#
            )
        })
        .collect();
    format!("<html><body><nav>Menu</nav>{posts}</body></html>")
}

#[test]
fn test_three_articles_limit_two() {
    let records = extract(&blog_with_posts(3), "https://x.test/blog", Limit::from_request(Some(2)));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Post 1");
    assert_eq!(records[1].title, "Post 2");
    assert_eq!(records[0].source_url, "https://x.test/post/1");
    assert_eq!(records[1].source_url, "https://x.test/post/2");
    assert!(records.iter().all(|r| r.published_at.is_empty()));
}

#[test]
fn test_page_without_articles_becomes_one_record() {
    let html = "<html><body><h1>Hello</h1><p>world</p></body></html>";
    let records = extract(html, "https://x.test/page", Limit::UNBOUNDED);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Hello");
    assert_eq!(records[0].source_url, "https://x.test/page");
    assert_eq!(records[0].body, "Hello world");
    assert_eq!(records[0].published_at, "");
}

#[test]
fn test_non_positive_limit_means_no_cap() {
    let html = blog_with_posts(4);

    assert_eq!(extract(&html, "https://x.test/", Limit::from_request(Some(0))).len(), 4);
    assert_eq!(extract(&html, "https://x.test/", Limit::from_request(Some(-1))).len(), 4);
    assert_eq!(extract(&html, "https://x.test/", Limit::from_request(None)).len(), 4);
}

#[test]
fn test_document_order_is_preserved() {
    let html = r#"
        <article><h2>Zebra</h2></article>
        <article><h2>Apple</h2></article>
        <article><h2>Mango</h2></article>
    "#;
    let titles: Vec<_> = extract(html, "https://x.test/", Limit::UNBOUNDED)
        .into_iter()
        .map(|r| r.title)
        .collect();

    assert_eq!(titles, vec!["Zebra", "Apple", "Mango"]);
}

#[test]
fn test_wordpress_style_listing() {
    let html = r#"
        <main id="main">
          <article class="post type-post hentry">
            <header class="entry-header">
              <h2 class="entry-title"><a href="https://x.test/2024/05/hello-world/" rel="bookmark">Hello world!</a></h2>
              <div class="entry-meta"><a href="https://x.test/author/admin/">admin</a></div>
            </header>
            <div class="entry-content"><p>Welcome to WordPress.</p></div>
            <footer class="entry-footer"><a href="/category/news/">News</a></footer>
          </article>
        </main>
    "#;
    let document = Document::from_html(html, Url::parse("https://x.test/").unwrap());
    let result = PostExtractor::default().extract(&document, Limit::UNBOUNDED);

    assert_eq!(result.path, ExtractionPath::Containers);
    assert_eq!(result.records[0].title, "Hello world!");
    assert_eq!(
        result.records[0].source_url,
        "https://x.test/2024/05/hello-world/"
    );
    assert!(result.records[0].body.contains("Welcome to WordPress."));
}

#[test]
fn test_parse_from_bytes_and_extract() {
    let bytes = blog_with_posts(2).into_bytes();
    let result = PostExtractor::default()
        .extract_bytes(&bytes, Url::parse("https://x.test/blog").unwrap(), Limit::UNBOUNDED)
        .unwrap();

    assert_eq!(result.len(), 2);
}

proptest! {
    #[test]
    fn prop_limit_respected(n in 1usize..12, k in 1i64..15) {
        let records = extract(&blog_with_posts(n), "https://x.test/blog", Limit::from_request(Some(k)));
        prop_assert_eq!(records.len(), n.min(k as usize));
    }

    #[test]
    fn prop_fallback_yields_exactly_one(text in "[a-zA-Z ]{0,200}", k in -3i64..5) {
        let html = format!("<html><body><div><p>{text}</p></div></body></html>");
        let records = extract(&html, "https://x.test/page", Limit::from_request(Some(k)));
        prop_assert_eq!(records.len(), 1);
        prop_assert!(!records[0].title.is_empty());
    }

    #[test]
    fn prop_body_never_exceeds_cap(words in proptest::collection::vec("[a-zé漢 ]{1,30}", 0..300), cap in 0usize..300) {
        let html = format!("<article><h2>t</h2><p>{}</p></article>", words.join(" "));
        let document = Document::from_html(&html, Url::parse("https://x.test/").unwrap());
        let extractor = PostExtractor::new(ExtractorConfig::default().with_max_body_chars(cap));

        for record in extractor.extract(&document, Limit::UNBOUNDED) {
            prop_assert!(record.body.chars().count() <= cap);
        }
    }

    #[test]
    fn prop_default_cap_holds(len in 0usize..6000) {
        let html = format!("<main>{}</main>", "x".repeat(len));
        let records = extract(&html, "https://x.test/", Limit::UNBOUNDED);
        prop_assert!(records[0].body.chars().count() <= DEFAULT_MAX_BODY_CHARS);
    }

    #[test]
    fn prop_source_urls_are_absolute(href in "(/|#|mailto:|\\.\\./)?[a-z0-9/]{0,20}") {
        let html = format!(r#"<article><h2><a href="{href}">t</a></h2></article>"#);
        for record in extract(&html, "https://x.test/blog/", Limit::UNBOUNDED) {
            let url = Url::parse(&record.source_url).unwrap();
            prop_assert!(url.scheme() == "http" || url.scheme() == "https");
            prop_assert!(url.host_str().is_some());
        }
    }
}
