//! Canned pages and destinations shared by route tests.

/// Destination with no tabs yet.
pub const EMPTY_SHEET: &str = "sheet-empty";

/// Destination whose "Source" tab already holds a header and stale rows.
pub const STALE_SHEET: &str = "sheet-stale";

pub const BLOG_URL: &str = "https://x.test/blog";
pub const PAGE_URL: &str = "https://x.test/page";

/// Three `<article>` posts linking to `/post/1`..`/post/3`.
pub fn blog_html() -> String {
    let posts: String = (1..=3)
        .map(|i| {
            format!(
                r#"<article><h2>Post {i}</h2><p>Body of post {i}.</p><a href="/post/{i}">Read more</a></article>"#
            )
        })
        .collect();
    format!("<html><head><title>Blog</title></head><body><nav>Home</nav>{posts}</body></html>")
}

/// A page without post containers.
pub fn page_html() -> &'static str {
    "<html><body><h1>Hello</h1><p>world</p></body></html>"
}

pub fn stale_rows() -> Vec<Vec<String>> {
    [
        ["Title", "Body", "Date", "URL"],
        ["Old 1", "old", "", "https://x.test/old/1"],
        ["Old 2", "old", "", "https://x.test/old/2"],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect()
}
