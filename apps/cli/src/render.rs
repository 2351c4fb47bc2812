//! Terminal and JSON rendering of the derived blog feed.

use std::fmt::Write;

use avagenc_core::FeedView;
use avagenc_shared::Post;
use serde_json::{Value, json};

/// Plain-text feed: optional featured block, then heading, count, and grid.
pub(crate) fn feed(view: &FeedView<'_>) -> String {
    let mut out = String::new();

    if let Some(post) = view.featured {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Featured Article");
        let _ = writeln!(out, "  ================");
        write_post(&mut out, post);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  ({})", view.heading, view.count_label());
    let _ = writeln!(out, "  {}", "-".repeat(view.heading.len()));

    if view.regular.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  No articles found");
        let _ = writeln!(out, "  Try adjusting your search or filter criteria");
    } else {
        for post in &view.regular {
            write_post(&mut out, post);
        }
    }
    let _ = writeln!(out);

    out
}

fn write_post(out: &mut String, post: &Post) {
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", meta_line(post));
    let _ = writeln!(out, "  {}", post.title.as_deref().unwrap_or("(untitled)"));
    if let Some(excerpt) = post.excerpt.as_deref() {
        let _ = writeln!(out, "    {excerpt}");
    }
    if !post.tags().is_empty() {
        let tags: Vec<String> = post.tags().iter().map(|t| format!("#{t}")).collect();
        let _ = writeln!(out, "    {}", tags.join(" "));
    }
    if let Some(author) = post.author.as_deref() {
        let _ = writeln!(out, "    [{}] {author}", post.author_initials());
    }
    let _ = writeln!(out, "    → {}", post.detail_path());
}

/// `Category · date • read time`, skipping whatever is missing.
fn meta_line(post: &Post) -> String {
    let mut parts = Vec::new();
    if let Some(category) = post.category.as_deref() {
        parts.push(category.to_string());
    }
    let when: Vec<&str> = [post.date.as_deref(), post.read_time.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !when.is_empty() {
        parts.push(when.join(" • "));
    }
    parts.join(" · ")
}

/// Machine-readable form of the view.
pub(crate) fn view_json(view: &FeedView<'_>) -> Value {
    json!({
        "heading": view.heading,
        "count": view.regular.len(),
        "featured": view.featured.map(post_json),
        "posts": view.regular.iter().map(|p| post_json(p)).collect::<Vec<_>>(),
    })
}

fn post_json(post: &Post) -> Value {
    let mut value = serde_json::to_value(post).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("path".into(), Value::String(post.detail_path()));
    }
    value
}
