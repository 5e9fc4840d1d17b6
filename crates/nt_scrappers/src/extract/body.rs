/// Wraps extracted body text for storage, ending with a link back to the
/// source article.
///
/// Empty text yields just the link block, and an empty link drops it; with
/// both empty the result is `""`.
pub fn wrap_body(body: &str, link: &str, resource: &str) -> String {
    let mut wrapped = String::new();
    if !body.is_empty() {
        wrapped.push_str(&format!("<p>{}</p>", body));
    }
    if !link.is_empty() {
        wrapped.push_str(&format!(
            "<br><br><ul><li><a href='{}'>Visit {}</a></li></ul>",
            link, resource
        ));
    }
    wrapped
}
