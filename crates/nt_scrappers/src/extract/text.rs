use scraper::{ElementRef, Selector};

/// Elements whose content never renders as text.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line when rendered.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Text of `element` as a reader would see it: hidden elements skipped,
/// block elements on their own lines, runs of whitespace collapsed.
///
/// Descendants matching any of `remove` are left out together with their
/// whole subtree. The element itself is never removed.
pub fn visible_text(element: ElementRef<'_>, remove: &[Selector]) -> String {
    let removed: Vec<ElementRef<'_>> = remove
        .iter()
        .flat_map(|selector| element.select(selector))
        .filter(|matched| *matched != element)
        .collect();

    let mut raw = String::new();
    collect(element, &removed, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect(element: ElementRef<'_>, removed: &[ElementRef<'_>], out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        if removed.contains(&child) {
            continue;
        }

        let name = child.value().name();
        if HIDDEN.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = BLOCKS.contains(&name);
        if block {
            out.push('\n');
        }
        collect(child, removed, out);
        if block {
            out.push('\n');
        }
    }
}

/// First `words` whitespace-separated tokens of `text`, joined by single spaces.
pub fn truncate_words(text: &str, words: usize) -> String {
    text.split_whitespace().take(words).collect::<Vec<_>>().join(" ")
}
