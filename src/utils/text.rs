//! Telegram text-style helpers for `parse_mode: "HTML"` and
//! `parse_mode: "MarkdownV2"` messages.

/// Escape `<`, `>` and `&` for Telegram HTML messages.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape the characters MarkdownV2 reserves.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
            | '{' | '}' | '.' | '!' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// `text` is not escaped automatically.
pub fn bold(text: &str) -> String {
    format!("<b>{text}</b>")
}

/// `text` is not escaped automatically.
pub fn italic(text: &str) -> String {
    format!("<i>{text}</i>")
}

/// `text` is not escaped automatically.
pub fn underline(text: &str) -> String {
    format!("<u>{text}</u>")
}

/// `text` is not escaped automatically.
pub fn strikethrough(text: &str) -> String {
    format!("<s>{text}</s>")
}

/// `text` is not escaped automatically.
pub fn link(text: &str, href: &str) -> String {
    format!("<a href=\"{href}\">{text}</a>")
}

/// `text` is not escaped automatically.
pub fn spoiler(text: &str) -> String {
    format!("<tg-spoiler>{text}</tg-spoiler>")
}

/// `text` is not escaped automatically.
pub fn code(text: &str) -> String {
    format!("<code>{text}</code>")
}

/// `text` is not escaped automatically. Use [`codeblock`] for a language
/// tag.
pub fn pre(text: &str) -> String {
    format!("<pre>{text}</pre>")
}

/// `code` is not escaped automatically.
pub fn codeblock(code: &str, lang: &str) -> String {
    format!("<pre><code class=\"{lang}\">{code}</code></pre>")
}

/// `text` is not escaped automatically.
pub fn blockquote(text: &str, expandable: bool) -> String {
    let attr = if expandable { " expandable" } else { "" };
    format!("<blockquote{attr}>{text}</blockquote>")
}
