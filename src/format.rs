//! Display-time formatting of message content.
//!
//! Three passes run over a token buffer, each seeing the output of the one
//! before: `**strong**`, then `*em*`, then bare `http(s)://` links. Markup
//! produced by an earlier pass is opaque to later ones. The result goes
//! through pulldown-cmark's HTML writer, which escapes the user's text.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Strong,
    Emphasis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Char(char),
    Open(Style),
    Close(Style),
    Link(String),
}

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Render raw stored content as an HTML fragment.
pub fn format_message_content(raw: &str) -> String {
    let toks = raw.chars().map(Tok::Char).collect();
    let toks = pair_delimiters(toks, 2, Style::Strong);
    let toks = pair_delimiters(toks, 1, Style::Emphasis);
    let toks = link_urls(toks);
    render(toks)
}

/// HTML-escape plain text for places that get no formatting.
pub fn escape(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    pulldown_cmark::html::push_html(&mut html, std::iter::once(Event::Text(text.into())));
    html
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn delimiter_at(toks: &[Tok], at: usize, width: usize) -> bool {
    at + width <= toks.len() && toks[at..at + width].iter().all(|t| *t == Tok::Char('*'))
}

enum Closing {
    At(usize),
    /// No closing delimiter before this line terminator (or the end).
    Missing(usize),
}

fn find_closing(toks: &[Tok], from: usize, width: usize) -> Closing {
    for at in from..toks.len() {
        if matches!(toks[at], Tok::Char(c) if is_line_terminator(c)) {
            return Closing::Missing(at);
        }
        if delimiter_at(toks, at, width) {
            return Closing::At(at);
        }
    }
    Closing::Missing(toks.len())
}

/// Wrap the shortest `<delim>…<delim>` spans, left to right. A span never
/// crosses a line terminator and may be empty. When an opener has no partner
/// on its line, nothing else on that line can pair either, so the scan skips
/// to the terminator.
fn pair_delimiters(toks: Vec<Tok>, width: usize, style: Style) -> Vec<Tok> {
    let mut out = Vec::with_capacity(toks.len());
    let mut at = 0;
    while at < toks.len() {
        if !delimiter_at(&toks, at, width) {
            out.push(toks[at].clone());
            at += 1;
            continue;
        }
        match find_closing(&toks, at + width, width) {
            Closing::At(close) => {
                out.push(Tok::Open(style));
                out.extend_from_slice(&toks[at + width..close]);
                out.push(Tok::Close(style));
                at = close + width;
            }
            Closing::Missing(stop) => {
                out.extend_from_slice(&toks[at..stop]);
                at = stop;
            }
        }
    }
    out
}

fn scheme_at(toks: &[Tok], at: usize) -> Option<usize> {
    SCHEMES.iter().find_map(|scheme| {
        let len = scheme.chars().count();
        let matches = at + len <= toks.len()
            && scheme
                .chars()
                .zip(&toks[at..at + len])
                .all(|(c, t)| *t == Tok::Char(c));
        matches.then_some(len)
    })
}

/// End of the URL starting at `at`: the scheme plus at least one
/// non-whitespace character, stopping at whitespace or markup.
fn url_end(toks: &[Tok], at: usize) -> Option<usize> {
    let body = at + scheme_at(toks, at)?;
    let end = toks[body..]
        .iter()
        .position(|t| !matches!(t, Tok::Char(c) if !c.is_whitespace()))
        .map_or(toks.len(), |n| body + n);
    (end > body).then_some(end)
}

fn link_urls(toks: Vec<Tok>) -> Vec<Tok> {
    let mut out = Vec::with_capacity(toks.len());
    let mut at = 0;
    while at < toks.len() {
        if let Some(end) = url_end(&toks, at) {
            let url = toks[at..end]
                .iter()
                .filter_map(|t| match t {
                    Tok::Char(c) => Some(*c),
                    _ => None,
                })
                .collect();
            out.push(Tok::Link(url));
            at = end;
        } else {
            out.push(toks[at].clone());
            at += 1;
        }
    }
    out
}

fn render(toks: Vec<Tok>) -> String {
    let mut events: Vec<Event<'static>> = Vec::new();
    let mut text = String::new();

    for tok in toks {
        let tok = match tok {
            Tok::Char(c) => {
                text.push(c);
                continue;
            }
            tok => tok,
        };
        if !text.is_empty() {
            events.push(Event::Text(CowStr::from(std::mem::take(&mut text))));
        }
        match tok {
            Tok::Open(Style::Strong) => events.push(Event::Start(Tag::Strong)),
            Tok::Close(Style::Strong) => events.push(Event::End(TagEnd::Strong)),
            Tok::Open(Style::Emphasis) => events.push(Event::Start(Tag::Emphasis)),
            Tok::Close(Style::Emphasis) => events.push(Event::End(TagEnd::Emphasis)),
            Tok::Link(url) => {
                events.push(Event::Start(Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url: CowStr::from(url.clone()),
                    title: CowStr::from(""),
                    id: CowStr::from(""),
                }));
                events.push(Event::Text(CowStr::from(url)));
                events.push(Event::End(TagEnd::Link));
            }
            Tok::Char(_) => {}
        }
    }
    if !text.is_empty() {
        events.push(Event::Text(CowStr::from(text)));
    }

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    html
}

#[cfg(test)]
mod tests {
    use super::{escape, format_message_content as fmt};

    #[test]
    fn strong_then_emphasis() {
        assert_eq!(
            fmt("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn shortest_pairs_win() {
        assert_eq!(
            fmt("**a**b**c**"),
            "<strong>a</strong>b<strong>c</strong>"
        );
        assert_eq!(fmt("*a*b*c*"), "<em>a</em>b<em>c</em>");
    }

    #[test]
    fn emphasis_sees_through_strong() {
        assert_eq!(
            fmt("*a **b** c*"),
            "<em>a <strong>b</strong> c</em>"
        );
    }

    #[test]
    fn leftover_star_stays_inside_strong() {
        assert_eq!(fmt("***a**"), "<strong>*a</strong>");
    }

    #[test]
    fn unpaired_delimiters_stay_literal() {
        assert_eq!(fmt("2 * 3 = 6"), "2 * 3 = 6");
    }

    #[test]
    fn lone_double_star_pairs_as_empty_emphasis() {
        assert_eq!(fmt("**open"), "<em></em>open");
    }

    #[test]
    fn spans_do_not_cross_lines() {
        assert_eq!(fmt("a*b\nc*d"), "a*b\nc*d");
        assert_eq!(fmt("*a\n*b*"), "*a\n<em>b</em>");
    }

    #[test]
    fn bare_url_becomes_link() {
        assert_eq!(
            fmt("visit https://example.com now"),
            r#"visit <a href="https://example.com">https://example.com</a> now"#
        );
        assert_eq!(
            fmt("http://a.io"),
            r#"<a href="http://a.io">http://a.io</a>"#
        );
    }

    #[test]
    fn url_needs_a_body() {
        assert_eq!(fmt("see http:// here"), "see http:// here");
        assert_eq!(fmt("ftp://x.io"), "ftp://x.io");
    }

    #[test]
    fn url_stops_at_markup() {
        assert_eq!(
            fmt("**https://x.io**"),
            r#"<strong><a href="https://x.io">https://x.io</a></strong>"#
        );
    }

    #[test]
    fn user_markup_is_escaped() {
        assert_eq!(fmt("<b>hi</b> & bye"), "&lt;b&gt;hi&lt;/b&gt; &amp; bye");
        assert_eq!(escape("a < b"), "a &lt; b");
    }

    #[test]
    fn empty_input() {
        assert_eq!(fmt(""), "");
    }
}
