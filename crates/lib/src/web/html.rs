//! Just enough HTML reading for search results and page summaries.
//!
//! This is tag and attribute matching, not a parser. It handles the markup
//! DuckDuckGo's HTML endpoint and ordinary pages produce.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").unwrap());
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static META_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\b([^>]*)>").unwrap());
static IMG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static HIDDEN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
    .unwrap()
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(#[xX][0-9A-Fa-f]+|#[0-9]+|[A-Za-z]+);").unwrap());

/// Attributes of a tag body (`href="..." class=x`), names lowercased.
pub fn attributes(tag_body: &str) -> Vec<(String, String)> {
  ATTR_RE
    .captures_iter(tag_body)
    .map(|caps| {
      let value = caps
        .get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map(|m| decode_entities(m.as_str()))
        .unwrap_or_default();
      (caps[1].to_ascii_lowercase(), value)
    })
    .collect()
}

fn attribute(tag_body: &str, name: &str) -> Option<String> {
  attributes(tag_body).into_iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

/// Anchors whose class list contains `class`, as `(text, href)` pairs.
pub fn anchors_with_class(html: &str, class: &str) -> Vec<(String, String)> {
  ANCHOR_RE
    .captures_iter(html)
    .filter_map(|caps| {
      let attrs = attributes(&caps[1]);
      let has_class = attrs
        .iter()
        .any(|(n, v)| n == "class" && v.split_whitespace().any(|c| c == class));
      if !has_class {
        return None;
      }
      let href = attrs.into_iter().find(|(n, _)| n == "href").map(|(_, v)| v)?;
      Some((text_content(&caps[2]), href))
    })
    .collect()
}

/// Contents of `<title>`, if present and non-empty.
pub fn title(html: &str) -> Option<String> {
  TITLE_RE
    .captures(html)
    .map(|caps| text_content(&caps[1]))
    .filter(|t| !t.is_empty())
}

/// `content` of `<meta name="description">`.
pub fn meta_description(html: &str) -> Option<String> {
  META_RE.captures_iter(html).find_map(|caps| {
    let attrs = attributes(&caps[1]);
    let is_description = attrs
      .iter()
      .any(|(n, v)| n == "name" && v.eq_ignore_ascii_case("description"));
    if !is_description {
      return None;
    }
    attrs.into_iter().find(|(n, _)| n == "content").map(|(_, v)| v)
  })
}

/// `src` of every `<img>`, in document order.
pub fn image_sources(html: &str) -> Vec<String> {
  IMG_RE
    .captures_iter(html)
    .filter_map(|caps| attribute(&caps[1], "src"))
    .filter(|src| !src.trim().is_empty())
    .collect()
}

/// First non-empty line of visible body text.
pub fn first_text_line(html: &str) -> Option<String> {
  let visible = HIDDEN_RE.replace_all(html, "\n");
  let text = decode_entities(&TAG_RE.replace_all(&visible, "\n"));
  text.lines().map(str::trim).find(|l| !l.is_empty()).map(str::to_string)
}

/// Strip tags, decode entities and collapse whitespace.
pub fn text_content(fragment: &str) -> String {
  let text = decode_entities(&TAG_RE.replace_all(fragment, ""));
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode named and numeric character references. Unknown names are kept.
pub fn decode_entities(text: &str) -> String {
  ENTITY_RE
    .replace_all(text, |caps: &Captures| {
      let entity = &caps[1];
      let decoded = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
      } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
      } else {
        match entity {
          "amp" => Some('&'),
          "lt" => Some('<'),
          "gt" => Some('>'),
          "quot" => Some('"'),
          "apos" => Some('\''),
          "nbsp" => Some(' '),
          _ => None,
        }
      };
      decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
