//! HTML extraction for the board catalog site.
//!
//! The site has no API; these functions pull what the editor needs out of
//! its rendered pages with a handful of tolerant regular expressions.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{Board, BoardPin, BoardTarget};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static MICRO_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)href="/esp32/microcontroller/([^/"]+)/""#));
static ESP32_CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?is)href="/esp32/(?P<slug>[^/"]+)/"[^>]*>.*?<img[^>]+src="(?P<img>[^"]+)"[^>]*>.*?<h3[^>]*>(?P<name>[^<]+)</h3>"#)
});
static ESP8266_CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?is)href="/esp8266/(?P<slug>[^/"]+)/"[^>]*>.*?<img[^>]+src="(?P<img>[^"]+)"[^>]*>.*?<h3[^>]*>(?P<name>[^<]+)</h3>"#)
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<[^>]+>"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| re(r"\s+"));
static IMG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<img[^>]+>"));
static SRC_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"(?i)src="([^"]+)""#));
static ALT_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"(?i)alt="([^"]*)""#));
static H1_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<h1[^>]*>([^<]+)</h1>"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<title>([^<]+)</title>"));
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<table[^>]*>(.*?)</table>"));
static TR_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<tr[^>]*>(.*?)</tr>"));
static TH_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<th[^>]*>(.*?)</th>"));
static TD_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<td[^>]*>(.*?)</td>"));
static GPIO_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)^GPIO\s*([0-9]+)$"));

/// Absolute URL on `base` for a site-relative `url`.
pub fn absolute(base: &str, url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

fn collapse_ws(text: &str) -> String {
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// Drop tags, decode the common entities, and collapse whitespace.
pub fn strip_tags(html: &str) -> String {
    let text = TAG_RE
        .replace_all(html, "")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"");
    collapse_ws(&text)
}

/// Sorted unique microcontroller slugs linked from the esp32 index.
pub fn microcontrollers(html: &str) -> Vec<String> {
    let mut micros: Vec<String> = MICRO_RE
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect();
    micros.sort();
    micros.dedup();
    micros
}

/// Board cards on a listing page, first occurrence of each slug kept.
/// `microcontroller` is recorded on every card (esp32 listings only).
pub fn board_cards(
    base: &str,
    html: &str,
    target: BoardTarget,
    microcontroller: Option<&str>,
) -> Vec<Board> {
    let card_re = match target {
        BoardTarget::Esp32 => &*ESP32_CARD_RE,
        BoardTarget::Esp8266 => &*ESP8266_CARD_RE,
    };
    let mut seen = HashSet::new();
    let mut boards = Vec::new();
    for caps in card_re.captures_iter(html) {
        let slug = caps["slug"].trim();
        if slug.is_empty() || !seen.insert(slug.to_string()) {
            continue;
        }
        let name = collapse_ws(&caps["name"]);
        boards.push(Board {
            target,
            slug: slug.to_string(),
            name: if name.is_empty() { slug.to_string() } else { name },
            url: format!("{base}/{target}/{slug}/"),
            image_url: absolute(base, caps["img"].trim()),
            microcontroller: microcontroller.map(str::to_string),
        });
    }
    boards
}

struct ImgTag<'a> {
    tag: &'a str,
    src: Option<&'a str>,
    alt: String,
}

fn img_tags(html: &str) -> impl Iterator<Item = ImgTag<'_>> {
    IMG_RE.find_iter(html).map(|m| {
        let tag = m.as_str();
        ImgTag {
            tag,
            src: SRC_RE.captures(tag).and_then(|c| c.get(1)).map(|s| s.as_str()),
            alt: ALT_RE
                .captures(tag)
                .and_then(|c| c.get(1))
                .map(|a| a.as_str().to_lowercase())
                .unwrap_or_default(),
        }
    })
}

/// Pinout diagram: an image whose alt text mentions "pinout", else any
/// image tag mentioning it.
pub fn pinout_image(base: &str, html: &str) -> Option<String> {
    img_tags(html)
        .find(|img| img.src.is_some() && img.alt.contains("pinout"))
        .or_else(|| {
            img_tags(html).find(|img| img.src.is_some() && img.tag.to_lowercase().contains("pinout"))
        })
        .and_then(|img| img.src.map(|src| absolute(base, src)))
}

/// Main board photo: the first image whose alt text ends with "image".
pub fn board_image(base: &str, html: &str) -> Option<String> {
    img_tags(html)
        .find(|img| img.src.is_some() && img.alt.ends_with("image"))
        .and_then(|img| img.src.map(|src| absolute(base, src)))
}

/// Display name: the `<h1>`, else the `<title>` up to " Development
/// Board", else the slug.
pub fn board_name(html: &str, slug: &str) -> String {
    let name = if let Some(h1) = H1_RE.captures(html) {
        strip_tags(&h1[1])
    } else if let Some(title) = TITLE_RE.captures(html) {
        let title = strip_tags(&title[1]);
        title
            .split(" Development Board")
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    } else {
        String::new()
    };
    if name.is_empty() {
        slug.to_string()
    } else {
        name
    }
}

fn gpio_number(raw: &str) -> Option<String> {
    if let Some(caps) = GPIO_RE.captures(raw) {
        return Some(caps[1].to_string());
    }
    (!raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())).then(|| raw.to_string())
}

/// Rows of the first table after the "Pin Mappings" heading.
///
/// The first cell names the pin; `GPIOn` and bare numbers normalize to
/// `GPIOn` with label `n`. Remaining non-empty cells become `meta` keyed by
/// column header (`col<i>` when a header is missing). GPIO pins sort first
/// by number, the rest by value.
pub fn pin_mappings(html: &str) -> Vec<BoardPin> {
    let lower = html.to_ascii_lowercase();
    let body_at = lower.find("<body").unwrap_or(0);
    let segment_at = lower[body_at..]
        .find("pin mappings")
        .map_or(body_at, |i| body_at + i);
    let Some(table) = TABLE_RE.captures(&html[segment_at..]) else {
        return Vec::new();
    };
    let table = table.get(1).map_or("", |m| m.as_str());

    let headers: Vec<String> = TR_RE
        .captures_iter(table)
        .map(|row| {
            TH_RE
                .captures_iter(&row[1])
                .map(|th| strip_tags(&th[1]))
                .collect::<Vec<_>>()
        })
        .find(|ths| !ths.is_empty())
        .unwrap_or_default();

    let mut pins = Vec::new();
    for row in TR_RE.captures_iter(table) {
        let values: Vec<String> = TD_RE
            .captures_iter(&row[1])
            .map(|td| strip_tags(&td[1]))
            .collect();
        let Some(raw_pin) = values.first().filter(|v| !v.is_empty()) else {
            continue;
        };

        let gpio = gpio_number(raw_pin);
        let (value, label) = match gpio {
            Some(n) => (format!("GPIO{n}"), n),
            None => (raw_pin.clone(), raw_pin.clone()),
        };

        let mut meta = BTreeMap::new();
        let mut parts = Vec::new();
        for (i, v) in values.iter().enumerate().skip(1) {
            if v.is_empty() {
                continue;
            }
            let header = headers
                .get(i)
                .filter(|h| !h.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("col{i}"));
            parts.push(format!("{header}: {v}"));
            meta.insert(header, v.clone());
        }

        pins.push(BoardPin {
            value,
            label,
            description: (!parts.is_empty()).then(|| parts.join(" · ")),
            meta: (!meta.is_empty()).then_some(meta),
        });
    }

    pins.sort_by_cached_key(pin_sort_key);
    pins
}

fn pin_sort_key(pin: &BoardPin) -> (u8, u64, String) {
    match pin
        .value
        .strip_prefix("GPIO")
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse::<u64>().ok())
    {
        Some(n) => (0, n, String::new()),
        None => (1, 0, pin.value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.espboards.dev";

    const LISTING: &str = r#"
<div class="grid">
  <a href="/esp8266/nodemcu-v2/" class="card">
    <img class="thumb" src="/img/nodemcu.png" alt="NodeMCU">
    <h3 class="title">NodeMCU
        v2</h3>
  </a>
  <a href="/esp8266/d1-mini/" class="card">
    <img src="https://cdn.example/d1.png">
    <h3>Wemos D1 Mini</h3>
  </a>
  <a href="/esp8266/nodemcu-v2/" class="card">
    <img src="/img/dup.png"><h3>Duplicate</h3>
  </a>
</div>"#;

    #[test]
    fn absolute_urls() {
        assert_eq!(absolute(BASE, "/img/a.png"), "https://www.espboards.dev/img/a.png");
        assert_eq!(absolute(BASE, "img/a.png"), "https://www.espboards.dev/img/a.png");
        assert_eq!(absolute(BASE, "https://x/y.png"), "https://x/y.png");
    }

    #[test]
    fn strip_tags_decodes_entities() {
        assert_eq!(strip_tags("<b>A&amp;B</b>&nbsp; &lt;x&gt; &#39;q&quot;"), "A&B <x> 'q\"");
    }

    #[test]
    fn cards_first_slug_wins() {
        let boards = board_cards(BASE, LISTING, BoardTarget::Esp8266, None);
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].slug, "nodemcu-v2");
        assert_eq!(boards[0].name, "NodeMCU v2");
        assert_eq!(boards[0].url, "https://www.espboards.dev/esp8266/nodemcu-v2/");
        assert_eq!(boards[0].image_url, "https://www.espboards.dev/img/nodemcu.png");
        assert_eq!(boards[1].image_url, "https://cdn.example/d1.png");
        assert!(boards[1].microcontroller.is_none());
    }

    #[test]
    fn esp32_cards_record_microcontroller() {
        let html = r#"<a href="/esp32/devkitc/"><img src="/i.png"><h3>DevKitC</h3></a>"#;
        let boards = board_cards(BASE, html, BoardTarget::Esp32, Some("esp32s3"));
        assert_eq!(boards[0].microcontroller.as_deref(), Some("esp32s3"));
    }

    #[test]
    fn microcontroller_links() {
        let html = r#"<a href="/esp32/microcontroller/esp32s3/">S3</a>
            <a HREF="/esp32/microcontroller/esp32/">32</a>
            <a href="/esp32/microcontroller/esp32s3/">again</a>"#;
        assert_eq!(microcontrollers(html), ["esp32", "esp32s3"]);
    }

    #[test]
    fn name_sources() {
        assert_eq!(board_name("<h1 class=x> DevKit &amp; more </h1>", "s"), "DevKit & more");
        assert_eq!(
            board_name("<title>NodeMCU Development Board, Pinout</title>", "s"),
            "NodeMCU"
        );
        assert_eq!(board_name("<p>nothing</p>", "slug-1"), "slug-1");
    }

    #[test]
    fn images() {
        let html = r#"
            <img src="/a.png" alt="DevKit image">
            <img src="/b.png" class="pinout-diagram">
            <img src="/c.png" alt="DevKit Pinout">"#;
        assert_eq!(pinout_image(BASE, html).as_deref(), Some("https://www.espboards.dev/c.png"));
        assert_eq!(board_image(BASE, html).as_deref(), Some("https://www.espboards.dev/a.png"));

        let fallback = r#"<img src="/b.png" class="pinout-diagram">"#;
        assert_eq!(pinout_image(BASE, fallback).as_deref(), Some("https://www.espboards.dev/b.png"));
        assert_eq!(board_image(BASE, fallback), None);
    }

    const DETAILS: &str = r#"
<html><head><title>x</title></head><body>
<table><tr><th>Ignored</th></tr><tr><td>not this</td></tr></table>
<h2>Pin Mappings</h2>
<table>
  <tr><th>Pin</th><th>Function</th><th></th></tr>
  <tr><td>GPIO 12</td><td>MTDI</td><td>boot</td></tr>
  <tr><td>TX</td><td>UART0</td><td></td></tr>
  <tr><td>2</td><td></td><td></td></tr>
  <tr><td></td><td>skipped</td></tr>
  <tr><td>GPIO0</td><td>Boot <b>strap</b></td></tr>
</table></body></html>"#;

    #[test]
    fn pin_table() {
        let pins = pin_mappings(DETAILS);
        let values: Vec<&str> = pins.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, ["GPIO0", "GPIO2", "GPIO12", "TX"]);

        let gpio12 = &pins[2];
        assert_eq!(gpio12.label, "12");
        assert_eq!(gpio12.description.as_deref(), Some("Function: MTDI · col2: boot"));
        let meta = gpio12.meta.as_ref().unwrap();
        assert_eq!(meta.get("Function").map(String::as_str), Some("MTDI"));

        let gpio2 = &pins[1];
        assert!(gpio2.description.is_none());
        assert!(gpio2.meta.is_none());

        assert_eq!(pins[0].description.as_deref(), Some("Function: Boot strap"));
        assert_eq!(pins[3].label, "TX");
    }

    #[test]
    fn no_table_no_pins() {
        assert!(pin_mappings("<body><h2>Pin Mappings</h2></body>").is_empty());
    }
}
