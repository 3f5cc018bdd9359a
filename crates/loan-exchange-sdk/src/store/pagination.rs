//! 分页响应头解析 - RFC 5988 `Link` 与 `X-Total-Count`
//!
//! 格式：`<http://host/api/deals?page=1&size=20&sort=id,asc>; rel="next",<...>; rel="last"`
//! URL 内的 sort 参数本身含逗号，不能简单按逗号切分。

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<([^>]*)>\s*;\s*rel\s*=\s*"?([^",;]+)"?"#).expect("valid link regex")
    })
}

fn page_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]page=(\d+)").expect("valid page regex"))
}

/// 分页游标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    /// 下一页页码（0 起）；初始 0，只有解析出 rel="next" 时才前移
    pub next: u32,
    pub last: Option<u32>,
}

impl Default for PaginationLinks {
    fn default() -> Self {
        Self {
            first: None,
            prev: None,
            next: 0,
            last: None,
        }
    }
}

impl PaginationLinks {
    /// 用一次响应的 `Link` 头推进游标；头缺失或无法解析时保持原值
    pub fn advance(&self, link_header: Option<&str>) -> PaginationLinks {
        let Some(header) = link_header else {
            return *self;
        };
        let Some(rels) = parse_link_header(header) else {
            warn!("无法解析 Link 头，分页游标保持不变: {:?}", header);
            return *self;
        };
        PaginationLinks {
            first: rels.get("first").copied(),
            prev: rels.get("prev").copied(),
            next: rels.get("next").copied().unwrap_or(self.next),
            last: rels.get("last").copied(),
        }
    }
}

/// 解析 `Link` 头为 rel → 页码
///
/// 空头或没有任何可识别的 `<url>; rel=...` 段时返回 None；
/// URL 不带 page 参数的段被忽略。
pub fn parse_link_header(header: &str) -> Option<BTreeMap<String, u32>> {
    if header.trim().is_empty() {
        return None;
    }
    let mut rels = BTreeMap::new();
    let mut sections = 0usize;
    for caps in link_regex().captures_iter(header) {
        sections += 1;
        let url = caps[1].trim();
        let rel = caps[2].trim().to_string();
        let page = page_regex()
            .captures(url)
            .and_then(|c| c[1].parse::<u32>().ok());
        if let Some(page) = page {
            rels.insert(rel, page);
        }
    }
    if sections == 0 {
        return None;
    }
    Some(rels)
}

/// 解析 `X-Total-Count`
pub fn parse_total_count(header: Option<&str>) -> Option<u64> {
    header.and_then(|h| h.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JHIPSTER_LINKS: &str = concat!(
        r#"</api/deals?page=2&size=20&sort=id,asc>; rel="next","#,
        r#"</api/deals?page=0&size=20&sort=id,asc>; rel="prev","#,
        r#"</api/deals?page=4&size=20&sort=id,asc>; rel="last","#,
        r#"</api/deals?page=0&size=20&sort=id,asc>; rel="first""#
    );

    #[test]
    fn parses_all_rels_even_with_commas_in_sort() {
        let rels = parse_link_header(JHIPSTER_LINKS).unwrap();
        assert_eq!(rels.get("next"), Some(&2));
        assert_eq!(rels.get("prev"), Some(&0));
        assert_eq!(rels.get("last"), Some(&4));
        assert_eq!(rels.get("first"), Some(&0));
    }

    #[test]
    fn rejects_empty_and_garbage_headers() {
        assert!(parse_link_header("").is_none());
        assert!(parse_link_header("   ").is_none());
        assert!(parse_link_header("not a link header").is_none());
    }

    #[test]
    fn link_without_page_is_ignored() {
        let rels = parse_link_header(r#"<https://example.com/api/deals>; rel="next""#).unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn advance_moves_next_only_when_present() {
        let links = PaginationLinks::default().advance(Some(JHIPSTER_LINKS));
        assert_eq!(links.next, 2);
        assert_eq!(links.last, Some(4));

        // 最后一页：没有 rel="next"，next 保持
        let last_page = r#"</api/deals?page=3&size=20>; rel="prev",</api/deals?page=4&size=20>; rel="last""#;
        let links = links.advance(Some(last_page));
        assert_eq!(links.next, 2);
        assert_eq!(links.prev, Some(3));

        // 头缺失 / 无法解析：整体不变
        assert_eq!(links.advance(None), links);
        assert_eq!(links.advance(Some("garbage")), links);
    }

    #[test]
    fn total_count_parsing() {
        assert_eq!(parse_total_count(Some("42")), Some(42));
        assert_eq!(parse_total_count(Some(" 7 ")), Some(7));
        assert_eq!(parse_total_count(Some("x")), None);
        assert_eq!(parse_total_count(None), None);
    }
}
