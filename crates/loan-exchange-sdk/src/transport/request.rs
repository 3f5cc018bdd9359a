use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

/// HTTP 方法（资源接口只用到这四种）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 发往后端的请求
///
/// `path` 相对于 base URL（如 `api/deals/3`），`query` 保持插入顺序。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Put,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// 后端响应
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// 头名已转小写
    pub headers: HashMap<String, String>,
    /// 空 body 为 None
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 按名称取响应头（大小写不敏感）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// 列表查询参数
///
/// 只有给出排序时才带 page/size/sort；过滤条件在其后；cacheBuster 永远最后。
pub fn list_query(
    page: u32,
    size: u32,
    sort: Option<&str>,
    filter: &[(String, String)],
    cache_buster: u64,
) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(filter.len() + 4);
    if let Some(sort) = sort {
        query.push(("page".to_string(), page.to_string()));
        query.push(("size".to_string(), size.to_string()));
        query.push(("sort".to_string(), sort.to_string()));
    }
    query.extend(filter.iter().cloned());
    query.push(("cacheBuster".to_string(), cache_buster.to_string()));
    query
}

/// 提交前清理实体 JSON
///
/// 去掉值为空字符串的属性，以及 `id` 为空的关联引用；`id` 本身不动。
pub fn clean_entity(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .filter(|(key, v)| key == "id" || !is_blank(v))
                .collect();
            Value::Object(cleaned)
        }
        other => other,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Object(map) => match map.get("id") {
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Null) => true,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(query: &[(String, String)]) -> Vec<&str> {
        query.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn list_query_with_sort() {
        let query = list_query(2, 20, Some("id,asc"), &[], 99);
        assert_eq!(keys(&query), vec!["page", "size", "sort", "cacheBuster"]);
        assert_eq!(query[0].1, "2");
        assert_eq!(query[2].1, "id,asc");
        assert_eq!(query[3].1, "99");
    }

    #[test]
    fn list_query_without_sort_only_has_cache_buster() {
        let query = list_query(2, 20, None, &[], 7);
        assert_eq!(query, vec![("cacheBuster".to_string(), "7".to_string())]);
    }

    #[test]
    fn list_query_filter_precedes_cache_buster() {
        let filter = vec![("forUser".to_string(), "4".to_string())];
        let query = list_query(0, 20, Some("date,desc"), &filter, 1);
        assert_eq!(keys(&query), vec!["page", "size", "sort", "forUser", "cacheBuster"]);
    }

    #[test]
    fn clean_entity_strips_blank_values_and_refs() {
        let cleaned = clean_entity(json!({
            "id": "",
            "message": "",
            "date": "2020-01-01T00:00:00Z",
            "recipient": {"id": ""},
            "associatedDeal": {"id": null},
            "account": {"id": 3},
            "haveRead": false
        }));
        assert_eq!(
            cleaned,
            json!({
                "id": "",
                "date": "2020-01-01T00:00:00Z",
                "account": {"id": 3},
                "haveRead": false
            })
        );
    }

    #[test]
    fn response_headers_are_case_insensitive() {
        let response = ApiResponse::new(200).with_header("X-Total-Count", "12");
        assert_eq!(response.header("x-total-count"), Some("12"));
        assert_eq!(response.header("X-TOTAL-COUNT"), Some("12"));
        assert_eq!(response.header("link"), None);
    }
}
