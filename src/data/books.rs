//! 食谱书目信息
#![allow(missing_docs)]

use super::{count_by, CountEntry, Scalar};
use crate::config::{SourceConfig, DEFAULT_AFFILIATE_BASE_URL};
use crate::error::{Error, Result};
use crate::utils::string::{contains_lowercase, eq_ignore_case};
use serde::{Deserialize, Serialize};

/// 书目记录
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Book {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Scalar>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Scalar>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub publisher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// 额外的全文字段，参与搜索
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 由 `shop`/`target` 生成的购买链接
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Book {
    fn isbn_string(&self) -> Option<String> {
        self.isbn.as_ref().map(ToString::to_string)
    }
}

/// 书目过滤条件，所有条件以 AND 组合，未设置的条件不参与过滤
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookFilter {
    /// 语言代码（精确匹配，不区分大小写）
    pub lang: Option<String>,
    /// 级别（精确匹配）
    pub level: Option<String>,
    /// 作者（子串匹配）
    pub author: Option<String>,
    /// 出版年份（精确匹配）
    pub year: Option<String>,
    /// 出版社（子串匹配）
    pub publisher: Option<String>,
    /// 馆藏位置（不区分大小写）
    pub location: Option<String>,
}

impl BookFilter {
    fn matches(&self, book: &Book) -> bool {
        let scalar_eq = |field: &Option<Scalar>, wanted: &str| {
            field.as_ref().is_some_and(|v| v.to_string() == wanted)
        };

        self.lang.as_deref().is_none_or(|lang| eq_ignore_case(&book.lang, lang))
            && self.level.as_deref().is_none_or(|level| scalar_eq(&book.level, level))
            && self.year.as_deref().is_none_or(|year| scalar_eq(&book.year, year))
            && self
                .author
                .as_deref()
                .is_none_or(|author| contains_lowercase(&book.author, &author.to_lowercase()))
            && self.publisher.as_deref().is_none_or(|publisher| {
                contains_lowercase(&book.publisher, &publisher.to_lowercase())
            })
            && self.location.as_deref().is_none_or(|location| {
                book.location
                    .as_deref()
                    .is_some_and(|l| eq_ignore_case(l, location))
            })
    }
}

/// 书目统计，每个维度按数量降序
#[derive(Debug, Clone, Serialize)]
pub struct BookStats {
    pub total: usize,
    pub by_language: Vec<CountEntry>,
    pub by_level: Vec<CountEntry>,
    pub by_author: Vec<CountEntry>,
    pub by_publisher: Vec<CountEntry>,
    pub by_year: Vec<CountEntry>,
    pub by_location: Vec<CountEntry>,
}

/// 解析并转换书目数据
pub fn load(raw: serde_json::Value, config: &SourceConfig) -> Result<Vec<Book>> {
    let mut books: Vec<Book> = serde_json::from_value(raw)?;
    let affiliate_base = config
        .affiliate_base_url
        .as_deref()
        .unwrap_or(DEFAULT_AFFILIATE_BASE_URL);

    for book in &mut books {
        apply_affiliate_link(book, affiliate_base);
    }
    Ok(books)
}

/// `shop == "amazon"` 且 `target` 非空时生成 `url` 并移除 `target`，其余情况保持不变
pub fn apply_affiliate_link(book: &mut Book, affiliate_base: &str) {
    if book.shop.as_deref() != Some("amazon") {
        return;
    }

    let link = book
        .target
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .map(|target| format!("{affiliate_base}{target}"));

    if let Some(link) = link {
        book.url = Some(link);
        book.target = None;
    }
}

/// 按条件列出书目
#[must_use]
pub fn list_books<'a>(books: &'a [Book], filter: &BookFilter) -> Vec<&'a Book> {
    books.iter().filter(|b| filter.matches(b)).collect()
}

/// 按 ISBN 查找，重复时取第一个
pub fn get_book<'a>(books: &'a [Book], isbn: &str) -> Result<&'a Book> {
    books
        .iter()
        .find(|b| b.isbn_string().as_deref() == Some(isbn))
        .ok_or_else(|| Error::not_found("isbn", isbn))
}

/// 在标题、作者、简介和全文字段中搜索
#[must_use]
pub fn search_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|b| {
            contains_lowercase(&b.title, &needle)
                || contains_lowercase(&b.author, &needle)
                || b.description
                    .as_deref()
                    .is_some_and(|d| contains_lowercase(d, &needle))
                || b.text.as_deref().is_some_and(|t| contains_lowercase(t, &needle))
        })
        .collect()
}

/// 按作者（子串）查找
pub fn books_by_author<'a>(books: &'a [Book], author: &str) -> Result<Vec<&'a Book>> {
    let found = list_books(
        books,
        &BookFilter {
            author: Some(author.to_string()),
            ..BookFilter::default()
        },
    );
    if found.is_empty() {
        return Err(Error::not_found("author", author));
    }
    Ok(found)
}

/// 按语言代码查找，找不到时列出现有语言
pub fn books_by_language<'a>(books: &'a [Book], lang: &str) -> Result<Vec<&'a Book>> {
    let found = list_books(
        books,
        &BookFilter {
            lang: Some(lang.to_string()),
            ..BookFilter::default()
        },
    );
    if found.is_empty() {
        return Err(Error::NotFound {
            kind: "language",
            key: lang.to_string(),
            available: stats(books).by_language.into_iter().map(|c| c.value).collect(),
        });
    }
    Ok(found)
}

/// 书目统计
#[must_use]
pub fn stats(books: &[Book]) -> BookStats {
    fn non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CountEntry> {
        count_by(values.filter(|v| !v.trim().is_empty()).map(str::to_string))
    }

    let years: Vec<String> = books
        .iter()
        .filter_map(|b| b.year.as_ref().map(ToString::to_string))
        .collect();
    let levels: Vec<String> = books
        .iter()
        .filter_map(|b| b.level.as_ref().map(ToString::to_string))
        .collect();

    BookStats {
        total: books.len(),
        by_language: non_empty(books.iter().map(|b| b.lang.as_str())),
        by_level: non_empty(levels.iter().map(String::as_str)),
        by_author: non_empty(books.iter().map(|b| b.author.as_str())),
        by_publisher: non_empty(books.iter().map(|b| b.publisher.as_str())),
        by_year: non_empty(years.iter().map(String::as_str)),
        by_location: non_empty(books.iter().filter_map(|b| b.location.as_deref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SourceConfig {
        crate::config::SourcesConfig::default().books
    }

    fn sample() -> Vec<Book> {
        load(
            json!([
                {"title": "Thai Street Food", "author": "David Thompson", "year": 2009, "lang": "en",
                 "isbn": "9781580082846", "level": 3, "publisher": "Ten Speed Press",
                 "description": "Recipes from the stalls of Bangkok", "location": "Regal A",
                 "shop": "amazon", "target": "1580082847"},
                {"title": "Thailand - Das Kochbuch", "author": "Jean-Pierre Gabriel", "year": "2014", "lang": "de",
                 "isbn": "9780714868646", "level": 2, "publisher": "Phaidon",
                 "location": "Regal B", "shop": "buchhandlung", "target": "thailand-kochbuch"},
                {"title": "Pok Pok", "author": "Andy Ricker", "year": 2013, "lang": "en",
                 "isbn": "9781607742883", "level": 3, "publisher": "Ten Speed Press",
                 "text": "Khao soi and other northern dishes", "shop": "amazon", "target": "  "}
            ]),
            &config(),
        )
        .unwrap()
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let books = load(
            json!([
                {"title": "A", "isbn": "1", "publisher": null, "author": null, "lang": null},
                {"title": "B", "isbn": "2", "publisher": "GU", "year": null, "level": null}
            ]),
            &config(),
        )
        .unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(get_book(&books, "1").unwrap().publisher, "");
        assert!(books[1].year.is_none());
        assert_eq!(search_books(&books, "b").len(), 1);
    }

    #[test]
    fn test_affiliate_link_replaces_target() {
        let books = sample();
        assert_eq!(
            books[0].url.as_deref(),
            Some("https://www.amazon.de/dp/1580082847")
        );
        assert!(books[0].target.is_none());

        let serialized = serde_json::to_value(&books[0]).unwrap();
        assert!(serialized.get("target").is_none());
    }

    #[test]
    fn test_affiliate_link_skips_other_shops_and_blank_targets() {
        let books = sample();
        assert!(books[1].url.is_none());
        assert_eq!(books[1].target.as_deref(), Some("thailand-kochbuch"));

        assert!(books[2].url.is_none());
        assert_eq!(books[2].target.as_deref(), Some("  "));
    }

    #[test]
    fn test_affiliate_transform_is_idempotent() {
        let once = sample();
        let mut twice = once.clone();
        for book in &mut twice {
            apply_affiliate_link(book, DEFAULT_AFFILIATE_BASE_URL);
        }
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filters_are_anded() {
        let books = sample();
        let filter = BookFilter {
            lang: Some("EN".to_string()),
            publisher: Some("ten speed".to_string()),
            year: Some("2013".to_string()),
            ..BookFilter::default()
        };
        let found = list_books(&books, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Pok Pok");

        assert_eq!(list_books(&books, &BookFilter::default()).len(), 3);
    }

    #[test]
    fn test_year_matches_string_and_number() {
        let books = sample();
        let filter = BookFilter {
            year: Some("2014".to_string()),
            ..BookFilter::default()
        };
        assert_eq!(list_books(&books, &filter)[0].author, "Jean-Pierre Gabriel");
    }

    #[test]
    fn test_get_book_by_isbn() {
        let books = sample();
        assert_eq!(get_book(&books, "9781607742883").unwrap().title, "Pok Pok");
        assert!(matches!(
            get_book(&books, "0000000000"),
            Err(Error::NotFound { kind: "isbn", .. })
        ));
    }

    #[test]
    fn test_search_includes_text_field() {
        let books = sample();
        let found = search_books(&books, "khao soi");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Pok Pok");

        assert_eq!(search_books(&books, "BANGKOK").len(), 1);
    }

    #[test]
    fn test_by_author_and_language() {
        let books = sample();
        assert_eq!(books_by_author(&books, "ricker").unwrap().len(), 1);
        assert!(books_by_author(&books, "nobody").is_err());

        match books_by_language(&books, "th").unwrap_err() {
            Error::NotFound { available, .. } => assert_eq!(available, vec!["en", "de"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_stats_sorted_descending() {
        let stats = stats(&sample());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_language[0], CountEntry { value: "en".to_string(), count: 2 });
        assert_eq!(stats.by_publisher[0].value, "Ten Speed Press");
        assert_eq!(stats.by_level[0].value, "3");
        assert_eq!(stats.by_location.len(), 2);
        assert_eq!(stats.by_year.len(), 3);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let books = load(
            json!([{"title": "X", "isbn": "1", "edition": "2nd"}]),
            &config(),
        )
        .unwrap();
        assert_eq!(books[0].extra.get("edition"), Some(&json!("2nd")));
    }
}
