//! 食物词典
//!
//! 数据形如 `{分类: {泰语词条: {meaning_de, meaning_en, trans_de, trans_en}}}`，
//! 分类与词条都保持源文件中的顺序。
#![allow(missing_docs)]

use super::{count_by, ordered_entries, CountEntry};
use crate::error::{Error, Result};
use crate::utils::string::{contains_lowercase, display_name};
use serde::{Deserialize, Serialize};

/// 词条释义
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Meaning {
    /// 德语释义
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub meaning_de: String,
    /// 英语释义
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub meaning_en: String,
    /// 德语转写
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub trans_de: String,
    /// 英语转写
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub trans_en: String,
}

/// 词典分类
#[derive(Debug, Clone)]
pub struct Category {
    /// 分类名称
    pub name: String,
    /// 词条（泰语 -> 释义）
    pub terms: Vec<(String, Meaning)>,
}

/// 词典数据集
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// 全部分类
    pub categories: Vec<Category>,
}

/// 带分类信息的词条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRecord {
    /// 泰语词条
    pub thai: String,
    /// 所属分类
    pub category: String,
    /// 释义
    #[serde(flatten)]
    pub meaning: Meaning,
}

/// 分类摘要
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub display_name: String,
    pub term_count: usize,
}

/// 分类详情
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub display_name: String,
    pub terms: Vec<TermRecord>,
}

/// 词典统计
#[derive(Debug, Clone, Serialize)]
pub struct DictionaryStats {
    pub total_categories: usize,
    pub total_terms: usize,
    pub terms_per_category: Vec<CountEntry>,
}

impl Dictionary {
    /// 解析原始 JSON。词典不需要 URL 改写。
    pub fn from_json(raw: serde_json::Value) -> Result<Self> {
        let categories = ordered_entries::<serde_json::Value>(raw, "词典")?
            .into_iter()
            .map(|(name, terms)| {
                let terms = ordered_entries(terms, &format!("分类 {name}"))?;
                Ok(Category { name, terms })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { categories })
    }

    fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    fn find_category(&self, name: &str) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::NotFound {
                kind: "category",
                key: name.to_string(),
                available: self.category_names(),
            })
    }
}

impl Category {
    fn record(&self, thai: &str, meaning: &Meaning) -> TermRecord {
        TermRecord {
            thai: thai.to_string(),
            category: self.name.clone(),
            meaning: meaning.clone(),
        }
    }
}

/// 列出全部分类
#[must_use]
pub fn list_categories(dictionary: &Dictionary) -> Vec<CategorySummary> {
    dictionary
        .categories
        .iter()
        .map(|c| CategorySummary {
            name: c.name.clone(),
            display_name: display_name(&c.name),
            term_count: c.terms.len(),
        })
        .collect()
}

/// 获取分类下的全部词条
pub fn get_category(dictionary: &Dictionary, name: &str) -> Result<CategoryView> {
    let category = dictionary.find_category(name)?;
    Ok(CategoryView {
        name: category.name.clone(),
        display_name: display_name(&category.name),
        terms: category
            .terms
            .iter()
            .map(|(thai, meaning)| category.record(thai, meaning))
            .collect(),
    })
}

/// 在泰语词条和四个释义字段中做不区分大小写的子串搜索
///
/// 指定 `category` 时只搜索该分类。
pub fn search_terms(
    dictionary: &Dictionary,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<TermRecord>> {
    let lowered = query.to_lowercase();
    let needle = lowered.as_str();
    let scope: Vec<&Category> = match category {
        Some(name) => vec![dictionary.find_category(name)?],
        None => dictionary.categories.iter().collect(),
    };

    Ok(scope
        .into_iter()
        .flat_map(|c| {
            c.terms
                .iter()
                .filter(move |(thai, m)| {
                    [thai, &m.meaning_de, &m.meaning_en, &m.trans_de, &m.trans_en]
                        .iter()
                        .any(|field| contains_lowercase(field, needle))
                })
                .map(move |(thai, m)| c.record(thai, m))
        })
        .collect())
}

/// 精确查找泰语词条
///
/// 按分类原始顺序扫描，首个匹配胜出；找不到时返回 `None`，由调用方建议改用模糊搜索。
#[must_use]
pub fn translate_word(dictionary: &Dictionary, term: &str) -> Option<TermRecord> {
    dictionary.categories.iter().find_map(|c| {
        c.terms
            .iter()
            .find(|(thai, _)| thai == term)
            .map(|(thai, m)| c.record(thai, m))
    })
}

/// 词典统计
#[must_use]
pub fn stats(dictionary: &Dictionary) -> DictionaryStats {
    let per_category = dictionary
        .categories
        .iter()
        .flat_map(|c| std::iter::repeat(c.name.clone()).take(c.terms.len()));

    DictionaryStats {
        total_categories: dictionary.categories.len(),
        total_terms: dictionary.categories.iter().map(|c| c.terms.len()).sum(),
        terms_per_category: count_by(per_category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dictionary {
        Dictionary::from_json(json!({
            "gemuese": {
                "มะเขือ": {"meaning_de": "Aubergine", "meaning_en": "Eggplant", "trans_de": "Makhuea", "trans_en": "Makhuea"},
                "พริก": {"meaning_de": "Chili", "meaning_en": "Chili", "trans_de": "Prik", "trans_en": "Phrik"}
            },
            "kraeuter_und_gewuerze": {
                "ตะไคร้": {"meaning_de": "Zitronengras", "meaning_en": "Lemongrass", "trans_de": "Takhrai", "trans_en": "Takhrai"},
                "พริกไทย": {"meaning_de": "Pfeffer", "meaning_en": "Pepper", "trans_de": "Prik Thai", "trans_en": "Phrik Thai"},
                "พริก": {"meaning_de": "Chili (Gewürz)", "meaning_en": "Chili (spice)", "trans_de": "Prik", "trans_en": "Phrik"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let dictionary = Dictionary::from_json(json!({
            "gemuese": {
                "มะเขือ": {"meaning_de": "Aubergine", "meaning_en": null, "trans_de": null, "trans_en": "makhuea"}
            }
        }))
        .unwrap();
        let record = translate_word(&dictionary, "มะเขือ").unwrap();
        assert_eq!(record.meaning.meaning_en, "");
        assert_eq!(record.meaning.trans_de, "");
        assert_eq!(search_terms(&dictionary, "aubergine", None).unwrap().len(), 1);
    }

    #[test]
    fn test_translate_word_found_and_absent() {
        let dictionary = Dictionary::from_json(json!({
            "gemuese": {"มะเขือ": {"meaning_de": "Aubergine", "meaning_en": "Eggplant", "trans_de": "Makhuea", "trans_en": "Makhuea"}}
        }))
        .unwrap();

        let hit = translate_word(&dictionary, "มะเขือ").unwrap();
        assert_eq!(hit.category, "gemuese");
        assert_eq!(hit.meaning.meaning_en, "Eggplant");

        assert!(translate_word(&dictionary, "ไม่มี").is_none());
    }

    #[test]
    fn test_translate_word_first_category_wins() {
        let hit = translate_word(&sample(), "พริก").unwrap();
        assert_eq!(hit.category, "gemuese");
        assert_eq!(hit.meaning.meaning_de, "Chili");
    }

    #[test]
    fn test_list_categories_keeps_source_order() {
        let categories = list_categories(&sample());
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "gemuese");
        assert_eq!(categories[1].display_name, "Kraeuter Und Gewuerze");
        assert_eq!(categories[1].term_count, 3);
    }

    #[test]
    fn test_get_category_unknown_lists_available() {
        let err = get_category(&sample(), "obst").unwrap_err();
        match err {
            Error::NotFound { kind, available, .. } => {
                assert_eq!(kind, "category");
                assert_eq!(available, vec!["gemuese", "kraeuter_und_gewuerze"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let dictionary = sample();

        let by_translation = search_terms(&dictionary, "LEMON", None).unwrap();
        assert_eq!(by_translation.len(), 1);
        assert_eq!(by_translation[0].thai, "ตะไคร้");

        let by_thai = search_terms(&dictionary, "พริก", None).unwrap();
        let thai: Vec<&str> = by_thai.iter().map(|t| t.thai.as_str()).collect();
        assert_eq!(thai, vec!["พริก", "พริกไทย", "พริก"]);

        let scoped = search_terms(&dictionary, "prik", Some("gemuese")).unwrap();
        assert_eq!(scoped.len(), 1);
    }

    #[test]
    fn test_search_finds_exact_translation_hit() {
        let dictionary = sample();
        let exact = translate_word(&dictionary, "ตะไคร้").unwrap();
        let found = search_terms(&dictionary, "ตะไคร้", None).unwrap();
        assert!(found.contains(&exact));
    }

    #[test]
    fn test_stats() {
        let stats = stats(&sample());
        assert_eq!(stats.total_terms, 5);
        assert_eq!(stats.terms_per_category[0].value, "kraeuter_und_gewuerze");
        assert_eq!(stats.terms_per_category[0].count, 3);
    }

    #[test]
    fn test_rejects_non_object_dataset() {
        assert!(Dictionary::from_json(json!(["gemuese"])).is_err());
    }
}
