//! 美食百科
//!
//! 每个条目有泰语名称、别名、图片和可选的德语/英语两部分。
//! 数据集既可以是条目数组，也可以是以条目 ID 为键的对象。
//! 地区与关系字段的词表是固定的参考表，与数据集内容无关。
#![allow(missing_docs)]

use super::links::{is_absolute, join, LinkRewriter};
use super::{count_by, ordered_entries, shape_error, CountEntry};
use crate::config::{LinkRules, SourceConfig};
use crate::error::{Error, Result};
use crate::utils::string::{contains_lowercase, eq_ignore_case};
use serde::{Deserialize, Serialize};

/// 关系字段：单个链接或链接列表
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LinkField {
    /// 单个链接
    One(String),
    /// 多个链接
    Many(Vec<String>),
}

impl LinkField {
    fn rewrite(&mut self, f: impl Fn(&str) -> String) {
        match self {
            LinkField::One(link) => *link = f(link),
            LinkField::Many(links) => {
                for link in links.iter_mut() {
                    *link = f(link);
                }
            }
        }
    }

    /// 全部链接
    #[must_use]
    pub fn links(&self) -> Vec<String> {
        match self {
            LinkField::One(link) => vec![link.clone()],
            LinkField::Many(links) => links.clone(),
        }
    }
}

/// 单一语言的条目内容
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LangSection {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub transcription: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub regions: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub recipes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_by: Option<LinkField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<LinkField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fits: Option<LinkField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitted_by: Option<LinkField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<LinkField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_of: Option<LinkField>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LangSection {
    /// 关系字段，顺序与关系表一致
    fn relations(&self) -> [(&'static str, Option<&LinkField>); 6] {
        [
            ("usedBy", self.used_by.as_ref()),
            ("uses", self.uses.as_ref()),
            ("fits", self.fits.as_ref()),
            ("fittedBy", self.fitted_by.as_ref()),
            ("variations", self.variations.as_ref()),
            ("variationOf", self.variation_of.as_ref()),
        ]
    }

    fn relations_mut(&mut self) -> [&mut Option<LinkField>; 6] {
        [
            &mut self.used_by,
            &mut self.uses,
            &mut self.fits,
            &mut self.fitted_by,
            &mut self.variations,
            &mut self.variation_of,
        ]
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.transcription, &self.summary, &self.description]
            .into_iter()
            .chain(self.tags.iter())
            .chain(self.regions.iter())
            .any(|field| contains_lowercase(field, needle))
    }
}

/// 百科条目
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// 条目 ID（对象形式的数据集中取自键名）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 泰语名称
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub thai_name: String,
    /// 别名
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub alternative_names: Vec<String>,
    /// 图片地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// 德语内容
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub de: Option<LangSection>,
    /// 英语内容
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<LangSection>,
    /// 其他字段原样保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entry {
    fn sections(&self) -> impl Iterator<Item = &LangSection> {
        self.de.iter().chain(self.en.iter())
    }

    fn is_named(&self, name: &str) -> bool {
        self.thai_name == name || self.id.as_deref() == Some(name)
    }

    fn is_aliased(&self, name: &str) -> bool {
        self.alternative_names.iter().any(|alt| eq_ignore_case(alt, name))
            || self
                .sections()
                .any(|s| !s.transcription.is_empty() && eq_ignore_case(&s.transcription, name))
    }
}

/// 百科数据集
#[derive(Debug, Clone, Default)]
pub struct Encyclopedia {
    /// 全部条目，保持源顺序
    pub entries: Vec<Entry>,
}

impl Encyclopedia {
    /// 解析原始 JSON 并改写全部链接
    pub fn load(raw: serde_json::Value, config: &SourceConfig, rules: &LinkRules) -> Result<Self> {
        let mut entries: Vec<Entry> = match raw {
            serde_json::Value::Array(_) => serde_json::from_value(raw)?,
            serde_json::Value::Object(_) => ordered_entries::<Entry>(raw, "百科")?
                .into_iter()
                .map(|(key, mut entry)| {
                    entry.id.get_or_insert(key);
                    entry
                })
                .collect(),
            _ => return Err(shape_error("百科应为 JSON 数组或对象")),
        };

        let rewriter = LinkRewriter::new(config.site_base(), rules);
        let media_base = config.image_base();
        for entry in &mut entries {
            transform_entry(entry, &rewriter, media_base);
        }

        Ok(Self { entries })
    }
}

/// 改写单个条目中的链接
///
/// `recipes` 只做分类改写；`url` 与各关系字段改写后再补齐末尾斜杠。
pub fn transform_entry(entry: &mut Entry, rewriter: &LinkRewriter<'_>, media_base: &str) {
    if let Some(image) = entry.image_url.as_mut() {
        if !image.is_empty() && !is_absolute(image) {
            *image = join(media_base, image);
        }
    }

    for section in [entry.de.as_mut(), entry.en.as_mut()].into_iter().flatten() {
        for recipe in &mut section.recipes {
            *recipe = rewriter.classify(recipe);
        }
        if let Some(url) = section.url.as_mut() {
            *url = rewriter.classify_with_slash(url);
        }
        for field in section.relations_mut().into_iter().flatten() {
            field.rewrite(|link| rewriter.classify_with_slash(link));
        }
    }
}

/// 泰国地区
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    /// 地区键
    pub key: &'static str,
    /// 泰文名称
    pub thai: &'static str,
    /// 转写
    pub transcription: &'static str,
    /// 德语名称
    pub name_de: &'static str,
    /// 英语名称
    pub name_en: &'static str,
    /// 数据集中可能出现的其他写法（小写）
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

/// 关系字段说明
#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    /// 字段名
    pub key: &'static str,
    /// 德语说明
    pub description_de: &'static str,
    /// 英语说明
    pub description_en: &'static str,
}

const REGIONS: [Region; 4] = [
    Region {
        key: "central",
        thai: "ภาคกลาง",
        transcription: "Phak Klang",
        name_de: "Zentralthailand",
        name_en: "Central Thailand",
        aliases: &["zentral", "zentralthailand", "central thailand", "zentrale ebene"],
    },
    Region {
        key: "north",
        thai: "ภาคเหนือ",
        transcription: "Phak Nuea",
        name_de: "Nordthailand",
        name_en: "Northern Thailand",
        aliases: &["nord", "norden", "nordthailand", "northern thailand", "lanna"],
    },
    Region {
        key: "isaan",
        thai: "ภาคอีสาน",
        transcription: "Phak Isan",
        name_de: "Isaan (Nordostthailand)",
        name_en: "Isan (Northeastern Thailand)",
        aliases: &["isan", "nordosten", "nordostthailand", "northeast", "northeastern thailand"],
    },
    Region {
        key: "south",
        thai: "ภาคใต้",
        transcription: "Phak Tai",
        name_de: "Südthailand",
        name_en: "Southern Thailand",
        aliases: &["süd", "sued", "süden", "südthailand", "southern thailand"],
    },
];

const RELATIONSHIPS: [Relationship; 6] = [
    Relationship {
        key: "usedBy",
        description_de: "Gerichte, in denen diese Zutat verwendet wird",
        description_en: "Dishes in which this ingredient is used",
    },
    Relationship {
        key: "uses",
        description_de: "Zutaten, die in diesem Gericht verwendet werden",
        description_en: "Ingredients used in this dish",
    },
    Relationship {
        key: "fits",
        description_de: "Passt gut zu diesen Gerichten oder Beilagen",
        description_en: "Goes well with these dishes or side dishes",
    },
    Relationship {
        key: "fittedBy",
        description_de: "Wird gut ergänzt durch",
        description_en: "Is well complemented by",
    },
    Relationship {
        key: "variations",
        description_de: "Varianten dieses Eintrags",
        description_en: "Variations of this entry",
    },
    Relationship {
        key: "variationOf",
        description_de: "Ist eine Variante von",
        description_en: "Is a variation of",
    },
];

/// 四个地区的固定参考表
#[must_use]
pub fn list_regions() -> &'static [Region] {
    &REGIONS
}

/// 六个关系字段的固定参考表
#[must_use]
pub fn list_relationships() -> &'static [Relationship] {
    &RELATIONSHIPS
}

/// 按地区键或任意名称查找地区
#[must_use]
pub fn resolve_region(name: &str) -> Option<&'static Region> {
    let lowered = name.trim().to_lowercase();
    REGIONS.iter().find(|r| {
        r.key == lowered
            || r.thai == name.trim()
            || r.transcription.to_lowercase() == lowered
            || r.name_de.to_lowercase() == lowered
            || r.name_en.to_lowercase() == lowered
            || r.aliases.contains(&lowered.as_str())
    })
}

/// 条目过滤条件，各条件之间为“与”关系
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// 标签（任一语言，不区分大小写）
    pub tag: Option<String>,
    /// 地区（地区键或名称）
    pub region: Option<String>,
}

impl EntryFilter {
    fn matches(&self, entry: &Entry) -> bool {
        if let Some(tag) = &self.tag {
            if !entry.sections().any(|s| s.tags.iter().any(|t| eq_ignore_case(t, tag))) {
                return false;
            }
        }
        if let Some(region) = &self.region {
            let wanted = resolve_region(region);
            let hit = entry.sections().flat_map(|s| s.regions.iter()).any(|r| {
                match wanted {
                    Some(known) => resolve_region(r).is_some_and(|found| found.key == known.key),
                    None => eq_ignore_case(r, region),
                }
            });
            if !hit {
                return false;
            }
        }
        true
    }
}

/// 条目摘要
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub thai_name: String,
    pub alternative_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_de: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_de: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_en: Option<String>,
}

impl From<&Entry> for EntrySummary {
    fn from(entry: &Entry) -> Self {
        let non_empty = |s: &String| (!s.is_empty()).then(|| s.clone());
        Self {
            id: entry.id.clone(),
            thai_name: entry.thai_name.clone(),
            alternative_names: entry.alternative_names.clone(),
            transcription_de: entry.de.as_ref().and_then(|s| non_empty(&s.transcription)),
            transcription_en: entry.en.as_ref().and_then(|s| non_empty(&s.transcription)),
            summary_de: entry.de.as_ref().and_then(|s| non_empty(&s.summary)),
            summary_en: entry.en.as_ref().and_then(|s| non_empty(&s.summary)),
        }
    }
}

/// 单一语言的关系链接
#[derive(Debug, Clone, Serialize)]
pub struct RelationLinks {
    pub relationship: &'static str,
    pub links: Vec<String>,
}

/// 条目的全部关系
#[derive(Debug, Clone, Serialize)]
pub struct EntryRelations {
    pub thai_name: String,
    pub de: Vec<RelationLinks>,
    pub en: Vec<RelationLinks>,
}

/// 百科统计
#[derive(Debug, Clone, Serialize)]
pub struct EncyclopediaStats {
    pub total_entries: usize,
    pub with_image: usize,
    pub with_german: usize,
    pub with_english: usize,
    pub regions: Vec<CountEntry>,
    pub tags_de: Vec<CountEntry>,
    pub tags_en: Vec<CountEntry>,
}

/// 列出条目摘要，可按标签和地区过滤
#[must_use]
pub fn list_entries(encyclopedia: &Encyclopedia, filter: &EntryFilter) -> Vec<EntrySummary> {
    filter_entries(encyclopedia, filter)
        .into_iter()
        .map(EntrySummary::from)
        .collect()
}

/// 按标签和地区过滤完整条目
#[must_use]
pub fn filter_entries<'a>(encyclopedia: &'a Encyclopedia, filter: &EntryFilter) -> Vec<&'a Entry> {
    encyclopedia
        .entries
        .iter()
        .filter(|e| filter.matches(e))
        .collect()
}

/// 按泰语名称、ID、别名或转写查找条目
///
/// 泰语名称和 ID 的精确匹配优先于别名匹配。
pub fn get_entry<'a>(encyclopedia: &'a Encyclopedia, name: &str) -> Result<&'a Entry> {
    let name = name.trim();
    encyclopedia
        .entries
        .iter()
        .find(|e| e.is_named(name))
        .or_else(|| encyclopedia.entries.iter().find(|e| e.is_aliased(name)))
        .ok_or_else(|| Error::not_found("entry", name))
}

/// 在名称、别名以及各语言的转写、摘要、描述、标签、地区中搜索
///
/// 结果保持源顺序，`limit` 截断结果数量。
#[must_use]
pub fn search_entries<'a>(
    encyclopedia: &'a Encyclopedia,
    query: &str,
    limit: Option<usize>,
) -> Vec<&'a Entry> {
    let needle = query.to_lowercase();
    let hits = encyclopedia.entries.iter().filter(|e| {
        contains_lowercase(&e.thai_name, &needle)
            || e.alternative_names.iter().any(|alt| contains_lowercase(alt, &needle))
            || e.sections().any(|s| s.matches(&needle))
    });

    match limit {
        Some(limit) => hits.take(limit).collect(),
        None => hits.collect(),
    }
}

/// 条目的关系链接，只包含非空的关系
pub fn entry_relations(encyclopedia: &Encyclopedia, name: &str) -> Result<EntryRelations> {
    let entry = get_entry(encyclopedia, name)?;
    let collect = |section: Option<&LangSection>| -> Vec<RelationLinks> {
        section
            .map(|s| {
                s.relations()
                    .into_iter()
                    .filter_map(|(relationship, field)| {
                        let links = field?.links();
                        (!links.is_empty()).then_some(RelationLinks { relationship, links })
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    Ok(EntryRelations {
        thai_name: entry.thai_name.clone(),
        de: collect(entry.de.as_ref()),
        en: collect(entry.en.as_ref()),
    })
}

/// 百科统计
///
/// 能对应到固定地区表的地区名按地区键计数，其余按原文计数；
/// 每个条目的每个地区只计一次。
#[must_use]
pub fn stats(encyclopedia: &Encyclopedia) -> EncyclopediaStats {
    let entries = &encyclopedia.entries;

    let regions = entries.iter().flat_map(|e| {
        let mut seen: Vec<String> = Vec::new();
        for raw in e.sections().flat_map(|s| s.regions.iter()) {
            let key = resolve_region(raw).map_or_else(|| raw.clone(), |r| r.key.to_string());
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    });

    EncyclopediaStats {
        total_entries: entries.len(),
        with_image: entries.iter().filter(|e| e.image_url.is_some()).count(),
        with_german: entries.iter().filter(|e| e.de.is_some()).count(),
        with_english: entries.iter().filter(|e| e.en.is_some()).count(),
        regions: count_by(regions),
        tags_de: count_by(
            entries
                .iter()
                .filter_map(|e| e.de.as_ref())
                .flat_map(|s| s.tags.iter().cloned()),
        ),
        tags_en: count_by(
            entries
                .iter()
                .filter_map(|e| e.en.as_ref())
                .flat_map(|s| s.tags.iter().cloned()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcesConfig;
    use serde_json::json;

    fn load(raw: serde_json::Value) -> Encyclopedia {
        let sources = SourcesConfig::for_host("https://site.example");
        Encyclopedia::load(raw, &sources.encyclopedia, &sources.links).unwrap()
    }

    fn curry(name: &str, region: &str) -> serde_json::Value {
        json!({
            "thaiName": name,
            "de": {"transcription": name, "summary": "Ein Curry", "tags": ["Curry"], "regions": [region]}
        })
    }

    #[test]
    fn test_translate_link_is_wrapped() {
        let encyclopedia = load(json!([{
            "thaiName": "แกงเขียวหวาน",
            "de": {"url": "https://site.th/page?trans=TH-DE"}
        }]));

        let url = encyclopedia.entries[0].de.as_ref().unwrap().url.clone().unwrap();
        assert!(url.starts_with("https://translate.google.com/translate?"));
        assert!(url.contains("tl=de"));
        assert!(!url.contains("TH-DE"));
        assert!(url.contains(&*urlencoding::encode("https://site.th/page")));
    }

    #[test]
    fn test_transform_rewrites_relations_and_images() {
        let encyclopedia = load(json!({
            "nam-pla": {
                "thaiName": "น้ำปลา",
                "imageUrl": "/nam-pla.jpg",
                "de": {
                    "recipes": ["/rezepte/som-tam"],
                    "url": "/lexikon/nam-pla",
                    "usedBy": ["/lexikon/som-tam", "/lexikon/larb#zutaten"],
                    "variationOf": "/video/abc123"
                }
            }
        }));

        let entry = &encyclopedia.entries[0];
        assert_eq!(entry.id.as_deref(), Some("nam-pla"));
        assert_eq!(entry.image_url.as_deref(), Some("https://site.example/media/nam-pla.jpg"));

        let de = entry.de.as_ref().unwrap();
        assert_eq!(de.recipes, vec!["https://site.example/rezepte/som-tam"]);
        assert_eq!(de.url.as_deref(), Some("https://site.example/lexikon/nam-pla/"));
        assert_eq!(
            de.used_by,
            Some(LinkField::Many(vec![
                "https://site.example/lexikon/som-tam/".to_string(),
                "https://site.example/lexikon/larb#zutaten".to_string(),
            ]))
        );
        assert_eq!(
            de.variation_of,
            Some(LinkField::One("https://www.youtube.com/watch?v=abc123".to_string()))
        );
    }

    #[test]
    fn test_transform_is_idempotent() {
        let sources = SourcesConfig::for_host("https://site.example");
        let rewriter = LinkRewriter::new(sources.encyclopedia.site_base(), &sources.links);
        let media = sources.encyclopedia.image_base();

        let once = load(json!([{
            "thaiName": "ลาบ",
            "imageUrl": "larb.jpg",
            "en": {"url": "/encyclopedia/larb", "fits": ["/extern/kochbuch/larb"], "recipes": ["/pdf/larb.pdf"]}
        }]));
        let mut twice = once.entries[0].clone();
        transform_entry(&mut twice, &rewriter, media);
        assert_eq!(twice, once.entries[0]);
    }

    #[test]
    fn test_absent_sections_are_tolerated() {
        let encyclopedia = load(json!([{"thaiName": "ข้าว"}]));
        let entry = &encyclopedia.entries[0];
        assert!(entry.de.is_none() && entry.en.is_none());
        assert!(entry_relations(&encyclopedia, "ข้าว").unwrap().de.is_empty());
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let encyclopedia = load(json!([{
            "thaiName": "ข้าว",
            "alternativeNames": null,
            "imageUrl": null,
            "de": {"transcription": "khao", "summary": null, "tags": null, "regions": null,
                   "recipes": null, "uses": null},
            "en": null
        }]));
        let entry = &encyclopedia.entries[0];
        assert!(entry.alternative_names.is_empty());
        assert!(entry.image_url.is_none() && entry.en.is_none());
        let de = entry.de.as_ref().unwrap();
        assert!(de.tags.is_empty() && de.regions.is_empty() && de.recipes.is_empty());
        assert_eq!(de.summary, "");
        assert_eq!(search_entries(&encyclopedia, "khao", None).len(), 1);
    }

    #[test]
    fn test_search_limit_keeps_first_matches() {
        let raw: Vec<serde_json::Value> = ["แกง1", "แกง2", "แกง3", "แกง4", "แกง5"]
            .iter()
            .map(|name| curry(name, "central"))
            .collect();
        let encyclopedia = load(serde_json::Value::Array(raw));

        let limited = search_entries(&encyclopedia, "curry", Some(2));
        let names: Vec<&str> = limited.iter().map(|e| e.thai_name.as_str()).collect();
        assert_eq!(names, vec!["แกง1", "แกง2"]);
        assert_eq!(search_entries(&encyclopedia, "CURRY", None).len(), 5);
    }

    #[test]
    fn test_static_tables() {
        let keys: Vec<&str> = list_regions().iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["central", "north", "isaan", "south"]);
        assert!(list_regions()
            .iter()
            .all(|r| !r.thai.is_empty() && !r.name_de.is_empty() && !r.name_en.is_empty()));

        let relationships: Vec<&str> = list_relationships().iter().map(|r| r.key).collect();
        assert_eq!(
            relationships,
            vec!["usedBy", "uses", "fits", "fittedBy", "variations", "variationOf"]
        );
    }

    #[test]
    fn test_filter_by_region_alias_and_tag() {
        let encyclopedia = load(json!([
            curry("แกงฮังเล", "Nordthailand"),
            curry("ส้มตำ", "Isaan"),
            {"thaiName": "ข้าวซอย", "en": {"tags": ["Noodles"], "regions": ["Northern Thailand"]}}
        ]));

        let north = filter_entries(
            &encyclopedia,
            &EntryFilter {
                region: Some("north".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(north.len(), 2);

        let noodles_north = filter_entries(
            &encyclopedia,
            &EntryFilter {
                tag: Some("noodles".to_string()),
                region: Some("ภาคเหนือ".to_string()),
            },
        );
        assert_eq!(noodles_north.len(), 1);
        assert_eq!(noodles_north[0].thai_name, "ข้าวซอย");

        let unknown = filter_entries(
            &encyclopedia,
            &EntryFilter {
                region: Some("Bangkok".to_string()),
                ..Default::default()
            },
        );
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_get_entry_by_name_alias_and_missing() {
        let encyclopedia = load(json!([{
            "thaiName": "ต้มยำกุ้ง",
            "alternativeNames": ["Tom Yam Gung"],
            "en": {"transcription": "Tom Yum Goong"}
        }]));

        assert!(get_entry(&encyclopedia, "ต้มยำกุ้ง").is_ok());
        assert!(get_entry(&encyclopedia, "tom yam gung").is_ok());
        assert!(get_entry(&encyclopedia, "Tom Yum Goong").is_ok());
        let err = get_entry(&encyclopedia, "ผัดไทย").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "entry", .. }));
    }

    #[test]
    fn test_stats_counts_regions_by_key() {
        let encyclopedia = load(json!([
            curry("a", "Nordthailand"),
            curry("b", "north"),
            curry("c", "Bangkok")
        ]));
        let stats = stats(&encyclopedia);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.regions[0].value, "north");
        assert_eq!(stats.regions[0].count, 2);
        assert_eq!(stats.tags_de[0].count, 3);
        assert_eq!(stats.with_english, 0);
    }

    #[test]
    fn test_rejects_scalar_dataset() {
        let sources = SourcesConfig::for_host("https://site.example");
        assert!(Encyclopedia::load(json!("nope"), &sources.encyclopedia, &sources.links).is_err());
    }
}
