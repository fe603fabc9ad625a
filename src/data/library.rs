//! 食谱库
//!
//! 数据形如 `{食谱书: {食谱键: 食谱}}`。转换阶段把 `url_de`、`url_en`、`imageUrl`
//! 改写成绝对地址，已经以 `http` 开头的值保持不变，因此转换可以重复执行。
#![allow(missing_docs)]

use super::{count_by, ordered_entries, CountEntry};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::utils::string::{contains_lowercase, display_name, eq_ignore_case};
use serde::{Deserialize, Serialize};

/// 食谱
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Recipe {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title_de: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title_en: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub transcript_de: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub thai: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_en: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 食谱书
#[derive(Debug, Clone)]
pub struct Cookbook {
    pub name: String,
    pub recipes: Vec<(String, Recipe)>,
}

/// 食谱库数据集
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub cookbooks: Vec<Cookbook>,
}

/// 带定位信息的食谱
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub key: String,
    pub cookbook: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}

/// 食谱书摘要
#[derive(Debug, Clone, Serialize)]
pub struct CookbookSummary {
    pub name: String,
    pub display_name: String,
    pub recipe_count: usize,
}

/// 食谱书详情
#[derive(Debug, Clone, Serialize)]
pub struct CookbookView {
    pub name: String,
    pub display_name: String,
    pub recipes: Vec<RecipeRecord>,
}

/// 食谱过滤条件
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipeFilter {
    /// 地区（不区分大小写）
    pub region: Option<String>,
    /// 食谱书名称（不区分大小写）
    pub cookbook: Option<String>,
}

/// 食谱库统计
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    pub total_cookbooks: usize,
    pub total_recipes: usize,
    pub recipes_per_cookbook: Vec<CountEntry>,
    pub regions: Vec<CountEntry>,
}

/// 食谱链接基址
#[derive(Debug, Clone, Copy)]
pub struct RecipeUrlBases<'a> {
    pub de: &'a str,
    pub en: &'a str,
    pub image: &'a str,
}

impl<'a> RecipeUrlBases<'a> {
    #[must_use]
    pub fn from_config(config: &'a SourceConfig) -> Self {
        Self {
            de: config.site_base(),
            en: config.site_base_en(),
            image: config.image_base(),
        }
    }
}

impl Library {
    /// 解析并转换食谱库数据
    pub fn load(raw: serde_json::Value, config: &SourceConfig) -> Result<Self> {
        let bases = RecipeUrlBases::from_config(config);
        let cookbooks = ordered_entries::<serde_json::Value>(raw, "食谱库")?
            .into_iter()
            .map(|(name, recipes)| {
                let mut recipes: Vec<(String, Recipe)> =
                    ordered_entries(recipes, &format!("食谱书 {name}"))?;
                for (_, recipe) in &mut recipes {
                    transform_recipe(recipe, &bases);
                }
                Ok(Cookbook { name, recipes })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { cookbooks })
    }

    fn cookbook_names(&self) -> Vec<String> {
        self.cookbooks.iter().map(|c| c.name.clone()).collect()
    }

    fn find_cookbook(&self, name: &str) -> Result<&Cookbook> {
        self.cookbooks
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::NotFound {
                kind: "cookbook",
                key: name.to_string(),
                available: self.cookbook_names(),
            })
    }

    fn records(&self) -> impl Iterator<Item = (&Cookbook, &String, &Recipe)> {
        self.cookbooks
            .iter()
            .flat_map(|c| c.recipes.iter().map(move |(key, recipe)| (c, key, recipe)))
    }
}

fn record(cookbook: &Cookbook, key: &str, recipe: &Recipe) -> RecipeRecord {
    RecipeRecord {
        key: key.to_string(),
        cookbook: cookbook.name.clone(),
        recipe: recipe.clone(),
    }
}

/// 把页面链接拼成绝对地址，相对值不以 `/` 开头时补一个分隔符；空值保持不变
fn absolute_page_url(base: &str, value: &str) -> String {
    if value.is_empty() || value.starts_with("http") {
        value.to_string()
    } else if value.starts_with('/') {
        format!("{base}{value}")
    } else {
        format!("{base}/{value}")
    }
}

/// 把图片路径拼成绝对地址，去掉相对值开头的一个 `/`；空值保持不变
fn absolute_image_url(base: &str, value: &str) -> String {
    if value.is_empty() || value.starts_with("http") {
        value.to_string()
    } else {
        let relative = value.strip_prefix('/').unwrap_or(value);
        format!("{base}{relative}")
    }
}

/// 改写单个食谱的链接
pub fn transform_recipe(recipe: &mut Recipe, bases: &RecipeUrlBases<'_>) {
    if let Some(url) = recipe.url_de.as_mut() {
        *url = absolute_page_url(bases.de, url);
    }
    if let Some(url) = recipe.url_en.as_mut() {
        *url = absolute_page_url(bases.en, url);
    }
    if let Some(url) = recipe.image_url.as_mut() {
        *url = absolute_image_url(bases.image, url);
    }
}

/// 列出全部食谱书
#[must_use]
pub fn list_cookbooks(library: &Library) -> Vec<CookbookSummary> {
    library
        .cookbooks
        .iter()
        .map(|c| CookbookSummary {
            name: c.name.clone(),
            display_name: display_name(&c.name),
            recipe_count: c.recipes.len(),
        })
        .collect()
}

/// 获取一本食谱书的全部食谱
pub fn get_cookbook(library: &Library, name: &str) -> Result<CookbookView> {
    let cookbook = library.find_cookbook(name)?;
    Ok(CookbookView {
        name: cookbook.name.clone(),
        display_name: display_name(&cookbook.name),
        recipes: cookbook
            .recipes
            .iter()
            .map(|(key, recipe)| record(cookbook, key, recipe))
            .collect(),
    })
}

/// 按键查找食谱；未指定食谱书时在整个库中查找，首个匹配胜出
pub fn get_recipe(library: &Library, cookbook: Option<&str>, key: &str) -> Result<RecipeRecord> {
    let found = match cookbook {
        Some(name) => {
            let cookbook = library.find_cookbook(name)?;
            cookbook
                .recipes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(k, recipe)| record(cookbook, k, recipe))
        }
        None => library
            .records()
            .find(|(_, k, _)| *k == key)
            .map(|(c, k, recipe)| record(c, k, recipe)),
    };

    found.ok_or_else(|| Error::not_found("recipe", key))
}

/// 在德英标题、德语转写和泰语名称中搜索
#[must_use]
pub fn search_recipes(library: &Library, query: &str) -> Vec<RecipeRecord> {
    let needle = query.to_lowercase();
    library
        .records()
        .filter(|(_, _, r)| {
            [&r.title_de, &r.title_en, &r.transcript_de, &r.thai]
                .iter()
                .any(|field| contains_lowercase(field, &needle))
        })
        .map(|(c, k, r)| record(c, k, r))
        .collect()
}

/// 按地区和食谱书过滤
#[must_use]
pub fn filter_recipes(library: &Library, filter: &RecipeFilter) -> Vec<RecipeRecord> {
    library
        .records()
        .filter(|(c, _, r)| {
            filter
                .cookbook
                .as_deref()
                .is_none_or(|name| eq_ignore_case(&c.name, name))
                && filter
                    .region
                    .as_deref()
                    .is_none_or(|region| eq_ignore_case(&r.region, region))
        })
        .map(|(c, k, r)| record(c, k, r))
        .collect()
}

/// 食谱库统计
#[must_use]
pub fn stats(library: &Library) -> LibraryStats {
    let per_cookbook = library
        .cookbooks
        .iter()
        .flat_map(|c| std::iter::repeat_n(c.name.clone(), c.recipes.len()));
    let regions = library
        .records()
        .map(|(_, _, r)| r.region.trim())
        .filter(|region| !region.is_empty())
        .map(str::to_string);

    LibraryStats {
        total_cookbooks: library.cookbooks.len(),
        total_recipes: library.cookbooks.iter().map(|c| c.recipes.len()).sum(),
        recipes_per_cookbook: count_by(per_cookbook),
        regions: count_by(regions),
    }
}
