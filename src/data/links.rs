//! 百科链接分类与改写
//!
//! 按优先级依次判断：
//! 1. 带 `trans=TH-DE` / `trans=TH-EN` 标记的绝对地址，去掉标记后包进 Google 翻译代理；
//! 2. 其他绝对地址保持不变；
//! 3. 外部托管内容前缀改写到外部主机；
//! 4. PDF 前缀改写到主站 PDF 路径；
//! 5. 视频前缀改写成视频观看地址；
//! 6. 其余按站点基址拼接。

use crate::config::LinkRules;

const TRANSLATE_MARKER_KEY: &str = "trans";

/// 链接改写器
#[derive(Debug, Clone, Copy)]
pub struct LinkRewriter<'a> {
    site_base: &'a str,
    rules: &'a LinkRules,
}

impl<'a> LinkRewriter<'a> {
    /// 创建链接改写器
    #[must_use]
    pub fn new(site_base: &'a str, rules: &'a LinkRules) -> Self {
        Self { site_base, rules }
    }

    /// 按分类规则改写链接
    #[must_use]
    pub fn classify(&self, link: &str) -> String {
        if is_absolute(link) {
            return match self.translate_target(link) {
                Some((target_lang, cleaned)) => format!(
                    "{}?sl=th&tl={target_lang}&u={}",
                    self.rules.translate_proxy_url,
                    urlencoding::encode(&cleaned)
                ),
                None => link.to_string(),
            };
        }

        if let Some(rest) = link.strip_prefix(self.rules.external_prefix.as_str()) {
            return join(&self.rules.external_base_url, rest);
        }
        if let Some(rest) = link.strip_prefix(self.rules.pdf_prefix.as_str()) {
            return join(&self.rules.pdf_base_url, rest);
        }
        if let Some(video_id) = link.strip_prefix(self.rules.video_prefix.as_str()) {
            return format!(
                "{}{}",
                self.rules.video_watch_url,
                video_id.trim_end_matches('/')
            );
        }

        join(self.site_base, link)
    }

    /// 改写链接并补齐末尾斜杠
    #[must_use]
    pub fn classify_with_slash(&self, link: &str) -> String {
        ensure_trailing_slash(self.classify(link))
    }

    /// 若链接带翻译标记，返回目标语言和去掉标记后的地址
    ///
    /// 只删除标记所在的查询段，其余查询段保持原始编码。
    fn translate_target(&self, link: &str) -> Option<(&'static str, String)> {
        let mut parsed = url::Url::parse(link).ok()?;
        let query = parsed.query()?.to_string();

        let mut target_lang = None;
        let kept: Vec<&str> = query
            .split('&')
            .filter(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((*segment, ""));
                if key != TRANSLATE_MARKER_KEY {
                    return true;
                }
                match value.to_ascii_uppercase().as_str() {
                    "TH-DE" => target_lang = Some("de"),
                    "TH-EN" => target_lang = Some("en"),
                    _ => return true,
                }
                false
            })
            .collect();

        let target_lang = target_lang?;
        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.set_query(Some(&kept.join("&")));
        }
        Some((target_lang, parsed.to_string()))
    }
}

pub(crate) fn is_absolute(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// 拼接基址与相对路径，保证两者之间恰好一个 `/`
pub(crate) fn join(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// 末尾补 `/`，带 `#` 或 `?` 的地址除外
#[must_use]
pub fn ensure_trailing_slash(link: String) -> String {
    if link.contains('#') || link.contains('?') || link.ends_with('/') {
        link
    } else {
        format!("{link}/")
    }
}
