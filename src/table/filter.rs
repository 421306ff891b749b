use crate::models::SalesRecord;
use serde::{Deserialize, Serialize};

/// 销售表预筛选 (子串匹配, 忽略大小写); 空白条件视为未设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub article_id: Option<String>,
    pub article_name: Option<String>,
}

impl SalesFilter {
    pub fn new(article_id: Option<String>, article_name: Option<String>) -> Self {
        Self {
            article_id: normalize(article_id),
            article_name: normalize(article_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.article_id.is_none() && self.article_name.is_none()
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(needle) = &self.article_id {
            if !record.article_id.to_string().to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.article_name {
            // 无名称的行不匹配名称条件
            let Some(name) = &record.article_name else {
                return false;
            };
            if !name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<SalesRecord>) -> Vec<SalesRecord> {
        if self.is_empty() {
            return records;
        }
        let before = records.len();
        let kept: Vec<SalesRecord> = records.into_iter().filter(|r| self.matches(r)).collect();
        tracing::info!("Sales filter {:?}: kept {}/{} rows", self, kept.len(), before);
        kept
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
