use serde::{Deserialize, Serialize};

/// 无法确定文章名时使用的占位名
pub const UNKNOWN_ARTICLE_NAME: &str = "Unbekannt";

/// 文章名无法解析时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownNamePolicy {
    /// 跳过该文章, 不输出结果行
    #[default]
    Skip,
    /// 输出结果行, 名称记为 "Unbekannt"
    LabelUnknown,
}

impl std::str::FromStr for UnknownNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "label_unknown" | "label" => Ok(Self::LabelUnknown),
            other => Err(format!("unknown name policy '{}'", other)),
        }
    }
}
