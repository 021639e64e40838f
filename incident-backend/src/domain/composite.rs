// src/domain/composite.rs

//! JSONテキスト列に格納される複合データ
//!
//! 配列の各要素はクライアントが送った値のまま保存し、読み出しでもそのまま返す。
//! 担当割り当て行を作るときだけ `ActionItem` ビューで既知のキーを読む。

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// JSON列の配列（要素は加工しない）
pub type JsonArray = Vec<Value>;

/// 是正措置1項目のビュー（担当割り当て1行に展開される）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionItem {
    pub action: Option<String>,
    pub status: Option<String>,
    pub responsibility: Option<String>,
    pub doc_ref: Option<String>,
    pub target_date: Option<String>,
    pub responsible_id: Option<String>,
    pub attachments_assign: Option<Value>,
}

impl ActionItem {
    /// 文字列・数値・真偽値は文字列として読み、null や構造値は未指定扱い
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            action: scalar_text(object, "action"),
            status: scalar_text(object, "status"),
            responsibility: scalar_text(object, "responsibility"),
            doc_ref: scalar_text(object, "docRef"),
            target_date: scalar_text(object, "targetDate"),
            responsible_id: scalar_text(object, "responsibleId"),
            attachments_assign: object
                .get("attachmentsAssign")
                .filter(|v| !v.is_null())
                .cloned(),
        }
    }
}

fn scalar_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 文字列または数値を文字列としてデシリアライズ
pub fn deserialize_optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

/// 文字列または数値から i32 をデシリアライズ
pub fn deserialize_optional_i32_from_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(StringOrNumber::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
