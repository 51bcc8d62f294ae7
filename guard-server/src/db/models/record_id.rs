//! Serde helpers for SurrealDB RecordId fields
//!
//! 对外 API 一律用 "table:key" 字符串表示记录 id；
//! 反序列化同时兼容 SurrealDB 原生格式和 JSON 字符串格式。

use std::fmt;

use serde::{Deserialize, Deserializer, Serializer, de};
use surrealdb::RecordId;

/// 从字符串 "table:key" 解析为 RecordId；数字 key 保持数字语义
fn parse_record_id(s: &str) -> RecordId {
    let (tb, key) = s.split_once(':').unwrap_or(("", s));
    let key = key.trim_matches(|c| c == '⟨' || c == '⟩');
    match key.parse::<i64>() {
        Ok(n) => RecordId::from_table_key(tb, n),
        Err(_) => RecordId::from_table_key(tb, key),
    }
}

struct RecordIdVisitor;

impl<'de> de::Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a RecordId or a string like 'table:key'")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_record_id(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_record_id(&v))
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        // 委托给 RecordId 的默认反序列化
        RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        RecordId::deserialize(deserializer)
    }
}

/// 反序列化 RecordId，支持字符串格式和 SurrealDB 原生格式
pub fn deserialize<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(RecordIdVisitor)
}

/// 序列化 RecordId 为 "table:key" 字符串
pub fn serialize<S>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_string())
}

/// Option<RecordId> 的序列化/反序列化
pub mod option {
    use super::*;

    struct OptionRecordIdVisitor;

    impl<'de> de::Visitor<'de> for OptionRecordIdVisitor {
        type Value = Option<RecordId>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("null, a RecordId, or a string like 'table:key'")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(RecordIdVisitor).map(Some)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionRecordIdVisitor)
    }

    pub fn serialize<S>(id: &Option<RecordId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Row {
        #[serde(with = "super::option")]
        id: Option<RecordId>,
    }

    #[test]
    fn ids_serialize_to_table_key_strings() {
        let row = Row {
            id: Some(RecordId::from_table_key("zone", 7)),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "zone:7");

        let row = Row { id: None };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json["id"].is_null());
    }

    #[test]
    fn ids_round_trip_from_strings() {
        let row: Row = serde_json::from_str(r#"{"id":"zone:7"}"#).unwrap();
        assert_eq!(row.id.map(|id| id.to_string()), Some("zone:7".to_string()));

        let row: Row = serde_json::from_str(r#"{"id":null}"#).unwrap();
        assert!(row.id.is_none());
    }

    #[test]
    fn string_keys_parse_with_and_without_brackets() {
        assert_eq!(
            parse_record_id("location_approval:abc123").to_string(),
            "location_approval:abc123"
        );
        assert_eq!(parse_record_id("zone:⟨9⟩").to_string(), "zone:9");
    }
}
