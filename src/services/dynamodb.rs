use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::HighlightRecord;

use super::ItemTable;

pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    pub fn new(sdk_config: &aws_config::SdkConfig, table_name: String) -> Self {
        Self {
            client: Client::new(sdk_config),
            table_name,
        }
    }
}

#[async_trait]
impl ItemTable for DynamoTable {
    async fn put_item(&self, key: &str, item: &HighlightRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(item)))
            .send()
            .await
            .map_err(|e| {
                AppError::Table(format!(
                    "PutItem {} into {} failed: {}",
                    key,
                    self.table_name,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

pub(crate) fn to_item(record: &HighlightRecord) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute(v)))
        .collect()
}

fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}
