use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use aero_core::config::NotionConfig;
use aero_core::{Error, Result};

use crate::mirror::PageSink;

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Minimal Notion client: enough to replace one page's children with
/// paragraph blocks.
pub struct NotionClient {
    config: NotionConfig,
    http: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn children_url(&self) -> String {
        format!("{}/blocks/{}/children", NOTION_API, self.config.page_id)
    }

    async fn request(&self, request: reqwest::RequestBuilder, what: &str) -> Result<Value> {
        let response = request
            .bearer_auth(&self.config.notion_api_key)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(|e| Error::Notify(format!("{}: {}", what, e)))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Notify(format!("{} returned {}: {}", what, status, body)));
        }
        serde_json::from_str(&body).map_err(|e| Error::Notify(format!("{}: bad JSON: {}", what, e)))
    }

    /// IDs of the page's current child blocks.
    pub async fn list_children(&self) -> Result<Vec<String>> {
        let json = self
            .request(self.http.get(self.children_url()), "list children")
            .await?;
        let ids = json["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|child| child["id"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    pub async fn delete_block(&self, block_id: &str) -> Result<()> {
        let url = format!("{}/blocks/{}", NOTION_API, block_id);
        self.request(self.http.delete(&url), "delete block").await?;
        Ok(())
    }

    pub async fn append_paragraphs(&self, lines: &[String]) -> Result<()> {
        let children: Vec<Value> = lines.iter().map(|line| paragraph_block(line)).collect();
        self.request(
            self.http
                .patch(self.children_url())
                .json(&json!({ "children": children })),
            "append children",
        )
        .await?;
        Ok(())
    }
}

pub fn paragraph_block(line: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": {
            "rich_text": [{"type": "text", "text": {"content": line}}]
        }
    })
}

#[async_trait]
impl PageSink for NotionClient {
    /// Replace the page's content: delete every existing child, then append
    /// one paragraph per line. A failed single delete is logged and skipped;
    /// the append still runs.
    async fn replace(&self, lines: &[String]) -> Result<()> {
        for block_id in self.list_children().await? {
            if let Err(e) = self.delete_block(&block_id).await {
                warn!("could not delete block {}: {}", block_id, e);
            }
        }
        self.append_paragraphs(lines).await?;
        info!("📝 replaced notion page {}", self.config.page_id);
        Ok(())
    }
}
