// ABOUTME: Post structure extraction for the feed-slides application
// ABOUTME: Builds the structuring request and parses the JSON carousel outline it returns

use crate::errors::{FeedError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed instruction sent ahead of the user's source text.
pub const STRUCTURE_PREAMBLE: &str = r#"あなたはInstagramカルーセル投稿の構成を考えるプロのSNSマーケターです。
ユーザーから与えられた文章（ブログ記事、動画の文字起こし、メモなど）を分析し、
Instagram投稿用の10枚カルーセル構成を作成してください。

以下のJSON形式で**必ず**出力してください（JSONのみ、他のテキストは不要）:

{
  "coverTitle": "表紙タイトル（改行は\\nで表現。2〜3行、インパクトのある短いフレーズ）",
  "coverSubtitle": "サブタイトル（短いキャッチコピー、8文字以内）",
  "introText": "導入文（読者の悩みや共感を引き出す文章。3〜4行、改行は\\nで表現）",
  "mainSlides": [
    {
      "title": "ページタイトル（簡潔に）",
      "imageDesc": "このスライドにふさわしい画像の説明（英語で、AI画像生成プロンプト用）",
      "text": "説明テキスト（3〜4行、改行は\\nで表現）"
    }
  ],
  "summaryItems": ["まとめ項目1", "まとめ項目2", "まとめ項目3", "まとめ項目4", "まとめ項目5"]
}

ルール:
- mainSlidesは3〜7個（内容量に応じて調整。合計10枚=表紙1+導入1+メイン+まとめ1になるように）
- タイトルは日本語で、短く印象的に
- imageDescは英語で、具体的なビジュアルを描写（AI画像生成で使うため）
- summaryItemsは3〜6個
- 全テキストは日本語
- Instagramで保存・シェアされやすい、価値ある情報に整理する
- 元の文章の核心を捉え、読みやすく構造化する"#;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MainSlideDraft {
    pub title: String,
    pub image_desc: String,
    pub text: String,
}

/// Carousel outline produced by the structuring service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStructure {
    pub cover_title: String,
    #[serde(default)]
    pub cover_subtitle: String,
    #[serde(default)]
    pub intro_text: String,
    pub main_slides: Vec<MainSlideDraft>,
    /// `None` when the reply leaves the field out. An empty list is kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_items: Option<Vec<String>>,
}

/// Full text sent to the structuring service.
pub fn structure_request_text(source_text: &str) -> String {
    format!(
        "{}\n\n---\n\n以下の文章を分析して、Instagram投稿構成を作成してください:\n\n{}",
        STRUCTURE_PREAMBLE, source_text
    )
}

/// Parse the structuring service's reply.
///
/// The reply may wrap the object in prose or markdown fences; in that case the
/// first balanced `{...}` block is used.
pub fn parse_structure(text: &str) -> Result<PostStructure> {
    let value = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ Value::Object(_)) => value,
        _ => {
            let block = first_json_object(text).ok_or_else(|| {
                FeedError::StructureParseFailed("No JSON object found in response".to_string())
            })?;
            debug!("Extracted JSON block of {} bytes from response", block.len());
            serde_json::from_str::<Value>(block).map_err(|e| {
                FeedError::StructureParseFailed(format!("Invalid JSON in response: {}", e))
            })?
        }
    };
    validate(&value)?;
    serde_json::from_value(value)
        .map_err(|e| FeedError::StructureParseFailed(format!("Unexpected field type: {}", e)))
}

fn validate(value: &Value) -> Result<()> {
    let fail = |msg: &str| Err(FeedError::StructureParseFailed(msg.to_string()));
    let Some(object) = value.as_object() else {
        return fail("Response is not a JSON object");
    };
    match object.get("coverTitle") {
        Some(Value::String(title)) if !title.is_empty() => {}
        _ => return fail("coverTitle is missing"),
    }
    if !matches!(object.get("mainSlides"), Some(Value::Array(_))) {
        return fail("mainSlides must be an array");
    }
    if let Some(items) = object.get("summaryItems") {
        if !items.is_array() {
            return fail("summaryItems must be an array");
        }
    }
    Ok(())
}

/// Locate the first balanced `{...}` block, ignoring braces inside strings.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
