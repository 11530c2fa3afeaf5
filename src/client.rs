// ABOUTME: Generation client for the feed-slides application
// ABOUTME: Talks to the external image-generation and text-structuring services

use crate::config::Config;
use crate::errors::{FeedError, Result};
use crate::images::ImageData;
use crate::references::Reference;
use crate::structure::{self, PostStructure};
use log::{debug, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Aspect ratio of every generated slide.
pub const ASPECT_RATIO: &str = "4:5";

/// Boundary to the external generation services.
pub trait GenerationClient {
    /// Fails with [`FeedError::MissingCredential`] when calls cannot be made.
    fn ensure_credential(&self) -> Result<()> {
        Ok(())
    }

    /// Text-only generation.
    fn generate_image(&self, prompt: &str) -> Result<ImageData>;

    /// Generation anchored on a single reference image.
    fn generate_image_with_reference(&self, prompt: &str, reference: &ImageData)
        -> Result<ImageData>;

    /// Generation with two or more reference images, submitted in order.
    fn generate_image_with_references(
        &self,
        prompt: &str,
        references: &[&ImageData],
    ) -> Result<ImageData>;

    /// Turn free source text into a carousel outline.
    fn generate_structure(&self, source_text: &str) -> Result<PostStructure>;
}

/// Pick the entry point matching the number of references.
pub fn dispatch<C: GenerationClient + ?Sized>(
    client: &C,
    prompt: &str,
    references: &[Reference<'_>],
) -> Result<ImageData> {
    match references {
        [] => client.generate_image(prompt),
        [single] => client.generate_image_with_reference(prompt, single.image),
        many => {
            let images: Vec<&ImageData> = many.iter().map(|r| r.image).collect();
            client.generate_image_with_references(prompt, &images)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    /// The first inline image part; its absence is a generation failure.
    fn into_image(self) -> Result<ImageData> {
        let inline = self
            .parts()
            .find_map(|part| part.inline_data.as_ref())
            .ok_or_else(|| {
                FeedError::GenerationFailed(
                    "No image was returned. Try adjusting the prompt.".to_string(),
                )
            })?;
        ImageData::from_base64(&inline.mime_type, &inline.data)
    }

    fn into_text(self) -> Result<String> {
        self.parts()
            .find_map(|part| part.text.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                FeedError::StructureParseFailed("The structuring service returned no text".to_string())
            })
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    image_model: String,
    text_model: String,
}

impl GeminiClient {
    pub fn new(config: &Config, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FeedError::FetchError)?;
        Ok(Self {
            http,
            base_url: config.api_base_url()?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            image_model: config.image_model.clone(),
            text_model: config.text_model.clone(),
        })
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(FeedError::MissingCredential)
    }

    fn endpoint(&self, model: &str) -> Result<Url> {
        self.base_url
            .join(&format!("models/{}:generateContent", model))
            .map_err(|e| FeedError::ConfigError(format!("Invalid model endpoint: {}", e)))
    }

    fn post(&self, model: &str, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let key = self.key()?;
        let url = self.endpoint(model)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", key)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(FeedError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }

    fn image_request(prompt: &str, references: &[&ImageData]) -> GenerateContentRequest {
        let mut parts = vec![RequestPart {
            text: Some(prompt.to_string()),
            inline_data: None,
        }];
        parts.extend(references.iter().map(|image| RequestPart {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.to_base64(),
            }),
        }));
        GenerateContentRequest {
            contents: vec![RequestContent { parts }],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["IMAGE"]),
                image_config: Some(ImageConfig {
                    aspect_ratio: ASPECT_RATIO,
                }),
                ..GenerationConfig::default()
            },
        }
    }

    fn generate(&self, prompt: &str, references: &[&ImageData]) -> Result<ImageData> {
        info!(
            "Requesting image from {} with {} reference(s)",
            self.image_model,
            references.len()
        );
        let request = Self::image_request(prompt, references);
        self.post(&self.image_model, &request)?.into_image()
    }
}

impl GenerationClient for GeminiClient {
    fn ensure_credential(&self) -> Result<()> {
        self.key().map(|_| ())
    }

    fn generate_image(&self, prompt: &str) -> Result<ImageData> {
        self.generate(prompt, &[])
    }

    fn generate_image_with_reference(
        &self,
        prompt: &str,
        reference: &ImageData,
    ) -> Result<ImageData> {
        self.generate(prompt, &[reference])
    }

    fn generate_image_with_references(
        &self,
        prompt: &str,
        references: &[&ImageData],
    ) -> Result<ImageData> {
        self.generate(prompt, references)
    }

    fn generate_structure(&self, source_text: &str) -> Result<PostStructure> {
        if source_text.trim().is_empty() {
            return Err(FeedError::ValidationError(
                "Source text is empty".to_string(),
            ));
        }
        self.key()?;

        info!("Requesting post structure from {}", self.text_model);
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: Some(structure::structure_request_text(source_text)),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json"),
                ..GenerationConfig::default()
            },
        };
        let text = self.post(&self.text_model, &request)?.into_text()?;
        structure::parse_structure(&text)
    }
}
