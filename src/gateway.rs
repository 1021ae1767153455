use std::fmt;

use base64::Engine;

use crate::analysis::{AnalysisResult, Modality};
use crate::config::{mask_key, Config};
use crate::error::AnalysisError;
use crate::gemini::{Content, GeminiClient, GenerateContentRequest, GenerationConfig, InlineData, Part};
use crate::prompt::{build_prompt, response_schema};
use crate::upload::UploadFile;

/// Everything sent for one recording. Built once and reused verbatim for
/// the fallback attempt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub modality: Modality,
    pub body: GenerateContentRequest,
}

impl AnalysisRequest {
    pub fn for_upload(upload: &UploadFile) -> Self {
        let modality = upload.modality;
        let data = base64::engine::general_purpose::STANDARD.encode(&upload.bytes);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: upload.mime_type.clone(),
                            data,
                        },
                    },
                    Part::Text {
                        text: build_prompt(modality),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: response_schema(modality),
            },
        };

        Self { modality, body }
    }
}

/// Sends a recording to Gemini, retrying once on the fallback model when the
/// primary model can't take the input modality.
#[derive(Clone)]
pub struct AnalysisGateway {
    client: GeminiClient,
    api_key: String,
    primary_model: String,
    fallback_model: String,
}

impl fmt::Debug for AnalysisGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisGateway")
            .field("client", &self.client)
            .field("api_key", &mask_key(&self.api_key))
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .finish()
    }
}

impl AnalysisGateway {
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: GeminiClient::new(&config.api_base, config.request_timeout())?,
            api_key: config.gemini_api_key.trim().to_string(),
            primary_model: config.primary_model.clone(),
            fallback_model: config.fallback_model.clone(),
        })
    }

    pub async fn analyze(&self, upload: &UploadFile) -> Result<AnalysisResult, AnalysisError> {
        if self.api_key.is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }

        let request = AnalysisRequest::for_upload(upload);

        match self.attempt(&self.primary_model, &request).await {
            Ok(result) => Ok(result),
            Err(primary) if primary.is_capability_error() => {
                log::warn!(
                    "Model {} does not support the input. Retrying with fallback model {}.",
                    self.primary_model,
                    self.fallback_model
                );
                self.attempt(&self.fallback_model, &request)
                    .await
                    .map_err(|fallback| {
                        log::error!("Fallback model also failed: {fallback}");
                        AnalysisError::FallbackExhausted {
                            primary: Box::new(primary),
                            fallback: Box::new(fallback),
                        }
                    })
            }
            Err(e) => {
                log::error!("Error during analysis: {e}");
                Err(e)
            }
        }
    }

    async fn attempt(
        &self,
        model: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let text = self.client.generate(&self.api_key, model, &request.body).await?;
        let result: AnalysisResult = serde_json::from_str(text.trim())?;
        result.checked(request.modality)
    }
}
