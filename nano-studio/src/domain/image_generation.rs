//! Text-to-image and image-edit calls against the [`ImageGenerator`] port.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::{Error, ErrorMessage};
use super::inline_image::InlineImage;
use super::ports::{GenerationRequest, ImageGenerator, ImageGeneratorError, RequestPart};

/// Aspect ratio requested for text-to-image calls.
pub const TEXT_TO_IMAGE_ASPECT_RATIO: &str = "1:1";

/// Default model for both call kinds.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Model identifiers used for each call kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationModels {
    /// Model for prompt-only generation.
    pub generation: String,
    /// Model for editing a supplied image.
    pub edit: String,
}

impl Default for GenerationModels {
    fn default() -> Self {
        Self {
            generation: DEFAULT_IMAGE_MODEL.to_owned(),
            edit: DEFAULT_IMAGE_MODEL.to_owned(),
        }
    }
}

/// Builds requests and interprets responses; transport lives in the adapter.
#[derive(Debug)]
pub struct ImageGenerationService<G> {
    generator: Arc<G>,
    models: GenerationModels,
}

impl<G: ImageGenerator> ImageGenerationService<G> {
    /// Create a service over `generator`.
    #[must_use]
    pub const fn new(generator: Arc<G>, models: GenerationModels) -> Self {
        Self { generator, models }
    }

    /// Configured models.
    #[must_use]
    pub const fn models(&self) -> &GenerationModels {
        &self.models
    }

    /// Generate a square image from `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<InlineImage, Error> {
        let request = GenerationRequest {
            model: self.models.generation.clone(),
            parts: vec![RequestPart::Text(prompt.to_owned())],
            aspect_ratio: Some(TEXT_TO_IMAGE_ASPECT_RATIO.to_owned()),
        };
        self.call(request, ErrorMessage::NoImageData).await
    }

    /// Edit `source` according to `prompt`.
    ///
    /// The image part is sent ahead of the text part.
    pub async fn edit(&self, source: &InlineImage, prompt: &str) -> Result<InlineImage, Error> {
        let request = GenerationRequest {
            model: self.models.edit.clone(),
            parts: vec![
                RequestPart::InlineImage(source.clone()),
                RequestPart::Text(prompt.to_owned()),
            ],
            aspect_ratio: None,
        };
        self.call(request, ErrorMessage::EditFailed).await
    }

    async fn call(
        &self,
        request: GenerationRequest,
        missing: ErrorMessage,
    ) -> Result<InlineImage, Error> {
        let model = request.model.clone();
        info!(%model, parts = request.parts.len(), "requesting image");
        let response = self
            .generator
            .generate_content(request)
            .await
            .map_err(|err| map_generator_error(&model, &err))?;
        response.first_inline_image().cloned().ok_or_else(|| {
            warn!(%model, candidates = response.candidates.len(), "response had no image data");
            Error::generation(missing)
        })
    }
}

fn map_generator_error(model: &str, err: &ImageGeneratorError) -> Error {
    warn!(model, kind = err.kind(), error = %err, "image request failed");
    Error::transport(err.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        Candidate, GenerationResponse, MockImageGenerator, ResponsePart,
    };
    use rstest::rstest;

    fn image(data: &str) -> InlineImage {
        InlineImage::from_base64("image/png", data).expect("valid mime")
    }

    fn answer(parts: Vec<ResponsePart>) -> GenerationResponse {
        GenerationResponse {
            candidates: vec![Candidate { parts }],
        }
    }

    fn service(generator: MockImageGenerator) -> ImageGenerationService<MockImageGenerator> {
        ImageGenerationService::new(Arc::new(generator), GenerationModels::default())
    }

    #[rstest]
    #[tokio::test]
    async fn generate_requests_square_image_from_text() {
        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate_content()
            .withf(|request| {
                request.model == DEFAULT_IMAGE_MODEL
                    && request.aspect_ratio.as_deref() == Some("1:1")
                    && request.parts == [RequestPart::Text("a banana".to_owned())]
            })
            .times(1)
            .returning(|_| Ok(answer(vec![ResponsePart::InlineImage(image("YmFuYW5h"))])));

        let result = service(generator).generate("a banana").await.expect("image");
        assert_eq!(result.to_data_uri(), "data:image/png;base64,YmFuYW5h");
    }

    #[rstest]
    #[tokio::test]
    async fn edit_sends_image_before_text() {
        let source = image("c291cmNl");
        let expected = source.clone();
        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate_content()
            .withf(move |request| {
                request.aspect_ratio.is_none()
                    && request.parts
                        == [
                            RequestPart::InlineImage(expected.clone()),
                            RequestPart::Text("make it blue".to_owned()),
                        ]
            })
            .returning(|_| Ok(answer(vec![ResponsePart::InlineImage(image("Ymx1ZQ=="))])));

        let result = service(generator)
            .edit(&source, "make it blue")
            .await
            .expect("edited image");
        assert_eq!(result.data(), "Ymx1ZQ==");
    }

    #[rstest]
    #[case(false, ErrorMessage::NoImageData)]
    #[case(true, ErrorMessage::EditFailed)]
    #[tokio::test]
    async fn text_only_answer_is_generation_error(
        #[case] editing: bool,
        #[case] expected: ErrorMessage,
    ) {
        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate_content()
            .returning(|_| Ok(answer(vec![ResponsePart::Text("sorry".to_owned())])));
        let service = service(generator);

        let err = if editing {
            service.edit(&image("AA=="), "prompt").await
        } else {
            service.generate("prompt").await
        }
        .expect_err("no image");
        assert_eq!(err.code(), ErrorCode::GenerationError);
        assert_eq!(err.message(), &expected);
    }

    #[rstest]
    #[tokio::test]
    async fn port_failures_surface_as_transport_with_original_text() {
        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate_content()
            .returning(|_| Err(ImageGeneratorError::rate_limited("quota exhausted")));

        let err = service(generator).generate("prompt").await.expect_err("fails");
        assert_eq!(err.code(), ErrorCode::Transport);
        assert_eq!(
            err.to_string(),
            "image service rate limited the request: quota exhausted"
        );
    }
}
