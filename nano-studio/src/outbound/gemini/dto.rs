//! Wire DTOs for `models/{model}:generateContent`.
//!
//! Requests are built from domain parts and responses decoded into these
//! shapes before mapping back in one pass. Unknown response fields are
//! ignored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::InlineImage;
use crate::domain::ports::{
    Candidate, GenerationRequest, GenerationResponse, RequestPart, ResponsePart,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequestDto {
    contents: Vec<ContentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfigDto>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub(super) struct ContentDto {
    #[serde(default)]
    parts: Vec<PartDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PartDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineDataDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineDataDto {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfigDto {
    image_config: ImageConfigDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ImageConfigDto {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponseDto {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateDto {
    #[serde(default)]
    content: ContentDto,
}

impl From<&GenerationRequest> for GenerateContentRequestDto {
    fn from(request: &GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => PartDto {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                RequestPart::InlineImage(image) => PartDto {
                    text: None,
                    inline_data: Some(InlineDataDto {
                        mime_type: image.mime_type().to_owned(),
                        data: image.data().to_owned(),
                    }),
                },
            })
            .collect();
        Self {
            contents: vec![ContentDto { parts }],
            generation_config: request.aspect_ratio.as_ref().map(|ratio| GenerationConfigDto {
                image_config: ImageConfigDto {
                    aspect_ratio: ratio.clone(),
                },
            }),
        }
    }
}

impl GenerateContentResponseDto {
    pub(super) fn into_domain(self) -> GenerationResponse {
        let candidates = self
            .candidates
            .into_iter()
            .map(|candidate| Candidate {
                parts: candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(PartDto::into_domain)
                    .collect(),
            })
            .collect();
        GenerationResponse { candidates }
    }
}

impl PartDto {
    /// Parts carrying neither text nor usable image data are dropped.
    fn into_domain(self) -> Option<ResponsePart> {
        if let Some(inline) = self.inline_data {
            match InlineImage::from_base64(inline.mime_type, inline.data) {
                Ok(image) => return Some(ResponsePart::InlineImage(image)),
                Err(_) => debug!("skipping inline data part without a MIME type"),
            }
        }
        self.text.map(ResponsePart::Text)
    }
}

#[cfg(test)]
mod tests {
    //! Response decoding edge cases.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn decode(body: &serde_json::Value) -> GenerationResponse {
        serde_json::from_value::<GenerateContentResponseDto>(body.clone())
            .expect("valid response shape")
            .into_domain()
    }

    #[rstest]
    fn part_without_mime_type_is_skipped() {
        let response = decode(&json!({
            "candidates": [
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "", "data": "AAAA" } },
                    { "inlineData": { "mimeType": "image/png", "data": "YmFuYW5h" } }
                ] } },
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "", "data": "AAAA" } }
                ] } }
            ]
        }));

        let image = response.first_inline_image().expect("valid part survives");
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(response.candidates.get(1).map(|c| c.parts.len()), Some(0));
    }

    #[rstest]
    fn empty_parts_are_dropped() {
        let response = decode(&json!({
            "candidates": [{ "content": { "parts": [{}, { "text": "hi" }] } }]
        }));
        assert_eq!(
            response.candidates.first().map(|c| c.parts.clone()),
            Some(vec![ResponsePart::Text("hi".to_owned())])
        );
    }
}
