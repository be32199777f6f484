//! Test doubles shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so the
//! suites under `tests/` can drive a full [`Studio`](crate::domain::Studio)
//! without network or wall-clock access.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::InlineImage;
use crate::domain::ports::{
    Candidate, GenerationRequest, GenerationResponse, ImageGenerator, ImageGeneratorError,
    ResponsePart,
};

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Freeze the clock at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        *self.lock_clock() += TimeDelta::days(days);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

type ScriptedReply = Result<GenerationResponse, ImageGeneratorError>;

/// Image generator replaying queued replies and recording every request.
///
/// Once the queue is empty each call answers with the fallback image.
pub struct ScriptedImageGenerator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<GenerationRequest>>,
    fallback: InlineImage,
}

impl Default for ScriptedImageGenerator {
    fn default() -> Self {
        Self::new(InlineImage::from_bytes("image/png", b"scripted image"))
    }
}

impl ScriptedImageGenerator {
    /// Generator whose unscripted calls return `fallback`.
    #[must_use]
    pub fn new(fallback: InlineImage) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback,
        }
    }

    /// Queue a raw reply.
    pub fn push_reply(&self, reply: ScriptedReply) {
        lock(&self.replies).push_back(reply);
    }

    /// Queue a reply carrying text but no image.
    pub fn push_text_only(&self, text: &str) {
        self.push_reply(Ok(single_candidate(ResponsePart::Text(text.to_owned()))));
    }

    /// Queue a port failure.
    pub fn push_error(&self, error: ImageGeneratorError) {
        self.push_reply(Err(error));
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedImageGenerator {
    async fn generate_content(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, ImageGeneratorError> {
        lock(&self.requests).push(request);
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            Ok(single_candidate(ResponsePart::InlineImage(
                self.fallback.clone(),
            )))
        })
    }
}

fn single_candidate(part: ResponsePart) -> GenerationResponse {
    GenerationResponse {
        candidates: vec![Candidate { parts: vec![part] }],
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("scripted generator mutex"),
    }
}
