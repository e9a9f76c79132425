//! Mock backends for testing.
//!
//! Both mocks record every request they receive so tests can assert on what
//! a pipeline actually sent upstream.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{CompletionRequest, ImageGenerationPort, ImageRequest, TextGenerationPort};

type TextResponder = dyn Fn(&CompletionRequest) -> Result<String> + Send + Sync;
type ImageResponder = dyn Fn(&ImageRequest) -> Result<Vec<u8>> + Send + Sync;

/// Bytes that carry a PNG signature, enough for format sniffing
pub fn sample_png() -> Vec<u8> {
    vec![
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ]
}

/// Mock text model.
pub struct MockTextGenerator {
    responder: Box<TextResponder>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockTextGenerator {
    pub fn with_responder(
        responder: impl Fn(&CompletionRequest) -> Result<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answer with the same text
    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::with_responder(move |_| Ok(text.clone()))
    }

    /// Always fail as if the upstream call errored
    pub fn failing(message: &str) -> Arc<Self> {
        let message = message.to_string();
        Self::with_responder(move |_| Err(anyhow!(message.clone())))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerationPort for MockTextGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(&request)
    }
}

/// Mock diffusion model.
pub struct MockImageGenerator {
    responder: Box<ImageResponder>,
    requests: Mutex<Vec<ImageRequest>>,
}

impl MockImageGenerator {
    pub fn with_responder(
        responder: impl Fn(&ImageRequest) -> Result<Vec<u8>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answer with the same buffer
    pub fn returning(bytes: Vec<u8>) -> Arc<Self> {
        Self::with_responder(move |_| Ok(bytes.clone()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let message = message.to_string();
        Self::with_responder(move |_| Err(anyhow!(message.clone())))
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerationPort for MockImageGenerator {
    async fn generate_image(&self, request: ImageRequest) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(&request)
    }
}
