//! Relay session orchestration
//!
//! One session per client request: validate, call upstream, drive the
//! decode/extract/aggregate pipeline, finalize. The session produces exactly
//! one outcome; after a terminal condition no further upstream bytes are
//! processed.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use reqwest::Response;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::{
    client::CompletionClient,
    config::CompletionConfig,
    decoder::{Frame, FrameDecoder},
    error::RelayError,
    extract::{extract_delta, extract_from_value},
    ports::{CompletionPort, DeltaStream},
    request::CompletionRequest,
    transcript::Transcript,
};

/// Completion relay backed by the upstream HTTP client
///
/// Shared read-only across sessions; each call owns its own decoder and
/// transcript, so concurrent sessions never share mutable state.
#[derive(Debug, Clone)]
pub struct CompletionRelay {
    client: CompletionClient,
}

impl CompletionRelay {
    /// Create a relay from validated configuration
    pub fn new(config: CompletionConfig) -> Result<Self, RelayError> {
        Ok(Self {
            client: CompletionClient::new(config)?,
        })
    }

    pub const fn config(&self) -> &CompletionConfig {
        self.client.config()
    }
}

#[async_trait]
impl CompletionPort for CompletionRelay {
    #[instrument(skip(self, request), fields(messages = request.messages.len()))]
    async fn collect(&self, request: CompletionRequest) -> Result<String, RelayError> {
        request.validate()?;

        let response = self.client.send(&request, false).await?;
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::StreamInterrupted(e.to_string()))?;

        let text = aggregate_body(&body);
        if text.trim().is_empty() {
            return Err(RelayError::EmptyCompletion);
        }

        debug!(chars = text.len(), "Buffered session finalized");
        Ok(text)
    }

    #[instrument(skip(self, request), fields(messages = request.messages.len()))]
    async fn stream(&self, request: CompletionRequest) -> Result<DeltaStream, RelayError> {
        request.validate()?;

        let response = self.client.send(&request, true).await?;
        Ok(delta_stream(response))
    }
}

/// Aggregate a fully buffered response body
///
/// The body is fed through the frame decoder as one chunk. When the upstream
/// answered a plain JSON document instead of an event stream, no `data:`
/// frames are recognized and the document itself goes through the extraction
/// rules.
fn aggregate_body(body: &str) -> String {
    let mut decoder = FrameDecoder::new();
    let mut transcript = Transcript::new();
    let mut saw_data_frame = false;

    let mut frames = decoder.feed(body.as_bytes());
    frames.extend(decoder.finish());

    for frame in frames {
        if let Frame::Data(payload) = frame {
            saw_data_frame = true;
            if let Some(delta) = extract_delta(&payload) {
                transcript.push(&delta);
            }
        }
    }

    if !saw_data_frame {
        if let Ok(document) = serde_json::from_str::<Value>(body) {
            if let Some(text) = extract_from_value(&document) {
                return text;
            }
        }
    }

    transcript.into_text()
}

enum Phase {
    Reading,
    Finalizing,
    Closed,
}

struct SessionState {
    body: std::pin::Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    decoder: FrameDecoder,
    transcript: Transcript,
    ready: VecDeque<String>,
    phase: Phase,
}

impl SessionState {
    fn absorb(&mut self, frames: Vec<Frame>) {
        for frame in frames {
            match frame {
                Frame::Data(payload) => {
                    if let Some(delta) = extract_delta(&payload) {
                        self.transcript.push(&delta);
                        self.ready.push_back(delta);
                    }
                },
                Frame::Done => {
                    trace!("Explicit terminal frame decoded");
                    self.phase = Phase::Finalizing;
                },
                Frame::Unrecognized => {},
            }
        }
    }
}

/// Turn the upstream body into an ordered fragment stream
///
/// Chunks are decoded strictly sequentially; fragments come out in exact
/// decode order. The stream ends after an optional single `Err`: a body error
/// mid-stream yields `StreamInterrupted`, and a terminal condition with an
/// empty transcript yields `EmptyCompletion`.
fn delta_stream(response: Response) -> DeltaStream {
    let state = SessionState {
        body: Box::pin(response.bytes_stream()),
        decoder: FrameDecoder::new(),
        transcript: Transcript::new(),
        ready: VecDeque::new(),
        phase: Phase::Reading,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.ready.pop_front() {
                return Some((Ok(fragment), state));
            }

            match state.phase {
                Phase::Closed => return None,
                Phase::Finalizing => {
                    if state.transcript.is_empty() {
                        state.phase = Phase::Closed;
                        return Some((Err(RelayError::EmptyCompletion), state));
                    }
                    debug!(
                        fragments = state.transcript.fragments(),
                        "Live session finalized"
                    );
                    return None;
                },
                Phase::Reading => match state.body.next().await {
                    Some(Ok(chunk)) => {
                        let frames = state.decoder.feed(&chunk);
                        state.absorb(frames);
                    },
                    Some(Err(e)) => {
                        state.phase = Phase::Closed;
                        return Some((Err(RelayError::StreamInterrupted(e.to_string())), state));
                    },
                    None => {
                        // Implicit terminal: end of input without a sentinel
                        let frames = state.decoder.finish();
                        state.absorb(frames);
                        state.phase = Phase::Finalizing;
                    },
                },
            }
        }
    }))
}
