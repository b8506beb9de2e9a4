//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Maps `async-openai`'s [`ChatCompletionResponseStream`] chunks to the
//! provider-agnostic [`StreamEvent`] enum defined in `lexchat-types`.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use async_openai::types::chat::ChatCompletionResponseStream;

use lexchat_types::llm::{LlmError, StreamEvent, Usage};

use super::{map_finish_reason, map_openai_error};

/// Map an async-openai [`ChatCompletionResponseStream`] to a stream of [`StreamEvent`]s.
///
/// Event order:
/// 1. `Connected` -- once the first chunk has arrived; an error before that
///    is yielded instead, so a refused request never looks connected
/// 2. `TextDelta` -- for each non-empty content chunk
/// 3. `MessageDelta` -- with the stop reason when finish_reason appears
/// 4. `Usage` -- token usage (requires `stream_options.include_usage = true`)
/// 5. `Done` -- at the end of the stream
pub fn map_openai_stream(
    stream: ChatCompletionResponseStream,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        let mut stream = stream;
        let mut connected = false;

        while let Some(result) = stream.next().await {
            let chunk = result.map_err(map_openai_error)?;

            if !connected {
                connected = true;
                yield StreamEvent::Connected;
            }

            // The final chunk carries usage with an empty choices array.
            if let Some(usage) = chunk.usage {
                yield StreamEvent::Usage(Usage {
                    input_tokens: usage.prompt_tokens,
                    output_tokens: usage.completion_tokens,
                });
            }

            for choice in chunk.choices {
                if let Some(text) = choice.delta.content {
                    if !text.is_empty() {
                        yield StreamEvent::TextDelta { text };
                    }
                }

                if let Some(finish_reason) = choice.finish_reason {
                    yield StreamEvent::MessageDelta {
                        stop_reason: map_finish_reason(&finish_reason),
                    };
                }
            }
        }

        if !connected {
            yield StreamEvent::Connected;
        }
        yield StreamEvent::Done;
    })
}
