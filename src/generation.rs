//! Turns a validated request into service calls.
//!
//! A request with an output count of `n` issues `n` independent calls that run
//! concurrently. The batch waits for every call to finish and succeeds only if
//! all of them do; a single failure fails the whole batch and no partial set is
//! returned.

use futures::future::join_all;

use crate::{
    codec,
    config::UploadLimits,
    error::{MockupError, Result},
    gemini::ImageSynthesizer,
    models::{GenerationRequest, ImageBuffer},
    prompt::{self, ComposedPrompt},
};

/// Composes the prompt and bounds every attachment for upload.
pub fn prepare(request: &GenerationRequest, limits: &UploadLimits) -> Result<ComposedPrompt> {
    let composed = prompt::compose(request);
    let attachments = composed
        .attachments
        .iter()
        .map(|attachment| codec::constrain_for_upload(attachment, limits))
        .collect::<Result<Vec<_>>>()?;
    Ok(ComposedPrompt::new(composed.text, attachments))
}

async fn call_once<S>(synth: &S, prompt: &ComposedPrompt) -> Result<ImageBuffer>
where
    S: ImageSynthesizer + ?Sized,
{
    let image = synth.synthesize(prompt).await?;
    if image.is_empty() || !image.is_image() {
        return Err(MockupError::EmptyGenerationResult(format!(
            "the service returned a non-image payload ({})",
            image.media_type()
        )));
    }
    Ok(image)
}

pub async fn generate_one<S>(
    synth: &S,
    request: &GenerationRequest,
    limits: &UploadLimits,
) -> Result<ImageBuffer>
where
    S: ImageSynthesizer + ?Sized,
{
    let prompt = prepare(request, limits)?;
    call_once(synth, &prompt).await
}

pub async fn generate_batch<S>(
    synth: &S,
    request: &GenerationRequest,
    limits: &UploadLimits,
) -> Result<Vec<ImageBuffer>>
where
    S: ImageSynthesizer + ?Sized,
{
    let prompt = prepare(request, limits)?;
    let count = request.output_count.get();

    log::info!(
        "Dispatching {} {} call(s) at {}",
        count,
        request.mode.name(),
        request.aspect_ratio
    );

    let results = join_all((0..count).map(|_| call_once(synth, &prompt))).await;

    let failures = results.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        log::warn!("{} of {} generation calls failed; discarding batch", failures, count);
    }

    results.into_iter().collect()
}
