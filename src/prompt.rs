//! Instruction text for each generation mode.
//!
//! The model treats every numbered rule as a literal constraint, so each
//! template spells out the aspect ratio, fidelity and no-annotation rules
//! explicitly rather than relying on defaults.

use crate::models::{AspectRatio, GenerationMode, GenerationRequest, ImageBuffer};

/// Prompt text plus image attachments, in the order the service must receive them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub text: String,
    pub attachments: Vec<ImageBuffer>,
}

impl ComposedPrompt {
    pub fn new(text: String, attachments: Vec<ImageBuffer>) -> Self {
        Self { text, attachments }
    }
}

pub fn compose(request: &GenerationRequest) -> ComposedPrompt {
    match &request.mode {
        GenerationMode::SceneSynthesis {
            text,
            industry,
            logo,
        } => ComposedPrompt::new(
            scene_synthesis_prompt(text, industry.style_guide(), request.aspect_ratio),
            vec![logo.clone()],
        ),
        // Service is order-sensitive: text, then base image, then logo.
        GenerationMode::BaseImageReplace { base, logo } => ComposedPrompt::new(
            base_image_replace_prompt(request.aspect_ratio),
            vec![base.clone(), logo.clone()],
        ),
        GenerationMode::Inpaint { image, instruction } => ComposedPrompt::new(
            inpaint_prompt(instruction, request.aspect_ratio),
            vec![image.clone()],
        ),
    }
}

fn aspect_ratio_rule(ratio: AspectRatio) -> String {
    format!(
        "**ASPECT RATIO (HIGHEST PRIORITY):** The output image MUST have an aspect ratio of exactly {ratio}. \
         This rule overrides every other instruction. For reference, '1920:1080' is a wide landscape, \
         '1080:1920' is a tall portrait and '1080:1080' is a square. An image with any other proportion is a failed generation."
    )
}

pub fn scene_synthesis_prompt(scene: &str, style_guide: &str, ratio: AspectRatio) -> String {
    format!(
        r#"// PHOTOREALISTIC LOGO MOCKUP

// HARD CONSTRAINTS
1. {aspect}
2. **PHOTOREALISM:** Produce one ultra-realistic, high-resolution photograph. It must be indistinguishable from a professional shot on a high-end DSLR with a fast prime lens, with accurate lighting, shadows, textures and depth of field.

// ART DIRECTION
1. **INDUSTRY STYLE:** Match the visual language of the target industry. Style guide: "{style}"
2. **SCENE:** Following the style guide, photograph this scene: "{scene}"
3. **LOGO PLACEMENT:** Integrate the attached logo into the scene:
   - It must look like part of the original photograph, not a digital overlay.
   - Lighting, shadows, perspective and surface material on the logo must match the environment.
   - **EXACT REPRODUCTION (MOST IMPORTANT):** Reproduce every line, shape, color and text element of the attached logo exactly. Do not alter, omit, simplify or distort any part of it.

// OUTPUT
- Return exactly one image.
- Do not add any text, watermarks or annotations.
- Reminder: the aspect ratio MUST be {ratio}."#,
        aspect = aspect_ratio_rule(ratio),
        style = style_guide,
        scene = scene,
        ratio = ratio,
    )
}

pub fn base_image_replace_prompt(ratio: AspectRatio) -> String {
    format!(
        r#"// LOGO REPLACEMENT IN A BASE PHOTOGRAPH

// HARD CONSTRAINTS
1. {aspect} Crop or extend the base image as needed to reach this ratio.
2. **INPUTS:** The first attached image is the BASE IMAGE. The second attached image is the new LOGO.
3. **DETECT AND REPLACE:** Scan the BASE IMAGE for existing logos, brand marks, emblems or text acting as a logo. Replace the most prominent or contextually relevant one with the new LOGO.
4. **FALLBACK PLACEMENT:** Only if the BASE IMAGE contains no logo at all, place the new LOGO on the most plausible blank surface (a plain shirt, an empty mug, a blank sign).
5. **SEAMLESS INTEGRATION:** The logo must match the lighting, shadows, perspective, angle, texture, material and any folds or curvature of the surface it sits on. It must not look like a flat sticker.
6. **LOGO INTEGRITY:** Reproduce every line, shape, color and text element of the new LOGO exactly. Do not alter, omit or distort any part of it.
7. **PRESERVE EVERYTHING ELSE:** Do not change any region of the BASE IMAGE other than the logo area.

// OUTPUT
- Return the modified BASE IMAGE as a single image with aspect ratio {ratio}.
- Do not add any text, watermarks or annotations."#,
        aspect = aspect_ratio_rule(ratio),
        ratio = ratio,
    )
}

pub fn inpaint_prompt(instruction: &str, ratio: AspectRatio) -> String {
    format!(
        r#"// INPAINTING

// HARD CONSTRAINTS
1. {aspect} Keep the exact framing of the attached image.
2. **TASK:** The attached image contains a transparent region (alpha channel). Fill only that region.
3. **FILL CONTENT:** The new content must follow this instruction: "{instruction}"
4. **SEAMLESS BLENDING:** Blend the filled region with its surroundings so there is no visible seam or artifact at the boundary. Match lighting, shadows, texture and perspective.
5. **PRESERVE OPAQUE PIXELS:** Do not modify any opaque (non-transparent) pixel of the attached image.

// OUTPUT
- Return a single image with the transparent region filled.
- Do not add any text, watermarks or annotations."#,
        aspect = aspect_ratio_rule(ratio),
        instruction = instruction.trim(),
    )
}

pub fn rewrite_prompt(description: &str) -> String {
    format!(
        r#"You are an expert copy editor refining a scene description for an AI image generator.
1. Fix grammar and spelling mistakes.
2. Make the language clearer and more vivid.
3. Do not add new objects or concepts and do not change the core subject.
4. Keep it concise.
5. Return only the rewritten description, with no preamble or explanation.

Original text: "{}""#,
        description.trim()
    )
}
