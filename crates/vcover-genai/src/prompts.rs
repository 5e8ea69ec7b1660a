//! Prompt composition for the planning and generation calls.

use vcover_models::StyleDescriptor;

/// Instruction for the planning call.
///
/// Asks for a composition read of the frame, an evocative title and a
/// typographic hierarchy, all conditioned on the style.
pub fn build_planning_prompt(style: &StyleDescriptor) -> String {
    format!(
        r#"You are a master designer working in New York. Analyze this still taken from a video.
1. Assess the composition: is the subject centered or placed on the rule of thirds?
2. Choose one evocative, fashion-forward title (for example "MANIFESTO", "ECHOES", "URBAN").
3. Decide the best typographic hierarchy: headline position, subheadline position, and whether the text should layer over the subject.
Output a single professional image-generation prompt that focuses on typeface character, kerning and layout, matched to this style: {style}."#
    )
}

/// Directive for the generation call.
///
/// `layout_plan` and `instruction` are interpolated verbatim.
pub fn build_generation_prompt(
    style: &StyleDescriptor,
    layout_plan: &str,
    instruction: &str,
) -> String {
    format!(
        r#"MASTER RECONSTRUCTION: 9:16 HIGH-END VIDEO COVER.
STRICT DESIGN RULES:
1. PERSON: Must be the identical person from the image, enhanced with professional studio lighting.
2. TYPOGRAPHY: Overlay a masterfully designed artistic title. The text must feature premium kerning and visual hierarchy. Use fonts: {style}.
3. LAYOUT: Place the typography strategically according to: {layout_plan}.
4. ARTISTIC DETAIL: {instruction}.
5. RESULT: A clean, commercial-ready magazine cover that looks like it was designed by a human creative director."#
    )
}
