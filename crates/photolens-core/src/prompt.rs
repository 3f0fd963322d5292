//! Instruction and output-contract assembly for schema-constrained generation.
//!
//! The instruction's field list is rendered from the same [`AnalysisSchema`]
//! that produces the declaration, so the two cannot drift apart.

use std::fmt::Write as _;

use serde_json::Value;

use crate::schema::{AnalysisSchema, FieldKind, FieldSpec};
use crate::variants::Variant;

/// Content-safety exclusions. Inserted verbatim into every instruction,
/// including caller-supplied overrides.
pub const SAFETY_EXCLUSIONS: &str = "\
- Do not diagnose anything and do not name any medical, dermatological or skin condition.
- Do not recommend medications, supplements or treatments, and never state a dosage.
- Do not comment on body weight, age, ethnicity or attractiveness.
- Describe only what the camera captured and how to photograph, style or edit it.";

/// Top-level fields whose content must come from the theme list.
pub const THEME_SCOPED_FIELDS: &[&str] = &["themeHighlights"];

const PERSONA: &str = "You are an expert portrait photographer, fashion stylist and beauty editor. \
Analyze the attached photo.";

const OUTPUT_RULES: &str = "\
- Reply with exactly one JSON object that matches the response schema.
- No prose, no markdown, no code fences, no text before or after the JSON object.
- Keep every string short and information-dense: a phrase or one sentence, no filler words.";

const UNIQUENESS_RULES: &str = "\
- Never repeat an item, or a rewording of one, across the suggestion lists, recaptureSuggestions and themeHighlights.
- Each themeHighlights entry uses a different theme list entry.";

/// Instruction text plus the structured output declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPrompt {
    pub instruction: String,
    pub declaration: Value,
}

impl AssembledPrompt {
    /// Replace the persona narrative with caller-supplied text.
    ///
    /// Output rules, theme, safety, uniqueness and the field list stay in
    /// place, and the declaration is unchanged.
    pub fn with_override(self, override_text: Option<&str>) -> Self {
        match override_text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => {
                let contract = self
                    .instruction
                    .strip_prefix(PERSONA)
                    .unwrap_or(&self.instruction);
                let instruction = format!("{}{}", text, contract);
                Self {
                    instruction,
                    declaration: self.declaration,
                }
            }
            None => self,
        }
    }
}

/// Assemble the instruction and declaration for one theme.
pub fn build(variant: &Variant, schema: &AnalysisSchema) -> AssembledPrompt {
    let mut text = String::with_capacity(4096);

    text.push_str(PERSONA);
    text.push_str("\n\nOUTPUT RULES\n");
    text.push_str(OUTPUT_RULES);

    let _ = write!(
        text,
        "\n\nTHEME\nTheme: \"{}\". Focus: {}.\nTheme list: {}.\n\
         Fields marked [theme] may only use entries from the theme list; \
         do not invent theme items that are not on it.",
        variant.name, variant.focus, variant.ingredients
    );

    text.push_str("\n\nCONTENT SAFETY\n");
    text.push_str(SAFETY_EXCLUSIONS);

    text.push_str("\n\nUNIQUENESS\n");
    text.push_str(UNIQUENESS_RULES);

    text.push_str("\n\nFIELDS\n");
    render_fields(&mut text, &schema.fields, "", 0);

    AssembledPrompt {
        instruction: text,
        declaration: schema.declaration(),
    }
}

fn render_fields(out: &mut String, fields: &[FieldSpec], prefix: &str, depth: usize) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        let indent = "  ".repeat(depth);
        let requirement = if field.required { "required" } else { "optional" };
        let theme = if depth == 0 && THEME_SCOPED_FIELDS.contains(&field.name) {
            " [theme]"
        } else {
            ""
        };

        let _ = write!(
            out,
            "{}- {} ({}, {}){}: {}",
            indent,
            path,
            field.type_label(),
            requirement,
            theme,
            field.description
        );
        if let FieldKind::Enum(allowed) = &field.kind {
            let literals: Vec<String> = allowed.iter().map(|v| format!("\"{}\"", v)).collect();
            let _ = write!(
                out,
                " Allowed values, use one exactly: {}.",
                literals.join(", ")
            );
        }
        out.push('\n');

        match &field.kind {
            FieldKind::Object(children) => render_fields(out, children, &path, depth + 1),
            FieldKind::ObjectArray(children) => {
                render_fields(out, children, &format!("{}[]", path), depth + 1)
            }
            _ => {}
        }
    }
}
