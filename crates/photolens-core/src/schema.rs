//! Analysis output schema.
//!
//! [`ANALYSIS_SCHEMA`] is the single field table for the analysis report.
//! The prompt assembler renders its prose field list from it, and
//! [`AnalysisSchema::declaration`] transcribes it into the structured output
//! contract sent to the model. [`AnalysisSchema::validate`] checks model
//! output against the same table.

use std::fmt;

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

/// Allowed literals for `overallRating`.
pub const RATING_LEVELS: &[&str] = &["needs_work", "fair", "good", "excellent"];

/// Type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    /// String restricted to the listed literals.
    Enum(&'static [&'static str]),
    StringArray,
    ObjectArray(Vec<FieldSpec>),
    Object(Vec<FieldSpec>),
}

impl FieldKind {
    fn type_label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Enum(_) => "enum",
            FieldKind::StringArray => "array of strings",
            FieldKind::ObjectArray(_) => "array of objects",
            FieldKind::Object(_) => "object",
        }
    }
}

/// One named field in the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// One-line description of the intended content.
    pub description: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::String)
    }

    pub fn enumeration(
        name: &'static str,
        description: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        Self::new(name, description, FieldKind::Enum(allowed))
    }

    pub fn string_array(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::StringArray)
    }

    pub fn object(name: &'static str, description: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self::new(name, description, FieldKind::Object(fields))
    }

    pub fn object_array(
        name: &'static str,
        description: &'static str,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self::new(name, description, FieldKind::ObjectArray(fields))
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn new(name: &'static str, description: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: true,
        }
    }

    /// Nested fields for object-like kinds.
    pub fn children(&self) -> Option<&[FieldSpec]> {
        match &self.kind {
            FieldKind::Object(fields) | FieldKind::ObjectArray(fields) => Some(fields),
            _ => None,
        }
    }

    /// Human-readable type label used in prose.
    pub fn type_label(&self) -> &'static str {
        self.kind.type_label()
    }

    fn declaration(&self) -> Value {
        match &self.kind {
            FieldKind::String => json!({ "type": "STRING", "description": self.description }),
            FieldKind::Enum(allowed) => json!({
                "type": "STRING",
                "format": "enum",
                "enum": allowed,
                "description": self.description,
            }),
            FieldKind::StringArray => json!({
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": self.description,
            }),
            FieldKind::ObjectArray(fields) => json!({
                "type": "ARRAY",
                "items": object_declaration(fields, None),
                "description": self.description,
            }),
            FieldKind::Object(fields) => object_declaration(fields, Some(self.description)),
        }
    }
}

fn object_declaration(fields: &[FieldSpec], description: Option<&str>) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.to_string(), field.declaration());
    }
    let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();
    let ordering: Vec<&str> = fields.iter().map(|f| f.name).collect();

    let mut decl = json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
        "propertyOrdering": ordering,
    });
    if let Some(description) = description {
        decl["description"] = Value::String(description.to_string());
    }
    decl
}

/// A schema violation found in model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field (e.g. `details.eyes`).
    pub path: String,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    MissingRequired,
    WrongType { expected: &'static str },
    NotInEnum { value: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::MissingRequired => write!(f, "{}: missing required field", self.path),
            Problem::WrongType { expected } => write!(f, "{}: expected {}", self.path, expected),
            Problem::NotInEnum { value } => {
                write!(f, "{}: '{}' is not an allowed value", self.path, value)
            }
        }
    }
}

/// Root of the analysis output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSchema {
    pub fields: Vec<FieldSpec>,
}

impl AnalysisSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Structured output declaration in the Gemini `responseSchema` dialect.
    pub fn declaration(&self) -> Value {
        object_declaration(&self.fields, None)
    }

    /// Names of required top-level fields.
    pub fn required_keys(&self) -> Vec<&'static str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name).collect()
    }

    /// Every field path in declaration order, nested paths dotted
    /// (`details.eyes`, `themeHighlights[].item`).
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(&self.fields, "", &mut out);
        out
    }

    /// Check a parsed object against the schema.
    ///
    /// Unknown keys are tolerated; `null` counts as absent.
    pub fn validate(&self, object: &Map<String, Value>) -> Vec<Violation> {
        let mut out = Vec::new();
        validate_fields(&self.fields, object, "", &mut out);
        out
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn collect_paths(fields: &[FieldSpec], prefix: &str, out: &mut Vec<String>) {
    for field in fields {
        let path = join_path(prefix, field.name);
        out.push(path.clone());
        match &field.kind {
            FieldKind::Object(children) => collect_paths(children, &path, out),
            FieldKind::ObjectArray(children) => {
                collect_paths(children, &format!("{}[]", path), out)
            }
            _ => {}
        }
    }
}

fn validate_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<Violation>,
) {
    for field in fields {
        let path = join_path(prefix, field.name);
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    out.push(Violation {
                        path,
                        problem: Problem::MissingRequired,
                    });
                }
            }
            Some(value) => validate_value(&field.kind, value, &path, out),
        }
    }
}

fn validate_value(kind: &FieldKind, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let wrong = |expected| Violation {
        path: path.to_string(),
        problem: Problem::WrongType { expected },
    };

    match kind {
        FieldKind::String => {
            if !value.is_string() {
                out.push(wrong("string"));
            }
        }
        FieldKind::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => out.push(Violation {
                path: path.to_string(),
                problem: Problem::NotInEnum {
                    value: s.to_string(),
                },
            }),
            None => out.push(wrong("string")),
        },
        FieldKind::StringArray => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        out.push(Violation {
                            path: format!("{}[{}]", path, i),
                            problem: Problem::WrongType { expected: "string" },
                        });
                    }
                }
            }
            None => out.push(wrong("array")),
        },
        FieldKind::ObjectArray(children) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    match item.as_object() {
                        Some(obj) => validate_fields(children, obj, &item_path, out),
                        None => out.push(Violation {
                            path: item_path,
                            problem: Problem::WrongType { expected: "object" },
                        }),
                    }
                }
            }
            None => out.push(wrong("array")),
        },
        FieldKind::Object(children) => match value.as_object() {
            Some(obj) => validate_fields(children, obj, path, out),
            None => out.push(wrong("object")),
        },
    }
}

/// The portrait analysis report schema.
pub static ANALYSIS_SCHEMA: Lazy<AnalysisSchema> = Lazy::new(|| {
    use FieldSpec as F;

    AnalysisSchema::new(vec![
        F::string(
            "summary",
            "Two sentences on the photo's overall impression and its single biggest improvement.",
        ),
        F::enumeration(
            "overallRating",
            "Overall photographic quality level.",
            RATING_LEVELS,
        ),
        F::object(
            "details",
            "One short observation per photographic aspect.",
            vec![
                F::string("subjectClarity", "How clearly the subject stands out."),
                F::string("lightingQuality", "Direction, softness and evenness of light."),
                F::string("skinTones", "Color accuracy and warmth of visible skin."),
                F::string("facialShadowsAndTexture", "Shadow placement and texture rendering on the face."),
                F::string("eyes", "Eye sharpness, catchlights and gaze."),
                F::string("expressionAndPosture", "What the expression and posture communicate."),
                F::string("composition", "Framing, placement and balance."),
                F::string("backgroundQuality", "Distractions, depth and fit of the background."),
                F::string("colorHarmony", "How well the colors work together."),
                F::string("contrastAndTonalBalance", "Highlight and shadow balance."),
                F::string("sharpness", "Focus accuracy and detail."),
                F::string("croppingAndAspectRatio", "Crop points and aspect ratio fit."),
                F::string("clothingAndStyling", "How clothing and styling support the photo."),
                F::string("moodConsistency", "Whether all elements support one mood."),
                F::string("noiseAndGrain", "Visible noise or grain."),
                F::string("detailHierarchy", "Whether the eye is led to what matters."),
                F::string("lensDistortion", "Perspective or lens distortion on the subject."),
                F::string("intent", "The apparent purpose of the photo."),
                F::string("hairstyle", "How the hair frames the face."),
                F::string("makeup", "Grooming and makeup as seen on camera."),
            ],
        ),
        F::object(
            "suggestions",
            "Exactly 3 short, clickable edit ideas (2-5 words each) per category.",
            vec![
                F::string_array("general", "Overall enhancements."),
                F::string_array("clothing", "Fashion changes."),
                F::string_array("pose", "Body language adjustments."),
                F::string_array("background", "Setting improvements."),
                F::string_array("hair", "Hairstyle changes."),
                F::string_array("skin", "Texture and tone retouching."),
                F::string_array("makeup", "Grooming and cosmetic touches."),
                F::string_array("lighting", "Atmosphere and light edits."),
                F::string_array("accessories", "Additions."),
                F::string_array("expression", "Facial adjustments."),
            ],
        ),
        F::string_array(
            "recaptureSuggestions",
            "5 to 7 tips for retaking the photo: expression, pose, gesture, clothing, background, camera angle.",
        ),
        F::object_array(
            "themeHighlights",
            "Exactly 3 theme ideas, each using one different entry from the theme list.",
            vec![
                F::string("item", "The theme list entry, copied exactly."),
                F::string("tip", "How to apply it to this photo, under 15 words."),
            ],
        ),
        F::string_array(
            "cautions",
            "Aspects that could not be judged from this image (e.g. face in shadow).",
        )
        .optional(),
    ])
});
