//! Document model for a printable label.
//!
//! A `LabelDesign` is a flat, ordered sequence of `LabelElement`s — the
//! sequence order *is* the paint order (lowest index painted first) and each
//! element's `z_index` mirrors its position (`index + 1`, dense, 1-based).
//! Geometry is in millimeters; `Style::font_size` is in points. Image and
//! background references are opaque strings the core never interprets.
//!
//! The serde representation matches the persisted document shape
//! (camelCase keys: `zIndex`, `isLocked`, `aspectLock`, …).

use crate::id::ObjectId;
use crate::units::MIN_ELEMENT_MM;
use serde::{Deserialize, Serialize};

// ─── Color ───────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        // Expand shorthand (#RGB / #RGBA) by doubling each digit.
        let expanded;
        let full = match hex.len() {
            3 | 4 => {
                let mut s = String::with_capacity(8);
                for c in hex.chars() {
                    s.push(c);
                    s.push(c);
                }
                expanded = s;
                expanded.as_str()
            }
            6 | 8 => hex,
            _ => return None,
        };

        let byte = |i: usize| u8::from_str_radix(&full[i..i + 2], 16).ok();
        let r = byte(0)? as f32 / 255.0;
        let g = byte(2)? as f32 / 255.0;
        let b = byte(4)? as f32 / 255.0;
        let a = if full.len() == 8 {
            byte(6)? as f32 / 255.0
        } else {
            1.0
        };
        Some(Self::rgba(r, g, b, a))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Style ───────────────────────────────────────────────────────────────

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Per-element presentation attributes — a plain option bag, not polymorphic.
/// `font_size` is in points; lengths are in millimeters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub text_align: Option<TextAlign>,
    pub border_width: Option<f32>,
    pub border_color: Option<Color>,
    pub corner_radius: Option<f32>,
    pub opacity: Option<f32>,
}

// ─── Background ──────────────────────────────────────────────────────────

/// Label background: a solid color or an opaque image reference
/// (data URI or remote URL — never interpreted here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Background {
    Solid(Color),
    Image(String),
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::WHITE)
    }
}

// ─── Element content ─────────────────────────────────────────────────────

/// What an element displays. Image references are opaque strings; QR
/// payloads are placeholders filled in by the surrounding product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Content {
    Empty,
    Text(String),
    Image(String),
    QrPayload(String),
}

// ─── Element kinds & capabilities ────────────────────────────────────────

/// The element variants that can be placed on a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Text,
    Image,
    QrCode,
    Shape,
    BrandLogo,
    BrandFooter,
}

/// Fixed capabilities a kind declares once, so call sites do a single
/// dispatch instead of scattered type checks. Instance flags (`locked`,
/// `canvas_locked`, `aspect_lock`) override only the mutable subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// May the element be removed from the design at all?
    pub deletable: bool,
    /// May interaction change its width/height?
    pub resizable: bool,
    /// Must width always equal height (QR codes)?
    pub fixed_square: bool,
}

impl ElementKind {
    pub const fn capabilities(self) -> Capabilities {
        match self {
            ElementKind::Text | ElementKind::Image | ElementKind::Shape => Capabilities {
                deletable: true,
                resizable: true,
                fixed_square: false,
            },
            ElementKind::QrCode => Capabilities {
                deletable: true,
                resizable: true,
                fixed_square: true,
            },
            ElementKind::BrandLogo => Capabilities {
                deletable: false,
                resizable: true,
                fixed_square: false,
            },
            ElementKind::BrandFooter => Capabilities {
                deletable: false,
                resizable: false,
                fixed_square: false,
            },
        }
    }

    /// Brand elements occupy the reserved top z-band in restricted mode.
    pub const fn is_brand(self) -> bool {
        matches!(self, ElementKind::BrandLogo | ElementKind::BrandFooter)
    }

    /// Prefix used for freshly generated ids (`text_3`, `qr_0`, …).
    pub const fn prefix(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::QrCode => "qr",
            ElementKind::Shape => "shape",
            ElementKind::BrandLogo => "brand_logo",
            ElementKind::BrandFooter => "brand_footer",
        }
    }
}

// ─── LabelElement ────────────────────────────────────────────────────────

/// One placeable object on the label.
///
/// `x`/`y` name the top-left corner *before* rotation; `rotation` is in
/// degrees and wraps into `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelElement {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub z_index: usize,
    pub content: Content,
    #[serde(default)]
    pub style: Style,
    #[serde(rename = "isLocked", default)]
    pub locked: bool,
    #[serde(rename = "isCanvasLocked", default)]
    pub canvas_locked: bool,
    #[serde(default)]
    pub aspect_lock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LabelElement {
    /// Create an element of `kind` with a fresh id and per-kind default
    /// geometry and content. `z_index` is assigned when the element is
    /// inserted into a design.
    pub fn new(kind: ElementKind) -> Self {
        let (width, height, content) = match kind {
            ElementKind::Text => (40.0, 10.0, Content::Text("New text".into())),
            ElementKind::Image => (30.0, 30.0, Content::Empty),
            ElementKind::QrCode => (20.0, 20.0, Content::QrPayload(String::new())),
            ElementKind::Shape => (20.0, 20.0, Content::Empty),
            ElementKind::BrandLogo => (15.0, 15.0, Content::Empty),
            ElementKind::BrandFooter => (60.0, 8.0, Content::Empty),
        };
        Self {
            id: ObjectId::fresh(kind.prefix()),
            kind,
            x: 10.0,
            y: 10.0,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            content,
            style: Style::default(),
            locked: false,
            canvas_locked: false,
            aspect_lock: false,
            name: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Center of the unrotated bounding box (mm). Rotation pivots here.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Clamp width/height to the editor minimum in place.
    pub fn clamp_min_size(&mut self) {
        self.width = self.width.max(MIN_ELEMENT_MM);
        self.height = self.height.max(MIN_ELEMENT_MM);
    }
}

// ─── Guides ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A user-placed alignment line. `position` is in mm on the perpendicular
/// axis and may be negative or exceed the label bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub id: ObjectId,
    pub orientation: Orientation,
    pub position: f32,
}

impl Guide {
    pub fn new(orientation: Orientation, position: f32) -> Self {
        Self {
            id: ObjectId::fresh("guide"),
            orientation,
            position,
        }
    }
}

// ─── LabelDesign ─────────────────────────────────────────────────────────

/// The complete in-memory label being edited — the single source of truth
/// rendered by the (external) view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDesign {
    pub name: String,
    /// Label dimensions in mm, > 0.
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<LabelElement>,
    #[serde(default)]
    pub guides: Vec<Guide>,
}

impl LabelDesign {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            background: Background::default(),
            elements: Vec::new(),
            guides: Vec::new(),
        }
    }

    /// Look up an element by id.
    pub fn element(&self, id: ObjectId) -> Option<&LabelElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Look up an element mutably by id.
    pub fn element_mut(&mut self, id: ObjectId) -> Option<&mut LabelElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Position of an element in the paint order.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn guide(&self, id: ObjectId) -> Option<&Guide> {
        self.guides.iter().find(|g| g.id == id)
    }

    /// Load from the persisted JSON document shape. The only fallible
    /// boundary in the core; structural validity beyond what serde enforces
    /// is the loader's concern.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Serialize to the persisted JSON document shape.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
