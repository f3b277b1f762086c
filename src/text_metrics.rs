use fontdb::{Database, Family, ID, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

const ELLIPSIS: char = '\u{2026}';
/// Average advance of a proportional sans face, in em.
const FALLBACK_ADVANCE_EM: f32 = 0.56;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Rendered width of `text`, from the installed font when one matches and
/// from a per-character estimate otherwise.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    TEXT_MEASURER
        .lock()
        .ok()
        .and_then(|mut measurer| measurer.measure(text, font_size, font_family))
        .unwrap_or_else(|| estimate_width(text, font_size))
}

pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_ADVANCE_EM
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
///
/// The measurer is locked and the font parsed once for all candidates.
pub fn fit_to_width(text: &str, max_width: f32, font_size: f32, font_family: &str) -> String {
    let estimate = |candidate: &str| estimate_width(candidate, font_size);
    let Ok(mut measurer) = TEXT_MEASURER.lock() else {
        return fit_with(text, max_width, estimate);
    };
    match measurer.face(font_family).and_then(|face| face.metrics()) {
        Some(mut metrics) => fit_with(text, max_width, |candidate| metrics.width(candidate, font_size)),
        None => fit_with(text, max_width, estimate),
    }
}

fn fit_with(text: &str, max_width: f32, mut measure: impl FnMut(&str) -> f32) -> String {
    let text = text.trim();
    if measure(text) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let mut candidate: String = chars[..keep].iter().collect::<String>().trim_end().to_string();
        candidate.push(ELLIPSIS);
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let mut metrics = self.face(font_family)?.metrics()?;
        Some(metrics.width(text, font_size))
    }

    /// Cached face for `font_family`, loaded on first use.
    fn face(&mut self, font_family: &str) -> Option<&mut FontFace> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            if face.is_none() {
                log::debug!(family = key.as_str(); "No installed font matches, estimating text width");
            }
            self.faces.insert(key.clone(), face);
        }
        self.faces.get_mut(&key)?.as_mut()
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
                "monospace" | "ui-monospace" => Family::Monospace,
                _ => Family::Name(*name),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        FontFace::load(&self.db, id)
    }
}

/// Owned font bytes plus the advances looked up so far.
struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    advances: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn load(db: &Database, id: ID) -> Option<Self> {
        db.with_face_data(id, |data, index| {
            let face = Face::parse(data, index).ok()?;
            Some(Self {
                data: data.to_vec(),
                index,
                units_per_em: f32::from(face.units_per_em().max(1)),
                advances: HashMap::new(),
            })
        })
        .flatten()
    }

    /// Parses the face once; the result measures any number of strings.
    fn metrics(&mut self) -> Option<FaceMetrics<'_>> {
        let face = Face::parse(&self.data, self.index).ok()?;
        Some(FaceMetrics {
            face,
            units_per_em: self.units_per_em,
            advances: &mut self.advances,
        })
    }
}

struct FaceMetrics<'f> {
    face: Face<'f>,
    units_per_em: f32,
    advances: &'f mut HashMap<char, Option<u16>>,
}

impl FaceMetrics<'_> {
    fn width(&mut self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * FALLBACK_ADVANCE_EM;
        let face = &self.face;
        let mut width = 0.0f32;
        for ch in text.chars() {
            let advance = *self.advances.entry(ch).or_insert_with(|| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
            width += match advance {
                Some(units) if units > 0 => f32::from(units) * scale,
                _ => fallback,
            };
        }
        width
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
