//! The DTCG 2025.10 color object and its CSS renderings.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::css::{Rgba, parse_css_color};

/// Color spaces named by the DTCG 2025.10 color object.
///
/// Spaces with their own CSS function render as `name(c1 c2 c3)`; the rest
/// go through the `color()` family. Unrecognized spaces keep their raw name
/// and also render through `color()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    Hsl,
    Hwb,
    Lab,
    Lch,
    Oklab,
    Oklch,
    DisplayP3,
    A98Rgb,
    ProphotoRgb,
    Rec2020,
    XyzD50,
    XyzD65,
}

impl ColorSpace {
    /// Whether CSS has a dedicated function for this space.
    fn has_own_function(self) -> bool {
        matches!(
            self,
            ColorSpace::Hsl | ColorSpace::Hwb | ColorSpace::Lab | ColorSpace::Lch
                | ColorSpace::Oklab | ColorSpace::Oklch
        )
    }
}

/// A single component of a DTCG color: a number, or the keyword `"none"`.
///
/// `"none"` counts as 0 when deriving hex but is preserved verbatim in
/// functional notation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Component {
    Number(f64),
    Keyword(String),
}

impl Component {
    pub fn value(&self) -> f64 {
        match self {
            Component::Number(n) => *n,
            Component::Keyword(_) => 0.0,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(n) => f.write_str(&fmt_num(*n)),
            Component::Keyword(k) => f.write_str(k),
        }
    }
}

/// The DTCG 2025.10 color value object.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtcgColor {
    pub color_space: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub hex: Option<String>,
}

fn default_alpha() -> f64 {
    1.0
}

impl DtcgColor {
    /// Parse from a raw token `$value`, if it has the object shape.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    fn space(&self) -> Option<ColorSpace> {
        ColorSpace::from_str(&self.color_space).ok()
    }

    /// Render the object as a CSS color string.
    ///
    /// Preference order: the authored `hex` when fully opaque, a derived
    /// hex for opaque sRGB, `rgba()` for translucent sRGB, the space's own
    /// function when CSS has one, and the `color()` family otherwise.
    pub fn to_css_string(&self) -> String {
        if let Some(hex) = self.hex.as_deref() {
            if self.alpha >= 1.0 {
                return hex.to_string();
            }
        }
        match self.space() {
            Some(ColorSpace::Srgb) if self.alpha >= 1.0 => self.srgb_hex(),
            Some(ColorSpace::Srgb) => format!(
                "rgba({}, {}, {}, {})",
                channel_255(self.component(0)),
                channel_255(self.component(1)),
                channel_255(self.component(2)),
                fmt_num(self.alpha)
            ),
            Some(ColorSpace::Hsl) => {
                let h = self.components.first().map(Component::to_string).unwrap_or_default();
                let s = percentage(self.components.get(1));
                let l = percentage(self.components.get(2));
                if self.alpha >= 1.0 {
                    format!("hsl({}, {}, {})", h, s, l)
                } else {
                    format!("hsl({} {} {} / {})", h, s, l, fmt_num(self.alpha))
                }
            }
            Some(space) if space.has_own_function() => self.function_form(&space.to_string()),
            Some(space) => self.color_form(&space.to_string()),
            None => self.color_form(&self.color_space),
        }
    }

    /// Sample the color as normalized RGBA, when the space permits it.
    ///
    /// sRGB and HSL convert directly; an authored `hex` is used for any
    /// other space; remaining spaces yield no sample.
    pub fn to_rgba(&self) -> Option<Rgba> {
        match self.space() {
            Some(ColorSpace::Srgb) => Some(Rgba::new(
                self.component(0).clamp(0.0, 1.0),
                self.component(1).clamp(0.0, 1.0),
                self.component(2).clamp(0.0, 1.0),
                self.alpha,
            )),
            Some(ColorSpace::Hsl) => {
                let s = normalized(self.components.get(1));
                let l = normalized(self.components.get(2));
                Some(Rgba::from_hsl(self.component(0), s, l, self.alpha))
            }
            _ => self.hex.as_deref().and_then(parse_css_color).map(|mut c| {
                c.alpha = self.alpha;
                c
            }),
        }
    }

    fn component(&self, i: usize) -> f64 {
        self.components.get(i).map(Component::value).unwrap_or(0.0)
    }

    fn srgb_hex(&self) -> String {
        Rgba::new(
            self.component(0).clamp(0.0, 1.0),
            self.component(1).clamp(0.0, 1.0),
            self.component(2).clamp(0.0, 1.0),
            1.0,
        )
        .to_hex()
    }

    /// `name(c1 c2 c3)`, with `/ alpha` when translucent.
    fn function_form(&self, name: &str) -> String {
        format!("{}({})", name, self.body())
    }

    /// `color(space c1 c2 c3)`, with `/ alpha` when translucent.
    fn color_form(&self, space: &str) -> String {
        format!("color({} {})", space, self.body())
    }

    fn body(&self) -> String {
        let comps =
            self.components.iter().map(Component::to_string).collect::<Vec<_>>().join(" ");
        if self.alpha >= 1.0 {
            comps
        } else {
            format!("{} / {}", comps, fmt_num(self.alpha))
        }
    }
}

fn channel_255(v: f64) -> String {
    fmt_num((v.clamp(0.0, 1.0) * 255.0).round())
}

fn percentage(c: Option<&Component>) -> String {
    match c {
        Some(Component::Keyword(k)) => k.clone(),
        Some(Component::Number(n)) => format!("{}%", fmt_num(*n)),
        None => "0%".to_string(),
    }
}

/// HSL saturation/lightness components are authored as percentages 0–100.
fn normalized(c: Option<&Component>) -> f64 {
    c.map(Component::value).unwrap_or(0.0) / 100.0
}

/// Trim a float to its shortest sensible CSS form.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn color(v: serde_json::Value) -> DtcgColor {
        DtcgColor::from_value(&v).unwrap()
    }

    #[test]
    fn hex_wins_when_opaque() {
        let c = color(json!({
            "colorSpace": "srgb",
            "components": [1, 0, 0],
            "hex": "#ff0000"
        }));
        assert_eq!(c.to_css_string(), "#ff0000");
    }

    #[test]
    fn opaque_srgb_derives_hex() {
        let c = color(json!({ "colorSpace": "srgb", "components": [1, 0.5, 0] }));
        assert_eq!(c.to_css_string(), "#ff8000");
    }

    #[test]
    fn translucent_srgb_uses_rgba() {
        let c = color(json!({ "colorSpace": "srgb", "components": [1, 0, 0], "alpha": 0.5 }));
        assert_eq!(c.to_css_string(), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn translucent_hex_falls_through_to_space_form() {
        let c = color(json!({
            "colorSpace": "srgb",
            "components": [1, 0, 0],
            "alpha": 0.25,
            "hex": "#ff0000"
        }));
        assert_eq!(c.to_css_string(), "rgba(255, 0, 0, 0.25)");
    }

    #[test]
    fn hsl_form() {
        let c = color(json!({ "colorSpace": "hsl", "components": [120, 50, 50] }));
        assert_eq!(c.to_css_string(), "hsl(120, 50%, 50%)");
    }

    #[test]
    fn oklch_uses_own_function() {
        let c = color(json!({ "colorSpace": "oklch", "components": [0.7, 0.1, 150] }));
        assert_eq!(c.to_css_string(), "oklch(0.7 0.1 150)");
    }

    #[test]
    fn display_p3_uses_color_family() {
        let c = color(json!({
            "colorSpace": "display-p3",
            "components": [1, 0, 0.5],
            "alpha": 0.8
        }));
        assert_eq!(c.to_css_string(), "color(display-p3 1 0 0.5 / 0.8)");
    }

    #[test]
    fn none_component_is_zero_for_hex_verbatim_in_function() {
        let c = color(json!({ "colorSpace": "srgb", "components": ["none", 1, 0] }));
        assert_eq!(c.to_css_string(), "#00ff00");
        let c = color(json!({ "colorSpace": "oklch", "components": [0.5, 0.2, "none"] }));
        assert_eq!(c.to_css_string(), "oklch(0.5 0.2 none)");
    }

    #[test]
    fn rgba_sample_from_srgb() {
        let c = color(json!({ "colorSpace": "srgb", "components": [0, 0, 1], "alpha": 0.5 }));
        assert_eq!(c.to_rgba(), Some(Rgba::new(0.0, 0.0, 1.0, 0.5)));
    }

    #[test]
    fn rgba_sample_via_hex_for_other_spaces() {
        let c = color(json!({
            "colorSpace": "oklch",
            "components": [0.6, 0.2, 30],
            "hex": "#336699"
        }));
        let sample = c.to_rgba().unwrap();
        assert_eq!(sample, Rgba::new(0x33 as f64 / 255.0, 0x66 as f64 / 255.0, 0x99 as f64 / 255.0, 1.0));
    }

    #[test]
    fn string_value_is_not_an_object() {
        assert_eq!(DtcgColor::from_value(&json!("#fff")), None);
    }
}
