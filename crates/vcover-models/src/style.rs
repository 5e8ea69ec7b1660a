//! Cover design styles and the preset catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available cover design styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DesignStyle {
    /// Heavy grotesque type, industrial palette
    #[default]
    #[serde(rename = "modern_brutalist")]
    Brutalist,
    /// Classic serif fashion editorial
    #[serde(rename = "editorial_vogue")]
    Vogue,
    /// Thin type and generous negative space
    #[serde(rename = "minimalist_luxury")]
    Minimalist,
    /// Glowing, glitchy neon type
    #[serde(rename = "cyberpunk_neon")]
    Cyberpunk,
    /// Film title credits
    #[serde(rename = "cinematic_noir")]
    Cinematic,
    /// Experimental distorted type
    #[serde(rename = "avant_garde")]
    Abstract,
}

/// A catalog entry: labels shown to the user plus the descriptor sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignPreset {
    pub style: DesignStyle,
    /// English label
    pub label: &'static str,
    /// Localized display name
    pub name: &'static str,
    pub description: &'static str,
    pub thumbnail_url: &'static str,
    /// Prompt fragment embedded verbatim into generation prompts
    pub prompt_modifier: &'static str,
}

const PRESETS: [DesignPreset; 6] = [
    DesignPreset {
        style: DesignStyle::Brutalist,
        label: "Modern Brutalist",
        name: "现代力量",
        description: "充满力量感的粗体排版与工业冷色调。",
        thumbnail_url: "https://images.unsplash.com/photo-1533154683836-84ea7a0bc310?q=80&w=400&h=600&auto=format&fit=crop",
        prompt_modifier: "brutalist graphic design, oversized grotesque bold fonts, Swiss typography, high contrast, minimalist brutalism",
    },
    DesignPreset {
        style: DesignStyle::Vogue,
        label: "Editorial Vogue",
        name: "时尚画报",
        description: "经典衬线体，杂志风图文穿插排版。",
        thumbnail_url: "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f?q=80&w=400&h=600&auto=format&fit=crop",
        prompt_modifier: "luxury fashion magazine cover, Didot or Bodoni fonts, elegant serif typography, Vogue editorial layout, sophisticated kerning",
    },
    DesignPreset {
        style: DesignStyle::Minimalist,
        label: "Minimalist Luxury",
        name: "极简静奢",
        description: "纤细字体，大量的艺术留白。",
        thumbnail_url: "https://images.unsplash.com/photo-1544450181-29597f6ee557?q=80&w=400&h=600&auto=format&fit=crop",
        prompt_modifier: "minimalist luxury, thin sans-serif typography, clean airy layout, beige and white tones, premium studio lighting",
    },
    DesignPreset {
        style: DesignStyle::Cyberpunk,
        label: "Cyberpunk Neon",
        name: "霓虹幻想",
        description: "发光特效，具有冲击力的故障风字体。",
        thumbnail_url: "https://images.unsplash.com/photo-1550745165-9bc0b252726f?q=80&w=400&h=600&auto=format&fit=crop",
        prompt_modifier: "cyberpunk neon aesthetic, glowing typography, tech-noir layout, digital glitch effects, futuristic UI elements",
    },
    DesignPreset {
        style: DesignStyle::Cinematic,
        label: "Cinematic Noir",
        name: "经典影像",
        description: "电影片头感，宽银幕比例文字。",
        thumbnail_url: "https://images.unsplash.com/photo-1485846234645-a62644f84728?q=80&w=400&h=600&auto=format&fit=crop",
        prompt_modifier: "cinematic film poster credits, anamorphic cinematic framing, moody chiaroscuro lighting, classic movie titling",
    },
    DesignPreset {
        style: DesignStyle::Abstract,
        label: "Avant-Garde",
        name: "先锋艺术",
        description: "实验性的字体扭曲，适合创意内容。",
        thumbnail_url: "https://images.unsplash.com/photo-1541701494587-cb58502866ab?q=80&w=400&h=600&auto=format&fit=crop",
        prompt_modifier: "avant-garde abstract design, distorted typography as art, surreal gradients, experimental poster layout",
    },
];

impl DesignStyle {
    /// All styles in catalog order.
    pub const ALL: &'static [DesignStyle] = &[
        DesignStyle::Brutalist,
        DesignStyle::Vogue,
        DesignStyle::Minimalist,
        DesignStyle::Cyberpunk,
        DesignStyle::Cinematic,
        DesignStyle::Abstract,
    ];

    /// Stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignStyle::Brutalist => "modern_brutalist",
            DesignStyle::Vogue => "editorial_vogue",
            DesignStyle::Minimalist => "minimalist_luxury",
            DesignStyle::Cyberpunk => "cyberpunk_neon",
            DesignStyle::Cinematic => "cinematic_noir",
            DesignStyle::Abstract => "avant_garde",
        }
    }

    /// Catalog entry for this style.
    pub fn preset(&self) -> &'static DesignPreset {
        let index = match self {
            DesignStyle::Brutalist => 0,
            DesignStyle::Vogue => 1,
            DesignStyle::Minimalist => 2,
            DesignStyle::Cyberpunk => 3,
            DesignStyle::Cinematic => 4,
            DesignStyle::Abstract => 5,
        };
        &PRESETS[index]
    }

    /// Descriptor consumed by the generation stage.
    pub fn descriptor(&self) -> StyleDescriptor {
        StyleDescriptor::new(self.preset().prompt_modifier)
    }

    /// The whole catalog.
    pub fn catalog() -> &'static [DesignPreset] {
        &PRESETS
    }
}

impl fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DesignStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "modern_brutalist" | "brutalist" => Ok(DesignStyle::Brutalist),
            "editorial_vogue" | "vogue" => Ok(DesignStyle::Vogue),
            "minimalist_luxury" | "minimalist" => Ok(DesignStyle::Minimalist),
            "cyberpunk_neon" | "cyberpunk" => Ok(DesignStyle::Cyberpunk),
            "cinematic_noir" | "cinematic" => Ok(DesignStyle::Cinematic),
            "avant_garde" | "abstract" => Ok(DesignStyle::Abstract),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown design style: {0}")]
pub struct StyleParseError(String);

/// Opaque style fragment embedded verbatim into prompts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDescriptor(String);

impl StyleDescriptor {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self(descriptor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DesignStyle> for StyleDescriptor {
    fn from(style: DesignStyle) -> Self {
        style.descriptor()
    }
}

/// Output aspect ratio, e.g. 9:16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Vertical cover (9:16)
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// Format as "W:H".
    pub fn as_ratio_string(&self) -> String {
        format!("{}:{}", self.width, self.height)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}
