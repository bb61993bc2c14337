// Style templates prepended to every prompt

pub const DEFAULT_STYLE: &str = "anime";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Anime,
    Pixel,
    Vintage,
}

impl Style {
    // Unknown names fall back to anime instead of failing
    pub fn from_param(name: &str) -> Self {
        match name {
            "pixel" => Style::Pixel,
            "vintage" => Style::Vintage,
            _ => Style::Anime,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Anime => "anime",
            Style::Pixel => "pixel",
            Style::Vintage => "vintage",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Style::Anime => {
                "anime illustration, detailed eyes, vibrant colors, manga style, professional artwork, high quality, 4k"
            }
            Style::Pixel => {
                "pixel art, 8-bit, 16-bit retro game style, isometric, colorful, detailed, video game aesthetic"
            }
            Style::Vintage => {
                "vintage polaroid photo, 1970s, film grain, warm colors, nostalgic, faded, aged photo, retro"
            }
        }
    }
}

// Template alone when the user gave no extra text
pub fn compose_prompt(style: Style, user_prompt: &str) -> String {
    if user_prompt.is_empty() {
        style.template().to_string()
    } else {
        format!("{}. {}", style.template(), user_prompt)
    }
}

// Char-safe prefix used for log lines
pub fn truncate_for_log(prompt: &str, max_chars: usize) -> &str {
    match prompt.char_indices().nth(max_chars) {
        Some((idx, _)) => &prompt[..idx],
        None => prompt,
    }
}
