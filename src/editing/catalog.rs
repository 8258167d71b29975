// Prompt catalog - named edit instructions grouped by category

use super::types::Language;

/// A named edit instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub id: &'static str,
    pub english: &'static str,
    pub persian: &'static str,
}

impl Prompt {
    const fn new(id: &'static str, english: &'static str, persian: &'static str) -> Self {
        Self { id, english, persian }
    }

    /// Text sent to the edit service
    pub fn instruction(&self) -> &'static str {
        self.english
    }

    pub fn display_text(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.english,
            Language::Fa => self.persian,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptCategory {
    pub name: &'static str,
    pub prompts: &'static [Prompt],
}

pub const PROMPT_CATEGORIES: &[PromptCategory] = &[
    PromptCategory {
        name: "Filters & Color",
        prompts: &[
            Prompt::new("cinematic_teal_orange", "Apply a cinematic teal and orange color grade", "اعمال فیلتر رنگی سینمایی (آبی و نارنجی)"),
            Prompt::new("moody_dark", "Create a moody, dark, and atmospheric tone", "ایجاد تم تیره و اتمسفریک"),
            Prompt::new("vibrant", "Boost colors to be more vibrant and saturated", "افزایش شادابی و اشباع رنگ‌ها"),
            Prompt::new("pastel_dream", "Transform colors to a soft, pastel dream-like palette", "تبدیل به پالت رنگی پاستلی و رویایی"),
            Prompt::new("sepia", "Apply a classic sepia tone filter", "اعمال فیلتر کلاسیک سپیا"),
            Prompt::new("faded_film", "Give the image a faded, vintage film look", "ایجاد ظاهر فیلم قدیمی و رنگ‌پریده"),
            Prompt::new("bw_dramatic", "Convert to a high-contrast, dramatic black and white", "تبدیل به سیاه و سفید دراماتیک با کنتراست بالا"),
        ],
    },
    PromptCategory {
        name: "Lighting Effects",
        prompts: &[
            Prompt::new("golden_hour", "Add a warm, golden hour glow", "افزودن درخشش گرم ساعت طلایی"),
            Prompt::new("studio_lighting", "Apply dramatic, professional studio lighting", "اعمال نورپردازی استودیویی حرفه‌ای و دراماتیک"),
            Prompt::new("soft_backlight", "Introduce a soft backlight to create a halo effect", "ایجاد نور پس‌زمینه نرم (افکت هاله)"),
            Prompt::new("neon_noir", "Give it a neon-noir aesthetic with pink and blue lights", "ایجاد زیبایی‌شناسی نئون-نوآر با نورهای صورتی و آبی"),
            Prompt::new("rim_lighting", "Add rim lighting to outline the subject", "افزودن نور حاشیه‌ای برای برجسته‌سازی سوژه"),
        ],
    },
    PromptCategory {
        name: "Artistic Styles",
        prompts: &[
            Prompt::new("watercolor", "Transform into a watercolor painting", "تبدیل به نقاشی آبرنگ"),
            Prompt::new("oil_painting", "Transform into a classic oil painting", "تبدیل به نقاشی رنگ روغن کلاسیک"),
            Prompt::new("sketch", "Convert the image to a pencil sketch", "تبدیل به طراحی با مداد"),
            Prompt::new("comic_book", "Apply a comic book art style", "اعمال استایل کتاب کمیک"),
            Prompt::new("impressionist", "Give it an impressionist painting style", "ایجاد استایل نقاشی امپرسیونیستی"),
            Prompt::new("pop_art", "Reimagine the image in a pop art style", "بازآفرینی به سبک پاپ آرت"),
        ],
    },
    PromptCategory {
        name: "Fixes & Enhancements",
        prompts: &[
            Prompt::new("enhance_details", "Increase sharpness and enhance fine details", "افزایش وضوح و بهبود جزئیات"),
            Prompt::new("remove_noise", "Reduce image noise and grain", "کاهش نویز و گرین تصویر"),
            Prompt::new("color_correct", "Automatically correct the color balance", "اصلاح خودکار توازن رنگ"),
            Prompt::new("improve_composition", "Improve the composition by cropping and reframing", "بهبود ترکیب‌بندی با کراپ و قاب‌بندی مجدد"),
            Prompt::new("add_vignette", "Add a subtle, dark vignette around the edges", "افزودن وینیت تیره و ملایم در لبه‌ها"),
            Prompt::new("remove_background", "Remove the background, keeping only the main subject", "حذف پس‌زمینه"),
        ],
    },
];

/// One-click "make it look professional" prompt
pub const ANALYZE_PROMPT: Prompt = Prompt::new(
    "analyze",
    "Analyze this image and apply professional-grade edits to enhance its quality for use on a website or social media profile. Improve lighting, color balance, and overall composition.",
    "این عکس را آنالیز کن و بهترین ادیت را برای استفاده در وبسایت یا پروفایل اعمال کن",
);

pub fn all_prompts() -> impl Iterator<Item = &'static Prompt> {
    PROMPT_CATEGORIES
        .iter()
        .flat_map(|c| c.prompts.iter())
        .chain(std::iter::once(&ANALYZE_PROMPT))
}

pub fn find(id: &str) -> Option<&'static Prompt> {
    all_prompts().find(|p| p.id == id)
}

/// Instruction for a catalog id, or the input itself as free text
pub fn resolve_instruction(input: &str) -> String {
    let input = input.trim();
    match find(input) {
        Some(prompt) => prompt.instruction().to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: Vec<_> = all_prompts().map(|p| p.id).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn test_find_by_id() {
        let sepia = find("sepia").unwrap();
        assert_eq!(sepia.instruction(), "Apply a classic sepia tone filter");
        assert_eq!(sepia.display_text(Language::Fa), "اعمال فیلتر کلاسیک سپیا");
        assert!(find("analyze").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_resolve_free_text() {
        assert_eq!(resolve_instruction(" sepia "), "Apply a classic sepia tone filter");
        assert_eq!(resolve_instruction("make the sky purple"), "make the sky purple");
    }

    #[test]
    fn test_every_prompt_has_both_languages() {
        for prompt in all_prompts() {
            assert!(!prompt.english.is_empty(), "{} missing english", prompt.id);
            assert!(!prompt.persian.is_empty(), "{} missing persian", prompt.id);
        }
    }
}
