use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to read form {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse form {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize form: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write form {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Form is invalid: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigStyle {
    #[serde(rename = "style-1")]
    Style1,
    #[serde(rename = "style-2")]
    Style2,
    #[serde(rename = "style-3")]
    Style3,
    #[serde(rename = "accordion-style-1")]
    AccordionStyle1,
    #[default]
    #[serde(rename = "accordion-style-2")]
    AccordionStyle2,
    Popover,
}

impl ConfigStyle {
    pub const ALL: [ConfigStyle; 6] = [
        ConfigStyle::Style1,
        ConfigStyle::Style2,
        ConfigStyle::Style3,
        ConfigStyle::AccordionStyle1,
        ConfigStyle::AccordionStyle2,
        ConfigStyle::Popover,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigStyle::Style1 => "Style 1",
            ConfigStyle::Style2 => "Style 2",
            ConfigStyle::Style3 => "Style 3",
            ConfigStyle::AccordionStyle1 => "Accordion Style 1",
            ConfigStyle::AccordionStyle2 => "Accordion Style 2",
            ConfigStyle::Popover => "Popover",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ConfigStyle::Style1 => "style-1",
            ConfigStyle::Style2 => "style-2",
            ConfigStyle::Style3 => "style-3",
            ConfigStyle::AccordionStyle1 => "accordion-style-1",
            ConfigStyle::AccordionStyle2 => "accordion-style-2",
            ConfigStyle::Popover => "popover",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    GetAQuoteForm,
    #[default]
    CartForm,
    ContactForm,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [
        FormKind::GetAQuoteForm,
        FormKind::CartForm,
        FormKind::ContactForm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormKind::GetAQuoteForm => "Get a Quote Form",
            FormKind::CartForm => "Cart Form",
            FormKind::ContactForm => "Contact Form",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            FormKind::GetAQuoteForm => "get-a-quote-form",
            FormKind::CartForm => "cart-form",
            FormKind::ContactForm => "contact-form",
        }
    }
}

/// `Background` or `Motif 1` through `Motif 10`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum MotifNumber {
    #[default]
    Background,
    Motif(u8),
}

impl MotifNumber {
    pub const MAX_MOTIF: u8 = 10;

    pub fn all() -> impl Iterator<Item = MotifNumber> {
        std::iter::once(MotifNumber::Background).chain((1..=Self::MAX_MOTIF).map(MotifNumber::Motif))
    }
}

impl fmt::Display for MotifNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotifNumber::Background => write!(f, "Background"),
            MotifNumber::Motif(n) => write!(f, "Motif {}", n),
        }
    }
}

impl TryFrom<String> for MotifNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("background") {
            return Ok(MotifNumber::Background);
        }
        let number = trimmed
            .strip_prefix("Motif")
            .map(str::trim)
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=Self::MAX_MOTIF).contains(n));
        number
            .map(MotifNumber::Motif)
            .ok_or_else(|| format!("unknown motif number '{}'", value))
    }
}

impl From<MotifNumber> for String {
    fn from(value: MotifNumber) -> Self {
        value.to_string()
    }
}

/// One repeatable "Section N" block of the form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SectionRecord {
    pub motif: String,
    pub motif_number: MotifNumber,
    /// Upload folder, `YYYY/MM`.
    pub date: String,
    /// Sample color used for the preview URL.
    pub color: String,
    pub width: String,
    pub height: String,
    pub product_type: String,
}

impl SectionRecord {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((parse_dimension(&self.width)?, parse_dimension(&self.height)?))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GroupLayerSettings {
    pub required: bool,
    pub hide_control: bool,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

impl Default for GroupLayerSettings {
    fn default() -> Self {
        Self {
            required: true,
            hide_control: true,
            image_url: String::new(),
            width: 2437,
            height: 2560,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct FormData {
    pub name: String,
    pub style: ConfigStyle,
    pub custom_css: String,
    pub custom_js: String,
    pub form: FormKind,
    pub base_price: String,
    pub group_layer: GroupLayerSettings,
    #[serde(rename = "section")]
    pub sections: Vec<SectionRecord>,
}

fn date_regex() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"^\d{4}/(0[1-9]|1[0-2])$").expect("date pattern is valid"))
}

fn price_regex() -> &'static Regex {
    static PRICE: OnceLock<Regex> = OnceLock::new();
    PRICE.get_or_init(|| Regex::new(r"^\d+([.,]\d{1,2})?$").expect("price pattern is valid"))
}

fn parse_dimension(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

pub fn is_valid_date(date: &str) -> bool {
    date_regex().is_match(date.trim())
}

impl FormData {
    pub fn load(file_path: &Path) -> Result<Self, FormError> {
        let contents = fs::read_to_string(file_path).map_err(|source| FormError::Read {
            path: file_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| FormError::Parse {
            path: file_path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, file_path: &Path) -> Result<(), FormError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(file_path, contents).map_err(|source| FormError::Write {
            path: file_path.to_path_buf(),
            source,
        })
    }

    /// A filled-in starting point for a new form file.
    pub fn template() -> Self {
        Self {
            name: "My Configurator".to_string(),
            base_price: "0".to_string(),
            group_layer: GroupLayerSettings {
                image_url: format!("{}/2025/01/base-layer.png", crate::config::DEFAULT_BASE_URL),
                ..GroupLayerSettings::default()
            },
            sections: vec![SectionRecord {
                motif: "Carreau Ciment".to_string(),
                motif_number: MotifNumber::Background,
                date: "2025/01".to_string(),
                width: "2437".to_string(),
                height: "2560".to_string(),
                product_type: "Tapis".to_string(),
                ..SectionRecord::default()
            }],
            ..Self::default()
        }
    }

    pub fn add_section(&mut self) -> usize {
        self.sections.push(SectionRecord::default());
        self.sections.len()
    }

    /// Collects every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), FormError> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("configurator name is empty".to_string());
        }
        if !price_regex().is_match(self.base_price.trim()) {
            problems.push(format!("base price '{}' is not a valid amount", self.base_price));
        }
        if self.group_layer.image_url.trim().is_empty() {
            problems.push("group layer image URL is empty".to_string());
        }
        if self.group_layer.width == 0 || self.group_layer.height == 0 {
            problems.push("group layer image size must be positive".to_string());
        }

        for (i, section) in self.sections.iter().enumerate() {
            let label = format!("section {}", i + 1);
            if section.motif.trim().is_empty() {
                problems.push(format!("{}: motif name is empty", label));
            }
            if !is_valid_date(&section.date) {
                problems.push(format!("{}: date '{}' is not YYYY/MM", label, section.date));
            }
            if parse_dimension(&section.width).is_none() {
                problems.push(format!("{}: width '{}' is not a positive integer", label, section.width));
            }
            if parse_dimension(&section.height).is_none() {
                problems.push(format!("{}: height '{}' is not a positive integer", label, section.height));
            }
            if section.product_type.trim().is_empty() {
                problems.push(format!("{}: product type is empty", label));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_valid() {
        FormData::template().validate().unwrap();
    }

    #[test]
    fn validation_lists_every_problem() {
        let mut form = FormData::default();
        form.add_section();
        let problems = match form.validate().unwrap_err() {
            FormError::Invalid(problems) => problems,
            other => panic!("expected Invalid, got {:?}", other),
        };
        assert!(problems.iter().any(|p| p.contains("configurator name")));
        assert!(problems.iter().any(|p| p.contains("section 1: date")));
        assert!(problems.iter().any(|p| p.contains("section 1: width")));
        assert!(problems.iter().any(|p| p.contains("section 1: product type")));
    }

    #[test]
    fn date_must_be_year_and_month() {
        assert!(is_valid_date("2024/03"));
        assert!(is_valid_date(" 2024/12 "));
        assert!(!is_valid_date("2024/13"));
        assert!(!is_valid_date("2024-03"));
        assert!(!is_valid_date("24/03"));
    }

    #[test]
    fn base_price_accepts_decimal_amounts() {
        let mut form = FormData::template();
        for ok in ["0", "49", "49.9", "49,90"] {
            form.base_price = ok.to_string();
            assert!(form.validate().is_ok(), "{}", ok);
        }
        form.base_price = "-3".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn motif_number_parses_labels() {
        assert_eq!(MotifNumber::try_from("Background".to_string()), Ok(MotifNumber::Background));
        assert_eq!(MotifNumber::try_from("Motif 7".to_string()), Ok(MotifNumber::Motif(7)));
        assert!(MotifNumber::try_from("Motif 11".to_string()).is_err());
        assert_eq!(MotifNumber::all().count(), 11);
        assert_eq!(MotifNumber::Motif(3).to_string(), "Motif 3");
    }

    #[test]
    fn toml_round_trip_keeps_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.toml");
        let mut form = FormData::template();
        form.style = ConfigStyle::Popover;
        form.form = FormKind::ContactForm;
        form.sections[0].motif_number = MotifNumber::Motif(2);
        form.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("style = \"popover\""));
        assert!(text.contains("form = \"contact-form\""));
        assert!(text.contains("motif_number = \"Motif 2\""));
        assert_eq!(FormData::load(&path).unwrap(), form);

        form.style = ConfigStyle::AccordionStyle2;
        form.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("style = \"accordion-style-2\""));
        assert_eq!(FormData::load(&path).unwrap().style, ConfigStyle::AccordionStyle2);
    }

    #[test]
    fn style_serializes_as_its_slug() {
        for style in ConfigStyle::ALL {
            let json = serde_json::to_string(&style).unwrap();
            assert_eq!(json, format!("\"{}\"", style.slug()));
            assert_eq!(serde_json::from_str::<ConfigStyle>(&json).unwrap(), style);
        }
    }

    #[test]
    fn defaults_match_the_form_widgets() {
        let form = FormData::default();
        assert_eq!(form.style.label(), "Accordion Style 2");
        assert_eq!(form.form.label(), "Cart Form");
        assert!(form.group_layer.required);
        assert!(form.group_layer.hide_control);
        assert_eq!(SectionRecord::default().motif_number, MotifNumber::Background);
    }
}
