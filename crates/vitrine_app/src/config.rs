//! Page configuration
//!
//! Loaded from a TOML file; every section and key is optional.
//!
//! ```toml
//! [accordion]
//! duration_ms = 250
//! easing = "cubic-bezier(0.4, 0, 0.2, 1)"
//!
//! [header]
//! selector = ".site-header"
//! delay_stop_ms = 800
//!
//! [form]
//! endpoint = "https://example.com/mailer/sendmail.php"
//!
//! [[slider]]
//! selector = ".price-filter"
//! views = ["#price-from", "#price-to"]
//! ```

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vitrine_animation::Easing;
use vitrine_widgets::{AccordionOptions, FormMessages, HeaderScrollOptions, SliderOptions};

/// Complete page configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VitrineConfig {
    pub accordion: AccordionConfig,
    pub header: HeaderConfig,
    pub form: FormConfig,
    #[serde(rename = "slider")]
    pub sliders: Vec<SliderConfig>,
    pub page: PageConfig,
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            accordion: AccordionConfig::default(),
            header: HeaderConfig::default(),
            form: FormConfig::default(),
            sliders: vec![SliderConfig::default()],
            page: PageConfig::default(),
        }
    }
}

impl VitrineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: VitrineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Reject durations and sizes no widget can work with
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("accordion.duration_ms", f64::from(self.accordion.duration_ms)),
            ("header.delay_stop_ms", self.header.delay_stop_ms),
            ("header.throttle_ms", self.header.throttle_ms),
            ("form.status_hide_delay_ms", self.form.status_hide_delay_ms),
        ];
        for (key, value) in durations {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{key} must be a non-negative number of milliseconds, got {value}"
            );
        }
        for (index, slider) in self.sliders.iter().enumerate() {
            ensure!(
                slider.thumb_size.is_finite() && slider.thumb_size > 0.0,
                "slider[{index}].thumb_size must be positive, got {}",
                slider.thumb_size
            );
        }
        Ok(())
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccordionConfig {
    pub duration_ms: f32,
    /// CSS timing function
    pub easing: Easing,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        let options = AccordionOptions::default();
        Self {
            duration_ms: options.duration_ms,
            easing: options.easing,
        }
    }
}

impl AccordionConfig {
    pub fn options(&self) -> AccordionOptions {
        AccordionOptions {
            duration_ms: self.duration_ms,
            easing: self.easing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub enabled: bool,
    pub selector: String,
    pub class_scroll: String,
    pub class_scroll_down: String,
    pub class_scroll_up: String,
    pub class_scroll_stop: String,
    pub delay_stop_ms: f64,
    pub throttle_ms: f64,
    /// Defaults to the header's height
    pub start_scroll: Option<f32>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        let options = HeaderScrollOptions::default();
        Self {
            enabled: true,
            selector: options.selector,
            class_scroll: options.class_scroll,
            class_scroll_down: options.class_scroll_down,
            class_scroll_up: options.class_scroll_up,
            class_scroll_stop: options.class_scroll_stop,
            delay_stop_ms: options.delay_stop_ms,
            throttle_ms: options.throttle_ms,
            start_scroll: options.start_scroll,
        }
    }
}

impl HeaderConfig {
    pub fn options(&self) -> HeaderScrollOptions {
        HeaderScrollOptions {
            selector: self.selector.clone(),
            class_scroll: self.class_scroll.clone(),
            class_scroll_down: self.class_scroll_down.clone(),
            class_scroll_up: self.class_scroll_up.clone(),
            class_scroll_stop: self.class_scroll_stop.clone(),
            delay_stop_ms: self.delay_stop_ms,
            throttle_ms: self.throttle_ms,
            start_scroll: self.start_scroll,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Mail endpoint URL
    pub endpoint: String,
    pub success_message: String,
    pub error_message: String,
    pub status_hide_delay_ms: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        let messages = FormMessages::default();
        Self {
            endpoint: "mailer/sendmail.php".to_string(),
            success_message: messages.success,
            error_message: messages.error,
            status_hide_delay_ms: messages.hide_delay_ms,
        }
    }
}

impl FormConfig {
    pub fn messages(&self) -> FormMessages {
        FormMessages {
            success: self.success_message.clone(),
            error: self.error_message.clone(),
            hide_delay_ms: self.status_hide_delay_ms,
        }
    }
}

/// One range slider mount point
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SliderConfig {
    pub selector: String,
    /// Per-thumb view selectors
    pub views: Vec<String>,
    pub thumb_size: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            selector: ".range-slider".to_string(),
            views: Vec::new(),
            thumb_size: SliderOptions::default().thumb_size,
        }
    }
}

impl SliderConfig {
    pub fn options(&self) -> SliderOptions {
        SliderOptions {
            views: self.views.clone(),
            thumb_size: self.thumb_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Selector for accordion group containers
    pub group_selector: String,
    /// Open the first item of the first group on load
    pub open_first_group_item: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            group_selector: "[data-spollers]".to_string(),
            open_first_group_item: true,
        }
    }
}
