//! Enumerating the skins an operator can choose from.

use std::collections::BTreeMap;

use backskin_types::DEFAULT_SKIN;
use backskin_types::error::Result;

use crate::FRONTEND_SENTINEL;
use crate::probe::SkinDirectoryProbe;
use crate::themes::FrontendThemes;

/// Label of the "mirror front-end" option.
pub const FRONTEND_LABEL: &str = "Force same with Active FrontEnd Theme";

/// Label of the built-in skin.
pub const DEFAULT_LABEL: &str = "Default backend skin";

/// Skin listing for settings forms and the CLI.
pub struct SkinCatalog<'a> {
    probe: &'a SkinDirectoryProbe,
    themes: &'a dyn FrontendThemes,
}

impl<'a> SkinCatalog<'a> {
    pub fn new(probe: &'a SkinDirectoryProbe, themes: &'a dyn FrontendThemes) -> Self {
        Self { probe, themes }
    }

    /// Every directory under `backendskins`, labelled from its code, plus
    /// every front-end theme labelled with its name.
    pub fn available(&self) -> Result<BTreeMap<String, String>> {
        let mut skins = BTreeMap::new();
        let vfs = self.probe.vfs();
        for code in vfs.subdirs(&self.probe.layout().skins_dir())? {
            let label = title_label(&code);
            skins.insert(code, label);
        }
        for theme in self.themes.themes()? {
            skins.insert(theme.code, theme.name);
        }
        Ok(skins)
    }

    /// Options for the skin setting: the sentinel, the built-in skin, then
    /// [`available`](Self::available). Later labels replace earlier ones
    /// for the same code without moving it.
    pub fn theme_options(&self) -> Result<Vec<(String, String)>> {
        let mut options = vec![
            (FRONTEND_SENTINEL.to_string(), FRONTEND_LABEL.to_string()),
            (DEFAULT_SKIN.to_string(), DEFAULT_LABEL.to_string()),
        ];
        for (code, label) in self.available()? {
            match options.iter_mut().find(|(c, _)| *c == code) {
                Some(existing) => existing.1 = label,
                None => options.push((code, label)),
            }
        }
        Ok(options)
    }
}

/// `my-cool_skin` -> `My Cool_skin`: title-case each word, then turn dashes
/// into spaces.
fn title_label(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut word_start = true;
    for ch in code.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '\'' {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out.replace('-', " ")
}
