//! Active skin resolution.
//!
//! The active skin code is decided by an ordered chain of [`SkinSource`]s.
//! Each either resolves a code or defers to the next one; when every source
//! defers the built-in skin wins, so resolution never comes up empty. The
//! resulting [`Skin`] is cached on the resolver until [`reset_cache`] or
//! [`set_active`] is called.
//!
//! [`reset_cache`]: ActiveSkinResolver::reset_cache
//! [`set_active`]: ActiveSkinResolver::set_active

mod sources;

pub use sources::{CookieSkin, RequestOverride, StaticConfig, StoredSetting};

use backskin_types::DEFAULT_SKIN;
use backskin_types::error::{BackskinError, Result};

use crate::mapper::{Skin, SkinPathMapper};
use crate::probe::SkinDirectoryProbe;
use crate::request::RequestContext;
use crate::settings::{SettingStore, THEME_SETTING};
use crate::themes::FrontendThemes;

/// Outcome of one precedence step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// This step decided the active skin code.
    Resolved(String),
    /// Let the next step decide.
    Defer,
}

/// Everything a precedence step may consult.
pub struct ResolveContext<'a> {
    pub request: &'a mut RequestContext,
    pub probe: &'a SkinDirectoryProbe,
    /// `None` when no setting storage is available.
    pub settings: Option<&'a dyn SettingStore>,
    pub themes: &'a dyn FrontendThemes,
    /// Skin code from static configuration.
    pub configured: &'a str,
    /// Set by the stored-setting step once a value has been read.
    pub setting_read: bool,
}

/// One step of the precedence chain.
pub trait SkinSource {
    fn name(&self) -> &str;

    fn resolve(&self, cx: &mut ResolveContext<'_>) -> Result<Step>;
}

/// Payload of the `skin.changed` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinChanged {
    pub code: String,
}

impl SkinChanged {
    pub const NAME: &'static str = "skin.changed";
}

/// Observer notified when the active skin is changed explicitly.
pub trait SkinListener {
    fn skin_changed(&self, event: &SkinChanged);
}

impl<F: Fn(&SkinChanged)> SkinListener for F {
    fn skin_changed(&self, event: &SkinChanged) {
        self(event)
    }
}

/// The default precedence chain.
pub fn default_sources() -> Vec<Box<dyn SkinSource>> {
    vec![
        Box::new(RequestOverride),
        Box::new(CookieSkin),
        Box::new(StoredSetting),
        Box::new(StaticConfig),
    ]
}

/// Determines and caches the active skin.
pub struct ActiveSkinResolver {
    mapper: SkinPathMapper,
    settings: Option<Box<dyn SettingStore>>,
    themes: Box<dyn FrontendThemes>,
    configured: String,
    sources: Vec<Box<dyn SkinSource>>,
    listeners: Vec<Box<dyn SkinListener>>,
    cache: Option<Skin>,
}

impl ActiveSkinResolver {
    /// A resolver with the default chain and no setting storage.
    pub fn new(
        mapper: SkinPathMapper,
        themes: Box<dyn FrontendThemes>,
        configured: impl Into<String>,
    ) -> Self {
        Self {
            mapper,
            settings: None,
            themes,
            configured: configured.into(),
            sources: default_sources(),
            listeners: Vec::new(),
            cache: None,
        }
    }

    /// Attach setting storage (the "database is available" case).
    pub fn with_settings(mut self, settings: Box<dyn SettingStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Replace the precedence chain.
    pub fn with_sources(mut self, sources: Vec<Box<dyn SkinSource>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn add_listener(&mut self, listener: impl SkinListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn mapper(&self) -> &SkinPathMapper {
        &self.mapper
    }

    pub fn settings(&self) -> Option<&dyn SettingStore> {
        self.settings.as_deref()
    }

    /// Run the precedence chain for this request.
    pub fn resolve_active_code(&self, request: &mut RequestContext) -> Result<String> {
        let mut cx = ResolveContext {
            request,
            probe: self.mapper.probe(),
            settings: self.settings.as_deref(),
            themes: self.themes.as_ref(),
            configured: &self.configured,
            setting_read: false,
        };
        for source in &self.sources {
            if let Step::Resolved(code) = source.resolve(&mut cx)? {
                log::debug!("Active skin '{code}' from {}", source.name());
                return Ok(code);
            }
        }
        log::debug!("Active skin '{DEFAULT_SKIN}' by default");
        Ok(DEFAULT_SKIN.to_string())
    }

    /// The active skin, resolved on first use and cached afterwards.
    pub fn get_active(&mut self, request: &mut RequestContext) -> Result<&Skin> {
        let skin = match self.cache.take() {
            Some(skin) => skin,
            None => {
                let code = self.resolve_active_code(request)?;
                self.mapper.load(&code)?
            },
        };
        Ok(self.cache.insert(skin))
    }

    /// Persist `code` as the active skin and notify listeners.
    pub fn set_active(&mut self, code: &str) -> Result<()> {
        self.reset_cache();
        let settings = self.settings.as_mut().ok_or_else(|| {
            BackskinError::Settings("no setting storage available".to_string())
        })?;
        settings.set(THEME_SETTING, code)?;
        log::info!("Active skin set to '{code}'");

        let event = SkinChanged {
            code: code.to_string(),
        };
        for listener in &self.listeners {
            listener.skin_changed(&event);
        }
        Ok(())
    }

    /// Drop the cached skin so the next [`get_active`](Self::get_active)
    /// resolves again.
    pub fn reset_cache(&mut self) {
        self.cache = None;
    }
}
