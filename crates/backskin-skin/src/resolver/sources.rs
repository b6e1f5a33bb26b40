//! The precedence steps of active skin resolution.

use backskin_types::DEFAULT_SKIN;
use backskin_types::error::Result;

use crate::FRONTEND_SENTINEL;
use crate::request::{Cookie, SKIN_COOKIE, SKIN_COOKIE_TTL, SKIN_QUERY_PARAM};
use crate::settings::{LEGACY_PARAMETER, THEME_SETTING};

use super::{ResolveContext, SkinSource, Step};

/// `_skin` query parameter. Adopted without an existence check and
/// remembered in the skin cookie.
pub struct RequestOverride;

impl SkinSource for RequestOverride {
    fn name(&self) -> &str {
        "request"
    }

    fn resolve(&self, cx: &mut ResolveContext<'_>) -> Result<Step> {
        let Some(code) = cx.request.query(SKIN_QUERY_PARAM).map(str::to_string) else {
            return Ok(Step::Defer);
        };
        cx.request.forget_cookie(SKIN_COOKIE);
        cx.request.queue_cookie(Cookie {
            name: SKIN_COOKIE.to_string(),
            value: code.clone(),
            max_age: SKIN_COOKIE_TTL,
        });
        Ok(Step::Resolved(code))
    }
}

/// `backend_skin` cookie. Adopted without an existence check.
pub struct CookieSkin;

impl SkinSource for CookieSkin {
    fn name(&self) -> &str {
        "cookie"
    }

    fn resolve(&self, cx: &mut ResolveContext<'_>) -> Result<Step> {
        Ok(match cx.request.cookie(SKIN_COOKIE) {
            Some(code) => Step::Resolved(code.to_string()),
            None => Step::Defer,
        })
    }
}

/// The persisted setting, when a setting store is available.
pub struct StoredSetting;

impl SkinSource for StoredSetting {
    fn name(&self) -> &str {
        "setting"
    }

    fn resolve(&self, cx: &mut ResolveContext<'_>) -> Result<Step> {
        let Some(settings) = cx.settings else {
            return Ok(Step::Defer);
        };
        let stored = match settings.get(THEME_SETTING)? {
            Some(value) => Some(value),
            None => settings.get(LEGACY_PARAMETER)?,
        };
        let Some(value) = stored else {
            return Ok(Step::Defer);
        };
        cx.setting_read = true;

        if value == FRONTEND_SENTINEL {
            if let Some(code) = cx.themes.active_theme_code() {
                if cx.probe.exists(&code)? {
                    return Ok(Step::Resolved(code));
                }
                log::debug!("Front-end theme '{code}' has no backend skin");
            }
            return Ok(Step::Defer);
        }

        if value != DEFAULT_SKIN {
            if cx.probe.exists(&value)? {
                return Ok(Step::Resolved(value));
            }
            log::warn!("Stored skin '{value}' not found on disk");
        }
        Ok(Step::Defer)
    }
}

/// Static configuration, then the front-end theme. Skipped once a stored
/// setting has been read.
pub struct StaticConfig;

impl SkinSource for StaticConfig {
    fn name(&self) -> &str {
        "config"
    }

    fn resolve(&self, cx: &mut ResolveContext<'_>) -> Result<Step> {
        if cx.setting_read {
            return Ok(Step::Defer);
        }
        if cx.configured != DEFAULT_SKIN {
            if cx.probe.exists(cx.configured)? {
                return Ok(Step::Resolved(cx.configured.to_string()));
            }
            log::warn!("Configured skin '{}' not found on disk", cx.configured);
        }
        if let Some(code) = cx.themes.active_theme_code() {
            if cx.probe.exists(&code)? {
                return Ok(Step::Resolved(code));
            }
        }
        Ok(Step::Defer)
    }
}
