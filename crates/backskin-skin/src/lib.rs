//! Backend skin system.
//!
//! A skin is a directory of view and asset overrides for the backend UI.
//! Skins live under `{app_root}/backendskins/{code}` or
//! `{app_root}/themes/{code}/backend`; the built-in skin
//! ([`DEFAULT_SKIN`]) maps to the framework's own `modules/backend`.
//!
//! Resolution order for the active skin:
//! 1. `_skin` query parameter (also queues the `backend_skin` cookie)
//! 2. `backend_skin` cookie
//! 3. Stored setting (a skin code, or [`FRONTEND_SENTINEL`])
//! 4. Static configuration, then the active front-end theme
//! 5. [`DEFAULT_SKIN`]

pub mod catalog;
mod layout;
mod mapper;
mod probe;
pub mod request;
pub mod resolver;
pub mod rewriter;
pub mod settings;
pub mod themes;

pub use backskin_types::DEFAULT_SKIN;
pub use catalog::SkinCatalog;
pub use layout::SkinLayout;
pub use mapper::{Skin, SkinPathMapper};
pub use probe::SkinDirectoryProbe;
pub use request::{Cookie, RequestContext};
pub use resolver::{ActiveSkinResolver, SkinChanged, SkinListener, SkinSource, Step};
pub use rewriter::{AssetPathRewriter, ViewPaths};
pub use settings::{MemorySettings, SettingStore, TomlSettings};
pub use themes::{FrontendThemes, StaticThemes, ThemeDirectory, ThemeInfo};

/// Stored-setting value meaning "use the public site's active theme".
pub const FRONTEND_SENTINEL: &str = "--frontend--";
