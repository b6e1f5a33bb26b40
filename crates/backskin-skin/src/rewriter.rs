//! Redirecting view and asset lookups into the active skin.
//!
//! A skin overrides a framework file by shipping it below its own `views/`
//! directory at the same relative path. Every lookup re-checks the disk;
//! nothing is cached here.

use std::rc::Rc;

use backskin_types::error::Result;
use backskin_vfs::{Vfs, join};

use crate::layout::SkinLayout;
use crate::mapper::Skin;

/// Public path prefixes that are already skin-scoped.
pub const RESERVED_PREFIXES: [&str; 2] = ["/themes", "/backendskins"];

/// Rewrites asset and view paths to the active skin's overrides.
#[derive(Clone)]
pub struct AssetPathRewriter {
    vfs: Rc<dyn Vfs>,
    layout: SkinLayout,
}

impl AssetPathRewriter {
    pub fn new(vfs: Rc<dyn Vfs>, layout: SkinLayout) -> Self {
        Self { vfs, layout }
    }

    pub fn layout(&self) -> &SkinLayout {
        &self.layout
    }

    /// Local override file for `path` in `skin`, if the skin has a directory.
    pub fn override_path(&self, path: &str, skin: &Skin) -> Option<String> {
        let root = skin.path()?;
        Some(join(&join(root, "views"), path))
    }

    /// The public path to use for `path`: the skin's copy when
    /// `{skin}/views/{path}` exists, otherwise `path` unchanged.
    pub fn rewrite(&self, path: &str, skin: &Skin) -> Result<String> {
        if RESERVED_PREFIXES.iter().any(|p| path.starts_with(p)) {
            return Ok(path.to_string());
        }
        let (Some(local), Some(public)) = (self.override_path(path, skin), skin.public_path())
        else {
            return Ok(path.to_string());
        };
        if !self.vfs.exists(&local)? {
            return Ok(path.to_string());
        }
        let rewritten = join(&join(public, "views"), path);
        log::debug!("Rewrote '{path}' to '{rewritten}' for skin '{}'", skin.code());
        Ok(rewritten)
    }

    /// Skin-side partials directory for a widget whose own views live in
    /// `widget_view_path`.
    pub fn widget_partials_path(&self, widget_view_path: &str, skin: &Skin) -> Option<String> {
        let relative = self
            .layout
            .relative(widget_view_path)
            .unwrap_or(widget_view_path);
        let views = self.override_path(relative, skin)?;
        Some(join(&views, "partials"))
    }

    /// Register the skin's partials directory on a widget's search paths.
    /// `widget_dir` is the widget's own folder, without `/partials`.
    pub fn extend_view_paths(&self, paths: &mut ViewPaths, widget_dir: &str, skin: &Skin) {
        if let Some(extra) = self.widget_partials_path(widget_dir, skin) {
            paths.add_view_path(extra);
        }
    }
}

/// Ordered view search paths of a widget; earlier paths win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPaths {
    paths: Vec<String>,
}

impl ViewPaths {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            paths: vec![primary.into()],
        }
    }

    /// The widget's own view directory.
    pub fn primary(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }

    /// Append a lower-priority search path. Duplicates are ignored.
    pub fn add_view_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// First search path containing `file`.
    pub fn locate(&self, vfs: &dyn Vfs, file: &str) -> Result<Option<String>> {
        for dir in &self.paths {
            let candidate = join(dir, file);
            if vfs.exists(&candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::SkinPathMapper;
    use crate::probe::SkinDirectoryProbe;
    use backskin_types::DEFAULT_SKIN;
    use backskin_vfs::MemoryVfs;

    fn setup(vfs: MemoryVfs, public_url: &str) -> (AssetPathRewriter, SkinPathMapper) {
        let vfs: Rc<dyn Vfs> = Rc::new(vfs);
        let layout = SkinLayout::new("/app", public_url);
        (
            AssetPathRewriter::new(Rc::clone(&vfs), layout.clone()),
            SkinPathMapper::new(SkinDirectoryProbe::new(vfs, layout)),
        )
    }

    fn blue_vfs() -> MemoryVfs {
        let mut vfs = MemoryVfs::new();
        vfs.touch("/app/backendskins/blue/views/css/style.css").unwrap();
        vfs.touch("/app/backendskins/blue/views/modules/backend/widgets/form/partials/_field.htm")
            .unwrap();
        vfs
    }

    #[test]
    fn rewrites_when_override_exists() {
        let (rw, m) = setup(blue_vfs(), "");
        let skin = m.load("blue").unwrap();
        assert_eq!(
            rw.rewrite("css/style.css", &skin).unwrap(),
            "/backendskins/blue/views/css/style.css"
        );
        assert_eq!(
            rw.rewrite("/css/style.css", &skin).unwrap(),
            "/backendskins/blue/views/css/style.css"
        );
    }

    #[test]
    fn keeps_path_without_override() {
        let (rw, m) = setup(blue_vfs(), "");
        let skin = m.load("blue").unwrap();
        assert_eq!(rw.rewrite("css/other.css", &skin).unwrap(), "css/other.css");
    }

    #[test]
    fn reserved_prefixes_are_never_rewritten() {
        let mut vfs = blue_vfs();
        vfs.touch("/app/backendskins/blue/views/themes/demo/x.css").unwrap();
        vfs.touch("/app/backendskins/blue/views/backendskins/blue/x.css").unwrap();
        let (rw, m) = setup(vfs, "");
        let skin = m.load("blue").unwrap();
        assert_eq!(rw.rewrite("/themes/demo/x.css", &skin).unwrap(), "/themes/demo/x.css");
        assert_eq!(
            rw.rewrite("/backendskins/blue/x.css", &skin).unwrap(),
            "/backendskins/blue/x.css"
        );
    }

    #[test]
    fn unresolved_skin_keeps_path() {
        let (rw, m) = setup(blue_vfs(), "");
        let skin = m.load("ghost").unwrap();
        assert_eq!(rw.rewrite("css/style.css", &skin).unwrap(), "css/style.css");
    }

    #[test]
    fn default_skin_rewrites_into_framework_views() {
        let mut vfs = MemoryVfs::new();
        vfs.touch("/app/modules/backend/views/js/app.js").unwrap();
        let (rw, m) = setup(vfs, "https://cdn.test");
        let skin = m.load(DEFAULT_SKIN).unwrap();
        assert_eq!(
            rw.rewrite("js/app.js", &skin).unwrap(),
            "https://cdn.test/modules/backend/views/js/app.js"
        );
    }

    #[test]
    fn probe_errors_propagate() {
        let mut vfs = blue_vfs();
        vfs.deny("/app/backendskins/blue/views/css/style.css");
        let (rw, m) = setup(vfs, "");
        let skin = m.load("blue").unwrap();
        assert!(rw.rewrite("css/style.css", &skin).is_err());
    }

    #[test]
    fn widget_partials_path_strips_app_root() {
        let (rw, m) = setup(blue_vfs(), "");
        let skin = m.load("blue").unwrap();
        assert_eq!(
            rw.widget_partials_path("/app/modules/backend/widgets/form", &skin)
                .as_deref(),
            Some("/app/backendskins/blue/views/modules/backend/widgets/form/partials")
        );
        assert_eq!(rw.widget_partials_path("/app/x", &m.load("ghost").unwrap()), None);
    }

    #[test]
    fn extended_view_paths_locate_skin_partials() {
        let mut vfs = blue_vfs();
        vfs.touch("/app/modules/backend/widgets/form/partials/_field.htm").unwrap();
        vfs.touch("/app/modules/backend/widgets/form/partials/_label.htm").unwrap();
        let vfs: Rc<dyn Vfs> = Rc::new(vfs);
        let layout = SkinLayout::new("/app", "");
        let rw = AssetPathRewriter::new(Rc::clone(&vfs), layout.clone());
        let skin = SkinPathMapper::new(SkinDirectoryProbe::new(Rc::clone(&vfs), layout))
            .load("blue")
            .unwrap();

        let widget_dir = "/app/modules/backend/widgets/form";
        let mut paths = ViewPaths::new(format!("{widget_dir}/partials"));
        rw.extend_view_paths(&mut paths, widget_dir, &skin);
        rw.extend_view_paths(&mut paths, widget_dir, &skin);
        assert_eq!(
            paths.paths(),
            [
                "/app/modules/backend/widgets/form/partials".to_string(),
                "/app/backendskins/blue/views/modules/backend/widgets/form/partials".to_string(),
            ]
        );

        assert_eq!(
            paths.locate(vfs.as_ref(), "_field.htm").unwrap().as_deref(),
            Some("/app/modules/backend/widgets/form/partials/_field.htm")
        );
        assert_eq!(paths.locate(vfs.as_ref(), "_none.htm").unwrap(), None);
    }

    #[test]
    fn skin_partials_searched_before_framework_when_first() {
        let mut vfs = blue_vfs();
        vfs.touch("/app/modules/backend/widgets/form/partials/_field.htm").unwrap();
        vfs.touch("/app/modules/backend/widgets/form/partials/_label.htm").unwrap();
        let vfs: Rc<dyn Vfs> = Rc::new(vfs);
        let layout = SkinLayout::new("/app", "");
        let rw = AssetPathRewriter::new(Rc::clone(&vfs), layout.clone());
        let skin = SkinPathMapper::new(SkinDirectoryProbe::new(Rc::clone(&vfs), layout))
            .load("blue")
            .unwrap();

        let widget_dir = "/app/modules/backend/widgets/form";
        let skin_partials = rw.widget_partials_path(widget_dir, &skin).unwrap();
        let mut paths = ViewPaths::new(skin_partials);
        paths.add_view_path(format!("{widget_dir}/partials"));
        assert_eq!(
            paths.locate(vfs.as_ref(), "_field.htm").unwrap().as_deref(),
            Some("/app/backendskins/blue/views/modules/backend/widgets/form/partials/_field.htm")
        );
        assert_eq!(
            paths.locate(vfs.as_ref(), "_label.htm").unwrap().as_deref(),
            Some("/app/modules/backend/widgets/form/partials/_label.htm")
        );
    }

    #[test]
    fn unresolved_skin_adds_no_view_path() {
        let (rw, m) = setup(blue_vfs(), "");
        let mut paths = ViewPaths::new("/app/modules/backend/widgets/form/partials");
        let ghost = m.load("ghost").unwrap();
        rw.extend_view_paths(&mut paths, "/app/modules/backend/widgets/form", &ghost);
        assert_eq!(paths.paths().len(), 1);
        assert_eq!(
            paths.primary(),
            Some("/app/modules/backend/widgets/form/partials")
        );
    }
}
