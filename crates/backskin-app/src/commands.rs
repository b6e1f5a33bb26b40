//! Command parsing and execution for the `backskin` binary.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use backskin_assets::{AssetCollector, CollectorOptions, StaticVersions};
use backskin_skin::request::{SKIN_COOKIE, SKIN_QUERY_PARAM};
use backskin_skin::{
    ActiveSkinResolver, AssetPathRewriter, FRONTEND_SENTINEL, RequestContext, SettingStore,
    SkinCatalog, SkinDirectoryProbe, SkinLayout, SkinPathMapper, ThemeDirectory,
};
use backskin_types::DEFAULT_SKIN;
use backskin_types::config::BackskinConfig;
use backskin_vfs::Vfs;

/// Backend skin administration.
#[derive(Parser, Debug)]
#[command(name = "backskin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (defaults apply when omitted)
    #[arg(long, global = true, env = "BACKSKIN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the skins an operator can choose from
    List {
        /// Print JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },
    /// Show the active skin for a simulated request
    Active {
        /// Value of the `_skin` query parameter
        #[arg(long)]
        skin: Option<String>,
        /// Value of the `backend_skin` cookie
        #[arg(long)]
        cookie: Option<String>,
    },
    /// Persist the active skin
    Set {
        /// Skin code, or `--frontend--` to follow the public theme
        #[arg(allow_hyphen_values = true)]
        code: String,
    },
    /// Rewrite a view or asset path into the active skin
    Rewrite { path: String },
    /// Render markup for stylesheets and scripts
    Assets {
        #[arg(required = true)]
        files: Vec<String>,
    },
}

/// Everything a command runs against.
pub struct Site {
    config: BackskinConfig,
    vfs: Rc<dyn Vfs>,
    settings: Box<dyn SettingStore>,
}

impl Site {
    pub fn new(config: BackskinConfig, vfs: Rc<dyn Vfs>, settings: Box<dyn SettingStore>) -> Self {
        Self {
            config,
            vfs,
            settings,
        }
    }

    fn layout(&self) -> SkinLayout {
        SkinLayout::from_config(&self.config)
    }

    fn probe(&self) -> SkinDirectoryProbe {
        SkinDirectoryProbe::new(Rc::clone(&self.vfs), self.layout())
    }

    fn themes(&self) -> ThemeDirectory {
        ThemeDirectory::new(
            Rc::clone(&self.vfs),
            self.layout().themes_dir(),
            self.config.frontend_theme.clone(),
        )
    }

    /// Hand the setting store to a resolver, keeping the rest of the site.
    fn into_resolver(self) -> (ActiveSkinResolver, BackskinConfig, Rc<dyn Vfs>) {
        let mapper = SkinPathMapper::new(self.probe());
        let themes = self.themes();
        let resolver = ActiveSkinResolver::new(mapper, Box::new(themes), &self.config.active_skin)
            .with_settings(self.settings);
        (resolver, self.config, self.vfs)
    }
}

/// Run a command, returning what it prints.
pub fn run(command: Command, site: Site) -> Result<String> {
    match command {
        Command::List { json } => list(&site, json),
        Command::Active { skin, cookie } => {
            let mut request = RequestContext::new();
            if let Some(code) = &skin {
                request = request.with_query(SKIN_QUERY_PARAM, code);
            }
            if let Some(code) = &cookie {
                request = request.with_cookie(SKIN_COOKIE, code);
            }
            active(site, &mut request)
        },
        Command::Set { code } => set(site, &code),
        Command::Rewrite { path } => rewrite(site, &path),
        Command::Assets { files } => assets(site, &files),
    }
}

fn list(site: &Site, json: bool) -> Result<String> {
    let probe = site.probe();
    let themes = site.themes();
    let options = SkinCatalog::new(&probe, &themes).theme_options()?;
    if json {
        let entries: Vec<serde_json::Value> = options
            .iter()
            .map(|(code, label)| serde_json::json!({ "code": code, "label": label }))
            .collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&entries)?));
    }
    Ok(options
        .iter()
        .map(|(code, label)| format!("{code}\t{label}\n"))
        .collect())
}

fn active(site: Site, request: &mut RequestContext) -> Result<String> {
    let (mut resolver, _, _) = site.into_resolver();
    let skin = resolver.get_active(request)?;
    let mut out = format!("{}\t{}\n", skin.code(), skin.path().unwrap_or("-"));
    for cookie in request.queued_cookies() {
        out.push_str(&format!(
            "Set-Cookie: {}={}; Max-Age={}\n",
            cookie.name,
            cookie.value,
            cookie.max_age.as_secs()
        ));
    }
    Ok(out)
}

fn set(site: Site, code: &str) -> Result<String> {
    if code != FRONTEND_SENTINEL && code != DEFAULT_SKIN && !site.probe().exists(code)? {
        log::warn!("Skin '{code}' is not installed; storing it anyway");
    }
    let (mut resolver, _, _) = site.into_resolver();
    resolver.set_active(code)?;
    Ok(format!("Active skin set to '{code}'\n"))
}

fn rewrite(site: Site, path: &str) -> Result<String> {
    let (mut resolver, config, vfs) = site.into_resolver();
    let skin = resolver.get_active(&mut RequestContext::new())?;
    let rewriter = AssetPathRewriter::new(vfs, SkinLayout::from_config(&config));
    Ok(format!("{}\n", rewriter.rewrite(path, skin)?))
}

fn assets(site: Site, files: &[String]) -> Result<String> {
    let (mut resolver, config, vfs) = site.into_resolver();
    let skin = resolver.get_active(&mut RequestContext::new())?.clone();
    let rewriter = AssetPathRewriter::new(vfs, SkinLayout::from_config(&config));
    let mut collector = AssetCollector::new(
        rewriter,
        skin,
        Box::new(StaticVersions::from_config(&config)),
        CollectorOptions::from_config(&config),
    );
    for file in files {
        match file.rsplit_once('.').map(|(_, ext)| ext) {
            Some("css") => collector.add_css(file, "core")?,
            Some("js") => collector.add_js(file, "core")?,
            _ => bail!("cannot tell the asset type of '{file}'"),
        }
    }
    Ok(collector.make_assets(None)?)
}
