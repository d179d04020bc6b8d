use clap::{Parser, Subcommand};
use simple_lightbox::config::{self, LightboxConfig};
use simple_lightbox::manifest::{self, Manifest};
use simple_lightbox::output::{self, CheckReport};
use simple_lightbox::page::{GalleryId, Page};
use simple_lightbox::{render, scan, script};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-lightbox")]
#[command(about = "Headless image lightbox: build, render and replay gallery overlays")]
#[command(long_about = "\
Headless image lightbox: build, render and replay gallery overlays

A gallery is a manifest of images. Each image becomes a trigger link on the
page; the lightbox attaches to the links and builds a swipeable overlay with
captions, a counter and prev/next/close controls.

Typical flow:

  photos/
  ├── lightbox.toml          # Lightbox options (optional, layered on defaults)
  ├── 001-Glacier.jpg        # Ordered by numeric prefix
  ├── 001-Glacier.txt        # Caption sidecar
  ├── 002-Black-Beach.jpg    # No sidecar: caption \"Black Beach\"
  └── thumbs/
      └── 001-Glacier.jpg    # Thumbnail shown on the page

  simple-lightbox scan photos            # → manifest.json
  simple-lightbox render                 # → gallery.html
  simple-lightbox simulate script.json   # replay clicks, keys and swipes

Set RUST_LOG=debug to trace controller state changes on stderr.

Run 'simple-lightbox gen-config' to generate a documented lightbox.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding lightbox.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Gallery manifest path
    #[arg(long, default_value = "manifest.json", global = true)]
    manifest: PathBuf,

    /// Class given to trigger links built from the manifest
    #[arg(long, default_value = "lightbox", global = true)]
    trigger_class: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan an image directory into a manifest
    Scan {
        /// Image directory
        source: PathBuf,
    },
    /// Render the gallery page with the lightbox attached
    Render {
        /// Output HTML file
        #[arg(long, default_value = "gallery.html")]
        output: PathBuf,
        /// Stylesheet inlined into the page
        #[arg(long)]
        css: Option<PathBuf>,
    },
    /// Replay an interaction script and print the state after each step
    Simulate {
        /// JSON script of input steps
        script: PathBuf,
        /// Treat the page as a touch device
        #[arg(long)]
        touch: bool,
    },
    /// Validate config and manifest without writing anything
    Check,
    /// Print a stock lightbox.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Scan { ref source } => {
            let manifest = scan::scan(source)?;
            manifest::save_manifest(&manifest, &cli.manifest)?;
            output::print_scan_output(&manifest);
            println!("Wrote {}", cli.manifest.display());
        }
        Command::Render {
            output: ref out_path,
            ref css,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let manifest = manifest::load_manifest(&cli.manifest)?;
            let css = match css {
                Some(path) => std::fs::read_to_string(path)?,
                None => String::new(),
            };
            let page = build_page(&manifest, &cli.trigger_class, config, false)?;
            let html = render::render_page(page.document(), &manifest.title, &css);
            std::fs::write(out_path, html.into_string())?;
            println!("Wrote {}", out_path.display());
        }
        Command::Simulate { ref script, touch } => {
            let config = config::load_config(&cli.config_dir)?;
            let manifest = manifest::load_manifest(&cli.manifest)?;
            let steps = script::load_script(script)?;
            let mut page = build_page(&manifest, &cli.trigger_class, config, touch)?;
            let gallery = GalleryId::default();

            for (i, step) in steps.iter().enumerate() {
                script::run_step(&mut page, gallery, step)?;
                if let Some(lb) = page.gallery(gallery) {
                    output::print_step(i + 1, step, page.document(), lb);
                }
            }
        }
        Command::Check => {
            let config_file = config_path(&cli.config_dir);
            let config = config::load_config(&cli.config_dir)?;
            let manifest = manifest::load_manifest(&cli.manifest)?;
            let selector = config.selector.clone();
            let page = build_page(&manifest, &cli.trigger_class, config, false)?;
            let lb = page
                .gallery(GalleryId::default())
                .ok_or("lightbox failed to attach")?;
            output::print_check_output(&CheckReport {
                config_file,
                images: manifest.images.len(),
                captions: manifest.caption_count(),
                selector,
                triggers: lb.len(),
                nav_shown: lb.nav_shown(),
            });
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default
/// `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config_path(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(config::CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Build the manifest's page and attach a lightbox to it.
fn build_page(
    manifest: &Manifest,
    trigger_class: &str,
    config: LightboxConfig,
    touch: bool,
) -> Result<Page, Box<dyn std::error::Error>> {
    let doc = manifest::build_document(manifest, trigger_class).with_touch(touch);
    let mut page = Page::new(doc);
    page.attach(config)?;
    Ok(page)
}
