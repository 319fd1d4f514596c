use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use invoice_render::config::{
    config_dir, formatting_context, load_config, load_document, page_size, resolve_output_dir,
    CONFIG_TEMPLATE, INVOICE_TEMPLATE,
};
use invoice_render::error::{InvoiceError, Result};
use invoice_render::pdf::{self, derive_palette, parse_hex, resolve_accent, to_hex};
use invoice_render::DocumentRenderer;

#[derive(Parser)]
#[command(name = "invoice-render")]
#[command(version, about = "Deterministic single-page invoice PDF renderer", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.invoice-render)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Render an invoice snapshot (.toml or .json) to PDF
    Render {
        /// Invoice snapshot file
        input: PathBuf,

        /// Custom output file path (default: output_dir/<invoice number>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: RenderOptions,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Print the draw calls of an invoice page as JSON
    DrawLog {
        /// Invoice snapshot file
        input: PathBuf,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Show the palette derived from an accent color
    Palette {
        /// Accent color, #RRGGBB or #RRGGBBAA
        hex: String,
    },
}

#[derive(clap::Args)]
struct RenderOptions {
    /// Locale for dates and currency (overrides config.toml)
    #[arg(long)]
    locale: Option<String>,

    /// Page size: a4 or letter (overrides config.toml)
    #[arg(long)]
    page: Option<String>,

    /// Date to stamp as the creation date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("Invalid date '{s}'. Use YYYY-MM-DD."))
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Render {
            input,
            output,
            options,
            open,
        } => cmd_render(&cfg_dir, &input, output, &options, open),
        Commands::DrawLog { input, options } => cmd_draw_log(&cfg_dir, &input, &options),
        Commands::Palette { hex } => cmd_palette(&hex),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("invoice.toml"), INVOICE_TEMPLATE)?;

    println!("Initialized invoice-render config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Pick your locale and page size:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Fill in the sample invoice:      $EDITOR {}/invoice.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then render it:");
    println!("  invoice-render render {}/invoice.toml", cfg_dir.display());

    Ok(())
}

fn build_renderer(cfg_dir: &Path, options: &RenderOptions) -> Result<DocumentRenderer> {
    let config = load_config(cfg_dir)?;
    let today = options
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let format = formatting_context(&config, options.locale.as_deref(), today)?;
    let page = page_size(options.page.as_deref().unwrap_or(&config.pdf.page_size))?;
    Ok(DocumentRenderer::new(format).with_page_size(page))
}

/// Render an invoice and write it to disk
fn cmd_render(
    cfg_dir: &Path,
    input: &Path,
    output: Option<PathBuf>,
    options: &RenderOptions,
    open: bool,
) -> Result<()> {
    let data = load_document(input)?;
    let renderer = build_renderer(cfg_dir, options)?;
    let rendered = renderer.render(&data)?;

    let pdf_path = match output {
        Some(path) => path,
        None => {
            let config = load_config(cfg_dir)?;
            let output_dir = resolve_output_dir(&config, cfg_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(pdf::document_file_name(&data.number))
        }
    };
    std::fs::write(&pdf_path, &rendered.bytes)?;

    println!("Rendered {}", data.number);
    println!("  Client: {}", data.client.name);
    println!(
        "  Total:  {}",
        renderer.format().format_currency(data.total_amount)
    );
    println!("  Saved:  {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }
    Ok(())
}

/// Print the structured draw-call log
fn cmd_draw_log(cfg_dir: &Path, input: &Path, options: &RenderOptions) -> Result<()> {
    let data = load_document(input)?;
    let renderer = build_renderer(cfg_dir, options)?;
    let list = renderer.layout(&data)?;
    let json = serde_json::to_string_pretty(&list)?;
    println!("{json}");
    Ok(())
}

#[derive(Tabled)]
struct PaletteRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "HEX")]
    hex: String,
}

/// Show the derived palette
fn cmd_palette(hex: &str) -> Result<()> {
    if let Err(e) = parse_hex(hex) {
        eprintln!("{e}; showing the default palette");
    }
    let palette = derive_palette(resolve_accent(Some(hex)));

    let rows: Vec<PaletteRow> = palette
        .entries()
        .iter()
        .map(|(name, color)| PaletteRow {
            name: name.to_string(),
            hex: to_hex(*color),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()?;
    }
    Ok(())
}
