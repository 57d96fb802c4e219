//! pdfdiff CLI - save cropped visual differences between two PDFs

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfdiff::{
    compare_documents_with, CompareOptions, CropSource, JsonFormat, PageEvent, PdfBackend,
    PdfiumRenderer, RefineStrategy, TopFallback,
};

#[derive(Parser)]
#[command(name = "pdfdiff")]
#[command(version)]
#[command(about = "Render two PDFs and save crops of every page that changed", long_about = None)]
struct Cli {
    /// Original PDF file
    #[arg(value_name = "PDF1")]
    pdf1: PathBuf,

    /// Modified PDF file
    #[arg(value_name = "PDF2")]
    pdf2: PathBuf,

    /// Output directory for diff images
    #[arg(long, value_name = "DIR", default_value = "images", env = "PDFDIFF_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Render DPI
    #[arg(long, default_value = "200", env = "PDFDIFF_DPI")]
    dpi: u32,

    /// Luma difference (0-255) above which a pixel counts as changed
    #[arg(long, default_value = "30", env = "PDFDIFF_THRESHOLD")]
    threshold: u8,

    /// How detected changes are cropped
    #[arg(long, value_enum, default_value = "text-anchored", env = "PDFDIFF_STRATEGY")]
    strategy: Strategy,

    /// Channel level (0-255) at or above which a pixel counts as blank
    #[arg(long, default_value = "255", env = "PDFDIFF_WHITE_LEVEL")]
    white_level: u8,

    /// Crop top when no text ends above a change (text-anchored only)
    #[arg(long, value_enum, default_value = "page-top", env = "PDFDIFF_TOP_FALLBACK")]
    top_fallback: Fallback,

    /// Document the crops are cut from
    #[arg(long, value_enum, default_value = "first", env = "PDFDIFF_CROP_FROM")]
    crop_from: CropFrom,

    /// Print a JSON report instead of one path per line
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Grow through blank rows, stop where both renders agree again
    BlankScan,
    /// Anchor to the nearest text above the change (default)
    TextAnchored,
}

impl From<Strategy> for RefineStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BlankScan => RefineStrategy::BlankScan,
            Strategy::TextAnchored => RefineStrategy::TextAnchored,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Fallback {
    /// Extend the crop to the top of the page
    PageTop,
    /// Anchor at the page's bottom edge
    PageBottom,
}

impl From<Fallback> for TopFallback {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::PageTop => TopFallback::PageTop,
            Fallback::PageBottom => TopFallback::PageBottom,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CropFrom {
    /// Crop the first PDF (default)
    First,
    /// Crop the second PDF
    Second,
}

impl From<CropFrom> for CropSource {
    fn from(source: CropFrom) -> Self {
        match source {
            CropFrom::First => CropSource::First,
            CropFrom::Second => CropSource::Second,
        }
    }
}

impl Cli {
    fn options(&self) -> CompareOptions {
        CompareOptions::new()
            .with_dpi(self.dpi as f32)
            .with_output_dir(&self.output_dir)
            .with_threshold(self.threshold)
            .with_strategy(self.strategy.into())
            .with_white_level(self.white_level)
            .with_top_fallback(self.top_fallback.into())
            .with_crop_source(self.crop_from.into())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = cmd_compare(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_compare(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.options();
    options.validate()?;

    let renderer = PdfiumRenderer::bind()?;
    let before = renderer.open(&cli.pdf1)?;
    let after = renderer.open(&cli.pdf2)?;

    let pb = progress_bar(&before, &after, cli.quiet);

    let report = compare_documents_with(&before, &after, &options, |event| {
        if let PageEvent::Changed(crop) = event {
            if !cli.json {
                pb.suspend(|| print_path(&crop.path));
            }
        }
        pb.inc(1);
    })?;

    pb.finish_and_clear();
    log::info!(
        "{} of {} pages changed",
        report.crops.len(),
        report.pages_compared
    );

    if cli.json {
        println!("{}", report.to_json(JsonFormat::Pretty)?);
    }

    Ok(())
}

fn progress_bar(before: &dyn PdfBackend, after: &dyn PdfBackend, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let total = before.page_count().min(after.page_count()) as u64;
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] page {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn print_path(path: &Path) {
    println!("{}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pdfdiff", "a.pdf", "b.pdf"]).unwrap();
        let options = cli.options();
        assert_eq!(cli.pdf1, PathBuf::from("a.pdf"));
        assert_eq!(cli.pdf2, PathBuf::from("b.pdf"));
        assert_eq!(options.output_dir, PathBuf::from("images"));
        assert_eq!(options.dpi, 200.0);
        assert_eq!(options.threshold, 30);
        assert_eq!(options.strategy, RefineStrategy::TextAnchored);
        assert_eq!(options.crop_source, CropSource::First);
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "pdfdiff",
            "a.pdf",
            "b.pdf",
            "--output-dir",
            "out",
            "--dpi",
            "96",
            "--strategy",
            "blank-scan",
            "--top-fallback",
            "page-bottom",
            "--crop-from",
            "second",
            "--json",
        ])
        .unwrap();
        let options = cli.options();
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.dpi, 96.0);
        assert_eq!(options.strategy, RefineStrategy::BlankScan);
        assert_eq!(options.top_fallback, TopFallback::PageBottom);
        assert_eq!(options.crop_source, CropSource::Second);
        assert!(cli.json);
    }

    #[test]
    fn test_oversized_dpi_fails_validation() {
        let cli = Cli::try_parse_from(["pdfdiff", "a.pdf", "b.pdf", "--dpi", "1000000"]).unwrap();
        assert!(cli.options().validate().is_err());
    }

    #[test]
    fn test_missing_second_pdf_is_rejected() {
        assert!(Cli::try_parse_from(["pdfdiff", "a.pdf"]).is_err());
    }
}
