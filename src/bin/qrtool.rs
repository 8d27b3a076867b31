use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use qr_forge::reader::read_raster;
use qr_forge::render::{DEFAULT_BORDER, DEFAULT_SCALE, render_png, to_ascii};
use qr_forge::{ECLevel, Encoder, MaskPattern, Version};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "qr_forge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text to a PNG, or print it to the terminal
    Encode {
        #[arg(long)]
        text: String,
        /// Output PNG path; prints to the terminal when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "M")]
        ec: ECLevel,
        #[arg(long, default_value_t = DEFAULT_SCALE)]
        scale: u32,
        #[arg(long, default_value_t = DEFAULT_BORDER)]
        border: u32,
        #[arg(long, default_value_t = 1)]
        version_min: u8,
        #[arg(long, default_value_t = 40)]
        version_max: u8,
        /// Fixed mask pattern (0-7)
        #[arg(long)]
        mask: Option<u8>,
        /// Raise the EC level when the version has room
        #[arg(long)]
        boost: bool,
    },
    /// Read back a PNG written by `encode`
    Verify {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value_t = DEFAULT_SCALE)]
        scale: u32,
        #[arg(long, default_value_t = DEFAULT_BORDER)]
        border: u32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            text,
            out,
            ec,
            scale,
            border,
            version_min,
            version_max,
            mask,
            boost,
        } => {
            let mut encoder = Encoder::new()
                .ec_level(ec)
                .min_version(parse_version(version_min)?)
                .max_version(parse_version(version_max)?)
                .boost_ec_level(boost);
            if let Some(id) = mask {
                let Some(pattern) = MaskPattern::from_bits(id) else {
                    bail!("mask must be 0-7, got {id}");
                };
                encoder = encoder.mask(pattern);
            }
            encode_cmd(&encoder, &text, out.as_deref(), scale, border)
        }
        Command::Verify {
            image,
            scale,
            border,
        } => verify_cmd(&image, scale, border),
    }
}

fn parse_version(number: u8) -> anyhow::Result<Version> {
    Version::new(number).with_context(|| format!("version must be 1-40, got {number}"))
}

fn encode_cmd(
    encoder: &Encoder,
    text: &str,
    out: Option<&Path>,
    scale: u32,
    border: u32,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let code = encoder.encode(text.as_bytes())?;
    let elapsed = start.elapsed();

    eprintln!(
        "version={} ec={} mask={} size={} ({:.2?})",
        code.version,
        code.error_correction,
        code.mask_pattern.id(),
        code.size(),
        elapsed
    );

    match out {
        Some(path) => {
            let png = render_png(&code, scale, border)?;
            std::fs::write(path, &png)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {} ({} bytes)", path.display(), png.len());
        }
        None => print!("{}", to_ascii(&code, border as usize)),
    }
    Ok(())
}

fn verify_cmd(path: &Path, scale: u32, border: u32) -> anyhow::Result<()> {
    let image = image::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .to_luma8();
    let decoded = read_raster(&image, scale, border)?;

    eprintln!(
        "version={} ec={} mask={}",
        decoded.version,
        decoded.ec_level,
        decoded.mask_pattern.id()
    );
    match decoded.text() {
        Some(text) => println!("{text}"),
        None => println!("{:02x?}", decoded.data),
    }
    Ok(())
}
