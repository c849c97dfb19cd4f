use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use qrkit::{
    parse_hex_color, BatchBuilder, ECLevel, Generator, ModuleStyle, Pattern, Restyler, Session,
};

/// Batch QR generation and module restyling
#[derive(Parser, Debug)]
#[command(name = "qrkit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Session file holding history and databases, created when missing
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every string a template expands to
    Expand {
        template: String,

        /// Print the value count of every token and the number of combinations
        #[arg(long)]
        count: bool,
    },

    /// Encode one payload and record it in history
    Generate {
        data: String,
        output: PathBuf,

        /// Error correction level: L, M, Q or H
        #[arg(long, short, default_value = "M")]
        ec_level: String,

        /// Pixels per module
        #[arg(long, default_value_t = qrkit::generate::DEFAULT_MODULE_SIZE)]
        module_size: u32,

        /// dots, rounded or square
        #[arg(long, short, default_value = "square")]
        style: String,

        #[arg(long, default_value = "#000000")]
        fg: String,

        #[arg(long, default_value = "#ffffff")]
        bg: String,
    },

    /// Decode a QR code from an image file and record it in scan history
    Scan { input: PathBuf },

    /// Print generation and scan history, most recent first
    History,

    /// Redraw the modules of a rendered QR image
    Restyle {
        input: PathBuf,
        output: PathBuf,

        /// dots, rounded or square
        #[arg(long, short, default_value = "dots")]
        style: String,

        /// Module color as #rrggbb
        #[arg(long, default_value = "#000000")]
        fg: String,

        /// Background color as #rrggbb
        #[arg(long, default_value = "#ffffff")]
        bg: String,
    },

    /// Generate one restyled QR image per expanded template string
    Batch {
        template: String,
        out_dir: PathBuf,

        /// Error correction level: L, M, Q or H
        #[arg(long, short, default_value = "M")]
        ec_level: String,

        /// Pixels per module
        #[arg(long, default_value_t = qrkit::generate::DEFAULT_MODULE_SIZE)]
        module_size: u32,

        /// dots, rounded or square
        #[arg(long, short, default_value = "square")]
        style: String,

        #[arg(long, default_value = "#000000")]
        fg: String,

        #[arg(long, default_value = "#ffffff")]
        bg: String,

        /// Refuse templates expanding to more items than this
        #[arg(long, default_value_t = qrkit::batch::DEFAULT_LIMIT)]
        limit: usize,
    },
}

fn load_session(path: Option<&Path>) -> Result<Session> {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(Session::new());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session {}", path.display()))?;
    Ok(Session::from_json(&json)?)
}

fn save_session(path: Option<&Path>, session: &Session) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, session.to_json()?)
            .with_context(|| format!("Failed to write session {}", path.display()))?;
        log::debug!("Saved session to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let session_path = args.session.as_deref();

    match args.command {
        Command::Expand { template, count } => {
            let pattern = Pattern::parse(&template);
            if count {
                for (span, values) in pattern.spans().iter().zip(pattern.values()) {
                    println!("{}\t{}", span.full, values.len());
                }
                match pattern.combinations() {
                    Some(n) => println!("{n}"),
                    None => println!("overflow"),
                }
                return Ok(());
            }
            for s in &pattern {
                println!("{s}");
            }
        }

        Command::Generate { data, output, ec_level, module_size, style, fg, bg } => {
            let mut session = load_session(session_path)?;
            let mut generator = Generator::new();
            generator
                .ec_level(ec_level.parse::<ECLevel>()?)
                .module_size(module_size)
                .style(ModuleStyle::from(style.as_str()))
                .foreground(parse_hex_color(&fg)?)
                .background(parse_hex_color(&bg)?);

            let img = session.generate(&generator, &data)?;
            img.save(&output).with_context(|| format!("Failed to save {}", output.display()))?;
            save_session(session_path, &session)?;
            log::info!("Saved {}", output.display());
        }

        Command::Scan { input } => {
            let mut session = load_session(session_path)?;
            let img = image::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let text = session.scan(&img)?;
            save_session(session_path, &session)?;
            println!("{text}");
        }

        Command::History => {
            let session = load_session(session_path)?;
            for entry in session.history.iter() {
                println!("generated\t{entry}");
            }
            for entry in session.scan_history.iter() {
                println!("scanned\t{entry}");
            }
        }

        Command::Restyle { input, output, style, fg, bg } => {
            let img = image::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let out = Restyler::new(ModuleStyle::from(style.as_str()))
                .foreground(parse_hex_color(&fg)?)
                .background(parse_hex_color(&bg)?)
                .restyle(&img);
            out.save(&output).with_context(|| format!("Failed to save {}", output.display()))?;
            log::info!("Saved {}", output.display());
        }

        Command::Batch { template, out_dir, ec_level, module_size, style, fg, bg, limit } => {
            let batch = BatchBuilder::new(&template)
                .ec_level(ec_level.parse::<ECLevel>()?)
                .module_size(module_size)
                .style(ModuleStyle::from(style.as_str()))
                .foreground(parse_hex_color(&fg)?)
                .background(parse_hex_color(&bg)?)
                .limit(limit)
                .plan()?;

            fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;

            let width = batch.len().to_string().len();
            for item in batch.items() {
                let item = item?;
                let path = out_dir.join(format!("{:0width$}.png", item.index + 1));
                item.image
                    .save(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                println!("{}\t{}", path.display(), item.data);
            }
            log::info!("Wrote {} images to {}", batch.len(), out_dir.display());
        }
    }

    Ok(())
}
