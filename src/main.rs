mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, OutputArgs, PageArgs};
use pdf_mixer::config::Config;
use pdf_mixer::layout::{FixedAdvance, Layout};
use pdf_mixer::mix::RandomSource;
use pdf_mixer::{MixRequest, TextRequest};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("{:#}", e); // pretty anyhow chain
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "pdf_mixer=debug,info",
        _ => "pdf_mixer=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.page)?;
    match cli.command {
        Commands::Mix {
            request,
            payload,
            cover,
            lipsum: lipsum_words,
            others,
            payload_chunks,
            cover_chunks,
            other_chunks,
            statistics,
            output,
        } => {
            let request = match request {
                Some(path) => MixRequest::from_json(&read(&path)?)
                    .with_context(|| format!("Failed to parse request {}", path.display()))?,
                None => MixRequest {
                    original_text: match payload {
                        Some(path) => read(&path)?,
                        None => String::new(),
                    },
                    main_article: match cover {
                        Some(path) => read(&path)?,
                        None => lipsum::lipsum(lipsum_words),
                    },
                    other_articles: others.iter().map(|p| read(p)).collect::<Result<_>>()?,
                    original_chunk_size: payload_chunks,
                    main_article_chunk_size: cover_chunks,
                    other_article_chunk_size: other_chunks,
                    include_statistics: statistics,
                    include_special_sequences: output.special_sequences,
                    title: output.title.clone(),
                    author: output.author.clone(),
                },
            };
            mix(request, &config, &output)
        }
        Commands::Render {
            input,
            request,
            mode,
            output,
        } => {
            let request = match request {
                Some(path) => TextRequest::from_json(&read(&path)?)
                    .with_context(|| format!("Failed to parse request {}", path.display()))?,
                None => TextRequest {
                    text: match input {
                        Some(path) => read(&path)?,
                        None => String::new(),
                    },
                    mode,
                    include_special_sequences: output.special_sequences,
                    title: output.title.clone(),
                    author: output.author.clone(),
                },
            };
            render(request, &config, &output)
        }
    }
}

fn mix(request: MixRequest, config: &Config, output: &OutputArgs) -> Result<()> {
    let mut rng = rng(output.seed);
    if output.dry_run {
        let (layout, stats) = request.layout(
            &FixedAdvance::default(),
            config.geometry()?,
            &config.chunks,
            rng.as_mut(),
        )?;
        summarize(&layout);
        println!(
            "fragments: {} ({} visible, {} invisible, {:.2}% visible)",
            stats.total,
            stats.visible,
            stats.invisible,
            stats.visibility_ratio()
        );
        for (source, count) in stats.by_source.iter() {
            println!("  {source}: {count}");
        }
        return Ok(());
    }

    let bytes = request
        .generate(config, rng.as_mut())
        .context("Failed to generate the mixed PDF")?;
    write(output.output.as_deref(), "mixed-text.pdf", &bytes)
}

fn render(request: TextRequest, config: &Config, output: &OutputArgs) -> Result<()> {
    let mut rng = rng(output.seed);
    if output.dry_run {
        let layout = request.layout(&FixedAdvance::default(), config.geometry()?, rng.as_mut())?;
        summarize(&layout);
        return Ok(());
    }

    let bytes = request
        .generate(config, rng.as_mut())
        .context("Failed to generate the PDF")?;
    write(output.output.as_deref(), "text.pdf", &bytes)
}

fn rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(ChaCha20Rng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}

fn summarize(layout: &Layout) {
    println!(
        "pages: {}, placements: {}",
        layout.page_count(),
        layout.placements.len()
    );
}

fn load_config(path: Option<&Path>, overrides: &PageArgs) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_toml(&read(path)?)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(page_size) = &overrides.page_size {
        config.page_size = page_size.clone();
    }
    let fonts = [
        (&overrides.font, &mut config.fonts.regular),
        (&overrides.bold_font, &mut config.fonts.bold),
        (&overrides.italic_font, &mut config.fonts.italic),
        (&overrides.mono_font, &mut config.fonts.monospace),
    ];
    for (flag, setting) in fonts {
        if let Some(path) = flag {
            *setting = Some(path.clone());
        }
    }

    config.validate()?;
    Ok(config)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write(path: Option<&Path>, default: &str, bytes: &[u8]) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(default));
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote PDF");
    Ok(())
}
