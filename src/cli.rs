use clap::{Args, Parser, Subcommand};
use pdf_mixer::mix::ChunkRange;
use pdf_mixer::Mode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-mixer")]
#[command(version)]
#[command(about = "Hides a payload text among near-invisible cover text in a PDF")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub page: PageArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configuration file
#[derive(Args)]
pub struct PageArgs {
    /// Page size name, e.g. letter, a4
    #[arg(long, global = true)]
    pub page_size: Option<String>,

    /// Regular font face (TrueType / OpenType)
    #[arg(long, global = true, value_name = "FILE")]
    pub font: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE")]
    pub bold_font: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE")]
    pub italic_font: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE")]
    pub mono_font: Option<PathBuf>,
}

/// Options shared by both document kinds
#[derive(Args)]
pub struct OutputArgs {
    /// Where to write the PDF
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Append the special sequences block
    #[arg(long)]
    pub special_sequences: bool,

    /// Lay the document out with approximate metrics and print a summary instead of
    /// writing a PDF; no fonts are needed
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hides a payload among cover texts
    Mix {
        /// JSON request body; the other text options are ignored when given
        #[arg(long, value_name = "FILE", conflicts_with_all = ["payload", "cover", "others"])]
        request: Option<PathBuf>,

        /// File holding the payload
        #[arg(long, value_name = "FILE", required_unless_present = "request")]
        payload: Option<PathBuf>,

        /// File holding the primary cover
        #[arg(long, value_name = "FILE")]
        cover: Option<PathBuf>,

        /// Generate a primary cover of this many lorem ipsum words when no cover is given
        #[arg(long, value_name = "WORDS", default_value_t = 2000)]
        lipsum: usize,

        /// Files holding secondary covers, in order
        #[arg(long = "other", value_name = "FILE")]
        others: Vec<PathBuf>,

        /// Payload chunk lengths, as MIN-MAX
        #[arg(long, value_parser = parse_range)]
        payload_chunks: Option<ChunkRange>,

        /// Primary cover chunk lengths, as MIN-MAX
        #[arg(long, value_parser = parse_range)]
        cover_chunks: Option<ChunkRange>,

        /// Secondary cover chunk lengths, as MIN-MAX
        #[arg(long, value_parser = parse_range)]
        other_chunks: Option<ChunkRange>,

        /// Append the statistics block
        #[arg(long)]
        statistics: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Renders a single text, plain or markdown
    Render {
        /// File holding the text
        #[arg(value_name = "FILE", required_unless_present = "request")]
        input: Option<PathBuf>,

        /// JSON request body
        #[arg(long, value_name = "FILE", conflicts_with = "input")]
        request: Option<PathBuf>,

        #[arg(long, default_value = "text")]
        mode: Mode,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Parses `MIN-MAX` (or a single `N` for `N-N`) into a validated chunk range
pub fn parse_range(value: &str) -> Result<ChunkRange, String> {
    let (min, max) = match value.split_once('-') {
        Some((min, max)) => (min, max),
        None => (value, value),
    };
    let parse = |n: &str| {
        n.trim()
            .parse::<usize>()
            .map_err(|e| format!("`{n}` is not a length: {e}"))
    };
    ChunkRange::new("chunks", parse(min)?, parse(max)?).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ranges_parse() {
        assert_eq!(parse_range("3-7"), Ok(ChunkRange { min: 3, max: 7 }));
        assert_eq!(parse_range("5"), Ok(ChunkRange { min: 5, max: 5 }));
        assert!(parse_range("7-3").is_err());
        assert!(parse_range("0-3").is_err());
        assert!(parse_range("a-b").is_err());
    }

    #[test]
    fn mix_arguments() {
        let cli = Cli::try_parse_from([
            "pdf-mixer",
            "mix",
            "--payload",
            "secret.txt",
            "--other",
            "a.txt",
            "--other",
            "b.txt",
            "--payload-chunks",
            "1-2",
            "--seed",
            "9",
            "--font",
            "Regular.ttf",
        ])
        .expect("valid arguments");
        assert_eq!(cli.page.font, Some(PathBuf::from("Regular.ttf")));
        let Commands::Mix {
            payload,
            others,
            payload_chunks,
            output,
            ..
        } = cli.command
        else {
            panic!("expected the mix command");
        };
        assert_eq!(payload, Some(PathBuf::from("secret.txt")));
        assert_eq!(others.len(), 2);
        assert_eq!(payload_chunks, Some(ChunkRange { min: 1, max: 2 }));
        assert_eq!(output.seed, Some(9));
    }

    #[test]
    fn mix_needs_a_payload_or_request() {
        assert!(Cli::try_parse_from(["pdf-mixer", "mix"]).is_err());
        assert!(Cli::try_parse_from(["pdf-mixer", "mix", "--request", "r.json"]).is_ok());
    }

    #[test]
    fn render_modes() {
        let cli = Cli::try_parse_from(["pdf-mixer", "render", "notes.md", "--mode", "markdown"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Commands::Render {
                mode: Mode::Markdown,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["pdf-mixer", "render", "x", "--mode", "html"]).is_err());
    }
}
