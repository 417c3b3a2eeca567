#![deny(missing_docs)]
//! A command-line interface for the Vigenere cipher toolkit.

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use vigenere_core::challenge::{self, ChallengeOptions, KeyStyle};
use vigenere_core::cipher::{self, Direction};
use vigenere_core::frequency::{self, LetterCounts};
use vigenere_core::kasiski::{self, KasiskiConfig, KasiskiReport};
use vigenere_core::{Key, NormalizedText, normalize};

const MAX_CHART_WIDTH: u64 = 500;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Encrypt a message\nvigenere-cli encrypt --key LEMON \"Attack at dawn\"\n\n# Decrypt a file into another file\nvigenere-cli decrypt --key LEMON --input ./secret.txt --output ./plain.txt\n\n# Letter frequencies of a ciphertext\nvigenere-cli frequency --input ./secret.txt\n\n# Key length candidates from repeated patterns\nvigenere-cli kasiski --input ./secret.txt\n\n# Frequencies of each column for a key length guess\nvigenere-cli columns --key-length 3 --input ./secret.txt\n\n# Generate a practice ciphertext and check a solution\nvigenere-cli challenge --length 500\nvigenere-cli verify --ciphertext <CIPHERTEXT> --key <KEY> --plaintext <PLAINTEXT>"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the text to process comes from. Standard input when neither is given.
#[derive(Args)]
struct TextSource {
    /// The text to process
    #[arg(conflicts_with = "input")]
    text: Option<String>,

    /// Read the text from a file instead
    #[arg(short, long, value_name = "INPUT_FILE")]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text with a repeating key
    Encrypt {
        #[command(flatten)]
        source: TextSource,

        /// The key; only its letters are used
        #[arg(short, long)]
        key: String,

        /// Write the ciphertext to this file instead of standard output
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },
    /// Decrypt text with a repeating key
    Decrypt {
        #[command(flatten)]
        source: TextSource,

        /// The key; only its letters are used
        #[arg(short, long)]
        key: String,

        /// Write the plaintext to this file instead of standard output
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },
    /// Count how often each letter occurs
    Frequency {
        #[command(flatten)]
        source: TextSource,

        /// Width of the longest bar in the chart
        #[arg(long, default_value_t = 50, value_parser = chart_width())]
        width: usize,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find repeated patterns and propose key lengths
    Kasiski {
        #[command(flatten)]
        source: TextSource,

        #[command(flatten)]
        tuning: KasiskiArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split the text into one column per key letter and count each column
    Columns {
        #[command(flatten)]
        source: TextSource,

        /// The guessed key length (2 to 20)
        #[arg(short = 'l', long)]
        key_length: usize,

        /// Width of the longest bar in each chart
        #[arg(long, default_value_t = 50, value_parser = chart_width())]
        width: usize,

        /// Print the columns as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a practice ciphertext
    Challenge {
        /// Number of plaintext letters; 500, 750 or 1000 at random if omitted
        #[arg(long)]
        length: Option<usize>,

        /// How to choose the key: word or random; either at random if omitted
        #[arg(long)]
        key_style: Option<KeyStyle>,

        /// Number of key letters
        #[arg(long, default_value_t = challenge::DEFAULT_KEY_LENGTH)]
        key_length: usize,

        /// Seed for a reproducible challenge
        #[arg(long)]
        seed: Option<u64>,

        /// Also print the key and the plaintext
        #[arg(long)]
        reveal: bool,

        /// Print the challenge as JSON (includes the answer)
        #[arg(long)]
        json: bool,
    },
    /// Check a key and plaintext against a ciphertext
    Verify {
        /// The ciphertext that was handed out
        #[arg(long)]
        ciphertext: String,

        /// The submitted key
        #[arg(short, long)]
        key: String,

        /// The submitted plaintext
        #[arg(short, long)]
        plaintext: String,
    },
}

/// Tuning knobs of the Kasiski analysis.
#[derive(Args)]
struct KasiskiArgs {
    /// Shortest repeated substring to look for
    #[arg(long, default_value_t = KasiskiConfig::default().min_pattern_len)]
    min_pattern_len: usize,

    /// Longest repeated substring to look for
    #[arg(long, default_value_t = KasiskiConfig::default().max_pattern_len)]
    max_pattern_len: usize,

    /// Smallest distance between repeats that is counted
    #[arg(long, default_value_t = KasiskiConfig::default().min_distance)]
    min_distance: usize,

    /// Largest distance between repeats that is counted
    #[arg(long, default_value_t = KasiskiConfig::default().max_distance)]
    max_distance: usize,

    /// Number of most frequent distances to report
    #[arg(long, default_value_t = KasiskiConfig::default().max_hints)]
    max_hints: usize,

    /// Number of example patterns per distance
    #[arg(long, default_value_t = KasiskiConfig::default().max_examples)]
    max_examples: usize,

    /// Smallest key length candidate
    #[arg(long, default_value_t = KasiskiConfig::default().min_key_len)]
    min_key_len: usize,

    /// Largest key length candidate
    #[arg(long, default_value_t = KasiskiConfig::default().max_key_len)]
    max_key_len: usize,
}

impl KasiskiArgs {
    const fn to_config(&self) -> KasiskiConfig {
        KasiskiConfig {
            min_pattern_len: self.min_pattern_len,
            max_pattern_len: self.max_pattern_len,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            max_hints: self.max_hints,
            max_examples: self.max_examples,
            min_key_len: self.min_key_len,
            max_key_len: self.max_key_len,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Encrypt {
            source,
            key,
            output,
        } => run_cipher(source, key, output.as_ref(), Direction::Encrypt),
        Commands::Decrypt {
            source,
            key,
            output,
        } => run_cipher(source, key, output.as_ref(), Direction::Decrypt),
        Commands::Frequency {
            source,
            width,
            json,
        } => {
            let text = read_text(source);
            let counts = frequency::analyze(&text);
            if *json {
                print_json(&counts);
            } else {
                println!("Letters analyzed: {}", counts.total());
                print_chart(&counts, *width);
            }
        }
        Commands::Kasiski {
            source,
            tuning,
            json,
        } => {
            let text = read_text(source);
            let report = kasiski::analyze(&text, &tuning.to_config()).unwrap_or_else(|e| {
                error!("Invalid analysis parameters: {e}");
                std::process::exit(1);
            });
            if *json {
                print_json(&report);
            } else {
                print_report(&report);
            }
        }
        Commands::Columns {
            source,
            key_length,
            width,
            json,
        } => {
            let text = read_text(source);
            let columns = frequency::analyze_columns(&text, *key_length).unwrap_or_else(|e| {
                error!("Cannot split the text into columns: {e}");
                std::process::exit(1);
            });
            if *json {
                print_json(&columns);
                return;
            }
            println!(
                "Hint: assume the tallest bar of each column stands for 'E' and read the key letter from the shift."
            );
            for column in &columns {
                println!();
                println!(
                    "Key letter #{} (letters: {}, most frequent: {})",
                    column.index + 1,
                    column.counts.total(),
                    column.counts.most_frequent().map_or_else(|| "-".to_string(), String::from)
                );
                println!("{:-<40}", "");
                print_chart(&column.counts, *width);
            }
        }
        Commands::Challenge {
            length,
            key_style,
            key_length,
            seed,
            reveal,
            json,
        } => {
            let options = ChallengeOptions {
                excerpt_length: *length,
                key_style: *key_style,
                key_length: *key_length,
            };
            let result = match seed {
                Some(seed) => challenge::generate_with_rng(&mut StdRng::seed_from_u64(*seed), &options),
                None => challenge::generate(&options),
            };
            let generated = result.unwrap_or_else(|e| {
                error!("Failed to generate challenge: {e}");
                std::process::exit(1);
            });
            info!(
                "Generated a {}-letter challenge with a {} key.",
                generated.ciphertext.len(),
                generated.key_style
            );
            if *json {
                print_json(&generated);
                return;
            }
            println!("{}", generated.ciphertext);
            if *reveal {
                println!();
                println!("Key: {}", generated.key);
                println!("Plaintext: {}", generated.plaintext);
            }
        }
        Commands::Verify {
            ciphertext,
            key,
            plaintext,
        } => match challenge::verify_solution(ciphertext, key, plaintext) {
            Ok(true) => println!("Correct! The key and plaintext reproduce the ciphertext."),
            Ok(false) => println!("Incorrect. The key and plaintext do not reproduce the ciphertext."),
            Err(e) => {
                error!("Cannot verify the solution: {e}");
                std::process::exit(1);
            }
        },
    }
}

/// Streams the source through the cipher into the output file or standard output.
fn run_cipher(source: &TextSource, raw_key: &str, output: Option<&PathBuf>, direction: Direction) {
    let key = Key::new(raw_key).unwrap_or_else(|e| {
        error!("{e}");
        std::process::exit(1);
    });

    let reader: Box<dyn Read> = match (&source.text, &source.input) {
        (Some(text), _) => Box::new(io::Cursor::new(text.clone().into_bytes())),
        (None, Some(path)) => {
            let file = fs::File::open(path).unwrap_or_else(|e| {
                error!("Failed to open input file '{}': {e}", path.display());
                std::process::exit(1);
            });
            Box::new(BufReader::new(file))
        }
        (None, None) => Box::new(io::stdin().lock()),
    };

    let result = if let Some(path) = output {
        let file = fs::File::create(path).unwrap_or_else(|e| {
            error!("Failed to create output file '{}': {e}", path.display());
            std::process::exit(1);
        });
        cipher::process_stream(reader, file, &key, direction).inspect(|letters| {
            info!(
                "Wrote {letters} letters to '{}' ({direction:?}).",
                path.display()
            );
        })
    } else {
        let mut stdout = io::stdout().lock();
        let result = cipher::process_stream(reader, &mut stdout, &key, direction);
        if let Err(e) = writeln!(stdout) {
            error!("Failed to write to standard output: {e}");
        }
        result
    };

    if let Err(e) = result {
        error!("Failed to process the text: {e}");
        std::process::exit(1);
    }
}

/// Reads and normalizes the text from an argument, a file, or standard input.
fn read_text(source: &TextSource) -> NormalizedText {
    if let Some(text) = &source.text {
        return normalize(text);
    }
    let raw = match &source.input {
        Some(path) => fs::read_to_string(path).unwrap_or_else(|e| {
            error!("Failed to read input file '{}': {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                error!("Failed to read from standard input: {e}");
                std::process::exit(1);
            }
            buffer
        }
    };
    normalize(&raw)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}

/// Chart widths accepted by `--width`.
fn chart_width() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..=MAX_CHART_WIDTH)
}

fn print_chart(counts: &LetterCounts, width: usize) {
    if counts.total() == 0 {
        println!("No letters found to analyze.");
        return;
    }
    for letter in b'A'..=b'Z' {
        println!(
            "{}: {:>5} ({:>5.1}%) {}",
            char::from(letter),
            counts.count(letter),
            counts.percentage(letter),
            "#".repeat(counts.bar_width(letter, width))
        );
    }
}

fn print_report(report: &KasiskiReport) {
    if report.is_empty() {
        println!("No repeating pattern found. Check the length of the ciphertext.");
        return;
    }

    println!("Distances between repeated patterns and their divisors (key length candidates):");
    println!(
        "{:<10} {:<12} {:<20} {:<30}",
        "Distance", "Occurrences", "Key lengths", "Patterns (examples)"
    );
    println!("{:-<72}", "");
    for hint in &report.hints {
        let divisors = if hint.divisors.is_empty() {
            "none".to_string()
        } else {
            join(&hint.divisors)
        };
        let patterns = hint
            .example_patterns
            .iter()
            .map(|p| format!("\"{p}\""))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<10} {:<12} {:<20} {:<30}",
            hint.distance, hint.occurrence_count, divisors, patterns
        );
    }
    println!();
    if report.candidates.is_empty() {
        println!("Key length candidates: none");
    } else {
        println!("Key length candidates: {}", join(&report.candidates));
    }
}

fn join(values: &[usize]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
