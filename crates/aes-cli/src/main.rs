//! Command-line interface for `aes128`.

#![forbid(unsafe_code)]

use std::io::{self, BufRead, Write};

use aes_core::text::{format_block_hex, parse_block_hex, recover_text, text_to_block};
use aes_core::{
    decrypt_block_with, encrypt_block_with, expand_key, Aes128Key, Direction, NoopObserver,
    RoundKey, RoundObserver, RoundTrace, State,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// AES-128 single-block CLI.
#[derive(Parser)]
#[command(
    name = "aes128",
    version,
    author,
    about = "Encrypt and decrypt a single AES-128 block"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt up to 16 characters of text and print the ciphertext as hex.
    Encrypt {
        /// Plaintext; padded with spaces or truncated to 16 characters.
        #[arg(long)]
        plaintext: String,
        /// Key text; padded with spaces or truncated to 16 characters.
        #[arg(long)]
        key: String,
        /// Print the key and state matrices after every round to stderr.
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// Decrypt a 32-character hex ciphertext and print the recovered text.
    Decrypt {
        /// Ciphertext as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        ciphertext: String,
        /// Key text; padded with spaces or truncated to 16 characters.
        #[arg(long)]
        key: String,
        /// Print the key and state matrices after every round to stderr.
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// Interactive menu reading choices from stdin.
    Menu {
        /// Print the key and state matrices after every round.
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// Encrypt random blocks under a random key and check they decrypt back.
    Demo {
        /// Number of random blocks to test.
        #[arg(long, default_value_t = 4)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Encrypt {
            plaintext,
            key,
            trace,
        } => cmd_encrypt(&plaintext, &key, trace),
        Commands::Decrypt {
            ciphertext,
            key,
            trace,
        } => cmd_decrypt(&ciphertext, &key, trace),
        Commands::Menu { trace } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_menu(&mut stdin.lock(), &mut stdout.lock(), trace)
        }
        Commands::Demo { samples, seed } => cmd_demo(samples, seed),
    }
}

fn cmd_encrypt(plaintext: &str, key: &str, trace: bool) -> Result<()> {
    let mut tracer = TracePrinter::new(trace.then(io::stderr));
    let hex = encrypt_text(plaintext, key, &mut tracer)?;
    tracer.finish().context("write round trace")?;
    println!("{hex}");
    Ok(())
}

fn cmd_decrypt(ciphertext: &str, key: &str, trace: bool) -> Result<()> {
    let mut tracer = TracePrinter::new(trace.then(io::stderr));
    let text = decrypt_hex(ciphertext, key, &mut tracer)?;
    tracer.finish().context("write round trace")?;
    println!("{text}");
    Ok(())
}

fn cmd_demo(samples: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let key = Aes128Key::from(key_bytes);
    let schedule = expand_key(&key);
    println!("demo key: {}", format_block_hex(&key_bytes));

    for _ in 0..samples {
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut block);
        let ciphertext = encrypt_block_with(&block, &schedule, &mut NoopObserver);
        let decrypted = decrypt_block_with(&ciphertext, &schedule, &mut NoopObserver);
        println!(
            "{} -> {}",
            format_block_hex(&block),
            format_block_hex(&ciphertext)
        );
        if decrypted != block {
            bail!("demo roundtrip failed for {}", format_block_hex(&block));
        }
    }
    Ok(())
}

/// Encrypts text under a text key and returns the ciphertext as hex.
fn encrypt_text<O: RoundObserver>(
    plaintext: &str,
    key: &str,
    observer: &mut O,
) -> Result<String> {
    let key = Aes128Key::from_text(key).context("invalid key")?;
    let block = text_to_block(plaintext).context("invalid plaintext")?;
    let ciphertext = encrypt_block_with(&block, &expand_key(&key), observer);
    Ok(format_block_hex(&ciphertext))
}

/// Decrypts a hex ciphertext under a text key and returns the recovered text.
fn decrypt_hex<O: RoundObserver>(
    ciphertext: &str,
    key: &str,
    observer: &mut O,
) -> Result<String> {
    let block = parse_block_hex(ciphertext).context("invalid ciphertext")?;
    let key = Aes128Key::from_text(key).context("invalid key")?;
    let plaintext = decrypt_block_with(&block, &expand_key(&key), observer);
    Ok(recover_text(&plaintext))
}

fn run_menu<R: BufRead, W: Write>(input: &mut R, output: &mut W, trace: bool) -> Result<()> {
    loop {
        writeln!(output, "\n{}", "=".repeat(40))?;
        writeln!(output, "{:^40}", "AES-128 BLOCK TOOL")?;
        writeln!(output, "{}", "=".repeat(40))?;
        writeln!(output, "1. Encrypt Plaintext")?;
        writeln!(output, "2. Decrypt Hex Ciphertext")?;
        writeln!(output, "3. Exit")?;

        let Some(choice) = prompt(input, output, "Your choice (1-3): ")? else {
            return Ok(());
        };
        match choice.trim() {
            "1" => {
                let Some(plaintext) = prompt(input, output, "Enter Plaintext: ")? else {
                    return Ok(());
                };
                let Some(key) = prompt(input, output, "Enter Secret Key: ")? else {
                    return Ok(());
                };
                let mut tracer = TracePrinter::new(trace.then_some(&mut *output));
                let result = encrypt_text(&plaintext, &key, &mut tracer);
                tracer.finish().context("write round trace")?;
                match result {
                    Ok(hex) => writeln!(output, "\nFINAL ENCRYPTED HEX: {hex}")?,
                    Err(err) => writeln!(output, "Error: {err:#}")?,
                }
            }
            "2" => {
                let Some(ciphertext) = prompt(input, output, "Paste Hex Ciphertext: ")? else {
                    return Ok(());
                };
                let Some(key) = prompt(input, output, "Enter Secret Key: ")? else {
                    return Ok(());
                };
                let mut tracer = TracePrinter::new(trace.then_some(&mut *output));
                let result = decrypt_hex(&ciphertext, &key, &mut tracer);
                tracer.finish().context("write round trace")?;
                match result {
                    Ok(text) => writeln!(output, "\nRECOVERED MESSAGE: {text}")?,
                    Err(err) => writeln!(output, "Error: {err:#}")?,
                }
            }
            "3" => {
                writeln!(output, "Closing Tool...")?;
                return Ok(());
            }
            other => writeln!(output, "Unknown choice {other:?}")?,
        }
    }
}

/// Writes `label` and reads one line, without its line terminator. `None` on EOF.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush().context("flush prompt")?;
    let mut line = String::new();
    if input.read_line(&mut line).context("read input")? == 0 {
        return Ok(None);
    }
    let len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(len);
    Ok(Some(line))
}

/// Prints each round's key and state matrices. Disabled when built without a writer.
struct TracePrinter<W: Write> {
    out: Option<W>,
    error: Option<io::Error>,
}

impl<W: Write> TracePrinter<W> {
    fn new(out: Option<W>) -> Self {
        Self { out, error: None }
    }

    fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<W: Write> RoundObserver for TracePrinter<W> {
    fn on_round(&mut self, trace: &RoundTrace<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Some(out) = self.out.as_mut() {
            if let Err(err) = write_round(out, trace) {
                self.error = Some(err);
            }
        }
    }
}

fn write_round(out: &mut impl Write, trace: &RoundTrace<'_>) -> io::Result<()> {
    let state_label = match (trace.direction, trace.is_final) {
        (_, false) => "STATE MATRIX",
        (Direction::Encrypt, true) => "FINAL STATE",
        (Direction::Decrypt, true) => "FINAL RECOVERED STATE",
    };
    writeln!(out, "\n[KEY MATRIX - Round {}]", trace.round)?;
    writeln!(out, "{}", key_matrix(trace.round_key))?;
    writeln!(out, "\n[{state_label} - Round {}]", trace.round)?;
    writeln!(out, "{}", trace.state)
}

/// Lays a round key out like the state: word `c` becomes column `c`.
fn key_matrix(round_key: &RoundKey) -> State {
    let mut block = [0u8; 16];
    for (chunk, word) in block.chunks_exact_mut(4).zip(round_key) {
        chunk.copy_from_slice(word);
    }
    State::from_block(&block)
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    let mut seed_bytes = [0u8; 32];
    match seed {
        Some(value) => seed_bytes[..8].copy_from_slice(&value.to_le_bytes()),
        None => rand::rngs::OsRng.fill_bytes(&mut seed_bytes),
    }
    ChaCha20Rng::from_seed(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_encrypt_arguments() {
        let cli = Cli::try_parse_from([
            "aes128",
            "encrypt",
            "--plaintext",
            "ATTACK AT DAWN!!",
            "--key",
            "YELLOW SUBMARINE",
            "--trace",
        ])
        .expect("parse");
        match cli.command {
            Commands::Encrypt {
                plaintext, trace, ..
            } => {
                assert_eq!(plaintext, "ATTACK AT DAWN!!");
                assert!(trace);
            }
            _ => panic!("expected encrypt"),
        }
    }

    #[test]
    fn encrypt_then_decrypt_text() {
        let hex = encrypt_text("ATTACK AT DAWN!!", "YELLOW SUBMARINE", &mut NoopObserver)
            .expect("encrypt");
        assert_eq!(hex, "0a32dabb9c333bb17e8f883f2cad1431");
        let text = decrypt_hex(&hex, "YELLOW SUBMARINE", &mut NoopObserver).expect("decrypt");
        assert_eq!(text, "ATTACK AT DAWN!!");
    }

    #[test]
    fn rejects_wide_key_characters() {
        let err = encrypt_text("HI", "k\u{20ac}y", &mut NoopObserver).unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid key"));
    }

    #[test]
    fn rejects_malformed_ciphertext() {
        let err = decrypt_hex("xyz", "YELLOW SUBMARINE", &mut NoopObserver).unwrap_err();
        assert!(format!("{err:#}").contains("invalid hex"));
    }

    #[test]
    fn trace_prints_every_round() {
        let mut buf = Vec::new();
        let mut tracer = TracePrinter::new(Some(&mut buf));
        encrypt_text("HI", "YELLOW SUBMARINE", &mut tracer).expect("encrypt");
        tracer.finish().expect("trace");
        let out = String::from_utf8(buf).expect("utf8");
        assert_eq!(out.matches("[KEY MATRIX - Round").count(), 11);
        assert!(out.contains("[STATE MATRIX - Round 9]"));
        assert!(out.contains("[FINAL STATE - Round 10]"));
        // Round 0 key is the key text itself, column-major.
        assert!(out.contains("[KEY MATRIX - Round 0]\n59  4f  55  52"));
    }

    #[test]
    fn menu_encrypts_recovers_and_survives_bad_hex() {
        let script = "1\nHI\nYELLOW SUBMARINE\n\
                      2\nnot-hex\nYELLOW SUBMARINE\n\
                      2\n2819a8bea38584d51d818b647d2d3e77\nYELLOW SUBMARINE\n\
                      3\n";
        let mut output = Vec::new();
        run_menu(&mut Cursor::new(script), &mut output, false).expect("menu");
        let out = String::from_utf8(output).expect("utf8");
        assert!(out.contains("FINAL ENCRYPTED HEX: 2819a8bea38584d51d818b647d2d3e77"));
        assert!(out.contains("Error: invalid ciphertext"));
        assert!(out.contains("RECOVERED MESSAGE: HI\n"));
        assert!(out.ends_with("Closing Tool...\n"));
    }

    #[test]
    fn menu_stops_on_end_of_input() {
        let mut output = Vec::new();
        run_menu(&mut Cursor::new("7\n"), &mut output, false).expect("menu");
        let out = String::from_utf8(output).expect("utf8");
        assert!(out.contains("Unknown choice \"7\""));
    }

    #[test]
    fn seeded_demo_is_deterministic() {
        let mut a = seeded_rng(Some(7));
        let mut b = seeded_rng(Some(7));
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
