// Command line front end
// Key generation, file encryption/decryption and the generate-encrypt-decrypt round trip

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use num_bigint::BigUint;
use tracing::{info, warn, Level};

use crate::rsa::{self, KeyGenConfig, KeyMaterial, RsaKey, DEFAULT_ROUNDS};
use crate::util::file_ops::{
    format_file_size, load_keys, read_file, read_text, save_keys, write_file,
};

#[derive(Parser, Debug)]
#[command(name = "textbook-rsa")]
#[command(about = "Textbook RSA key generation and block-wise file encryption", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a key pair and print it
    Keygen {
        #[command(flatten)]
        keygen: KeyGenArgs,
        /// Save {n, e, d} as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print key values in hex instead of decimal
        #[arg(long)]
        hex: bool,
    },
    /// Encrypt a file with the public key {e, n}
    Encrypt {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Decrypt a ciphertext file with the private key {d, n}
    Decrypt {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Generate a key, encrypt a file to <input>.cipher and decrypt it to <input>.out
    Roundtrip {
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        keygen: KeyGenArgs,
        /// Use this "<e> <n>" instead of the generated public key
        #[arg(long)]
        public: Option<String>,
        /// Use this "<d> <n>" instead of the generated private key
        #[arg(long)]
        private: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct KeyGenArgs {
    /// Bit length of the public exponent candidate
    #[arg(short, long, default_value_t = 128)]
    pub bits: u64,
    /// Miller-Rabin rounds per prime candidate
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: u32,
    /// Full key generation restarts before giving up
    #[arg(long, default_value_t = 64)]
    pub max_attempts: u32,
}

impl KeyGenArgs {
    fn config(&self) -> KeyGenConfig {
        KeyGenConfig::default()
            .with_bit_length(self.bits)
            .with_rounds(self.rounds)
            .with_max_attempts(self.max_attempts)
    }
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// JSON key file written by `keygen --out`
    #[arg(short, long, conflicts_with = "key", required_unless_present = "key")]
    pub keys: Option<PathBuf>,
    /// Key as "<exponent> <modulus>"
    #[arg(long)]
    pub key: Option<String>,
}

impl KeyArgs {
    fn resolve(&self, private: bool) -> anyhow::Result<RsaKey> {
        if let Some(key) = &self.key {
            return key.parse::<RsaKey>().context("invalid --key");
        }

        let Some(path) = &self.keys else {
            bail!("either --keys or --key is required");
        };
        let keys = load_keys(path)
            .with_context(|| format!("failed to load keys from {}", path.display()))?;
        let key = if private {
            keys.private_key()
        } else {
            keys.public_key()
        };
        Ok(key?)
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Keygen { keygen, out, hex } => {
            let key = rsa::generate(&keygen.config()).context("key generation failed")?;
            print_key(&key, hex);

            if let Some(path) = out {
                save_keys(&path, &key)
                    .with_context(|| format!("failed to save keys to {}", path.display()))?;
                info!(path = %path.display(), "saved key pair");
            }
        }
        Commands::Encrypt { input, output, key } => {
            let key = key.resolve(false)?;
            encrypt_file(&input, &output, &key)?;
        }
        Commands::Decrypt { input, output, key } => {
            let key = key.resolve(true)?;
            decrypt_file(&input, &output, &key)?;
        }
        Commands::Roundtrip {
            input,
            keygen,
            public,
            private,
        } => {
            roundtrip(&input, &keygen.config(), public.as_deref(), private.as_deref())?;
        }
    }

    Ok(())
}

fn print_key(key: &KeyMaterial, as_hex: bool) {
    let show = |value: &BigUint| {
        if as_hex {
            hex::encode(value.to_bytes_be())
        } else {
            value.to_string()
        }
    };

    println!(
        "Generated key lengths {{e, d}}: {{{}, {}}} bits",
        key.e().bits(),
        key.d().bits()
    );
    println!("Public key {{e, n}} = {{{}, {}}}", show(key.e()), show(key.n()));
    println!("Private key {{d, n}} = {{{}, {}}}", show(key.d()), show(key.n()));
}

fn encrypt_file(input: &Path, output: &Path, key: &RsaKey) -> anyhow::Result<()> {
    let plaintext =
        read_file(input).with_context(|| format!("failed to read {}", input.display()))?;
    let ciphertext = rsa::encrypt(&plaintext, key).context("encryption failed")?;
    write_file(output, ciphertext.as_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        input = %input.display(),
        size = %format_file_size(plaintext.len() as u64),
        modulus_bits = key.bit_length(),
        "encryption done"
    );
    Ok(())
}

fn decrypt_file(input: &Path, output: &Path, key: &RsaKey) -> anyhow::Result<()> {
    let ciphertext =
        read_text(input).with_context(|| format!("failed to read {}", input.display()))?;
    let plaintext = rsa::decrypt(&ciphertext, key).context("decryption failed")?;
    write_file(output, &plaintext)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        output = %output.display(),
        size = %format_file_size(plaintext.len() as u64),
        "decryption done"
    );
    Ok(())
}

fn roundtrip(
    input: &Path,
    config: &KeyGenConfig,
    public: Option<&str>,
    private: Option<&str>,
) -> anyhow::Result<()> {
    let key = rsa::generate(config).context("key generation failed")?;
    print_key(&key, false);

    let public_key = match public {
        Some(text) => text.parse::<RsaKey>().context("invalid --public")?,
        None => key.public_key(),
    };
    let private_key = match private {
        Some(text) => text.parse::<RsaKey>().context("invalid --private")?,
        None => key.private_key(),
    };

    let cipher_path = with_suffix(input, ".cipher");
    let output_path = with_suffix(input, ".out");

    encrypt_file(input, &cipher_path, &public_key)?;
    decrypt_file(&cipher_path, &output_path, &private_key)?;

    let original = read_file(input)?;
    let recovered = read_file(&output_path)?;
    if original == recovered {
        println!("Round trip OK: {} matches the input", output_path.display());
    } else {
        warn!("decrypted bytes differ from the input; the key pair does not match");
        println!("Round trip mismatch: {} differs from the input", output_path.display());
    }

    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
