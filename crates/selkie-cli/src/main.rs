//! Selkie command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Encrypt a file for a recipient (modern scheme)
//! selkie --encrypt --nip modern -p npub1... -i note.txt -o note.json
//!
//! # Decrypt it with the matching secret key
//! selkie --decrypt --nip modern -k nsec1... -i note.json -o note.txt
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use rand::rngs::OsRng;
use selkie_codec::{Envelope, Scheme};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Envelope encryption for Nostr keys
#[derive(Parser, Debug)]
#[command(name = "selkie")]
#[command(about = "Encrypt and decrypt end-to-end encrypted Nostr envelopes")]
#[command(version)]
struct Args {
    /// Encrypt the input file for a recipient
    #[arg(long, conflicts_with = "decrypt")]
    encrypt: bool,

    /// Decrypt an envelope produced by --encrypt
    #[arg(long)]
    decrypt: bool,

    /// Recipient's public key (npub, required for encryption)
    #[arg(short = 'p', long)]
    recipient: Option<String>,

    /// Own secret key (nsec, required for decryption)
    #[arg(short = 'k', long)]
    key: Option<String>,

    /// Input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Envelope scheme
    #[arg(long, value_enum, default_value_t = Nip::Legacy)]
    nip: Nip,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Scheme names as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Nip {
    /// NIP-04 style: AES-256-CBC with a 16-byte IV
    Legacy,
    /// NIP-44 style: ChaCha20-Poly1305 with a 12-byte nonce
    Modern,
}

impl From<Nip> for Scheme {
    fn from(nip: Nip) -> Self {
        match nip {
            Nip::Legacy => Self::Nip04,
            Nip::Modern => Self::Nip44,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let scheme = Scheme::from(args.nip);

    if args.encrypt {
        let recipient = args
            .recipient
            .as_deref()
            .ok_or("recipient public key (-p) is required for encryption")?;
        encrypt_file(scheme, recipient, &args.input, &args.output)?;
        tracing::info!(
            "encrypted {} -> {} using {}",
            args.input.display(),
            args.output.display(),
            scheme
        );
    } else if args.decrypt {
        let key = args.key.as_deref().ok_or("own secret key (-k) is required for decryption")?;
        decrypt_file(scheme, key, &args.input, &args.output)?;
        tracing::info!(
            "decrypted {} -> {} using {}",
            args.input.display(),
            args.output.display(),
            scheme
        );
    } else {
        return Err("either --encrypt or --decrypt must be specified".into());
    }

    Ok(())
}

/// Reads plaintext from `input` and writes an envelope JSON to `output`.
fn encrypt_file(
    scheme: Scheme,
    recipient: &str,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let plaintext = std::fs::read(input)?;
    let envelope = selkie_codec::encrypt_envelope(scheme, recipient, &plaintext, &mut OsRng)?;
    std::fs::write(output, envelope.to_json()?)?;
    Ok(())
}

/// Reads an envelope JSON from `input` and writes plaintext to `output`.
fn decrypt_file(
    scheme: Scheme,
    key: &str,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(input)?;
    let envelope = Envelope::from_json(&json)?;
    let plaintext = selkie_codec::decrypt_envelope(scheme, key, &envelope)?;
    std::fs::write(output, plaintext)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use selkie_codec::{SecretKey, agreement};

    use super::*;

    fn keypair() -> (String, String) {
        let secret = SecretKey::from_bytes([9u8; 32]);
        let public = agreement::derive_public_key(&secret);
        (public.encode(), secret.encode())
    }

    #[test]
    fn nip_flag_maps_to_scheme() {
        assert_eq!(Scheme::from(Nip::Legacy), Scheme::Nip04);
        assert_eq!(Scheme::from(Nip::Modern), Scheme::Nip44);
    }

    #[test]
    fn file_round_trip_both_schemes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.json");
        let restored = dir.path().join("restored.txt");
        let (npub, nsec) = keypair();

        for scheme in [Scheme::Nip04, Scheme::Nip44] {
            std::fs::write(&input, b"hello nostr").expect("write input");
            encrypt_file(scheme, &npub, &input, &sealed).expect("encrypt");
            decrypt_file(scheme, &nsec, &sealed, &restored).expect("decrypt");
            assert_eq!(std::fs::read(&restored).expect("read output"), b"hello nostr");
        }
    }

    #[test]
    fn decrypt_rejects_the_other_scheme() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.json");
        let restored = dir.path().join("restored.txt");
        let (npub, nsec) = keypair();

        std::fs::write(&input, b"hello nostr").expect("write input");
        encrypt_file(Scheme::Nip04, &npub, &input, &sealed).expect("encrypt");
        assert!(decrypt_file(Scheme::Nip44, &nsec, &sealed, &restored).is_err());
    }

    #[test]
    fn args_require_a_mode() {
        let args = Args::try_parse_from(["selkie", "-i", "in", "-o", "out"]).expect("parse");
        assert!(!args.encrypt && !args.decrypt);

        assert!(
            Args::try_parse_from(["selkie", "--encrypt", "--decrypt", "-i", "a", "-o", "b"])
                .is_err(),
            "encrypt and decrypt must conflict"
        );
    }
}
