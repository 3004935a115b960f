//! CLI front-end over the `zkhash-prover` library: build or verify a proof
//! and (de)serialize it as pretty JSON, mirroring the
//! `StarkOutput`/`generate_stark_proof_from_witness`/`verify_stark_proof`
//! split this crate's cryptographic core is descended from.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use zkhash_prover::prover::KdfParams;
use zkhash_prover::{prove_hash_integrity, prove_knowledge_of_preimage, verify, AlgorithmTag, Proof};

#[derive(Parser)]
#[command(name = "prover", about = "Build and verify MiMC hash-knowledge proofs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Argon2id,
    Bcrypt,
    NativeMimc,
}

impl From<Algorithm> for AlgorithmTag {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Argon2id => AlgorithmTag::Argon2id,
            Algorithm::Bcrypt => AlgorithmTag::Bcrypt,
            Algorithm::NativeMimc => AlgorithmTag::NativeMimc,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Prove the hash-integrity claim: a MiMC trace keyed by a
    /// password-hash artifact, terminating at a declared output.
    ProveHash {
        /// The password (witness).
        #[arg(long)]
        password: String,
        /// Which KDF (or the native-mimc carve-out) binds the MiMC key.
        #[arg(long, value_enum, default_value_t = Algorithm::NativeMimc)]
        algorithm: Algorithm,
        /// Argon2id salt (ignored for bcrypt/native-mimc). Random if omitted.
        #[arg(long)]
        salt: Option<String>,
        /// Argon2id time cost (ignored for bcrypt/native-mimc).
        #[arg(long, default_value_t = 2)]
        time_cost: u32,
        /// Argon2id memory cost in KiB (ignored for bcrypt/native-mimc).
        #[arg(long, default_value_t = 19_456)]
        memory_kib: u32,
        /// bcrypt cost factor (ignored for argon2id/native-mimc).
        #[arg(long, default_value_t = 10)]
        cost: u32,
        /// Where to write the proof JSON.
        #[arg(long)]
        out: PathBuf,
    },
    /// Prove the knowledge-of-preimage claim: knowledge of a secret H
    /// mapping to a public output under a public nonce.
    ProveKnowledge {
        /// The secret preimage (witness).
        #[arg(long)]
        secret: String,
        /// The public nonce.
        #[arg(long)]
        nonce: String,
        /// Where to write the proof JSON.
        #[arg(long)]
        out: PathBuf,
    },
    /// Verify a proof JSON file.
    Verify {
        /// Path to the proof JSON file.
        #[arg(long)]
        proof: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::ProveHash {
            password,
            algorithm,
            salt,
            time_cost,
            memory_kib,
            cost,
            out,
        } => {
            let salt = salt.unwrap_or_else(|| zkhash_prover::kdf::random_salt(16));
            let params = KdfParams {
                salt,
                time_cost,
                memory_kib,
                cost,
            };
            let proof = prove_hash_integrity(password.as_bytes(), algorithm.into(), &params)?;
            write_proof(&out, &proof)?;
            println!("wrote hash-integrity proof to {}", out.display());
        }
        Commands::ProveKnowledge { secret, nonce, out } => {
            let proof = prove_knowledge_of_preimage(secret.as_bytes(), nonce.as_bytes())?;
            write_proof(&out, &proof)?;
            println!("wrote knowledge-of-preimage proof to {}", out.display());
        }
        Commands::Verify { proof } => {
            let text = fs::read_to_string(&proof)
                .with_context(|| format!("reading proof file {}", proof.display()))?;
            let parsed: Proof =
                serde_json::from_str(&text).context("parsing proof JSON")?;
            let response = match verify(&parsed) {
                Ok(_) => json!({"success": true, "message": "proof accepted"}),
                Err(e) => json!({"success": false, "error": e.to_string()}),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn write_proof(path: &PathBuf, proof: &Proof) -> Result<()> {
    let text = serde_json::to_string_pretty(proof).context("serializing proof")?;
    fs::write(path, text).with_context(|| format!("writing proof file {}", path.display()))?;
    Ok(())
}
