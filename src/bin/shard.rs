use clap::{crate_version, Parser};
use std::error::Error;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vshard::commitment::{Commitments, GroupParams};
use vshard::config::ShardConfig;
use vshard::decimal::{parse_decimal, parse_point};
use vshard::engine::Engine;
use vshard::sss::Share;

#[derive(Debug, Parser)]
#[command(name = "shard")]
#[command(version = crate_version!())]
#[command(
    about = "SHARD - verifiable threshold secret sharing",
    long_about = "Split a secret integer into shares over a prime field so that any threshold of them rebuild it, check shares against public Pedersen commitments, and generate refresh shares that re-randomize a share set without changing the secret. All integers are read and printed in base 10. Prime and group sizes come from <config-dir>/conf.toml, overridable with SHARD_PRIME_BITS and SHARD_SAMPLE_BITS."
)]
enum CliArgument {
    /// Split a secret into shares under a freshly generated (or given) prime.
    Deal {
        /// Secret to split.
        #[clap(long)]
        secret: String,

        /// Share threshold.
        #[clap(long, short)]
        threshold: usize,

        /// Number of shares to generate.
        #[clap(long, short)]
        shares: usize,

        /// Use this prime instead of generating one.
        #[clap(long, short)]
        prime: Option<String>,

        /// Verbose mode also displays binding values and commitments
        #[clap(long, short)]
        verbose: bool,

        /// Print the full result as JSON
        #[clap(long)]
        json: bool,
    },
    /// Combine shares to rebuild a secret. The threshold is the number of shares given.
    Reconstruct {
        /// Prime the shares were dealt under.
        #[clap(long, short)]
        prime: String,

        /// Shares as x:y.
        #[clap(required = true)]
        shares: Vec<String>,
    },
    /// Generate refresh shares for an existing share set.
    Refresh {
        /// Prime the shares were dealt under.
        #[clap(long, short)]
        prime: String,

        /// Share threshold.
        #[clap(long, short)]
        threshold: usize,

        /// Number of shares.
        #[clap(long, short)]
        shares: usize,

        /// Group element g printed by deal.
        #[clap(long)]
        g: String,

        /// Group element h printed by deal.
        #[clap(long)]
        h: String,

        /// Print the full result as JSON
        #[clap(long)]
        json: bool,
    },
    /// Check a share against published commitments.
    Verify {
        /// Prime the share was dealt under.
        #[clap(long, short)]
        prime: String,

        /// Group element g.
        #[clap(long)]
        g: String,

        /// Group element h.
        #[clap(long)]
        h: String,

        /// Commitments in coefficient order.
        #[clap(long, required = true, num_args = 1..)]
        commitments: Vec<String>,

        /// Share as x:y:r.
        #[clap(long)]
        share: String,
    },
}

#[derive(Parser, Debug)]
#[clap(name = "shard")]
struct Opt {
    /// Directory holding conf.toml; created with defaults if missing.
    #[clap(long, short, global = true)]
    config_dir: Option<PathBuf>,

    /// Subcommand to run.
    #[clap(subcommand)]
    argument: CliArgument,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let opt = Opt::parse();

    let config = match &opt.config_dir {
        Some(dir) => ShardConfig::new(dir)?,
        None => ShardConfig::from_env()?,
    };
    debug!("Using config: {:?}", config);
    let engine = Engine::new(config);

    match opt.argument {
        CliArgument::Deal {
            secret,
            threshold,
            shares,
            prime,
            verbose,
            json,
        } => {
            let secret = parse_decimal(&secret)?;
            let report = match prime {
                Some(prime) => {
                    let prime = parse_decimal(&prime)?;
                    engine.deal_with_prime(&secret, threshold, shares, &prime)?
                }
                None => engine.deal(&secret, threshold, shares)?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("🔢 Prime used: {}", report.prime);
            println!("   g: {}", report.params.g);
            println!("   h: {}", report.params.h);
            for (i, share) in report.shares.iter().enumerate() {
                println!("✂️  Share {}: {}", i + 1, share);
            }

            if verbose {
                println!("🐛 group modulus: {}", report.group_modulus);
                for share in &report.shares {
                    if let Some(r) = &share.r {
                        println!("  binding {}: {}", share.x, r);
                    }
                }
                for (i, c) in report.commitments.as_slice().iter().enumerate() {
                    println!("  C[{}]: {}", i, c);
                }
            }
        }

        CliArgument::Reconstruct { prime, shares } => {
            let prime = parse_decimal(&prime)?;
            let points = shares
                .iter()
                .map(|text| parse_point(text).map(|(x, y, _)| Share::point(x, y)))
                .collect::<Result<Vec<_>, _>>()?;

            let secret = engine.reconstruct(&prime, &points)?;
            println!("🔑 Reconstructed Secret: {}", secret);
        }

        CliArgument::Refresh {
            prime,
            threshold,
            shares,
            g,
            h,
            json,
        } => {
            let prime = parse_decimal(&prime)?;
            let params = GroupParams {
                g: parse_decimal(&g)?,
                h: parse_decimal(&h)?,
            };

            let report = engine.refresh(&prime, threshold, shares, &params)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            for (i, share) in report.shares.iter().enumerate() {
                println!("🔄 Share {}: {}", i + 1, share);
            }
        }

        CliArgument::Verify {
            prime,
            g,
            h,
            commitments,
            share,
        } => {
            let prime = parse_decimal(&prime)?;
            let params = GroupParams {
                g: parse_decimal(&g)?,
                h: parse_decimal(&h)?,
            };
            let commitments = Commitments::new(
                commitments
                    .iter()
                    .map(|c| parse_decimal(c))
                    .collect::<Result<Vec<_>, _>>()?,
            );
            let (x, y, r) = parse_point(&share)?;
            let share = Share { x, y, r };

            let outcome = engine.verify(&prime, &params, &commitments, &share)?;
            if outcome.is_valid() {
                println!("✅ Share is VALID for {}", share.x);
            } else {
                println!("❌ Share is INVALID for {}", share.x);
            }
        }
    }

    Ok(())
}
