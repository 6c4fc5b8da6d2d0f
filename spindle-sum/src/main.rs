use anyhow::{Context, Result};
use spindle::{Sh128, SpookyHasher};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const BLOCK: usize = 64 * 1024;

/// Print 128 bit SpookyHash V2 fingerprints
#[derive(StructOpt)]
#[structopt(name = "sum", author = "Liv Fischer")]
struct Opt {
    /// hash this string instead of reading files
    #[structopt(short, long, conflicts_with = "files")]
    string: Option<String>,
    /// first half of the seed
    #[structopt(long, default_value = "0")]
    seed1: u64,
    /// second half of the seed
    #[structopt(long, default_value = "0")]
    seed2: u64,
    /// files to hash, stdin if none are given
    #[structopt(parse(from_os_str))]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let opt = Opt::from_args();
    if let Some(string) = &opt.string {
        let mut hasher = SpookyHasher::new(opt.seed1, opt.seed2);
        hasher.update(string.as_bytes());
        println!("{}  \"{}\"", hasher.finish128(), string);
        return Ok(());
    }
    if opt.files.is_empty() {
        let sum = digest(io::stdin().lock(), &opt).context("Failed to read stdin")?;
        println!("{}  -", sum);
    }
    for path in &opt.files {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let sum = digest(file, &opt).with_context(|| format!("Failed to read {}", path.display()))?;
        println!("{}  {}", sum, path.display());
    }
    Ok(())
}

fn digest<R: Read>(mut input: R, opt: &Opt) -> io::Result<Sh128> {
    let mut hasher = SpookyHasher::new(opt.seed1, opt.seed2);
    let mut block = vec![0u8; BLOCK];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&block[..n]);
        total += n as u64;
    }
    debug!(bytes = total, "digested input");
    Ok(hasher.finish128())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_excludes_files() {
        assert!(Opt::from_iter_safe(["sum", "-s", "saxton hale", "notes.txt"]).is_err());
        let opt = Opt::from_iter_safe(["sum", "-s", "saxton hale", "--seed1", "3"]).unwrap();
        assert_eq!(Some("saxton hale".to_owned()), opt.string);
        assert_eq!(3, opt.seed1);
        assert!(opt.files.is_empty());
    }

    #[test]
    fn digest_matches_one_shot_hash() {
        let data: Vec<u8> = (0..BLOCK * 2 + 17).map(|i| (i % 251) as u8).collect();
        let opt = Opt::from_iter_safe(["sum", "--seed1", "1", "--seed2", "2"]).unwrap();
        let sum = digest(&data[..], &opt).unwrap();
        assert_eq!(spindle::hash128(&data, Sh128::new(1, 2)), sum);
    }
}
