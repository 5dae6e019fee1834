use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use gacha::{GachaSystem, RankTable, Seed};

/// Draw from a gacha rank table.
///
/// With no flags, reads an ID and a pull count from stdin.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML rank table; the stock SSR/SR/R banner when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print rank percentages over this many pulls and exit.
    #[arg(long, value_name = "PULLS")]
    stats: Option<usize>,

    /// Replay the draw for a recorded seed and exit.
    #[arg(long)]
    seed: Option<Seed>,
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    writeln!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("stdin closed before `{prompt}` was answered");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn interactive<R: BufRead, W: Write>(gacha: &GachaSystem, input: &mut R, out: &mut W) -> Result<()> {
    let id = read_answer(input, out, "ID:")?;
    let times = read_answer(input, out, "times:")?;
    let times: i64 = times
        .trim()
        .parse()
        .with_context(|| format!("pull count `{times}` is not an integer"))?;

    if times == 1 {
        let draw = gacha.pull(Some(&id))?;
        writeln!(out, "Single Pull: {draw}")?;
    } else {
        for (i, draw) in gacha.pull_multiple(times, Some(&id))?.iter().enumerate() {
            writeln!(out, "  {}. {draw}", i + 1)?;
        }
    }
    Ok(())
}

fn stats<W: Write>(gacha: &GachaSystem, pulls: usize, out: &mut W) -> Result<()> {
    writeln!(out, "Statistics from {pulls} pulls:")?;
    let draws = gacha.pull_multiple(pulls, Some("player_stats"))?;
    for (rank, count) in gacha.tally(&draws) {
        let pct = if pulls == 0 {
            0.0
        } else {
            count as f64 / pulls as f64 * 100.0
        };
        writeln!(out, "  {rank}: {pct:.2}%")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let table = match &args.config {
        Some(path) => RankTable::from_file(path)?,
        None => RankTable::default(),
    };
    let mut gacha = GachaSystem::new();
    gacha
        .setup(&table)
        .context("rank table rejected")?;
    log::info!("loaded {} ranks", table.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(seed) = args.seed {
        writeln!(out, "Replay {seed}: {}", gacha.pull_with_seed(seed)?)?;
    } else if let Some(pulls) = args.stats {
        stats(&gacha, pulls, &mut out)?;
    } else {
        interactive(&gacha, &mut io::stdin().lock(), &mut out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gacha::RankSpec;

    fn one_value() -> GachaSystem {
        let mut gacha = GachaSystem::new();
        let table = RankTable::new(vec![RankSpec::new("SSR", 1.0, [("Only", 1.0)])]);
        gacha.setup(&table).unwrap();
        gacha
    }

    fn run(input: &str) -> Result<String> {
        let mut out = Vec::new();
        interactive(&one_value(), &mut input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn single_pull_line() {
        assert_eq!(run("player_123\n1\n").unwrap(), "ID:\ntimes:\nSingle Pull: SSR - Only\n");
    }

    #[test]
    fn multi_pull_lines_are_one_based() {
        let out = run("player_123\n3\n").unwrap();
        assert_eq!(
            out,
            "ID:\ntimes:\n  1. SSR - Only\n  2. SSR - Only\n  3. SSR - Only\n"
        );
    }

    #[test]
    fn zero_pulls_print_nothing() {
        assert_eq!(run("p\n0\n").unwrap(), "ID:\ntimes:\n");
    }

    #[test]
    fn bad_counts_are_errors() {
        assert!(run("p\nten\n").is_err());
        let err = run("p\n-2\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<gacha::GachaError>(),
            Some(gacha::GachaError::InvalidArgument(_))
        ));
        assert!(run("p\n").is_err());
    }

    #[test]
    fn stats_report_every_rank() {
        let mut out = Vec::new();
        stats(&one_value(), 10, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Statistics from 10 pulls:\n  SSR: 100.00%\n"
        );
    }
}
