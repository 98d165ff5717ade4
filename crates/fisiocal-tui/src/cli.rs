//! Command-line arguments.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

pub const USAGE: &str = "\
Uso: fisiocal [opções]

  --json            Imprime os horários projetados em JSON e sai
  --date AAAA-MM-DD Data de referência (padrão: hoje)
  --physio ID       Mostra apenas os alunos do fisioterapeuta ID
  -h, --help        Mostra esta ajuda";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub json: bool,
    pub help: bool,
    pub date: Option<NaiveDate>,
    pub physiotherapist: Option<i64>,
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "-h" | "--help" => parsed.help = true,
            "--date" => {
                let value = iter.next().context("--date requires a value")?;
                parsed.date = Some(
                    NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .with_context(|| format!("Invalid date: {}", value))?,
                );
            }
            "--physio" => {
                let value = iter.next().context("--physio requires a value")?;
                parsed.physiotherapist = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid physiotherapist id: {}", value))?,
                );
            }
            other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse_args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_full_args() {
        let parsed = parse_args(&args(&["--json", "--date", "2024-06-03", "--physio", "4"])).unwrap();
        assert!(parsed.json);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(parsed.physiotherapist, Some(4));
    }

    #[test]
    fn test_invalid_args() {
        assert!(parse_args(&args(&["--date"])).is_err());
        assert!(parse_args(&args(&["--date", "03/06/2024"])).is_err());
        assert!(parse_args(&args(&["--physio", "abc"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }
}
