//! CLI argument definitions for JSONL output.

use clap::Args;
use std::path::PathBuf;

/// Arguments shared by every command that generates records.
#[derive(Args, Clone, Debug)]
pub struct CommonMockArgs {
    /// Number of records to generate
    #[arg(long, short = 'n', default_value = "10")]
    pub count: u64,

    /// Random seed for reproducible output (unset = seeded from the OS)
    #[arg(long, env = "DATA_MOCKER_SEED")]
    pub seed: Option<u64>,
}

/// Where generated records go.
#[derive(Args, Clone, Debug)]
pub struct JsonlOutputArgs {
    /// Output JSONL file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long, requires = "output")]
    pub append: bool,

    #[command(flatten)]
    pub common: CommonMockArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        output: JsonlOutputArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.output.common.count, 10);
        assert!(cli.output.output.is_none());
        assert!(!cli.output.append);
    }

    #[test]
    fn test_explicit_values() {
        let cli = TestCli::try_parse_from([
            "test", "--count", "5", "--seed", "7", "-o", "out.jsonl", "--append",
        ])
        .unwrap();
        assert_eq!(cli.output.common.count, 5);
        assert_eq!(cli.output.common.seed, Some(7));
        assert_eq!(cli.output.output, Some(PathBuf::from("out.jsonl")));
        assert!(cli.output.append);
    }

    #[test]
    fn test_append_requires_output() {
        assert!(TestCli::try_parse_from(["test", "--append"]).is_err());
    }
}
