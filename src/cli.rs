//! Command line interface for the `fedicom` binary.
//!
//! Kept free of crate-internal types so the build script can include it to
//! render the manual page.

use std::{fmt, str::FromStr};

use clap::Parser;

/// Command line arguments for the `fedicom` binary.
#[derive(Debug, Parser)]
#[command(
    name = "fedicom",
    version,
    about = "Send a purchase order to a Fedicom supplier and report incidences"
)]
pub struct Cli {
    /// Supplier host name or address.
    #[arg(long)]
    pub host: String,

    /// Supplier port.
    #[arg(short, long)]
    pub port: u16,

    /// Timeout in seconds for connect, send and receive (0 uses the default).
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,

    /// Protocol user (at most 16 characters).
    #[arg(short, long)]
    pub user: String,

    /// Protocol password (at most 8 characters).
    #[arg(long, env = "FEDICOM_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Customer code the order is placed under.
    #[arg(short, long)]
    pub customer: String,

    /// Customer-side order number.
    #[arg(long, default_value_t = 1)]
    pub order_number: u64,

    /// Local purchase reference used in logs.
    #[arg(short, long, default_value = "cli")]
    pub reference: String,

    /// Supplier code used in logs.
    #[arg(long)]
    pub party: Option<String>,

    /// Order lines as `CODE=QUANTITY`.
    #[arg(required = true, value_name = "CODE=QUANTITY")]
    pub lines: Vec<LineArg>,
}

/// One `CODE=QUANTITY` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineArg {
    /// Supplier article code.
    pub code: String,
    /// Requested units.
    pub quantity: u32,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, quantity) = s
            .split_once('=')
            .ok_or_else(|| format!("expected CODE=QUANTITY, got {s:?}"))?;
        if code.trim().is_empty() {
            return Err(format!("missing article code in {s:?}"));
        }
        let quantity = quantity
            .trim()
            .parse()
            .map_err(|e| format!("invalid quantity in {s:?}: {e}"))?;
        Ok(Self {
            code: code.trim().to_owned(),
            quantity,
        })
    }
}

impl fmt::Display for LineArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.code, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::{Cli, LineArg};

    #[test]
    fn parses_order_arguments() {
        let cli = Cli::parse_from([
            "fedicom",
            "--host",
            "orders.example.com",
            "--port",
            "1001",
            "--user",
            "FARMA01",
            "--password",
            "secret",
            "--customer",
            "CUST0001",
            "8470001234=7",
            "8470005678=3",
        ]);
        assert_eq!(cli.port, 1001);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.order_number, 1);
        assert_eq!(
            cli.lines,
            [
                LineArg {
                    code: "8470001234".into(),
                    quantity: 7
                },
                LineArg {
                    code: "8470005678".into(),
                    quantity: 3
                },
            ]
        );
    }

    #[rstest]
    #[case("8470001234")]
    #[case("=4")]
    #[case("847=many")]
    #[case("847=-1")]
    fn rejects_malformed_lines(#[case] raw: &str) {
        assert!(raw.parse::<LineArg>().is_err());
    }
}
