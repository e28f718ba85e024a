use std::time::Duration;

#[derive(Debug, Clone, clap::Parser)]
#[command(
    name = "ariel-selftest",
    about = "Probe an Ari'el service: /health, /demo, then the first emotion or chat endpoint that answers"
)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10.0", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Pretty-print the matched response body instead of a short excerpt
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn base_url(&self) -> String {
        // NOTE: a bare IPv6 literal has to be bracketed or the port gets
        // swallowed into the address.
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("\"{raw}\" is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds (got {raw})"));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("timeout of {raw} seconds is too large"))
}
