use anyhow::Context;
use clap::Parser;
use inquire::Text;
use skysniff_core::{Config, ForecastPeriod, NwsApi};

/// Fetch and display an hourly or daily forecast for a given address.
#[derive(Debug, Parser)]
#[command(name = "skysniff", version)]
pub struct Cli {
    /// Forecast to show: daily, hourly.
    #[arg(value_parser = parse_period)]
    pub period: ForecastPeriod,

    /// Ask for the address instead of using the stored one.
    #[arg(short, long)]
    pub ask: bool,

    /// Store the address you type as the default.
    #[arg(long, requires = "ask")]
    pub save: bool,

    /// Number of periods in the daily forecast.
    #[arg(long)]
    pub days: Option<usize>,

    /// Print the raw forecast JSON instead of text.
    #[arg(long, conflicts_with = "raw")]
    pub debug: bool,

    /// Print the raw gridpoint data for the address.
    #[arg(long)]
    pub raw: bool,

    /// More logging on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_period(value: &str) -> Result<ForecastPeriod, String> {
    ForecastPeriod::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        let address = self.address(&mut config)?;
        let api = NwsApi::from_config(&config);

        if self.raw {
            let raw = api.raw_forecast(&address).await?;
            println!("{}", pretty_json(&raw));
            return Ok(());
        }

        let days = self.days.unwrap_or_else(|| config.days());
        let forecast = api.forecast(&address, self.period).await?.with_days(days);

        let output = if self.debug { forecast.render_debug() } else { forecast.render_text()? };
        println!("{output}");

        Ok(())
    }

    fn address(&self, config: &mut Config) -> anyhow::Result<String> {
        if let (false, Some(address)) = (self.ask, &config.address) {
            return Ok(address.clone());
        }

        let address = Text::new("Address:").prompt().context("Failed to read address")?;

        if self.save {
            config.set_address(address.clone());
            let path = config.save()?;
            tracing::info!("Saved default address to {}", path.display());
        }

        Ok(address)
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
